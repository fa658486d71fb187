//! Commit driver: submits finalized edits, one transaction per item

use crate::entity::ItemId;
use crate::patch::FinalizedEdit;
use crate::wiki::{WikiClient, WikiError, WikiResult};
use regex_lite::Regex;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that stop the commit driver itself
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for commit operations
pub type CommitResult<T> = Result<T, CommitError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// Print the per-item diff, write nothing
    DryRun,
    /// Submit every edit through the wiki client
    Live,
}

/// An item whose edit was not saved
#[derive(Debug, Clone, PartialEq)]
pub struct CommitFailure {
    pub item: ItemId,
    pub error: String,
    /// Retrying later could succeed (network, lag, edit conflict)
    pub transient: bool,
}

/// Per-item outcome of a commit pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    /// Items whose edit the wiki accepted
    pub committed: Vec<ItemId>,
    /// Items reported but not submitted (dry run)
    pub planned: Vec<ItemId>,
    /// Blocklisted items
    pub skipped: Vec<ItemId>,
    /// Items whose edit failed
    pub failed: Vec<CommitFailure>,
}

impl CommitReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Failed items worth resubmitting in a later run.
    pub fn transient_failures(&self) -> impl Iterator<Item = &ItemId> {
        self.failed.iter().filter(|f| f.transient).map(|f| &f.item)
    }

    fn fail(&mut self, item: &ItemId, error: String, transient: bool) {
        let kind = if transient { "transient" } else { "permanent" };
        error!("Edit of {} failed ({}): {}", item, kind, error);
        self.failed.push(CommitFailure {
            item: item.clone(),
            error,
            transient,
        });
    }

    /// Process exit status: 1 when any item failed.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

impl std::fmt::Display for CommitReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} committed, {} planned, {} skipped, {} failed",
            self.committed.len(),
            self.planned.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Consumes finalized edits in order.
pub struct CommitDriver {
    wiki: Arc<dyn WikiClient>,
    mode: CommitMode,
    blocklist: HashSet<ItemId>,
}

impl CommitDriver {
    pub fn new(wiki: Arc<dyn WikiClient>, mode: CommitMode) -> Self {
        Self {
            wiki,
            mode,
            blocklist: HashSet::new(),
        }
    }

    /// Items that must never be edited.
    pub fn with_blocklist(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.blocklist.extend(items);
        self
    }

    /// Report or submit each edit. A failed item never blocks later items.
    pub fn commit(
        &self,
        edits: &[FinalizedEdit],
        out: &mut impl Write,
    ) -> CommitResult<CommitReport> {
        let mut report = CommitReport::default();
        for edit in edits {
            if self.blocklist.contains(&edit.item) {
                warn!("Skipping edit, {} is blocked", edit.item);
                report.skipped.push(edit.item.clone());
                continue;
            }

            if self.mode == CommitMode::DryRun {
                render_edit(edit, out)?;
            }

            let request = match &edit.request {
                Ok(request) => request,
                Err(e) => {
                    report.fail(&edit.item, format!("can't serialize: {}", e), false);
                    continue;
                }
            };

            match self.mode {
                CommitMode::DryRun => report.planned.push(edit.item.clone()),
                CommitMode::Live => {
                    info!(
                        "Edit {}: {}",
                        edit.item,
                        edit.summary.as_deref().unwrap_or("(none)")
                    );
                    for claim in &edit.claims {
                        let guid = claim.guid.as_deref().unwrap_or("(new claim)");
                        info!(" ⮑ {} / {}", guid, claim.key.property);
                    }
                    match self.wiki.submit_edit(request) {
                        Ok(result) => {
                            info!("Saved {} (revision {:?})", edit.item, result.revision);
                            report.committed.push(edit.item.clone());
                        }
                        Err(e) => report.fail(&edit.item, e.to_string(), e.is_transient()),
                    }
                }
            }
        }
        Ok(report)
    }
}

/// Item ids listed on a wiki page, in page order.
///
/// Any `Q<digits>` in the page's plain text counts. A missing page yields an
/// empty list.
pub fn page_blocklist(wiki: &dyn WikiClient, title: &str) -> WikiResult<Vec<ItemId>> {
    let Some(text) = wiki.page_text(title)? else {
        warn!("Blocklist page {} not found", title);
        return Ok(Vec::new());
    };
    let pattern = Regex::new(r"Q[0-9]+").map_err(|e| WikiError::Malformed(e.to_string()))?;
    let mut items: Vec<ItemId> = Vec::new();
    for id in pattern.find_iter(&text).filter_map(|m| ItemId::parse(m.as_str())) {
        if !items.contains(&id) {
            items.push(id);
        }
    }
    debug!("Blocklist page {}: {} items", title, items.len());
    Ok(items)
}

/// Write the human-readable diff of one item's edit.
pub fn render_edit(edit: &FinalizedEdit, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}: {}", edit.item, edit.summary.as_deref().unwrap_or("(none)"))?;
    for claim in &edit.claims {
        match &claim.guid {
            Some(guid) => writeln!(out, "  {} {}", claim.key.property, guid)?,
            None => writeln!(out, "  {} (new claim)", claim.key.property)?,
        }
        for change in &claim.changes {
            writeln!(out, "    {}", change)?;
        }
    }
    if let Err(e) = &edit.request {
        writeln!(out, "  ! {}", e)?;
    }
    Ok(())
}
