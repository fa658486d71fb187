//! Wikidata access through the `mediawiki` crate's blocking API client

use super::traits::{EditRequest, EditResult, WikiClient, WikiError, WikiResult};
use crate::entity::{json, Item, ItemId};
use mediawiki::api::Api;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Default Wikidata API endpoint
pub const WIKIDATA_API: &str = "https://www.wikidata.org/w/api.php";

#[derive(Debug)]
struct Session {
    api: Api,
    logged_in: bool,
}

/// `WikiClient` over `api.php`: bot-password login, entity reads through
/// `wbgetentities` and writes through `wbeditentity`.
#[derive(Debug)]
pub struct ApiClient {
    api_url: String,
    credentials: Option<(String, String)>,
    bot: bool,
    session: Mutex<Session>,
}

impl ApiClient {
    /// Connect to `api_url`. The client loads site info on construction.
    pub fn new(api_url: impl Into<String>, user_agent: &str) -> WikiResult<Self> {
        let api_url = api_url.into();
        let mut api = Api::new(&api_url).map_err(mediawiki_error)?;
        api.set_user_agent(user_agent);
        Ok(Self {
            api_url,
            credentials: None,
            bot: false,
            session: Mutex::new(Session {
                api,
                logged_in: false,
            }),
        })
    }

    /// Log in with a bot password before the first write.
    pub fn with_login(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    pub fn with_maxlag(mut self, maxlag: Option<u32>) -> Self {
        if let Ok(session) = self.session.get_mut() {
            session.api.set_maxlag(maxlag.map(u64::from));
        }
        self
    }

    /// Flag edits as bot edits.
    pub fn with_bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn session(&self) -> WikiResult<std::sync::MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|_| WikiError::Malformed("session lock poisoned".to_string()))
    }

    fn login(&self, session: &mut Session) -> WikiResult<()> {
        let Some((username, password)) = &self.credentials else {
            return Ok(());
        };
        if session.logged_in {
            return Ok(());
        }
        session
            .api
            .login(username.as_str(), password.as_str())
            .map_err(|e| WikiError::Login(e.to_string()))?;
        info!("Logged in to {} as {}", self.api_url, username);
        session.logged_in = true;
        Ok(())
    }
}

impl WikiClient for ApiClient {
    fn fetch_item(&self, id: &ItemId) -> WikiResult<Item> {
        debug!("Fetching {}", id);
        let query = params(&[
            ("action", "wbgetentities"),
            ("ids", id.as_str()),
            ("props", "info|claims"),
        ]);
        let response = self
            .session()?
            .api
            .get_query_api_json(&query)
            .map_err(mediawiki_error)?;
        let response = check_api_error(response).map_err(|e| match e {
            WikiError::Api { code, .. } if code == "no-such-entity" => {
                WikiError::NotFound(id.clone())
            }
            other => other,
        })?;

        let entity = response["entities"]
            .get(id.as_str())
            .ok_or_else(|| WikiError::Malformed(format!("{} missing from response", id)))?;
        if entity.get("missing").is_some() {
            return Err(WikiError::NotFound(id.clone()));
        }
        Ok(json::item_from_json(entity)?)
    }

    fn submit_edit(&self, edit: &EditRequest) -> WikiResult<EditResult> {
        let mut session = self.session()?;
        self.login(&mut session)?;
        let token = session.api.get_edit_token().map_err(mediawiki_error)?;

        let data = edit.data().to_string();
        let mut form = params(&[
            ("action", "wbeditentity"),
            ("id", edit.item.as_str()),
            ("data", data.as_str()),
            ("token", token.as_str()),
        ]);
        if let Some(summary) = &edit.summary {
            form.insert("summary".to_string(), summary.clone());
        }
        if let Some(base) = edit.base_revision {
            form.insert("baserevid".to_string(), base.to_string());
        }
        if self.bot {
            form.insert("bot".to_string(), "1".to_string());
        }

        let response = session
            .api
            .post_query_api_json_mut(&form)
            .map_err(mediawiki_error)?;
        let response = check_api_error(response)?;
        if response["success"].as_i64() != Some(1) {
            return Err(WikiError::Malformed(format!(
                "wbeditentity did not report success: {}",
                response
            )));
        }
        Ok(EditResult {
            item: edit.item.clone(),
            revision: response["entity"]["lastrevid"].as_u64(),
            nochange: response["entity"].get("nochange").is_some(),
        })
    }

    fn page_text(&self, title: &str) -> WikiResult<Option<String>> {
        let query = params(&[
            ("action", "query"),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("titles", title),
        ]);
        let response = self
            .session()?
            .api
            .get_query_api_json(&query)
            .map_err(mediawiki_error)?;
        let response = check_api_error(response)?;
        let text = response["query"]["pages"]
            .as_object()
            .into_iter()
            .flat_map(|pages| pages.values())
            .filter_map(|page| page["extract"].as_str())
            .find(|extract| !extract.is_empty())
            .map(str::to_string);
        Ok(text)
    }
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    params.insert("format".to_string(), "json".to_string());
    params
}

fn mediawiki_error(e: impl std::fmt::Display) -> WikiError {
    WikiError::MediaWiki(e.to_string())
}

fn check_api_error(response: Value) -> WikiResult<Value> {
    if let Some(error) = response.get("error") {
        return Err(WikiError::Api {
            code: error["code"].as_str().unwrap_or("unknown").to_string(),
            info: error["info"].as_str().unwrap_or_default().to_string(),
        });
    }
    Ok(response)
}
