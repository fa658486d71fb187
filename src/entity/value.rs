//! Claim values ("targets") and their equality rules

use super::ids::{ItemId, PropertyId};
use super::{EntityError, EntityResult};
use crate::rdf::{vocab, Literal};
use chrono::{DateTime, NaiveDate};

/// Proleptic Gregorian calendar model item.
pub const GREGORIAN: &str = "http://www.wikidata.org/entity/Q1985727";

/// Unit of a dimensionless quantity.
pub const DIMENSIONLESS: &str = "1";

/// Time precision for a calendar day.
pub const PRECISION_DAY: u8 = 11;

/// Highest precision Wikibase accepts (seconds).
pub const PRECISION_MAX: u8 = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeValue {
    /// Timestamp in Wikibase form, e.g. `+2020-01-01T00:00:00Z`
    pub time: String,
    pub precision: u8,
    pub timezone: i32,
    pub before: i32,
    pub after: i32,
    pub calendar_model: String,
}

impl TimeValue {
    /// A day-precision Gregorian date.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            time: format!("+{}T00:00:00Z", date.format("%Y-%m-%d")),
            precision: PRECISION_DAY,
            timezone: 0,
            before: 0,
            after: 0,
            calendar_model: GREGORIAN.to_string(),
        }
    }

    fn normalized_time(&self) -> &str {
        self.time.strip_prefix('+').unwrap_or(&self.time)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantityValue {
    /// Signed decimal string, e.g. `+42` or `-1.5`
    pub amount: String,
    /// `"1"` or an entity IRI
    pub unit: String,
    pub upper_bound: Option<String>,
    pub lower_bound: Option<String>,
}

impl QuantityValue {
    pub fn dimensionless(amount: &str) -> Self {
        Self {
            amount: signed_decimal(amount),
            unit: DIMENSIONLESS.to_string(),
            upper_bound: None,
            lower_bound: None,
        }
    }
}

/// A concrete claim, qualifier or reference value.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    String(String),
    Monolingual { text: String, language: String },
    Item(ItemId),
    Property(PropertyId),
    Time(TimeValue),
    Quantity(QuantityValue),
    /// A datavalue read from the wiki that this crate does not model
    /// (coordinates, lexemes, ...). Kept verbatim.
    Other(serde_json::Value),
}

impl Target {
    /// Wikibase datavalue type tag.
    pub fn value_type(&self) -> &str {
        match self {
            Target::String(_) => "string",
            Target::Monolingual { .. } => "monolingualtext",
            Target::Item(_) | Target::Property(_) => "wikibase-entityid",
            Target::Time(_) => "time",
            Target::Quantity(_) => "quantity",
            Target::Other(value) => value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("unknown"),
        }
    }

    /// Semantic equality used for deduplication.
    ///
    /// Stricter than string comparison for quantities and times: `+42` equals
    /// `42.0`, and a time matches only at the same precision.
    pub fn same_value(&self, other: &Target) -> bool {
        match (self, other) {
            (Target::String(a), Target::String(b)) => a == b,
            (
                Target::Monolingual { text: a, language: la },
                Target::Monolingual { text: b, language: lb },
            ) => a == b && la == lb,
            (Target::Item(a), Target::Item(b)) => a == b,
            (Target::Property(a), Target::Property(b)) => a == b,
            (Target::Time(a), Target::Time(b)) => {
                a.normalized_time() == b.normalized_time()
                    && a.precision == b.precision
                    && a.calendar_model == b.calendar_model
            }
            (Target::Quantity(a), Target::Quantity(b)) => {
                normalize_decimal(&a.amount) == normalize_decimal(&b.amount) && a.unit == b.unit
            }
            (Target::Other(a), Target::Other(b)) => a == b,
            _ => false,
        }
    }

    /// Convert an RDF literal into a target.
    pub fn from_literal(literal: &Literal) -> EntityResult<Target> {
        if let Some(language) = &literal.language {
            return Ok(Target::Monolingual {
                text: literal.lexical.clone(),
                language: language.clone(),
            });
        }
        let lexical = literal.lexical.trim();
        match literal.datatype.as_str() {
            vocab::xsd::STRING => Ok(Target::String(literal.lexical.clone())),
            vocab::xsd::DATE => {
                let date = NaiveDate::parse_from_str(lexical, "%Y-%m-%d")
                    .map_err(|_| invalid_literal(literal))?;
                Ok(Target::Time(TimeValue::day(date)))
            }
            vocab::xsd::DATE_TIME => {
                let date = DateTime::parse_from_rfc3339(lexical)
                    .map(|dt| dt.date_naive())
                    .or_else(|_| {
                        chrono::NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S")
                            .map(|dt| dt.date())
                    })
                    .map_err(|_| invalid_literal(literal))?;
                Ok(Target::Time(TimeValue::day(date)))
            }
            vocab::xsd::INTEGER | vocab::xsd::DECIMAL => {
                if !is_decimal(lexical) {
                    return Err(invalid_literal(literal));
                }
                Ok(Target::Quantity(QuantityValue::dimensionless(lexical)))
            }
            vocab::xsd::DOUBLE => {
                let value: f64 = lexical.parse().map_err(|_| invalid_literal(literal))?;
                if !value.is_finite() {
                    return Err(invalid_literal(literal));
                }
                Ok(Target::Quantity(QuantityValue::dimensionless(&value.to_string())))
            }
            other => Err(EntityError::UnsupportedLiteral {
                datatype: other.to_string(),
                lexical: literal.lexical.clone(),
            }),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::String(s) => write!(f, "{:?}", s),
            Target::Monolingual { text, language } => write!(f, "{:?}@{}", text, language),
            Target::Item(id) => write!(f, "{}", id),
            Target::Property(id) => write!(f, "{}", id),
            Target::Time(t) => write!(f, "{}/{}", t.time, t.precision),
            Target::Quantity(q) if q.unit == DIMENSIONLESS => write!(f, "{}", q.amount),
            Target::Quantity(q) => write!(f, "{} {}", q.amount, q.unit),
            Target::Other(v) => write!(f, "{}", v),
        }
    }
}

fn invalid_literal(literal: &Literal) -> EntityError {
    EntityError::InvalidLiteral {
        datatype: literal.datatype.clone(),
        lexical: literal.lexical.clone(),
    }
}

fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    (!int.is_empty() || !frac.is_empty())
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical decimal form: no leading `+`, no leading integer zeros, no
/// trailing fractional zeros, `-0` collapsed to `0`.
pub fn normalize_decimal(s: &str) -> String {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let int = int.trim_start_matches('0');
    let frac = frac.trim_end_matches('0');
    let int = if int.is_empty() { "0" } else { int };

    let mut out = String::new();
    if negative && !(int == "0" && frac.is_empty()) {
        out.push('-');
    }
    out.push_str(int);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Wikibase amounts always carry an explicit sign.
fn signed_decimal(s: &str) -> String {
    let normalized = normalize_decimal(s);
    if normalized.starts_with('-') {
        normalized
    } else {
        format!("+{}", normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_normalization() {
        assert_eq!(normalize_decimal("+42"), "42");
        assert_eq!(normalize_decimal("042.500"), "42.5");
        assert_eq!(normalize_decimal("-0.0"), "0");
        assert_eq!(normalize_decimal("-1.10"), "-1.1");
        assert_eq!(normalize_decimal(".5"), "0.5");
        assert_eq!(signed_decimal("3"), "+3");
        assert_eq!(signed_decimal("-3"), "-3");
    }

    #[test]
    fn quantities_compare_by_normalized_amount_and_unit() {
        let a = Target::Quantity(QuantityValue::dimensionless("42"));
        let b = Target::Quantity(QuantityValue {
            amount: "+42.0".into(),
            unit: "1".into(),
            upper_bound: Some("+43".into()),
            lower_bound: None,
        });
        assert!(a.same_value(&b));

        let metres = Target::Quantity(QuantityValue {
            amount: "+42".into(),
            unit: "http://www.wikidata.org/entity/Q11573".into(),
            upper_bound: None,
            lower_bound: None,
        });
        assert!(!a.same_value(&metres));
    }

    #[test]
    fn times_compare_by_timestamp_and_precision() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let day = Target::Time(TimeValue::day(date));
        let mut year = TimeValue::day(date);
        year.precision = 9;
        assert!(!day.same_value(&Target::Time(year)));

        let unsigned = TimeValue {
            time: "2020-01-01T00:00:00Z".into(),
            ..TimeValue::day(date)
        };
        assert!(day.same_value(&Target::Time(unsigned)));
    }

    #[test]
    fn different_kinds_never_match() {
        let item = Target::Item(ItemId::parse("Q5").unwrap());
        let string = Target::String("Q5".into());
        assert!(!item.same_value(&string));
    }

    #[test]
    fn literal_conversion() {
        assert_eq!(
            Target::from_literal(&Literal::string("abc")).unwrap(),
            Target::String("abc".into())
        );
        assert_eq!(
            Target::from_literal(&Literal::lang("Alien", "en")).unwrap(),
            Target::Monolingual {
                text: "Alien".into(),
                language: "en".into()
            }
        );

        match Target::from_literal(&Literal::typed("2023-07-15", vocab::xsd::DATE)).unwrap() {
            Target::Time(t) => {
                assert_eq!(t.time, "+2023-07-15T00:00:00Z");
                assert_eq!(t.precision, 11);
                assert_eq!(t.calendar_model, GREGORIAN);
            }
            other => panic!("expected time, got {:?}", other),
        }

        match Target::from_literal(&Literal::typed("2023-07-15T10:20:30Z", vocab::xsd::DATE_TIME))
            .unwrap()
        {
            Target::Time(t) => assert_eq!(t.time, "+2023-07-15T00:00:00Z"),
            other => panic!("expected time, got {:?}", other),
        }

        match Target::from_literal(&Literal::typed("42", vocab::xsd::INTEGER)).unwrap() {
            Target::Quantity(q) => {
                assert_eq!(q.amount, "+42");
                assert_eq!(q.unit, "1");
            }
            other => panic!("expected quantity, got {:?}", other),
        }

        match Target::from_literal(&Literal::typed("1.5e2", vocab::xsd::DOUBLE)).unwrap() {
            Target::Quantity(q) => assert_eq!(q.amount, "+150"),
            other => panic!("expected quantity, got {:?}", other),
        }
    }

    #[test]
    fn bad_literals_are_errors() {
        assert!(matches!(
            Target::from_literal(&Literal::typed("2023-13-45", vocab::xsd::DATE)),
            Err(EntityError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            Target::from_literal(&Literal::typed("4x", vocab::xsd::INTEGER)),
            Err(EntityError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            Target::from_literal(&Literal::typed("true", vocab::xsd::BOOLEAN)),
            Err(EntityError::UnsupportedLiteral { .. })
        ));
    }
}
