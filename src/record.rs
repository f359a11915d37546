//! The single adapter between loosely-shaped content records and the timeline.
//!
//! Editorial content arrives with inconsistent field names and value shapes.
//! Every lookup that tolerates that lives here so the rest of the crate only
//! ever sees [`crate::normalize::TimelineEntry`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LoadError, Result};

const START_FIELDS: &[&str] = &["startYear", "start_year", "start", "startDate", "year", "from"];
const END_FIELDS: &[&str] = &["endYear", "end_year", "end", "endDate", "to"];
const TITLE_FIELDS: &[&str] = &["title", "role", "position", "jobTitle", "job_title"];
const COMPANY_FIELDS: &[&str] = &["company", "employer", "organization"];
const LEVEL_FIELDS: &[&str] = &["skills", "skillLevels", "skill_levels"];
const TECH_FIELDS: &[&str] = &[
    "technologies",
    "technology",
    "tech",
    "tools",
    "tags",
    "stack",
    "technologiesUsed",
    "technologies_used",
];
const ONGOING_FLAGS: &[&str] = &["current", "ongoing", "isCurrent", "present"];
const ONGOING_WORDS: &[&str] = &["present", "current", "now", "ongoing"];

/// One experience record as delivered by the content source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEntry(pub Map<String, Value>);

/// How a record describes the end of its range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawEnd {
    /// An explicit, parseable end year.
    Year(f64),
    /// The role is still going on.
    Ongoing,
    /// Nothing usable; the entry is a point in time.
    Missing,
}

impl RawEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion, mostly for tests and bundled content.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    fn first(&self, fields: &[&str]) -> Option<&Value> {
        fields
            .iter()
            .filter_map(|field| self.0.get(*field))
            .find(|value| !is_blank(value))
    }

    /// The start year, or `None` when no start field parses.
    pub fn start_year(&self) -> Option<f64> {
        START_FIELDS
            .iter()
            .filter_map(|field| self.0.get(*field))
            .find_map(parse_year)
    }

    pub fn end(&self) -> RawEnd {
        let flagged = ONGOING_FLAGS
            .iter()
            .any(|field| matches!(self.0.get(*field), Some(Value::Bool(true))));
        if flagged {
            return RawEnd::Ongoing;
        }

        for value in END_FIELDS.iter().filter_map(|field| self.0.get(*field)) {
            if let Value::String(text) = value {
                let word = text.trim().to_ascii_lowercase();
                if ONGOING_WORDS.contains(&word.as_str()) {
                    return RawEnd::Ongoing;
                }
            }
            if let Some(year) = parse_year(value) {
                return RawEnd::Year(year);
            }
        }
        RawEnd::Missing
    }

    pub fn title(&self) -> String {
        self.first(TITLE_FIELDS)
            .and_then(Value::as_str)
            .map(|title| title.trim().to_owned())
            .unwrap_or_default()
    }

    pub fn company(&self) -> Option<String> {
        self.first(COMPANY_FIELDS)
            .and_then(Value::as_str)
            .map(|company| company.trim().to_owned())
            .filter(|company| !company.is_empty())
    }

    /// Explicitly authored levels, clamped to `0..=100`.
    pub fn skill_levels(&self) -> BTreeMap<String, f64> {
        let mut levels = BTreeMap::new();
        for value in LEVEL_FIELDS.iter().filter_map(|field| self.0.get(*field)) {
            let Value::Object(map) = value else {
                continue;
            };
            for (name, level) in map {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let Some(level) = parse_number(level) else {
                    continue;
                };
                levels
                    .entry(name.to_owned())
                    .or_insert(level.clamp(0.0, 100.0));
            }
        }
        levels
    }

    /// Tag-like skill mentions, deduplicated in first-seen order.
    pub fn technologies(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            let name = name.trim();
            if !name.is_empty() && !out.iter().any(|seen| seen == name) {
                out.push(name.to_owned());
            }
        };

        for value in TECH_FIELDS.iter().filter_map(|field| self.0.get(*field)) {
            match value {
                Value::Array(items) => items.iter().filter_map(Value::as_str).for_each(&mut push),
                Value::String(text) => text.split(',').for_each(&mut push),
                Value::Object(map) => map.keys().for_each(|key| push(key.as_str())),
                _ => {}
            }
        }
        // A plain list under `skills` carries no levels.
        for value in LEVEL_FIELDS.iter().filter_map(|field| self.0.get(*field)) {
            if let Value::Array(items) = value {
                items.iter().filter_map(Value::as_str).for_each(&mut push);
            }
        }
        out
    }
}

impl From<Map<String, Value>> for RawEntry {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Parse a year from a number, a numeric string, or a string containing a
/// `19xx`/`20xx` substring. Returns `None` when nothing parses.
pub fn parse_year(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|year| year.is_finite()),
        Value::String(text) => {
            let text = text.trim();
            if let Ok(year) = text.parse::<f64>() {
                if year.is_finite() {
                    return Some(year);
                }
            }
            find_year_substring(text)
        }
        _ => None,
    }
}

fn find_year_substring(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    bytes.windows(4).find_map(|window| {
        let century_ok = matches!(window, [b'1', b'9', ..] | [b'2', b'0', ..]);
        if century_ok && window.iter().all(u8::is_ascii_digit) {
            std::str::from_utf8(window).ok()?.parse::<f64>().ok()
        } else {
            None
        }
    })
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

/// Parse a JSON document holding an array of records.
///
/// A top-level object with an `experiences` or `timeline` array is accepted as
/// well, matching how the site's pages hand data to the timeline.
pub fn records_from_json(text: &str) -> Result<Vec<RawEntry>> {
    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match ["experiences", "timeline"]
            .iter()
            .find_map(|key| map.remove(*key))
        {
            Some(Value::Array(items)) => items,
            _ => return Err(LoadError::NotAnArray("an object")),
        },
        Value::Null => return Err(LoadError::NotAnArray("null")),
        Value::Bool(_) => return Err(LoadError::NotAnArray("a boolean")),
        Value::Number(_) => return Err(LoadError::NotAnArray("a number")),
        Value::String(_) => return Err(LoadError::NotAnArray("a string")),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(RawEntry(map)),
            other => {
                log::warn!("skipping non-object timeline record: {other}");
                None
            }
        })
        .collect())
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawEntry>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    records_from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn years_parse_from_every_supported_shape() {
        assert_eq!(parse_year(&json!(2015)), Some(2015.0));
        assert_eq!(parse_year(&json!(2016.5)), Some(2016.5));
        assert_eq!(parse_year(&json!("2018")), Some(2018.0));
        assert_eq!(parse_year(&json!(" 2019.25 ")), Some(2019.25));
        assert_eq!(parse_year(&json!("2021-02")), Some(2021.0));
        assert_eq!(parse_year(&json!("since March 1999")), Some(1999.0));
        assert_eq!(parse_year(&json!("sometime")), None);
        assert_eq!(parse_year(&json!(null)), None);
        assert_eq!(parse_year(&json!(true)), None);
    }

    #[test]
    fn first_non_empty_title_wins() {
        let entry = RawEntry::new()
            .with("title", "")
            .with("role", "Senior Engineer")
            .with("position", "ignored");
        assert_eq!(entry.title(), "Senior Engineer");
        assert_eq!(RawEntry::new().title(), "");
    }

    #[test]
    fn ongoing_roles_are_detected() {
        assert_eq!(RawEntry::new().with("end", "Present").end(), RawEnd::Ongoing);
        assert_eq!(RawEntry::new().with("current", true).end(), RawEnd::Ongoing);
        assert_eq!(RawEntry::new().with("endDate", "2020-01").end(), RawEnd::Year(2020.0));
        assert_eq!(RawEntry::new().with("end", Value::Null).end(), RawEnd::Missing);
    }

    #[test]
    fn technologies_accept_lists_strings_and_objects() {
        let entry = RawEntry::new()
            .with("technologies", json!(["React", " Node "]))
            .with("stack", "AWS, React ,,Postgres")
            .with("tools", json!({"Docker": true}));
        assert_eq!(entry.technologies(), vec!["React", "Node", "AWS", "Postgres", "Docker"]);
    }

    #[test]
    fn skill_levels_are_clamped_and_sanitized() {
        let entry = RawEntry::new().with(
            "skills",
            json!({"TS": 140, "Go": "35", "Rust": "lots", " ": 10}),
        );
        let levels = entry.skill_levels();
        assert_eq!(levels.get("TS"), Some(&100.0));
        assert_eq!(levels.get("Go"), Some(&35.0));
        assert!(!levels.contains_key("Rust"));
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn skill_arrays_count_as_technologies() {
        let entry = RawEntry::new().with("skills", json!(["Figma", "CSS"]));
        assert!(entry.skill_levels().is_empty());
        assert_eq!(entry.technologies(), vec!["Figma", "CSS"]);
    }

    #[test]
    fn documents_must_hold_an_array() {
        let records = records_from_json(r#"{"experiences": [{"role": "Dev"}, 3]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert!(matches!(
            records_from_json("42"),
            Err(LoadError::NotAnArray("a number"))
        ));
        assert!(matches!(records_from_json("{"), Err(LoadError::Json(_))));
    }
}
