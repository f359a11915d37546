use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

use crate::record::{RawEnd, RawEntry};
use crate::series::{SkillPoint, SkillSeries};

/// Level given to a technology mentioned without an explicit proficiency.
pub const TECHNOLOGY_DEFAULT_LEVEL: f64 = 20.0;

const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// One experience record after normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub start_year: f64,
    /// Never smaller than `start_year`.
    pub end_year: f64,
    pub title: String,
    pub company: Option<String>,
    pub skill_levels: BTreeMap<String, f64>,
    pub technologies: BTreeSet<String>,
}

impl TimelineEntry {
    pub fn new(start_year: f64, end_year: f64, title: impl Into<String>) -> Self {
        Self {
            start_year,
            end_year: end_year.max(start_year),
            title: title.into(),
            company: None,
            skill_levels: BTreeMap::new(),
            technologies: BTreeSet::new(),
        }
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn skill(mut self, name: impl Into<String>, level: f64) -> Self {
        self.skill_levels.insert(name.into(), level.clamp(0.0, 100.0));
        self
    }

    pub fn technology(mut self, name: impl Into<String>) -> Self {
        self.technologies.insert(name.into());
        self
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start_year <= t && t <= self.end_year
    }

    /// Every skill the entry mentions, explicit or tag-like.
    pub fn skill_names(&self) -> BTreeSet<&str> {
        self.skill_levels
            .keys()
            .chain(self.technologies.iter())
            .map(String::as_str)
            .collect()
    }

    /// The value this entry contributes to a skill's series.
    pub fn level_of(&self, name: &str) -> Option<f64> {
        self.skill_levels.get(name).copied().or_else(|| {
            self.technologies
                .contains(name)
                .then_some(TECHNOLOGY_DEFAULT_LEVEL)
        })
    }

    /// Re-encode as a raw record that normalizes back to `self`.
    pub fn to_raw(&self) -> RawEntry {
        let mut map = Map::new();
        map.insert("startYear".into(), Value::from(self.start_year));
        map.insert("endYear".into(), Value::from(self.end_year));
        map.insert("title".into(), Value::from(self.title.clone()));
        if let Some(company) = &self.company {
            map.insert("company".into(), Value::from(company.clone()));
        }
        let levels: Map<String, Value> = self
            .skill_levels
            .iter()
            .map(|(name, level)| (name.clone(), Value::from(*level)))
            .collect();
        map.insert("skills".into(), Value::Object(levels));
        map.insert(
            "technologies".into(),
            Value::from(self.technologies.iter().cloned().collect::<Vec<_>>()),
        );
        RawEntry(map)
    }
}

/// Sorted entries together with the per-skill series derived from them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    pub entries: Vec<TimelineEntry>,
    pub series: BTreeMap<String, SkillSeries>,
}

impl Normalized {
    /// Sort `entries` by start (stable) and derive the series.
    pub fn from_entries(mut entries: Vec<TimelineEntry>) -> Self {
        entries.sort_by(|a, b| a.start_year.total_cmp(&b.start_year));
        let series = build_series(&entries);
        Self { entries, series }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Earliest start, `0.0` without entries.
    pub fn min_year(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.start_year)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Latest end, `0.0` without entries.
    pub fn max_year(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.end_year)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_year(), self.max_year())
    }

    /// Index of the entry whose start is closest to `t`; earlier entries win ties.
    pub fn nearest_index(&self, t: f64) -> usize {
        let mut best = 0;
        let mut best_diff = f64::INFINITY;
        for (index, entry) in self.entries.iter().enumerate() {
            let diff = (entry.start_year - t).abs();
            if diff < best_diff {
                best = index;
                best_diff = diff;
            }
        }
        best
    }

    pub fn series(&self, name: &str) -> Option<&SkillSeries> {
        self.series.get(name)
    }

    pub fn level_at(&self, name: &str, t: f64) -> f64 {
        self.series(name).map_or(0.0, |series| series.level_at(t))
    }

    /// All skill names, sorted.
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

fn build_series(entries: &[TimelineEntry]) -> BTreeMap<String, SkillSeries> {
    let mut series: BTreeMap<String, SkillSeries> = BTreeMap::new();
    for entry in entries {
        for name in entry.skill_names() {
            let Some(value) = entry.level_of(name) else {
                continue;
            };
            series
                .entry(name.to_owned())
                .or_default()
                .insert(SkillPoint::new(entry.start_year, value));
        }
    }
    series
}

/// The current moment as a fractional calendar year.
pub fn current_year() -> f64 {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0);
    1970.0 + seconds / SECONDS_PER_YEAR
}

/// Normalize raw records, resolving ongoing roles against the current date.
pub fn normalize(raw: &[RawEntry]) -> Normalized {
    normalize_at(raw, current_year())
}

/// Normalize raw records with an explicit "now" for ongoing roles.
pub fn normalize_at(raw: &[RawEntry], now_year: f64) -> Normalized {
    let _span = tracing::debug_span!("normalize", records = raw.len()).entered();

    let entries = raw
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_entry(index, record, now_year))
        .collect();
    Normalized::from_entries(entries)
}

fn normalize_entry(index: usize, record: &RawEntry, now_year: f64) -> TimelineEntry {
    let start_year = record.start_year().unwrap_or_else(|| {
        log::warn!("timeline record {index} has no parseable start year, using 0");
        0.0
    });
    let end_year = match record.end() {
        RawEnd::Year(year) => year,
        RawEnd::Ongoing => now_year.max(start_year),
        RawEnd::Missing => start_year,
    };

    let mut entry = TimelineEntry::new(start_year, end_year, record.title());
    entry.company = record.company();
    entry.skill_levels = record.skill_levels();
    entry.technologies = record.technologies().into_iter().collect();
    entry
}
