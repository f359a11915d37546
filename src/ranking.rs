use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::normalize::{Normalized, TimelineEntry};

/// Index of the entry considered current at `t`.
///
/// Containing entries win, latest start first. Otherwise the latest entry
/// that already started, otherwise the first entry. Among entries with the
/// same start the earlier one wins.
pub fn active_index(entries: &[TimelineEntry], t: f64) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }
    let latest_start = |filter: &dyn Fn(&TimelineEntry) -> bool| {
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter(entry))
            // `max_by` keeps the last of equal elements.
            .rev()
            .max_by(|(_, a), (_, b)| a.start_year.total_cmp(&b.start_year))
            .map(|(index, _)| index)
    };

    latest_start(&|entry| entry.contains(t))
        .or_else(|| latest_start(&|entry| entry.start_year <= t))
        .or(Some(0))
}

pub fn active_entry(entries: &[TimelineEntry], t: f64) -> Option<&TimelineEntry> {
    active_index(entries, t).map(|index| &entries[index])
}

/// Thresholds for the "still growing" highlight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankOptions {
    /// How far back to compare against, in years.
    pub lookback_years: f64,
    /// Minimum gain over the lookback that counts as growth.
    pub building_threshold: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            lookback_years: 0.25,
            building_threshold: 0.5,
        }
    }
}

/// One row of the ranked skill list.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedSkill {
    pub name: String,
    /// Displayed level in `[0, 100]`.
    pub value: f64,
    /// Mentioned as a technology by the active entry.
    pub is_current: bool,
    /// Grew noticeably over the lookback window.
    pub is_building: bool,
}

impl RankedSkill {
    pub fn rating(&self) -> &'static str {
        rating_label(self.value)
    }
}

/// Rank the active entry's skills at `t`, highest level first.
///
/// `smoothed` supplies eased display values where available; the growth flag
/// always compares raw interpolated levels.
pub fn ranked_skills(
    normalized: &Normalized,
    t: f64,
    smoothed: Option<&BTreeMap<String, f64>>,
    options: RankOptions,
) -> Vec<RankedSkill> {
    let Some(active) = active_entry(&normalized.entries, t) else {
        return Vec::new();
    };
    let lookback = (t - options.lookback_years).max(normalized.min_year());

    let mut ranked: Vec<RankedSkill> = active
        .skill_names()
        .into_iter()
        .map(|name| {
            let interpolated = normalized.level_at(name, t).clamp(0.0, 100.0);
            let previous = normalized.level_at(name, lookback).clamp(0.0, 100.0);
            let value = smoothed
                .and_then(|values| values.get(name))
                .copied()
                .unwrap_or(interpolated)
                .clamp(0.0, 100.0);
            RankedSkill {
                name: name.to_owned(),
                value,
                is_current: active.technologies.contains(name),
                is_building: interpolated > previous + options.building_threshold,
            }
        })
        .collect();

    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked(a: &RankedSkill, b: &RankedSkill) -> Ordering {
    b.value
        .total_cmp(&a.value)
        .then_with(|| b.is_current.cmp(&a.is_current))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn rating_label(value: f64) -> &'static str {
    if value <= 25.0 {
        "Beginner"
    } else if value <= 50.0 {
        "Intermediate"
    } else if value <= 75.0 {
        "Advanced"
    } else {
        "Expert"
    }
}

/// The top-N display window over a ranked list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillWindow {
    pub top_n: usize,
    pub expanded: bool,
}

impl SkillWindow {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n: top_n.max(1),
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn visible<'a, T>(&self, ranked: &'a [T]) -> &'a [T] {
        if self.expanded {
            ranked
        } else {
            &ranked[..ranked.len().min(self.top_n)]
        }
    }

    /// Rows hidden while collapsed.
    pub fn hidden_count(&self, total: usize) -> usize {
        total.saturating_sub(self.top_n)
    }

    pub fn can_expand(&self, total: usize) -> bool {
        self.hidden_count(total) > 0
    }

    /// Height of the first `top_n` measured rows.
    pub fn collapsed_height(&self, row_heights: &[f32]) -> f32 {
        row_heights.iter().take(self.top_n).sum()
    }

    /// The height the list should animate towards.
    pub fn target_height(&self, row_heights: &[f32]) -> f32 {
        if self.expanded {
            row_heights.iter().sum()
        } else {
            self.collapsed_height(row_heights)
        }
    }
}
