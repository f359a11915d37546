use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver::SMOOTHING_MS;
use crate::error::{LoadError, Result};
use crate::ranking::RankOptions;

/// Options recognised by a [`crate::timeline::Timeline`].
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Entry to start on. The latest entry when unset or out of range.
    pub initial_index: Option<usize>,
    pub autoplay: bool,
    pub autoplay_interval_ms: u64,
    /// Skill rows shown while collapsed.
    pub top_n: usize,
    /// Years advanced per autoplay tick.
    pub step_years: f64,
    pub smoothing_ms: u64,
    pub building_lookback_years: f64,
    pub building_threshold: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            initial_index: None,
            autoplay: false,
            autoplay_interval_ms: 800,
            top_n: 10,
            step_years: 0.5,
            smoothing_ms: SMOOTHING_MS,
            building_lookback_years: 0.25,
            building_threshold: 0.5,
        }
    }
}

impl TimelineConfig {
    pub fn initial_index(mut self, index: usize) -> Self {
        self.initial_index = Some(index);
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn autoplay_interval_ms(mut self, interval: u64) -> Self {
        self.autoplay_interval_ms = interval;
        self
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn step_years(mut self, step: f64) -> Self {
        self.step_years = step;
        self
    }

    pub fn smoothing_ms(mut self, smoothing: u64) -> Self {
        self.smoothing_ms = smoothing;
        self
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            lookback_years: self.building_lookback_years,
            building_threshold: self.building_threshold,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let config = TimelineConfig::from_json(r#"{"topN": 5, "autoplay": true}"#).unwrap();
        assert_eq!(config.top_n, 5);
        assert!(config.autoplay);
        assert_eq!(config.autoplay_interval_ms, 800);
        assert_eq!(config.step_years, 0.5);
        assert_eq!(config.initial_index, None);
    }

    #[test]
    fn builders_set_fields() {
        let config = TimelineConfig::default()
            .initial_index(2)
            .autoplay(true)
            .autoplay_interval_ms(300)
            .top_n(3)
            .step_years(1.0)
            .smoothing_ms(0);
        assert_eq!(config.initial_index, Some(2));
        assert_eq!(config.autoplay_interval_ms, 300);
        assert_eq!(config.smoothing_ms, 0);
        assert_eq!(config.rank_options(), RankOptions::default());
    }

    #[test]
    fn missing_files_report_their_path() {
        let err = TimelineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
