//! An animated skill and experience timeline.
//!
//! Loosely shaped experience records are normalized into per-skill series,
//! animated on a frame clock and rendered with egui. The core
//! ([`timeline::Timeline`]) has no UI dependency beyond the time it is handed
//! each frame; [`widgets::SkillTimelineView`] and [`app::PortfolioApp`] put it
//! on screen.

pub mod app;
pub mod bus;
pub mod cards;
pub mod config;
pub mod controller;
pub mod dataflow;
pub mod driver;
pub mod error;
pub mod normalize;
pub mod prelude;
pub mod ranking;
pub mod record;
pub mod series;
pub mod state;
pub mod themes;
pub mod timeline;
pub mod tween;
pub mod widgets;

pub use app::{PortfolioApp, SiteEvent};
pub use config::TimelineConfig;
pub use error::{LoadError, Result};
pub use normalize::{normalize, Normalized, TimelineEntry};
pub use record::RawEntry;
pub use timeline::{Timeline, TimelineEvent, TimelineView};
