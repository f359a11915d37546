// Preludes: re-export commonly used items for convenience
pub use crate::widgets;

pub use crate::app::{sample_records, PortfolioApp, SiteEvent};
pub use crate::bus::EventBus;
pub use crate::cards::{Card, CardContext, TextCard, TimelineCard};
pub use crate::config::TimelineConfig;
pub use crate::controller::{PlaybackState, ScrubKey};
pub use crate::dataflow::{ContentSource, Fetch, JsonFileSource, StaticSource};
pub use crate::normalize::{normalize, Normalized, TimelineEntry};
pub use crate::record::RawEntry;
pub use crate::state::{StateId, StateStore};
pub use crate::timeline::{Timeline, TimelineEvent, TimelineView};
