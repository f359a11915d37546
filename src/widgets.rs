mod button;
mod collapsing_list;
mod scrubber;
mod skill_bar;
mod skill_timeline;

pub use button::{Button, ButtonSize};
pub use collapsing_list::collapsing_list;
pub use scrubber::{ScrubAction, Scrubber};
pub use skill_bar::SkillBar;
pub use skill_timeline::SkillTimelineView;
