//! One timeline instance: data, input state machine and both tweens.
//!
//! Everything runs on the frame clock. The host calls [`Timeline::frame`]
//! once per frame with its current time and renders [`Timeline::view`].

use std::collections::BTreeMap;

use crate::bus::{EventBus, Subscription};
use crate::config::TimelineConfig;
use crate::controller::{Controller, PlaybackState, ScrubKey};
use crate::driver::{AnimationDriver, SkillSmoother, Step};
use crate::normalize::{normalize, Normalized};
use crate::ranking::{active_entry, active_index, ranked_skills, RankedSkill, SkillWindow};
use crate::record::RawEntry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineEvent {
    /// A year transition finished nearest to this entry.
    SettledIndex(usize),
    /// A transition started by [`Timeline::select_index`] finished on this
    /// entry. Kept apart from `SettledIndex` so followers never echo back.
    FollowedIndex(usize),
    PlaybackChanged(PlaybackState),
}

/// Everything the rendering layer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineView {
    pub display_year: f64,
    pub target_year: f64,
    pub min_year: f64,
    pub max_year: f64,
    pub active_index: Option<usize>,
    pub active_title: Option<String>,
    pub active_company: Option<String>,
    /// The full ranking; apply `window` to get the visible rows.
    pub skills: Vec<RankedSkill>,
    pub window: SkillWindow,
    pub playback: PlaybackState,
    /// A tween or autoplay is running and the host should keep repainting.
    pub animating: bool,
}

impl TimelineView {
    pub fn visible_skills(&self) -> &[RankedSkill] {
        self.window.visible(&self.skills)
    }
}

pub struct Timeline {
    data: Normalized,
    config: TimelineConfig,
    controller: Controller,
    driver: AnimationDriver,
    smoother: SkillSmoother,
    window: SkillWindow,
    events: EventBus<TimelineEvent>,
    /// Display year and active entry the smoother was last aimed at.
    smoothed_for: Option<(f64, Option<usize>)>,
    /// The running transition was requested through `select_index`.
    following: bool,
    torn_down: bool,
}

impl Timeline {
    pub fn new(data: Normalized, config: TimelineConfig) -> Self {
        let (min, max) = data.bounds();
        let start = config
            .initial_index
            .and_then(|index| data.entries.get(index))
            .or_else(|| data.entries.last())
            .map_or(0.0, |entry| entry.start_year);

        let mut timeline = Self {
            controller: Controller::new(
                start,
                min,
                max,
                config.step_years,
                config.autoplay_interval_ms,
            ),
            driver: AnimationDriver::new(start, min, max),
            smoother: SkillSmoother::new(config.smoothing_ms),
            window: SkillWindow::new(config.top_n),
            events: EventBus::new(),
            smoothed_for: None,
            following: false,
            torn_down: false,
            data,
            config,
        };

        let display = timeline.driver.display_time();
        let targets = timeline.skill_targets(display);
        timeline.smoother.snap(targets);
        timeline.smoothed_for = Some((display, active_index(&timeline.data.entries, display)));

        if timeline.config.autoplay {
            timeline.control(|controller| {
                controller.play();
                None
            });
        }
        log::debug!(
            "timeline created with {} entries spanning {min}..{max}",
            timeline.data.len()
        );
        timeline
    }

    pub fn from_raw(raw: &[RawEntry], config: TimelineConfig) -> Self {
        Self::new(normalize(raw), config)
    }

    pub fn data(&self) -> &Normalized {
        &self.data
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus<TimelineEvent> {
        &self.events
    }

    /// Call `callback` with the entry index every time a transition settles.
    pub fn on_settled_index(&self, callback: impl Fn(usize) + Send + Sync + 'static) -> Subscription {
        self.events.subscribe(move |event| {
            if let TimelineEvent::SettledIndex(index) = event {
                callback(*index);
            }
        })
    }

    pub fn playback(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn target_year(&self) -> f64 {
        self.controller.target()
    }

    pub fn display_year(&self) -> f64 {
        self.driver.display_time()
    }

    pub fn smoothed_values(&self) -> &BTreeMap<String, f64> {
        self.smoother.values()
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.controller.bounds()
    }

    pub fn is_animating(&self) -> bool {
        !self.torn_down
            && (self.driver.is_animating()
                || self.smoother.is_animating()
                || self.controller.is_playing())
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Run one frame at `now` seconds. Returns whether another frame is needed.
    ///
    /// The skill bars are re-aimed when the active entry changes and once the
    /// year settles, not on every frame of a year transition.
    pub fn frame(&mut self, now: f64) -> bool {
        if self.torn_down {
            return false;
        }

        let before = self.controller.state();
        if let Some(target) = self.controller.tick(now) {
            self.driver.set_target(target);
        }
        self.notify_playback(before);

        let step = self.driver.advance(now);
        if let Step::Settled { year } = step {
            if !self.data.is_empty() {
                let index = self.data.nearest_index(year);
                let event = if std::mem::take(&mut self.following) {
                    TimelineEvent::FollowedIndex(index)
                } else {
                    TimelineEvent::SettledIndex(index)
                };
                self.events.publish(event);
            }
        }

        let display = self.driver.display_time();
        let active = active_index(&self.data.entries, display);
        if self.smoothed_for != Some((display, active)) {
            let entry_changed = self.smoothed_for.map(|(_, index)| index) != Some(active);
            if entry_changed || step != Step::Moving {
                let targets = self.skill_targets(display);
                self.smoother.retarget(targets);
                self.smoothed_for = Some((display, active));
            }
        }
        self.smoother.advance(now);

        self.is_animating()
    }

    /// Interpolated levels of the active entry's skills at `t`.
    fn skill_targets(&self, t: f64) -> BTreeMap<String, f64> {
        active_entry(&self.data.entries, t)
            .map(|entry| {
                entry
                    .skill_names()
                    .into_iter()
                    .map(|name| (name.to_owned(), self.data.level_at(name, t).clamp(0.0, 100.0)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn notify_playback(&self, before: PlaybackState) {
        let after = self.controller.state();
        if after != before {
            self.events.publish(TimelineEvent::PlaybackChanged(after));
        }
    }

    fn control(&mut self, op: impl FnOnce(&mut Controller) -> Option<f64>) {
        if self.torn_down {
            return;
        }
        self.following = false;
        let before = self.controller.state();
        if let Some(target) = op(&mut self.controller) {
            self.driver.set_target(target);
        }
        self.notify_playback(before);
    }

    pub fn play(&mut self) {
        self.control(|c| {
            c.play();
            None
        });
    }

    pub fn pause(&mut self) {
        self.control(|c| {
            c.pause();
            None
        });
    }

    pub fn toggle_play(&mut self) {
        self.control(|c| {
            c.toggle_play();
            None
        });
    }

    pub fn begin_scrub(&mut self) {
        self.control(|c| {
            c.begin_scrub();
            None
        });
    }

    pub fn scrub_to(&mut self, t: f64) {
        self.control(|c| Some(c.scrub_to(t)));
    }

    pub fn end_scrub(&mut self) {
        self.control(|c| {
            c.end_scrub();
            None
        });
    }

    pub fn key(&mut self, key: ScrubKey, modifier: bool) {
        self.control(|c| Some(c.key(key, modifier)));
    }

    pub fn step_prev(&mut self) {
        self.control(|c| Some(c.step_prev()));
    }

    pub fn step_next(&mut self) {
        self.control(|c| Some(c.step_next()));
    }

    pub fn jump_to(&mut self, t: f64) {
        self.control(|c| Some(c.jump_to(t)));
    }

    /// Move to the start of entry `index`. Out of range indices are ignored.
    pub fn jump_to_entry(&mut self, index: usize) {
        if let Some(start) = self.data.entries.get(index).map(|entry| entry.start_year) {
            self.jump_to(start);
        }
    }

    /// Follow an externally controlled selection.
    ///
    /// Unlike [`Timeline::jump_to_entry`] this does nothing when the target
    /// already resolves to `index`, or while the timeline is autoplaying or
    /// being scrubbed. The resulting settle is reported as
    /// [`TimelineEvent::FollowedIndex`], so echoing it back is safe.
    pub fn select_index(&mut self, index: usize) {
        if self.data.is_empty()
            || index >= self.data.len()
            || self.controller.state() != PlaybackState::Idle
            || self.data.nearest_index(self.controller.target()) == index
        {
            return;
        }
        self.jump_to_entry(index);
        self.following = true;
    }

    pub fn reset(&mut self) {
        self.control(|c| Some(c.reset()));
    }

    pub fn toggle_expanded(&mut self) {
        self.window.toggle();
    }

    /// Swap in new entries, clamping the current position into the new range.
    pub fn set_entries(&mut self, data: Normalized) {
        if self.torn_down {
            return;
        }
        let (min, max) = data.bounds();
        self.data = data;
        let before = self.controller.state();
        let moved = self.controller.set_bounds(min, max);
        self.driver.set_bounds(min, max);
        if let Some(target) = moved {
            if target != self.driver.target() {
                self.driver.set_target(target);
            }
        }
        self.notify_playback(before);
        self.following = false;
        self.smoothed_for = None;
        log::debug!("timeline entries replaced, now spanning {min}..{max}");
    }

    /// Cancel every tween and autoplay. The timeline ignores input afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.controller.pause();
        self.driver.cancel();
        self.smoother.cancel();
        self.torn_down = true;
        log::debug!("timeline torn down");
    }

    pub fn view(&self) -> TimelineView {
        let display = self.driver.display_time();
        let active_index = active_index(&self.data.entries, display);
        let active = active_index.map(|index| &self.data.entries[index]);
        let (min_year, max_year) = self.controller.bounds();
        TimelineView {
            display_year: display,
            target_year: self.controller.target(),
            min_year,
            max_year,
            active_index,
            active_title: active.map(|entry| entry.title.clone()),
            active_company: active.and_then(|entry| entry.company.clone()),
            skills: ranked_skills(
                &self.data,
                display,
                Some(self.smoother.values()),
                self.config.rank_options(),
            ),
            window: self.window,
            playback: self.controller.state(),
            animating: self.is_animating(),
        }
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::TimelineEntry;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn data() -> Normalized {
        Normalized::from_entries(vec![
            TimelineEntry::new(2015.0, 2018.0, "Frontend")
                .company("Acme")
                .skill("React", 20.0),
            TimelineEntry::new(2018.0, 2022.0, "Platform")
                .skill("React", 80.0)
                .skill("TS", 90.0)
                .technology("Node"),
        ])
    }

    fn run_until_idle(timeline: &mut Timeline, mut now: f64) -> f64 {
        for _ in 0..10_000 {
            if !timeline.frame(now) {
                break;
            }
            now += 1.0 / 60.0;
        }
        now
    }

    #[test]
    fn starts_on_the_latest_entry_or_the_initial_index() {
        let timeline = Timeline::new(data(), TimelineConfig::default());
        assert_eq!(timeline.display_year(), 2018.0);
        assert!(!timeline.is_animating());

        let timeline = Timeline::new(data(), TimelineConfig::default().initial_index(0));
        assert_eq!(timeline.display_year(), 2015.0);
        assert_eq!(timeline.view().active_title.as_deref(), Some("Frontend"));
        assert_eq!(timeline.view().active_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn the_view_ranks_the_active_entry() {
        let timeline = Timeline::new(data(), TimelineConfig::default().top_n(2));
        let view = timeline.view();
        let names: Vec<_> = view.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["TS", "React", "Node"]);
        assert_eq!(view.visible_skills().len(), 2);
        assert_eq!(view.window.hidden_count(view.skills.len()), 1);
    }

    #[test]
    fn jumps_settle_and_report_the_nearest_index() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default());
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&settled);
        timeline.on_settled_index(move |index| sink.lock().push(index));

        timeline.jump_to_entry(0);
        assert!(timeline.view().animating);
        run_until_idle(&mut timeline, 0.0);

        assert_eq!(timeline.display_year(), 2015.0);
        assert_eq!(*settled.lock(), [0]);
        assert_eq!(timeline.smoothed_values().get("React"), Some(&20.0));
    }

    #[test]
    fn autoplay_runs_to_the_end_and_stops() {
        let mut timeline = Timeline::new(
            data(),
            TimelineConfig::default().initial_index(0).autoplay(true),
        );
        assert_eq!(timeline.playback(), PlaybackState::Autoplaying);
        run_until_idle(&mut timeline, 0.0);

        assert_eq!(timeline.playback(), PlaybackState::Idle);
        assert_eq!(timeline.display_year(), 2022.0);
        let events = timeline.events().drain();
        assert!(events.contains(&TimelineEvent::PlaybackChanged(PlaybackState::Autoplaying)));
        assert_eq!(
            events.last(),
            Some(&TimelineEvent::SettledIndex(1)),
        );
    }

    #[test]
    fn scrubbing_interrupts_autoplay() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default().initial_index(0));
        timeline.play();
        timeline.frame(0.0);
        timeline.begin_scrub();
        timeline.scrub_to(2016.0);
        assert_eq!(timeline.playback(), PlaybackState::Scrubbing);
        timeline.end_scrub();
        run_until_idle(&mut timeline, 1.0);
        assert_eq!(timeline.display_year(), 2016.0);
        assert_eq!(timeline.playback(), PlaybackState::Idle);
    }

    #[test]
    fn select_index_ignores_the_current_entry() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default());
        timeline.select_index(1);
        assert!(!timeline.is_animating());
        timeline.select_index(0);
        assert_eq!(timeline.target_year(), 2015.0);
    }

    #[test]
    fn select_index_waits_for_manual_control_to_end() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default().initial_index(0));
        timeline.play();
        timeline.select_index(1);
        assert_eq!(timeline.playback(), PlaybackState::Autoplaying);
        assert_eq!(timeline.target_year(), 2015.0);

        timeline.pause();
        timeline.begin_scrub();
        timeline.select_index(1);
        assert_eq!(timeline.playback(), PlaybackState::Scrubbing);
        assert_eq!(timeline.target_year(), 2015.0);
        timeline.end_scrub();

        timeline.select_index(7);
        assert_eq!(timeline.target_year(), 2015.0);
    }

    #[test]
    fn followed_selections_are_not_reported_as_settles() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default());
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&settled);
        timeline.on_settled_index(move |index| sink.lock().push(index));

        timeline.select_index(0);
        let now = run_until_idle(&mut timeline, 0.0);
        assert_eq!(timeline.display_year(), 2015.0);
        assert!(settled.lock().is_empty());
        assert!(timeline
            .events()
            .drain()
            .contains(&TimelineEvent::FollowedIndex(0)));

        timeline.jump_to_entry(1);
        run_until_idle(&mut timeline, now);
        assert_eq!(*settled.lock(), [1]);
    }

    #[test]
    fn skill_bars_ease_once_the_year_settles() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default().initial_index(0));
        timeline.jump_to(2017.5);
        timeline.frame(0.0);
        timeline.frame(0.1);
        assert!(timeline.display_year() > 2015.0);
        assert_eq!(timeline.smoothed_values().get("React"), Some(&20.0));

        run_until_idle(&mut timeline, 0.2);
        assert_eq!(timeline.display_year(), 2017.5);
        let react = timeline.smoothed_values().get("React").copied().unwrap();
        assert!((react - 70.0).abs() < 1e-9);
    }

    #[test]
    fn new_entries_clamp_the_position() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default());
        timeline.set_entries(Normalized::from_entries(vec![TimelineEntry::new(
            2010.0, 2016.0, "Earlier",
        )]));
        assert_eq!(timeline.bounds(), (2010.0, 2016.0));
        assert_eq!(timeline.target_year(), 2016.0);
        run_until_idle(&mut timeline, 0.0);
        assert_eq!(timeline.display_year(), 2016.0);
    }

    #[test]
    fn teardown_freezes_everything() {
        let mut timeline = Timeline::new(data(), TimelineConfig::default());
        timeline.reset();
        timeline.frame(0.0);
        timeline.frame(0.1);
        let frozen = timeline.display_year();
        timeline.teardown();

        assert!(!timeline.frame(0.2));
        timeline.play();
        timeline.step_next();
        assert_eq!(timeline.display_year(), frozen);
        assert_eq!(timeline.playback(), PlaybackState::Idle);
        assert!(!timeline.view().animating);
    }

    #[test]
    fn empty_timelines_are_neutral() {
        let mut timeline = Timeline::new(Normalized::default(), TimelineConfig::default());
        timeline.play();
        timeline.frame(0.0);
        let view = timeline.view();
        assert_eq!((view.min_year, view.max_year, view.display_year), (0.0, 0.0, 0.0));
        assert_eq!(view.active_index, None);
        assert!(view.skills.is_empty());
    }
}
