//! Input and autoplay state machine.
//!
//! The controller is the only writer of the timeline's target year. Every
//! operation that moves the target returns the new value so the owner can
//! hand it to the [`crate::driver::AnimationDriver`].

use crate::driver::clamp_year;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlaybackState {
    #[default]
    Idle,
    Scrubbing,
    Autoplaying,
}

/// Keys understood by the scrubber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrubKey {
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

impl ScrubKey {
    /// Signed distance in years, `None` for the absolute keys.
    fn delta(self, modifier: bool) -> Option<f64> {
        let (plain, modified) = match self {
            ScrubKey::Left => (-1.0, -5.0),
            ScrubKey::Right => (1.0, 5.0),
            ScrubKey::PageUp => (5.0, 10.0),
            ScrubKey::PageDown => (-5.0, -10.0),
            ScrubKey::Home | ScrubKey::End => return None,
        };
        Some(if modifier { modified } else { plain })
    }
}

pub fn round_tenth(t: f64) -> f64 {
    (t * 10.0).round() / 10.0
}

#[derive(Clone, Debug)]
pub struct Controller {
    state: PlaybackState,
    target: f64,
    min: f64,
    max: f64,
    step_years: f64,
    interval: f64,
    last_tick: Option<f64>,
    /// Unrounded autoplay position; the target is this rounded to a tenth.
    playhead: f64,
}

impl Controller {
    pub fn new(start: f64, min: f64, max: f64, step_years: f64, interval_ms: u64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            state: PlaybackState::Idle,
            target: clamp_year(start, min, max),
            min,
            max,
            step_years: if step_years.is_finite() && step_years > 0.0 {
                step_years
            } else {
                0.5
            },
            interval: interval_ms.max(1) as f64 / 1000.0,
            last_tick: None,
            playhead: 0.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Autoplaying
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            log::debug!("playback {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        if next != PlaybackState::Autoplaying {
            self.last_tick = None;
        }
    }

    fn stop_autoplay(&mut self) {
        if self.is_playing() {
            self.transition(PlaybackState::Idle);
        }
    }

    fn move_to(&mut self, t: f64) -> f64 {
        self.target = clamp_year(t, self.min, self.max);
        self.target
    }

    /// Start autoplay. Does nothing while scrubbing or at the end of the range.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Scrubbing {
            return;
        }
        if self.target >= self.max {
            log::debug!("autoplay requested at the end of the timeline, ignoring");
            return;
        }
        if !self.is_playing() {
            self.playhead = self.target;
        }
        self.transition(PlaybackState::Autoplaying);
    }

    pub fn pause(&mut self) {
        self.stop_autoplay();
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn begin_scrub(&mut self) {
        self.transition(PlaybackState::Scrubbing);
    }

    pub fn scrub_to(&mut self, t: f64) -> f64 {
        self.stop_autoplay();
        self.move_to(t)
    }

    pub fn end_scrub(&mut self) {
        if self.state == PlaybackState::Scrubbing {
            self.transition(PlaybackState::Idle);
        }
    }

    /// Keyboard navigation; relative moves are rounded to a tenth of a year.
    pub fn key(&mut self, key: ScrubKey, modifier: bool) -> f64 {
        self.stop_autoplay();
        match key {
            ScrubKey::Home => self.move_to(self.min),
            ScrubKey::End => self.move_to(self.max),
            _ => {
                let delta = key.delta(modifier).unwrap_or_default();
                self.move_to(round_tenth(self.target + delta))
            }
        }
    }

    pub fn step_prev(&mut self) -> f64 {
        self.stop_autoplay();
        self.move_to(round_tenth(self.target - 1.0))
    }

    pub fn step_next(&mut self) -> f64 {
        self.stop_autoplay();
        self.move_to(round_tenth(self.target + 1.0))
    }

    pub fn jump_to(&mut self, t: f64) -> f64 {
        self.stop_autoplay();
        self.move_to(t)
    }

    pub fn reset(&mut self) -> f64 {
        self.jump_to(self.min)
    }

    /// Advance autoplay on the frame clock.
    ///
    /// The first tick after `play` only records the time. Afterwards one step
    /// is taken for every full interval that elapsed. Steps accumulate
    /// unrounded, so steps below a tenth still make progress; `None` is
    /// returned while the rounded target has not moved. Reaching the end of
    /// the range stops playback.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        if !self.is_playing() {
            return None;
        }
        let last = *self.last_tick.get_or_insert(now);
        let steps = ((now - last) / self.interval).floor();
        if steps.is_nan() || steps < 1.0 {
            return None;
        }
        self.last_tick = Some(last + steps * self.interval);

        let previous = self.target;
        self.playhead = (self.playhead + self.step_years * steps).min(self.max);
        let next = if self.playhead >= self.max {
            self.move_to(self.max)
        } else {
            self.move_to(round_tenth(self.playhead))
        };
        if next >= self.max {
            log::debug!("autoplay reached the end at {next:.1}");
            self.transition(PlaybackState::Idle);
        }
        (next != previous).then_some(next)
    }

    /// Replace the bounds, clamping the target. Returns the new target when
    /// it had to move.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Option<f64> {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = min;
        self.max = max;
        if self.is_playing() && self.target >= max {
            self.transition(PlaybackState::Idle);
        }
        let clamped = clamp_year(self.target, min, max);
        (clamped != self.target).then(|| self.move_to(clamped))
    }
}
