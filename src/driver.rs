use std::collections::BTreeMap;

use crate::tween::{ease_out_cubic, year_tween_duration, Timing, Tween};

/// Default duration of the skill-bar smoothing transition, in milliseconds.
pub const SMOOTHING_MS: u64 = 400;

/// What happened to the display year on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// No transition is running.
    Idle,
    /// The display year moved and the transition continues.
    Moving,
    /// The transition finished this frame at `year`.
    Settled { year: f64 },
}

/// Owns the authoritative target year and the eased display year.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    target: f64,
    display: f64,
    min: f64,
    max: f64,
    tween: Option<Tween>,
}

impl AnimationDriver {
    /// A driver resting at `start` within `[min, max]`.
    pub fn new(start: f64, min: f64, max: f64) -> Self {
        let (min, max) = ordered(min, max);
        let start = clamp_year(start, min, max);
        Self {
            target: start,
            display: start,
            min,
            max,
            tween: None,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn display_time(&self) -> f64 {
        self.display
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// The running transition, if any.
    pub fn tween(&self) -> Option<&Tween> {
        self.tween.as_ref()
    }

    /// Start an eased transition towards `t` from wherever the display year is
    /// right now. A transition already in flight is dropped.
    pub fn set_target(&mut self, t: f64) {
        let to = clamp_year(t, self.min, self.max);
        let from = self.display;
        self.target = to;
        self.tween = Some(Tween::new(from, to, year_tween_duration(to - from)));
    }

    /// Stop immediately, leaving the display year where the last frame put it.
    pub fn cancel(&mut self) {
        self.tween = None;
    }

    /// Replace the bounds, clamping (not resetting) the current target.
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        let (min, max) = ordered(min, max);
        self.min = min;
        self.max = max;
        let clamped = clamp_year(self.target, min, max);
        if clamped != self.target || self.display < min || self.display > max {
            self.set_target(clamped);
        }
    }

    pub fn advance(&mut self, now: f64) -> Step {
        let Some(tween) = self.tween.as_mut() else {
            return Step::Idle;
        };
        let sample = tween.sample(now);
        self.display = sample.value;
        if sample.done {
            self.tween = None;
            log::debug!("timeline settled at {:.2}", sample.value);
            Step::Settled { year: sample.value }
        } else {
            Step::Moving
        }
    }
}

/// Independently eased display values for the visible skill bars.
#[derive(Clone, Debug)]
pub struct SkillSmoother {
    duration: f64,
    current: BTreeMap<String, f64>,
    from: BTreeMap<String, f64>,
    targets: BTreeMap<String, f64>,
    timing: Option<Timing>,
}

impl SkillSmoother {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration: duration_ms as f64 / 1000.0,
            current: BTreeMap::new(),
            from: BTreeMap::new(),
            targets: BTreeMap::new(),
            timing: None,
        }
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.current
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.current.get(name).copied()
    }

    pub fn is_animating(&self) -> bool {
        self.timing.is_some()
    }

    /// Ease every bar from its current value towards `targets`.
    ///
    /// Bars without a new target hold their current value; bars seen for the
    /// first time start at their target.
    pub fn retarget(&mut self, mut targets: BTreeMap<String, f64>) {
        for (name, value) in &self.current {
            targets.entry(name.clone()).or_insert(*value);
        }
        for (name, target) in &targets {
            self.current.entry(name.clone()).or_insert(*target);
        }
        self.from = self.current.clone();
        self.targets = targets;
        self.timing = Some(Timing::new(self.duration));
    }

    /// Jump every bar to its target without easing.
    pub fn snap(&mut self, targets: BTreeMap<String, f64>) {
        self.timing = None;
        self.current.extend(targets);
    }

    pub fn cancel(&mut self) {
        self.timing = None;
    }

    /// Returns `true` while the transition is still running.
    pub fn advance(&mut self, now: f64) -> bool {
        let Some(timing) = self.timing.as_mut() else {
            return false;
        };
        let ratio = timing.ratio(now);
        if ratio >= 1.0 {
            self.current.clone_from(&self.targets);
            self.timing = None;
            return false;
        }

        let eased = ease_out_cubic(ratio);
        for (name, target) in &self.targets {
            let from = self.from.get(name).copied().unwrap_or(*target);
            let next = from + (target - from) * eased;
            self.current.insert(name.clone(), (next * 100.0).round() / 100.0);
        }
        true
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Clamp into `[min, max]`, treating NaN as `min`.
pub fn clamp_year(t: f64, min: f64, max: f64) -> f64 {
    if t.is_nan() {
        min
    } else {
        t.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_rest_inside_bounds() {
        let driver = AnimationDriver::new(2030.0, 2010.0, 2020.0);
        assert_eq!(driver.display_time(), 2020.0);
        assert_eq!(driver.target(), 2020.0);
        assert!(!driver.is_animating());
    }

    #[test]
    fn tween_runs_to_the_target_and_settles() {
        let mut driver = AnimationDriver::new(2010.0, 2010.0, 2020.0);
        driver.set_target(2014.0);
        assert_eq!(driver.tween().map(Tween::duration), Some(1.0));

        assert_eq!(driver.advance(0.0), Step::Moving);
        assert_eq!(driver.display_time(), 2010.0);
        assert_eq!(driver.advance(0.5), Step::Moving);
        assert!(driver.display_time() > 2012.0 && driver.display_time() < 2014.0);
        assert_eq!(driver.advance(1.0), Step::Settled { year: 2014.0 });
        assert_eq!(driver.display_time(), 2014.0);
        assert_eq!(driver.advance(1.1), Step::Idle);
    }

    #[test]
    fn retargeting_mid_flight_starts_from_the_current_display_year() {
        let mut driver = AnimationDriver::new(2010.0, 2010.0, 2020.0);
        driver.set_target(2020.0);
        driver.advance(0.0);
        driver.advance(0.3);
        let midway = driver.display_time();
        assert!(midway > 2010.0);

        driver.set_target(2012.0);
        assert_eq!(driver.tween().map(Tween::origin), Some(midway));
        assert_eq!(driver.target(), 2012.0);
    }

    #[test]
    fn cancel_freezes_the_display_year() {
        let mut driver = AnimationDriver::new(2010.0, 2010.0, 2020.0);
        driver.set_target(2020.0);
        driver.advance(0.0);
        driver.advance(0.2);
        let frozen = driver.display_time();
        driver.cancel();
        assert_eq!(driver.advance(5.0), Step::Idle);
        assert_eq!(driver.display_time(), frozen);
    }

    #[test]
    fn targets_and_bounds_are_clamped() {
        let mut driver = AnimationDriver::new(2015.0, 2010.0, 2020.0);
        driver.set_target(1990.0);
        assert_eq!(driver.target(), 2010.0);

        driver.set_target(2019.0);
        driver.set_bounds(2012.0, 2016.0);
        assert_eq!(driver.target(), 2016.0);

        driver.set_target(f64::NAN);
        assert_eq!(driver.target(), 2012.0);
    }

    #[test]
    fn smoother_eases_holds_and_seeds() {
        let mut smoother = SkillSmoother::new(400);
        smoother.retarget(BTreeMap::from([("Rust".to_owned(), 40.0)]));
        assert_eq!(smoother.value("Rust"), Some(40.0));
        assert!(smoother.advance(0.0));
        assert!(!smoother.advance(0.5));

        smoother.retarget(BTreeMap::from([
            ("Rust".to_owned(), 80.0),
            ("Go".to_owned(), 30.0),
        ]));
        assert!(smoother.advance(1.0));
        assert!(smoother.advance(1.2));
        let rust = smoother.value("Rust").unwrap();
        assert!(rust > 40.0 && rust < 80.0);
        assert_eq!(smoother.value("Go"), Some(30.0));

        smoother.retarget(BTreeMap::from([("Go".to_owned(), 10.0)]));
        smoother.advance(2.0);
        assert!(!smoother.advance(2.5));
        assert_eq!(smoother.value("Rust"), Some(rust));
        assert_eq!(smoother.value("Go"), Some(10.0));
    }
}
