//! Frame-clock tweens.
//!
//! Times are seconds on the host's frame clock (egui's `InputState::time`).
//! A tween starts on the first frame that samples it, the same way a
//! per-frame callback learns its start timestamp.

/// Shortest year transition, in milliseconds.
pub const MIN_YEAR_TWEEN_MS: f64 = 200.0;
/// Longest year transition, in milliseconds.
pub const MAX_YEAR_TWEEN_MS: f64 = 1200.0;
/// Milliseconds of transition per year travelled.
pub const MS_PER_YEAR: f64 = 250.0;

/// Cubic ease-out: fast start, decelerating into the end.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Duration in seconds of a year transition covering `distance` years.
pub fn year_tween_duration(distance: f64) -> f64 {
    let ms = (distance.abs() * MS_PER_YEAR).clamp(MIN_YEAR_TWEEN_MS, MAX_YEAR_TWEEN_MS);
    if ms.is_nan() {
        MIN_YEAR_TWEEN_MS / 1000.0
    } else {
        ms / 1000.0
    }
}

/// The shared clock of a single transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    duration: f64,
    started_at: Option<f64>,
}

impl Timing {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            started_at: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Progress in `[0, 1]` at `now`, latching the start on the first call.
    pub fn ratio(&mut self, now: f64) -> f64 {
        let start = *self.started_at.get_or_insert(now);
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - start) / self.duration).clamp(0.0, 1.0)
    }
}

/// The result of sampling a tween on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub done: bool,
}

/// An eased transition of one number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    timing: Timing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            timing: Timing::new(duration),
        }
    }

    pub fn origin(&self) -> f64 {
        self.from
    }

    pub fn destination(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> f64 {
        self.timing.duration()
    }

    pub fn sample(&mut self, now: f64) -> Sample {
        let ratio = self.timing.ratio(now);
        if ratio >= 1.0 {
            return Sample {
                value: self.to,
                done: true,
            };
        }
        Sample {
            value: self.from + (self.to - self.from) * ease_out_cubic(ratio),
            done: false,
        }
    }
}
