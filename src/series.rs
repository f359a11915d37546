/// One `(year, value)` sample of a skill's proficiency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillPoint {
    pub year: f64,
    /// Proficiency in the `[0, 100]` range.
    pub value: f64,
}

impl SkillPoint {
    pub fn new(year: f64, value: f64) -> Self {
        Self { year, value }
    }
}

/// The ordered samples of a single named skill across all entries.
///
/// Points are kept ascending by year and never share a year; building from
/// duplicates keeps the larger value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillSeries {
    points: Vec<SkillPoint>,
}

impl SkillSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = SkillPoint>) -> Self {
        let mut series = Self::new();
        for point in points {
            series.insert(point);
        }
        series
    }

    /// Insert a sample, collapsing onto an existing point of the same year by
    /// keeping the maximum value.
    pub fn insert(&mut self, point: SkillPoint) {
        if !point.year.is_finite() || !point.value.is_finite() {
            return;
        }
        let value = point.value.clamp(0.0, 100.0);
        match self
            .points
            .binary_search_by(|probe| probe.year.total_cmp(&point.year))
        {
            Ok(found) => {
                let existing = &mut self.points[found];
                existing.value = existing.value.max(value);
            }
            Err(slot) => self.points.insert(slot, SkillPoint::new(point.year, value)),
        }
    }

    pub fn points(&self) -> &[SkillPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&SkillPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SkillPoint> {
        self.points.last()
    }

    /// Proficiency at `t`, linearly interpolated between the bracketing
    /// samples and held flat before the first and after the last one.
    pub fn level_at(&self, t: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if self.points.len() == 1 || t <= first.year || t.is_nan() {
            return first.value;
        }
        if t >= last.year {
            return last.value;
        }

        // First index whose year is strictly greater than `t`; `t` lies in
        // (first.year, last.year) so both neighbours exist.
        let upper = self.points.partition_point(|point| point.year <= t);
        let a = self.points[upper - 1];
        let b = self.points[upper];
        let span = b.year - a.year;
        let frac = if span > 0.0 { (t - a.year) / span } else { 0.0 };
        a.value + (b.value - a.value) * frac
    }
}
