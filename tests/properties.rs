use std::collections::BTreeMap;

use careerline::controller::Controller;
use careerline::driver::AnimationDriver;
use careerline::normalize::normalize_at;
use careerline::prelude::*;
use careerline::series::{SkillPoint, SkillSeries};
use proptest::prelude::*;

const NOW: f64 = 2025.5;

#[derive(Clone, Debug)]
enum Op {
    Scrub(f64),
    Jump(f64),
    Key(ScrubKey, bool),
    StepPrev,
    StepNext,
    Play,
    Reset,
    Wait(f64),
}

fn key() -> impl Strategy<Value = ScrubKey> {
    prop_oneof![
        Just(ScrubKey::Left),
        Just(ScrubKey::Right),
        Just(ScrubKey::PageUp),
        Just(ScrubKey::PageDown),
        Just(ScrubKey::Home),
        Just(ScrubKey::End),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1900.0..2100.0f64).prop_map(Op::Scrub),
        (-1.0e6..1.0e6f64).prop_map(Op::Jump),
        (key(), any::<bool>()).prop_map(|(key, modifier)| Op::Key(key, modifier)),
        Just(Op::StepPrev),
        Just(Op::StepNext),
        Just(Op::Play),
        Just(Op::Reset),
        (0.0..3.0f64).prop_map(Op::Wait),
    ]
}

fn raw_entry() -> impl Strategy<Value = RawEntry> {
    (
        1995u32..2024,
        prop::option::of(0u32..8),
        any::<bool>(),
        "[a-z]{1,8}",
        prop::collection::btree_map("[A-Z][a-z]{0,5}", 0u32..=100, 0..4),
        prop::collection::vec("[A-Z][a-z]{0,5}", 0..3),
    )
        .prop_map(|(start, length, ongoing, title, skills, technologies)| {
            let skills: serde_json::Map<String, serde_json::Value> = skills
                .into_iter()
                .map(|(name, level)| (name, serde_json::Value::from(level)))
                .collect();
            let mut raw = RawEntry::new()
                .with("startYear", start)
                .with("title", title)
                .with("skills", serde_json::Value::Object(skills))
                .with("technologies", technologies);
            if ongoing {
                raw = raw.with("current", true);
            } else if let Some(length) = length {
                raw = raw.with("endYear", start + length);
            }
            raw
        })
}

fn records() -> impl Strategy<Value = Vec<RawEntry>> {
    prop::collection::vec(raw_entry(), 1..6)
}

fn in_bounds(t: f64, (min, max): (f64, f64)) -> bool {
    min <= t && t <= max
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn positions_stay_inside_the_range(raw in records(), ops in prop::collection::vec(op(), 1..40)) {
        let mut timeline = Timeline::new(normalize_at(&raw, NOW), TimelineConfig::default());
        let bounds = timeline.bounds();
        let mut now = 0.0;
        timeline.frame(now);

        for op in ops {
            match op {
                Op::Scrub(t) => {
                    timeline.begin_scrub();
                    timeline.scrub_to(t);
                    timeline.end_scrub();
                }
                Op::Jump(t) => timeline.jump_to(t),
                Op::Key(key, modifier) => timeline.key(key, modifier),
                Op::StepPrev => timeline.step_prev(),
                Op::StepNext => timeline.step_next(),
                Op::Play => timeline.play(),
                Op::Reset => timeline.reset(),
                Op::Wait(seconds) => now += seconds,
            }
            now += 1.0 / 60.0;
            timeline.frame(now);

            prop_assert!(in_bounds(timeline.target_year(), bounds));
            prop_assert!(in_bounds(timeline.display_year(), bounds));
        }
    }

    #[test]
    fn controller_targets_are_clamped(
        min in 1990.0..2010.0f64,
        span in 0.0..20.0f64,
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let max = min + span;
        let mut controller = Controller::new(min, min, max, 0.5, 100);
        let mut now = 0.0;
        for op in ops {
            let moved = match op {
                Op::Scrub(t) => Some(controller.scrub_to(t)),
                Op::Jump(t) => Some(controller.jump_to(t)),
                Op::Key(key, modifier) => Some(controller.key(key, modifier)),
                Op::StepPrev => Some(controller.step_prev()),
                Op::StepNext => Some(controller.step_next()),
                Op::Play => {
                    controller.play();
                    None
                }
                Op::Reset => Some(controller.reset()),
                Op::Wait(seconds) => {
                    now += seconds;
                    controller.tick(now)
                }
            };
            if let Some(t) = moved {
                prop_assert!(in_bounds(t, (min, max)));
            }
            prop_assert!(in_bounds(controller.target(), (min, max)));
        }
    }

    #[test]
    fn interpolation_holds_outside_the_samples(
        points in prop::collection::vec((1990u32..2030, 0u32..=100), 1..8),
        epsilon in 0.0..50.0f64,
    ) {
        let series = SkillSeries::from_points(
            points.iter().map(|&(year, value)| SkillPoint::new(year.into(), value.into())),
        );
        let first = *series.first().unwrap();
        let last = *series.last().unwrap();

        prop_assert_eq!(series.level_at(first.year - epsilon), first.value);
        prop_assert_eq!(series.level_at(last.year + epsilon), last.value);
        for point in series.points() {
            prop_assert!((series.level_at(point.year) - point.value).abs() < 1e-9);
        }
    }

    #[test]
    fn midpoints_average_their_neighbours(
        a in 1990u32..2020,
        gap in 1u32..10,
        va in 0u32..=100,
        vb in 0u32..=100,
    ) {
        let (a, b) = (f64::from(a), f64::from(a + gap));
        let series = SkillSeries::from_points([
            SkillPoint::new(a, va.into()),
            SkillPoint::new(b, vb.into()),
        ]);
        let expected = (f64::from(va) + f64::from(vb)) / 2.0;
        prop_assert!((series.level_at((a + b) / 2.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn normalization_is_idempotent(raw in records()) {
        let once = normalize_at(&raw, NOW);
        let again: Vec<RawEntry> = once.entries.iter().map(TimelineEntry::to_raw).collect();
        let twice = normalize_at(&again, NOW);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn autoplay_runs_to_the_end(
        raw in records(),
        step in 0.01..2.0f64,
        interval in 100u64..400,
    ) {
        let config = TimelineConfig::default()
            .initial_index(0)
            .autoplay(true)
            .step_years(step)
            .autoplay_interval_ms(interval);
        let mut timeline = Timeline::new(normalize_at(&raw, NOW), config);
        let (_, max) = timeline.bounds();

        let mut now = 0.0;
        let mut frames = 0;
        while timeline.frame(now) || timeline.playback() != PlaybackState::Idle {
            prop_assert!(timeline.display_year() <= max);
            now += 1.0 / 30.0;
            frames += 1;
            prop_assert!(frames < 500_000, "autoplay never finished");
        }

        prop_assert_eq!(timeline.playback(), PlaybackState::Idle);
        prop_assert_eq!(timeline.display_year(), max);
    }

    #[test]
    fn retargeting_starts_from_the_current_display(
        first in 2000.0..2020.0f64,
        second in 2000.0..2020.0f64,
        elapsed in 0.0..2.0f64,
    ) {
        let mut driver = AnimationDriver::new(2000.0, 2000.0, 2020.0);
        driver.set_target(first);
        driver.advance(0.0);
        driver.advance(elapsed);
        let shown = driver.display_time();

        driver.set_target(second);
        let tween = driver.tween().unwrap();
        prop_assert_eq!(tween.origin(), shown);
        prop_assert_eq!(tween.destination(), second);
        prop_assert_eq!(driver.target(), second);
    }
}

#[test]
fn technologies_without_levels_use_the_default() {
    let raw = [RawEntry::new()
        .with("startYear", 2020)
        .with("technologies", vec!["Rust"])];
    let data = normalize_at(&raw, NOW);
    let expected: BTreeMap<_, _> = [("Rust".to_owned(), 20.0)].into();
    let levels: BTreeMap<_, _> = data
        .skill_names()
        .map(|name| (name.to_owned(), data.level_at(name, 2020.0)))
        .collect();
    assert_eq!(levels, expected);
}
