use careerline::prelude::*;
use careerline::ranking::{active_index, ranked_skills, RankOptions};

fn entry(start: f64, end: f64) -> RawEntry {
    RawEntry::new().with("startYear", start).with("endYear", end)
}

#[test]
fn react_levels_interpolate_between_roles() {
    let raw = [
        entry(2015.0, 2018.0).with("skills", serde_json::json!({ "React": 20 })),
        entry(2018.0, 2022.0).with("skills", serde_json::json!({ "React": 80 })),
    ];
    let data = normalize(&raw);

    assert!((data.level_at("React", 2016.5) - 50.0).abs() < 1e-9);
    assert_eq!(data.level_at("React", 2010.0), 20.0);
    assert_eq!(data.level_at("React", 2030.0), 80.0);
    assert_eq!(data.level_at("Vue", 2016.5), 0.0);
}

#[test]
fn explicit_levels_outrank_synthetic_technologies() {
    let raw = [
        entry(2015.0, 2018.0).with("skills", serde_json::json!({ "TS": 40 })),
        entry(2018.0, 2022.0)
            .with("skills", serde_json::json!({ "TS": 90 }))
            .with("technologies", serde_json::json!(["Node"])),
    ];
    let data = normalize(&raw);

    let ranked = ranked_skills(&data, 2020.0, None, RankOptions::default());
    let names: Vec<_> = ranked.iter().map(|skill| skill.name.as_str()).collect();
    assert_eq!(names, ["TS", "Node"]);
    assert_eq!(ranked[1].value, 20.0);
    assert!(ranked[1].is_current);
    assert!(!ranked[0].is_current);
}

#[test]
fn the_timeline_ranks_what_is_on_screen() {
    let raw = [
        entry(2015.0, 2018.0).with("skills", serde_json::json!({ "TS": 40 })),
        entry(2018.0, 2022.0)
            .with("title", "Lead")
            .with("skills", serde_json::json!({ "TS": 90 }))
            .with("technologies", serde_json::json!(["Node"])),
    ];
    let timeline = Timeline::from_raw(&raw, TimelineConfig::default());
    let view = timeline.view();

    assert_eq!(view.display_year, 2018.0);
    assert_eq!(view.active_title.as_deref(), Some("Lead"));
    assert_eq!(view.visible_skills()[0].name, "TS");
}

#[test]
fn empty_input_is_inert() {
    let data = normalize(&[]);
    assert_eq!(data.bounds(), (0.0, 0.0));
    assert_eq!(active_index(&data.entries, 0.0), None);
    assert!(ranked_skills(&data, 0.0, None, RankOptions::default()).is_empty());

    let mut timeline = Timeline::new(data, TimelineConfig::default().autoplay(true));
    assert_eq!(timeline.playback(), PlaybackState::Idle);
    timeline.step_next();
    timeline.key(ScrubKey::PageUp, true);
    for frame in 0..10 {
        timeline.frame(frame as f64 * 0.1);
    }
    let view = timeline.view();
    assert_eq!(view.display_year, 0.0);
    assert!(view.skills.is_empty());
    assert_eq!(view.active_index, None);
}

#[test]
fn unusable_records_are_sanitized() {
    let raw = careerline::record::records_from_json(
        r#"[
            {"title": "No dates"},
            {"start": "sometime in 2019", "end": "present", "skills": {"Go": "150"}},
            {"start": 2016, "end": 2014, "tags": "SQL, ,SQL"}
        ]"#,
    )
    .unwrap();
    let data = careerline::normalize::normalize_at(&raw, 2024.0);

    assert_eq!(data.entries[0].start_year, 0.0);
    assert_eq!(data.entries[1].end_year, 2016.0);
    assert_eq!(data.entries[1].technologies.len(), 1);
    assert_eq!(data.entries[2].start_year, 2019.0);
    assert_eq!(data.entries[2].end_year, 2024.0);
    assert_eq!(data.level_at("Go", 2020.0), 100.0);
}
