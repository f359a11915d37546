use std::hash::Hash;

use eframe::egui::{self, Response, RichText, Ui};

use crate::controller::PlaybackState;
use crate::timeline::Timeline;
use crate::widgets::{collapsing_list, Button, ScrubAction, Scrubber, SkillBar};

const YEAR_FONT_SIZE: f32 = 36.0;

/// The interactive timeline: year readout, scrubber, playback controls,
/// entry shortcuts and the ranked skill bars.
///
/// Drives the timeline's frame clock from egui's input time, so it must be
/// shown once per frame for every timeline on screen.
#[must_use = "You should call `.show(ui)`"]
pub struct SkillTimelineView<'a> {
    timeline: &'a mut Timeline,
    id: egui::Id,
    entry_buttons: bool,
}

impl<'a> SkillTimelineView<'a> {
    pub fn new(timeline: &'a mut Timeline, id_salt: impl Hash) -> Self {
        Self {
            timeline,
            id: egui::Id::new(id_salt),
            entry_buttons: true,
        }
    }

    /// Show one button per entry that jumps to its start.
    pub fn entry_buttons(mut self, show: bool) -> Self {
        self.entry_buttons = show;
        self
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let Self {
            timeline,
            id,
            entry_buttons,
        } = self;
        let _span = tracing::info_span!("paint_timeline", entries = timeline.data().len()).entered();

        let now = ui.input(|input| input.time);
        timeline.frame(now);
        let view = timeline.view();

        let response = ui
            .push_id(id, |ui| {
                if timeline.data().is_empty() {
                    ui.weak("No experience to show yet.");
                    return;
                }

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("{:.1}", view.display_year))
                            .monospace()
                            .size(YEAR_FONT_SIZE),
                    );
                    ui.vertical(|ui| {
                        if let Some(title) = view.active_title.as_deref() {
                            ui.strong(title);
                        }
                        if let Some(company) = view.active_company.as_deref() {
                            ui.weak(company);
                        }
                    });
                });

                let marks: Vec<f64> = timeline
                    .data()
                    .entries
                    .iter()
                    .map(|entry| entry.start_year)
                    .collect();
                let (_, actions) = Scrubber::new(view.display_year, view.min_year, view.max_year)
                    .marks(&marks)
                    .show(ui);
                for action in actions {
                    match action {
                        ScrubAction::Begin => timeline.begin_scrub(),
                        ScrubAction::MoveTo(t) => timeline.scrub_to(t),
                        ScrubAction::End => timeline.end_scrub(),
                        ScrubAction::Key(key, modifier) => timeline.key(key, modifier),
                    }
                }

                ui.horizontal(|ui| {
                    let at_start = view.target_year <= view.min_year;
                    let at_end = view.target_year >= view.max_year;
                    if ui.add(Button::new("< Prev").small().enabled(!at_start)).clicked() {
                        timeline.step_prev();
                    }
                    let playing = view.playback == PlaybackState::Autoplaying;
                    let play = Button::new(if playing { "Pause" } else { "Play" })
                        .small()
                        .selected(playing)
                        .enabled(playing || !at_end);
                    if ui.add(play).clicked() {
                        timeline.toggle_play();
                    }
                    if ui.add(Button::new("Next >").small().enabled(!at_end)).clicked() {
                        timeline.step_next();
                    }
                    if ui.add(Button::new("Reset").small().enabled(!at_start)).clicked() {
                        timeline.reset();
                    }
                });

                if entry_buttons {
                    let mut jump = None;
                    ui.horizontal_wrapped(|ui| {
                        for (index, entry) in timeline.data().entries.iter().enumerate() {
                            let label = if entry.title.is_empty() {
                                format!("{:.0}", entry.start_year)
                            } else {
                                entry.title.clone()
                            };
                            let button = Button::new(label)
                                .small()
                                .selected(view.active_index == Some(index));
                            if ui.add(button).clicked() {
                                jump = Some(index);
                            }
                        }
                    });
                    if let Some(index) = jump {
                        timeline.jump_to_entry(index);
                    }
                }

                let mut window = view.window;
                collapsing_list(ui, "skills", &mut window, view.skills.len(), |ui| {
                    view.skills
                        .iter()
                        .map(|skill| {
                            let top = ui.cursor().top();
                            ui.add(SkillBar::from_ranked(skill));
                            ui.cursor().top() - top
                        })
                        .collect()
                });
                if window.expanded != view.window.expanded {
                    timeline.toggle_expanded();
                }
            })
            .response;

        if timeline.is_animating() {
            ui.ctx().request_repaint();
        }
        response
    }
}
