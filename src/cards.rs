use eframe::egui;

use crate::app::SiteEvent;
use crate::bus::EventBus;
use crate::state::{StateId, StateStore};
use crate::timeline::Timeline;
use crate::widgets::{Button, SkillTimelineView};

/// What a card sees while drawing.
pub struct CardContext<'a> {
    pub ui: &'a mut egui::Ui,
    pub store: &'a StateStore,
    pub site: &'a EventBus<SiteEvent>,
}

impl<'a> CardContext<'a> {
    pub fn new(ui: &'a mut egui::Ui, store: &'a StateStore, site: &'a EventBus<SiteEvent>) -> Self {
        Self { ui, store, site }
    }
}

pub trait Card {
    fn draw(&mut self, ctx: &mut CardContext);

    fn is_updating(&self) -> bool {
        false
    }
}

/// Draw `card` inside the shared card frame.
pub fn show_card(card: &mut dyn Card, ctx: &mut CardContext) -> egui::Response {
    let (store, site) = (ctx.store, ctx.site);
    let ui = &mut *ctx.ui;
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::NONE)
        .corner_radius(0.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            card.draw(&mut CardContext::new(ui, store, site));
        })
        .response
}

/// A heading and a paragraph, optionally with a contact button.
pub struct TextCard {
    heading: String,
    body: String,
    contact_topic: Option<String>,
}

impl TextCard {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
            contact_topic: None,
        }
    }

    /// Offer a "Get in touch" button that opens the contact form on `topic`.
    pub fn contact(mut self, topic: impl Into<String>) -> Self {
        self.contact_topic = Some(topic.into());
        self
    }
}

impl Card for TextCard {
    fn draw(&mut self, ctx: &mut CardContext) {
        ctx.ui.heading(&self.heading);
        ctx.ui.label(&self.body);
        if let Some(topic) = &self.contact_topic {
            if ctx.ui.add(Button::new("Get in touch")).clicked() {
                ctx.site.publish(SiteEvent::OpenContact {
                    topic: Some(topic.clone()),
                });
            }
        }
    }
}

/// An interactive skill timeline whose state lives in the store.
pub struct TimelineCard {
    heading: String,
    timeline: StateId<Timeline>,
}

impl TimelineCard {
    pub fn new(heading: impl Into<String>, timeline: StateId<Timeline>) -> Self {
        Self {
            heading: heading.into(),
            timeline,
        }
    }

    pub fn timeline(&self) -> StateId<Timeline> {
        self.timeline
    }
}

impl Card for TimelineCard {
    fn draw(&mut self, ctx: &mut CardContext) {
        ctx.ui.heading(&self.heading);
        let Some(mut timeline) = self.timeline.write(ctx.store) else {
            ctx.ui.weak("This timeline is no longer available.");
            return;
        };

        let _ = SkillTimelineView::new(&mut *timeline, self.timeline.id()).show(ctx.ui);

        let role = timeline.view().active_title.filter(|title| !title.is_empty());
        if let Some(role) = role {
            if ctx
                .ui
                .add(Button::new(format!("Ask about {role}")).small())
                .clicked()
            {
                ctx.site.publish(SiteEvent::OpenContact { topic: Some(role) });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::normalize::{Normalized, TimelineEntry};

    fn draw(card: &mut dyn Card, store: &StateStore, site: &EventBus<SiteEvent>, time: f64) {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            time: Some(time),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                show_card(&mut *card, &mut CardContext::new(ui, store, site));
            });
        });
    }

    #[test]
    fn timeline_cards_drive_their_stored_timeline() {
        let store = StateStore::new();
        let site = EventBus::new();
        let data = Normalized::from_entries(vec![
            TimelineEntry::new(2016.0, 2019.0, "Engineer").skill("Rust", 40.0),
            TimelineEntry::new(2019.0, 2023.0, "Lead").skill("Rust", 90.0),
        ]);
        let state = store.insert(Timeline::new(data, TimelineConfig::default()));
        state.write(&store).unwrap().jump_to_entry(0);

        let mut card = TimelineCard::new("Experience", state);
        for frame in 0..120 {
            draw(&mut card, &store, &site, frame as f64 / 60.0);
        }
        assert_eq!(state.read(&store).unwrap().display_year(), 2016.0);
        assert!(site.is_empty());
    }

    #[test]
    fn removed_timelines_render_a_notice() {
        let store = StateStore::new();
        let site = EventBus::new();
        let state = store.insert(Timeline::new(Normalized::default(), TimelineConfig::default()));
        assert!(store.remove(state.id()));

        let mut card = TimelineCard::new("Gone", state);
        draw(&mut card, &store, &site, 0.0);
        assert!(card.timeline().read(&store).is_none());
    }

    #[test]
    fn text_cards_draw_without_events() {
        let store = StateStore::new();
        let site = EventBus::new();
        let mut card = TextCard::new("About", "Hello there.").contact("Hiring");
        draw(&mut card, &store, &site, 0.0);
        assert!(site.is_empty());
    }
}
