//! The portfolio page: cards in a centered column, content loaded in the
//! background, and site-wide events flowing over an [`EventBus`].

use dark_light::Mode;
use eframe::egui;

use crate::bus::EventBus;
use crate::cards::{show_card, Card, CardContext, TimelineCard};
use crate::config::TimelineConfig;
use crate::dataflow::{ContentSource, Fetch};
use crate::record::{records_from_json, RawEntry};
use crate::state::{StateId, StateStore};
use crate::themes::{portfolio_dark, portfolio_light};
use crate::timeline::Timeline;
use crate::widgets::Button;

/// Records shipped with the binary, used when no other content loads.
pub const SAMPLE_RECORDS: &str = include_str!("../demos/sample.json");

const CONTENT_WIDTH: f32 = 740.0;

/// Events any card may raise for the page to handle.
#[derive(Clone, Debug, PartialEq)]
pub enum SiteEvent {
    /// Open the contact form, optionally prefilled with a topic.
    OpenContact { topic: Option<String> },
    /// A timeline settled on an entry.
    EntrySelected { timeline: egui::Id, index: usize },
}

pub fn sample_records() -> Vec<RawEntry> {
    records_from_json(SAMPLE_RECORDS).unwrap_or_else(|err| {
        log::error!("bundled sample records are invalid: {err}");
        Vec::new()
    })
}

#[derive(Debug, Default)]
struct ContactForm {
    open: bool,
    topic: String,
    message: String,
}

impl ContactForm {
    fn open_with(&mut self, topic: Option<String>) {
        self.open = true;
        if let Some(topic) = topic {
            self.topic = topic;
        }
    }

    fn show(&mut self, ctx: &egui::Context) {
        let mut open = self.open;
        let mut sent = false;
        egui::Window::new("Get in touch")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Topic");
                ui.text_edit_singleline(&mut self.topic);
                ui.label("Message");
                ui.text_edit_multiline(&mut self.message);
                let ready = !self.message.trim().is_empty();
                if ui.add(Button::new("Send").enabled(ready)).clicked() {
                    sent = true;
                }
            });
        if sent {
            log::info!("contact request about {:?} ({} chars)", self.topic, self.message.len());
            self.message.clear();
            open = false;
        }
        self.open = open;
    }
}

pub struct PortfolioApp {
    store: StateStore,
    site: EventBus<SiteEvent>,
    config: TimelineConfig,
    content: Fetch<Vec<RawEntry>>,
    heading: String,
    cards: Vec<Box<dyn Card>>,
    timelines: Vec<StateId<Timeline>>,
    link_timelines: bool,
    contact: ContactForm,
}

impl PortfolioApp {
    pub fn new(source: impl ContentSource, config: TimelineConfig) -> Self {
        Self::with_fetch(Fetch::from_source(source), config)
    }

    pub fn with_fetch(content: Fetch<Vec<RawEntry>>, config: TimelineConfig) -> Self {
        Self {
            store: StateStore::new(),
            site: EventBus::new(),
            config,
            content,
            heading: "Experience".to_owned(),
            cards: Vec::new(),
            timelines: Vec::new(),
            link_timelines: false,
            contact: ContactForm::default(),
        }
    }

    /// Heading of the card created once the fetched content arrives.
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Keep every timeline on the page on the same entry.
    pub fn link_timelines(mut self, link: bool) -> Self {
        self.link_timelines = link;
        self
    }

    pub fn push_card(&mut self, card: Box<dyn Card>) {
        self.cards.push(card);
    }

    /// Add a timeline card for `records` and return its state handle.
    pub fn add_timeline(
        &mut self,
        heading: impl Into<String>,
        records: &[RawEntry],
        config: TimelineConfig,
    ) -> StateId<Timeline> {
        let timeline = Timeline::from_raw(records, config);
        let state = self.store.insert(timeline);
        let site = self.site.clone();
        let id = state.id();
        if let Some(timeline) = state.read(&self.store) {
            timeline.on_settled_index(move |index| {
                site.publish(SiteEvent::EntrySelected { timeline: id, index });
            });
        }
        self.timelines.push(state);
        self.cards.push(Box::new(TimelineCard::new(heading, state)));
        state
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn site(&self) -> &EventBus<SiteEvent> {
        &self.site
    }

    pub fn timelines(&self) -> &[StateId<Timeline>] {
        &self.timelines
    }

    pub fn is_loading(&self) -> bool {
        self.content.is_pending()
    }

    pub fn contact_topic(&self) -> Option<&str> {
        self.contact.open.then_some(self.contact.topic.as_str())
    }

    fn poll_content(&mut self) {
        if !self.content.poll() {
            return;
        }
        let records = match &self.content {
            Fetch::Ready(records) => records.clone(),
            Fetch::Failed(err) => {
                log::error!("failed to load timeline content: {err}; showing sample records");
                sample_records()
            }
            Fetch::Pending(_) => return,
        };
        let heading = self.heading.clone();
        let config = self.config.clone();
        self.add_timeline(heading, &records, config);
    }

    fn handle_site_events(&mut self) {
        for event in self.site.drain() {
            match event {
                SiteEvent::OpenContact { topic } => {
                    log::debug!("opening contact form for {topic:?}");
                    self.contact.open_with(topic);
                }
                SiteEvent::EntrySelected { timeline, index } => {
                    if !self.link_timelines {
                        continue;
                    }
                    for other in self.timelines.iter().filter(|other| other.id() != timeline) {
                        if let Some(mut other) = other.try_write(&self.store) {
                            other.select_index(index);
                        }
                    }
                }
            }
        }
    }

    /// Draw one frame of the page.
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.poll_content();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.set_max_width(CONTENT_WIDTH);
                        for (index, card) in self.cards.iter_mut().enumerate() {
                            ui.push_id(index, |ui| {
                                let mut card_ctx = CardContext::new(ui, &self.store, &self.site);
                                show_card(card.as_mut(), &mut card_ctx);
                                ui.separator();
                            });
                        }
                        if self.content.is_pending() {
                            ui.spinner();
                        }
                    });
                });
        });

        self.handle_site_events();
        self.contact.show(ctx);

        if self.content.is_pending() || self.cards.iter().any(|card| card.is_updating()) {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    pub fn run(self, name: &str) -> eframe::Result {
        let native_options = eframe::NativeOptions {
            persist_window: true,
            ..Default::default()
        };

        eframe::run_native(
            name,
            native_options,
            Box::new(|cc| {
                let ctx = cc.egui_ctx.clone();
                if let Err(err) =
                    ctrlc::set_handler(move || ctx.send_viewport_cmd(egui::ViewportCommand::Close))
                {
                    log::error!("failed to set exit signal handler: {err}");
                }

                cc.egui_ctx.set_style_of(egui::Theme::Light, portfolio_light());
                cc.egui_ctx.set_style_of(egui::Theme::Dark, portfolio_dark());
                let theme = match dark_light::detect() {
                    Ok(Mode::Light) => egui::ThemePreference::Light,
                    Ok(Mode::Dark) => egui::ThemePreference::Dark,
                    Ok(Mode::Unspecified) | Err(_) => egui::ThemePreference::Dark,
                };
                cc.egui_ctx.set_theme(theme);

                Ok(Box::new(self))
            }),
        )
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}
