use eframe::egui::{
    self, pos2, vec2, NumExt as _, Rect, Response, Sense, Stroke, TextStyle, Ui,
    WidgetInfo, WidgetType,
};

use crate::controller::ScrubKey;
use crate::themes::TimelineStyle;

/// What the user did with the scrubber this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrubAction {
    Begin,
    MoveTo(f64),
    End,
    Key(ScrubKey, bool),
}

const KEYS: [(egui::Key, ScrubKey); 6] = [
    (egui::Key::ArrowLeft, ScrubKey::Left),
    (egui::Key::ArrowRight, ScrubKey::Right),
    (egui::Key::PageUp, ScrubKey::PageUp),
    (egui::Key::PageDown, ScrubKey::PageDown),
    (egui::Key::Home, ScrubKey::Home),
    (egui::Key::End, ScrubKey::End),
];

/// A horizontal year range control with entry ticks and a floating year callout.
#[must_use = "You should call `.show(ui)`"]
pub struct Scrubber<'a> {
    year: f64,
    min: f64,
    max: f64,
    marks: &'a [f64],
    desired_width: Option<f32>,
}

impl<'a> Scrubber<'a> {
    pub fn new(year: f64, min: f64, max: f64) -> Self {
        Self {
            year,
            min,
            max,
            marks: &[],
            desired_width: None,
        }
    }

    /// Years to mark with a tick, usually the entry starts.
    pub fn marks(mut self, marks: &'a [f64]) -> Self {
        self.marks = marks;
        self
    }

    pub fn desired_width(mut self, width: f32) -> Self {
        self.desired_width = Some(width);
        self
    }

    pub fn show(self, ui: &mut Ui) -> (Response, Vec<ScrubAction>) {
        let Self {
            year,
            min,
            max,
            marks,
            desired_width,
        } = self;

        let font_id = TextStyle::Small.resolve(ui.style());
        let callout_height = ui.fonts_mut(|fonts| fonts.row_height(&font_id)) + 8.0;
        let rail_height = ui.spacing().interact_size.y;
        let width =
            desired_width.unwrap_or_else(|| ui.available_size_before_wrap().x.at_least(120.0));
        let (outer_rect, response) = ui.allocate_exact_size(
            vec2(width, callout_height + rail_height),
            Sense::click_and_drag(),
        );
        let enabled = ui.is_enabled();
        response.widget_info(move || {
            let mut info = WidgetInfo::labeled(WidgetType::Slider, enabled, "Timeline year");
            info.value = Some(year);
            info
        });

        let rail_rect = Rect::from_min_max(
            pos2(outer_rect.left(), outer_rect.top() + callout_height),
            outer_rect.right_bottom(),
        );
        let knob_radius = (rail_rect.height() * 0.3).at_least(4.0);
        let track = rail_rect.shrink2(vec2(knob_radius + 1.0, 0.0));
        let span = max - min;
        let to_x = |t: f64| {
            let fraction = if span > 0.0 {
                ((t - min) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            track.left() + track.width() * fraction as f32
        };
        let to_year = |x: f32| {
            let fraction = if track.width() > 0.0 {
                ((x - track.left()) / track.width()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            min + span * fraction as f64
        };

        let mut actions = Vec::new();
        if response.clicked() || response.drag_started() {
            response.request_focus();
        }
        if response.drag_started() {
            actions.push(ScrubAction::Begin);
        }
        if response.clicked() || response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                actions.push(ScrubAction::MoveTo(to_year(pointer.x)));
            }
        }
        if response.drag_stopped() {
            actions.push(ScrubAction::End);
        }

        if response.has_focus() {
            ui.memory_mut(|memory| {
                memory.set_focus_lock_filter(
                    response.id,
                    egui::EventFilter {
                        horizontal_arrows: true,
                        vertical_arrows: true,
                        ..Default::default()
                    },
                )
            });
            ui.input(|input| {
                let modifier = input.modifiers.shift;
                for (key, scrub_key) in KEYS {
                    if input.key_pressed(key) {
                        actions.push(ScrubAction::Key(scrub_key, modifier));
                    }
                }
            });
        }

        if !ui.is_rect_visible(outer_rect) {
            return (response, actions);
        }

        let tstyle = TimelineStyle::of(ui);
        let painter = ui.painter();
        let center_y = rail_rect.center().y;
        let line_stroke = Stroke::new(2.0, tstyle.outline);
        painter.line_segment(
            [pos2(track.left(), center_y), pos2(track.right(), center_y)],
            line_stroke,
        );

        let knob_x = to_x(year);
        painter.line_segment(
            [pos2(track.left(), center_y), pos2(knob_x, center_y)],
            Stroke::new(3.0, tstyle.accent),
        );

        for mark in marks {
            let x = to_x(*mark);
            let tick = knob_radius * 0.9;
            painter.line_segment(
                [pos2(x, center_y - tick), pos2(x, center_y + tick)],
                Stroke::new(1.0, tstyle.outline),
            );
        }

        let knob_center = pos2(knob_x, center_y);
        let focused = response.has_focus() || response.dragged();
        painter.circle_filled(knob_center + tstyle.shadow_offset, knob_radius, tstyle.shadow);
        painter.circle(
            knob_center,
            knob_radius,
            tstyle.knob,
            Stroke::new(
                if focused { 2.0 } else { 1.0 },
                tstyle.outline_for(focused || response.hovered()),
            ),
        );

        let galley = painter.layout_no_wrap(
            format!("{year:.1}"),
            font_id,
            tstyle.callout_text,
        );
        let callout_size = galley.size() + vec2(10.0, 4.0);
        let callout_max_x = (outer_rect.right() - callout_size.x).at_least(outer_rect.left());
        let callout_x = (knob_x - callout_size.x / 2.0).clamp(outer_rect.left(), callout_max_x);
        let callout_rect = Rect::from_min_size(pos2(callout_x, outer_rect.top()), callout_size);
        painter.rect_filled(callout_rect, 2.0, tstyle.callout_fill);
        painter.galley(
            callout_rect.center() - galley.size() / 2.0,
            galley,
            tstyle.callout_text,
        );
        let pointer_tip = pos2(knob_x, callout_rect.bottom() + 4.0);
        painter.add(egui::Shape::convex_polygon(
            vec![
                pos2(knob_x - 4.0, callout_rect.bottom()),
                pos2(knob_x + 4.0, callout_rect.bottom()),
                pointer_tip,
            ],
            tstyle.callout_fill,
            Stroke::NONE,
        ));

        (response, actions)
    }
}
