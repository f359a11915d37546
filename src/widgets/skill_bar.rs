use eframe::egui::{
    self, pos2, vec2, Align2, Color32, NumExt as _, Rect, Response, Sense, Stroke, TextStyle,
    TextWrapMode, Ui, Widget, WidgetInfo, WidgetText, WidgetType,
};

use crate::ranking::{rating_label, RankedSkill};
use crate::themes::{blend, TimelineStyle};

/// A segmented meter for one skill level in `[0, 100]`.
#[must_use = "You should put this widget in a ui with `ui.add(widget);`"]
pub struct SkillBar {
    value: f32,
    label: Option<WidgetText>,
    label_width: f32,
    building: bool,
    current: bool,
    show_rating: bool,
    desired_width: Option<f32>,
    desired_height: Option<f32>,
    segments: Option<usize>,
}

impl SkillBar {
    pub fn new(value: f64) -> Self {
        Self {
            value: (value.clamp(0.0, 100.0) / 100.0) as f32,
            label: None,
            label_width: 120.0,
            building: false,
            current: false,
            show_rating: true,
            desired_width: None,
            desired_height: None,
            segments: None,
        }
    }

    pub fn from_ranked(skill: &RankedSkill) -> Self {
        Self::new(skill.value)
            .label(skill.name.as_str())
            .building(skill.is_building)
            .current(skill.is_current)
    }

    pub fn label(mut self, label: impl Into<WidgetText>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Width reserved for the label column, so bars in a list line up.
    pub fn label_width(mut self, width: f32) -> Self {
        self.label_width = width.at_least(0.0);
        self
    }

    /// Paint with the "still growing" fill.
    pub fn building(mut self, building: bool) -> Self {
        self.building = building;
        self
    }

    /// Mark the skill as part of the active role.
    pub fn current(mut self, current: bool) -> Self {
        self.current = current;
        self
    }

    pub fn show_rating(mut self, show: bool) -> Self {
        self.show_rating = show;
        self
    }

    pub fn desired_width(mut self, desired_width: f32) -> Self {
        self.desired_width = Some(desired_width);
        self
    }

    pub fn desired_height(mut self, desired_height: f32) -> Self {
        self.desired_height = Some(desired_height);
        self
    }

    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = Some(segments.max(1));
        self
    }
}

/// Segment count and gap that fit `width` at roughly the requested segment size.
fn segment_layout(width: f32, height: f32, forced: Option<usize>) -> (usize, f32) {
    let default_gap = (height * 0.35).clamp(2.0, 12.0);
    let requested_width = (height * 0.65).clamp(4.0, 12.0);

    if let Some(count) = forced {
        if count <= 1 {
            return (1, 0.0);
        }
        let max_gap = (width - count as f32) / (count as f32 - 1.0);
        return (count, default_gap.min(max_gap.max(0.0)));
    }

    let mut count = ((width + default_gap) / (requested_width + default_gap))
        .floor()
        .at_least(1.0) as usize;
    while count > 1 {
        let total_gap = default_gap * (count as f32 - 1.0);
        if width - total_gap >= count as f32 {
            break;
        }
        count -= 1;
    }
    (count, default_gap)
}

impl Widget for SkillBar {
    fn ui(self, ui: &mut Ui) -> Response {
        let Self {
            value,
            label,
            label_width,
            building,
            current,
            show_rating,
            desired_width,
            desired_height,
            segments,
        } = self;

        let label_text = label.as_ref().map(|text| text.text().to_string());
        let desired_width =
            desired_width.unwrap_or_else(|| ui.available_size_before_wrap().x.at_least(96.0));
        let height = desired_height.unwrap_or(ui.spacing().interact_size.y);
        let enabled = ui.is_enabled();
        let (outer_rect, response) =
            ui.allocate_exact_size(vec2(desired_width, height), Sense::hover());

        response.widget_info(move || {
            let mut info = match label_text.as_deref() {
                Some(text) => WidgetInfo::labeled(WidgetType::ProgressIndicator, enabled, text),
                None => WidgetInfo::new(WidgetType::ProgressIndicator),
            };
            info.value = Some((value as f64 * 100.0).round());
            info
        });

        if !ui.is_rect_visible(outer_rect) {
            return response;
        }

        let tstyle = TimelineStyle::of(ui);
        let painter = ui.painter();
        let mut slot_area = outer_rect;

        if let Some(text) = label {
            let galley = text.into_galley(
                ui,
                Some(TextWrapMode::Truncate),
                label_width.min(slot_area.width() * 0.4),
                TextStyle::Body,
            );
            let color = if current {
                tstyle.text
            } else {
                ui.visuals().weak_text_color()
            };
            let text_pos = pos2(slot_area.left(), slot_area.center().y - galley.size().y / 2.0);
            painter.galley(text_pos, galley, color);
            if current {
                let dot = pos2(slot_area.left() + label_width - 8.0, slot_area.center().y);
                painter.circle_filled(dot, 3.0, tstyle.current_marker);
            }
            slot_area.min.x = (slot_area.left() + label_width).min(slot_area.max.x);
        }

        if show_rating {
            let rating_width = 84.0_f32.min(slot_area.width() * 0.3);
            let rating = format!("{} {:>3.0}", rating_label(value as f64 * 100.0), value * 100.0);
            painter.text(
                pos2(slot_area.right(), slot_area.center().y),
                Align2::RIGHT_CENTER,
                rating,
                TextStyle::Small.resolve(ui.style()),
                ui.visuals().weak_text_color(),
            );
            slot_area.max.x = (slot_area.right() - rating_width).at_least(slot_area.min.x);
        }

        let slot_margin = slot_area.height().at_most(28.0) * 0.18;
        let slot_rect = slot_area.shrink2(vec2(0.0, slot_margin));
        let stroke_color = tstyle.outline_for(response.hovered());
        painter.rect_filled(slot_rect, 0.0, tstyle.rail_bg);
        painter.rect_stroke(
            slot_rect,
            0.0,
            Stroke::new(1.0, stroke_color),
            egui::StrokeKind::Inside,
        );

        let meter_rect = slot_rect.shrink(2.0);
        if !meter_rect.is_positive() {
            return response;
        }

        let fill: Color32 = if building {
            tstyle.building
        } else {
            tstyle.established
        };
        let off_color = blend(tstyle.rail_bg, tstyle.outline, tstyle.off_towards_outline);
        let (count, gap) = segment_layout(meter_rect.width(), meter_rect.height(), segments);
        let total_gap = gap * (count as f32 - 1.0);
        let segment_width = ((meter_rect.width() - total_gap) / count as f32).at_least(1.0);

        let filled = (value * count as f32).clamp(0.0, count as f32);
        let full = filled.floor() as usize;
        let partial = filled - full as f32;

        for i in 0..count {
            let x = meter_rect.left() + i as f32 * (segment_width + gap);
            let seg_rect = Rect::from_min_max(
                pos2(x, meter_rect.top()),
                pos2(x + segment_width, meter_rect.bottom()),
            );
            let color = if i < full {
                fill
            } else if i == full && partial > 0.0 {
                blend(off_color, fill, partial)
            } else {
                off_color
            };
            painter.rect_filled(seg_rect, 0.0, color);
        }

        response
    }
}
