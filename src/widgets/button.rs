use eframe::egui::{
    self, NumExt as _, Response, Sense, TextStyle, Ui, Vec2, Widget, WidgetInfo, WidgetText,
    WidgetType,
};

use crate::themes::{blend, Lift, TimelineStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonSize {
    #[default]
    Regular,
    /// Inline actions under a card, like "Ask about …".
    Small,
}

impl ButtonSize {
    fn padding(self, ui: &Ui) -> Vec2 {
        match self {
            Self::Regular => ui.spacing().button_padding,
            Self::Small => ui.spacing().button_padding * 0.7,
        }
    }

    fn text_style(self) -> TextStyle {
        match self {
            Self::Regular => TextStyle::Button,
            Self::Small => TextStyle::Small,
        }
    }

    fn min_height(self, ui: &Ui) -> f32 {
        match self {
            Self::Regular => ui.spacing().interact_size.y,
            Self::Small => (ui.spacing().interact_size.y - 6.0).at_least(0.0),
        }
    }
}

/// Card action button. It rests on a hard shadow and sinks into it while held.
#[must_use = "You should put this widget in a ui with `ui.add(widget);`"]
pub struct Button {
    text: WidgetText,
    size: ButtonSize,
    selected: bool,
    enabled: bool,
    fill: Option<egui::Color32>,
}

impl Button {
    pub fn new(text: impl Into<WidgetText>) -> Self {
        Self {
            text: text.into(),
            size: ButtonSize::Regular,
            selected: false,
            enabled: true,
            fill: None,
        }
    }

    pub fn small(self) -> Self {
        self.size(ButtonSize::Small)
    }

    pub fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    /// Keep the accent outline on, e.g. for the entry currently shown.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// A disabled button loses its shadow and ignores clicks.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn fill(mut self, fill: egui::Color32) -> Self {
        self.fill = Some(fill);
        self
    }
}

impl Widget for Button {
    fn ui(self, ui: &mut Ui) -> Response {
        let enabled = self.enabled && ui.is_enabled();
        let tstyle = TimelineStyle::of(ui);
        let padding = self.size.padding(ui);

        let label = self.text.text().to_string();
        let wrap_width =
            (ui.available_width() - padding.x * 2.0 - tstyle.shadow_inset().x).at_least(0.0);
        let galley = self.text.into_galley(
            ui,
            Some(egui::TextWrapMode::Truncate),
            wrap_width,
            self.size.text_style(),
        );

        let mut body = galley.size() + padding * 2.0;
        body.y = body.y.at_least(self.size.min_height(ui));
        let sense = if enabled { Sense::click() } else { Sense::hover() };
        let (footprint, response) = ui.allocate_exact_size(body + tstyle.shadow_inset(), sense);
        response.widget_info(move || WidgetInfo::labeled(WidgetType::Button, enabled, &label));

        if !ui.is_rect_visible(footprint) {
            return response;
        }

        let held = enabled && response.is_pointer_button_down_on();
        let lift = match (enabled, held) {
            (false, _) => Lift::Flat,
            (true, true) => Lift::Pressed,
            (true, false) => Lift::Raised,
        };
        let engaged = enabled
            && (self.selected || held || response.hovered() || response.has_focus());

        let fill = self.fill.unwrap_or(tstyle.knob);
        let fill = if enabled {
            fill
        } else {
            blend(fill, ui.visuals().window_fill, 0.65)
        };
        let text_color = if enabled {
            tstyle.text
        } else {
            blend(tstyle.text, fill, 0.55)
        };

        let painter = ui.painter();
        let body = tstyle.paint_block(painter, footprint, fill, tstyle.outline_for(engaged), lift);
        painter.galley(body.center() - galley.size() / 2.0, galley, text_color);

        response
    }
}
