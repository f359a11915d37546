use egui::style::{Selection, WidgetVisuals, Widgets};
use egui::{Color32, FontFamily, FontId, Rect, Stroke, Style, TextStyle, Vec2, Visuals};

/// Base tokens shared by the light and dark styles.
pub mod palette {
    use egui::Color32;

    pub const INK: Color32 = Color32::from_rgb(0x1e, 0x21, 0x26);
    pub const PAPER: Color32 = Color32::from_rgb(0xf4, 0xf1, 0xea);
    pub const GRAPHITE: Color32 = Color32::from_rgb(0x2b, 0x2e, 0x34);
    pub const FOG: Color32 = Color32::from_rgb(0xd9, 0xd5, 0xcc);
    pub const SIGNAL: Color32 = Color32::from_rgb(0xe8, 0x5d, 0x1f);
    pub const SPRING: Color32 = Color32::from_rgb(0x4f, 0xa3, 0x5b);
    pub const STEEL: Color32 = Color32::from_rgb(0x3e, 0x6f, 0xa8);
    pub const LINK: Color32 = Color32::from_rgb(0x1f, 0x4e, 0x8c);
}

/// Semantic colors and metrics for the timeline widgets, derived from the
/// active `egui::Style`.
#[derive(Clone, Debug)]
pub struct TimelineStyle {
    pub rail_bg: Color32,
    pub outline: Color32,
    pub accent: Color32,
    pub knob: Color32,
    pub shadow: Color32,
    pub shadow_offset: Vec2,
    pub text: Color32,
    /// Fill of skills that are still growing.
    pub building: Color32,
    /// Fill of settled skills.
    pub established: Color32,
    pub current_marker: Color32,
    pub callout_fill: Color32,
    pub callout_text: Color32,
    /// How far unlit meter segments lean towards the outline color.
    pub off_towards_outline: f32,
}

pub fn timeline_style(dark_mode: bool) -> TimelineStyle {
    let (foreground, background) = if dark_mode {
        (palette::PAPER, palette::GRAPHITE)
    } else {
        (palette::INK, palette::PAPER)
    };
    let outline = blend(foreground, background, 0.4);

    TimelineStyle {
        rail_bg: if dark_mode { palette::INK } else { palette::FOG },
        outline,
        accent: palette::SIGNAL,
        knob: background,
        shadow: palette::INK,
        shadow_offset: egui::vec2(2.0, 2.0),
        text: foreground,
        building: palette::SPRING,
        established: palette::STEEL,
        current_marker: palette::SIGNAL,
        callout_fill: foreground,
        callout_text: background,
        off_towards_outline: 0.18,
    }
}

impl From<&Style> for TimelineStyle {
    fn from(style: &Style) -> Self {
        timeline_style(style.visuals.dark_mode)
    }
}

/// How a block stands on its hard shadow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lift {
    /// Offset from its shadow, ready to be pressed.
    Raised,
    /// Sunk onto its shadow.
    Pressed,
    /// No shadow at all, for inert controls.
    Flat,
}

impl TimelineStyle {
    pub fn of(ui: &egui::Ui) -> Self {
        Self::from(ui.style().as_ref())
    }

    /// Extra room a block needs so its shadow stays inside the allocation.
    pub fn shadow_inset(&self) -> Vec2 {
        self.shadow_offset.max(Vec2::ZERO)
    }

    /// Accent while a control is hovered, focused or held.
    pub fn outline_for(&self, engaged: bool) -> Color32 {
        if engaged {
            self.accent
        } else {
            self.outline
        }
    }

    /// Where the block body goes inside `footprint` for a given lift.
    pub fn block_rect(&self, footprint: Rect, lift: Lift) -> Rect {
        let body = Rect::from_min_max(footprint.min, footprint.max - self.shadow_inset())
            .intersect(footprint);
        match lift {
            Lift::Pressed => body.translate(self.shadow_offset),
            Lift::Raised | Lift::Flat => body,
        }
    }

    /// Paint a filled, outlined block with its shadow and return the body rect.
    pub fn paint_block(
        &self,
        painter: &egui::Painter,
        footprint: Rect,
        fill: Color32,
        outline: Color32,
        lift: Lift,
    ) -> Rect {
        const ROUNDING: f32 = 2.0;
        let body = self.block_rect(footprint, lift);
        if lift == Lift::Raised {
            painter.rect_filled(body.translate(self.shadow_offset), ROUNDING, self.shadow);
        }
        painter.rect_filled(body, ROUNDING, fill);
        painter.rect_stroke(
            body,
            ROUNDING,
            Stroke::new(1.0, outline),
            egui::StrokeKind::Inside,
        );
        body
    }
}

// Color utilities: simple sRGB linear interpolation for quick palette derivation
pub fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let r = (a.r() as f32 * (1.0 - t) + b.r() as f32 * t).round() as u8;
    let g = (a.g() as f32 * (1.0 - t) + b.g() as f32 * t).round() as u8;
    let bch = (a.b() as f32 * (1.0 - t) + b.b() as f32 * t).round() as u8;
    Color32::from_rgb(r, g, bch)
}

/// Flat, square-cornered visuals built from a handful of base colors.
pub fn portfolio_visuals(
    foreground: Color32,
    background: Color32,
    accent: Color32,
    mut base_visuals: Visuals,
) -> Visuals {
    let surface_muted = blend(background, foreground, 0.06);
    let border = blend(foreground, background, 0.4);
    let weak_text = blend(foreground, background, 0.45);
    let control_radius = 2.0;

    let control_fill = background;
    let control_fill_hover = blend(background, foreground, 0.05);
    let control_fill_active = blend(control_fill_hover, palette::INK, 0.12);

    base_visuals.window_fill = background;
    base_visuals.panel_fill = background;
    base_visuals.override_text_color = None;
    base_visuals.weak_text_color = Some(weak_text);
    base_visuals.faint_bg_color = surface_muted;
    base_visuals.extreme_bg_color = control_fill_hover;
    base_visuals.selection = Selection {
        bg_fill: blend(background, accent, 0.25),
        stroke: Stroke::new(1.5, accent),
    };
    base_visuals.hyperlink_color = palette::LINK;
    base_visuals.window_stroke = Stroke::new(1.0, border);
    base_visuals.menu_corner_radius = 0.0.into();

    let border_stroke = Stroke::new(1.0, border);
    let hover_stroke = Stroke::new(1.4, border);
    let active_stroke = Stroke::new(1.4, accent);
    let visuals = |fill: Color32, bg_stroke: Stroke, radius: f32| WidgetVisuals {
        bg_fill: fill,
        weak_bg_fill: fill,
        bg_stroke,
        fg_stroke: Stroke::new(1.0, foreground),
        corner_radius: radius.into(),
        expansion: 0.0,
    };

    base_visuals.widgets = Widgets {
        noninteractive: visuals(background, border_stroke, 0.0),
        inactive: visuals(control_fill, border_stroke, control_radius),
        hovered: visuals(control_fill_hover, hover_stroke, control_radius),
        active: visuals(control_fill_active, active_stroke, control_radius),
        open: visuals(control_fill_hover, active_stroke, control_radius),
    };

    base_visuals.window_shadow = egui::epaint::Shadow::NONE;
    base_visuals.popup_shadow = egui::epaint::Shadow {
        offset: [4, 4],
        blur: 0,
        spread: 0,
        color: palette::INK,
    };

    base_visuals
}

fn portfolio_style(visuals: Visuals) -> Style {
    let mut style = Style {
        text_styles: portfolio_text_styles().into_iter().collect(),
        ..Default::default()
    };
    style.spacing.item_spacing = egui::vec2(12.0, 10.0);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.interact_size = egui::vec2(34.0, 26.0);
    style.animation_time = 0.12;
    style.visuals = visuals;
    style
}

pub fn portfolio_light() -> Style {
    portfolio_style(portfolio_visuals(
        palette::INK,
        palette::PAPER,
        palette::SIGNAL,
        Visuals::light(),
    ))
}

pub fn portfolio_dark() -> Style {
    portfolio_style(portfolio_visuals(
        palette::PAPER,
        palette::GRAPHITE,
        palette::SIGNAL,
        Visuals::dark(),
    ))
}

pub fn portfolio_text_styles() -> Vec<(TextStyle, FontId)> {
    vec![
        (TextStyle::Heading, FontId::new(28.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
    ]
}
