use std::hash::Hash;

use eframe::egui::{self, Align2, Response, TextStyle, Ui};

use crate::ranking::SkillWindow;

/// Seconds the expand/collapse transition takes.
const TRANSITION_SECS: f32 = 0.25;

/// Show every row of a list but clip it to the window's top rows, animating
/// the height whenever the window expands or collapses.
///
/// `add_rows` draws all rows and returns their measured heights, which are
/// kept for the next frame so the clip height matches what was rendered.
/// Returns the toggle response when some rows are hidden while collapsed.
pub fn collapsing_list(
    ui: &mut Ui,
    id_salt: impl Hash,
    window: &mut SkillWindow,
    total: usize,
    add_rows: impl FnOnce(&mut Ui) -> Vec<f32>,
) -> Option<Response> {
    let id = ui.make_persistent_id(id_salt);
    let heights: Vec<f32> = ui.data(|data| data.get_temp(id)).unwrap_or_default();

    let fallback_row = ui.spacing().interact_size.y + ui.spacing().item_spacing.y;
    let target = if heights.len() == total {
        window.target_height(&heights)
    } else {
        fallback_row * window.visible(&vec![(); total]).len() as f32
    };
    let height = ui
        .ctx()
        .animate_value_with_time(id.with("height"), target, TRANSITION_SECS);

    let measured = egui::ScrollArea::vertical()
        .id_salt(id.with("clip"))
        .max_height(height)
        .enable_scrolling(false)
        .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
        .show(ui, add_rows)
        .inner;
    ui.data_mut(|data| data.insert_temp(id, measured));

    if !window.can_expand(total) {
        return None;
    }
    let label = if window.expanded {
        "Show fewer".to_owned()
    } else {
        format!("Show {} more", window.hidden_count(total))
    };
    let response = divider(ui, &label);
    if response.clicked() {
        window.toggle();
    }
    Some(response)
}

/// A thin clickable pill spanning the available width.
fn divider(ui: &mut Ui, label: &str) -> Response {
    let height = ui.spacing().interact_size.y * 0.8;
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), height),
        egui::Sense::click(),
    );

    let visuals = ui.style().interact(&response);
    let pill = rect.shrink2(egui::vec2(2.0, 1.0));
    ui.painter()
        .rect_filled(pill, pill.height() / 2.0, visuals.bg_fill);
    ui.painter().text(
        pill.center(),
        Align2::CENTER_CENTER,
        label,
        TextStyle::Small.resolve(ui.style()),
        visuals.text_color(),
    );
    response
}
