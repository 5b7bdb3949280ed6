// ComboStats - ui/theme.rs
//
// Colour scheme, visuals and font scaling, and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Apply dark/light visuals and scale every text style to `font_size`.
///
/// `font_size` is the body text size; the other styles keep their default
/// proportions to it.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let defaults = egui::Style::default().text_styles;
    let base = defaults
        .get(&egui::TextStyle::Body)
        .map_or(font_size, |f| f.size);
    let scale = font_size / base;
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            if let Some(default) = defaults.get(text_style) {
                font_id.size = default.size * scale;
            }
        }
    });
}

/// Colour for a win-rate percentage: green at or above even, red below.
pub fn win_rate_colour(rate: f64, dark_mode: bool) -> Color32 {
    match (rate >= 50.0, dark_mode) {
        (true, true) => Color32::from_rgb(74, 222, 128),  // Green 400
        (true, false) => Color32::from_rgb(21, 128, 61),  // Green 700
        (false, true) => Color32::from_rgb(248, 113, 113), // Red 400
        (false, false) => Color32::from_rgb(185, 28, 28), // Red 800
    }
}

/// Fill for chart bars.
pub const BAR_FILL: Color32 = Color32::from_rgb(59, 130, 246); // Blue 500

/// Error banner colours.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400
pub const WARNING_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const CHART_HEIGHT: f32 = 240.0;
pub const CELL_SPACING: [f32; 2] = [14.0, 4.0];

/// Placeholder shown for missing cells.
pub const MISSING_CELL: &str = "--";
