//! UI theme constants (Flabee brand palette)

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const FUCHSIA: Color32 = Color32::from_rgb(255, 60, 105);
pub const BABY_PINK: Color32 = Color32::from_rgb(255, 194, 200);
pub const JASMINE: Color32 = Color32::from_rgb(249, 236, 228);
pub const CONGO: Color32 = Color32::from_rgb(241, 132, 113);
pub const NAVY: Color32 = Color32::from_rgb(52, 52, 91);
pub const WHITE: Color32 = Color32::WHITE;

pub const BG_PRIMARY: Color32 = JASMINE;
pub const BG_SECONDARY: Color32 = WHITE;
pub const TEXT_PRIMARY: Color32 = NAVY;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(110, 110, 140);
pub const ACCENT: Color32 = FUCHSIA;
pub const SUCCESS: Color32 = Color32::from_rgb(34, 150, 90);
pub const ERROR: Color32 = Color32::from_rgb(200, 40, 60);
pub const WARNING: Color32 = CONGO;

pub const USER_BUBBLE: Color32 = WHITE;
pub const ASSISTANT_BUBBLE: Color32 = BABY_PINK;

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(8);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Apply the light brand theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = false;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = WHITE;
    style.visuals.override_text_color = Some(TEXT_PRIMARY);

    style.visuals.widgets.inactive.bg_fill = WHITE;
    style.visuals.widgets.inactive.weak_bg_fill = WHITE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.hovered.bg_fill = BABY_PINK;
    style.visuals.widgets.hovered.weak_bg_fill = BABY_PINK;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, NAVY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.weak_bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, WHITE);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.35);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
