//! Settings panel: backend connection, paging limits, analytics defaults.
//! Changes apply when the user clicks Save.

use egui::{self, RichText, Vec2};
use flabee_types::analytics::AnalyticsRange;
use flabee_types::config::DashboardConfig;
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    Changed,
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Debug, Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut DashboardConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Backend Section ──────────────────────────────
            ui.label(RichText::new("Backend").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Project URL").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(
                    egui::TextEdit::singleline(&mut config.backend.url)
                        .hint_text("https://<project>.supabase.co"),
                )
                .changed();

            ui.add_space(4.0);

            ui.label(RichText::new("Service key").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::TextEdit::singleline(&mut config.backend.api_key).password(true))
                .changed();

            if !config.backend.is_configured() {
                ui.label(
                    RichText::new("No URL set: the dashboards show demo data.")
                        .color(TEXT_SECONDARY)
                        .small()
                        .italics(),
                );
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Paging Section ───────────────────────────────
            ui.label(RichText::new("Paging").color(ACCENT).strong());
            egui::Grid::new("paging_settings").num_columns(2).show(ui, |ui| {
                ui.label(RichText::new("Conversations per page").color(TEXT_SECONDARY).small());
                changed |= ui
                    .add(egui::DragValue::new(&mut config.paging.conversation_page_size).range(1..=500))
                    .changed();
                ui.end_row();

                ui.label(RichText::new("Messages per request").color(TEXT_SECONDARY).small());
                changed |= ui
                    .add(egui::DragValue::new(&mut config.paging.message_page_size).range(1..=1000))
                    .changed();
                ui.end_row();

                ui.label(RichText::new("Viewer page size").color(TEXT_SECONDARY).small());
                changed |= ui
                    .add(egui::DragValue::new(&mut config.paging.viewer_page_size).range(1..=500))
                    .changed();
                ui.end_row();

                ui.label(RichText::new("Max pages per load").color(TEXT_SECONDARY).small());
                changed |= ui
                    .add(egui::DragValue::new(&mut config.paging.max_pages).range(1..=10_000))
                    .changed();
                ui.end_row();
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Analytics Section ────────────────────────────
            ui.label(RichText::new("Analytics").color(ACCENT).strong());
            let current = config.analytics.range();
            egui::ComboBox::from_id_salt("default_range")
                .selected_text(current.label())
                .show_ui(ui, |ui| {
                    for range in AnalyticsRange::all() {
                        if ui.selectable_label(current == *range, range.label()).clicked() {
                            config.analytics.range_days = range.days();
                            changed = true;
                        }
                    }
                });
            ui.horizontal(|ui| {
                ui.label(RichText::new("Cache seconds").color(TEXT_SECONDARY).small());
                changed |= ui
                    .add(egui::DragValue::new(&mut config.analytics.cache_ttl_secs).range(0..=3600))
                    .changed();
            });

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(WHITE).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}
