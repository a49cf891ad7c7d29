//! Analytics: range selector, headline figures, and the daily tables.

use egui::{self, RichText, ScrollArea, Vec2};
use flabee_types::analytics::{AnalyticsRange, AnalyticsSummary};
use crate::format::percent;
use crate::state::{AnalyticsView, UiAction, UiState};
use crate::theme::*;

/// Render the analytics surface. Returns an action for the caller to dispatch.
pub fn analytics_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let idle = !state.is_busy();

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Analytics").color(TEXT_PRIMARY).strong());
        ui.add_space(12.0);
        for range in AnalyticsRange::all() {
            let selected = state.analytics_range == *range;
            if ui.selectable_label(selected, range.label()).clicked() && idle {
                state.analytics_range = *range;
                action = Some(UiAction::LoadAnalytics(*range));
            }
        }
        if ui.add_enabled(idle, egui::Button::new("⟳")).clicked() {
            action = Some(UiAction::LoadAnalytics(state.analytics_range));
        }
    });
    ui.separator();

    let Some(view) = &state.analytics else {
        ui.label(RichText::new("No data loaded yet.").color(TEXT_SECONDARY));
        return action;
    };

    kpi_row(ui, &view.summary);
    ui.add_space(8.0);

    ScrollArea::vertical()
        .id_salt("analytics_tables")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            channel_table(ui, &view.summary);
            ui.add_space(8.0);
            daily_table(ui, view);
        });

    action
}

fn kpi_row(ui: &mut egui::Ui, summary: &AnalyticsSummary) {
    ui.horizontal_wrapped(|ui| {
        kpi(ui, "Messages", summary.total_messages.to_string());
        kpi(ui, "Active conversations", summary.active_conversations.to_string());
        kpi(ui, "Avg msgs / conversation", format!("{:.2}", summary.avg_messages_per_conversation));
        kpi(ui, "Resolution rate", percent(summary.resolution_rate));
    });
}

fn kpi(ui: &mut egui::Ui, title: &str, value: String) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.set_min_size(Vec2::new(150.0, 48.0));
            ui.vertical(|ui| {
                ui.label(RichText::new(title).color(TEXT_SECONDARY).small());
                ui.label(RichText::new(value).color(ACCENT).size(22.0).strong());
            });
        });
}

fn channel_table(ui: &mut egui::Ui, summary: &AnalyticsSummary) {
    ui.label(RichText::new("Messages by channel").color(ACCENT).strong());
    if summary.channel_totals.is_empty() {
        ui.label(RichText::new("No channel data in this range.").color(TEXT_SECONDARY));
        return;
    }
    egui::Grid::new("channel_totals")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui| {
            for (channel, count) in &summary.channel_totals {
                ui.label(channel);
                ui.label(count.to_string());
                ui.end_row();
            }
        });
}

fn daily_table(ui: &mut egui::Ui, view: &AnalyticsView) {
    ui.label(
        RichText::new(format!("Daily activity ({})", view.range.label()))
            .color(ACCENT)
            .strong(),
    );
    egui::Grid::new("daily_counts")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui| {
            for header in ["Day", "Total", "User", "Assistant", "Active convs"] {
                ui.label(RichText::new(header).color(TEXT_SECONDARY).small());
            }
            ui.end_row();
            for row in &view.data.daily {
                let active = view
                    .data
                    .active
                    .iter()
                    .find(|a| a.day == row.day)
                    .map(|a| a.active_conversations.to_string())
                    .unwrap_or_default();
                ui.label(&row.day);
                ui.label(row.total.to_string());
                ui.label(row.user_msgs.to_string());
                ui.label(row.assistant_msgs.to_string());
                ui.label(active);
                ui.end_row();
            }
        });
}
