//! Chat viewer: one conversation as chat bubbles, newest page first,
//! older pages on request.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use flabee_types::message::Message;
use crate::format::{bubble_on_left, meta_text, role_label};
use crate::state::{UiAction, UiState};
use crate::theme::*;

/// Render the chat viewer. Returns an action for the caller to dispatch.
pub fn viewer_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let idle = !state.is_busy();

    let Some(conversation) = state.selected_conversation().cloned() else {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Select a conversation.").color(TEXT_SECONDARY));
        });
        return None;
    };

    ui.horizontal(|ui| {
        ui.heading(RichText::new(conversation.heading()).color(TEXT_PRIMARY).strong());
        ui.label(
            RichText::new(format!("{} · {}", conversation.channel(), conversation.status.as_str()))
                .color(TEXT_SECONDARY)
                .small(),
        );
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.add_enabled(idle, egui::Button::new("Export JSONL")).clicked() {
                action = Some(UiAction::Export);
            }
        });
    });
    ui.separator();

    ui.horizontal(|ui| {
        let can_load = idle && !state.exhausted;
        if ui
            .add_enabled(can_load, egui::Button::new("⬆ Load earlier"))
            .clicked()
        {
            action = Some(UiAction::LoadEarlier);
        }
        let shown = format!("{} of {} messages", state.messages.len(), conversation.msg_count);
        ui.label(RichText::new(shown).color(TEXT_SECONDARY).small());
    });

    ScrollArea::vertical()
        .id_salt("viewer_messages")
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.messages.is_empty() {
                ui.label(RichText::new("No messages in this conversation yet.").color(TEXT_SECONDARY));
            }
            for message in &state.messages {
                render_bubble(ui, message);
                ui.add_space(4.0);
            }
        });

    action
}

fn render_bubble(ui: &mut egui::Ui, message: &Message) {
    let left = bubble_on_left(&message.role);
    let (layout, fill) = if left {
        (Layout::top_down(Align::Min), USER_BUBBLE)
    } else {
        (Layout::top_down(Align::Max), ASSISTANT_BUBBLE)
    };
    let max_width = (ui.available_width() * 0.75).max(200.0);

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(fill)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.label(
                    RichText::new(format!("{} · {}", role_label(&message.role), message.created_at.display()))
                        .color(if left { NAVY } else { FUCHSIA })
                        .strong()
                        .small(),
                );
                ui.add(egui::Label::new(RichText::new(message.text()).color(TEXT_PRIMARY)).wrap());
                meta_block(ui, "meta", message, max_width);
            });
    });
}

/// Collapsed `meta` JSON of a message; draws nothing when there is none.
pub fn meta_block(ui: &mut egui::Ui, title: &str, message: &Message, width: f32) {
    let Some(pretty) = meta_text(message) else {
        return;
    };
    egui::CollapsingHeader::new(RichText::new(title).small())
        .id_salt((title, message.id.to_string()))
        .show(ui, |ui| {
            ui.add_sized(
                Vec2::new(width, 0.0),
                egui::Label::new(RichText::new(pretty).monospace().small()),
            );
        });
}
