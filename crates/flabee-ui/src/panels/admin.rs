//! Admin editor: rename, status, tags, and message edits for the
//! selected conversation.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use flabee_types::conversation::{ConversationStatus, ConversationUpdate};
use crate::format::message_label;
use crate::panels::viewer::meta_block;
use crate::state::{UiAction, UiState};
use crate::theme::*;

/// Render the admin editor. Returns an action for the caller to dispatch.
pub fn admin_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let idle = !state.is_busy();

    let Some(conversation) = state.selected_conversation().cloned() else {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Select a conversation to edit.").color(TEXT_SECONDARY));
        });
        return None;
    };

    ui.horizontal(|ui| {
        ui.heading(RichText::new(conversation.heading()).color(TEXT_PRIMARY).strong());
        ui.label(
            RichText::new(format!("{} msgs", conversation.msg_count))
                .color(TEXT_SECONDARY)
                .small(),
        );
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.add_enabled(idle, egui::Button::new("Export JSONL")).clicked() {
                action = Some(UiAction::Export);
            }
            if ui.add_enabled(idle, egui::Button::new("⟳ Reload")).clicked() {
                action = Some(UiAction::ReloadMessages);
            }
        });
    });
    ui.separator();

    // ── Conversation ─────────────────────────────────────
    egui::Grid::new("admin_conversation")
        .num_columns(3)
        .spacing(Vec2::new(8.0, 6.0))
        .show(ui, |ui| {
            ui.label(RichText::new("Title").color(TEXT_SECONDARY));
            ui.text_edit_singleline(&mut state.title_input);
            if ui.add_enabled(idle, egui::Button::new("Save title")).clicked() {
                let title = state.title_input.trim().to_string();
                action = Some(UiAction::UpdateConversation(ConversationUpdate::Rename(title)));
            }
            ui.end_row();

            ui.label(RichText::new("Status").color(TEXT_SECONDARY));
            egui::ComboBox::from_id_salt("admin_status")
                .selected_text(state.status_choice.as_str())
                .show_ui(ui, |ui| {
                    for status in ConversationStatus::all() {
                        ui.selectable_value(&mut state.status_choice, *status, status.as_str());
                    }
                });
            if ui.add_enabled(idle, egui::Button::new("Apply status")).clicked() {
                action = Some(UiAction::UpdateConversation(ConversationUpdate::SetStatus(
                    state.status_choice,
                )));
            }
            ui.end_row();

            ui.label(RichText::new("Tags").color(TEXT_SECONDARY));
            ui.add(egui::TextEdit::singleline(&mut state.tags_input).hint_text("comma, separated"));
            if ui.add_enabled(idle, egui::Button::new("Save tags")).clicked() {
                action = Some(UiAction::UpdateConversation(ConversationUpdate::SetTags(
                    state.parsed_tags(),
                )));
            }
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.separator();

    // ── Messages ─────────────────────────────────────────
    ui.label(RichText::new("Messages").color(ACCENT).strong());
    if state.messages.is_empty() {
        ui.label(RichText::new("No messages in this conversation yet.").color(TEXT_SECONDARY));
        return action;
    }

    let selected_text = state
        .selected_message()
        .map(message_label)
        .unwrap_or_else(|| "Pick a message".to_string());
    let mut picked = None;
    egui::ComboBox::from_id_salt("admin_message")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                for (index, message) in state.messages.iter().enumerate() {
                    let selected = state.selected_message == Some(index);
                    if ui.selectable_label(selected, message_label(message)).clicked() {
                        picked = Some(index);
                    }
                }
            });
        });
    if let Some(index) = picked {
        state.select_message(index);
    }

    if let Some(message) = state.selected_message().cloned() {
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("{} · {}", message.role.as_str(), message.created_at.display()))
                .color(TEXT_SECONDARY)
                .small(),
        );
        meta_block(ui, "Message meta", &message, ui.available_width());
        ui.add(
            egui::TextEdit::multiline(&mut state.message_input)
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        let changed = state.message_input != message.text();
        if ui
            .add_enabled(idle && changed, egui::Button::new("Save message"))
            .clicked()
        {
            action = Some(UiAction::EditMessage {
                message_id: message.id.clone(),
                content: state.message_input.clone(),
            });
        }
    }

    action
}
