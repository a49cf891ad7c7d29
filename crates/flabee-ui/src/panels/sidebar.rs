//! Sidebar: surface switcher, search, paged conversation list, viewer filters.

use egui::{self, RichText, ScrollArea};
use flabee_core::pager::{channel_options, ALL_CHANNELS};
use crate::format::{admin_label, viewer_label};
use crate::state::{Surface, UiAction, UiState};
use crate::theme::*;

/// Render the sidebar. Returns an action when the user asked for a backend round.
pub fn sidebar_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let idle = !state.is_busy();

    ui.horizontal(|ui| {
        for surface in Surface::all() {
            let selected = state.surface == *surface;
            if ui
                .selectable_label(selected, RichText::new(surface.label()).color(TEXT_PRIMARY))
                .clicked()
                && !selected
                && idle
            {
                action = Some(UiAction::SwitchSurface(*surface));
            }
        }
    });
    ui.separator();

    if state.surface == Surface::Analytics {
        ui.label(RichText::new("Pick a range on the right.").color(TEXT_SECONDARY).small());
        return action;
    }

    // ── Search ───────────────────────────────────────────
    ui.label(RichText::new("Search").color(TEXT_SECONDARY).small());
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.search_input)
                .hint_text("user label or last message")
                .desired_width(ui.available_width() - 70.0),
        );
        let submit = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.add_enabled(idle, egui::Button::new("Search")).clicked() || submit) && idle {
            action = Some(UiAction::Search(state.search_input.clone()));
        }
    });

    if state.surface == Surface::Viewer {
        ui.add_space(4.0);
        filter_controls(ui, state);
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(idle && state.page > 1, egui::Button::new("◀ Prev"))
            .clicked()
        {
            action = Some(UiAction::PrevPage);
        }
        ui.label(RichText::new(format!("Page {}", state.page)).color(TEXT_PRIMARY));
        if ui
            .add_enabled(idle && !state.conversations.is_empty(), egui::Button::new("Next ▶"))
            .clicked()
        {
            action = Some(UiAction::NextPage);
        }
        if ui.add_enabled(idle, egui::Button::new("⟳")).clicked() {
            action = Some(UiAction::Refresh);
        }
    });
    ui.separator();

    // ── Conversation list ────────────────────────────────
    let rows: Vec<(usize, String)> = match state.surface {
        Surface::Viewer => state
            .visible_conversations()
            .into_iter()
            .map(|(i, c)| (i, viewer_label(c)))
            .collect(),
        _ => state
            .conversations
            .iter()
            .enumerate()
            .map(|(i, c)| (i, admin_label(c)))
            .collect(),
    };

    if rows.is_empty() {
        let text = if state.page > 1 { "No more results." } else { "No conversations found." };
        ui.label(RichText::new(text).color(TEXT_SECONDARY).italics());
    }

    ScrollArea::vertical()
        .id_salt("conversation_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, label) in rows {
                let selected = state.selected_conversation == Some(index);
                if ui.selectable_label(selected, label).clicked() && idle {
                    if let Some(id) = state.select_conversation(index) {
                        action = Some(UiAction::SelectConversation(id));
                    }
                }
            }
        });

    action
}

fn filter_controls(ui: &mut egui::Ui, state: &mut UiState) {
    let mut channels = vec![ALL_CHANNELS.to_string()];
    channels.extend(channel_options(&state.conversations));

    ui.horizontal(|ui| {
        ui.label(RichText::new("Channel").color(TEXT_SECONDARY).small());
        egui::ComboBox::from_id_salt("viewer_channel")
            .selected_text(state.channel_choice.clone())
            .show_ui(ui, |ui| {
                for channel in &channels {
                    ui.selectable_value(&mut state.channel_choice, channel.clone(), channel.as_str());
                }
            });
    });
    ui.horizontal(|ui| {
        ui.label(RichText::new("From").color(TEXT_SECONDARY).small());
        ui.add(
            egui::TextEdit::singleline(&mut state.from_input)
                .hint_text("YYYY-MM-DD")
                .desired_width(90.0),
        );
        ui.label(RichText::new("To").color(TEXT_SECONDARY).small());
        ui.add(
            egui::TextEdit::singleline(&mut state.to_input)
                .hint_text("YYYY-MM-DD")
                .desired_width(90.0),
        );
    });
}
