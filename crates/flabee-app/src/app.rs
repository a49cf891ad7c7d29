//! Main egui application: composes the panels and runs dashboard actions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use wasm_bindgen::{JsCast, JsValue};

use flabee_core::event_bus::EventBus;
use flabee_core::ports::{BackendPort, StoragePort};
use flabee_core::session::SessionContext;
use flabee_platform::connect_backend;
use flabee_platform::storage::auto_detect_storage;
use flabee_types::analytics::AnalyticsRange;
use flabee_types::config::DashboardConfig;
use flabee_types::event::DashboardEvent;
use flabee_ui::panels::{
    admin_panel, analytics_panel, settings_panel, sidebar_panel, viewer_panel, SaveFeedback,
    SettingsAction,
};
use flabee_ui::state::{Surface, UiAction, UiState};
use flabee_ui::theme;

const CONFIG_STORAGE_KEY: &str = "flabee:config";

/// The main application state
pub struct DashboardApp {
    ui_state: UiState,
    config: DashboardConfig,
    event_bus: EventBus,
    session: Rc<RefCell<SessionContext>>,
    backend: Rc<dyn BackendPort>,
    storage: Rc<dyn StoragePort>,
    /// Filled by the async config restore, consumed on the next frame
    restored: Rc<RefCell<Option<DashboardConfig>>>,
    /// Set by a surface switch once it holds the session
    accepted_surface: Rc<Cell<Option<Surface>>>,
    save_feedback: Option<SaveFeedback>,
    first_frame: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = DashboardConfig::default();
        let event_bus = EventBus::new();
        let ui_state = UiState::new();
        let session = SessionContext::new(&config, ui_state.surface.window_mode(), event_bus.clone());
        let backend = connect_backend(&config.backend);
        let storage = auto_detect_storage();
        let restored = Rc::new(RefCell::new(None));

        Self::restore_config(storage.clone(), restored.clone());

        Self {
            ui_state,
            config,
            event_bus,
            session: Rc::new(RefCell::new(session)),
            backend,
            storage,
            restored,
            accepted_surface: Rc::new(Cell::new(None)),
            save_feedback: None,
            first_frame: true,
        }
    }

    /// Restore config from storage (async)
    fn restore_config(storage: Rc<dyn StoragePort>, slot: Rc<RefCell<Option<DashboardConfig>>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let data = match storage.get(CONFIG_STORAGE_KEY).await {
                Ok(Some(data)) => data,
                Ok(None) => return,
                Err(e) => {
                    log::warn!("Could not read saved settings: {}", e);
                    return;
                }
            };
            match serde_json::from_slice::<DashboardConfig>(&data) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        *slot.borrow_mut() = Some(config);
                        log::info!("Config restored from {}", storage.backend_name());
                    }
                    Err(e) => log::warn!("Ignoring saved settings: {}", e),
                },
                Err(e) => log::warn!("Saved settings are not valid JSON: {}", e),
            }
        });
    }

    /// Save config to storage (async, fire-and-forget)
    fn save_config(storage: Rc<dyn StoragePort>, config: &DashboardConfig) {
        match serde_json::to_vec(config) {
            Ok(json) => wasm_bindgen_futures::spawn_local(async move {
                match storage.set(CONFIG_STORAGE_KEY, &json).await {
                    Ok(()) => log::info!("Config saved to {}", storage.backend_name()),
                    Err(e) => log::error!("Config save failed: {}", e),
                }
            }),
            Err(e) => log::error!("Config serialization failed: {}", e),
        }
    }

    /// Reconnect with the current config and start a fresh session.
    /// A round still running keeps its own handles to the old session.
    fn rebuild_session(&mut self, ctx: &egui::Context) {
        self.backend = connect_backend(&self.config.backend);
        let session = SessionContext::new(
            &self.config,
            self.ui_state.surface.window_mode(),
            self.event_bus.clone(),
        );
        self.session = Rc::new(RefCell::new(session));

        self.ui_state.conversations.clear();
        self.ui_state.selected_conversation = None;
        self.ui_state.messages.clear();
        self.ui_state.messages_for = None;
        self.ui_state.selected_message = None;
        self.ui_state.analytics = None;
        self.ui_state.analytics_range = self.config.analytics.range();

        self.dispatch(self.initial_action(), ctx);
    }

    fn initial_action(&self) -> UiAction {
        match self.ui_state.surface {
            Surface::Analytics => UiAction::LoadAnalytics(self.ui_state.analytics_range),
            Surface::Viewer | Surface::Admin => UiAction::Refresh,
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        match self.config.validate() {
            Ok(()) => {
                Self::save_config(self.storage.clone(), &self.config);
                self.rebuild_session(ctx);
                self.save_feedback = Some(SaveFeedback {
                    message: "Saved.".to_string(),
                    success: true,
                });
            }
            Err(e) => {
                self.save_feedback = Some(SaveFeedback {
                    message: e.to_string(),
                    success: false,
                });
            }
        }
    }

    fn backend_label(&self) -> String {
        if self.config.backend.is_configured() {
            format!("Supabase: {}", self.config.backend.url.trim())
        } else {
            "Demo data".to_string()
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.ui_state.analytics_range = self.config.analytics.range();
            self.first_frame = false;
            self.dispatch(self.initial_action(), ctx);
        }

        let restored = self.restored.borrow_mut().take();
        if let Some(config) = restored {
            if config != self.config {
                self.config = config;
                self.rebuild_session(ctx);
            }
        }

        if self.ui_state.apply_surface(&self.accepted_surface) {
            ctx.request_repaint();
        }

        // Drain events from the session
        let events = self.event_bus.drain_coalesced();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if let Some((file_name, body)) = self.ui_state.take_export() {
            if let Err(e) = download(&file_name, &body) {
                log::error!("Download of {} failed: {:?}", file_name, e);
                self.ui_state.error = Some(format!("Download of {} failed", file_name));
            }
        }

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Flabee")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(self.backend_label())
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                        self.save_feedback = None;
                    }
                });
            });
        });

        // ── Status bar ───────────────────────────────────────
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.ui_state.is_busy() {
                    ui.spinner();
                }
                let color = if self.ui_state.error.is_some() {
                    theme::ERROR
                } else {
                    theme::TEXT_SECONDARY
                };
                ui.label(RichText::new(&self.ui_state.status_text).color(color).small());
                if let Some(notice) = &self.ui_state.notice {
                    ui.separator();
                    ui.label(RichText::new(notice).color(theme::SUCCESS).small());
                }
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    match settings_panel(ui, &mut self.config, self.save_feedback.as_ref()) {
                        SettingsAction::SaveClicked => self.apply_settings(ctx),
                        SettingsAction::Changed => self.save_feedback = None,
                        SettingsAction::None => {}
                    }
                });
        }

        // ── Sidebar ──────────────────────────────────────────
        let mut actions = Vec::new();
        SidePanel::left("sidebar")
            .min_width(300.0)
            .max_width(420.0)
            .show(ctx, |ui| {
                actions.extend(sidebar_panel(ui, &mut self.ui_state));
            });

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            let action = match self.ui_state.surface {
                Surface::Viewer => viewer_panel(ui, &mut self.ui_state),
                Surface::Admin => admin_panel(ui, &mut self.ui_state),
                Surface::Analytics => analytics_panel(ui, &mut self.ui_state),
            };
            actions.extend(action);
        });

        for action in actions {
            self.dispatch(action, ctx);
        }
    }
}

impl DashboardApp {
    /// Run a dashboard action against the session (async)
    fn dispatch(&mut self, action: UiAction, ctx: &egui::Context) {
        let session = self.session.clone();
        let bus = self.event_bus.clone();
        let accepted = self.accepted_surface.clone();
        let backend = self.backend.clone();
        let range = self.ui_state.analytics_range;
        let now = chrono::Utc::now();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let Ok(mut session) = session.try_borrow_mut() else {
                log::warn!("Another dashboard action is running, dropping {:?}", action);
                bus.emit(DashboardEvent::ActionDropped { action: action.describe() });
                ctx.request_repaint();
                return;
            };
            let backend = backend.as_ref();
            let result = match action {
                UiAction::SwitchSurface(surface) => {
                    session.set_mode(surface.window_mode());
                    accepted.set(Some(surface));
                    switch_surface(&mut session, backend, surface, range, now).await
                }
                UiAction::Search(term) => session.search(backend, &term).await,
                UiAction::NextPage => session.next_page(backend).await,
                UiAction::PrevPage => session.prev_page(backend).await,
                UiAction::Refresh => session.refresh_conversations(backend).await,
                UiAction::SelectConversation(id) => session.select_conversation(backend, id).await,
                UiAction::LoadEarlier => session.load_earlier(backend).await,
                UiAction::ReloadMessages => session.reload_messages(backend).await,
                UiAction::UpdateConversation(update) => session.update_conversation(backend, update).await,
                UiAction::EditMessage { message_id, content } => {
                    session.edit_message(backend, message_id, content).await
                }
                UiAction::Export => session.export_selected(backend).await,
                UiAction::LoadAnalytics(range) => session.load_analytics(backend, range, now).await,
            };
            if let Err(e) = result {
                log::debug!("Action finished with error: {}", e);
            }
            ctx.request_repaint();
        });
    }
}

/// Load what the new surface shows first.
async fn switch_surface(
    session: &mut SessionContext,
    backend: &dyn BackendPort,
    surface: Surface,
    range: AnalyticsRange,
    now: chrono::DateTime<chrono::Utc>,
) -> flabee_types::Result<()> {
    match surface {
        Surface::Analytics => session.load_analytics(backend, range, now).await,
        Surface::Viewer | Surface::Admin => {
            if session.pager.items().is_empty() {
                session.refresh_conversations(backend).await?;
            }
            match session.selection.conversation.clone() {
                Some(id) => session.select_conversation(backend, id).await,
                None => Ok(()),
            }
        }
    }
}

/// Hand a JSONL body to the browser as a file download.
fn download(file_name: &str, body: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(body));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/x-ndjson");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| JsValue::from_str("anchor element expected"))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)?;
    log::info!("Downloaded {} ({} bytes)", file_name, body.len());
    Ok(())
}
