//! Event bus between the session and the UI.
//!
//! Single-threaded (WASM constraint), interior mutability via RefCell.
//! The session publishes view-model updates; the UI drains them each frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use flabee_types::event::DashboardEvent;
use flabee_types::id::RecordId;

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<DashboardEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: DashboardEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Drain all pending events. Called by the UI layer each frame.
    pub fn drain(&self) -> Vec<DashboardEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Drain pending events, dropping list pages and message windows that a
    /// later event of the same batch replaces. Everything else keeps its order.
    pub fn drain_coalesced(&self) -> Vec<DashboardEvent> {
        let events = self.drain();
        let mut keep = vec![true; events.len()];
        let mut list_seen = false;
        let mut windows_seen: Vec<&RecordId> = Vec::new();

        for (i, event) in events.iter().enumerate().rev() {
            match event {
                DashboardEvent::ConversationsLoaded { .. } => {
                    keep[i] = !list_seen;
                    list_seen = true;
                }
                DashboardEvent::MessagesLoaded { conversation_id, .. } => {
                    if windows_seen.contains(&conversation_id) {
                        keep[i] = false;
                    } else {
                        windows_seen.push(conversation_id);
                    }
                }
                _ => {}
            }
        }

        events
            .into_iter()
            .zip(keep)
            .filter_map(|(event, kept)| kept.then_some(event))
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
