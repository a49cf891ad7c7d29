//! egui panels for the Flabee dashboards.
//!
//! Panels read [`state::UiState`] and return a [`state::UiAction`] when the
//! user asks for a backend round; the app layer dispatches it.

pub mod format;
pub mod panels;
pub mod state;
pub mod theme;
