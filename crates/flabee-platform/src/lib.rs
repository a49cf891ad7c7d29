//! Browser platform adapters.
//!
//! Implements the `flabee-core` port traits: the Supabase REST backend,
//! a demo backend held in memory, and settings storage.

pub mod memory;
pub mod storage;
pub mod supabase;

#[cfg(test)]
mod tests;

use std::rc::Rc;
use flabee_core::ports::BackendPort;
use flabee_types::config::BackendConfig;

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

/// Supabase when a project URL is configured, demo data otherwise.
pub fn connect_backend(config: &BackendConfig) -> Rc<dyn BackendPort> {
    if config.is_configured() {
        if config.api_key.trim().is_empty() {
            log::warn!("Backend URL set without an API key; requests will be rejected");
        }
        log::info!("Backend: Supabase at {}", config.rest_base());
        Rc::new(SupabaseBackend::new(config))
    } else {
        log::warn!("No backend URL configured, serving demo data");
        Rc::new(MemoryBackend::demo(chrono::Utc::now()))
    }
}
