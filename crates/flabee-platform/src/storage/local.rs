//! Browser localStorage backend.
//! Persistent across page reloads. Values are stored as UTF-8 text,
//! which is all the dashboards keep (JSON settings).

use async_trait::async_trait;
use flabee_core::ports::StoragePort;
use flabee_types::{DashboardError, Result};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open `window.localStorage`. Fails outside a browser or when the
    /// browser blocks storage (private mode, disabled cookies).
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| DashboardError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| DashboardError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| DashboardError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .storage
            .get_item(key)
            .map_err(|e| DashboardError::Storage(format!("{:?}", e)))?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| DashboardError::Storage(format!("{} is not UTF-8: {}", key, e)))?;
        self.storage
            .set_item(key, text)
            .map_err(|e| DashboardError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| DashboardError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}
