use serde::{Deserialize, Serialize};
use crate::analytics::AnalyticsRange;
use crate::{DashboardError, Result};

/// Top-level dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        self.paging.validate()?;
        if self.analytics.cache_ttl_secs < 0 {
            return Err(DashboardError::Config(
                "analytics.cache_ttl_secs must not be negative".to_string(),
            ));
        }
        if AnalyticsRange::from_days(self.analytics.range_days).is_none() {
            return Err(DashboardError::Config(format!(
                "analytics.range_days must be 7, 30 or 90 (got {})",
                self.analytics.range_days
            )));
        }
        Ok(())
    }
}

/// Hosted database connection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. Empty selects the demo backend.
    #[serde(default)]
    pub url: String,
    /// Service key, sent as both `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Base of the REST API, without a trailing slash
    pub fn rest_base(&self) -> String {
        format!("{}/rest/v1", self.url.trim().trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Rows per page of the conversation list
    pub conversation_page_size: u32,
    /// Rows per backward page when loading a whole conversation
    pub message_page_size: u32,
    /// Rows per "Load earlier" step in the chat viewer
    pub viewer_page_size: u32,
    /// Upper bound on backward pages fetched in one load
    pub max_pages: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            conversation_page_size: 30,
            message_page_size: 200,
            viewer_page_size: 50,
            max_pages: 100,
        }
    }
}

impl PagingConfig {
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("conversation_page_size", self.conversation_page_size),
            ("message_page_size", self.message_page_size),
            ("viewer_page_size", self.viewer_page_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(DashboardError::Config(format!("paging.{} must be at least 1", name)));
            }
        }
        if self.max_pages == 0 {
            return Err(DashboardError::Config("paging.max_pages must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub range_days: i64,
    pub cache_ttl_secs: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            range_days: 30,
            cache_ttl_secs: 60,
        }
    }
}

impl AnalyticsConfig {
    pub fn range(&self) -> AnalyticsRange {
        AnalyticsRange::from_days(self.range_days).unwrap_or_default()
    }
}
