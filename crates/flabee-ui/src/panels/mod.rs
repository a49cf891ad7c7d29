pub mod admin;
pub mod analytics;
pub mod settings;
pub mod sidebar;
pub mod viewer;

pub use admin::admin_panel;
pub use analytics::analytics_panel;
pub use settings::{settings_panel, SaveFeedback, SettingsAction};
pub use sidebar::sidebar_panel;
pub use viewer::viewer_panel;
