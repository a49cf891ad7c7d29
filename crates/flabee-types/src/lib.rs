pub mod id;
pub mod timestamp;
pub mod conversation;
pub mod message;
pub mod analytics;
pub mod event;
pub mod config;
pub mod error;
pub mod nullable;
mod de;

#[cfg(test)]
mod tests;

pub use error::DashboardError;
pub type Result<T> = std::result::Result<T, DashboardError>;
