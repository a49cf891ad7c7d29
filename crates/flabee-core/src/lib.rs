pub mod ports;
pub mod event_bus;
pub mod cursor;
pub mod pager;
pub mod cache;
pub mod export;
pub mod analytics;
pub mod session;
