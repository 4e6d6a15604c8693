//! Catalogo Server Library
//!
//! Catalog ordering API:
//! - Catalog CRUD and transactional CSV product import
//! - Page-scoped product listing and ranked search
//! - Persisted orders with full-replace cart sync and incremental edits

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod routes;
pub mod services;

pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
