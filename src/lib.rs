//! ITAM Server
//!
//! IT asset management server: a REST JSON API tracking every asset through
//! its lifecycle (stock, assignment, repair, return, auction). Display status,
//! assignability and allowed transitions all come from [`lifecycle`].

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
