//! Book Server
//!
//! An in-memory book catalog served over a JSON HTTP API, with search
//! results streamed to the client as they are found.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
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

impl AppState {
    /// Build the repository and services described by `config`
    pub fn new(config: AppConfig) -> Self {
        let repository = repository::Repository::new(&config.catalog);
        Self {
            services: Arc::new(services::Services::new(repository)),
            config: Arc::new(config),
        }
    }
}
