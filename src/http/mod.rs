//! # HTTP Layer
//!
//! Axum routers, handlers, the uniform response envelope and the error
//! taxonomy. One handler per operation; each handler runs a linear
//! validate -> filter -> store -> format sequence and never spawns
//! background work.

pub mod envelope;
pub mod errors;
pub mod health_routes;
pub mod product_routes;
pub mod server;

pub use envelope::{ApiResponse, Meta, PaginationMeta};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;

use std::sync::Arc;
use std::time::Instant;

use crate::store::{MemoryRepository, ProductRepository};

/// State shared by all handlers
pub struct AppState {
    pub repo: Arc<dyn ProductRepository>,
    pub started_at: Instant,
}

impl AppState {
    /// State backed by the in-memory repository
    pub fn new() -> Self {
        Self::with_repo(Arc::new(MemoryRepository::new()))
    }

    /// State over an arbitrary repository (tests inject their own)
    pub fn with_repo(repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            repo,
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
