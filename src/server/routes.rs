//! Router configuration for the ZPL relay.
//!
//! # Route Structure
//!
//! ```text
//! /health               - Health check (public)
//! /remote_zpl/print     - Print webhook, GET or POST (token in request)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use zpl_relay::directory::FileDirectory;
//! use zpl_relay::server::routes::{create_router, RouterConfig};
//!
//! let directory = FileDirectory::new("/etc/zpl-relay/printers.json");
//! let router = create_router(directory, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, print_handler, AppState};
use crate::directory::PrinterDirectory;

/// Path of the print webhook.
pub const PRINT_ROUTE: &str = "/remote_zpl/print";

/// Default cap on request bodies (8 MiB); large enough for embedded graphics.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with default settings.
    ///
    /// By default:
    /// - Request bodies are capped at 8 MiB
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            enable_tracing: true,
        }
    }

    /// Set the request body cap.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// The webhook route carries no CSRF or session checks: callers are other
/// systems, authenticated only by the per-printer token.
pub fn create_router<D>(directory: D, config: RouterConfig) -> Router
where
    D: PrinterDirectory + 'static,
{
    let app_state = AppState::new(directory);

    let router = Router::new()
        .route(
            PRINT_ROUTE,
            get(print_handler::<D>).post(print_handler::<D>),
        )
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
