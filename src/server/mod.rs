//! HTTP server layer for the ZPL relay.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │              GET|POST /remote_zpl/print?token=...               │
//! │                                                                 │
//! │  ┌─────────────────────────────┐  ┌───────────────────────────┐ │
//! │  │          handlers           │  │          routes           │ │
//! │  │ (token, payload, delivery)  │  │  (router config, layers)  │ │
//! │  └─────────────────────────────┘  └───────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{health_handler, print_handler, AppState, HealthResponse};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_BODY_BYTES, PRINT_ROUTE};
