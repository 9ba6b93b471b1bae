//! HTTP request handlers for the ZPL relay webhook.
//!
//! # Endpoints
//!
//! - `GET|POST /remote_zpl/print` - Relay a ZPL document to the caller's printer
//! - `GET /health` - Health check endpoint
//!
//! Every webhook response is plain text with one of a fixed set of bodies.
//! Neither the token nor the payload is ever echoed back.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::directory::PrinterDirectory;
use crate::error::{RelayError, WebhookError};
use crate::payload::{decode_body, PrintBody, PrintParams};
use crate::relay;

// =============================================================================
// Response Bodies
// =============================================================================

pub const BODY_OK: &str = "OK";
pub const BODY_MISSING_TOKEN: &str = "Missing token";
pub const BODY_INVALID_TOKEN: &str = "Invalid token";
pub const BODY_MISSING_ZPL: &str = "Missing ZPL data";
pub const BODY_DELIVERY_FAILED: &str = "Error sending to printer";
pub const BODY_DIRECTORY_UNAVAILABLE: &str = "Printer directory unavailable";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the printer directory.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<D: PrinterDirectory> {
    /// Token to printer resolution, consulted on every request
    pub directory: Arc<D>,
}

impl<D: PrinterDirectory> AppState<D> {
    pub fn new(directory: D) -> Self {
        Self::from_arc(Arc::new(directory))
    }

    pub fn from_arc(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

impl<D: PrinterDirectory> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert WebhookError to a fixed plain-text response.
///
/// Causes carried by the error are deliberately dropped here; handlers log
/// them with request context before returning.
impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            WebhookError::MissingToken => (StatusCode::BAD_REQUEST, BODY_MISSING_TOKEN),
            // 404 rather than 401/403 so a wrong token looks like a missing route
            WebhookError::InvalidToken => (StatusCode::NOT_FOUND, BODY_INVALID_TOKEN),
            WebhookError::MissingPayload => (StatusCode::BAD_REQUEST, BODY_MISSING_ZPL),
            WebhookError::DeliveryFailed(_) | WebhookError::DeliveryAborted(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, BODY_DELIVERY_FAILED)
            }
            WebhookError::DirectoryUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, BODY_DIRECTORY_UNAVAILABLE)
            }
        };

        debug!(status = status.as_u16(), "Webhook rejected: {}", self);

        plain_text(status, body)
    }
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle print webhook requests.
///
/// # Endpoint
///
/// `GET /remote_zpl/print?token=...&zpl=...`
/// `POST /remote_zpl/print?token=...` with the ZPL document as the body
///
/// # Parameters
///
/// - `token`: printer security token (query string, or form body on POST)
/// - `zpl`: ZPL document; the only source on GET, overrides the body on POST
///
/// A POST with `Content-Type: application/x-www-form-urlencoded` or
/// `multipart/form-data` is read as form parameters. Any other POST body is
/// the ZPL document itself, decoded as UTF-8 with a Latin-1 fallback.
///
/// Query-string tokens end up in proxy access logs; prefer POST with a form
/// body where callers allow it.
///
/// # Response
///
/// | Status | Body                       |
/// |--------|----------------------------|
/// | 200    | `OK`                       |
/// | 400    | `Missing token`            |
/// | 404    | `Invalid token`            |
/// | 400    | `Missing ZPL data`         |
/// | 500    | `Error sending to printer` |
pub async fn print_handler<D: PrinterDirectory + 'static>(
    State(state): State<AppState<D>>,
    RawQuery(query): RawQuery,
    body: PrintBody,
) -> Result<Response, WebhookError> {
    let query_params = query
        .as_deref()
        .map(|q| PrintParams::parse(q.as_bytes()))
        .unwrap_or_default();

    let (params, raw_body) = match body {
        PrintBody::Fields(fields) => (query_params.or(fields), None),
        PrintBody::Raw(bytes) => (query_params, Some(bytes)),
        PrintBody::Empty => (query_params, None),
    };

    // 1) Token
    let Some(token) = params.token else {
        warn!("Print request without token");
        return Err(WebhookError::MissingToken);
    };

    // 2) Printer
    let printer = match state.directory.lookup_by_token(&token).await {
        Ok(Some(printer)) => printer,
        Ok(None) => {
            warn!(token = %token, "Print request with invalid token");
            return Err(WebhookError::InvalidToken);
        }
        Err(e) => {
            error!(token = %token, error = %e, "Printer directory lookup failed");
            return Err(WebhookError::DirectoryUnavailable(e));
        }
    };

    // 3) ZPL
    let zpl = params
        .zpl
        .or_else(|| raw_body.map(|bytes| decode_body(&bytes)))
        .unwrap_or_default();

    if zpl.is_empty() {
        warn!(token = %token, printer = %printer.name, "Print request without ZPL data");
        return Err(WebhookError::MissingPayload);
    }

    // 4) Deliver. The send runs as its own task so a client hanging up
    // does not cut a label off half-way through.
    let printer_name = printer.name.clone();
    let delivery = tokio::spawn(async move { relay::send_zpl(&printer, &zpl).await });

    match delivery.await {
        Ok(Ok(())) => {
            info!(printer = %printer_name, "Print request completed");
            Ok(plain_text(StatusCode::OK, BODY_OK))
        }
        Ok(Err(RelayError::EmptyPayload)) => Err(WebhookError::MissingPayload),
        Ok(Err(e)) => {
            error!(
                token = %token,
                printer = %printer_name,
                error = %e,
                "Error printing ZPL"
            );
            Err(WebhookError::DeliveryFailed(e))
        }
        Err(e) => {
            error!(
                token = %token,
                printer = %printer_name,
                error = %e,
                "Print task aborted"
            );
            Err(WebhookError::DeliveryAborted(e.to_string()))
        }
    }
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
