//! Webhook integration tests.
//!
//! Tests verify:
//! - Missing and invalid tokens map to 400/404 with fixed bodies
//! - Payload selection for GET and POST
//! - Urlencoded and multipart form bodies are parameters, never raw ZPL
//! - Delivery failures map to 500 without leaking detail

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use tower::ServiceExt;

use zpl_relay::{create_router, MemoryDirectory, PrinterConfig, RouterConfig};

use super::test_utils::{
    body_text, directory_for, get, oversized_label, post, post_form, post_multipart, print_uri,
    refusing_port, router_for, FakePrinter, StalledPrinter, INACTIVE_TOKEN, VALID_TOKEN,
};

const HELLO_LABEL: &str = "^XA^FO50,50^FDHello^FS^XZ";

// =============================================================================
// Token Handling
// =============================================================================

#[tokio::test]
async fn test_missing_token_get() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router
        .oneshot(get("/remote_zpl/print?zpl=%5EXA%5EXZ"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing token");
}

#[tokio::test]
async fn test_missing_token_post() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router
        .oneshot(post("/remote_zpl/print", HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing token");
}

#[tokio::test]
async fn test_empty_token_is_missing() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router
        .oneshot(post("/remote_zpl/print?token=", HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing token");
}

#[tokio::test]
async fn test_unknown_token() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post(&print_uri("not-a-real-token"), HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Invalid token");
    printer.assert_idle().await;
}

#[tokio::test]
async fn test_inactive_token_looks_unknown() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post(&print_uri(INACTIVE_TOKEN), HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Invalid token");
    printer.assert_idle().await;
}

#[tokio::test]
async fn test_token_match_is_case_sensitive() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router
        .oneshot(post(&print_uri(&VALID_TOKEN.to_uppercase()), HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Payload Selection
// =============================================================================

#[tokio::test]
async fn test_post_body_relayed_verbatim() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post(&print_uri(VALID_TOKEN), HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_text(response).await, "OK");
    assert_eq!(printer.received().await, HELLO_LABEL.as_bytes());
}

#[tokio::test]
async fn test_zpl_param_overrides_post_body() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let uri = format!("{}&zpl=BBB", print_uri(VALID_TOKEN));
    let response = router.oneshot(post(&uri, "AAA")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(printer.received().await, b"BBB");
}

#[tokio::test]
async fn test_empty_zpl_param_does_not_override_body() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let uri = format!("{}&zpl=", print_uri(VALID_TOKEN));
    let response = router.oneshot(post(&uri, "AAA")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(printer.received().await, b"AAA");
}

#[tokio::test]
async fn test_post_latin1_body_is_decoded() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post(&print_uri(VALID_TOKEN), b"^FDPe\xF1a^FS".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(printer.received().await, "^FDPeña^FS".as_bytes());
}

#[tokio::test]
async fn test_get_uses_zpl_query_param() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let uri = format!(
        "{}&zpl={}",
        print_uri(VALID_TOKEN),
        urlencoding::encode(HELLO_LABEL)
    );
    let response = router.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
    assert_eq!(printer.received().await, HELLO_LABEL.as_bytes());
}

#[tokio::test]
async fn test_get_without_zpl_is_missing_data() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router.oneshot(get(&print_uri(VALID_TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing ZPL data");
    printer.assert_idle().await;
}

#[tokio::test]
async fn test_post_without_body_is_missing_data() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post(&print_uri(VALID_TOKEN), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing ZPL data");
    printer.assert_idle().await;
}

#[tokio::test]
async fn test_missing_token_checked_before_payload() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router.oneshot(get("/remote_zpl/print")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing token");
}

#[tokio::test]
async fn test_invalid_token_checked_before_payload() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router.oneshot(get(&print_uri("nope"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Invalid token");
}

// =============================================================================
// Form Bodies
// =============================================================================

#[tokio::test]
async fn test_form_body_supplies_token_and_zpl() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let form = format!(
        "token={}&zpl={}",
        urlencoding::encode(VALID_TOKEN),
        urlencoding::encode(HELLO_LABEL)
    );
    let response = router
        .oneshot(post_form("/remote_zpl/print", &form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(printer.received().await, HELLO_LABEL.as_bytes());
}

#[tokio::test]
async fn test_form_body_without_zpl_is_not_sent_raw() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let form = format!("token={}", urlencoding::encode(VALID_TOKEN));
    let response = router
        .oneshot(post_form("/remote_zpl/print", &form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing ZPL data");
    printer.assert_idle().await;
}

#[tokio::test]
async fn test_multipart_body_supplies_token_and_zpl() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post_multipart(
            "/remote_zpl/print",
            &[("token", VALID_TOKEN), ("zpl", "^XA^XZ")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
    assert_eq!(printer.received().await, b"^XA^XZ");
}

#[tokio::test]
async fn test_multipart_body_without_zpl_is_not_sent_raw() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post_multipart(
            "/remote_zpl/print",
            &[("token", VALID_TOKEN), ("label", "^XA^XZ")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing ZPL data");
    printer.assert_idle().await;
}

#[tokio::test]
async fn test_query_token_with_multipart_zpl() {
    let printer = FakePrinter::start().await;
    let router = router_for(directory_for(printer.port));

    let response = router
        .oneshot(post_multipart(
            &print_uri(VALID_TOKEN),
            &[("zpl", HELLO_LABEL)],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(printer.received().await, HELLO_LABEL.as_bytes());
}

// =============================================================================
// Delivery Failures
// =============================================================================

#[tokio::test]
async fn test_stalled_printer_maps_to_500() {
    let printer = StalledPrinter::start().await;
    let directory = MemoryDirectory::with_printers([PrinterConfig::new(
        "Jammed",
        "127.0.0.1",
        VALID_TOKEN,
    )
    .with_port(printer.port)
    .with_timeout_seconds(1)])
    .unwrap();
    let router = create_router(
        directory,
        RouterConfig::new()
            .with_tracing(false)
            .with_max_body_bytes(64 * 1024 * 1024),
    );

    let start = Instant::now();
    let response = router
        .oneshot(post(&print_uri(VALID_TOKEN), oversized_label()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Error sending to printer");
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_connection_refused_maps_to_500() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router
        .oneshot(post(&print_uri(VALID_TOKEN), HELLO_LABEL))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert_eq!(body, "Error sending to printer");
    assert!(!body.contains("127.0.0.1"));
}

#[tokio::test]
async fn test_responses_never_echo_secrets() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router
        .oneshot(post(&print_uri(VALID_TOKEN), HELLO_LABEL))
        .await
        .unwrap();

    let body = body_text(response).await;
    assert!(!body.contains(VALID_TOKEN));
    assert!(!body.contains(HELLO_LABEL));
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let router = router_for(directory_for(refusing_port().await));

    let request = axum::http::Request::builder()
        .method("PUT")
        .uri(print_uri(VALID_TOKEN))
        .body(axum::body::Body::from(HELLO_LABEL))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = router_for(directory_for(refusing_port().await));

    let response = router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "healthy");
}
