//! In-process fake OCR server.

#![allow(dead_code)]

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use kimlik_ocr_lib::models::capture::{CardSide, ImagePayload};
use kimlik_ocr_lib::models::config::{ApiConfig, UploadConfig};
use kimlik_ocr_lib::services::images::CameraImages;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One multipart part as the server received it
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Every request body the fake server received, one entry per request
pub type Received = Arc<Mutex<Vec<Vec<ReceivedPart>>>>;

async fn record(mut multipart: Multipart, received: &Received) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    received.lock().unwrap().push(parts);
}

/// Bind on a free port and serve `router`, returning the base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Server answering every `/ocr` request with `status` and `body`
pub async fn fake_ocr(status: StatusCode, body: Value) -> (String, Received) {
    fake_ocr_with_delay(status, body, Duration::ZERO).await
}

pub async fn fake_ocr_with_delay(
    status: StatusCode,
    body: Value,
    delay: Duration,
) -> (String, Received) {
    let received: Received = Arc::default();
    let seen = Arc::clone(&received);

    let router = Router::new()
        .route(
            "/ocr",
            post(move |multipart: Multipart| {
                let body = body.clone();
                let seen = Arc::clone(&seen);
                async move {
                    record(multipart, &seen).await;
                    tokio::time::sleep(delay).await;
                    (status, Json(body))
                }
            }),
        )
        .route("/health", get(|| async { Json(serde_json::json!({ "status": "ok" })) }));

    (serve(router).await, received)
}

/// Server answering `/ocr` with a plain-text body
pub async fn fake_ocr_text(status: StatusCode, text: &'static str) -> String {
    let router = Router::new().route(
        "/ocr",
        post(move || async move { (status, text).into_response() }),
    );
    serve(router).await
}

/// A base URL nothing listens on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn api(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    }
}

/// Fast progress so tests do not wait on the settle delay
pub fn fast_upload() -> UploadConfig {
    UploadConfig {
        tick_ms: 20,
        start: 10,
        step: 10,
        cap: 90,
        settle_ms: 0,
    }
}

pub fn photos() -> CameraImages {
    CameraImages {
        front: Some(ImagePayload::png(b"front-bytes".to_vec(), CardSide::Front)),
        back: Some(ImagePayload::png(b"back-bytes".to_vec(), CardSide::Back)),
    }
}
