//! HTTP front door for HubSpot webhook deliveries.
//!
//! # Routes
//!
//! - `GET|POST /test` - run the webhook pipeline on the request body
//! - `GET|POST /api/test` - same, under the Functions-style `/api` prefix
//! - `GET /health` - liveness probe, touches no dependency

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::FutureExt;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::relay::Relay;

pub fn router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/test", get(webhook).post(webhook))
        .route("/api/test", get(webhook).post(webhook))
        .with_state(relay)
}

pub async fn run(relay: Arc<Relay>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr, "Webhook relay listening");

    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

async fn health() -> &'static str {
    "OK"
}

async fn webhook(State(relay): State<Arc<Relay>>, body: Bytes) -> Response {
    info!(bytes = body.len(), "Webhook request received");

    // A panic anywhere in the pipeline still gets a response.
    let outcome = AssertUnwindSafe(relay.handle_body(&body))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(created)) => {
            info!(work_items = created.len(), "Webhook processed");
            (StatusCode::OK, "OK").into_response()
        }
        Ok(Err(err)) => {
            let status = err.status();
            if status.is_client_error() {
                warn!(%status, error = %err, "Webhook rejected");
            } else {
                error!(%status, error = %err, "Webhook processing failed");
            }
            (status, err.response_body()).into_response()
        }
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            error!(panic = %detail, "Webhook processing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown error".to_string()
    }
}
