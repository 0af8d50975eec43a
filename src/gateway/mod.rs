//! HTTP gateway (Axum) for ranking, indexing and history.
//!
//! This module is primarily used by the `shortlist` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use state::{HandlerState, ModelMode};

use crate::gateway::payload::BannerResponse;
use crate::vectordb::VectorDbClient;

pub const SHORTLIST_STATUS_HEADER: &str = "x-shortlist-status";
pub const SHORTLIST_STATUS_HEALTHY: &str = "healthy";
pub const SHORTLIST_STATUS_READY: &str = "ready";
pub const SHORTLIST_STATUS_NOT_READY: &str = "not_ready";
pub const SHORTLIST_STATUS_ERROR: &str = "error";
pub const SHORTLIST_STATUS_DISABLED: &str = "disabled";
pub const SHORTLIST_STATUS_RANKED: &str = "ranked";
pub const SHORTLIST_STATUS_STORED: &str = "stored";

/// Upper bound on a request body (multipart uploads carry whole files).
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn create_router_with_state<V>(state: HandlerState<V>) -> Router
where
    V: VectorDbClient + 'static,
{
    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<V>))
        .route("/api", get(api_root_handler))
        .route("/api/", get(api_root_handler))
        .route("/api/process", post(handler::process_handler::<V>))
        .route("/api/rank", post(handler::rank_handler::<V>))
        .route("/api/results", get(handler::results_handler::<V>))
        .route("/api/results/all", get(handler::all_results_handler::<V>))
        .route(
            "/api/upload-resume",
            post(handler::upload_resume_handler::<V>),
        )
        .route("/api/rank-indexed", post(handler::rank_indexed_handler::<V>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub store: &'static str,
    pub vectordb: &'static str,
    pub encoder_mode: &'static str,
    pub reranker_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SHORTLIST_STATUS_HEADER,
        HeaderValue::from_static(SHORTLIST_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Ready unless a configured vector store fails its health check. Optional components
/// that are not configured report `disabled`.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<V>(State(state): State<HandlerState<V>>) -> Response
where
    V: VectorDbClient + 'static,
{
    let store_status = if state.store.is_some() {
        SHORTLIST_STATUS_READY
    } else {
        SHORTLIST_STATUS_DISABLED
    };

    let vectordb_status = match state.indexed.as_ref() {
        Some(indexed) => match indexed.client().health_check().await {
            Ok(()) => SHORTLIST_STATUS_READY,
            Err(e) => {
                tracing::warn!(error = %e, "Vector store health check failed");
                SHORTLIST_STATUS_ERROR
            }
        },
        None => SHORTLIST_STATUS_DISABLED,
    };

    let components = ComponentStatus {
        http: SHORTLIST_STATUS_READY,
        store: store_status,
        vectordb: vectordb_status,
        encoder_mode: state.encoder_mode.as_str(),
        reranker_mode: state.reranker_mode.as_str(),
    };

    let is_ready = components.vectordb != SHORTLIST_STATUS_ERROR;

    let (status_code, status_msg, header) = if is_ready {
        (StatusCode::OK, "ok", SHORTLIST_STATUS_READY)
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "pending",
            SHORTLIST_STATUS_NOT_READY,
        )
    };

    let mut headers = HeaderMap::new();
    headers.insert(SHORTLIST_STATUS_HEADER, HeaderValue::from_static(header));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}

pub async fn root_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Resume shortlisting service",
        version: env!("CARGO_PKG_VERSION"),
        api_base: "/api",
    })
}

pub async fn api_root_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Resume shortlisting service API",
        version: env!("CARGO_PKG_VERSION"),
        api_base: "/api",
    })
}
