use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ranking::RankingError;

use super::SHORTLIST_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Ranking(RankingError::EmptyBatch { .. }) => {
                (StatusCode::BAD_REQUEST, "empty_batch")
            }
            GatewayError::Ranking(RankingError::Embedding(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error")
            }
            GatewayError::Ranking(RankingError::VectorStore(_)) => {
                (StatusCode::BAD_GATEWAY, "vectordb_error")
            }
            GatewayError::Ranking(RankingError::Worker(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "worker_error")
            }
            GatewayError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, shortlist_status) = self.status();

        let mut headers = HeaderMap::new();
        headers.insert(
            SHORTLIST_STATUS_HEADER,
            HeaderValue::from_static(shortlist_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
