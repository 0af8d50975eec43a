use axum::{
    Json,
    extract::{Multipart, Query as QueryParams, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument, warn};

use crate::candidate::{Query, RawCandidate};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    AllResultsResponse, RankIndexedRequest, RankRequest, RankResponse, RankingResultView,
    ResultsQuery, StoreUnavailableResponse, UploadRequest, UploadResponse,
};
use crate::gateway::state::HandlerState;
use crate::gateway::{SHORTLIST_STATUS_HEADER, SHORTLIST_STATUS_RANKED, SHORTLIST_STATUS_STORED};
use crate::ranking::RankingResult;
use crate::reputation::LookupContext;
use crate::vectordb::VectorDbClient;

/// Entries returned by `GET /api/results`.
pub const RECENT_RESULTS: usize = 10;

pub const DEFAULT_RESULTS_LIMIT: usize = 200;

pub const MAX_RESULTS_LIMIT: usize = 2000;

const STORE_UNAVAILABLE_MESSAGE: &str = "Database not available";

/// `POST /api/process`: multipart upload of a job description and resume files.
#[instrument(skip(state, multipart))]
pub async fn process_handler<V>(
    State(state): State<HandlerState<V>>,
    mut multipart: Multipart,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let mut job_description = None;
    let mut github_token = None;
    let mut raw = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                job_description = Some(field.text().await.map_err(|e| {
                    GatewayError::InvalidRequest(format!("Unreadable job_description: {}", e))
                })?);
            }
            "github_token" => {
                github_token = Some(field.text().await.map_err(|e| {
                    GatewayError::InvalidRequest(format!("Unreadable github_token: {}", e))
                })?);
            }
            "resume_files" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    GatewayError::InvalidRequest(format!("Unreadable file {}: {}", filename, e))
                })?;
                let text = state.extractor.extract(&bytes, &filename);
                raw.push(RawCandidate::new(filename, text));
            }
            other => debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let query = validate_job_description(job_description.as_deref())?;
    if raw.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "At least one resume file is required".to_string(),
        ));
    }

    let ctx = LookupContext::with_github_token(github_token);
    run_ranking(&state, &query, raw, &ctx).await
}

/// `POST /api/rank`: JSON batch of already-extracted resumes.
#[instrument(skip(state, request), fields(num_resumes = request.resumes.len()))]
pub async fn rank_handler<V>(
    State(state): State<HandlerState<V>>,
    Json(request): Json<RankRequest>,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let query = validate_job_description(Some(&request.job_description))?;
    if request.resumes.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "At least one resume is required".to_string(),
        ));
    }

    let raw: Vec<RawCandidate> = request.resumes.into_iter().map(Into::into).collect();
    let ctx = LookupContext::with_github_token(request.github_token);
    run_ranking(&state, &query, raw, &ctx).await
}

/// `POST /api/upload-resume`: adds resumes to the vector index.
#[instrument(skip(state, request), fields(num_resumes = request.resumes.len()))]
pub async fn upload_resume_handler<V>(
    State(state): State<HandlerState<V>>,
    Json(request): Json<UploadRequest>,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let indexed = state.indexed.as_ref().ok_or_else(vector_store_unavailable)?;
    if request.resumes.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "At least one resume is required".to_string(),
        ));
    }

    let raw: Vec<RawCandidate> = request.resumes.into_iter().map(Into::into).collect();
    let stored_ids = indexed.index(raw).await?;

    let body = UploadResponse {
        success: true,
        stored_ids: stored_ids.iter().map(|id| id.to_string()).collect(),
    };
    Ok(with_status(Json(body), SHORTLIST_STATUS_STORED))
}

/// `POST /api/rank-indexed`: ranks the vector index against a job description.
#[instrument(skip(state, request))]
pub async fn rank_indexed_handler<V>(
    State(state): State<HandlerState<V>>,
    Json(request): Json<RankIndexedRequest>,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let indexed = state.indexed.as_ref().ok_or_else(vector_store_unavailable)?;
    let query = validate_job_description(Some(&request.job_description))?;
    let ctx = LookupContext::with_github_token(request.github_token);

    let result = indexed.rank(&query, &ctx).await?;
    persist(&state, &result).await;
    Ok(make_response(&result))
}

/// `GET /api/results`: the most recent runs.
#[instrument(skip(state))]
pub async fn results_handler<V>(
    State(state): State<HandlerState<V>>,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let Some(results) = load_recent(&state, RECENT_RESULTS).await else {
        return Ok(store_unavailable_response());
    };

    let views: Vec<RankingResultView> = results.iter().map(RankingResultView::from).collect();
    Ok(Json(views).into_response())
}

/// `GET /api/results/all?limit=L`.
#[instrument(skip(state))]
pub async fn all_results_handler<V>(
    State(state): State<HandlerState<V>>,
    QueryParams(params): QueryParams<ResultsQuery>,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let limit = validate_limit(params.limit)?;

    let Some(results) = load_recent(&state, limit).await else {
        return Ok(store_unavailable_response());
    };

    let body = AllResultsResponse {
        count: results.len(),
        limit,
        results: results.iter().map(RankingResultView::from).collect(),
    };
    Ok(Json(body).into_response())
}

async fn run_ranking<V>(
    state: &HandlerState<V>,
    query: &Query,
    raw: Vec<RawCandidate>,
    ctx: &LookupContext,
) -> Result<Response, GatewayError>
where
    V: VectorDbClient + 'static,
{
    let result = state.pipeline.rank(query, raw, ctx).await?;
    persist(state, &result).await;
    Ok(make_response(&result))
}

/// Appends `result` to the store. A failed write is logged and otherwise ignored.
async fn persist<V: VectorDbClient + 'static>(state: &HandlerState<V>, result: &RankingResult) {
    let Some(store) = state.store.clone() else {
        return;
    };

    let owned = result.clone();
    let outcome = tokio::task::spawn_blocking(move || store.append(&owned)).await;

    match outcome {
        Ok(Ok(())) => debug!(result_id = %result.id, "Ranking result persisted"),
        Ok(Err(e)) => warn!(result_id = %result.id, error = %e, "Failed to persist ranking result"),
        Err(e) => warn!(result_id = %result.id, error = %e, "Store write task failed"),
    }
}

/// Reads history off the async workers. `None` when there is no store or it cannot be read.
async fn load_recent<V: VectorDbClient + 'static>(
    state: &HandlerState<V>,
    limit: usize,
) -> Option<Vec<RankingResult>> {
    let store = state.store.clone()?;

    match tokio::task::spawn_blocking(move || store.recent(limit)).await {
        Ok(Ok(results)) => Some(results),
        Ok(Err(e)) => {
            warn!(limit, error = %e, "Result history unavailable");
            None
        }
        Err(e) => {
            warn!(limit, error = %e, "Store read task failed");
            None
        }
    }
}

fn make_response(result: &RankingResult) -> Response {
    info!(
        result_id = %result.id,
        total_processed = result.total_processed,
        returned = result.final_ranking.len(),
        "Ranking served"
    );

    let body = RankResponse {
        success: true,
        result: RankingResultView::from(result),
    };
    with_status(Json(body), SHORTLIST_STATUS_RANKED)
}

fn with_status(body: impl IntoResponse, status: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(SHORTLIST_STATUS_HEADER, HeaderValue::from_static(status));
    (StatusCode::OK, headers, body).into_response()
}

fn store_unavailable_response() -> Response {
    Json(StoreUnavailableResponse {
        message: STORE_UNAVAILABLE_MESSAGE,
        results: Vec::new(),
    })
    .into_response()
}

fn vector_store_unavailable() -> GatewayError {
    GatewayError::Unavailable("no vector store configured".to_string())
}

pub(crate) fn validate_job_description(text: Option<&str>) -> Result<Query, GatewayError> {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(Query::new(text)),
        _ => Err(GatewayError::InvalidRequest(
            "job_description is required".to_string(),
        )),
    }
}

pub(crate) fn validate_limit(limit: Option<i64>) -> Result<usize, GatewayError> {
    match limit {
        None => Ok(DEFAULT_RESULTS_LIMIT),
        Some(l) if (1..=MAX_RESULTS_LIMIT as i64).contains(&l) => Ok(l as usize),
        Some(l) => Err(GatewayError::InvalidRequest(format!(
            "limit must be between 1 and {}, got {}",
            MAX_RESULTS_LIMIT, l
        ))),
    }
}
