//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use responder_core::{Answer, Question, QuestionRepository, StoreError};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<QuestionRepository>,
    /// Shown on `/health`; informational only.
    pub storage_path: String,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

/// Runs a repository call on the blocking pool; every call does file I/O.
async fn with_repo<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&QuestionRepository) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let repo = Arc::clone(&state.repo);
    tokio::task::spawn_blocking(move || op(&repo))
        .await
        .map_err(|e| {
            tracing::error!("Repository task failed: {}", e);
            ApiError::Internal("Internal error".into())
        })?
        .map_err(ApiError::from)
}

/// `author`/`summary` body accepted as JSON or as a urlencoded form.
///
/// An empty JSON body, a non-object JSON value, or any other content type
/// yields an empty draft, which then fails validation. Only JSON that does
/// not parse is refused here.
#[derive(Debug)]
pub struct DraftBody(pub DraftRequest);

#[async_trait]
impl<S> FromRequest<S> for DraftBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<DraftRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(body))
        } else if content_type.contains("json") {
            let bytes = Bytes::from_request(req, state).await?;
            Ok(Self(DraftRequest::from_json_slice(&bytes)?))
        } else {
            Ok(Self(DraftRequest::default()))
        }
    }
}

/// `GET /`
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to responder!".into(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        storage_path: state.storage_path.clone(),
    })
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// `GET /questions`
pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = with_repo(&state, |repo| repo.list_questions()).await?;
    Ok(Json(questions))
}

/// `GET /questions/:question_id`
pub async fn get_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<Question>, ApiError> {
    with_repo(&state, move |repo| repo.get_question(&question_id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// `POST /questions`
pub async fn add_question(
    State(state): State<AppState>,
    DraftBody(req): DraftBody,
) -> Result<Json<Question>, ApiError> {
    let question = with_repo(&state, move |repo| repo.add_question(req.into())).await?;
    metrics::record_write("question");
    tracing::info!(question_id = %question.id, "Question created");
    Ok(Json(question))
}

/// `GET /questions/:question_id/answers`
pub async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<Json<Vec<Answer>>, ApiError> {
    with_repo(&state, move |repo| repo.list_answers(&question_id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// `POST /questions/:question_id/answers`
pub async fn add_answer(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    DraftBody(req): DraftBody,
) -> Result<Json<Answer>, ApiError> {
    let qid = question_id.clone();
    let answer = with_repo(&state, move |repo| repo.add_answer(&qid, req.into())).await?;
    metrics::record_write("answer");
    tracing::info!(question_id = %question_id, answer_id = %answer.id, "Answer created");
    Ok(Json(answer))
}

/// `GET /questions/:question_id/answers/:answer_id`
pub async fn get_answer(
    State(state): State<AppState>,
    Path((question_id, answer_id)): Path<(String, String)>,
) -> Result<Json<Answer>, ApiError> {
    with_repo(&state, move |repo| repo.get_answer(&question_id, &answer_id))
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}
