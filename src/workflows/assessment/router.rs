use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{SampleKind, WriterId, WriterProfile};
use super::proctor::TelemetrySnapshot;
use super::repository::{ProfileStore, StoreError};
use super::rubric::RubricCriterion;
use super::service::{ApplicantService, ApplicantServiceError, NewApplicant, ReviewDecision};
use super::services::{LanguageAnalysisService, SearchAnalysisService};

/// Router builder exposing the applicant and rubric endpoints.
pub fn assessment_router<P, L, S>(service: Arc<ApplicantService<P, L, S>>) -> Router
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    Router::new()
        .route(
            "/api/v1/applicants",
            post(register_handler::<P, L, S>).get(list_handler::<P, L, S>),
        )
        .route(
            "/api/v1/applicants/:writer_id",
            get(profile_handler::<P, L, S>),
        )
        .route(
            "/api/v1/applicants/:writer_id/samples",
            post(sample_handler::<P, L, S>),
        )
        .route(
            "/api/v1/applicants/:writer_id/assessment",
            post(begin_handler::<P, L, S>),
        )
        .route(
            "/api/v1/applicants/:writer_id/assessment/submission",
            post(submit_handler::<P, L, S>),
        )
        .route(
            "/api/v1/applicants/:writer_id/decision",
            post(decision_handler::<P, L, S>),
        )
        .route(
            "/api/v1/rubric",
            get(rubric_handler::<P, L, S>).put(put_rubric_handler::<P, L, S>),
        )
        .with_state(service)
}

/// Sanitized projection of a profile for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantStatusView {
    pub writer_id: String,
    pub status: &'static str,
    pub sample_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u8>,
}

impl From<&WriterProfile> for ApplicantStatusView {
    fn from(profile: &WriterProfile) -> Self {
        Self {
            writer_id: profile.id.0.clone(),
            status: profile.status.label(),
            sample_count: profile.samples.len(),
            overall_score: profile.overall_score(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewSampleRequest {
    pub title: String,
    pub content: String,
    pub kind: SampleKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BeginAssessmentRequest {
    pub task_prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitAssessmentRequest {
    pub text: String,
    pub telemetry: TelemetrySnapshot,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub decision: ReviewDecision,
}

fn error_response(error: ApplicantServiceError) -> Response {
    let status = match &error {
        ApplicantServiceError::NotFound => StatusCode::NOT_FOUND,
        ApplicantServiceError::SamplesLocked | ApplicantServiceError::Transition(_) => {
            StatusCode::CONFLICT
        }
        ApplicantServiceError::Store(StoreError::InvalidRubric(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApplicantServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ApplicantServiceError::Assessment(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    axum::Json(intake): axum::Json<NewApplicant>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    match service.register(intake) {
        Ok(profile) => {
            let view = ApplicantStatusView::from(&profile);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    match service.list() {
        Ok(profiles) => {
            let views: Vec<ApplicantStatusView> =
                profiles.iter().map(ApplicantStatusView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    Path(writer_id): Path<String>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    match service.get(&WriterId(writer_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sample_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    Path(writer_id): Path<String>,
    axum::Json(request): axum::Json<NewSampleRequest>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    let id = WriterId(writer_id);
    match service.add_sample(&id, request.title, request.content, request.kind) {
        Ok(sample) => (StatusCode::CREATED, axum::Json(sample)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn begin_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    Path(writer_id): Path<String>,
    axum::Json(request): axum::Json<BeginAssessmentRequest>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    let id = WriterId(writer_id);
    match service.begin_assessment(&id, request.task_prompt) {
        Ok(profile) => {
            let view = ApplicantStatusView::from(&profile);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    Path(writer_id): Path<String>,
    axum::Json(request): axum::Json<SubmitAssessmentRequest>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    let id = WriterId(writer_id);
    match service
        .submit_assessment(&id, request.text, request.telemetry)
        .await
    {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    Path(writer_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    let id = WriterId(writer_id);
    match service.decide(&id, request.decision) {
        Ok(profile) => {
            let view = ApplicantStatusView::from(&profile);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rubric_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    match service.rubric() {
        Ok(rubric) => (StatusCode::OK, axum::Json(rubric)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn put_rubric_handler<P, L, S>(
    State(service): State<Arc<ApplicantService<P, L, S>>>,
    axum::Json(rubric): axum::Json<Vec<RubricCriterion>>,
) -> Response
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    match service.set_rubric(rubric) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}
