use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};

use crate::workflows::assessment::domain::{
    PlagiarismSource, RubricScore, StyleMetrics, WriterId, WriterProfile,
};
use crate::workflows::assessment::pipeline::AssessmentPipeline;
use crate::workflows::assessment::proctor::{ProctorSession, TelemetrySnapshot};
use crate::workflows::assessment::repository::{ProfileStore, StoreError};
use crate::workflows::assessment::rubric::{self, default_rubric, RubricCriterion};
use crate::workflows::assessment::service::ApplicantService;
use crate::workflows::assessment::services::{
    AnalysisServiceError, AuthorshipRequest, AuthorshipResponse, GroundedAnalysisRequest,
    GroundedAnalysisResponse, LanguageAnalysisService, SearchAnalysisService,
    StyleAnalysisRequest, StyleAnalysisResponse,
};

/// Five criteria totaling 100 points, matching the canonical review scenario.
pub(super) fn rubric_100() -> Vec<RubricCriterion> {
    let caps = [
        ("clarity", "Clarity", 25u16),
        ("structure", "Structure", 20),
        ("research", "Research Depth", 25),
        ("grammar", "Grammar", 15),
        ("voice", "Voice", 15),
    ];
    caps.into_iter()
        .map(|(id, category, max_points)| RubricCriterion {
            id: id.to_string(),
            category: category.to_string(),
            description: format!("{category} of the submitted piece"),
            max_points,
        })
        .collect()
}

pub(super) fn submission_text() -> String {
    "The committee reviewed the proposal in detail and concluded that the budget \
     projections rested on assumptions nobody had tested against last year's \
     figures. A second reading surfaced further inconsistencies."
        .to_string()
}

pub(super) fn short_text() -> String {
    "Too short to judge.".to_string()
}

pub(super) fn metrics_fixture() -> StyleMetrics {
    StyleMetrics {
        vocabulary_richness: 74.0,
        sentence_complexity: 61.5,
        passive_voice_usage: 12.0,
        detected_ai_probability: 8.0,
        consistency_score: 88.0,
        tone: "Formal".to_string(),
        key_traits: vec!["precise".to_string(), "measured".to_string()],
    }
}

pub(super) fn style_response(scores: &[(&str, f32)]) -> StyleAnalysisResponse {
    StyleAnalysisResponse {
        metrics: metrics_fixture(),
        rubric_scores: scores
            .iter()
            .map(|(id, score)| RubricScore {
                criterion_id: id.to_string(),
                score: *score,
                comments: format!("Solid work on {id}"),
            })
            .collect(),
        feedback: "Clear, well-organized writing with minor lapses.".to_string(),
        summary: "Competent professional prose.".to_string(),
    }
}

pub(super) fn grounded_response(source_count: usize) -> GroundedAnalysisResponse {
    GroundedAnalysisResponse {
        analysis_text: "Search found overlapping passages.".to_string(),
        sources: (0..source_count)
            .map(|index| PlagiarismSource {
                title: format!("Match {}", index + 1),
                uri: format!("https://example.com/match/{}", index + 1),
            })
            .collect(),
    }
}

pub(super) fn telemetry_fixture() -> TelemetrySnapshot {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut session = ProctorSession::started_at(start);
    session.record_paste();
    session.record_paste();
    session.record_paste();
    session.submit_at(start + chrono::Duration::seconds(600))
}

/// Language service double that replays queued responses and records the
/// requests it saw. Panics on calls nothing queued for, so tests catch
/// degenerate branches that should never reach the service.
#[derive(Default)]
pub(super) struct StubLanguageService {
    style_queue: Mutex<VecDeque<Result<StyleAnalysisResponse, AnalysisServiceError>>>,
    authorship_queue: Mutex<VecDeque<Result<AuthorshipResponse, AnalysisServiceError>>>,
    style_requests: Mutex<Vec<StyleAnalysisRequest>>,
    authorship_requests: Mutex<Vec<AuthorshipRequest>>,
    style_calls: AtomicUsize,
    authorship_calls: AtomicUsize,
}

impl StubLanguageService {
    pub(super) fn queue_style(&self, response: Result<StyleAnalysisResponse, AnalysisServiceError>) {
        self.style_queue
            .lock()
            .expect("style queue poisoned")
            .push_back(response);
    }

    pub(super) fn queue_authorship(
        &self,
        response: Result<AuthorshipResponse, AnalysisServiceError>,
    ) {
        self.authorship_queue
            .lock()
            .expect("authorship queue poisoned")
            .push_back(response);
    }

    pub(super) fn style_calls(&self) -> usize {
        self.style_calls.load(Ordering::Relaxed)
    }

    pub(super) fn authorship_calls(&self) -> usize {
        self.authorship_calls.load(Ordering::Relaxed)
    }

    pub(super) fn style_requests(&self) -> Vec<StyleAnalysisRequest> {
        self.style_requests
            .lock()
            .expect("style requests poisoned")
            .clone()
    }

    pub(super) fn authorship_requests(&self) -> Vec<AuthorshipRequest> {
        self.authorship_requests
            .lock()
            .expect("authorship requests poisoned")
            .clone()
    }
}

impl LanguageAnalysisService for StubLanguageService {
    async fn analyze_style(
        &self,
        request: StyleAnalysisRequest,
    ) -> Result<StyleAnalysisResponse, AnalysisServiceError> {
        self.style_calls.fetch_add(1, Ordering::Relaxed);
        self.style_requests
            .lock()
            .expect("style requests poisoned")
            .push(request);
        self.style_queue
            .lock()
            .expect("style queue poisoned")
            .pop_front()
            .expect("unexpected style analysis call")
    }

    async fn compare_authorship(
        &self,
        request: AuthorshipRequest,
    ) -> Result<AuthorshipResponse, AnalysisServiceError> {
        self.authorship_calls.fetch_add(1, Ordering::Relaxed);
        self.authorship_requests
            .lock()
            .expect("authorship requests poisoned")
            .push(request);
        self.authorship_queue
            .lock()
            .expect("authorship queue poisoned")
            .pop_front()
            .expect("unexpected authorship comparison call")
    }
}

/// Search service double mirroring [`StubLanguageService`].
#[derive(Default)]
pub(super) struct StubSearchService {
    queue: Mutex<VecDeque<Result<GroundedAnalysisResponse, AnalysisServiceError>>>,
    requests: Mutex<Vec<GroundedAnalysisRequest>>,
    calls: AtomicUsize,
}

impl StubSearchService {
    pub(super) fn queue(&self, response: Result<GroundedAnalysisResponse, AnalysisServiceError>) {
        self.queue
            .lock()
            .expect("search queue poisoned")
            .push_back(response);
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub(super) fn requests(&self) -> Vec<GroundedAnalysisRequest> {
        self.requests.lock().expect("search requests poisoned").clone()
    }
}

impl SearchAnalysisService for StubSearchService {
    async fn analyze_grounded(
        &self,
        request: GroundedAnalysisRequest,
    ) -> Result<GroundedAnalysisResponse, AnalysisServiceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.requests
            .lock()
            .expect("search requests poisoned")
            .push(request);
        self.queue
            .lock()
            .expect("search queue poisoned")
            .pop_front()
            .expect("unexpected grounded analysis call")
    }
}

#[derive(Default)]
pub(super) struct MemoryProfileStore {
    pub(super) profiles: Mutex<HashMap<WriterId, WriterProfile>>,
    rubric: Mutex<Option<Vec<RubricCriterion>>>,
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, id: &WriterId) -> Result<Option<WriterProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn get_all(&self) -> Result<Vec<WriterProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn put(&self, profile: WriterProfile) -> Result<(), StoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn get_rubric(&self) -> Result<Vec<RubricCriterion>, StoreError> {
        let guard = self.rubric.lock().expect("rubric mutex poisoned");
        Ok(guard.clone().unwrap_or_else(default_rubric))
    }

    fn put_rubric(&self, rubric: Vec<RubricCriterion>) -> Result<(), StoreError> {
        rubric::validate(&rubric)?;
        let mut guard = self.rubric.lock().expect("rubric mutex poisoned");
        *guard = Some(rubric);
        Ok(())
    }
}

/// Store that fails every operation, for propagation tests.
pub(super) struct UnavailableStore;

impl ProfileStore for UnavailableStore {
    fn get(&self, _id: &WriterId) -> Result<Option<WriterProfile>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn get_all(&self) -> Result<Vec<WriterProfile>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn put(&self, _profile: WriterProfile) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn get_rubric(&self) -> Result<Vec<RubricCriterion>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn put_rubric(&self, _rubric: Vec<RubricCriterion>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) fn pipeline(
    language: Arc<StubLanguageService>,
    search: Arc<StubSearchService>,
) -> AssessmentPipeline<StubLanguageService, StubSearchService> {
    AssessmentPipeline::new(language, search, TEST_TIMEOUT)
}

pub(super) type TestService =
    ApplicantService<MemoryProfileStore, StubLanguageService, StubSearchService>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryProfileStore>,
    Arc<StubLanguageService>,
    Arc<StubSearchService>,
) {
    let store = Arc::new(MemoryProfileStore::default());
    let language = Arc::new(StubLanguageService::default());
    let search = Arc::new(StubSearchService::default());
    let service = ApplicantService::new(
        store.clone(),
        pipeline(language.clone(), search.clone()),
    );
    (service, store, language, search)
}
