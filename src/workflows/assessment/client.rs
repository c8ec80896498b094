use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AnalysisConfig;

use super::services::{
    AnalysisServiceError, AuthorshipRequest, AuthorshipResponse, GroundedAnalysisRequest,
    GroundedAnalysisResponse, LanguageAnalysisService, SearchAnalysisService,
    StyleAnalysisRequest, StyleAnalysisResponse,
};

/// HTTP adapter for both analysis collaborators. Posts the documented request
/// shapes as JSON and requires the documented response shapes back; transport
/// problems and undecodable bodies map onto [`AnalysisServiceError`].
///
/// Call timeouts are enforced by the pipeline, not here, so a single client
/// can serve pipelines with different budgets.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    language_base: String,
    search_base: String,
}

impl HttpAnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            language_base: config.language_service_url.trim_end_matches('/').to_string(),
            search_base: config.search_service_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<Req, Resp>(&self, url: String, body: &Req) -> Result<Resp, AnalysisServiceError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| AnalysisServiceError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisServiceError::Unavailable(format!(
                "{url} answered {status}"
            )));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|err| AnalysisServiceError::MalformedResponse(err.to_string()))
    }
}

impl LanguageAnalysisService for HttpAnalysisClient {
    async fn analyze_style(
        &self,
        request: StyleAnalysisRequest,
    ) -> Result<StyleAnalysisResponse, AnalysisServiceError> {
        self.post_json(format!("{}/v1/analysis/style", self.language_base), &request)
            .await
    }

    async fn compare_authorship(
        &self,
        request: AuthorshipRequest,
    ) -> Result<AuthorshipResponse, AnalysisServiceError> {
        self.post_json(
            format!("{}/v1/analysis/authorship", self.language_base),
            &request,
        )
        .await
    }
}

impl SearchAnalysisService for HttpAnalysisClient {
    async fn analyze_grounded(
        &self,
        request: GroundedAnalysisRequest,
    ) -> Result<GroundedAnalysisResponse, AnalysisServiceError> {
        self.post_json(format!("{}/v1/analysis/grounded", self.search_base), &request)
            .await
    }
}
