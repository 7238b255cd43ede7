use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{
    CompareRequest, DecisionEventRequest, DecisionRecord, LoginRequest, LoginResponse,
    MatchCandidate, MatchReport, Party, RankedMatchResponse,
};

/// Errors that can occur when talking to the matching service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: session token rejected")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the remote matching service
///
/// Owns the four narrow contracts the review engine consumes:
/// - prefix suggestions for the search bar
/// - ranked candidate lists per party
/// - on-demand two-way comparison
/// - the fire-and-forget decision report
///
/// The client is immutable; `with_token` derives an authenticated copy
/// after login so no shared mutable state crosses task boundaries.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl ApiClient {
    /// Create a new client for the given service base URL
    pub fn new(base_url: String, timeout_secs: u64, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            token,
            client,
        }
    }

    /// Derive a client that attaches the given bearer token
    pub fn with_token(&self, token: String) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: Some(token),
            client: self.client.clone(),
        }
    }

    /// Derive a client with no credentials (after logout)
    pub fn without_token(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: None,
            client: self.client.clone(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check_status(status: StatusCode, what: &str) -> Result<(), ApiError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::ApiError(format!("{} failed: {}", what, status)));
        }
        Ok(())
    }

    /// Fetch job-title suggestions for a typed prefix
    ///
    /// Callers must not pass blank input; the debounce layer clears
    /// suggestions locally instead of dispatching.
    pub async fn search_prefix(&self, prefix: &str) -> Result<Vec<String>, ApiError> {
        let url = format!(
            "{}?prefix={}",
            self.url("/jobs/suggest"),
            urlencoding::encode(prefix)
        );

        tracing::debug!("Fetching suggestions from: {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::check_status(response.status(), "suggest")?;

        let suggestions: Vec<String> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse suggestions: {}", e)))?;

        Ok(suggestions)
    }

    /// Fetch the ranked deck for a party
    ///
    /// The service returns the list pre-sorted by relevance descending;
    /// the client installs it in that order and never re-sorts.
    pub async fn rank_for_party(&self, party: &Party) -> Result<Vec<MatchCandidate>, ApiError> {
        let param = match party.role {
            crate::models::Role::Candidate => "candidateId",
            crate::models::Role::Recruiter => "jobId",
        };
        let url = format!(
            "{}?{}={}",
            self.url("/match/rank"),
            param,
            urlencoding::encode(&party.id)
        );

        tracing::debug!("Fetching ranking from: {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::check_status(response.status(), "rank")?;

        let entries: Vec<RankedMatchResponse> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse ranking: {}", e)))?;

        let kind = party.role.reviews();
        let candidates = entries
            .into_iter()
            .map(|entry| entry.into_candidate(kind))
            .collect::<Vec<_>>();

        tracing::debug!("Ranked {} candidates for party {}", candidates.len(), party.id);

        Ok(candidates)
    }

    /// Run the on-demand CV-versus-JD comparison
    pub async fn compare_two(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> Result<MatchReport, ApiError> {
        let body = CompareRequest {
            candidate_id: candidate_id.to_string(),
            job_id: job_id.to_string(),
        };

        let response = self
            .authorize(self.client.post(self.url("/match/compare")))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response.status(), "compare")?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse match report: {}", e)))
    }

    /// Report a committed decision
    ///
    /// The review engine treats this as fire-and-forget: the caller spawns
    /// it off the UI path and swallows failures.
    pub async fn report_decision(&self, record: &DecisionRecord) -> Result<(), ApiError> {
        let body = DecisionEventRequest::from(record);

        let response = self
            .authorize(self.client.post(self.url("/match/event")))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response.status(), "report decision")?;

        tracing::debug!(
            "Reported decision: {} -> {:?}",
            record.candidate_id,
            record.decision
        );

        Ok(())
    }

    /// Exchange credentials for a session token and role
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::ApiError(format!("login failed: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login response: {}", e)))
    }
}
