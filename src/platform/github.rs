//! GitHub REST API backed service

use crate::error::{Error, Result};
use crate::platform::ChangeRequestService;
use crate::types::{ChangeRequestRef, CheckRun, MergeState};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use reqwest::header::{HeaderMap, LINK};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Page size for check runs and statuses (GitHub's maximum)
const PER_PAGE: usize = 100;

/// Upper bound on pages followed per listing
const MAX_PAGES: usize = 50;

/// GitHub service using octocrab
///
/// Pull request state comes from octocrab; checks are read with raw requests
/// against both the Check Runs API (GitHub Actions) and the legacy Commit
/// Status API (external CI services).
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (check status)
    token: String,
    /// HTTP client for raw requests (check status)
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
    /// Head SHA seen by the latest merge query, per pull request
    head_shas: Mutex<HashMap<ChangeRequestRef, String>>,
}

impl GitHubService {
    /// Create a service for github.com, or a GitHub Enterprise host
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = match host {
            Some(h) if h != "github.com" => format!("https://{h}/api/v3"),
            _ => "https://api.github.com".to_string(),
        };
        Self::with_api_base(token, &api_base)
    }

    /// Create a service against an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-timer")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
            head_shas: Mutex::new(HashMap::new()),
        })
    }

    async fn fetch_pull(&self, pr: &ChangeRequestRef) -> Result<octocrab::models::pulls::PullRequest> {
        Ok(self
            .client
            .pulls(&pr.owner, &pr.repo)
            .get(pr.number)
            .await?)
    }

    fn head_shas(&self) -> std::sync::MutexGuard<'_, HashMap<ChangeRequestRef, String>> {
        self.head_shas
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Head SHA from the latest merge query, or a fresh fetch
    async fn head_sha(&self, pr: &ChangeRequestRef) -> Result<String> {
        let cached = self.head_shas().get(pr).cloned();
        if let Some(sha) = cached {
            return Ok(sha);
        }
        let pull = self.fetch_pull(pr).await?;
        Ok(pull.head.sha)
    }
}

/// Extract the `rel="next"` target from a `Link` header
pub(crate) fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().replace(' ', "") == "rel=\"next\"");
        is_next.then(|| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
    })
}

/// Fetch all checks reported against a commit
///
/// Merges check runs and commit statuses into one list, following `next`
/// links until `total_count` items are collected. A non-success HTTP status
/// is an error; the caller decides how to treat an unknown state.
pub async fn fetch_head_checks(
    http_client: &Client,
    api_base: &str,
    token: &str,
    repository: &str,
    sha: &str,
) -> Result<Vec<CheckRun>> {
    #[derive(Deserialize)]
    struct CheckRunsResponse {
        total_count: usize,
        check_runs: Vec<RawCheckRun>,
    }

    #[derive(Deserialize)]
    struct RawCheckRun {
        name: String,
        status: String,
        conclusion: Option<String>,
    }

    #[derive(Deserialize)]
    struct CombinedStatus {
        total_count: usize,
        statuses: Vec<RawStatus>,
    }

    #[derive(Deserialize)]
    struct RawStatus {
        context: String,
        state: String,
    }

    let base = api_base.trim_end_matches('/');

    let mut runs: Vec<RawCheckRun> = Vec::new();
    let mut next = Some(format!(
        "{base}/repos/{repository}/commits/{sha}/check-runs?per_page={PER_PAGE}"
    ));
    let mut pages = 0;
    while let Some(url) = next.take() {
        let (page, link): (CheckRunsResponse, _) = get_json_page(http_client, &url, token).await?;
        pages += 1;
        let page_was_empty = page.check_runs.is_empty();
        runs.extend(page.check_runs);
        if runs.len() < page.total_count && !page_was_empty && pages < MAX_PAGES {
            next = link;
        }
    }

    let mut statuses: Vec<RawStatus> = Vec::new();
    let mut next = Some(format!(
        "{base}/repos/{repository}/commits/{sha}/status?per_page={PER_PAGE}"
    ));
    let mut pages = 0;
    while let Some(url) = next.take() {
        let (page, link): (CombinedStatus, _) = get_json_page(http_client, &url, token).await?;
        pages += 1;
        let page_was_empty = page.statuses.is_empty();
        statuses.extend(page.statuses);
        if statuses.len() < page.total_count && !page_was_empty && pages < MAX_PAGES {
            next = link;
        }
    }

    let mut checks: Vec<CheckRun> = runs
        .into_iter()
        .map(|run| {
            if run.status == "completed" {
                CheckRun::new(run.name, run.conclusion.as_deref().unwrap_or_default())
            } else {
                CheckRun::new(run.name, "PENDING")
            }
        })
        .collect();

    checks.extend(
        statuses
            .into_iter()
            .map(|status| CheckRun::new(status.context, &status.state)),
    );

    debug!(repository, sha, count = checks.len(), "fetched head checks");
    Ok(checks)
}

/// GET a JSON page, returning the body and the `next` page URL if any
async fn get_json_page<T: serde::de::DeserializeOwned>(
    http_client: &Client,
    url: &str,
    token: &str,
) -> Result<(T, Option<String>)> {
    let response = http_client
        .get(url)
        .header("Authorization", format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .send()
        .await
        .map_err(|e| Error::GitHubApi(format!("Request to {url} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::GitHubApi(format!(
            "{url} returned {}",
            response.status()
        )));
    }

    let next = next_page_url(response.headers());
    let body = response
        .json()
        .await
        .map_err(|e| Error::GitHubApi(format!("Failed to parse response from {url}: {e}")))?;
    Ok((body, next))
}

#[async_trait]
impl ChangeRequestService for GitHubService {
    async fn merge_state(&self, pr: &ChangeRequestRef) -> Result<MergeState> {
        debug!(%pr, "querying merge state via API");
        // A failed fetch must not leave a stale SHA behind
        self.head_shas().remove(pr);
        let pull = self.fetch_pull(pr).await?;

        let state = if pull.merged_at.is_some() || pull.merged == Some(true) {
            MergeState::Merged
        } else {
            match pull.state {
                Some(octocrab::models::IssueState::Open) => MergeState::Open,
                // IssueState is non-exhaustive
                Some(_) | None => MergeState::Closed,
            }
        };

        self.head_shas().insert(pr.clone(), pull.head.sha);
        debug!(%pr, %state, "merge state");
        Ok(state)
    }

    async fn list_checks(&self, pr: &ChangeRequestRef) -> Result<Vec<CheckRun>> {
        debug!(%pr, "querying checks via API");
        let sha = self.head_sha(pr).await?;
        fetch_head_checks(
            &self.http_client,
            &self.api_base,
            &self.token,
            &pr.repository(),
            &sha,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(link: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_str(link).unwrap());
        headers
    }

    #[test]
    fn test_next_page_url() {
        let link = r#"<https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=5>; rel="last""#;
        assert_eq!(
            next_page_url(&headers(link)),
            Some("https://api.github.com/x?page=2".to_string())
        );
    }

    #[test]
    fn test_next_page_url_on_last_page() {
        let link = r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=1>; rel="first""#;
        assert_eq!(next_page_url(&headers(link)), None);
        assert_eq!(next_page_url(&HeaderMap::new()), None);
    }
}
