//! HTTP-backed reputation sources.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::config::ReputationConfig;
use super::error::ReputationError;
use super::types::{CodechefStats, GithubStats, LeetcodeStats, ReputationSignal, SourceKind};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql";
pub const CODECHEF_BASE: &str = "https://www.codechef.com";

const GITHUB_REPOS_PER_PAGE: u32 = 100;

const LEETCODE_QUERY: &str = r#"
query getUserProfile($username: String!) {
    matchedUser(username: $username) {
        submitStats {
            acSubmissionNum {
                difficulty
                count
            }
        }
    }
}
"#;

/// Request-scoped lookup options.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    /// Overrides the configured GitHub token for this request.
    pub github_token: Option<String>,
}

impl LookupContext {
    pub fn with_github_token(token: Option<String>) -> Self {
        Self {
            github_token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

/// One external platform that can be queried for a username.
#[async_trait]
pub trait ReputationSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn lookup(
        &self,
        username: &str,
        ctx: &LookupContext,
    ) -> Result<ReputationSignal, ReputationError>;
}

/// Builds the three HTTP sources sharing one client.
pub fn http_sources(
    config: &ReputationConfig,
) -> Result<Vec<Arc<dyn ReputationSource>>, ReputationError> {
    let client = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| ReputationError::ClientBuild {
            reason: e.to_string(),
        })?;

    Ok(vec![
        Arc::new(GithubSource::new(client.clone(), config.github_token.clone())),
        Arc::new(LeetcodeSource::new(client.clone())),
        Arc::new(CodechefSource::new(client)),
    ])
}

fn request_failed(kind: SourceKind) -> impl FnOnce(reqwest::Error) -> ReputationError {
    move |e| ReputationError::RequestFailed {
        source_kind: kind,
        reason: e.to_string(),
    }
}

fn invalid_response(kind: SourceKind) -> impl FnOnce(reqwest::Error) -> ReputationError {
    move |e| ReputationError::InvalidResponse {
        source_kind: kind,
        reason: e.to_string(),
    }
}

fn check_status(
    kind: SourceKind,
    username: &str,
    res: Response,
) -> Result<Response, ReputationError> {
    match res.status() {
        StatusCode::NOT_FOUND => Err(ReputationError::UserNotFound {
            source_kind: kind,
            username: username.to_string(),
        }),
        status if !status.is_success() => Err(ReputationError::BadStatus {
            source_kind: kind,
            status: status.as_u16(),
        }),
        _ => Ok(res),
    }
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
}

#[derive(Debug, Deserialize)]
struct GithubRepo {
    #[serde(default)]
    stargazers_count: u64,
}

#[derive(Debug, Clone)]
pub struct GithubSource {
    client: Client,
    api_base: String,
    default_token: Option<String>,
}

impl GithubSource {
    pub fn new(client: Client, default_token: Option<String>) -> Self {
        Self {
            client,
            api_base: GITHUB_API_BASE.to_string(),
            default_token,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn get(&self, url: String, token: Option<&str>) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }

    async fn total_stars(&self, username: &str, token: Option<&str>) -> Result<u64, ReputationError> {
        let kind = SourceKind::Github;
        let url = format!(
            "{}/users/{}/repos?per_page={}",
            self.api_base, username, GITHUB_REPOS_PER_PAGE
        );
        let res = self
            .get(url, token)
            .send()
            .await
            .map_err(request_failed(kind))?;
        let repos: Vec<GithubRepo> = check_status(kind, username, res)?
            .json()
            .await
            .map_err(invalid_response(kind))?;
        Ok(repos.iter().map(|r| r.stargazers_count).sum())
    }
}

#[async_trait]
impl ReputationSource for GithubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Github
    }

    async fn lookup(
        &self,
        username: &str,
        ctx: &LookupContext,
    ) -> Result<ReputationSignal, ReputationError> {
        let kind = self.kind();
        let token = ctx
            .github_token
            .as_deref()
            .or(self.default_token.as_deref());

        let res = self
            .get(format!("{}/users/{}", self.api_base, username), token)
            .send()
            .await
            .map_err(request_failed(kind))?;
        let user: GithubUser = check_status(kind, username, res)?
            .json()
            .await
            .map_err(invalid_response(kind))?;

        let total_stars = match self.total_stars(username, token).await {
            Ok(stars) => stars,
            Err(e) => {
                debug!(username = %username, error = %e, "GitHub star count unavailable");
                0
            }
        };

        Ok(ReputationSignal::Github(GithubStats {
            public_repos: user.public_repos,
            followers: user.followers,
            total_stars,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct LeetcodeSource {
    client: Client,
    graphql_url: String,
}

impl LeetcodeSource {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            graphql_url: LEETCODE_GRAPHQL_URL.to_string(),
        }
    }

    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }
}

/// Reads the solved count from a `getUserProfile` response. `Ok(None)` means no such user.
pub(crate) fn parse_leetcode_solved(json: &Value) -> Result<Option<u64>, String> {
    let matched = json.pointer("/data/matchedUser").unwrap_or(&Value::Null);
    if matched.is_null() {
        return Ok(None);
    }

    let buckets = matched
        .pointer("/submitStats/acSubmissionNum")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "missing acSubmissionNum".to_string())?;

    let count = |item: &Value| item.get("count").and_then(|v| v.as_u64()).unwrap_or(0);

    // The "All" bucket already aggregates Easy/Medium/Hard.
    let total = buckets
        .iter()
        .find(|item| item.get("difficulty").and_then(|v| v.as_str()) == Some("All"))
        .map(count)
        .unwrap_or_else(|| buckets.iter().map(count).sum());

    Ok(Some(total))
}

#[async_trait]
impl ReputationSource for LeetcodeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Leetcode
    }

    async fn lookup(
        &self,
        username: &str,
        _ctx: &LookupContext,
    ) -> Result<ReputationSignal, ReputationError> {
        let kind = self.kind();
        let body = serde_json::json!({
            "query": LEETCODE_QUERY,
            "variables": { "username": username },
        });

        let res = self
            .client
            .post(&self.graphql_url)
            .json(&body)
            .send()
            .await
            .map_err(request_failed(kind))?;
        let json: Value = check_status(kind, username, res)?
            .json()
            .await
            .map_err(invalid_response(kind))?;

        match parse_leetcode_solved(&json) {
            Ok(Some(total_solved)) => Ok(ReputationSignal::Leetcode(LeetcodeStats { total_solved })),
            Ok(None) => Err(ReputationError::UserNotFound {
                source_kind: kind,
                username: username.to_string(),
            }),
            Err(reason) => Err(ReputationError::InvalidResponse {
                source_kind: kind,
                reason,
            }),
        }
    }
}

static CODECHEF_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="rating-number"[^>]*>\s*(\d+)"#).expect("Invalid CodeChef rating regex")
});

static CODECHEF_SOLVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total Problems Solved:\s*(\d+)").expect("Invalid CodeChef solved regex")
});

/// Best-effort scrape of a CodeChef profile page. Missing fields read as zero.
pub(crate) fn parse_codechef_profile(html: &str) -> CodechefStats {
    let capture = |re: &Regex| {
        re.captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    CodechefStats {
        problems_solved: capture(&CODECHEF_SOLVED),
        rating: capture(&CODECHEF_RATING),
    }
}

#[derive(Debug, Clone)]
pub struct CodechefSource {
    client: Client,
    base_url: String,
}

impl CodechefSource {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: CODECHEF_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ReputationSource for CodechefSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Codechef
    }

    async fn lookup(
        &self,
        username: &str,
        _ctx: &LookupContext,
    ) -> Result<ReputationSignal, ReputationError> {
        let kind = self.kind();
        let res = self
            .client
            .get(format!("{}/users/{}", self.base_url, username))
            .send()
            .await
            .map_err(request_failed(kind))?;
        let html = check_status(kind, username, res)?
            .text()
            .await
            .map_err(invalid_response(kind))?;

        Ok(ReputationSignal::Codechef(parse_codechef_profile(&html)))
    }
}
