//! JSON request and response bodies.

use serde::{Deserialize, Serialize};

use crate::candidate::{RawCandidate, ScoredCandidate};
use crate::constants::DEFAULT_LANGUAGE;
use crate::ranking::RankingResult;
use crate::reputation::ReputationProfile;

#[derive(Deserialize, Debug, Clone)]
pub struct ResumeInput {
    pub filename: String,
    pub text: String,
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl From<ResumeInput> for RawCandidate {
    fn from(input: ResumeInput) -> Self {
        RawCandidate {
            filename: input.filename,
            original_text: input.text,
            translated_text: input.translated_text,
            language: input.language,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RankRequest {
    pub job_description: String,
    pub resumes: Vec<ResumeInput>,
    #[serde(default)]
    pub github_token: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UploadRequest {
    pub resumes: Vec<ResumeInput>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RankIndexedRequest {
    pub job_description: String,
    #[serde(default)]
    pub github_token: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResultsQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UsernamesView {
    pub github: Option<String>,
    pub leetcode: Option<String>,
    pub codechef: Option<String>,
}

/// Raw per-source stats behind a reputation score.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReputationView {
    pub usernames: UsernamesView,
    pub github_public_repos: u64,
    pub github_followers: u64,
    pub github_total_stars: u64,
    pub leetcode_total_solved: u64,
    pub codechef_problems_solved: u64,
    pub codechef_rating: u64,
}

impl From<&ReputationProfile> for ReputationView {
    fn from(profile: &ReputationProfile) -> Self {
        Self {
            usernames: UsernamesView {
                github: profile.usernames.github.clone(),
                leetcode: profile.usernames.leetcode.clone(),
                codechef: profile.usernames.codechef.clone(),
            },
            github_public_repos: profile.github.public_repos,
            github_followers: profile.github.followers,
            github_total_stars: profile.github.total_stars,
            leetcode_total_solved: profile.leetcode.total_solved,
            codechef_problems_solved: profile.codechef.problems_solved,
            codechef_rating: profile.codechef.rating,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CandidateView {
    pub id: String,
    pub filename: String,
    /// The text the models scored.
    pub text: String,
    pub original_text: String,
    pub translated_text: Option<String>,
    pub language: String,
    pub translated: bool,
    pub retrieval_score: f64,
    pub rerank_score: Option<f64>,
    pub reputation_score: Option<f64>,
    pub combined_score: Option<f64>,
    pub reputation: Option<ReputationView>,
}

impl From<&ScoredCandidate> for CandidateView {
    fn from(scored: &ScoredCandidate) -> Self {
        let candidate = scored.candidate();
        Self {
            id: candidate.id().to_string(),
            filename: candidate.filename().to_string(),
            text: candidate.effective_text().to_string(),
            original_text: candidate.original_text().to_string(),
            translated_text: candidate.translated_text().map(str::to_string),
            language: candidate.language().to_string(),
            translated: candidate.language() != DEFAULT_LANGUAGE,
            retrieval_score: scored.retrieval_score(),
            rerank_score: scored.rerank_score(),
            reputation_score: scored.reputation_score(),
            combined_score: scored.combined_score(),
            reputation: scored.reputation().map(ReputationView::from),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankingResultView {
    pub id: String,
    pub query: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub total_processed: u64,
    pub retrieval_ranking: Vec<CandidateView>,
    pub rerank_ranking: Vec<CandidateView>,
    pub final_ranking: Vec<CandidateView>,
}

fn views(ranking: &[ScoredCandidate]) -> Vec<CandidateView> {
    ranking.iter().map(CandidateView::from).collect()
}

impl From<&RankingResult> for RankingResultView {
    fn from(result: &RankingResult) -> Self {
        Self {
            id: result.id.clone(),
            query: result.query.clone(),
            timestamp: result.timestamp().to_rfc3339(),
            total_processed: result.total_processed,
            retrieval_ranking: views(&result.retrieval_ranking),
            rerank_ranking: views(&result.rerank_ranking),
            final_ranking: views(&result.final_ranking),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RankResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: RankingResultView,
}

#[derive(Serialize, Debug, Clone)]
pub struct UploadResponse {
    pub success: bool,
    pub stored_ids: Vec<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct AllResultsResponse {
    pub count: usize,
    pub limit: usize,
    pub results: Vec<RankingResultView>,
}

#[derive(Serialize, Debug, Clone)]
pub struct StoreUnavailableResponse {
    pub message: &'static str,
    pub results: Vec<RankingResultView>,
}

#[derive(Serialize, Debug, Clone)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub api_base: &'static str,
}
