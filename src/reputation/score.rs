//! Reputation formula. The coefficients are part of the persisted-result contract.

use crate::constants::MAX_SCORE;

use super::types::{CodechefStats, GithubStats, LeetcodeStats};

const GITHUB_REPO_WEIGHT: f64 = 2.0;
const GITHUB_FOLLOWER_WEIGHT: f64 = 1.0;
const GITHUB_STAR_WEIGHT: f64 = 0.5;

const LEETCODE_SOLVED_WEIGHT: f64 = 0.5;

const CODECHEF_SOLVED_WEIGHT: f64 = 0.3;
const CODECHEF_RATING_WEIGHT: f64 = 0.05;

const GITHUB_SHARE: f64 = 0.4;
const LEETCODE_SHARE: f64 = 0.4;
const CODECHEF_SHARE: f64 = 0.2;

pub fn github_score(stats: &GithubStats) -> f64 {
    let raw = stats.public_repos as f64 * GITHUB_REPO_WEIGHT
        + stats.followers as f64 * GITHUB_FOLLOWER_WEIGHT
        + stats.total_stars as f64 * GITHUB_STAR_WEIGHT;
    raw.min(MAX_SCORE)
}

pub fn leetcode_score(stats: &LeetcodeStats) -> f64 {
    (stats.total_solved as f64 * LEETCODE_SOLVED_WEIGHT).min(MAX_SCORE)
}

pub fn codechef_score(stats: &CodechefStats) -> f64 {
    let raw = stats.problems_solved as f64 * CODECHEF_SOLVED_WEIGHT
        + stats.rating as f64 * CODECHEF_RATING_WEIGHT;
    raw.min(MAX_SCORE)
}

/// Combines the three sub-scores. A zero sub-score still carries its weight.
pub fn reputation_score(
    github: &GithubStats,
    leetcode: &LeetcodeStats,
    codechef: &CodechefStats,
) -> f64 {
    let weighted = github_score(github) * GITHUB_SHARE
        + leetcode_score(leetcode) * LEETCODE_SHARE
        + codechef_score(codechef) * CODECHEF_SHARE;
    weighted.min(MAX_SCORE)
}
