use rkyv::{Archive, Deserialize, Serialize};

use super::score::reputation_score;

/// Coding platforms a candidate can be looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Github,
    Leetcode,
    Codechef,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Github, SourceKind::Leetcode, SourceKind::Codechef];

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Github => "github",
            SourceKind::Leetcode => "leetcode",
            SourceKind::Codechef => "codechef",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Archive, Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GithubStats {
    pub public_repos: u64,
    pub followers: u64,
    pub total_stars: u64,
}

#[derive(Archive, Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeetcodeStats {
    pub total_solved: u64,
}

#[derive(Archive, Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodechefStats {
    pub problems_solved: u64,
    pub rating: u64,
}

/// What a single source returns for one username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReputationSignal {
    Github(GithubStats),
    Leetcode(LeetcodeStats),
    Codechef(CodechefStats),
}

impl ReputationSignal {
    /// The all-zero signal for `kind`, used for missing usernames and failed lookups.
    pub fn zero(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Github => ReputationSignal::Github(GithubStats::default()),
            SourceKind::Leetcode => ReputationSignal::Leetcode(LeetcodeStats::default()),
            SourceKind::Codechef => ReputationSignal::Codechef(CodechefStats::default()),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ReputationSignal::Github(_) => SourceKind::Github,
            ReputationSignal::Leetcode(_) => SourceKind::Leetcode,
            ReputationSignal::Codechef(_) => SourceKind::Codechef,
        }
    }
}

/// Usernames found in a resume, at most one per source.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Usernames {
    pub github: Option<String>,
    pub leetcode: Option<String>,
    pub codechef: Option<String>,
}

impl Usernames {
    pub fn get(&self, kind: SourceKind) -> Option<&str> {
        match kind {
            SourceKind::Github => self.github.as_deref(),
            SourceKind::Leetcode => self.leetcode.as_deref(),
            SourceKind::Codechef => self.codechef.as_deref(),
        }
    }

    pub fn set(&mut self, kind: SourceKind, username: String) {
        match kind {
            SourceKind::Github => self.github = Some(username),
            SourceKind::Leetcode => self.leetcode = Some(username),
            SourceKind::Codechef => self.codechef = Some(username),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.github.is_none() && self.leetcode.is_none() && self.codechef.is_none()
    }
}

/// Per-source stats for one candidate. Sources without data stay at zero.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ReputationProfile {
    pub usernames: Usernames,
    pub github: GithubStats,
    pub leetcode: LeetcodeStats,
    pub codechef: CodechefStats,
}

impl ReputationProfile {
    pub fn new(usernames: Usernames) -> Self {
        Self {
            usernames,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, signal: ReputationSignal) {
        match signal {
            ReputationSignal::Github(stats) => self.github = stats,
            ReputationSignal::Leetcode(stats) => self.leetcode = stats,
            ReputationSignal::Codechef(stats) => self.codechef = stats,
        }
    }

    /// Weighted reputation score in `[0, 100]`.
    pub fn score(&self) -> f64 {
        reputation_score(&self.github, &self.leetcode, &self.codechef)
    }
}
