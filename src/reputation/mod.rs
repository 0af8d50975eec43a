//! Reputation enrichment from coding-platform activity.
//!
//! Usernames are pattern-matched out of the resume text, looked up on each platform, and
//! reduced to one score in `[0, 100]` by [`reputation_score`]. Lookups are best-effort: a
//! missing username, failed request, or timeout contributes a zero signal.

pub mod config;
pub mod enricher;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod score;
pub mod sources;
pub mod types;
pub mod usernames;


pub use config::ReputationConfig;
pub use enricher::ReputationEnricher;
pub use error::ReputationError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockReputationSource;
pub use score::{codechef_score, github_score, leetcode_score, reputation_score};
pub use sources::{
    CodechefSource, GithubSource, LeetcodeSource, LookupContext, ReputationSource, http_sources,
};
pub use types::{
    CodechefStats, GithubStats, LeetcodeStats, ReputationProfile, ReputationSignal, SourceKind,
    Usernames,
};
pub use usernames::{extract_username, extract_usernames};
