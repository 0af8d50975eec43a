use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::types::{SourceKind, Usernames};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("Invalid username regex")
        })
        .collect()
}

static GITHUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"github\.com/([\w-]+)",
        r"github:\s*([\w-]+)",
        r"github\s+username:\s*([\w-]+)",
    ])
});

static LEETCODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"leetcode\.com/([\w-]+)",
        r"leetcode:\s*([\w-]+)",
        r"leetcode\s+username:\s*([\w-]+)",
    ])
});

static CODECHEF_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"codechef\.com/users/([\w-]+)",
        r"codechef:\s*([\w-]+)",
        r"codechef\s+username:\s*([\w-]+)",
    ])
});

fn patterns_for(kind: SourceKind) -> &'static [Regex] {
    match kind {
        SourceKind::Github => &GITHUB_PATTERNS,
        SourceKind::Leetcode => &LEETCODE_PATTERNS,
        SourceKind::Codechef => &CODECHEF_PATTERNS,
    }
}

/// Returns the username for `kind`, taken from the first pattern that matches.
pub fn extract_username(text: &str, kind: SourceKind) -> Option<String> {
    patterns_for(kind).iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Extracts usernames for every source independently.
pub fn extract_usernames(text: &str) -> Usernames {
    let mut usernames = Usernames::default();
    for kind in SourceKind::ALL {
        if let Some(name) = extract_username(text, kind) {
            usernames.set(kind, name);
        }
    }
    usernames
}
