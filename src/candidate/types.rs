use rkyv::{Archive, Deserialize, Serialize};

use crate::constants::DEFAULT_LANGUAGE;
use crate::ranking::fusion;
use crate::reputation::ReputationProfile;

/// Opaque candidate identifier (UUID v4 text), assigned once at normalization.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(String);

impl CandidateId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier (e.g. one read back from the vector store).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracted document as handed to the pipeline, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    /// Uploaded file name.
    pub filename: String,
    /// Text produced by the extractor (empty means extraction failed).
    pub original_text: String,
    /// Translated text, when the upstream translator produced one.
    pub translated_text: Option<String>,
    /// Detected language code. `None` is treated as `"en"`.
    pub language: Option<String>,
}

impl RawCandidate {
    pub fn new(filename: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            original_text: original_text.into(),
            translated_text: None,
            language: None,
        }
    }

    pub fn with_translation(mut self, translated_text: impl Into<String>) -> Self {
        self.translated_text = Some(translated_text.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Canonical scoring unit. Immutable once built.
///
/// At least one of `original_text` / `translated_text` is non-blank; construction fails
/// otherwise.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Candidate {
    id: CandidateId,
    filename: String,
    original_text: String,
    translated_text: Option<String>,
    language: String,
}

impl Candidate {
    /// Builds a candidate with a fresh id, or `None` when there is no usable text.
    pub fn new(raw: RawCandidate) -> Option<Self> {
        Self::with_id(CandidateId::generate(), raw)
    }

    /// Builds a candidate under an existing id (used when rehydrating from an index).
    pub fn with_id(id: CandidateId, raw: RawCandidate) -> Option<Self> {
        let translated_text = raw
            .translated_text
            .filter(|text| !text.trim().is_empty());

        if raw.original_text.trim().is_empty() && translated_text.is_none() {
            return None;
        }

        let language = raw
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Some(Self {
            id,
            filename: raw.filename,
            original_text: raw.original_text,
            translated_text,
            language,
        })
    }

    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn translated_text(&self) -> Option<&str> {
        self.translated_text.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Text every stage scores: the translation when present, else the original.
    pub fn effective_text(&self) -> &str {
        self.translated_text
            .as_deref()
            .unwrap_or(&self.original_text)
    }

    /// `true` when the source document was not English.
    pub fn is_translated(&self) -> bool {
        self.language != DEFAULT_LANGUAGE
    }
}

/// Job description a pipeline run ranks against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Candidate annotated by the ranking stages.
///
/// Each stage consumes the value and returns it with one more score set. A score that is
/// already present is never replaced, so the output of any stage can be inspected on its
/// own.
#[derive(Archive, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    candidate: Candidate,
    retrieval_score: f64,
    rerank_score: Option<f64>,
    reputation_score: Option<f64>,
    combined_score: Option<f64>,
    reputation: Option<ReputationProfile>,
}

impl ScoredCandidate {
    /// Output of the retrieval stage.
    pub fn retrieved(candidate: Candidate, retrieval_score: f64) -> Self {
        Self {
            candidate,
            retrieval_score,
            rerank_score: None,
            reputation_score: None,
            combined_score: None,
            reputation: None,
        }
    }

    /// Adds the rerank score.
    pub fn with_rerank_score(mut self, score: f64) -> Self {
        self.rerank_score.get_or_insert(score);
        self
    }

    /// Adds the reputation score along with the profile it was computed from.
    pub fn with_reputation(mut self, profile: ReputationProfile) -> Self {
        if self.reputation_score.is_none() {
            self.reputation_score = Some(profile.score());
            self.reputation = Some(profile);
        }
        self
    }

    /// Adds the combined score. Returns `None` when a sub-score is missing, since a partial
    /// fusion is never reported.
    pub fn fused(mut self) -> Option<Self> {
        let combined = self.recompute_combined()?;
        self.combined_score.get_or_insert(combined);
        Some(self)
    }

    /// Recomputes the combined score from the stored sub-scores.
    pub fn recompute_combined(&self) -> Option<f64> {
        Some(fusion::combined_score(
            self.retrieval_score,
            self.rerank_score?,
            self.reputation_score?,
        ))
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn id(&self) -> &CandidateId {
        self.candidate.id()
    }

    pub fn retrieval_score(&self) -> f64 {
        self.retrieval_score
    }

    pub fn rerank_score(&self) -> Option<f64> {
        self.rerank_score
    }

    pub fn reputation_score(&self) -> Option<f64> {
        self.reputation_score
    }

    pub fn combined_score(&self) -> Option<f64> {
        self.combined_score
    }

    pub fn reputation(&self) -> Option<&ReputationProfile> {
        self.reputation.as_ref()
    }
}
