use std::collections::HashMap;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{ScoredPoint, Value};

use crate::candidate::{Candidate, CandidateId, RawCandidate};
use crate::hashing::point_id;

/// Candidate fields stored next to each vector, enough to rebuild the [`Candidate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePayload {
    pub candidate_id: String,
    pub filename: String,
    pub original_text: String,
    pub translated_text: Option<String>,
    pub language: String,
    /// Unix milliseconds at indexing time.
    pub timestamp: i64,
}

impl CandidatePayload {
    pub fn from_candidate(candidate: &Candidate, timestamp: i64) -> Self {
        Self {
            candidate_id: candidate.id().to_string(),
            filename: candidate.filename().to_string(),
            original_text: candidate.original_text().to_string(),
            translated_text: candidate.translated_text().map(str::to_string),
            language: candidate.language().to_string(),
            timestamp,
        }
    }

    /// Rebuilds the candidate under its stored id. `None` if the stored text is blank.
    pub fn to_candidate(&self) -> Option<Candidate> {
        let mut raw = RawCandidate::new(self.filename.clone(), self.original_text.clone())
            .with_language(self.language.clone());
        raw.translated_text = self.translated_text.clone();
        Candidate::with_id(CandidateId::from_string(self.candidate_id.clone()), raw)
    }

    pub(crate) fn into_qdrant(self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert("candidate_id".to_string(), self.candidate_id.into());
        payload.insert("filename".to_string(), self.filename.into());
        payload.insert("original_text".to_string(), self.original_text.into());
        if let Some(translated) = self.translated_text {
            payload.insert("translated_text".to_string(), translated.into());
        }
        payload.insert("language".to_string(), self.language.into());
        payload.insert("timestamp".to_string(), self.timestamp.into());
        payload
    }

    pub(crate) fn from_qdrant(payload: &HashMap<String, Value>) -> Option<Self> {
        let text = |key: &str| payload.get(key).and_then(|v| v.as_str()).map(|s| s.to_string());

        Some(Self {
            candidate_id: text("candidate_id")?,
            filename: text("filename").unwrap_or_default(),
            original_text: text("original_text").unwrap_or_default(),
            translated_text: text("translated_text"),
            language: text("language").unwrap_or_else(|| crate::constants::DEFAULT_LANGUAGE.to_string()),
            timestamp: payload
                .get("timestamp")
                .and_then(|v| v.as_integer())
                .unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: CandidatePayload,
}

impl VectorPoint {
    /// Point for `candidate`; the id is derived from the candidate id so re-indexing the same
    /// candidate overwrites its point.
    pub fn for_candidate(candidate: &Candidate, vector: Vec<f32>, timestamp: i64) -> Self {
        Self {
            id: point_id(candidate.id().as_str()),
            vector,
            payload: CandidatePayload::from_candidate(candidate, timestamp),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: u64,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
    pub payload: CandidatePayload,
}

impl SearchResult {
    /// Converts a Qdrant hit. Points without a numeric id or a `candidate_id` are skipped.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        Some(SearchResult {
            id,
            score: point.score,
            payload: CandidatePayload::from_qdrant(&point.payload)?,
        })
    }
}
