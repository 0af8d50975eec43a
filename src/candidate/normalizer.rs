use tracing::{debug, warn};

use super::error::NormalizeError;
use super::types::{Candidate, RawCandidate};

/// Resolves raw extractions into [`Candidate`]s.
///
/// Documents without usable text are dropped and logged; the batch only fails when nothing
/// survives.
pub fn normalize(raw: Vec<RawCandidate>) -> Result<Vec<Candidate>, NormalizeError> {
    let submitted = raw.len();

    let candidates: Vec<Candidate> = raw
        .into_iter()
        .filter_map(|raw| {
            let filename = raw.filename.clone();
            let candidate = Candidate::new(raw);
            if candidate.is_none() {
                warn!(filename = %filename, "Could not extract text, skipping document");
            }
            candidate
        })
        .collect();

    if candidates.is_empty() {
        return Err(NormalizeError::EmptyBatch { submitted });
    }

    debug!(
        submitted,
        kept = candidates.len(),
        dropped = submitted - candidates.len(),
        "Normalized candidate batch"
    );

    Ok(candidates)
}
