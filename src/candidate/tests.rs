use super::*;
use crate::reputation::{GithubStats, ReputationProfile};

fn candidate(text: &str) -> Candidate {
    Candidate::new(RawCandidate::new("resume.txt", text)).unwrap()
}

#[test]
fn test_effective_text_prefers_translation() {
    let raw = RawCandidate::new("cv.txt", "Ingeniero de software")
        .with_translation("Software engineer")
        .with_language("es");
    let candidate = Candidate::new(raw).unwrap();

    assert_eq!(candidate.effective_text(), "Software engineer");
    assert_eq!(candidate.original_text(), "Ingeniero de software");
    assert_eq!(candidate.language(), "es");
    assert!(candidate.is_translated());
}

#[test]
fn test_effective_text_falls_back_to_original() {
    let candidate = candidate("Rust developer");
    assert_eq!(candidate.effective_text(), "Rust developer");
    assert_eq!(candidate.translated_text(), None);
    assert_eq!(candidate.language(), "en");
    assert!(!candidate.is_translated());
}

#[test]
fn test_blank_translation_is_ignored() {
    let raw = RawCandidate::new("cv.txt", "Original").with_translation("  \n");
    let candidate = Candidate::new(raw).unwrap();
    assert_eq!(candidate.translated_text(), None);
    assert_eq!(candidate.effective_text(), "Original");
}

#[test]
fn test_translation_only_candidate_is_kept() {
    let raw = RawCandidate::new("scan.pdf", "").with_translation("Translated body");
    let candidate = Candidate::new(raw).unwrap();
    assert_eq!(candidate.effective_text(), "Translated body");
}

#[test]
fn test_blank_candidate_is_rejected() {
    assert!(Candidate::new(RawCandidate::new("empty.txt", "   ")).is_none());
    assert!(Candidate::new(RawCandidate::new("empty.txt", "").with_translation("")).is_none());
}

#[test]
fn test_blank_language_defaults_to_english() {
    let raw = RawCandidate::new("cv.txt", "text").with_language(" ");
    assert_eq!(Candidate::new(raw).unwrap().language(), "en");
}

#[test]
fn test_candidate_ids_are_unique() {
    let a = candidate("same text");
    let b = candidate("same text");
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_with_id_keeps_identifier() {
    let id = CandidateId::from_string("fixed-id");
    let candidate = Candidate::with_id(id.clone(), RawCandidate::new("a.txt", "body")).unwrap();
    assert_eq!(candidate.id(), &id);
    assert_eq!(candidate.id().to_string(), "fixed-id");
}

#[test]
fn test_normalize_drops_empty_documents() {
    let batch = vec![
        RawCandidate::new("a.txt", "first"),
        RawCandidate::new("broken.pdf", ""),
        RawCandidate::new("c.txt", "third"),
    ];

    let candidates = normalize(batch).unwrap();

    let names: Vec<_> = candidates.iter().map(|c| c.filename()).collect();
    assert_eq!(names, vec!["a.txt", "c.txt"]);
}

#[test]
fn test_normalize_single_empty_document_is_empty_batch() {
    let result = normalize(vec![RawCandidate::new("blank.pdf", "")]);
    assert_eq!(result, Err(NormalizeError::EmptyBatch { submitted: 1 }));
}

#[test]
fn test_normalize_no_documents_is_empty_batch() {
    assert_eq!(
        normalize(Vec::new()),
        Err(NormalizeError::EmptyBatch { submitted: 0 })
    );
}

#[test]
fn test_stages_only_add_scores() {
    let scored = ScoredCandidate::retrieved(candidate("text"), 42.0);
    assert_eq!(scored.rerank_score(), None);
    assert_eq!(scored.reputation_score(), None);
    assert_eq!(scored.combined_score(), None);

    let reranked = scored.with_rerank_score(80.0).with_rerank_score(10.0);
    assert_eq!(reranked.rerank_score(), Some(80.0));
    assert_eq!(reranked.retrieval_score(), 42.0);

    let profile = ReputationProfile {
        github: GithubStats {
            public_repos: 10,
            followers: 0,
            total_stars: 0,
        },
        ..Default::default()
    };
    let enriched = reranked
        .with_reputation(profile)
        .with_reputation(ReputationProfile::default());
    assert_eq!(enriched.reputation_score(), Some(8.0));
    assert_eq!(enriched.rerank_score(), Some(80.0));
}

#[test]
fn test_fused_requires_all_sub_scores() {
    let partial = ScoredCandidate::retrieved(candidate("text"), 50.0).with_rerank_score(60.0);
    assert!(partial.clone().fused().is_none());
    assert_eq!(partial.recompute_combined(), None);

    let full = partial
        .with_reputation(ReputationProfile::default())
        .fused()
        .unwrap();
    // (50*0.3 + 60*0.7) * 0.7 + 0 * 0.3
    assert!((full.combined_score().unwrap() - 39.9).abs() < 1e-9);
}
