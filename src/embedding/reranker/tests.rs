use super::*;
use std::path::PathBuf;

#[test]
fn test_config_default_is_stub() {
    let config = RerankerConfig::default();
    assert!(config.model_path.is_none());
    assert_eq!(config.max_seq_len, MAX_SEQ_LEN);
}

#[test]
fn test_config_new() {
    let config = RerankerConfig::new("/models/ms-marco-minilm");
    assert_eq!(
        config.model_path,
        Some(PathBuf::from("/models/ms-marco-minilm"))
    );
}

#[test]
fn test_config_validate() {
    assert!(RerankerConfig::default().validate().is_ok());
    assert!(RerankerConfig::new("").validate().is_err());

    let zero_len = RerankerConfig {
        max_seq_len: 0,
        ..Default::default()
    };
    assert!(zero_len.validate().is_err());
}

#[test]
fn test_load_invalid_config() {
    let result = Reranker::load(RerankerConfig::new(""));
    assert!(matches!(result, Err(RerankerError::InvalidConfig { .. })));
}

#[test]
fn test_load_with_missing_model() {
    let result = Reranker::load(RerankerConfig::new("/nonexistent/cross-encoder"));
    assert!(matches!(result, Err(RerankerError::ModelNotFound { .. })));
}

#[test]
fn test_stub_creation() {
    let reranker = Reranker::stub().unwrap();
    assert!(!reranker.is_model_loaded());
}

#[test]
fn test_sigmoid_bounds() {
    assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
    assert!(sigmoid(12.0) > 0.99);
    assert!(sigmoid(-12.0) < 0.01);
}

#[test]
fn test_stub_score_in_unit_range() {
    let reranker = Reranker::stub().unwrap();
    for (q, c) in [
        ("senior backend engineer", "backend engineer, senior"),
        ("senior backend engineer", "florist"),
        ("", "anything"),
        ("rust", ""),
    ] {
        let score = reranker.score(q, c).unwrap();
        assert!((0.0..=1.0).contains(&score), "{score} for ({q}, {c})");
    }
}

#[test]
fn test_stub_full_overlap_scores_higher() {
    let reranker = Reranker::stub().unwrap();
    let query = "senior backend engineer rust";
    let strong = reranker
        .score(query, "Senior backend engineer. Rust, Go, Postgres.")
        .unwrap();
    let weak = reranker.score(query, "Junior frontend developer").unwrap();
    let none = reranker.score(query, "Pastry chef").unwrap();

    assert!(strong > weak);
    assert!(weak >= none);
    assert_eq!(none, 0.0);
}

#[test]
fn test_stub_ignores_stop_words() {
    let reranker = Reranker::stub().unwrap();
    assert_eq!(reranker.score("the and of", "the and of").unwrap(), 0.0);
}

#[test]
fn test_stub_is_deterministic() {
    let reranker = Reranker::stub().unwrap();
    let a = reranker.score("rust engineer", "rust developer").unwrap();
    let b = reranker.score("rust engineer", "rust developer").unwrap();
    assert_eq!(a, b);
}
