//! Library-level flows: pipeline, vector index and result history wired together.

mod common;

use std::sync::Arc;

use shortlist::candidate::{Query, RawCandidate};
use shortlist::embedding::{MockEmbeddingProvider, MockReranker};
use shortlist::ranking::{IndexedPipeline, RankingPipeline, combined_score};
use shortlist::reputation::{
    GithubStats, LeetcodeStats, LookupContext, MockReputationSource, ReputationConfig,
    ReputationEnricher, ReputationSignal, ReputationSource, SourceKind,
};
use shortlist::storage::{FileResultStore, InMemoryResultStore, ResultStore};
use shortlist::vectordb::MockVectorDbClient;
use tempfile::TempDir;

const JOB: &str = "distributed systems engineer";

fn resumes() -> Vec<RawCandidate> {
    vec![
        RawCandidate::new("ana.txt", "Ana github.com/ana-dev consensus raft"),
        RawCandidate::new("ben.txt", "Ben leetcode.com/benlc kafka streams"),
        RawCandidate::new("cy.txt", "Cy frontend react"),
    ]
}

fn unit_at(cos: f32) -> Vec<f32> {
    vec![cos, (1.0 - cos * cos).max(0.0).sqrt()]
}

fn models() -> (MockEmbeddingProvider, MockReranker) {
    let texts: Vec<String> = resumes().into_iter().map(|r| r.original_text).collect();
    let encoder = MockEmbeddingProvider::new()
        .with_vector(JOB, vec![1.0, 0.0])
        .with_vector(&texts[0], unit_at(0.9))
        .with_vector(&texts[1], unit_at(0.7))
        .with_vector(&texts[2], unit_at(0.2));
    let reranker = MockReranker::new(0.1)
        .with_score(&texts[0], 0.6)
        .with_score(&texts[1], 0.8);
    (encoder, reranker)
}

fn enricher() -> ReputationEnricher {
    let sources: Vec<Arc<dyn ReputationSource>> = vec![
        Arc::new(MockReputationSource::new(SourceKind::Github).with_signal(
            "ana-dev",
            ReputationSignal::Github(GithubStats {
                public_repos: 10,
                followers: 30,
                total_stars: 40,
            }),
        )),
        Arc::new(MockReputationSource::new(SourceKind::Leetcode).with_signal(
            "benlc",
            ReputationSignal::Leetcode(LeetcodeStats { total_solved: 300 }),
        )),
    ];
    ReputationEnricher::new(sources, &ReputationConfig::default())
}

fn pipeline() -> RankingPipeline {
    let (encoder, reranker) = models();
    RankingPipeline::new(Arc::new(encoder), Arc::new(reranker), Arc::new(enricher()))
}

fn filenames(ranking: &[shortlist::ScoredCandidate]) -> Vec<&str> {
    ranking.iter().map(|c| c.candidate().filename()).collect()
}

#[tokio::test]
async fn test_batch_ranking_with_reputation() {
    let result = pipeline()
        .rank(&Query::new(JOB), resumes(), &LookupContext::default())
        .await
        .unwrap();

    assert_eq!(result.total_processed, 3);
    assert_eq!(
        filenames(&result.retrieval_ranking),
        vec!["ana.txt", "ben.txt", "cy.txt"]
    );
    assert_eq!(
        filenames(&result.rerank_ranking),
        vec!["ben.txt", "ana.txt", "cy.txt"]
    );

    // github: 10*2 + 30 + 40*0.5 = 70 -> 0.4 * 70 = 28
    // leetcode: 300*0.5 capped at 100 -> 0.4 * 100 = 40
    let ana = result
        .final_ranking
        .iter()
        .find(|c| c.candidate().filename() == "ana.txt")
        .unwrap();
    assert!((ana.reputation_score().unwrap() - 28.0).abs() < 1e-9);
    let ben = result
        .final_ranking
        .iter()
        .find(|c| c.candidate().filename() == "ben.txt")
        .unwrap();
    assert!((ben.reputation_score().unwrap() - 40.0).abs() < 1e-9);

    for c in &result.final_ranking {
        let expected = combined_score(
            c.retrieval_score(),
            c.rerank_score().unwrap(),
            c.reputation_score().unwrap(),
        );
        assert!((c.combined_score().unwrap() - expected).abs() < 1e-9);
    }
    assert_eq!(
        filenames(&result.final_ranking),
        vec!["ben.txt", "ana.txt", "cy.txt"]
    );
}

#[tokio::test]
async fn test_results_persist_across_store_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history");

    let result = pipeline()
        .rank(&Query::new(JOB), resumes(), &LookupContext::default())
        .await
        .unwrap();

    {
        let store = FileResultStore::open(&path).unwrap();
        store.append(&result).unwrap();
    }

    let reopened = FileResultStore::open(&path).unwrap();
    let history = reopened.recent(10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, result.id);
    assert_eq!(history[0].query, JOB);
    assert_eq!(
        filenames(&history[0].final_ranking),
        filenames(&result.final_ranking)
    );
    assert_eq!(
        history[0].final_ranking[0].combined_score(),
        result.final_ranking[0].combined_score()
    );
}

#[tokio::test]
async fn test_stores_agree_on_ordering() {
    let dir = TempDir::new().unwrap();
    let file_store = FileResultStore::open(dir.path()).unwrap();
    let memory_store = InMemoryResultStore::new();
    let pipeline = pipeline();

    for _ in 0..3 {
        let result = pipeline
            .rank(&Query::new(JOB), resumes(), &LookupContext::default())
            .await
            .unwrap();
        file_store.append(&result).unwrap();
        memory_store.append(&result).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let from_file: Vec<String> = file_store
        .recent(2)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    let from_memory: Vec<String> = memory_store
        .recent(2)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(from_file, from_memory);
}

#[tokio::test]
async fn test_indexed_flow_matches_batch_flow() {
    let batch = pipeline()
        .rank(&Query::new(JOB), resumes(), &LookupContext::default())
        .await
        .unwrap();

    let indexed = IndexedPipeline::new(pipeline(), MockVectorDbClient::new(), "it_resumes");
    let ids = indexed.index(resumes()).await.unwrap();
    assert_eq!(ids.len(), 3);
    assert_eq!(indexed.client().point_count("it_resumes"), Some(3));

    let from_index = indexed
        .rank(&Query::new(JOB), &LookupContext::default())
        .await
        .unwrap();

    assert_eq!(from_index.total_processed, 3);
    assert_eq!(
        filenames(&from_index.final_ranking),
        filenames(&batch.final_ranking)
    );
    for (a, b) in from_index.final_ranking.iter().zip(&batch.final_ranking) {
        assert!((a.combined_score().unwrap() - b.combined_score().unwrap()).abs() < 1e-3);
    }
}

#[tokio::test]
async fn test_github_token_reaches_sources() {
    let github = Arc::new(MockReputationSource::new(SourceKind::Github));
    let sources: Vec<Arc<dyn ReputationSource>> = vec![github.clone()];
    let enricher = ReputationEnricher::new(sources, &ReputationConfig::default());
    let (encoder, reranker) = models();
    let pipeline = RankingPipeline::new(Arc::new(encoder), Arc::new(reranker), Arc::new(enricher));

    pipeline
        .rank(
            &Query::new(JOB),
            resumes(),
            &LookupContext::with_github_token(Some("ghp_request".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(github.call_count(), 1);
    assert_eq!(github.last_token().as_deref(), Some("ghp_request"));
}

#[tokio::test]
async fn test_stub_models_rank_any_batch() {
    let pipeline = common::stub_pipeline();
    let raw: Vec<RawCandidate> = (0..30)
        .map(|i| RawCandidate::new(format!("r{i}.txt"), format!("engineer number {i} rust")))
        .collect();

    let result = pipeline
        .rank(&Query::new("rust engineer"), raw, &LookupContext::default())
        .await
        .unwrap();

    assert_eq!(result.total_processed, 30);
    assert_eq!(result.retrieval_ranking.len(), 30);
    assert_eq!(result.rerank_ranking.len(), 20);
    assert_eq!(result.final_ranking.len(), 10);
}
