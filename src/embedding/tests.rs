use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

mod lazy_tests {
    use super::*;

    fn counting_loader(
        loads: Arc<AtomicUsize>,
        fail_first: usize,
    ) -> impl Fn() -> Result<SentenceEncoder, EmbeddingError> + Send + Sync + 'static {
        move || {
            let n = loads.fetch_add(1, Ordering::SeqCst);
            if n < fail_first {
                return Err(EmbeddingError::ModelLoadFailed {
                    reason: format!("attempt {n} failed"),
                });
            }
            SentenceEncoder::stub()
        }
    }

    #[test]
    fn test_not_loaded_until_first_use() {
        let loads = Arc::new(AtomicUsize::new(0));
        let lazy = LazyModel::new("encoder", counting_loader(loads.clone(), 0));

        assert!(!lazy.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 0);

        lazy.encode("rust").unwrap();
        assert!(lazy.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_loads_once_across_calls() {
        let loads = Arc::new(AtomicUsize::new(0));
        let lazy = LazyModel::new("encoder", counting_loader(loads.clone(), 0));

        let first = lazy.get().unwrap();
        let second = lazy.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_loads_once_across_threads() {
        let loads = Arc::new(AtomicUsize::new(0));
        let lazy = LazyModel::new("encoder", counting_loader(loads.clone(), 0));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    lazy.encode("concurrent").unwrap();
                });
            }
        });

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let loads = Arc::new(AtomicUsize::new(0));
        let lazy = LazyModel::new("encoder", counting_loader(loads.clone(), 1));

        assert!(matches!(
            lazy.encode("first"),
            Err(EmbeddingError::ModelLoadFailed { .. })
        ));
        assert!(!lazy.is_loaded());

        assert!(lazy.encode("second").is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_reports_load_state() {
        let lazy = LazyModel::new("encoder", counting_loader(Arc::new(AtomicUsize::new(0)), 0));
        assert_eq!(
            format!("{:?}", lazy),
            "LazyModel { name: \"encoder\", loaded: false }"
        );

        lazy.encode("rust").unwrap();
        assert!(format!("{:?}", lazy).contains("loaded: true"));
    }

    #[test]
    fn test_try_dimension_reports_load_failure() {
        let loads = Arc::new(AtomicUsize::new(0));
        let lazy = LazyModel::new("encoder", counting_loader(loads.clone(), usize::MAX));

        assert!(matches!(
            lazy.try_dimension(),
            Err(EmbeddingError::ModelLoadFailed { .. })
        ));
        assert!(!lazy.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_dimension_after_load() {
        let lazy = LazyModel::new("encoder", counting_loader(Arc::new(AtomicUsize::new(0)), 0));
        assert_eq!(lazy.try_dimension().unwrap(), ENCODER_EMBEDDING_DIM);
    }

    #[test]
    fn test_lazy_reranker_failure_is_unavailable() {
        let lazy: LazyReranker = lazy_reranker(RerankerConfig::new("/nonexistent/reranker"));

        let result = lazy.score("query", "candidate");
        assert!(matches!(result, Err(RerankerError::NotAvailable { .. })));
        assert!(!lazy.is_loaded());
    }

    #[test]
    fn test_lazy_stub_handles() {
        let encoder = lazy_encoder(EncoderConfig::stub());
        let reranker = lazy_reranker(RerankerConfig::stub());

        assert_eq!(encoder.dimension(), ENCODER_EMBEDDING_DIM);
        assert!((0.0..=1.0).contains(&reranker.score("rust", "rust").unwrap()));
        assert_eq!(encoder.name(), "encoder");
        assert_eq!(reranker.name(), "reranker");
    }
}

mod similarity_tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v = vec![0.3, -0.2, 0.9];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}

mod mock_tests {
    use super::*;

    #[test]
    fn test_mock_provider_pinned_vectors() {
        let provider = MockEmbeddingProvider::new().with_vector("query", vec![1.0, 0.0]);
        assert_eq!(provider.encode("query").unwrap(), vec![1.0, 0.0]);
        assert_eq!(provider.dimension(), 2);
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_failing() {
        let provider = MockEmbeddingProvider::failing();
        assert!(provider.encode("anything").is_err());
    }

    #[test]
    fn test_mock_reranker_scores_and_failures() {
        let reranker = MockReranker::new(0.5)
            .with_score("good", 0.9)
            .failing_for("bad");

        assert_eq!(reranker.score("q", "good").unwrap(), 0.9);
        assert_eq!(reranker.score("q", "other").unwrap(), 0.5);
        assert!(reranker.score("q", "bad").is_err());
        assert!(MockReranker::unavailable().score("q", "good").is_err());
        assert_eq!(reranker.call_count(), 3);
    }
}

mod classification_head_tests {
    use std::collections::HashMap;

    use candle_core::{DType, Device, Tensor};
    use candle_nn::VarBuilder;

    use crate::embedding::bert::ClassificationHead;

    fn weights(with_pooler: bool) -> HashMap<String, Tensor> {
        let device = Device::Cpu;
        let mut tensors = HashMap::new();
        tensors.insert(
            "classifier.weight".to_string(),
            Tensor::new(&[[1.0f32, 1.0]], &device).unwrap(),
        );
        tensors.insert(
            "classifier.bias".to_string(),
            Tensor::new(&[0.0f32], &device).unwrap(),
        );
        tensors.insert(
            "bert.embeddings.word_embeddings.weight".to_string(),
            Tensor::zeros((4, 2), DType::F32, &device).unwrap(),
        );
        if with_pooler {
            tensors.insert(
                "bert.pooler.dense.weight".to_string(),
                Tensor::new(&[[1.0f32, 0.0], [0.0, 1.0]], &device).unwrap(),
            );
            tensors.insert(
                "bert.pooler.dense.bias".to_string(),
                Tensor::new(&[0.0f32, 0.0], &device).unwrap(),
            );
        }
        tensors
    }

    /// `[1, 2, 2]` hidden states whose `[CLS]` row is `[0.5, 1.0]`.
    fn hidden_states() -> Tensor {
        Tensor::new(&[[[0.5f32, 1.0], [9.0, 9.0]]], &Device::Cpu).unwrap()
    }

    fn logit(head: &ClassificationHead) -> f32 {
        head.forward(&hidden_states())
            .unwrap()
            .flatten_all()
            .unwrap()
            .to_vec1::<f32>()
            .unwrap()[0]
    }

    #[test]
    fn test_pooler_applies_tanh_before_classifier() {
        let vb = VarBuilder::from_tensors(weights(true), DType::F32, &Device::Cpu);
        let head = ClassificationHead::load(&vb, 2).unwrap();

        let expected = 0.5f32.tanh() + 1.0f32.tanh();
        assert!((logit(&head) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_missing_pooler_scores_raw_cls() {
        let vb = VarBuilder::from_tensors(weights(false), DType::F32, &Device::Cpu);
        let head = ClassificationHead::load(&vb, 2).unwrap();

        assert!((logit(&head) - 1.5).abs() < 1e-5);
    }
}
