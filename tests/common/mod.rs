//! Test server harness.

#![allow(dead_code)]

use shortlist::embedding::{EncoderConfig, RerankerConfig, lazy_encoder, lazy_reranker};
use shortlist::gateway::{HandlerState, create_router_with_state};
use shortlist::ranking::{IndexedPipeline, RankingPipeline};
use shortlist::reputation::ReputationEnricher;
use shortlist::storage::FileResultStore;
use shortlist::vectordb::MockVectorDbClient;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
pub const TEST_COLLECTION_NAME: &str = "shortlist_test_resumes";

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub with_store: bool,
    pub with_index: bool,
    pub results_path: Option<PathBuf>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            with_store: true,
            with_index: true,
            results_path: None,
        }
    }
}

impl TestServerConfig {
    pub fn without_store(mut self) -> Self {
        self.with_store = false;
        self
    }

    pub fn without_index(mut self) -> Self {
        self.with_index = false;
        self
    }

    pub fn results_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_path = Some(path.into());
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url(), path.trim_start_matches('/'))
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

pub fn stub_pipeline() -> RankingPipeline {
    RankingPipeline::new(
        Arc::new(lazy_encoder(EncoderConfig::stub())),
        Arc::new(lazy_reranker(RerankerConfig::stub())),
        Arc::new(ReputationEnricher::disabled()),
    )
}

/// Spawns a server on an ephemeral port with stub models, no reputation sources,
/// an in-memory vector index and a file result store in a temp dir.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let mut state: HandlerState<MockVectorDbClient> = HandlerState::new(stub_pipeline());

    let mut _temp_dir = None;
    if config.with_store {
        let path = match config.results_path {
            Some(path) => path,
            None => {
                let dir = TempDir::new()?;
                let path = dir.path().join("results");
                _temp_dir = Some(dir);
                path
            }
        };
        let store = FileResultStore::open(path)
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
        state = state.with_store(Arc::new(store));
    }

    if config.with_index {
        let indexed = IndexedPipeline::new(
            stub_pipeline(),
            MockVectorDbClient::new(),
            TEST_COLLECTION_NAME,
        );
        indexed
            .ensure_collection()
            .await
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
        state = state.with_indexed(indexed);
    }

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir,
    })
}

pub fn resume_json(filename: &str, text: &str) -> serde_json::Value {
    serde_json::json!({ "filename": filename, "text": text })
}

pub fn resume_batch(n: usize) -> Vec<serde_json::Value> {
    (0..n)
        .map(|i| {
            resume_json(
                &format!("resume_{i:02}.txt"),
                &format!("backend engineer {i} years rust tokio axum postgres"),
            )
        })
        .collect()
}
