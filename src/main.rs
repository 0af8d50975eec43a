//! Shortlist HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use shortlist::config::Config;
use shortlist::embedding::{lazy_encoder, lazy_reranker};
use shortlist::gateway::{HandlerState, ModelMode, create_router_with_state};
use shortlist::ranking::{IndexedPipeline, RankingPipeline};
use shortlist::reputation::ReputationEnricher;
use shortlist::storage::FileResultStore;
use shortlist::vectordb::QdrantClient;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Shortlist starting"
    );

    let encoder_mode = mode_for(config.encoder_path.is_some());
    let reranker_mode = mode_for(config.reranker_path.is_some());
    if encoder_mode == ModelMode::Stub {
        tracing::warn!("No SHORTLIST_ENCODER_PATH configured, running encoder in stub mode");
    }
    if reranker_mode == ModelMode::Stub {
        tracing::warn!("No SHORTLIST_RERANKER_PATH configured, running reranker in stub mode");
    }

    let encoder = Arc::new(lazy_encoder(config.encoder_config()));
    let reranker = Arc::new(lazy_reranker(config.reranker_config()));
    let enricher = Arc::new(ReputationEnricher::from_config(&config.reputation_config())?);
    let pipeline = RankingPipeline::new(encoder, reranker, enricher);

    let mut state: HandlerState<QdrantClient> = HandlerState::new(pipeline.clone())
        .with_model_modes(encoder_mode, reranker_mode);

    if let Some(url) = config.qdrant_url.as_deref() {
        let client = QdrantClient::new(url)?;
        let indexed = IndexedPipeline::new(pipeline, client, config.collection.clone());
        match indexed.ensure_collection().await {
            Ok(()) => tracing::info!(collection = %config.collection, "Vector index ready"),
            Err(e) => tracing::warn!(error = %e, "Vector index not ready yet, will retry on use"),
        }
        state = state.with_indexed(indexed);
    } else {
        tracing::info!("No SHORTLIST_QDRANT_URL configured, indexed ranking disabled");
    }

    match config.results_path.as_ref() {
        Some(path) => match FileResultStore::open(path) {
            Ok(store) => {
                tracing::info!(path = %path.display(), "Result store ready");
                state = state.with_store(Arc::new(store));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Result store unavailable, history disabled");
            }
        },
        None => tracing::info!("Result store disabled"),
    }

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shortlist shutdown complete");
    Ok(())
}

fn mode_for(has_model: bool) -> ModelMode {
    if has_model {
        ModelMode::Real
    } else {
        ModelMode::Stub
    }
}

fn run_health_check() -> i32 {
    let port = std::env::var("SHORTLIST_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
