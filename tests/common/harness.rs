//! Spawns the HTTP server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use retention::gateway::{HandlerState, create_router_with_state};
use retention::lifecycle::{MockModelBackend, ModelCacheConfig, ModelCacheManager};
use retention::review::ReviewService;
use retention::schedule::{MemoryScheduleStore, ScheduleStore};

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    /// Serve from a backend whose downloads always fail.
    pub failing_model: bool,
    /// Load the model before accepting requests.
    pub warm: bool,
}

impl TestServerConfig {
    pub fn warm() -> Self {
        Self {
            warm: true,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing_model: true,
            ..Default::default()
        }
    }
}

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    pub service: ReviewService,
    pub store: Arc<MemoryScheduleStore>,
    _tmp: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let tmp = TempDir::new()?;

    let cache = if config.failing_model {
        let backend = MockModelBackend::new();
        backend.set_fail_download(true);
        let model_config = ModelCacheConfig {
            cache_dir: tmp.path().join("models"),
            ..Default::default()
        };
        ModelCacheManager::new(model_config, Arc::new(backend))
    } else {
        ModelCacheManager::from_config(ModelCacheConfig::stub(tmp.path().join("models")))
    };

    let store = Arc::new(MemoryScheduleStore::new());
    let service = ReviewService::new(
        Arc::new(cache),
        Arc::clone(&store) as Arc<dyn ScheduleStore>,
    );

    if config.warm {
        service
            .warm_model()
            .await
            .map_err(|e| anyhow::anyhow!("warm-up failed: {e}"))?;
    }

    let router = create_router_with_state(HandlerState::new(
        service.clone(),
        !config.failing_model,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        addr,
        handle,
        service,
        store,
        _tmp: tmp,
    })
}
