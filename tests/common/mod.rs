//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use color_rotator::rotation::{ColorCount, Rotation};
use color_rotator::store::{ColorStore, StorageError, StorageResult};
use color_rotator::{
    HttpServer, Palette, RotationEngine, RotationMode, ServiceConfig, Shutdown, SqliteStore,
};

pub const TWO_COLORS: [&str; 2] = ["#FF5733", "#33FF57"];

/// Engine over a fresh in-memory database.
pub fn memory_engine(palette: Palette, mode: RotationMode) -> RotationEngine {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    engine_over(store, palette, mode)
}

/// Engine over `store`, initialized.
pub fn engine_over(
    store: Arc<dyn ColorStore>,
    palette: Palette,
    mode: RotationMode,
) -> RotationEngine {
    let engine = RotationEngine::new(store, palette, mode);
    engine.initialize().unwrap();
    engine
}

pub fn router_for(engine: RotationEngine) -> Router {
    router_with(ServiceConfig::default(), engine)
}

pub fn router_with(config: ServiceConfig, engine: RotationEngine) -> Router {
    HttpServer::new(config, engine).router()
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

/// Start a real server on an ephemeral port.
pub async fn spawn_server(engine: RotationEngine) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(ServiceConfig::default(), engine);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}

/// Which store call [`FaultyStore`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Everything,
    Increment,
    /// Stall stats reads and atomic rotations, then succeed.
    Slow(Duration),
}

/// SQLite store that fails or stalls one kind of call on demand.
pub struct FaultyStore {
    pub inner: SqliteStore,
    pub fault: Fault,
}

impl FaultyStore {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: SqliteStore::in_memory().unwrap(),
            fault,
        }
    }

    fn fail_all(&self) -> StorageResult<()> {
        if self.fault == Fault::Everything {
            Err(StorageError::Task("injected failure".into()))
        } else {
            Ok(())
        }
    }

    fn stall(&self) {
        if let Fault::Slow(delay) = self.fault {
            std::thread::sleep(delay);
        }
    }
}

impl ColorStore for FaultyStore {
    fn initialize(&self, palette: &Palette) -> StorageResult<()> {
        self.inner.initialize(palette)
    }

    fn cursor(&self) -> StorageResult<usize> {
        self.fail_all()?;
        self.inner.cursor()
    }

    fn set_cursor(&self, index: usize) -> StorageResult<()> {
        self.fail_all()?;
        self.inner.set_cursor(index)
    }

    fn increment_count(&self, color: &str) -> StorageResult<()> {
        self.fail_all()?;
        if self.fault == Fault::Increment {
            return Err(StorageError::UnknownColor(color.to_string()));
        }
        self.inner.increment_count(color)
    }

    fn list_counts(&self) -> StorageResult<Vec<ColorCount>> {
        self.fail_all()?;
        self.stall();
        self.inner.list_counts()
    }

    fn rotate_atomic(&self, palette: &Palette) -> StorageResult<Rotation> {
        self.fail_all()?;
        self.stall();
        self.inner.rotate_atomic(palette)
    }
}
