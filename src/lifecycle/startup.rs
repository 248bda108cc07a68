//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the database named by the configuration
//! - Create and seed tables before any request is served
//!
//! # Design Decisions
//! - Fail fast: a store that cannot be initialized aborts startup
//! - Listeners start last (traffic only when the store is ready)

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::rotation::{Palette, RotationEngine, RotationMode};
use crate::store::{SqliteStore, StorageError};

/// Startup failure.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("palette is empty")]
    EmptyPalette,

    #[error("failed to prepare color store at {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: StorageError,
    },
}

/// Open the configured SQLite store and return an initialized engine.
pub fn open_engine(config: &ServiceConfig) -> Result<RotationEngine, StartupError> {
    let palette: Palette = config.palette().ok_or(StartupError::EmptyPalette)?;
    let store_err = |source| StartupError::Store {
        path: config.store.path.display().to_string(),
        source,
    };

    let store = SqliteStore::open(&config.store).map_err(store_err)?;
    let engine = RotationEngine::new(
        Arc::new(store),
        palette,
        RotationMode::from_atomic(config.rotation.atomic),
    );
    engine.initialize().map_err(store_err)?;

    tracing::info!(
        path = %config.store.path.display(),
        atomic = config.rotation.atomic,
        "Color store ready"
    );
    Ok(engine)
}
