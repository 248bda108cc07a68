//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → sqlite.rs (open database file, apply busy timeout)
//!     → ColorStore::initialize (create tables, seed cursor + counts)
//!
//! per request
//!     → rotation engine issues cursor/count operations
//!     → ColorStore (serialized access to the single connection)
//! ```
//!
//! # Design Decisions
//! - The store is a trait object injected into the HTTP state, never a global
//! - Every failure is a [`StorageError`]; callers never see driver types
//! - Seeding uses insert-or-ignore so restarts keep existing values

pub mod sqlite;

use thiserror::Error;

use crate::rotation::types::{ColorCount, Palette, Rotation};

pub use sqlite::SqliteStore;

/// Errors raised by the persistence layer.
///
/// All variants surface to clients identically; the variant only matters
/// for logs.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite call failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The cursor row (id = 1) does not exist.
    #[error("Rotation cursor row is missing")]
    MissingCursor,

    /// The persisted cursor holds a negative value.
    #[error("Rotation cursor holds invalid value {0}")]
    InvalidCursor(i64),

    /// No visit-count row exists for the color.
    #[error("No visit-count row for color {0}")]
    UnknownColor(String),

    /// A thread panicked while holding the connection.
    #[error("Store connection lock poisoned")]
    Poisoned,

    /// The blocking task running a store call failed.
    #[error("Store task failed: {0}")]
    Task(String),
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable storage for the rotation cursor and the visit-count table.
///
/// Implementations must be safe to share across request handlers. Individual
/// calls are blocking and are expected to run on the blocking thread pool.
pub trait ColorStore: Send + Sync {
    /// Create tables and seed missing rows. Idempotent.
    fn initialize(&self, palette: &Palette) -> StorageResult<()>;

    /// Current rotation cursor.
    fn cursor(&self) -> StorageResult<usize>;

    /// Overwrite the rotation cursor.
    fn set_cursor(&self, index: usize) -> StorageResult<()>;

    /// Add one to `color`'s visit count.
    fn increment_count(&self, color: &str) -> StorageResult<()>;

    /// All visit-count rows in store order.
    fn list_counts(&self) -> StorageResult<Vec<ColorCount>>;

    /// Run the whole rotation (read cursor, advance it, count the served
    /// color, read the table) as one unit that either fully commits or
    /// leaves no trace, and that never interleaves with another rotation.
    fn rotate_atomic(&self, palette: &Palette) -> StorageResult<Rotation>;
}
