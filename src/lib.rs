//! Color rotation service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rotation;
pub mod store;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rotation::{Palette, RotationEngine, RotationMode};
pub use store::{ColorStore, SqliteStore, StorageError};
