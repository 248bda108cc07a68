//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional) via loader.rs
//!     → environment (PORT, COLOR_ROTATOR_DB, COLOR_ROTATOR_LOG)
//!     → command-line flags
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the palette never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, resolve_config_with, ConfigError, ConfigOverrides};
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RotationConfig;
pub use schema::ServiceConfig;
pub use schema::StoreConfig;
pub use schema::TimeoutConfig;
