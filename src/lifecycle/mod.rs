//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Open + seed store → Start listener
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM or Shutdown::trigger → Stop accepting → Drain → Exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{open_engine, StartupError};
