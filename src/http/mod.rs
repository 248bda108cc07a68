//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → handlers.rs (exact path + GET match, else 404)
//!     → rotation engine on the blocking pool
//!     → response.rs (error mapping) + cors.rs (headers on every response)
//!     → Send to client
//! ```

pub mod cors;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
