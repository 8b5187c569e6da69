//! Per-request access gate for Axum.
//!
//! One terminal decision per inbound request: resolve an actor identity from
//! the `Authorization: Bearer` credential, fall back to the deprecated
//! compatibility header only when no credential is presented at all, or
//! reject with a structured `401`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use taller_access::gate::{Actor, GateConfig};
//!
//! let config = GateConfig::from_env()?;
//!
//! async fn handler(Actor(identity): Actor) -> String {
//!     format!("hola, {}", identity.username)
//! }
//!
//! let app = axum::Router::new()
//!     .route("/api/ordenes", axum::routing::get(handler))
//!     .with_state(config);
//! ```

mod config;
mod error;
mod extractor;

pub use config::GateConfig;
pub use error::GateError;
pub use extractor::{Actor, legacy_identity};
