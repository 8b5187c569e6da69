#![doc = include_str!("../README.md")]

pub mod credential;
pub mod error;
#[cfg(feature = "gate")]
pub mod gate;
pub mod permissions;
#[cfg(feature = "session")]
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use credential::{Claims, TokenSecret, verify_credential};
pub use error::Error;
#[cfg(feature = "gate")]
pub use gate::{Actor, GateConfig, GateError, legacy_identity};
pub use permissions::{ADMIN_PERMISSIONS, PermissionSet, is_admin};
#[cfg(feature = "session")]
pub use session::{
    GuardOutcome, HttpIdentityProvider, IdentityProvider, MenuEntry, MemoryStore, RouteGuard,
    Session, SessionIdentity, SessionRecord, StateStore, compose,
};
pub use types::{ActorIdentity, IdentityId, Role};
