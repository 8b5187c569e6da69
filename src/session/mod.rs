//! Client-side session bootstrap and permission-gated UI composition.
//!
//! A page context owns one [`Session`]: a lazily-initialized record holding
//! the resolved identity and its effective permission set. Initialization is
//! single-flight — concurrent callers share one remote fetch — and never
//! throws into the rendering path: fetch faults degrade to the local
//! fallback record, then to an empty (logged-out) session.
//!
//! [`RouteGuard`] is the synchronous page-entry gate. It reads persisted
//! client state directly rather than waiting on the session's async
//! initialization, so the allow/redirect decision is available before any
//! content renders.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use taller_access::session::{HttpIdentityProvider, MemoryStore, RouteGuard, Session, compose};
//!
//! let store = std::sync::Arc::new(MemoryStore::new());
//! let provider = HttpIdentityProvider::new(base_url, store.clone());
//! let session = Session::new(provider, store.clone());
//!
//! match RouteGuard::new(store.as_ref()).check("/usuarios", true) {
//!     GuardOutcome::Allow => { /* render */ }
//!     outcome => { /* redirect */ }
//! }
//!
//! let record = session.init().await;
//! let visible: Vec<_> = compose(&menu, record.effective_permissions()).collect();
//! ```

mod guard;
mod menu;
mod remote;
mod storage;
mod store;

pub use guard::{GuardOutcome, RouteGuard, take_intended_destination};
pub use menu::{MenuEntry, compose};
pub use remote::{HttpIdentityProvider, IdentityProvider, RemoteIdentity, RemoteUser};
pub use storage::{MemoryStore, StateStore, StoredIdentity, clear_client_state, keys};
pub use store::{Session, SessionIdentity, SessionRecord};
