use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Well-known keys in the persisted client state.
///
/// Shared by independent readers (route guard, session store, logout) with
/// no locking discipline: writes are atomic single-key replacements, and
/// readers treat a missing or malformed value as absent.
pub mod keys {
    /// Signed credential token.
    pub const CREDENTIAL: &str = "taller.token";
    /// Deprecated compatibility credential.
    pub const LEGACY_CREDENTIAL: &str = "taller.token.legado";
    /// Identity blob of the logged-in user ([`StoredIdentity`](super::StoredIdentity) shape).
    pub const IDENTITY: &str = "taller.identidad";
    /// Full path+query+fragment to return to after login.
    pub const INTENDED_DESTINATION: &str = "taller.destino";
    /// Local mock identity used when the remote fetch yields nothing.
    pub const FALLBACK_IDENTITY: &str = "taller.identidad.mock";
    /// Environment base-URL override for the identity API.
    pub const BASE_URL_OVERRIDE: &str = "taller.api_base";
    /// Elevated-UI toggle, written by the shell when an admin enables it.
    pub const ADMIN_MODE: &str = "taller.modo_admin";

    pub(crate) const ALL: &[&str] = &[
        CREDENTIAL,
        LEGACY_CREDENTIAL,
        IDENTITY,
        INTENDED_DESTINATION,
        FALLBACK_IDENTITY,
        BASE_URL_OVERRIDE,
        ADMIN_MODE,
    ];
}

/// Consumer-provided persisted client state (the browser-storage seam).
///
/// All operations are synchronous: the route guard runs before content
/// renders and must not suspend.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory [`StateStore`] for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("state lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("state lock")
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.values.lock().expect("state lock").remove(key);
    }
}

/// Identity blob persisted under [`keys::IDENTITY`] / [`keys::FALLBACK_IDENTITY`].
///
/// Field names are the storage contract (shared with the remote API's
/// vocabulary); consumers never read this shape directly — it is adapted
/// into [`SessionIdentity`](super::SessionIdentity) at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredIdentity {
    #[serde(default)]
    pub id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub permisos_efectivos: Vec<String>,
    #[serde(default)]
    pub permisos_extras: Vec<String>,
}

/// Clears every well-known client-state key.
///
/// Part of logout; callers redirect to the login entry point afterwards,
/// unconditionally.
pub fn clear_client_state<S: StateStore>(store: &S) {
    for key in keys::ALL {
        store.remove(key);
    }
    tracing::info!("client session state cleared");
}
