use tokio::sync::OnceCell;

use super::remote::{IdentityProvider, RemoteIdentity};
use super::storage::{StateStore, StoredIdentity, clear_client_state, keys};
use crate::permissions::PermissionSet;
use crate::types::{IdentityId, Role};

/// Unified identity of the logged-in user, regardless of source.
///
/// Populated by exactly one of two adapters — the remote identity response
/// or the local fallback blob — never merged. Consumers never branch on
/// which one it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub id: Option<IdentityId>,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub extra_permissions: PermissionSet,
}

/// Identity plus effective permissions for one page context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    identity: Option<SessionIdentity>,
    effective: PermissionSet,
}

impl SessionRecord {
    /// The logged-out record: no identity, no permissions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            identity: None,
            effective: PermissionSet::new(),
        }
    }

    /// Builds a record exclusively from a remote identity response.
    ///
    /// `None` when the response carries no username — the caller then falls
    /// back to local state instead of half-trusting the remote answer.
    fn from_remote(remote: &RemoteIdentity) -> Option<Self> {
        let usuario = remote.usuario.as_ref()?;
        let name = usuario.nombre.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            identity: Some(SessionIdentity {
                id: usuario.id.map(IdentityId),
                name: name.to_owned(),
                email: usuario.email.clone(),
                role: Role::from(remote.rol.clone().unwrap_or_default()),
                extra_permissions: remote.permisos_extras.iter().cloned().collect(),
            }),
            effective: remote.permisos_efectivos.iter().cloned().collect(),
        })
    }

    /// Builds a record exclusively from the local fallback blob.
    fn from_stored(stored: StoredIdentity) -> Self {
        Self {
            effective: stored.permisos_efectivos.iter().cloned().collect(),
            identity: Some(SessionIdentity {
                id: stored.id.map(IdentityId),
                name: stored.nombre,
                email: stored.email,
                role: Role::from(stored.rol.unwrap_or_default()),
                extra_permissions: stored.permisos_extras.into_iter().collect(),
            }),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn effective_permissions(&self) -> &PermissionSet {
        &self.effective
    }

    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.effective.contains(name)
    }

    /// An empty permission set does not mean logged out; only a missing
    /// identity does.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Page-scoped session state with an explicit `init`/`read`/`reset` lifecycle.
///
/// Initialization is lazy, idempotent, and single-flight: N concurrent
/// callers trigger exactly one remote fetch, and once loaded the record is
/// never refetched within the same page context. A fresh page context (a new
/// `Session`) re-initializes from empty state.
pub struct Session<P, S> {
    provider: P,
    store: S,
    record: OnceCell<SessionRecord>,
}

impl<P: IdentityProvider, S: StateStore> Session<P, S> {
    #[must_use]
    pub fn new(provider: P, store: S) -> Self {
        Self {
            provider,
            store,
            record: OnceCell::new(),
        }
    }

    /// Resolves the session record, performing the work at most once.
    ///
    /// Never fails: remote faults degrade to the local fallback blob, and a
    /// missing or malformed fallback degrades to the empty record.
    pub async fn init(&self) -> &SessionRecord {
        self.record.get_or_init(|| self.resolve()).await
    }

    async fn resolve(&self) -> SessionRecord {
        match self.provider.fetch().await {
            Ok(Some(remote)) => {
                if let Some(record) = SessionRecord::from_remote(&remote) {
                    return record;
                }
                tracing::debug!("remote identity has no username, trying local fallback");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "remote identity fetch failed, trying local fallback");
            }
        }

        if let Some(raw) = self.store.get(keys::FALLBACK_IDENTITY) {
            match serde_json::from_str::<StoredIdentity>(&raw) {
                Ok(stored) => return SessionRecord::from_stored(stored),
                Err(e) => {
                    tracing::debug!(error = %e, "malformed local fallback identity, ignoring");
                }
            }
        }

        SessionRecord::empty()
    }

    /// The current record, if initialization has completed. Pure read.
    #[must_use]
    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.get()
    }

    /// Membership test against the effective permission set, initializing
    /// the session if needed.
    pub async fn has_permission(&self, name: &str) -> bool {
        self.init().await.has_permission(name)
    }

    /// Drops the loaded record so the next [`init`](Self::init) starts fresh.
    pub fn reset(&mut self) {
        self.record = OnceCell::new();
    }

    /// Logs out: best-effort server notification first, then clears every
    /// persisted client-state key and resets the in-memory record. Callers
    /// redirect to the login entry point afterwards, unconditionally.
    pub async fn logout(&mut self) {
        if let Err(e) = self.provider.notify_logout().await {
            tracing::warn!(error = %e, "logout notification failed");
        }
        clear_client_state(&self.store);
        self.reset();
    }
}
