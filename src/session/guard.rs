use super::storage::{StateStore, StoredIdentity, keys};
use crate::permissions::{PermissionSet, is_admin};
use crate::types::Role;

/// Terminal page-entry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Rendering may proceed.
    Allow,
    /// Not authenticated (or local state unreadable): the intended
    /// destination has been recorded, redirect to login.
    Login { redirect: String },
    /// Authenticated but lacking the required capability: show the notice,
    /// then redirect to the safe landing page. Never a silent no-op.
    Denied { notice: String, redirect: String },
}

/// Synchronous page-entry gate.
///
/// Runs before content renders, so it reads persisted client state directly
/// instead of waiting on [`Session`](super::Session)'s async initialization.
/// Fails closed: missing or malformed local state is "not authenticated",
/// never an allow.
pub struct RouteGuard<'a, S: StateStore> {
    store: &'a S,
    login_path: String,
    landing_path: String,
}

impl<'a, S: StateStore> RouteGuard<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            login_path: "/login".into(),
            landing_path: "/".into(),
        }
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_landing_path(mut self, path: impl Into<String>) -> Self {
        self.landing_path = path.into();
        self
    }

    /// Decides whether the page at `destination` (full path+query+fragment)
    /// may render. `admin_only` is the page-level declaration.
    #[must_use]
    pub fn check(&self, destination: &str, admin_only: bool) -> GuardOutcome {
        let credential = self
            .store
            .get(keys::CREDENTIAL)
            .or_else(|| self.store.get(keys::LEGACY_CREDENTIAL));
        let identity_raw = self.store.get(keys::IDENTITY);

        let (Some(_), Some(raw)) = (credential, identity_raw) else {
            return self.to_login(destination);
        };

        let stored = match serde_json::from_str::<StoredIdentity>(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "malformed stored identity, treating as logged out");
                return self.to_login(destination);
            }
        };

        if admin_only {
            let role = Role::from(stored.rol.unwrap_or_default());
            let permissions: PermissionSet = stored.permisos_efectivos.into_iter().collect();
            if !is_admin(&role, &permissions) {
                return GuardOutcome::Denied {
                    notice: "No tienes permisos para acceder a esta sección.".into(),
                    redirect: self.landing_path.clone(),
                };
            }
        }

        GuardOutcome::Allow
    }

    fn to_login(&self, destination: &str) -> GuardOutcome {
        self.store.set(keys::INTENDED_DESTINATION, destination);
        GuardOutcome::Login {
            redirect: format!(
                "{}?next={}",
                self.login_path,
                urlencoding::encode(destination)
            ),
        }
    }
}

/// Consumes the recorded post-login destination, if any.
#[must_use]
pub fn take_intended_destination<S: StateStore>(store: &S) -> Option<String> {
    let destination = store.get(keys::INTENDED_DESTINATION)?;
    store.remove(keys::INTENDED_DESTINATION);
    Some(destination)
}
