use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Permission names treated as equivalent to the administrative role.
///
/// Holding any of these gates the same surface as `Role::Admin` does.
pub const ADMIN_PERMISSIONS: &[&str] = &["usuarios.admin", "roles.admin", "configuracion.admin"];

/// De-duplicated, unordered collection of capability names an actor holds.
///
/// An empty set means "no gated capability", not "unauthenticated" — an
/// authenticated user can hold zero permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns `true` if the name was not already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether this set intersects the [`ADMIN_PERMISSIONS`] allow-list.
    #[must_use]
    pub fn grants_admin(&self) -> bool {
        ADMIN_PERMISSIONS.iter().any(|p| self.0.contains(*p))
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The admin predicate: role implies all capabilities, or the effective set
/// intersects the administrative allow-list. This is the only place the
/// predicate lives.
#[must_use]
pub fn is_admin(role: &Role, permissions: &PermissionSet) -> bool {
    role.implies_all_capabilities() || permissions.grants_admin()
}
