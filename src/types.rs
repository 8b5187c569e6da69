use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Numeric identifier of a portal user.
///
/// Assigned by the identity backend; the compatibility path resolves actors
/// by name only and carries no id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct IdentityId(pub i64);

/// Actor role, parsed once at the trust boundary.
///
/// `Admin` is the only role that implies every capability; `Compat` is the
/// fixed minimal-trust role of the legacy header path and can never be
/// elevated. Everything else is carried verbatim as `Named` — named roles
/// grant nothing by themselves, capabilities come from the permission set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Compat,
    Named(String),
}

impl Role {
    /// The single "role implies all capabilities" rule. True only for `Admin`;
    /// every other gate decision goes through the permission set.
    #[must_use]
    pub fn implies_all_capabilities(&self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Compat => "compat",
            Self::Named(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "compat" => Self::Compat,
            _ => Self::Named(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Named(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved identity of the actor behind one request.
///
/// Owned by the request lifecycle that produced it — never persisted, never
/// shared across requests. The credential path fills `id`; the compatibility
/// path leaves it `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorIdentity {
    pub id: Option<IdentityId>,
    pub username: String,
    pub role: Role,
}

impl ActorIdentity {
    /// Identity for the legacy compatibility path. Role is always `Compat`.
    #[must_use]
    pub fn compat(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            role: Role::Compat,
        }
    }
}
