use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::config::GateConfig;
use super::error::GateError;
use crate::credential::verify_credential;
use crate::types::ActorIdentity;

/// Actor identity resolved for the current request.
///
/// Use as an Axum extractor in route handlers; the gate decision is terminal
/// in every branch:
///
/// 1. `Authorization` header present → the credential must verify. Any
///    failure rejects with `401 invalid credential` — a malformed or expired
///    credential is not "absent", so the compatibility path is unreachable.
/// 2. Otherwise, a non-empty compatibility header resolves a `compat` actor.
/// 3. Otherwise, `401 not authenticated`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(Actor(identity): Actor) -> impl IntoResponse {
///     format!("hola, {} ({})", identity.username, identity.role)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Actor(pub ActorIdentity);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
    GateConfig: FromRef<S>,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = GateConfig::from_ref(state);

        // A present Authorization header commits the request to the
        // credential path; its failure never reaches the legacy branch.
        if let Some(value) = parts.headers.get(AUTHORIZATION) {
            let token = value
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    GateError::InvalidCredential("malformed Authorization header".into())
                })?;

            let identity = verify_credential(&config.secret, token).map_err(|e| {
                tracing::warn!(error = %e, "credential verification failed");
                GateError::from(e)
            })?;
            return Ok(Self(identity));
        }

        if let Some(value) = parts.headers.get(&config.legacy_header)
            && let Some(identity) = value.to_str().ok().and_then(legacy_identity)
        {
            return Ok(Self(identity));
        }

        Err(GateError::Unauthenticated)
    }
}

/// Legacy identity adapter: a plain actor name resolves to a fixed-trust
/// `compat` identity. `None` for empty or whitespace-only input; no other
/// validation, and never any other role.
#[must_use]
pub fn legacy_identity(raw: &str) -> Option<ActorIdentity> {
    let name = raw.trim();
    if name.is_empty() {
        return None;
    }
    Some(ActorIdentity::compat(name))
}
