use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{ActorIdentity, IdentityId, Role};

/// Server-held secret for credential signature verification.
///
/// Mandatory configuration with no fallback value: construction fails on an
/// empty secret, and [`from_env`](TokenSecret::from_env) fails when the
/// variable is unset. Process startup is the right place to fail, not the
/// first rejected request.
#[derive(Clone)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, Error> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(Error::Config("token secret must not be empty".into()));
        }
        Ok(Self(secret))
    }

    /// Reads the secret from `TALLER_TOKEN_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self, Error> {
        let secret = std::env::var("TALLER_TOKEN_SECRET")
            .map_err(|_| Error::Config("TALLER_TOKEN_SECRET is required".into()))?;
        Self::new(secret)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.0.as_bytes())
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Signed payload embedded in every credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (`identityId` of the issuer).
    pub sub: i64,
    pub username: String,
    pub role: String,
    /// Issued-at, Unix seconds. Start of the validity window.
    pub iat: u64,
    /// Expiry, Unix seconds. End of the validity window (exclusive).
    pub exp: u64,
}

/// Verifies a credential string and resolves the actor it identifies.
///
/// Signature check against the server-held secret, then a strict
/// `iat <= now < exp` window check. Stateless, no side effects.
///
/// # Errors
///
/// Returns [`Error::InvalidCredential`] on any signature, format, or
/// time-window failure. Callers treat this as "absent credential" for
/// fallback purposes but must surface the rejection distinctly.
pub fn verify_credential(secret: &TokenSecret, token: &str) -> Result<ActorIdentity, Error> {
    verify_credential_at(secret, token, unix_now())
}

pub(crate) fn verify_credential_at(
    secret: &TokenSecret,
    token: &str,
    now: u64,
) -> Result<ActorIdentity, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    // The window check below is strict [iat, exp) with no leeway; the
    // library's built-in exp check is disabled so both bounds live in one place.
    validation.validate_exp = false;

    let data = jsonwebtoken::decode::<Claims>(token, &secret.decoding_key(), &validation)
        .map_err(|e| Error::InvalidCredential(e.to_string()))?;
    let claims = data.claims;

    if now < claims.iat {
        return Err(Error::InvalidCredential("credential not yet valid".into()));
    }
    if now >= claims.exp {
        return Err(Error::InvalidCredential("credential expired".into()));
    }

    Ok(ActorIdentity {
        id: Some(IdentityId(claims.sub)),
        username: claims.username,
        role: Role::from(claims.role),
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn secret() -> TokenSecret {
        TokenSecret::new("unit-test-secret").unwrap()
    }

    fn sign(claims: &Claims, key: &str) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        Claims {
            sub: 7,
            username: "ana".into(),
            role: "tecnico".into(),
            iat: NOW - 60,
            exp: NOW + 3600,
        }
    }

    #[test]
    fn valid_credential_resolves_exact_payload() {
        let token = sign(&valid_claims(), "unit-test-secret");
        let identity = verify_credential_at(&secret(), &token, NOW).unwrap();
        assert_eq!(identity.id, Some(IdentityId(7)));
        assert_eq!(identity.username, "ana");
        assert_eq!(identity.role, Role::Named("tecnico".into()));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(&valid_claims(), "some-other-secret");
        let err = verify_credential_at(&secret(), &token, NOW).unwrap_err();
        assert!(matches!(err, Error::InvalidCredential(_)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = sign(&valid_claims(), "unit-test-secret");
        // Flip a character in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let payload = &mut parts[1];
        let flipped = if payload.ends_with('A') { "B" } else { "A" };
        payload.replace_range(payload.len() - 1.., flipped);
        let tampered = parts.join(".");

        let err = verify_credential_at(&secret(), &tampered, NOW).unwrap_err();
        assert!(matches!(err, Error::InvalidCredential(_)));
    }

    #[test]
    fn expired_credential_is_rejected() {
        let mut claims = valid_claims();
        claims.exp = NOW - 1;
        let token = sign(&claims, "unit-test-secret");
        let err = verify_credential_at(&secret(), &token, NOW).unwrap_err();
        assert!(matches!(err, Error::InvalidCredential(_)));
    }

    #[test]
    fn expiry_bound_is_exclusive() {
        let mut claims = valid_claims();
        claims.exp = NOW;
        let token = sign(&claims, "unit-test-secret");
        assert!(verify_credential_at(&secret(), &token, NOW).is_err());
        assert!(verify_credential_at(&secret(), &token, NOW - 1).is_ok());
    }

    #[test]
    fn not_yet_valid_credential_is_rejected() {
        let mut claims = valid_claims();
        claims.iat = NOW + 10;
        let token = sign(&claims, "unit-test-secret");
        let err = verify_credential_at(&secret(), &token, NOW).unwrap_err();
        assert!(matches!(err, Error::InvalidCredential(_)));
        // iat itself is inside the window.
        claims.iat = NOW;
        let token = sign(&claims, "unit-test-secret");
        assert!(verify_credential_at(&secret(), &token, NOW).is_ok());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = verify_credential_at(&secret(), "not-a-token", NOW).unwrap_err();
        assert!(matches!(err, Error::InvalidCredential(_)));
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(matches!(TokenSecret::new(""), Err(Error::Config(_))));
    }

    #[test]
    fn admin_role_parses_from_claims() {
        let mut claims = valid_claims();
        claims.role = "admin".into();
        let token = sign(&claims, "unit-test-secret");
        let identity = verify_credential_at(&secret(), &token, NOW).unwrap();
        assert_eq!(identity.role, Role::Admin);
    }
}
