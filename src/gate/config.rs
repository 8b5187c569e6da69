use axum::http::HeaderName;

use crate::credential::TokenSecret;
use crate::error::Error;

const DEFAULT_LEGACY_HEADER: HeaderName = HeaderName::from_static("x-actor-name");

/// Access gate configuration.
///
/// The verification secret is the one required field — a constructor
/// parameter, never defaulted. Use [`from_env()`](GateConfig::from_env) for
/// convention-based setup, or [`new()`](GateConfig::new) with `with_*`
/// methods for full control.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub(super) secret: TokenSecret,
    pub(super) legacy_header: HeaderName,
}

impl GateConfig {
    /// Create a gate config with the required verification secret.
    #[must_use]
    pub fn new(secret: TokenSecret) -> Self {
        Self {
            secret,
            legacy_header: DEFAULT_LEGACY_HEADER,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `TALLER_TOKEN_SECRET`: credential verification secret
    ///
    /// # Optional env vars
    /// - `TALLER_LEGACY_HEADER`: compatibility header name (default `x-actor-name`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the secret is missing or the header name
    /// is invalid.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new(TokenSecret::from_env()?);

        if let Ok(name) = std::env::var("TALLER_LEGACY_HEADER") {
            let header = name
                .parse::<HeaderName>()
                .map_err(|e| Error::Config(format!("TALLER_LEGACY_HEADER: {e}")))?;
            config = config.with_legacy_header(header);
        }

        Ok(config)
    }

    /// Override the compatibility header name.
    #[must_use]
    pub fn with_legacy_header(mut self, name: HeaderName) -> Self {
        self.legacy_header = name;
        self
    }
}
