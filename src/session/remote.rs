use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use super::storage::{StateStore, keys};

/// `usuario` object in the remote identity response.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Remote identity response shape (field names are the wire contract).
///
/// Adapted into [`SessionIdentity`](super::SessionIdentity) at the boundary;
/// downstream consumers never branch on where an identity came from.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteIdentity {
    #[serde(default)]
    pub usuario: Option<RemoteUser>,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub permisos_efectivos: Vec<String>,
    #[serde(default)]
    pub permisos_extras: Vec<String>,
}

/// Consumer-provided remote identity lookup.
///
/// `Ok(None)` is the authoritative "no session" answer (a non-success
/// response); `Err` is a transient fault the session store degrades through
/// without surfacing.
pub trait IdentityProvider: Send + Sync {
    fn fetch(
        &self,
    ) -> impl Future<Output = Result<Option<RemoteIdentity>, Box<dyn std::error::Error + Send + Sync>>>
    + Send;

    /// Best-effort logout notification; failures are logged and ignored.
    fn notify_logout(
        &self,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send {
        async { Ok(()) }
    }
}

/// [`IdentityProvider`] backed by the identity HTTP API.
///
/// Sends a credentialed `GET <base>/auth/me`; the bearer credential and an
/// optional base-URL override come from persisted client state at call time.
pub struct HttpIdentityProvider<S> {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<S>,
}

impl<S: StateStore> HttpIdentityProvider<S> {
    #[must_use]
    pub fn new(base_url: Url, store: Arc<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            store,
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    fn effective_base(&self) -> Url {
        self.store
            .get(keys::BASE_URL_OVERRIDE)
            .and_then(|raw| raw.parse::<Url>().ok())
            .unwrap_or_else(|| self.base_url.clone())
    }

    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn std::error::Error + Send + Sync>> {
        self.effective_base().join(path).map_err(Into::into)
    }

    fn credential(&self) -> Option<String> {
        self.store
            .get(keys::CREDENTIAL)
            .or_else(|| self.store.get(keys::LEGACY_CREDENTIAL))
    }
}

impl<S: StateStore> IdentityProvider for HttpIdentityProvider<S> {
    async fn fetch(
        &self,
    ) -> Result<Option<RemoteIdentity>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(token) = self.credential() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(self.endpoint("auth/me")?)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "no remote session");
            return Ok(None);
        }

        let identity = response.json::<RemoteIdentity>().await?;
        Ok(Some(identity))
    }

    async fn notify_logout(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(token) = self.credential() else {
            return Ok(());
        };

        self.http
            .post(self.endpoint("auth/logout")?)
            .bearer_auth(&token)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStore;

    fn provider(store: Arc<MemoryStore>) -> HttpIdentityProvider<MemoryStore> {
        HttpIdentityProvider::new("https://api.taller.example/".parse().unwrap(), store)
    }

    #[test]
    fn base_url_override_takes_precedence() {
        let store = Arc::new(MemoryStore::new());
        let p = provider(store.clone());
        assert_eq!(p.effective_base().as_str(), "https://api.taller.example/");

        store.set(keys::BASE_URL_OVERRIDE, "https://staging.taller.example/");
        assert_eq!(
            p.effective_base().as_str(),
            "https://staging.taller.example/"
        );
    }

    #[test]
    fn malformed_override_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::BASE_URL_OVERRIDE, "not a url");
        let p = provider(store);
        assert_eq!(p.effective_base().as_str(), "https://api.taller.example/");
    }

    #[test]
    fn legacy_credential_is_a_fallback_for_the_fetch() {
        let store = Arc::new(MemoryStore::new());
        let p = provider(store.clone());
        assert_eq!(p.credential(), None);

        store.set(keys::LEGACY_CREDENTIAL, "legado");
        assert_eq!(p.credential().as_deref(), Some("legado"));

        store.set(keys::CREDENTIAL, "firmado");
        assert_eq!(p.credential().as_deref(), Some("firmado"));
    }

    #[tokio::test]
    async fn fetch_without_credential_is_no_session() {
        let store = Arc::new(MemoryStore::new());
        let p = provider(store);
        // No credential stored: resolves without touching the network.
        let result = p.fetch().await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn remote_identity_parses_wire_shape() {
        let json = r#"{
            "usuario": {"id": 1, "nombre": "Ana", "email": "ana@taller.example"},
            "rol": "admin",
            "permisos_efectivos": ["usuarios.admin"],
            "permisos_extras": []
        }"#;
        let identity: RemoteIdentity = serde_json::from_str(json).unwrap();
        let usuario = identity.usuario.unwrap();
        assert_eq!(usuario.nombre.as_deref(), Some("Ana"));
        assert_eq!(identity.rol.as_deref(), Some("admin"));
        assert_eq!(identity.permisos_efectivos, vec!["usuarios.admin"]);
    }

    #[test]
    fn remote_identity_tolerates_missing_fields() {
        let identity: RemoteIdentity = serde_json::from_str("{}").unwrap();
        assert!(identity.usuario.is_none());
        assert!(identity.permisos_efectivos.is_empty());
    }
}
