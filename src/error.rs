#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Signature or time-window verification failed. Equivalent to "absent
    /// credential" for fallback purposes, but surfaced distinctly to callers.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    #[error("configuration error: {0}")]
    Config(String),
}
