use thiserror::Error;

/// Failures surfaced by the conversion core. Settings problems are not
/// errors; they are collected as `settings::FieldError` values so the host
/// can show all of them at once.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller passed a value that earlier validation should have rejected,
    /// such as an unsupported engine set or a malformed bucket name at
    /// URL-build time.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The synthesis or storage service reported a failure. Propagated
    /// verbatim; no retries happen at this layer.
    #[error("Upstream service error: {0}")]
    Upstream(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn upstream(err: impl Into<anyhow::Error>) -> Self {
        Self::Upstream(err.into())
    }
}
