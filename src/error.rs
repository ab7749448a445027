use crate::env::{DeclarationError, EnvError};
use thiserror::Error;

/// Top-level error type for the named-env library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("invalid field declaration: {0}")]
    Declaration(#[from] DeclarationError),

    #[error("failed to deserialize resolved fields: {0}")]
    Deserialize(#[from] toml::de::Error),
}
