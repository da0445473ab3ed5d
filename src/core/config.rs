use std::path::PathBuf;

use super::error::PublishError;

/// Name of the environment variable holding the private vault root.
pub const PRIVATE_VAULT_VAR: &str = "SB";
/// Name of the environment variable holding the public vault root.
pub const PUBLIC_VAULT_VAR: &str = "SB_PUB";

/// Resolved vault roots, built once at startup and threaded through the
/// pipeline. Values are taken verbatim: no normalization, no existence check.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub private_root: PathBuf,
    pub public_root: PathBuf,
}

impl PublishConfig {
    /// Read both vault roots from the environment. A variable that is unset
    /// or set to an empty string is a fatal configuration error.
    pub fn from_env() -> Result<Self, PublishError> {
        let private_root = read_path_var(PRIVATE_VAULT_VAR)?;
        let public_root = read_path_var(PUBLIC_VAULT_VAR)?;

        Ok(Self {
            private_root,
            public_root,
        })
    }

    pub fn new(private_root: impl Into<PathBuf>, public_root: impl Into<PathBuf>) -> Self {
        Self {
            private_root: private_root.into(),
            public_root: public_root.into(),
        }
    }
}

fn read_path_var(name: &'static str) -> Result<PathBuf, PublishError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => Err(PublishError::MissingConfig(name)),
    }
}
