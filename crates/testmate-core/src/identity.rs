//! Where the current user's identity comes from. Authentication itself is
//! handled elsewhere; these sources only report its outcome.

use crate::error::{Result, TestmateError};

#[async_trait::async_trait]
pub trait IdentitySource: Send + Sync {
    async fn current_identity(&self) -> Result<String>;
}

/// An identity that was established up front, e.g. by a CLI flag or a
/// trusted request header.
#[derive(Debug, Clone)]
pub struct FixedIdentity(String);

impl FixedIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }
}

#[async_trait::async_trait]
impl IdentitySource for FixedIdentity {
    async fn current_identity(&self) -> Result<String> {
        let identity = self.0.trim();
        if identity.is_empty() {
            return Err(TestmateError::AuthenticationUnavailable(
                "empty identity".into(),
            ));
        }
        Ok(identity.to_string())
    }
}

/// Reads the identity from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvIdentity {
    var: String,
}

impl EnvIdentity {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvIdentity {
    fn default() -> Self {
        Self::new(crate::constants::defaults::IDENTITY_ENV)
    }
}

#[async_trait::async_trait]
impl IdentitySource for EnvIdentity {
    async fn current_identity(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(TestmateError::AuthenticationUnavailable(format!(
                "{} is not set",
                self.var
            ))),
        }
    }
}
