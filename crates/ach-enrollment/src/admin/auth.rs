use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;

use crate::config::AdminConfig;

/// Opaque credential check. The core never assumes how secrets are stored.
pub trait CredentialCheck: Send + Sync {
    fn verify(&self, credential: &str) -> bool;
}

/// Compares credentials against one shared secret. With no secret configured every
/// credential is rejected.
#[derive(Clone, Default)]
pub struct SharedSecret {
    secret: Option<String>,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            secret: config.shared_secret.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

impl CredentialCheck for SharedSecret {
    fn verify(&self, credential: &str) -> bool {
        match &self.secret {
            Some(secret) if !credential.is_empty() => {
                bool::from(secret.as_bytes().ct_eq(credential.as_bytes()))
            }
            _ => false,
        }
    }
}

/// Extract the value of an `Authorization: Bearer <value>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
