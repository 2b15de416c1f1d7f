//! Credential providers.
//!
//! Acquiring credentials is left to the caller: anything that can hand out a
//! bearer token implements [`CredentialProvider`].

pub mod token;

pub use token::AccessToken;

use async_trait::async_trait;

use crate::error::FoundryError;

/// Source of bearer tokens for the agent service.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a token valid for the next request.
    async fn token(&self) -> Result<AccessToken, FoundryError>;
}

/// Credential backed by a fixed token string.
#[derive(Debug, Clone)]
pub struct StaticCredential {
    token: AccessToken,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }

    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn token(&self) -> Result<AccessToken, FoundryError> {
        if self.token.token.trim().is_empty() {
            return Err(FoundryError::Authentication("Empty access token".into()));
        }
        if self.token.is_expired() {
            return Err(FoundryError::Authentication("Access token has expired".into()));
        }
        Ok(self.token.clone())
    }
}
