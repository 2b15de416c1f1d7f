use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token handed out by a [`CredentialProvider`](super::CredentialProvider).
///
/// # Example
/// ```
/// use foundry_agents::auth::AccessToken;
///
/// let token = AccessToken::new("secret");
/// assert!(!token.is_expired());
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token with no known expiry.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| exp <= Utc::now())
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"..")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn token_without_expiry_never_expires() {
        assert!(!AccessToken::new("t").is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = AccessToken::new("t").with_expiry(Utc::now() - Duration::minutes(1));
        assert!(token.is_expired());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", AccessToken::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
