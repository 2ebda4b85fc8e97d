use std::sync::{Arc, RwLock};

use tracing::{event, Level};

use crate::core::config::AuthConfig;
use crate::core::models::User;
use crate::core::types::IdToken;
use crate::sso::{error::Error, jwks::KeyStore, verify::TokenVerifier};

use super::{AuthClient, ClientError};

impl From<Error> for ClientError {
    fn from(error: Error) -> Self {
        if error.is_expired() {
            Self::Expired
        } else if error.is_transient() {
            Self::Transient(error.to_string())
        } else {
            Self::Invalid(error.to_string())
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct CognitoIdClaims {
    sub: String,
    exp: u64,
    token_use: String,
    #[serde(rename = "cognito:username")]
    username: Option<String>,
}

/// ID token left behind by a completed hosted-UI login.
#[derive(Debug, Default)]
pub struct TokenCache {
    id_token: RwLock<Option<IdToken>>,
}

impl TokenCache {
    pub fn store(&self, token: IdToken) {
        if let Ok(mut slot) = self.id_token.write() {
            *slot = Some(token);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.id_token.write() {
            *slot = None;
        }
    }

    pub fn current(&self) -> Option<IdToken> {
        self.id_token.read().ok().and_then(|t| t.clone())
    }
}

/// Answers "who is signed in" from the cached ID token of a Cognito user pool.
#[derive(Debug)]
pub struct CognitoClient {
    config: RwLock<Option<AuthConfig>>,
    tokens: TokenCache,
    keys: Arc<KeyStore>,
}

impl CognitoClient {
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self {
            config: RwLock::new(None),
            tokens: TokenCache::default(),
            keys,
        }
    }

    pub fn with_id_token(self, token: Option<IdToken>) -> Self {
        if let Some(token) = token {
            self.tokens.store(token);
        }
        self
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    fn current_config(&self) -> Option<AuthConfig> {
        self.config.read().ok().and_then(|c| c.clone())
    }
}

#[async_trait::async_trait]
impl AuthClient for CognitoClient {
    fn configure(&self, config: &AuthConfig) {
        if let Ok(mut slot) = self.config.write() {
            *slot = Some(config.clone());
        }
    }

    #[tracing::instrument(skip(self))]
    async fn current_authenticated_user(&self) -> Result<User, ClientError> {
        let config = self.current_config().ok_or(ClientError::NotConfigured)?;
        let token = self.tokens.current().ok_or(ClientError::NoSession)?;

        // A session ends at `exp`; no clock skew allowance.
        let verifier =
            TokenVerifier::new(Arc::clone(&self.keys), config.jwks_url()).with_leeway(0);
        let claims: CognitoIdClaims = verifier
            .verify(token.as_ref(), &config.issuer(), &config.client_id.0)
            .await?;

        if claims.token_use != "id" {
            return Err(ClientError::Invalid(format!(
                "expected an id token, got {}",
                claims.token_use
            )));
        }

        event!(Level::DEBUG, sub = %claims.sub, "Cached session is valid");
        Ok(User {
            username: claims.username.unwrap_or_else(|| claims.sub.clone()),
            subject: claims.sub,
            expires_at: claims.exp,
        })
    }
}
