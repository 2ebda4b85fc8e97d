use std::sync::Arc;

use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use tracing::{event, Level};

use super::constants::{CLOCK_SKEW_THRESHOLD_SECS, MIN_RSA_KEY_BITS};
use super::error::Error;
use super::jwks::KeyStore;

/// Checks RS-signed tokens against keys published at a JWKS url.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: Arc<KeyStore>,
    jwks_url: String,
    leeway: u64,
}

impl TokenVerifier {
    pub fn new(keys: Arc<KeyStore>, jwks_url: String) -> Self {
        Self {
            keys,
            jwks_url,
            leeway: CLOCK_SKEW_THRESHOLD_SECS,
        }
    }

    pub fn with_leeway(self, leeway: u64) -> Self {
        Self { leeway, ..self }
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn verify<C>(&self, token: &str, issuer: &str, audience: &str) -> Result<C, Error>
    where
        C: DeserializeOwned,
    {
        let header = jsonwebtoken::decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| Error::InvalidClaim("token header has no kid".to_string()))?;
        let jwk = self.keys.get_key(&kid, &self.jwks_url).await?;

        let bits = jwk.key_bits()?;
        if bits < MIN_RSA_KEY_BITS {
            return Err(Error::WeakKey(bits));
        }

        let mut validation = Validation::new(jwk.algorithm()?);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let data = jsonwebtoken::decode::<C>(token, &jwk.decoding_key()?, &validation)?;
        event!(Level::DEBUG, kid = %kid, "Token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sso::testing::{now, sign, StaticJwks, TEST_KID, WEAK_KID};

    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Claims {
        sub: String,
        iss: String,
        aud: String,
        exp: u64,
    }

    fn verifier() -> TokenVerifier {
        let keys = Arc::new(KeyStore::new(Arc::new(StaticJwks::default())));
        TokenVerifier::new(keys, "https://idp.example.com/jwks".to_string())
    }

    fn claims(exp: u64) -> Claims {
        Claims {
            sub: "alice".to_string(),
            iss: "https://idp.example.com".to_string(),
            aud: "client".to_string(),
            exp,
        }
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let token = sign(&claims(now() + 600), TEST_KID);
        let verified: Claims = verifier()
            .verify(&token, "https://idp.example.com", "client")
            .await
            .unwrap();
        assert_eq!(verified.sub, "alice");
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let token = sign(&claims(now() + 600), TEST_KID);
        let result = verifier()
            .verify::<Claims>(&token, "https://idp.example.com", "other")
            .await;
        assert!(matches!(result, Err(Error::Jwt(_))));
    }

    #[tokio::test]
    async fn rejects_wrong_issuer() {
        let token = sign(&claims(now() + 600), TEST_KID);
        let result = verifier()
            .verify::<Claims>(&token, "https://elsewhere.example.com", "client")
            .await;
        assert!(matches!(result, Err(Error::Jwt(_))));
    }

    #[tokio::test]
    async fn expiry_honours_clock_skew() {
        let token = sign(&claims(now() - 60), TEST_KID);
        let within_skew = verifier()
            .verify::<Claims>(&token, "https://idp.example.com", "client")
            .await;
        assert!(within_skew.is_ok());

        let result = verifier()
            .with_leeway(0)
            .verify::<Claims>(&token, "https://idp.example.com", "client")
            .await;
        assert!(matches!(result, Err(ref e) if e.is_expired()));
    }

    #[tokio::test]
    async fn rejects_tokens_not_yet_valid() {
        let token = sign(
            &serde_json::json!({
                "sub": "alice",
                "iss": "https://idp.example.com",
                "aud": "client",
                "exp": now() + 7200,
                "nbf": now() + 3600,
            }),
            TEST_KID,
        );
        let result = verifier()
            .verify::<Claims>(&token, "https://idp.example.com", "client")
            .await;
        assert!(matches!(
            result,
            Err(Error::Jwt(ref e))
                if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ImmatureSignature)
        ));
    }

    #[tokio::test]
    async fn rejects_weak_keys() {
        let token = sign(&claims(now() + 600), WEAK_KID);
        let result = verifier()
            .verify::<Claims>(&token, "https://idp.example.com", "client")
            .await;
        assert!(matches!(result, Err(Error::WeakKey(1024))));
    }
}
