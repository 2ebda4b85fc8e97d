use std::sync::Arc;

use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey};
use moka::future::Cache;
use tracing::{event, Level};

use super::constants::KEY_LRU_CACHE_SIZE;
use super::error::Error;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    pub alg: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

impl Jwk {
    pub fn algorithm(&self) -> Result<Algorithm, Error> {
        let alg = self
            .alg
            .as_deref()
            .ok_or_else(|| Error::MalformedJwks(format!("key {} has no alg", self.kid)))?;
        alg.parse().map_err(Error::from)
    }

    fn components(&self) -> Result<(&str, &str), Error> {
        if self.kty != "RSA" {
            return Err(Error::MalformedJwks(format!(
                "key {} has unsupported type {}",
                self.kid, self.kty
            )));
        }
        match (self.n.as_deref(), self.e.as_deref()) {
            (Some(n), Some(e)) => Ok((n, e)),
            _ => Err(Error::MalformedJwks(format!(
                "key {} is missing RSA components",
                self.kid
            ))),
        }
    }

    /// Size of the RSA modulus in bits.
    pub fn key_bits(&self) -> Result<usize, Error> {
        let (n, _) = self.components()?;
        let modulus = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(n.trim_end_matches('='))
            .map_err(|e| Error::MalformedJwks(e.to_string()))?;
        let significant: Vec<u8> = modulus.into_iter().skip_while(|b| *b == 0).collect();
        match significant.first() {
            Some(first) => Ok((significant.len() - 1) * 8 + (8 - first.leading_zeros() as usize)),
            None => Ok(0),
        }
    }

    pub fn decoding_key(&self) -> Result<DecodingKey, Error> {
        let (n, e) = self.components()?;
        DecodingKey::from_rsa_components(n, e).map_err(Error::from)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}

#[async_trait::async_trait]
pub trait JwksSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<JwkSet, Error>;
}

#[derive(Debug, Default)]
pub struct HttpJwksSource {
    client: reqwest::Client,
}

#[async_trait::async_trait]
impl JwksSource for HttpJwksSource {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<JwkSet, Error> {
        event!(Level::DEBUG, "Fetching JSON web keys");
        let response = self.client.get(url).send().await?;
        if response.status().is_server_error() {
            return Err(Error::Unavailable(response.status().to_string()));
        }
        let keys = response.error_for_status()?.json::<JwkSet>().await?;
        Ok(keys)
    }
}

/// Public keys by `(kid, jwks url)`, fetched on a miss.
pub struct KeyStore {
    source: Arc<dyn JwksSource>,
    cache: Cache<(String, String), Jwk>,
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyStore {{ ... }}")
    }
}

impl KeyStore {
    pub fn new(source: Arc<dyn JwksSource>) -> Self {
        Self {
            source,
            cache: Cache::new(KEY_LRU_CACHE_SIZE),
        }
    }

    pub fn over_http() -> Self {
        Self::new(Arc::new(HttpJwksSource::default()))
    }

    pub async fn get_key(&self, kid: &str, jwks_url: &str) -> Result<Jwk, Error> {
        let cache_key = (kid.to_string(), jwks_url.to_string());
        if let Some(jwk) = self.cache.get(&cache_key).await {
            return Ok(jwk);
        }

        let keys = self.source.fetch(jwks_url).await?;
        let jwk = keys
            .find(kid)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(kid.to_string()))?;
        self.cache.insert(cache_key, jwk.clone()).await;
        Ok(jwk)
    }
}
