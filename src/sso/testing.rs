//! Fixed signing material for token verification tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use jsonwebtoken::{Algorithm, EncodingKey, Header};

use super::error::Error;
use super::jwks::{Jwk, JwkSet, JwksSource};

pub const TEST_KID: &str = "test-key";
pub const WEAK_KID: &str = "weak-key";

const TEST_KEY_PEM: &[u8] = include_bytes!("testdata/rsa2048.pem");

const TEST_N: &str = "wBNkM0_qhy-pnzCdLqI3kPUbKVcyfLZexm34YU-TEUe4-0LCEiZi3-UF9aVf3JgkNeZ_WiAVzf2WgjwiULaMeSkRGxy2W-4TQHZUuv9rk4GjpYML3h0yiVJUZdSadkA0HTYV9SmVfaPDY5xOpgZ60JyZouR-CJw0Xe5zArJy8dsTOIGsgFhtEQdSNXzGGIABzqrQEqrfzyam04vBUSF-rh3YG-qdogTzi--Y2ith5y-IUviflr3m39q-CRk7qpb6EMk8uWT5MVrp067NRBLg2xwK3RnR-qsYaRBb5yRtoCWMdtHN5UTd2_eOsYIIjtHN0mjLcwTX69MhwdlwdgQIpQ";
const WEAK_N: &str = "tE1wPjwDR5NFhS3s31jrLzQCu6nwMf58ajLA4MkPw6trq5jLedj5Bq3QC7K_wEmfhGsFc5t1hjx0xTftwRWzMaB4NN7fN7fsio4rmmH-4W8SJp0Zy_DbeGacqyPd0OAF4oczpuWkGdKPBItAl1iOg-Vv_itA9Cj705NQ2MlSwT0";
const E: &str = "AQAB";

pub fn sign(claims: &impl serde::Serialize, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(TEST_KEY_PEM).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

#[derive(Debug, Default)]
pub struct StaticJwks {
    fetches: AtomicUsize,
    unavailable: bool,
}

impl StaticJwks {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn key_set() -> JwkSet {
        let key = |kid: &str, n: &str| Jwk {
            kid: kid.to_string(),
            kty: "RSA".to_string(),
            alg: Some("RS256".to_string()),
            n: Some(n.to_string()),
            e: Some(E.to_string()),
        };
        JwkSet {
            keys: vec![key(TEST_KID, TEST_N), key(WEAK_KID, WEAK_N)],
        }
    }
}

#[async_trait::async_trait]
impl JwksSource for StaticJwks {
    async fn fetch(&self, _url: &str) -> Result<JwkSet, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Error::Unavailable("503 Service Unavailable".to_string()));
        }
        Ok(Self::key_set())
    }
}
