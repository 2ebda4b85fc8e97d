use crate::core::types::{Nonce, RfpToken};

/// Nonce bound into the authentication request for a forgery protection token.
pub fn nonce_for(rfp: &RfpToken) -> Nonce {
    use sha2::Digest;

    let digest = sha2::Sha256::digest(&rfp.0);
    Nonce(hex::encode(digest))
}
