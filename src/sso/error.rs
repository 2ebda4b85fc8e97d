use std::fmt;

#[derive(Debug)]
pub enum Error {
    Jwt(jsonwebtoken::errors::Error),
    WeakKey(usize),
    InvalidClaim(String),
    NonceMismatch,
    KeyNotFound(String),
    MalformedJwks(String),
    Fetch(reqwest::Error),
    Unavailable(String),
    Encoding(serde_urlencoded::ser::Error),
}

impl Error {
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Self::Jwt(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Unavailable(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "invalid token: {}", e),
            Self::WeakKey(bits) => write!(f, "signing key too weak ({} bits)", bits),
            Self::InvalidClaim(claim) => write!(f, "invalid claim: {}", claim),
            Self::NonceMismatch => {
                write!(f, "nonce does not match request forgery protection token")
            }
            Self::KeyNotFound(kid) => write!(f, "Error finding key for kid: {}", kid),
            Self::MalformedJwks(reason) => {
                write!(f, "JSON web keys malformed response: {}", reason)
            }
            Self::Fetch(e) => write!(f, "failed to fetch JSON web keys: {}", e),
            Self::Unavailable(reason) => write!(f, "key service unavailable: {}", reason),
            Self::Encoding(e) => write!(f, "failed to encode query: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::MalformedJwks(e.to_string())
        } else {
            Self::Fetch(e)
        }
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        Self::Encoding(e)
    }
}
