use std::{collections::HashSet, str::FromStr};

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Code,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
        }
    }
}

pub const EMAIL: &str = "email";
pub const OPENID: &str = "openid";
pub const PROFILE: &str = "profile";

/// Scopes the hosted login pages may be asked for.
pub const SUPPORTED_SCOPES: [&str; 3] = [EMAIL, OPENID, PROFILE];

/// Requested scopes, a subset of [`SUPPORTED_SCOPES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope(HashSet<String>);

impl Scope {
    /// Unsupported parts are dropped.
    pub fn from_parts(parts: &[&str]) -> Self {
        let set = parts
            .iter()
            .copied()
            .filter(|p| SUPPORTED_SCOPES.contains(p))
            .map(ToString::to_string)
            .collect();
        Self(set)
    }

    pub fn openid() -> Self {
        Self::from_parts(&[OPENID])
    }

    /// Space-joined, sorted so the result is stable across runs.
    pub fn as_joined(&self) -> String {
        self.as_parts().join(" ")
    }

    pub fn as_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = self.0.iter().cloned().collect();
        parts.sort();
        parts
    }

    /// Client configuration lists scopes as a JSON array.
    pub fn serialize_parts<S>(scope: &Scope, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        scope.as_parts().serialize(serializer)
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl FromStr for ClientId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct RedirectUri(pub String);

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Region(pub String);

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct UserPoolId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct IdentityPoolId(pub String);

/// Fully qualified host of the identity provider's hosted login pages.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct HostedDomain(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdToken(pub String);

impl AsRef<str> for IdToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Request forgery protection secret, carried hex-encoded in a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfpToken(pub Vec<u8>);

impl RfpToken {
    pub fn from_hex(s: &str) -> Option<Self> {
        match hex::decode(s) {
            Ok(bytes) if !bytes.is_empty() => Some(Self(bytes)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Nonce(pub String);
