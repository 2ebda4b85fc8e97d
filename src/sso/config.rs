use std::str::FromStr;

use crate::core::types::ClientId;

use super::constants::{DEFAULT_FEDERATE_PROVIDER_HOST, DEFAULT_MIDWAY_PROVIDER_HOST};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
    Midway,
    Federate,
}

impl IdentityProvider {
    pub fn default_host(&self) -> &'static str {
        match self {
            Self::Midway => DEFAULT_MIDWAY_PROVIDER_HOST,
            Self::Federate => DEFAULT_FEDERATE_PROVIDER_HOST,
        }
    }

    fn jwks_url(&self, host: &str) -> String {
        match self {
            Self::Midway => format!("https://{}/jwks.json", host),
            Self::Federate => format!("https://{}/api/oauth2/v2/certs", host),
        }
    }

    fn auth_path(&self, host: &str) -> String {
        match self {
            Self::Midway => format!("https://{}/SSO", host),
            Self::Federate => format!("https://{}/api/oauth2/v1/authorize", host),
        }
    }

    fn auth_redirect_path(&self, host: &str) -> String {
        match self {
            Self::Midway => format!("https://{}/SSO/redirect", host),
            Self::Federate => format!("https://{}/api/oauth2/v1/authorize", host),
        }
    }
}

impl FromStr for IdentityProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "midway" => Ok(Self::Midway),
            "federate" => Ok(Self::Federate),
            other => Err(format!("Unknown identity provider kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorConfig {
    /// Endpoint handed to JavaScript clients.
    pub auth_path: String,
    /// Endpoint browsers are redirected to.
    pub auth_redirect_path: String,
    /// Expected audience. Derived from the request origin when absent.
    pub client_id: Option<ClientId>,
    pub identity_provider_host: String,
    pub jwks_url: String,
    /// Fixed callback path on the service host. When absent the current
    /// path and query are used.
    pub redirect_uri: Option<String>,
}

impl InterceptorConfig {
    pub fn for_provider(provider: IdentityProvider, host: Option<String>) -> Self {
        let host = host.unwrap_or_else(|| provider.default_host().to_string());
        Self {
            auth_path: provider.auth_path(&host),
            auth_redirect_path: provider.auth_redirect_path(&host),
            client_id: None,
            jwks_url: provider.jwks_url(&host),
            identity_provider_host: host,
            redirect_uri: None,
        }
    }

    pub fn with_client_id(self, client_id: Option<ClientId>) -> Self {
        Self { client_id, ..self }
    }

    pub fn with_redirect_uri(self, redirect_uri: Option<String>) -> Self {
        Self {
            redirect_uri,
            ..self
        }
    }

    pub fn issuer(&self) -> String {
        format!("https://{}", self.identity_provider_host)
    }
}
