use super::types::IdToken;

/// A user with a live session at the hosted identity provider.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct User {
    pub username: String,
    pub subject: String,
    pub expires_at: u64,
}

/// Identity attached to a request that made it through the SSO interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user: String,
    pub id_token: Option<IdToken>,
    pub expires_at: u64,
}
