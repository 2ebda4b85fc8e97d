use std::sync::Arc;

use tracing::{event, Level};

use crate::core::models::AuthenticatedUser;
use crate::core::types::{IdToken, RfpToken};
use crate::util::{hash::nonce_for, random::FromRandom};

use super::config::InterceptorConfig;
use super::constants::*;
use super::error::Error;
use super::jwks::KeyStore;
use super::request::{decode_state, encode_state, SsoRequest};
use super::response::{escape_html, SetCookie, SsoResponse};
use super::same_site::should_set_same_site_to_none;
use super::verify::TokenVerifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Answer the request with this response instead of the application.
    Intercept(SsoResponse),
    /// The user is authenticated; let the request through.
    Pass(AuthenticatedUser),
}

#[derive(Debug, serde::Deserialize)]
struct SsoClaims {
    sub: String,
    exp: u64,
    nonce: Option<String>,
}

#[derive(serde::Serialize)]
struct AuthenticationParams<'a> {
    redirect_uri: &'a str,
    client_id: &'a str,
    scope: &'static str,
    response_type: &'static str,
    response_mode: &'static str,
    state: &'a str,
    nonce: &'a str,
    sentry_handler_version: &'static str,
}

/// Enforces OIDC single sign-on in front of an application.
#[derive(Debug)]
pub struct SsoHandler {
    config: InterceptorConfig,
    verifier: TokenVerifier,
}

impl SsoHandler {
    pub fn new(config: InterceptorConfig, keys: Arc<KeyStore>) -> Self {
        let verifier = TokenVerifier::new(keys, config.jwks_url.clone());
        Self { config, verifier }
    }

    #[tracing::instrument(skip_all, fields(path = %req.path))]
    pub async fn authenticate(&self, req: &SsoRequest) -> Outcome {
        if let Some(code) = req.param(PARAM_ERROR) {
            if let Some(status) = auth_error_status(code) {
                let description = req.param(PARAM_ERROR_DESCRIPTION).unwrap_or_default();
                event!(Level::DEBUG, "IDP generated error {} - {}", code, description);
                return Outcome::Intercept(SsoResponse::text(status, escape_html(description)));
            }
        }

        let cookie_token = req.cookie(COOKIE_TOKEN);
        let query_token = req.param(PARAM_TOKEN);

        let token = match query_token.or(cookie_token) {
            Some(token) => token,
            None => return self.require_authentication(req),
        };

        let rfp = match req.cookie(COOKIE_RFP).and_then(RfpToken::from_hex) {
            Some(rfp) => rfp,
            None => return self.require_authentication(req),
        };

        let claims = match self.verify_and_extract_claims(token, &rfp, req).await {
            Ok(claims) => claims,
            Err(e) => {
                event!(Level::ERROR, error = %e, "Failed to validate token");
                return self.require_authentication(req);
            }
        };

        // `sub` is either `<user>` or `<user>@<realm>`
        let user = claims.sub.split('@').next().unwrap_or_default();
        if user.is_empty() {
            return self.require_authentication(req);
        }

        let mut response = SsoResponse::new(200);

        if let Some(id_token) = query_token {
            let mut redirect_uri = format!("{}{}", req.path, req.tokenless_query_string());
            if let Some(state) = req.param(PARAM_STATE) {
                match decode_state(state) {
                    Some(path) => redirect_uri = path,
                    None => {
                        event!(Level::ERROR, state = %state, "Invalid state parameter");
                        let status = auth_error_status("invalid_request").unwrap_or(401);
                        let response = SsoResponse::text(status, "Invalid state parameter");
                        return Outcome::Intercept(response);
                    }
                }
            }

            let same_site_none = should_set_same_site_to_none(&req.user_agent);
            response = response
                .with_cookie(
                    SetCookie::new(COOKIE_TOKEN, id_token, &req.host)
                        .expires_at(claims.exp)
                        .same_site_none(same_site_none),
                )
                .with_cookie(
                    SetCookie::new(COOKIE_RFP, rfp.to_hex(), &req.host)
                        .expires_at(claims.exp)
                        .same_site_none(same_site_none),
                );

            if !req.is_javascript_sso_request() {
                return Outcome::Intercept(response.redirect_to(redirect_uri));
            }
        }

        if req.is_javascript_sso_request() {
            let body = serde_json::json!({
                "is_authenticated": true,
                "expires_at": claims.exp,
            });
            return Outcome::Intercept(response.with_json(200, &body));
        }

        event!(Level::DEBUG, user = %user, "Request authenticated");
        Outcome::Pass(AuthenticatedUser {
            user: user.to_string(),
            id_token: cookie_token.map(|t| IdToken(t.to_string())),
            expires_at: claims.exp,
        })
    }

    async fn verify_and_extract_claims(
        &self,
        token: &str,
        rfp: &RfpToken,
        req: &SsoRequest,
    ) -> Result<SsoClaims, Error> {
        let claims: SsoClaims = self
            .verifier
            .verify(token, &self.config.issuer(), &self.client_id(req))
            .await?;

        if claims.nonce.as_deref() != Some(nonce_for(rfp).0.as_str()) {
            return Err(Error::NonceMismatch);
        }

        Ok(claims)
    }

    /// Configured client id, otherwise the origin of the request
    /// (for example `https://service.example.com:443`).
    pub fn client_id(&self, req: &SsoRequest) -> String {
        if let Some(client_id) = &self.config.client_id {
            return client_id.0.clone();
        }

        let mut host = req.host.clone();
        if !host.contains(':') {
            host.push_str(&format!(":{}", req.server_port));
        }
        format!("{}://{}", req.scheme, host)
    }

    fn build_authentication_url(
        &self,
        req: &SsoRequest,
        rfp: &RfpToken,
        endpoint: &str,
    ) -> Result<String, Error> {
        let query = req.tokenless_query_string();

        let redirect_uri = match &self.config.redirect_uri {
            Some(path) => format!("https://{}{}", req.host, path),
            None => format!("https://{}{}{}", req.host, req.path, query),
        };
        let state = encode_state(&format!("{}{}", req.path, query));
        let nonce = nonce_for(rfp);
        let client_id = self.client_id(req);

        let params = serde_urlencoded::to_string(AuthenticationParams {
            redirect_uri: &redirect_uri,
            client_id: &client_id,
            scope: OIDC_SCOPE,
            response_type: OIDC_RESPONSE_TYPE,
            response_mode: OIDC_RESPONSE_MODE,
            state: &state,
            nonce: &nonce.0,
            sentry_handler_version: SENTRY_HANDLER_VERSION,
        })?;

        Ok(format!("{}?{}", endpoint, params))
    }

    fn require_authentication(&self, req: &SsoRequest) -> Outcome {
        let (rfp, fresh) = match req.cookie(COOKIE_RFP).and_then(RfpToken::from_hex) {
            Some(rfp) => (rfp, false),
            None => (RfpToken::from_random(), true),
        };

        let endpoint = if req.is_javascript_sso_request() {
            &self.config.auth_path
        } else {
            &self.config.auth_redirect_path
        };

        let url = match self.build_authentication_url(req, &rfp, endpoint) {
            Ok(url) => url,
            Err(e) => {
                event!(Level::ERROR, error = %e, "Failed to build authentication url");
                return Outcome::Intercept(SsoResponse::text(500, "Internal Server Error"));
            }
        };

        let mut response = SsoResponse::new(200);
        response = if req.is_javascript_sso_request() {
            let body = serde_json::json!({
                "is_authenticated": false,
                "authn_endpoint": url,
            });
            response.with_json(200, &body)
        } else {
            response.redirect_to(url)
        };

        // No expiry until the flow completes
        if fresh {
            response = response.with_cookie(
                SetCookie::new(COOKIE_RFP, rfp.to_hex(), &req.host)
                    .same_site_none(should_set_same_site_to_none(&req.user_agent)),
            );
        }

        Outcome::Intercept(response)
    }
}
