use url::Url;

use super::types::{
    ClientId, HostedDomain, IdentityPoolId, RedirectUri, Region, ResponseType, Scope, UserPoolId,
};

const FEDERATION_TARGET: &str = "COGNITO_USER_POOLS";

/// Connection parameters for the hosted identity provider.
///
/// Built from constants for every check and never mutated afterwards. The
/// serialized form is the JSON shape browser clients expect.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AuthConfig {
    #[serde(rename = "aws_project_region")]
    pub region: Region,
    #[serde(rename = "aws_cognito_identity_pool_id")]
    pub identity_pool_id: IdentityPoolId,
    #[serde(rename = "aws_user_pools_id")]
    pub user_pool_id: UserPoolId,
    #[serde(rename = "aws_user_pools_web_client_id")]
    pub client_id: ClientId,
    pub oauth: OAuthConfig,
    #[serde(skip)]
    pub redirect_on_unauthenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
    pub domain: HostedDomain,
    pub redirect_sign_in: RedirectUri,
    pub redirect_sign_out: RedirectUri,
    pub response_type: ResponseType,
    #[serde(serialize_with = "Scope::serialize_parts")]
    pub scope: Scope,
}

impl AuthConfig {
    pub fn quartz_eu_beta() -> Self {
        Self {
            region: Region("eu-west-1".to_string()),
            identity_pool_id: IdentityPoolId(
                "eu-west-1:514b95b9-74a0-4a89-8ccc-ea40408fa121".to_string(),
            ),
            user_pool_id: UserPoolId("eu-west-1_t6ebYpeO2".to_string()),
            client_id: ClientId("2fq8dtalchrevle04i6tdkvmrd".to_string()),
            oauth: OAuthConfig {
                domain: HostedDomain(
                    "quartz-eu-beta.auth.eu-west-1.amazoncognito.com".to_string(),
                ),
                redirect_sign_in: RedirectUri(
                    "https://estops.beta-eu.quartz.rme.amazon.dev/".to_string(),
                ),
                redirect_sign_out: RedirectUri(
                    "https://estops.beta-eu.quartz.rme.amazon.dev/logout".to_string(),
                ),
                response_type: ResponseType::Code,
                scope: Scope::openid(),
            },
            redirect_on_unauthenticated: false,
        }
    }

    pub fn with_redirect_on_unauthenticated(self, redirect: bool) -> Self {
        Self {
            redirect_on_unauthenticated: redirect,
            ..self
        }
    }

    /// Hosted login page the browser is sent to when no session exists.
    pub fn authorize_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("https://{}/oauth2/authorize", self.oauth.domain.0))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id.0)
            .append_pair("response_type", self.oauth.response_type.as_str())
            .append_pair("scope", &self.oauth.scope.as_joined())
            .append_pair("redirect_uri", &self.oauth.redirect_sign_in.0);
        Ok(url)
    }

    pub fn issuer(&self) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            self.region.0, self.user_pool_id.0
        )
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }

    pub fn to_client_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.insert(
                "aws_cognito_region".to_string(),
                serde_json::Value::String(self.region.0.clone()),
            );
            map.insert(
                "federationTarget".to_string(),
                serde_json::Value::String(FEDERATION_TARGET.to_string()),
            );
        }
        value
    }
}
