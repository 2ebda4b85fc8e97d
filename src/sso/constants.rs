pub const DEFAULT_MIDWAY_PROVIDER_HOST: &str = "midway-auth.amazon.com";
pub const DEFAULT_FEDERATE_PROVIDER_HOST: &str = "idp.federate.amazon.com";

pub const OIDC_SCOPE: &str = "openid";
pub const OIDC_RESPONSE_TYPE: &str = "id_token";
pub const OIDC_RESPONSE_MODE: &str = "query";
pub const SENTRY_HANDLER_VERSION: &str = "PythonMidwayServerHandler-1.0";

pub const COOKIE_RFP: &str = "amzn_sso_rfp";
pub const COOKIE_TOKEN: &str = "amzn_sso_token";
pub const PARAM_TOKEN: &str = "id_token";
pub const PARAM_STATE: &str = "state";
pub const PARAM_ERROR: &str = "error";
pub const PARAM_ERROR_DESCRIPTION: &str = "error_description";

/// Path reserved for the JavaScript integration; answered with JSON instead of redirects.
pub const JS_SSO_PATH: &str = "/sso/login";

pub const CLOCK_SKEW_THRESHOLD_SECS: u64 = 7 * 60;

pub const MIN_RSA_KEY_BITS: usize = 2048;
pub const RFP_TOKEN_BYTES: usize = 32;
pub const KEY_LRU_CACHE_SIZE: u64 = 2;

/// Status used to fail a request carrying an identity provider error code.
pub fn auth_error_status(code: &str) -> Option<u16> {
    let status = match code {
        "invalid_request" => 401,
        "unauthorized_client" => 401,
        "invalid_client" => 401,
        "access_denied" => 403,
        "unsupported_response_type" => 401,
        "invalid_scope" => 401,
        "server_error" => 401,
        "temporarily_unavailable" => 500,
        _ => return None,
    };
    Some(status)
}
