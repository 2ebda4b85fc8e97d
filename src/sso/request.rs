use std::collections::HashMap;

use base64::Engine;

use super::constants::PARAM_TOKEN;

/// The parts of an incoming HTTP request the interceptor looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsoRequest {
    /// Host as sent by the client, port included when non-default.
    pub host: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub cookies: HashMap<String, String>,
    pub user_agent: String,
    pub scheme: String,
    pub server_port: u16,
}

impl SsoRequest {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            scheme: "https".to_string(),
            server_port: 443,
            ..Self::default()
        }
    }

    pub fn with_raw_query(self, raw: &str) -> Self {
        Self {
            query: parse_query(raw),
            ..self
        }
    }

    pub fn with_cookie_header(self, header: &str) -> Self {
        Self {
            cookies: parse_cookie_header(header),
            ..self
        }
    }

    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..self
        }
    }

    pub fn with_origin(self, scheme: impl Into<String>, server_port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            server_port,
            ..self
        }
    }

    /// First non-empty value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_javascript_sso_request(&self) -> bool {
        self.path == super::constants::JS_SSO_PATH
    }

    /// Query string with a leading `?` and without `id_token`, or empty.
    ///
    /// Only the first value of a repeated parameter is kept.
    pub fn tokenless_query_string(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            if key == PARAM_TOKEN || seen.contains(&key.as_str()) {
                continue;
            }
            seen.push(key);
            serializer.append_pair(key, value);
        }
        let query = serializer.finish();
        if query.is_empty() {
            query
        } else {
            format!("?{}", query)
        }
    }
}

pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.trim().to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

#[derive(serde::Serialize, serde::Deserialize)]
struct State {
    path: String,
}

/// Base64 JSON blob carrying the path to return to after login.
pub fn encode_state(path: &str) -> String {
    let json = serde_json::json!({ "path": path }).to_string();
    base64::engine::general_purpose::STANDARD.encode(json)
}

pub fn decode_state(state: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(state).ok()?;
    let state: State = serde_json::from_slice(&bytes).ok()?;
    Some(state.path)
}
