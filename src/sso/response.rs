use chrono::DateTime;

/// A response the interceptor sends instead of the application's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<SetCookie>,
    pub body: String,
}

impl SsoResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            cookies: Vec::new(),
            body: String::new(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::new(status)
        }
        .with_header("Content-Type", "text/plain; charset=utf-8")
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn with_cookie(mut self, cookie: SetCookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn redirect_to(self, location: impl Into<String>) -> Self {
        Self { status: 307, ..self }.with_header("Location", location)
    }

    pub fn with_json(self, status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            ..self
        }
        .with_header("Content-Type", "application/json")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A `Secure; HttpOnly` cookie scoped to the service host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub expires: Option<u64>,
    pub same_site_none: bool,
}

impl SetCookie {
    pub fn new(name: &str, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            domain: domain.into(),
            expires: None,
            same_site_none: false,
        }
    }

    pub fn expires_at(self, expires: u64) -> Self {
        Self {
            expires: Some(expires),
            ..self
        }
    }

    pub fn same_site_none(self, same_site_none: bool) -> Self {
        Self {
            same_site_none,
            ..self
        }
    }

    pub fn to_header_value(&self) -> String {
        let mut value = format!("{}={}; Domain={}", self.name, self.value, self.domain);
        if let Some(expires) = self.expires.and_then(|e| DateTime::from_timestamp(e as i64, 0)) {
            value.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        value.push_str("; Secure; HttpOnly; Path=/");
        if self.same_site_none {
            value.push_str("; SameSite=None");
        }
        value
    }
}

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header() {
        let cookie = SetCookie::new("amzn_sso_rfp", "00ff", "example.com")
            .expires_at(0)
            .same_site_none(true);
        assert_eq!(
            cookie.to_header_value(),
            "amzn_sso_rfp=00ff; Domain=example.com; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Secure; HttpOnly; Path=/; SameSite=None"
        );
    }

    #[test]
    fn session_cookie_has_no_expiry() {
        let cookie = SetCookie::new("amzn_sso_rfp", "00ff", "example.com");
        assert_eq!(
            cookie.to_header_value(),
            "amzn_sso_rfp=00ff; Domain=example.com; Secure; HttpOnly; Path=/"
        );
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"x\" & 'y'</b>"),
            "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;"
        );
    }
}
