use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::sso::SsoResponse;

impl Reply for SsoResponse {
    fn into_response(self) -> Response {
        let mut builder = warp::http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        for cookie in &self.cookies {
            builder = builder.header("set-cookie", cookie.to_header_value());
        }

        builder
            .body(warp::hyper::Body::from(self.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sso::response::SetCookie;

    #[test]
    fn intercept_becomes_response() {
        let response = SsoResponse::new(200)
            .redirect_to("/reports")
            .with_cookie(SetCookie::new("amzn_sso_rfp", "00", "example.com"))
            .with_cookie(SetCookie::new("amzn_sso_token", "t", "example.com"))
            .into_response();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()["location"], "/reports");
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
    }

    #[test]
    fn bad_header_is_server_error() {
        let response = SsoResponse::new(200)
            .with_header("Location", "/a\nb")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
