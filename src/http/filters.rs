use std::sync::Arc;

use warp::filters::path::FullPath;
use warp::{Filter, Rejection};

use crate::core::models::AuthenticatedUser;
use crate::sso::{Outcome, SsoHandler, SsoRequest, SsoResponse};

use super::error::intercept;

/// How requests reach this server, as far as URLs handed back to browsers go.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Replaces the `Host` header of every request when set.
    pub host_override: Option<String>,
    pub scheme: String,
    pub port: u16,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            host_override: None,
            scheme: "https".to_string(),
            port: 443,
        }
    }
}

impl RequestContext {
    pub fn with_host_override(self, host_override: Option<String>) -> Self {
        Self {
            host_override,
            ..self
        }
    }
}

fn raw_query() -> impl Filter<Extract = (String,), Error = std::convert::Infallible> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
}

pub fn sso_request(
    context: RequestContext,
) -> impl Filter<Extract = (SsoRequest,), Error = Rejection> + Clone {
    warp::path::full()
        .and(raw_query())
        .and(warp::header::optional::<String>("host"))
        .and(warp::header::optional::<String>("cookie"))
        .and(warp::header::optional::<String>("user-agent"))
        .and(warp::header::optional::<String>("x-forwarded-proto"))
        .and_then(
            move |path: FullPath,
                  query: String,
                  host: Option<String>,
                  cookie: Option<String>,
                  user_agent: Option<String>,
                  proto: Option<String>| {
                let context = context.clone();
                async move {
                    let host = context
                        .host_override
                        .or(host)
                        .filter(|h| !h.is_empty())
                        .ok_or_else(|| intercept(SsoResponse::text(401, "Unauthorized")))?;

                    let scheme = proto.unwrap_or(context.scheme);
                    let req = SsoRequest::new(host, path.as_str())
                        .with_raw_query(&query)
                        .with_cookie_header(cookie.as_deref().unwrap_or_default())
                        .with_user_agent(user_agent.unwrap_or_default())
                        .with_origin(scheme, context.port);

                    Ok::<_, Rejection>(req)
                }
            },
        )
}

fn with_handler(
    handler: Arc<SsoHandler>,
) -> impl Filter<Extract = (Arc<SsoHandler>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || Arc::clone(&handler))
}

/// Runs the SSO interceptor. Requests it answers itself are rejected with
/// the response attached; see [`super::error::handle_reject`].
pub fn authenticated(
    handler: Arc<SsoHandler>,
    context: RequestContext,
) -> impl Filter<Extract = (AuthenticatedUser,), Error = Rejection> + Clone {
    sso_request(context)
        .and(with_handler(handler))
        .and_then(|req: SsoRequest, handler: Arc<SsoHandler>| async move {
            match handler.authenticate(&req).await {
                Outcome::Pass(user) => Ok(user),
                Outcome::Intercept(response) => Err(intercept(response)),
            }
        })
}
