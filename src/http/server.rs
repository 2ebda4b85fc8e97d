use std::net::SocketAddr;
use std::sync::Arc;

use warp::reply::Reply;
use warp::{Filter, Rejection};

use crate::core::config::AuthConfig;
use crate::core::models::AuthenticatedUser;
use crate::sso::SsoHandler;

use super::error::handle_reject;
use super::filters::{authenticated, RequestContext};

#[derive(Debug, Clone, Copy)]
enum Route {
    Index,
    Config,
}

fn app_routes() -> impl Filter<Extract = (Route,), Error = Rejection> + Clone {
    let index = warp::path::end().map(|| Route::Index);
    let config = warp::path!("config").map(|| Route::Config);

    warp::get().and(index.or(config).unify())
}

#[derive(Debug)]
pub struct Server {
    handler: Arc<SsoHandler>,
    auth_config: AuthConfig,
    context: RequestContext,
}

impl Server {
    pub fn new(handler: Arc<SsoHandler>, auth_config: AuthConfig, context: RequestContext) -> Self {
        Self {
            handler,
            auth_config,
            context,
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let auth_config = self.auth_config.clone();

        authenticated(Arc::clone(&self.handler), self.context.clone())
            .and(app_routes())
            .map(move |user: AuthenticatedUser, route: Route| match route {
                Route::Index => warp::reply::json(&serde_json::json!({
                    "user": user.user,
                    "expires_at": user.expires_at,
                }))
                .into_response(),
                Route::Config => warp::reply::json(&auth_config.to_client_json()).into_response(),
            })
            .recover(handle_reject)
            .with(warp::log("http-api"))
    }

    pub async fn serve(self, address: SocketAddr) {
        tracing::event!(tracing::Level::INFO, %address, "Listening");
        warp::serve(self.routes()).run(address).await;
    }
}
