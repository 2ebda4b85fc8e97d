use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

use crate::core::config::AuthConfig;
use crate::core::types::{ClientId, IdToken};
use crate::http::filters::RequestContext;
use crate::http::server::Server;
use crate::session::cognito::CognitoClient;
use crate::session::{check_authentication, LogNavigator, SessionStatus};
use crate::sso::jwks::KeyStore;
use crate::sso::{IdentityProvider, InterceptorConfig, SsoHandler};

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Parser)]
#[clap(
    name = "quartzd",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct ServerOptions {
    #[clap(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8001")]
    bind_address: SocketAddr,
    #[clap(long, env = "IDENTITY_PROVIDER_KIND", default_value = "federate")]
    identity_provider_kind: IdentityProvider,
    /// Identity provider host, when not the provider's default.
    #[clap(long, env = "IDENTITY_PROVIDER")]
    identity_provider: Option<String>,
    #[clap(long, env = "SSO_CLIENT_ID")]
    sso_client_id: Option<ClientId>,
    /// Fixed callback path, e.g. `/sso/callback`.
    #[clap(long, env = "SSO_REDIRECT_URI")]
    sso_redirect_uri: Option<String>,
    #[clap(long, env = "HOST_OVERRIDE")]
    host_override: Option<String>,
}

impl ServerOptions {
    fn interceptor_config(&self) -> InterceptorConfig {
        InterceptorConfig::for_provider(self.identity_provider_kind, self.identity_provider.clone())
            .with_client_id(self.sso_client_id.clone())
            .with_redirect_uri(self.sso_redirect_uri.clone())
    }
}

pub async fn run_server(opts: ServerOptions) {
    let config = opts.interceptor_config();
    event!(
        Level::INFO,
        provider = %config.identity_provider_host,
        jwks = %config.jwks_url,
        "Starting SSO front"
    );

    let handler = Arc::new(SsoHandler::new(config, Arc::new(KeyStore::over_http())));
    let context = RequestContext::default().with_host_override(opts.host_override);

    Server::new(handler, AuthConfig::quartz_eu_beta(), context)
        .serve(opts.bind_address)
        .await;
}

#[derive(Parser)]
#[clap(
    name = "quartz-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct UtilOptions {
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    CheckSession(CheckSession),
    PrintConfig(PrintConfig),
    AuthorizeUrl(AuthorizeUrl),
}

/// Check whether an ID token from a hosted-UI login is still a valid session.
#[derive(Parser)]
struct CheckSession {
    #[clap(long, env = "ID_TOKEN")]
    id_token: Option<String>,
    #[clap(long)]
    redirect_on_unauthenticated: bool,
}

/// Print the browser client configuration.
#[derive(Parser)]
struct PrintConfig;

/// Print the hosted login URL.
#[derive(Parser)]
struct AuthorizeUrl;

async fn check_session(c: &CheckSession) -> Result<(), ()> {
    let client = CognitoClient::new(Arc::new(KeyStore::over_http()))
        .with_id_token(c.id_token.clone().map(IdToken));
    let config = AuthConfig::quartz_eu_beta()
        .with_redirect_on_unauthenticated(c.redirect_on_unauthenticated);

    match check_authentication(config, &client, &LogNavigator).await {
        SessionStatus::Authenticated(user) => {
            println!("{} (expires at {})", user.username, user.expires_at);
            Ok(())
        }
        SessionStatus::Unauthenticated => Err(()),
        SessionStatus::TransientError(cause) => {
            event!(Level::WARN, cause = %cause, "Session lookup may succeed on retry");
            Err(())
        }
    }
}

fn print_config(_c: &PrintConfig) -> Result<(), ()> {
    let json = serde_json::to_string_pretty(&AuthConfig::quartz_eu_beta().to_client_json())
        .map_err(|e| event!(Level::ERROR, error = %e, "Failed to encode configuration"))?;
    println!("{}", json);
    Ok(())
}

fn authorize_url(_c: &AuthorizeUrl) -> Result<(), ()> {
    let url = AuthConfig::quartz_eu_beta()
        .authorize_url()
        .map_err(|e| event!(Level::ERROR, error = %e, "Failed to build authorize url"))?;
    println!("{}", url);
    Ok(())
}

pub async fn run_cli_action(opts: UtilOptions) -> Result<(), ()> {
    use SubCommand::*;

    match &opts.command {
        CheckSession(c) => check_session(c).await,
        PrintConfig(c) => print_config(c),
        AuthorizeUrl(c) => authorize_url(c),
    }
}
