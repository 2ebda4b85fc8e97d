//! Checks whether the browser already holds a session with the hosted
//! identity provider.

pub mod cognito;

use std::fmt;
use std::sync::Arc;

use tracing::{event, Level};
use url::Url;

use crate::core::config::AuthConfig;
use crate::core::models::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    NotConfigured,
    NoSession,
    Expired,
    Invalid(String),
    Transient(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "client used before configure"),
            Self::NoSession => write!(f, "no cached session"),
            Self::Expired => write!(f, "session expired"),
            Self::Invalid(reason) => write!(f, "invalid session: {}", reason),
            Self::Transient(reason) => write!(f, "session lookup failed: {}", reason),
        }
    }
}

impl std::error::Error for ClientError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated(User),
    Unauthenticated,
    /// The lookup failed for a reason worth retrying.
    TransientError(String),
}

impl From<ClientError> for SessionStatus {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Transient(cause) => Self::TransientError(cause),
            _ => Self::Unauthenticated,
        }
    }
}

/// The hosted identity client.
#[async_trait::async_trait]
pub trait AuthClient: Send + Sync {
    fn configure(&self, config: &AuthConfig);
    async fn current_authenticated_user(&self) -> Result<User, ClientError>;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url);
}

/// Records navigation requests in the log; there is no browser to steer.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, url: &Url) {
        event!(Level::INFO, url = %url, "Redirecting to identity provider");
    }
}

/// Configure the client, then ask it for the current user.
///
/// Never fails: every client error is logged and folded into the returned
/// status.
pub async fn check_authentication<C, N>(
    config: AuthConfig,
    client: &C,
    navigator: &N,
) -> SessionStatus
where
    C: AuthClient + ?Sized,
    N: Navigator + ?Sized,
{
    client.configure(&config);

    match client.current_authenticated_user().await {
        Ok(user) => {
            event!(Level::INFO, "logged in");
            SessionStatus::Authenticated(user)
        }
        Err(error) => {
            event!(Level::INFO, "not logged in");
            event!(Level::DEBUG, error = %error, "Session lookup failed");

            if config.redirect_on_unauthenticated {
                match config.authorize_url() {
                    Ok(url) => navigator.navigate(&url),
                    Err(e) => event!(Level::WARN, error = %e, "Bad authorize url"),
                }
            }

            error.into()
        }
    }
}

/// Start a check without waiting for it.
pub fn spawn_check(
    config: AuthConfig,
    client: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
) -> tokio::task::JoinHandle<SessionStatus> {
    tokio::spawn(async move {
        check_authentication(config, client.as_ref(), navigator.as_ref()).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct MockClient {
        outcome: Result<User, ClientError>,
        configured: Mutex<Vec<AuthConfig>>,
        queries: AtomicUsize,
    }

    impl MockClient {
        fn new(outcome: Result<User, ClientError>) -> Self {
            Self {
                outcome,
                configured: Mutex::new(Vec::new()),
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl AuthClient for MockClient {
        fn configure(&self, config: &AuthConfig) {
            self.configured.lock().unwrap().push(config.clone());
        }

        async fn current_authenticated_user(&self) -> Result<User, ClientError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator(Mutex<Vec<Url>>);

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &Url) {
            self.0.lock().unwrap().push(url.clone());
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(Level, String)>>>);

    impl Recorder {
        fn info_messages(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|(level, _)| *level == Level::INFO)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    struct MessageVisitor(String);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for Recorder {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push((*event.metadata().level(), visitor.0));
        }
    }

    fn user() -> User {
        User {
            username: "alice".to_string(),
            subject: "3f1c".to_string(),
            expires_at: 0,
        }
    }

    #[tokio::test]
    async fn authenticated_user_logs_logged_in() {
        let recorder = Recorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = MockClient::new(Ok(user()));
        let navigator = RecordingNavigator::default();
        let status = check_authentication(AuthConfig::quartz_eu_beta(), &client, &navigator).await;

        assert_eq!(status, SessionStatus::Authenticated(user()));
        assert_eq!(recorder.info_messages(), vec!["logged in".to_string()]);
        assert!(navigator.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_session_logs_not_logged_in() {
        let recorder = Recorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = MockClient::new(Err(ClientError::NoSession));
        let navigator = RecordingNavigator::default();
        let status = check_authentication(AuthConfig::quartz_eu_beta(), &client, &navigator).await;

        assert_eq!(status, SessionStatus::Unauthenticated);
        assert_eq!(recorder.info_messages(), vec!["not logged in".to_string()]);
        assert!(navigator.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn redirect_when_enabled() {
        let client = MockClient::new(Err(ClientError::Expired));
        let navigator = RecordingNavigator::default();
        let config = AuthConfig::quartz_eu_beta().with_redirect_on_unauthenticated(true);
        let expected = config.authorize_url().unwrap();

        let status = check_authentication(config, &client, &navigator).await;

        assert_eq!(status, SessionStatus::Unauthenticated);
        assert_eq!(*navigator.0.lock().unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn transient_failures_are_distinguished() {
        let client = MockClient::new(Err(ClientError::Transient("timeout".to_string())));
        let status =
            check_authentication(AuthConfig::quartz_eu_beta(), &client, &LogNavigator).await;
        assert_eq!(status, SessionStatus::TransientError("timeout".to_string()));
    }

    #[tokio::test]
    async fn configure_receives_literal_config() {
        let client = MockClient::new(Ok(user()));
        check_authentication(AuthConfig::quartz_eu_beta(), &client, &LogNavigator).await;

        let configured = client.configured.lock().unwrap();
        assert_eq!(configured.len(), 1);

        let config = &configured[0];
        assert_eq!(config.region.0, "eu-west-1");
        assert_eq!(
            config.identity_pool_id.0,
            "eu-west-1:514b95b9-74a0-4a89-8ccc-ea40408fa121"
        );
        assert_eq!(config.user_pool_id.0, "eu-west-1_t6ebYpeO2");
        assert_eq!(config.client_id.0, "2fq8dtalchrevle04i6tdkvmrd");
        assert_eq!(
            config.oauth.domain.0,
            "quartz-eu-beta.auth.eu-west-1.amazoncognito.com"
        );
        assert_eq!(
            config.oauth.redirect_sign_in.0,
            "https://estops.beta-eu.quartz.rme.amazon.dev/"
        );
        assert_eq!(
            config.oauth.redirect_sign_out.0,
            "https://estops.beta-eu.quartz.rme.amazon.dev/logout"
        );
        assert_eq!(config.oauth.response_type.as_str(), "code");
        assert_eq!(config.oauth.scope.as_parts(), vec!["openid".to_string()]);
        assert!(!config.redirect_on_unauthenticated);
    }

    #[tokio::test]
    async fn each_check_is_independent() {
        let client = MockClient::new(Err(ClientError::NoSession));
        check_authentication(AuthConfig::quartz_eu_beta(), &client, &LogNavigator).await;
        check_authentication(AuthConfig::quartz_eu_beta(), &client, &LogNavigator).await;

        assert_eq!(client.configured.lock().unwrap().len(), 2);
        assert_eq!(client.queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn spawned_check_completes() {
        let client: Arc<dyn AuthClient> =
            Arc::new(MockClient::new(Err(ClientError::Invalid("bad".to_string()))));
        let handle = spawn_check(AuthConfig::quartz_eu_beta(), client, Arc::new(LogNavigator));
        assert_eq!(handle.await.unwrap(), SessionStatus::Unauthenticated);
    }
}
