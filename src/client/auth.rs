use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use watson_voice_types::{ApiKeyGrant, IamToken};

use crate::client::config::ServiceConfig;
use crate::client::consts::{ACCEPT_JSON, IAM_CLIENT_ID, IAM_CLIENT_SECRET};
use crate::client::utils;
use crate::error::{Error, Result, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Basic,
    Token,
}

/// Resolved credentials for one service. Exactly one mode is ever populated.
#[derive(Debug)]
pub enum Credentials {
    Basic {
        endpoint: String,
        username: String,
        password: SecretString,
    },
    Token {
        endpoint: String,
        api_key: SecretString,
        token_endpoint: String,
        token: IamToken,
    },
}

impl Credentials {
    pub fn basic(endpoint: &str, username: &str, password: &str) -> Self {
        Credentials::Basic {
            endpoint: endpoint.to_string(),
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            Credentials::Basic { .. } => AuthMode::Basic,
            Credentials::Token { .. } => AuthMode::Token,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Credentials::Basic { endpoint, .. } | Credentials::Token { endpoint, .. } => endpoint,
        }
    }

    /// Attaches the matching `Authorization` header to a request.
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Credentials::Basic {
                username, password, ..
            } => request.basic_auth(username, Some(password.expose_secret())),
            Credentials::Token { token, .. } => request.bearer_auth(token.access_token().expose_secret()),
        }
    }
}

/// Exchanges an API key for an access token at the identity endpoint.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, api_key: &str, token_endpoint: &str) -> Result<IamToken>;
}

pub struct IamTokenExchange {
    http: reqwest::Client,
}

impl IamTokenExchange {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub(crate) fn build_request(&self, api_key: &str, token_endpoint: &str) -> reqwest::Result<reqwest::Request> {
        self.http
            .post(token_endpoint)
            .basic_auth(IAM_CLIENT_ID, Some(IAM_CLIENT_SECRET))
            .header(ACCEPT, ACCEPT_JSON)
            .form(&ApiKeyGrant::new(api_key))
            .build()
    }
}

#[async_trait]
impl TokenExchange for IamTokenExchange {
    async fn exchange(&self, api_key: &str, token_endpoint: &str) -> Result<IamToken> {
        let request = self
            .build_request(api_key, token_endpoint)
            .map_err(|e| Error::transport(Service::Identity, e))?;
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| Error::transport(Service::Identity, e))?;
        let body = utils::success_body(Service::Identity, response).await?;
        utils::parse_json(Service::Identity, &body)
    }
}

/// Credentials whose mode has been chosen but whose token, if any, has not
/// been fetched yet.
#[derive(Debug)]
pub enum PendingCredentials {
    Ready(Credentials),
    Token {
        service: Service,
        endpoint: String,
        api_key: SecretString,
        token_endpoint: String,
    },
}

impl PendingCredentials {
    pub fn mode(&self) -> AuthMode {
        match self {
            PendingCredentials::Ready(credentials) => credentials.mode(),
            PendingCredentials::Token { .. } => AuthMode::Token,
        }
    }

    /// Runs the API key exchange for token mode. Basic credentials return as-is.
    pub async fn complete<T>(self, exchanger: &T) -> Result<Credentials>
    where
        T: TokenExchange + ?Sized,
    {
        match self {
            PendingCredentials::Ready(credentials) => Ok(credentials),
            PendingCredentials::Token {
                service,
                endpoint,
                api_key,
                token_endpoint,
            } => {
                tracing::debug!("{}: exchanging API key at {}", service, token_endpoint);
                let token = exchanger
                    .exchange(api_key.expose_secret(), &token_endpoint)
                    .await?;
                tracing::info!("{}: token acquired, expires in {}s", service, token.expires_in());
                Ok(Credentials::Token {
                    endpoint,
                    api_key,
                    token_endpoint,
                    token,
                })
            }
        }
    }
}

/// Picks basic or token authentication for a service without any I/O.
///
/// Username and password win when both kinds are configured. A config with
/// neither is a configuration error.
pub fn select_mode(
    service: Service,
    config: &ServiceConfig,
    default_endpoint: &str,
) -> Result<PendingCredentials> {
    let endpoint = config.url_or(default_endpoint).trim_end_matches('/').to_string();

    if let (Some(username), Some(password)) = (config.username(), config.password()) {
        tracing::debug!("{}: using basic authentication", service);
        return Ok(PendingCredentials::Ready(Credentials::Basic {
            endpoint,
            username: username.to_string(),
            password: SecretString::from(password.expose_secret().to_string()),
        }));
    }

    if let Some(api_key) = config.iam_apikey() {
        return Ok(PendingCredentials::Token {
            service,
            endpoint,
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            token_endpoint: config.iam_url().to_string(),
        });
    }

    Err(Error::configuration(format!(
        "{service}: provide either username and password or an IAM apikey"
    )))
}

/// Selects the mode for one service and waits for its token exchange.
pub async fn resolve<T>(
    service: Service,
    config: &ServiceConfig,
    default_endpoint: &str,
    exchanger: &T,
) -> Result<Credentials>
where
    T: TokenExchange + ?Sized,
{
    select_mode(service, config, default_endpoint)?
        .complete(exchanger)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::consts::{CONVERSATION_URL, IAM_URL};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn missing_credentials_fail_without_network() {
        let mut exchanger = MockTokenExchange::new();
        exchanger.expect_exchange().times(0);

        let configs = [
            ServiceConfig::new(),
            ServiceConfig::new().with_url("https://example.test/api"),
            ServiceConfig::new().with_basic_auth("user", ""),
            ServiceConfig::new().with_basic_auth("", "pass"),
            ServiceConfig::new().with_iam_url("https://iam.example.test"),
        ];
        for config in configs {
            let err = resolve(Service::Conversation, &config, CONVERSATION_URL, &exchanger)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{config:?}");
        }
    }

    #[tokio::test]
    async fn basic_auth_wins_over_apikey() {
        let mut exchanger = MockTokenExchange::new();
        exchanger.expect_exchange().times(0);

        let config = ServiceConfig::new()
            .with_basic_auth("user", "pass")
            .with_iam_apikey("key");
        let credentials = resolve(Service::Conversation, &config, CONVERSATION_URL, &exchanger)
            .await
            .unwrap();

        assert_eq!(credentials.mode(), AuthMode::Basic);
        assert_eq!(credentials.endpoint(), CONVERSATION_URL);
    }

    #[tokio::test]
    async fn apikey_waits_for_token_exchange() {
        let mut exchanger = MockTokenExchange::new();
        exchanger
            .expect_exchange()
            .with(eq("key"), eq(IAM_URL))
            .times(1)
            .returning(|_, _| Ok(IamToken::new("access", 3600, 0)));

        let config = ServiceConfig::new()
            .with_iam_apikey("key")
            .with_url("https://example.test/api/");
        let credentials = resolve(Service::TextToSpeech, &config, CONVERSATION_URL, &exchanger)
            .await
            .unwrap();

        assert_eq!(credentials.mode(), AuthMode::Token);
        assert_eq!(credentials.endpoint(), "https://example.test/api");
        match credentials {
            Credentials::Token { token, token_endpoint, .. } => {
                assert_eq!(token.access_token().expose_secret(), "access");
                assert_eq!(token_endpoint, IAM_URL);
            }
            other => panic!("expected token credentials, got {other:?}"),
        }
    }

    #[test]
    fn selecting_token_mode_defers_the_exchange() {
        let config = ServiceConfig::new().with_iam_apikey("key");
        let pending = select_mode(Service::Conversation, &config, CONVERSATION_URL).unwrap();

        assert_eq!(pending.mode(), AuthMode::Token);
        assert!(matches!(pending, PendingCredentials::Token { .. }));
    }

    #[tokio::test]
    async fn failed_exchange_propagates() {
        let mut exchanger = MockTokenExchange::new();
        exchanger
            .expect_exchange()
            .returning(|_, _| Err(Error::transport(Service::Identity, "401 Unauthorized")));

        let config = ServiceConfig::new().with_iam_apikey("bad");
        let err = resolve(Service::Conversation, &config, CONVERSATION_URL, &exchanger)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport { service: Service::Identity, .. }));
    }

    #[test]
    fn authorize_sets_the_header_for_each_mode() {
        let http = reqwest::Client::new();

        let basic = Credentials::basic("https://example.test", "user", "pass");
        let request = basic.authorize(http.get("https://example.test")).build().unwrap();
        assert_eq!(
            request.headers()["authorization"],
            "Basic dXNlcjpwYXNz"
        );

        let token = Credentials::Token {
            endpoint: "https://example.test".to_string(),
            api_key: SecretString::from("key".to_string()),
            token_endpoint: IAM_URL.to_string(),
            token: IamToken::new("access", 3600, 0),
        };
        let request = token.authorize(http.get("https://example.test")).build().unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer access");
    }

    #[test]
    fn iam_request_is_a_form_post() {
        let exchanger = IamTokenExchange::new(reqwest::Client::new());
        let request = exchanger.build_request("k-1", IAM_URL).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), IAM_URL);
        assert_eq!(request.headers()["authorization"], "Basic Yng6Yng=");
        assert_eq!(request.headers()["accept"], "application/json");
        assert_eq!(
            request.headers()["content-type"],
            "application/x-www-form-urlencoded"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            std::str::from_utf8(body).unwrap(),
            "grant_type=urn%3Aibm%3Aparams%3Aoauth%3Agrant-type%3Aapikey&apikey=k-1&response_type=cloud_iam"
        );
    }
}
