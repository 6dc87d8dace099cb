use crate::error::{Error, Result, Service};

pub mod auth;
pub mod config;
pub mod consts;
pub mod conversation;
pub mod speech;
mod utils;

pub use auth::{AuthMode, Credentials, IamTokenExchange, PendingCredentials, TokenExchange};
pub use config::{ClientConfig, ClientConfigBuilder, ServiceConfig};
pub use conversation::{ConversationClient, ConversationService};
pub use speech::{SpeechService, SynthesisOptions, TextToSpeechClient};

/// Authenticated clients for both services.
pub struct Clients {
    pub conversation: ConversationClient,
    pub speech: TextToSpeechClient,
}

/// Builds the HTTP client shared by every request. All requests time out
/// after `config.request_timeout()`.
pub fn http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))
}

/// Resolves credentials for both services with `exchanger`.
pub async fn connect_with<T>(config: &ClientConfig, http: reqwest::Client, exchanger: &T) -> Result<Clients>
where
    T: TokenExchange + ?Sized,
{
    // Both modes are chosen before any token exchange, so a configuration
    // error on either service surfaces with no request sent.
    let conversation = auth::select_mode(
        Service::Conversation,
        config.conversation(),
        consts::CONVERSATION_URL,
    )?;
    let speech = auth::select_mode(
        Service::TextToSpeech,
        config.speech(),
        consts::TEXT_TO_SPEECH_URL,
    )?;

    let conversation_credentials = conversation.complete(exchanger).await?;
    let speech_credentials = speech.complete(exchanger).await?;

    Ok(Clients {
        conversation: ConversationClient::new(
            http.clone(),
            conversation_credentials,
            config.version_date(),
        ),
        speech: TextToSpeechClient::new(http, speech_credentials),
    })
}

/// Resolves credentials for both services against the identity endpoint.
pub async fn connect(config: &ClientConfig) -> Result<Clients> {
    let http = http_client(config)?;
    let exchanger = IamTokenExchange::new(http.clone());
    connect_with(config, http, &exchanger).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::auth::MockTokenExchange;
    use watson_voice_types::IamToken;

    #[tokio::test]
    async fn each_service_resolves_its_own_credentials() {
        let mut exchanger = MockTokenExchange::new();
        exchanger
            .expect_exchange()
            .times(1)
            .returning(|_, _| Ok(IamToken::new("tts-token", 3600, 0)));

        let config = ClientConfig::builder()
            .with_workspace_id("ws-1")
            .with_conversation(ServiceConfig::new().with_basic_auth("user", "pass"))
            .with_speech(ServiceConfig::new().with_iam_apikey("tts-key"))
            .build();
        let clients = connect_with(&config, reqwest::Client::new(), &exchanger)
            .await
            .unwrap();

        assert_eq!(clients.conversation.credentials().mode(), AuthMode::Basic);
        assert_eq!(clients.conversation.credentials().endpoint(), consts::CONVERSATION_URL);
        assert_eq!(clients.speech.credentials().mode(), AuthMode::Token);
        assert_eq!(clients.speech.credentials().endpoint(), consts::TEXT_TO_SPEECH_URL);
    }

    #[tokio::test]
    async fn speech_without_credentials_is_a_configuration_error() {
        let mut exchanger = MockTokenExchange::new();
        exchanger.expect_exchange().times(0);

        let config = ClientConfig::builder()
            .with_workspace_id("ws-1")
            .with_conversation(ServiceConfig::new().with_basic_auth("user", "pass"))
            .build();
        let result = connect_with(&config, reqwest::Client::new(), &exchanger).await;

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn configuration_error_precedes_any_token_exchange() {
        let mut exchanger = MockTokenExchange::new();
        exchanger.expect_exchange().times(0);

        let config = ClientConfig::builder()
            .with_workspace_id("ws-1")
            .with_conversation(ServiceConfig::new().with_iam_apikey("conv-key"))
            .build();
        let result = connect_with(&config, reqwest::Client::new(), &exchanger).await;

        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
