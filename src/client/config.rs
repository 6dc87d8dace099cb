use std::time::Duration;

use secrecy::SecretString;
use watson_voice_types::Voice;

use crate::client::consts::*;
use crate::error::{Error, Result};

/// Endpoint and credential settings for one service.
///
/// Either `username`/`password` or `iam_apikey` should be set. Which one wins
/// is decided when the credentials are resolved.
#[derive(Debug, Default)]
pub struct ServiceConfig {
    url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    iam_apikey: Option<SecretString>,
    iam_url: Option<String>,
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = non_empty(url);
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.username = non_empty(username);
        self.password = non_empty(password).map(SecretString::from);
        self
    }

    pub fn with_iam_apikey(mut self, apikey: &str) -> Self {
        self.iam_apikey = non_empty(apikey).map(SecretString::from);
        self
    }

    pub fn with_iam_url(mut self, iam_url: &str) -> Self {
        self.iam_url = non_empty(iam_url);
        self
    }

    /// The configured endpoint, or `default` when none was given.
    pub fn url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.url.as_deref().unwrap_or(default)
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    pub fn iam_apikey(&self) -> Option<&SecretString> {
        self.iam_apikey.as_ref()
    }

    pub fn iam_url(&self) -> &str {
        self.iam_url.as_deref().unwrap_or(IAM_URL)
    }

    fn from_lookup<F>(prefix: &str, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{prefix}_{name}")).unwrap_or_default();
        Self::new()
            .with_url(&var("URL"))
            .with_basic_auth(&var("USERNAME"), &var("PASSWORD"))
            .with_iam_apikey(&var("IAM_APIKEY"))
            .with_iam_url(&var("IAM_URL"))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug)]
pub struct ClientConfig {
    conversation: ServiceConfig,
    speech: ServiceConfig,
    workspace_id: String,
    version_date: String,
    voice: Voice,
    request_timeout: Duration,
    output_device: Option<String>,
}

pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig {
                conversation: ServiceConfig::new(),
                speech: ServiceConfig::new(),
                workspace_id: String::new(),
                version_date: DEFAULT_VERSION_DATE.to_string(),
                voice: Voice::default(),
                request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
                output_device: None,
            },
        }
    }

    pub fn with_conversation(mut self, conversation: ServiceConfig) -> Self {
        self.config.conversation = conversation;
        self
    }

    pub fn with_speech(mut self, speech: ServiceConfig) -> Self {
        self.config.speech = speech;
        self
    }

    pub fn with_workspace_id(mut self, workspace_id: &str) -> Self {
        self.config.workspace_id = workspace_id.trim().to_string();
        self
    }

    pub fn with_version_date(mut self, version_date: &str) -> Self {
        self.config.version_date = version_date.trim().to_string();
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.config.voice = voice;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.config.request_timeout = request_timeout;
        self
    }

    pub fn with_output_device(mut self, output_device: Option<&str>) -> Self {
        self.config.output_device = output_device.and_then(non_empty);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Loads configuration from the environment, reading `.env` first if present.
    ///
    /// *   `CONVERSATION_WORKSPACE_ID`: the workspace to query. Required.
    /// *   `CONVERSATION_VERSION_DATE`: API version date. Defaults to `2018-07-10`.
    /// *   `CONVERSATION_URL`, `CONVERSATION_USERNAME`, `CONVERSATION_PASSWORD`,
    ///     `CONVERSATION_IAM_APIKEY`, `CONVERSATION_IAM_URL`: conversation endpoint and credentials.
    /// *   `TTS_URL`, `TTS_USERNAME`, `TTS_PASSWORD`, `TTS_IAM_APIKEY`, `TTS_IAM_URL`: the same for speech.
    /// *   `TTS_VOICE`: synthesis voice. Defaults to `en-US_MichaelVoice`.
    /// *   `REQUEST_TIMEOUT_SECS`: per-request timeout. Defaults to 30.
    /// *   `AUDIO_OUTPUT_DEVICE`: output device name. Defaults to the system default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workspace_id = lookup(CONVERSATION_WORKSPACE_ID_VAR)
            .and_then(|v| non_empty(&v))
            .ok_or_else(|| {
                Error::configuration(format!("{CONVERSATION_WORKSPACE_ID_VAR} must be set"))
            })?;

        let mut builder = ClientConfig::builder()
            .with_conversation(ServiceConfig::from_lookup(CONVERSATION_PREFIX, &lookup))
            .with_speech(ServiceConfig::from_lookup(TTS_PREFIX, &lookup))
            .with_workspace_id(&workspace_id)
            .with_output_device(lookup(AUDIO_OUTPUT_DEVICE_VAR).as_deref());

        if let Some(version_date) = lookup(CONVERSATION_VERSION_DATE_VAR).and_then(|v| non_empty(&v)) {
            builder = builder.with_version_date(&version_date);
        }
        if let Some(voice) = lookup(TTS_VOICE_VAR).and_then(|v| non_empty(&v)) {
            builder = builder.with_voice(Voice::from(voice.as_str()));
        }
        if let Some(timeout) = lookup(REQUEST_TIMEOUT_SECS_VAR).and_then(|v| non_empty(&v)) {
            let secs = timeout.parse::<u64>().map_err(|_| {
                Error::configuration(format!(
                    "{REQUEST_TIMEOUT_SECS_VAR}: '{timeout}' is not a number of seconds"
                ))
            })?;
            if secs == 0 {
                return Err(Error::configuration(format!(
                    "{REQUEST_TIMEOUT_SECS_VAR} must be greater than zero"
                )));
            }
            builder = builder.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }

    pub fn conversation(&self) -> &ServiceConfig {
        &self.conversation
    }

    pub fn speech(&self) -> &ServiceConfig {
        &self.speech
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn version_date(&self) -> &str {
        &self.version_date
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn output_device(&self) -> Option<&str> {
        self.output_device.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_workspace_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[("CONVERSATION_WORKSPACE_ID", "ws-1")])).unwrap();

        assert_eq!(config.workspace_id(), "ws-1");
        assert_eq!(config.version_date(), DEFAULT_VERSION_DATE);
        assert_eq!(config.voice(), &Voice::EnUsMichael);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.conversation().url_or(CONVERSATION_URL), CONVERSATION_URL);
        assert_eq!(config.speech().iam_url(), IAM_URL);
        assert!(config.output_device().is_none());
    }

    #[test]
    fn reads_per_service_credentials() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("CONVERSATION_WORKSPACE_ID", "ws-1"),
            ("CONVERSATION_USERNAME", "user"),
            ("CONVERSATION_PASSWORD", "pass"),
            ("TTS_IAM_APIKEY", "key"),
            ("TTS_IAM_URL", "https://iam.example.test/token"),
            ("TTS_URL", "https://tts.example.test/api"),
            ("TTS_VOICE", "en-GB_KateVoice"),
        ]))
        .unwrap();

        assert_eq!(config.conversation().username(), Some("user"));
        assert_eq!(config.conversation().password().map(|p| p.expose_secret()), Some("pass"));
        assert!(config.conversation().iam_apikey().is_none());
        assert_eq!(config.speech().iam_apikey().map(|k| k.expose_secret()), Some("key"));
        assert_eq!(config.speech().iam_url(), "https://iam.example.test/token");
        assert_eq!(config.speech().url_or(TEXT_TO_SPEECH_URL), "https://tts.example.test/api");
        assert_eq!(config.voice(), &Voice::EnGbKate);
    }

    #[test]
    fn empty_values_count_as_absent() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("CONVERSATION_WORKSPACE_ID", "ws-1"),
            ("CONVERSATION_USERNAME", ""),
            ("CONVERSATION_IAM_APIKEY", "  "),
            ("AUDIO_OUTPUT_DEVICE", ""),
        ]))
        .unwrap();

        assert!(config.conversation().username().is_none());
        assert!(config.conversation().iam_apikey().is_none());
        assert!(config.output_device().is_none());
    }

    #[test]
    fn missing_workspace_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        for timeout in ["soon", "0"] {
            let err = ClientConfig::from_lookup(lookup(&[
                ("CONVERSATION_WORKSPACE_ID", "ws-1"),
                ("REQUEST_TIMEOUT_SECS", timeout),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{timeout}");
        }
    }
}
