use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::header::ACCEPT;
use watson_voice_types::{SynthesizeRequest, Voice};
use watson_voice_utils::AudioClip;

use crate::client::auth::Credentials;
use crate::client::consts::ACCEPT_WAV;
use crate::client::utils;
use crate::error::{Error, Result, Service};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisOptions {
    voice: Voice,
}

impl SynthesisOptions {
    pub fn new(voice: Voice) -> Self {
        Self { voice }
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }
}

/// The speech-synthesis service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechService: Send + Sync {
    async fn synthesize(&self, text: &str, options: &SynthesisOptions) -> Result<AudioClip>;
}

/// HTTP client for the Text to Speech v1 `synthesize` endpoint. Requests WAV
/// and decodes it into an [`AudioClip`].
pub struct TextToSpeechClient {
    http: reqwest::Client,
    credentials: Credentials,
}

impl TextToSpeechClient {
    pub fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn build_request(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<reqwest::Request> {
        let url = utils::endpoint_url(
            Service::TextToSpeech,
            self.credentials.endpoint(),
            &["v1", "synthesize"],
        )?;
        self.credentials
            .authorize(self.http.post(url))
            .query(&[("voice", options.voice().as_str())])
            .header(ACCEPT, ACCEPT_WAV)
            .json(&SynthesizeRequest::new(text))
            .build()
            .map_err(|e| Error::transport(Service::TextToSpeech, e))
    }
}

#[async_trait]
impl SpeechService for TextToSpeechClient {
    async fn synthesize(&self, text: &str, options: &SynthesisOptions) -> Result<AudioClip> {
        let request = self.build_request(text, options)?;
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| Error::transport(Service::TextToSpeech, e))?;
        let body = utils::success_body(Service::TextToSpeech, response).await?;
        tracing::debug!("synthesized {} bytes of audio", body.len());
        AudioClip::from_wav(&body).map_err(|e| Error::Audio(format!("{e:#}")))
    }
}
