use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::header::ACCEPT;
use watson_voice_types::{MessageRequest, MessageResponse};

use crate::client::auth::Credentials;
use crate::client::consts::ACCEPT_JSON;
use crate::client::utils;
use crate::error::{Error, Result, Service};

/// The conversational-intent service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConversationService: Send + Sync {
    async fn message(&self, workspace_id: &str, request: &MessageRequest) -> Result<MessageResponse>;
}

/// HTTP client for the Conversation v1 `message` endpoint.
pub struct ConversationClient {
    http: reqwest::Client,
    credentials: Credentials,
    version_date: String,
}

impl ConversationClient {
    pub fn new(http: reqwest::Client, credentials: Credentials, version_date: &str) -> Self {
        Self {
            http,
            credentials,
            version_date: version_date.to_string(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn build_request(
        &self,
        workspace_id: &str,
        request: &MessageRequest,
    ) -> Result<reqwest::Request> {
        let url = utils::endpoint_url(
            Service::Conversation,
            self.credentials.endpoint(),
            &["v1", "workspaces", workspace_id, "message"],
        )?;
        self.credentials
            .authorize(self.http.post(url))
            .query(&[("version", self.version_date.as_str())])
            .header(ACCEPT, ACCEPT_JSON)
            .json(request)
            .build()
            .map_err(|e| Error::transport(Service::Conversation, e))
    }
}

#[async_trait]
impl ConversationService for ConversationClient {
    async fn message(&self, workspace_id: &str, request: &MessageRequest) -> Result<MessageResponse> {
        let http_request = self.build_request(workspace_id, request)?;
        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(|e| Error::transport(Service::Conversation, e))?;
        let body = utils::success_body(Service::Conversation, response).await?;
        tracing::debug!(
            "message response: {}",
            String::from_utf8_lossy(&body)
        );
        utils::parse_json(Service::Conversation, &body)
    }
}
