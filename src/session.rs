use watson_voice_types::{Context, MessageRequest, MessageResponse};

use crate::client::ConversationService;
use crate::error::Result;

mod stats;

pub use stats::SessionStats;

/// One conversation with the service.
///
/// Holds the dialog context between turns. `send` takes `&mut self`, so a
/// session can never have two requests outstanding.
pub struct ConversationSession<C: ConversationService> {
    service: C,
    workspace_id: String,
    context: Option<Context>,
    stats: SessionStats,
}

impl<C: ConversationService> ConversationSession<C> {
    pub fn new(service: C, workspace_id: &str) -> Self {
        Self {
            service,
            workspace_id: workspace_id.to_string(),
            context: None,
            stats: SessionStats::new(),
        }
    }

    /// Sends `text` with the current context and waits for the reply.
    ///
    /// A reply carrying a context replaces the stored one. A reply without
    /// one leaves the previous context in place. Failures are returned as-is
    /// and leave the context untouched.
    pub async fn send(&mut self, text: &str) -> Result<MessageResponse> {
        let request = MessageRequest::builder()
            .with_input_text(text)
            .with_context(self.context.clone())
            .build();
        tracing::debug!("sending message: {:?}", text);

        let response = match self.service.message(&self.workspace_id, &request).await {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_failed();
                return Err(e);
            }
        };

        match response.context() {
            Some(context) => self.context = Some(context.clone()),
            None => tracing::warn!("response carried no context, keeping the previous one"),
        }
        self.stats.record_completed(response.context().is_some());
        Ok(response)
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::conversation::MockConversationService;
    use crate::error::{Error, Service};
    use mockall::Sequence;

    #[tokio::test]
    async fn context_from_one_turn_is_sent_on_the_next() {
        let mut service = MockConversationService::new();
        let mut seq = Sequence::new();
        service
            .expect_message()
            .withf(|workspace_id, request| {
                workspace_id == "ws-1" && request.input().text() == "hello" && request.context().is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new().with_context(Context::new().with_value("slot", "x"))));
        service
            .expect_message()
            .withf(|_, request| {
                request.context() == Some(&Context::new().with_value("slot", "x"))
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new().with_context(Context::new().with_value("slot", "y"))));

        let mut session = ConversationSession::new(service, "ws-1");
        session.send("hello").await.unwrap();
        session.send("can you turn up the AC").await.unwrap();

        assert_eq!(session.context(), Some(&Context::new().with_value("slot", "y")));
        assert_eq!(session.stats().turns_completed(), 2);
    }

    #[tokio::test]
    async fn context_is_replaced_not_merged() {
        let mut service = MockConversationService::new();
        let mut seq = Sequence::new();
        service
            .expect_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(MessageResponse::new().with_context(Context::new().with_value("a", 1).with_value("b", 2)))
            });
        service
            .expect_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new().with_context(Context::new().with_value("c", 3))));

        let mut session = ConversationSession::new(service, "ws-1");
        session.send("one").await.unwrap();
        session.send("two").await.unwrap();

        let context = session.context().unwrap();
        assert!(context.get("a").is_none());
        assert_eq!(context.get("c"), Some(&serde_json::json!(3)));
    }

    #[tokio::test]
    async fn missing_context_keeps_the_previous_one() {
        let mut service = MockConversationService::new();
        let mut seq = Sequence::new();
        service
            .expect_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new().with_context(Context::new().with_value("slot", "x"))));
        service
            .expect_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new()));
        service
            .expect_message()
            .withf(|_, request| request.context() == Some(&Context::new().with_value("slot", "x")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new()));

        let mut session = ConversationSession::new(service, "ws-1");
        session.send("one").await.unwrap();
        session.send("two").await.unwrap();
        session.send("three").await.unwrap();

        assert_eq!(session.stats().context_missing(), 2);
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced_without_retry() {
        let mut service = MockConversationService::new();
        let mut seq = Sequence::new();
        service
            .expect_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(MessageResponse::new().with_context(Context::new().with_value("slot", "x"))));
        service
            .expect_message()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::transport(Service::Conversation, "connection reset")));

        let mut session = ConversationSession::new(service, "ws-1");
        session.send("one").await.unwrap();
        let err = session.send("two").await.unwrap_err();

        assert!(matches!(err, Error::Transport { service: Service::Conversation, .. }));
        assert_eq!(session.context(), Some(&Context::new().with_value("slot", "x")));
        assert_eq!(session.stats().turns_completed(), 1);
        assert_eq!(session.stats().turns_failed(), 1);
    }
}
