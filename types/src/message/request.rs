use crate::message::Context;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Input {
    text: String,
}

impl Input {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Body of `POST /v1/workspaces/{workspace_id}/message`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageRequest {
    input: Input,

    /// Context from the previous turn. Omitted on the first turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<Context>,
}

impl MessageRequest {
    pub fn builder() -> MessageRequestBuilder {
        MessageRequestBuilder::new()
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

pub struct MessageRequestBuilder {
    request: MessageRequest,
}

impl Default for MessageRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: MessageRequest {
                input: Input::new(""),
                context: None,
            },
        }
    }

    pub fn with_input_text(mut self, text: &str) -> Self {
        self.request.input = Input::new(text);
        self
    }

    pub fn with_context(mut self, context: Option<Context>) -> Self {
        self.request.context = context;
        self
    }

    pub fn build(self) -> MessageRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_turn_omits_context() {
        let request = MessageRequest::builder().with_input_text("hello").build();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "input": { "text": "hello" } }));
    }

    #[test]
    fn context_is_sent_verbatim() {
        let context = Context::new()
            .with_value("conversation_id", "abc")
            .with_value("system", serde_json::json!({ "dialog_turn_counter": 2 }));
        let request = MessageRequest::builder()
            .with_input_text("can you unlock the door")
            .with_context(Some(context))
            .build();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "input": { "text": "can you unlock the door" },
                "context": { "conversation_id": "abc", "system": { "dialog_turn_counter": 2 } }
            })
        );
    }
}
