use crate::message::{Context, Input};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Intent {
    intent: String,
    #[serde(default)]
    confidence: f64,
}

impl Intent {
    pub fn new(intent: &str, confidence: f64) -> Self {
        Self {
            intent: intent.to_string(),
            confidence,
        }
    }

    pub fn intent(&self) -> &str {
        &self.intent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    entity: String,
    value: String,
    /// Character offsets `[start, end)` of the match in the input text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

impl Entity {
    pub fn new(entity: &str, value: &str) -> Self {
        Self {
            entity: entity.to_string(),
            value: value.to_string(),
            location: None,
            confidence: None,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn location(&self) -> Option<[usize; 2]> {
        self.location
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Output {
    #[serde(default)]
    text: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    nodes_visited: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    log_messages: Vec<serde_json::Value>,
}

impl Output {
    pub fn new(text: Vec<String>) -> Self {
        Self {
            text,
            ..Default::default()
        }
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    pub fn nodes_visited(&self) -> &[String] {
        &self.nodes_visited
    }

    pub fn log_messages(&self) -> &[serde_json::Value] {
        &self.log_messages
    }
}

/// Response of `POST /v1/workspaces/{workspace_id}/message`.
///
/// Every collection defaults to empty when the service leaves it out, so a
/// missing field and an empty one read the same. `context` stays optional
/// because its absence matters to the caller.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    intents: Vec<Intent>,
    #[serde(default)]
    entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<Input>,
    #[serde(default)]
    output: Output,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<Context>,
}

impl MessageResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intents.push(intent);
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_output_text(mut self, text: &str) -> Self {
        self.output.text.push(text.to_string());
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn input(&self) -> Option<&Input> {
        self.input.as_ref()
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}
