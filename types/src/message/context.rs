use serde_json::{Map, Value};

/// Dialog state returned by the service with every message response.
///
/// The client never looks inside it. It is echoed back verbatim on the next
/// request and replaced wholesale when a new one arrives.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn with_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// The `conversation_id` the service assigns on the first turn, if any.
    pub fn conversation_id(&self) -> Option<&str> {
        self.0.get("conversation_id").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
