use watson_voice_types::MessageResponse;

/// Marker in an intent name that ends the conversation.
pub const STOP_INTENT_MARKER: &str = "exit";

/// What a single turn asks the client to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    intent: String,
    confidence: f64,
    output_text: String,
    entities: Vec<(String, String)>,
    actionable: bool,
}

impl Interpretation {
    /// Top-ranked intent, or empty.
    pub fn intent(&self) -> &str {
        &self.intent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// First output line, or empty.
    pub fn output_text(&self) -> &str {
        &self.output_text
    }

    pub fn entities(&self) -> &[(String, String)] {
        &self.entities
    }

    /// False when the response recognised neither an intent nor an entity.
    pub fn is_actionable(&self) -> bool {
        self.actionable
    }

    pub fn should_stop(&self) -> bool {
        self.intent.contains(STOP_INTENT_MARKER)
    }

    /// The text to hand to speech synthesis, if this turn has any.
    pub fn speech(&self) -> Option<&str> {
        (self.actionable && !self.output_text.is_empty()).then_some(self.output_text.as_str())
    }
}

pub fn interpret(response: &MessageResponse) -> Interpretation {
    let top = response.intents().first();
    Interpretation {
        intent: top.map(|i| i.intent().to_string()).unwrap_or_default(),
        confidence: top.map(|i| i.confidence()).unwrap_or_default(),
        output_text: response.output().text().first().cloned().unwrap_or_default(),
        entities: response
            .entities()
            .iter()
            .map(|e| (e.entity().to_string(), e.value().to_string()))
            .collect(),
        actionable: !response.intents().is_empty() || !response.entities().is_empty(),
    }
}
