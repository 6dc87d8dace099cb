use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Synthesis voices. Anything the service offers beyond these goes through `Custom`.
#[derive(Debug, Clone, PartialEq)]
pub enum Voice {
    EnUsMichael,
    EnUsAllison,
    EnUsLisa,
    EnGbKate,
    Custom(String),
}

impl Voice {
    pub fn as_str(&self) -> &str {
        match self {
            Voice::EnUsMichael => "en-US_MichaelVoice",
            Voice::EnUsAllison => "en-US_AllisonVoice",
            Voice::EnUsLisa => "en-US_LisaVoice",
            Voice::EnGbKate => "en-GB_KateVoice",
            Voice::Custom(s) => s,
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Voice::EnUsMichael
    }
}

impl From<&str> for Voice {
    fn from(s: &str) -> Self {
        match s {
            "en-US_MichaelVoice" => Voice::EnUsMichael,
            "en-US_AllisonVoice" => Voice::EnUsAllison,
            "en-US_LisaVoice" => Voice::EnUsLisa,
            "en-GB_KateVoice" => Voice::EnGbKate,
            _ => Voice::Custom(s.to_string()),
        }
    }
}

impl FromStr for Voice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Voice::from(s))
    }
}

impl Serialize for Voice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Voice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Voice::from(s.as_str()))
    }
}

/// Body of `POST /v1/synthesize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    text: String,
}

impl SynthesizeRequest {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_custom_voices_parse() {
        assert_eq!(Voice::from_str("en-US_AllisonVoice").unwrap(), Voice::EnUsAllison);
        assert_eq!(
            Voice::from_str("de-DE_BirgitVoice").unwrap(),
            Voice::Custom("de-DE_BirgitVoice".to_string())
        );
        assert_eq!(Voice::default().as_str(), "en-US_MichaelVoice");
    }
}
