use std::fmt;

/// The remote party a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Conversation,
    TextToSpeech,
    Identity,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Service::Conversation => "conversation",
            Service::TextToSpeech => "text-to-speech",
            Service::Identity => "identity",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid settings. Raised before any request goes out.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be sent or the service answered with an error status.
    #[error("{service} request failed: {detail}")]
    Transport { service: Service, detail: String },

    /// The service answered but the body did not have the expected shape.
    #[error("unexpected {service} response: {detail}")]
    Serialization { service: Service, detail: String },

    #[error("audio error: {0}")]
    Audio(String),
}

impl Error {
    pub fn configuration(detail: impl Into<String>) -> Self {
        Error::Configuration(detail.into())
    }

    pub fn transport(service: Service, detail: impl fmt::Display) -> Self {
        Error::Transport {
            service,
            detail: detail.to_string(),
        }
    }

    pub fn serialization(service: Service, detail: impl fmt::Display) -> Self {
        Error::Serialization {
            service,
            detail: detail.to_string(),
        }
    }

    /// Transport failures cost one turn. Everything else ends the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Transport { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
