pub mod client;
pub mod error;
pub mod interpreter;
pub mod relay;
pub mod script;
pub mod session;

pub use watson_voice_types as types;
pub use watson_voice_utils as utils;

pub use client::{connect, ClientConfig, Clients, ConversationService, SpeechService};
pub use error::{Error, Result, Service};
pub use interpreter::{interpret, Interpretation};
pub use relay::{AudioOutput, DeviceOutput, MutedOutput, Playback, SpeechRelay};
pub use script::{RunState, RunSummary, Script, ScriptRunner};
pub use session::{ConversationSession, SessionStats};
