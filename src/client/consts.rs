pub const CONVERSATION_URL: &str = "https://gateway.watsonplatform.net/conversation/api";
pub const TEXT_TO_SPEECH_URL: &str = "https://stream.watsonplatform.net/text-to-speech/api";
pub const IAM_URL: &str = "https://iam.bluemix.net/identity/token";

pub const DEFAULT_VERSION_DATE: &str = "2018-07-10";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client id/secret the identity endpoint expects on API key grants.
pub const IAM_CLIENT_ID: &str = "bx";
pub const IAM_CLIENT_SECRET: &str = "bx";

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_WAV: &str = "audio/wav";

pub const CONVERSATION_URL_VAR: &str = "CONVERSATION_URL";
pub const CONVERSATION_WORKSPACE_ID_VAR: &str = "CONVERSATION_WORKSPACE_ID";
pub const CONVERSATION_VERSION_DATE_VAR: &str = "CONVERSATION_VERSION_DATE";
pub const CONVERSATION_PREFIX: &str = "CONVERSATION";
pub const TTS_PREFIX: &str = "TTS";
pub const TTS_VOICE_VAR: &str = "TTS_VOICE";
pub const REQUEST_TIMEOUT_SECS_VAR: &str = "REQUEST_TIMEOUT_SECS";
pub const AUDIO_OUTPUT_DEVICE_VAR: &str = "AUDIO_OUTPUT_DEVICE";
