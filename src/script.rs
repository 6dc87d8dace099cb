use crate::client::{self, ClientConfig, ConversationClient, ConversationService, SpeechService, SynthesisOptions, TextToSpeechClient};
use crate::error::Result;
use crate::interpreter;
use crate::relay::{AudioOutput, SpeechRelay};
use crate::session::{ConversationSession, SessionStats};

/// Opening line sent before the scripted questions.
pub const GREETING: &str = "hello";

pub const DEFAULT_QUESTIONS: [&str; 5] = [
    "can you turn up the AC",
    "can you turn on the wipers",
    "can you turn off the wipers",
    "can you turn down the ac",
    "can you unlock the door",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Unauthenticated,
    Authenticating,
    Ready,
    AwaitingResponse,
    Responding,
    Terminated,
}

/// The utterances sent, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    greeting: Option<String>,
    questions: Vec<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            greeting: Some(GREETING.to_string()),
            questions: DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }
}

impl Script {
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            greeting: Some(GREETING.to_string()),
            questions,
        }
    }

    pub fn without_greeting(mut self) -> Self {
        self.greeting = None;
        self
    }

    pub fn utterances(&self) -> impl Iterator<Item = &str> {
        self.greeting
            .iter()
            .chain(self.questions.iter())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub stats: SessionStats,
    pub clips_played: u32,
    /// Set when an intent asked to end the conversation before the script ran out.
    pub stopped_early: bool,
}

/// Drives a script through a conversation session and a speech relay.
pub struct ScriptRunner<C: ConversationService, S: SpeechService, O: AudioOutput> {
    session: ConversationSession<C>,
    relay: SpeechRelay<S, O>,
    state: RunState,
}

impl<O: AudioOutput> ScriptRunner<ConversationClient, TextToSpeechClient, O> {
    /// Authenticates both services and returns a runner ready to start.
    pub async fn connect(config: &ClientConfig, output: O) -> Result<Self> {
        let mut state = RunState::Unauthenticated;
        transition(&mut state, RunState::Authenticating);
        let clients = match client::connect(config).await {
            Ok(clients) => clients,
            Err(e) => {
                transition(&mut state, RunState::Terminated);
                return Err(e);
            }
        };

        transition(&mut state, RunState::Ready);

        let session = ConversationSession::new(clients.conversation, config.workspace_id());
        let relay = SpeechRelay::new(
            clients.speech,
            output,
            SynthesisOptions::new(config.voice().clone()),
        );
        Ok(Self {
            session,
            relay,
            state,
        })
    }
}

impl<C: ConversationService, S: SpeechService, O: AudioOutput> ScriptRunner<C, S, O> {
    /// Wraps an already authenticated session and relay.
    pub fn new(session: ConversationSession<C>, relay: SpeechRelay<S, O>) -> Self {
        Self {
            session,
            relay,
            state: RunState::Ready,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn session(&self) -> &ConversationSession<C> {
        &self.session
    }

    /// Sends each utterance in turn and speaks the replies.
    ///
    /// A failed request costs only its own turn. A reply that cannot be
    /// parsed, or any other fatal error, ends the run.
    pub async fn run(&mut self, script: &Script) -> Result<RunSummary> {
        let mut stopped_early = false;
        let mut utterances = script.utterances().peekable();

        while let Some(text) = utterances.next() {
            transition(&mut self.state, RunState::AwaitingResponse);
            let response = match self.session.send(text).await {
                Ok(response) => response,
                Err(e) if !e.is_fatal() => {
                    tracing::error!("turn {:?} abandoned: {}", text, e);
                    continue;
                }
                Err(e) => {
                    transition(&mut self.state, RunState::Terminated);
                    return Err(e);
                }
            };

            transition(&mut self.state, RunState::Responding);
            let turn = interpreter::interpret(&response);
            tracing::info!("Intent/Output Text: {}/{}", turn.intent(), turn.output_text());
            for (entity, value) in turn.entities() {
                tracing::debug!("entity {}={}", entity, value);
            }

            match turn.speech() {
                Some(text) => self.relay.speak(text).await,
                None => tracing::debug!("nothing actionable in this turn"),
            }

            if turn.should_stop() {
                stopped_early = utterances.peek().is_some();
                if stopped_early {
                    tracing::info!("intent {:?} ended the conversation", turn.intent());
                }
                break;
            }
        }

        transition(&mut self.state, RunState::Terminated);
        let summary = RunSummary {
            stats: self.session.stats().clone(),
            clips_played: self.relay.clips_played(),
            stopped_early,
        };
        tracing::info!(
            "Conversation complete: {} turns, {} failed, {} clips played",
            summary.stats.turns_completed(),
            summary.stats.turns_failed(),
            summary.clips_played
        );
        Ok(summary)
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!("state: {:?} -> {:?}", state, next);
    *state = next;
}
