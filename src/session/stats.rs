/// Turn counters for one conversation session.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionStats {
    turns_completed: u32,
    turns_failed: u32,
    context_missing: u32,
}

impl SessionStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_completed(&mut self, had_context: bool) {
        self.turns_completed += 1;
        if !had_context {
            self.context_missing += 1;
        }
    }

    pub(crate) fn record_failed(&mut self) {
        self.turns_failed += 1;
    }

    pub fn turns_completed(&self) -> u32 {
        self.turns_completed
    }

    pub fn turns_failed(&self) -> u32 {
        self.turns_failed
    }

    /// Completed turns whose response carried no context.
    pub fn context_missing(&self) -> u32 {
        self.context_missing
    }
}
