/// Error body both services return alongside a non-2xx status.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceError {
    error: String,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

impl ServiceError {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            code: None,
            description: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn code(&self) -> Option<u16> {
        self.code
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{} ({})", self.error, description),
            None => f.write_str(&self.error),
        }
    }
}
