use std::fmt;

use crate::error::ScoreError;

/// Outcome class of a plugin call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// The returned score is authoritative.
    Success,
    /// The returned score must be ignored.
    Error,
}

/// Result of a plugin call as seen by the runner.
///
/// A success carries no message. An error always does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn success() -> Self {
        Self {
            code: Code::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: Code::Error,
            message: Some(message.into()),
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.code == Code::Success
    }

    /// Back to a `Result` for `?` call sites, keeping the message.
    pub fn as_result(&self) -> Result<(), String> {
        match self.code {
            Code::Success => Ok(()),
            Code::Error => Err(self.message.clone().unwrap_or_default()),
        }
    }

    /// Turns a fallible score into the `(score, status)` pair the runner
    /// expects. Failed scores are reported as 0.
    pub fn score_result(result: Result<i64, ScoreError>) -> (i64, Status) {
        match result {
            Ok(score) => (score, Status::success()),
            Err(err) => (0, Status::from(err)),
        }
    }
}

impl From<ScoreError> for Status {
    fn from(err: ScoreError) -> Self {
        Status::error(err.to_string())
    }
}

impl From<Result<(), ScoreError>> for Status {
    fn from(result: Result<(), ScoreError>) -> Self {
        match result {
            Ok(()) => Status::success(),
            Err(err) => err.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Code::Success, _) => write!(f, "Success"),
            (Code::Error, Some(msg)) => write!(f, "Error: {}", msg),
            (Code::Error, None) => write!(f, "Error"),
        }
    }
}
