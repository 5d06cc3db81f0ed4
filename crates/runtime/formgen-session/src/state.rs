//! Generation state machine
//!
//! ```text
//!   Idle(default) ──submit──▶ Loading(prev) ──ok──▶ Rendered(new)
//!   Rendered ─────submit──▶ Loading(prev) ──err─▶ Error(prev)
//!   Error ────────submit──▶ Loading(prev)
//! ```
//!
//! States are plain values. `submit` borrows and builds the next state so a
//! rejected submission leaves the caller's state untouched; `settle`
//! consumes the Loading state.

use formgen_core::{Error, Result, UiDescription};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Fresh session showing the placeholder form
    Idle(UiDescription),
    /// Generation in flight; `previous` comes back on failure
    Loading { previous: UiDescription },
    /// Last generation succeeded
    Rendered(UiDescription),
    /// Last generation failed; `previous` is still on screen
    Error {
        previous: UiDescription,
        message: String,
    },
}

impl SessionState {
    pub fn initial() -> Self {
        SessionState::Idle(UiDescription::default_form())
    }

    /// The description currently owned by the session
    pub fn ui(&self) -> &UiDescription {
        match self {
            SessionState::Idle(ui) | SessionState::Rendered(ui) => ui,
            SessionState::Loading { previous } | SessionState::Error { previous, .. } => previous,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle(_) => "idle",
            SessionState::Loading { .. } => "loading",
            SessionState::Rendered(_) => "rendered",
            SessionState::Error { .. } => "error",
        }
    }

    /// Start a generation. Only one may be in flight.
    pub fn submit(&self) -> Result<SessionState> {
        if self.is_loading() {
            return Err(Error::GenerationInProgress);
        }
        Ok(SessionState::Loading {
            previous: self.ui().clone(),
        })
    }

    /// Apply a generation outcome.
    ///
    /// Success replaces the UI wholesale. Failure keeps whatever was shown
    /// before the submission.
    pub fn settle(self, outcome: Result<UiDescription>) -> SessionState {
        match outcome {
            Ok(ui) => SessionState::Rendered(ui),
            Err(e) => {
                let previous = match self {
                    SessionState::Loading { previous } => previous,
                    other => other.ui().clone(),
                };
                SessionState::Error {
                    previous,
                    message: e.user_notice().to_string(),
                }
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}
