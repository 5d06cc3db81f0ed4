//! Button action table
//!
//! A button's `action` prop names one of a closed set of side effects.
//! Names outside the set resolve to nothing and activation is a no-op.

use formgen_core::Props;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    AddEntry,
    ExportData,
    ClearData,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::AddEntry, Action::ExportData, Action::ClearData];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add-entry" => Some(Action::AddEntry),
            "export-data" => Some(Action::ExportData),
            "clear-data" => Some(Action::ClearData),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::AddEntry => "add-entry",
            Action::ExportData => "export-data",
            Action::ClearData => "clear-data",
        }
    }

    /// Run the action against the activating button's props
    pub fn run(&self, props: &Props) -> Acknowledgement {
        let message = match self {
            Action::AddEntry => "✅ Entry added!",
            Action::ExportData => "📤 Data exported.",
            Action::ClearData => "🗑️ All entries cleared.",
        };
        Acknowledgement {
            action: *self,
            message: message.to_string(),
            label: props
                .get("text")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the visitor is told after an action ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Acknowledgement {
    pub action: Action,
    pub message: String,
    /// Label of the button that fired
    pub label: Option<String>,
}

/// Resolve `props.action` and run it. `None` when nothing was registered
/// under that name.
pub fn dispatch(props: &Props) -> Option<Acknowledgement> {
    let name = props.get("action").and_then(|v| v.as_str());
    tracing::debug!(action = name.unwrap_or(""), "button activated");

    let action = name.and_then(Action::from_name)?;
    Some(action.run(props))
}
