//! # formgen core
//!
//! Shared vocabulary for the formgen workspace: the flat component
//! descriptor model that the model is asked to emit, the placeholder UI a
//! session starts with, and the error taxonomy every tier reports through.

pub mod descriptor;

pub use descriptor::{ComponentDescriptor, DescriptorType, Props, UiDescription};

/// Result type for formgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a generation round trip
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Query was empty or whitespace. Raised before any network call.
    #[error("Please enter a query!")]
    EmptyQuery,

    /// Completion service unreachable, unauthorized or answering garbage
    #[error("completion service request failed: {0}")]
    Transport(String),

    /// Model text could not be read as a descriptor array
    #[error("Invalid JSON response from the model: {0}")]
    MalformedOutput(String),

    /// The session already has a generation in flight
    #[error("A generation is already in progress for this session")]
    GenerationInProgress,
}

impl Error {
    /// Message shown on the interactive page.
    ///
    /// Transport and output failures collapse into one generic notice; the
    /// detail only goes to the log.
    pub fn user_notice(&self) -> &'static str {
        match self {
            Error::EmptyQuery => "Please enter a query!",
            Error::Transport(_) | Error::MalformedOutput(_) => {
                "Something went wrong while generating the UI."
            }
            Error::GenerationInProgress => "Your app is still loading, hang on.",
        }
    }
}
