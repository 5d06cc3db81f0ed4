//! # Schema requester
//!
//! Turns a free-text description into a [`UiDescription`]: validate the
//! query, wrap it in the instruction template, make exactly one completion
//! call, parse the answer. No retry, no cache, no streaming.

pub mod client;
pub mod prompt;

pub use client::{CompletionService, Message, OpenAiClient};
pub use prompt::build_prompt;

use formgen_core::{Error, Result, UiDescription};
use std::sync::Arc;
use std::time::Instant;

/// Reject empty or whitespace-only queries. Returns the query untouched.
pub fn validate_query(query: &str) -> Result<&str> {
    if query.trim().is_empty() {
        Err(Error::EmptyQuery)
    } else {
        Ok(query)
    }
}

/// Issues generation requests against a completion service
#[derive(Clone)]
pub struct SchemaRequester {
    service: Arc<dyn CompletionService>,
}

impl SchemaRequester {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }

    /// Raw completion text for `query`, after validation
    pub async fn request_raw(&self, query: &str) -> Result<String> {
        let query = validate_query(query)?;
        let prompt = build_prompt(query);
        let start = Instant::now();
        let result = self.service.complete(&prompt).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(text) => tracing::info!(
                model = %self.service.model(),
                latency_ms,
                chars = text.len(),
                "completion received"
            ),
            Err(e) => tracing::warn!(
                model = %self.service.model(),
                latency_ms,
                error = %e,
                "completion failed"
            ),
        }
        result
    }

    /// Full round trip: query in, description out
    pub async fn generate(&self, query: &str) -> Result<UiDescription> {
        let raw = self.request_raw(query).await?;
        formgen_schema::parse_ui_description(&raw)
    }
}
