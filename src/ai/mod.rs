//! Generative AI backends
//!
//! The analysis service only needs "prompt in, text out"; [`TextGenerator`]
//! is that seam. [`gemini::GeminiClient`] is the production implementation.

pub mod gemini;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Trait for text-generation backends
///
/// Implementations must be thread-safe (Send + Sync) to work with the async server.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs and status output
    fn name(&self) -> &str;

    /// Submit `prompt` and return the model's raw text reply
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// API credential for the AI service
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key; blank input yields None
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
