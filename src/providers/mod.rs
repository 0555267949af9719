//! Text-generation backends

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use crate::error::Error;
use crate::request::{CompletionRequest, CompletionResponse};

/// External chat-completion service
///
/// Implementations own transport and wire details. Failures are
/// returned as-is; callers do not retry.
#[async_trait]
pub trait CompletionBackend: Send + Sync
{   async fn complete(&self, request: &CompletionRequest)
      -> Result<CompletionResponse, Error>;
}
