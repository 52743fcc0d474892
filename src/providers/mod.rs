//! Network transports for the completion call

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub mod openai;

// Re-export for convenience
pub use openai::HttpTransport;

/// One outbound POST of a completion request.
///
/// Implementations must stop work and return once `cancel` fires.
/// Non-success statuses are not errors at this layer; they come back
/// as an `HttpReply` for the orchestrator to classify.
#[async_trait]
pub trait Transport: Send + Sync
{   async fn post(
      &self
    , url: &str
    , api_key: &str
    , request: &crate::request::CompletionRequest
    , cancel: CancellationToken
    ) -> Result<crate::request::HttpReply, crate::error::ApiError>;
}
