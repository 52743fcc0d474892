use async_trait::async_trait;
use log::{debug, trace, error};
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::request::{CompletionRequest, HttpReply};

/// `reqwest` transport for OpenAI-compatible endpoints
#[derive(Debug, Clone, Default)]
pub struct HttpTransport
{   http_client: reqwest::Client
}

impl HttpTransport
{   pub fn new() -> Self
    {   debug!("Creating HttpTransport");
        HttpTransport
        {   http_client: reqwest::Client::new()
        }
    }

    async fn exchange(
      &self
    , url: &str
    , api_key: &str
    , request: &CompletionRequest
    ) -> Result<HttpReply, ApiError>
    {   trace!("Completion request: {:?}", request);

        let response = self.http_client
          .post(url)
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            ApiError::from(e.to_string())
          })?;

        let status = response.status().as_u16();
        trace!("Completion response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed reading response body: {}", e);
          ApiError::from(e.to_string())
        })?;

        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl super::Transport for HttpTransport
{   async fn post(
      &self
    , url: &str
    , api_key: &str
    , request: &CompletionRequest
    , cancel: CancellationToken
    ) -> Result<HttpReply, ApiError>
    {   debug!("POST {} (model {})", url, request.model);
        tokio::select!
        { biased;
          _ = cancel.cancelled() => {
            debug!("Completion request cancelled");
            Err(ApiError::from("request cancelled"))
          }
        , reply = self.exchange(url, api_key, request) => reply
        }
    }
}
