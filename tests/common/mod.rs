#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use promptdeck::request::{CompletionRequest, HttpReply};
use promptdeck::{ApiError, ClientConfig, RequestState, Transport};

/// What the mock does with each call
#[derive(Debug, Clone)]
pub enum Behavior
{   Reply(HttpReply)
  , Fail(ApiError)
  , /// Reply after a delay
    Slow(Duration, HttpReply)
  , /// Never answers
    Hang
}

/// One recorded call
#[derive(Debug, Clone)]
pub struct Call
{   pub url: String
  , pub api_key: String
  , pub request: CompletionRequest
  , pub cancel: CancellationToken
}

pub struct MockTransport
{   behavior: Behavior
  , calls: Mutex<Vec<Call>>
  , in_flight: AtomicUsize
  , max_in_flight: AtomicUsize
}

impl MockTransport
{   pub fn new(behavior: Behavior) -> Self
    {   MockTransport
        {   behavior
          , calls: Mutex::new(vec![])
          , in_flight: AtomicUsize::new(0)
          , max_in_flight: AtomicUsize::new(0)
        }
    }

    pub fn replying(status: u16, body: &str) -> Self
    {   Self::new(Behavior::Reply(HttpReply::new(status, body)))
    }

    pub fn call_count(&self) -> usize
    {   self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Call>
    {   self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize
    {   self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport
{   async fn post(
      &self
    , url: &str
    , api_key: &str
    , request: &CompletionRequest
    , cancel: CancellationToken
    ) -> Result<HttpReply, ApiError>
    {   self.calls.lock().unwrap().push(Call
        {   url: url.to_string()
          , api_key: api_key.to_string()
          , request: request.clone()
          , cancel: cancel.clone()
        });
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match &self.behavior
        {   Behavior::Reply(reply) => Ok(reply.clone())
          , Behavior::Fail(err) => Err(err.clone())
          , Behavior::Slow(delay, reply) => {
              tokio::time::sleep(*delay).await;
              Ok(reply.clone())
            }
          , Behavior::Hang => {
              std::future::pending::<Result<HttpReply, ApiError>>()
                .await
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub const HELLO_BODY: &str
  = r#"{"choices":[{"message":{"content":"  Hello there.  "}}]}"#;

pub fn keyed_config() -> ClientConfig
{   ClientConfig::default().with_api_key("test-key")
}

/// Drain whatever has been sent so far
pub fn drain(
  rx: &mut tokio::sync::mpsc::UnboundedReceiver<RequestState>
) -> Vec<RequestState>
{   let mut states = vec![];
    while let Ok(state) = rx.try_recv()
    {   states.push(state);
    }
    states
}

/// Receive until the sender side closes
pub async fn collect(
  mut rx: tokio::sync::mpsc::UnboundedReceiver<RequestState>
) -> Vec<RequestState>
{   let mut states = vec![];
    while let Some(state) = rx.recv().await
    {   states.push(state);
    }
    states
}
