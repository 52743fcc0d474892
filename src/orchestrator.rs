//! One trigger, one completion round trip
//!
//! `RequestOrchestrator` turns a trigger tag into a prompt pair, makes a
//! single bounded call through a [`Transport`], classifies the outcome and
//! reports it as a sequence of [`RequestState`] events:
//! `Loading -> (Succeeded | Failed) -> Idle`.

use std::sync::Arc;
use std::time::Duration;
use log::{debug, trace, error, info};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::prompts::resolve_prompt;
use crate::providers::Transport;
use crate::request::{CompletionRequest, CompletionResponse, HttpReply};

pub const LOADING_TEXT: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStyle
{   Normal
  , Error
}

/// What the front-end should show for a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered
{   pub text: String
  , pub style: DisplayStyle
}

/// Loading-state transitions for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState
{   /// Call in flight; triggers disabled
    Loading
  , Succeeded(String)
  , Failed(ApiError)
  , /// Invocation over; triggers enabled again
    Idle
}

impl RequestState
{   pub fn controls_enabled(&self) -> bool
    {   !matches!(self, RequestState::Loading)
    }

    /// `Idle` changes nothing on screen except the controls
    pub fn rendered(&self) -> Option<Rendered>
    {   match self
        {   RequestState::Loading => Some(Rendered
            {   text: LOADING_TEXT.to_string()
              , style: DisplayStyle::Normal
            })
          , RequestState::Succeeded(text) => Some(Rendered
            {   text: text.clone()
              , style: DisplayStyle::Normal
            })
          , RequestState::Failed(err) => Some(Rendered
            {   text: err.user_message()
              , style: DisplayStyle::Error
            })
          , RequestState::Idle => None
        }
    }
}

/// Sends `Idle` when dropped, so it goes out once on every exit path,
/// including the invocation future being dropped mid-call.
struct IdleGuard<'a>
{   events: &'a UnboundedSender<RequestState>
}

impl Drop for IdleGuard<'_>
{   fn drop(&mut self)
    {   trace!("Invocation finished, back to Idle");
        let _ = self.events.send(RequestState::Idle);
    }
}

pub struct RequestOrchestrator
{   config: ClientConfig
  , transport: Arc<dyn Transport>
}

impl RequestOrchestrator
{   pub fn new(
      config: ClientConfig
    , transport: Arc<dyn Transport>
    ) -> Self
    {   debug!(
          "Creating RequestOrchestrator for model {}",
          config.model
        );
        RequestOrchestrator
        {   config
          , transport
        }
    }

    pub fn set_api_key(&mut self, key: String)
    {   debug!("Replacing API key");
        self.config.api_key = Some(key);
    }

    /// Make one completion call and return the trimmed text.
    ///
    /// Fails with `MissingCredential` before touching the transport when no
    /// key is configured. The call races a timer of `timeout_ms`; if the
    /// timer wins, the transport's token is cancelled and the call dropped.
    pub async fn issue_completion(
      &self
    , system: &str
    , user: &str
    ) -> Result<String, ApiError>
    {   let api_key = self.config.credential().ok_or_else(|| {
          debug!("No API key configured");
          ApiError::MissingCredential
        })?;

        let request = CompletionRequest::from_prompt(
          &self.config, system, user
        );
        let url = self.config.completions_url();
        let deadline = Duration::from_millis(self.config.timeout_ms);
        let cancel = CancellationToken::new();

        let reply = tokio::select!
        { reply = self.transport.post(
            &url, api_key, &request, cancel.clone()
          ) => reply?
        , _ = tokio::time::sleep(deadline) => {
            cancel.cancel();
            debug!(
              "No response within {} ms, request cancelled",
              self.config.timeout_ms
            );
            return Err(ApiError::Timeout);
          }
        };

        classify_reply(reply)
    }

    /// Run one full interaction for `tag`.
    ///
    /// Unknown tags are ignored: no events and `None`. Otherwise the
    /// outcome is both emitted on `events` and returned. A closed
    /// receiver is not an error.
    pub async fn handle_request(
      &self
    , tag: &str
    , events: &UnboundedSender<RequestState>
    ) -> Option<Result<String, ApiError>>
    {   let pair = match resolve_prompt(tag)
        {   Some(pair) => pair
          , None => {
              debug!("Ignoring unknown request type: {:?}", tag);
              return None;
            }
        };

        info!("Handling {} request", tag.trim());
        let _ = events.send(RequestState::Loading);
        let _idle = IdleGuard { events };

        let result = self
          .issue_completion(&pair.system, &pair.user)
          .await;

        match &result
        {   Ok(text) => {
              debug!("Completion received ({} chars)", text.len());
              let _ = events.send(
                RequestState::Succeeded(text.clone())
              );
            }
          , Err(err) => {
              error!("{} request failed: {}", tag.trim(), err);
              let _ = events.send(RequestState::Failed(err.clone()));
            }
        }

        Some(result)
    }
}

/// Map an HTTP reply onto the completion text or an `ApiError`
pub fn classify_reply(reply: HttpReply) -> Result<String, ApiError>
{   if !reply.is_success()
    {   debug!("API error {}: {}", reply.status, reply.body);
        return Err(match reply.status
        {   401 => ApiError::Unauthorized
          , 429 => ApiError::RateLimited
          , status => ApiError::ServerError
            {   status
              , body: reply.body
            }
        });
    }

    let response: CompletionResponse
      = serde_json::from_str(&reply.body).map_err(|e| {
        debug!("Parse error: {}", e);
        ApiError::Parse(e.to_string())
      })?;

    match response.first_content().map(str::trim)
    {   Some(text) if !text.is_empty() => Ok(text.to_string())
      , _ => {
          debug!("No content in response");
          Err(ApiError::EmptyResponse)
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn status_classification()
    {   assert_eq!(
          classify_reply(HttpReply::new(401, "nope")),
          Err(ApiError::Unauthorized)
        );
        assert_eq!(
          classify_reply(HttpReply::new(429, "slow down")),
          Err(ApiError::RateLimited)
        );
        assert_eq!(
          classify_reply(HttpReply::new(404, "missing")),
          Err(ApiError::ServerError
          {   status: 404
            , body: "missing".to_string()
          })
        );
    }

    #[test]
    fn content_is_trimmed()
    {   let body = r#"{"choices":[{"message":{"content":"\n hi \n"}}]}"#;
        assert_eq!(
          classify_reply(HttpReply::new(200, body)),
          Ok("hi".to_string())
        );
    }

    #[test]
    fn missing_or_blank_content_is_empty_response()
    {   for body in [
          r#"{"choices":[]}"#
        , r#"{}"#
        , r#"{"choices":[{"message":{}}]}"#
        , r#"{"choices":[{"message":{"content":null}}]}"#
        , r#"{"choices":[{"message":{"content":"   "}}]}"#
        ]
        {   assert_eq!(
              classify_reply(HttpReply::new(200, body)),
              Err(ApiError::EmptyResponse),
              "body: {}", body
            );
        }
    }

    #[test]
    fn non_json_success_is_parse_error()
    {   assert!(matches!(
          classify_reply(HttpReply::new(200, "<html>")),
          Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn rendering_and_controls()
    {   assert!(!RequestState::Loading.controls_enabled());
        assert!(RequestState::Idle.controls_enabled());
        assert_eq!(RequestState::Idle.rendered(), None);

        let failed = RequestState::Failed(ApiError::RateLimited)
          .rendered()
          .unwrap();
        assert_eq!(failed.style, DisplayStyle::Error);

        let ok = RequestState::Succeeded("hey".to_string())
          .rendered()
          .unwrap();
        assert_eq!(ok.style, DisplayStyle::Normal);
        assert_eq!(ok.text, "hey");
    }
}
