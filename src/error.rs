use std::fmt;

/// Error type for a single completion round trip.
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError
{   /// No API key was configured
    MissingCredential
  , /// No response before the deadline
    Timeout
  , /// HTTP 401
    Unauthorized
  , /// HTTP 429
    RateLimited
  , /// Any other non-success status, with the raw body
    ServerError
    {   status: u16
      , body: String
    }
  , /// Success status but no usable content
    EmptyResponse
  , /// Network-level failure
    Transport(String)
  , /// Success body was not valid JSON
    Parse(String)
  , /// Invalid configuration
    Config(String)
  , /// Backend task is gone
    BackendClosed
}

impl ApiError
{   /// Text shown to the user when this error ends an invocation
    pub fn user_message(&self) -> String
    {   match self
        {   ApiError::MissingCredential => {
              "No API key configured. Add your API key to the \
               configuration and try again."
                .to_string()
            }
          , ApiError::Timeout => {
              "The request timed out. Please try again.".to_string()
            }
          , ApiError::Unauthorized => {
              "Invalid API key. Please check your credentials."
                .to_string()
            }
          , ApiError::RateLimited => {
              "Too many requests. Please wait a moment and try again."
                .to_string()
            }
          , ApiError::ServerError { status, body } => {
              format!("API error ({}): {}", status, body)
            }
          , ApiError::EmptyResponse => {
              "No response received. Please try again.".to_string()
            }
          , ApiError::Transport(msg) => {
              format!("Error: {}", msg)
            }
          , ApiError::Parse(msg) => {
              format!("Could not read the response: {}", msg)
            }
          , ApiError::Config(msg) => {
              format!("Configuration problem: {}", msg)
            }
          , ApiError::BackendClosed => {
              "The app stopped responding. Please restart it."
                .to_string()
            }
        }
    }
}

impl fmt::Display for ApiError
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   ApiError::MissingCredential => {
              write!(f, "Missing API key")
            }
          , ApiError::Timeout => {
              write!(f, "Request timed out")
            }
          , ApiError::Unauthorized => {
              write!(f, "Unauthorized (401)")
            }
          , ApiError::RateLimited => {
              write!(f, "API rate limit exceeded (429)")
            }
          , ApiError::ServerError { status, body } => {
              write!(f, "API error {}: {}", status, body)
            }
          , ApiError::EmptyResponse => {
              write!(f, "API response contained no content")
            }
          , ApiError::Transport(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , ApiError::Parse(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , ApiError::Config(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , ApiError::BackendClosed => {
              write!(f, "Backend disconnected")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<String> for ApiError
{   fn from(s: String) -> Self
    {   ApiError::Transport(s)
    }
}

impl From<&str> for ApiError
{   fn from(s: &str) -> Self
    {   ApiError::Transport(s.to_string())
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn server_error_message_carries_status_and_body()
    {   let err = ApiError::ServerError
        {   status: 503
          , body: "overloaded".to_string()
        };
        let msg = err.user_message();
        assert!(msg.contains("503"));
        assert!(msg.contains("overloaded"));
    }

    #[test]
    fn transport_message_carries_underlying_text()
    {   let err: ApiError = "connection refused".into();
        assert_eq!(
          err,
          ApiError::Transport("connection refused".to_string())
        );
        assert!(err.user_message().contains("connection refused"));
    }

    #[test]
    fn every_kind_has_user_text()
    {   let all = vec![
          ApiError::MissingCredential
        , ApiError::Timeout
        , ApiError::Unauthorized
        , ApiError::RateLimited
        , ApiError::EmptyResponse
        , ApiError::Parse("eof".to_string())
        , ApiError::Config("bad".to_string())
        , ApiError::BackendClosed
        ];
        for err in all
        {   assert!(!err.user_message().is_empty());
            assert!(!err.to_string().is_empty());
        }
    }
}
