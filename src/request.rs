//! Wire types for the chat-completion endpoint

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   System
  , User
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage
{   pub role: Role
  , pub content: String
}

/// Request body sent to `/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
  , pub max_tokens: u32
}

impl CompletionRequest
{   /// Exactly two messages: system first, then user
    pub fn from_prompt(
      config: &crate::config::ClientConfig
    , system: &str
    , user: &str
    ) -> Self
    {   CompletionRequest
        {   model: config.model.clone()
          , messages: vec![
              ChatMessage
              {   role: Role::System
                , content: system.to_string()
              }
            , ChatMessage
              {   role: Role::User
                , content: user.to_string()
              }
            ]
          , temperature: config.temperature
          , max_tokens: config.max_tokens
        }
    }
}

/// Success body. Every level is defaulted so a body with missing
/// fields still decodes and is judged by `first_content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

impl CompletionResponse
{   pub fn first_content(&self) -> Option<&str>
    {   self.choices.first()
          .and_then(|c| c.message.as_ref())
          .and_then(|m| m.content.as_deref())
    }
}

/// Raw outcome of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply
{   pub status: u16
  , pub body: String
}

impl HttpReply
{   pub fn new(status: u16, body: impl Into<String>) -> Self
    {   HttpReply
        {   status
          , body: body.into()
        }
    }

    pub fn is_success(&self) -> bool
    {   (200..300).contains(&self.status)
    }
}
