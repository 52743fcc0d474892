//! Configuration for the completion client

use serde::{Deserialize, Serialize};
use log::{debug, error};
use std::path::Path;

pub const DEFAULT_API_BASE: &str
  = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Client configuration.
///
/// Every field except `api_key` has a default, so a JSON file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig
{   /// Bearer credential; absent means calls fail fast
    pub api_key: Option<String>
  , /// API base URL, without the trailing endpoint path
    pub api_base: String
  , /// Model identifier sent with every request
    pub model: String
  , /// Hard deadline per call in milliseconds
    pub timeout_ms: u64
  , /// Sampling temperature
    pub temperature: f32
  , /// Max tokens to generate
    pub max_tokens: u32
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   api_key: None
          , api_base: DEFAULT_API_BASE.to_string()
          , model: DEFAULT_MODEL.to_string()
          , timeout_ms: 10_000
          , temperature: 0.8
          , max_tokens: 120
        }
    }
}

impl ClientConfig
{   /// Defaults plus the credential from `OPENAI_API_KEY`, if set
    pub fn from_env() -> Self
    {   let api_key = std::env::var(API_KEY_ENV).ok();
        debug!(
          "Loaded config from env, key present: {}",
          api_key.is_some()
        );
        ClientConfig
        {   api_key
          , ..ClientConfig::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(
      path: impl AsRef<Path>
    ) -> Result<Self, crate::error::ApiError>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
          error!("Cannot read {}: {}", path.display(), e);
          crate::error::ApiError::Config(
            format!("{}: {}", path.display(), e)
          )
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(
      raw: &str
    ) -> Result<Self, crate::error::ApiError>
    {   serde_json::from_str(raw).map_err(|e| {
          error!("Config parse error: {}", e);
          crate::error::ApiError::Config(e.to_string())
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }

    /// The configured key, if present and non-empty
    pub fn credential(&self) -> Option<&str>
    {   self.api_key
          .as_deref()
          .filter(|k| !k.is_empty())
    }

    pub fn completions_url(&self) -> String
    {   format!(
          "{}/chat/completions",
          self.api_base.trim_end_matches('/')
        )
    }
}
