//! Canned prompt pairs, one per trigger

use std::str::FromStr;

/// The fixed set of triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind
{   Icebreaker
  , Fact
  , Joke
  , Weather
}

/// System instruction plus user instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair
{   pub system: String
  , pub user: String
}

impl PromptKind
{   pub const ALL: [PromptKind; 4] = [
      PromptKind::Icebreaker
    , PromptKind::Fact
    , PromptKind::Joke
    , PromptKind::Weather
    ];

    pub fn tag(&self) -> &'static str
    {   match self
        {   PromptKind::Icebreaker => "icebreaker"
          , PromptKind::Fact => "fact"
          , PromptKind::Joke => "joke"
          , PromptKind::Weather => "weather"
        }
    }

    pub fn prompt_pair(&self) -> PromptPair
    {   let (system, user) = match self
        {   PromptKind::Icebreaker => (
              "You are a warm, upbeat host who helps strangers start \
               talking. Keep answers to one or two sentences."
            , "Give me one fun icebreaker question I can ask someone \
               I just met."
            )
          , PromptKind::Fact => (
              "You are a curious science communicator. Only share \
               facts that are true and surprising. Keep it short."
            , "Tell me one surprising fact in two sentences or less."
            )
          , PromptKind::Joke => (
              "You are a friendly comedian who tells clean, \
               family-friendly jokes."
            , "Tell me one short joke."
            )
          , PromptKind::Weather => (
              "You are a cheerful weather presenter with a playful \
               sense of humour. You have no live weather data, so \
               never claim to know current conditions."
            , "Give me a short, playful remark about the weather that \
               would brighten someone's day."
            )
        };
        PromptPair
        {   system: system.to_string()
          , user: user.to_string()
        }
    }
}

impl FromStr for PromptKind
{   type Err = crate::error::ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_ascii_lowercase().as_str()
        {   "icebreaker" => Ok(PromptKind::Icebreaker)
          , "fact" => Ok(PromptKind::Fact)
          , "joke" => Ok(PromptKind::Joke)
          , "weather" => Ok(PromptKind::Weather)
          , other => Err(crate::error::ApiError::Config(
              format!("unknown request type: {}", other)
            ))
        }
    }
}

/// Map a trigger tag to its prompt pair; unknown tags give `None`
pub fn resolve_prompt(tag: &str) -> Option<PromptPair>
{   tag.parse::<PromptKind>()
      .ok()
      .map(|kind| kind.prompt_pair())
}
