pub mod error;
pub mod config;
pub mod prompts;
pub mod request;
pub mod providers;
pub mod orchestrator;
pub mod client;

pub use client::PromptDeckBackend;
pub use config::ClientConfig;
pub use error::ApiError;
pub use orchestrator::{
  DisplayStyle, Rendered, RequestOrchestrator, RequestState
};
pub use prompts::{resolve_prompt, PromptKind, PromptPair};
pub use providers::{HttpTransport, Transport};

/*

promptdeck: four canned prompts, one chat-completion call per trigger.

promptdeck/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and backend channel types
│   ├── main.rs         # Terminal front-end (the four triggers)
│   ├── error.rs        # ApiError and user-facing messages
│   ├── config.rs       # ClientConfig (defaults, env, JSON file)
│   ├── prompts.rs      # PromptKind -> PromptPair
│   ├── request.rs      # Wire types for /chat/completions
│   ├── providers/      # Transport trait and the reqwest transport
│   ├── orchestrator.rs # Call, timeout, classification, states
│   └── client.rs       # Backend task serializing triggers
└── tests/

*/

/// BACKEND API INTERFACE:

// ===== Trigger =====

pub type StateSender
  = tokio::sync::mpsc::UnboundedSender<RequestState>;

pub struct TriggerArgs
{   pub tag: String
  , pub events: StateSender
}

// ===== SetApiKey =====

pub type SetApiKeyReply = Result<(), crate::error::ApiError>;
pub type SetApiKeyReplySender
  = tokio::sync::mpsc::UnboundedSender<SetApiKeyReply>;

pub struct SetApiKeyArgs
{   pub key: String
  , pub reply: SetApiKeyReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::ApiError>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== DeckHand (sender side) =====

pub struct DeckHand
{   pub trigger_tx
      : tokio::sync::mpsc::UnboundedSender<TriggerArgs>
  , pub set_api_key_tx
      : tokio::sync::mpsc::UnboundedSender<SetApiKeyArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== DeckFoot (receiver side) =====

pub struct DeckFoot
{   pub trigger_rx
      : tokio::sync::mpsc::UnboundedReceiver<TriggerArgs>
  , pub set_api_key_rx
      : tokio::sync::mpsc::UnboundedReceiver<SetApiKeyArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
