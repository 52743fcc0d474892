use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::DeckFoot;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(15);

/// Public API for the deck backend - owns the task
pub struct PromptDeckBackend
{   hand: crate::DeckHand
  , task_handle: tokio::task::JoinHandle<()>
}

impl PromptDeckBackend
{   /// Create and spawn a new backend.
    /// Returns immediately - spawns background task
    pub fn new(
      config: crate::config::ClientConfig
    , transport: Arc<dyn crate::providers::Transport>
    ) -> Self
    {   debug!("Creating PromptDeckBackend with task ownership");

        let (trigger_tx, trigger_rx)
          = mpsc::unbounded_channel();
        let (set_api_key_tx, set_api_key_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::DeckHand
        {   trigger_tx
          , set_api_key_tx
          , kill_process_tx
        };

        let foot = crate::DeckFoot
        {   trigger_rx
          , set_api_key_rx
          , kill_process_rx
        };

        let orchestrator
          = crate::orchestrator::RequestOrchestrator::new(
              config, transport
            );

        let task_handle = tokio::spawn(async move {
          run_backend_loop(foot, orchestrator).await
        });

        PromptDeckBackend
        {   hand
          , task_handle
        }
    }

    /// Queue a trigger - returns almost immediately.
    ///
    /// The receiver yields the invocation's states and closes after
    /// `Idle`. An unknown tag closes it without any state.
    pub async fn trigger(
      &self
    , tag: &str
    ) -> Result<
        mpsc::UnboundedReceiver<crate::orchestrator::RequestState>,
        crate::error::ApiError
      >
    {   debug!("trigger queuing {:?}", tag);
        let (events_tx, events_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::TriggerArgs
        {   tag: tag.to_string()
          , events: events_tx
        };

        self.hand.trigger_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::ApiError::BackendClosed
          })?;

        Ok(events_rx)
    }

    /// Replace the credential for later triggers - returns almost immediately
    pub async fn set_api_key(
      &self
    , key: String
    ) -> Result<
        mpsc::UnboundedReceiver<crate::SetApiKeyReply>,
        crate::error::ApiError
      >
    {   debug!("set_api_key queuing");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::SetApiKeyArgs
        {   key
          , reply: reply_tx
        };

        self.hand.set_api_key_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::ApiError::BackendClosed
          })?;

        Ok(reply_rx)
    }

    /// Gracefully shutdown the backend.
    /// Triggers queued before this call still run to `Idle` first.
    pub async fn shutdown(self)
      -> Result<(), crate::error::ApiError>
    {   debug!("Shutting down PromptDeckBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::ApiError::BackendClosed
          })?;

        let confirmed = tokio::time::timeout(
          SHUTDOWN_GRACE,
          reply_rx.recv()
        ).await;

        match confirmed
        {   Ok(Some(result)) => {
              debug!("Backend shutdown confirmed");
              let _ = self.task_handle.await;
              result
            }
          , Ok(None) => {
              error!("Backend exited without confirming");
              Err(crate::error::ApiError::BackendClosed)
            }
          , Err(_) => {
              error!("Backend shutdown timeout");
              self.task_handle.abort();
              Err(crate::error::ApiError::Timeout)
            }
        }
    }
}

/// Main backend event loop
///
/// Triggers are awaited inside their select arm, so invocations run
/// one at a time in arrival order and their states never interleave.
/// Triggers accepted before a kill still run before the loop exits.
async fn run_backend_loop(
  foot: crate::DeckFoot
, mut orchestrator: crate::orchestrator::RequestOrchestrator
)
{   debug!("Starting PromptDeckBackend event loop");
    let DeckFoot
    {   mut trigger_rx
      , mut set_api_key_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { biased;
        Some(cmd) = trigger_rx.recv() => {
          debug!("Received Trigger: {:?}", cmd.tag);
          let _ = orchestrator
            .handle_request(&cmd.tag, &cmd.events)
            .await;
        }
      , Some(cmd) = set_api_key_rx.recv() => {
          debug!("Received SetApiKey");
          let result = if cmd.key.is_empty()
          {   Err(crate::error::ApiError::MissingCredential)
          } else
          {   orchestrator.set_api_key(cmd.key);
              Ok(())
          };
          let _ = cmd.reply.send(result);
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          trigger_rx.close();
          while let Some(pending) = trigger_rx.recv().await
          {   debug!("Draining Trigger: {:?}", pending.tag);
              let _ = orchestrator
                .handle_request(&pending.tag, &pending.events)
                .await;
          }
          let _ = cmd.reply.send(Ok(()));
          info!("PromptDeckBackend shutting down");
          break;
        }
      , else => {
          debug!("All backend channels closed");
          break;
        }
      }
    }
}
