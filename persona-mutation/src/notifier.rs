//! Change notifier implementations.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use persona_core::errors::{PersonaError, PersonaResult};
use persona_core::traits::IChangeNotifier;

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl IChangeNotifier for NoopNotifier {
    fn notify(&self, _profile_id: &str, _changed_fields: &[String]) -> PersonaResult<()> {
        Ok(())
    }
}

/// Writes every notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl IChangeNotifier for LoggingNotifier {
    fn notify(&self, profile_id: &str, changed_fields: &[String]) -> PersonaResult<()> {
        tracing::info!(
            profile_id = %profile_id,
            changed_fields = ?changed_fields,
            "profile changed"
        );
        Ok(())
    }
}

/// A change message as delivered to channel consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChange {
    pub profile_id: String,
    pub changed_fields: Vec<String>,
}

/// Forwards notifications into an unbounded channel. Sending never blocks;
/// it fails only once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<ProfileChange>,
}

impl ChannelNotifier {
    /// A notifier and the receiver its messages arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProfileChange>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl IChangeNotifier for ChannelNotifier {
    fn notify(&self, profile_id: &str, changed_fields: &[String]) -> PersonaResult<()> {
        self.sender
            .send(ProfileChange {
                profile_id: profile_id.to_string(),
                changed_fields: changed_fields.to_vec(),
            })
            .map_err(|_| PersonaError::NotificationFailed {
                reason: "change receiver dropped".to_string(),
            })
    }
}
