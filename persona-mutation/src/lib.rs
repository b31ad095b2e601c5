//! # persona-mutation
//!
//! [`ProfileMutationOrchestrator`] runs every profile write through one
//! flow: load, transform with the merge engine, commit with a revision
//! check, then best-effort history append and change notification.

pub mod notifier;
pub mod orchestrator;

pub use notifier::{ChannelNotifier, LoggingNotifier, NoopNotifier, ProfileChange};
pub use orchestrator::{ItemChange, ProfileMutationOrchestrator};
