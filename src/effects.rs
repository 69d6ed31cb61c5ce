//! Deferred side effects and their executor
//!
//! The router never performs I/O: it returns a list of [`Effect`]
//! descriptors which the [`EffectExecutor`] carries out afterwards. Unit
//! tests assert on the effect list without touching the network.

use std::sync::Arc;

use crate::channels::MessageSender;
use crate::recorder::{InteractionRecord, InteractionRecorder};
use crate::tasks::TaskTracker;

/// A deferred action produced by the router
#[derive(Debug, Clone)]
pub enum Effect {
    /// Send an additional outbound message to the same sender
    SendFollowUp { text: String },
    /// Create a task in the tracker
    CreateTask {
        name: String,
        description: String,
        tag: &'static str,
    },
    /// Persist an interaction summary
    LogInteraction(InteractionRecord),
}

/// Executes effects against the configured collaborators
///
/// Every downstream is optional: missing configuration degrades that one
/// effect to a logged skip. Nothing here ever propagates an error.
pub struct EffectExecutor {
    channel: Option<Arc<dyn MessageSender>>,
    tracker: Option<TaskTracker>,
    recorder: InteractionRecorder,
}

impl EffectExecutor {
    /// Create an executor over the configured collaborators
    #[must_use]
    pub fn new(
        channel: Option<Arc<dyn MessageSender>>,
        tracker: Option<TaskTracker>,
        recorder: InteractionRecorder,
    ) -> Self {
        Self {
            channel,
            tracker,
            recorder,
        }
    }

    /// Send a reply to a sender, logging (not raising) failures
    pub async fn dispatch_reply(&self, phone: &str, text: &str) {
        let Some(channel) = &self.channel else {
            tracing::warn!(phone, "no messaging channel configured, reply skipped");
            return;
        };

        let result = channel.send_text(phone, text).await;
        if !result.ok {
            tracing::warn!(
                phone,
                channel = channel.name(),
                error_kind = ?result.error_kind,
                "reply dispatch failed"
            );
        }
    }

    /// Execute all effects for one handled event, in order
    pub async fn execute_all(&self, sender_id: &str, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendFollowUp { text } => {
                    self.dispatch_reply(sender_id, &text).await;
                }
                Effect::CreateTask {
                    name,
                    description,
                    tag,
                } => {
                    let Some(tracker) = &self.tracker else {
                        tracing::debug!(tag, "no task tracker configured, task skipped");
                        continue;
                    };
                    if let Err(e) = tracker.create_task(&name, &description, tag).await {
                        tracing::warn!(error = %e, tag, "task creation failed");
                    }
                }
                Effect::LogInteraction(record) => {
                    self.recorder.record(&record);
                }
            }
        }
    }
}
