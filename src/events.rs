//! Workflow event bus.
//!
//! The UI host subscribes to observe state changes instead of polling the
//! orchestrator. Emission is synchronous; a bus with no subscribers drops
//! events silently.

use crate::pipeline::PipelineStage;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// The alert store was replaced from a fresh backend snapshot.
    AlertsRefreshed { total: usize },
    /// The selection set changed (toggle, bulk toggle, clear, or prune).
    SelectionChanged { selected: usize },
    /// Forecast bundles arrived and are ready for review.
    ForecastsReady {
        run_id: Uuid,
        suppliers: usize,
        products: usize,
    },
    /// The pipeline moved forward one stage.
    StageChanged {
        run_id: Uuid,
        from: PipelineStage,
        to: PipelineStage,
    },
    /// The order batch resolved, successfully or partially.
    BatchCompleted {
        run_id: Uuid,
        total: u32,
        succeeded: u32,
        failed: u32,
    },
    /// Purchase-order summaries for the generated orders were fetched.
    OrderSummariesLoaded { run_id: Uuid, orders: usize },
    /// A user-visible notice was raised.
    NoticeRaised { level: NoticeLevel, message: String },
    /// The workflow was reset to start a new run.
    WorkflowReset { run_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// An inline, non-blocking notice for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: WorkflowEvent) {
        if self.sender.send(event).is_err() {
            trace!("no event subscribers; event dropped");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();

        bus.emit(WorkflowEvent::SelectionChanged { selected: 3 });

        match receiver.recv().await.unwrap() {
            WorkflowEvent::SelectionChanged { selected } => assert_eq!(selected, 3),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn emit_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.emit(WorkflowEvent::AlertsRefreshed { total: 0 });
    }
}
