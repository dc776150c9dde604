//! Shared alert store.
//!
//! The single source of truth for alert lifecycle state. It is only ever
//! mutated by a full replace from a fresh backend snapshot; partial batch
//! results never patch it, so groups derived from it are always consistent
//! with what the server computed (including side effects like
//! auto-escalation).

use super::types::Alert;
use crate::events::{EventBus, WorkflowEvent};
use std::collections::BTreeSet;
use std::sync::RwLock;
use tracing::debug;

pub struct AlertStore {
    alerts: RwLock<Vec<Alert>>,
    events: EventBus,
}

impl AlertStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Replace the whole store with a fresh snapshot and notify
    /// subscribers. Returns the ids that remain selectable so the caller
    /// can prune its selection.
    pub fn replace(&self, alerts: Vec<Alert>) -> BTreeSet<i64> {
        let selectable: BTreeSet<i64> = alerts
            .iter()
            .filter(|a| a.is_selectable())
            .map(|a| a.id)
            .collect();
        let total = alerts.len();
        {
            let mut guard = self.alerts.write().unwrap_or_else(|e| e.into_inner());
            *guard = alerts;
        }
        debug!(total, selectable = selectable.len(), "alert store replaced");
        self.events.emit(WorkflowEvent::AlertsRefreshed { total });
        selectable
    }

    /// Cloned snapshot of the current alerts, in backend order.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Run a closure against the current alerts without cloning.
    pub fn with_alerts<R>(&self, f: impl FnOnce(&[Alert]) -> R) -> R {
        let guard = self.alerts.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Ids of alerts that can still be selected (non-terminal).
    pub fn selectable_ids(&self) -> BTreeSet<i64> {
        self.with_alerts(|alerts| {
            alerts
                .iter()
                .filter(|a| a.is_selectable())
                .map(|a| a.id)
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.alerts.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::alert;

    #[test]
    fn replace_swaps_the_whole_snapshot() {
        let store = AlertStore::new(EventBus::new());
        store.replace(vec![alert(1).build(), alert(2).build()]);
        assert_eq!(store.len(), 2);

        store.replace(vec![alert(3).build()]);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 3);
    }

    #[test]
    fn terminal_alerts_are_not_selectable() {
        let store = AlertStore::new(EventBus::new());
        let live = store.replace(vec![
            alert(1).build(),
            alert(2).resolved().build(),
            alert(3).build(),
        ]);
        assert_eq!(live, BTreeSet::from([1, 3]));
        assert_eq!(store.len(), 3);
        assert_eq!(store.selectable_ids(), BTreeSet::from([1, 3]));
    }

    #[tokio::test]
    async fn replace_emits_refresh_event() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();
        let store = AlertStore::new(bus);

        store.replace(vec![alert(1).build()]);

        match receiver.recv().await.unwrap() {
            WorkflowEvent::AlertsRefreshed { total } => assert_eq!(total, 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
