//! Selection tracker.
//!
//! A mutable set of selected alert ids with a lifecycle independent of the
//! alert store. Ids pointing at alerts that no longer exist are inert and
//! get pruned on the next refresh. Never touches the network.

use crate::grouping::SupplierGroup;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<i64>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently add or remove one alert id. Removing an id that is not
    /// selected is a no-op.
    pub fn toggle(&mut self, alert_id: i64, included: bool) {
        if included {
            self.selected.insert(alert_id);
        } else {
            self.selected.remove(&alert_id);
        }
    }

    /// Apply `toggle` to every alert currently grouped under a supplier.
    /// Unknown supplier ids are a no-op.
    pub fn toggle_for_supplier(
        &mut self,
        groups: &[SupplierGroup<'_>],
        supplier_id: i64,
        included: bool,
    ) {
        let Some(group) = groups.iter().find(|g| g.supplier_id == supplier_id) else {
            return;
        };
        for alert in &group.alerts {
            self.toggle(alert.id, included);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, alert_id: i64) -> bool {
        self.selected.contains(&alert_id)
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }

    /// Drop ids that no longer refer to a selectable alert.
    pub fn retain_known(&mut self, known: &BTreeSet<i64>) {
        self.selected.retain(|id| known.contains(id));
    }
}
