//! Supplier grouping engine.
//!
//! A pure, single-pass rebuild from an alert snapshot. Groups appear in
//! first-seen supplier order; within a group, alerts keep store order.
//! Alerts without a supplier reference belong to no group — a data-quality
//! gap the backend tolerates, not an error.

use crate::alerts::types::{Alert, Criticality};
use std::collections::{BTreeMap, HashMap};

/// A read-only view of the alerts belonging to one supplier.
#[derive(Debug)]
pub struct SupplierGroup<'a> {
    pub supplier_id: i64,
    pub supplier_name: &'a str,
    /// Member alerts, in store order.
    pub alerts: Vec<&'a Alert>,
    pub total_alerts: usize,
    /// Sum of the suggested order quantities of the member alerts.
    pub total_suggested_quantity: f64,
    pub by_criticality: BTreeMap<Criticality, usize>,
}

impl<'a> SupplierGroup<'a> {
    fn empty(supplier_id: i64, supplier_name: &'a str) -> Self {
        Self {
            supplier_id,
            supplier_name,
            alerts: Vec::new(),
            total_alerts: 0,
            total_suggested_quantity: 0.0,
            by_criticality: BTreeMap::new(),
        }
    }

    pub fn alert_ids(&self) -> Vec<i64> {
        self.alerts.iter().map(|a| a.id).collect()
    }
}

/// Group alerts by supplier in a single O(n) pass.
pub fn group_by_supplier(alerts: &[Alert]) -> Vec<SupplierGroup<'_>> {
    let mut slot_by_supplier: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<SupplierGroup<'_>> = Vec::new();

    for alert in alerts {
        let Some(supplier) = alert.supplier() else {
            continue;
        };
        let slot = *slot_by_supplier.entry(supplier.id).or_insert_with(|| {
            groups.push(SupplierGroup::empty(supplier.id, &supplier.name));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.alerts.push(alert);
        group.total_alerts += 1;
        group.total_suggested_quantity += alert.suggested_quantity.unwrap_or(0.0);
        *group.by_criticality.entry(alert.criticality).or_insert(0) += 1;
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::alert;
    use std::collections::BTreeSet;

    #[test]
    fn groups_cover_exactly_the_alerts_with_a_supplier() {
        let alerts = vec![
            alert(1).supplier(4, "Norte").build(),
            alert(2).no_supplier().build(),
            alert(3).supplier(9, "Sur").build(),
            alert(4).supplier(4, "Norte").build(),
        ];

        let groups = group_by_supplier(&alerts);

        let grouped: BTreeSet<i64> = groups
            .iter()
            .flat_map(|g| g.alerts.iter().map(|a| a.id))
            .collect();
        let with_supplier: BTreeSet<i64> = alerts
            .iter()
            .filter(|a| a.supplier().is_some())
            .map(|a| a.id)
            .collect();
        assert_eq!(grouped, with_supplier);
        assert!(!grouped.contains(&2));
    }

    #[test]
    fn first_seen_supplier_order_and_store_order_within_groups() {
        let alerts = vec![
            alert(10).supplier(2, "B").build(),
            alert(11).supplier(1, "A").build(),
            alert(12).supplier(2, "B").build(),
        ];

        let groups = group_by_supplier(&alerts);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].supplier_id, 2);
        assert_eq!(groups[1].supplier_id, 1);
        assert_eq!(groups[0].alert_ids(), vec![10, 12]);
    }

    #[test]
    fn aggregates_count_and_sum_members() {
        use crate::alerts::types::Criticality;

        let alerts = vec![
            alert(1).supplier(4, "Norte").critical().suggested(25.0).build(),
            alert(2).supplier(4, "Norte").suggested(10.0).build(),
            alert(3).supplier(4, "Norte").build(),
        ];

        let groups = group_by_supplier(&alerts);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.total_alerts, 3);
        assert_eq!(group.total_suggested_quantity, 35.0);
        assert_eq!(group.by_criticality.get(&Criticality::Critical), Some(&1));
        assert_eq!(group.by_criticality.get(&Criticality::Medium), Some(&2));
    }

    #[test]
    fn no_alerts_means_no_groups() {
        assert!(group_by_supplier(&[]).is_empty());
    }
}
