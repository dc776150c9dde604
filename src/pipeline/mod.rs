//! Pipeline state machine types.

pub mod orchestrator;

pub use orchestrator::ReplenishmentOrchestrator;

use crate::api::types::{ForecastBatchRequest, OrderBatchRequest};
use crate::config::WorkflowSettings;
use crate::selection::SelectionTracker;
use serde::{Deserialize, Serialize};

/// The three forward stages of a workflow run. There is no backward
/// transition; `reset` starts a new run instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Selecting,
    ReviewingForecasts,
    OrdersGenerated,
}

impl PipelineStage {
    /// 0-based step index for stepper-style UIs.
    pub fn index(&self) -> usize {
        match self {
            PipelineStage::Selecting => 0,
            PipelineStage::ReviewingForecasts => 1,
            PipelineStage::OrdersGenerated => 2,
        }
    }
}

/// The alert set and parameters captured for one pipeline run.
///
/// Built from the selection when forecasts are requested and immutable
/// afterwards: the order stage reuses these ids verbatim so the operator
/// orders exactly what they reviewed, even if the store or the selection
/// changed in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub alert_ids: Vec<i64>,
    pub horizon_days: u32,
    pub operator_id: Option<i64>,
    pub notes: Option<String>,
}

impl PipelineRequest {
    pub fn from_selection(selection: &SelectionTracker, settings: &WorkflowSettings) -> Self {
        Self {
            alert_ids: selection.ids(),
            horizon_days: settings.horizon_days,
            operator_id: settings.operator_id,
            notes: settings.notes.clone(),
        }
    }

    pub fn forecast_request(&self) -> ForecastBatchRequest {
        ForecastBatchRequest {
            alert_ids: self.alert_ids.clone(),
            horizon_days: self.horizon_days,
        }
    }

    pub fn order_request(&self) -> OrderBatchRequest {
        OrderBatchRequest {
            alert_ids: self.alert_ids.clone(),
            horizon_days: self.horizon_days,
            operator_id: self.operator_id,
            notes: self.notes.clone(),
        }
    }
}

/// What a forward action did. Every variant is a normal return; the
/// orchestrator never lets a remote error escape as a panic or an `Err`
/// that would corrupt the current stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The state machine advanced to the given stage.
    Advanced(PipelineStage),
    /// Validation refused the action before any network call.
    Refused { reason: String },
    /// A request for this stage is already outstanding, or the response
    /// arrived for a run that has since been reset.
    Ignored,
    /// The remote call failed; the stage and captured state are intact
    /// for a retry.
    Failed { message: String },
}

impl ActionOutcome {
    pub fn advanced(&self) -> bool {
        matches!(self, ActionOutcome::Advanced(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_indices_are_zero_based() {
        assert_eq!(PipelineStage::Selecting.index(), 0);
        assert_eq!(PipelineStage::ReviewingForecasts.index(), 1);
        assert_eq!(PipelineStage::OrdersGenerated.index(), 2);
    }

    #[test]
    fn stage_serializes_by_name() {
        let json = serde_json::to_string(&PipelineStage::ReviewingForecasts).unwrap();
        assert_eq!(json, "\"REVIEWING_FORECASTS\"");
    }

    #[test]
    fn request_is_built_from_selection_in_ascending_id_order() {
        let mut selection = SelectionTracker::new();
        selection.toggle(9, true);
        selection.toggle(7, true);

        let settings = WorkflowSettings {
            horizon_days: 45,
            operator_id: Some(12),
            notes: Some("weekly".to_string()),
        };
        let request = PipelineRequest::from_selection(&selection, &settings);

        assert_eq!(request.alert_ids, vec![7, 9]);
        assert_eq!(request.horizon_days, 45);
        assert_eq!(request.forecast_request().alert_ids, vec![7, 9]);

        let order = request.order_request();
        assert_eq!(order.operator_id, Some(12));
        assert_eq!(order.notes.as_deref(), Some("weekly"));
    }
}
