//! Replenishment pipeline orchestrator.
//!
//! Drives the three-stage workflow — forecast generation, forecast
//! review, purchase-order creation — against the current selection, and
//! reconciles results back into the alert store by re-fetching it.
//!
//! Forecast generation is read-only and retryable at no cost; order
//! generation creates persisted purchase orders on the server. The stage
//! machine therefore requires a distinct, explicit action for the commit
//! step and guards it against double submission with a per-stage loading
//! flag.

use crate::abstractions::ReplenishmentApi;
use crate::alerts::store::AlertStore;
use crate::api::client::HttpReplenishmentClient;
use crate::api::types::{BatchResultDto, ForecastsBySupplier};
use crate::config::{Config, WorkflowSettings};
use crate::error::Result;
use crate::events::{EventBus, Notice, WorkflowEvent};
use crate::grouping::group_by_supplier;
use crate::pipeline::{ActionOutcome, PipelineRequest, PipelineStage};
use crate::reconcile::{self, ReconciledBatch, Reconciler};
use crate::selection::SelectionTracker;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ReplenishmentOrchestrator {
    api: Arc<dyn ReplenishmentApi>,
    settings: WorkflowSettings,
    events: EventBus,
    store: AlertStore,
    reconciler: Reconciler,
    state: RwLock<RunState>,
}

struct RunState {
    run_id: Uuid,
    /// Bumped by `reset`. Responses captured under an older epoch are
    /// discarded when they arrive.
    epoch: u64,
    stage: PipelineStage,
    selection: SelectionTracker,
    forecast_loading: bool,
    order_processing: bool,
    captured: Option<PipelineRequest>,
    forecasts: Option<ForecastsBySupplier>,
    batch: Option<BatchResultDto>,
    reconciled: Option<ReconciledBatch>,
    last_notice: Option<Notice>,
}

impl RunState {
    fn fresh() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            epoch: 0,
            stage: PipelineStage::Selecting,
            selection: SelectionTracker::new(),
            forecast_loading: false,
            order_processing: false,
            captured: None,
            forecasts: None,
            batch: None,
            reconciled: None,
            last_notice: None,
        }
    }
}

impl ReplenishmentOrchestrator {
    pub fn new(api: Arc<dyn ReplenishmentApi>, settings: WorkflowSettings) -> Self {
        let events = EventBus::new();
        let store = AlertStore::new(events.clone());
        let reconciler = Reconciler::new(api.clone());
        Self {
            api,
            settings,
            events,
            store,
            reconciler,
            state: RwLock::new(RunState::fresh()),
        }
    }

    /// Wire up the orchestrator against the HTTP backend described by the
    /// config.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = HttpReplenishmentClient::new(&config.api)?;
        Ok(Self::new(Arc::new(client), config.workflow.clone()))
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    // ---- selection -----------------------------------------------------

    pub async fn toggle_alert(&self, alert_id: i64, included: bool) {
        let mut state = self.state.write().await;
        state.selection.toggle(alert_id, included);
        self.events.emit(WorkflowEvent::SelectionChanged {
            selected: state.selection.len(),
        });
    }

    pub async fn toggle_supplier(&self, supplier_id: i64, included: bool) {
        let mut state = self.state.write().await;
        self.store.with_alerts(|alerts| {
            let groups = group_by_supplier(alerts);
            state
                .selection
                .toggle_for_supplier(&groups, supplier_id, included);
        });
        self.events.emit(WorkflowEvent::SelectionChanged {
            selected: state.selection.len(),
        });
    }

    pub async fn clear_selection(&self) {
        let mut state = self.state.write().await;
        state.selection.clear();
        self.events.emit(WorkflowEvent::SelectionChanged { selected: 0 });
    }

    pub async fn selection_len(&self) -> usize {
        self.state.read().await.selection.len()
    }

    pub async fn selection_ids(&self) -> Vec<i64> {
        self.state.read().await.selection.ids()
    }

    // ---- store refresh -------------------------------------------------

    /// Re-query the backend and replace the alert store wholesale, pruning
    /// selected ids that no longer refer to a selectable alert.
    pub async fn refresh_alerts(&self) -> Result<usize> {
        let alerts = self.api.fetch_alerts().await?;
        let total = alerts.len();
        let selectable = self.store.replace(alerts);

        let mut state = self.state.write().await;
        let before = state.selection.len();
        state.selection.retain_known(&selectable);
        let pruned = before - state.selection.len();
        if pruned > 0 {
            debug!(pruned, "pruned stale ids from selection");
            self.events.emit(WorkflowEvent::SelectionChanged {
                selected: state.selection.len(),
            });
        }
        Ok(total)
    }

    // ---- stage machine -------------------------------------------------

    pub async fn stage(&self) -> PipelineStage {
        self.state.read().await.stage
    }

    pub async fn stage_index(&self) -> usize {
        self.state.read().await.stage.index()
    }

    pub async fn forecast_loading(&self) -> bool {
        self.state.read().await.forecast_loading
    }

    pub async fn order_processing(&self) -> bool {
        self.state.read().await.order_processing
    }

    pub async fn forecasts(&self) -> Option<ForecastsBySupplier> {
        self.state.read().await.forecasts.clone()
    }

    pub async fn batch(&self) -> Option<BatchResultDto> {
        self.state.read().await.batch.clone()
    }

    pub async fn reconciled(&self) -> Option<ReconciledBatch> {
        self.state.read().await.reconciled.clone()
    }

    pub async fn last_notice(&self) -> Option<Notice> {
        self.state.read().await.last_notice.clone()
    }

    /// The request captured when forecasts were generated, authoritative
    /// for the order stage.
    pub async fn captured_request(&self) -> Option<PipelineRequest> {
        self.state.read().await.captured.clone()
    }

    /// `SELECTING → REVIEWING_FORECASTS`.
    ///
    /// Captures the current selection into a `PipelineRequest` and issues
    /// one forecast-batch call. On failure the stage and the selection are
    /// untouched so the operator can retry without re-selecting.
    pub async fn generate_forecasts(&self) -> ActionOutcome {
        let (request, epoch, run_id) = {
            let mut state = self.state.write().await;
            if state.stage != PipelineStage::Selecting {
                return self.refuse(
                    &mut state,
                    "forecasts were already generated for this run; reset to start another",
                );
            }
            if state.forecast_loading {
                return ActionOutcome::Ignored;
            }
            if state.selection.is_empty() {
                return self.refuse(
                    &mut state,
                    "select at least one alert before generating forecasts",
                );
            }
            let request = PipelineRequest::from_selection(&state.selection, &self.settings);
            state.forecast_loading = true;
            (request, state.epoch, state.run_id)
        };

        debug!(
            alerts = request.alert_ids.len(),
            horizon_days = request.horizon_days,
            "requesting forecast batch"
        );
        let result = self.api.generate_forecasts(&request.forecast_request()).await;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!("discarding forecast response from a reset run");
            return ActionOutcome::Ignored;
        }
        state.forecast_loading = false;
        match result {
            Ok(forecasts) => {
                let suppliers = forecasts.len();
                let products: usize = forecasts.values().map(|b| b.forecasts.len()).sum();
                info!(suppliers, products, "forecasts ready for review");
                state.captured = Some(request);
                state.forecasts = Some(forecasts);
                state.stage = PipelineStage::ReviewingForecasts;
                self.events.emit(WorkflowEvent::ForecastsReady {
                    run_id,
                    suppliers,
                    products,
                });
                self.events.emit(WorkflowEvent::StageChanged {
                    run_id,
                    from: PipelineStage::Selecting,
                    to: PipelineStage::ReviewingForecasts,
                });
                ActionOutcome::Advanced(PipelineStage::ReviewingForecasts)
            }
            Err(err) => {
                warn!(error = %err, "forecast batch failed");
                let message = format!("Forecast generation failed: {err}");
                self.raise(&mut state, Notice::error(message.clone()));
                ActionOutcome::Failed { message }
            }
        }
    }

    /// `REVIEWING_FORECASTS → ORDERS_GENERATED`.
    ///
    /// Reuses the captured alert ids verbatim — the selection is not
    /// re-read, so what the operator reviewed is exactly what gets
    /// ordered. Partial failure is a normal terminal outcome: the batch
    /// result is stored and the stage advances either way. Afterwards the
    /// generated orders' summaries are resolved and the alert list is
    /// re-fetched, both best-effort.
    pub async fn generate_orders(&self) -> ActionOutcome {
        let (request, epoch, run_id) = {
            let mut state = self.state.write().await;
            match state.stage {
                PipelineStage::Selecting => {
                    return self.refuse(&mut state, "generate forecasts before creating orders");
                }
                PipelineStage::OrdersGenerated => {
                    return self.refuse(
                        &mut state,
                        "orders were already generated for this run; reset to start another",
                    );
                }
                PipelineStage::ReviewingForecasts => {}
            }
            if state.order_processing {
                return ActionOutcome::Ignored;
            }
            let Some(captured) = state.captured.clone() else {
                return self.refuse(&mut state, "no captured alert set for this run");
            };
            state.order_processing = true;
            (captured, state.epoch, state.run_id)
        };

        info!(
            alerts = request.alert_ids.len(),
            "generating purchase orders"
        );
        let result = self.api.generate_orders(&request.order_request()).await;

        let summary = {
            let mut state = self.state.write().await;
            if state.epoch != epoch {
                debug!("discarding order response from a reset run");
                return ActionOutcome::Ignored;
            }
            state.order_processing = false;
            match result {
                Ok(batch) => {
                    let summary = reconcile::interpret(&batch);
                    info!(
                        total = summary.total,
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        orders = summary.order_ids.len(),
                        "order batch completed"
                    );
                    self.events.emit(WorkflowEvent::BatchCompleted {
                        run_id,
                        total: summary.total,
                        succeeded: summary.succeeded,
                        failed: summary.failed,
                    });
                    state.batch = Some(batch);
                    state.reconciled = Some(ReconciledBatch::pending(summary.clone()));
                    state.stage = PipelineStage::OrdersGenerated;
                    self.events.emit(WorkflowEvent::StageChanged {
                        run_id,
                        from: PipelineStage::ReviewingForecasts,
                        to: PipelineStage::OrdersGenerated,
                    });
                    summary
                }
                Err(err) => {
                    warn!(error = %err, "order batch failed");
                    let message = format!("Order generation failed: {err}");
                    self.raise(&mut state, Notice::error(message.clone()));
                    return ActionOutcome::Failed { message };
                }
            }
        };

        // Dependent fetch: only after the batch resolved, only when it
        // produced orders.
        if let Some(fetched) = self.reconciler.resolve_orders(&summary).await {
            let mut state = self.state.write().await;
            if state.epoch == epoch {
                if let Some(view) = state.reconciled.as_mut() {
                    view.orders_loading = false;
                    match fetched {
                        Ok(orders) => {
                            self.events.emit(WorkflowEvent::OrderSummariesLoaded {
                                run_id,
                                orders: orders.len(),
                            });
                            view.orders = orders;
                        }
                        Err(err) => {
                            warn!(error = %err, "order summary fetch failed");
                            view.order_fetch_error = Some(err.to_string());
                            self.raise(
                                &mut state,
                                Notice::warning(format!(
                                    "Orders were generated but their summaries could not be loaded: {err}"
                                )),
                            );
                        }
                    }
                }
            }
        }

        // The server may have escalated or resolved alerts as a side
        // effect; never patch locally, always re-fetch.
        if let Err(err) = self.refresh_alerts().await {
            warn!(error = %err, "post-run alert refresh failed");
            let mut state = self.state.write().await;
            if state.epoch == epoch {
                self.raise(
                    &mut state,
                    Notice::warning(format!("Alert list could not be refreshed: {err}")),
                );
            }
        }

        ActionOutcome::Advanced(PipelineStage::OrdersGenerated)
    }

    /// Return to `SELECTING` with everything cleared, starting a new run.
    /// Any response still in flight for the old run is discarded when it
    /// arrives.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let epoch = state.epoch + 1;
        *state = RunState::fresh();
        state.epoch = epoch;
        info!(run_id = %state.run_id, "workflow reset");
        self.events.emit(WorkflowEvent::WorkflowReset {
            run_id: state.run_id,
        });
    }

    // ---- notices -------------------------------------------------------

    fn raise(&self, state: &mut RunState, notice: Notice) {
        self.events.emit(WorkflowEvent::NoticeRaised {
            level: notice.level,
            message: notice.message.clone(),
        });
        state.last_notice = Some(notice);
    }

    fn refuse(&self, state: &mut RunState, reason: &str) -> ActionOutcome {
        self.raise(state, Notice::warning(reason));
        ActionOutcome::Refused {
            reason: reason.to_string(),
        }
    }
}
