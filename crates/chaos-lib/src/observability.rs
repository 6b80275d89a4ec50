//! Observability infrastructure for pod disruption
//!
//! Provides:
//! - Prometheus counters (pods selected, deleted, companions created, errors)
//! - Structured logging of disruption events with tracing

use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::error::ChaosError;
use crate::models::{SelectionCriteria, UnitRef};

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DisruptionMetricsInner> = OnceLock::new();

struct DisruptionMetricsInner {
    pods_selected: IntCounter,
    pods_deleted: IntCounter,
    companions_created: IntCounter,
    dispatch_errors: IntCounterVec,
}

impl DisruptionMetricsInner {
    fn new() -> Self {
        Self {
            pods_selected: register_int_counter!(
                "podchaos_pods_selected_total",
                "Pods picked by the selection engine"
            )
            .expect("Failed to register pods_selected_total"),

            pods_deleted: register_int_counter!(
                "podchaos_pods_deleted_total",
                "Pod delete requests accepted by the API server"
            )
            .expect("Failed to register pods_deleted_total"),

            companions_created: register_int_counter!(
                "podchaos_companions_created_total",
                "Companion pods created to kill a main process"
            )
            .expect("Failed to register companions_created_total"),

            dispatch_errors: register_int_counter_vec!(
                "podchaos_dispatch_errors_total",
                "Disruptions that failed, by action",
                &["action"]
            )
            .expect("Failed to register dispatch_errors_total"),
        }
    }
}

/// Handle to the process-wide disruption counters.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct DisruptionMetrics {
    _private: (),
}

impl Default for DisruptionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DisruptionMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DisruptionMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DisruptionMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn add_selected(&self, count: usize) {
        self.inner().pods_selected.inc_by(count as u64);
    }

    pub fn inc_deleted(&self) {
        self.inner().pods_deleted.inc();
    }

    pub fn inc_companions_created(&self) {
        self.inner().companions_created.inc();
    }

    pub fn inc_dispatch_errors(&self, action: &str) {
        self.inner()
            .dispatch_errors
            .with_label_values(&[action])
            .inc();
    }

    pub fn pods_deleted(&self) -> u64 {
        self.inner().pods_deleted.get()
    }

    pub fn companions_created(&self) -> u64 {
        self.inner().companions_created.get()
    }

    pub fn dispatch_errors(&self, action: &str) -> u64 {
        self.inner()
            .dispatch_errors
            .with_label_values(&[action])
            .get()
    }
}

/// Everything in the default registry in text exposition format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Structured logger for disruption events
///
/// Every event carries the run id so that log lines, companion pod names
/// and metrics of one invocation can be correlated.
#[derive(Clone)]
pub struct StructuredLogger {
    run_id: String,
}

impl StructuredLogger {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_selection(&self, criteria: &SelectionCriteria, selected: &[UnitRef]) {
        let names: Vec<&str> = selected.iter().map(|u| u.name.as_str()).collect();
        info!(
            event = "pods_selected",
            run = %self.run_id,
            namespace = %criteria.namespace,
            label_selector = ?criteria.label_selector,
            name_pattern = ?criteria.name_pattern,
            all = criteria.all,
            random = criteria.random,
            mode = %criteria.mode,
            quantity = criteria.quantity,
            order = %criteria.order,
            count = selected.len(),
            pods = %names.join(","),
            "Picked pods for disruption"
        );
    }

    pub fn log_termination(&self, unit: &UnitRef, grace_period_seconds: Option<u32>) {
        info!(
            event = "pod_terminated",
            run = %self.run_id,
            pod = %unit.name,
            namespace = %unit.namespace,
            node = %unit.node_name,
            grace_period_seconds = ?grace_period_seconds,
            "Pod deletion requested"
        );
    }

    pub fn log_companion_created(&self, unit: &UnitRef, companion: &str, signal: &str) {
        info!(
            event = "companion_created",
            run = %self.run_id,
            pod = %unit.name,
            namespace = %unit.namespace,
            node = %unit.node_name,
            companion = %companion,
            signal = %signal,
            "Companion pod scheduled to kill main process"
        );
    }

    pub fn log_dispatch_failure(&self, action: &str, unit: &UnitRef, error: &ChaosError) {
        warn!(
            event = "disruption_failed",
            run = %self.run_id,
            action = %action,
            pod = %unit.name,
            namespace = %unit.namespace,
            error = %error,
            "Disruption failed"
        );
    }
}
