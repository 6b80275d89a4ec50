//! Disruption dispatch
//!
//! Applies one disruptive action to every pod a [`Selector`] picked:
//! - terminate: delete the pod, optionally overriding its grace period
//! - kill main process: schedule a companion pod on the target's node that
//!   signals the target container's main process
//!
//! Pods are processed one at a time in selection order. Nothing is retried.

mod companion;
mod report;


pub use companion::{
    annotations, companion_pod, container_pattern, labels, new_run_id, CompanionNamer,
    COMPANION_CONTAINER,
};
pub use report::{Action, DispatchFailure, DispatchReport};

use crate::cluster::ClusterApi;
use crate::error::{ChaosError, Result};
use crate::models::{DisruptionSpec, FailurePolicy, GracePeriod, SelectionCriteria, UnitRef};
use crate::observability::{DisruptionMetrics, StructuredLogger};
use crate::selection::Selector;
use std::sync::Arc;

/// Selects pods and disrupts them through an injected cluster boundary
#[derive(Clone)]
pub struct Disruptor {
    cluster: Arc<dyn ClusterApi>,
    selector: Selector,
    policy: FailurePolicy,
    metrics: DisruptionMetrics,
}

impl Disruptor {
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self {
            selector: Selector::new(cluster.clone()),
            cluster,
            policy: FailurePolicy::default(),
            metrics: DisruptionMetrics::new(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Select pods and delete them one after another
    pub async fn terminate_units(
        &self,
        criteria: &SelectionCriteria,
        grace_period: GracePeriod,
    ) -> Result<DispatchReport> {
        let logger = StructuredLogger::new(new_run_id(&mut rand::thread_rng()));
        let selected = self.select(criteria, &logger).await?;
        self.terminate_selected(&selected, grace_period, &logger).await
    }

    /// Delete already-selected pods
    pub async fn terminate_selected(
        &self,
        units: &[UnitRef],
        grace_period: GracePeriod,
        logger: &StructuredLogger,
    ) -> Result<DispatchReport> {
        let grace_period_seconds = grace_period.as_seconds();
        let mut report = DispatchReport::new(Action::Terminate);

        for unit in units {
            let outcome = self
                .cluster
                .delete_pod(&unit.name, &unit.namespace, grace_period_seconds)
                .await;

            match outcome {
                Ok(()) => {
                    logger.log_termination(unit, grace_period_seconds);
                    self.metrics.inc_deleted();
                    report.succeeded.push(unit.clone());
                }
                Err(error) => self.record_failure(&mut report, unit, error, logger)?,
            }
        }

        Ok(report)
    }

    /// Select pods and schedule one companion per pod to kill its main process
    pub async fn kill_main_process(
        &self,
        criteria: &SelectionCriteria,
        spec: &DisruptionSpec,
    ) -> Result<DispatchReport> {
        spec.validate()?;

        let namer = CompanionNamer::new(spec.name_prefix.clone(), &mut rand::thread_rng());
        let logger = StructuredLogger::new(namer.run_id());
        let selected = self.select(criteria, &logger).await?;
        self.kill_selected(&selected, spec, namer, &logger).await
    }

    /// Schedule companions for already-selected pods
    pub async fn kill_selected(
        &self,
        units: &[UnitRef],
        spec: &DisruptionSpec,
        mut namer: CompanionNamer,
        logger: &StructuredLogger,
    ) -> Result<DispatchReport> {
        let mut report = DispatchReport::new(Action::KillMainProcess);

        for unit in units {
            if !unit.is_scheduled() {
                let error = ChaosError::Unschedulable {
                    pod: unit.to_string(),
                };
                self.record_failure(&mut report, unit, error, logger)?;
                continue;
            }

            let pod = companion_pod(namer.next_name(), unit, spec);
            match self.cluster.create_pod(&unit.namespace, &pod).await {
                Ok(companion) => {
                    logger.log_companion_created(unit, &companion, &spec.signal);
                    self.metrics.inc_companions_created();
                    report.succeeded.push(unit.clone());
                    report.companions.push(companion);
                }
                Err(error) => self.record_failure(&mut report, unit, error, logger)?,
            }
        }

        Ok(report)
    }

    async fn select(
        &self,
        criteria: &SelectionCriteria,
        logger: &StructuredLogger,
    ) -> Result<Vec<UnitRef>> {
        let selected = self.selector.select_units(criteria).await?;
        logger.log_selection(criteria, &selected);
        self.metrics.add_selected(selected.len());
        Ok(selected)
    }

    /// Abort with `error`, or keep it in the report and carry on
    fn record_failure(
        &self,
        report: &mut DispatchReport,
        unit: &UnitRef,
        error: ChaosError,
        logger: &StructuredLogger,
    ) -> Result<()> {
        logger.log_dispatch_failure(report.action.as_str(), unit, &error);
        self.metrics.inc_dispatch_errors(report.action.as_str());

        match self.policy {
            FailurePolicy::AbortOnFirstError => Err(error),
            FailurePolicy::BestEffort => {
                report.failed.push(DispatchFailure {
                    unit: unit.clone(),
                    error,
                });
                Ok(())
            }
        }
    }
}
