//! Pod chaos library
//!
//! This crate provides the core functionality for:
//! - Selecting pods by namespace, labels, name pattern, quantity and order
//! - Disrupting them: deletion, or killing a container's main process
//!   through a companion pod scheduled on the same node
//! - Deployment health probes
//! - Metrics and structured logging of disruption events

pub mod cluster;
pub mod disruption;
pub mod error;
pub mod models;
pub mod observability;
pub mod probes;
pub mod selection;

pub use cluster::{ClusterApi, KubeCluster};
pub use disruption::{Action, DispatchReport, Disruptor};
pub use error::{ChaosError, Result};
pub use models::*;
pub use observability::{render_metrics, DisruptionMetrics, StructuredLogger};
pub use probes::deployment_available_and_healthy;
pub use selection::Selector;
