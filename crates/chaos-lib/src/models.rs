//! Core data models for pod selection and disruption

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ChaosError;

/// A disruption candidate: a read-only view of one pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef {
    pub name: String,
    pub namespace: String,
    /// Node the pod is scheduled on, empty when unscheduled
    pub node_name: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl UnitRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            node_name: String::new(),
            creation_timestamp: None,
            labels: BTreeMap::new(),
        }
    }

    pub fn on_node(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = node_name.into();
        self
    }

    pub fn created_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn is_scheduled(&self) -> bool {
        !self.node_name.is_empty()
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// How `quantity` is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// `quantity` is a number of pods
    #[default]
    Fixed,
    /// `quantity` is a percentage of the filtered pods
    Percentage,
}

impl FromStr for SelectionMode {
    type Err = ChaosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "percentage" => Ok(Self::Percentage),
            other => Err(ChaosError::InvalidCriteria(format!(
                "mode '{}' is invalid, expected 'fixed' or 'percentage'",
                other
            ))),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("fixed"),
            Self::Percentage => f.write_str("percentage"),
        }
    }
}

/// Sequence the candidates are drawn from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionOrder {
    /// Whatever order the cluster listed the pods in. No sort is applied.
    #[default]
    Alphabetic,
    /// Ascending creation timestamp, oldest first
    Oldest,
}

impl FromStr for SelectionOrder {
    type Err = ChaosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphabetic" => Ok(Self::Alphabetic),
            "oldest" => Ok(Self::Oldest),
            other => Err(ChaosError::InvalidCriteria(format!(
                "order '{}' is invalid, expected 'alphabetic' or 'oldest'",
                other
            ))),
        }
    }
}

impl fmt::Display for SelectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alphabetic => f.write_str("alphabetic"),
            Self::Oldest => f.write_str("oldest"),
        }
    }
}

/// Declarative parameters controlling which and how many pods are chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub namespace: String,
    #[serde(default)]
    pub label_selector: Option<String>,
    #[serde(default)]
    pub name_pattern: Option<String>,
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub order: SelectionOrder,
}

fn default_quantity() -> i64 {
    1
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self::new("default")
    }
}

impl SelectionCriteria {
    /// One pod, first in fetch order, from `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            label_selector: None,
            name_pattern: None,
            all: false,
            random: false,
            mode: SelectionMode::Fixed,
            quantity: default_quantity(),
            order: SelectionOrder::Alphabetic,
        }
    }

    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    pub fn random(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn order(mut self, order: SelectionOrder) -> Self {
        self.order = order;
        self
    }
}

/// Grace period handed to pod deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GracePeriod {
    /// No override; the pod's own terminationGracePeriodSeconds applies
    #[default]
    ClusterDefault,
    Seconds(u32),
}

impl GracePeriod {
    pub fn as_seconds(&self) -> Option<u32> {
        match self {
            Self::ClusterDefault => None,
            Self::Seconds(s) => Some(*s),
        }
    }
}

impl From<i64> for GracePeriod {
    /// Negative values mean "unset"
    fn from(value: i64) -> Self {
        if value < 0 {
            Self::ClusterDefault
        } else {
            Self::Seconds(u32::try_from(value).unwrap_or(u32::MAX))
        }
    }
}

/// What the dispatcher does when one pod's disruption fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure and return its error
    #[default]
    AbortOnFirstError,
    /// Attempt every pod and report failures individually
    BestEffort,
}

impl FromStr for FailurePolicy {
    type Err = ChaosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" | "abort-on-first-error" => Ok(Self::AbortOnFirstError),
            "best-effort" => Ok(Self::BestEffort),
            other => Err(ChaosError::InvalidCriteria(format!(
                "failure policy '{}' is invalid, expected 'abort' or 'best-effort'",
                other
            ))),
        }
    }
}

/// Configuration of the kill-main-process companion pods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionSpec {
    /// Signal the companion agent sends
    pub signal: String,
    /// Target container name, `*` for every container of the pod
    pub container: String,
    pub companion_image: String,
    /// Host path of the container runtime control socket
    pub runtime_socket: String,
    pub name_prefix: String,
    pub privileged: bool,
}

/// Container name wildcard
pub const ALL_CONTAINERS: &str = "*";

impl Default for DisruptionSpec {
    fn default() -> Self {
        Self {
            signal: "SIGTERM".to_string(),
            container: ALL_CONTAINERS.to_string(),
            companion_image: "gaiaadm/pumba:master".to_string(),
            runtime_socket: "/var/run/docker.sock".to_string(),
            name_prefix: "pumba-pod".to_string(),
            privileged: false,
        }
    }
}

impl DisruptionSpec {
    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signal = signal.into();
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn with_companion_image(mut self, image: impl Into<String>) -> Self {
        self.companion_image = image.into();
        self
    }

    /// Reject a spec no companion could run with
    pub fn validate(&self) -> Result<(), ChaosError> {
        if self.signal.trim().is_empty() {
            return Err(ChaosError::InvalidCriteria(
                "signal must not be empty".to_string(),
            ));
        }
        if self.container.trim().is_empty() {
            return Err(ChaosError::InvalidCriteria(
                "container must be a name or '*'".to_string(),
            ));
        }
        if self.companion_image.trim().is_empty() {
            return Err(ChaosError::InvalidCriteria(
                "companion image must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Replica counts of one deployment, as read by the health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentHealth {
    pub name: String,
    pub namespace: String,
    pub desired_replicas: i32,
    pub available_replicas: i32,
}

impl DeploymentHealth {
    pub fn is_healthy(&self) -> bool {
        self.available_replicas == self.desired_replicas
    }
}
