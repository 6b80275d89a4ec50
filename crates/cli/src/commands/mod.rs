//! Command implementations

pub mod kill;
pub mod probe;
pub mod select;
pub mod terminate;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use chaos_lib::{
    ClusterApi, Disruptor, FailurePolicy, SelectionCriteria, SelectionMode, SelectionOrder,
};
use clap::Args;

use crate::config::Config;
use crate::output::OutputFormat;

/// Namespace used when neither a flag nor the config names one
const DEFAULT_NAMESPACE: &str = "default";

/// Flags shared by every command that selects pods
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Namespace to select pods from
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Label selector passed to the API server (e.g. "app=web,tier!=db")
    #[arg(long, short = 'l')]
    pub label_selector: Option<String>,

    /// Regular expression matched against the start of pod names
    #[arg(long)]
    pub name_pattern: Option<String>,

    /// Take every matching pod, ignoring mode and quantity
    #[arg(long)]
    pub all: bool,

    /// Pick pods at random instead of taking the first ones
    #[arg(long)]
    pub random: bool,

    /// How quantity is interpreted (fixed, percentage)
    #[arg(long, default_value = "fixed")]
    pub mode: SelectionMode,

    /// Number of pods, or percentage of matching pods
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Order applied before picking (alphabetic, oldest)
    #[arg(long, default_value = "alphabetic")]
    pub order: SelectionOrder,
}

impl SelectionArgs {
    pub fn criteria(&self, config: &Config) -> SelectionCriteria {
        let namespace = self
            .namespace
            .clone()
            .or_else(|| config.namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let mut criteria = SelectionCriteria::new(namespace)
            .all(self.all)
            .random(self.random)
            .mode(self.mode)
            .quantity(self.quantity)
            .order(self.order);
        if let Some(selector) = &self.label_selector {
            criteria = criteria.with_label_selector(selector.clone());
        }
        if let Some(pattern) = &self.name_pattern {
            criteria = criteria.with_name_pattern(pattern.clone());
        }
        criteria
    }
}

/// Everything a command needs to run
pub struct Context {
    pub cluster: Arc<dyn ClusterApi>,
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn disruptor(&self, best_effort: bool) -> Result<Disruptor> {
        let policy = if best_effort {
            FailurePolicy::BestEffort
        } else {
            self.config.failure_policy()?
        };
        Ok(Disruptor::new(self.cluster.clone()).with_failure_policy(policy))
    }
}
