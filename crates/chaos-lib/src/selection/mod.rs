//! Selection engine
//!
//! Turns a [`SelectionCriteria`] into a bounded list of pods:
//! validate, fetch, filter by name, order, resolve the quantity, sample.

mod criteria;
mod filter;
mod order;
mod quantity;
mod sampler;


pub use criteria::validate;
pub use filter::NameFilter;
pub use order::arrange;
pub use quantity::resolve;
pub use sampler::sample;

use crate::cluster::ClusterApi;
use crate::error::Result;
use crate::models::{SelectionCriteria, UnitRef};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Apply name filter, ordering, quantity and sampling to fetched candidates
pub fn plan<R>(
    candidates: Vec<UnitRef>,
    criteria: &SelectionCriteria,
    filter: &NameFilter,
    rng: &mut R,
) -> Vec<UnitRef>
where
    R: Rng + ?Sized,
{
    let filtered = filter.apply(candidates);
    let ordered = arrange(filtered, criteria.order);

    if criteria.all {
        return ordered;
    }

    let k = resolve(criteria, ordered.len());
    sample(ordered, k, criteria.random, rng)
}

/// Selects pods from a cluster
#[derive(Clone)]
pub struct Selector {
    cluster: Arc<dyn ClusterApi>,
}

impl Selector {
    pub fn new(cluster: Arc<dyn ClusterApi>) -> Self {
        Self { cluster }
    }

    /// Select the pods matching `criteria`.
    ///
    /// Criteria and name pattern are checked before the cluster is
    /// contacted. An empty result is not an error.
    pub async fn select_units(&self, criteria: &SelectionCriteria) -> Result<Vec<UnitRef>> {
        validate(criteria)?;
        let filter = NameFilter::new(criteria.name_pattern.as_deref())?;

        let candidates = self
            .cluster
            .list_pods(&criteria.namespace, criteria.label_selector.clone())
            .await?;

        match &criteria.label_selector {
            Some(selector) => debug!(
                count = candidates.len(),
                selector = %selector,
                namespace = %criteria.namespace,
                "Found labelled pods"
            ),
            None => debug!(
                count = candidates.len(),
                namespace = %criteria.namespace,
                "Found pods"
            ),
        }

        Ok(plan(candidates, criteria, &filter, &mut rand::thread_rng()))
    }
}
