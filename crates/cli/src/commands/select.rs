//! Show which pods a selection would pick

use anyhow::{Context as _, Result};
use chaos_lib::Selector;

use super::{Context, SelectionArgs};
use crate::output::print_units;

pub async fn select_pods(ctx: &Context, args: &SelectionArgs) -> Result<()> {
    let criteria = args.criteria(&ctx.config);
    let selector = Selector::new(ctx.cluster.clone());

    let units = selector
        .select_units(&criteria)
        .await
        .with_context(|| format!("Failed to select pods in namespace {}", criteria.namespace))?;

    print_units(&units, ctx.format);
    Ok(())
}
