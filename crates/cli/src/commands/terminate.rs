//! Delete selected pods

use anyhow::{Context as _, Result};
use chaos_lib::GracePeriod;

use super::{Context, SelectionArgs};
use crate::output::{print_info, print_report, print_units, OutputFormat};

pub async fn terminate_pods(
    ctx: &Context,
    args: &SelectionArgs,
    grace_period: i64,
    best_effort: bool,
    dry_run: bool,
) -> Result<()> {
    let criteria = args.criteria(&ctx.config);
    let disruptor = ctx.disruptor(best_effort)?;

    if dry_run {
        let units = disruptor
            .selector()
            .select_units(&criteria)
            .await
            .context("Failed to select pods")?;
        if ctx.format == OutputFormat::Table {
            print_info(&format!(
                "Dry run: {} pod(s) would be deleted, nothing was changed",
                units.len()
            ));
        }
        print_units(&units, ctx.format);
        return Ok(());
    }

    let report = disruptor
        .terminate_units(&criteria, GracePeriod::from(grace_period))
        .await
        .context("Failed to terminate pods")?;

    print_report(&report, ctx.format);
    report.ensure_success()?;
    Ok(())
}
