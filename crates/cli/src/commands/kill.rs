//! Kill the main process of selected pods through companion pods

use anyhow::{Context as _, Result};
use chaos_lib::disruption::{companion_pod, CompanionNamer};
use chaos_lib::{DisruptionSpec, UnitRef};
use clap::Args;

use super::{Context, SelectionArgs};
use crate::config::Config;
use crate::output::{
    color_status, print_info, print_json, print_report, print_table, OutcomeRow, OutputFormat,
};

/// Flags of `kill-main-process`
#[derive(Args, Debug, Clone)]
pub struct KillArgs {
    /// Container to signal, `*` for every container of the pod
    #[arg(long, default_value = "*")]
    pub container: String,

    /// Signal sent to the main process
    #[arg(long, default_value = "SIGTERM")]
    pub signal: String,

    /// Companion agent image
    #[arg(long)]
    pub image: Option<String>,

    /// Container runtime socket on the node
    #[arg(long)]
    pub runtime_socket: Option<String>,

    /// Run the companion container privileged
    #[arg(long)]
    pub privileged: bool,

    /// Keep going when a pod cannot be disrupted
    #[arg(long)]
    pub best_effort: bool,

    /// Print the companion pods instead of creating them
    #[arg(long)]
    pub dry_run: bool,
}

impl KillArgs {
    pub fn spec(&self, config: &Config) -> DisruptionSpec {
        let defaults = DisruptionSpec::default();
        DisruptionSpec {
            signal: self.signal.clone(),
            container: self.container.clone(),
            companion_image: self
                .image
                .clone()
                .or_else(|| config.companion_image.clone())
                .unwrap_or_else(|| defaults.companion_image.clone()),
            runtime_socket: self
                .runtime_socket
                .clone()
                .or_else(|| config.runtime_socket.clone())
                .unwrap_or_else(|| defaults.runtime_socket.clone()),
            privileged: self.privileged,
            ..defaults
        }
    }
}

pub async fn kill_main_process(
    ctx: &Context,
    selection: &SelectionArgs,
    args: &KillArgs,
) -> Result<()> {
    let criteria = selection.criteria(&ctx.config);
    let spec = args.spec(&ctx.config);
    spec.validate().context("Invalid kill-main-process options")?;
    let disruptor = ctx.disruptor(args.best_effort)?;

    if args.dry_run {
        let units = disruptor
            .selector()
            .select_units(&criteria)
            .await
            .context("Failed to select pods")?;
        print_plan(&units, &spec, ctx.format);
        return Ok(());
    }

    let report = disruptor
        .kill_main_process(&criteria, &spec)
        .await
        .context("Failed to kill main processes")?;

    print_report(&report, ctx.format);
    report.ensure_success()?;
    Ok(())
}

/// Show the companion pods a run would create
fn print_plan(units: &[UnitRef], spec: &DisruptionSpec, format: OutputFormat) {
    let mut namer = CompanionNamer::new(spec.name_prefix.clone(), &mut rand::thread_rng());

    match format {
        OutputFormat::Json => {
            let pods: Vec<_> = units
                .iter()
                .filter(|unit| unit.is_scheduled())
                .map(|unit| companion_pod(namer.next_name(), unit, spec))
                .collect();
            print_json(&pods);
        }
        OutputFormat::Table => {
            print_info(&format!(
                "Dry run: signal {} to container '{}', nothing was created",
                spec.signal, spec.container
            ));
            let rows: Vec<OutcomeRow> = units
                .iter()
                .map(|unit| {
                    if unit.is_scheduled() {
                        OutcomeRow {
                            pod: unit.to_string(),
                            node: unit.node_name.clone(),
                            result: color_status("dry-run"),
                            detail: namer.next_name(),
                        }
                    } else {
                        OutcomeRow {
                            pod: unit.to_string(),
                            node: "<none>".to_string(),
                            result: color_status("failed"),
                            detail: "not scheduled on any node".to_string(),
                        }
                    }
                })
                .collect();
            print_table(&rows, format);
        }
    }
}
