//! Pod chaos CLI
//!
//! A command-line tool for selecting pods and disrupting them: deleting
//! them, or killing their main process through a companion pod, and for
//! probing deployments around an experiment.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chaos_lib::KubeCluster;
use clap::{Parser, Subcommand};
use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::kill::KillArgs;
use commands::{kill, probe, select, terminate, Context, SelectionArgs};
use config::Config;

/// Pod chaos CLI
#[derive(Parser)]
#[command(name = "podchaos")]
#[command(author, version, about = "Pod chaos experiments for Kubernetes", long_about = None)]
pub struct Cli {
    /// Path to kubeconfig file (uses default if not specified)
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<String>,

    /// Configuration file (default: ~/.config/podchaos/config.toml)
    #[arg(long, env = "PODCHAOS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the pods a selection picks, without touching them
    Select {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Delete selected pods
    Terminate {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Grace period in seconds, negative for the pod's own setting
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        grace_period: i64,

        /// Keep going when a pod cannot be deleted
        #[arg(long)]
        best_effort: bool,

        /// Show the pods that would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// Kill the main process of selected pods' containers
    KillMainProcess {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        kill: KillArgs,
    },

    /// Steady-state probes
    #[command(subcommand)]
    Probe(ProbeCommands),
}

#[derive(Subcommand)]
pub enum ProbeCommands {
    /// Check that a deployment has all desired replicas available
    Deployment {
        /// Deployment name
        name: String,

        /// Namespace of the deployment
        #[arg(long, short)]
        namespace: Option<String>,

        /// Label selector, `{name}` is replaced with the deployment name
        #[arg(long, short = 'l')]
        label_selector: Option<String>,
    },
}

fn init_tracing(verbose: bool, log_format: Option<&str>) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == Some("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// Build a client from the resolved kubeconfig, or from the in-cluster
/// environment when there is none
async fn connect(kubeconfig: Option<&str>) -> Result<kube::Client> {
    match config::kubeconfig_path(kubeconfig) {
        Some(path) => {
            debug!(path = %path.display(), "Loading kubeconfig");
            let kubeconfig = Kubeconfig::read_from(&path)
                .with_context(|| format!("Failed to read kubeconfig {}", path.display()))?;
            let client_config =
                kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .context("Invalid kubeconfig")?;
            kube::Client::try_from(client_config).context("Failed to create Kubernetes client")
        }
        None => kube::Client::try_default()
            .await
            .context("Failed to create Kubernetes client"),
    }
}

fn write_metrics(path: &std::path::Path) -> Result<()> {
    let text = chaos_lib::render_metrics().context("Failed to encode metrics")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    debug!(path = %path.display(), "Metrics written");
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, config.log_format.as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "Starting podchaos");

    let client = connect(cli.kubeconfig.as_deref()).await?;
    let metrics_textfile = config.metrics_textfile.clone();
    let ctx = Context {
        cluster: Arc::new(KubeCluster::new(client)),
        config,
        format: cli.format,
    };

    let result = match &cli.command {
        Commands::Select { selection } => select::select_pods(&ctx, selection).await,
        Commands::Terminate {
            selection,
            grace_period,
            best_effort,
            dry_run,
        } => {
            terminate::terminate_pods(&ctx, selection, *grace_period, *best_effort, *dry_run)
                .await
        }
        Commands::KillMainProcess { selection, kill } => {
            kill::kill_main_process(&ctx, selection, kill).await
        }
        Commands::Probe(ProbeCommands::Deployment {
            name,
            namespace,
            label_selector,
        }) => {
            probe::probe_deployment(&ctx, name, namespace.clone(), label_selector.clone()).await
        }
    };

    // Metrics are written even for failed runs
    if let Some(path) = metrics_textfile {
        if let Err(err) = write_metrics(&path) {
            warn!(error = %format!("{:#}", err), "Metrics not written");
        }
    }

    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
