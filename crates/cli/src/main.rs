//! OnionScan Adapter CLI - runs onionscan against one onion address
//! Composition root: wires the system adapters into the core invoker

mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use onionscan_core::application::{deadline_channel, DeadlineSender, ProcessInvoker};
use onionscan_core::domain::request::{DEFAULT_COMMAND_NAME, DEFAULT_FALLBACK_PATH};
use onionscan_core::domain::ToolConfig;
use onionscan_core::port::ProcessLauncher;
use onionscan_core::AppError;
use onionscan_infra_system::{SearchPathLocator, TokioProcessLauncher};

use output::{build_params_bag, error_document, exit_code_for, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "onionscan-adapter")]
#[command(about = "Run onionscan against an onion service and relay its JSON report", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    tool: ToolArgs,
}

#[derive(Args)]
struct ToolArgs {
    /// Bare command name looked up on PATH
    #[arg(long, global = true, env = "ONIONSCAN_COMMAND", default_value = DEFAULT_COMMAND_NAME)]
    command_name: String,

    /// Executable used when the command is not on PATH
    #[arg(long, global = true, env = "ONIONSCAN_FALLBACK_PATH", default_value = DEFAULT_FALLBACK_PATH)]
    fallback_path: String,

    /// Only pass these environment variables to the tool (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    env_allowlist: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an onion address
    Scan {
        /// Onion service address
        target: String,

        /// Do not pass --verbose to onionscan
        #[arg(long)]
        no_verbose: bool,

        /// Tor SOCKS proxy address (empty means unset)
        #[arg(long, env = "ONIONSCAN_TOR_PROXY_ADDRESS")]
        tor_proxy_address: Option<String>,

        /// Analyzer params as a JSON object (`verbose`, `torProxyAddress`)
        #[arg(long)]
        params: Option<String>,

        /// Soft time limit in seconds (0 disables it; Ctrl+C always fires the deadline)
        #[arg(long, env = "ONIONSCAN_SOFT_TIME_LIMIT_SECS", default_value = "60")]
        soft_time_limit: u64,
    },

    /// Show where onionscan resolves
    Locate,
}

fn build_invoker(args: &ToolArgs) -> Result<ProcessInvoker> {
    let fallback_path = shellexpand::tilde(&args.fallback_path).into_owned();
    let tool = ToolConfig::new(args.command_name.clone(), fallback_path)
        .context("Invalid tool configuration")?;

    let launcher: Arc<dyn ProcessLauncher> = match &args.env_allowlist {
        Some(allowlist) => Arc::new(TokioProcessLauncher::with_env_allowlist(allowlist.clone())),
        None => Arc::new(TokioProcessLauncher::new()),
    };

    Ok(ProcessInvoker::with_defaults(
        tool,
        Arc::new(SearchPathLocator::new()),
        launcher,
    ))
}

/// Fire the deadline on the soft time limit or Ctrl+C, whichever comes first
fn spawn_deadline_timer(sender: DeadlineSender, limit: Option<Duration>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let limit_elapsed = async {
            match limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = limit_elapsed => info!(limit = ?limit, "Soft time limit reached"),
            Ok(()) = tokio::signal::ctrl_c() => info!("Interrupt received"),
        }

        sender.fire();
    })
}

async fn run_scan(
    invoker: &ProcessInvoker,
    target: &str,
    params: serde_json::Value,
    soft_time_limit: u64,
) -> Result<ExitCode> {
    let (sender, deadline) = deadline_channel();
    let limit = (soft_time_limit > 0).then(|| Duration::from_secs(soft_time_limit));
    let timer = spawn_deadline_timer(sender, limit);

    let result = invoker.run_analyzer(target, &params, deadline).await;
    timer.abort();

    match result {
        Ok(report) => {
            let text = serde_json::to_string_pretty(&report).context("Failed to render report")?;
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(AppError::Domain(e)) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            Ok(ExitCode::from(EXIT_USAGE))
        }
        Err(AppError::Scan(e)) => {
            println!("{}", error_document(&e));
            eprintln!("{} {} ({})", "✗".red().bold(), e, e.kind().to_string().yellow());
            Ok(ExitCode::from(exit_code_for(e.kind())))
        }
    }
}

fn run_locate(invoker: &ProcessInvoker) -> ExitCode {
    match invoker.resolve() {
        Some(location) => {
            println!("{} {}", "✓".green().bold(), location);
            ExitCode::SUCCESS
        }
        None => {
            let tool = invoker.tool();
            println!(
                "{} {} not found on PATH and {} is not executable",
                "✗".red().bold(),
                tool.command_name,
                tool.fallback_path.display()
            );
            ExitCode::from(exit_code_for(onionscan_core::domain::ErrorKind::NotInstalled))
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let invoker = build_invoker(&cli.tool)?;

    match cli.command {
        Commands::Scan {
            target,
            no_verbose,
            tor_proxy_address,
            params,
            soft_time_limit,
        } => {
            let bag = build_params_bag(params.as_deref(), no_verbose, tor_proxy_address.as_deref())?;
            run_scan(&invoker, &target, bag, soft_time_limit).await
        }
        Commands::Locate => Ok(run_locate(&invoker)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    info!("OnionScan adapter v{} starting...", onionscan_core::VERSION);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}
