//! Pomodoro widget - an interactive terminal Pomodoro timer
//!
//! Counts down focus and break sessions:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 focus sessions
//!
//! with optional background music and streak sharing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use pomodoro_widget::app;
use pomodoro_widget::cli::{Cli, Commands, Display, RunArgs};
use pomodoro_widget::config::{default_data_dir, WidgetConfig};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            Display::show_error(&format!("Failed to start runtime: {}", e));
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(execute(cli));
    // A pending stdin read cannot be cancelled; do not wait for it.
    runtime.shutdown_background();

    if let Err(e) = result {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with the countdown line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("verbose logging on");
    }

    match cli.command {
        Some(Commands::Run(args)) => run(cli.data_dir, &args).await?,
        Some(Commands::Config) => {
            let data_dir = resolve_data_dir(cli.data_dir)?;
            let config = WidgetConfig::load(&data_dir)?;
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize configuration")?;
            println!("{}", json);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => run(cli.data_dir, &RunArgs::default()).await?,
    }

    Ok(())
}

async fn run(data_dir: Option<PathBuf>, args: &RunArgs) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = app::effective_config(&data_dir, args)?;
    app::run(config, &data_dir).await
}

fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(dir),
        None => Ok(default_data_dir()?),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
