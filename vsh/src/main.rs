use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vos_config::{expand_host_path, LogFormat, LoggingConfig, VosConfig};
use vos_core::{snapshot, MemoryFs};
use vsh::{Bootloader, BufferedTerminal, ShellBuilder, Terminal, TerminalEvent};

mod console;

use console::ConsoleTerminal;

/// vsh - self-installing shell for the vos virtual filesystem
#[derive(Parser, Debug)]
#[command(name = "vsh", version, about)]
struct Args {
    /// Run one command line through the installed shell and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Configuration file
    #[arg(long, env = "VOS_CONFIG")]
    config: Option<String>,

    /// File the virtual filesystem is loaded from and saved to
    #[arg(long)]
    snapshot: Option<String>,

    /// Keep the virtual filesystem in memory only
    #[arg(long, conflicts_with = "snapshot")]
    ephemeral: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => vos_config::load_from_file(path),
        None => vos_config::load(),
    };
    let config = match loaded {
        Ok(config) => {
            init_logging(&config.logging);
            config
        }
        Err(e) => {
            let config = VosConfig::default();
            init_logging(&config.logging);
            tracing::warn!(error = %e, "failed to load configuration, using defaults");
            config
        }
    };

    let snapshot_path = snapshot_path(&args, &config);
    let fs = Arc::new(match &snapshot_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading filesystem snapshot");
            snapshot::load_or_new(path).await?
        }
        None => MemoryFs::new(),
    });

    let code = match &args.command {
        Some(line) => run_command(fs.clone(), &config, line).await,
        None => {
            run_interactive(fs.clone(), &config).await?;
            0
        }
    };

    if let Some(path) = &snapshot_path {
        snapshot::save(&fs, path).await?;
        tracing::info!(path = %path.display(), "filesystem snapshot saved");
    }

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.directive()));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}

/// Snapshot priority: --ephemeral > --snapshot > config.
fn snapshot_path(args: &Args, config: &VosConfig) -> Option<PathBuf> {
    if args.ephemeral {
        return None;
    }
    match &args.snapshot {
        Some(path) => Some(expand_host_path(path)),
        None if config.storage.is_ephemeral() => None,
        None => Some(expand_host_path(&config.storage.snapshot)),
    }
}

fn builder(fs: Arc<MemoryFs>, terminal: Arc<dyn Terminal>, config: &VosConfig) -> ShellBuilder {
    ShellBuilder::new(fs, terminal)
        .prompt(config.shell.prompt.clone())
        .loop_delay(Duration::from_millis(config.shell.loop_delay_ms))
}

/// Boots against a scripted terminal and processes a single line. Boot
/// chatter is dropped; boot errors and the line's own output are printed.
async fn run_command(fs: Arc<MemoryFs>, config: &VosConfig, line: &str) -> i32 {
    let terminal = Arc::new(BufferedTerminal::new());
    let boot = Bootloader::new(
        builder(fs, terminal.clone(), config),
        config.boot.core_path.clone(),
    );

    let shell = boot.start().await;
    let boot_failed = flush(&terminal, false);
    let Some(mut shell) = shell else {
        return 1;
    };
    if boot_failed {
        tracing::warn!("core image install reported errors");
    }

    let result = shell.process_line(line).await;
    let had_errors = flush(&terminal, true);
    match result {
        Ok(_) if had_errors => 1,
        Ok(_) => 0,
        Err(e) => {
            eprintln!("vsh: {e}");
            1
        }
    }
}

/// Prints buffered output. Returns whether anything went to the error
/// channel.
fn flush(terminal: &BufferedTerminal, print_lines: bool) -> bool {
    let mut had_errors = false;
    for event in terminal.take_events() {
        match event {
            TerminalEvent::Line(line) if print_lines => println!("{line}"),
            TerminalEvent::Error(line) => {
                had_errors = true;
                eprintln!("{line}");
            }
            _ => {}
        }
    }
    had_errors
}

async fn run_interactive(
    fs: Arc<MemoryFs>,
    config: &VosConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let history = &config.shell.history;
    let history_path = history.enabled.then(|| expand_host_path(&history.file));
    let terminal = Arc::new(ConsoleTerminal::new(history_path, history.max_entries)?);

    let boot = Bootloader::new(
        builder(fs, terminal.clone(), config),
        config.boot.core_path.clone(),
    );
    boot.boot().await;

    if let Err(e) = terminal.save_history().await {
        tracing::warn!(error = %e, "failed to save history");
    }
    Ok(())
}
