use anyhow::{Context, Result};
use autoclicker::{
    run_click_loop, run_form, CancelToken, ClickConfig, ClickerError, MouseButton, SystemInjector,
};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Repeated mouse clicks through the Windows input API.
#[derive(Parser, Debug)]
#[command(name = "autoclicker", version, about, long_about = None)]
struct Cli {
    /// Seconds between clicks
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    interval: f64,

    /// Number of clicks (0 = until stopped)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    count: i64,

    /// Mouse button to click with
    #[arg(long, value_enum, default_value_t = MouseButton::Left)]
    button: MouseButton,

    /// Seconds to wait before the first click
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
    delay: f64,

    /// Open the interactive form; the other flags only seed its fields
    #[arg(long)]
    gui: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.gui);

    let injector = SystemInjector::new().unwrap_or_else(|e| usage_error(e));

    let config = ClickConfig::from_seconds(cli.interval, cli.count, cli.button, cli.delay);
    if let Err(e) = config.validate() {
        usage_error(e);
    }
    debug!(?config, gui = cli.gui, "configuration accepted");

    if cli.gui {
        tokio::task::spawn_blocking(move || run_form(&config, injector))
            .await
            .context("form thread panicked")??;
        return Ok(());
    }

    run_cli(config, injector).await
}

fn init_tracing(verbose: bool, gui: bool) {
    // Log lines would land on top of the form.
    let default_level = match (verbose, gui) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report `err` the way clap reports bad arguments and exit.
fn usage_error(err: ClickerError) -> ! {
    Cli::command()
        .error(ErrorKind::ValueValidation, err)
        .exit()
}

async fn run_cli(config: ClickConfig, injector: SystemInjector) -> Result<()> {
    println!(
        "{} {:.2}s {}",
        "Autoclicker starting in".cyan(),
        config.delay_secs,
        "(stop with Ctrl+C)...".dimmed()
    );

    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let mut worker = tokio::task::spawn_blocking(move || {
        let mut injector = injector;
        run_click_loop(&config, &mut injector, Some(&worker_cancel))
    });

    let summary = tokio::select! {
        joined = &mut worker => joined.context("click worker panicked")??,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            cancel.cancel();
            let summary = worker.await.context("click worker panicked")??;
            println!("{}", "Autoclicker stopped.".yellow());
            summary
        }
    };

    info!(clicks = summary.clicks, cancelled = summary.cancelled, "done");
    Ok(())
}
