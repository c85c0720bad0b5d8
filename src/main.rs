use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod collector;
mod config;
mod data_source;
mod error;
mod processing;
mod reporter;
mod service;

use collector::Collector;
use config::{Cli, CollectArgs, Mode};
use processing::LuminosityEstimator;
use reporter::ReporterConfig;
use service::PollingLoop;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with colors and stderr output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ldr_reporter=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let shutdown = spawn_shutdown_listener();

    if let Some(Mode::Collect(args)) = &cli.mode {
        return run_collector(args, shutdown).await;
    }

    // Require a mode
    let Some(reporter_config) = cli.to_reporter_config() else {
        eprintln!("Error: Please specify a mode (console, udp or collect)");
        eprintln!("Use --help for usage information");
        std::process::exit(1);
    };

    run_reporter(&cli, reporter_config, shutdown).await
}

/// Set up the sensor pipeline and poll until shutdown
async fn run_reporter(
    cli: &Cli,
    reporter_config: ReporterConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let estimator = LuminosityEstimator::new(cli.to_calibration()?);
    let calibration = estimator.calibration();
    tracing::info!(
        "Calibration: bright={} ohm, dark={} ohm, adc_max={}, fixed={} ohm",
        calibration.bright_resistance,
        calibration.dark_resistance,
        calibration.adc_max,
        calibration.fixed_resistance
    );

    let source = cli.to_sample_source_config().create_source();
    let reporter = reporter_config.create_reporter().await?;

    let mut polling =
        PollingLoop::new(source, estimator, reporter, cli.interval()).with_max_cycles(cli.cycles);

    polling.run(shutdown).await;

    Ok(())
}

/// Receive readings and print them as JSON lines until shutdown
async fn run_collector(
    args: &CollectArgs,
    shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let collector = Collector::bind(args.to_bind_addr()?, args.sensor_id.clone()).await?;

    let mut stdout = std::io::stdout();
    collector.run(&mut stdout, shutdown).await?;

    Ok(())
}

/// Raise the shutdown flag on Ctrl+C
fn spawn_shutdown_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
            }
        }
    });

    rx
}
