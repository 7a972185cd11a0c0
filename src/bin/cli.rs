//! Telemetry CLI Client
//!
//! Command-line interface for querying and controlling a telemetry agent.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossbeam::channel;
use telemetry_client::render::{exit_code, metrics_table, response_summary};
use telemetry_client::watch::watch;
use telemetry_client::{ClientConfig, Response, TelemetryClient, TelemetryError};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status for failures of the exchange itself
const EXIT_TRANSPORT_FAILURE: u8 = 2;

/// ANSI clear screen + cursor home
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Telemetry CLI
#[derive(Parser, Debug)]
#[command(name = "telemetry-cli")]
#[command(about = "Query and control a telemetry agent")]
#[command(version)]
struct Args {
    /// Agent host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Agent port
    #[arg(long, default_value = "9000")]
    port: u16,

    /// Timeout in seconds, applied to connect and to send/receive
    #[arg(long, default_value = "1.0")]
    timeout: f64,

    /// Largest accepted response line in bytes
    #[arg(long, default_value = "8192")]
    max_line_bytes: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch metrics once
    Once,

    /// Continuously fetch and display metrics
    Watch {
        /// Seconds between polls
        #[arg(long, default_value = "1.0")]
        interval: f64,
    },

    /// Check that the agent answers
    Ping,

    /// Request a service restart
    Restart,

    /// Set agent throttle (ms)
    Throttle {
        /// Throttle in milliseconds
        #[arg(long, allow_negative_numbers = true)]
        ms: i64,
    },
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the rendered output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("error: {e}");
            ExitCode::from(EXIT_TRANSPORT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<ExitCode, TelemetryError> {
    let timeout = seconds(args.timeout, "--timeout")?;
    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .timeout(timeout)
        .max_line_bytes(args.max_line_bytes)
        .build()?;

    tracing::debug!("telemetry-cli v{} -> {}", telemetry_client::VERSION, config.addr());
    let client = TelemetryClient::new(config);

    let response = match args.command {
        Commands::Once => {
            let response = client.get_metrics()?;
            print!("{}", metrics_table(&response));
            return Ok(status(&response));
        }
        Commands::Watch { interval } => {
            let interval = seconds(interval, "--interval")?;
            return run_watch(&client, interval);
        }
        Commands::Ping => client.ping()?,
        Commands::Restart => client.restart()?,
        Commands::Throttle { ms } => client.throttle(ms)?,
    };

    println!("{}", response_summary(&response));
    Ok(status(&response))
}

fn run_watch(client: &TelemetryClient, interval: Duration) -> Result<ExitCode, TelemetryError> {
    let (stop_tx, stop_rx) = channel::bounded::<()>(1);

    let handler = ctrlc::set_handler(move || {
        tracing::debug!("Received Ctrl+C, stopping watch");
        // A second Ctrl+C finds the slot full; one pending stop is enough
        let _ = stop_tx.try_send(());
    });
    if let Err(e) = handler {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        return Ok(ExitCode::from(EXIT_TRANSPORT_FAILURE));
    }

    let polls = watch(
        interval,
        &stop_rx,
        || client.get_metrics(),
        |response| {
            let mut stdout = io::stdout().lock();
            let _ = write!(stdout, "{CLEAR_SCREEN}{}", metrics_table(response));
            let _ = stdout.flush();
        },
    )?;

    tracing::debug!(polls, "watch finished");
    Ok(ExitCode::SUCCESS)
}

fn status(response: &Response) -> ExitCode {
    // exit_code is 0 or 1
    ExitCode::from(exit_code(response) as u8)
}

fn seconds(value: f64, flag: &str) -> Result<Duration, TelemetryError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| TelemetryError::InvalidArgument(format!("{flag} {value}: {e}")))
}
