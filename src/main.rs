use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};

use spc_monitor::config::{MonitorConfig, build_monitor, config_schema, init_logging, load_config};
use spc_monitor::tasks::ShutdownSignal;

const USAGE: &str = "usage: spc-monitor [CONFIG.json] | --schema";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "spc-monitor failed");
            eprintln!("spc-monitor: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next().as_deref() {
        Some("--schema") => {
            println!("{}", serde_json::to_string_pretty(&config_schema())?);
            return Ok(());
        }
        Some("-h" | "--help") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };

    init_logging(&config.logging).context("initialising logging")?;

    let shutdown = ShutdownSignal::new();
    install_signal_handler(&shutdown)?;

    let mut monitor = build_monitor(config)?.with_shutdown(shutdown);
    let report = monitor.run()?;
    info!(
        readings = report.readings,
        anomalies = report.findings,
        sink_failures = report.sink_failures,
        "done"
    );
    Ok(())
}

#[cfg(unix)]
fn install_signal_handler(shutdown: &ShutdownSignal) -> Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("registering signal handlers")?;
    let shutdown = shutdown.clone();
    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            for signal in signals.forever() {
                if shutdown.is_requested() {
                    std::process::exit(128 + signal);
                }
                info!(signal, "termination signal received, finishing current reading");
                shutdown.request();
            }
        })
        .context("spawning signal thread")?;
    Ok(())
}

#[cfg(not(unix))]
fn install_signal_handler(_shutdown: &ShutdownSignal) -> Result<()> {
    Ok(())
}
