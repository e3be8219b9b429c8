mod render;

use std::io::{BufRead, IsTerminal, Write};

use anyhow::Context;
use clap::Parser;
use lotsync_client::{run_cycle, LotClient, PollScheduler, SyncStatus};
use lotsync_core::{AppConfig, Pipeline};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use crate::render::{render_cards, Dashboard, InputAction};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Parser)]
#[command(name = "lotsync")]
#[command(about = "Live campus parking occupancy in the terminal")]
struct Cli {
    /// Fetch once, print the result and exit.
    #[arg(long)]
    once: bool,
    /// Print the records as JSON (only with --once).
    #[arg(long, requires = "once")]
    json: bool,
    /// Hide the campus map.
    #[arg(long)]
    no_map: bool,
    /// Hide the occupancy legend.
    #[arg(long)]
    no_legend: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = lotsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");
    tracing::info!(
        base_url = %config.api_base_url,
        map_schema = %config.map_schema,
        "lotsync starting"
    );

    let client = LotClient::from_app_config(&config)?;
    let pipeline = Pipeline::from_app_config(&config);

    if cli.once {
        run_once(&cli, &config, &client, &pipeline).await
    } else {
        run_interactive(&cli, config, client, pipeline).await
    }
}

async fn run_once(
    cli: &Cli,
    config: &AppConfig,
    client: &LotClient,
    pipeline: &Pipeline,
) -> anyhow::Result<()> {
    let records = match run_cycle(client, pipeline).await {
        Ok(records) => records,
        Err(e) => anyhow::bail!("{}", e.user_message()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No parking data available.");
    } else {
        let color = std::io::stdout().is_terminal();
        print!(
            "{}",
            render_cards(&records, &config.lots, &config.thresholds, color)
        );
    }
    Ok(())
}

async fn run_interactive(
    cli: &Cli,
    config: AppConfig,
    client: LotClient,
    pipeline: Pipeline,
) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(
        config.lots.clone(),
        config.thresholds,
        !cli.no_legend,
        !cli.no_map,
    )
    .with_color(std::io::stdout().is_terminal());

    let mut scheduler = PollScheduler::new(client, pipeline, config.poll_interval);
    let mut status_rx = scheduler.subscribe();
    scheduler.start().context("failed to start poll scheduler")?;
    tracing::info!(interval = ?config.poll_interval, "polling started");

    let mut input_rx = spawn_stdin_reader();
    let mut input_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    draw(&dashboard, &current_status(&status_rx))?;

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = status_rx.borrow_and_update().clone();
                dashboard.observe(&status);
                draw(&dashboard, &status)?;
            }
            line = input_rx.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                match dashboard.handle_input(&line) {
                    InputAction::Quit => break,
                    InputAction::Redraw => draw(&dashboard, &current_status(&status_rx))?,
                    InputAction::Ignore => {}
                }
            }
        }
    }

    scheduler.shutdown().await;
    tracing::info!("polling stopped");
    Ok(())
}

/// Copies the latest status out of the channel so the read lock is released
/// before any terminal I/O.
fn current_status(rx: &watch::Receiver<SyncStatus>) -> SyncStatus {
    rx.borrow().clone()
}

fn draw(dashboard: &Dashboard, status: &SyncStatus) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if stdout.is_terminal() {
        stdout.write_all(CLEAR_SCREEN.as_bytes())?;
    }
    stdout.write_all(dashboard.render(status).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Reads stdin on a plain thread so a pending read never holds up runtime
/// shutdown. The channel closes on EOF.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping");
}

#[cfg(test)]
mod tests;
