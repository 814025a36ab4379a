use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod api;
mod config;
mod engine;
mod error;
mod model;
mod pricing;
mod request;

use api::AppState;
use config::{Command, Config};
use engine::Engine;
use model::LeagueTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging. stdout is reserved for reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let engine_config = config.engine_config()?;

    let leagues = match &config.league_table {
        Some(path) => LeagueTable::load(path)?,
        None => LeagueTable::builtin(),
    };

    info!("League calibration table: {} entries", leagues.len());
    info!(
        "Preset {:?}: EV threshold {:+.2}, blend {:?}, lines {:?}, factors {:?}",
        engine_config.preset,
        engine_config.ev_threshold,
        engine_config.rate_blend,
        engine_config.line_convention,
        engine_config.temporal.as_array()
    );

    let engine = Engine::new(engine_config, leagues);

    match config.command {
        Command::Price(args) => {
            let report = engine
                .evaluate(&args.to_request())
                .context("Pricing failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Leagues => {
            let leagues: Vec<_> = engine.leagues().iter().collect();
            println!("{}", serde_json::to_string_pretty(&leagues)?);
        }
        Command::Serve { listen_addr } => {
            let addr: SocketAddr = listen_addr
                .parse()
                .with_context(|| format!("Invalid listen address {}", listen_addr))?;
            let app = api::router(AppState { engine });
            info!("Pricing API listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
