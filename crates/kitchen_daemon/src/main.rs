//! HTTP daemon exposing a live kitchen match: JSON snapshots, an SSE event
//! stream, and a command endpoint for driving the chefs.

mod routes;
mod state;
mod tick_loop;

use anyhow::{Context, Result};
use clap::Parser;
use kitchen_world::{build_initial_state, load_content, load_map};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use state::{AppState, SimState};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kitchen_daemon", about = "Cooperative Kitchen Sim daemon")]
struct Args {
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long)]
    seed: Option<u64>,
    /// Wall-clock tick rate. Zero means run as fast as possible.
    #[arg(long, default_value_t = 1.0)]
    ticks_per_sec: f64,
    /// Stop the tick loop after this many ticks (the match clock usually
    /// ends it first).
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let content = load_content(&args.content_dir)?;
    let map = load_map(&args.content_dir, &content)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let game_state = build_initial_state(&content, &map, seed);
    tracing::info!(
        seed,
        chefs = game_state.chefs.len(),
        content_version = %content.content_version,
        "kitchen built"
    );

    let sim = Arc::new(parking_lot::Mutex::new(SimState {
        game_state,
        content,
        rng: ChaCha8Rng::seed_from_u64(seed),
        pending: Vec::new(),
        next_command_id: 0,
    }));
    let (event_tx, _) = tokio::sync::broadcast::channel(256);
    let paused = Arc::new(AtomicBool::new(false));

    let app_state = AppState {
        sim: sim.clone(),
        event_tx: event_tx.clone(),
        paused: paused.clone(),
        ticks_per_sec: args.ticks_per_sec,
    };
    tokio::spawn(tick_loop::run_tick_loop(
        sim,
        event_tx,
        paused,
        args.ticks_per_sec,
        args.max_ticks,
    ));

    let router = routes::make_router_with_cors(app_state, &args.cors_origin);
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, router).await.context("serving HTTP")?;
    Ok(())
}
