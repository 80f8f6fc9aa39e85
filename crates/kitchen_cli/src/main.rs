use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kitchen_core::{ChefStateView, CommandEnvelope, Event, EventLevel, GameState};
use kitchen_world::{build_initial_state, load_content, load_map};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "kitchen_cli", about = "Cooperative Kitchen Sim CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a match for a fixed number of ticks (or until it finishes).
    Run {
        #[arg(long)]
        ticks: u64,
        /// Build a fresh kitchen with this seed. Mutually exclusive with --state.
        #[arg(long, conflicts_with = "state_file")]
        seed: Option<u64>,
        /// Load the initial GameState from a JSON file. Mutually exclusive with --seed.
        #[arg(long = "state", conflicts_with = "seed")]
        state_file: Option<String>,
        #[arg(long, default_value = "./content")]
        content_dir: String,
        /// JSON file holding an array of command envelopes to replay.
        #[arg(long)]
        script: Option<String>,
        #[arg(long, default_value_t = 10)]
        print_every: u64,
        #[arg(long, default_value = "normal", value_parser = ["normal", "debug"])]
        event_level: String,
    },
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn load_script(path: &str) -> Result<Vec<CommandEnvelope>> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading script file: {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("parsing script file: {path}"))
}

fn run(
    ticks: u64,
    seed: Option<u64>,
    state_file: Option<String>,
    content_dir: &str,
    script: Option<String>,
    print_every: u64,
    event_level: EventLevel,
) -> Result<()> {
    let content = load_content(content_dir)?;

    let (mut state, mut rng) = if let Some(path) = state_file {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("reading state file: {path}"))?;
        let loaded: GameState =
            serde_json::from_str(&json).with_context(|| format!("parsing state file: {path}"))?;
        let rng_seed = loaded.meta.seed;
        (loaded, ChaCha8Rng::seed_from_u64(rng_seed))
    } else {
        let map = load_map(content_dir, &content)?;
        let resolved_seed = seed.unwrap_or_else(rand::random);
        let new_state = build_initial_state(&content, &map, resolved_seed);
        (new_state, ChaCha8Rng::seed_from_u64(resolved_seed))
    };

    let scripted = match script {
        Some(path) => load_script(&path)?,
        None => Vec::new(),
    };

    println!(
        "Starting match: ticks={ticks} seed={} chefs={} content_version={}",
        state.meta.seed,
        state.chefs.len(),
        content.content_version,
    );
    println!("{}", "-".repeat(80));

    for _ in 0..ticks {
        let now = state.meta.tick;
        let batch: Vec<CommandEnvelope> = scripted
            .iter()
            .filter(|c| c.execute_at_tick == now)
            .cloned()
            .collect();

        let events = kitchen_core::tick(&mut state, &batch, &content, &mut rng, event_level);

        // Print scoring events regardless of print_every.
        for event in &events {
            match &event.event {
                Event::DishServed {
                    dish, score_after, ..
                } => {
                    println!("*** SERVED {dish} at tick={now:04}, score={score_after} ***");
                }
                Event::OrderExpired {
                    dish, score_after, ..
                } => {
                    println!("*** EXPIRED {dish} at tick={now:04}, score={score_after} ***");
                }
                Event::GameFinished { reason, score } => {
                    println!("*** MATCH OVER ({reason:?}) final score={score} ***");
                }
                _ => {}
            }
        }

        if state.finished.is_some() {
            break;
        }
        if state.meta.tick % print_every == 0 {
            print_status(&state);
        }
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final state at tick {}:", state.meta.tick);
    print_status(&state);
    Ok(())
}

fn print_status(state: &GameState) {
    let orders: Vec<String> = state
        .orders
        .iter()
        .map(|o| format!("{}({})", o.dish, o.time_left))
        .collect();

    let mut chef_ids: Vec<_> = state.chefs.keys().collect();
    chef_ids.sort();
    let chefs: Vec<String> = chef_ids
        .iter()
        .map(|id| {
            let chef = &state.chefs[*id];
            format!(
                "{id}@{} {:?}",
                chef.position,
                ChefStateView::of(chef)
            )
        })
        .collect();

    println!(
        "[tick={tick:04}  clock={clock:04}]  score={score}  streak={streak}  \
         orders=[{orders}]  {chefs}",
        tick = state.meta.tick,
        clock = state.clock_left,
        score = state.score,
        streak = state.failed_streak,
        orders = orders.join(", "),
        chefs = chefs.join("  "),
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            ticks,
            seed,
            state_file,
            content_dir,
            script,
            print_every,
            event_level,
        } => {
            let level = match event_level.as_str() {
                "debug" => EventLevel::Debug,
                _ => EventLevel::Normal,
            };
            run(
                ticks,
                seed,
                state_file,
                &content_dir,
                script,
                print_every,
                level,
            )?;
        }
    }
    Ok(())
}
