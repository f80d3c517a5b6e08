use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use kitchen_rush_rs::autoplay::{Bot, BotConfig, RunStats, print_runs, write_csv, write_summary_json};
use kitchen_rush_rs::models::standard_recipes;
use kitchen_rush_rs::state::{GameSession, SessionConfig, load_config, load_recipes};

#[derive(Parser, Debug)]
#[command(name = "autoplay")]
#[command(about = "Headless seeded rounds played by a scripted cook")]
struct Args {
    /// Number of rounds to play
    #[arg(long, default_value = "10")]
    runs: u64,

    /// Seed of the first round; round i uses seed + i
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Override the round length in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Simulated seconds per bot action
    #[arg(long, default_value = "0.5")]
    step: f64,

    /// Session config JSON (built-in kitchen when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recipe catalog JSON (built-in menu when omitted)
    #[arg(long)]
    recipes: Option<PathBuf>,

    /// Output CSV file for all runs
    #[arg(long, default_value = "autoplay_runs.csv")]
    csv: PathBuf,

    /// Output JSON file for the summary
    #[arg(long, default_value = "autoplay_summary.json")]
    json: PathBuf,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error reading config {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.game_secs = duration;
    }

    let recipes = match &args.recipes {
        Some(path) => match load_recipes(path) {
            Ok(recipes) => recipes,
            Err(e) => {
                eprintln!("Error reading recipes {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => standard_recipes(),
    };

    if !(args.step > 0.0) {
        eprintln!("Error: --step must be positive");
        std::process::exit(1);
    }

    println!(
        "Playing {} rounds of {:.0}s with {} recipes",
        args.runs,
        config.game_secs,
        recipes.len()
    );

    let mut results: Vec<RunStats> = Vec::new();
    for i in 0..args.runs {
        let seed = args.seed.wrapping_add(i);
        let mut session = match GameSession::new(config.clone(), recipes.clone(), Some(seed)) {
            Ok(session) => session,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        session.start();
        let actor = session.first_actor();
        let bot = Bot::new(actor, BotConfig { step_secs: args.step });
        results.push(bot.play(&mut session, seed));
    }

    print_runs(&results);

    if let Err(e) = write_csv(&results, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
    } else {
        println!("Wrote all runs to {:?}", args.csv);
    }

    if let Err(e) = write_summary_json(&results, &args.json) {
        eprintln!("Error writing JSON: {}", e);
    } else {
        println!("Wrote summary to {:?}", args.json);
    }
}
