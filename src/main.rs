use clap::Parser;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use kitchen_rush_rs::cli::{Cli, Command};
use kitchen_rush_rs::error::Result;
use kitchen_rush_rs::interface::{
    PlayerAction, display_catalog, display_events, display_game_over, display_kitchen,
    display_menu, display_recipe, display_status, prompt_action, prompt_recipe, prompt_yes_no,
};
use kitchen_rush_rs::models::{Recipe, standard_recipes};
use kitchen_rush_rs::state::{
    GameSession, GameState, SessionConfig, load_config, load_recipes, save_config, save_recipes,
};

/// Simulated seconds an action takes in the terminal game.
const ACTION_SECS: f64 = 1.0;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    let command = cli.command.clone().unwrap_or_default();

    match command {
        Command::Play => cmd_play(&cli),
        Command::Menu => cmd_menu(&cli),
        Command::Recipe { name } => cmd_recipe(&cli, &name),
        Command::Init { force } => cmd_init(&cli, force),
    }
}

fn load_session_config(path: &str) -> Result<SessionConfig> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        Ok(SessionConfig::default())
    }
}

fn load_catalog(path: &str) -> Result<Vec<Recipe>> {
    if Path::new(path).exists() {
        load_recipes(path)
    } else {
        Ok(standard_recipes())
    }
}

/// Play rounds in the terminal until the player stops.
fn cmd_play(cli: &Cli) -> Result<()> {
    let config = load_session_config(&cli.config)?;
    let recipes = load_catalog(&cli.recipes)?;
    println!("Loaded {} recipes", recipes.len());

    let mut session = GameSession::new(config, recipes, cli.seed)?;
    let actor = session.first_actor();
    session.start();

    loop {
        display_events(&session.drain_events());

        match session.state() {
            GameState::Countdown => {
                display_status(&session);
                session.tick(ACTION_SECS);
                continue;
            }
            GameState::Paused => {
                if prompt_yes_no("Paused. Resume?", true)? {
                    session.resume();
                    continue;
                }
                break;
            }
            GameState::GameOver => {
                display_game_over(session.score());
                if prompt_yes_no("Play again?", true)? {
                    session.restart();
                    continue;
                }
                break;
            }
            GameState::NotStarted | GameState::Playing => {}
        }

        display_status(&session);
        display_menu(session.recipes());
        display_kitchen(session.kitchen());

        match prompt_action(session.kitchen())? {
            PlayerAction::Interact(target) => {
                if !session.interact_with(actor, target) {
                    println!("Nothing happened.");
                }
                session.tick(ACTION_SECS);
            }
            PlayerAction::Cut(target) => {
                if !session.cut_at(actor, target) {
                    println!("Nothing to cut there.");
                }
                session.tick(ACTION_SECS);
            }
            PlayerAction::Drop => {
                session.drop_held(actor);
                session.tick(ACTION_SECS);
            }
            PlayerAction::Wait(secs) => session.tick(secs),
            PlayerAction::Pause => session.pause(),
            PlayerAction::Quit => break,
        }
    }

    Ok(())
}

/// List the recipe catalog.
fn cmd_menu(cli: &Cli) -> Result<()> {
    let recipes = load_catalog(&cli.recipes)?;
    display_catalog(&recipes);
    Ok(())
}

/// Show one recipe in full.
fn cmd_recipe(cli: &Cli, name: &str) -> Result<()> {
    let recipes = load_catalog(&cli.recipes)?;
    if let Some(recipe) = prompt_recipe(&recipes, name)? {
        display_recipe(recipe);
    }
    Ok(())
}

/// Write default config and recipe files.
fn cmd_init(cli: &Cli, force: bool) -> Result<()> {
    for path in [&cli.config, &cli.recipes] {
        if Path::new(path).exists() && !force {
            println!("{} already exists (use --force to overwrite).", path);
            return Ok(());
        }
    }

    save_config(&cli.config, &SessionConfig::default())?;
    println!("Wrote {}", cli.config);
    save_recipes(&cli.recipes, &standard_recipes())?;
    println!("Wrote {}", cli.recipes);
    Ok(())
}
