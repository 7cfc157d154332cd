//! Inline tic-tac-toe - CLI
//!
//! Stands in for the chat transport: every command is one callback event.

#![warn(missing_docs)]

mod cli;

use std::io::BufRead;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use inline_tictactoe::{GameId, Player, UserId};
use inline_tictactoe_server::{
    EngineConfig, GameRegistry, GameStateView, MoveResolver, Outcome, ResolveError, Resolution,
    StoreKind, cell_tokens, render_board, render_message,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = EngineConfig::load(&cli.config)?;
    if let Some(db_path) = &cli.db_path {
        config = config.with_db_path(db_path.clone());
    }
    if cli.memory {
        config = config.with_store(StoreKind::Memory);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    // Config is read before the subscriber exists; report it now.
    info!(
        source = %config.source(),
        store = %config.store(),
        db_path = %config.db_path(),
        db_path_from_env = *config.db_path_from_env(),
        "Starting inline tic-tac-toe"
    );

    let registry = GameRegistry::new(config.open_store()?);
    let resolver = MoveResolver::new(registry, *config.default_first_player_is_mark1());

    match cli.command {
        Command::New {
            user_id,
            name,
            second_mark,
        } => {
            let user = Player::new(UserId(user_id), name);
            let resolution = resolver.start_new_game(&user, !second_mark)?;
            print_resolution(&resolution, cli.json)
        }
        Command::Move {
            user_id,
            name,
            game_id,
            cell,
        } => {
            let user = Player::new(UserId(user_id), name);
            let resolution = resolver.resolve_move(&user, GameId(game_id), Some(cell))?;
            print_resolution(&resolution, cli.json)
        }
        Command::Event {
            user_id,
            name,
            token,
        } => {
            let user = Player::new(UserId(user_id), name);
            let resolution = resolver.dispatch(&user, &token)?;
            print_resolution(&resolution, cli.json)
        }
        Command::Show { game_id } => show_game(&resolver, GameId(game_id), cli.json),
        Command::Replay => replay(&resolver, cli.json),
    }
}

/// Resolves one event per stdin line. Bad lines and bad tokens are
/// reported and skipped; store failures stop the replay.
#[instrument(skip(resolver))]
fn replay(resolver: &MoveResolver, json: bool) -> Result<()> {
    for (number, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((user, token)) = parse_event_line(line) else {
            warn!(line = number + 1, "Expected `<user_id> <token> <name>`");
            continue;
        };

        match resolver.dispatch(&user, token) {
            Ok(resolution) => print_resolution(&resolution, json)?,
            Err(ResolveError::MalformedEvent(err)) => {
                warn!(line = number + 1, error = %err, "Skipping event");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Splits `<user_id> <token> <name...>`.
fn parse_event_line(line: &str) -> Option<(Player, &str)> {
    let mut parts = line.splitn(3, char::is_whitespace);
    let user_id = parts.next()?.parse::<i64>().ok()?;
    let token = parts.next()?;
    let name = parts.next().map(str::trim).unwrap_or_default();
    Some((Player::new(UserId(user_id), name), token))
}

fn show_game(resolver: &MoveResolver, game_id: GameId, json: bool) -> Result<()> {
    let Some(state) = resolver.registry().load(game_id)? else {
        println!("No game {}", game_id);
        return Ok(());
    };

    let view = GameStateView::from(&state);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn print_resolution(resolution: &Resolution, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(resolution)?);
        return Ok(());
    }

    if *resolution.recovered() {
        println!("(game not found, started game {})", resolution.game_id());
    }
    match resolution.outcome() {
        Outcome::Rejected(reason) => println!("rejected: {}", reason),
        Outcome::InProgress => println!("game {}", resolution.game_id()),
        Outcome::Ended(status) => println!("game {} over: {:?}", resolution.game_id(), status),
    }
    print_view(resolution.view());
    Ok(())
}

fn print_view(view: &GameStateView) {
    println!("{}", render_message(view));
    println!("{}", render_board(view));
    if !view.is_over() {
        let tokens = cell_tokens(*view.game_id());
        println!("buttons: {}", tokens.concat().join(" "));
    }
    println!();
}
