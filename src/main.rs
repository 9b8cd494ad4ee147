use anyhow::{Context, Result};
use salmon_chess::{Game, Search, SearchConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PLIES_VAR: &str = "SALMON_PLIES";
const DEFAULT_PLIES: u32 = 6;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SearchConfig::from_env()?;
    let plies = match std::env::var(PLIES_VAR) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{PLIES_VAR} must be a whole number, got {raw:?}"))?,
        Err(_) => DEFAULT_PLIES,
    };
    info!(?config, plies, "starting self-play");

    let mut game = Game::new();
    let mut search = Search::with_config(&config);
    println!("{}\n", game.board());

    for _ in 0..plies {
        let mover = game.active_player();
        let Some(record) = game
            .play_engine_move(&mut search)
            .context("engine produced a move the rules rejected")?
        else {
            println!("{mover} has no legal moves");
            break;
        };
        let evaluator = search.evaluator();
        let evaluation = evaluator.evaluate(game.board());
        let material = evaluator.material(game.board());
        println!(
            "{mover} plays {} {} (material {material:.1}, evaluation {evaluation:.2})\n{}\n",
            record.origin,
            record.destination,
            game.board()
        );
    }

    Ok(())
}
