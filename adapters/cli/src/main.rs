#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the Gem Cascade match-3 engine.

mod board_code;
mod catalog;
mod progress_store;
mod render;
mod seed;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use gem_cascade_core::RandomKinds;
use gem_cascade_session::{query, Session, SessionStatus};
use gem_cascade_system_generation::generate_for;
use gem_cascade_system_hint::find_hint;
use tracing_subscriber::EnvFilter;

use crate::catalog::{LevelCatalog, LevelEntry};

const DEFAULT_PROGRESS_PATH: &str = "gem-cascade-progress.json";

#[derive(Debug, Parser)]
#[command(name = "gem-cascade", version, about = "Match-3 cascade engine from the terminal")]
struct Cli {
    /// Raise log verbosity; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List levels with their lock state and best score.
    Levels {
        /// Level catalog TOML; the built-in catalog when omitted.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Progress file.
        #[arg(long, default_value = DEFAULT_PROGRESS_PATH)]
        progress: PathBuf,
    },
    /// Auto-play a level by always taking the first hint.
    Play {
        /// Level id to play.
        #[arg(long)]
        level: u32,
        /// Text seed for a reproducible run.
        #[arg(long)]
        seed: Option<String>,
        /// Level catalog TOML; the built-in catalog when omitted.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Progress file.
        #[arg(long, default_value = DEFAULT_PROGRESS_PATH)]
        progress: PathBuf,
        /// Dead boards tolerated before giving up.
        #[arg(long, default_value_t = 3)]
        max_reshuffles: u32,
    },
    /// Print the first legal swap for a board code.
    Hint {
        /// Board code produced by `generate`.
        #[arg(long)]
        board: String,
    },
    /// Print a fresh board code for a level.
    Generate {
        /// Level id whose dimensions and catalog are used.
        #[arg(long)]
        level: u32,
        /// Text seed for a reproducible board.
        #[arg(long)]
        seed: Option<String>,
        /// Level catalog TOML; the built-in catalog when omitted.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Entry point for the Gem Cascade command-line interface.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Levels { catalog, progress } => list_levels(catalog.as_deref(), &progress),
        Commands::Play {
            level,
            seed,
            catalog,
            progress,
            max_reshuffles,
        } => play_level(
            level,
            seed.as_deref(),
            catalog.as_deref(),
            &progress,
            max_reshuffles,
        ),
        Commands::Hint { board } => print_hint(&board),
        Commands::Generate {
            level,
            seed,
            catalog,
        } => generate_board(level, seed.as_deref(), catalog.as_deref()),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_levels(catalog: Option<&Path>, progress_path: &Path) -> anyhow::Result<()> {
    let catalog = LevelCatalog::load(catalog)?;
    let progress = progress_store::load(progress_path)?;

    for level in catalog.levels() {
        let lock = if progress.is_unlocked(level.id) {
            "open"
        } else {
            "locked"
        };
        println!(
            "{:>3}  {:<22} {:>2}x{:<2} target {:>5} in {:>2} moves  best {:>5}  [{lock}]",
            level.id,
            level.name,
            level.cols,
            level.rows,
            level.target_score,
            level.max_moves,
            progress.high_score(level.id),
        );
        if !level.description.is_empty() {
            println!("     {}", level.description);
        }
    }
    println!(
        "{} of {} levels unlocked, {} sessions played",
        progress.unlocked_level().min(catalog.len()),
        catalog.len(),
        progress.play_count()
    );
    Ok(())
}

fn play_level(
    level_id: u32,
    seed: Option<&str>,
    catalog: Option<&Path>,
    progress_path: &Path,
    max_reshuffles: u32,
) -> anyhow::Result<()> {
    let catalog = LevelCatalog::load(catalog)?;
    let entry = find_level(&catalog, level_id)?;
    let mut progress = progress_store::load(progress_path)?;
    if !progress.select_level(level_id) {
        bail!(
            "level {level_id} is locked; the highest unlocked level is {}",
            progress.unlocked_level()
        );
    }

    let mut kinds = RandomKinds::new(seed::rng_from(seed));
    let mut session = Session::start(entry.config(), &mut kinds)
        .with_context(|| format!("failed to start level {level_id}"))?;
    println!("Level {}: {} (target {} in {} moves)", entry.id, entry.name, entry.target_score, entry.max_moves);
    println!("{}", render::grid(query::grid(&session)));

    let mut reshuffles = 0;
    let mut move_number = 0;
    while !query::status(&session).is_finished() {
        let Some(hint) = session.hint() else {
            if reshuffles >= max_reshuffles {
                println!("No legal moves left after {reshuffles} reshuffles; stopping.");
                break;
            }
            reshuffles += 1;
            session
                .reshuffle(&mut kinds)
                .context("failed to reshuffle a dead board")?;
            println!("Dead board, reshuffled ({reshuffles}/{max_reshuffles}).");
            continue;
        };

        let report = session
            .play(hint.first(), hint.second(), &mut kinds)
            .with_context(|| format!("hinted swap {} <-> {} failed", hint.first(), hint.second()))?;
        move_number += 1;
        let specials: usize = report.rounds.iter().map(|round| round.spawned.len()).sum();
        println!(
            "move {move_number:>2}: {} <-> {}  +{:<4} rounds {}  specials {}  score {}/{}  moves left {}",
            hint.first(),
            hint.second(),
            report.score_delta,
            report.rounds.len(),
            specials,
            query::score(&session),
            entry.target_score,
            query::moves_remaining(&session),
        );
    }

    println!();
    println!("{}", render::grid(query::grid(&session)));
    println!("{}", render::legend());
    let outcome = match query::status(&session) {
        SessionStatus::Won => "won",
        SessionStatus::Lost => "lost",
        SessionStatus::InProgress => "abandoned",
    };
    println!("Level {level_id} {outcome} with {} points.", query::score(&session));

    session.record(&mut progress, catalog.len());
    progress_store::save(progress_path, &progress)?;
    Ok(())
}

fn print_hint(board: &str) -> anyhow::Result<()> {
    let grid = board_code::decode(board).context("could not read board code")?;
    println!("{}", render::grid(&grid));
    match find_hint(&grid) {
        Some(hint) => println!("swap {} with {}", hint.first(), hint.second()),
        None => println!("no legal moves"),
    }
    Ok(())
}

fn generate_board(level_id: u32, seed: Option<&str>, catalog: Option<&Path>) -> anyhow::Result<()> {
    let catalog = LevelCatalog::load(catalog)?;
    let entry = find_level(&catalog, level_id)?;
    let mut kinds = RandomKinds::new(seed::rng_from(seed));
    let grid = generate_for(&entry.config(), &mut kinds)
        .with_context(|| format!("failed to generate a board for level {level_id}"))?;
    let code = board_code::encode(&grid).context("failed to encode board")?;
    println!("{code}");
    Ok(())
}

fn find_level(catalog: &LevelCatalog, level_id: u32) -> anyhow::Result<&LevelEntry> {
    match catalog.level(level_id) {
        Some(entry) => Ok(entry),
        None => bail!(
            "unknown level {level_id}; the catalog has levels 1 to {}",
            catalog.len()
        ),
    }
}
