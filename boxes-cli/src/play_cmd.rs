//! Play command - play games between two players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use boxes_core::{play_game, MatchConfig, Player, PlayerConfig, SearchClock, Side};

use crate::benchmark::format_duration;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    Minimax,
    Random,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Match config JSON file (overrides the board and player flags)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board width in boxes
    #[arg(long, default_value = "3")]
    pub width: usize,

    /// Board height in boxes
    #[arg(long, default_value = "3")]
    pub height: usize,

    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Red player (moves first)
    #[arg(long, value_enum, default_value = "minimax")]
    pub red: PlayerKind,

    /// Blue player
    #[arg(long, value_enum, default_value = "random")]
    pub blue: PlayerKind,

    /// Search depth for a red minimax player
    #[arg(long, default_value = "4")]
    pub red_ply: u32,

    /// Search depth for a blue minimax player
    #[arg(long, default_value = "4")]
    pub blue_ply: u32,

    /// Print the final board of every game
    #[arg(long)]
    pub show_board: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    game_number: usize,
    red_score: i32,
    blue_score: i32,
    winner: Option<Side>,
    moves: usize,
    passes: u32,
    final_board: String,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    red_name: String,
    blue_name: String,
    games: Vec<GameSummary>,
    red_wins: usize,
    blue_wins: usize,
    draws: usize,
    red_search_time: Duration,
    blue_search_time: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the match config (file or flags)
/// 2. Play the games
/// 3. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        "Starting match: {:?} vs {:?} on {}x{} ({} games)",
        config.red,
        config.blue,
        config.width,
        config.height,
        config.games
    );

    let results = play_match(&config)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the config file if given, otherwise assemble one from flags
fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default()
            .with_board(args.width, args.height)
            .with_games(args.games)
            .with_players(
                player_config(args.red, args.red_ply),
                player_config(args.blue, args.blue_ply),
            ),
    };

    if let Some(seed) = seed {
        config.seed = Some(seed);
    }

    config.validate().context("Invalid match configuration")?;
    Ok(config)
}

/// Play all games in the match
fn play_match(config: &MatchConfig) -> Result<MatchResults> {
    let red_clock = Arc::new(SearchClock::new());
    let blue_clock = Arc::new(SearchClock::new());
    let mut games = Vec::with_capacity(config.games);
    let mut names = (String::new(), String::new());

    for game_num in 0..config.games {
        let (summary, red_name, blue_name) =
            play_single_game(config, game_num, &red_clock, &blue_clock)?;

        tracing::info!(
            "Game {}: red {} - {} blue ({} moves)",
            summary.game_number,
            summary.red_score,
            summary.blue_score,
            summary.moves
        );

        names = (red_name, blue_name);
        games.push(summary);
    }

    Ok(compute_match_statistics(
        games,
        names,
        red_clock.total(),
        blue_clock.total(),
    ))
}

/// Report match results
fn report_results(results: &MatchResults, args: &PlayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results, args.show_board);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; returns the summary and both player names
fn play_single_game(
    config: &MatchConfig,
    game_num: usize,
    red_clock: &Arc<SearchClock>,
    blue_clock: &Arc<SearchClock>,
) -> Result<(GameSummary, String, String)> {
    let (red_seed, blue_seed) = game_seeds(config.seed, game_num);
    let mut red = config.red.build(Side::Red, red_clock, red_seed);
    let mut blue = config.blue.build(Side::Blue, blue_clock, blue_seed);

    let mut board = config.new_board()?;
    let record = play_game(&mut board, red.as_mut(), blue.as_mut())
        .with_context(|| format!("Game {} hit an illegal move", game_num + 1))?;

    let summary = GameSummary {
        game_number: game_num + 1,
        red_score: record.red_score,
        blue_score: record.blue_score,
        winner: record.winner(),
        moves: record.moves.len(),
        passes: record.passes,
        final_board: board.to_string(),
    };

    Ok((summary, red.name(), blue.name()))
}

/// Compute aggregate statistics from game summaries
fn compute_match_statistics(
    games: Vec<GameSummary>,
    (red_name, blue_name): (String, String),
    red_search_time: Duration,
    blue_search_time: Duration,
) -> MatchResults {
    let red_wins = games.iter().filter(|g| g.winner == Some(Side::Red)).count();
    let blue_wins = games.iter().filter(|g| g.winner == Some(Side::Blue)).count();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    MatchResults {
        red_name,
        blue_name,
        games,
        red_wins,
        blue_wins,
        draws,
        red_search_time,
        blue_search_time,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn player_config(kind: PlayerKind, ply: u32) -> PlayerConfig {
    match kind {
        PlayerKind::Minimax => PlayerConfig::Minimax { ply },
        PlayerKind::Random => PlayerConfig::Random,
    }
}

/// Distinct per-game, per-side seeds derived from the match seed
fn game_seeds(seed: Option<u64>, game_num: usize) -> (Option<u64>, Option<u64>) {
    let base = seed.map(|s| s.wrapping_add(2 * game_num as u64));
    (base, base.map(|s| s.wrapping_add(1)))
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        red_score: i32,
        blue_score: i32,
        winner: Option<Side>,
        moves: usize,
        passes: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        red: String,
        blue: String,
        total_games: usize,
        red_wins: usize,
        blue_wins: usize,
        draws: usize,
        red_search_time_ns: u128,
        blue_search_time_ns: u128,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        red: results.red_name.clone(),
        blue: results.blue_name.clone(),
        total_games: results.games.len(),
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        draws: results.draws,
        red_search_time_ns: results.red_search_time.as_nanos(),
        blue_search_time_ns: results.blue_search_time.as_nanos(),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                red_score: g.red_score,
                blue_score: g.blue_score,
                winner: g.winner,
                moves: g.moves,
                passes: g.passes,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, show_board: bool) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Red:  {}", results.red_name);
    println!("Blue: {}", results.blue_name);
    println!("Total games: {}", total);
    println!("Red wins:    {} ({:.1}%)", results.red_wins, percent(results.red_wins, total));
    println!("Blue wins:   {} ({:.1}%)", results.blue_wins, percent(results.blue_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!(
        "Search time: red {}, blue {}",
        format_duration(results.red_search_time),
        format_duration(results.blue_search_time)
    );

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: red {} - {} blue in {} moves{}",
            game.game_number,
            game.red_score,
            game.blue_score,
            game.moves,
            if game.passes > 0 {
                format!(" ({} passes)", game.passes)
            } else {
                String::new()
            }
        );
        if show_board {
            println!("{}", game.final_board);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
