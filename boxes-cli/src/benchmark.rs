//! Benchmark command - time the alpha-beta search at increasing plies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_ply_benchmarks(), report_results()
//! - Level 3: benchmark_ply(), play_benchmark_game()
//! - Level 4: timing utilities, formatting

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use boxes_core::{play_game, DotsBoard, MinimaxAI, Move, Player, SearchClock, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of games per ply
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Deepest ply to test
    #[arg(long, default_value = "5")]
    pub depth: u32,

    /// Board width in boxes
    #[arg(long, default_value = "3")]
    pub width: usize,

    /// Board height in boxes
    #[arg(long, default_value = "3")]
    pub height: usize,

    /// Play the games of each ply in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Results of a single benchmark run
#[derive(Clone, Debug)]
struct BenchmarkResult {
    ply: u32,
    games: usize,
    wall_time: Duration,
    search_time: Duration,
    searches: u64,
    nodes: u64,
}

impl BenchmarkResult {
    fn avg_search(&self) -> Duration {
        if self.searches == 0 {
            Duration::ZERO
        } else {
            self.search_time / self.searches as u32
        }
    }

    fn nodes_per_second(&self) -> f64 {
        let secs = self.search_time.as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }
}

/// Minimax player that keeps search statistics
struct CountingAI {
    ai: MinimaxAI,
    searches: u64,
    nodes: u64,
}

impl Player for CountingAI {
    fn side(&self) -> Side {
        self.ai.side()
    }

    fn name(&self) -> String {
        Player::name(&self.ai)
    }

    fn play(&mut self, board: &DotsBoard) -> Option<Move> {
        let report = self.ai.search(board);
        self.searches += 1;
        self.nodes += report.nodes;
        report.outcome.best_move()
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting benchmarks: {} games per ply, plies 1..={}, {}x{} board",
        args.games,
        args.depth,
        args.width,
        args.height
    );
    if seed.is_some() {
        tracing::debug!("Minimax self-play is deterministic; seed is ignored");
    }

    // Fail fast on a bad board size
    DotsBoard::new(args.width, args.height)?;

    let results = run_ply_benchmarks(&args)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_ply_benchmarks(args: &BenchmarkArgs) -> Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    for ply in 1..=args.depth {
        tracing::info!("Benchmarking minimax at ply {}...", ply);
        results.push(benchmark_ply(args, ply)?);
    }

    Ok(results)
}

/// Report all benchmark results
fn report_results(results: &[BenchmarkResult], args: &BenchmarkArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Self-play `args.games` games at one ply, all searches on one clock
fn benchmark_ply(args: &BenchmarkArgs, ply: u32) -> Result<BenchmarkResult> {
    let clock = Arc::new(SearchClock::new());
    let progress = create_progress(args.games as u64, ply, args.json)?;

    let start = Instant::now();
    let per_game: Vec<(u64, u64)> = if args.parallel {
        (0..args.games)
            .into_par_iter()
            .map(|_| {
                let stats = play_benchmark_game(args.width, args.height, ply, &clock);
                progress.inc(1);
                stats
            })
            .collect::<Result<_>>()?
    } else {
        (0..args.games)
            .map(|_| {
                let stats = play_benchmark_game(args.width, args.height, ply, &clock);
                progress.inc(1);
                stats
            })
            .collect::<Result<_>>()?
    };
    let wall_time = start.elapsed();
    progress.finish_and_clear();

    Ok(BenchmarkResult {
        ply,
        games: args.games,
        wall_time,
        search_time: clock.total(),
        searches: per_game.iter().map(|&(s, _)| s).sum(),
        nodes: per_game.iter().map(|&(_, n)| n).sum(),
    })
}

/// Play one minimax self-play game; returns (searches, nodes)
fn play_benchmark_game(
    width: usize,
    height: usize,
    ply: u32,
    clock: &Arc<SearchClock>,
) -> Result<(u64, u64)> {
    let mut board = DotsBoard::new(width, height)?;
    let mut red = counting_ai(Side::Red, ply, clock);
    let mut blue = counting_ai(Side::Blue, ply, clock);

    play_game(&mut board, &mut red, &mut blue)?;

    Ok((red.searches + blue.searches, red.nodes + blue.nodes))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn counting_ai(side: Side, ply: u32, clock: &Arc<SearchClock>) -> CountingAI {
    CountingAI {
        ai: MinimaxAI::with_clock(side, ply, Arc::clone(clock)),
        searches: 0,
        nodes: 0,
    }
}

fn create_progress(games: u64, ply: u32, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(games);
    bar.set_style(ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} games")?);
    bar.set_message(format!("ply {}", ply));
    Ok(bar)
}

/// Format duration for display
pub(crate) fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {:.1}s", d.as_secs() / 60, (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

/// Print results as JSON
fn print_json_results(results: &[BenchmarkResult]) {
    #[derive(serde::Serialize)]
    struct JsonBenchmark {
        ply: u32,
        games: usize,
        wall_time_ms: u64,
        search_time_ns: u128,
        searches: u64,
        avg_search_us: f64,
        nodes: u64,
        nodes_per_second: f64,
    }

    let output: Vec<JsonBenchmark> = results
        .iter()
        .map(|r| JsonBenchmark {
            ply: r.ply,
            games: r.games,
            wall_time_ms: r.wall_time.as_millis() as u64,
            search_time_ns: r.search_time.as_nanos(),
            searches: r.searches,
            avg_search_us: r.avg_search().as_secs_f64() * 1_000_000.0,
            nodes: r.nodes,
            nodes_per_second: r.nodes_per_second(),
        })
        .collect();

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text table
fn print_text_results(results: &[BenchmarkResult]) {
    println!("\n=== Search Benchmark Results ===\n");

    println!(
        "{:<6} {:>6} {:>12} {:>12} {:>10} {:>12} {:>14}",
        "Ply", "Games", "Wall Time", "Search Time", "Searches", "Avg/Search", "Nodes/s"
    );
    println!("{}", "-".repeat(78));

    for r in results {
        println!(
            "{:<6} {:>6} {:>12} {:>12} {:>10} {:>12} {:>14.0}",
            r.ply,
            r.games,
            format_duration(r.wall_time),
            format_duration(r.search_time),
            r.searches,
            format_duration(r.avg_search()),
            r.nodes_per_second()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_args(parallel: bool) -> BenchmarkArgs {
        BenchmarkArgs {
            games: 3,
            depth: 2,
            width: 2,
            height: 2,
            parallel,
            json: true,
        }
    }

    #[test]
    fn test_format_duration() {
        assert!(format_duration(Duration::from_micros(500)).contains("us"));
        assert!(format_duration(Duration::from_millis(500)).contains("ms"));
        assert!(format_duration(Duration::from_secs(5)).contains("s"));
        assert!(format_duration(Duration::from_secs(90)).contains("m"));
    }

    #[test]
    fn test_benchmark_game_counts_searches() {
        let clock = Arc::new(SearchClock::new());
        let (searches, nodes) = play_benchmark_game(2, 2, 2, &clock).unwrap();

        // One search per placed line on a 2x2 board
        assert_eq!(searches, 12);
        assert!(nodes >= searches);
        assert!(clock.total_nanos() > 0);
    }

    #[test]
    fn test_parallel_matches_sequential_work() {
        let sequential = benchmark_ply(&small_args(false), 2).unwrap();
        let parallel = benchmark_ply(&small_args(true), 2).unwrap();

        assert_eq!(sequential.searches, parallel.searches);
        assert_eq!(sequential.nodes, parallel.nodes);
        assert!(parallel.search_time > Duration::ZERO);
    }

    #[test]
    fn test_avg_search_without_searches() {
        let result = BenchmarkResult {
            ply: 1,
            games: 0,
            wall_time: Duration::ZERO,
            search_time: Duration::ZERO,
            searches: 0,
            nodes: 0,
        };
        assert_eq!(result.avg_search(), Duration::ZERO);
        assert_eq!(result.nodes_per_second(), 0.0);
    }
}
