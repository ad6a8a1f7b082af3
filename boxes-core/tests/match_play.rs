//! Integration tests for full games driven by a match config

use std::sync::Arc;

use boxes_core::{play_game, MatchConfig, PlayerConfig, SearchClock, Side};

fn run(config: &MatchConfig, clock: &Arc<SearchClock>) -> boxes_core::GameRecord {
    let mut board = config.new_board().unwrap();
    let mut red = config.red.build(Side::Red, clock, config.seed);
    let mut blue = config.blue.build(Side::Blue, clock, config.seed.map(|s| s + 1));
    play_game(&mut board, red.as_mut(), blue.as_mut()).unwrap()
}

#[test]
fn test_minimax_games_are_deterministic() {
    let config = MatchConfig::default()
        .with_board(2, 2)
        .with_players(PlayerConfig::Minimax { ply: 3 }, PlayerConfig::Minimax { ply: 2 });

    let clock = Arc::new(SearchClock::new());
    let first = run(&config, &clock);
    let second = run(&config, &clock);

    assert_eq!(first.moves, second.moves);
    assert_eq!(first.red_score + first.blue_score, 4);
    assert!(first.completed);
}

#[test]
fn test_search_time_accumulates_across_games() {
    let config = MatchConfig::default()
        .with_board(2, 2)
        .with_players(PlayerConfig::Minimax { ply: 2 }, PlayerConfig::Random)
        .with_seed(21);

    let clock = Arc::new(SearchClock::new());
    run(&config, &clock);
    let after_one = clock.total_nanos();
    run(&config, &clock);

    assert!(after_one > 0);
    assert!(clock.total_nanos() >= after_one);
}

#[test]
fn test_seeded_random_games_repeat() {
    let config = MatchConfig::default()
        .with_board(3, 3)
        .with_players(PlayerConfig::Random, PlayerConfig::Random)
        .with_seed(8);

    let clock = Arc::new(SearchClock::new());
    let a = run(&config, &clock);
    let b = run(&config, &clock);

    assert_eq!(a.moves, b.moves);
    assert_eq!(a.winner(), b.winner());
    assert_eq!(clock.total_nanos(), 0);
}

#[test]
fn test_deeper_search_beats_random_on_small_board() {
    // Ply 7 searches a 2x1 board to the end, and the first player cannot lose it
    let config = MatchConfig::default()
        .with_board(2, 1)
        .with_players(PlayerConfig::Minimax { ply: 7 }, PlayerConfig::Random);

    let clock = Arc::new(SearchClock::new());
    for seed in 0..5 {
        let record = run(&config.clone().with_seed(seed), &clock);
        assert!(record.red_score >= record.blue_score, "seed {seed}: {record:?}");
    }
}
