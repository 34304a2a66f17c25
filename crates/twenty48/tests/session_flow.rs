//! Integration tests for a game session driven through its public surface:
//! commands in, events and saved state out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use twenty48::{
    Command, EventBus, EventReceiver, GameConfig, GameEvent, GameSession, JsonFileStore,
    MemoryStore, MoveOutcome, Overlay, PersistedState, Phase, RestoreOutcome, StateStore,
};
use twenty48_core::{Direction, Grid, Position};
use twenty48_ui::ManualClock;

fn seeded(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    }
}

fn session_with<S: StateStore>(store: S, seed: u64) -> (GameSession<S>, EventReceiver) {
    let (sender, receiver) = EventBus::create_pair(1024);
    let session =
        GameSession::with_clock(&seeded(seed), store, sender, Arc::new(ManualClock::new()))
            .unwrap();
    (session, receiver)
}

fn temp_state(name: &str) -> PathBuf {
    let id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_session_{name}_{id}.json"))
}

#[test]
fn test_new_game_has_two_twos_at_distinct_cells() {
    for seed in 0..32 {
        let (mut game, _events) = session_with(MemoryStore::new(), seed);
        game.new_game();

        let tiles: Vec<Position> = game
            .grid()
            .positions()
            .filter(|&pos| game.grid().get(pos) != 0)
            .collect();
        assert_eq!(tiles.len(), 2, "seed {seed}");
        assert!(tiles.iter().all(|&pos| game.grid().get(pos) == 2));
        assert_ne!(tiles[0], tiles[1]);
        assert!(tiles.contains(&game.last_spawned().unwrap()));
    }
}

#[test]
fn test_played_game_ends_in_an_absorbing_state() {
    let (mut game, events) = session_with(MemoryStore::new(), 99);
    game.new_game();

    let mut best = 0;
    let mut turns = 0;
    let mut overlays = Vec::new();
    while !game.phase().is_over() && turns < 200_000 {
        let direction = Direction::ALL[turns % 4];
        let before = game.grid().sum();
        match game.handle_move(direction) {
            MoveOutcome::Moved { spawned, .. } => {
                let added = spawned.map_or(0, |pos| u64::from(game.grid().get(pos)));
                assert_eq!(game.grid().sum(), before + added);
            }
            MoveOutcome::Unchanged => assert_eq!(game.grid().sum(), before),
            MoveOutcome::Ignored => panic!("move ignored while playing"),
        }
        assert!(game.high_score() >= best);
        best = game.high_score();
        turns += 1;
        for event in events.drain() {
            if let GameEvent::OverlayShown(overlay) = event {
                overlays.push(overlay);
            }
        }
    }

    assert!(game.phase().is_over());
    assert_eq!(overlays, vec![game.phase().overlay().unwrap()]);

    let board = *game.grid();
    let score = game.score();
    for direction in Direction::ALL {
        assert_eq!(game.handle_move(direction), MoveOutcome::Ignored);
    }
    assert_eq!(*game.grid(), board);
    assert_eq!(game.score(), score);
    assert!(!events.has_events());
}

#[test]
fn test_each_move_is_saved() {
    let store = MemoryStore::new();
    let (mut game, _events) = session_with(store.clone(), 5);
    game.new_game();
    for direction in Direction::ALL {
        game.dispatch(Command::Move(direction));
        assert_eq!(store.snapshot(), Some(game.snapshot()));
    }
    assert_eq!(store.save_count(), 5);
}

#[test]
fn test_failed_save_keeps_the_move() {
    let store = MemoryStore::new();
    let (mut game, _events) = session_with(store.clone(), 8);
    game.new_game();
    let saved = store.snapshot();
    store.set_failing(true);

    let mut moved = false;
    for direction in Direction::ALL {
        if let MoveOutcome::Moved { .. } = game.handle_move(direction) {
            moved = true;
            break;
        }
    }

    assert!(moved);
    assert!((2..=3).contains(&game.grid().tile_count()));
    assert_ne!(Some(game.snapshot()), saved);
    assert_eq!(store.snapshot(), saved);
}

#[test]
fn test_resume_from_file() {
    let path = temp_state("resume");
    let grid = Grid::from_cells([[2, 4, 0, 0], [0, 8, 0, 0], [0; 4], [0, 0, 0, 2]]);
    let state = PersistedState::capture(&grid, 36, 900, Some(Position::new(3, 3)));
    JsonFileStore::new(&path).save(&state).unwrap();

    let (mut game, events) = session_with(JsonFileStore::new(&path), 1);
    assert_eq!(game.restore(), RestoreOutcome::Resumed);

    assert_eq!(*game.grid(), grid);
    assert_eq!(game.score(), 36);
    assert_eq!(game.high_score(), 900);
    assert_eq!(game.last_spawned(), Some(Position::new(3, 3)));
    assert_eq!(game.phase(), Phase::Playing);
    assert!(matches!(events.try_recv(), Some(GameEvent::Redraw { score: 36, .. })));

    game.shutdown().unwrap();
    assert_eq!(JsonFileStore::new(&path).load().unwrap(), Some(game.snapshot()));

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_missing_file_starts_a_new_game() {
    let (mut game, _events) = session_with(JsonFileStore::new(temp_state("missing")), 2);
    assert_eq!(game.restore(), RestoreOutcome::Started);
    assert_eq!(game.grid().tile_count(), 2);
    assert_eq!(game.high_score(), 0);

    let _ = std::fs::remove_file(game.store().path());
}

#[test]
fn test_malformed_file_recovers_with_a_new_game() {
    let path = temp_state("malformed");
    std::fs::write(&path, "{\"board\": [[2, 2]").unwrap();

    let (mut game, _events) = session_with(JsonFileStore::new(&path), 3);
    assert_eq!(game.restore(), RestoreOutcome::Recovered);
    assert_eq!(game.grid().tile_count(), 2);
    // The new game overwrote the broken file.
    assert!(JsonFileStore::new(&path).load().unwrap().is_some());

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_bad_saved_board_keeps_high_score() {
    let store = MemoryStore::with_state(PersistedState {
        high_score: 4000,
        score: 120,
        last_spawned_tile: None,
        board: vec![vec![2, 3, 0, 0]; 4],
    });
    let (mut game, _events) = session_with(store, 4);

    assert_eq!(game.restore(), RestoreOutcome::Recovered);
    assert_eq!(game.high_score(), 4000);
    assert_eq!(game.score(), 0);
    assert_eq!(game.grid().tile_count(), 2);
}

#[test]
fn test_oversized_saved_tiles_start_over() {
    let huge = 1 << 31;
    let store = MemoryStore::with_state(PersistedState {
        high_score: 500,
        score: 40,
        last_spawned_tile: None,
        board: vec![vec![huge, huge, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]],
    });
    let (mut game, _events) = session_with(store, 9);

    assert_eq!(game.restore(), RestoreOutcome::Recovered);
    assert_eq!(game.high_score(), 500);
    assert_eq!(game.grid().tile_count(), 2);
    assert!(matches!(
        game.handle_move(Direction::Left),
        MoveOutcome::Moved { .. } | MoveOutcome::Unchanged
    ));
}

#[test]
fn test_empty_saved_board_starts_fresh() {
    let store = MemoryStore::with_state(PersistedState {
        high_score: 64,
        score: 0,
        last_spawned_tile: None,
        board: vec![vec![0; 4]; 4],
    });
    let (mut game, _events) = session_with(store, 6);

    assert_eq!(game.restore(), RestoreOutcome::Started);
    assert_eq!(game.high_score(), 64);
    assert_eq!(game.grid().tile_count(), 2);
}

#[test]
fn test_saved_terminal_board_comes_back_latched() {
    let lost = Grid::from_cells(twenty48::session::FORCED_LOSS_BOARD);
    let store = MemoryStore::with_state(PersistedState::capture(&lost, 10, 10, None));
    let (mut game, events) = session_with(store, 7);

    assert_eq!(game.restore(), RestoreOutcome::Resumed);
    assert_eq!(game.phase(), Phase::Lost);
    assert!(events.drain().contains(&GameEvent::OverlayShown(Overlay::LOST)));
    assert_eq!(game.handle_move(Direction::Up), MoveOutcome::Ignored);

    game.dispatch(Command::NewGame);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.high_score(), 10);
}

#[test]
fn test_high_score_never_drops_across_new_games() {
    let (mut game, _events) = session_with(MemoryStore::new(), 12);
    game.new_game();
    for turn in 0..200 {
        game.handle_move(Direction::ALL[turn % 4]);
        if game.phase().is_over() {
            break;
        }
    }
    let best = game.high_score();
    assert!(best >= game.score());

    game.new_game();
    assert_eq!(game.score(), 0);
    assert_eq!(game.high_score(), best);
}
