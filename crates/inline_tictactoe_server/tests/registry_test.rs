//! Integration tests for the game registry and stored record formats.

use std::sync::Arc;

use inline_tictactoe::{Cell, GameId, Mark, Player, PlayerSlot, UserId};
use inline_tictactoe_server::{
    COUNTER_KEY, GameRegistry, KeyValueStore, MemoryStore, SqliteStore, game_key,
};
use tempfile::NamedTempFile;

fn memory_registry() -> (GameRegistry, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (GameRegistry::new(store.clone()), store)
}

#[test]
fn test_identifiers_increase_from_one() {
    let (registry, store) = memory_registry();
    assert_eq!(registry.next_id().expect("id"), GameId(1));
    assert_eq!(registry.next_id().expect("id"), GameId(2));
    assert_eq!(store.get(COUNTER_KEY).expect("get").as_deref(), Some("3"));
}

#[test]
fn test_create_persists_immediately() {
    let (registry, store) = memory_registry();
    let game = registry.create(false).expect("create");

    assert_eq!(game.id(), GameId(1));
    assert!(store.get(&game_key(game.id())).expect("get").is_some());

    let loaded = registry.load(game.id()).expect("load").expect("stored");
    assert_eq!(loaded, game);
    assert!(!loaded.first_player_is_mark1());
}

#[test]
fn test_load_unknown_is_none() {
    let (registry, _store) = memory_registry();
    assert_eq!(registry.load(GameId(42)).expect("load"), None);
}

#[test]
fn test_save_overwrites() {
    let (registry, _store) = memory_registry();
    let mut game = registry.create(true).expect("create");
    game.bind_player1(Player::new(UserId(1), "Alice"));
    game.apply_move(&Player::new(UserId(2), "Bob"), Some(4))
        .expect("Bob joins");
    game.apply_move(&Player::new(UserId(1), "Alice"), Some(4))
        .expect("Alice moves");
    registry.save(&game).expect("save");

    let loaded = registry.load(game.id()).expect("load").expect("stored");
    assert_eq!(loaded.grid().get(4), Some(Cell::Marked(Mark::Cross)));
    assert_eq!(loaded.current_slot(), PlayerSlot::Two);
    assert_eq!(loaded.player2().map(|p| p.name().as_str()), Some("Bob"));
}

#[test]
fn test_legacy_raw_grid_record() {
    let (registry, store) = memory_registry();
    store
        .set(
            "game3",
            r#"{"player1":{"id":10,"name":"Ann"},"player2":{"id":null,"name":"?"},
                "grid":[1,0,0,0,2,0,0,0,0],"turn":false,"locked":true,
                "is_player1_first":false}"#,
        )
        .expect("set");

    let game = registry.load(GameId(3)).expect("load").expect("stored");
    assert_eq!(game.player1().map(|p| *p.id()), Some(UserId(10)));
    assert!(game.player2().is_none());
    assert_eq!(game.grid().get(0), Some(Cell::Marked(Mark::Cross)));
    assert_eq!(game.grid().get(4), Some(Cell::Marked(Mark::Nought)));
    assert!(!game.first_player_is_mark1());
}

#[test]
fn test_legacy_items_object_record() {
    let (registry, store) = memory_registry();
    store
        .set(
            "game4",
            r#"{"player1":{"id":1,"name":"A"},"player2":{"id":2,"name":"B"},
                "grid":{"items":[0,0,1,0,0,0,0,0,0]},"turn":true}"#,
        )
        .expect("set");

    let game = registry.load(GameId(4)).expect("load").expect("stored");
    assert_eq!(game.grid().get(2), Some(Cell::Marked(Mark::Cross)));
    assert_eq!(game.current_slot(), PlayerSlot::Two);
    assert!(game.first_player_is_mark1());
}

#[test]
fn test_missing_or_short_grid_is_empty() {
    let (registry, store) = memory_registry();
    store
        .set("game5", r#"{"player1":{"id":1,"name":"A"}}"#)
        .expect("set");
    store
        .set("game6", r#"{"grid":[1,2,1]}"#)
        .expect("set");

    let game = registry.load(GameId(5)).expect("load").expect("stored");
    assert_eq!(game.grid().empty_count(), 9);
    let game = registry.load(GameId(6)).expect("load").expect("stored");
    assert_eq!(game.grid().empty_count(), 9);
}

#[test]
fn test_unreadable_grid_loads_as_empty() {
    let (registry, store) = memory_registry();
    store
        .set(
            "game1",
            r#"{"player1":{"id":1,"name":"A"},"player2":{"id":2,"name":"B"},
                "grid":[1,0,0,0,"x",0,0,0,0],"turn":true}"#,
        )
        .expect("set");
    store
        .set("game2", r#"{"player1":{"id":1,"name":"A"},"grid":null}"#)
        .expect("set");

    let game = registry.load(GameId(1)).expect("load").expect("stored");
    assert_eq!(game.grid().empty_count(), 9);
    assert_eq!(game.player2().map(|p| *p.id()), Some(UserId(2)));
    assert_eq!(game.current_slot(), PlayerSlot::Two);

    let game = registry.load(GameId(2)).expect("load").expect("stored");
    assert_eq!(game.grid().empty_count(), 9);

    // The next save writes the canonical form.
    registry.save(&game).expect("save");
    let raw = store.get("game2").expect("get").expect("stored");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(value["grid"], serde_json::json!([0, 0, 0, 0, 0, 0, 0, 0, 0]));
}

#[test]
fn test_corrupt_record_is_error() {
    let (registry, store) = memory_registry();
    store.set("game8", "not json").expect("set");
    assert!(registry.load(GameId(8)).is_err());
}

#[test]
fn test_saved_grid_is_raw_codes() {
    let (registry, store) = memory_registry();
    let game = registry.create(true).expect("create");
    let raw = store.get(&game_key(game.id())).expect("get").expect("stored");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(value["grid"], serde_json::json!([0, 0, 0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(value["player1"]["id"], serde_json::Value::Null);
}

#[test]
fn test_games_survive_sqlite_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_str().expect("Invalid path").to_string();

    let registry = GameRegistry::new(Arc::new(SqliteStore::open(&db_path).expect("open")));
    let mut game = registry.create(true).expect("create");
    game.bind_player1(Player::new(UserId(1), "Alice"));
    registry.save(&game).expect("save");
    drop(registry);

    let registry = GameRegistry::new(Arc::new(SqliteStore::open(&db_path).expect("reopen")));
    let loaded = registry.load(game.id()).expect("load").expect("stored");
    assert_eq!(loaded, game);
    assert_eq!(registry.next_id().expect("id"), GameId(2));
}
