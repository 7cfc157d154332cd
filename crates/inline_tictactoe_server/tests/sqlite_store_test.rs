//! Integration tests for the SQLite key-value store.

use std::sync::Arc;

use inline_tictactoe::{GameId, Player, UserId};
use inline_tictactoe_server::{GameRegistry, KeyValueStore, MoveResolver, SqliteStore};
use tempfile::NamedTempFile;

fn setup_test_store() -> (SqliteStore, NamedTempFile) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(&db_path).expect("Failed to open store");
    (store, temp_file)
}

#[test]
fn test_get_missing_key() {
    let (store, _temp) = setup_test_store();
    assert_eq!(store.get("game1").expect("get"), None);
}

#[test]
fn test_set_then_get() {
    let (store, _temp) = setup_test_store();
    store.set("game1", "{\"turn\":true}").expect("set");
    assert_eq!(
        store.get("game1").expect("get").as_deref(),
        Some("{\"turn\":true}")
    );
}

#[test]
fn test_set_overwrites() {
    let (store, _temp) = setup_test_store();
    store.set("game1", "first").expect("set");
    store.set("game1", "second").expect("set");
    assert_eq!(store.get("game1").expect("get").as_deref(), Some("second"));
}

#[test]
fn test_increment_starts_at_one() {
    let (store, _temp) = setup_test_store();
    assert_eq!(store.increment("games_increment").expect("increment"), 1);
    assert_eq!(store.increment("games_increment").expect("increment"), 2);
    assert_eq!(store.increment("games_increment").expect("increment"), 3);
    assert_eq!(
        store.get("games_increment").expect("get").as_deref(),
        Some("4")
    );
}

#[test]
fn test_increment_rejects_non_counter() {
    let (store, _temp) = setup_test_store();
    store.set("games_increment", "many").expect("set");
    assert!(store.increment("games_increment").is_err());
}

#[test]
fn test_data_survives_reopen() {
    let (store, temp) = setup_test_store();
    store.set("game7", "kept").expect("set");
    store.increment("games_increment").expect("increment");
    drop(store);

    let path = temp.path().to_str().expect("Invalid path");
    let reopened = SqliteStore::open(path).expect("Failed to reopen store");
    assert_eq!(reopened.get("game7").expect("get").as_deref(), Some("kept"));
    assert_eq!(reopened.increment("games_increment").expect("increment"), 2);
}

#[test]
fn test_exhausted_counter_is_error() {
    let (store, _temp) = setup_test_store();
    let max = u64::MAX.to_string();
    store.set("games_increment", &max).expect("set");
    assert!(store.increment("games_increment").is_err());
    assert_eq!(
        store.get("games_increment").expect("get").as_deref(),
        Some(max.as_str())
    );
}

#[test]
fn test_concurrent_increments_wait_for_the_lock() {
    let (store, _temp) = setup_test_store();

    let mut ids: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| store.increment("games_increment")))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("thread")
                    .expect("increment under contention")
            })
            .collect()
    });

    ids.sort_unstable();
    assert_eq!(ids, (1..=16).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_games_share_one_database() {
    let (store, _temp) = setup_test_store();
    let resolver = MoveResolver::new(GameRegistry::new(Arc::new(store)), true);

    let mut ids: Vec<GameId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16i64)
            .map(|n| {
                let resolver = &resolver;
                scope.spawn(move || {
                    let user = Player::new(UserId(n), format!("user{}", n));
                    *resolver
                        .start_new_game(&user, true)
                        .expect("start under contention")
                        .game_id()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
    for id in ids {
        assert!(resolver.registry().load(id).expect("load").is_some());
    }
}
