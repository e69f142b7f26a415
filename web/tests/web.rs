#![cfg(target_arch = "wasm32")]

use brainblast_core::*;
use brainblast_web::*;
use chrono::DateTime;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn clean_store() -> LocalStore {
    let mut store = LocalStore;
    for key in [PROFILE_KEY, HISTORY_KEY, STATS_KEY, JOINED_KEY] {
        store.remove(key);
    }
    store
}

#[wasm_bindgen_test]
fn local_store_round_trips_records() {
    let mut repo = Repository::new(clean_store());
    let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

    repo.register("ada", "ada@example.com", now);
    repo.record_outcome(SessionOutcome::mini_game("Minesweeper", true, 20, now));

    let repo = Repository::new(LocalStore);
    assert_eq!(repo.history().len(), 1);
    assert_eq!(repo.stats().best_streak, 1);
    assert_eq!(repo.profile().unwrap().username, "ada");
}

#[wasm_bindgen_test]
fn account_signs_out_without_losing_stats() {
    clean_store();
    let mut account = Account::new();
    account.register("bob", "");
    account.sign_out();

    assert_eq!(account.profile(), "null");
    assert!(account.stats().contains("\"totalSessions\":0"));
}

#[wasm_bindgen_test]
fn minesweeper_snapshot_is_json() {
    let mut game = MinesweeperGame::new();

    assert!(game.reveal(4, 4));

    let snapshot: serde_json::Value = serde_json::from_str(&game.snapshot()).unwrap();
    assert_eq!(snapshot["rows"].as_array().unwrap().len(), 9);
    assert_eq!(snapshot["rows"][4][4]["isRevealed"], true);
}

#[wasm_bindgen_test]
fn unscramble_reports_every_letter_move() {
    let Ok(mut game) = UnscrambleGame::new() else {
        panic!("built-in words should load");
    };
    assert!(game.start().is_ok());

    assert!(game.place_letter(0));
    assert!(!game.place_letter(0));
    assert!(game.remove_letter(0));
    assert!(game.place_letter(0));
}
