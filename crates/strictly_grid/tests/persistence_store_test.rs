//! Save and load through the store, against a temporary directory.

use strictly_grid::{
    Board, GameSession, GameStore, GameVariant, PersistenceError, Pos, SessionOptions, Side,
    SnapshotRecord, StoredGameRecord, read_record, write_record,
};
use tempfile::TempDir;

fn session_after(moves: &[(usize, usize)]) -> GameSession {
    let mut session =
        GameSession::new(GameVariant::Gomoku, 15, SessionOptions::default()).expect("Start failed");
    for &(row, col) in moves {
        session.attempt_move(Pos::new(row, col)).expect("Move rejected");
        session.begin_next_turn();
    }
    session
}

#[test]
fn test_second_save_to_same_name_collides() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut store = GameStore::new(dir.path());
    let record = session_after(&[(7, 7)]).history_record();

    let path = store.save("first.json", &record).expect("Save failed");
    assert!(path.exists());
    assert_eq!(
        store.save("first.json", &record),
        Err(PersistenceError::CollisionOnSave(path.clone()))
    );
    // The original file is untouched.
    assert_eq!(read_record(&path), Ok(record));
}

#[test]
fn test_load_only_accepts_known_states() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let record = session_after(&[(7, 7)]).snapshot_record();
    write_record(&dir.path().join("outside.json"), &record).expect("Write failed");

    let store = GameStore::new(dir.path());
    assert_eq!(
        store.load("outside.json"),
        Err(PersistenceError::UnknownState(dir.path().join("outside.json")))
    );
    assert!(!store.is_known("outside.json"));
}

#[test]
fn test_missing_file_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nothing.json");
    assert_eq!(read_record(&path), Err(PersistenceError::NotFound(path.clone())));
}

#[test]
fn test_history_round_trip_and_resume() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut store = GameStore::new(dir.path().join("nested"));
    let saved = session_after(&[(7, 7), (8, 8), (7, 8)]);
    store
        .save("game.json", &saved.history_record())
        .expect("Save failed");

    let record = store.load("game.json").expect("Load failed");
    assert_eq!(record.turn_owner(), Side::White);
    assert_eq!(record.boards().len(), 4);

    let mut resumed = session_after(&[(0, 0)]);
    resumed.resume(record).expect("Resume failed");
    assert_eq!(resumed.board(), saved.board());
    assert_eq!(resumed.history().len(), 4);
    resumed.undo().expect("Undo failed");
    assert_eq!(resumed.history().len(), 2);
}

#[test]
fn test_resume_rejects_other_sides_turn() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut store = GameStore::new(dir.path());
    let mut mid_turn = session_after(&[]);
    mid_turn.attempt_move(Pos::new(3, 3)).expect("Move rejected");
    store
        .save("snap.json", &mid_turn.snapshot_record())
        .expect("Save failed");

    let record = store.load("snap.json").expect("Load failed");
    assert_eq!(record.turn_owner(), Side::White);
    let mut fresh = session_after(&[]);
    assert!(fresh.resume(record).is_err());
}

#[test]
fn test_replay_yields_every_snapshot_in_order() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut store = GameStore::new(dir.path());
    let saved = session_after(&[(1, 1), (2, 2), (3, 3)]);
    store
        .save("replay.json", &saved.history_record())
        .expect("Save failed");

    let boards = store.replay("replay.json").expect("Replay failed");
    assert_eq!(boards.as_slice(), saved.history().snapshots());
    let stones: Vec<usize> = boards
        .iter()
        .map(|board| board.count(Side::Black) + board.count(Side::White))
        .collect();
    assert_eq!(stones, vec![0, 1, 2, 3]);
}

#[test]
fn test_size_mismatch_rejected() {
    let record = StoredGameRecord::Snapshot(SnapshotRecord::new(
        Side::Black,
        Board::new(9).expect("Board failed"),
    ));
    let mut session = session_after(&[]);
    assert!(session.resume(record).is_err());
}
