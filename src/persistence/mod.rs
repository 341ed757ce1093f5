//! Save/load persistence with validation
//!
//! Features:
//! - Versioned JSON envelope around the full `GameState`
//! - Atomic replace (write tmp, then rename over the save)
//! - Invariant validation on load (corrupt saves are rejected, not played)
//! - Custom map text loading (`map`)

pub mod map;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameState;

pub use map::{load_map, load_map_file, parse_map};

/// Snapshot format version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Errors from snapshot and map I/O
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<S> {
    version: u32,
    state: S,
}

/// Serialize a state to JSON
pub fn to_json(state: &GameState) -> Result<String, PersistenceError> {
    let snapshot = Snapshot {
        version: CURRENT_VERSION,
        state,
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Restore a state from JSON, rejecting unknown versions and broken layouts
pub fn from_json(json: &str) -> Result<GameState, PersistenceError> {
    #[derive(Deserialize)]
    struct Header {
        version: u32,
    }

    let header: Header = serde_json::from_str(json)?;
    if header.version != CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: header.version,
            expected: CURRENT_VERSION,
        });
    }

    let snapshot: Snapshot<GameState> = serde_json::from_str(json)?;
    snapshot
        .state
        .check_invariants()
        .map_err(PersistenceError::InvalidState)?;
    Ok(snapshot.state)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a snapshot, replacing any previous one atomically
pub fn save_to_path(state: &GameState, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let json = to_json(state)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::info!(
        "Saved level {} (score {}) to {}",
        state.level,
        state.score,
        path.display()
    );
    Ok(())
}

/// Read a snapshot back
pub fn load_from_path(path: impl AsRef<Path>) -> Result<GameState, PersistenceError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    match from_json(&json) {
        Ok(state) => {
            log::info!("Loaded level {} from {}", state.level, path.display());
            Ok(state)
        }
        Err(err) => {
            log::warn!("Rejected snapshot {}: {}", path.display(), err);
            Err(err)
        }
    }
}

/// Whether a "continue" is available
pub fn snapshot_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_BOMB_RANGE, SIM_DT};
    use crate::sim::{Direction, Explosion, HiddenItem, TickInput, tick};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn played_state() -> GameState {
        let mut state = GameState::new_game(2024, Tuning::default());
        let script = [
            TickInput {
                move_dir: None,
                plant_bomb: true,
            },
            TickInput {
                move_dir: Some(Direction::South),
                plant_bomb: false,
            },
        ];
        for input in &script {
            tick(&mut state, input, SIM_DT);
        }
        for _ in 0..37 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        state
    }

    #[test]
    fn test_json_round_trip_is_identical() {
        let state = played_state();
        let json = to_json(&state).unwrap();
        let restored = from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_restored_game_continues_identically() {
        let mut original = played_state();
        let mut restored = from_json(&to_json(&original).unwrap()).unwrap();
        for _ in 0..500 {
            tick(&mut original, &TickInput::default(), SIM_DT);
            tick(&mut restored, &TickInput::default(), SIM_DT);
        }
        assert_eq!(restored, original);
    }

    #[test]
    fn test_rejects_other_versions() {
        let state = played_state();
        let json = to_json(&state).unwrap().replacen("\"version\":1", "\"version\":7", 1);
        match from_json(&json) {
            Err(PersistenceError::UnsupportedVersion { found: 7, expected: 1 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            from_json("not json"),
            Err(PersistenceError::Serde(_))
        ));
    }

    #[test]
    fn test_rejects_broken_invariants() {
        let mut state = played_state();
        state.hidden.set(IVec2::new(1, 1), Some(HiddenItem::Exit));
        let json = to_json(&state).unwrap();
        assert!(matches!(
            from_json(&json),
            Err(PersistenceError::InvalidState(_))
        ));
    }

    fn assert_rejected(state: &GameState) {
        let json = to_json(state).unwrap();
        assert!(matches!(
            from_json(&json),
            Err(PersistenceError::InvalidState(_))
        ));
    }

    #[test]
    fn test_rejects_explosion_timer_outside_lifetime() {
        let mut state = played_state();
        state.explosions.push(Explosion {
            cell: IVec2::new(3, 3),
            timer: i32::MIN,
        });
        assert_rejected(&state);

        state.explosions.last_mut().unwrap().timer = state.tuning.explosion_ticks + 1;
        assert_rejected(&state);
    }

    #[test]
    fn test_rejects_bomb_timer_outside_fuse() {
        let mut state = played_state();
        assert_eq!(state.bombs.len(), 1);
        state.bombs[0].timer = -1;
        assert_rejected(&state);

        state.bombs[0].timer = state.tuning.bomb_fuse_ticks + 1;
        assert_rejected(&state);
    }

    #[test]
    fn test_accepts_chained_bomb_waiting_at_zero() {
        let mut state = played_state();
        state.bombs[0].timer = 0;
        let restored = from_json(&to_json(&state).unwrap()).unwrap();
        assert_eq!(restored.bombs[0].timer, 0);
    }

    #[test]
    fn test_rejects_bomb_range_over_cap() {
        let mut state = played_state();
        state.bombs[0].range = MAX_BOMB_RANGE + 1;
        assert_rejected(&state);

        let mut state = played_state();
        state.player.bomb_range = 99;
        assert_rejected(&state);
    }

    #[test]
    fn test_rejects_unvalidated_tuning() {
        let mut state = played_state();
        state.tuning.enemy_move_interval = 0;
        assert_rejected(&state);

        let mut state = played_state();
        state.tuning.start_max_bombs = 99;
        assert_rejected(&state);

        let mut state = played_state();
        state.tuning.enemies_per_level = u32::MAX;
        assert_rejected(&state);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("mini-bomber-does-not-exist.json");
        assert!(!snapshot_exists(&path));
        assert!(matches!(
            load_from_path(&path),
            Err(PersistenceError::Io(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("mini-bomber-{}.json", std::process::id()));
        let state = played_state();
        save_to_path(&state, &path).unwrap();
        assert!(snapshot_exists(&path));
        assert!(!tmp_path(&path).exists());
        let restored = load_from_path(&path).unwrap();
        assert_eq!(restored, state);
        let _ = fs::remove_file(&path);
    }
}
