//! Custom map text format
//!
//! A map is `GRID_SIZE` rows of `GRID_SIZE` characters: `' '` empty, `'W'`
//! indestructible, `'B'` destructible, anything else empty. Each row is
//! followed by one line terminator. Short rows and short files read as empty
//! cells. Maps carry no hidden items; the player starts at the usual spawn
//! and three enemies are placed on row 5.

use std::path::Path;

use glam::IVec2;

use super::PersistenceError;
use crate::consts::GRID_SIZE;
use crate::player_spawn;
use crate::sim::{GameState, Grid, HiddenLayer, TileKind};
use crate::tuning::Tuning;

/// Fixed enemy spawns for custom maps
pub const MAP_ENEMY_CELLS: [IVec2; 3] = [IVec2::new(5, 5), IVec2::new(7, 5), IVec2::new(9, 5)];

fn tile_for(c: char) -> TileKind {
    match c {
        'W' => TileKind::Indestructible,
        'B' => TileKind::Destructible,
        _ => TileKind::Empty,
    }
}

/// Parse map text into a grid
pub fn parse_map(text: &str) -> Grid {
    let mut grid = Grid::default();
    for (y, line) in text.lines().take(GRID_SIZE).enumerate() {
        for (x, c) in line.chars().take(GRID_SIZE).enumerate() {
            grid.set(IVec2::new(x as i32, y as i32), tile_for(c));
        }
    }
    grid
}

/// Start a level-1 game on a custom map
pub fn load_map(text: &str, tuning: Tuning, seed: u64) -> GameState {
    let grid = parse_map(text);
    log::info!(
        "Custom map: {} walls, {} destructible",
        grid.count(TileKind::Indestructible),
        grid.count(TileKind::Destructible)
    );
    GameState::from_layout(
        grid,
        HiddenLayer::default(),
        player_spawn(),
        &MAP_ENEMY_CELLS,
        tuning,
        seed,
    )
}

/// Read a map file and start a game on it
pub fn load_map_file(
    path: impl AsRef<Path>,
    tuning: Tuning,
    seed: u64,
) -> Result<GameState, PersistenceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    log::info!("Loading map {}", path.display());
    Ok(load_map(&text, tuning, seed))
}
