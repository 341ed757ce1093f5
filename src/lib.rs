//! Mini Bomber - a tile-grid bomb maze arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, bombs, enemies, game state)
//! - `persistence`: Snapshot save/load and custom map loading
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Grid is a fixed square of this many cells per side
    pub const GRID_SIZE: usize = 15;
    /// Player spawn cell for every level
    pub const PLAYER_SPAWN: (i32, i32) = (1, 1);

    /// Hard cap on simultaneous bombs (bomb power-ups stop here)
    pub const MAX_BOMBS: u32 = 5;
    /// Hard cap on enemies per level
    pub const MAX_ENEMIES: usize = 10;
    /// Longest useful blast range on this grid
    pub const MAX_BOMB_RANGE: u32 = GRID_SIZE as u32 - 2;
}

/// True if the cell lies inside the grid
#[inline]
pub fn in_bounds(cell: IVec2) -> bool {
    let n = consts::GRID_SIZE as i32;
    cell.x >= 0 && cell.x < n && cell.y >= 0 && cell.y < n
}

/// True if the cell is part of the fixed wall pattern (border or even/even pillar)
#[inline]
pub fn is_fixed_wall(cell: IVec2) -> bool {
    let last = consts::GRID_SIZE as i32 - 1;
    cell.x == 0
        || cell.y == 0
        || cell.x == last
        || cell.y == last
        || (cell.x % 2 == 0 && cell.y % 2 == 0)
}

/// The player spawn cell as a vector
#[inline]
pub fn player_spawn() -> IVec2 {
    IVec2::new(consts::PLAYER_SPAWN.0, consts::PLAYER_SPAWN.1)
}
