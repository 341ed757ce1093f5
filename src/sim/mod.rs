//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (owned by `GameState`)
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod bomb;
pub mod enemy;
pub mod grid;
pub mod level;
pub mod state;
pub mod tick;

pub use grid::{Direction, Grid, HiddenItem, HiddenLayer, TileKind};
pub use level::{LevelLayout, generate};
pub use state::{Bomb, DeathCause, Enemy, Explosion, GameEvent, GameState, Player};
pub use tick::{TickInput, TickOutcome, tick};

use glam::{IVec2, Vec2};

/// Ease a display position toward its grid cell.
/// `factor` is the fraction of the remaining distance covered this step.
#[inline]
pub fn smooth_toward(display: Vec2, cell: IVec2, factor: f32) -> Vec2 {
    display.lerp(cell.as_vec2(), factor.clamp(0.0, 1.0))
}
