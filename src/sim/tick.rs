//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use serde::{Deserialize, Serialize};

use super::bomb;
use super::enemy::{self, can_enter};
use super::grid::{Direction, TileKind};
use super::smooth_toward;
use super::state::{DeathCause, GameEvent, GameState};
use crate::consts::{MAX_BOMB_RANGE, MAX_BOMBS};

/// Input commands for a single tick (deterministic)
///
/// Both fields are edge-triggered: the caller sets them for the one tick in
/// which the key went down, not while it is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Single-cell step request
    pub move_dir: Option<Direction>,
    /// Plant a bomb under the player
    pub plant_bomb: bool,
}

/// Result of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    pub game_over: bool,
    pub level_complete: bool,
}

/// Advance the game state by one fixed timestep.
///
/// `dt` is the elapsed real time and only drives display smoothing.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    let mut events = Vec::new();

    // Frozen once the level is decided
    if state.game_over || state.level_complete {
        return outcome(state, events);
    }

    state.time_ticks += 1;
    let smoothing = state.tuning.display_smoothing_rate * dt;

    if state.player.alive {
        // Movement
        if let Some(dir) = input.move_dir {
            state.player.facing = dir;
            let target = state.player.cell + dir.delta();
            if can_enter(target, &state.grid, &state.bombs) {
                state.player.cell = target;
            }
        }

        state.player.display_pos =
            smooth_toward(state.player.display_pos, state.player.cell, smoothing);

        collect_tile(state, &mut events);

        if input.plant_bomb {
            bomb::plant(state, &mut events);
        }
    }

    bomb::advance_bombs(state, &mut events);
    bomb::compact(state);

    enemy::advance_enemies(
        &mut state.enemies,
        &state.grid,
        &state.bombs,
        state.tuning.enemy_move_interval,
        smoothing,
        &mut state.rng,
    );

    // Player/enemy contact, whoever moved
    if state
        .enemies
        .iter()
        .any(|e| e.alive && e.cell == state.player.cell)
    {
        state.kill_player(DeathCause::Enemy, &mut events);
    }

    outcome(state, events)
}

/// Apply the effect of the tile under the player
fn collect_tile(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let cell = state.player.cell;
    let kind = state.grid.tile(cell);
    match kind {
        TileKind::BombPowerup => {
            state.player.max_bombs = (state.player.max_bombs + 1).min(MAX_BOMBS);
            state.grid.set(cell, TileKind::Empty);
            events.push(GameEvent::PowerupCollected { cell, kind });
        }
        TileKind::RangePowerup => {
            state.player.bomb_range = (state.player.bomb_range + 1).min(MAX_BOMB_RANGE);
            state.grid.set(cell, TileKind::Empty);
            events.push(GameEvent::PowerupCollected { cell, kind });
        }
        TileKind::Exit if state.all_enemies_dead() => {
            log::info!("Level {} complete (score {})", state.level, state.score);
            state.level_complete = true;
            events.push(GameEvent::LevelComplete { level: state.level });
        }
        _ => {}
    }
}

fn outcome(state: &GameState, events: Vec<GameEvent>) -> TickOutcome {
    TickOutcome {
        events,
        game_over: state.game_over,
        level_complete: state.level_complete,
    }
}
