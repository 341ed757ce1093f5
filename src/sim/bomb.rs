//! Bomb fuses and blast propagation
//!
//! A bomb is armed until its fuse runs out, then detonates: it marks its own
//! cell, then walks each cardinal direction up to its range. Walls stop the
//! blast (destructible ones are destroyed first and reveal what they hide);
//! open cells kill whatever stands on them and cut the fuse of any bomb there.

use glam::IVec2;

use super::grid::{Direction, TileKind};
use super::state::{Bomb, DeathCause, Explosion, GameEvent, GameState};

/// Propagation order of the four arms
const BLAST_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// Plant a bomb under the player if capacity and the cell allow it.
/// Returns false (and changes nothing) otherwise.
pub fn plant(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let cell = state.player.cell;
    if !state.player.alive
        || state.bombs.len() >= state.player.max_bombs as usize
        || state.bombs.iter().any(|b| b.cell == cell)
    {
        return false;
    }
    state.bombs.push(Bomb {
        cell,
        timer: state.tuning.bomb_fuse_ticks,
        range: state.player.bomb_range,
        exploded: false,
    });
    events.push(GameEvent::BombPlanted { cell });
    true
}

/// Burn every armed fuse by one tick and detonate the ones that run out.
///
/// Bombs are visited in collection order; a bomb whose fuse is cut by an
/// earlier blast in this pass goes off in this pass, one cut by a later
/// blast goes off next tick.
pub fn advance_bombs(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for i in 0..state.bombs.len() {
        if state.bombs[i].exploded {
            continue;
        }
        state.bombs[i].timer -= 1;
        if state.bombs[i].timer <= 0 {
            detonate(state, i, events);
        }
    }
}

/// Drop exploded bombs and age explosion markers
pub fn compact(state: &mut GameState) {
    state.bombs.retain(|b| !b.exploded);
    for explosion in state.explosions.iter_mut() {
        explosion.timer -= 1;
    }
    state.explosions.retain(|e| e.timer > 0);
}

fn add_marker(state: &mut GameState, cell: IVec2) {
    if state.explosions.len() < state.tuning.max_explosions {
        state.explosions.push(Explosion {
            cell,
            timer: state.tuning.explosion_ticks,
        });
    }
}

/// Detonate the bomb at `index`
fn detonate(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) {
    let bomb = state.bombs[index];
    state.bombs[index].exploded = true;
    log::debug!("Bomb detonated at {} (range {})", bomb.cell, bomb.range);
    events.push(GameEvent::BombDetonated { cell: bomb.cell });

    add_marker(state, bomb.cell);
    if state.player.cell == bomb.cell {
        state.kill_player(DeathCause::Blast, events);
    }

    for dir in BLAST_ORDER {
        for r in 1..=bomb.range as i32 {
            let cell = bomb.cell + dir.delta() * r;
            let Some(tile) = state.grid.get(cell) else {
                break;
            };
            if tile == TileKind::Indestructible {
                break;
            }
            add_marker(state, cell);

            if tile == TileKind::Destructible {
                let revealed = state.hidden.get(cell).flatten();
                state.grid.set(cell, revealed.map_or(TileKind::Empty, TileKind::from));
                state.hidden.set(cell, None);
                events.push(GameEvent::WallDestroyed { cell, revealed });
                break;
            }

            blast_cell(state, cell, events);
        }
    }
}

/// Resolve kills and chain reactions on an open cell hit by a blast
fn blast_cell(state: &mut GameState, cell: IVec2, events: &mut Vec<GameEvent>) {
    let mut kills: u64 = 0;
    for enemy in state.enemies.iter_mut() {
        if enemy.alive && enemy.cell == cell {
            enemy.alive = false;
            kills += 1;
            events.push(GameEvent::EnemyKilled { cell });
        }
    }
    if kills > 0 {
        log::debug!("{} enemies killed at {}", kills, cell);
        state.score = state
            .score
            .saturating_add(kills.saturating_mul(state.tuning.score_per_kill));
    }

    if state.player.cell == cell {
        state.kill_player(DeathCause::Blast, events);
    }

    for other in state.bombs.iter_mut() {
        if other.is_armed() && other.cell == cell && other.timer > 0 {
            other.timer = 0;
            events.push(GameEvent::ChainTriggered { cell });
        }
    }
}
