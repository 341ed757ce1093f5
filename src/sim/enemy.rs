//! Enemy random walk
//!
//! Every `enemy_move_interval` ticks a living enemy picks one of the four
//! directions uniformly and steps if the target is walkable and bomb-free.
//! An invalid pick means no move this cycle; there is no retry.

use glam::IVec2;
use rand::Rng;

use super::grid::{Direction, Grid};
use super::state::{Bomb, Enemy};
use super::smooth_toward;

/// True if an enemy (or the player) may step onto `cell`
pub fn can_enter(cell: IVec2, grid: &Grid, bombs: &[Bomb]) -> bool {
    grid.get(cell).is_some_and(|tile| tile.is_walkable())
        && !bombs.iter().any(|b| b.is_armed() && b.cell == cell)
}

/// Advance one enemy by a tick
pub fn step_enemy<R: Rng>(
    enemy: &mut Enemy,
    grid: &Grid,
    bombs: &[Bomb],
    move_interval: u32,
    rng: &mut R,
) {
    if !enemy.alive {
        return;
    }
    enemy.move_timer += 1;
    if enemy.move_timer < move_interval {
        return;
    }
    enemy.move_timer = 0;

    let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    let target = enemy.cell + dir.delta();
    if can_enter(target, grid, bombs) {
        enemy.cell = target;
    }
}

/// Advance every enemy and ease their display positions
pub fn advance_enemies<R: Rng>(
    enemies: &mut [Enemy],
    grid: &Grid,
    bombs: &[Bomb],
    move_interval: u32,
    smoothing: f32,
    rng: &mut R,
) {
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        step_enemy(enemy, grid, bombs, move_interval, rng);
        enemy.display_pos = smooth_toward(enemy.display_pos, enemy.cell, smoothing);
    }
}
