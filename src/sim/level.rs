//! Level generation
//!
//! Builds the maze for a level: the fixed pillar pattern, a scatter of
//! destructible walls, the exit and power-ups hidden under walls, and the
//! enemy spawns.

use glam::IVec2;
use rand::Rng;

use super::grid::{Grid, HiddenItem, HiddenLayer, TileKind};
use super::state::Enemy;
use crate::consts::{GRID_SIZE, MAX_ENEMIES};
use crate::is_fixed_wall;
use crate::tuning::Tuning;

/// Output of the generator
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub grid: Grid,
    pub hidden: HiddenLayer,
    pub enemies: Vec<Enemy>,
}

/// Uniform random interior cell (border excluded)
fn random_interior<R: Rng>(rng: &mut R) -> IVec2 {
    let hi = GRID_SIZE as i32 - 1;
    IVec2::new(rng.random_range(1..hi), rng.random_range(1..hi))
}

/// Generate the maze for `level` around the player spawn
pub fn generate<R: Rng>(level: u32, spawn: IVec2, tuning: &Tuning, rng: &mut R) -> LevelLayout {
    let mut grid = Grid::default();
    let mut hidden = HiddenLayer::default();

    // Fixed walls
    for y in 0..GRID_SIZE as i32 {
        for x in 0..GRID_SIZE as i32 {
            let cell = IVec2::new(x, y);
            if is_fixed_wall(cell) {
                grid.set(cell, TileKind::Indestructible);
            }
        }
    }

    // Destructible scatter; collisions are simply lost
    let keep_clear = [spawn, spawn + IVec2::X, spawn + IVec2::Y];
    for _ in 0..tuning.destructible_count(level) {
        let cell = random_interior(rng);
        if keep_clear.contains(&cell) {
            continue;
        }
        if grid.tile(cell) == TileKind::Empty {
            grid.set(cell, TileKind::Destructible);
        }
    }

    for item in HiddenItem::ALL {
        place_hidden_item(&mut grid, &mut hidden, item, tuning.item_placement_attempts, rng);
    }

    let enemy_count = (tuning.enemy_count(level) as usize).min(MAX_ENEMIES);
    let enemies = (0..enemy_count)
        .map(|_| Enemy::new(pick_enemy_spawn(&grid, spawn, tuning, rng)))
        .collect();

    LevelLayout {
        grid,
        hidden,
        enemies,
    }
}

/// Hide `item` under a destructible wall that has nothing hidden yet.
///
/// Rejection sampling is capped; after that a row-major scan takes the first
/// free wall. With no wall at all the exit is placed in the open on the last
/// empty interior cell and power-ups are dropped.
fn place_hidden_item<R: Rng>(
    grid: &mut Grid,
    hidden: &mut HiddenLayer,
    item: HiddenItem,
    attempts: u32,
    rng: &mut R,
) {
    let free_wall = |cell: IVec2, grid: &Grid, hidden: &HiddenLayer| {
        grid.tile(cell) == TileKind::Destructible && hidden.get(cell) == Some(None)
    };

    for _ in 0..attempts {
        let cell = random_interior(rng);
        if free_wall(cell, grid, hidden) {
            hidden.set(cell, Some(item));
            return;
        }
    }

    if let Some((cell, _)) = grid.iter().find(|&(cell, _)| free_wall(cell, grid, hidden)) {
        log::warn!("{:?} placed by scan at {}", item, cell);
        hidden.set(cell, Some(item));
        return;
    }

    if item == HiddenItem::Exit {
        let open = grid
            .iter()
            .filter(|&(cell, tile)| tile == TileKind::Empty && !is_fixed_wall(cell))
            .last();
        if let Some((cell, _)) = open {
            log::warn!("No destructible walls; exit left in the open at {}", cell);
            grid.set(cell, TileKind::Exit);
            return;
        }
    }
    log::warn!("No room to place {:?}", item);
}

/// Rejection-sample an enemy spawn away from the player; after the attempt
/// cap the last candidate is taken as-is
fn pick_enemy_spawn<R: Rng>(grid: &Grid, spawn: IVec2, tuning: &Tuning, rng: &mut R) -> IVec2 {
    let min = tuning.enemy_spawn_min_distance;
    let mut cell = random_interior(rng);
    for attempt in 1..=tuning.enemy_spawn_attempts {
        if attempt > 1 {
            cell = random_interior(rng);
        }
        let d = (cell - spawn).abs();
        let far_enough = d.x >= min || d.y >= min;
        if grid.tile(cell) == TileKind::Empty && cell != spawn && far_enough {
            return cell;
        }
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn() -> IVec2 {
        IVec2::new(1, 1)
    }

    #[test]
    fn test_spawn_area_is_clear() {
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = generate(5, spawn(), &Tuning::default(), &mut rng);
            for cell in [IVec2::new(1, 1), IVec2::new(2, 1), IVec2::new(1, 2)] {
                assert_eq!(layout.grid.tile(cell), TileKind::Empty, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_enemy_count_is_capped() {
        let mut rng = Pcg32::seed_from_u64(1);
        let layout = generate(30, spawn(), &Tuning::default(), &mut rng);
        assert_eq!(layout.enemies.len(), MAX_ENEMIES);
    }

    #[test]
    fn test_no_destructibles_still_places_exit() {
        let tuning = Tuning {
            destructible_base: 0,
            destructible_per_level: 0,
            item_placement_attempts: 10,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let layout = generate(1, spawn(), &tuning, &mut rng);
        assert_eq!(layout.grid.count(TileKind::Exit), 1);
        assert!(layout.hidden.iter().all(|(_, item)| item.is_none()));
    }

    #[test]
    fn test_scan_fallback_uses_free_wall() {
        let mut grid = Grid::default();
        let mut hidden = HiddenLayer::default();
        grid.set(IVec2::new(3, 3), TileKind::Destructible);
        grid.set(IVec2::new(5, 7), TileKind::Destructible);
        hidden.set(IVec2::new(3, 3), Some(HiddenItem::Exit));
        let mut rng = Pcg32::seed_from_u64(0);

        place_hidden_item(&mut grid, &mut hidden, HiddenItem::BombPowerup, 0, &mut rng);

        assert_eq!(hidden.get(IVec2::new(5, 7)), Some(Some(HiddenItem::BombPowerup)));
        assert_eq!(hidden.get(IVec2::new(3, 3)), Some(Some(HiddenItem::Exit)));
    }

    proptest! {
        #[test]
        fn prop_generated_levels_hold_invariants(seed in any::<u64>(), level in 1u32..=8) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = generate(level, spawn(), &tuning, &mut rng);

            for (cell, tile) in layout.grid.iter() {
                if is_fixed_wall(cell) {
                    prop_assert_eq!(tile, TileKind::Indestructible);
                } else {
                    prop_assert_ne!(tile, TileKind::Indestructible);
                }
            }
            let mut items = 0;
            for (cell, item) in layout.hidden.iter() {
                if item.is_some() {
                    items += 1;
                    prop_assert_eq!(layout.grid.tile(cell), TileKind::Destructible);
                }
            }
            prop_assert_eq!(items, 3);
            prop_assert_eq!(
                layout.enemies.len(),
                (tuning.enemy_count(level) as usize).min(MAX_ENEMIES)
            );
            for enemy in &layout.enemies {
                prop_assert!(enemy.alive);
                prop_assert_ne!(enemy.cell, spawn());
            }
        }
    }
}
