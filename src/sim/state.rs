//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, HiddenItem, HiddenLayer, TileKind};
use super::level;
use crate::consts::*;
use crate::player_spawn;
use crate::tuning::Tuning;

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Authoritative grid cell
    pub cell: IVec2,
    /// Smoothed position for rendering only
    pub display_pos: Vec2,
    pub facing: Direction,
    pub max_bombs: u32,
    pub bomb_range: u32,
    pub alive: bool,
}

impl Player {
    pub fn new(cell: IVec2, tuning: &Tuning) -> Self {
        Self {
            cell,
            display_pos: cell.as_vec2(),
            facing: Direction::East,
            max_bombs: tuning.start_max_bombs,
            bomb_range: tuning.start_bomb_range,
            alive: true,
        }
    }

    /// Put the player back on a spawn cell, keeping power-ups
    pub fn respawn(&mut self, cell: IVec2) {
        self.cell = cell;
        self.display_pos = cell.as_vec2();
        self.facing = Direction::East;
        self.alive = true;
    }
}

/// A wandering enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub cell: IVec2,
    pub display_pos: Vec2,
    pub alive: bool,
    /// Ticks since the last random-walk step
    pub move_timer: u32,
}

impl Enemy {
    pub fn new(cell: IVec2) -> Self {
        Self {
            cell,
            display_pos: cell.as_vec2(),
            alive: true,
            move_timer: 0,
        }
    }
}

/// A planted bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub cell: IVec2,
    /// Ticks until detonation
    pub timer: i32,
    /// Blast range captured when planted
    pub range: u32,
    pub exploded: bool,
}

impl Bomb {
    pub fn is_armed(&self) -> bool {
        !self.exploded
    }
}

/// A transient explosion marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub cell: IVec2,
    /// Ticks left on screen
    pub timer: i32,
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Blast,
    Enemy,
}

/// Things that happened during a tick (for renderers/audio; never fed back)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BombPlanted { cell: IVec2 },
    BombDetonated { cell: IVec2 },
    /// A bomb caught in a blast had its fuse cut
    ChainTriggered { cell: IVec2 },
    WallDestroyed { cell: IVec2, revealed: Option<HiddenItem> },
    EnemyKilled { cell: IVec2 },
    PlayerKilled { cell: IVec2, cause: DeathCause },
    PowerupCollected { cell: IVec2, kind: TileKind },
    LevelComplete { level: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG (persisted so restored games continue the same sequence)
    pub rng: Pcg32,
    /// Balance numbers this run is played with
    pub tuning: Tuning,
    /// Current level (1-based)
    pub level: u32,
    /// Score (kept across levels, reset on a new game)
    pub score: u64,
    /// Simulation tick counter for the current level
    pub time_ticks: u64,
    pub game_over: bool,
    pub level_complete: bool,
    pub grid: Grid,
    pub hidden: HiddenLayer,
    pub player: Player,
    /// Enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
}

impl GameState {
    /// Start a fresh game at level 1
    pub fn new_game(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.validated();
        let spawn = player_spawn();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(spawn, &tuning),
            tuning,
            level: 1,
            score: 0,
            time_ticks: 0,
            game_over: false,
            level_complete: false,
            grid: Grid::default(),
            hidden: HiddenLayer::default(),
            enemies: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
        };
        state.generate_level();
        state
    }

    /// Build a level-1 game around an externally supplied layout
    pub fn from_layout(
        grid: Grid,
        hidden: HiddenLayer,
        spawn: IVec2,
        enemy_cells: &[IVec2],
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        let tuning = tuning.validated();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(spawn, &tuning),
            tuning,
            level: 1,
            score: 0,
            time_ticks: 0,
            game_over: false,
            level_complete: false,
            grid,
            hidden,
            enemies: enemy_cells
                .iter()
                .take(MAX_ENEMIES)
                .map(|&cell| Enemy::new(cell))
                .collect(),
            bombs: Vec::new(),
            explosions: Vec::new(),
        }
    }

    /// Move on after `level_complete`, keeping score and power-ups
    pub fn advance_level(&mut self) {
        if !self.level_complete {
            log::warn!("advance_level called before level {} was complete", self.level);
            return;
        }
        self.level += 1;
        self.generate_level();
    }

    /// Start over at level 1 with default stats (continues the RNG stream)
    pub fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
        self.player = Player::new(player_spawn(), &self.tuning);
        self.generate_level();
    }

    /// Regenerate the maze for the current level and reset per-level state
    fn generate_level(&mut self) {
        let spawn = player_spawn();
        let layout = level::generate(self.level, spawn, &self.tuning, &mut self.rng);
        self.grid = layout.grid;
        self.hidden = layout.hidden;
        self.enemies = layout.enemies;
        self.bombs.clear();
        self.explosions.clear();
        self.player.respawn(spawn);
        self.time_ticks = 0;
        self.game_over = false;
        self.level_complete = false;
        log::info!(
            "Level {}: {} walls, {} enemies",
            self.level,
            self.grid.count(TileKind::Destructible),
            self.enemies.len()
        );
    }

    /// Armed (not yet exploded) bomb at `cell`
    pub fn bomb_at(&self, cell: IVec2) -> bool {
        self.bombs.iter().any(|b| b.is_armed() && b.cell == cell)
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// Kill the player (idempotent)
    pub(crate) fn kill_player(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        if self.player.alive {
            log::debug!("Player killed by {:?} at {}", cause, self.player.cell);
            events.push(GameEvent::PlayerKilled {
                cell: self.player.cell,
                cause,
            });
        }
        self.player.alive = false;
        self.game_over = true;
    }

    /// Check the layout invariants a restored state must satisfy
    pub fn check_invariants(&self) -> Result<(), String> {
        for (cell, item) in self.hidden.iter() {
            if item.is_some() && self.grid.tile(cell) != TileKind::Destructible {
                return Err(format!("hidden item at {cell} is not under a destructible wall"));
            }
        }
        if !crate::in_bounds(self.player.cell) {
            return Err(format!("player out of bounds at {}", self.player.cell));
        }
        if let Some(e) = self.enemies.iter().find(|e| !crate::in_bounds(e.cell)) {
            return Err(format!("enemy out of bounds at {}", e.cell));
        }
        if let Some(b) = self.bombs.iter().find(|b| !crate::in_bounds(b.cell)) {
            return Err(format!("bomb out of bounds at {}", b.cell));
        }
        if self.enemies.len() > MAX_ENEMIES {
            return Err(format!("{} enemies exceeds cap {}", self.enemies.len(), MAX_ENEMIES));
        }
        if self.player.max_bombs > MAX_BOMBS || self.bombs.len() > self.player.max_bombs as usize
        {
            return Err(format!(
                "{} bombs with capacity {} (cap {})",
                self.bombs.len(),
                self.player.max_bombs,
                MAX_BOMBS
            ));
        }
        if self.tuning != self.tuning.clone().validated() {
            return Err("tuning outside its accepted ranges".to_string());
        }
        if !(1..=MAX_BOMB_RANGE).contains(&self.player.bomb_range) {
            return Err(format!("player bomb range {} out of range", self.player.bomb_range));
        }
        // A chained bomb waits at 0 until the next tick
        let fuse = 0..=self.tuning.bomb_fuse_ticks;
        if let Some(b) = self
            .bombs
            .iter()
            .find(|b| !fuse.contains(&b.timer) || !(1..=MAX_BOMB_RANGE).contains(&b.range))
        {
            return Err(format!(
                "bomb at {} has timer {} and range {}",
                b.cell, b.timer, b.range
            ));
        }
        let lifetime = 1..=self.tuning.explosion_ticks;
        if let Some(e) = self.explosions.iter().find(|e| !lifetime.contains(&e.timer)) {
            return Err(format!("explosion at {} has timer {}", e.cell, e.timer));
        }
        Ok(())
    }
}
