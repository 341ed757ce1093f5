//! Gameplay tuning
//!
//! Every balance number the simulation reads lives here so levels can be
//! rebalanced from a JSON file without touching code. The active tuning is
//! stored inside `GameState`, so a snapshot always resumes with the numbers
//! it was played with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, MAX_BOMB_RANGE, MAX_BOMBS, MAX_ENEMIES};
use crate::persistence::PersistenceError;

/// Most random wall picks a level will make (a few passes over the interior)
pub const MAX_DESTRUCTIBLE_PICKS: u32 = ((GRID_SIZE - 2) * (GRID_SIZE - 2) * 4) as u32;
/// Longest fuse or marker lifetime accepted (one minute at 60 Hz)
pub const MAX_TIMER_TICKS: i32 = 60 * 60;

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bombs ===
    /// Ticks from planting until detonation (3 seconds at 60 Hz)
    pub bomb_fuse_ticks: i32,
    /// Ticks an explosion marker stays on screen
    pub explosion_ticks: i32,
    /// Most explosion markers alive at once; extra markers are dropped
    pub max_explosions: usize,

    // === Enemies ===
    /// Ticks between random-walk steps
    pub enemy_move_interval: u32,
    /// Minimum spawn separation from the player on at least one axis
    pub enemy_spawn_min_distance: i32,
    /// Rejection-sampling attempts before accepting any spawn cell
    pub enemy_spawn_attempts: u32,
    pub enemies_base: u32,
    pub enemies_per_level: u32,

    // === Level generation ===
    pub destructible_base: u32,
    pub destructible_per_level: u32,
    /// Rejection-sampling attempts for hidden items before the linear scan
    pub item_placement_attempts: u32,

    // === Player ===
    pub start_max_bombs: u32,
    pub start_bomb_range: u32,
    /// Display smoothing rate (fraction of remaining distance per second)
    pub display_smoothing_rate: f32,

    // === Scoring ===
    pub score_per_kill: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bomb_fuse_ticks: 180,
            explosion_ticks: 60,
            max_explosions: 100,

            enemy_move_interval: 30,
            enemy_spawn_min_distance: 3,
            enemy_spawn_attempts: 100,
            enemies_base: 2,
            enemies_per_level: 1,

            destructible_base: 40,
            destructible_per_level: 5,
            item_placement_attempts: 1000,

            start_max_bombs: 1,
            start_bomb_range: 2,
            display_smoothing_rate: 5.0,

            score_per_kill: 100,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(PersistenceError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({}): {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Clamp values into ranges the simulation can honour
    pub fn validated(mut self) -> Self {
        self.bomb_fuse_ticks = self.bomb_fuse_ticks.clamp(1, MAX_TIMER_TICKS);
        self.explosion_ticks = self.explosion_ticks.clamp(1, MAX_TIMER_TICKS);
        self.max_explosions = self.max_explosions.min(GRID_SIZE * GRID_SIZE * 4);
        self.enemy_move_interval = self.enemy_move_interval.max(1);
        self.enemy_spawn_attempts = self.enemy_spawn_attempts.clamp(1, 10_000);
        self.enemies_base = self.enemies_base.min(MAX_ENEMIES as u32);
        self.enemies_per_level = self.enemies_per_level.min(MAX_ENEMIES as u32);
        self.destructible_base = self.destructible_base.min(MAX_DESTRUCTIBLE_PICKS);
        self.destructible_per_level = self.destructible_per_level.min(MAX_DESTRUCTIBLE_PICKS);
        self.item_placement_attempts = self.item_placement_attempts.min(100_000);
        self.score_per_kill = self.score_per_kill.min(1_000_000);
        self.start_max_bombs = self.start_max_bombs.clamp(1, MAX_BOMBS);
        self.start_bomb_range = self.start_bomb_range.clamp(1, MAX_BOMB_RANGE);
        if !self.display_smoothing_rate.is_finite() || self.display_smoothing_rate < 0.0 {
            self.display_smoothing_rate = 0.0;
        }
        self
    }

    /// Destructible walls scattered on a level
    pub fn destructible_count(&self, level: u32) -> u32 {
        self.destructible_per_level
            .saturating_mul(level)
            .saturating_add(self.destructible_base)
            .min(MAX_DESTRUCTIBLE_PICKS)
    }

    /// Enemies spawned on a level (before the hard cap)
    pub fn enemy_count(&self, level: u32) -> u32 {
        self.enemies_per_level
            .saturating_mul(level)
            .saturating_add(self.enemies_base)
    }
}
