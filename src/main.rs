//! Mini Bomber headless runner
//!
//! Drives the simulation at the fixed timestep with a scripted random-walk
//! player, the way a frontend would drive it with keyboard input.
//!
//! Usage: mini-bomber [SEED] [--map FILE] [--load FILE] [--save FILE]
//!                    [--tuning FILE] [--frames N]

use std::path::PathBuf;

use clap::Parser;
use mini_bomber::Tuning;
use mini_bomber::consts::*;
use mini_bomber::persistence;
use mini_bomber::sim::{Direction, GameEvent, GameState, TickInput, tick};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Parser, Debug)]
#[command(name = "mini-bomber")]
#[command(about = "Run the Mini Bomber simulation headless with a scripted player")]
struct Args {
    /// Run seed
    #[arg(default_value_t = 1)]
    seed: u64,
    /// Start on a custom map file
    #[arg(long)]
    map: Option<PathBuf>,
    /// Continue from a snapshot
    #[arg(long)]
    load: Option<PathBuf>,
    /// Snapshot written on every level completion and at exit
    #[arg(long)]
    save: Option<PathBuf>,
    /// Tuning JSON file
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u32,
}

/// Fake player: one key edge every few ticks
struct Autopilot {
    rng: Pcg32,
    cooldown: u32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            cooldown: 0,
        }
    }

    fn next_input(&mut self) -> TickInput {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return TickInput::default();
        }
        self.cooldown = 12;
        let roll = self.rng.random_range(0..10);
        if roll == 0 {
            TickInput {
                move_dir: None,
                plant_bomb: true,
            }
        } else {
            TickInput {
                move_dir: Some(Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]),
                plant_bomb: false,
            }
        }
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    autopilot: Autopilot,
    accumulator: f32,
    kills: u32,
    deaths: u32,
    levels_cleared: u32,
    save_path: Option<PathBuf>,
}

impl Game {
    fn new(state: GameState, seed: u64, save_path: Option<PathBuf>) -> Self {
        Self {
            state,
            autopilot: Autopilot::new(seed),
            accumulator: 0.0,
            kills: 0,
            deaths: 0,
            levels_cleared: 0,
            save_path,
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.autopilot.next_input();
            let outcome = tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            self.kills += outcome
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
                .count() as u32;

            if outcome.level_complete {
                self.levels_cleared += 1;
                if let Some(path) = &self.save_path {
                    if let Err(err) = persistence::save_to_path(&self.state, path) {
                        log::warn!("Could not save to {}: {}", path.display(), err);
                    }
                }
                self.state.advance_level();
            } else if outcome.game_over {
                self.deaths += 1;
                log::info!(
                    "Game over on level {} with score {}",
                    self.state.level,
                    self.state.score
                );
                self.state.restart();
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args = Args::parse();
    log::info!("Mini Bomber (headless) starting with seed {}", args.seed);

    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();

    let state = if let Some(path) = &args.load {
        match persistence::load_from_path(path) {
            Ok(state) => state,
            Err(err) => {
                log::warn!(
                    "Could not continue from {}: {}; starting a new game",
                    path.display(),
                    err
                );
                GameState::new_game(args.seed, tuning)
            }
        }
    } else if let Some(path) = &args.map {
        match persistence::load_map_file(path, tuning.clone(), args.seed) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("Could not load map {}: {}; starting a new game", path.display(), err);
                GameState::new_game(args.seed, tuning)
            }
        }
    } else {
        GameState::new_game(args.seed, tuning)
    };

    let mut game = Game::new(state, args.seed, args.save.clone());
    for _ in 0..args.frames {
        game.update(SIM_DT);
    }

    println!(
        "level {} | score {} | kills {} | deaths {} | levels cleared {}",
        game.state.level, game.state.score, game.kills, game.deaths, game.levels_cleared
    );

    if let Some(path) = &args.save {
        if let Err(err) = persistence::save_to_path(&game.state, path) {
            eprintln!("error: could not save to {}: {err}", path.display());
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
