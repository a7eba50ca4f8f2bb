//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there are no
//! module-level globals.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::camera::CameraMode;
use crate::consts::*;
use crate::lane_center_x;
use crate::tuning::{Tuning, TuningError};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen is showing
    NotStarted,
    /// Active gameplay
    Running,
    /// Gameplay frozen by the player
    Paused,
    /// Hit a hazard
    GameOver,
    /// Reached the finish distance
    Victory,
}

impl GamePhase {
    /// GameOver or Victory
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    GameOver,
    Victory,
}

/// Notifications for the presentation layer, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Restarted,
    CoinCollected { total: u32 },
    Recentered { shift: f32 },
    CameraChanged(CameraMode),
    RunEnded {
        outcome: Outcome,
        coins: u32,
        elapsed_secs: f32,
    },
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane the player is steering toward
    pub target_lane: usize,
    pub pos: Vec3,
    pub radius: f32,
    pub forward_speed: f32,
    pub coins_collected: u32,
    /// Set once the run has ended; a halted player no longer moves
    pub halted: bool,
}

impl Player {
    pub fn new(start_speed: f32) -> Self {
        Self {
            target_lane: PLAYER_START_LANE,
            pos: Vec3::new(lane_center_x(PLAYER_START_LANE), PLAYER_Y, PLAYER_START_Z),
            radius: PLAYER_RADIUS,
            forward_speed: start_speed,
            coins_collected: 0,
            halted: false,
        }
    }
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec3,
    /// Cleared on pickup; inactive coins are skipped until cleanup removes them
    pub active: bool,
    pub rotation: f32,
}

/// Hazard variants; every kind is fatal on contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Barrel sitting in a lane
    Obstacle,
    /// Spinning bomb sitting in a lane
    StaticBomb,
    /// Bomb dropping onto the track
    FallingBomb { velocity_y: f32 },
}

/// A hazard entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub pos: Vec3,
    pub radius: f32,
    pub rotation: f32,
    /// Spin rate in radians/sec (0 = stationary)
    pub rotation_speed: f32,
}

impl Hazard {
    pub fn obstacle(pos: Vec3) -> Self {
        Self {
            kind: HazardKind::Obstacle,
            pos,
            radius: OBSTACLE_RADIUS,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    pub fn static_bomb(pos: Vec3, rotation: f32, rotation_speed: f32) -> Self {
        Self {
            kind: HazardKind::StaticBomb,
            pos,
            radius: BOMB_RADIUS,
            rotation,
            rotation_speed,
        }
    }

    pub fn falling_bomb(pos: Vec3, rotation: f32, rotation_speed: f32) -> Self {
        Self {
            kind: HazardKind::FallingBomb { velocity_y: 0.0 },
            pos,
            radius: BOMB_RADIUS,
            rotation,
            rotation_speed,
        }
    }

    /// Advance spin
    pub fn rotate(&mut self, dt: f32) {
        self.rotation += self.rotation_speed * dt;
    }
}

/// Entity stores plus the streaming cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Next z at which a chunk will be spawned; only ever decreases between recenters
    pub next_spawn_z: f32,
    pub coins: Vec<Coin>,
    pub obstacles: Vec<Hazard>,
    pub static_bombs: Vec<Hazard>,
    pub falling_bombs: Vec<Hazard>,
    /// Seconds accumulated toward the next falling bomb
    pub bomb_timer: f32,
}

impl World {
    pub fn new(first_spawn_z: f32) -> Self {
        Self {
            next_spawn_z: first_spawn_z,
            coins: Vec::new(),
            obstacles: Vec::new(),
            static_bombs: Vec::new(),
            falling_bombs: Vec::new(),
            bomb_timer: 0.0,
        }
    }

    /// All hazards regardless of store
    pub fn hazards(&self) -> impl Iterator<Item = &Hazard> {
        self.obstacles
            .iter()
            .chain(self.static_bombs.iter())
            .chain(self.falling_bombs.iter())
    }

    /// Total entity count across stores
    pub fn entity_count(&self) -> usize {
        self.coins.len() + self.obstacles.len() + self.static_bombs.len() + self.falling_bombs.len()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn randomness
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub world: World,
    pub camera: CameraMode,
    /// Gameplay seconds this run (paused time excluded)
    pub elapsed_secs: f32,
    /// Total distance travelled this run, unaffected by recentering
    pub distance: f32,
    /// Pending notifications for the driver
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_valid_tuning(seed, Tuning::default())
    }

    /// Create a game state with custom tuning, rejecting values that would
    /// stall streaming or break the run's invariants
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_valid_tuning(seed, tuning))
    }

    fn from_valid_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            player: Player::new(tuning.start_speed),
            world: World::new(tuning.first_spawn_z),
            camera: CameraMode::default(),
            elapsed_secs: 0.0,
            distance: 0.0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Wipe run state back to the starting line; the rng stream continues
    pub fn reset_run(&mut self) {
        self.player = Player::new(self.tuning.start_speed);
        self.world = World::new(self.tuning.first_spawn_z);
        self.elapsed_secs = 0.0;
        self.distance = 0.0;
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter a terminal phase. No-op if the run already ended.
    pub fn end_run(&mut self, outcome: Outcome) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = match outcome {
            Outcome::GameOver => GamePhase::GameOver,
            Outcome::Victory => GamePhase::Victory,
        };
        self.player.halt();

        log::info!(
            "Run ended ({:?}): {} coins in {:.1}s",
            outcome,
            self.player.coins_collected,
            self.elapsed_secs
        );
        self.events.push(GameEvent::RunEnded {
            outcome,
            coins: self.player.coins_collected,
            elapsed_secs: self.elapsed_secs,
        });
    }
}
