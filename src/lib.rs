//! Lane Dodge - a three-lane obstacle dodging arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (timer queue, spawning, falling, collisions, lives)
//! - `feedback`: Hooks for the rendering sink, haptics, audio cue and on-screen messages
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod error;
pub mod feedback;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{SessionError, TuningError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Simulation time in milliseconds
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    use crate::Millis;

    /// Number of lanes the ship and obstacles occupy
    pub const LANE_COUNT: u8 = 3;
    /// Lane the ship starts in (middle)
    pub const START_LANE: u8 = 1;
    /// Lives at session start and after a reset
    pub const MAX_LIVES: u8 = 3;

    /// Time between obstacle spawns
    pub const SPAWN_PERIOD_MS: Millis = 1500;
    /// Time for an obstacle to cross the full container height
    pub const FALL_DURATION_MS: Millis = 4000;
    /// Period of each obstacle's fall/collision evaluation
    pub const TICK_PERIOD_MS: Millis = 30;

    /// Obstacle edge length (same units as the container)
    pub const OBSTACLE_SIZE: f32 = 300.0;
    /// Fraction of the ship's size used as the collision half-extent
    pub const COLLISION_TOLERANCE: f64 = 0.6;
    /// Gap between the ship's bottom edge and the container bottom
    pub const SHIP_BOTTOM_MARGIN: f32 = 100.0;

    /// Haptic pulse length on hit
    pub const HAPTIC_PULSE_MS: Millis = 300;
    /// Alpha of a lost life in the lives indicator
    pub const LOST_LIFE_ALPHA: f32 = 0.2;
}
