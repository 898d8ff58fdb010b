//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from the caller, never from a wall clock
//! - Seeded RNG only
//! - Stable iteration order (by obstacle ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lane;
pub mod lives;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{collides, collides_with_tolerance, rects_collide};
pub use lane::{LaneGrid, Layout, Rect};
pub use lives::{HitOutcome, Lives};
pub use scheduler::{TimerId, TimerQueue};
pub use session::{Session, SpawnerState, Task};
pub use state::{
    GameEvent, GameState, LaneCommand, Obstacle, ObstacleId, ObstacleState, PlayerShip,
};
pub use tick::{FallOutcome, fall_tick, handle_hit, spawn_obstacle};
