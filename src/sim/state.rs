//! Game state and core simulation types
//!
//! One `GameState` lives for one play session. It exclusively owns the
//! obstacles and the lives counter; the timer queue that drives it lives in
//! [`super::session::Session`].

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lane::{LaneGrid, Layout, Rect, clamp_lane};
use super::lives::{HitOutcome, Lives};
use crate::Millis;
use crate::tuning::Tuning;

/// Discrete lane-change input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneCommand {
    /// One lane to the left
    Decrement,
    /// One lane to the right
    Increment,
}

impl LaneCommand {
    #[inline]
    pub fn offset(self) -> i32 {
        match self {
            LaneCommand::Decrement => -1,
            LaneCommand::Increment => 1,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    lane: u8,
    /// Measured view size, zero until layout is ready
    pub size: Vec2,
}

impl PlayerShip {
    pub fn new(lane: u8) -> Self {
        Self {
            lane,
            size: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn lane(&self) -> u8 {
        self.lane
    }

    /// Move to `lane`, clamped into the grid. Returns true if the lane changed.
    pub fn move_to(&mut self, lane: i32, lane_count: u8) -> bool {
        let lane = clamp_lane(lane, lane_count);
        let changed = lane != self.lane;
        self.lane = lane;
        changed
    }

    /// Screen rectangle: centered in the lane, pinned above the bottom margin
    pub fn rect(&self, grid: &LaneGrid, bottom_margin: f32) -> Rect {
        let center = Vec2::new(
            grid.lane_center_x(self.lane),
            grid.height() - self.size.y / 2.0 - bottom_margin,
        );
        Rect::from_center(center, self.size)
    }
}

pub type ObstacleId = u32;

/// Obstacle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    Falling,
    /// Resolved by colliding with the ship
    Hit,
    /// Reached the bottom without a hit
    Expired,
}

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub lane: u8,
    pub spawned_at: Millis,
    pub size: f32,
    pub state: ObstacleState,
    /// Last evaluated rectangle (derived from elapsed time, never integrated)
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(id: ObstacleId, lane: u8, spawned_at: Millis, size: f32, grid: &LaneGrid) -> Self {
        let mut obstacle = Self {
            id,
            lane,
            spawned_at,
            size,
            state: ObstacleState::Falling,
            rect: Rect::new(Vec2::ZERO, Vec2::splat(size)),
        };
        obstacle.rect = obstacle.rect_at(0.0, grid);
        obstacle
    }

    /// Fall progress at `now`, unclamped (>= 1 means it reached the bottom)
    pub fn progress_at(&self, now: Millis, fall_duration: Millis) -> f32 {
        now.saturating_sub(self.spawned_at) as f32 / fall_duration as f32
    }

    /// Rectangle for a given progress
    pub fn rect_at(&self, progress: f32, grid: &LaneGrid) -> Rect {
        let left = grid.lane_center_x(self.lane) - self.size / 2.0;
        let top = progress * grid.height();
        Rect::new(Vec2::new(left, top), Vec2::splat(self.size))
    }
}

/// Notifications for the rendering sink and feedback devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShipMoved { lane: u8, rect: Rect },
    ObstacleSpawned { id: ObstacleId, lane: u8, rect: Rect },
    ObstacleMoved { id: ObstacleId, rect: Rect, progress: f32 },
    /// Left the active set; `state` is `Falling` only on teardown
    ObstacleRemoved { id: ObstacleId, state: ObstacleState },
    /// A resolved hit (drives haptics, audio cue and message)
    Hit { id: ObstacleId, outcome: HitOutcome },
    LivesChanged { lives: u8, max: u8 },
    Paused,
    Resumed,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Set once layout is ready
    pub grid: Option<LaneGrid>,
    pub ship: PlayerShip,
    pub lives: Lives,
    pub paused: bool,
    /// Active (falling) obstacles by id
    pub obstacles: BTreeMap<ObstacleId, Obstacle>,
    /// Pending notifications, drained by the host
    pub events: Vec<GameEvent>,
    /// Lane draws
    pub rng: Pcg32,
    next_id: ObstacleId,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            ship: PlayerShip::new(tuning.start_lane),
            lives: Lives::new(tuning.max_lives),
            tuning,
            grid: None,
            paused: false,
            obstacles: BTreeMap::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply measured layout
    pub fn apply_layout(&mut self, layout: &Layout) {
        self.grid = Some(LaneGrid::new(
            self.tuning.lane_count,
            layout.container.x,
            layout.container.y,
        ));
        self.ship.size = layout.ship_size;
    }

    /// Ship rectangle, if layout is known
    pub fn ship_rect(&self) -> Option<Rect> {
        self.grid
            .as_ref()
            .map(|grid| self.ship.rect(grid, self.tuning.ship_bottom_margin))
    }

    /// Apply a lane-change command. Returns true if the ship moved.
    pub fn apply_lane_command(&mut self, command: LaneCommand) -> bool {
        let target = self.ship.lane() as i32 + command.offset();
        if !self.ship.move_to(target, self.tuning.lane_count) {
            return false;
        }
        self.notify_ship_moved();
        true
    }

    pub fn notify_ship_moved(&mut self) {
        if let Some(rect) = self.ship_rect() {
            self.events.push(GameEvent::ShipMoved {
                lane: self.ship.lane(),
                rect,
            });
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
