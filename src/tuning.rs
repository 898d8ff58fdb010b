//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]. Hosts may override any field from JSON;
//! missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::*;
use crate::error::TuningError;

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub lane_count: u8,
    pub start_lane: u8,
    pub max_lives: u8,
    pub spawn_period_ms: Millis,
    pub fall_duration_ms: Millis,
    pub tick_period_ms: Millis,
    pub obstacle_size: f32,
    pub collision_tolerance: f64,
    pub ship_bottom_margin: f32,
    /// Stop crediting fall progress while paused.
    ///
    /// Off by default: obstacles measure elapsed time from their spawn
    /// instant, so the first evaluated tick after a long pause jumps forward.
    pub freeze_fall_clock_on_pause: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            start_lane: START_LANE,
            max_lives: MAX_LIVES,
            spawn_period_ms: SPAWN_PERIOD_MS,
            fall_duration_ms: FALL_DURATION_MS,
            tick_period_ms: TICK_PERIOD_MS,
            obstacle_size: OBSTACLE_SIZE,
            collision_tolerance: COLLISION_TOLERANCE,
            ship_bottom_margin: SHIP_BOTTOM_MARGIN,
            freeze_fall_clock_on_pause: false,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lane_count < 2 {
            return Err(TuningError::TooFewLanes {
                lane_count: self.lane_count,
            });
        }
        if self.start_lane >= self.lane_count {
            return Err(TuningError::StartLaneOutOfRange {
                start_lane: self.start_lane,
                lane_count: self.lane_count,
            });
        }
        if self.max_lives == 0 {
            return Err(TuningError::NoLives);
        }
        for (field, value) in [
            ("spawn_period_ms", self.spawn_period_ms),
            ("fall_duration_ms", self.fall_duration_ms),
            ("tick_period_ms", self.tick_period_ms),
        ] {
            if value == 0 {
                return Err(TuningError::ZeroPeriod { field });
            }
        }
        if !(self.obstacle_size > 0.0) {
            return Err(TuningError::NonPositiveSize {
                field: "obstacle_size",
                value: self.obstacle_size,
            });
        }
        // Margin may be zero (ship flush with the bottom edge)
        if !(self.ship_bottom_margin >= 0.0) {
            return Err(TuningError::NonPositiveSize {
                field: "ship_bottom_margin",
                value: self.ship_bottom_margin,
            });
        }
        if !(self.collision_tolerance > 0.0) || !self.collision_tolerance.is_finite() {
            return Err(TuningError::InvalidTolerance {
                value: self.collision_tolerance,
            });
        }
        Ok(())
    }
}
