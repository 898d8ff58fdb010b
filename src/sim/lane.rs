//! Lane geometry
//!
//! The container is split into `lane_count` equal-width vertical lanes. The
//! ship and every obstacle are horizontally centered in their lane.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in container space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

/// Measured dimensions delivered once by the layout provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub container: Vec2,
    pub ship_size: Vec2,
}

impl Layout {
    pub fn new(
        container_width: f32,
        container_height: f32,
        ship_width: f32,
        ship_height: f32,
    ) -> Self {
        Self {
            container: Vec2::new(container_width, container_height),
            ship_size: Vec2::new(ship_width, ship_height),
        }
    }
}

/// Maps lane indices to horizontal slots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneGrid {
    lane_count: u8,
    width: f32,
    height: f32,
}

impl LaneGrid {
    pub fn new(lane_count: u8, width: f32, height: f32) -> Self {
        debug_assert!(lane_count >= 2, "lane grid needs at least two lanes");
        debug_assert!(width > 0.0 && height > 0.0, "lane grid built before layout");
        Self {
            lane_count,
            width,
            height,
        }
    }

    #[inline]
    pub fn lane_count(&self) -> u8 {
        self.lane_count
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// Horizontal center of a lane
    pub fn lane_center_x(&self, lane: u8) -> f32 {
        let lane_width = self.lane_width();
        lane as f32 * lane_width + lane_width / 2.0
    }

    /// Highest valid lane index
    #[inline]
    pub fn last_lane(&self) -> u8 {
        self.lane_count - 1
    }
}

/// Clamp a signed lane request into `[0, lane_count - 1]`
#[inline]
pub fn clamp_lane(lane: i32, lane_count: u8) -> u8 {
    lane.clamp(0, lane_count as i32 - 1) as u8
}
