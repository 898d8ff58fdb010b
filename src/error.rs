//! Error types for configuration and session setup
//!
//! The tick path never fails; these only surface at the edges.

use core::fmt;

/// Invalid or unreadable gameplay tuning
#[derive(Clone, Debug, PartialEq)]
pub enum TuningError {
    TooFewLanes { lane_count: u8 },
    NoLives,
    StartLaneOutOfRange { start_lane: u8, lane_count: u8 },
    ZeroPeriod { field: &'static str },
    NonPositiveSize { field: &'static str, value: f32 },
    InvalidTolerance { value: f64 },
    Parse(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLanes { lane_count } => {
                write!(f, "lane count must be at least 2, got {lane_count}")
            }
            Self::NoLives => write!(f, "max lives must be at least 1"),
            Self::StartLaneOutOfRange {
                start_lane,
                lane_count,
            } => write!(
                f,
                "start lane {start_lane} out of range (allowed 0..{lane_count})"
            ),
            Self::ZeroPeriod { field } => write!(f, "{field} must be non-zero"),
            Self::NonPositiveSize { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::InvalidTolerance { value } => {
                write!(f, "collision tolerance must be positive, got {value}")
            }
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Session setup failures
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// Layout arrived before real measurement (zero or negative dimensions)
    UnmeasuredLayout { width: f32, height: f32 },
    /// Ship view has no measured size yet
    UnmeasuredShip { width: f32, height: f32 },
    /// Layout-ready is a one-time signal
    LayoutAlreadyDelivered,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmeasuredLayout { width, height } => write!(
                f,
                "layout not measured yet: container {width}x{height}"
            ),
            Self::UnmeasuredShip { width, height } => {
                write!(f, "ship not measured yet: {width}x{height}")
            }
            Self::LayoutAlreadyDelivered => write!(f, "layout already delivered"),
        }
    }
}

impl std::error::Error for SessionError {}
