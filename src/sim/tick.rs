//! Spawn firing, per-obstacle fall ticks and hit handling
//!
//! These are the bodies of the scheduled tasks. They mutate [`GameState`]
//! and report what happened; rescheduling is up to the session.

use rand::Rng;

use super::collision::rects_collide;
use super::lives::HitOutcome;
use super::state::{GameEvent, GameState, Obstacle, ObstacleId, ObstacleState};
use crate::Millis;

/// What a fall tick did with its obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallOutcome {
    /// Paused: nothing evaluated, tick again later
    Frozen,
    /// Still falling at `progress`, tick again later
    Falling { progress: f32 },
    /// Collided with the ship; the task is done
    Hit,
    /// Reached the bottom unhit; the task is done
    Expired,
    /// Obstacle no longer active (session torn down)
    Gone,
}

impl FallOutcome {
    /// Whether the obstacle's task should post another tick
    #[inline]
    pub fn reschedule(&self) -> bool {
        matches!(self, FallOutcome::Frozen | FallOutcome::Falling { .. })
    }
}

/// Spawn one obstacle in a uniformly random lane at `now`
///
/// Returns `None` when layout is not ready yet.
pub fn spawn_obstacle(state: &mut GameState, now: Millis) -> Option<ObstacleId> {
    let grid = state.grid?;
    let lane = state.rng.random_range(0..grid.lane_count());
    let id = state.next_obstacle_id();
    let obstacle = Obstacle::new(id, lane, now, state.tuning.obstacle_size, &grid);

    log::debug!("spawn obstacle {id} in lane {lane} at {now}ms");
    state.events.push(GameEvent::ObstacleSpawned {
        id,
        lane,
        rect: obstacle.rect,
    });
    state.obstacles.insert(id, obstacle);
    Some(id)
}

/// Advance one obstacle to `now` and resolve it if it hit or landed
pub fn fall_tick(state: &mut GameState, id: ObstacleId, now: Millis) -> FallOutcome {
    if !state.obstacles.contains_key(&id) {
        return FallOutcome::Gone;
    }
    if state.paused {
        return FallOutcome::Frozen;
    }
    let (Some(grid), Some(ship_rect)) = (state.grid, state.ship_rect()) else {
        return FallOutcome::Gone;
    };

    let fall_duration = state.tuning.fall_duration_ms;
    let tolerance = state.tuning.collision_tolerance;
    let Some(obstacle) = state.obstacles.get_mut(&id) else {
        return FallOutcome::Gone;
    };

    // Collision and completion use the raw progress; views never see past the bottom
    let progress = obstacle.progress_at(now, fall_duration);
    let shown = progress.clamp(0.0, 1.0);
    let hit_rect = obstacle.rect_at(progress, &grid);
    obstacle.rect = obstacle.rect_at(shown, &grid);
    state.events.push(GameEvent::ObstacleMoved {
        id,
        rect: obstacle.rect,
        progress: shown,
    });

    if rects_collide(&hit_rect, &ship_rect, tolerance) {
        retire(state, id, ObstacleState::Hit);
        handle_hit(state, id);
        return FallOutcome::Hit;
    }

    if progress < 1.0 {
        FallOutcome::Falling { progress }
    } else {
        log::debug!("obstacle {id} expired at {now}ms");
        retire(state, id, ObstacleState::Expired);
        FallOutcome::Expired
    }
}

/// Hit notification: consume a life unless paused
pub fn handle_hit(state: &mut GameState, id: ObstacleId) -> Option<HitOutcome> {
    if state.paused {
        return None;
    }

    let outcome = state.lives.register_hit();
    match outcome {
        HitOutcome::LifeLost { remaining } => {
            log::info!("hit by obstacle {id}, {remaining} lives left");
        }
        HitOutcome::Depleted { restored } => {
            log::info!("hit by obstacle {id}, all lives lost, restored to {restored}");
        }
    }
    state.events.push(GameEvent::Hit { id, outcome });
    state.events.push(GameEvent::LivesChanged {
        lives: state.lives.remaining(),
        max: state.lives.max(),
    });
    Some(outcome)
}

/// Move an obstacle to a terminal state and drop it from the active set
fn retire(state: &mut GameState, id: ObstacleId, terminal: ObstacleState) {
    if let Some(mut obstacle) = state.obstacles.remove(&id) {
        obstacle.state = terminal;
        state.events.push(GameEvent::ObstacleRemoved {
            id,
            state: obstacle.state,
        });
    }
}
