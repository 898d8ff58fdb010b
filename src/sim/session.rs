//! Play session: timer-driven update loop with pause/resume
//!
//! The host feeds a monotonic clock into [`Session::advance`]. Every due task
//! runs in deadline order and sees its own deadline as "now", so a session
//! driven by a manual clock is fully reproducible.

use super::lane::Layout;
use super::scheduler::{TimerId, TimerQueue};
use super::state::{GameEvent, GameState, LaneCommand, ObstacleId, ObstacleState};
use super::tick::{fall_tick, spawn_obstacle};
use crate::Millis;
use crate::error::{SessionError, TuningError};
use crate::tuning::Tuning;

/// Scheduled task kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Periodic spawner firing
    Spawn,
    /// One obstacle's fall tick
    Fall(ObstacleId),
}

/// Spawner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnerState {
    /// Layout not ready, nothing armed
    Idle,
    Active,
    Suspended,
}

pub struct Session {
    pub state: GameState,
    timers: TimerQueue<Task>,
    spawn_timer: Option<TimerId>,
    spawner: SpawnerState,
    /// Whether the spawner has fired at least once this session
    spawned_once: bool,
    clock: Millis,
    paused_at: Option<Millis>,
}

impl Session {
    /// Create a session, rejecting tuning the scheduler cannot run with
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(tuning, seed),
            timers: TimerQueue::new(),
            spawn_timer: None,
            spawner: SpawnerState::Idle,
            spawned_once: false,
            clock: 0,
            paused_at: None,
        })
    }

    /// Current simulation time
    #[inline]
    pub fn clock(&self) -> Millis {
        self.clock
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    #[inline]
    pub fn spawner_state(&self) -> SpawnerState {
        self.spawner
    }

    /// Number of pending tasks (spawn timer plus fall ticks)
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// One-time layout-ready signal: position the ship and start spawning
    pub fn on_layout_ready(&mut self, layout: Layout, now: Millis) -> Result<(), SessionError> {
        if self.state.grid.is_some() {
            return Err(SessionError::LayoutAlreadyDelivered);
        }
        if !(layout.container.x > 0.0 && layout.container.y > 0.0) {
            return Err(SessionError::UnmeasuredLayout {
                width: layout.container.x,
                height: layout.container.y,
            });
        }
        if !(layout.ship_size.x > 0.0 && layout.ship_size.y > 0.0) {
            return Err(SessionError::UnmeasuredShip {
                width: layout.ship_size.x,
                height: layout.ship_size.y,
            });
        }

        self.advance(now);
        self.state.apply_layout(&layout);
        self.state.notify_ship_moved();
        self.state.events.push(GameEvent::LivesChanged {
            lives: self.state.lives.remaining(),
            max: self.state.lives.max(),
        });
        log::info!(
            "layout ready: {}x{}, {} lanes",
            layout.container.x,
            layout.container.y,
            self.state.tuning.lane_count
        );

        if self.state.paused {
            self.spawner = SpawnerState::Suspended;
        } else {
            // First spawn fires immediately
            self.arm_spawner(0);
        }
        Ok(())
    }

    /// Consume a lane-change input at `now`
    pub fn lane_command(&mut self, command: LaneCommand, now: Millis) -> bool {
        self.advance(now);
        self.state.apply_lane_command(command)
    }

    /// Pause: freeze evaluation and cancel the pending spawn
    pub fn pause(&mut self, now: Millis) {
        self.advance(now);
        if self.state.paused {
            return;
        }
        self.state.paused = true;
        self.paused_at = Some(self.clock);
        if let Some(id) = self.spawn_timer.take() {
            self.timers.cancel(id);
        }
        if self.spawner == SpawnerState::Active {
            self.spawner = SpawnerState::Suspended;
        }
        self.state.events.push(GameEvent::Paused);
        log::info!("paused at {}ms", self.clock);
    }

    /// Resume: re-arm the spawner one full period from now, or immediately if
    /// it has never fired
    pub fn resume(&mut self, now: Millis) {
        self.advance(now);
        if !self.state.paused {
            return;
        }
        self.state.paused = false;

        if let Some(paused_at) = self.paused_at.take() {
            if self.state.tuning.freeze_fall_clock_on_pause {
                let paused_for = self.clock - paused_at;
                for obstacle in self.state.obstacles.values_mut() {
                    obstacle.spawned_at += paused_for;
                }
            }
        }

        if self.spawner == SpawnerState::Suspended {
            let delay = if self.spawned_once {
                self.state.tuning.spawn_period_ms
            } else {
                0
            };
            self.arm_spawner(delay);
        }
        self.state.events.push(GameEvent::Resumed);
        log::info!("resumed at {}ms", self.clock);
    }

    /// Host suspend hook
    #[inline]
    pub fn on_suspend(&mut self, now: Millis) {
        self.pause(now);
    }

    /// Host foreground hook
    #[inline]
    pub fn on_foreground(&mut self, now: Millis) {
        self.resume(now);
    }

    /// Run every task due at or before `now`
    pub fn advance(&mut self, now: Millis) {
        let now = now.max(self.clock);
        while let Some((deadline, id, task)) = self.timers.pop_due(now) {
            self.clock = deadline;
            match task {
                Task::Spawn => self.run_spawn(id),
                Task::Fall(obstacle) => self.run_fall(obstacle),
            }
        }
        self.clock = now;
    }

    /// End the session: drop every pending task and active obstacle
    pub fn teardown(&mut self, now: Millis) {
        self.advance(now);
        self.timers.clear();
        self.spawn_timer = None;
        self.spawner = SpawnerState::Idle;
        let ids: Vec<ObstacleId> = self.state.obstacles.keys().copied().collect();
        for id in ids {
            self.state.obstacles.remove(&id);
            self.state.events.push(GameEvent::ObstacleRemoved {
                id,
                state: ObstacleState::Falling,
            });
        }
        log::info!("session torn down at {}ms", self.clock);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn arm_spawner(&mut self, delay: Millis) {
        if let Some(id) = self.spawn_timer.take() {
            self.timers.cancel(id);
        }
        self.spawn_timer = Some(self.timers.post(self.clock, delay, Task::Spawn));
        self.spawner = SpawnerState::Active;
    }

    fn run_spawn(&mut self, id: TimerId) {
        if self.spawn_timer == Some(id) {
            self.spawn_timer = None;
        }
        if self.state.paused {
            return;
        }
        self.spawned_once = true;
        if let Some(obstacle) = spawn_obstacle(&mut self.state, self.clock) {
            // First fall tick evaluates the spawn instant
            self.timers.post(self.clock, 0, Task::Fall(obstacle));
        }
        self.arm_spawner(self.state.tuning.spawn_period_ms);
    }

    fn run_fall(&mut self, obstacle: ObstacleId) {
        let outcome = fall_tick(&mut self.state, obstacle, self.clock);
        if outcome.reschedule() {
            self.timers.post(
                self.clock,
                self.state.tuning.tick_period_ms,
                Task::Fall(obstacle),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lives::HitOutcome;

    fn layout() -> Layout {
        Layout::new(900.0, 1600.0, 200.0, 200.0)
    }

    fn started(tuning: Tuning) -> Session {
        let mut session = Session::new(tuning, 42).unwrap();
        session.on_layout_ready(layout(), 0).unwrap();
        session
    }

    fn spawned_ids(events: &[GameEvent]) -> Vec<ObstacleId> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ObstacleSpawned { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_nothing_runs_before_layout() {
        let mut session = Session::new(Tuning::default(), 1).unwrap();
        session.advance(10_000);
        assert_eq!(session.pending_tasks(), 0);
        assert!(session.state.obstacles.is_empty());
        assert_eq!(session.spawner_state(), SpawnerState::Idle);
        // Resume before layout arms nothing
        session.pause(10_000);
        session.resume(10_100);
        assert_eq!(session.pending_tasks(), 0);
    }

    #[test]
    fn test_unmeasured_layout_defers_start() {
        let mut session = Session::new(Tuning::default(), 1).unwrap();
        let err = session
            .on_layout_ready(Layout::new(0.0, 0.0, 200.0, 200.0), 0)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::UnmeasuredLayout {
                width: 0.0,
                height: 0.0
            }
        );
        assert!(session.state.grid.is_none());
        assert_eq!(session.pending_tasks(), 0);
        session.on_layout_ready(layout(), 5).unwrap();
        assert_eq!(
            session.on_layout_ready(layout(), 6),
            Err(SessionError::LayoutAlreadyDelivered)
        );
    }

    #[test]
    fn test_spawns_every_period() {
        let mut session = started(Tuning::default());
        session.advance(0);
        assert_eq!(spawned_ids(&session.drain_events()).len(), 1);
        session.advance(1499);
        assert!(spawned_ids(&session.drain_events()).is_empty());
        session.advance(1500);
        assert_eq!(spawned_ids(&session.drain_events()).len(), 1);
        session.advance(4500);
        assert_eq!(spawned_ids(&session.drain_events()).len(), 2);
    }

    #[test]
    fn test_pause_freezes_spawning() {
        let mut session = started(Tuning::default());
        session.advance(100);
        session.drain_events();

        session.pause(200);
        session.advance(60_000);
        assert!(spawned_ids(&session.drain_events()).is_empty());

        // Resume re-arms a full period out, no replay of missed spawns
        session.resume(60_000);
        session.advance(61_499);
        assert!(spawned_ids(&session.drain_events()).is_empty());
        session.advance(61_500);
        assert_eq!(spawned_ids(&session.drain_events()).len(), 1);
    }

    #[test]
    fn test_repeated_resume_keeps_one_spawn_chain() {
        let mut session = started(Tuning::default());
        session.pause(100);
        session.resume(200);
        session.resume(300);
        session.resume(400);
        session.drain_events();
        session.advance(200 + 1500 * 4);
        assert_eq!(spawned_ids(&session.drain_events()).len(), 4);
    }

    #[test]
    fn test_three_hits_then_reset() {
        // Keep the ship under the oldest (lowest) obstacle so each one hits
        let mut session = started(Tuning::default());
        let mut lives_seen = Vec::new();
        let mut now = 0;
        while lives_seen.len() < 3 && now < 60_000 {
            now += 10;
            session.advance(now);
            for event in session.drain_events() {
                if let GameEvent::Hit { outcome, .. } = event {
                    lives_seen.push(outcome.lives_after());
                }
            }
            if let Some(lane) = session.state.obstacles.values().next().map(|o| o.lane) {
                if session.state.ship.move_to(lane as i32, 3) {
                    session.state.notify_ship_moved();
                }
            }
        }
        assert_eq!(lives_seen, vec![2, 1, 3]);
        assert_eq!(session.state.lives.remaining(), 3);
    }

    #[test]
    fn test_every_obstacle_resolves_once() {
        let mut session = started(Tuning::default());
        let mut removed = std::collections::HashMap::new();
        let mut spawned = Vec::new();
        for step in 1..=3000 {
            let now = step * 10;
            if step % 37 == 0 {
                let command = if step % 74 == 0 {
                    LaneCommand::Increment
                } else {
                    LaneCommand::Decrement
                };
                session.lane_command(command, now);
            }
            session.advance(now);
            for event in session.drain_events() {
                match event {
                    GameEvent::ObstacleSpawned { id, .. } => spawned.push(id),
                    GameEvent::ObstacleRemoved { id, state } => {
                        assert!(!session.state.obstacles.contains_key(&id));
                        assert!(
                            removed.insert(id, state).is_none(),
                            "obstacle {id} resolved twice"
                        );
                    }
                    _ => {}
                }
            }
        }
        assert!(!spawned.is_empty());
        for id in &spawned {
            match removed.get(id) {
                Some(state) => {
                    assert!(matches!(state, ObstacleState::Hit | ObstacleState::Expired))
                }
                None => assert!(session.state.obstacles.contains_key(id)),
            }
        }
        for obstacle in session.state.obstacles.values() {
            assert_eq!(obstacle.state, ObstacleState::Falling);
        }
    }

    #[test]
    fn test_pause_resume_jumps_progress() {
        // Ship out of the way so the obstacle can only expire
        let mut session = started(Tuning::default());
        session.advance(0);
        let id = spawned_ids(&session.drain_events())[0];
        let lane = session.state.obstacles[&id].lane;
        let away = if lane == 0 { 2 } else { 0 };
        session.state.ship.move_to(away, 3);

        session.pause(200);
        let frozen_y = session.state.obstacles[&id].rect.min.y;
        session.advance(4999);
        // Frozen ticks keep polling but nothing moves or resolves
        assert_eq!(session.state.obstacles[&id].rect.min.y, frozen_y);
        assert!(session.state.obstacles.contains_key(&id));

        // Elapsed time is measured from spawn, so the paused interval counts:
        // the first evaluated tick after resume is already past the bottom.
        session.resume(5000);
        session.advance(5030);
        assert!(!session.state.obstacles.contains_key(&id));
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::ObstacleRemoved {
            id,
            state: ObstacleState::Expired
        }));
        // The jump is reported at the bottom edge, not below it
        let last_move = events
            .iter()
            .rev()
            .find_map(|e| match e {
                GameEvent::ObstacleMoved {
                    id: moved,
                    rect,
                    progress,
                } if *moved == id => Some((*rect, *progress)),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_move.1, 1.0);
        assert_eq!(last_move.0.min.y, 1600.0);
    }

    #[test]
    fn test_frozen_fall_clock_skips_paused_interval() {
        let tuning = Tuning {
            freeze_fall_clock_on_pause: true,
            ..Default::default()
        };
        let mut session = started(tuning);
        session.advance(0);
        let id = spawned_ids(&session.drain_events())[0];
        let lane = session.state.obstacles[&id].lane;
        session.state.ship.move_to(if lane == 0 { 2 } else { 0 }, 3);

        session.advance(180);
        session.pause(200);
        session.resume(5000);
        session.advance(5030);
        let obstacle = &session.state.obstacles[&id];
        // Only ~210ms of fall credited
        let progress = obstacle.progress_at(5030, 4000);
        assert!(progress < 0.1, "progress {progress}");
        assert_eq!(obstacle.spawned_at, 4800);
    }

    #[test]
    fn test_hit_outcome_events_carry_lives() {
        let mut session = started(Tuning::default());
        session.advance(0);
        let id = spawned_ids(&session.drain_events())[0];
        let lane = session.state.obstacles[&id].lane;
        session.state.ship.move_to(lane as i32, 3);
        session.advance(3500);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::Hit {
            id,
            outcome: HitOutcome::LifeLost { remaining: 2 }
        }));
        assert!(events.contains(&GameEvent::LivesChanged { lives: 2, max: 3 }));
    }

    #[test]
    fn test_lifecycle_hooks() {
        let mut session = started(Tuning::default());
        session.on_suspend(100);
        assert!(session.is_paused());
        assert_eq!(session.spawner_state(), SpawnerState::Suspended);
        session.on_foreground(200);
        assert!(!session.is_paused());
        assert_eq!(session.spawner_state(), SpawnerState::Active);
    }

    #[test]
    fn test_teardown_discards_everything() {
        let mut session = started(Tuning::default());
        session.advance(2000);
        let active: Vec<ObstacleId> = session.state.obstacles.keys().copied().collect();
        assert!(!active.is_empty());
        session.drain_events();

        session.teardown(2000);
        assert!(session.state.obstacles.is_empty());
        assert_eq!(session.pending_tasks(), 0);
        let removed: Vec<ObstacleId> = session
            .drain_events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::ObstacleRemoved {
                    id,
                    state: ObstacleState::Falling,
                } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(removed, active);

        session.advance(100_000);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_rejects_unusable_tuning() {
        let zero_tick = Tuning {
            tick_period_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(zero_tick, 1),
            Err(TuningError::ZeroPeriod {
                field: "tick_period_ms"
            })
        ));
        let no_lanes = Tuning {
            lane_count: 0,
            start_lane: 0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(no_lanes, 1),
            Err(TuningError::TooFewLanes { lane_count: 0 })
        ));
        let zero_spawn = Tuning {
            spawn_period_ms: 0,
            ..Default::default()
        };
        assert!(Session::new(zero_spawn, 1).is_err());
    }

    #[test]
    fn test_resume_before_first_spawn_spawns_immediately() {
        let mut session = Session::new(Tuning::default(), 7).unwrap();
        session.pause(0);
        session.on_layout_ready(layout(), 0).unwrap();
        assert_eq!(session.spawner_state(), SpawnerState::Suspended);
        session.resume(500);
        session.advance(500);
        let spawned = spawned_ids(&session.drain_events());
        assert_eq!(spawned.len(), 1);
        assert_eq!(session.state.obstacles[&spawned[0]].spawned_at, 500);
    }

    #[test]
    fn test_resume_after_spawning_waits_one_period() {
        let mut session = started(Tuning::default());
        session.advance(0);
        session.pause(100);
        session.drain_events();
        session.resume(1000);
        session.advance(2499);
        assert!(spawned_ids(&session.drain_events()).is_empty());
        session.advance(2500);
        assert_eq!(spawned_ids(&session.drain_events()).len(), 1);
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut session = Session::new(Tuning::default(), seed).unwrap();
            session.on_layout_ready(layout(), 0).unwrap();
            session.advance(30_000);
            session.drain_events()
        };
        assert_eq!(run(99_999), run(99_999));
    }
}
