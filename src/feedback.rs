//! Feedback routing
//!
//! The simulation only emits [`GameEvent`]s. Hosts implement these traits for
//! their rendering layer and devices, then call [`Feedback::dispatch`] with the
//! drained events once per frame.

use crate::Millis;
use crate::settings::Settings;
use crate::sim::lives::icon_alphas;
use crate::sim::{GameEvent, ObstacleId, Rect};

/// Rendering sink for ship, obstacles and the lives indicator
pub trait RenderSink {
    fn ship_moved(&mut self, lane: u8, rect: Rect);
    fn obstacle_added(&mut self, id: ObstacleId, rect: Rect);
    fn obstacle_moved(&mut self, id: ObstacleId, rect: Rect);
    fn obstacle_removed(&mut self, id: ObstacleId);
    /// One alpha per life icon: 1.0 while held, dimmed once lost
    fn lives_changed(&mut self, icon_alphas: &[f32]);
}

/// Vibration motor
pub trait Haptics {
    /// Fixed-length pulse at default intensity
    fn pulse(&mut self, duration_ms: Millis);
}

/// Hit sound
pub trait HitCue {
    /// Play from the beginning, restarting if already playing
    fn restart(&mut self, volume: f32);
}

/// Short on-screen messages
pub trait Notifier {
    fn show(&mut self, message: &str);
}

/// Borrowed set of collaborators
pub struct Feedback<'a> {
    pub render: &'a mut dyn RenderSink,
    pub haptics: &'a mut dyn Haptics,
    pub cue: &'a mut dyn HitCue,
    pub notifier: &'a mut dyn Notifier,
}

impl Feedback<'_> {
    /// Route events to the collaborators
    pub fn dispatch(&mut self, events: &[GameEvent], settings: &Settings) {
        for event in events {
            match event {
                GameEvent::ShipMoved { lane, rect } => self.render.ship_moved(*lane, *rect),
                GameEvent::ObstacleSpawned { id, rect, .. } => {
                    self.render.obstacle_added(*id, *rect)
                }
                GameEvent::ObstacleMoved { id, rect, .. } => self.render.obstacle_moved(*id, *rect),
                GameEvent::ObstacleRemoved { id, .. } => self.render.obstacle_removed(*id),
                GameEvent::Hit { outcome, .. } => {
                    if settings.haptics {
                        self.haptics.pulse(settings.haptic_pulse_ms);
                    }
                    let volume = settings.effective_volume();
                    if volume > 0.0 {
                        self.cue.restart(volume);
                    }
                    if settings.show_messages {
                        self.notifier.show(&outcome.message());
                    }
                }
                GameEvent::LivesChanged { lives, max } => {
                    self.render.lives_changed(&icon_alphas(*lives, *max));
                }
                GameEvent::Paused | GameEvent::Resumed => {}
            }
        }
    }
}

/// Collaborator that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogFeedback {
    pub pulses: u32,
    pub cues: u32,
}

impl RenderSink for LogFeedback {
    fn ship_moved(&mut self, lane: u8, rect: Rect) {
        log::debug!("ship -> lane {lane} at ({}, {})", rect.min.x, rect.min.y);
    }

    fn obstacle_added(&mut self, id: ObstacleId, _rect: Rect) {
        log::trace!("obstacle {id} added");
    }

    fn obstacle_moved(&mut self, _id: ObstacleId, _rect: Rect) {}

    fn obstacle_removed(&mut self, id: ObstacleId) {
        log::trace!("obstacle {id} removed");
    }

    fn lives_changed(&mut self, icon_alphas: &[f32]) {
        log::debug!("lives indicator {icon_alphas:?}");
    }
}

impl Haptics for LogFeedback {
    fn pulse(&mut self, duration_ms: Millis) {
        self.pulses += 1;
        log::debug!("haptic pulse {duration_ms}ms");
    }
}

impl HitCue for LogFeedback {
    fn restart(&mut self, volume: f32) {
        self.cues += 1;
        log::debug!("hit cue at volume {volume:.2}");
    }
}

impl Notifier for LogFeedback {
    fn show(&mut self, message: &str) {
        log::info!("{message}");
    }
}
