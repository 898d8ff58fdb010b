//! Lane Dodge headless runner
//!
//! Drives a session with a manual clock, routing feedback to the log. Useful
//! for exercising tuning files without a rendering host.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lane_dodge::feedback::{Feedback, LogFeedback};
use lane_dodge::sim::{GameEvent, HitOutcome, LaneCommand, Layout, ObstacleState, Session};
use lane_dodge::{Millis, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "lane-dodge")]
#[command(about = "Run a headless lane-dodge session and report hits")]
struct Cli {
    /// RNG seed for lane draws
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Session length in milliseconds
    #[arg(long, default_value_t = 60_000)]
    duration_ms: Millis,
    /// Host frame step in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: Millis,
    #[arg(long, default_value_t = 900.0)]
    width: f32,
    #[arg(long, default_value_t = 1600.0)]
    height: f32,
    #[arg(long, default_value_t = 200.0)]
    ship_width: f32,
    #[arg(long, default_value_t = 200.0)]
    ship_height: f32,
    /// Gameplay tuning JSON
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Player settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Simulate a host suspend at this time
    #[arg(long)]
    pause_at: Option<Millis>,
    /// Simulate the host returning to the foreground at this time
    #[arg(long)]
    resume_at: Option<Millis>,
    /// Steer away from the lowest obstacle in the ship's lane
    #[arg(long)]
    autopilot: bool,
    /// Print every event as a JSON line
    #[arg(long)]
    events_json: bool,
}

#[derive(Debug, Default)]
struct Summary {
    spawned: u32,
    hits: u32,
    expired: u32,
    resets: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading tuning {}", path.display()))?;
            Tuning::from_json(&json).with_context(|| format!("loading {}", path.display()))?
        }
        None => Tuning::default(),
    };
    let settings = cli
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    log::info!("Lane Dodge (headless) starting, seed {}", cli.seed);

    let mut session = Session::new(tuning, cli.seed)?;
    let layout = Layout::new(cli.width, cli.height, cli.ship_width, cli.ship_height);
    session.on_layout_ready(layout, 0)?;

    let mut render = LogFeedback::default();
    let mut haptics = LogFeedback::default();
    let mut cue = LogFeedback::default();
    let mut notifier = LogFeedback::default();
    let mut summary = Summary::default();

    let frame_ms = cli.frame_ms.max(1);
    let mut pause_at = cli.pause_at;
    let mut resume_at = cli.resume_at;
    let mut now: Millis = 0;
    while now <= cli.duration_ms {
        if let Some(t) = pause_at.filter(|t| *t <= now) {
            session.on_suspend(t);
            pause_at = None;
        }
        if let Some(t) = resume_at.filter(|t| *t <= now && pause_at.is_none()) {
            session.on_foreground(t.max(session.clock()));
            resume_at = None;
        }
        if cli.autopilot && !session.is_paused() {
            if let Some(command) = steer(&session) {
                session.lane_command(command, now);
            }
        }

        session.advance(now);
        let events = session.drain_events();
        report(&events, &mut summary, cli.events_json)?;
        Feedback {
            render: &mut render,
            haptics: &mut haptics,
            cue: &mut cue,
            notifier: &mut notifier,
        }
        .dispatch(&events, &settings);

        now += frame_ms;
    }

    // Views still hold the obstacles that were falling at shutdown
    session.teardown(cli.duration_ms);
    let events = session.drain_events();
    report(&events, &mut summary, cli.events_json)?;
    Feedback {
        render: &mut render,
        haptics: &mut haptics,
        cue: &mut cue,
        notifier: &mut notifier,
    }
    .dispatch(&events, &settings);

    log::info!(
        "done: {} spawned, {} hits, {} expired, {} resets, {} lives left",
        summary.spawned,
        summary.hits,
        summary.expired,
        summary.resets,
        session.state.lives.remaining()
    );
    Ok(())
}

/// Tally a batch of events and optionally echo them as JSON lines
fn report(events: &[GameEvent], summary: &mut Summary, echo_json: bool) -> Result<()> {
    for event in events {
        match event {
            GameEvent::ObstacleSpawned { .. } => summary.spawned += 1,
            GameEvent::ObstacleRemoved { state, .. } => match state {
                ObstacleState::Hit => summary.hits += 1,
                ObstacleState::Expired => summary.expired += 1,
                ObstacleState::Falling => {}
            },
            GameEvent::Hit {
                outcome: HitOutcome::Depleted { .. },
                ..
            } => summary.resets += 1,
            _ => {}
        }
        if echo_json {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    Ok(())
}

/// Move one lane away if the lowest obstacle in the ship's lane is getting close
fn steer(session: &Session) -> Option<LaneCommand> {
    let state = &session.state;
    let lane_count = state.tuning.lane_count;
    let fall = state.tuning.fall_duration_ms;
    let now = session.clock();

    let danger = |lane: u8| -> f32 {
        state
            .obstacles
            .values()
            .filter(|o| o.lane == lane)
            .map(|o| o.progress_at(now, fall))
            .filter(|p| *p < 1.0)
            .fold(0.0, f32::max)
    };

    let current = state.ship.lane();
    if danger(current) < 0.45 {
        return None;
    }
    let left = current.checked_sub(1).map(|l| (l, danger(l)));
    let right = (current + 1 < lane_count).then(|| (current + 1, danger(current + 1)));
    match (left, right) {
        (Some((_, l)), Some((_, r))) if l <= r => Some(LaneCommand::Decrement),
        (Some(_), Some(_)) => Some(LaneCommand::Increment),
        (Some(_), None) => Some(LaneCommand::Decrement),
        (None, Some(_)) => Some(LaneCommand::Increment),
        (None, None) => None,
    }
}
