//! The perpetual lane task: intent application, tick pacing, notify
//! timer, and the blink mode.
//!
//! Portable and caller-paced, without async or platform timers: the
//! owning task calls [`LaneScheduler::tick`] with the current instant
//! and sleeps for the returned duration.
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler = LaneScheduler::new(surface, sink, store, receiver, &CONFIG_CELL)?;
//!
//! loop {
//!     let result = scheduler.tick(Instant::now());
//!     Timer::after(result.sleep).await;
//! }
//! ```

use embassy_time::{Duration, Instant};
use log::{debug, warn};

use crate::intent::{Geometry, IntentReceiver, LaneIntent};
use crate::motion::{LaneConfig, LaneParams, LaneStatus, MotionState, advance};
use crate::proto::notify::{NOTIFY_LEN, StateNotify};
use crate::render::LaneRenderer;
use crate::settings::{SettingsStore, persist_color, persist_geometry};
use crate::snapshot::ConfigCell;
use crate::track::TrackTable;
use crate::{LaneSurface, NotifySink, SurfaceError};

/// Fixed period of the state-notify timer.
pub const NOTIFY_PERIOD: Duration = Duration::from_millis(500);

/// Marker alternation interval in blink mode.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Idle sleep while stopped.
pub const HALT_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one scheduler iteration.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// How long the caller should wait before the next iteration.
    /// Zero when the tick overran its budget.
    pub sleep: Duration,
}

/// Single owner of the lane's motion state, config, params, and track
/// table. Everything external arrives through the intent queue.
pub struct LaneScheduler<'a, S, N, P, const INTENTS: usize>
where
    S: LaneSurface,
    N: NotifySink,
    P: SettingsStore,
{
    surface: S,
    sink: N,
    store: P,
    intents: IntentReceiver<'a, INTENTS>,
    config_view: &'a ConfigCell,
    renderer: LaneRenderer,

    state: MotionState,
    cfg: LaneConfig,
    params: LaneParams,
    tracks: TrackTable,

    next_tick: Instant,
    notify_deadline: Option<Instant>,
    blink_deadline: Instant,
    blink_lit: bool,
}

impl<'a, S, N, P, const INTENTS: usize> LaneScheduler<'a, S, N, P, INTENTS>
where
    S: LaneSurface,
    N: NotifySink,
    P: SettingsStore,
{
    /// Build the engine: load persisted settings, size the surface, and
    /// publish the initial config snapshot.
    ///
    /// A surface that cannot be sized at startup is fatal.
    pub fn new(
        mut surface: S,
        sink: N,
        mut store: P,
        intents: IntentReceiver<'a, INTENTS>,
        config_view: &'a ConfigCell,
    ) -> Result<Self, SurfaceError> {
        let cfg = crate::settings::load_config(&mut store);
        surface.set_length(cfg.line_leds)?;
        config_view.set(cfg);
        Ok(Self {
            surface,
            sink,
            store,
            intents,
            config_view,
            renderer: LaneRenderer,
            state: MotionState::default(),
            cfg,
            params: LaneParams::default(),
            tracks: TrackTable::new(),
            next_tick: Instant::from_millis(0),
            notify_deadline: None,
            blink_deadline: Instant::from_millis(0),
            blink_lit: false,
        })
    }

    /// Run one scheduler iteration at `now`.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        self.apply_intents();

        match self.params.status {
            LaneStatus::Forward | LaneStatus::Backward => self.tick_motion(now),
            LaneStatus::Stop => self.tick_stopped(now),
            LaneStatus::Blink => self.tick_blink(now),
        }
    }

    /// Current motion state snapshot.
    pub const fn state(&self) -> &MotionState {
        &self.state
    }

    /// Currently applied configuration.
    pub const fn config(&self) -> &LaneConfig {
        &self.cfg
    }

    /// The configured pace tracks.
    pub const fn tracks(&self) -> &TrackTable {
        &self.tracks
    }

    fn tick_motion(&mut self, now: Instant) -> TickResult {
        let budget = self.tick_budget();

        // Skip the backlog after a stall instead of bursting to catch up.
        let max_drift_ms = budget.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift_ms {
            self.next_tick = now;
        }

        self.state = advance(&self.state, &self.cfg, &mut self.params);
        self.renderer.render(&self.state, &self.cfg, &mut self.surface);
        self.run_notify_timer(now);

        self.next_tick += budget;
        let sleep = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            warn!(
                "tick overran its {}ms budget",
                budget.as_millis()
            );
            Duration::from_millis(0)
        };
        TickResult { sleep }
    }

    fn tick_stopped(&mut self, now: Instant) -> TickResult {
        self.notify_deadline = None;
        // Dark the strip once on entry; later halt iterations leave the
        // surface alone.
        if self.state.status != LaneStatus::Stop {
            self.state = MotionState::default();
            self.renderer.render(&self.state, &self.cfg, &mut self.surface);
        }
        self.next_tick = now;
        TickResult {
            sleep: HALT_INTERVAL,
        }
    }

    fn tick_blink(&mut self, now: Instant) -> TickResult {
        self.notify_deadline = None;
        if self.state.status != LaneStatus::Blink {
            self.state = MotionState {
                status: LaneStatus::Blink,
                ..MotionState::default()
            };
            self.blink_deadline = now;
            self.blink_lit = false;
        }
        if now.as_millis() >= self.blink_deadline.as_millis() {
            self.blink_lit = !self.blink_lit;
            self.renderer
                .render_markers(&self.cfg, self.blink_lit, &mut self.surface);
            self.blink_deadline = now + BLINK_INTERVAL;
        }
        self.next_tick = now;
        TickResult {
            sleep: Duration::from_millis(
                self.blink_deadline.as_millis() - now.as_millis(),
            ),
        }
    }

    /// The notify timer fires on its fixed period whenever the lane is
    /// moving, whether or not the state changed since the last firing.
    fn run_notify_timer(&mut self, now: Instant) {
        let deadline = *self
            .notify_deadline
            .get_or_insert(now + NOTIFY_PERIOD);
        if now.as_millis() < deadline.as_millis() {
            return;
        }
        let payload = StateNotify::from_state(&self.state);
        let mut buf = [0u8; NOTIFY_LEN];
        if let Ok(len) = payload.encode(&mut buf) {
            self.sink.push(&buf[..len]);
        }
        // Rebase after a stall so missed firings are skipped, not burst.
        let mut next = deadline + NOTIFY_PERIOD;
        if next.as_millis() <= now.as_millis() {
            next = now + NOTIFY_PERIOD;
        }
        self.notify_deadline = Some(next);
    }

    fn apply_intents(&mut self) {
        while let Ok(intent) = self.intents.try_receive() {
            match intent {
                LaneIntent::SetSpeed(speed) => self.params.speed = speed,
                LaneIntent::SetStatus(status) => self.params.status = status,
                LaneIntent::SetColor(color) => {
                    self.cfg.color = color;
                    persist_color(&mut self.store, &self.cfg);
                    self.config_view.set(self.cfg);
                    debug!("color changed");
                }
                LaneIntent::SetGeometry(geometry) => self.apply_geometry(&geometry),
                LaneIntent::ReplaceTracks(tracks) => {
                    debug!("track table replaced, {} tracks", tracks.len());
                    self.tracks = tracks;
                }
            }
        }
    }

    /// Geometry applies only while stopped: a moving comet would be left
    /// referencing a range that no longer exists.
    fn apply_geometry(&mut self, geometry: &Geometry) {
        if self.state.status != LaneStatus::Stop {
            warn!(
                "geometry write rejected while {:?}",
                self.state.status
            );
            return;
        }
        if self.surface.set_length(geometry.line_leds).is_err() {
            warn!("surface resize to {} LEDs failed", geometry.line_leds);
            return;
        }
        self.cfg.line_length = geometry.line_length;
        self.cfg.active_length = geometry.active_length;
        self.cfg.total_length = geometry.total_length;
        self.cfg.line_leds = geometry.line_leds;
        persist_geometry(&mut self.store, geometry);
        self.config_view.set(self.cfg);
        debug!("geometry changed");
    }

    fn tick_budget(&self) -> Duration {
        let fps = u64::from(self.cfg.fps.max(1));
        Duration::from_micros(1_000_000 / fps)
    }
}
