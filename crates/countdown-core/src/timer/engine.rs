//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no threads: it arms and
//! disarms its [`TickSource`], and the owner forwards each firing to `tick()`.
//! One tick is one second off the counter, whatever the actual delay between
//! firings was.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |           |
//!           +-> Idle <--+   (cancel, or the tick after reaching zero)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(IntervalTicks::new());
//! engine.set_selection(DurationSelection::new(0, 5, 0)?);
//! engine.start();
//! loop {
//!     engine.ticks_mut().fired().await;
//!     if let Some(event) = engine.tick() { /* re-render */ }
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::clock::{Clock, SystemClock};
use super::command::TimerCommand;
use super::selection::{DurationSelection, HOURS_RANGE, MINUTES_RANGE, SECONDS_RANGE};
use super::tick::{TickSource, TICK_PERIOD};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// No countdown active, selectors editable.
    Idle,
    Running,
    /// Counter frozen, tick source stopped, selectors locked.
    Paused,
}

/// The state-dependent control shown next to Cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Start,
    Pause,
    Resume,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            PrimaryAction::Start => "Start",
            PrimaryAction::Pause => "Pause",
            PrimaryAction::Resume => "Resume",
        }
    }

    pub fn command(&self) -> TimerCommand {
        match self {
            PrimaryAction::Start => TimerCommand::Start,
            PrimaryAction::Pause => TimerCommand::Pause,
            PrimaryAction::Resume => TimerCommand::Resume,
        }
    }
}

impl TimerState {
    pub fn primary_action(&self) -> PrimaryAction {
        match self {
            TimerState::Idle => PrimaryAction::Start,
            TimerState::Running => PrimaryAction::Pause,
            TimerState::Paused => PrimaryAction::Resume,
        }
    }

    pub fn can_cancel(&self) -> bool {
        *self != TimerState::Idle
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        };
        f.write_str(name)
    }
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&Event) + Send>;

/// Core countdown engine.
///
/// Commands that do not apply to the current state return `None` and leave
/// the engine untouched.
pub struct CountdownEngine<T: TickSource> {
    selection: DurationSelection,
    state: TimerState,
    remaining_secs: u64,
    /// Duration captured when the current run started. Denominator for progress.
    run_total_secs: u64,
    progress: f64,
    completes_at: Option<DateTime<Utc>>,
    ticks: T,
    clock: Box<dyn Clock>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<T: TickSource> CountdownEngine<T> {
    /// Create an idle engine with the default selection, using the wall clock.
    pub fn new(ticks: T) -> Self {
        Self::with_clock(ticks, SystemClock)
    }

    pub fn with_clock(ticks: T, clock: impl Clock + 'static) -> Self {
        Self {
            selection: DurationSelection::default(),
            state: TimerState::Idle,
            remaining_secs: 0,
            run_total_secs: 0,
            progress: 0.0,
            completes_at: None,
            ticks,
            clock: Box::new(clock),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn selection(&self) -> DurationSelection {
        self.selection
    }

    /// Duration the selectors currently describe.
    pub fn configured_secs(&self) -> u64 {
        self.selection.total_secs()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn run_total_secs(&self) -> u64 {
        self.run_total_secs
    }

    /// Remaining over run total, as of the last tick or command.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress clamped to 1.0 for drawing the ring.
    pub fn display_progress(&self) -> f64 {
        self.progress.clamp(0.0, 1.0)
    }

    pub fn completes_at(&self) -> Option<DateTime<Utc>> {
        self.completes_at
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let total_secs = match self.state {
            TimerState::Idle => self.configured_secs(),
            _ => self.run_total_secs,
        };
        Event::StateSnapshot {
            state: self.state,
            selection: self.selection,
            remaining_secs: self.remaining_secs,
            total_secs,
            progress: self.display_progress(),
            completes_at: self.completes_at,
            at: self.clock.now(),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a listener called synchronously with every emitted event.
    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + Send + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state != TimerState::Idle {
            warn!(state = %self.state, "start ignored");
            return None;
        }

        let duration = self.selection.total_secs();
        self.run_total_secs = duration;
        if duration == 0 {
            debug!("zero duration selected, completing immediately");
            self.remaining_secs = 0;
            self.progress = 0.0;
            return self.emit(Event::TimerCompleted {
                duration_secs: 0,
                at: self.clock.now(),
            });
        }

        self.remaining_secs = duration;
        self.progress = 1.0;
        let completes_at = self.project_completion();
        self.state = TimerState::Running;
        self.ticks.start(TICK_PERIOD);
        debug!(duration_secs = duration, %completes_at, "countdown started");
        self.emit(Event::TimerStarted {
            duration_secs: duration,
            completes_at,
            at: self.clock.now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            warn!(state = %self.state, "pause ignored");
            return None;
        }
        self.ticks.stop();
        self.state = TimerState::Paused;
        debug!(remaining_secs = self.remaining_secs, "countdown paused");
        self.emit(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: self.clock.now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            warn!(state = %self.state, "resume ignored");
            return None;
        }
        let completes_at = self.project_completion();
        self.state = TimerState::Running;
        self.ticks.start(TICK_PERIOD);
        debug!(remaining_secs = self.remaining_secs, %completes_at, "countdown resumed");
        self.emit(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            completes_at,
            at: self.clock.now(),
        })
    }

    pub fn cancel(&mut self) -> Option<Event> {
        if self.state == TimerState::Idle {
            return None;
        }
        let remaining_secs = self.remaining_secs;
        self.return_to_idle();
        debug!(remaining_secs, "countdown cancelled");
        self.emit(Event::TimerCancelled {
            remaining_secs,
            at: self.clock.now(),
        })
    }

    /// Deliver one firing of the tick source.
    ///
    /// Takes one second off the counter. The firing after the counter shows
    /// zero finishes the run, so the `00:00:00` frame is always rendered.
    /// Outside `Running` the firing is dropped.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            trace!(state = %self.state, "tick dropped");
            return None;
        }

        if self.remaining_secs == 0 {
            let duration_secs = self.run_total_secs;
            self.return_to_idle();
            debug!(duration_secs, "countdown completed");
            return self.emit(Event::TimerCompleted {
                duration_secs,
                at: self.clock.now(),
            });
        }

        self.remaining_secs -= 1;
        self.progress = self.remaining_secs as f64 / self.run_total_secs as f64;
        trace!(remaining_secs = self.remaining_secs, progress = self.progress, "tick");
        self.emit(Event::TimerTicked {
            remaining_secs: self.remaining_secs,
            progress: self.progress,
            at: self.clock.now(),
        })
    }

    pub fn set_hours(&mut self, hours: u8) -> Option<Event> {
        if !HOURS_RANGE.contains(&hours) {
            warn!(hours, "hours out of range");
            return None;
        }
        self.set_selection(DurationSelection {
            hours,
            ..self.selection
        })
    }

    pub fn set_minutes(&mut self, minutes: u8) -> Option<Event> {
        if !MINUTES_RANGE.contains(&minutes) {
            warn!(minutes, "minutes out of range");
            return None;
        }
        self.set_selection(DurationSelection {
            minutes,
            ..self.selection
        })
    }

    pub fn set_seconds(&mut self, seconds: u8) -> Option<Event> {
        if !SECONDS_RANGE.contains(&seconds) {
            warn!(seconds, "seconds out of range");
            return None;
        }
        self.set_selection(DurationSelection {
            seconds,
            ..self.selection
        })
    }

    /// Replace the whole selection. Only allowed while idle.
    pub fn set_selection(&mut self, selection: DurationSelection) -> Option<Event> {
        if self.state != TimerState::Idle {
            warn!(state = %self.state, "selectors are locked while a countdown is active");
            return None;
        }
        let selection =
            match DurationSelection::new(selection.hours, selection.minutes, selection.seconds) {
                Ok(selection) => selection,
                Err(e) => {
                    warn!("selection rejected: {e}");
                    return None;
                }
            };
        self.selection = selection;
        self.emit(Event::SelectionChanged {
            selection,
            duration_secs: selection.total_secs(),
            at: self.clock.now(),
        })
    }

    pub fn apply(&mut self, command: TimerCommand) -> Option<Event> {
        match command {
            TimerCommand::Start => self.start(),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Resume => self.resume(),
            TimerCommand::Cancel => self.cancel(),
            TimerCommand::SetHours(h) => self.set_hours(h),
            TimerCommand::SetMinutes(m) => self.set_minutes(m),
            TimerCommand::SetSeconds(s) => self.set_seconds(s),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn project_completion(&mut self) -> DateTime<Utc> {
        let at = self.clock.now() + Duration::seconds(self.remaining_secs as i64);
        self.completes_at = Some(at);
        at
    }

    fn return_to_idle(&mut self) {
        self.ticks.stop();
        self.state = TimerState::Idle;
        self.remaining_secs = 0;
        self.progress = 0.0;
    }

    fn emit(&mut self, event: Event) -> Option<Event> {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
        Some(event)
    }
}

impl<T: TickSource> Drop for CountdownEngine<T> {
    fn drop(&mut self) {
        if self.ticks.is_active() {
            self.ticks.stop();
        }
    }
}

impl<T: TickSource + fmt::Debug> fmt::Debug for CountdownEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("selection", &self.selection)
            .field("state", &self.state)
            .field("remaining_secs", &self.remaining_secs)
            .field("run_total_secs", &self.run_total_secs)
            .field("progress", &self.progress)
            .field("completes_at", &self.completes_at)
            .field("ticks", &self.ticks)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
