//! Countdown timer controller.
//!
//! The timer is either [`Idle`](TimerState::Idle), waiting to be armed, or
//! [`Running`](TimerState::Running) with a whole number of seconds left.
//! Arming it with a nonzero duration starts a chain of [`TickMsg`]s, one per
//! `interval`. Each tick takes one second off the countdown, and the tick
//! that reaches zero returns the timer to `Idle` and emits a [`FinishedMsg`].
//!
//! ```text
//! Idle        --arm(d > 0)--> Running(d)
//! Idle        --arm(0)------> Idle
//! Running(d)  --tick--------> Running(d - 1)   while d > 1
//! Running(1)  --tick--------> Idle
//! Running(_)  --cancel------> Idle
//! ```
//!
//! # Basic Usage
//!
//! ```rust
//! use square_countdown::timer::{new, TimerState, Countdown};
//!
//! let mut timer = new();
//! assert_eq!(timer.state(), TimerState::Idle);
//!
//! // Zero seconds does not start anything.
//! assert!(timer.arm(0, 0, 0).is_none());
//! assert_eq!(timer.state(), TimerState::Idle);
//!
//! let _tick = timer.arm(0, 1, 30).expect("nonzero duration starts ticking");
//! assert_eq!(timer.state(), TimerState::Running(Countdown::from_secs(90)));
//! assert_eq!(timer.view(), "00 : 01 : 30");
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use square_countdown::timer::{new, FinishedMsg, Model};
//!
//! struct App {
//!     timer: Model,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = new();
//!         let cmd = timer.arm(0, 0, 10);
//!         (Self { timer }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(finished) = msg.downcast_ref::<FinishedMsg>() {
//!             if finished.id == self.timer.id() {
//!                 return Some(bubbletea_rs::quit());
//!             }
//!         }
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.timer.view()
//!     }
//! }
//! ```
//!
//! # Timing
//!
//! Every tick is scheduled `interval` after the previous tick was processed,
//! not against an absolute deadline. Scheduling jitter therefore accumulates
//! and the countdown runs slightly slow over long durations. The interval
//! governs refresh smoothness only.

use crate::config::{Config, RearmPolicy, DEFAULT_TICK_INTERVAL};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

const SECS_PER_MINUTE: u32 = 60;
const SECS_PER_HOUR: u32 = 60 * SECS_PER_MINUTE;

/// A non-negative number of whole seconds.
///
/// The display components are derived, never stored:
/// `hours = secs / 3600`, `minutes = secs % 3600 / 60`, `seconds = secs % 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Countdown(u32);

impl Countdown {
    /// Zero seconds.
    pub const ZERO: Countdown = Countdown(0);

    /// Wraps a number of seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Countdown(secs)
    }

    /// Combines stepper values into seconds: `h * 3600 + m * 60 + s`.
    ///
    /// The parts are multiplied, not clamped; stepper bounds are the
    /// steppers' business.
    pub fn from_parts(hours: u32, minutes: u32, seconds: u32) -> Self {
        Countdown(
            hours
                .saturating_mul(SECS_PER_HOUR)
                .saturating_add(minutes.saturating_mul(SECS_PER_MINUTE))
                .saturating_add(seconds),
        )
    }

    /// Total seconds.
    pub const fn as_secs(self) -> u32 {
        self.0
    }

    /// Whole hours.
    pub const fn hours(self) -> u32 {
        self.0 / SECS_PER_HOUR
    }

    /// Minutes past the hour, `0..60`.
    pub const fn minutes(self) -> u32 {
        self.0 % SECS_PER_HOUR / SECS_PER_MINUTE
    }

    /// Seconds past the minute, `0..60`.
    pub const fn seconds(self) -> u32 {
        self.0 % SECS_PER_MINUTE
    }

    /// Whether no time is left.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// One second less, stopping at zero.
    pub const fn decremented(self) -> Self {
        Countdown(self.0.saturating_sub(1))
    }
}

impl From<Countdown> for Duration {
    fn from(countdown: Countdown) -> Self {
        Duration::from_secs(u64::from(countdown.0))
    }
}

impl fmt::Display for Countdown {
    /// `HH : MM : SS`, each part zero-padded to two digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02} : {:02} : {:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

/// Whether a countdown is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Nothing is counting; a new duration can be set.
    #[default]
    Idle,
    /// Counting down; the payload is always nonzero.
    Running(Countdown),
}

impl TimerState {
    /// Whether the state is `Running`.
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running(_))
    }

    /// Time left, zero when idle.
    pub fn remaining(&self) -> Countdown {
        match self {
            TimerState::Idle => Countdown::ZERO,
            TimerState::Running(left) => *left,
        }
    }
}

/// Message delivered once per interval while a countdown runs.
///
/// Ticks are produced by the command returned from [`Model::arm`] and
/// [`Model::update`]; a timer only accepts ticks carrying its own id and its
/// current tag.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Id of the timer that scheduled the tick.
    pub id: i64,
    /// Arming generation the tick belongs to. Ticks from an earlier arming,
    /// or scheduled before a cancel, carry a stale tag and are dropped.
    tag: i64,
}

/// Message sent once when a countdown reaches zero.
#[derive(Debug, Clone)]
pub struct FinishedMsg {
    /// Id of the timer that finished.
    pub id: i64,
}

/// The countdown controller.
///
/// Owns the single piece of mutable timer state. Only [`arm`](Model::arm),
/// [`cancel`](Model::cancel) and accepted ticks in [`update`](Model::update)
/// change it.
#[derive(Debug, Clone)]
pub struct Model {
    /// Delay between ticks.
    pub interval: Duration,
    /// What `arm` does while a countdown is running.
    pub rearm: RearmPolicy,
    state: TimerState,
    id: i64,
    tag: i64,
}

/// Creates an idle timer ticking every 100 ms.
pub fn new() -> Model {
    new_with_interval(DEFAULT_TICK_INTERVAL)
}

/// Creates an idle timer ticking every `interval`.
pub fn new_with_interval(interval: Duration) -> Model {
    Model {
        interval,
        rearm: RearmPolicy::default(),
        state: TimerState::Idle,
        id: next_id(),
        tag: 0,
    }
}

impl Model {
    /// Creates an idle timer using the interval and re-arm policy of `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut timer = new_with_interval(config.tick_interval);
        timer.rearm = config.rearm;
        timer
    }

    /// Unique id of this timer; tick and finish messages carry it.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Time left, zero when idle.
    pub fn remaining(&self) -> Countdown {
        self.state.remaining()
    }

    /// Whether a countdown is in progress.
    pub fn running(&self) -> bool {
        self.state.is_running()
    }

    /// Arms the timer from three stepper values.
    ///
    /// Returns the command that delivers the first tick, or `None` when nothing
    /// was started: the combined duration is zero, or a countdown is running
    /// and the re-arm policy is [`RearmPolicy::Ignore`].
    pub fn arm(&mut self, hours: u32, minutes: u32, seconds: u32) -> Option<Cmd> {
        self.arm_countdown(Countdown::from_parts(hours, minutes, seconds))
    }

    /// Arms the timer with an already combined duration. See [`arm`](Model::arm).
    pub fn arm_countdown(&mut self, countdown: Countdown) -> Option<Cmd> {
        if countdown.is_zero() {
            tracing::debug!(timer = self.id, "zero duration, staying idle");
            return None;
        }
        if self.running() && self.rearm == RearmPolicy::Ignore {
            tracing::debug!(
                timer = self.id,
                remaining = self.remaining().as_secs(),
                "already running, arm ignored"
            );
            return None;
        }

        self.tag += 1;
        self.state = TimerState::Running(countdown);
        tracing::info!(timer = self.id, secs = countdown.as_secs(), "countdown armed");
        Some(self.tick())
    }

    /// Stops a running countdown and returns to idle.
    ///
    /// Takes effect immediately: any tick already scheduled carries a stale tag
    /// and is rejected when it arrives.
    pub fn cancel(&mut self) {
        if let TimerState::Running(left) = self.state {
            tracing::info!(timer = self.id, remaining = left.as_secs(), "countdown cancelled");
        }
        self.tag += 1;
        self.state = TimerState::Idle;
    }

    /// Handles this timer's tick messages.
    ///
    /// An accepted tick takes one second off the countdown and returns the
    /// command for the next tick, or a [`FinishedMsg`] command on the tick that
    /// reaches zero. Ticks for other timers, stale ticks, ticks while idle and
    /// all other messages are ignored.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let tick_msg = msg.downcast_ref::<TickMsg>()?;
        if tick_msg.id != self.id || tick_msg.tag != self.tag {
            return None;
        }
        let TimerState::Running(left) = self.state else {
            return None;
        };

        let left = left.decremented();
        if left.is_zero() {
            self.state = TimerState::Idle;
            tracing::info!(timer = self.id, "countdown finished");
            return Some(self.finished());
        }
        self.state = TimerState::Running(left);
        Some(self.tick())
    }

    /// Remaining time as `HH : MM : SS`.
    pub fn view(&self) -> String {
        self.remaining().to_string()
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    fn finished(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(FinishedMsg { id }) as Msg
        })
    }

    #[cfg(test)]
    pub(crate) fn tick_msg(&self) -> Msg {
        Box::new(TickMsg {
            id: self.id,
            tag: self.tag,
        }) as Msg
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}
