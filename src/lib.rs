#![warn(missing_docs)]

//! # square-countdown
//!
//! A countdown timer for the terminal, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//! The user dials in hours, minutes and seconds with three steppers and starts
//! the countdown. The screen then shows the remaining time as `HH : MM : SS` above
//! three grids of colored squares, one square per remaining hour, minute and
//! second, ten squares per row. Squares disappear as time runs down, and at zero the
//! timer returns to the set screen.
//!
//! ## Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`grid`] | Square grid layout engine and the per-unit grid renderer |
//! | [`timer`] | Countdown state machine driven by tick messages |
//! | [`stepper`] | Clamped number stepper used to set each unit |
//! | [`key`] | Key bindings and the help bar |
//! | [`app`] | The application model tying everything together |
//! | [`config`] | Runtime settings |
//!
//! Each component follows the Elm Architecture with `update()` and `view()`
//! methods, and the application model implements `bubbletea_rs::Model`.
//!
//! ## Laying out a grid
//!
//! ```rust
//! use square_countdown::grid::{layout, ContainerWidth};
//!
//! let grid = layout(10, 23, ContainerWidth::Bounded(301)).unwrap();
//! assert_eq!(grid.cell_size, 30);
//! assert_eq!(grid.container_height, 90);
//! let tenth = grid.positions[10];
//! assert_eq!((tenth.column, tenth.row), (0, 1));
//! ```
//!
//! ## Running the timer
//!
//! ```rust
//! use square_countdown::prelude::*;
//!
//! let mut timer = timer_new();
//! let first_tick = timer.arm(0, 0, 5);
//! assert!(first_tick.is_some());
//! assert_eq!(timer.state(), TimerState::Running(Countdown::from_secs(5)));
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod grid;
pub mod key;
pub mod stepper;
pub mod timer;

use bubbletea_rs::Cmd;

/// Keyboard focus management for components.
///
/// A focused component receives key input and renders itself as active; a
/// blurred one ignores keys.
///
/// ```rust
/// use square_countdown::prelude::*;
///
/// let mut hours = Stepper::new();
/// assert!(!hours.focused());
/// hours.focus();
/// assert!(hours.focused());
/// hours.blur();
/// assert!(!hours.focused());
/// ```
pub trait Component {
    /// Focuses the component. May return a command to run on focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Blurs the component.
    fn blur(&mut self);

    /// Whether the component is focused.
    fn focused(&self) -> bool;
}

pub use app::App;
pub use config::{Config, Palette, RearmPolicy};
pub use error::{Error, Result};
pub use grid::{layout, CellPosition, ContainerWidth, GridLayout, SquareGrid};
pub use key::{Binding, KeyMap};
pub use stepper::Model as Stepper;
pub use timer::{
    new as timer_new, new_with_interval as timer_new_with_interval, Countdown,
    FinishedMsg as TimerFinishedMsg, Model as Timer, TickMsg as TimerTickMsg, TimerState,
};

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::{Config, Palette, RearmPolicy};
    pub use crate::error::{Error, Result};
    pub use crate::grid::{layout, CellPosition, ContainerWidth, GridLayout, SquareGrid};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::stepper::Model as Stepper;
    pub use crate::timer::{
        new as timer_new, new_with_interval as timer_new_with_interval, Countdown,
        FinishedMsg as TimerFinishedMsg, Model as Timer, TickMsg as TimerTickMsg, TimerState,
    };
    pub use crate::Component;
}
