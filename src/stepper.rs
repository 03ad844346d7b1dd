//! A number stepper for dialing in one unit of a duration.
//!
//! The stepper holds an integer in `[0, max]` (59 by default). Each activation
//! of its increment or decrement binding moves the value by one, stopping at
//! the bounds instead of wrapping. Only a focused stepper reacts to keys.
//!
//! ```rust
//! use square_countdown::stepper::Model as Stepper;
//!
//! let mut minutes = Stepper::new();
//! minutes.decrement();
//! assert_eq!(minutes.value(), 0);
//! minutes.set_value(75);
//! assert_eq!(minutes.value(), 59);
//! assert_eq!(minutes.view().lines().nth(1), Some(" 59 "));
//! ```

use crate::config::DEFAULT_STEPPER_MAX;
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;

/// Key bindings for a stepper.
#[derive(Debug, Clone)]
pub struct StepperKeyMap {
    /// Adds one.
    pub increment: key::Binding,
    /// Subtracts one.
    pub decrement: key::Binding,
}

impl Default for StepperKeyMap {
    fn default() -> Self {
        Self {
            increment: key::Binding::new(vec![
                KeyCode::Up,
                KeyCode::Char('+'),
                KeyCode::Char('k'),
            ])
            .with_help("↑/+", "increase"),
            decrement: key::Binding::new(vec![
                KeyCode::Down,
                KeyCode::Char('-'),
                KeyCode::Char('j'),
            ])
            .with_help("↓/-", "decrease"),
        }
    }
}

impl KeyMapTrait for StepperKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.increment, &self.decrement]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.increment, &self.decrement]]
    }
}

/// Stepper state.
#[derive(Debug, Clone)]
pub struct Model {
    value: u32,
    max: u32,
    focused: bool,
    /// Key bindings.
    pub keymap: StepperKeyMap,
    /// Style of the value while focused.
    pub focused_style: Style,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            value: 0,
            max: DEFAULT_STEPPER_MAX,
            focused: false,
            keymap: StepperKeyMap::default(),
            focused_style: Style::new().bold(true),
        }
    }
}

impl Model {
    /// Creates a blurred stepper at zero with the default upper bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the upper bound, clamping the current value to it.
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = max;
        self.value = self.value.min(max);
        self
    }

    /// Sets the value, clamped to `[0, max]`.
    pub fn with_value(mut self, value: u32) -> Self {
        self.set_value(value);
        self
    }

    /// Current value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Upper bound.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Sets the value, clamped to `[0, max]`.
    pub fn set_value(&mut self, value: u32) {
        self.value = value.min(self.max);
    }

    /// Adds one unless already at `max`.
    pub fn increment(&mut self) {
        self.set_value(self.value.saturating_add(1));
    }

    /// Subtracts one unless already at zero.
    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Applies key messages while focused.
    pub fn update(&mut self, msg: &Msg) {
        if !self.focused {
            return;
        }
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.increment.matches(key_msg) {
                self.increment();
            } else if self.keymap.decrement.matches(key_msg) {
                self.decrement();
            }
        }
    }

    /// Three lines: the increment marker, the zero-padded value, the decrement
    /// marker. The focused value is bracketed and styled.
    pub fn view(&self) -> String {
        let value = if self.focused {
            self.focused_style
                .clone()
                .inline(true)
                .render(&format!("[{:02}]", self.value))
        } else {
            format!(" {:02} ", self.value)
        };
        format!(" ++ \n{}\n -- ", value)
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}
