//! The countdown application model.
//!
//! [`App`] is the presentation root. It owns the timer (the only writer of the
//! countdown state), the three steppers and the terminal size. While the timer
//! is idle it shows the set screen: three steppers and a "GO!" action. While the
//! timer runs it shows the remaining time and one square grid per unit. Squares
//! shrink when the terminal is too short to show every grid at full width, and
//! the squares removed by the latest tick stay one more tick as dim outlines.
//! A terminal shorter than one line per grid row still clips the bottom grids.
//!
//! ```rust
//! use bubbletea_rs::{KeyMsg, Msg, WindowSizeMsg};
//! use crossterm::event::{KeyCode, KeyModifiers};
//! use square_countdown::prelude::*;
//!
//! let mut app = App::with_config(Config::default());
//! app.update(Box::new(WindowSizeMsg { width: 80, height: 24 }) as Msg);
//!
//! // Focus starts on hours; move to seconds and dial in 3.
//! for code in [KeyCode::Tab, KeyCode::Tab, KeyCode::Up, KeyCode::Up, KeyCode::Up] {
//!     app.update(Box::new(KeyMsg { key: code, modifiers: KeyModifiers::NONE }) as Msg);
//! }
//! assert_eq!(app.stepper_values(), (0, 0, 3));
//!
//! let first_tick = app.update(Box::new(KeyMsg {
//!     key: KeyCode::Enter,
//!     modifiers: KeyModifiers::NONE,
//! }) as Msg);
//! assert!(first_tick.is_some());
//! assert_eq!(app.timer().state(), TimerState::Running(Countdown::from_secs(3)));
//! ```

use crate::config::{self, Config};
use crate::error::Error;
use crate::grid::{ContainerWidth, SquareGrid};
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::stepper;
use crate::timer::{self, FinishedMsg, TimerState};
use crate::Component;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

const HOURS: usize = 0;
const MINUTES: usize = 1;
const SECONDS: usize = 2;

/// Countdown screen lines outside the grids: clock, blank, blank, help bar.
const CHROME_LINES: usize = 4;

/// Application-level key bindings.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Focus the next stepper.
    pub next_field: key::Binding,
    /// Focus the previous stepper.
    pub prev_field: key::Binding,
    /// Arm the timer with the stepper values.
    pub go: key::Binding,
    /// Stop a running countdown.
    pub cancel: key::Binding,
    /// Leave the program.
    pub quit: key::Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        let mut cancel = key::Binding::new(vec![KeyCode::Esc]).with_help("esc", "cancel");
        cancel.set_enabled(false);
        Self {
            next_field: key::Binding::new(vec![KeyCode::Tab, KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/tab", "next"),
            prev_field: key::Binding::new(vec![KeyCode::BackTab, KeyCode::Left, KeyCode::Char('h')])
                .with_help("←", "prev"),
            go: key::Binding::new(vec![KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('g')])
                .with_help("enter", "GO!"),
            cancel,
            quit: key::Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
        }
    }
}

impl KeyMapTrait for AppKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.next_field,
            &self.prev_field,
            &self.go,
            &self.cancel,
            &self.quit,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.next_field, &self.prev_field],
            vec![&self.go, &self.cancel, &self.quit],
        ]
    }
}

/// The application model.
#[derive(Debug)]
pub struct App {
    config: Config,
    timer: timer::Model,
    steppers: [stepper::Model; 3],
    focus: usize,
    width: ContainerWidth,
    height: Option<usize>,
    fading: [u32; 3],
    /// Key bindings.
    pub keymap: AppKeyMap,
}

impl App {
    /// Creates the application with the set screen showing and hours focused.
    pub fn with_config(config: Config) -> Self {
        let mut steppers = [
            stepper::Model::new().with_max(config.hours_max),
            stepper::Model::new(),
            stepper::Model::new(),
        ];
        steppers[HOURS].focus();

        Self {
            timer: timer::Model::from_config(&config),
            config,
            steppers,
            focus: HOURS,
            width: ContainerWidth::Unbounded,
            height: None,
            fading: [0; 3],
            keymap: AppKeyMap::default(),
        }
    }

    /// The countdown controller.
    pub fn timer(&self) -> &timer::Model {
        &self.timer
    }

    /// Current hours, minutes and seconds stepper values.
    pub fn stepper_values(&self) -> (u32, u32, u32) {
        (
            self.steppers[HOURS].value(),
            self.steppers[MINUTES].value(),
            self.steppers[SECONDS].value(),
        )
    }

    /// Index of the focused stepper: 0 hours, 1 minutes, 2 seconds.
    pub fn focus_index(&self) -> usize {
        self.focus
    }

    /// Width the grids are laid out in, unbounded until the terminal reports it.
    pub fn width(&self) -> ContainerWidth {
        self.width
    }

    /// Terminal height, unknown until the terminal reports it.
    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// Handles one message and returns the follow-up command, if any.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = ContainerWidth::Bounded(usize::from(size.width));
            self.height = Some(usize::from(size.height));
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            let cmd = self.handle_key(key_msg, &msg);
            self.sync_keymap();
            return cmd;
        }

        if let Some(finished) = msg.downcast_ref::<FinishedMsg>() {
            if finished.id == self.timer.id() {
                tracing::debug!("back to the set screen");
            }
            return None;
        }

        let before = self.timer.remaining();
        let cmd = self.timer.update(msg);
        let after = self.timer.remaining();
        if after != before {
            self.fading = [
                before.hours().saturating_sub(after.hours()),
                before.minutes().saturating_sub(after.minutes()),
                before.seconds().saturating_sub(after.seconds()),
            ];
        }
        self.sync_keymap();
        cmd
    }

    fn handle_key(&mut self, key_msg: &KeyMsg, msg: &Msg) -> Option<Cmd> {
        let ctrl_c =
            key_msg.key == KeyCode::Char('c') && key_msg.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || self.keymap.quit.matches(key_msg) {
            self.timer.cancel();
            return Some(quit());
        }

        if self.timer.running() {
            if self.keymap.cancel.matches(key_msg) {
                self.timer.cancel();
            }
            return None;
        }

        if self.keymap.go.matches(key_msg) {
            let (hours, minutes, seconds) = self.stepper_values();
            self.fading = [0; 3];
            return self.timer.arm(hours, minutes, seconds);
        }
        if self.keymap.next_field.matches(key_msg) {
            self.set_focus((self.focus + 1) % self.steppers.len());
        } else if self.keymap.prev_field.matches(key_msg) {
            self.set_focus((self.focus + self.steppers.len() - 1) % self.steppers.len());
        } else {
            self.steppers[self.focus].update(msg);
        }
        None
    }

    fn set_focus(&mut self, index: usize) {
        self.steppers[self.focus].blur();
        self.focus = index;
        self.steppers[self.focus].focus();
    }

    fn sync_keymap(&mut self) {
        let running = self.timer.running();
        self.keymap.next_field.set_enabled(!running);
        self.keymap.prev_field.set_enabled(!running);
        self.keymap.go.set_enabled(!running);
        self.keymap.cancel.set_enabled(running);
    }

    /// Renders the set screen or the countdown screen.
    pub fn view(&self) -> String {
        let body = match self.timer.state() {
            TimerState::Idle => self.set_view(),
            TimerState::Running(_) => self.countdown_view(),
        };
        format!("{}\n\n{}", body, self.help_view())
    }

    fn set_view(&self) -> String {
        let separator = "   \n : \n   ";
        let hours = self.steppers[HOURS].view();
        let minutes = self.steppers[MINUTES].view();
        let seconds = self.steppers[SECONDS].view();
        let row = lipgloss::join_horizontal(
            lipgloss::TOP,
            &[
                hours.as_str(),
                separator,
                minutes.as_str(),
                separator,
                seconds.as_str(),
            ],
        );
        let go = Style::new().bold(true).render("[ GO! ]");
        format!("{}\n\n{}", row, go)
    }

    fn countdown_view(&self) -> String {
        let remaining = self.timer.remaining();
        let clock = remaining.to_string();
        let clock = match self.width {
            ContainerWidth::Bounded(width) => {
                let pad = width.saturating_sub(clock.chars().count()) / 2;
                format!("{}{}", " ".repeat(pad), clock)
            }
            ContainerWidth::Unbounded => clock,
        };

        let palette = &self.config.palette;
        let units = [
            (remaining.hours(), self.fading[HOURS], palette.hours.as_str()),
            (remaining.minutes(), self.fading[MINUTES], palette.minutes.as_str()),
            (remaining.seconds(), self.fading[SECONDS], palette.seconds.as_str()),
        ];
        let squares: Vec<usize> = units
            .iter()
            .map(|&(count, fading, _)| (count + fading) as usize)
            .collect();
        let width = self.grid_width(&squares);
        let grids: Vec<String> = units
            .into_iter()
            .filter_map(|(count, fading, color)| {
                let mut grid = SquareGrid::new(self.config.columns, color);
                grid.set_count(count as usize);
                grid.set_fading(fading as usize);
                grid.set_width(width);
                match grid.view() {
                    Ok(view) if !view.is_empty() => Some(view),
                    Ok(_) => None,
                    Err(Error::UnboundedContainer) => None,
                    Err(err) => {
                        tracing::warn!(error = %err, "grid layout failed");
                        None
                    }
                }
            })
            .collect();

        format!("{}\n\n{}", clock, grids.join("\n"))
    }

    /// Width to lay the grids out in so that all of them fit the terminal
    /// height, given the number of squares in each grid.
    fn grid_width(&self, squares: &[usize]) -> ContainerWidth {
        let (ContainerWidth::Bounded(width), Some(height)) = (self.width, self.height) else {
            return self.width;
        };
        let columns = self.config.columns.max(1);
        let rows: usize = squares.iter().map(|count| count.div_ceil(columns)).sum();
        if rows == 0 {
            return self.width;
        }
        let lines_per_cell = height.saturating_sub(CHROME_LINES) / rows;
        let cell_size = (width / columns).min(SquareGrid::max_cell_size(lines_per_cell));
        ContainerWidth::Bounded(cell_size * columns)
    }

    fn help_view(&self) -> String {
        let app_help = key::short_help_view(&self.keymap);
        if self.timer.running() {
            return app_help;
        }
        let stepper_help = key::short_help_view(&self.steppers[self.focus].keymap);
        format!("{} • {}", stepper_help, app_help)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        (Self::with_config(config::current()), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Countdown;

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }) as Msg
    }

    fn plain(s: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
    }

    fn resized(width: u16) -> App {
        sized(width, 40)
    }

    fn sized(width: u16, height: u16) -> App {
        let mut app = App::default();
        app.update(Box::new(WindowSizeMsg { width, height }) as Msg);
        app
    }

    #[test]
    fn test_initial_state() {
        let app = App::default();
        assert_eq!(app.focus_index(), HOURS);
        assert!(app.steppers[HOURS].focused());
        assert!(!app.steppers[MINUTES].focused());
        assert_eq!(app.stepper_values(), (0, 0, 0));
        assert_eq!(app.width(), ContainerWidth::Unbounded);
        assert_eq!(app.timer().state(), TimerState::Idle);
    }

    #[test]
    fn test_window_size_bounds_width() {
        let app = resized(120);
        assert_eq!(app.width(), ContainerWidth::Bounded(120));
        assert_eq!(app.height(), Some(40));
    }

    #[test]
    fn test_hours_max_leaves_minutes_and_seconds_at_59() {
        let mut app = App::with_config(Config {
            hours_max: 99,
            ..Config::default()
        });
        for field in 0..3 {
            if field > 0 {
                app.update(key(KeyCode::Tab));
            }
            for _ in 0..75 {
                app.update(key(KeyCode::Up));
            }
        }
        assert_eq!(app.stepper_values(), (75, 59, 59));

        app.update(key(KeyCode::Enter));
        let remaining = app.timer().remaining();
        assert_eq!(
            (remaining.hours(), remaining.minutes(), remaining.seconds()),
            app.stepper_values()
        );
        assert!(plain(&app.view()).contains("75 : 59 : 59"));
    }

    #[test]
    fn test_longest_countdown_fits_terminal_height() {
        let mut app = sized(80, 24);
        for stepper in app.steppers.iter_mut() {
            stepper.set_value(59);
        }
        app.update(key(KeyCode::Enter));
        assert!(app.timer().running());

        let view = plain(&app.view());
        assert!(view.lines().count() <= 24, "{} lines", view.lines().count());
        // 18 grid rows in 20 lines: one line per row, 3-column cells.
        assert_eq!(view.lines().nth(2), Some("██ ".repeat(10).as_str()));
    }

    #[test]
    fn test_cells_keep_full_width_when_height_allows() {
        let mut app = sized(80, 24);
        app.update(key(KeyCode::Left));
        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Enter));

        let view = plain(&app.view());
        assert_eq!(view.lines().nth(2), Some("███████ ███████ "));
        assert_eq!(view.lines().count(), 2 + 4 + 2);
    }

    #[test]
    fn test_removed_square_fades_for_one_tick() {
        let mut app = resized(80);
        app.update(key(KeyCode::Left));
        for _ in 0..3 {
            app.update(key(KeyCode::Up));
        }
        app.update(key(KeyCode::Enter));
        assert_eq!(plain(&app.view()).lines().nth(2), Some("███████ ".repeat(3).as_str()));

        app.update(app.timer().tick_msg());
        let view = plain(&app.view());
        assert!(view.contains("00 : 00 : 02"));
        assert!(view.contains("███████ ███████ ░░░░░░░ "));

        app.update(app.timer().tick_msg());
        let view = plain(&app.view());
        assert!(view.contains("███████ ░░░░░░░ "));
        assert!(!view.contains("███████ ███████"));

        // A tick from another timer is rejected and leaves the frame alone.
        app.update(timer::new().tick_msg());
        assert!(plain(&app.view()).contains("███████ ░░░░░░░ "));
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut app = App::default();
        app.update(key(KeyCode::Left));
        assert_eq!(app.focus_index(), SECONDS);
        assert!(app.steppers[SECONDS].focused());
        assert!(!app.steppers[HOURS].focused());

        app.update(key(KeyCode::Tab));
        assert_eq!(app.focus_index(), HOURS);
        app.update(key(KeyCode::Right));
        assert_eq!(app.focus_index(), MINUTES);
    }

    #[test]
    fn test_go_with_zero_stays_on_set_screen() {
        let mut app = resized(80);
        assert!(app.update(key(KeyCode::Enter)).is_none());
        assert_eq!(app.timer().state(), TimerState::Idle);
        assert!(plain(&app.view()).contains("[ GO! ]"));
    }

    #[test]
    fn test_go_arms_timer_and_shows_countdown() {
        let mut app = resized(80);
        app.update(key(KeyCode::Up)); // 1 hour
        app.update(key(KeyCode::Tab));
        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Up)); // 2 minutes
        assert!(app.update(key(KeyCode::Enter)).is_some());

        assert_eq!(
            app.timer().state(),
            TimerState::Running(Countdown::from_parts(1, 2, 0))
        );
        let view = plain(&app.view());
        assert!(view.contains("01 : 02 : 00"));
        assert!(!view.contains("[ GO! ]"));
        // 80 columns / 10 = 8 wide cells, 4 lines each: one hours row and one
        // minutes row, no seconds.
        assert_eq!(view.matches("███████ ").count(), 3);
        assert!(view.contains("esc cancel"));
    }

    #[test]
    fn test_keys_ignored_while_running_except_cancel() {
        let mut app = resized(80);
        app.update(key(KeyCode::Left));
        app.update(key(KeyCode::Up)); // 1 second
        app.update(key(KeyCode::Enter));
        assert!(app.timer().running());

        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Tab));
        assert_eq!(app.stepper_values(), (0, 0, 1));
        assert_eq!(app.focus_index(), SECONDS);

        app.update(key(KeyCode::Esc));
        assert_eq!(app.timer().state(), TimerState::Idle);
        // Stepper values survive a cancel.
        assert_eq!(app.stepper_values(), (0, 0, 1));
    }

    #[test]
    fn test_quit_cancels_timer() {
        let mut app = resized(80);
        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Enter));
        assert!(app.timer().running());

        let ctrl_c = Box::new(KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        }) as Msg;
        assert!(app.update(ctrl_c).is_some());
        assert!(!app.timer().running());
    }

    #[test]
    fn test_countdown_view_without_width_has_no_grids() {
        let mut app = App::default();
        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Enter));
        let view = plain(&app.view());
        assert!(view.starts_with("01 : 00 : 00"));
        assert!(!view.contains('█'));
    }

    #[test]
    fn test_set_view_shows_steppers() {
        let mut app = resized(80);
        app.update(key(KeyCode::Tab));
        app.update(key(KeyCode::Down));
        app.update(key(KeyCode::Up));
        app.update(key(KeyCode::Up));
        let view = plain(&app.view());
        assert!(view.contains(" 00 "));
        assert!(view.contains("[02]"));
        assert!(view.contains(" : "));
        assert!(view.contains("enter GO!"));
    }
}
