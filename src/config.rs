//! Runtime configuration for the countdown application.
//!
//! `bubbletea_rs::Model::init()` takes no arguments, so the binary installs a
//! [`Config`] once at startup with [`install`] and the application model reads
//! it back with [`current`]. Library users that build an [`App`](crate::app::App)
//! directly can pass a `Config` to [`App::with_config`](crate::app::App::with_config)
//! instead.

use once_cell::sync::OnceCell;
use std::time::Duration;

/// Number of squares per grid row.
pub const DEFAULT_COLUMNS: usize = 10;

/// Delay between two countdown ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound of a stepper. Minutes and seconds always use it.
pub const DEFAULT_STEPPER_MAX: u32 = 59;

/// Default upper bound of the hours stepper.
pub const DEFAULT_HOURS_MAX: u32 = DEFAULT_STEPPER_MAX;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// What the timer does when it is armed while a countdown is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RearmPolicy {
    /// Keep the current countdown and drop the new request.
    #[default]
    Ignore,
    /// Replace the current countdown with the new duration.
    Restart,
}

/// Colors of the three unit grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Hours grid color.
    pub hours: String,
    /// Minutes grid color.
    pub minutes: String,
    /// Seconds grid color.
    pub seconds: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            hours: "#00FF00".to_string(),
            minutes: "#0000FF".to_string(),
            seconds: "#FF0000".to_string(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Squares per grid row.
    pub columns: usize,
    /// Delay between ticks. Controls refresh smoothness, not wall-clock accuracy.
    pub tick_interval: Duration,
    /// Upper bound of the hours stepper. Minutes and seconds stay capped at
    /// [`DEFAULT_STEPPER_MAX`] so a duration always splits back into the
    /// values that were dialed in.
    pub hours_max: u32,
    /// Behavior of `arm` while running.
    pub rearm: RearmPolicy,
    /// Grid colors.
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            hours_max: DEFAULT_HOURS_MAX,
            rearm: RearmPolicy::default(),
            palette: Palette::default(),
        }
    }
}

/// Installs the process-wide configuration.
///
/// Returns `false` if a configuration was already installed; the first one wins.
pub fn install(config: Config) -> bool {
    CONFIG.set(config).is_ok()
}

/// Returns the installed configuration, or the defaults if none was installed.
pub fn current() -> Config {
    CONFIG.get().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.columns, 10);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.hours_max, 59);
        assert_eq!(config.rearm, RearmPolicy::Ignore);
        assert_eq!(config.palette.hours, "#00FF00");
        assert_eq!(config.palette.minutes, "#0000FF");
        assert_eq!(config.palette.seconds, "#FF0000");
    }

    #[test]
    fn test_install_first_wins() {
        let custom = Config {
            columns: 6,
            ..Config::default()
        };
        let first = install(custom.clone());
        let second = install(Config::default());

        // Other tests in this binary never install, so the first call succeeds.
        assert!(first);
        assert!(!second);
        assert_eq!(current(), custom);
    }
}
