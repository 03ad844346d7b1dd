//! Key bindings and the one-line help bar.
//!
//! A [`Binding`] pairs a set of key codes with the help text shown for them.
//! Components group their bindings in a struct implementing [`KeyMap`], which
//! [`short_help_view`] renders as `key desc • key desc`.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss::AdaptiveColor;
use lipgloss_extras::prelude::*;

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Short key label, e.g. `"↑/+"`.
    pub key: String,
    /// What the key does.
    pub desc: String,
}

/// A set of keys that trigger one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyCode>,
    help: Help,
    enabled: bool,
}

impl Binding {
    /// Creates an enabled binding for `keys` with empty help text.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: Help::default(),
            enabled: true,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Returns the bound key codes.
    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    /// Whether the binding currently responds to keys and shows in help.
    pub fn enabled(&self) -> bool {
        self.enabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Reports whether `key_msg` triggers this binding.
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.contains(&key_msg.key)
    }
}

/// A component's collection of bindings, as presented in help.
pub trait KeyMap {
    /// Bindings shown in the one-line help bar.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings grouped into columns for an expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

const SEPARATOR: &str = " • ";

/// Renders the enabled short-help bindings of `keymap` on one line.
pub fn short_help_view(keymap: &dyn KeyMap) -> String {
    let key_style = Style::new().foreground(AdaptiveColor {
        Light: "#909090",
        Dark: "#626262",
    });
    let desc_style = Style::new().foreground(AdaptiveColor {
        Light: "#B2B2B2",
        Dark: "#4A4A4A",
    });
    let sep_style = Style::new().foreground(AdaptiveColor {
        Light: "#DDDADA",
        Dark: "#3C3C3C",
    });

    keymap
        .short_help()
        .into_iter()
        .filter(|b| b.enabled())
        .map(|b| {
            format!(
                "{} {}",
                key_style.clone().inline(true).render(&b.help().key),
                desc_style.clone().inline(true).render(&b.help().desc)
            )
        })
        .collect::<Vec<_>>()
        .join(&sep_style.inline(true).render(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    struct TwoKeys {
        go: Binding,
        quit: Binding,
    }

    impl KeyMap for TwoKeys {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.go, &self.quit]
        }

        fn full_help(&self) -> Vec<Vec<&Binding>> {
            vec![vec![&self.go], vec![&self.quit]]
        }
    }

    #[test]
    fn test_binding_matches_any_of_its_keys() {
        let b = Binding::new(vec![KeyCode::Up, KeyCode::Char('+')]).with_help("↑/+", "more");
        assert!(b.matches(&key(KeyCode::Up)));
        assert!(b.matches(&key(KeyCode::Char('+'))));
        assert!(!b.matches(&key(KeyCode::Down)));
        assert_eq!(b.help().key, "↑/+");
        assert_eq!(b.help().desc, "more");
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = Binding::new(vec![KeyCode::Enter]);
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&key(KeyCode::Enter)));

        let empty = Binding::new(vec![]);
        assert!(!empty.enabled());
    }

    #[test]
    fn test_short_help_view_skips_disabled() {
        let mut keys = TwoKeys {
            go: Binding::new(vec![KeyCode::Enter]).with_help("enter", "go"),
            quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
        };
        let plain = |s: String| String::from_utf8(strip_ansi_escapes::strip(s)).unwrap();

        assert_eq!(plain(short_help_view(&keys)), "enter go • q quit");

        keys.go.set_enabled(false);
        assert_eq!(plain(short_help_view(&keys)), "q quit");
    }
}
