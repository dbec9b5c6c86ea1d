use std::fmt;
use std::str::FromStr;

/// Input mode of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// Typing into the one-line command window.
    Command,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Insert, Self::Command];

    /// Short upper-case label used by the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
        }
    }

    /// Whether unbound keys in this mode are typed as text.
    pub const fn inserts_unbound_keys(self) -> bool {
        matches!(self, Self::Insert | Self::Command)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "Normal",
            Self::Insert => "Insert",
            Self::Command => "Command",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}' (expected normal, insert or command)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Mode::Normal.to_string(), "Normal");
        assert_eq!(Mode::Insert.to_string(), "Insert");
        assert_eq!(Mode::Command.to_string(), "Command");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("insert".parse::<Mode>(), Ok(Mode::Insert));
        assert_eq!("COMMAND".parse::<Mode>(), Ok(Mode::Command));
        assert!("visual".parse::<Mode>().is_err());
    }
}
