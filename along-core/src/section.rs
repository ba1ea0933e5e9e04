//! The four linear screens of the greeting.

use std::fmt;

/// Which screen is currently mounted.
///
/// The flow is strictly linear (`Intro -> Mood -> Player -> Ending`); the only
/// way back is replay, which re-enters `Player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Intro,
    Mood,
    Player,
    Ending,
}

impl Section {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Mood => "mood",
            Self::Player => "player",
            Self::Ending => "ending",
        }
    }

    /// Whether replay is offered from this section.
    #[must_use]
    pub const fn allows_replay(&self) -> bool {
        matches!(self, Self::Player | Self::Ending)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
