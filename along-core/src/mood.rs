//! The mood picked before the song starts.

use std::fmt;

/// How the listener says they are doing today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Ok,
    Tired,
    Missing,
}

impl Mood {
    /// All moods in the order they are offered.
    pub const ALL: [Self; 3] = [Self::Ok, Self::Tired, Self::Missing];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Tired => "tired",
            Self::Missing => "missing",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ok => "mình ổn",
            Self::Tired => "mình hơi mệt",
            Self::Missing => "mình nhớ ai đó",
        }
    }

    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Ok => "🌿",
            Self::Tired => "🌙",
            Self::Missing => "💛",
        }
    }

    /// Lines shown above the player for a while after this mood is picked.
    #[must_use]
    pub const fn intro_lines(&self) -> &'static [&'static str] {
        match self {
            Self::Ok => &[
                "vui quá, vậy thì nghe cùng mình nha",
                "chỉ là một bài thôi, hiền lắm 🌿",
            ],
            Self::Tired => &[
                "vậy thì cứ nghỉ chút đi nha",
                "để mình bật nhạc, bạn chỉ cần nghe thôi 🌙",
            ],
            Self::Missing => &["mình hiểu mà", "nhớ ai thì cứ nhớ, không sao đâu 💛"],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_order() {
        assert_eq!(Mood::ALL, [Mood::Ok, Mood::Tired, Mood::Missing]);
    }

    #[test]
    fn test_every_mood_has_two_intro_lines() {
        for mood in Mood::ALL {
            assert_eq!(mood.intro_lines().len(), 2, "mood {mood}");
            assert!(!mood.label().is_empty());
        }
    }

    #[test]
    fn test_labels_are_distinct() {
        assert_ne!(Mood::Ok.label(), Mood::Tired.label());
        assert_ne!(Mood::Tired.label(), Mood::Missing.label());
    }
}
