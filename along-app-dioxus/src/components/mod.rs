mod decor;
mod ending;
mod intro;
mod mood_picker;
mod player;
mod toast;

pub use decor::{Clouds, FloatingHearts, GrainOverlay, Sparkles};
pub use ending::EndingCard;
pub use intro::IntroCard;
pub use mood_picker::MoodPicker;
pub use player::Player;
pub use toast::ToastBanner;

/// Class list for a section card, adding `revealed` once its entrance runs
pub(crate) fn section_class(base: &str, revealed: bool) -> String {
    if revealed {
        format!("section {base} revealed")
    } else {
        format!("section {base}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_class() {
        assert_eq!(section_class("intro", false), "section intro");
        assert_eq!(section_class("intro", true), "section intro revealed");
    }
}
