use crate::section::Section;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Cue table errors
    #[error("Failed to parse LRC: {reason}")]
    LrcParseError { reason: String },

    #[error("Cue table is empty")]
    EmptyCueTable,

    #[error("Cue {index} is not strictly after the previous cue")]
    UnorderedCue { index: usize },

    // Session errors
    #[error("Cannot {action} while in the {from} section")]
    InvalidTransition { from: Section, action: &'static str },

    #[error("Session has been torn down")]
    SessionClosed,

    // Media errors
    #[error("Playback failed: {reason}")]
    PlaybackFailed { reason: String },

    #[error("Media element is no longer attached")]
    MediaDetached,

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
