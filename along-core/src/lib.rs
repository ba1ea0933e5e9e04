pub mod config;
pub mod controller;
pub mod cue;
pub mod error;
pub mod greeting;
pub mod media;
pub mod mood;
pub mod notify;
pub mod paths;
pub mod scheduler;
pub mod section;
pub mod time;

pub use config::{
    AlongConfig, GreetingConfig, LoggingConfig, LyricsConfig, MediaConfig, TimingConfig,
    CONFIG_TEMPLATE,
};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use controller::{
    SessionController, SessionEvent, SessionSnapshot, PLAYBACK_FAILED_TOAST, PLAY_HINT,
};
pub use cue::{CueTable, LyricCue};
pub use error::{CoreError, Result};
pub use greeting::{Recipient, DEFAULT_RECIPIENT, RECIPIENT_PARAM};
pub use media::MediaElement;
pub use mood::Mood;
pub use notify::{Hint, Toast};
pub use paths::{config_dir, config_path, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use scheduler::Scheduler;
pub use section::Section;
pub use time::DurationExt;
