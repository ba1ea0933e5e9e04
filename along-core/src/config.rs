use crate::cue::CueTable;
use crate::error::{CoreError, Result};
use crate::greeting::DEFAULT_RECIPIENT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const LOG_TARGET: &str = "along::config";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlongConfig {
    #[serde(default)]
    pub greeting: GreetingConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingConfig {
    /// Shown when the link carries no `to` parameter
    #[serde(default = "default_recipient")]
    pub default_recipient: String,
}

fn default_recipient() -> String {
    DEFAULT_RECIPIENT.to_string()
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            default_recipient: default_recipient(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_audio_path")]
    pub audio_path: String,
    #[serde(default = "default_cover_image")]
    pub cover_image: String,
    #[serde(default = "default_disc_image")]
    pub disc_image: String,
}

fn default_audio_path() -> String {
    "song.mp3".to_string()
}

fn default_cover_image() -> String {
    "bmo_music.jpeg".to_string()
}

fn default_disc_image() -> String {
    "music_background.jpeg".to_string()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            audio_path: default_audio_path(),
            cover_image: default_cover_image(),
            disc_image: default_disc_image(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Optional LRC file replacing the built-in caption timeline
    #[serde(default)]
    pub lrc_path: Option<PathBuf>,
}

impl LyricsConfig {
    /// Load the configured cue table, or the built-in one if none is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the LRC file cannot be read or parsed.
    pub fn load_cues(&self) -> Result<CueTable> {
        match &self.lrc_path {
            Some(path) => {
                info!(target: LOG_TARGET, "Loading captions from {:?}", path);
                CueTable::parse_lrc(&fs::read_to_string(path)?)
            }
            None => Ok(CueTable::builtin()),
        }
    }
}

/// Fixed delays of the experience, in milliseconds unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay before the intro card animates in on startup
    #[serde(default = "default_intro_reveal_ms")]
    pub intro_reveal_ms: u64,
    /// Delay between mounting a section and starting its entrance animation
    #[serde(default = "default_section_reveal_ms")]
    pub section_reveal_ms: u64,
    /// Hidden window between two captions
    #[serde(default = "default_caption_swap_ms")]
    pub caption_swap_ms: u64,
    /// How long the mood intro lines stay above the player
    #[serde(default = "default_mood_intro_ms")]
    pub mood_intro_ms: u64,
    #[serde(default = "default_hint_ms")]
    pub hint_ms: u64,
    #[serde(default = "default_toast_hide_ms")]
    pub toast_hide_ms: u64,
    #[serde(default = "default_toast_clear_ms")]
    pub toast_clear_ms: u64,
    /// Seconds after the last caption before the ending is shown
    #[serde(default = "default_trailing_window_secs")]
    pub trailing_window_secs: u64,
}

const fn default_intro_reveal_ms() -> u64 {
    200
}

const fn default_section_reveal_ms() -> u64 {
    100
}

const fn default_caption_swap_ms() -> u64 {
    400
}

const fn default_mood_intro_ms() -> u64 {
    8000
}

const fn default_hint_ms() -> u64 {
    3000
}

const fn default_toast_hide_ms() -> u64 {
    2500
}

const fn default_toast_clear_ms() -> u64 {
    3000
}

const fn default_trailing_window_secs() -> u64 {
    8
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            intro_reveal_ms: default_intro_reveal_ms(),
            section_reveal_ms: default_section_reveal_ms(),
            caption_swap_ms: default_caption_swap_ms(),
            mood_intro_ms: default_mood_intro_ms(),
            hint_ms: default_hint_ms(),
            toast_hide_ms: default_toast_hide_ms(),
            toast_clear_ms: default_toast_clear_ms(),
            trailing_window_secs: default_trailing_window_secs(),
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn intro_reveal(&self) -> Duration {
        Duration::from_millis(self.intro_reveal_ms)
    }

    #[must_use]
    pub const fn section_reveal(&self) -> Duration {
        Duration::from_millis(self.section_reveal_ms)
    }

    #[must_use]
    pub const fn caption_swap(&self) -> Duration {
        Duration::from_millis(self.caption_swap_ms)
    }

    #[must_use]
    pub const fn mood_intro(&self) -> Duration {
        Duration::from_millis(self.mood_intro_ms)
    }

    #[must_use]
    pub const fn hint(&self) -> Duration {
        Duration::from_millis(self.hint_ms)
    }

    #[must_use]
    pub const fn toast_hide(&self) -> Duration {
        Duration::from_millis(self.toast_hide_ms)
    }

    #[must_use]
    pub const fn toast_clear(&self) -> Duration {
        Duration::from_millis(self.toast_clear_ms)
    }

    #[must_use]
    pub const fn trailing_window(&self) -> Duration {
        Duration::from_secs(self.trailing_window_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file in the cache directory
    #[serde(default)]
    pub enabled: bool,
}

impl AlongConfig {
    /// Get the config file path (~/.config/along/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from file, writing the commented template on first run.
    ///
    /// A missing file is not an error: the template is written and the
    /// defaults it describes are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written, fails to parse,
    /// or holds invalid values.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&config_path, CONFIG_TEMPLATE)?;
            info!(target: LOG_TARGET, "Wrote config template to {:?}", config_path);

            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate the config at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, fails to parse, or holds
    /// invalid values.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parse and validate config TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigParseError`] for malformed TOML and
    /// [`CoreError::ConfigInvalid`] for inconsistent values.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.greeting.default_recipient.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "greeting.default_recipient must not be empty".into(),
            });
        }
        if self.timing.toast_hide_ms > self.timing.toast_clear_ms {
            return Err(CoreError::ConfigInvalid {
                message: "timing.toast_hide_ms must not exceed timing.toast_clear_ms".into(),
            });
        }
        Ok(())
    }
}

/// Commented template written on first run
pub const CONFIG_TEMPLATE: &str = r#"# Come Along With Me configuration
# ~/.config/along/config.toml

[greeting]
# Name shown when the link has no ?to= parameter
default_recipient = "một người bạn"

[media]
# Paths are resolved by the webview relative to the working directory
audio_path = "song.mp3"
cover_image = "bmo_music.jpeg"
disc_image = "music_background.jpeg"

[lyrics]
# Optional LRC file replacing the built-in captions
# lrc_path = "/path/to/captions.lrc"

[timing]
intro_reveal_ms = 200
section_reveal_ms = 100
caption_swap_ms = 400
mood_intro_ms = 8000
hint_ms = 3000
toast_hide_ms = 2500
toast_clear_ms = 3000
# Seconds after the last caption before the ending card appears
trailing_window_secs = 8

[logging]
# Also write logs to ~/.cache/along/along.log
enabled = false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_matches_defaults() {
        let config = AlongConfig::parse(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.greeting.default_recipient, DEFAULT_RECIPIENT);
        assert_eq!(config.media.audio_path, "song.mp3");
        assert!(config.lyrics.lrc_path.is_none());
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AlongConfig::parse("").unwrap();
        assert_eq!(config.timing.trailing_window(), Duration::from_secs(8));
        assert_eq!(config.timing.caption_swap(), Duration::from_millis(400));
    }

    #[test]
    fn test_partial_timing_override() {
        let config = AlongConfig::parse("[timing]\ntrailing_window_secs = 3\n").unwrap();
        assert_eq!(config.timing.trailing_window(), Duration::from_secs(3));
        assert_eq!(config.timing.section_reveal(), Duration::from_millis(100));
    }

    #[test]
    fn test_parse_error() {
        let result = AlongConfig::parse("[timing\n");
        assert!(matches!(result, Err(CoreError::ConfigParseError(_))));
    }

    #[test]
    fn test_toast_order_validated() {
        let result = AlongConfig::parse("[timing]\ntoast_hide_ms = 5000\ntoast_clear_ms = 1000\n");
        assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_blank_recipient_rejected() {
        let result = AlongConfig::parse("[greeting]\ndefault_recipient = \"  \"\n");
        assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_builtin_cues_without_lrc_path() {
        let cues = LyricsConfig::default().load_cues().unwrap();
        assert_eq!(cues, CueTable::builtin());
    }

    #[test]
    fn test_missing_lrc_file_is_io_error() {
        let lyrics = LyricsConfig {
            lrc_path: Some(PathBuf::from("/nonexistent/along/captions.lrc")),
        };
        assert!(matches!(lyrics.load_cues(), Err(CoreError::IoError(_))));
    }
}
