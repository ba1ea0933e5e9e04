#![cfg_attr(feature = "bundle", windows_subsystem = "windows")]
mod app;
mod bridge;
mod components;
mod media;
mod state;

use crate::app::App;
use crate::bridge::{use_audio_listener, use_media_commands, use_session_bridge};
use crate::media::{ChannelMedia, MediaCommands};
use crate::state::SessionView;
use along_core::{
    AlongConfig, CoreError, CueTable, Recipient, SessionController, SessionEvent,
    TomlParseError, CONFIG_TEMPLATE,
};
use dioxus::desktop::{LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APP_NAME: &str = "Come Along With Me 💛";

fn main() {
    // Check config for logging.enabled before full config load
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    // Load config or write the template on first run
    let config = match AlongConfig::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigParseError(parse_error)) => {
            show_config_parse_error_dialog(&parse_error, &AlongConfig::config_path());
            std::process::exit(1);
        }
        Err(CoreError::ConfigInvalid { message }) => {
            show_config_invalid_dialog(&message, &AlongConfig::config_path());
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            show_generic_error_dialog(&e.to_string());
            std::process::exit(1);
        }
    };

    // A broken caption file should not keep the song from playing
    let cues = config.lyrics.load_cues().unwrap_or_else(|e| {
        warn!("Failed to load captions, using the built-in ones: {e}");
        CueTable::builtin()
    });

    // The greeting link (e.g. along://open?to=Lan) arrives as the first argument
    let link = std::env::args().nth(1);
    let recipient = Recipient::from_link(link.as_deref(), &config.greeting.default_recipient);
    if recipient.is_personalized() {
        info!("Greeting for {}", recipient.name());
    } else {
        info!("No recipient in link, addressing {}", recipient.name());
    }

    // Create tokio runtime for background tasks
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    // Set up Ctrl+C handler to trigger graceful shutdown
    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    let (media, media_commands) = ChannelMedia::new();

    // Build the controller inside the background runtime so its timers run
    // there even when UI handlers schedule them
    let controller = {
        let _guard = runtime.enter();
        SessionController::new(
            cues,
            config.timing.clone(),
            Arc::new(media),
            Some(cancel_token.child_token()),
        )
    };

    // Spawn background tasks
    runtime.spawn(run_session(controller.clone()));
    runtime.spawn(log_session_events(controller.clone()));

    let window = WindowBuilder::new()
        .with_title(APP_NAME)
        .with_resizable(true)
        .with_inner_size(LogicalSize::new(460.0, 820.0))
        .with_min_inner_size(LogicalSize::new(360.0, 640.0));

    let dioxus_config = dioxus::desktop::Config::default()
        .with_window(window)
        .with_disable_context_menu(true);

    // Launch Dioxus application
    // Use with_context to inject the session, media bridge and greeting before launch
    dioxus::LaunchBuilder::desktop()
        .with_cfg(dioxus_config)
        .with_context(controller)
        .with_context(media_commands)
        .with_context(recipient)
        .with_context(config.media)
        .with_context(cancel_token)
        .launch(app);
}

/// Root component that sets up context and renders the app
fn app() -> Element {
    let view = use_context_provider(SessionView::new);

    let controller: Arc<SessionController> = use_context();
    let media_commands: MediaCommands = use_context();
    let cancel_token: CancellationToken = use_context();

    // The audio element answers controller commands and reports back
    use_media_commands(media_commands);
    use_audio_listener(controller.clone());

    // Bridge session events to Dioxus signals
    use_session_bridge(controller, view);

    // Closing the window tears the session down
    use_drop(move || cancel_token.cancel());

    rsx! {
        document::Title { "{APP_NAME}" },
        App {}
    }
}

/// Run the session's effect loop and tear it down once cancelled
async fn run_session(controller: Arc<SessionController>) {
    info!("Starting greeting session...");
    let handle = controller.clone().start();
    let _ = handle.await;
    controller.shutdown().await;
}

/// Log session events to the console
async fn log_session_events(controller: Arc<SessionController>) {
    let mut rx = controller.subscribe();

    loop {
        match rx.recv().await {
            Ok(event) => match &event {
                SessionEvent::SectionEntered { section } => {
                    info!("Entered {section}");
                }
                SessionEvent::MoodSelected { mood } => {
                    info!("Mood: {} {}", mood.icon(), mood.label());
                }
                SessionEvent::PlaybackChanged { playing } => {
                    info!("Playback {}", if *playing { "started" } else { "paused" });
                }
                SessionEvent::PlaybackFailed { reason } => {
                    warn!("Playback failed: {reason}");
                }
                SessionEvent::CueChanged { index: Some(index) } => {
                    debug!("Caption #{index}");
                }
                SessionEvent::Closed => {
                    info!("Session closed");
                }
                SessionEvent::SectionRevealed { .. }
                | SessionEvent::MoodIntroHidden
                | SessionEvent::CaptionHidden
                | SessionEvent::CueChanged { index: None }
                | SessionEvent::Progress { .. }
                | SessionEvent::HintChanged { .. }
                | SessionEvent::ToastChanged { .. } => {
                    // High-frequency or cosmetic, not worth a line
                }
            },
            Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                info!("Session event channel closed");
                break;
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                info!("Missed {} session events", n);
            }
        }
    }
}

/// Show a native OS dialog for invalid configuration values
fn show_config_invalid_dialog(message: &str, config_path: &Path) {
    let description = format!(
        "Your configuration has an invalid value:\n\n\
        \u{2022} {message}\n\n\
        Please edit the configuration file and restart the app."
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Come Along - Configuration Error")
        .set_description(&description)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Exit".into(),
        ))
        .show();

    if matches!(result, MessageDialogResult::Custom(ref s) if s == "Open Config") {
        if let Err(e) = open::that(config_path) {
            error!("Failed to open config file: {e}");
        }
    }
}

/// Show dialog when config file has TOML parsing errors
fn show_config_parse_error_dialog(parse_error: &TomlParseError, config_path: &Path) {
    let message = format!(
        "Your configuration file has a syntax error and cannot be loaded.\n\n\
        Error: {parse_error}\n\n\
        You can either:\n\
        \u{2022} Open the config file and fix the syntax error\n\
        \u{2022} Reset to a fresh configuration template"
    );

    let result = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Come Along - Configuration Error")
        .set_description(&message)
        .set_buttons(MessageButtons::OkCancelCustom(
            "Open Config".into(),
            "Reset Config".into(),
        ))
        .show();

    match result {
        MessageDialogResult::Custom(button) if button == "Open Config" => {
            if let Err(e) = open::that(config_path) {
                error!("Failed to open config file: {e}");
            }
        }
        MessageDialogResult::Custom(button) if button == "Reset Config" => {
            if let Err(e) = std::fs::write(config_path, CONFIG_TEMPLATE) {
                error!("Failed to reset config file: {e}");
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Come Along - Reset Failed")
                    .set_description(format!("Failed to reset configuration:\n{e}"))
                    .set_buttons(MessageButtons::Ok)
                    .show();
            } else {
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("Come Along - Configuration Reset")
                    .set_description(
                        "Configuration has been reset to the default template.\n\n\
                        Restart the app to use it.",
                    )
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
        }
        _ => {
            // User closed dialog or clicked an unexpected button - just exit
        }
    }
}

/// Show a generic error dialog for unexpected errors
fn show_generic_error_dialog(error_message: &str) {
    let message = format!(
        "An unexpected error occurred:\n\n{error_message}\n\n\
        Please check your configuration file or report this issue."
    );

    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Come Along - Error")
        .set_description(&message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Check if file logging is enabled by reading the config file.
/// This is done before full config loading to set up tracing first.
/// Returns `false` if config doesn't exist or can't be parsed.
fn check_file_logging_enabled() -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let Ok(content) = std::fs::read_to_string(AlongConfig::config_path()) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer();

    if file_logging_enabled {
        let log_path = along_core::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
