//! The playback/lyric-sync session.
//!
//! [`SessionController`] owns every piece of mutable state in the greeting:
//! which section is mounted, whether it has been revealed, the playing flag,
//! the active caption and the transient hint and toast. Inputs arrive from UI
//! actions, from the media element (position updates, end of media) and from
//! deferred effects delivered by the [`Scheduler`]. All of them serialize on
//! one lock, so the session behaves as a single logical timeline.

use crate::config::TimingConfig;
use crate::cue::CueTable;
use crate::error::{CoreError, Result};
use crate::media::MediaElement;
use crate::mood::Mood;
use crate::notify::{Hint, Toast};
use crate::scheduler::Scheduler;
use crate::section::Section;
use crate::time::{duration_from_secs_f64, DurationExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "along::controller";

/// Shown under the controls when playback starts from a user action
pub const PLAY_HINT: &str = "ok, mình nghe nha 🎧";

/// Toast shown when the platform refuses to play the song
pub const PLAYBACK_FAILED_TOAST: &str = "chưa phát được nhạc, bấm play thử lại nha 🎧";

/// Events emitted by the session controller
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A section was mounted (not yet revealed)
    SectionEntered { section: Section },
    /// The section's entrance animation should start
    SectionRevealed { section: Section },
    MoodSelected { mood: Mood },
    MoodIntroHidden,
    /// The current caption started fading out ahead of a swap
    CaptionHidden,
    /// The active caption changed (and is visible if `index` is set)
    CueChanged { index: Option<usize> },
    PlaybackChanged { playing: bool },
    /// The media element refused to play; the session keeps going paused
    PlaybackFailed { reason: String },
    Progress { position: Duration, fraction: f64 },
    HintChanged { text: String },
    ToastChanged { message: String, visible: bool },
    /// The session was torn down
    Closed,
}

/// Everything a view needs to render the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub section: Section,
    /// Whether the current section's entrance animation has been triggered
    pub revealed: bool,
    pub mood: Option<Mood>,
    pub mood_intro_visible: bool,
    pub playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// Cosmetic progress in `0.0..=1.0`
    pub progress: f64,
    pub active_cue: Option<usize>,
    pub caption: Option<String>,
    pub caption_visible: bool,
    pub hint: String,
    pub toast: Toast,
    pub closed: bool,
}

/// Deferred absolute-state changes. Each carries the epoch or generation it
/// was scheduled under and is dropped if that has moved on.
#[derive(Debug)]
enum Effect {
    Reveal { section: Section, epoch: u64 },
    /// Reveal the player and start the song after a mood pick
    StartPlayer { epoch: u64 },
    ShowCue { index: usize, epoch: u64 },
    HideMoodIntro,
    ClearHint { generation: u64 },
    HideToast { generation: u64 },
    ClearToast { generation: u64 },
}

#[derive(Debug, Default)]
struct SessionInner {
    section: Section,
    revealed: bool,
    /// Bumped on every section entry
    section_epoch: u64,
    mood: Option<Mood>,
    mood_intro_visible: bool,
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
    active_cue: Option<usize>,
    /// Target of a caption swap waiting out its hidden window
    pending_cue: Option<usize>,
    caption_visible: bool,
    /// Bumped on every replay
    playback_epoch: u64,
    /// Counter for play requests sent to the media element
    play_requests: u64,
    /// The play request whose outcome still applies, if one is in flight
    play_pending: Option<u64>,
    /// Position the last replay rewound from. Updates at or past it predate
    /// the seek and are ignored until the media reports an earlier position.
    rewind_from: Option<Duration>,
    hint: Hint,
    toast: Toast,
    closed: bool,
}

impl SessionInner {
    fn progress(&self) -> f64 {
        self.position
            .fraction_of(self.duration.unwrap_or(Duration::ZERO))
    }
}

/// Controller for one greeting session
pub struct SessionController {
    inner: RwLock<SessionInner>,
    cues: CueTable,
    timing: TimingConfig,
    media: Arc<dyn MediaElement>,
    scheduler: Scheduler<Effect>,
    effects: Mutex<Option<mpsc::UnboundedReceiver<Effect>>>,
    event_tx: broadcast::Sender<SessionEvent>,
    cancel_token: CancellationToken,
}

impl SessionController {
    /// Create a new session in the intro section
    ///
    /// # Arguments
    /// * `cues` - Caption timeline synced to the media position
    /// * `timing` - Fixed delays of the experience
    /// * `media` - The audio element this session drives
    /// * `cancel_token` - Optional external cancellation token for teardown
    #[must_use]
    pub fn new(
        cues: CueTable,
        timing: TimingConfig,
        media: Arc<dyn MediaElement>,
        cancel_token: Option<CancellationToken>,
    ) -> Arc<Self> {
        let cancel_token = cancel_token.unwrap_or_default();
        let (scheduler, effects) = Scheduler::new(cancel_token.clone());
        let (event_tx, _) = broadcast::channel(64);

        Arc::new(Self {
            inner: RwLock::new(SessionInner::default()),
            cues,
            timing,
            media,
            scheduler,
            effects: Mutex::new(Some(effects)),
            event_tx,
            cancel_token,
        })
    }

    /// Subscribe to session events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    #[must_use]
    pub fn cues(&self) -> &CueTable {
        &self.cues
    }

    /// Get a clone of the cancellation token
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Schedule the intro reveal and start applying deferred effects in a
    /// background task. Runs until [`SessionController::shutdown`].
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.scheduler.schedule(
            self.timing.intro_reveal(),
            Effect::Reveal {
                section: Section::Intro,
                epoch: 0,
            },
        );
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self: &Arc<Self>) {
        let Some(mut effects) = self.effects.lock().await.take() else {
            warn!(target: LOG_TARGET, "Session effect loop already running");
            return;
        };

        info!(target: LOG_TARGET, "Session started ({} captions)", self.cues.len());

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!(target: LOG_TARGET, "Session effect loop shutting down");
                    break;
                }
                effect = effects.recv() => {
                    match effect {
                        Some(effect) => self.apply(effect).await,
                        None => break,
                    }
                }
            }
        }
    }

    /// Tear the session down: pending effects are dropped and every later
    /// input is ignored.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        let mut inner = self.inner.write().await;
        if !inner.closed {
            inner.closed = true;
            info!(target: LOG_TARGET, "Session torn down");
            self.emit(SessionEvent::Closed);
        }
    }

    /// Current state for rendering
    pub async fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read().await;
        SessionSnapshot {
            section: inner.section,
            revealed: inner.revealed,
            mood: inner.mood,
            mood_intro_visible: inner.mood_intro_visible,
            playing: inner.playing,
            position: inner.position,
            duration: inner.duration,
            progress: inner.progress(),
            active_cue: inner.active_cue,
            caption: inner
                .active_cue
                .and_then(|index| self.cues.get(index))
                .map(|cue| cue.text.clone()),
            caption_visible: inner.caption_visible,
            hint: inner.hint.text.clone(),
            toast: inner.toast.clone(),
            closed: inner.closed,
        }
    }

    /// Leave the intro for the mood picker.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] outside the intro section and
    /// [`CoreError::SessionClosed`] after teardown.
    pub async fn go_to_mood(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        Self::ensure(&inner, Section::Intro, "open the mood picker")?;

        let epoch = self.enter_section(&mut inner, Section::Mood);
        self.scheduler.schedule(
            self.timing.section_reveal(),
            Effect::Reveal {
                section: Section::Mood,
                epoch,
            },
        );
        Ok(())
    }

    /// Pick a mood and move to the player. Playback starts with the player's
    /// entrance; the mood's intro lines fade out later on their own.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] outside the mood section (a
    /// mood can only be picked once) and [`CoreError::SessionClosed`] after
    /// teardown.
    pub async fn select_mood(&self, mood: Mood) -> Result<()> {
        let mut inner = self.inner.write().await;
        Self::ensure(&inner, Section::Mood, "pick a mood")?;

        info!(target: LOG_TARGET, "Mood selected: {mood}");
        inner.mood = Some(mood);
        inner.mood_intro_visible = true;
        self.emit(SessionEvent::MoodSelected { mood });

        let epoch = self.enter_section(&mut inner, Section::Player);
        self.scheduler
            .schedule(self.timing.section_reveal(), Effect::StartPlayer { epoch });
        self.scheduler
            .schedule(self.timing.mood_intro(), Effect::HideMoodIntro);
        Ok(())
    }

    /// Invert the playing flag. Returns the new flag.
    ///
    /// A refused play leaves the flag `false` and shows a toast instead of
    /// failing. Toggling while a play request is still in flight withdraws
    /// it and pauses.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionClosed`] after teardown.
    pub async fn toggle_play(&self) -> Result<bool> {
        let ticket = {
            let mut inner = self.inner.write().await;
            Self::ensure_open(&inner)?;

            if inner.playing || inner.play_pending.is_some() {
                inner.play_pending = None;
                if let Err(e) = self.media.pause().await {
                    warn!(target: LOG_TARGET, "Pause failed: {e}");
                }
                inner.playing = false;
                self.emit(SessionEvent::PlaybackChanged { playing: false });
                return Ok(false);
            }

            Self::begin_play(&mut inner)
        };

        Ok(self.await_play(ticket, true).await)
    }

    /// Restart the song from the top and re-enter the player.
    ///
    /// Calling it repeatedly leaves the session in the same reset state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] from the intro or mood
    /// sections and [`CoreError::SessionClosed`] after teardown.
    pub async fn replay(&self) -> Result<()> {
        let ticket = self.rewind().await?;
        self.await_play(ticket, false).await;
        Ok(())
    }

    /// Reset state for [`SessionController::replay`] and issue its play
    /// request. Returns the request's ticket.
    async fn rewind(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Self::ensure_open(&inner)?;
        if !inner.section.allows_replay() {
            return Err(CoreError::InvalidTransition {
                from: inner.section,
                action: "replay",
            });
        }

        info!(target: LOG_TARGET, "Replay from {}", inner.section);
        match self.media.seek(Duration::ZERO).await {
            Ok(()) => {
                if !inner.position.is_zero() {
                    inner.rewind_from = Some(inner.position);
                }
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Seek to start failed: {e}");
                inner.rewind_from = None;
            }
        }

        inner.playback_epoch += 1;
        inner.position = Duration::ZERO;
        inner.active_cue = None;
        inner.pending_cue = None;
        inner.caption_visible = false;
        inner.hint.reset();
        self.emit(SessionEvent::CueChanged { index: None });
        self.emit(SessionEvent::HintChanged {
            text: String::new(),
        });
        self.emit(SessionEvent::Progress {
            position: Duration::ZERO,
            fraction: 0.0,
        });

        let epoch = self.enter_section(&mut inner, Section::Player);
        self.scheduler.schedule(
            self.timing.section_reveal(),
            Effect::Reveal {
                section: Section::Player,
                epoch,
            },
        );

        Ok(Self::begin_play(&mut inner))
    }

    /// Media position update. Drives progress, caption sync and the ending
    /// trigger. Ignored after teardown, and after a replay until the media
    /// reports a position from before the rewind.
    pub async fn on_position(&self, position: Duration, duration: Option<Duration>) {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return;
        }

        if let Some(rewound_from) = inner.rewind_from {
            if position >= rewound_from {
                debug!(
                    target: LOG_TARGET,
                    "Ignoring stale position {}ms after replay",
                    position.as_millis_u64()
                );
                return;
            }
            inner.rewind_from = None;
        }

        inner.position = position;
        inner.duration = duration.filter(|d| !d.is_zero());
        self.emit(SessionEvent::Progress {
            position,
            fraction: inner.progress(),
        });

        self.sync_caption(&mut inner, position);

        let reached_ending = self.ending_at().is_some_and(|at| position >= at);
        if inner.section == Section::Player && reached_ending {
            info!(
                target: LOG_TARGET,
                "Reached {:?} after the last caption, showing ending",
                self.timing.trailing_window()
            );
            self.enter_ending(&mut inner);
        }
    }

    /// [`SessionController::on_position`] for raw media element values in
    /// seconds. An unknown (NaN) duration is passed on as `None`.
    pub async fn on_position_secs(&self, position_secs: f64, duration_secs: f64) {
        let position = duration_from_secs_f64(position_secs).unwrap_or(Duration::ZERO);
        let duration = duration_from_secs_f64(duration_secs);
        self.on_position(position, duration).await;
    }

    /// The media reached its end on its own. Ignored after teardown.
    pub async fn on_ended(&self) {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return;
        }

        if inner.playing {
            inner.playing = false;
            self.emit(SessionEvent::PlaybackChanged { playing: false });
        }
        if inner.section == Section::Player {
            info!(target: LOG_TARGET, "Song finished, showing ending");
            self.enter_ending(&mut inner);
        }
    }

    /// Show a self-expiring toast, replacing any current one.
    pub async fn show_toast(&self, message: impl Into<String>) {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return;
        }
        self.toast(&mut inner, message.into());
    }

    /// Position that triggers the ending, `None` if the trailing window
    /// reaches past any representable position
    fn ending_at(&self) -> Option<Duration> {
        self.cues
            .last()
            .time
            .checked_add(self.timing.trailing_window())
    }

    fn ensure_open(inner: &SessionInner) -> Result<()> {
        if inner.closed {
            Err(CoreError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn ensure(inner: &SessionInner, expected: Section, action: &'static str) -> Result<()> {
        Self::ensure_open(inner)?;
        if inner.section == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: inner.section,
                action,
            })
        }
    }

    /// Mount `section` hidden. Returns the epoch its reveal must carry.
    fn enter_section(&self, inner: &mut SessionInner, section: Section) -> u64 {
        debug!(target: LOG_TARGET, "Section {} -> {}", inner.section, section);
        inner.section = section;
        inner.revealed = false;
        inner.section_epoch += 1;
        self.emit(SessionEvent::SectionEntered { section });
        inner.section_epoch
    }

    fn enter_ending(&self, inner: &mut SessionInner) {
        let epoch = self.enter_section(inner, Section::Ending);
        self.scheduler.schedule(
            self.timing.section_reveal(),
            Effect::Reveal {
                section: Section::Ending,
                epoch,
            },
        );
    }

    fn sync_caption(&self, inner: &mut SessionInner, position: Duration) {
        let target = self.cues.active_index(position);

        if target == inner.active_cue {
            // Position came back to the shown caption before a swap landed
            if inner.pending_cue.take().is_some() {
                inner.caption_visible = inner.active_cue.is_some();
                self.emit(SessionEvent::CueChanged {
                    index: inner.active_cue,
                });
            }
            return;
        }

        let Some(index) = target else {
            return;
        };
        if inner.pending_cue == Some(index) {
            return;
        }

        debug!(
            target: LOG_TARGET,
            "Caption swap to {index} at {}ms",
            position.as_millis_u64()
        );
        inner.pending_cue = Some(index);
        if inner.caption_visible {
            inner.caption_visible = false;
            self.emit(SessionEvent::CaptionHidden);
        }
        self.scheduler.schedule(
            self.timing.caption_swap(),
            Effect::ShowCue {
                index,
                epoch: inner.playback_epoch,
            },
        );
    }

    /// Register a play request. Any earlier request still in flight no
    /// longer applies.
    fn begin_play(inner: &mut SessionInner) -> u64 {
        inner.play_requests += 1;
        inner.play_pending = Some(inner.play_requests);
        inner.play_requests
    }

    /// Wait for the media element to answer the play request `ticket`, then
    /// apply the outcome unless the request was withdrawn. The session lock is
    /// not held while waiting. Returns the playing flag afterwards.
    async fn await_play(&self, ticket: u64, announce: bool) -> bool {
        let result = tokio::select! {
            () = self.cancel_token.cancelled() => {
                debug!(target: LOG_TARGET, "Play request {ticket} abandoned on teardown");
                return false;
            }
            result = self.media.play() => result,
        };

        let mut inner = self.inner.write().await;
        if inner.closed || inner.play_pending != Some(ticket) {
            debug!(target: LOG_TARGET, "Play request {ticket} was superseded");
            return inner.playing;
        }
        inner.play_pending = None;
        self.finish_play(&mut inner, result, announce);
        inner.playing
    }

    fn finish_play(&self, inner: &mut SessionInner, result: Result<()>, announce: bool) {
        match result {
            Ok(()) => {
                inner.playing = true;
                self.emit(SessionEvent::PlaybackChanged { playing: true });
                if announce {
                    let generation = inner.hint.show(PLAY_HINT);
                    self.emit(SessionEvent::HintChanged {
                        text: PLAY_HINT.to_string(),
                    });
                    self.scheduler
                        .schedule(self.timing.hint(), Effect::ClearHint { generation });
                }
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Playback refused: {e}");
                inner.playing = false;
                self.emit(SessionEvent::PlaybackFailed {
                    reason: e.to_string(),
                });
                self.toast(inner, PLAYBACK_FAILED_TOAST.to_string());
            }
        }
    }

    fn toast(&self, inner: &mut SessionInner, message: String) {
        let generation = inner.toast.show(message.clone());
        self.emit(SessionEvent::ToastChanged {
            message,
            visible: true,
        });
        self.scheduler
            .schedule(self.timing.toast_hide(), Effect::HideToast { generation });
        self.scheduler
            .schedule(self.timing.toast_clear(), Effect::ClearToast { generation });
    }

    async fn apply(self: &Arc<Self>, effect: Effect) {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return;
        }

        match effect {
            Effect::Reveal { section, epoch } => {
                if inner.section == section && inner.section_epoch == epoch && !inner.revealed {
                    inner.revealed = true;
                    self.emit(SessionEvent::SectionRevealed { section });
                }
            }
            Effect::StartPlayer { epoch } => {
                if inner.section == Section::Player && inner.section_epoch == epoch {
                    inner.revealed = true;
                    self.emit(SessionEvent::SectionRevealed {
                        section: Section::Player,
                    });
                    let ticket = Self::begin_play(&mut inner);
                    // Later effects must not wait on the media element
                    let controller = Arc::clone(self);
                    tokio::spawn(async move {
                        controller.await_play(ticket, true).await;
                    });
                }
            }
            Effect::ShowCue { index, epoch } => {
                if inner.playback_epoch == epoch && inner.pending_cue == Some(index) {
                    inner.pending_cue = None;
                    inner.active_cue = Some(index);
                    inner.caption_visible = true;
                    self.emit(SessionEvent::CueChanged { index: Some(index) });
                }
            }
            Effect::HideMoodIntro => {
                if inner.mood_intro_visible {
                    inner.mood_intro_visible = false;
                    self.emit(SessionEvent::MoodIntroHidden);
                }
            }
            Effect::ClearHint { generation } => {
                if inner.hint.clear(generation) {
                    self.emit(SessionEvent::HintChanged {
                        text: String::new(),
                    });
                }
            }
            Effect::HideToast { generation } => {
                if inner.toast.hide(generation) {
                    self.emit(SessionEvent::ToastChanged {
                        message: inner.toast.message.clone(),
                        visible: false,
                    });
                }
            }
            Effect::ClearToast { generation } => {
                if inner.toast.clear(generation) {
                    self.emit(SessionEvent::ToastChanged {
                        message: String::new(),
                        visible: false,
                    });
                }
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}
