//! The widget controller.
//!
//! Owns every piece of widget state and is the only place where it
//! changes. Inputs arrive as [`WidgetEvent`]s, one at a time, from the
//! event loop. Work that must not block the loop (the screenshot flow) is
//! handed back as a [`CaptureJob`] for the loop to spawn; its result comes
//! back later as [`WidgetEvent::ShareFinished`].

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::rc::Rc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::music::{MusicDelegate, MusicError, PlayerEvent, PlayerFactory};
use crate::preferences::{load_theme, store_theme, PreferenceStore};
use crate::share::{
    save_download, CaptureRegion, ClipboardWriter, ImageShareOutcome, ScreenCapture,
    ShareComposer, ShareError, UrlOpener,
};
use crate::sound::{SoundPlayer, SoundSource};
use crate::timer::{Tick, TickSource, TimerEngine, TimerEvent};
use crate::types::{DurationConfig, Mode, MusicState, Theme, TimerState, TrackId, Volume};
use crate::view::{DisplayProjection, ShareChoice, ShareDialog, WidgetView};

// ============================================================================
// Events
// ============================================================================

/// A user action, the counterpart of one control on the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Pause,
    Toggle,
    Reset,
    SelectMode(Mode),
    OpenShare,
    Share(ShareChoice),
    /// Saves the offered download into a directory
    SaveScreenshot(PathBuf),
    ToggleDarkMode,
    ToggleMusic,
    SetVolume(Volume),
    ChangeTrack(TrackId),
}

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum WidgetEvent {
    Ui(UiAction),
    Tick(Tick),
    Player(PlayerEvent),
    ShareFinished(Result<ImageShareOutcome, ShareError>),
}

type ShareFuture = Pin<Box<dyn Future<Output = Result<ImageShareOutcome, ShareError>>>>;

/// A detached screenshot share, to be spawned on the local task set.
pub struct CaptureJob {
    future: ShareFuture,
}

impl CaptureJob {
    fn new(future: impl Future<Output = Result<ImageShareOutcome, ShareError>> + 'static) -> Self {
        Self {
            future: Box::pin(future),
        }
    }

    pub async fn run(self) -> Result<ImageShareOutcome, ShareError> {
        self.future.await
    }
}

impl fmt::Debug for CaptureJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureJob").finish_non_exhaustive()
    }
}

/// What one event changed, for the front end to show.
#[derive(Debug, Default)]
pub struct Reaction {
    /// Transitions reported by the countdown engine
    pub timer_events: Vec<TimerEvent>,
    /// One-off message for the user
    pub notice: Option<String>,
    /// True if the share dialog opened, closed or changed
    pub dialog_changed: bool,
    /// Screenshot flow to spawn
    pub capture: Option<CaptureJob>,
}

// ============================================================================
// TimerController
// ============================================================================

pub struct TimerController<T, F, C, B, O>
where
    T: TickSource,
    F: PlayerFactory,
{
    engine: TimerEngine<T>,
    timer_events: mpsc::UnboundedReceiver<TimerEvent>,
    music: MusicDelegate<F>,
    share: Rc<ShareComposer<C, B, O>>,
    preferences: Box<dyn PreferenceStore>,
    sound: Option<Box<dyn SoundPlayer>>,
    chime: SoundSource,
    theme: Theme,
    dialog: Option<ShareDialog>,
}

impl<T, F, C, B, O> TimerController<T, F, C, B, O>
where
    T: TickSource,
    F: PlayerFactory,
    C: ScreenCapture + 'static,
    B: ClipboardWriter + 'static,
    O: UrlOpener + 'static,
{
    /// Creates the controller. The theme is read from `preferences` once.
    pub fn new(
        durations: DurationConfig,
        ticker: T,
        music: MusicDelegate<F>,
        share: ShareComposer<C, B, O>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let (event_tx, timer_events) = mpsc::unbounded_channel();
        let theme = load_theme(preferences.as_ref());
        debug!(?theme, "theme loaded");

        Self {
            engine: TimerEngine::new(durations, ticker, event_tx),
            timer_events,
            music,
            share: Rc::new(share),
            preferences,
            sound: None,
            chime: SoundSource::Chime,
            theme,
            dialog: None,
        }
    }

    /// Plays `chime` on `player` whenever a countdown completes.
    #[must_use]
    pub fn with_sound(mut self, player: Box<dyn SoundPlayer>, chime: SoundSource) -> Self {
        self.sound = Some(player);
        self.chime = chime;
        self
    }

    pub fn state(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn music(&self) -> &MusicState {
        self.music.state()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn dialog(&self) -> Option<&ShareDialog> {
        self.dialog.as_ref()
    }

    pub fn is_ticking(&self) -> bool {
        self.engine.is_ticking()
    }

    /// Current view model.
    pub fn view(&self) -> WidgetView {
        let state = self.engine.state();
        WidgetView {
            mode: state.mode,
            running: state.running,
            completed_focus_sessions: state.completed_focus_sessions,
            display: DisplayProjection::from_state(state),
            music: self.music.state().clone(),
            theme: self.theme,
            dialog: self.dialog.clone(),
        }
    }

    /// Applies one event.
    pub fn handle(&mut self, event: WidgetEvent) -> Result<Reaction> {
        let mut reaction = Reaction::default();

        match event {
            WidgetEvent::Ui(action) => self.handle_action(action, &mut reaction)?,
            WidgetEvent::Tick(tick) => {
                self.engine.tick(tick)?;
            }
            WidgetEvent::Player(event) => self.music.handle_event(event),
            WidgetEvent::ShareFinished(result) => self.finish_share(result, &mut reaction),
        }

        while let Ok(event) = self.timer_events.try_recv() {
            if let TimerEvent::Completed { .. } = event {
                self.play_chime();
            }
            reaction.timer_events.push(event);
        }
        Ok(reaction)
    }

    fn handle_action(&mut self, action: UiAction, reaction: &mut Reaction) -> Result<()> {
        debug!(?action, "ui action");

        match action {
            UiAction::Start => {
                self.engine.start()?;
            }
            UiAction::Pause => {
                self.engine.pause()?;
            }
            UiAction::Toggle => self.engine.toggle()?,
            UiAction::Reset => self.engine.reset()?,
            UiAction::SelectMode(mode) => self.engine.select_mode(mode)?,
            UiAction::OpenShare => {
                let sessions = self.engine.state().completed_focus_sessions;
                self.dialog = Some(self.share.compose(sessions));
                reaction.dialog_changed = true;
            }
            UiAction::Share(choice) => self.handle_share(choice, reaction),
            UiAction::SaveScreenshot(dir) => {
                reaction.notice = Some(self.save_screenshot(dir));
            }
            UiAction::ToggleDarkMode => {
                self.theme = self.theme.toggled();
                if let Err(e) = store_theme(self.preferences.as_mut(), self.theme) {
                    warn!("Dark mode preference not saved: {}", e);
                }
                info!(theme = ?self.theme, "theme changed");
            }
            UiAction::ToggleMusic => {
                let result = self.music.toggle();
                self.log_music_error(result);
            }
            UiAction::SetVolume(volume) => self.music.set_volume(volume),
            UiAction::ChangeTrack(track) => {
                let result = self.music.change_track(track);
                self.log_music_error(result);
            }
        }
        Ok(())
    }

    fn handle_share(&mut self, choice: ShareChoice, reaction: &mut Reaction) {
        if self.dialog.is_none() {
            reaction.notice = Some("Open the share dialog first.".to_string());
            return;
        }

        match choice {
            ShareChoice::PostToX => {
                self.share
                    .share_to_x(self.engine.state().completed_focus_sessions);
                self.dialog = None;
                reaction.dialog_changed = true;
            }
            ShareChoice::InstagramImage => {
                let region = CaptureRegion::from_state(self.engine.state(), self.theme);
                let share = Rc::clone(&self.share);
                reaction.capture = Some(CaptureJob::new(async move {
                    share.share_image(region).await
                }));
            }
            ShareChoice::Cancel => {
                self.dialog = None;
                reaction.dialog_changed = true;
            }
        }
    }

    fn finish_share(
        &mut self,
        result: Result<ImageShareOutcome, ShareError>,
        reaction: &mut Reaction,
    ) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        let notice = outcome.notice().to_string();
        match outcome {
            ImageShareOutcome::Copied => {
                self.dialog = None;
                reaction.notice = Some(notice);
            }
            ImageShareOutcome::Fallback(link) => {
                // The dialog may have been cancelled while the capture ran.
                let sessions = self.engine.state().completed_focus_sessions;
                let share = Rc::clone(&self.share);
                let dialog = self.dialog.get_or_insert_with(|| share.compose(sessions));
                dialog.download = Some(link);
                dialog.notice = Some(notice);
            }
        }
        reaction.dialog_changed = true;
    }

    fn save_screenshot(&self, dir: PathBuf) -> String {
        let link = self.dialog.as_ref().and_then(|dialog| dialog.download.as_ref());
        let result = match link {
            Some(link) => save_download(link, &dir),
            None => Err(ShareError::NothingToSave),
        };

        match result {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                warn!("{}", e);
                e.to_string()
            }
        }
    }

    fn play_chime(&self) {
        let Some(player) = self.sound.as_ref() else {
            return;
        };
        if let Err(e) = player.play(&self.chime) {
            warn!("Completion sound failed: {}", e);
        }
    }

    fn log_music_error(&self, result: std::result::Result<(), MusicError>) {
        if let Err(e) = result {
            error!(track = %self.music.state().selected_track, "Music unavailable: {}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
