//! Streak sharing.
//!
//! The [`ShareComposer`] builds the share dialog and runs the two share
//! paths:
//!
//! - **X**: opens the intent URL with the summary text pre-filled.
//! - **Instagram**: captures the timer display, tries to put the image on
//!   the clipboard, then opens Instagram. When the clipboard refuses, the
//!   dialog gains a download link carrying the image instead.
//!
//! Capture and clipboard access are asynchronous and run detached from
//! the controller; their result comes back as an [`ImageShareOutcome`].

mod error;
mod mock;
mod snapshot;
mod system;

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{error, info, warn};

use crate::types::{Mode, Theme, TimerState};
use crate::view::{DialogAction, DisplayProjection, DownloadLink, ShareChoice, ShareDialog};

pub use error::{ClipboardError, ShareError};
pub use mock::{MockClipboard, MockScreenCapture, MockUrlOpener};
pub use snapshot::SnapshotRenderer;
pub use system::{SystemBrowser, SystemClipboard};

pub const DIALOG_TITLE: &str = "Share Your Streak";
pub const X_INTENT_URL: &str = "https://twitter.com/intent/tweet";
pub const INSTAGRAM_URL: &str = "https://www.instagram.com/";
pub const DOWNLOAD_FILENAME: &str = "pomodoro_streak.png";
pub const DOWNLOAD_LABEL: &str = "Download Screenshot for Instagram";
pub const COPIED_NOTICE: &str = "Screenshot copied! Paste it in your Instagram story or post.";
pub const FALLBACK_NOTICE: &str = "Could not copy to clipboard. Download and upload to Instagram.";

/// Text shared for a streak of `sessions` completed focus sessions.
pub fn summary_text(sessions: u32) -> String {
    format!("I've completed {sessions} Pomodoro sessions today! 🍅 #ProductivityBoost")
}

/// X intent URL with the summary as the pre-filled post.
pub fn x_intent_url(sessions: u32) -> String {
    let text = summary_text(sessions);
    match url::Url::parse_with_params(X_INTENT_URL, &[("text", text.as_str())]) {
        Ok(url) => url.into(),
        // The base is a constant, so this only guards against editing it badly.
        Err(_) => X_INTENT_URL.to_string(),
    }
}

// ============================================================================
// Captured Region
// ============================================================================

/// Snapshot of what the timer display shows at capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRegion {
    pub mode: Mode,
    pub display: DisplayProjection,
    pub completed_focus_sessions: u32,
    pub theme: Theme,
}

impl CaptureRegion {
    pub fn from_state(state: &TimerState, theme: Theme) -> Self {
        Self {
            mode: state.mode,
            display: DisplayProjection::from_state(state),
            completed_focus_sessions: state.completed_focus_sessions,
            theme,
        }
    }
}

/// A PNG-encoded screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    /// The image as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    pub fn download_link(&self) -> DownloadLink {
        DownloadLink {
            filename: DOWNLOAD_FILENAME.to_string(),
            label: DOWNLOAD_LABEL.to_string(),
            href: self.data_url(),
            png: self.png.clone(),
        }
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Rasterizes the timer display region.
#[allow(async_fn_in_trait)]
pub trait ScreenCapture {
    async fn capture(&self, region: &CaptureRegion) -> Result<CapturedImage, ShareError>;
}

/// Accepts images for the system clipboard.
#[allow(async_fn_in_trait)]
pub trait ClipboardWriter {
    async fn write_image(&self, image: &CapturedImage) -> Result<(), ClipboardError>;
}

/// Opens a URL in a new browser context.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<(), ShareError>;
}

/// Result of the Instagram image path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageShareOutcome {
    /// The image is on the clipboard; the dialog can close.
    Copied,
    /// The clipboard refused; offer the image as a download.
    Fallback(DownloadLink),
}

impl ImageShareOutcome {
    pub fn notice(&self) -> &'static str {
        match self {
            ImageShareOutcome::Copied => COPIED_NOTICE,
            ImageShareOutcome::Fallback(_) => FALLBACK_NOTICE,
        }
    }
}

// ============================================================================
// ShareComposer
// ============================================================================

pub struct ShareComposer<C, B, O> {
    capture: C,
    clipboard: B,
    opener: O,
}

impl<C, B, O> ShareComposer<C, B, O>
where
    C: ScreenCapture,
    B: ClipboardWriter,
    O: UrlOpener,
{
    pub fn new(capture: C, clipboard: B, opener: O) -> Self {
        Self {
            capture,
            clipboard,
            opener,
        }
    }

    /// Builds a fresh dialog for `sessions` completed sessions.
    pub fn compose(&self, sessions: u32) -> ShareDialog {
        ShareDialog {
            title: DIALOG_TITLE.to_string(),
            message: summary_text(sessions),
            actions: ShareChoice::ALL
                .iter()
                .map(|choice| DialogAction {
                    choice: *choice,
                    label: choice.label().to_string(),
                })
                .collect(),
            download: None,
            notice: None,
        }
    }

    /// Opens the X intent. Failures are logged only.
    pub fn share_to_x(&self, sessions: u32) {
        let url = x_intent_url(sessions);
        if let Err(e) = self.opener.open(&url) {
            error!("{}", e);
        }
    }

    /// Captures `region` and hands it to the clipboard, then opens Instagram.
    ///
    /// Only a capture failure is an error; a clipboard failure turns into
    /// [`ImageShareOutcome::Fallback`].
    pub async fn share_image(&self, region: CaptureRegion) -> Result<ImageShareOutcome, ShareError> {
        let image = self.capture.capture(&region).await?;

        let outcome = match self.clipboard.write_image(&image).await {
            Ok(()) => {
                info!("screenshot copied to clipboard");
                ImageShareOutcome::Copied
            }
            Err(e) => {
                warn!("{}", e);
                ImageShareOutcome::Fallback(image.download_link())
            }
        };

        if let Err(e) = self.opener.open(INSTAGRAM_URL) {
            error!("{}", e);
        }
        Ok(outcome)
    }
}

/// Writes the link's image into `dir` under its filename.
pub fn save_download(link: &DownloadLink, dir: &Path) -> Result<PathBuf, ShareError> {
    let path = dir.join(&link.filename);
    std::fs::write(&path, &link.png).map_err(|source| ShareError::Save {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "screenshot saved");
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DurationConfig;

    type TestComposer = ShareComposer<MockScreenCapture, MockClipboard, MockUrlOpener>;

    fn create_composer() -> (TestComposer, MockScreenCapture, MockClipboard, MockUrlOpener) {
        let capture = MockScreenCapture::new();
        let clipboard = MockClipboard::new();
        let opener = MockUrlOpener::new();
        let composer = ShareComposer::new(capture.clone(), clipboard.clone(), opener.clone());
        (composer, capture, clipboard, opener)
    }

    fn region() -> CaptureRegion {
        CaptureRegion::from_state(&TimerState::new(DurationConfig::default()), Theme::Light)
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_summary_text() {
            assert_eq!(
                summary_text(4),
                "I've completed 4 Pomodoro sessions today! 🍅 #ProductivityBoost"
            );
        }

        #[test]
        fn test_x_intent_url_encodes_summary() {
            let url = url::Url::parse(&x_intent_url(3)).unwrap();

            assert_eq!(url.host_str(), Some("twitter.com"));
            assert_eq!(url.path(), "/intent/tweet");
            let text: Vec<_> = url.query_pairs().filter(|(k, _)| k == "text").collect();
            assert_eq!(text.len(), 1);
            assert_eq!(text[0].1, summary_text(3));
            assert!(!url.as_str().contains('#'));
        }

        #[test]
        fn test_data_url() {
            let image = CapturedImage {
                png: vec![1, 2, 3],
                width: 1,
                height: 1,
            };
            assert_eq!(image.data_url(), "data:image/png;base64,AQID");
        }
    }

    mod compose_tests {
        use super::*;

        #[test]
        fn test_compose_dialog() {
            let (composer, _, _, _) = create_composer();

            let dialog = composer.compose(2);

            assert_eq!(dialog.title, "Share Your Streak");
            assert_eq!(dialog.message, summary_text(2));
            let labels: Vec<_> = dialog.actions.iter().map(|a| a.label.as_str()).collect();
            assert_eq!(labels, vec!["Share on X", "Share on Instagram", "Cancel"]);
            assert!(dialog.download.is_none());
            assert!(dialog.notice.is_none());
        }

        #[test]
        fn test_share_to_x_opens_intent() {
            let (composer, _, _, opener) = create_composer();

            composer.share_to_x(5);

            assert_eq!(opener.opened(), vec![x_intent_url(5)]);
        }

        #[test]
        fn test_share_to_x_open_failure_is_swallowed() {
            let (composer, _, _, opener) = create_composer();
            opener.set_should_fail(true);

            composer.share_to_x(5);

            assert!(opener.opened().is_empty());
        }
    }

    mod image_tests {
        use super::*;

        #[tokio::test]
        async fn test_clipboard_success() {
            let (composer, capture, clipboard, opener) = create_composer();

            let outcome = composer.share_image(region()).await.unwrap();

            assert_eq!(outcome, ImageShareOutcome::Copied);
            assert_eq!(outcome.notice(), COPIED_NOTICE);
            assert_eq!(capture.captured(), vec![region()]);
            assert_eq!(clipboard.write_count(), 1);
            assert_eq!(opener.opened(), vec![INSTAGRAM_URL.to_string()]);
        }

        #[tokio::test]
        async fn test_clipboard_rejected_falls_back_to_download() {
            let (composer, _, clipboard, opener) = create_composer();
            clipboard.set_failure(Some(ClipboardError::Rejected("denied".to_string())));

            let outcome = composer.share_image(region()).await.unwrap();

            let ImageShareOutcome::Fallback(link) = &outcome else {
                panic!("expected fallback, got {:?}", outcome);
            };
            assert_eq!(link.filename, "pomodoro_streak.png");
            assert_eq!(link.label, "Download Screenshot for Instagram");
            assert!(link.href.starts_with("data:image/png;base64,"));
            assert_eq!(link.png, MockScreenCapture::png_bytes());
            assert_eq!(outcome.notice(), FALLBACK_NOTICE);
            assert_eq!(opener.opened(), vec![INSTAGRAM_URL.to_string()]);
        }

        #[tokio::test]
        async fn test_clipboard_unsupported_falls_back_to_download() {
            let (composer, _, clipboard, _) = create_composer();
            clipboard.set_failure(Some(ClipboardError::Unsupported("headless".to_string())));

            let outcome = composer.share_image(region()).await.unwrap();

            assert!(matches!(outcome, ImageShareOutcome::Fallback(_)));
        }

        #[tokio::test]
        async fn test_capture_failure_opens_nothing() {
            let (composer, capture, clipboard, opener) = create_composer();
            capture.set_should_fail(true);

            let result = composer.share_image(region()).await;

            assert!(matches!(result, Err(ShareError::Capture(_))));
            assert_eq!(clipboard.write_count(), 0);
            assert!(opener.opened().is_empty());
        }
    }

    mod save_tests {
        use super::*;

        #[test]
        fn test_save_download_writes_file() {
            let dir = tempfile::tempdir().unwrap();
            let link = CapturedImage {
                png: MockScreenCapture::png_bytes(),
                width: 1,
                height: 1,
            }
            .download_link();

            let path = save_download(&link, dir.path()).unwrap();

            assert_eq!(path, dir.path().join("pomodoro_streak.png"));
            assert_eq!(std::fs::read(path).unwrap(), MockScreenCapture::png_bytes());
        }

        #[test]
        fn test_save_download_missing_dir() {
            let link = CapturedImage {
                png: vec![0],
                width: 1,
                height: 1,
            }
            .download_link();

            let result = save_download(&link, Path::new("/nonexistent/dir"));
            assert!(matches!(result, Err(ShareError::Save { .. })));
        }
    }
}
