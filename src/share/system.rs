//! Platform clipboard and browser.

use std::borrow::Cow;
use std::cell::RefCell;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use arboard::{Clipboard, ImageData};
use tracing::{debug, info, warn};

use super::{CapturedImage, ClipboardError, ClipboardWriter, ShareError, UrlOpener};

/// System clipboard through arboard.
///
/// The clipboard handle is kept alive after a write, since on some
/// platforms the contents vanish when the owning handle is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    handle: RefCell<Option<Clipboard>>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("connected", &self.handle.borrow().is_some())
            .finish()
    }
}

impl ClipboardWriter for SystemClipboard {
    async fn write_image(&self, image: &CapturedImage) -> Result<(), ClipboardError> {
        let decoded = image::load_from_memory(&image.png)
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?
            .to_rgba8();

        let mut handle = self.handle.borrow_mut();
        if handle.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unsupported(e.to_string()))?;
            *handle = Some(clipboard);
        }
        let Some(clipboard) = handle.as_mut() else {
            return Err(ClipboardError::Unsupported("no clipboard handle".to_string()));
        };

        clipboard
            .set_image(ImageData {
                width: decoded.width() as usize,
                height: decoded.height() as usize,
                bytes: Cow::Owned(decoded.into_raw()),
            })
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?;

        debug!("screenshot placed on clipboard");
        Ok(())
    }
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), ShareError> {
        launch(Self::command(url)).map_err(|e| ShareError::Open {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!(url, "opened in browser");
        Ok(())
    }
}

/// Spawns `cmd` and reaps it on a detached thread, so launchers that
/// outlive the call do not linger as zombies.
fn launch(mut cmd: Command) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                warn!(%status, "browser launcher exited with an error");
            }
            Some(status)
        }
        Err(e) => {
            warn!("Failed to wait for browser launcher: {}", e);
            None
        }
    }))
}
