//! Share collaborators for tests.

use std::sync::{Arc, Mutex};

use super::{
    CaptureRegion, CapturedImage, ClipboardError, ClipboardWriter, ScreenCapture, ShareError,
    UrlOpener,
};

/// PNG signature followed by a marker, enough to be told apart in tests.
const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

/// Records regions and returns a fixed image.
#[derive(Debug, Clone, Default)]
pub struct MockScreenCapture {
    regions: Arc<Mutex<Vec<CaptureRegion>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockScreenCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    #[must_use]
    pub fn captured(&self) -> Vec<CaptureRegion> {
        self.regions.lock().unwrap().clone()
    }

    /// Bytes of every image this mock returns.
    #[must_use]
    pub fn png_bytes() -> Vec<u8> {
        FAKE_PNG.to_vec()
    }
}

impl ScreenCapture for MockScreenCapture {
    async fn capture(&self, region: &CaptureRegion) -> Result<CapturedImage, ShareError> {
        if *self.should_fail.lock().unwrap() {
            return Err(ShareError::Capture("mock failure".to_string()));
        }
        self.regions.lock().unwrap().push(region.clone());
        Ok(CapturedImage {
            png: FAKE_PNG.to_vec(),
            width: 1,
            height: 1,
        })
    }
}

/// Clipboard that accepts or refuses images on demand.
#[derive(Debug, Clone, Default)]
pub struct MockClipboard {
    writes: Arc<Mutex<usize>>,
    failure: Arc<Mutex<Option<ClipboardError>>>,
}

impl MockClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail with `error`, or succeed with `None`.
    pub fn set_failure(&self, error: Option<ClipboardError>) {
        *self.failure.lock().unwrap() = error;
    }

    /// Number of images successfully written.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl ClipboardWriter for MockClipboard {
    async fn write_image(&self, _image: &CapturedImage) -> Result<(), ClipboardError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Records opened URLs.
#[derive(Debug, Clone, Default)]
pub struct MockUrlOpener {
    opened: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockUrlOpener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UrlOpener for MockUrlOpener {
    fn open(&self, url: &str) -> Result<(), ShareError> {
        if *self.should_fail.lock().unwrap() {
            return Err(ShareError::Open {
                url: url.to_string(),
                reason: "mock failure".to_string(),
            });
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
