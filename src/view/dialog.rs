//! The share dialog as plain data.

/// What the user can do from the share dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareChoice {
    PostToX,
    InstagramImage,
    Cancel,
}

impl ShareChoice {
    pub const ALL: [ShareChoice; 3] = [
        ShareChoice::PostToX,
        ShareChoice::InstagramImage,
        ShareChoice::Cancel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShareChoice::PostToX => "Share on X",
            ShareChoice::InstagramImage => "Share on Instagram",
            ShareChoice::Cancel => "Cancel",
        }
    }

    /// Command that selects this action in the terminal.
    pub fn command(&self) -> &'static str {
        match self {
            ShareChoice::PostToX => "x",
            ShareChoice::InstagramImage => "instagram",
            ShareChoice::Cancel => "cancel",
        }
    }
}

/// One button of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogAction {
    pub choice: ShareChoice,
    pub label: String,
}

/// Fallback link offered when the image could not be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub filename: String,
    pub label: String,
    /// `data:image/png;base64,...`
    pub href: String,
    /// Raw PNG behind `href`
    pub png: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDialog {
    pub title: String,
    pub message: String,
    pub actions: Vec<DialogAction>,
    pub download: Option<DownloadLink>,
    pub notice: Option<String>,
}
