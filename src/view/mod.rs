//! Declarative view models rendered by the front end.

pub mod dialog;
pub mod projection;

pub use dialog::{DialogAction, DownloadLink, ShareChoice, ShareDialog};
pub use projection::{format_clock, ClockText, DisplayProjection};

use crate::types::{Mode, MusicState, Theme};

/// Everything the front end needs to draw the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub mode: Mode,
    pub running: bool,
    pub completed_focus_sessions: u32,
    pub display: DisplayProjection,
    pub music: MusicState,
    pub theme: Theme,
    /// Open share dialog, if any
    pub dialog: Option<ShareDialog>,
}
