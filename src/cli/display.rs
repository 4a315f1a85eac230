//! Display utilities for the Pomodoro widget.
//!
//! Each `render_*` function builds the text for one part of the widget,
//! and the matching `show_*` function prints it.

use std::io::Write;

use super::input::HELP;
use crate::music::TrackCatalog;
use crate::timer::TimerEvent;
use crate::types::TrackId;
use crate::view::{format_clock, ShareDialog, WidgetView};

/// Width of the textual progress bar in cells.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for terminal output.
pub struct Display;

impl Display {
    /// Renders the whole widget.
    pub fn render_view(view: &WidgetView) -> String {
        let state = if view.running { "running" } else { "paused" };
        let percent = (view.display.progress * 100.0).round() as u32;
        let music_state = if view.music.playing { "playing" } else { "paused" };
        let theme = if view.theme.is_dark() { "dark" } else { "light" };

        let mut out = format!(
            "🍅 {} [{}]\n   {}  {} {:>3}%\n   Sessions: {}   Theme: {}\n   Music: {} ({}, volume {})",
            view.mode.label(),
            state,
            view.display.clock,
            Self::progress_bar(view.display.progress),
            percent,
            view.completed_focus_sessions,
            theme,
            view.music.selected_track,
            music_state,
            view.music.volume.get(),
        );
        if let Some(dialog) = &view.dialog {
            out.push('\n');
            out.push_str(&Self::render_dialog(dialog));
        }
        out
    }

    /// Renders the share dialog with its actions and any fallback link.
    pub fn render_dialog(dialog: &ShareDialog) -> String {
        let actions = dialog
            .actions
            .iter()
            .map(|a| format!("[{}] {}", a.choice.command(), a.label))
            .collect::<Vec<_>>()
            .join("   ");

        let mut lines = vec![
            format!("┌ {}", dialog.title),
            format!("│ {}", dialog.message),
            format!("│ {}", actions),
        ];
        if let Some(link) = &dialog.download {
            lines.push(format!(
                "│ {}: {} (type 'save [dir]')",
                link.label, link.filename
            ));
        }
        if let Some(notice) = &dialog.notice {
            lines.push(format!("│ {}", notice));
        }
        lines.push("└".to_string());
        lines.join("\n")
    }

    /// Renders a timer transition. Ticks have no line of their own.
    pub fn render_timer_event(event: &TimerEvent) -> Option<String> {
        let line = match event {
            TimerEvent::Started {
                mode,
                remaining_seconds,
            } => format!("▶ {} started ({})", mode.label(), format_clock(*remaining_seconds)),
            TimerEvent::Paused { remaining_seconds } => {
                format!("⏸ Paused at {}", format_clock(*remaining_seconds))
            }
            TimerEvent::Reset { mode } => format!("↺ {} reset", mode.label()),
            TimerEvent::ModeSelected { mode } => format!("Mode: {}", mode.label()),
            TimerEvent::Completed {
                mode,
                completed_focus_sessions,
                next_mode,
            } => format!(
                "✔ {} complete! Sessions: {}. Next: {}",
                mode.label(),
                completed_focus_sessions,
                next_mode.label()
            ),
            TimerEvent::Tick { .. } => return None,
        };
        Some(line)
    }

    /// Renders the track list, marking the selected track.
    pub fn render_tracks(catalog: &TrackCatalog, selected: &TrackId) -> String {
        catalog
            .iter()
            .map(|entry| {
                let marker = if entry.id == *selected { '*' } else { ' ' };
                format!("{} {:<14} {}", marker, entry.id.as_str(), entry.title)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_help() -> String {
        let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
        HELP.iter()
            .map(|(usage, description)| format!("  {:<width$}  {}", usage, description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn show_view(view: &WidgetView) {
        println!("{}", Self::render_view(view));
    }

    pub fn show_dialog(dialog: &ShareDialog) {
        println!("{}", Self::render_dialog(dialog));
    }

    pub fn show_timer_event(event: &TimerEvent) {
        if let Some(line) = Self::render_timer_event(event) {
            println!("{}", line);
        }
    }

    /// Rewrites the current line with the countdown.
    pub fn show_tick(view: &WidgetView) {
        print!(
            "\r{} {} {}",
            view.mode.label(),
            view.display.clock,
            Self::progress_bar(view.display.progress)
        );
        // A lost refresh is redrawn on the next tick.
        let _ = std::io::stdout().flush();
    }

    pub fn show_tracks(catalog: &TrackCatalog, selected: &TrackId) {
        println!("{}", Self::render_tracks(catalog, selected));
    }

    pub fn show_help() {
        println!("Commands:");
        println!("{}", Self::render_help());
    }

    pub fn show_notice(message: &str) {
        println!("{}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn progress_bar(progress: f64) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::{summary_text, CapturedImage};
    use crate::types::{DurationConfig, Mode, MusicState, Theme, TimerState, Volume};
    use crate::view::{DialogAction, DisplayProjection, ShareChoice};

    fn create_view(remaining: u32) -> WidgetView {
        let mut state = TimerState::new(DurationConfig::default());
        state.remaining_seconds = remaining;
        WidgetView {
            mode: state.mode,
            running: true,
            completed_focus_sessions: 2,
            display: DisplayProjection::from_state(&state),
            music: MusicState::new(TrackId::new("calm-drone"), Volume::default()),
            theme: Theme::Light,
            dialog: None,
        }
    }

    fn create_dialog() -> ShareDialog {
        ShareDialog {
            title: "Share Your Streak".to_string(),
            message: summary_text(2),
            actions: ShareChoice::ALL
                .iter()
                .map(|c| DialogAction {
                    choice: *c,
                    label: c.label().to_string(),
                })
                .collect(),
            download: None,
            notice: None,
        }
    }

    mod progress_bar_tests {
        use super::*;

        #[test]
        fn test_full_and_empty() {
            assert_eq!(Display::progress_bar(1.0), "█".repeat(BAR_WIDTH));
            assert_eq!(Display::progress_bar(0.0), "░".repeat(BAR_WIDTH));
        }

        #[test]
        fn test_half() {
            let bar = Display::progress_bar(0.5);
            assert_eq!(bar.chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
        }
    }

    mod view_tests {
        use super::*;

        #[test]
        fn test_render_view() {
            let out = Display::render_view(&create_view(1500));

            assert!(out.contains("Focus [running]"));
            assert!(out.contains("25:00"));
            assert!(out.contains("100%"));
            assert!(out.contains("Sessions: 2"));
            assert!(out.contains("calm-drone (paused, volume 50)"));
            assert!(!out.contains("Share Your Streak"));
        }

        #[test]
        fn test_render_view_with_dialog() {
            let mut view = create_view(754);
            view.dialog = Some(create_dialog());

            let out = Display::render_view(&view);

            assert!(out.contains("12:34"));
            assert!(out.contains("Share Your Streak"));
        }
    }

    mod dialog_tests {
        use super::*;

        #[test]
        fn test_render_dialog_actions() {
            let out = Display::render_dialog(&create_dialog());

            assert!(out.contains("I've completed 2 Pomodoro sessions today!"));
            assert!(out.contains("[x] Share on X"));
            assert!(out.contains("[instagram] Share on Instagram"));
            assert!(out.contains("[cancel] Cancel"));
            assert!(!out.contains("Download"));
        }

        #[test]
        fn test_render_dialog_with_download() {
            let mut dialog = create_dialog();
            dialog.download = Some(
                CapturedImage {
                    png: vec![1],
                    width: 1,
                    height: 1,
                }
                .download_link(),
            );
            dialog.notice = Some("Could not copy to clipboard.".to_string());

            let out = Display::render_dialog(&dialog);

            assert!(out.contains("Download Screenshot for Instagram: pomodoro_streak.png"));
            assert!(out.contains("Could not copy to clipboard."));
        }
    }

    mod event_tests {
        use super::*;

        #[test]
        fn test_completed_line() {
            let line = Display::render_timer_event(&TimerEvent::Completed {
                mode: Mode::Focus,
                completed_focus_sessions: 4,
                next_mode: Mode::LongBreak,
            })
            .unwrap();

            assert_eq!(line, "✔ Focus complete! Sessions: 4. Next: Long Break");
        }

        #[test]
        fn test_tick_has_no_line() {
            assert!(Display::render_timer_event(&TimerEvent::Tick {
                remaining_seconds: 10
            })
            .is_none());
        }

        #[test]
        fn test_paused_line() {
            let line = Display::render_timer_event(&TimerEvent::Paused {
                remaining_seconds: 65,
            });
            assert_eq!(line.as_deref(), Some("⏸ Paused at 01:05"));
        }
    }

    mod list_tests {
        use super::*;

        #[test]
        fn test_render_tracks_marks_selected() {
            let out = Display::render_tracks(&TrackCatalog::default(), &TrackId::new("deep-drone"));

            let selected: Vec<_> = out.lines().filter(|l| l.starts_with('*')).collect();
            assert_eq!(selected.len(), 1);
            assert!(selected[0].contains("deep-drone"));
        }

        #[test]
        fn test_render_help_lists_commands() {
            let out = Display::render_help();
            assert_eq!(out.lines().count(), HELP.len());
            assert!(out.contains("volume <0-100>"));
        }
    }
}
