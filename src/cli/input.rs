//! Parser for the interactive line commands.
//!
//! Each line typed while the widget runs is one command. The parser is
//! the only gate for user-supplied values, so out-of-range volumes never
//! reach the music delegate.

use std::path::PathBuf;

use thiserror::Error;

use super::commands::{parse_track, parse_volume};
use crate::controller::UiAction;
use crate::music::TrackCatalog;
use crate::types::Mode;
use crate::view::ShareChoice;

/// A parsed interactive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Action(UiAction),
    Status,
    Tracks,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid argument for '{command}': {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },
}

/// One row of the help table: usage and description.
pub const HELP: &[(&str, &str)] = &[
    ("start", "Start the countdown"),
    ("pause", "Pause the countdown"),
    ("toggle", "Start or pause"),
    ("reset", "Refill the countdown for the current mode"),
    ("focus | short | long", "Switch mode"),
    ("mode <focus|shortBreak|longBreak>", "Switch mode by name"),
    ("share", "Open the share dialog"),
    ("x | instagram | cancel", "Choose a share dialog action"),
    ("save [dir]", "Save the offered screenshot"),
    ("dark", "Toggle dark mode"),
    ("music", "Play or pause background music"),
    ("volume <0-100>", "Set music volume"),
    ("track <id>", "Change the music track"),
    ("tracks", "List music tracks"),
    ("status", "Show the widget"),
    ("help", "Show this help"),
    ("quit", "Exit"),
];

/// Parses one input line. Blank lines yield `None`.
///
/// Track ids are checked against `catalog`, so only listed tracks reach
/// the music delegate.
pub fn parse_line(
    line: &str,
    catalog: &TrackCatalog,
) -> Result<Option<InputCommand>, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest = words.collect::<Vec<_>>().join(" ");
    let arg = (!rest.is_empty()).then_some(rest.as_str());

    let action = |a: UiAction| -> Result<Option<InputCommand>, InputError> {
        Ok(Some(InputCommand::Action(a)))
    };

    match head.to_ascii_lowercase().as_str() {
        "start" => action(UiAction::Start),
        "pause" => action(UiAction::Pause),
        "toggle" | "t" => action(UiAction::Toggle),
        "reset" | "r" => action(UiAction::Reset),
        "focus" => action(UiAction::SelectMode(Mode::Focus)),
        "short" => action(UiAction::SelectMode(Mode::ShortBreak)),
        "long" => action(UiAction::SelectMode(Mode::LongBreak)),
        "mode" => {
            let name = arg.ok_or(InputError::MissingArgument {
                command: "mode",
                expected: "focus, shortBreak or longBreak",
            })?;
            let mode: Mode = name.parse().map_err(|reason| InputError::InvalidArgument {
                command: "mode",
                reason,
            })?;
            action(UiAction::SelectMode(mode))
        }
        "share" => action(UiAction::OpenShare),
        "x" => action(UiAction::Share(ShareChoice::PostToX)),
        "instagram" | "ig" => action(UiAction::Share(ShareChoice::InstagramImage)),
        "cancel" => action(UiAction::Share(ShareChoice::Cancel)),
        "save" => action(UiAction::SaveScreenshot(PathBuf::from(arg.unwrap_or(".")))),
        "dark" => action(UiAction::ToggleDarkMode),
        "music" | "m" => action(UiAction::ToggleMusic),
        "volume" | "vol" => {
            let value = arg.ok_or(InputError::MissingArgument {
                command: "volume",
                expected: "a value between 0 and 100",
            })?;
            let volume = parse_volume(value).map_err(|reason| InputError::InvalidArgument {
                command: "volume",
                reason,
            })?;
            action(UiAction::SetVolume(volume))
        }
        "track" => {
            let id = arg.ok_or(InputError::MissingArgument {
                command: "track",
                expected: "a track id (see 'tracks')",
            })?;
            let track = parse_track(id)
                .and_then(|track| {
                    if catalog.contains(&track) {
                        Ok(track)
                    } else {
                        Err(format!("no track '{}' (see 'tracks')", track.as_str()))
                    }
                })
                .map_err(|reason| InputError::InvalidArgument {
                    command: "track",
                    reason,
                })?;
            action(UiAction::ChangeTrack(track))
        }
        "tracks" => Ok(Some(InputCommand::Tracks)),
        "status" | "s" => Ok(Some(InputCommand::Status)),
        "help" | "?" => Ok(Some(InputCommand::Help)),
        "quit" | "exit" | "q" => Ok(Some(InputCommand::Quit)),
        _ => Err(InputError::Unknown(head.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TrackId, Volume};

    fn parse_line(line: &str) -> Result<Option<InputCommand>, InputError> {
        super::parse_line(line, &TrackCatalog::default())
    }

    fn parse(line: &str) -> InputCommand {
        parse_line(line).unwrap().unwrap()
    }

    mod timer_command_tests {
        use super::*;

        #[test]
        fn test_timer_commands() {
            assert_eq!(parse("start"), InputCommand::Action(UiAction::Start));
            assert_eq!(parse("pause"), InputCommand::Action(UiAction::Pause));
            assert_eq!(parse("  Toggle "), InputCommand::Action(UiAction::Toggle));
            assert_eq!(parse("reset"), InputCommand::Action(UiAction::Reset));
        }

        #[test]
        fn test_mode_shortcuts() {
            assert_eq!(
                parse("short"),
                InputCommand::Action(UiAction::SelectMode(Mode::ShortBreak))
            );
            assert_eq!(
                parse("long"),
                InputCommand::Action(UiAction::SelectMode(Mode::LongBreak))
            );
        }

        #[test]
        fn test_mode_by_name() {
            assert_eq!(
                parse("mode shortBreak"),
                InputCommand::Action(UiAction::SelectMode(Mode::ShortBreak))
            );
            assert!(matches!(
                parse_line("mode nap"),
                Err(InputError::InvalidArgument { command: "mode", .. })
            ));
            assert!(matches!(
                parse_line("mode"),
                Err(InputError::MissingArgument { command: "mode", .. })
            ));
        }
    }

    mod share_command_tests {
        use super::*;

        #[test]
        fn test_share_commands() {
            assert_eq!(parse("share"), InputCommand::Action(UiAction::OpenShare));
            assert_eq!(
                parse("x"),
                InputCommand::Action(UiAction::Share(ShareChoice::PostToX))
            );
            assert_eq!(
                parse("instagram"),
                InputCommand::Action(UiAction::Share(ShareChoice::InstagramImage))
            );
            assert_eq!(
                parse("cancel"),
                InputCommand::Action(UiAction::Share(ShareChoice::Cancel))
            );
        }

        #[test]
        fn test_save_defaults_to_current_dir() {
            assert_eq!(
                parse("save"),
                InputCommand::Action(UiAction::SaveScreenshot(PathBuf::from(".")))
            );
            assert_eq!(
                parse("save /tmp/shots"),
                InputCommand::Action(UiAction::SaveScreenshot(PathBuf::from("/tmp/shots")))
            );
        }
    }

    mod music_command_tests {
        use super::*;

        #[test]
        fn test_volume_in_range() {
            assert_eq!(
                parse("volume 35"),
                InputCommand::Action(UiAction::SetVolume(Volume::try_from(35).unwrap()))
            );
        }

        #[test]
        fn test_volume_out_of_range_rejected() {
            assert!(matches!(
                parse_line("volume 101"),
                Err(InputError::InvalidArgument { command: "volume", .. })
            ));
            assert!(matches!(
                parse_line("volume"),
                Err(InputError::MissingArgument { command: "volume", .. })
            ));
        }

        #[test]
        fn test_track() {
            assert_eq!(
                parse("track deep-drone"),
                InputCommand::Action(UiAction::ChangeTrack(TrackId::new("deep-drone")))
            );
            assert_eq!(parse("tracks"), InputCommand::Tracks);
            assert_eq!(parse("music"), InputCommand::Action(UiAction::ToggleMusic));
        }

        #[test]
        fn test_track_outside_catalog_rejected() {
            assert!(matches!(
                parse_line("track jazz"),
                Err(InputError::InvalidArgument { command: "track", .. })
            ));
            assert!(matches!(
                parse_line("track"),
                Err(InputError::MissingArgument { command: "track", .. })
            ));
        }

        #[test]
        fn test_track_checked_against_given_catalog() {
            use crate::music::{TrackEntry, TrackSource};

            let catalog = TrackCatalog::new(vec![TrackEntry::new(
                "rain",
                "Rain",
                TrackSource::Tone {
                    frequency_hz: 200.0,
                    seconds: 30,
                },
            )]);

            assert_eq!(
                crate::cli::parse_line("track rain", &catalog),
                Ok(Some(InputCommand::Action(UiAction::ChangeTrack(
                    TrackId::new("rain")
                ))))
            );
            assert!(crate::cli::parse_line("track deep-drone", &catalog).is_err());
        }
    }

    mod misc_command_tests {
        use super::*;

        #[test]
        fn test_blank_line() {
            assert_eq!(parse_line("   "), Ok(None));
        }

        #[test]
        fn test_meta_commands() {
            assert_eq!(parse("status"), InputCommand::Status);
            assert_eq!(parse("help"), InputCommand::Help);
            assert_eq!(parse("quit"), InputCommand::Quit);
            assert_eq!(parse("dark"), InputCommand::Action(UiAction::ToggleDarkMode));
        }

        #[test]
        fn test_unknown_command() {
            assert_eq!(
                parse_line("dance"),
                Err(InputError::Unknown("dance".to_string()))
            );
        }

        #[test]
        fn test_help_covers_every_command_word() {
            for word in ["start", "share", "volume", "track", "dark", "quit"] {
                assert!(HELP.iter().any(|(usage, _)| usage.contains(word)));
            }
        }
    }
}
