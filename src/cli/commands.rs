//! Command definitions for the Pomodoro widget.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{DurationConfig, TrackId, Volume};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro widget with background music and streak sharing
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-widget",
    version,
    about = "Interactive Pomodoro timer widget for the terminal",
    long_about = "A Pomodoro countdown with focus, short break and long break modes.\n\
                  Type commands such as 'start', 'pause' or 'share' while it runs; 'help' lists them.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.json and preferences.json
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive widget (default)
    Run(RunArgs),

    /// Print the effective configuration as JSON
    Config,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command. Each flag overrides config.json.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Focus duration in minutes (1-120)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub focus: Option<u32>,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: Option<u32>,

    /// Initial music volume (0-100)
    #[arg(long, value_parser = parse_volume)]
    pub volume: Option<Volume>,

    /// Initial music track id
    #[arg(long, value_parser = parse_track)]
    pub track: Option<TrackId>,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,
}

impl RunArgs {
    /// Applies the duration flags on top of `durations`.
    pub fn apply_durations(&self, mut durations: DurationConfig) -> DurationConfig {
        if let Some(minutes) = self.focus {
            durations = durations.with_focus_minutes(minutes);
        }
        if let Some(minutes) = self.short_break {
            durations = durations.with_short_break_minutes(minutes);
        }
        if let Some(minutes) = self.long_break {
            durations = durations.with_long_break_minutes(minutes);
        }
        durations
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a volume percentage.
pub(crate) fn parse_volume(s: &str) -> Result<Volume, String> {
    let value: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a volume between 0 and 100", s))?;
    Volume::try_from(value)
}

/// Parses a track id. Must not be empty.
pub(crate) fn parse_track(s: &str) -> Result<TrackId, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("track id must not be empty".to_string());
    }
    Ok(TrackId::new(s))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["pomodoro-widget"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.data_dir.is_none());
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["pomodoro-widget", "-v", "config"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Some(Commands::Config)));
        }

        #[test]
        fn test_parse_data_dir_after_subcommand() {
            let cli = Cli::parse_from(["pomodoro-widget", "config", "--data-dir", "/tmp/w"]);
            assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/w")));
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["pomodoro-widget", "completions", "zsh"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Zsh
                })
            ));
        }
    }

    mod run_args_tests {
        use super::*;

        fn parse_run(args: &[&str]) -> Result<RunArgs, clap::Error> {
            let mut argv = vec!["pomodoro-widget", "run"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv)?.command {
                Some(Commands::Run(args)) => Ok(args),
                other => panic!("expected run, got {:?}", other),
            }
        }

        #[test]
        fn test_defaults_are_unset() {
            let args = parse_run(&[]).unwrap();
            assert!(args.focus.is_none());
            assert!(args.volume.is_none());
            assert!(!args.no_sound);
        }

        #[test]
        fn test_all_options() {
            let args = parse_run(&[
                "--focus",
                "50",
                "--short-break",
                "10",
                "--long-break",
                "30",
                "--volume",
                "80",
                "--track",
                "deep-drone",
                "--no-sound",
            ])
            .unwrap();

            assert_eq!(args.focus, Some(50));
            assert_eq!(args.short_break, Some(10));
            assert_eq!(args.long_break, Some(30));
            assert_eq!(args.volume.map(|v| v.get()), Some(80));
            assert_eq!(args.track, Some(TrackId::new("deep-drone")));
            assert!(args.no_sound);
        }

        #[test]
        fn test_focus_out_of_range() {
            assert!(parse_run(&["--focus", "0"]).is_err());
            assert!(parse_run(&["--focus", "121"]).is_err());
        }

        #[test]
        fn test_break_out_of_range() {
            assert!(parse_run(&["--short-break", "61"]).is_err());
            assert!(parse_run(&["--long-break", "0"]).is_err());
        }

        #[test]
        fn test_volume_out_of_range() {
            assert!(parse_run(&["--volume", "101"]).is_err());
            assert!(parse_run(&["--volume", "-1"]).is_err());
        }

        #[test]
        fn test_apply_durations() {
            let args = parse_run(&["--focus", "40"]).unwrap();
            let durations = args.apply_durations(DurationConfig::default());

            assert_eq!(durations.focus_minutes, 40);
            assert_eq!(durations.short_break_minutes, 5);
            assert_eq!(durations.long_break_minutes, 15);
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_parse_volume() {
            assert_eq!(parse_volume("0").unwrap().get(), 0);
            assert_eq!(parse_volume(" 100 ").unwrap().get(), 100);
            assert!(parse_volume("loud").is_err());
            assert!(parse_volume("300").is_err());
        }

        #[test]
        fn test_parse_track() {
            assert_eq!(parse_track("focus-hum").unwrap(), TrackId::new("focus-hum"));
            assert!(parse_track("  ").is_err());
        }
    }
}
