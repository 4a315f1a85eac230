//! The interactive event loop.
//!
//! Wires the real collaborators into a [`TimerController`] and feeds it
//! from stdin, the tick source, the music player and finished share jobs.
//! Everything runs on one thread inside a `LocalSet`.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{debug, info};

use crate::cli::{parse_line, Display, InputCommand, RunArgs};
use crate::config::WidgetConfig;
use crate::controller::{Reaction, TimerController, WidgetEvent};
use crate::music::{MusicDelegate, PlayerFactory, RodioPlayerFactory};
use crate::preferences::JsonPreferenceStore;
use crate::share::{
    ClipboardWriter, ScreenCapture, ShareComposer, SnapshotRenderer, SystemBrowser,
    SystemClipboard, UrlOpener,
};
use crate::sound::{completion_sound, try_create_player};
use crate::timer::{IntervalTicker, TickSource, TimerEvent};

/// Loads `config.json` from `data_dir` and applies the run flags on top.
pub fn effective_config(data_dir: &Path, args: &RunArgs) -> Result<WidgetConfig> {
    let mut config = WidgetConfig::load(data_dir)?;

    config.durations = args.apply_durations(config.durations);
    if let Some(volume) = args.volume {
        config = config.with_volume(volume);
    }
    if let Some(track) = args.track.clone() {
        config = config.with_default_track(track);
    }
    if args.no_sound {
        config = config.with_sound_enabled(false);
    }

    config.validate()?;
    Ok(config)
}

/// Runs the widget until `quit`, end of input or Ctrl-C.
pub async fn run(config: WidgetConfig, data_dir: &Path) -> Result<()> {
    LocalSet::new()
        .run_until(run_local(config, data_dir))
        .await
}

async fn run_local(config: WidgetConfig, data_dir: &Path) -> Result<()> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let (player_tx, mut player_rx) = mpsc::unbounded_channel();
    let (share_tx, mut share_rx) = mpsc::unbounded_channel();

    let catalog = config.music.tracks.clone();
    let music = MusicDelegate::new(
        RodioPlayerFactory::new(catalog.clone(), player_tx),
        config.music_state(),
    );
    let share = ShareComposer::new(
        SnapshotRenderer::new(),
        SystemClipboard::new(),
        SystemBrowser::new(),
    );

    let mut controller = TimerController::new(
        config.durations,
        IntervalTicker::new(tick_tx),
        music,
        share,
        Box::new(JsonPreferenceStore::new(data_dir)),
    );
    if config.sound.enabled {
        if let Some(player) = try_create_player() {
            let chime = completion_sound(config.sound.path.as_deref());
            controller = controller.with_sound(Box::new(player), chime);
        }
    }

    info!(data_dir = %data_dir.display(), "widget started");
    Display::show_view(&controller.view());
    Display::show_notice("Type 'help' for commands.");

    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("end of input");
                    break;
                };
                screen.end_tick_line();
                match parse_line(&line, &catalog) {
                    Ok(Some(InputCommand::Action(action))) => WidgetEvent::Ui(action),
                    Ok(Some(InputCommand::Quit)) => break,
                    Ok(Some(InputCommand::Status)) => {
                        Display::show_view(&controller.view());
                        continue;
                    }
                    Ok(Some(InputCommand::Tracks)) => {
                        Display::show_tracks(&catalog, &controller.music().selected_track);
                        continue;
                    }
                    Ok(Some(InputCommand::Help)) => {
                        Display::show_help();
                        continue;
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        Display::show_error(&e.to_string());
                        continue;
                    }
                }
            }
            Some(tick) = tick_rx.recv() => WidgetEvent::Tick(tick),
            Some(event) = player_rx.recv() => WidgetEvent::Player(event),
            Some(result) = share_rx.recv() => WidgetEvent::ShareFinished(result),
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
        };

        let mut echo = matches!(event, WidgetEvent::Ui(_));
        let mut reaction = controller.handle(event)?;

        if let Some(job) = reaction.capture.take() {
            echo = false;
            let tx = share_tx.clone();
            tokio::task::spawn_local(async move {
                // The loop may already be gone on shutdown.
                let _ = tx.send(job.run().await);
            });
        }
        screen.present(&controller, &reaction, echo);
    }

    screen.end_tick_line();
    info!("widget stopped");
    Ok(())
}

/// Tracks whether the cursor sits on the rewritten countdown line.
#[derive(Debug, Default)]
struct Screen {
    on_tick_line: bool,
}

impl Screen {
    fn end_tick_line(&mut self) {
        if self.on_tick_line {
            println!();
            self.on_tick_line = false;
        }
    }

    fn present<T, F, C, B, O>(
        &mut self,
        controller: &TimerController<T, F, C, B, O>,
        reaction: &Reaction,
        echo: bool,
    ) where
        T: TickSource,
        F: PlayerFactory,
        C: ScreenCapture + 'static,
        B: ClipboardWriter + 'static,
        O: UrlOpener + 'static,
    {
        let view = controller.view();
        let mut printed = false;

        for event in &reaction.timer_events {
            if let TimerEvent::Tick { .. } = event {
                Display::show_tick(&view);
                self.on_tick_line = true;
            } else {
                self.end_tick_line();
                Display::show_timer_event(event);
                printed = true;
            }
        }

        if let Some(notice) = &reaction.notice {
            self.end_tick_line();
            Display::show_notice(notice);
            printed = true;
        }
        if reaction.dialog_changed {
            if let Some(dialog) = controller.dialog() {
                self.end_tick_line();
                Display::show_dialog(dialog);
                printed = true;
            }
        }

        // Actions with no visible transition (music, theme) echo the widget.
        if echo && !printed && !reaction.dialog_changed {
            Display::show_view(&view);
        }
    }
}
