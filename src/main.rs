/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::Duration;

use config::GameConfig;
use error::Result;
use sim::action::{self, Action};
use sim::session::Session;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::{Frame, Renderer};

/// Longest wait for keyboard input before the gamepad is polled again.
const FRAME_WAIT: Duration = Duration::from_millis(16);

fn main() {
    // Before config, so config warnings land in the log.
    let log_file = match logging::init() {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    let config = GameConfig::load();
    tracing::debug!(?config, "configuration");

    let mut session = match Session::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Startup failed: {e}");
            return;
        }
    };

    let mut message = String::new();
    if config.dungeon.generate_on_start {
        let event = action::apply(&mut session, Action::Regenerate);
        message = event.message().unwrap_or_default();
    }

    let mut renderer = Renderer::new(config.view.clone());

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer, &config, message);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Deep Delve!");
    println!("Deepest level: {}", session.dungeon().state().level);
    if let Some(path) = log_file {
        println!("Log: {}", path.display());
    }
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
    mut message: String,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        tracing::info!("gamepad detected");
    }

    loop {
        renderer.render(&Frame {
            dungeon: session.dungeon().state(),
            player: session.player().state(),
            message: &message,
        })?;

        kb.drain_events(FRAME_WAIT);
        gp.update();

        if kb.ctrl_c_pressed() {
            return Ok(());
        }

        for command in kb.commands().into_iter().chain(gp.commands()) {
            match command {
                Command::Quit => {
                    tracing::info!("quit requested");
                    return Ok(());
                }
                Command::Act(act) => {
                    let event = action::apply(session, act);
                    if let Some(text) = event.message() {
                        message = text;
                    }
                }
            }
        }
    }
}
