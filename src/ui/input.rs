/// Keyboard input.
///
/// Each Press (or auto-repeat) of a mapped key becomes one `Command`, in
/// the order the terminal delivered them. Release events are ignored:
/// every action here is one-shot, nothing depends on a key being held.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::geom::Direction;
use crate::sim::action::Action;

/// What a key (or button) asks the front end to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Act(Action),
    Quit,
}

// ── Key bindings ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_HOME: &[KeyCode] = &[KeyCode::Home, KeyCode::Char('h'), KeyCode::Char('H')];
const KEYS_GENERATE: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char('g'), KeyCode::Char('G')];
const KEYS_LOSE_LIFE: &[KeyCode] = &[KeyCode::Char('-')];
const KEYS_GAIN_LIFE: &[KeyCode] = &[KeyCode::Char('+'), KeyCode::Char('=')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map one key to a command; unmapped keys do nothing.
pub fn command_for(code: KeyCode) -> Option<Command> {
    let bindings: [(&[KeyCode], Command); 9] = [
        (KEYS_UP, Command::Act(Action::Move(Direction::Up))),
        (KEYS_DOWN, Command::Act(Action::Move(Direction::Down))),
        (KEYS_LEFT, Command::Act(Action::Move(Direction::Left))),
        (KEYS_RIGHT, Command::Act(Action::Move(Direction::Right))),
        (KEYS_HOME, Command::Act(Action::ReturnToStart)),
        (KEYS_GENERATE, Command::Act(Action::Regenerate)),
        (KEYS_LOSE_LIFE, Command::Act(Action::LoseLife)),
        (KEYS_GAIN_LIFE, Command::Act(Action::GainLife)),
        (KEYS_QUIT, Command::Quit),
    ];
    bindings
        .iter()
        .find(|(keys, _)| keys.contains(&code))
        .map(|&(_, cmd)| cmd)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

pub struct InputState {
    /// Key events from the most recent drain, in arrival order.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { raw_events: Vec::with_capacity(8) }
    }

    /// Wait up to `timeout` for the first event, then drain everything
    /// else that is already queued without blocking.
    pub fn drain_events(&mut self, timeout: Duration) {
        self.raw_events.clear();

        let mut wait = timeout;
        while poll(wait).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
            }
            wait = Duration::ZERO;
        }
    }

    /// Commands for this drain's key presses, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.raw_events
            .iter()
            .filter(|k| k.kind != KeyEventKind::Release)
            .filter(|k| !is_ctrl_c(k))
            .filter_map(|k| command_for(k.code))
            .collect()
    }

    /// Check if any raw event this frame has Ctrl+C.
    /// Raw mode swallows SIGINT, so the loop has to look for it.
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(is_ctrl_c)
    }

    #[cfg(test)]
    fn inject(&mut self, events: impl IntoIterator<Item = KeyEvent>) {
        self.raw_events.extend(events);
    }
}
