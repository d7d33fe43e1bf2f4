/// Events emitted by an applied action.
/// The front end turns the notable ones into the status message.

use crate::domain::dungeon::Strategy;
use crate::domain::geom::Point;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// `level` is the counter after regeneration.
    LevelGenerated { level: u32, strategy: Strategy },
    PlayerMoved { from: Point, to: Point },
    LifeLost { lives: u32 },
    LifeGained { lives: u32 },
}

impl GameEvent {
    /// One-line status text, or None for events too frequent to announce.
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::LevelGenerated { level, strategy } => {
                Some(format!("Level {level} generated ({strategy})"))
            }
            GameEvent::PlayerMoved { .. } => None,
            GameEvent::LifeLost { lives } => Some(format!("Lost a life ({lives} left)")),
            GameEvent::LifeGained { lives } => Some(format!("Gained a life ({lives})")),
        }
    }
}
