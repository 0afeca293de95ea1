use std::fmt;

use crate::registry::EntityId;

/// Something that happened this tick.
///
/// Events are appended to the controller's queue, delivered to every live
/// entity once, then dropped (a copy stays in the diagnostic log).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    GameStart,
    /// The player stepped onto a hole and started to fall.
    PlayerFalling { player: EntityId },
    /// The falling player wrapped around and is back at the bridge row.
    PlayerFallingComplete { player: EntityId },
    /// The players tried to step onto the same column.
    PlayersBounce,
    PlayerLoses { player: EntityId },
    PlayerHitByBeam { player: EntityId },
    /// A beam hit the bridge; only the bridge acts on this.
    BridgeStruck { column: i32 },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::GameStart => write!(f, "[Event: game begins!]"),
            Event::PlayerFalling { player } => write!(f, "[Event: {player} is falling]"),
            Event::PlayerFallingComplete { player } => {
                write!(f, "[Event: {player} is done falling]")
            }
            Event::PlayersBounce => write!(f, "[Event: players bounce]"),
            Event::PlayerLoses { player } => write!(f, "[Event: {player} has lost the game]"),
            Event::PlayerHitByBeam { player } => write!(f, "[Event: {player} was hit by the beam]"),
            Event::BridgeStruck { column } => write!(f, "[Event: bridge struck at column {column}]"),
        }
    }
}
