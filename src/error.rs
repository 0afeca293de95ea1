use thiserror::Error;

use crate::registry::EntityId;

/// Invariant violations raised by the simulation.
///
/// Both variants point at a bug upstream (a stale handle, an unclamped
/// column); callers abort the tick rather than recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("entity {0} is not known to the registry")]
    InvalidEntity(EntityId),

    #[error("bridge column {column} is outside 0..{width}")]
    IndexOutOfRange { column: i32, width: usize },
}
