//! Two players balance on a collapsing bridge while a patrolling ship shoots
//! pieces out from under them.
//!
//! The library holds the whole simulation: a staged-commit entity registry,
//! the event queue, the controller that owns the roster and phase, and every
//! concrete entity. Terminal I/O lives in the binary.

pub mod controller;
pub mod entities;
pub mod error;
pub mod events;
pub mod registry;
pub mod surface;
pub mod vector;
pub mod world;
