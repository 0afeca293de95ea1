//! Concrete game entities and the closed enum the registry stores them in.

mod bridge;
mod hud;
mod laser;
mod player;
mod ship;

pub use bridge::{bridge_row, Bridge};
pub use hud::{LifeCounter, Narrator, PowerLevelCounter};
pub use laser::LaserBeam;
pub use player::{Player, PlayerState, JUMP_HEIGHT, PLAYER_LIVES};
pub use ship::{
    FireMode, ShipState, SpaceShip, SHIP_ROW, TIME_MOVING_MAX, TIME_MOVING_MIN, TIME_SHOOTING,
    WARNING_THRESHOLD,
};

use crate::registry::{Drawable, Entity, EventHandler, TickContext, Updatable, View};
use crate::world::WorldState;

pub type Ctx<'a> = TickContext<'a, GameEntity>;
pub type Frame<'a> = View<'a, GameEntity>;

#[derive(Clone, Debug)]
pub enum GameEntity {
    Player(Player),
    Bridge(Bridge),
    SpaceShip(SpaceShip),
    LaserBeam(LaserBeam),
    LifeCounter(LifeCounter),
    PowerLevelCounter(PowerLevelCounter),
    Narrator(Narrator),
}

macro_rules! entity_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for GameEntity {
                fn from(entity: $variant) -> Self {
                    GameEntity::$variant(entity)
                }
            }
        )*
    };
}

entity_from!(Player, Bridge, SpaceShip, LaserBeam, LifeCounter, PowerLevelCounter, Narrator);

impl GameEntity {
    pub fn as_player(&self) -> Option<&Player> {
        match self {
            GameEntity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            GameEntity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_bridge(&self) -> Option<&Bridge> {
        match self {
            GameEntity::Bridge(bridge) => Some(bridge),
            _ => None,
        }
    }

    pub fn as_bridge_mut(&mut self) -> Option<&mut Bridge> {
        match self {
            GameEntity::Bridge(bridge) => Some(bridge),
            _ => None,
        }
    }

    pub fn as_ship(&self) -> Option<&SpaceShip> {
        match self {
            GameEntity::SpaceShip(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_narrator(&self) -> Option<&Narrator> {
        match self {
            GameEntity::Narrator(narrator) => Some(narrator),
            _ => None,
        }
    }
}

impl Entity for GameEntity {
    type World = WorldState;

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable<Self>> {
        match self {
            GameEntity::Player(player) => Some(player),
            GameEntity::SpaceShip(ship) => Some(ship),
            GameEntity::LaserBeam(beam) => Some(beam),
            GameEntity::Bridge(_)
            | GameEntity::LifeCounter(_)
            | GameEntity::PowerLevelCounter(_)
            | GameEntity::Narrator(_) => None,
        }
    }

    fn as_event_handler(&mut self) -> Option<&mut dyn EventHandler<Self>> {
        match self {
            GameEntity::Player(player) => Some(player),
            GameEntity::Bridge(bridge) => Some(bridge),
            GameEntity::SpaceShip(ship) => Some(ship),
            GameEntity::LifeCounter(counter) => Some(counter),
            GameEntity::Narrator(narrator) => Some(narrator),
            GameEntity::LaserBeam(_) | GameEntity::PowerLevelCounter(_) => None,
        }
    }

    fn as_drawable(&self) -> Option<&dyn Drawable<Self>> {
        match self {
            GameEntity::Player(player) => Some(player),
            GameEntity::Bridge(bridge) => Some(bridge),
            GameEntity::SpaceShip(ship) => Some(ship),
            GameEntity::LaserBeam(beam) => Some(beam),
            GameEntity::LifeCounter(counter) => Some(counter),
            GameEntity::PowerLevelCounter(counter) => Some(counter),
            GameEntity::Narrator(narrator) => Some(narrator),
        }
    }
}
