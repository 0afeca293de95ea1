use rand::rngs::StdRng;
use rand::Rng;

use crate::error::GameError;
use crate::events::Event;
use crate::registry::{Drawable, EventHandler, Updatable};
use crate::surface::Surface;
use crate::vector::Vector;
use crate::world::WorldView;

use super::{Ctx, Frame, GameEntity, LaserBeam};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const SHIP_ROW: i32 = 8;

/// Patrol ticks between shots are drawn from `TIME_MOVING_MIN..TIME_MOVING_MAX`.
pub const TIME_MOVING_MIN: u32 = 30;
pub const TIME_MOVING_MAX: u32 = 80;

/// Ticks spent charging before the beam fires.
pub const TIME_SHOOTING: u32 = 10;

/// Below this many patrol ticks left the ship flashes a warning.
pub const WARNING_THRESHOLD: u32 = 15;

const IMAGE: &str = "<OOO>";
const WARNING_IMAGE: &str = "<ooo>";
const HALF_WIDTH: i32 = (IMAGE.len() / 2) as i32;
const CHARGE: char = '*';
const BEAM: char = '|';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipState {
    Moving,
    Shooting,
    /// Someone lost; patrol forever without firing.
    EndGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireMode {
    /// Resolve the beam on the fire tick.
    Instant,
    /// Drop a `LaserBeam` that travels down to the bridge.
    Projectile,
}

#[derive(Clone, Debug)]
pub struct SpaceShip {
    position: Vector,
    move_dir: i32,
    state: ShipState,
    time_until_shot: u32,
    time_in_shooting: u32,
    /// Set on the fire tick so the beam gets drawn.
    is_shooting: bool,
    fire_mode: FireMode,
    rng: StdRng,
}

impl SpaceShip {
    pub fn new(position: Vector, mut rng: StdRng) -> Self {
        let time_until_shot = rng.gen_range(TIME_MOVING_MIN..TIME_MOVING_MAX);
        SpaceShip {
            position,
            move_dir: 1,
            state: ShipState::Moving,
            time_until_shot,
            time_in_shooting: TIME_SHOOTING,
            is_shooting: false,
            fire_mode: FireMode::Instant,
            rng,
        }
    }

    pub fn with_fire_mode(mut self, fire_mode: FireMode) -> Self {
        self.fire_mode = fire_mode;
        self
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn state(&self) -> ShipState {
        self.state
    }

    pub fn time_until_shot(&self) -> u32 {
        self.time_until_shot
    }

    pub fn time_in_shooting(&self) -> u32 {
        self.time_in_shooting
    }

    pub fn is_shooting(&self) -> bool {
        self.is_shooting
    }

    pub fn fire_mode(&self) -> FireMode {
        self.fire_mode
    }

    /// Column under the middle of the hull.
    pub fn beam_column(&self) -> i32 {
        self.position.x + HALF_WIDTH
    }

    fn patrol(&mut self, screen_width: i32) {
        let new_x = self.position.x + self.move_dir;
        if new_x <= 0 || new_x >= screen_width - HALF_WIDTH - 2 {
            self.move_dir = -self.move_dir;
        } else {
            self.position.x = new_x;
        }
    }

    fn update_moving(&mut self, ctx: &Ctx<'_>) {
        self.patrol(ctx.screen_size().x);
        self.time_until_shot = self.time_until_shot.saturating_sub(1);
        if self.time_until_shot == 0 {
            self.state = ShipState::Shooting;
            self.time_in_shooting = TIME_SHOOTING;
        }
    }

    fn update_shooting(&mut self, ctx: &mut Ctx<'_>) {
        self.time_in_shooting = self.time_in_shooting.saturating_sub(1);
        if self.time_in_shooting == 0 {
            self.fire(ctx);
            self.time_until_shot = self.rng.gen_range(TIME_MOVING_MIN..TIME_MOVING_MAX);
            self.state = ShipState::Moving;
        }
    }

    fn fire(&mut self, ctx: &mut Ctx<'_>) {
        let column = self.beam_column();
        match self.fire_mode {
            FireMode::Instant => {
                self.is_shooting = true;
                let target = ctx
                    .players()
                    .into_iter()
                    .find(|(_, player)| player.position().x == column)
                    .map(|(id, _)| id);
                match target {
                    Some(player) => ctx.emit(Event::PlayerHitByBeam { player }),
                    None => ctx.emit(Event::BridgeStruck { column }),
                }
            }
            FireMode::Projectile => {
                let origin = Vector::new(column, self.position.y + 1);
                ctx.spawn(LaserBeam::new(origin).into());
            }
        }
    }
}

impl Updatable<GameEntity> for SpaceShip {
    fn update(&mut self, ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        self.is_shooting = false;
        match self.state {
            ShipState::Moving => self.update_moving(ctx),
            ShipState::Shooting => self.update_shooting(ctx),
            ShipState::EndGame => {
                self.time_until_shot = TIME_MOVING_MAX;
                self.update_moving(ctx);
            }
        }
        Ok(())
    }
}

impl EventHandler<GameEntity> for SpaceShip {
    fn handle_event(&mut self, event: &Event, _ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        match event {
            Event::PlayerLoses { .. } => self.state = ShipState::EndGame,
            Event::GameStart
            | Event::PlayerFalling { .. }
            | Event::PlayerFallingComplete { .. }
            | Event::PlayersBounce
            | Event::PlayerHitByBeam { .. }
            | Event::BridgeStruck { .. } => {}
        }
        Ok(())
    }
}

impl Drawable<GameEntity> for SpaceShip {
    fn draw(&self, view: &Frame<'_>, surface: &mut dyn Surface) {
        let warning = self.state == ShipState::Moving
            && self.time_until_shot < WARNING_THRESHOLD
            && view.turn() % 2 == 1;
        let image = if warning { WARNING_IMAGE } else { IMAGE };
        for (dx, glyph) in image.chars().enumerate() {
            surface.put_glyph(self.position.y, self.position.x + dx as i32, glyph);
        }

        let column = self.beam_column();
        if self.state == ShipState::Shooting {
            surface.put_glyph(self.position.y + 1, column, CHARGE);
        }
        if self.is_shooting {
            for row in self.position.y + 1..view.bridge_row() {
                surface.put_glyph(row, column, BEAM);
            }
        }
    }
}
