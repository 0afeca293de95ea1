use crate::error::GameError;
use crate::events::Event;
use crate::registry::{Drawable, EventHandler, Updatable};
use crate::surface::Surface;
use crate::vector::Vector;
use crate::world::{Phase, WorldView};

use super::{Ctx, Frame, GameEntity};

pub const PLAYER_LIVES: u32 = 3;

/// Rows above standing height reached by the victory jump.
pub const JUMP_HEIGHT: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Playing,
    Falling,
    /// Out of lives. Terminal.
    Exploding,
    /// The opponent exploded. Terminal.
    Winning,
}

#[derive(Clone, Debug)]
pub struct Player {
    position: Vector,
    icon: char,
    move_dir: i32,
    lives: u32,
    power_level: u32,
    state: PlayerState,
    /// Standing row, one above the bridge.
    bridge_height: i32,
    jump_height: i32,
    jump_dir: i32,
}

impl Player {
    pub fn new(position: Vector, icon: char, bridge_row: i32) -> Self {
        let bridge_height = bridge_row - 1;
        Player {
            position,
            icon,
            move_dir: 1,
            lives: PLAYER_LIVES,
            power_level: 0,
            state: PlayerState::Playing,
            bridge_height,
            jump_height: bridge_height - JUMP_HEIGHT,
            jump_dir: -1,
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn icon(&self) -> char {
        self.icon
    }

    pub fn move_dir(&self) -> i32 {
        self.move_dir
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn power_level(&self) -> u32 {
        self.power_level
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn bridge_height(&self) -> i32 {
        self.bridge_height
    }

    pub fn jump_height(&self) -> i32 {
        self.jump_height
    }

    pub fn toggle_direction(&mut self) {
        self.move_dir = -self.move_dir;
    }

    fn update_playing(&mut self, ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        let on_solid_ground = match ctx.bridge() {
            Some(bridge) => bridge.has_piece(self.position.x)?,
            None => true,
        };
        if !on_solid_ground {
            self.state = PlayerState::Falling;
            ctx.emit(Event::PlayerFalling { player: ctx.id() });
            return Ok(());
        }

        let new_x = self.position.x + self.move_dir;
        if new_x >= ctx.screen_size().x - 1 || new_x <= 0 {
            self.move_dir = -self.move_dir;
            return Ok(());
        }

        let blocked = ctx.opponent_of(ctx.id()).is_some_and(|(_, opponent)| {
            opponent.state == PlayerState::Playing && opponent.position.x == new_x
        });
        if blocked {
            ctx.emit(Event::PlayersBounce);
            return Ok(());
        }

        self.position.x = new_x;
        Ok(())
    }

    fn update_falling(&mut self, ctx: &mut Ctx<'_>) {
        self.position.y += 1;
        if self.position.y >= ctx.screen_size().y {
            self.position.y = 0;
        }
        if self.position.y == self.bridge_height {
            ctx.emit(Event::PlayerFallingComplete { player: ctx.id() });
        }
    }

    fn update_winning(&mut self) {
        self.position.y += self.jump_dir;
        if self.jump_dir < 0 && self.position.y <= self.jump_height {
            self.jump_dir = 1;
        } else if self.jump_dir > 0 && self.position.y >= self.bridge_height {
            self.jump_dir = -1;
        }
    }

    /// Turn so that the next step leads away from the opponent.
    fn bounce_away(&mut self, ctx: &Ctx<'_>) {
        if self.state != PlayerState::Playing {
            return;
        }
        let Some((_, opponent)) = ctx.opponent_of(ctx.id()) else {
            return;
        };
        self.move_dir = match self.position.x.cmp(&opponent.position.x) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Equal => -self.move_dir,
        };
    }
}

impl Updatable<GameEntity> for Player {
    fn update(&mut self, ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        match self.state {
            PlayerState::Playing if ctx.phase() == Phase::Falling => Ok(()),
            PlayerState::Playing => self.update_playing(ctx),
            PlayerState::Falling => {
                self.update_falling(ctx);
                Ok(())
            }
            PlayerState::Exploding => Ok(()),
            PlayerState::Winning => {
                self.update_winning();
                Ok(())
            }
        }
    }
}

impl EventHandler<GameEntity> for Player {
    fn handle_event(&mut self, event: &Event, ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        let me = ctx.id();
        match *event {
            Event::PlayerFallingComplete { player } if player == me => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 {
                    ctx.emit(Event::PlayerLoses { player: me });
                    self.state = PlayerState::Exploding;
                } else {
                    self.state = PlayerState::Playing;
                }
            }
            Event::PlayerLoses { player } => {
                self.state = if player == me {
                    PlayerState::Exploding
                } else {
                    PlayerState::Winning
                };
            }
            Event::PlayerHitByBeam { player } if player == me => {
                self.power_level += 1;
            }
            Event::PlayersBounce => self.bounce_away(ctx),
            Event::GameStart
            | Event::PlayerFalling { .. }
            | Event::PlayerFallingComplete { .. }
            | Event::PlayerHitByBeam { .. }
            | Event::BridgeStruck { .. } => {}
        }
        Ok(())
    }
}

impl Drawable<GameEntity> for Player {
    fn draw(&self, _view: &Frame<'_>, surface: &mut dyn Surface) {
        surface.put_glyph(self.position.y, self.position.x, self.icon);
    }
}
