//! On-screen indicators: life and power counters, and the narrator line.

use crate::error::GameError;
use crate::events::Event;
use crate::registry::{Drawable, EntityId, EventHandler};
use crate::surface::Surface;
use crate::vector::Vector;
use crate::world::WorldView;

use super::{Ctx, Frame, GameEntity};

const LIFE_ROW: i32 = 0;
const POWER_ROW: i32 = 1;
const POWER_GLYPH: char = '+';
const NARRATOR_ROW: i32 = 4;

/// Blink period of a life about to be lost, in ticks.
const BLINK_PERIOD: u64 = 20;

// ── Life counter ──────────────────────────────────────────────────────────────

/// One player icon per remaining life. While that player is falling the
/// last icon blinks.
#[derive(Clone, Debug)]
pub struct LifeCounter {
    player: EntityId,
    column: i32,
    is_losing_life: bool,
}

impl LifeCounter {
    pub fn new(player: EntityId, column: i32) -> Self {
        LifeCounter {
            player,
            column,
            is_losing_life: false,
        }
    }

    pub fn is_losing_life(&self) -> bool {
        self.is_losing_life
    }
}

impl EventHandler<GameEntity> for LifeCounter {
    fn handle_event(&mut self, event: &Event, _ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        match *event {
            Event::PlayerFalling { player } if player == self.player => {
                self.is_losing_life = true;
            }
            Event::PlayerFallingComplete { .. } => self.is_losing_life = false,
            Event::GameStart
            | Event::PlayerFalling { .. }
            | Event::PlayersBounce
            | Event::PlayerLoses { .. }
            | Event::PlayerHitByBeam { .. }
            | Event::BridgeStruck { .. } => {}
        }
        Ok(())
    }
}

impl Drawable<GameEntity> for LifeCounter {
    fn draw(&self, view: &Frame<'_>, surface: &mut dyn Surface) {
        let Some(player) = view.player(self.player) else {
            return;
        };
        let mut count = player.lives();
        if self.is_losing_life && view.turn() % BLINK_PERIOD > BLINK_PERIOD / 2 {
            count = count.saturating_sub(1);
        }
        for dx in 0..count as i32 {
            surface.put_glyph(LIFE_ROW, self.column + dx, player.icon());
        }
    }
}

// ── Power level ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PowerLevelCounter {
    player: EntityId,
    column: i32,
}

impl PowerLevelCounter {
    pub fn new(player: EntityId, column: i32) -> Self {
        PowerLevelCounter { player, column }
    }
}

impl Drawable<GameEntity> for PowerLevelCounter {
    fn draw(&self, view: &Frame<'_>, surface: &mut dyn Surface) {
        let Some(player) = view.player(self.player) else {
            return;
        };
        for dx in 0..player.power_level() as i32 {
            surface.put_glyph(POWER_ROW, self.column + dx, POWER_GLYPH);
        }
    }
}

// ── Narrator ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Narrator {
    position: Vector,
    message: String,
}

impl Narrator {
    pub fn new(screen_size: Vector) -> Self {
        Narrator {
            position: Vector::new(screen_size.x / 2, NARRATOR_ROW),
            message: String::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl EventHandler<GameEntity> for Narrator {
    fn handle_event(&mut self, event: &Event, ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        match *event {
            Event::PlayerLoses { player } => {
                let loser = ctx.player(player).map(|p| p.icon());
                let winner = ctx.opponent_of(player).map(|(_, p)| p.icon());
                if let (Some(loser), Some(winner)) = (loser, winner) {
                    self.message = format!("{loser} Has Died! {winner} Wins!");
                }
            }
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

impl Drawable<GameEntity> for Narrator {
    fn draw(&self, _view: &Frame<'_>, surface: &mut dyn Surface) {
        let start_x = self.position.x - self.message.chars().count() as i32 / 2;
        for (i, glyph) in self.message.chars().enumerate() {
            surface.put_glyph(self.position.y, start_x + i as i32, glyph);
        }
    }
}
