use crate::error::GameError;
use crate::events::Event;
use crate::registry::{Drawable, EventHandler};
use crate::surface::Surface;
use crate::vector::Vector;

use super::{Ctx, Frame, GameEntity};

const PIECE: char = '=';

/// Row the bridge occupies for a given screen.
pub fn bridge_row(screen_size: Vector) -> i32 {
    screen_size.y / 2 + 1
}

/// One walkable cell per screen column; `false` is a hole.
#[derive(Clone, Debug)]
pub struct Bridge {
    position: Vector,
    pieces: Vec<bool>,
}

impl Bridge {
    pub fn new(screen_size: Vector) -> Self {
        let width = screen_size.x.max(0) as usize;
        Bridge {
            position: Vector::new(0, bridge_row(screen_size)),
            pieces: vec![true; width],
        }
    }

    pub fn row(&self) -> i32 {
        self.position.y
    }

    pub fn width(&self) -> usize {
        self.pieces.len()
    }

    pub fn pieces(&self) -> &[bool] {
        &self.pieces
    }

    pub fn has_piece(&self, column: i32) -> Result<bool, GameError> {
        let index = self.index(column)?;
        Ok(self.pieces[index])
    }

    pub fn lose_piece(&mut self, column: i32) -> Result<(), GameError> {
        let index = self.index(column)?;
        self.pieces[index] = false;
        Ok(())
    }

    pub fn reset_all_pieces(&mut self) {
        self.pieces.fill(true);
    }

    fn index(&self, column: i32) -> Result<usize, GameError> {
        usize::try_from(column)
            .ok()
            .filter(|&i| i < self.pieces.len())
            .ok_or(GameError::IndexOutOfRange {
                column,
                width: self.pieces.len(),
            })
    }
}

impl EventHandler<GameEntity> for Bridge {
    fn handle_event(&mut self, event: &Event, _ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        match *event {
            // Either player finishing a fall regenerates the whole bridge.
            Event::PlayerFallingComplete { .. } => self.reset_all_pieces(),
            Event::BridgeStruck { column } => self.lose_piece(column)?,
            Event::GameStart
            | Event::PlayerFalling { .. }
            | Event::PlayersBounce
            | Event::PlayerLoses { .. }
            | Event::PlayerHitByBeam { .. } => {}
        }
        Ok(())
    }
}

impl Drawable<GameEntity> for Bridge {
    fn draw(&self, _view: &Frame<'_>, surface: &mut dyn Surface) {
        for (x, &piece) in self.pieces.iter().enumerate() {
            let glyph = if piece { PIECE } else { ' ' };
            surface.put_glyph(self.position.y, x as i32, glyph);
        }
    }
}
