use crate::error::GameError;
use crate::events::Event;
use crate::registry::{Drawable, Updatable};
use crate::surface::Surface;
use crate::vector::Vector;
use crate::world::WorldView;

use super::{Ctx, Frame, GameEntity};

const GLYPH: char = '*';

/// A shot that falls one row per tick and knocks out the bridge piece it
/// lands on.
#[derive(Clone, Debug)]
pub struct LaserBeam {
    position: Vector,
}

impl LaserBeam {
    pub fn new(position: Vector) -> Self {
        LaserBeam { position }
    }

    pub fn position(&self) -> Vector {
        self.position
    }
}

impl Updatable<GameEntity> for LaserBeam {
    fn update(&mut self, ctx: &mut Ctx<'_>) -> Result<(), GameError> {
        let new_y = self.position.y + 1;
        if new_y == ctx.bridge_row() {
            ctx.emit(Event::BridgeStruck {
                column: self.position.x,
            });
            ctx.remove_self();
        } else if new_y >= ctx.screen_size().y {
            ctx.remove_self();
        }
        self.position.y = new_y;
        Ok(())
    }
}

impl Drawable<GameEntity> for LaserBeam {
    fn draw(&self, _view: &Frame<'_>, surface: &mut dyn Surface) {
        surface.put_glyph(self.position.y, self.position.x, GLYPH);
    }
}
