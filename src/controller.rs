//! Top-level orchestration: phase, roster, input commands and the tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{
    bridge_row, Bridge, GameEntity, LifeCounter, Narrator, Player, PowerLevelCounter, SpaceShip,
    SHIP_ROW,
};
use crate::error::GameError;
use crate::events::Event;
use crate::registry::{EntityId, EntityRegistry, EventQueue};
use crate::surface::Surface;
use crate::vector::Vector;
use crate::world::{Phase, Roster, WorldState};

pub const PLAYER_1_ICON: char = '🦍';
pub const PLAYER_2_ICON: char = '🦫';

const START_MESSAGE: &str = "Press Space To Begin.";

/// Width reserved for player 2's counters at the right edge.
const RIGHT_HUD_WIDTH: i32 = 6;

// ── Commands ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePlayer1,
    TogglePlayer2,
    StartGame,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'q' => Some(Command::Quit),
            'a' => Some(Command::TogglePlayer1),
            'l' => Some(Command::TogglePlayer2),
            ' ' => Some(Command::StartGame),
            _ => None,
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

pub struct GameController {
    registry: EntityRegistry<GameEntity>,
    world: WorldState,
    rng: StdRng,
}

impl GameController {
    /// A controller on the start screen, showing only the narrator prompt.
    pub fn new(screen_size: Vector, rng: StdRng) -> Self {
        let mut registry = EntityRegistry::new();
        registry.spawn(Narrator::new(screen_size).with_message(START_MESSAGE).into());
        GameController {
            registry,
            world: WorldState::new(screen_size),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.world.phase()
    }

    pub fn turn(&self) -> u64 {
        self.world.turn()
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn roster(&self) -> Option<Roster> {
        self.world.roster()
    }

    pub fn event_log(&self) -> &[Event] {
        self.world.event_log()
    }

    pub fn registry(&self) -> &EntityRegistry<GameEntity> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry<GameEntity> {
        &mut self.registry
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.registry.get(id)?.as_player()
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.registry.get_mut(id)?.as_player_mut()
    }

    pub fn bridge(&self) -> Option<&Bridge> {
        let id = self.roster()?.bridge;
        self.registry.get(id)?.as_bridge()
    }

    pub fn bridge_mut(&mut self) -> Option<&mut Bridge> {
        let id = self.roster()?.bridge;
        self.registry.get_mut(id)?.as_bridge_mut()
    }

    pub fn ship(&self) -> Option<&SpaceShip> {
        let id = self.roster()?.ship;
        self.registry.get(id)?.as_ship()
    }

    /// Update, broadcast and commit, then advance the turn counter.
    pub fn tick(&mut self) -> Result<(), GameError> {
        self.registry.run_tick(&mut self.world)?;
        self.world.end_tick();
        Ok(())
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        self.registry.draw(&self.world, surface);
    }

    /// Apply one input command.
    ///
    /// Starting is honored in every phase and throws away a match in
    /// progress. Direction flips only count while playing.
    pub fn handle_command(&mut self, command: Command) -> Result<(), GameError> {
        match command {
            Command::Quit => self.world.set_phase(Phase::Exit),
            Command::TogglePlayer1 | Command::TogglePlayer2 => {
                if self.phase() != Phase::Playing {
                    return Ok(());
                }
                let Some(roster) = self.roster() else {
                    return Ok(());
                };
                let id = if command == Command::TogglePlayer1 {
                    roster.player1
                } else {
                    roster.player2
                };
                if let Some(player) = self.player_mut(id) {
                    player.toggle_direction();
                }
            }
            Command::StartGame => self.start_game()?,
        }
        Ok(())
    }

    /// Throw away every entity and stage a fresh roster.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.registry.clear();

        let screen = self.world.screen_size();
        let x = screen.x / 2;
        let y = screen.y / 2;
        let row = bridge_row(screen);
        let ship_rng = StdRng::seed_from_u64(self.rng.gen());

        let bridge = self.registry.create(Bridge::new(screen).into());
        let ship = self
            .registry
            .create(SpaceShip::new(Vector::new(x, SHIP_ROW), ship_rng).into());
        let player1 = self
            .registry
            .create(Player::new(Vector::new(x / 2, y), PLAYER_1_ICON, row).into());
        let player2 = self
            .registry
            .create(Player::new(Vector::new(x + x / 2, y), PLAYER_2_ICON, row).into());

        let right = screen.x - RIGHT_HUD_WIDTH;
        let hud = [
            self.registry.create(LifeCounter::new(player1, 0).into()),
            self.registry.create(LifeCounter::new(player2, right).into()),
            self.registry.create(PowerLevelCounter::new(player1, 0).into()),
            self.registry.create(PowerLevelCounter::new(player2, right).into()),
            self.registry.create(Narrator::new(screen).into()),
        ];

        for id in [player1, player2, bridge, ship].into_iter().chain(hud) {
            self.registry.add(id)?;
        }

        self.world.set_roster(Roster {
            player1,
            player2,
            bridge,
            ship,
        });
        log::info!("starting game on a {}x{} screen", screen.x, screen.y);
        self.world.emit(Event::GameStart);
        Ok(())
    }
}
