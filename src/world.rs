//! Controller-owned global state and the read interface entities use to
//! look at the rest of the world.

use crate::entities::{bridge_row, Bridge, GameEntity, Player};
use crate::events::Event;
use crate::registry::{EntityId, EventQueue, TickContext, View};
use crate::vector::Vector;

// ── Phase & roster ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    StartScreen,
    Playing,
    /// A player is falling; nobody else on the bridge moves.
    Falling,
    /// Never entered by an event; a lost match stays in `Playing`.
    WinScreen,
    Exit,
}

/// Handles of the entities built at game start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roster {
    pub player1: EntityId,
    pub player2: EntityId,
    pub bridge: EntityId,
    pub ship: EntityId,
}

impl Roster {
    pub fn players(&self) -> [EntityId; 2] {
        [self.player1, self.player2]
    }

    pub fn opponent_of(&self, id: EntityId) -> Option<EntityId> {
        if id == self.player1 {
            Some(self.player2)
        } else if id == self.player2 {
            Some(self.player1)
        } else {
            None
        }
    }
}

// ── World state ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct WorldState {
    screen_size: Vector,
    phase: Phase,
    turn: u64,
    roster: Option<Roster>,
    /// This tick's events, cleared by `end_tick`.
    pending: Vec<Event>,
    /// Every event ever recorded, for diagnostics.
    log: Vec<Event>,
}

impl WorldState {
    pub fn new(screen_size: Vector) -> Self {
        WorldState {
            screen_size,
            phase: Phase::StartScreen,
            turn: 0,
            roster: None,
            pending: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn screen_size(&self) -> Vector {
        self.screen_size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn roster(&self) -> Option<Roster> {
        self.roster
    }

    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = Some(roster);
    }

    pub fn pending_events(&self) -> &[Event] {
        &self.pending
    }

    pub fn event_log(&self) -> &[Event] {
        &self.log
    }

    pub fn end_tick(&mut self) {
        self.pending.clear();
        self.turn += 1;
    }

    /// Phase transitions driven by events, applied the moment an event is
    /// recorded so later entities in the same pass already see them.
    fn observe(&mut self, event: &Event) {
        if self.phase == Phase::Exit {
            return;
        }
        let next = match event {
            Event::GameStart => Some(Phase::Playing),
            Event::PlayerFalling { .. } => Some(Phase::Falling),
            Event::PlayerFallingComplete { .. } => Some(Phase::Playing),
            // A loss is left to the narrator and the players; the phase
            // stays where it is.
            Event::PlayersBounce
            | Event::PlayerLoses { .. }
            | Event::PlayerHitByBeam { .. }
            | Event::BridgeStruck { .. } => None,
        };
        if let Some(phase) = next {
            self.phase = phase;
        }
    }
}

impl EventQueue for WorldState {
    fn emit(&mut self, event: Event) {
        log::info!("Event: {event}");
        self.observe(&event);
        self.log.push(event);
        self.pending.push(event);
    }

    fn event(&self, index: usize) -> Option<&Event> {
        self.pending.get(index)
    }
}

// ── Entity-facing queries ─────────────────────────────────────────────────────

/// What an entity may read about the world while one of its hooks runs.
pub trait WorldView {
    fn state(&self) -> &WorldState;
    fn lookup(&self, id: EntityId) -> Option<&GameEntity>;

    fn screen_size(&self) -> Vector {
        self.state().screen_size()
    }

    fn phase(&self) -> Phase {
        self.state().phase()
    }

    fn turn(&self) -> u64 {
        self.state().turn()
    }

    fn bridge_row(&self) -> i32 {
        bridge_row(self.screen_size())
    }

    fn bridge(&self) -> Option<&Bridge> {
        let id = self.state().roster()?.bridge;
        self.lookup(id)?.as_bridge()
    }

    fn player(&self, id: EntityId) -> Option<&Player> {
        self.lookup(id)?.as_player()
    }

    fn opponent_of(&self, id: EntityId) -> Option<(EntityId, &Player)> {
        let opponent = self.state().roster()?.opponent_of(id)?;
        Some((opponent, self.player(opponent)?))
    }

    /// Both roster players, skipping any that are not reachable.
    fn players(&self) -> Vec<(EntityId, &Player)> {
        let Some(roster) = self.state().roster() else {
            return Vec::new();
        };
        roster
            .players()
            .into_iter()
            .filter_map(|id| Some((id, self.player(id)?)))
            .collect()
    }
}

impl WorldView for TickContext<'_, GameEntity> {
    fn state(&self) -> &WorldState {
        self.world()
    }

    fn lookup(&self, id: EntityId) -> Option<&GameEntity> {
        self.get(id)
    }
}

impl WorldView for View<'_, GameEntity> {
    fn state(&self) -> &WorldState {
        self.world()
    }

    fn lookup(&self, id: EntityId) -> Option<&GameEntity> {
        self.get(id)
    }
}
