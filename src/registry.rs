//! Entity registry: owns every live entity and runs the per-tick cycle.
//!
//! Mutation of the live set is staged: `add`/`remove` (and their in-tick
//! counterparts on `TickContext`) only record intent, and the single commit
//! at the end of `run_tick` applies it. No update or broadcast pass ever
//! sees an insertion or removal requested during that same tick.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::GameError;
use crate::events::Event;
use crate::surface::Surface;

// ── Handles ───────────────────────────────────────────────────────────────────

/// Identity of an entity. Handles are allocated in increasing order and
/// never reused, so ordering by handle is insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Where the registry appends and reads back this tick's events.
pub trait EventQueue {
    fn emit(&mut self, event: Event);
    fn event(&self, index: usize) -> Option<&Event>;
}

/// A storable entity. Each accessor returns `None` when the entity lacks
/// that capability; the registry skips it for the matching pass.
pub trait Entity: Sized {
    type World: EventQueue;

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable<Self>>;
    fn as_event_handler(&mut self) -> Option<&mut dyn EventHandler<Self>>;
    fn as_drawable(&self) -> Option<&dyn Drawable<Self>>;
}

pub trait Updatable<E: Entity> {
    fn update(&mut self, ctx: &mut TickContext<'_, E>) -> Result<(), GameError>;
}

pub trait EventHandler<E: Entity> {
    fn handle_event(&mut self, event: &Event, ctx: &mut TickContext<'_, E>)
        -> Result<(), GameError>;
}

pub trait Drawable<E: Entity> {
    fn draw(&self, view: &View<'_, E>, surface: &mut dyn Surface);
}

// ── Staging ───────────────────────────────────────────────────────────────────

struct Staging<E> {
    next_id: u64,
    /// Entities spawned during a tick; storage is borrowed while hooks run.
    created: BTreeMap<EntityId, E>,
    add: BTreeSet<EntityId>,
    remove: BTreeSet<EntityId>,
}

impl<E> Staging<E> {
    fn new() -> Self {
        Staging {
            next_id: 0,
            created: BTreeMap::new(),
            add: BTreeSet::new(),
            remove: BTreeSet::new(),
        }
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

// ── Per-call context ──────────────────────────────────────────────────────────

/// Handed to an entity while one of its hooks runs.
///
/// The running entity is taken out of storage for the duration of the call,
/// so `get` sees every other entity but never the caller.
pub struct TickContext<'a, E: Entity> {
    id: EntityId,
    world: &'a mut E::World,
    others: &'a BTreeMap<EntityId, E>,
    staging: &'a mut Staging<E>,
}

impl<'a, E: Entity> TickContext<'a, E> {
    /// Handle of the entity whose hook is running.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn world(&self) -> &E::World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut E::World {
        &mut *self.world
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.others.get(&id)
    }

    pub fn emit(&mut self, event: Event) {
        self.world.emit(event);
    }

    /// Stage a brand-new entity; it joins the live set at commit.
    pub fn spawn(&mut self, entity: E) -> EntityId {
        let id = self.staging.allocate();
        self.staging.created.insert(id, entity);
        self.staging.add.insert(id);
        id
    }

    /// Stage removal of `id`; unknown handles are ignored.
    pub fn remove(&mut self, id: EntityId) {
        let known = id == self.id
            || self.others.contains_key(&id)
            || self.staging.created.contains_key(&id);
        if known {
            self.staging.remove.insert(id);
        }
    }

    pub fn remove_self(&mut self) {
        self.staging.remove.insert(self.id);
    }
}

/// Read-only access for the draw pass.
pub struct View<'a, E: Entity> {
    world: &'a E::World,
    entities: &'a BTreeMap<EntityId, E>,
}

impl<'a, E: Entity> View<'a, E> {
    pub fn world(&self) -> &E::World {
        self.world
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entities.get(&id)
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

pub struct EntityRegistry<E> {
    /// Every committed entity, live or detached.
    entities: BTreeMap<EntityId, E>,
    live: BTreeSet<EntityId>,
    /// Joined the live set at the latest commit; not drawn until the next tick.
    fresh: BTreeSet<EntityId>,
    staging: Staging<E>,
}

impl<E: Entity> Default for EntityRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityRegistry<E> {
    pub fn new() -> Self {
        EntityRegistry {
            entities: BTreeMap::new(),
            live: BTreeSet::new(),
            fresh: BTreeSet::new(),
            staging: Staging::new(),
        }
    }

    /// Store an entity without making it live.
    pub fn create(&mut self, entity: E) -> EntityId {
        let id = self.staging.allocate();
        self.entities.insert(id, entity);
        id
    }

    /// Stage a known entity for addition. Adding a live or already staged
    /// entity is a no-op.
    pub fn add(&mut self, id: EntityId) -> Result<(), GameError> {
        if !self.is_known(id) {
            return Err(GameError::InvalidEntity(id));
        }
        if !self.live.contains(&id) {
            self.staging.add.insert(id);
        }
        Ok(())
    }

    /// `create` followed by `add`.
    pub fn spawn(&mut self, entity: E) -> EntityId {
        let id = self.create(entity);
        self.staging.add.insert(id);
        id
    }

    /// Stage removal; unknown handles are ignored.
    pub fn remove(&mut self, id: EntityId) {
        if self.is_known(id) {
            self.staging.remove.insert(id);
        }
    }

    /// Drop every entity, live, detached or staged. Handles are not reused,
    /// so anything held from before the clear is now invalid.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.live.clear();
        self.fresh.clear();
        self.staging.created.clear();
        self.staging.add.clear();
        self.staging.remove.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entities
            .get(&id)
            .or_else(|| self.staging.created.get(&id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        match self.entities.get_mut(&id) {
            Some(entity) => Some(entity),
            None => self.staging.created.get_mut(&id),
        }
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// One simulation step: update pass, broadcast pass, commit.
    ///
    /// The broadcast pass keeps reading the queue until it is exhausted, so
    /// events emitted by handlers are delivered later in the same pass.
    /// Any hook error aborts the tick before commit.
    pub fn run_tick(&mut self, world: &mut E::World) -> Result<(), GameError> {
        self.fresh.clear();
        let ids: Vec<EntityId> = self.live.iter().copied().collect();

        for &id in &ids {
            run_hook(&mut self.entities, &mut self.staging, world, id, |entity, ctx| {
                match entity.as_updatable() {
                    Some(updatable) => updatable.update(ctx),
                    None => Ok(()),
                }
            })?;
        }

        let mut delivered = 0;
        while let Some(event) = world.event(delivered).copied() {
            for &id in &ids {
                run_hook(&mut self.entities, &mut self.staging, world, id, |entity, ctx| {
                    match entity.as_event_handler() {
                        Some(handler) => handler.handle_event(&event, ctx),
                        None => Ok(()),
                    }
                })?;
            }
            delivered += 1;
        }

        self.commit();
        Ok(())
    }

    /// Draw every live entity in insertion order, skipping those the latest
    /// commit just added.
    pub fn draw(&self, world: &E::World, surface: &mut dyn Surface) {
        let view = View {
            world,
            entities: &self.entities,
        };
        for id in self.live.difference(&self.fresh) {
            if let Some(drawable) = self.entities.get(id).and_then(|e| e.as_drawable()) {
                drawable.draw(&view, surface);
            }
        }
    }

    fn commit(&mut self) {
        self.entities.append(&mut self.staging.created);
        let added = std::mem::take(&mut self.staging.add);
        let removed = std::mem::take(&mut self.staging.remove);
        if !added.is_empty() || !removed.is_empty() {
            log::debug!("commit: +{} -{}", added.len(), removed.len());
        }

        self.fresh = added.difference(&self.live).copied().collect();
        self.live.extend(added);
        // Removal wins over an addition staged in the same tick.
        for id in &removed {
            self.live.remove(id);
            self.fresh.remove(id);
            self.entities.remove(id);
        }
    }

    fn is_known(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id) || self.staging.created.contains_key(&id)
    }
}

fn run_hook<E, F>(
    entities: &mut BTreeMap<EntityId, E>,
    staging: &mut Staging<E>,
    world: &mut E::World,
    id: EntityId,
    hook: F,
) -> Result<(), GameError>
where
    E: Entity,
    F: FnOnce(&mut E, &mut TickContext<'_, E>) -> Result<(), GameError>,
{
    let Some(mut entity) = entities.remove(&id) else {
        return Ok(());
    };
    let result = {
        let mut ctx = TickContext {
            id,
            world,
            others: &*entities,
            staging,
        };
        hook(&mut entity, &mut ctx)
    };
    entities.insert(id, entity);
    result
}
