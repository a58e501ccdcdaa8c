//! Fixed-capacity entity pool with an index-based free list

use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentType, TickContext};
use crate::memory::Region;
use crate::sim::collision::CollisionWorld;

/// Handle to a pool entity.
///
/// `id` is unique and increases monotonically; `slot` is the stable index of
/// the storage the entity lives in. A handle is only valid while its slot is
/// live and still carries the same id, so holding one across a `destroy` is
/// safe: the pool simply stops resolving it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    id: u32,
    slot: u32,
}

impl EntityId {
    /// Never issued by a pool
    pub const INVALID: EntityId = EntityId { id: 0, slot: u32::MAX };

    #[inline]
    pub fn id(self) -> u32 {
        self.id
    }

    #[inline]
    pub fn slot(self) -> u32 {
        self.slot
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}@{})", self.id, self.slot)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// Pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Byte budget for entity slots
    pub pool_bytes: usize,
    /// Byte budget of each entity's component region
    pub entity_arena_bytes: usize,
}

impl PoolConfig {
    /// Budget that holds exactly `entities` slots with room for `components`
    /// components each
    pub fn for_counts(entities: usize, components: usize) -> Self {
        Self {
            pool_bytes: entities * std::mem::size_of::<Entity>(),
            entity_arena_bytes: components * std::mem::size_of::<Component>(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::for_counts(256, 8)
    }
}

/// One pool slot
#[derive(Debug)]
pub struct Entity {
    id: u32,
    live: bool,
    /// Next slot on the free list (valid while not live)
    next_free: Option<u32>,
    /// Position in the pool's live list (valid while live)
    live_index: usize,
    components: Region<Component>,
}

impl Entity {
    fn new(arena_bytes: usize) -> Self {
        Self {
            id: 0,
            live: false,
            next_free: None,
            live_index: 0,
            components: Region::new(arena_bytes),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Components in attachment order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.components.iter_mut()
    }

    /// First component of kind `T`
    pub fn get<T: ComponentType>(&self) -> Option<&T> {
        self.components
            .iter()
            .find(|c| c.kind() == T::KIND)
            .and_then(T::downcast)
    }

    /// First component of kind `T`, mutably
    pub fn get_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find(|c| c.kind() == T::KIND)
            .and_then(T::downcast_mut)
    }

    fn tick(&mut self, cx: &mut TickContext) {
        for component in self.components.iter_mut() {
            component.tick(cx);
        }
    }
}

/// Owns every entity slot, the free list and the live set
#[derive(Debug)]
pub struct EntityPool {
    slots: Region<Entity>,
    free_head: Option<u32>,
    /// Live slots in creation order (modulo swap-removal)
    live: Vec<u32>,
    next_id: u32,
    entity_arena_bytes: usize,
}

impl EntityPool {
    pub fn new(config: PoolConfig) -> Self {
        let slots: Region<Entity> = Region::new(config.pool_bytes);
        let max_entities = config.pool_bytes / std::mem::size_of::<Entity>().max(1);
        log::debug!(
            "Entity pool: {} slots, {} bytes of components each",
            max_entities,
            config.entity_arena_bytes
        );
        Self {
            slots,
            free_head: None,
            live: Vec::with_capacity(max_entities),
            next_id: 1,
            entity_arena_bytes: config.entity_arena_bytes,
        }
    }

    /// Create a live entity, reusing a free slot when one is available.
    ///
    /// # Panics
    ///
    /// Panics if the free list is empty and the pool budget is exhausted, or
    /// if the id space is exhausted.
    pub fn create(&mut self) -> EntityId {
        let slot = match self.free_head {
            Some(slot) => {
                let entity = self.slots.get_mut(slot as usize).expect("free list slot");
                self.free_head = entity.next_free.take();
                // Lazy reset: the previous occupant's components go away only now
                entity.components.reset();
                slot
            }
            None => self.slots.construct(Entity::new(self.entity_arena_bytes)) as u32,
        };

        assert!(self.next_id < u32::MAX, "entity id space exhausted");
        let id = self.next_id;
        self.next_id += 1;

        let live_index = self.live.len();
        self.live.push(slot);

        let entity = self.slot_mut(slot);
        entity.id = id;
        entity.live = true;
        entity.live_index = live_index;

        EntityId { id, slot }
    }

    /// Destroy a live entity.
    ///
    /// Runs every component's destroy hook in attachment order, then returns
    /// the slot to the free list. Component storage is reclaimed when the slot
    /// is next reused. Returns `false` (and does nothing) for a stale handle.
    pub fn destroy(&mut self, handle: EntityId, world: &mut CollisionWorld) -> bool {
        if !self.is_live(handle) {
            log::warn!("destroy of stale entity {:?}", handle);
            return false;
        }

        let entity = self.slot_mut(handle.slot);
        for component in entity.components.iter_mut() {
            component.on_destroy(world);
        }
        entity.live = false;
        let live_index = entity.live_index;

        // Swap-remove from the live list, patching the moved entity's index
        self.live.swap_remove(live_index);
        if let Some(&moved) = self.live.get(live_index) {
            self.slot_mut(moved).live_index = live_index;
        }

        let free_head = self.free_head;
        self.slot_mut(handle.slot).next_free = free_head;
        self.free_head = Some(handle.slot);
        true
    }

    /// Destroy every live entity, keeping all slots for reuse
    pub fn destroy_all(&mut self, world: &mut CollisionWorld) {
        let count = self.live.len();
        while let Some(&slot) = self.live.last() {
            let handle = EntityId {
                id: self.slot_ref(slot).id,
                slot,
            };
            self.destroy(handle, world);
        }
        log::debug!("Destroyed {} entities", count);
    }

    /// Construct `component` inside the entity's region, hand it its owner
    /// and run its init hook. Returns `false` for a stale handle.
    ///
    /// # Panics
    ///
    /// Panics if the entity's component region is exhausted.
    pub fn attach(
        &mut self,
        handle: EntityId,
        component: impl Into<Component>,
        world: &mut CollisionWorld,
    ) -> bool {
        if !self.is_live(handle) {
            log::warn!("attach to stale entity {:?}", handle);
            return false;
        }
        let mut component = component.into();
        component.set_owner(handle);
        let entity = self.slot_mut(handle.slot);
        let index = entity.components.construct(component);
        if let Some(component) = entity.components.get_mut(index) {
            component.on_init(world);
        }
        true
    }

    /// Tick every live entity's components.
    ///
    /// Order follows the live list: stable within a frame, otherwise
    /// unspecified.
    pub fn tick_all(&mut self, cx: &mut TickContext) {
        for i in 0..self.live.len() {
            let slot = self.live[i];
            self.slot_mut(slot).tick(cx);
        }
    }

    /// Whether the handle still refers to a live entity
    pub fn is_live(&self, handle: EntityId) -> bool {
        self.slots
            .get(handle.slot as usize)
            .is_some_and(|e| e.live && e.id == handle.id)
    }

    pub fn entity(&self, handle: EntityId) -> Option<&Entity> {
        self.slots
            .get(handle.slot as usize)
            .filter(|e| e.live && e.id == handle.id)
    }

    pub fn entity_mut(&mut self, handle: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|e| e.live && e.id == handle.id)
    }

    /// First component of kind `T` on a live entity
    pub fn get<T: ComponentType>(&self, handle: EntityId) -> Option<&T> {
        self.entity(handle).and_then(Entity::get::<T>)
    }

    /// First component of kind `T` on a live entity, mutably
    pub fn get_mut<T: ComponentType>(&mut self, handle: EntityId) -> Option<&mut T> {
        self.entity_mut(handle).and_then(Entity::get_mut::<T>)
    }

    /// Handles of live entities in live-list order
    pub fn iter_live(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter().map(|&slot| EntityId {
            id: self.slot_ref(slot).id,
            slot,
        })
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Slots carved so far (live or free)
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Maximum number of slots the pool budget allows
    pub fn capacity(&self) -> usize {
        self.slots.capacity() / std::mem::size_of::<Entity>().max(1)
    }

    fn slot_ref(&self, slot: u32) -> &Entity {
        self.slots.get(slot as usize).expect("live slot index")
    }

    fn slot_mut(&mut self, slot: u32) -> &mut Entity {
        self.slots.get_mut(slot as usize).expect("live slot index")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::Block;
    use crate::sim::collision::Aabb;
    use glam::Vec2;

    fn block_at(x: f32) -> Block {
        Block::new(Aabb::new(Vec2::new(x, 0.0), Vec2::new(8.0, 4.0)))
    }

    #[test]
    fn test_create_issues_increasing_ids() {
        let mut pool = EntityPool::new(PoolConfig::for_counts(4, 2));
        let a = pool.create();
        let b = pool.create();
        assert!(b.id() > a.id());
        assert_eq!(pool.live_count(), 2);
        assert_eq!(pool.slot_count(), 2);
    }

    #[test]
    fn test_destroy_then_create_reuses_slot_with_greater_id() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(4, 2));
        let a = pool.create();
        let b = pool.create();
        assert!(pool.destroy(a, &mut world));
        assert!(!pool.is_live(a));

        let c = pool.create();
        assert_eq!(c.slot(), a.slot());
        assert!(c.id() > b.id());
        assert_eq!(pool.slot_count(), 2);
        // The old handle stays dead even though its slot is live again
        assert!(!pool.is_live(a));
        assert!(pool.is_live(c));
    }

    #[test]
    fn test_free_list_is_lifo() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(4, 2));
        let a = pool.create();
        let b = pool.create();
        pool.destroy(a, &mut world);
        pool.destroy(b, &mut world);
        assert_eq!(pool.create().slot(), b.slot());
        assert_eq!(pool.create().slot(), a.slot());
    }

    #[test]
    fn test_destroy_stale_handle_is_noop() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(2, 2));
        let a = pool.create();
        assert!(pool.destroy(a, &mut world));
        assert!(!pool.destroy(a, &mut world));
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_capacity_allows_exactly_budget() {
        let mut pool = EntityPool::new(PoolConfig::for_counts(3, 1));
        assert_eq!(pool.capacity(), 3);
        for _ in 0..3 {
            pool.create();
        }
        assert_eq!(pool.live_count(), 3);
    }

    #[test]
    #[should_panic(expected = "region exhausted")]
    fn test_create_past_capacity_is_fatal() {
        let mut pool = EntityPool::new(PoolConfig::for_counts(3, 1));
        for _ in 0..4 {
            pool.create();
        }
    }

    #[test]
    fn test_swap_remove_keeps_live_set_consistent() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(8, 1));
        let ids: Vec<_> = (0..5).map(|_| pool.create()).collect();
        pool.destroy(ids[1], &mut world);
        pool.destroy(ids[3], &mut world);

        let mut live: Vec<u32> = pool.iter_live().map(EntityId::id).collect();
        live.sort_unstable();
        assert_eq!(live, vec![ids[0].id(), ids[2].id(), ids[4].id()]);

        // Every surviving handle can still be destroyed through its own index
        for id in [ids[4], ids[0], ids[2]] {
            assert!(pool.destroy(id, &mut world));
        }
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_attach_and_get_by_kind() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(2, 2));
        let e = pool.create();
        assert!(pool.attach(e, block_at(40.0), &mut world));

        let block = pool.get::<Block>(e).expect("block attached");
        assert_eq!(block.owner(), e);
        assert!(pool.get::<crate::sim::ball::Ball>(e).is_none());
        // Block init registers a static collidable
        assert_eq!(world.static_count(), 1);
    }

    #[test]
    fn test_get_returns_first_match() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(2, 2));
        let e = pool.create();
        pool.attach(e, block_at(1.0), &mut world);
        pool.attach(e, block_at(2.0), &mut world);
        let block = pool.get::<Block>(e).unwrap();
        assert_eq!(block.bounds().center.x, 1.0);
    }

    #[test]
    #[should_panic(expected = "region exhausted")]
    fn test_component_region_is_bounded() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(2, 1));
        let e = pool.create();
        pool.attach(e, block_at(1.0), &mut world);
        pool.attach(e, block_at(2.0), &mut world);
    }

    #[test]
    fn test_destroy_runs_hooks_and_reuse_clears_components() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(2, 2));
        let e = pool.create();
        pool.attach(e, block_at(1.0), &mut world);
        assert_eq!(world.static_count(), 1);

        pool.destroy(e, &mut world);
        // Block destroy hook deregisters its collidable
        assert_eq!(world.static_count(), 0);

        let reused = pool.create();
        assert_eq!(reused.slot(), e.slot());
        assert_eq!(pool.entity(reused).unwrap().components().count(), 0);
    }

    #[test]
    fn test_destroy_all_recycles_without_new_slots() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(4, 2));
        let mut max_id = 0;
        for i in 0..4 {
            let e = pool.create();
            pool.attach(e, block_at(i as f32 * 20.0), &mut world);
            max_id = e.id();
        }
        pool.destroy_all(&mut world);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(world.static_count(), 0);

        for _ in 0..4 {
            let e = pool.create();
            assert!(e.id() > max_id);
        }
        assert_eq!(pool.slot_count(), 4);
    }
}
