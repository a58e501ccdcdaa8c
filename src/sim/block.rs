//! Destructible blocks

use super::collision::{Aabb, CollisionWorld};
use crate::consts::Z_BLOCK;
use crate::entity::{EntityId, TickContext};
use crate::resources::names;

/// Static block; one hit destroys it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub(crate) owner: EntityId,
    bounds: Aabb,
}

impl Block {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            owner: EntityId::INVALID,
            bounds,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn on_init(&mut self, world: &mut CollisionWorld) {
        world.add_static(self.owner, self.bounds);
    }

    /// Stop being hittable. The entity itself is destroyed by the collision
    /// pass once every ball has been resolved.
    pub fn on_collision(&mut self, world: &mut CollisionWorld) {
        world.remove_static(self.owner);
    }

    pub fn on_destroy(&mut self, world: &mut CollisionWorld) {
        world.remove_static(self.owner);
    }

    pub fn tick(&mut self, cx: &mut TickContext) {
        cx.draw_sprite(names::BLOCK, self.bounds.to_rect(), Z_BLOCK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityPool, PoolConfig};
    use crate::sim::TestBench;
    use glam::Vec2;

    #[test]
    fn test_collision_then_destroy_deregisters_once() {
        let mut world = CollisionWorld::new();
        let mut pool = EntityPool::new(PoolConfig::for_counts(2, 1));
        let id = pool.create();
        pool.attach(id, Block::new(Aabb::new(Vec2::ZERO, Vec2::ONE)), &mut world);
        assert_eq!(world.static_count(), 1);

        pool.get_mut::<Block>(id).unwrap().on_collision(&mut world);
        assert_eq!(world.static_count(), 0);
        // Second deregistration is a no-op
        assert!(pool.destroy(id, &mut world));
        assert_eq!(world.static_count(), 0);
    }

    #[test]
    fn test_tick_draws_block_sprite() {
        let mut bench = TestBench::new();
        let mut block = Block::new(Aabb::new(Vec2::new(100.0, 50.0), Vec2::new(96.0, 32.0)));
        block.tick(&mut bench.cx(0.01));

        let item = &bench.draw.sprites()[0];
        assert_eq!(item.position, Vec2::new(4.0, 18.0));
        assert_eq!(item.size, Vec2::new(192.0, 64.0));
        assert_eq!(item.z_index, Z_BLOCK);
    }
}
