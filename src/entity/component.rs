//! Closed component model
//!
//! Components are a tagged enum rather than trait objects: lookup compares the
//! `ComponentKind` tag, dispatch is a `match`. Every payload is `Copy` so an
//! entity's component region can be rewound without running destructors.

use super::pool::EntityId;
use crate::Rect;
use crate::config::WorldBounds;
use crate::platform::InputSource;
use crate::renderer::{Color, DrawList};
use crate::resources::Resources;
use crate::sim::ball::Ball;
use crate::sim::block::Block;
use crate::sim::collision::{CollisionWorld, Contact, Manifold};
use crate::sim::player::Player;
use crate::sim::state::FrameSignals;

/// Declared kind of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Player,
    Ball,
    Block,
}

/// A behavior unit owned by exactly one entity
#[derive(Debug, Clone, Copy)]
pub enum Component {
    Player(Player),
    Ball(Ball),
    Block(Block),
}

/// Everything a component may touch while ticking
pub struct TickContext<'a> {
    pub dt: f32,
    pub bounds: &'a WorldBounds,
    pub input: &'a dyn InputSource,
    pub resources: &'a Resources,
    pub draw: &'a mut DrawList,
    pub collision: &'a mut CollisionWorld,
    pub signals: &'a mut FrameSignals,
}

impl TickContext<'_> {
    /// Queue a whole-texture sprite by name. Missing textures draw nothing.
    pub fn draw_sprite(&mut self, texture: &str, dest: Rect, z_index: i32) {
        let Some(index) = self.resources.texture_index(texture) else {
            log::trace!("no texture named '{}'", texture);
            return;
        };
        let src = self
            .resources
            .texture(index)
            .map(|t| t.source_rect())
            .unwrap_or(dest);
        self.draw
            .submit(dest.position(), dest.size(), index, src, z_index, Color::WHITE);
    }
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Player(_) => ComponentKind::Player,
            Component::Ball(_) => ComponentKind::Ball,
            Component::Block(_) => ComponentKind::Block,
        }
    }

    pub fn owner(&self) -> EntityId {
        match self {
            Component::Player(c) => c.owner,
            Component::Ball(c) => c.owner,
            Component::Block(c) => c.owner,
        }
    }

    pub fn set_owner(&mut self, owner: EntityId) {
        match self {
            Component::Player(c) => c.owner = owner,
            Component::Ball(c) => c.owner = owner,
            Component::Block(c) => c.owner = owner,
        }
    }

    pub fn on_init(&mut self, world: &mut CollisionWorld) {
        match self {
            Component::Player(c) => c.on_init(world),
            Component::Ball(_) => {}
            Component::Block(c) => c.on_init(world),
        }
    }

    pub fn on_destroy(&mut self, world: &mut CollisionWorld) {
        match self {
            Component::Player(c) => c.on_destroy(world),
            Component::Ball(c) => c.on_destroy(world),
            Component::Block(c) => c.on_destroy(world),
        }
    }

    pub fn tick(&mut self, cx: &mut TickContext) {
        match self {
            Component::Player(c) => c.tick(cx),
            Component::Ball(c) => c.tick(cx),
            Component::Block(c) => c.tick(cx),
        }
    }

    /// Collision response. Paddles have none.
    pub fn on_collision(&mut self, manifold: &Manifold, other: &Contact, world: &mut CollisionWorld) {
        match self {
            Component::Player(_) => {}
            Component::Ball(c) => c.on_collision(manifold, other),
            Component::Block(c) => c.on_collision(world),
        }
    }
}

/// Concrete component types that can be looked up on an entity
pub trait ComponentType: Sized + Into<Component> {
    const KIND: ComponentKind;

    fn downcast(component: &Component) -> Option<&Self>;

    fn downcast_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_type {
    ($ty:ident) => {
        impl ComponentType for $ty {
            const KIND: ComponentKind = ComponentKind::$ty;

            fn downcast(component: &Component) -> Option<&Self> {
                match component {
                    Component::$ty(c) => Some(c),
                    _ => None,
                }
            }

            fn downcast_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$ty(c) => Some(c),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Component {
            fn from(value: $ty) -> Self {
                Component::$ty(value)
            }
        }
    };
}

component_type!(Player);
component_type!(Ball);
component_type!(Block);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Aabb;
    use glam::Vec2;

    #[test]
    fn test_kind_matches_variant() {
        let block: Component = Block::new(Aabb::new(Vec2::ZERO, Vec2::ONE)).into();
        assert_eq!(block.kind(), ComponentKind::Block);
        assert_eq!(block.kind(), Block::KIND);
        assert!(Block::downcast(&block).is_some());
        assert!(Ball::downcast(&block).is_none());
        assert!(Player::downcast(&block).is_none());
    }

    #[test]
    fn test_set_owner() {
        let mut block: Component = Block::new(Aabb::new(Vec2::ZERO, Vec2::ONE)).into();
        assert_eq!(block.owner(), EntityId::INVALID);
        let mut pool = crate::entity::EntityPool::new(crate::entity::PoolConfig::for_counts(1, 1));
        let id = pool.create();
        block.set_owner(id);
        assert_eq!(block.owner(), id);
    }
}
