//! Narrow-phase collision detection and response
//!
//! Brute force over one paddle, a ball or two and a few dozen blocks.
//! Dynamic bodies (balls) are tested against the paddle first, then against
//! the static block list. Destruction is deferred until every ball has been
//! resolved so the static list is never mutated while it is being scanned.

use glam::Vec2;

use super::ball::Ball;
use super::player::Player;
use crate::Rect;
use crate::entity::{ComponentKind, EntityId, EntityPool};

/// Box given by center and half size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub const fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.size() * 0.5)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_pos_size(self.min(), self.half_extents * 2.0)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Result of one box-vs-circle test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Closest point on the box minus the circle center
    pub separation: Vec2,
    /// `radius - distance`; negative when apart
    pub penetration: f32,
    pub collides: bool,
}

/// Box vs circle overlap.
///
/// The closest point on the box to the circle's center decides: the shapes
/// collide when that point is within `radius` of the center.
pub fn aabb_vs_circle(aabb: &Aabb, circle: &Circle) -> Manifold {
    let diff = circle.center - aabb.center;
    let clamped = diff.clamp(-aabb.half_extents, aabb.half_extents);
    let closest = aabb.center + clamped;
    let separation = closest - circle.center;
    let distance = separation.length();

    Manifold {
        separation,
        penetration: circle.radius - distance,
        collides: distance <= circle.radius,
    }
}

/// Block face a ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
    Right,
    Left,
}

impl Face {
    /// Test order; ties go to the earlier face
    pub const ALL: [Face; 4] = [Face::Top, Face::Bottom, Face::Right, Face::Left];

    /// Direction from the ball toward the block when this face is hit
    pub fn direction(self) -> Vec2 {
        match self {
            Face::Top => Vec2::Y,
            Face::Bottom => Vec2::NEG_Y,
            Face::Right => Vec2::NEG_X,
            Face::Left => Vec2::X,
        }
    }
}

/// Classify a separation vector by its best-aligned face direction
pub fn classify_face(separation: Vec2) -> Face {
    let dir = separation.normalize_or_zero();
    let mut best = Face::Top;
    let mut best_dot = f32::NEG_INFINITY;
    for face in Face::ALL {
        let dot = dir.dot(face.direction());
        if dot > best_dot {
            best = face;
            best_dot = dot;
        }
    }
    best
}

/// Outgoing ball velocity after a paddle hit.
///
/// Horizontal speed follows where the ball landed relative to the paddle
/// center (clamped to the paddle's half width), scaled by `intensity` and the
/// incoming speed. Vertical is forced upward. The result keeps the incoming
/// speed exactly.
pub fn paddle_bounce(
    ball_center: Vec2,
    velocity: Vec2,
    paddle_center: Vec2,
    paddle_half_width: f32,
    intensity: f32,
) -> Vec2 {
    let speed = velocity.length();
    let ratio = if paddle_half_width > 0.0 {
        ((ball_center.x - paddle_center.x) / paddle_half_width).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let vy = if velocity.y != 0.0 {
        -velocity.y.abs()
    } else {
        -speed
    };
    Vec2::new(speed * ratio * intensity, vy).normalize_or_zero() * speed
}

/// The other party in a collision callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub entity: EntityId,
    pub kind: ComponentKind,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBody {
    pub entity: EntityId,
    /// Rebuilt from the ball every resolve
    pub shape: Circle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBody {
    pub entity: EntityId,
    pub bounds: Aabb,
}

/// Outcome of one resolve pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub paddle_hits: u32,
    pub blocks_destroyed: u32,
}

/// Registered collidables
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    paddle: Option<EntityId>,
    dynamic: Vec<DynamicBody>,
    statics: Vec<StaticBody>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_paddle(&mut self, entity: EntityId) {
        self.paddle = Some(entity);
    }

    /// Forget the paddle if it is `entity`
    pub fn clear_paddle(&mut self, entity: EntityId) {
        if self.paddle == Some(entity) {
            self.paddle = None;
        }
    }

    pub fn paddle(&self) -> Option<EntityId> {
        self.paddle
    }

    /// Register a dynamic body; re-registering only refreshes its shape
    pub fn add_dynamic(&mut self, entity: EntityId, shape: Circle) {
        match self.dynamic.iter_mut().find(|b| b.entity == entity) {
            Some(body) => body.shape = shape,
            None => self.dynamic.push(DynamicBody { entity, shape }),
        }
    }

    pub fn remove_dynamic(&mut self, entity: EntityId) -> bool {
        match self.dynamic.iter().position(|b| b.entity == entity) {
            Some(index) => {
                self.dynamic.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn add_static(&mut self, entity: EntityId, bounds: Aabb) {
        self.statics.push(StaticBody { entity, bounds });
    }

    /// Swap-remove the static body owned by `entity`. Safe to call again
    /// after it is gone.
    pub fn remove_static(&mut self, entity: EntityId) -> bool {
        match self.statics.iter().position(|b| b.entity == entity) {
            Some(index) => {
                self.statics.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn dynamic_bodies(&self) -> &[DynamicBody] {
        &self.dynamic
    }

    pub fn static_bodies(&self) -> &[StaticBody] {
        &self.statics
    }

    pub fn dynamic_count(&self) -> usize {
        self.dynamic.len()
    }

    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    /// Drop every registration
    pub fn clear(&mut self) {
        self.paddle = None;
        self.dynamic.clear();
        self.statics.clear();
    }

    /// Test, respond and destroy for one tick
    pub fn resolve(&mut self, pool: &mut EntityPool) -> CollisionReport {
        let mut report = CollisionReport::default();

        // Shapes follow the balls' live positions; records of dead balls go
        self.dynamic.retain_mut(|body| match pool.get::<Ball>(body.entity) {
            Some(ball) => {
                body.shape = ball.shape();
                true
            }
            None => false,
        });

        // Paddle vs balls
        let paddle = self
            .paddle
            .and_then(|id| pool.get::<Player>(id).map(|p| (id, p.bounds())));
        if let Some((paddle_id, paddle_bounds)) = paddle {
            let contact = Contact {
                entity: paddle_id,
                kind: ComponentKind::Player,
                bounds: paddle_bounds,
            };
            for i in 0..self.dynamic.len() {
                let body = self.dynamic[i];
                let manifold = aabb_vs_circle(&paddle_bounds, &body.shape);
                if manifold.collides {
                    log::trace!("paddle hit {} ({:?})", body.entity, manifold);
                    self.notify(pool, body.entity, &manifold, &contact);
                    report.paddle_hits += 1;
                }
            }
        }

        // Balls vs blocks; at most one block per ball per tick
        let mut doomed = Vec::new();
        for i in 0..self.dynamic.len() {
            let body = self.dynamic[i];
            let Some(shape) = pool.get::<Ball>(body.entity).map(Ball::shape) else {
                continue;
            };
            let hit = self.statics.iter().find_map(|block| {
                let manifold = aabb_vs_circle(&block.bounds, &shape);
                manifold.collides.then_some((*block, manifold))
            });
            let Some((block, manifold)) = hit else {
                continue;
            };

            log::debug!("{} hit block {}", body.entity, block.entity);
            let block_contact = Contact {
                entity: block.entity,
                kind: ComponentKind::Block,
                bounds: block.bounds,
            };
            self.notify(pool, body.entity, &manifold, &block_contact);

            let ball_contact = Contact {
                entity: body.entity,
                kind: ComponentKind::Ball,
                bounds: Aabb::new(shape.center, Vec2::splat(shape.radius)),
            };
            self.notify(pool, block.entity, &manifold, &ball_contact);
            doomed.push(block.entity);
        }

        for entity in doomed {
            if pool.destroy(entity, self) {
                report.blocks_destroyed += 1;
            }
        }

        report
    }

    /// Run every collision hook on `target`'s components
    fn notify(&mut self, pool: &mut EntityPool, target: EntityId, manifold: &Manifold, other: &Contact) {
        if let Some(entity) = pool.entity_mut(target) {
            for component in entity.components_mut() {
                component.on_collision(manifold, other, self);
            }
        }
    }
}
