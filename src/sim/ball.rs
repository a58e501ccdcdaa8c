//! The ball
//!
//! Starts attached above the paddle. Once launched it integrates its own
//! velocity, bounces off the side and top walls and is lost past the bottom.
//! Paddle and block responses arrive through `on_collision`.

use glam::Vec2;

use super::collision::{Circle, CollisionWorld, Contact, Face, Manifold, classify_face, paddle_bounce};
use crate::Rect;
use crate::config::{BallConfig, WorldBounds};
use crate::consts::Z_BALL;
use crate::entity::{ComponentKind, EntityId, TickContext};
use crate::resources::names;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    /// Riding the paddle, waiting for launch
    Attached,
    Launched,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub(crate) owner: EntityId,
    pub state: BallState,
    /// Top-left corner of the bounding square
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    initial_velocity: Vec2,
    attach_offset: f32,
    bounce_intensity: f32,
    reflect_side_hits: bool,
}

impl Ball {
    pub fn new(position: Vec2, config: &BallConfig) -> Self {
        Self {
            owner: EntityId::INVALID,
            state: BallState::Attached,
            position,
            velocity: Vec2::ZERO,
            radius: config.radius,
            initial_velocity: config.initial_velocity,
            attach_offset: config.attach_offset,
            bounce_intensity: config.bounce_intensity,
            reflect_side_hits: config.reflect_side_hits,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Width (and height) of the bounding square
    #[inline]
    pub fn size(&self) -> f32 {
        self.radius * 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.radius)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, Vec2::splat(self.size()))
    }

    pub fn shape(&self) -> Circle {
        Circle {
            center: self.center(),
            radius: self.radius,
        }
    }

    #[inline]
    pub fn is_launched(&self) -> bool {
        self.state == BallState::Launched
    }

    /// Leave the paddle with the configured velocity and become a dynamic
    /// collidable. Returns `false` if already launched.
    pub fn launch(&mut self, world: &mut CollisionWorld) -> bool {
        if self.is_launched() {
            return false;
        }
        self.state = BallState::Launched;
        self.velocity = self.initial_velocity;
        world.add_dynamic(self.owner, self.shape());
        log::debug!("{} launched with velocity {}", self.owner, self.velocity);
        true
    }

    /// Center horizontally on the paddle (plus the attach offset); height is
    /// left alone
    pub fn follow_paddle(&mut self, paddle: &Rect) {
        self.position.x = paddle.center().x + self.attach_offset - self.radius;
    }

    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Clamp back inside the side and top walls, reversing the matching
    /// velocity component. Returns `true` once the ball has fallen past the
    /// bottom bound.
    pub fn reflect_off_walls(&mut self, bounds: &WorldBounds) -> bool {
        let size = self.size();
        if self.position.x < bounds.min_x {
            self.position.x = bounds.min_x;
            self.velocity.x = -self.velocity.x;
        } else if self.position.x + size > bounds.max_x {
            self.position.x = bounds.max_x - size;
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y < bounds.min_y {
            self.position.y = bounds.min_y;
            self.velocity.y = -self.velocity.y;
        }

        self.position.y >= bounds.max_y
    }

    pub fn on_destroy(&mut self, world: &mut CollisionWorld) {
        world.remove_dynamic(self.owner);
    }

    pub fn tick(&mut self, cx: &mut TickContext) {
        // Integration begins the tick after launch
        let launched_now = cx.signals.take_launch() && self.launch(cx.collision);

        match self.state {
            BallState::Attached => {
                if let Some(paddle) = cx.signals.paddle {
                    self.follow_paddle(&paddle);
                }
            }
            BallState::Launched if !launched_now => {
                self.integrate(cx.dt);
                if self.reflect_off_walls(cx.bounds) && !cx.signals.ball_lost {
                    log::debug!("{} lost at {}", self.owner, self.position);
                    cx.signals.ball_lost = true;
                }
            }
            BallState::Launched => {}
        }

        cx.draw_sprite(names::BALL, self.rect(), Z_BALL);
    }

    pub fn on_collision(&mut self, manifold: &Manifold, other: &Contact) {
        match other.kind {
            ComponentKind::Player => {
                self.velocity = paddle_bounce(
                    self.center(),
                    self.velocity,
                    other.bounds.center,
                    other.bounds.half_extents.x,
                    self.bounce_intensity,
                );
                // Sit on the paddle so the next tick does not hit it again
                let top = other.bounds.min().y;
                if self.position.y + self.size() > top {
                    self.position.y = top - self.size();
                }
            }
            ComponentKind::Block => {
                let push = manifold.penetration.max(0.0);
                match classify_face(manifold.separation) {
                    Face::Top => {
                        self.position.y -= push;
                        self.velocity.y = -self.velocity.y;
                    }
                    Face::Bottom => {
                        self.position.y += push;
                        self.velocity.y = -self.velocity.y;
                    }
                    Face::Left => {
                        self.position.x -= push;
                        self.side_hit();
                    }
                    Face::Right => {
                        self.position.x += push;
                        self.side_hit();
                    }
                }
            }
            ComponentKind::Ball => {}
        }
    }

    fn side_hit(&mut self) {
        if self.reflect_side_hits {
            self.velocity.x = -self.velocity.x;
        } else {
            self.velocity.x -= self.velocity.x;
        }
    }
}
