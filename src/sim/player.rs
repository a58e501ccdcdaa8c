//! The player's paddle

use glam::Vec2;

use super::collision::{Aabb, CollisionWorld};
use crate::Rect;
use crate::config::{PaddleConfig, WorldBounds};
use crate::consts::Z_PADDLE;
use crate::entity::{EntityId, TickContext};
use crate::platform::Key;
use crate::resources::names;

/// Horizontally moving paddle at the bottom of the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub(crate) owner: EntityId,
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
    /// Units per second
    pub speed: f32,
    pub boost_multiplier: f32,
}

impl Player {
    pub fn new(position: Vec2, config: &PaddleConfig) -> Self {
        Self {
            owner: EntityId::INVALID,
            position,
            size: config.size,
            speed: config.speed,
            boost_multiplier: config.boost_multiplier,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(self.rect())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Move by `dx` if both edges stay inside the bounds. A move that would
    /// cross a wall is rejected outright, not clamped.
    pub fn try_move(&mut self, dx: f32, bounds: &WorldBounds) -> bool {
        let x = self.position.x + dx;
        if bounds.contains_span_x(x, self.size.x) {
            self.position.x = x;
            true
        } else {
            false
        }
    }

    pub fn on_init(&mut self, world: &mut CollisionWorld) {
        world.set_paddle(self.owner);
    }

    pub fn on_destroy(&mut self, world: &mut CollisionWorld) {
        world.clear_paddle(self.owner);
    }

    pub fn tick(&mut self, cx: &mut TickContext) {
        let mut direction = 0.0;
        if cx.input.is_key_down(Key::Left) {
            direction -= 1.0;
        }
        if cx.input.is_key_down(Key::Right) {
            direction += 1.0;
        }
        if direction != 0.0 {
            let mut speed = self.speed;
            if cx.input.is_key_down(Key::Boost) {
                speed *= self.boost_multiplier;
            }
            self.try_move(direction * speed * cx.dt, cx.bounds);
        }

        if cx.input.is_key_pressed(Key::Launch) {
            cx.signals.request_launch();
        }

        cx.signals.paddle = Some(self.rect());
        cx.draw_sprite(names::PADDLE, self.rect(), Z_PADDLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TestBench;

    fn paddle_at(x: f32) -> Player {
        Player::new(Vec2::new(x, 1000.0), &PaddleConfig::default())
    }

    #[test]
    fn test_move_inside_bounds() {
        let bounds = WorldBounds::default();
        let mut paddle = paddle_at(100.0);
        assert!(paddle.try_move(-50.0, &bounds));
        assert_eq!(paddle.position.x, 50.0);
    }

    #[test]
    fn test_move_past_wall_is_rejected() {
        let bounds = WorldBounds::default();
        let mut paddle = paddle_at(10.0);
        assert!(!paddle.try_move(-11.0, &bounds));
        assert_eq!(paddle.position.x, 10.0);

        let right = bounds.max_x - paddle.size.x - 5.0;
        let mut paddle = paddle_at(right);
        assert!(!paddle.try_move(6.0, &bounds));
        assert_eq!(paddle.position.x, right);
        // Landing exactly on the wall is allowed
        assert!(paddle.try_move(5.0, &bounds));
    }

    #[test]
    fn test_tick_moves_publishes_and_draws() {
        let mut bench = TestBench::new();
        bench.input.press(Key::Right);
        let mut paddle = paddle_at(500.0);
        let dt = 0.1;

        paddle.tick(&mut bench.cx(dt));

        assert!((paddle.position.x - (500.0 + PaddleConfig::default().speed * dt)).abs() < 1e-3);
        assert_eq!(bench.signals.paddle, Some(paddle.rect()));
        assert_eq!(bench.draw.len(), 1);
        assert_eq!(bench.draw.sprites()[0].z_index, Z_PADDLE);
    }

    #[test]
    fn test_boost_multiplies_speed() {
        let mut bench = TestBench::new();
        bench.input.press(Key::Left);
        bench.input.press(Key::Boost);
        let mut paddle = paddle_at(1000.0);
        paddle.tick(&mut bench.cx(0.1));

        let config = PaddleConfig::default();
        let expected = 1000.0 - config.speed * config.boost_multiplier * 0.1;
        assert!((paddle.position.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_launch_edge_posts_request() {
        let mut bench = TestBench::new();
        bench.input.press(Key::Launch);
        let mut paddle = paddle_at(500.0);
        paddle.tick(&mut bench.cx(0.01));
        assert!(bench.signals.take_launch());

        // Held, not pressed again
        bench.input.end_frame();
        paddle.tick(&mut bench.cx(0.01));
        assert!(!bench.signals.take_launch());
    }

    #[test]
    fn test_init_and_destroy_register_paddle() {
        let mut world = CollisionWorld::new();
        let mut pool = crate::entity::EntityPool::new(crate::entity::PoolConfig::for_counts(1, 1));
        let id = pool.create();
        pool.attach(id, paddle_at(0.0), &mut world);
        assert_eq!(world.paddle(), Some(id));
        pool.destroy(id, &mut world);
        assert_eq!(world.paddle(), None);
    }
}
