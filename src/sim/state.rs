//! Game context and per-frame signals
//!
//! `Game` owns every piece of runtime state: the entity pool, the collision
//! world, the draw list and the phase machine. Nothing is global; the host
//! threads one `Game` through `tick` and `render`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::Block;
use super::collision::{CollisionReport, CollisionWorld};
use super::map::Map;
use super::player::Player;
use crate::Rect;
use crate::config::{ConfigError, GameConfig};
use crate::consts::Z_HUD;
use crate::entity::{EntityId, EntityPool, TickContext};
use crate::platform::InputSource;
use crate::renderer::{Color, DrawList, RecordedDrawItems};
use crate::resources::{Resources, names};
use crate::ui::{Menu, View};

/// Vertical gap between the attached ball and the paddle
const BALL_REST_GAP: f32 = 2.0;

const HUD_FONT_SIZE: f32 = 40.0;
const BANNER_FONT_SIZE: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    /// Last block gone; play continues until the settle delay passes
    PendingWin,
    /// Ball lost; play continues until the settle delay passes
    PendingLose,
    /// Frozen final frame with the win banner
    Win,
    /// Frozen final frame with the lose banner
    Lose,
    Quit,
}

/// Data components hand to each other within a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSignals {
    /// Paddle rectangle as of its latest tick
    pub paddle: Option<Rect>,
    launch_requested: bool,
    /// Set once the ball drops past the bottom bound
    pub ball_lost: bool,
}

impl FrameSignals {
    pub fn request_launch(&mut self) {
        self.launch_requested = true;
    }

    /// Consume a pending launch request
    pub fn take_launch(&mut self) -> bool {
        std::mem::take(&mut self.launch_requested)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The whole game
#[derive(Debug)]
pub struct Game {
    pub(super) config: GameConfig,
    pub(super) resources: Resources,
    pub(super) pool: EntityPool,
    pub(super) collision: CollisionWorld,
    pub(super) draw: DrawList,
    pub(super) signals: FrameSignals,
    pub(super) menu: Menu,
    pub(super) map: Map,
    pub(super) score: u32,
    pub(super) phase: GamePhase,
    /// Clock reading when the current phase began
    pub(super) phase_started: f64,
    /// Final frame shown under the win/lose banner
    pub(super) frozen: RecordedDrawItems,
    paddle: EntityId,
    ball: EntityId,
}

impl Game {
    /// Validate the config and size every store from it. Starts at the menu
    /// with no scene.
    pub fn new(config: GameConfig, resources: Resources) -> Result<Self, ConfigError> {
        config.validate()?;

        let pool = EntityPool::new(config.capacity.pool());
        let draw = DrawList::new(config.capacity.draw_scratch_bytes);
        let map = Map::from_level(&config.level);
        log::info!(
            "Game ready: {}x{} level with {} blocks, pool of {}",
            map.width(),
            map.height(),
            map.occupied_count(),
            pool.capacity()
        );

        Ok(Self {
            config,
            resources,
            pool,
            collision: CollisionWorld::new(),
            draw,
            signals: FrameSignals::default(),
            menu: Menu::new(),
            map,
            score: 0,
            phase: GamePhase::Menu,
            phase_started: 0.0,
            frozen: RecordedDrawItems::default(),
            paddle: EntityId::INVALID,
            ball: EntityId::INVALID,
        })
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Blocks still registered as collidables
    pub fn blocks_remaining(&self) -> usize {
        self.collision.static_count()
    }

    pub fn paddle_center(&self) -> Option<Vec2> {
        self.pool.get::<Player>(self.paddle).map(Player::center)
    }

    pub fn ball_center(&self) -> Option<Vec2> {
        self.pool.get::<Ball>(self.ball).map(Ball::center)
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.pool.get::<Ball>(self.ball)
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Seconds spent in the current phase
    pub fn phase_elapsed(&self, now: f64) -> f64 {
        now - self.phase_started
    }

    pub(super) fn enter(&mut self, phase: GamePhase, now: f64) {
        log::info!("Phase {:?} -> {:?} (score {})", self.phase, phase, self.score);
        self.phase = phase;
        self.phase_started = now;
    }

    /// Playfield as a layout box
    pub(super) fn screen(&self) -> View {
        let world = &self.config.world;
        View::push(world.min_x, world.min_y, world.width(), world.height())
    }

    /// Destroy every entity and forget all scene state
    pub(super) fn teardown_scene(&mut self) {
        self.pool.destroy_all(&mut self.collision);
        self.collision.clear();
        self.signals.clear();
        self.frozen.clear();
        self.score = 0;
        self.paddle = EntityId::INVALID;
        self.ball = EntityId::INVALID;
        log::info!("Scene torn down");
    }

    /// Spawn the paddle, the attached ball and one block per occupied tile
    pub(super) fn setup_scene(&mut self) {
        let world = self.config.world;
        let paddle_config = self.config.paddle;
        let position = Vec2::new(
            world.min_x + (world.width() - paddle_config.size.x) * 0.5,
            world.max_y - paddle_config.bottom_margin - paddle_config.size.y,
        );
        let player = Player::new(position, &paddle_config);
        let paddle_rect = player.rect();
        self.paddle = self.pool.create();
        self.pool.attach(self.paddle, player, &mut self.collision);
        self.signals.paddle = Some(paddle_rect);

        let ball_config = self.config.ball;
        let ball_y = paddle_rect.y - ball_config.radius * 2.0 - BALL_REST_GAP;
        let mut ball = Ball::new(Vec2::new(0.0, ball_y), &ball_config);
        ball.follow_paddle(&paddle_rect);
        self.ball = self.pool.create();
        self.pool.attach(self.ball, ball, &mut self.collision);

        for (x, y) in self.map.occupied_tiles() {
            let block = self.pool.create();
            self.pool
                .attach(block, Block::new(self.map.tile_bounds(x, y)), &mut self.collision);
        }

        log::info!(
            "Scene ready: {} blocks, {} entities",
            self.collision.static_count(),
            self.pool.live_count()
        );
    }

    /// Teardown strictly before setup
    pub(super) fn reset_scene(&mut self) {
        self.teardown_scene();
        self.setup_scene();
    }

    /// Tick every entity, then resolve collisions and bank the score
    pub(super) fn simulate(&mut self, input: &dyn InputSource, dt: f32) -> CollisionReport {
        let mut cx = TickContext {
            dt,
            bounds: &self.config.world,
            input,
            resources: &self.resources,
            draw: &mut self.draw,
            collision: &mut self.collision,
            signals: &mut self.signals,
        };
        self.pool.tick_all(&mut cx);

        let report = self.collision.resolve(&mut self.pool);
        self.score += report.blocks_destroyed;
        report
    }

    pub(super) fn draw_hud(&mut self) {
        let Some(font) = self.resources.font_index(names::FONT) else {
            return;
        };
        let anchor = View::push_text(self.screen(), 24.0, 16.0);
        self.draw.submit_text(
            anchor.position(),
            font,
            format!("Score: {}", self.score),
            HUD_FONT_SIZE,
            1.0,
            Z_HUD,
            Color::WHITE,
        );
    }

    pub(super) fn draw_banner(&mut self) {
        let Some(font) = self.resources.font_index(names::FONT) else {
            return;
        };
        let (text, color) = match self.phase {
            GamePhase::Win => ("YOU WIN", Color::GOLD),
            _ => ("GAME OVER", Color::RED),
        };
        let banner = View::push_centered(self.screen(), BANNER_FONT_SIZE * 5.0, BANNER_FONT_SIZE);
        self.draw
            .submit_text(banner.position(), font, text, BANNER_FONT_SIZE, 4.0, Z_HUD + 1, color);
        let score = View::push_text(banner, 0.0, BANNER_FONT_SIZE * 1.25);
        self.draw.submit_text(
            score.position(),
            font,
            format!("Final score: {}", self.score),
            HUD_FONT_SIZE,
            1.0,
            Z_HUD + 1,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_resources;

    #[test]
    fn test_take_launch_consumes() {
        let mut signals = FrameSignals::default();
        assert!(!signals.take_launch());
        signals.request_launch();
        assert!(signals.take_launch());
        assert!(!signals.take_launch());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.ball.radius = 0.0;
        assert!(matches!(
            Game::new(config, Resources::new()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_setup_spawns_paddle_ball_and_blocks() {
        let mut game = Game::new(GameConfig::default(), test_resources()).unwrap();
        assert_eq!(game.pool().live_count(), 0);
        game.setup_scene();

        assert_eq!(game.blocks_remaining(), 22);
        assert_eq!(game.pool().live_count(), 24);
        assert!(game.collision().paddle().is_some());

        let paddle = game.paddle_center().unwrap();
        let ball = game.ball_center().unwrap();
        assert_eq!(paddle.x, 960.0);
        assert_eq!(ball.x, paddle.x);
        assert!(ball.y < paddle.y);
    }

    #[test]
    fn test_block_collidables_sit_at_tile_centers() {
        let mut game = Game::new(GameConfig::default(), test_resources()).unwrap();
        game.setup_scene();
        let centers: Vec<Vec2> = game
            .collision()
            .static_bodies()
            .iter()
            .map(|b| b.bounds.center)
            .collect();
        for (x, y) in game.map().occupied_tiles() {
            assert!(centers.contains(&game.map().tile_center(x, y)));
        }
    }

    #[test]
    fn test_reset_tears_down_before_setup() {
        let mut game = Game::new(GameConfig::default(), test_resources()).unwrap();
        game.setup_scene();
        game.score = 5;
        let slots = game.pool().slot_count();

        game.reset_scene();
        assert_eq!(game.score(), 0);
        assert_eq!(game.blocks_remaining(), 22);
        assert_eq!(game.pool().live_count(), 24);
        // Every slot came off the free list
        assert_eq!(game.pool().slot_count(), slots);
    }
}
