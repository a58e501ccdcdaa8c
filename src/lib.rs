//! Brickbreak - entity runtime and collision core for a Breakout-style arcade game
//!
//! Core modules:
//! - `memory`: Bump arena and typed regions backing entity/component storage
//! - `entity`: Entity pool with free-list recycling and the component model
//! - `sim`: Gameplay (components, collisions, tile map, state machine)
//! - `renderer`: Deferred z-ordered draw submission
//! - `platform`: Input and wall-clock collaborators
//! - `resources`: Named asset handles
//! - `config`: Data-driven game configuration

pub mod config;
pub mod entity;
pub mod memory;
pub mod platform;
pub mod renderer;
pub mod resources;
pub mod sim;
pub mod ui;

pub use config::{ConfigError, GameConfig};
pub use sim::{Game, GamePhase, tick};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TARGET_FPS: u32 = 90;
    /// Fixed simulation timestep
    pub const TIME_STEP: f32 = 1.0 / TARGET_FPS as f32;

    /// Virtual screen dimensions (render target size)
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 128.0;
    pub const PADDLE_HEIGHT: f32 = 32.0;
    pub const PADDLE_SPEED: f32 = 600.0;
    /// Speed multiplier while the boost key is held
    pub const PADDLE_BOOST: f32 = 1.75;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_INITIAL_VELOCITY: (f32, f32) = (100.0, -660.0);
    /// Sideways spin imparted by off-center paddle hits
    pub const BOUNCE_INTENSITY: f32 = 2.0;

    /// Block grid defaults
    pub const TILE_WIDTH: f32 = 192.0;
    pub const TILE_HEIGHT: f32 = 64.0;
    pub const GRID_WIDTH: usize = 9;
    pub const GRID_HEIGHT: usize = 3;

    /// Real-time delays around the win/lose banner (seconds)
    pub const SETTLE_DELAY: f64 = 1.0;
    pub const DISPLAY_DELAY: f64 = 2.5;

    /// Z layers
    pub const Z_BLOCK: i32 = 0;
    pub const Z_PADDLE: i32 = 10;
    pub const Z_BALL: i32 = 20;
    pub const Z_HUD: i32 = 100;
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from a top-left position and a size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}
