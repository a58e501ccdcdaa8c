//! Game configuration
//!
//! Loaded once at startup from JSON. Every field has a default, so a config
//! file only needs to name what it overrides.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::entity::PoolConfig;
use crate::renderer::SpriteInstance;

/// Configuration load failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Playfield limits in world units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: SCREEN_WIDTH,
            max_y: SCREEN_HEIGHT,
        }
    }
}

impl WorldBounds {
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Whether a horizontal span `[x, x + width]` lies inside the bounds
    #[inline]
    pub fn contains_span_x(&self, x: f32, width: f32) -> bool {
        x >= self.min_x && x + width <= self.max_x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    pub size: Vec2,
    /// Horizontal speed (units/s)
    pub speed: f32,
    /// Speed multiplier while boost is held
    pub boost_multiplier: f32,
    /// Gap between the paddle's bottom edge and the bottom bound
    pub bottom_margin: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            speed: PADDLE_SPEED,
            boost_multiplier: PADDLE_BOOST,
            bottom_margin: 48.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// Velocity given on launch
    pub initial_velocity: Vec2,
    /// Horizontal offset from the paddle center while attached
    pub attach_offset: f32,
    /// Sideways spin scale for off-center paddle hits
    pub bounce_intensity: f32,
    /// Reflect horizontal velocity on side-face block hits instead of
    /// cancelling it
    pub reflect_side_hits: bool,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            initial_velocity: Vec2::new(BALL_INITIAL_VELOCITY.0, BALL_INITIAL_VELOCITY.1),
            attach_offset: 0.0,
            bounce_intensity: BOUNCE_INTENSITY,
            reflect_side_hits: false,
        }
    }
}

/// Block grid layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Top-left corner of the grid
    pub origin: Vec2,
    pub tile_size: Vec2,
    pub width: usize,
    pub height: usize,
    /// Row-major occupancy mask; non-zero cells spawn a block
    pub tiles: Vec<u8>,
    /// When set, `tiles` is ignored and a grid is generated from this seed
    pub seed: Option<u64>,
    /// Fill probability for generated grids
    pub density: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        let grid_width = GRID_WIDTH as f32 * TILE_WIDTH;
        Self {
            origin: Vec2::new((SCREEN_WIDTH - grid_width) * 0.5, 96.0),
            tile_size: Vec2::new(TILE_WIDTH, TILE_HEIGHT),
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            tiles: vec![
                1, 1, 1, 1, 1, 1, 1, 1, 1,
                1, 0, 1, 1, 0, 1, 1, 0, 1,
                0, 1, 1, 1, 1, 1, 1, 1, 0,
            ],
            seed: None,
            density: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds between the deciding event and the win/lose banner
    pub settle_delay: f64,
    /// Seconds the banner stays up before the scene resets
    pub display_delay: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay: SETTLE_DELAY,
            display_delay: DISPLAY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub max_entities: usize,
    pub components_per_entity: usize,
    /// Per-frame scratch for packed sprite instances
    pub draw_scratch_bytes: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_entities: 256,
            components_per_entity: 4,
            draw_scratch_bytes: 64 * 1024,
        }
    }
}

impl CapacityConfig {
    pub fn pool(&self) -> PoolConfig {
        PoolConfig::for_counts(self.max_entities, self.components_per_entity)
    }

    /// Scratch a frame needs when every entity draws one sprite, including
    /// worst-case alignment padding
    pub fn sprite_scratch_bytes(&self) -> Option<usize> {
        self.max_entities
            .checked_mul(size_of::<SpriteInstance>())?
            .checked_add(align_of::<SpriteInstance>())
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldBounds,
    pub paddle: PaddleConfig,
    pub ball: BallConfig,
    pub level: LevelConfig,
    pub timing: TimingConfig,
    pub capacity: CapacityConfig,
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.world.width() <= 0.0 || self.world.height() <= 0.0 {
            return invalid(format!("empty world bounds {:?}", self.world));
        }
        if self.paddle.size.x <= 0.0 || self.paddle.size.x > self.world.width() {
            return invalid(format!(
                "paddle width {} does not fit world width {}",
                self.paddle.size.x,
                self.world.width()
            ));
        }
        if self.ball.radius <= 0.0 {
            return invalid(format!("ball radius must be positive, got {}", self.ball.radius));
        }
        let level = &self.level;
        let Some(cells) = level.width.checked_mul(level.height) else {
            return invalid(format!("level {}x{} is too large", level.width, level.height));
        };
        if level.seed.is_none() && level.tiles.len() != cells {
            return invalid(format!(
                "level has {} tiles, expected {}x{}",
                level.tiles.len(),
                level.width,
                level.height
            ));
        }
        if !(0.0..=1.0).contains(&level.density) {
            return invalid(format!("level density {} outside [0, 1]", level.density));
        }
        // Paddle + ball + one entity per cell
        let needed = cells.saturating_add(2);
        if self.capacity.max_entities < needed {
            return invalid(format!(
                "max_entities {} cannot hold a {}x{} level ({} needed)",
                self.capacity.max_entities, level.width, level.height, needed
            ));
        }
        match self.capacity.sprite_scratch_bytes() {
            Some(bytes) if self.capacity.draw_scratch_bytes >= bytes => {}
            _ => {
                return invalid(format!(
                    "draw_scratch_bytes {} cannot hold a sprite for each of {} entities",
                    self.capacity.draw_scratch_bytes, self.capacity.max_entities
                ));
            }
        }
        if self.capacity.components_per_entity == 0 {
            return invalid("components_per_entity must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.level.tiles.len(), GRID_WIDTH * GRID_HEIGHT);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "ball": { "radius": 20.0 } }"#).unwrap();
        assert_eq!(config.ball.radius, 20.0);
        assert_eq!(config.ball.initial_velocity, Vec2::new(100.0, -660.0));
        assert_eq!(config.paddle, PaddleConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = GameConfig::default();
        config.timing.settle_delay = 0.25;
        config.level.seed = Some(42);
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_tile_count_mismatch_rejected() {
        let err = GameConfig::from_json(r#"{ "level": { "width": 2, "height": 2, "tiles": [1, 1, 1] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_capacity_must_hold_level() {
        let mut config = GameConfig::default();
        config.capacity.max_entities = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scratch_must_hold_a_sprite_per_entity() {
        let mut config = GameConfig::default();
        config.level.width = 40;
        config.level.height = 40;
        config.level.tiles = vec![1; 40 * 40];
        config.capacity.max_entities = 2000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.capacity.draw_scratch_bytes = config.capacity.sprite_scratch_bytes().unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_level_dimensions_rejected() {
        let mut config = GameConfig::default();
        config.level.width = usize::MAX;
        config.level.height = 2;
        config.level.seed = Some(1);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
