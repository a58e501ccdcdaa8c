//! Block grid layout
//!
//! A row-major occupancy grid anchored at a world-space origin. Non-zero
//! cells spawn a block at the cell's center.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::Rect;
use crate::config::LevelConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Top-left corner of cell (0, 0)
    pub origin: Vec2,
    pub tile_size: Vec2,
    width: usize,
    height: usize,
    tiles: Vec<u8>,
}

impl Map {
    /// Empty grid
    pub fn new(origin: Vec2, tile_size: Vec2, width: usize, height: usize) -> Self {
        Self {
            origin,
            tile_size,
            width,
            height,
            tiles: vec![0; width * height],
        }
    }

    /// Grid from a mask; `None` when the mask length is not `width * height`
    pub fn from_tiles(origin: Vec2, tile_size: Vec2, width: usize, height: usize, tiles: &[u8]) -> Option<Self> {
        let mut map = Self::new(origin, tile_size, width, height);
        map.load(tiles).then_some(map)
    }

    /// Random grid where each cell is filled with probability `density`.
    /// Never empty: a grid that rolls no blocks gets its center cell filled.
    pub fn generate(width: usize, height: usize, density: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let density = f64::from(density.clamp(0.0, 1.0));
        let mut map = Self::new(Vec2::ZERO, Vec2::ONE, width, height);
        for tile in &mut map.tiles {
            *tile = u8::from(rng.random_bool(density));
        }
        if map.occupied_count() == 0 && !map.tiles.is_empty() {
            let center = (height / 2) * width + width / 2;
            map.tiles[center] = 1;
        }
        log::debug!(
            "Generated {}x{} map from seed {}: {} blocks",
            width,
            height,
            seed,
            map.occupied_count()
        );
        map
    }

    /// Same grid, anchored elsewhere
    pub fn placed(mut self, origin: Vec2, tile_size: Vec2) -> Self {
        self.origin = origin;
        self.tile_size = tile_size;
        self
    }

    /// Layout named by a level config (generated when it carries a seed)
    pub fn from_level(level: &LevelConfig) -> Self {
        if let Some(seed) = level.seed {
            return Self::generate(level.width, level.height, level.density, seed)
                .placed(level.origin, level.tile_size);
        }
        let mut map = Self::new(level.origin, level.tile_size, level.width, level.height);
        if !map.load(&level.tiles) {
            log::warn!(
                "Level mask has {} tiles for a {}x{} grid; starting empty",
                level.tiles.len(),
                level.width,
                level.height
            );
        }
        map
    }

    /// Replace the occupancy mask. Rejects (and keeps the old mask) when the
    /// length is not `width * height`.
    pub fn load(&mut self, tiles: &[u8]) -> bool {
        if tiles.len() != self.width * self.height {
            return false;
        }
        self.tiles.copy_from_slice(tiles);
        true
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// World-space area covered by the grid
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(
            self.origin,
            self.tile_size * Vec2::new(self.width as f32, self.height as f32),
        )
    }

    pub fn is_tile_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.tiles[y * self.width + x] != 0
    }

    /// Whether the cell under a world position is occupied
    pub fn is_position_occupied(&self, position: Vec2) -> bool {
        let local = (position - self.origin) / self.tile_size;
        if local.x < 0.0 || local.y < 0.0 || !local.is_finite() {
            return false;
        }
        self.is_tile_occupied(local.x as usize, local.y as usize)
    }

    pub fn tile_center(&self, x: usize, y: usize) -> Vec2 {
        self.origin + (Vec2::new(x as f32, y as f32) + 0.5) * self.tile_size
    }

    pub fn tile_bounds(&self, x: usize, y: usize) -> Aabb {
        Aabb::new(self.tile_center(x, y), self.tile_size * 0.5)
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != 0).count()
    }

    /// Occupied cells in row-major order
    pub fn occupied_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| **t != 0)
            .map(move |(i, _)| (i % width, i / width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_map() -> Map {
        Map::from_level(&LevelConfig::default())
    }

    #[test]
    fn test_default_level_counts_non_zero_cells() {
        let map = default_map();
        assert_eq!(map.occupied_count(), 22);
        assert_eq!(map.occupied_tiles().count(), 22);
        assert!(map.is_tile_occupied(0, 0));
        assert!(!map.is_tile_occupied(1, 1));
        assert!(!map.is_tile_occupied(0, 2));
    }

    #[test]
    fn test_non_one_values_count_as_occupied() {
        let map = Map::from_tiles(Vec2::ZERO, Vec2::ONE, 2, 2, &[0, 7, 255, 0]).unwrap();
        assert_eq!(map.occupied_tiles().collect::<Vec<_>>(), vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn test_load_rejects_wrong_length() {
        let mut map = Map::from_tiles(Vec2::ZERO, Vec2::ONE, 2, 2, &[1, 1, 1, 1]).unwrap();
        assert!(!map.load(&[0, 0, 0]));
        assert_eq!(map.occupied_count(), 4);
        assert!(Map::from_tiles(Vec2::ZERO, Vec2::ONE, 3, 1, &[1]).is_none());
    }

    #[test]
    fn test_tile_geometry() {
        let map = Map::new(Vec2::new(96.0, 96.0), Vec2::new(192.0, 64.0), 9, 3);
        assert_eq!(map.tile_center(0, 0), Vec2::new(192.0, 128.0));
        assert_eq!(map.tile_center(8, 2), Vec2::new(96.0 + 8.5 * 192.0, 96.0 + 2.5 * 64.0));
        assert_eq!(map.bounds(), Rect::new(96.0, 96.0, 1728.0, 192.0));
        let tile = map.tile_bounds(1, 1);
        assert_eq!(tile.min(), Vec2::new(288.0, 160.0));
    }

    #[test]
    fn test_position_lookup() {
        let map = default_map();
        let center = map.tile_center(0, 0);
        assert!(map.is_position_occupied(center));
        assert!(!map.is_position_occupied(map.tile_center(1, 1)));
        assert!(!map.is_position_occupied(map.origin - Vec2::ONE));
        assert!(!map.is_position_occupied(map.bounds().position() + map.bounds().size() + Vec2::ONE));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = Map::generate(9, 3, 0.5, 1234);
        let b = Map::generate(9, 3, 0.5, 1234);
        assert_eq!(a.tiles(), b.tiles());
        assert!(a.occupied_count() > 0);
    }

    #[test]
    fn test_generate_density_extremes() {
        assert_eq!(Map::generate(9, 3, 1.0, 7).occupied_count(), 27);
        // Never empty
        let sparse = Map::generate(9, 3, 0.0, 7);
        assert_eq!(sparse.occupied_count(), 1);
        assert!(sparse.is_tile_occupied(4, 1));
    }
}
