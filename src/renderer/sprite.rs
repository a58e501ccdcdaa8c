//! GPU-ready sprite instance data

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::draw::DrawItem;
use super::draw::DrawSource;

/// RGBA8 color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const GOLD: Color = Color::rgba(255, 203, 0, 255);
    pub const RED: Color = Color::rgba(230, 41, 55, 255);
    pub const LIGHT_GRAY: Color = Color::rgba(200, 200, 200, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized [0, 1] components
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One textured quad, laid out for direct upload as instance data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Destination top-left
    pub position: [f32; 2],
    /// Destination size
    pub size: [f32; 2],
    /// Source rectangle in texels (x, y, w, h)
    pub src: [f32; 4],
    pub color: Color,
    /// Index into the texture table
    pub texture: u32,
    pub z_index: i32,
}

impl SpriteInstance {
    /// Pack a texture draw item. Text items have no sprite form.
    pub fn from_item(item: &DrawItem) -> Option<Self> {
        match &item.source {
            DrawSource::Texture { texture, src } => Some(Self {
                position: item.position.to_array(),
                size: item.size.to_array(),
                src: [src.x, src.y, src.width, src.height],
                color: item.color,
                texture: *texture as u32,
                z_index: item.z_index,
            }),
            DrawSource::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 44);
        assert_eq!(std::mem::size_of::<Color>(), 4);
    }

    #[test]
    fn test_color_to_array() {
        assert_eq!(Color::WHITE.to_array(), [1.0; 4]);
        assert_eq!(Color::BLACK.to_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
