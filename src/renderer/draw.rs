//! Z-ordered draw list with record/replay

use glam::Vec2;

use super::sprite::{Color, SpriteInstance};
use crate::Rect;
use crate::memory::Arena;

/// What a draw item samples from
#[derive(Debug, Clone, PartialEq)]
pub enum DrawSource {
    /// Region of a texture
    Texture { texture: usize, src: Rect },
    /// A run of text in a font
    Text {
        font: usize,
        text: String,
        spacing: f32,
    },
}

/// One deferred render submission
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub source: DrawSource,
    /// Top-left corner
    pub position: Vec2,
    /// Destination size; for text, `size.x` is the font size
    pub size: Vec2,
    pub color: Color,
    pub z_index: i32,
}

/// Snapshot of a draw list, replayable on later frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedDrawItems {
    pub sprites: Vec<DrawItem>,
    pub texts: Vec<DrawItem>,
}

impl RecordedDrawItems {
    pub fn len(&self) -> usize {
        self.sprites.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.texts.clear();
    }
}

/// Backend that turns dispatched items into pixels
pub trait Renderer {
    /// Sprites in ascending z order
    fn draw_sprites(&mut self, sprites: &[SpriteInstance]);
    /// Text items, drawn after all sprites in submission order
    fn draw_text(&mut self, item: &DrawItem);
}

/// Per-frame list of draw items
#[derive(Debug)]
pub struct DrawList {
    sprites: Vec<DrawItem>,
    texts: Vec<DrawItem>,
    /// Packed sprite instances for the current dispatch
    scratch: Arena,
}

impl DrawList {
    pub fn new(scratch_bytes: usize) -> Self {
        Self {
            sprites: Vec::new(),
            texts: Vec::new(),
            scratch: Arena::with_capacity(scratch_bytes),
        }
    }

    pub fn add(&mut self, item: DrawItem) {
        match item.source {
            DrawSource::Texture { .. } => self.sprites.push(item),
            DrawSource::Text { .. } => self.texts.push(item),
        }
    }

    /// Queue a textured quad
    pub fn submit(
        &mut self,
        position: Vec2,
        size: Vec2,
        texture: usize,
        src: Rect,
        z_index: i32,
        color: Color,
    ) {
        self.add(DrawItem {
            source: DrawSource::Texture { texture, src },
            position,
            size,
            color,
            z_index,
        });
    }

    /// Queue a run of text
    #[allow(clippy::too_many_arguments)]
    pub fn submit_text(
        &mut self,
        position: Vec2,
        font: usize,
        text: impl Into<String>,
        font_size: f32,
        spacing: f32,
        z_index: i32,
        color: Color,
    ) {
        self.add(DrawItem {
            source: DrawSource::Text {
                font,
                text: text.into(),
                spacing,
            },
            position,
            size: Vec2::new(font_size, font_size),
            color,
            z_index,
        });
    }

    /// Sort sprites by z (stable, so equal z keeps submission order) and
    /// issue everything to the renderer. The list itself is kept; call
    /// `flush` to clear it.
    ///
    /// # Panics
    ///
    /// Panics if the packed sprites exceed the scratch budget.
    pub fn dispatch(&mut self, renderer: &mut dyn Renderer) {
        self.sprites.sort_by_key(|item| item.z_index);

        let instances = self
            .scratch
            .allocate_slice::<SpriteInstance>(self.sprites.len());
        let mut packed = 0;
        for item in &self.sprites {
            if let Some(instance) = SpriteInstance::from_item(item) {
                instances[packed] = instance;
                packed += 1;
            }
        }
        renderer.draw_sprites(&instances[..packed]);

        for item in &self.texts {
            renderer.draw_text(item);
        }
        self.scratch.reset();
    }

    pub fn flush(&mut self) {
        self.sprites.clear();
        self.texts.clear();
    }

    /// Copy the current items out
    pub fn record(&self) -> RecordedDrawItems {
        RecordedDrawItems {
            sprites: self.sprites.clone(),
            texts: self.texts.clone(),
        }
    }

    /// Append a recording's items after whatever is already queued
    pub fn replay(&mut self, record: &RecordedDrawItems) {
        self.sprites.extend_from_slice(&record.sprites);
        self.texts.extend_from_slice(&record.texts);
    }

    pub fn sprites(&self) -> &[DrawItem] {
        &self.sprites
    }

    pub fn texts(&self) -> &[DrawItem] {
        &self.texts
    }

    /// Sprites then texts, each in list order
    pub fn items(&self) -> impl Iterator<Item = &DrawItem> {
        self.sprites.iter().chain(self.texts.iter())
    }

    pub fn len(&self) -> usize {
        self.sprites.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
