//! Named asset handles
//!
//! Assets are loaded by the host; this table only records their descriptors
//! and maps names to stable handles. A handle packs the asset type in its top
//! 8 bits and the table index in the low 24.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Rect;

/// Maximum assets of each type
pub const MAX_RESOURCES: usize = 32;

/// Well-known texture and font names
pub mod names {
    pub const PADDLE: &str = "paddle";
    pub const BALL: &str = "ball";
    pub const BLOCK: &str = "block";
    pub const FONT: &str = "font";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResType {
    Invalid = 0,
    Sound = 1,
    Font = 2,
    Texture = 3,
}

impl ResType {
    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => ResType::Sound,
            2 => ResType::Font,
            3 => ResType::Texture,
            _ => ResType::Invalid,
        }
    }
}

/// Packed (type, index) asset handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResHandle(u32);

impl ResHandle {
    pub const INVALID: ResHandle = ResHandle(0);

    pub fn new(index: u32, kind: ResType) -> Self {
        Self(((kind as u32) << 24) | (index & 0x00ff_ffff))
    }

    #[inline]
    pub fn kind(self) -> ResType {
        ResType::from_bits((self.0 >> 24) & 0xff)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0 & 0x00ff_ffff
    }
}

/// Loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    /// Backend texture id
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// The whole texture as a source rectangle
    pub fn source_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

/// Loaded font
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub id: u32,
    /// Size the glyph atlas was baked at
    pub base_size: u32,
}

/// Loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub id: u32,
    pub frame_count: u32,
}

/// Asset tables plus the name index
#[derive(Debug, Clone, Default)]
pub struct Resources {
    textures: Vec<Texture>,
    fonts: Vec<Font>,
    sounds: Vec<Sound>,
    handles: HashMap<String, ResHandle>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_texture(&mut self, name: &str, texture: Texture) -> ResHandle {
        let index = push_bounded(&mut self.textures, texture, "texture");
        self.register(name, ResHandle::new(index, ResType::Texture))
    }

    pub fn add_font(&mut self, name: &str, font: Font) -> ResHandle {
        let index = push_bounded(&mut self.fonts, font, "font");
        self.register(name, ResHandle::new(index, ResType::Font))
    }

    pub fn add_sound(&mut self, name: &str, sound: Sound) -> ResHandle {
        let index = push_bounded(&mut self.sounds, sound, "sound");
        self.register(name, ResHandle::new(index, ResType::Sound))
    }

    fn register(&mut self, name: &str, handle: ResHandle) -> ResHandle {
        if self.handles.insert(name.to_string(), handle).is_some() {
            log::warn!("Resource '{}' re-registered", name);
        }
        handle
    }

    pub fn handle(&self, name: &str) -> Option<ResHandle> {
        self.handles.get(name).copied()
    }

    /// Table index for a handle.
    ///
    /// # Panics
    ///
    /// Panics on the invalid handle or an index outside the table range.
    pub fn acquire(&self, handle: ResHandle) -> usize {
        assert!(handle != ResHandle::INVALID, "acquire of invalid resource handle");
        assert!(handle.kind() != ResType::Invalid, "resource handle has no type");
        let index = handle.index() as usize;
        assert!(index < MAX_RESOURCES, "resource index {} out of range", index);
        index
    }

    /// Table index for a name, if registered
    pub fn acquire_by_name(&self, name: &str) -> Option<usize> {
        self.handle(name).map(|h| self.acquire(h))
    }

    /// Table index for a name registered as a texture
    pub fn texture_index(&self, name: &str) -> Option<usize> {
        self.typed_index(name, ResType::Texture)
    }

    /// Table index for a name registered as a font
    pub fn font_index(&self, name: &str) -> Option<usize> {
        self.typed_index(name, ResType::Font)
    }

    /// Table index for a name registered as a sound
    pub fn sound_index(&self, name: &str) -> Option<usize> {
        self.typed_index(name, ResType::Sound)
    }

    fn typed_index(&self, name: &str, kind: ResType) -> Option<usize> {
        self.handle(name)
            .filter(|h| h.kind() == kind)
            .map(|h| self.acquire(h))
    }

    pub fn texture(&self, index: usize) -> Option<&Texture> {
        self.textures.get(index)
    }

    pub fn font(&self, index: usize) -> Option<&Font> {
        self.fonts.get(index)
    }

    pub fn sound(&self, index: usize) -> Option<&Sound> {
        self.sounds.get(index)
    }
}

fn push_bounded<T>(table: &mut Vec<T>, value: T, what: &str) -> u32 {
    assert!(
        table.len() < MAX_RESOURCES,
        "{} table full ({} entries)",
        what,
        MAX_RESOURCES
    );
    table.push(value);
    (table.len() - 1) as u32
}
