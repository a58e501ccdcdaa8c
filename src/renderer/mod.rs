//! Deferred draw submission
//!
//! Components submit draw items during the tick; once per frame the list is
//! z-sorted and handed to a `Renderer`. The actual GPU backend lives in the host.

pub mod draw;
pub mod sprite;

pub use draw::{DrawItem, DrawList, DrawSource, RecordedDrawItems, Renderer};
pub use sprite::{Color, SpriteInstance};
