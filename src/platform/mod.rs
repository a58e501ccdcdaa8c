//! Platform abstraction layer
//!
//! The core only sees these interfaces; the host wires them to a real window:
//! - Key state queries (level and edge triggered)
//! - Monotonic wall clock

pub mod input;
pub mod time;

pub use input::{InputSource, Key, KeyState};
pub use time::{Clock, ManualClock, SystemClock};
