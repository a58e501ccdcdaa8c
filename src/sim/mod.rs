//! Gameplay
//!
//! Components (paddle, ball, blocks), the collision engine, the block grid
//! and the phase machine that drives them:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Entities tick in live-list order, then collisions resolve

pub mod ball;
pub mod block;
pub mod collision;
pub mod map;
pub mod player;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState};
pub use block::Block;
pub use collision::{
    Aabb, Circle, CollisionReport, CollisionWorld, Contact, Face, Manifold, aabb_vs_circle,
    classify_face, paddle_bounce,
};
pub use map::Map;
pub use player::Player;
pub use state::{FrameSignals, Game, GamePhase};
pub use tick::{render, tick};

#[cfg(test)]
pub(crate) use test_support::{TestBench, test_resources};
