//! Entities, their pool and the component model
//!
//! Entities are recyclable identities stored in fixed pool slots. Each owns a
//! private region holding its components in attachment order.

pub mod component;
pub mod pool;

pub use component::{Component, ComponentKind, ComponentType, TickContext};
pub use pool::{Entity, EntityId, EntityPool, PoolConfig};
