//! Fixed-capacity memory for entities, components and per-frame scratch
//!
//! - `Arena`: byte bump allocator over a caller-provided buffer
//! - `Region`: typed bump storage with a byte budget
//!
//! Neither supports freeing individual allocations; memory is reclaimed in bulk
//! with `reset`. Exceeding capacity is a fatal error: capacities are chosen at
//! design time, not grown at runtime.

pub mod arena;
pub mod region;

pub use arena::Arena;
pub use region::Region;
