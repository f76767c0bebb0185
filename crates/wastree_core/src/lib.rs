//! wastree_core: Core utilities for the wastree WebAssembly text toolchain.
//!
//! Provides the name arena, the owning/borrowed name slice types compared
//! and hashed by the binding tables, and the allocation error type shared
//! by every construction path.

pub mod arena;
pub mod collections;
pub mod error;
pub mod name;

// Re-export commonly used types
pub use arena::NameArena;
pub use collections::TryGrow;
pub use error::AllocError;
pub use name::{fnv1a, Name, NameRef};
