//! Arena storage for symbol names.
//!
//! The parser copies every identifier and quoted string it produces into a
//! bump arena. The arena is the single owner of those bytes: AST nodes hold
//! [`Name`] handles into it and binding tables hold [`NameRef`] views, so
//! tearing down either side never frees name data.
//!
//! [`NameRef`]: crate::name::NameRef

use crate::name::Name;
use bumpalo::Bump;

/// Bump arena that owns the bytes of every name in a script.
///
/// All names handed out by one arena share its lifetime. When the arena is
/// dropped, every name is freed at once (O(1) deallocation).
pub struct NameArena {
    bump: Bump,
}

impl NameArena {
    /// Create a new name arena with default capacity.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create a new name arena with the specified initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Copy `text` into the arena and return the declaring handle for it.
    #[inline]
    pub fn alloc_name(&self, text: &str) -> Name<'_> {
        Name::new(self.bump.alloc_str(text).as_bytes())
    }

    /// Copy raw bytes (e.g. a quoted string with escapes already decoded)
    /// into the arena.
    #[inline]
    pub fn alloc_bytes(&self, bytes: &[u8]) -> Name<'_> {
        Name::new(self.bump.alloc_slice_copy(bytes))
    }

    /// Returns the total bytes allocated in this arena.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Reset the arena, deallocating all names but keeping the memory.
    ///
    /// Requires unique access, so no name borrowed from the arena can
    /// still be alive.
    pub fn reset(&mut self) {
        self.bump.reset();
    }
}

impl Default for NameArena {
    fn default() -> Self {
        Self::new()
    }
}
