//! Name slices.
//!
//! A name is a byte range naming a symbol. There are two handles over the
//! same bytes:
//!
//! - [`Name`] is held by the node that declares the symbol (a function's
//!   name, an export's name, a block label). It is neither `Copy` nor
//!   `Clone`, so each declaration has exactly one.
//! - [`NameRef`] is a `Copy` view stored by binding tables. It can also be
//!   null, which represents an absent name and never compares equal to
//!   anything, including another null.
//!
//! Both borrow the bytes for `'a`, which is the lifetime of the
//! [`NameArena`](crate::arena::NameArena) or source buffer that owns them.

use std::borrow::Cow;
use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over raw bytes.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hval = FNV_OFFSET_BASIS;
    for &b in bytes {
        hval ^= u32::from(b);
        hval = hval.wrapping_mul(FNV_PRIME);
    }
    hval
}

/// The declaration-site handle for a symbol name.
pub struct Name<'a> {
    bytes: &'a [u8],
}

impl<'a> Name<'a> {
    /// Wrap bytes owned elsewhere (an arena or the source text).
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// A borrowed view of this name for storing in a binding table.
    ///
    /// The view borrows the underlying bytes, not `self`, so it stays valid
    /// after the declaring node moves.
    #[inline]
    pub fn alias(&self) -> NameRef<'a> {
        NameRef {
            bytes: Some(self.bytes),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

impl fmt::Debug for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// A non-owning view of a name, possibly null.
///
/// Equality is byte-wise but requires both sides to be non-null, which is
/// why this type implements `PartialEq` and not `Eq`.
#[derive(Clone, Copy, Default)]
pub struct NameRef<'a> {
    bytes: Option<&'a [u8]>,
}

impl<'a> NameRef<'a> {
    /// The absent name.
    pub const NULL: NameRef<'static> = NameRef { bytes: None };

    /// View an optional declaration, mapping `None` to the null name.
    #[inline]
    pub fn of(name: Option<&Name<'a>>) -> Self {
        match name {
            Some(name) => name.alias(),
            None => NameRef { bytes: None },
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        self.bytes
    }

    /// FNV-1a of the name's bytes; the null name hashes like the empty one.
    #[inline]
    pub fn fnv_hash(&self) -> u32 {
        fnv1a(self.bytes.unwrap_or_default())
    }
}

impl<'b> PartialEq<NameRef<'b>> for NameRef<'_> {
    fn eq(&self, other: &NameRef<'b>) -> bool {
        match (self.bytes, other.bytes) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for NameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            Some(bytes) => write!(f, "NameRef({:?})", String::from_utf8_lossy(bytes)),
            None => f.write_str("NameRef(null)"),
        }
    }
}

impl fmt::Display for NameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            Some(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            None => Ok(()),
        }
    }
}
