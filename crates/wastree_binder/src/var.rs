//! Variable references.

use crate::binding_hash::BindingHash;
use wastree_core::name::{Name, NameRef};

/// A reference to a symbol, written either as `$name` or as a raw index.
#[derive(Debug)]
pub enum Var<'a> {
    Index(u32),
    Name(Name<'a>),
}

impl<'a> Var<'a> {
    /// The referenced name, or null for index references.
    pub fn name(&self) -> NameRef<'a> {
        match self {
            Var::Name(name) => name.alias(),
            Var::Index(_) => NameRef::NULL,
        }
    }

    /// The explicit index, if this reference has one.
    pub fn index(&self) -> Option<u32> {
        match self {
            Var::Index(index) => Some(*index),
            Var::Name(_) => None,
        }
    }

    /// Resolve against `bindings`. Index references are returned verbatim;
    /// bounds are the caller's concern.
    #[inline]
    pub fn resolve_in(&self, bindings: &BindingHash<'_>) -> Option<u32> {
        bindings.resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_var_resolves_verbatim() {
        let empty = BindingHash::new();
        assert_eq!(Var::Index(42).resolve_in(&empty), Some(42));
    }

    #[test]
    fn test_name_var_resolves_through_table() {
        let decl = Name::new(b"$f");
        let mut bindings = BindingHash::new();
        bindings.insert(decl.alias()).unwrap().index = 3;

        let var = Var::Name(Name::new(b"$f"));
        assert_eq!(var.resolve_in(&bindings), Some(3));
        assert_eq!(Var::Name(Name::new(b"$g")).resolve_in(&bindings), None);
    }

    #[test]
    fn test_accessors() {
        assert!(Var::Index(1).name().is_null());
        assert_eq!(Var::Index(1).index(), Some(1));
        assert_eq!(Var::Name(Name::new(b"$a")).index(), None);
    }
}
