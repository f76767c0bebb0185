//! Typed scopes: a type sequence paired with a binding hash over its names.
//!
//! Function params, function locals, the merged params-and-locals scope and
//! module globals are all `TypeBindings`. Binding `i` refers to `types[i]`.

use crate::binding_hash::BindingHash;
use crate::var::Var;
use std::fmt;
use wastree_core::collections::{index_of_len, TryGrow};
use wastree_core::error::AllocError;
use wastree_core::name::NameRef;

/// A WebAssembly value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    I32,
    I64,
    F32,
    F64,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
        }
    }

    /// Width in bytes; zero for `void`.
    pub fn byte_size(self) -> u32 {
        match self {
            ValueType::Void => 0,
            ValueType::I32 | ValueType::F32 => 4,
            ValueType::I64 | ValueType::F64 => 8,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scope of typed, optionally named slots.
#[derive(Debug, Default)]
pub struct TypeBindings<'a> {
    pub types: Vec<ValueType>,
    pub bindings: BindingHash<'a>,
}

impl<'a> TypeBindings<'a> {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            bindings: BindingHash::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Append an unnamed slot and return its index.
    pub fn push(&mut self, ty: ValueType) -> Result<u32, AllocError> {
        let index = index_of_len(self.types.len())?;
        self.types.try_push(ty)?;
        Ok(index)
    }

    /// Append a slot and bind `name` to it. A null name declares an
    /// unnamed slot.
    pub fn declare(&mut self, name: NameRef<'a>, ty: ValueType) -> Result<u32, AllocError> {
        let index = self.push(ty)?;
        if !name.is_null() {
            self.bindings.insert(name)?.index = index;
        }
        Ok(index)
    }

    pub fn find_index(&self, name: NameRef<'_>) -> Option<u32> {
        self.bindings.find_index(name)
    }

    pub fn resolve(&self, var: &Var<'_>) -> Option<u32> {
        self.bindings.resolve(var)
    }

    /// Type of the slot `var` refers to, bounds-checked.
    pub fn type_of(&self, var: &Var<'_>) -> Option<ValueType> {
        let index = self.resolve(var)?;
        self.types.get(index as usize).copied()
    }

    /// Append all of `src`'s slots after this scope's, carrying its name
    /// views over with indices shifted past the existing slots.
    ///
    /// On allocation failure the merge stops where it is; `self` stays
    /// usable but may be missing some of `src`'s bindings.
    pub fn extend(&mut self, src: &TypeBindings<'a>) -> Result<(), AllocError> {
        let last_type = index_of_len(self.types.len())?;
        index_of_len(self.types.len() + src.types.len())?;
        self.types.try_extend_from_slice(&src.types)?;

        for binding in src.bindings.iter() {
            self.bindings.insert(binding.name())?.index = binding.index + last_type;
        }

        tracing::trace!(
            target: "wastree::type_bindings",
            appended = src.types.len(),
            rebound = src.bindings.len(),
            total = self.types.len(),
            "extended type bindings"
        );
        Ok(())
    }
}
