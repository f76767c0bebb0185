//! wastree_binder: Name-to-index binding tables and scope merging.
//!
//! Every module scope (functions, imports, exports, function types, globals)
//! and every function's params and locals maps textual names to positional
//! indices through a [`BindingHash`]. A [`Var`] names a symbol either way and
//! resolves against one of those tables.

mod binding_hash;
mod type_bindings;
mod var;

pub use binding_hash::{Binding, BindingHash, INITIAL_CAPACITY};
pub use type_bindings::{TypeBindings, ValueType};
pub use var::Var;
