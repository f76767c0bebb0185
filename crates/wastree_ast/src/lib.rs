//! wastree_ast: Abstract Syntax Tree for the WebAssembly text format.
//!
//! Expressions, module fields, modules and script commands. Each node owns
//! its children; the only shared edges are name views held by binding
//! tables, which borrow from the name arena and own nothing. Dropping any
//! aggregate therefore tears down exactly the nodes it owns.

pub mod command;
pub mod expr;
pub mod module;
pub mod types;

// Re-export key types
pub use command::{Command, Invoke, Script};
pub use expr::{Case, Expr, ExprKind, TableSwitch, Target, TargetKind};
pub use module::{
    Export, Func, FuncSignature, FuncType, Import, ImportSignature, Memory, Module, ModuleField,
    Segment,
};
pub use types::*;
pub use wastree_binder::{BindingHash, TypeBindings, Var};
