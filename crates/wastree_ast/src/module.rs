//! Module fields and the module symbol tables.
//!
//! A [`Module`] owns its fields in source order. The per-kind lists
//! (functions, imports, exports, function types) are field positions, and
//! the per-kind binding hashes hold views of the names the fields declare.
//! Both are kept in step by [`Module::push_field`].

use crate::expr::Expr;
use crate::types::ValueType;
use wastree_binder::{BindingHash, TypeBindings, Var};
use wastree_core::collections::index_of_len;
use wastree_core::error::AllocError;
use wastree_core::name::{Name, NameRef};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncSignature {
    pub result_type: Option<ValueType>,
    pub param_types: Vec<ValueType>,
}

/// A `(type $name (func ...))` declaration.
#[derive(Debug)]
pub struct FuncType<'a> {
    pub name: Option<Name<'a>>,
    pub sig: FuncSignature,
}

#[derive(Debug)]
pub struct Func<'a> {
    pub name: Option<Name<'a>>,
    /// Explicit `(type ...)` reference, if any.
    pub type_var: Option<Var<'a>>,
    pub result_type: Option<ValueType>,
    pub params: TypeBindings<'a>,
    pub locals: TypeBindings<'a>,
    /// Params followed by locals; locals are numbered after the params.
    pub params_and_locals: TypeBindings<'a>,
    pub exprs: Vec<Expr<'a>>,
}

impl<'a> Func<'a> {
    pub fn new(name: Option<Name<'a>>) -> Self {
        Self {
            name,
            type_var: None,
            result_type: None,
            params: TypeBindings::new(),
            locals: TypeBindings::new(),
            params_and_locals: TypeBindings::new(),
            exprs: Vec::new(),
        }
    }

    pub fn declare_param(&mut self, name: NameRef<'a>, ty: ValueType) -> Result<u32, AllocError> {
        self.params.declare(name, ty)
    }

    pub fn declare_local(&mut self, name: NameRef<'a>, ty: ValueType) -> Result<u32, AllocError> {
        self.locals.declare(name, ty)
    }

    /// Rebuild `params_and_locals` from the current params and locals.
    /// Call once all params and locals are declared.
    pub fn finish_locals(&mut self) -> Result<(), AllocError> {
        self.params_and_locals = TypeBindings::new();
        self.params_and_locals.extend(&self.params)?;
        self.params_and_locals.extend(&self.locals)
    }

    pub fn get_local_index_by_var(&self, var: &Var<'_>) -> Option<u32> {
        self.params_and_locals.resolve(var)
    }

    /// Type of a param or local, bounds-checked.
    pub fn local_type(&self, var: &Var<'_>) -> Option<ValueType> {
        self.params_and_locals.type_of(var)
    }

    /// The signature implied by this function's params and result.
    pub fn signature(&self) -> FuncSignature {
        FuncSignature {
            result_type: self.result_type,
            param_types: self.params.types.clone(),
        }
    }
}

/// How an import describes the imported function's type.
#[derive(Debug)]
pub enum ImportSignature<'a> {
    /// `(type $t)` reference to a declared function type.
    Type(Var<'a>),
    /// Inline `(param ...) (result ...)`.
    Inline(FuncSignature),
}

#[derive(Debug)]
pub struct Import<'a> {
    pub name: Option<Name<'a>>,
    pub module_name: Name<'a>,
    pub func_name: Name<'a>,
    pub sig: ImportSignature<'a>,
}

#[derive(Debug)]
pub struct Export<'a> {
    pub name: Name<'a>,
    pub var: Var<'a>,
}

/// Initial data for a range of linear memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub address: u32,
    pub data: Vec<u8>,
}

impl Segment {
    /// One past the last byte this segment writes.
    pub fn end(&self) -> u64 {
        u64::from(self.address) + self.data.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Memory {
    pub initial_pages: u32,
    pub max_pages: u32,
    pub segments: Vec<Segment>,
}

#[derive(Debug)]
pub enum ModuleField<'a> {
    Func(Func<'a>),
    Import(Import<'a>),
    Export(Export<'a>),
    Table(Vec<Var<'a>>),
    FuncType(FuncType<'a>),
    Memory(Memory),
    Global(TypeBindings<'a>),
    Start(Var<'a>),
}

impl ModuleField<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ModuleField::Func(_) => "func",
            ModuleField::Import(_) => "import",
            ModuleField::Export(_) => "export",
            ModuleField::Table(_) => "table",
            ModuleField::FuncType(_) => "type",
            ModuleField::Memory(_) => "memory",
            ModuleField::Global(_) => "global",
            ModuleField::Start(_) => "start",
        }
    }
}

#[derive(Debug, Default)]
pub struct Module<'a> {
    fields: Vec<ModuleField<'a>>,
    funcs: Vec<usize>,
    imports: Vec<usize>,
    exports: Vec<usize>,
    func_types: Vec<usize>,
    func_bindings: BindingHash<'a>,
    import_bindings: BindingHash<'a>,
    export_bindings: BindingHash<'a>,
    func_type_bindings: BindingHash<'a>,
    /// All global fields merged in declaration order.
    globals: TypeBindings<'a>,
}

impl<'a> Module<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field and register whatever it declares.
    ///
    /// Named functions, imports, exports and function types are bound to
    /// their position among fields of the same kind; globals are merged
    /// into [`globals`](Self::globals). On failure the field is not added
    /// and every per-kind list still points at existing fields.
    pub fn push_field(&mut self, field: ModuleField<'a>) -> Result<(), AllocError> {
        let position = self.fields.len();
        self.fields
            .try_reserve(1)
            .map_err(|source| AllocError::reserve(1, source))?;

        match &field {
            ModuleField::Func(func) => {
                register(&mut self.funcs, &mut self.func_bindings, func.name.as_ref(), position)?
            }
            ModuleField::Import(import) => register(
                &mut self.imports,
                &mut self.import_bindings,
                import.name.as_ref(),
                position,
            )?,
            ModuleField::Export(export) => register(
                &mut self.exports,
                &mut self.export_bindings,
                Some(&export.name),
                position,
            )?,
            ModuleField::FuncType(func_type) => register(
                &mut self.func_types,
                &mut self.func_type_bindings,
                func_type.name.as_ref(),
                position,
            )?,
            ModuleField::Global(globals) => self.globals.extend(globals)?,
            ModuleField::Table(_) | ModuleField::Memory(_) | ModuleField::Start(_) => {}
        }

        tracing::debug!(
            target: "wastree::module",
            kind = field.kind_name(),
            position,
            "registered module field"
        );
        self.fields.push(field);
        Ok(())
    }

    pub fn fields(&self) -> &[ModuleField<'a>] {
        &self.fields
    }

    pub fn func_bindings(&self) -> &BindingHash<'a> {
        &self.func_bindings
    }

    pub fn import_bindings(&self) -> &BindingHash<'a> {
        &self.import_bindings
    }

    pub fn export_bindings(&self) -> &BindingHash<'a> {
        &self.export_bindings
    }

    pub fn func_type_bindings(&self) -> &BindingHash<'a> {
        &self.func_type_bindings
    }

    pub fn globals(&self) -> &TypeBindings<'a> {
        &self.globals
    }

    pub fn func_count(&self) -> usize {
        self.funcs.len()
    }

    pub fn import_count(&self) -> usize {
        self.imports.len()
    }

    pub fn export_count(&self) -> usize {
        self.exports.len()
    }

    pub fn func_type_count(&self) -> usize {
        self.func_types.len()
    }

    pub fn func(&self, index: u32) -> Option<&Func<'a>> {
        let position = *self.funcs.get(index as usize)?;
        match &self.fields[position] {
            ModuleField::Func(func) => Some(func),
            _ => unreachable!("func list points at a non-func field"),
        }
    }

    pub fn import(&self, index: u32) -> Option<&Import<'a>> {
        let position = *self.imports.get(index as usize)?;
        match &self.fields[position] {
            ModuleField::Import(import) => Some(import),
            _ => unreachable!("import list points at a non-import field"),
        }
    }

    pub fn export(&self, index: u32) -> Option<&Export<'a>> {
        let position = *self.exports.get(index as usize)?;
        match &self.fields[position] {
            ModuleField::Export(export) => Some(export),
            _ => unreachable!("export list points at a non-export field"),
        }
    }

    pub fn func_type(&self, index: u32) -> Option<&FuncType<'a>> {
        let position = *self.func_types.get(index as usize)?;
        match &self.fields[position] {
            ModuleField::FuncType(func_type) => Some(func_type),
            _ => unreachable!("type list points at a non-type field"),
        }
    }

    pub fn funcs(&self) -> impl Iterator<Item = &Func<'a>> {
        self.fields.iter().filter_map(|field| match field {
            ModuleField::Func(func) => Some(func),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import<'a>> {
        self.fields.iter().filter_map(|field| match field {
            ModuleField::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn exports(&self) -> impl Iterator<Item = &Export<'a>> {
        self.fields.iter().filter_map(|field| match field {
            ModuleField::Export(export) => Some(export),
            _ => None,
        })
    }

    /// The first memory field, if any.
    pub fn memory(&self) -> Option<&Memory> {
        self.fields.iter().find_map(|field| match field {
            ModuleField::Memory(memory) => Some(memory),
            _ => None,
        })
    }

    /// The first table field, if any.
    pub fn table(&self) -> Option<&[Var<'a>]> {
        self.fields.iter().find_map(|field| match field {
            ModuleField::Table(table) => Some(table.as_slice()),
            _ => None,
        })
    }

    /// The first start field, if any.
    pub fn start(&self) -> Option<&Var<'a>> {
        self.fields.iter().find_map(|field| match field {
            ModuleField::Start(var) => Some(var),
            _ => None,
        })
    }

    pub fn get_export_by_name(&self, name: NameRef<'_>) -> Option<&Export<'a>> {
        let index = self.export_bindings.find_index(name)?;
        self.export(index)
    }

    /// Whether any export refers to `func`, by name or by index.
    pub fn func_is_exported(&self, func: &Func<'_>) -> bool {
        let func_name = NameRef::of(func.name.as_ref());
        self.exports().any(|export| match &export.var {
            Var::Name(name) => name.alias() == func_name,
            Var::Index(index) => self
                .func(*index)
                .is_some_and(|exported| std::ptr::eq(exported, func)),
        })
    }

    pub fn get_func_index_by_var(&self, var: &Var<'_>) -> Option<u32> {
        self.func_bindings.resolve(var)
    }

    pub fn get_func_type_index_by_var(&self, var: &Var<'_>) -> Option<u32> {
        self.func_type_bindings.resolve(var)
    }

    pub fn get_global_index_by_var(&self, var: &Var<'_>) -> Option<u32> {
        self.globals.resolve(var)
    }

    pub fn get_import_index_by_var(&self, var: &Var<'_>) -> Option<u32> {
        self.import_bindings.resolve(var)
    }

    pub fn get_func_by_var(&self, var: &Var<'_>) -> Option<&Func<'a>> {
        self.func(self.get_func_index_by_var(var)?)
    }

    pub fn get_func_type_by_var(&self, var: &Var<'_>) -> Option<&FuncType<'a>> {
        self.func_type(self.get_func_type_index_by_var(var)?)
    }

    pub fn get_import_by_var(&self, var: &Var<'_>) -> Option<&Import<'a>> {
        self.import(self.get_import_index_by_var(var)?)
    }
}

/// Where [`register`] binds field names.
trait NameTable<'a> {
    fn bind(&mut self, name: NameRef<'a>, index: u32) -> Result<(), AllocError>;
}

impl<'a> NameTable<'a> for BindingHash<'a> {
    fn bind(&mut self, name: NameRef<'a>, index: u32) -> Result<(), AllocError> {
        self.insert(name)?.index = index;
        Ok(())
    }
}

/// Record a field at `position` in a per-kind list and bind its name to
/// its index in that list.
///
/// The list only grows once the name is bound, so a failed bind leaves no
/// position behind for a field that never gets pushed.
fn register<'a, T: NameTable<'a>>(
    list: &mut Vec<usize>,
    table: &mut T,
    name: Option<&Name<'a>>,
    position: usize,
) -> Result<(), AllocError> {
    let index = index_of_len(list.len())?;
    list
        .try_reserve(1)
        .map_err(|source| AllocError::reserve(1, source))?;
    if let Some(name) = name {
        table.bind(name.alias(), index)?;
    }
    list.push(position);
    Ok(())
}
