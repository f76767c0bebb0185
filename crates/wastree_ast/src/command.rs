//! Script commands: module definitions, invocations and assertions.

use crate::module::{Export, Module};
use crate::types::Const;
use wastree_core::collections::TryGrow;
use wastree_core::error::AllocError;
use wastree_core::name::Name;

/// A call of an exported function with constant arguments.
#[derive(Debug)]
pub struct Invoke<'a> {
    /// Export name of the callee in the most recent module.
    pub name: Name<'a>,
    pub args: Vec<Const>,
}

#[derive(Debug)]
pub enum Command<'a> {
    Module(Module<'a>),
    Invoke(Invoke<'a>),
    AssertInvalid {
        module: Module<'a>,
        /// Expected validation failure message.
        text: Name<'a>,
    },
    AssertReturn {
        invoke: Invoke<'a>,
        /// `None` for a call expected to return nothing.
        expected: Option<Const>,
    },
    AssertReturnNan {
        invoke: Invoke<'a>,
    },
    AssertTrap {
        invoke: Invoke<'a>,
        /// Expected trap message.
        text: Name<'a>,
    },
}

impl<'a> Command<'a> {
    /// The invocation this command performs, if any.
    pub fn invoke(&self) -> Option<&Invoke<'a>> {
        match self {
            Command::Invoke(invoke)
            | Command::AssertReturn { invoke, .. }
            | Command::AssertReturnNan { invoke }
            | Command::AssertTrap { invoke, .. } => Some(invoke),
            Command::Module(_) | Command::AssertInvalid { .. } => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Command::Module(_) => "module",
            Command::Invoke(_) => "invoke",
            Command::AssertInvalid { .. } => "assert_invalid",
            Command::AssertReturn { .. } => "assert_return",
            Command::AssertReturnNan { .. } => "assert_return_nan",
            Command::AssertTrap { .. } => "assert_trap",
        }
    }
}

/// A top-level sequence of commands.
#[derive(Debug, Default)]
pub struct Script<'a> {
    pub commands: Vec<Command<'a>>,
}

impl<'a> Script<'a> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: Command<'a>) -> Result<(), AllocError> {
        self.commands.try_push(command)
    }

    /// Modules defined by `module` commands, in order. Modules inside
    /// `assert_invalid` are not instantiated and are skipped.
    pub fn modules(&self) -> impl Iterator<Item = &Module<'a>> {
        self.commands.iter().filter_map(|command| match command {
            Command::Module(module) => Some(module),
            _ => None,
        })
    }

    /// The module and export an invoking command at `index` targets: the
    /// export of that name in the closest preceding `module` command.
    pub fn invoke_target(&self, index: usize) -> Option<(&Module<'a>, &Export<'a>)> {
        let invoke = self.commands.get(index)?.invoke()?;
        let module = self.commands[..index]
            .iter()
            .rev()
            .find_map(|command| match command {
                Command::Module(module) => Some(module),
                _ => None,
            })?;
        let export = module.get_export_by_name(invoke.name.alias())?;
        Some((module, export))
    }
}
