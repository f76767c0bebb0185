//! Expression trees.
//!
//! Every composite variant owns its child expressions through `Box`/`Vec`
//! and owns its label names. The table switch additionally keeps a binding
//! hash over its case labels; that hash holds views of the labels owned by
//! the cases themselves.

use crate::types::{BinaryOp, CompareOp, Const, ConvertOp, MemAccess, UnaryOp, ValueType};
use wastree_binder::{BindingHash, Var};
use wastree_core::collections::index_of_len;
use wastree_core::error::AllocError;
use wastree_core::name::Name;

#[derive(Debug)]
pub enum Expr<'a> {
    Binary {
        op: BinaryOp,
        ty: ValueType,
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
    },
    Block {
        label: Option<Name<'a>>,
        exprs: Vec<Expr<'a>>,
    },
    Br {
        var: Var<'a>,
        expr: Option<Box<Expr<'a>>>,
    },
    BrIf {
        var: Var<'a>,
        cond: Box<Expr<'a>>,
        expr: Option<Box<Expr<'a>>>,
    },
    Call {
        var: Var<'a>,
        args: Vec<Expr<'a>>,
    },
    CallImport {
        var: Var<'a>,
        args: Vec<Expr<'a>>,
    },
    CallIndirect {
        /// Function type of the callee.
        var: Var<'a>,
        callee: Box<Expr<'a>>,
        args: Vec<Expr<'a>>,
    },
    Compare {
        op: CompareOp,
        ty: ValueType,
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
    },
    Const(Const),
    Convert {
        op: ConvertOp,
        expr: Box<Expr<'a>>,
    },
    GetLocal {
        var: Var<'a>,
    },
    GrowMemory {
        expr: Box<Expr<'a>>,
    },
    HasFeature {
        feature: Name<'a>,
    },
    If {
        cond: Box<Expr<'a>>,
        then: Box<Expr<'a>>,
    },
    IfElse {
        cond: Box<Expr<'a>>,
        then: Box<Expr<'a>>,
        otherwise: Box<Expr<'a>>,
    },
    Load {
        access: MemAccess,
        addr: Box<Expr<'a>>,
    },
    LoadGlobal {
        var: Var<'a>,
    },
    Loop {
        outer: Option<Name<'a>>,
        inner: Option<Name<'a>>,
        exprs: Vec<Expr<'a>>,
    },
    MemorySize,
    Nop,
    Return {
        expr: Option<Box<Expr<'a>>>,
    },
    Select {
        ty: ValueType,
        cond: Box<Expr<'a>>,
        then: Box<Expr<'a>>,
        otherwise: Box<Expr<'a>>,
    },
    SetLocal {
        var: Var<'a>,
        expr: Box<Expr<'a>>,
    },
    Store {
        access: MemAccess,
        addr: Box<Expr<'a>>,
        value: Box<Expr<'a>>,
    },
    StoreGlobal {
        var: Var<'a>,
        expr: Box<Expr<'a>>,
    },
    TableSwitch(TableSwitch<'a>),
    Unary {
        op: UnaryOp,
        ty: ValueType,
        expr: Box<Expr<'a>>,
    },
    Unreachable,
}

/// Fieldless discriminant of [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Binary,
    Block,
    Br,
    BrIf,
    Call,
    CallImport,
    CallIndirect,
    Compare,
    Const,
    Convert,
    GetLocal,
    GrowMemory,
    HasFeature,
    If,
    IfElse,
    Load,
    LoadGlobal,
    Loop,
    MemorySize,
    Nop,
    Return,
    Select,
    SetLocal,
    Store,
    StoreGlobal,
    TableSwitch,
    Unary,
    Unreachable,
}

impl<'a> Expr<'a> {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Binary { .. } => ExprKind::Binary,
            Expr::Block { .. } => ExprKind::Block,
            Expr::Br { .. } => ExprKind::Br,
            Expr::BrIf { .. } => ExprKind::BrIf,
            Expr::Call { .. } => ExprKind::Call,
            Expr::CallImport { .. } => ExprKind::CallImport,
            Expr::CallIndirect { .. } => ExprKind::CallIndirect,
            Expr::Compare { .. } => ExprKind::Compare,
            Expr::Const(_) => ExprKind::Const,
            Expr::Convert { .. } => ExprKind::Convert,
            Expr::GetLocal { .. } => ExprKind::GetLocal,
            Expr::GrowMemory { .. } => ExprKind::GrowMemory,
            Expr::HasFeature { .. } => ExprKind::HasFeature,
            Expr::If { .. } => ExprKind::If,
            Expr::IfElse { .. } => ExprKind::IfElse,
            Expr::Load { .. } => ExprKind::Load,
            Expr::LoadGlobal { .. } => ExprKind::LoadGlobal,
            Expr::Loop { .. } => ExprKind::Loop,
            Expr::MemorySize => ExprKind::MemorySize,
            Expr::Nop => ExprKind::Nop,
            Expr::Return { .. } => ExprKind::Return,
            Expr::Select { .. } => ExprKind::Select,
            Expr::SetLocal { .. } => ExprKind::SetLocal,
            Expr::Store { .. } => ExprKind::Store,
            Expr::StoreGlobal { .. } => ExprKind::StoreGlobal,
            Expr::TableSwitch(_) => ExprKind::TableSwitch,
            Expr::Unary { .. } => ExprKind::Unary,
            Expr::Unreachable => ExprKind::Unreachable,
        }
    }

    /// Visit the direct children in evaluation order.
    pub fn for_each_child<'s>(&'s self, mut f: impl FnMut(&'s Expr<'a>)) {
        match self {
            Expr::Binary { left, right, .. } | Expr::Compare { left, right, .. } => {
                f(left);
                f(right);
            }
            Expr::Block { exprs, .. } | Expr::Loop { exprs, .. } => exprs.iter().for_each(f),
            Expr::Br { expr, .. } | Expr::Return { expr } => {
                if let Some(expr) = expr {
                    f(expr);
                }
            }
            Expr::BrIf { cond, expr, .. } => {
                f(cond);
                if let Some(expr) = expr {
                    f(expr);
                }
            }
            Expr::Call { args, .. } | Expr::CallImport { args, .. } => args.iter().for_each(f),
            Expr::CallIndirect { callee, args, .. } => {
                f(callee);
                args.iter().for_each(f);
            }
            Expr::Convert { expr, .. }
            | Expr::GrowMemory { expr }
            | Expr::SetLocal { expr, .. }
            | Expr::StoreGlobal { expr, .. }
            | Expr::Unary { expr, .. } => f(expr),
            Expr::Load { addr, .. } => f(addr),
            Expr::If { cond, then } => {
                f(cond);
                f(then);
            }
            Expr::IfElse {
                cond,
                then,
                otherwise,
            }
            | Expr::Select {
                cond,
                then,
                otherwise,
                ..
            } => {
                f(cond);
                f(then);
                f(otherwise);
            }
            Expr::Store { addr, value, .. } => {
                f(addr);
                f(value);
            }
            Expr::TableSwitch(switch) => {
                f(&switch.key);
                for case in &switch.cases {
                    case.exprs.iter().for_each(&mut f);
                }
            }
            Expr::Const(_)
            | Expr::GetLocal { .. }
            | Expr::HasFeature { .. }
            | Expr::LoadGlobal { .. }
            | Expr::MemorySize
            | Expr::Nop
            | Expr::Unreachable => {}
        }
    }

    /// Number of expression nodes in this tree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            count += 1;
            expr.for_each_child(|child| stack.push(child));
        }
        count
    }

    /// Depth of this tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, level)) = stack.pop() {
            deepest = deepest.max(level);
            expr.for_each_child(|child| stack.push((child, level + 1)));
        }
        deepest
    }
}

/// Whether a table switch target jumps to a case or breaks out to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Case,
    Br,
}

#[derive(Debug)]
pub struct Target<'a> {
    pub kind: TargetKind,
    pub var: Var<'a>,
}

#[derive(Debug)]
pub struct Case<'a> {
    pub label: Option<Name<'a>>,
    pub exprs: Vec<Expr<'a>>,
}

/// A multi-way branch on an i32 key.
///
/// The cases and their label bindings are built together and cannot be
/// changed afterwards, so the bindings always index the current case list.
#[derive(Debug)]
pub struct TableSwitch<'a> {
    pub label: Option<Name<'a>>,
    pub key: Box<Expr<'a>>,
    pub targets: Vec<Target<'a>>,
    pub default_target: Target<'a>,
    cases: Vec<Case<'a>>,
    case_bindings: BindingHash<'a>,
}

impl<'a> TableSwitch<'a> {
    /// Build a table switch, binding every labelled case to its position.
    pub fn new(
        label: Option<Name<'a>>,
        key: Box<Expr<'a>>,
        targets: Vec<Target<'a>>,
        default_target: Target<'a>,
        cases: Vec<Case<'a>>,
    ) -> Result<Self, AllocError> {
        let mut case_bindings = BindingHash::new();
        for (i, case) in cases.iter().enumerate() {
            if let Some(label) = &case.label {
                case_bindings.insert(label.alias())?.index = index_of_len(i)?;
            }
        }
        Ok(Self {
            label,
            key,
            targets,
            default_target,
            cases,
            case_bindings,
        })
    }

    pub fn cases(&self) -> &[Case<'a>] {
        &self.cases
    }

    pub fn case_bindings(&self) -> &BindingHash<'a> {
        &self.case_bindings
    }

    /// Resolve a case reference to a position in [`cases`](Self::cases),
    /// or `None` if it names no case or is out of range.
    pub fn case_index(&self, var: &Var<'_>) -> Option<u32> {
        let index = self.case_bindings.resolve(var)?;
        ((index as usize) < self.cases.len()).then_some(index)
    }

    /// The case a target jumps to; `None` for branch targets and for
    /// unresolvable case references.
    pub fn target_case(&self, target: &Target<'_>) -> Option<&Case<'a>> {
        match target.kind {
            TargetKind::Case => self
                .case_index(&target.var)
                .map(|index| &self.cases[index as usize]),
            TargetKind::Br => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wastree_core::NameArena;

    fn i32_const(value: u32) -> Box<Expr<'static>> {
        Box::new(Expr::Const(Const::I32(value)))
    }

    #[test]
    fn test_leaf_counts() {
        assert_eq!(Expr::Nop.node_count(), 1);
        assert_eq!(Expr::Nop.depth(), 1);
        assert_eq!(Expr::MemorySize.kind(), ExprKind::MemorySize);
    }

    #[test]
    fn test_nested_counts() {
        let expr = Expr::IfElse {
            cond: i32_const(1),
            then: Box::new(Expr::Binary {
                op: BinaryOp::Add,
                ty: ValueType::I32,
                left: i32_const(2),
                right: i32_const(3),
            }),
            otherwise: Box::new(Expr::Return { expr: None }),
        };
        assert_eq!(expr.node_count(), 6);
        assert_eq!(expr.depth(), 3);
    }

    #[test]
    fn test_depth_follows_deepest_branch() {
        let mut chain = Expr::Nop;
        for _ in 0..500 {
            chain = Expr::Return {
                expr: Some(Box::new(chain)),
            };
        }
        let expr = Expr::Binary {
            op: BinaryOp::Add,
            ty: ValueType::I32,
            left: i32_const(1),
            right: Box::new(chain),
        };
        assert_eq!(expr.depth(), 502);
        assert_eq!(expr.node_count(), 503);
    }

    #[test]
    fn test_children_in_order() {
        let expr = Expr::Store {
            access: MemAccess::natural(ValueType::I32),
            addr: i32_const(8),
            value: i32_const(9),
        };
        let mut seen = Vec::new();
        expr.for_each_child(|child| {
            if let Expr::Const(Const::I32(v)) = child {
                seen.push(*v);
            }
        });
        assert_eq!(seen, vec![8, 9]);
    }

    #[test]
    fn test_table_switch_case_bindings() {
        let arena = NameArena::new();
        let cases = vec![
            Case {
                label: Some(arena.alloc_name("$zero")),
                exprs: vec![Expr::Nop],
            },
            Case {
                label: None,
                exprs: vec![],
            },
            Case {
                label: Some(arena.alloc_name("$two")),
                exprs: vec![Expr::Unreachable, Expr::Nop],
            },
        ];
        let switch = TableSwitch::new(
            Some(arena.alloc_name("$sw")),
            i32_const(0),
            vec![
                Target {
                    kind: TargetKind::Case,
                    var: Var::Name(arena.alloc_name("$two")),
                },
                Target {
                    kind: TargetKind::Br,
                    var: Var::Index(0),
                },
            ],
            Target {
                kind: TargetKind::Case,
                var: Var::Index(1),
            },
            cases,
        )
        .unwrap();

        assert_eq!(switch.case_bindings().len(), 2);
        assert_eq!(switch.case_index(&Var::Name(arena.alloc_name("$zero"))), Some(0));
        assert_eq!(switch.case_index(&Var::Name(arena.alloc_name("$two"))), Some(2));
        assert_eq!(switch.case_index(&Var::Name(arena.alloc_name("$one"))), None);
        assert_eq!(switch.case_index(&Var::Index(3)), None);

        let first = switch.target_case(&switch.targets[0]).unwrap();
        assert_eq!(first.exprs.len(), 2);
        assert!(switch.target_case(&switch.targets[1]).is_none());
        assert!(switch.target_case(&switch.default_target).unwrap().exprs.is_empty());

        let expr = Expr::TableSwitch(switch);
        assert_eq!(expr.node_count(), 5);
    }
}
