//! Opcode and constant types shared by the expression nodes.

pub use wastree_binder::ValueType;

/// Two-operand arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    DivS,
    DivU,
    RemS,
    RemU,
    And,
    Or,
    Xor,
    Shl,
    ShrS,
    ShrU,
    Div,
    Min,
    Max,
    CopySign,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::DivS => "div_s",
            BinaryOp::DivU => "div_u",
            BinaryOp::RemS => "rem_s",
            BinaryOp::RemU => "rem_u",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::ShrS => "shr_s",
            BinaryOp::ShrU => "shr_u",
            BinaryOp::Div => "div",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
            BinaryOp::CopySign => "copysign",
        }
    }

    /// Whether the operator is defined for floating-point operands only.
    pub fn is_float_only(self) -> bool {
        matches!(
            self,
            BinaryOp::Div | BinaryOp::Min | BinaryOp::Max | BinaryOp::CopySign
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Clz,
    Ctz,
    Popcnt,
    Neg,
    Abs,
    Ceil,
    Floor,
    Trunc,
    Nearest,
    Sqrt,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Clz => "clz",
            UnaryOp::Ctz => "ctz",
            UnaryOp::Popcnt => "popcnt",
            UnaryOp::Neg => "neg",
            UnaryOp::Abs => "abs",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Floor => "floor",
            UnaryOp::Trunc => "trunc",
            UnaryOp::Nearest => "nearest",
            UnaryOp::Sqrt => "sqrt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    LtS,
    LtU,
    LeS,
    LeU,
    GtS,
    GtU,
    GeS,
    GeU,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::LtS => "lt_s",
            CompareOp::LtU => "lt_u",
            CompareOp::LeS => "le_s",
            CompareOp::LeU => "le_u",
            CompareOp::GtS => "gt_s",
            CompareOp::GtU => "gt_u",
            CompareOp::GeS => "ge_s",
            CompareOp::GeU => "ge_u",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
        }
    }
}

/// Conversions, named `<result>_<op>_<operand>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertOp {
    I32WrapI64,
    I32TruncSF32,
    I32TruncUF32,
    I32TruncSF64,
    I32TruncUF64,
    I32ReinterpretF32,
    I64ExtendSI32,
    I64ExtendUI32,
    I64TruncSF32,
    I64TruncUF32,
    I64TruncSF64,
    I64TruncUF64,
    I64ReinterpretF64,
    F32ConvertSI32,
    F32ConvertUI32,
    F32ConvertSI64,
    F32ConvertUI64,
    F32DemoteF64,
    F32ReinterpretI32,
    F64ConvertSI32,
    F64ConvertUI32,
    F64ConvertSI64,
    F64ConvertUI64,
    F64PromoteF32,
    F64ReinterpretI64,
}

impl ConvertOp {
    pub fn result_type(self) -> ValueType {
        use ConvertOp::*;
        match self {
            I32WrapI64 | I32TruncSF32 | I32TruncUF32 | I32TruncSF64 | I32TruncUF64
            | I32ReinterpretF32 => ValueType::I32,
            I64ExtendSI32 | I64ExtendUI32 | I64TruncSF32 | I64TruncUF32 | I64TruncSF64
            | I64TruncUF64 | I64ReinterpretF64 => ValueType::I64,
            F32ConvertSI32 | F32ConvertUI32 | F32ConvertSI64 | F32ConvertUI64 | F32DemoteF64
            | F32ReinterpretI32 => ValueType::F32,
            F64ConvertSI32 | F64ConvertUI32 | F64ConvertSI64 | F64ConvertUI64 | F64PromoteF32
            | F64ReinterpretI64 => ValueType::F64,
        }
    }

    pub fn operand_type(self) -> ValueType {
        use ConvertOp::*;
        match self {
            I64ExtendSI32 | I64ExtendUI32 | F32ConvertSI32 | F32ConvertUI32 | F64ConvertSI32
            | F64ConvertUI32 | F32ReinterpretI32 => ValueType::I32,
            I32WrapI64 | F32ConvertSI64 | F32ConvertUI64 | F64ConvertSI64 | F64ConvertUI64
            | F64ReinterpretI64 => ValueType::I64,
            I32TruncSF32 | I32TruncUF32 | I32ReinterpretF32 | I64TruncSF32 | I64TruncUF32
            | F64PromoteF32 => ValueType::F32,
            I32TruncSF64 | I32TruncUF64 | I64TruncSF64 | I64TruncUF64 | I64ReinterpretF64
            | F32DemoteF64 => ValueType::F64,
        }
    }
}

/// Operand shape of a load or store: `i64.load32_s offset=8 align=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemAccess {
    pub ty: ValueType,
    /// Access width in bits (8, 16, 32 or 64).
    pub size: u8,
    /// Sign-extend narrow loads.
    pub signed: bool,
    pub align: u32,
    pub offset: u64,
}

impl MemAccess {
    /// A full-width access with natural alignment and no offset.
    pub fn natural(ty: ValueType) -> Self {
        let bytes = ty.byte_size();
        Self {
            ty,
            size: (bytes * 8) as u8,
            signed: false,
            align: bytes,
            offset: 0,
        }
    }
}

/// A constant operand. Floats are stored as raw bits so NaN payloads
/// survive unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Const {
    I32(u32),
    I64(u64),
    F32(u32),
    F64(u64),
}

impl Const {
    pub fn ty(self) -> ValueType {
        match self {
            Const::I32(_) => ValueType::I32,
            Const::I64(_) => ValueType::I64,
            Const::F32(_) => ValueType::F32,
            Const::F64(_) => ValueType::F64,
        }
    }

    pub fn f32(value: f32) -> Self {
        Const::F32(value.to_bits())
    }

    pub fn f64(value: f64) -> Self {
        Const::F64(value.to_bits())
    }

    /// Whether this is a floating-point NaN, any payload.
    pub fn is_nan(self) -> bool {
        match self {
            Const::F32(bits) => f32::from_bits(bits).is_nan(),
            Const::F64(bits) => f64::from_bits(bits).is_nan(),
            Const::I32(_) | Const::I64(_) => false,
        }
    }
}
