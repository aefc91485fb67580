//! The decompiler's intermediate representation (spec.md §3.6): an
//! algebraic sum type for expressions, statements, and blocks, sitting
//! between the CFG (`crate::cfg`) and the pseudo-code emitter
//! (`crate::ir::emit`).
//!
//! Every expression carries a `ty` field (a type-table index) per spec.md
//! §3.6's invariant that "every IR node carries type information"; every
//! `Expr::Local` references a register slot that must exist in the owning
//! function's `regs` list.

pub mod emit;
pub mod lifter;
pub mod optimize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SMod,
    UMod,
    Shl,
    SShr,
    UShr,
    And,
    Or,
    Xor,
}

impl ArithOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::SDiv | Self::UDiv => "/",
            Self::SMod | Self::UMod => "%",
            Self::Shl => "<<",
            Self::SShr | Self::UShr => ">>",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    SLt,
    SGte,
    SGt,
    SLte,
    ULt,
    UGte,
    Eq,
    NotEq,
    IsNull,
    IsNotNull,
}

impl CmpOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::SLt | Self::ULt => "<",
            Self::SGte | Self::UGte => ">=",
            Self::SGt => ">",
            Self::SLte => "<=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::IsNull => "== null",
            Self::IsNotNull => "!= null",
        }
    }

    /// The comparison with its sense flipped, used by constant folding and
    /// if/else canonicalization.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::SLt => Self::SGte,
            Self::SGte => Self::SLt,
            Self::SGt => Self::SLte,
            Self::SLte => Self::SGt,
            Self::ULt => Self::UGte,
            Self::UGte => Self::ULt,
            Self::Eq => Self::NotEq,
            Self::NotEq => Self::Eq,
            Self::IsNull => Self::IsNotNull,
            Self::IsNotNull => Self::IsNull,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i32),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    /// A direct call to a known function index.
    Function(u32),
    /// `obj.method(...)` dispatch through a field/vtable slot.
    Method { obj: Box<Expr>, field_idx: u32 },
    /// A call through a closure value already held in a register.
    Closure(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const { ty: u32, value: ConstValue },
    /// `name` is filled in by the optimizer's register-coalescing pass
    /// (spec.md §4.6 item 1) from the function's `assigns` list; `None`
    /// until then, and for any register `assigns` never names.
    Local { reg: u32, ty: u32, name: Option<String> },
    Arg { index: u32, ty: u32 },
    Field { obj: Box<Expr>, field_name: String, ty: u32 },
    Arithmetic { lhs: Box<Expr>, op: ArithOp, rhs: Box<Expr>, ty: u32 },
    Comparison { lhs: Box<Expr>, op: CmpOp, rhs: Box<Expr> },
    Call { target: CallTarget, args: Vec<Expr>, ty: u32, conservative: bool },
    New { ty: u32 },
    Cast { expr: Box<Expr>, target_ty: u32, conservative: bool },
    Closure { findex: u32, bound_this: Option<Box<Expr>>, ty: u32 },
    EnumConstruct { construct_idx: u32, args: Vec<Expr>, ty: u32 },
}

impl Expr {
    #[must_use]
    pub fn ty(&self) -> u32 {
        match self {
            Self::Const { ty, .. }
            | Self::Local { ty, .. }
            | Self::Arg { ty, .. }
            | Self::Field { ty, .. }
            | Self::Arithmetic { ty, .. }
            | Self::Call { ty, .. }
            | Self::New { ty }
            | Self::Closure { ty, .. }
            | Self::EnumConstruct { ty, .. } => *ty,
            Self::Comparison { .. } => u32::MAX, // bool; resolved by caller against a known bool type index
            Self::Cast { target_ty, .. } => *target_ty,
        }
    }

    #[must_use]
    pub fn is_conservative(&self) -> bool {
        match self {
            Self::Call { conservative, .. } | Self::Cast { conservative, .. } => *conservative,
            _ => false,
        }
    }
}

/// The shape a recognized loop took (spec.md §4.5): pre-tested (`while`),
/// post-tested (`do...while`), or infinite (exit only via `break`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopShape {
    PreTested,
    PostTested,
    Infinite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { dst: Expr, src: Expr },
    /// A call whose result is discarded (spec.md §4.5 Phase A: "standalone
    /// `IRCall` when dst is void").
    Expr(Expr),
    Return(Option<Expr>),
    Throw(Expr),
    Conditional { cond: Expr, then_block: Block, else_block: Block },
    Loop {
        shape: LoopShape,
        /// Whether a `Label` opcode corroborated this loop's header,
        /// per spec.md §9's open question — a hint, never the sole signal.
        label_confirmed: bool,
        cond: Option<Expr>,
        body: Block,
    },
    Break,
    Continue,
    Switch { scrutinee: Expr, cases: Vec<(i32, Block)>, default: Block },
    Try { body: Block, catches: Vec<(u32, Block)> },
    /// Structure recovery could not match this jump to a higher-level
    /// construct; preserved verbatim (spec.md §4.5's fallback contract).
    PrimitiveJump { target_pc: usize },
    /// An opcode the lifter has no translation for; always safe, always
    /// opaque (spec.md §4.5 Phase A).
    Untranslated { opcode_name: &'static str, pc: usize },
}

pub type Block = Vec<Stmt>;
