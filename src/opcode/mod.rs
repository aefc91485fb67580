//! The opcode model: a closed, tag-dispatched enumeration of HashLink VM
//! instructions (spec.md §3.4), each with a fixed named-field schema. A
//! handful of kinds (`CallN`, `CallMethod`, `CallThis`, `CallClosure`,
//! `MakeEnum`, `Switch`) carry a trailing variable-length list.
//!
//! Jump offsets are signed and relative to the instruction *following* the
//! jump (spec.md §3.4): `pc_after_jump + offset` is the target.

pub mod schema;

use crate::error::DecodeError;
use crate::varint::{Reader, Writer};
use schema::OpTag;

pub type Reg = u32;

/// A single HashLink VM instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
    Mov { dst: Reg, src: Reg },
    Int { dst: Reg, ptr: u32 },
    Float { dst: Reg, ptr: u32 },
    Bool { dst: Reg, value: bool },
    Bytes { dst: Reg, ptr: u32 },
    StringConst { dst: Reg, ptr: u32 },
    Null { dst: Reg },

    Add { dst: Reg, a: Reg, b: Reg },
    Sub { dst: Reg, a: Reg, b: Reg },
    Mul { dst: Reg, a: Reg, b: Reg },
    SDiv { dst: Reg, a: Reg, b: Reg },
    UDiv { dst: Reg, a: Reg, b: Reg },
    SMod { dst: Reg, a: Reg, b: Reg },
    UMod { dst: Reg, a: Reg, b: Reg },
    Shl { dst: Reg, a: Reg, b: Reg },
    SShr { dst: Reg, a: Reg, b: Reg },
    UShr { dst: Reg, a: Reg, b: Reg },
    And { dst: Reg, a: Reg, b: Reg },
    Or { dst: Reg, a: Reg, b: Reg },
    Xor { dst: Reg, a: Reg, b: Reg },

    Neg { dst: Reg, src: Reg },
    Not { dst: Reg, src: Reg },
    Incr { dst: Reg },
    Decr { dst: Reg },

    Call0 { dst: Reg, fun: u32 },
    Call1 { dst: Reg, fun: u32, arg0: Reg },
    Call2 { dst: Reg, fun: u32, arg0: Reg, arg1: Reg },
    Call3 { dst: Reg, fun: u32, arg0: Reg, arg1: Reg, arg2: Reg },
    Call4 { dst: Reg, fun: u32, arg0: Reg, arg1: Reg, arg2: Reg, arg3: Reg },
    CallN { dst: Reg, fun: u32, args: Vec<Reg> },
    CallMethod { dst: Reg, field_idx: u32, args: Vec<Reg> },
    CallThis { dst: Reg, field_idx: u32, args: Vec<Reg> },
    CallClosure { dst: Reg, closure: Reg, args: Vec<Reg> },

    StaticClosure { dst: Reg, fun: u32 },
    InstanceClosure { dst: Reg, fun: u32, obj: Reg },
    VirtualClosure { dst: Reg, obj: Reg, field_idx: u32 },

    GetGlobal { dst: Reg, global_idx: u32 },
    SetGlobal { global_idx: u32, src: Reg },

    Field { dst: Reg, obj: Reg, field_idx: u32 },
    SetField { obj: Reg, field_idx: u32, src: Reg },
    GetThis { dst: Reg, field_idx: u32 },
    SetThis { field_idx: u32, src: Reg },

    DynGet { dst: Reg, obj: Reg, name: u32 },
    DynSet { obj: Reg, name: u32, src: Reg },

    JTrue { cond: Reg, offset: i32 },
    JFalse { cond: Reg, offset: i32 },
    JNull { cond: Reg, offset: i32 },
    JNotNull { cond: Reg, offset: i32 },
    JSLt { a: Reg, b: Reg, offset: i32 },
    JSGte { a: Reg, b: Reg, offset: i32 },
    JSGt { a: Reg, b: Reg, offset: i32 },
    JSLte { a: Reg, b: Reg, offset: i32 },
    JULt { a: Reg, b: Reg, offset: i32 },
    JUGte { a: Reg, b: Reg, offset: i32 },
    JEq { a: Reg, b: Reg, offset: i32 },
    JNotEq { a: Reg, b: Reg, offset: i32 },
    JAlways { offset: i32 },
    Label,

    Ret { reg: Reg },
    Throw { reg: Reg },
    Rethrow { reg: Reg },

    Switch { reg: Reg, offsets: Vec<i32>, end: i32 },

    Trap { dst: Reg, offset: i32 },
    EndTrap { dst: Reg },
    NullCheck { reg: Reg },

    GetI8 { dst: Reg, bytes: Reg, index: Reg },
    GetI16 { dst: Reg, bytes: Reg, index: Reg },
    GetMem { dst: Reg, bytes: Reg, index: Reg },
    GetArray { dst: Reg, array: Reg, index: Reg },
    SetI8 { bytes: Reg, index: Reg, src: Reg },
    SetI16 { bytes: Reg, index: Reg, src: Reg },
    SetMem { bytes: Reg, index: Reg, src: Reg },
    SetArray { array: Reg, index: Reg, src: Reg },

    New { dst: Reg },
    ArraySize { dst: Reg, array: Reg },
    GetType { dst: Reg, src: Reg },
    GetTID { dst: Reg, src: Reg },

    Ref { dst: Reg, src: Reg },
    Unref { dst: Reg, src: Reg },
    Setref { dst: Reg, value: Reg },

    MakeEnum { dst: Reg, construct_idx: u32, args: Vec<Reg> },
    EnumIndex { dst: Reg, value: Reg },
    EnumField { dst: Reg, value: Reg, construct_idx: u32, field_idx: u32 },
    SetEnumField { value: Reg, field_idx: u32, src: Reg },

    ToDyn { dst: Reg, src: Reg },
    ToSFloat { dst: Reg, src: Reg },
    ToUFloat { dst: Reg, src: Reg },
    ToInt { dst: Reg, src: Reg },
    SafeCast { dst: Reg, src: Reg },
    UnsafeCast { dst: Reg, src: Reg },
    ToVirtual { dst: Reg, src: Reg },
}

impl Opcode {
    #[must_use]
    pub fn tag(&self) -> OpTag {
        match self {
            Self::Mov { .. } => OpTag::Mov,
            Self::Int { .. } => OpTag::Int,
            Self::Float { .. } => OpTag::Float,
            Self::Bool { .. } => OpTag::Bool,
            Self::Bytes { .. } => OpTag::Bytes,
            Self::StringConst { .. } => OpTag::StringConst,
            Self::Null { .. } => OpTag::Null,
            Self::Add { .. } => OpTag::Add,
            Self::Sub { .. } => OpTag::Sub,
            Self::Mul { .. } => OpTag::Mul,
            Self::SDiv { .. } => OpTag::SDiv,
            Self::UDiv { .. } => OpTag::UDiv,
            Self::SMod { .. } => OpTag::SMod,
            Self::UMod { .. } => OpTag::UMod,
            Self::Shl { .. } => OpTag::Shl,
            Self::SShr { .. } => OpTag::SShr,
            Self::UShr { .. } => OpTag::UShr,
            Self::And { .. } => OpTag::And,
            Self::Or { .. } => OpTag::Or,
            Self::Xor { .. } => OpTag::Xor,
            Self::Neg { .. } => OpTag::Neg,
            Self::Not { .. } => OpTag::Not,
            Self::Incr { .. } => OpTag::Incr,
            Self::Decr { .. } => OpTag::Decr,
            Self::Call0 { .. } => OpTag::Call0,
            Self::Call1 { .. } => OpTag::Call1,
            Self::Call2 { .. } => OpTag::Call2,
            Self::Call3 { .. } => OpTag::Call3,
            Self::Call4 { .. } => OpTag::Call4,
            Self::CallN { .. } => OpTag::CallN,
            Self::CallMethod { .. } => OpTag::CallMethod,
            Self::CallThis { .. } => OpTag::CallThis,
            Self::CallClosure { .. } => OpTag::CallClosure,
            Self::StaticClosure { .. } => OpTag::StaticClosure,
            Self::InstanceClosure { .. } => OpTag::InstanceClosure,
            Self::VirtualClosure { .. } => OpTag::VirtualClosure,
            Self::GetGlobal { .. } => OpTag::GetGlobal,
            Self::SetGlobal { .. } => OpTag::SetGlobal,
            Self::Field { .. } => OpTag::Field,
            Self::SetField { .. } => OpTag::SetField,
            Self::GetThis { .. } => OpTag::GetThis,
            Self::SetThis { .. } => OpTag::SetThis,
            Self::DynGet { .. } => OpTag::DynGet,
            Self::DynSet { .. } => OpTag::DynSet,
            Self::JTrue { .. } => OpTag::JTrue,
            Self::JFalse { .. } => OpTag::JFalse,
            Self::JNull { .. } => OpTag::JNull,
            Self::JNotNull { .. } => OpTag::JNotNull,
            Self::JSLt { .. } => OpTag::JSLt,
            Self::JSGte { .. } => OpTag::JSGte,
            Self::JSGt { .. } => OpTag::JSGt,
            Self::JSLte { .. } => OpTag::JSLte,
            Self::JULt { .. } => OpTag::JULt,
            Self::JUGte { .. } => OpTag::JUGte,
            Self::JEq { .. } => OpTag::JEq,
            Self::JNotEq { .. } => OpTag::JNotEq,
            Self::JAlways { .. } => OpTag::JAlways,
            Self::Label => OpTag::Label,
            Self::Ret { .. } => OpTag::Ret,
            Self::Throw { .. } => OpTag::Throw,
            Self::Rethrow { .. } => OpTag::Rethrow,
            Self::Switch { .. } => OpTag::Switch,
            Self::Trap { .. } => OpTag::Trap,
            Self::EndTrap { .. } => OpTag::EndTrap,
            Self::NullCheck { .. } => OpTag::NullCheck,
            Self::GetI8 { .. } => OpTag::GetI8,
            Self::GetI16 { .. } => OpTag::GetI16,
            Self::GetMem { .. } => OpTag::GetMem,
            Self::GetArray { .. } => OpTag::GetArray,
            Self::SetI8 { .. } => OpTag::SetI8,
            Self::SetI16 { .. } => OpTag::SetI16,
            Self::SetMem { .. } => OpTag::SetMem,
            Self::SetArray { .. } => OpTag::SetArray,
            Self::New { .. } => OpTag::New,
            Self::ArraySize { .. } => OpTag::ArraySize,
            Self::GetType { .. } => OpTag::GetType,
            Self::GetTID { .. } => OpTag::GetTID,
            Self::Ref { .. } => OpTag::Ref,
            Self::Unref { .. } => OpTag::Unref,
            Self::Setref { .. } => OpTag::Setref,
            Self::MakeEnum { .. } => OpTag::MakeEnum,
            Self::EnumIndex { .. } => OpTag::EnumIndex,
            Self::EnumField { .. } => OpTag::EnumField,
            Self::SetEnumField { .. } => OpTag::SetEnumField,
            Self::ToDyn { .. } => OpTag::ToDyn,
            Self::ToSFloat { .. } => OpTag::ToSFloat,
            Self::ToUFloat { .. } => OpTag::ToUFloat,
            Self::ToInt { .. } => OpTag::ToInt,
            Self::SafeCast { .. } => OpTag::SafeCast,
            Self::UnsafeCast { .. } => OpTag::UnsafeCast,
            Self::ToVirtual { .. } => OpTag::ToVirtual,
        }
    }

    /// The opcode's name as it appears in disassembly and in
    /// `IRUntranslatedOpcode` comments (spec.md §4.7).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.tag().name()
    }

    /// `true` for opcodes that end a basic block (spec.md §3.5, §4.4).
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::JTrue { .. }
                | Self::JFalse { .. }
                | Self::JNull { .. }
                | Self::JNotNull { .. }
                | Self::JSLt { .. }
                | Self::JSGte { .. }
                | Self::JSGt { .. }
                | Self::JSLte { .. }
                | Self::JULt { .. }
                | Self::JUGte { .. }
                | Self::JEq { .. }
                | Self::JNotEq { .. }
                | Self::JAlways { .. }
                | Self::Ret { .. }
                | Self::Throw { .. }
                | Self::Rethrow { .. }
                | Self::Switch { .. }
        )
    }

    /// The destination register this opcode writes, if it writes exactly
    /// one. Void ops (`Ret`, branches, `SetField`/`SetThis`,
    /// `Trap`/`EndTrap`) have none.
    #[must_use]
    pub fn dst_reg(&self) -> Option<Reg> {
        Some(match self {
            Self::Mov { dst, .. }
            | Self::Int { dst, .. }
            | Self::Float { dst, .. }
            | Self::Bool { dst, .. }
            | Self::StringConst { dst, .. }
            | Self::Null { dst }
            | Self::Add { dst, .. }
            | Self::Sub { dst, .. }
            | Self::Mul { dst, .. }
            | Self::SDiv { dst, .. }
            | Self::UDiv { dst, .. }
            | Self::SMod { dst, .. }
            | Self::UMod { dst, .. }
            | Self::Shl { dst, .. }
            | Self::SShr { dst, .. }
            | Self::UShr { dst, .. }
            | Self::And { dst, .. }
            | Self::Or { dst, .. }
            | Self::Xor { dst, .. }
            | Self::Field { dst, .. }
            | Self::GetThis { dst, .. }
            | Self::New { dst }
            | Self::Call0 { dst, .. }
            | Self::Call1 { dst, .. }
            | Self::Call2 { dst, .. }
            | Self::Call3 { dst, .. }
            | Self::Call4 { dst, .. }
            | Self::CallN { dst, .. }
            | Self::CallMethod { dst, .. }
            | Self::CallThis { dst, .. }
            | Self::CallClosure { dst, .. }
            | Self::StaticClosure { dst, .. }
            | Self::InstanceClosure { dst, .. }
            | Self::VirtualClosure { dst, .. }
            | Self::ToSFloat { dst, .. }
            | Self::ToUFloat { dst, .. }
            | Self::ToDyn { dst, .. }
            | Self::ToInt { dst, .. }
            | Self::SafeCast { dst, .. }
            | Self::UnsafeCast { dst, .. }
            | Self::ToVirtual { dst, .. }
            | Self::Incr { dst }
            | Self::Decr { dst }
            | Self::Ref { dst, .. }
            | Self::MakeEnum { dst, .. } => *dst,
            _ => return None,
        })
    }

    /// The signed relative jump offset carried by this opcode, if any.
    #[must_use]
    pub fn jump_offset(&self) -> Option<i32> {
        match self {
            Self::JTrue { offset, .. }
            | Self::JFalse { offset, .. }
            | Self::JNull { offset, .. }
            | Self::JNotNull { offset, .. }
            | Self::JSLt { offset, .. }
            | Self::JSGte { offset, .. }
            | Self::JSGt { offset, .. }
            | Self::JSLte { offset, .. }
            | Self::JULt { offset, .. }
            | Self::JUGte { offset, .. }
            | Self::JEq { offset, .. }
            | Self::JNotEq { offset, .. }
            | Self::JAlways { offset } => Some(*offset),
            _ => None,
        }
    }
}

fn reg(r: &mut Reader<'_>) -> Result<Reg, DecodeError> {
    r.read_index()
}

fn jump_offset(r: &mut Reader<'_>) -> Result<i32, DecodeError> {
    r.read_varint()
}

fn read_args(r: &mut Reader<'_>) -> Result<Vec<Reg>, DecodeError> {
    let n = r.read_index()? as usize;
    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        args.push(reg(r)?);
    }
    Ok(args)
}

fn write_args(w: &mut Writer, args: &[Reg]) {
    w.write_index(args.len() as u32);
    for &a in args {
        w.write_index(a);
    }
}

/// Reads one opcode at the current cursor position, given the module
/// version (opcodes may be version-gated, see `schema::OpTag::min_version`).
pub fn read_opcode(r: &mut Reader<'_>, version: u8) -> Result<Opcode, DecodeError> {
    let offset = r.offset();
    let raw_tag = r.read_u8()?;
    let tag = OpTag::try_from_primitive(raw_tag)
        .map_err(|_| DecodeError::UnsupportedOpcode { tag: raw_tag, offset })?;
    if version < tag.min_version() {
        return Err(DecodeError::UnsupportedOpcode { tag: raw_tag, offset });
    }
    Ok(match tag {
        OpTag::Mov => Opcode::Mov { dst: reg(r)?, src: reg(r)? },
        OpTag::Int => Opcode::Int { dst: reg(r)?, ptr: r.read_index()? },
        OpTag::Float => Opcode::Float { dst: reg(r)?, ptr: r.read_index()? },
        OpTag::Bool => Opcode::Bool { dst: reg(r)?, value: r.read_varint()? != 0 },
        OpTag::Bytes => Opcode::Bytes { dst: reg(r)?, ptr: r.read_index()? },
        OpTag::StringConst => Opcode::StringConst { dst: reg(r)?, ptr: r.read_index()? },
        OpTag::Null => Opcode::Null { dst: reg(r)? },

        OpTag::Add => Opcode::Add { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::Sub => Opcode::Sub { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::Mul => Opcode::Mul { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::SDiv => Opcode::SDiv { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::UDiv => Opcode::UDiv { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::SMod => Opcode::SMod { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::UMod => Opcode::UMod { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::Shl => Opcode::Shl { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::SShr => Opcode::SShr { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::UShr => Opcode::UShr { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::And => Opcode::And { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::Or => Opcode::Or { dst: reg(r)?, a: reg(r)?, b: reg(r)? },
        OpTag::Xor => Opcode::Xor { dst: reg(r)?, a: reg(r)?, b: reg(r)? },

        OpTag::Neg => Opcode::Neg { dst: reg(r)?, src: reg(r)? },
        OpTag::Not => Opcode::Not { dst: reg(r)?, src: reg(r)? },
        OpTag::Incr => Opcode::Incr { dst: reg(r)? },
        OpTag::Decr => Opcode::Decr { dst: reg(r)? },

        OpTag::Call0 => Opcode::Call0 { dst: reg(r)?, fun: r.read_index()? },
        OpTag::Call1 => Opcode::Call1 { dst: reg(r)?, fun: r.read_index()?, arg0: reg(r)? },
        OpTag::Call2 => Opcode::Call2 {
            dst: reg(r)?,
            fun: r.read_index()?,
            arg0: reg(r)?,
            arg1: reg(r)?,
        },
        OpTag::Call3 => Opcode::Call3 {
            dst: reg(r)?,
            fun: r.read_index()?,
            arg0: reg(r)?,
            arg1: reg(r)?,
            arg2: reg(r)?,
        },
        OpTag::Call4 => Opcode::Call4 {
            dst: reg(r)?,
            fun: r.read_index()?,
            arg0: reg(r)?,
            arg1: reg(r)?,
            arg2: reg(r)?,
            arg3: reg(r)?,
        },
        OpTag::CallN => {
            let dst = reg(r)?;
            let fun = r.read_index()?;
            Opcode::CallN { dst, fun, args: read_args(r)? }
        }
        OpTag::CallMethod => {
            let dst = reg(r)?;
            let field_idx = r.read_index()?;
            Opcode::CallMethod { dst, field_idx, args: read_args(r)? }
        }
        OpTag::CallThis => {
            let dst = reg(r)?;
            let field_idx = r.read_index()?;
            Opcode::CallThis { dst, field_idx, args: read_args(r)? }
        }
        OpTag::CallClosure => {
            let dst = reg(r)?;
            let closure = reg(r)?;
            Opcode::CallClosure { dst, closure, args: read_args(r)? }
        }

        OpTag::StaticClosure => Opcode::StaticClosure { dst: reg(r)?, fun: r.read_index()? },
        OpTag::InstanceClosure => Opcode::InstanceClosure {
            dst: reg(r)?,
            fun: r.read_index()?,
            obj: reg(r)?,
        },
        OpTag::VirtualClosure => Opcode::VirtualClosure {
            dst: reg(r)?,
            obj: reg(r)?,
            field_idx: r.read_index()?,
        },

        OpTag::GetGlobal => Opcode::GetGlobal { dst: reg(r)?, global_idx: r.read_index()? },
        OpTag::SetGlobal => Opcode::SetGlobal { global_idx: r.read_index()?, src: reg(r)? },

        OpTag::Field => Opcode::Field { dst: reg(r)?, obj: reg(r)?, field_idx: r.read_index()? },
        OpTag::SetField => Opcode::SetField {
            obj: reg(r)?,
            field_idx: r.read_index()?,
            src: reg(r)?,
        },
        OpTag::GetThis => Opcode::GetThis { dst: reg(r)?, field_idx: r.read_index()? },
        OpTag::SetThis => Opcode::SetThis { field_idx: r.read_index()?, src: reg(r)? },

        OpTag::DynGet => Opcode::DynGet { dst: reg(r)?, obj: reg(r)?, name: r.read_index()? },
        OpTag::DynSet => Opcode::DynSet { obj: reg(r)?, name: r.read_index()?, src: reg(r)? },

        OpTag::JTrue => Opcode::JTrue { cond: reg(r)?, offset: jump_offset(r)? },
        OpTag::JFalse => Opcode::JFalse { cond: reg(r)?, offset: jump_offset(r)? },
        OpTag::JNull => Opcode::JNull { cond: reg(r)?, offset: jump_offset(r)? },
        OpTag::JNotNull => Opcode::JNotNull { cond: reg(r)?, offset: jump_offset(r)? },
        OpTag::JSLt => Opcode::JSLt { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JSGte => Opcode::JSGte { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JSGt => Opcode::JSGt { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JSLte => Opcode::JSLte { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JULt => Opcode::JULt { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JUGte => Opcode::JUGte { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JEq => Opcode::JEq { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JNotEq => Opcode::JNotEq { a: reg(r)?, b: reg(r)?, offset: jump_offset(r)? },
        OpTag::JAlways => Opcode::JAlways { offset: jump_offset(r)? },
        OpTag::Label => Opcode::Label,

        OpTag::Ret => Opcode::Ret { reg: reg(r)? },
        OpTag::Throw => Opcode::Throw { reg: reg(r)? },
        OpTag::Rethrow => Opcode::Rethrow { reg: reg(r)? },

        OpTag::Switch => {
            let switch_reg = reg(r)?;
            let n = r.read_index()? as usize;
            let mut offsets = Vec::with_capacity(n);
            for _ in 0..n {
                offsets.push(jump_offset(r)?);
            }
            let end = jump_offset(r)?;
            Opcode::Switch { reg: switch_reg, offsets, end }
        }

        OpTag::Trap => Opcode::Trap { dst: reg(r)?, offset: jump_offset(r)? },
        OpTag::EndTrap => Opcode::EndTrap { dst: reg(r)? },
        OpTag::NullCheck => Opcode::NullCheck { reg: reg(r)? },

        OpTag::GetI8 => Opcode::GetI8 { dst: reg(r)?, bytes: reg(r)?, index: reg(r)? },
        OpTag::GetI16 => Opcode::GetI16 { dst: reg(r)?, bytes: reg(r)?, index: reg(r)? },
        OpTag::GetMem => Opcode::GetMem { dst: reg(r)?, bytes: reg(r)?, index: reg(r)? },
        OpTag::GetArray => Opcode::GetArray { dst: reg(r)?, array: reg(r)?, index: reg(r)? },
        OpTag::SetI8 => Opcode::SetI8 { bytes: reg(r)?, index: reg(r)?, src: reg(r)? },
        OpTag::SetI16 => Opcode::SetI16 { bytes: reg(r)?, index: reg(r)?, src: reg(r)? },
        OpTag::SetMem => Opcode::SetMem { bytes: reg(r)?, index: reg(r)?, src: reg(r)? },
        OpTag::SetArray => Opcode::SetArray { array: reg(r)?, index: reg(r)?, src: reg(r)? },

        OpTag::New => Opcode::New { dst: reg(r)? },
        OpTag::ArraySize => Opcode::ArraySize { dst: reg(r)?, array: reg(r)? },
        OpTag::GetType => Opcode::GetType { dst: reg(r)?, src: reg(r)? },
        OpTag::GetTID => Opcode::GetTID { dst: reg(r)?, src: reg(r)? },

        OpTag::Ref => Opcode::Ref { dst: reg(r)?, src: reg(r)? },
        OpTag::Unref => Opcode::Unref { dst: reg(r)?, src: reg(r)? },
        OpTag::Setref => Opcode::Setref { dst: reg(r)?, value: reg(r)? },

        OpTag::MakeEnum => {
            let dst = reg(r)?;
            let construct_idx = r.read_index()?;
            Opcode::MakeEnum { dst, construct_idx, args: read_args(r)? }
        }
        OpTag::EnumIndex => Opcode::EnumIndex { dst: reg(r)?, value: reg(r)? },
        OpTag::EnumField => Opcode::EnumField {
            dst: reg(r)?,
            value: reg(r)?,
            construct_idx: r.read_index()?,
            field_idx: r.read_index()?,
        },
        OpTag::SetEnumField => Opcode::SetEnumField {
            value: reg(r)?,
            field_idx: r.read_index()?,
            src: reg(r)?,
        },

        OpTag::ToDyn => Opcode::ToDyn { dst: reg(r)?, src: reg(r)? },
        OpTag::ToSFloat => Opcode::ToSFloat { dst: reg(r)?, src: reg(r)? },
        OpTag::ToUFloat => Opcode::ToUFloat { dst: reg(r)?, src: reg(r)? },
        OpTag::ToInt => Opcode::ToInt { dst: reg(r)?, src: reg(r)? },
        OpTag::SafeCast => Opcode::SafeCast { dst: reg(r)?, src: reg(r)? },
        OpTag::UnsafeCast => Opcode::UnsafeCast { dst: reg(r)?, src: reg(r)? },
        OpTag::ToVirtual => Opcode::ToVirtual { dst: reg(r)?, src: reg(r)? },
    })
}

pub fn write_opcode(w: &mut Writer, op: &Opcode) {
    w.write_u8(op.tag() as u8);
    match op {
        Opcode::Mov { dst, src } => {
            w.write_index(*dst);
            w.write_index(*src);
        }
        Opcode::Int { dst, ptr } | Opcode::Float { dst, ptr } | Opcode::Bytes { dst, ptr } | Opcode::StringConst { dst, ptr } => {
            w.write_index(*dst);
            w.write_index(*ptr);
        }
        Opcode::Bool { dst, value } => {
            w.write_index(*dst);
            w.write_varint(i32::from(*value));
        }
        Opcode::Null { dst }
        | Opcode::Incr { dst }
        | Opcode::Decr { dst }
        | Opcode::New { dst }
        | Opcode::EndTrap { dst } => {
            w.write_index(*dst);
        }

        Opcode::Add { dst, a, b }
        | Opcode::Sub { dst, a, b }
        | Opcode::Mul { dst, a, b }
        | Opcode::SDiv { dst, a, b }
        | Opcode::UDiv { dst, a, b }
        | Opcode::SMod { dst, a, b }
        | Opcode::UMod { dst, a, b }
        | Opcode::Shl { dst, a, b }
        | Opcode::SShr { dst, a, b }
        | Opcode::UShr { dst, a, b }
        | Opcode::And { dst, a, b }
        | Opcode::Or { dst, a, b }
        | Opcode::Xor { dst, a, b } => {
            w.write_index(*dst);
            w.write_index(*a);
            w.write_index(*b);
        }

        Opcode::Neg { dst, src }
        | Opcode::Not { dst, src }
        | Opcode::GetType { dst, src }
        | Opcode::GetTID { dst, src }
        | Opcode::Ref { dst, src }
        | Opcode::Unref { dst, src }
        | Opcode::ToDyn { dst, src }
        | Opcode::ToSFloat { dst, src }
        | Opcode::ToUFloat { dst, src }
        | Opcode::ToInt { dst, src }
        | Opcode::SafeCast { dst, src }
        | Opcode::UnsafeCast { dst, src }
        | Opcode::ToVirtual { dst, src } => {
            w.write_index(*dst);
            w.write_index(*src);
        }

        Opcode::Call0 { dst, fun } => {
            w.write_index(*dst);
            w.write_index(*fun);
        }
        Opcode::Call1 { dst, fun, arg0 } => {
            w.write_index(*dst);
            w.write_index(*fun);
            w.write_index(*arg0);
        }
        Opcode::Call2 { dst, fun, arg0, arg1 } => {
            w.write_index(*dst);
            w.write_index(*fun);
            w.write_index(*arg0);
            w.write_index(*arg1);
        }
        Opcode::Call3 { dst, fun, arg0, arg1, arg2 } => {
            w.write_index(*dst);
            w.write_index(*fun);
            w.write_index(*arg0);
            w.write_index(*arg1);
            w.write_index(*arg2);
        }
        Opcode::Call4 { dst, fun, arg0, arg1, arg2, arg3 } => {
            w.write_index(*dst);
            w.write_index(*fun);
            w.write_index(*arg0);
            w.write_index(*arg1);
            w.write_index(*arg2);
            w.write_index(*arg3);
        }
        Opcode::CallN { dst, fun, args } => {
            w.write_index(*dst);
            w.write_index(*fun);
            write_args(w, args);
        }
        Opcode::CallMethod { dst, field_idx, args } | Opcode::CallThis { dst, field_idx, args } => {
            w.write_index(*dst);
            w.write_index(*field_idx);
            write_args(w, args);
        }
        Opcode::CallClosure { dst, closure, args } => {
            w.write_index(*dst);
            w.write_index(*closure);
            write_args(w, args);
        }

        Opcode::StaticClosure { dst, fun } => {
            w.write_index(*dst);
            w.write_index(*fun);
        }
        Opcode::InstanceClosure { dst, fun, obj } => {
            w.write_index(*dst);
            w.write_index(*fun);
            w.write_index(*obj);
        }
        Opcode::VirtualClosure { dst, obj, field_idx } => {
            w.write_index(*dst);
            w.write_index(*obj);
            w.write_index(*field_idx);
        }

        Opcode::GetGlobal { dst, global_idx } => {
            w.write_index(*dst);
            w.write_index(*global_idx);
        }
        Opcode::SetGlobal { global_idx, src } => {
            w.write_index(*global_idx);
            w.write_index(*src);
        }

        Opcode::Field { dst, obj, field_idx } => {
            w.write_index(*dst);
            w.write_index(*obj);
            w.write_index(*field_idx);
        }
        Opcode::SetField { obj, field_idx, src } => {
            w.write_index(*obj);
            w.write_index(*field_idx);
            w.write_index(*src);
        }
        Opcode::GetThis { dst, field_idx } => {
            w.write_index(*dst);
            w.write_index(*field_idx);
        }
        Opcode::SetThis { field_idx, src } => {
            w.write_index(*field_idx);
            w.write_index(*src);
        }

        Opcode::DynGet { dst, obj, name } => {
            w.write_index(*dst);
            w.write_index(*obj);
            w.write_index(*name);
        }
        Opcode::DynSet { obj, name, src } => {
            w.write_index(*obj);
            w.write_index(*name);
            w.write_index(*src);
        }

        Opcode::JTrue { cond, offset }
        | Opcode::JFalse { cond, offset }
        | Opcode::JNull { cond, offset }
        | Opcode::JNotNull { cond, offset } => {
            w.write_index(*cond);
            w.write_varint(*offset);
        }
        Opcode::JSLt { a, b, offset }
        | Opcode::JSGte { a, b, offset }
        | Opcode::JSGt { a, b, offset }
        | Opcode::JSLte { a, b, offset }
        | Opcode::JULt { a, b, offset }
        | Opcode::JUGte { a, b, offset }
        | Opcode::JEq { a, b, offset }
        | Opcode::JNotEq { a, b, offset } => {
            w.write_index(*a);
            w.write_index(*b);
            w.write_varint(*offset);
        }
        Opcode::JAlways { offset } => {
            w.write_varint(*offset);
        }
        Opcode::Label => {}

        Opcode::Ret { reg } | Opcode::Throw { reg } | Opcode::Rethrow { reg } | Opcode::NullCheck { reg } => {
            w.write_index(*reg);
        }

        Opcode::Switch { reg, offsets, end } => {
            w.write_index(*reg);
            w.write_index(offsets.len() as u32);
            for &o in offsets {
                w.write_varint(o);
            }
            w.write_varint(*end);
        }

        Opcode::Trap { dst, offset } => {
            w.write_index(*dst);
            w.write_varint(*offset);
        }

        Opcode::GetI8 { dst, bytes, index }
        | Opcode::GetI16 { dst, bytes, index }
        | Opcode::GetMem { dst, bytes, index } => {
            w.write_index(*dst);
            w.write_index(*bytes);
            w.write_index(*index);
        }
        Opcode::GetArray { dst, array, index } => {
            w.write_index(*dst);
            w.write_index(*array);
            w.write_index(*index);
        }
        Opcode::SetI8 { bytes, index, src } | Opcode::SetI16 { bytes, index, src } | Opcode::SetMem { bytes, index, src } => {
            w.write_index(*bytes);
            w.write_index(*index);
            w.write_index(*src);
        }
        Opcode::SetArray { array, index, src } => {
            w.write_index(*array);
            w.write_index(*index);
            w.write_index(*src);
        }

        Opcode::ArraySize { dst, array } => {
            w.write_index(*dst);
            w.write_index(*array);
        }

        Opcode::Setref { dst, value } => {
            w.write_index(*dst);
            w.write_index(*value);
        }

        Opcode::MakeEnum { dst, construct_idx, args } => {
            w.write_index(*dst);
            w.write_index(*construct_idx);
            write_args(w, args);
        }
        Opcode::EnumIndex { dst, value } => {
            w.write_index(*dst);
            w.write_index(*value);
        }
        Opcode::EnumField { dst, value, construct_idx, field_idx } => {
            w.write_index(*dst);
            w.write_index(*value);
            w.write_index(*construct_idx);
            w.write_index(*field_idx);
        }
        Opcode::SetEnumField { value, field_idx, src } => {
            w.write_index(*value);
            w.write_index(*field_idx);
            w.write_index(*src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(op: &Opcode, version: u8) {
        let mut w = Writer::new();
        write_opcode(&mut w, op);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let back = read_opcode(&mut r, version).unwrap();
        assert_eq!(&back, op);
    }

    #[test]
    fn fixed_arity_roundtrip() {
        roundtrip(&Opcode::Mov { dst: 1, src: 2 }, 5);
        roundtrip(&Opcode::Add { dst: 0, a: 1, b: 2 }, 5);
        roundtrip(&Opcode::Ret { reg: 3 }, 5);
        roundtrip(&Opcode::Label, 5);
        roundtrip(&Opcode::JAlways { offset: -7 }, 5);
    }

    #[test]
    fn variadic_call_roundtrip() {
        roundtrip(
            &Opcode::CallN { dst: 0, fun: 3, args: vec![1, 2, 3, 4, 5] },
            5,
        );
        roundtrip(&Opcode::CallN { dst: 0, fun: 3, args: vec![] }, 5);
    }

    #[test]
    fn switch_roundtrip() {
        roundtrip(
            &Opcode::Switch { reg: 0, offsets: vec![1, 2, -3], end: 4 },
            5,
        );
    }

    #[test]
    fn trap_region_roundtrip() {
        roundtrip(&Opcode::Trap { dst: 2, offset: 10 }, 5);
        roundtrip(&Opcode::EndTrap { dst: 2 }, 5);
    }

    #[test]
    fn unknown_tag_reports_offset() {
        let bytes = [250u8, 0, 0];
        let mut r = Reader::new(&bytes);
        let err = read_opcode(&mut r, 5).unwrap_err();
        match err {
            DecodeError::UnsupportedOpcode { tag, offset } => {
                assert_eq!(tag, 250);
                assert_eq!(offset, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn is_terminator_classifies_jumps_and_returns() {
        assert!(Opcode::JAlways { offset: 0 }.is_terminator());
        assert!(Opcode::Ret { reg: 0 }.is_terminator());
        assert!(!Opcode::Mov { dst: 0, src: 1 }.is_terminator());
    }
}
