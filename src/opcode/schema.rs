//! The opcode tag catalog: stable integer tags, names, and the minimum
//! module version at which each tag is valid (spec.md §6.2, §9's
//! version-sensitive-opcode open question).
//!
//! Kept as a single `#[repr(u8)]` enum plus a `min_version` table rather
//! than scattering version checks through the codec, so that adding a tag
//! touches exactly this file and the schema dispatch in `opcode::mod`
//! (spec.md §9, "adding a new opcode requires touching exactly...").

use num_enum::TryFromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum OpTag {
    Mov = 0,
    Int = 1,
    Float = 2,
    Bool = 3,
    Bytes = 4,
    StringConst = 5,
    Null = 6,
    Add = 7,
    Sub = 8,
    Mul = 9,
    SDiv = 10,
    UDiv = 11,
    SMod = 12,
    UMod = 13,
    Shl = 14,
    SShr = 15,
    UShr = 16,
    And = 17,
    Or = 18,
    Xor = 19,
    Neg = 20,
    Not = 21,
    Incr = 22,
    Decr = 23,
    Call0 = 24,
    Call1 = 25,
    Call2 = 26,
    Call3 = 27,
    Call4 = 28,
    CallN = 29,
    CallMethod = 30,
    CallThis = 31,
    CallClosure = 32,
    StaticClosure = 33,
    InstanceClosure = 34,
    VirtualClosure = 35,
    GetGlobal = 36,
    SetGlobal = 37,
    Field = 38,
    SetField = 39,
    GetThis = 40,
    SetThis = 41,
    DynGet = 42,
    DynSet = 43,
    JTrue = 44,
    JFalse = 45,
    JNull = 46,
    JNotNull = 47,
    JSLt = 48,
    JSGte = 49,
    JSGt = 50,
    JSLte = 51,
    JULt = 52,
    JUGte = 53,
    JEq = 54,
    JNotEq = 55,
    JAlways = 56,
    Label = 57,
    Ret = 58,
    Throw = 59,
    Rethrow = 60,
    Switch = 61,
    Trap = 62,
    EndTrap = 63,
    NullCheck = 64,
    GetI8 = 65,
    GetI16 = 66,
    GetMem = 67,
    GetArray = 68,
    SetI8 = 69,
    SetI16 = 70,
    SetMem = 71,
    SetArray = 72,
    New = 73,
    ArraySize = 74,
    GetType = 75,
    GetTID = 76,
    Ref = 77,
    Unref = 78,
    Setref = 79,
    MakeEnum = 80,
    EnumIndex = 81,
    EnumField = 82,
    SetEnumField = 83,
    ToDyn = 84,
    ToSFloat = 85,
    ToUFloat = 86,
    ToInt = 87,
    SafeCast = 88,
    UnsafeCast = 89,
    ToVirtual = 90,
}

impl OpTag {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mov => "Mov",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::Bytes => "Bytes",
            Self::StringConst => "String",
            Self::Null => "Null",
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::SDiv => "SDiv",
            Self::UDiv => "UDiv",
            Self::SMod => "SMod",
            Self::UMod => "UMod",
            Self::Shl => "Shl",
            Self::SShr => "SShr",
            Self::UShr => "UShr",
            Self::And => "And",
            Self::Or => "Or",
            Self::Xor => "Xor",
            Self::Neg => "Neg",
            Self::Not => "Not",
            Self::Incr => "Incr",
            Self::Decr => "Decr",
            Self::Call0 => "Call0",
            Self::Call1 => "Call1",
            Self::Call2 => "Call2",
            Self::Call3 => "Call3",
            Self::Call4 => "Call4",
            Self::CallN => "CallN",
            Self::CallMethod => "CallMethod",
            Self::CallThis => "CallThis",
            Self::CallClosure => "CallClosure",
            Self::StaticClosure => "StaticClosure",
            Self::InstanceClosure => "InstanceClosure",
            Self::VirtualClosure => "VirtualClosure",
            Self::GetGlobal => "GetGlobal",
            Self::SetGlobal => "SetGlobal",
            Self::Field => "Field",
            Self::SetField => "SetField",
            Self::GetThis => "GetThis",
            Self::SetThis => "SetThis",
            Self::DynGet => "DynGet",
            Self::DynSet => "DynSet",
            Self::JTrue => "JTrue",
            Self::JFalse => "JFalse",
            Self::JNull => "JNull",
            Self::JNotNull => "JNotNull",
            Self::JSLt => "JSLt",
            Self::JSGte => "JSGte",
            Self::JSGt => "JSGt",
            Self::JSLte => "JSLte",
            Self::JULt => "JULt",
            Self::JUGte => "JUGte",
            Self::JEq => "JEq",
            Self::JNotEq => "JNotEq",
            Self::JAlways => "JAlways",
            Self::Label => "Label",
            Self::Ret => "Ret",
            Self::Throw => "Throw",
            Self::Rethrow => "Rethrow",
            Self::Switch => "Switch",
            Self::Trap => "Trap",
            Self::EndTrap => "EndTrap",
            Self::NullCheck => "NullCheck",
            Self::GetI8 => "GetI8",
            Self::GetI16 => "GetI16",
            Self::GetMem => "GetMem",
            Self::GetArray => "GetArray",
            Self::SetI8 => "SetI8",
            Self::SetI16 => "SetI16",
            Self::SetMem => "SetMem",
            Self::SetArray => "SetArray",
            Self::New => "New",
            Self::ArraySize => "ArraySize",
            Self::GetType => "GetType",
            Self::GetTID => "GetTID",
            Self::Ref => "Ref",
            Self::Unref => "Unref",
            Self::Setref => "Setref",
            Self::MakeEnum => "MakeEnum",
            Self::EnumIndex => "EnumIndex",
            Self::EnumField => "EnumField",
            Self::SetEnumField => "SetEnumField",
            Self::ToDyn => "ToDyn",
            Self::ToSFloat => "ToSFloat",
            Self::ToUFloat => "ToUFloat",
            Self::ToInt => "ToInt",
            Self::SafeCast => "SafeCast",
            Self::UnsafeCast => "UnsafeCast",
            Self::ToVirtual => "ToVirtual",
        }
    }

    /// Minimum module version this tag is valid at. Everything here is
    /// version 4 except `bytes` pool support and its `Bytes` opcode, which
    /// the module header itself gates on version ≥ 5 (spec.md §6.1).
    #[must_use]
    pub fn min_version(&self) -> u8 {
        match self {
            Self::Bytes => 5,
            _ => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_round_trips_through_its_byte() {
        for raw in 0u8..=90 {
            let tag = OpTag::try_from_primitive(raw).unwrap();
            assert_eq!(tag as u8, raw);
        }
    }

    #[test]
    fn unknown_byte_is_rejected() {
        assert!(OpTag::try_from_primitive(200).is_err());
    }

    #[test]
    fn bytes_opcode_is_version_gated() {
        assert_eq!(OpTag::Bytes.min_version(), 5);
        assert_eq!(OpTag::Mov.min_version(), 4);
    }
}
