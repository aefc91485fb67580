//! The HashLink type table: a closed, tag-dispatched sum type (spec.md
//! §3.2), addressed by index rather than by pointer so that the type graph
//! may contain cycles (spec.md §9 "Type cycles").
//!
//! The tag catalog follows the teacher's `schema::blocks::BlockId` idiom: a
//! `#[repr(u8)]` enum deriving `num_enum::TryFromPrimitive` so an unknown
//! byte on the wire becomes a typed decode error instead of a panic.

use num_enum::TryFromPrimitive;

use crate::error::{DecodeError, RefKind};
use crate::varint::{Reader, Writer};

/// One-byte tag identifying a `Type` variant on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum TypeTag {
    Void = 0,
    U8 = 1,
    U16 = 2,
    I32 = 3,
    I64 = 4,
    F32 = 5,
    F64 = 6,
    Bool = 7,
    Bytes = 8,
    Dyn = 9,
    Fun = 10,
    Obj = 11,
    Array = 12,
    Type = 13,
    Ref = 14,
    Virtual = 15,
    DynObj = 16,
    Abstract = 17,
    Enum = 18,
    Null = 19,
    Method = 20,
    Struct = 21,
    Packed = 22,
}

/// A named field on an object/struct type: `(name index, type index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjField {
    pub name: u32,
    pub type_idx: u32,
}

/// A virtual method table entry: `(name index, function index, proto index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proto {
    pub name: u32,
    pub findex: u32,
    pub pindex: i32,
}

/// A field override that attaches a function to a field slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub field_idx: u32,
    pub findex: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjType {
    pub name: u32,
    pub super_type: Option<u32>,
    pub global_value: Option<u32>,
    pub fields: Vec<ObjField>,
    pub protos: Vec<Proto>,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunType {
    pub args: Vec<u32>,
    pub ret: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstruct {
    pub name: u32,
    pub params: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: u32,
    pub global_value: Option<u32>,
    pub constructs: Vec<EnumConstruct>,
}

/// A HashLink type. Compound variants carry payload by index only — never
/// by reference — so the arena can hold cyclic graphs (class A refers to B
/// refers to A).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void,
    U8,
    U16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Bytes,
    Dyn,
    DynObj,
    TypeType,
    Array,
    Fun(FunType),
    Method(FunType),
    Obj(ObjType),
    Struct(ObjType),
    Ref(u32),
    Virtual(Vec<ObjField>),
    Abstract(u32),
    Enum(EnumType),
    Null(u32),
    Packed(u32),
}

impl Type {
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Void => TypeTag::Void,
            Self::U8 => TypeTag::U8,
            Self::U16 => TypeTag::U16,
            Self::I32 => TypeTag::I32,
            Self::I64 => TypeTag::I64,
            Self::F32 => TypeTag::F32,
            Self::F64 => TypeTag::F64,
            Self::Bool => TypeTag::Bool,
            Self::Bytes => TypeTag::Bytes,
            Self::Dyn => TypeTag::Dyn,
            Self::DynObj => TypeTag::DynObj,
            Self::TypeType => TypeTag::Type,
            Self::Array => TypeTag::Array,
            Self::Fun(_) => TypeTag::Fun,
            Self::Method(_) => TypeTag::Method,
            Self::Obj(_) => TypeTag::Obj,
            Self::Struct(_) => TypeTag::Struct,
            Self::Ref(_) => TypeTag::Ref,
            Self::Virtual(_) => TypeTag::Virtual,
            Self::Abstract(_) => TypeTag::Abstract,
            Self::Enum(_) => TypeTag::Enum,
            Self::Null(_) => TypeTag::Null,
            Self::Packed(_) => TypeTag::Packed,
        }
    }

    #[must_use]
    pub fn as_obj(&self) -> Option<&ObjType> {
        match self {
            Self::Obj(o) | Self::Struct(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_fun(&self) -> Option<&FunType> {
        match self {
            Self::Fun(f) | Self::Method(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

fn read_field(r: &mut Reader<'_>) -> Result<ObjField, DecodeError> {
    Ok(ObjField {
        name: r.read_index()?,
        type_idx: r.read_index()?,
    })
}

fn write_field(w: &mut Writer, f: &ObjField) {
    w.write_index(f.name);
    w.write_index(f.type_idx);
}

fn read_fun_type(r: &mut Reader<'_>) -> Result<FunType, DecodeError> {
    let nargs = r.read_index()? as usize;
    let mut args = Vec::with_capacity(nargs);
    for _ in 0..nargs {
        args.push(r.read_index()?);
    }
    let ret = r.read_index()?;
    Ok(FunType { args, ret })
}

fn write_fun_type(w: &mut Writer, f: &FunType) {
    w.write_index(f.args.len() as u32);
    for &a in &f.args {
        w.write_index(a);
    }
    w.write_index(f.ret);
}

fn read_obj_type(r: &mut Reader<'_>) -> Result<ObjType, DecodeError> {
    let name = r.read_index()?;
    let super_idx = r.read_varint()?;
    let super_type = if super_idx < 0 {
        None
    } else {
        Some(super_idx as u32)
    };
    let global_raw = r.read_index()?;
    let global_value = if global_raw == 0 {
        None
    } else {
        Some(global_raw - 1)
    };
    let nfields = r.read_index()? as usize;
    let nprotos = r.read_index()? as usize;
    let nbindings = r.read_index()? as usize;
    let mut fields = Vec::with_capacity(nfields);
    for _ in 0..nfields {
        fields.push(read_field(r)?);
    }
    let mut protos = Vec::with_capacity(nprotos);
    for _ in 0..nprotos {
        protos.push(Proto {
            name: r.read_index()?,
            findex: r.read_index()?,
            pindex: r.read_varint()?,
        });
    }
    let mut bindings = Vec::with_capacity(nbindings);
    for _ in 0..nbindings {
        bindings.push(Binding {
            field_idx: r.read_index()?,
            findex: r.read_index()?,
        });
    }
    Ok(ObjType {
        name,
        super_type,
        global_value,
        fields,
        protos,
        bindings,
    })
}

fn write_obj_type(w: &mut Writer, o: &ObjType) {
    w.write_index(o.name);
    w.write_varint(o.super_type.map_or(-1, |v| v as i32));
    w.write_index(o.global_value.map_or(0, |v| v + 1));
    w.write_index(o.fields.len() as u32);
    w.write_index(o.protos.len() as u32);
    w.write_index(o.bindings.len() as u32);
    for f in &o.fields {
        write_field(w, f);
    }
    for p in &o.protos {
        w.write_index(p.name);
        w.write_index(p.findex);
        w.write_varint(p.pindex);
    }
    for b in &o.bindings {
        w.write_index(b.field_idx);
        w.write_index(b.findex);
    }
}

fn read_enum_type(r: &mut Reader<'_>) -> Result<EnumType, DecodeError> {
    let name = r.read_index()?;
    let global_raw = r.read_index()?;
    let global_value = if global_raw == 0 {
        None
    } else {
        Some(global_raw - 1)
    };
    let nconstructs = r.read_index()? as usize;
    let mut constructs = Vec::with_capacity(nconstructs);
    for _ in 0..nconstructs {
        let cname = r.read_index()?;
        let nparams = r.read_index()? as usize;
        let mut params = Vec::with_capacity(nparams);
        for _ in 0..nparams {
            params.push(r.read_index()?);
        }
        constructs.push(EnumConstruct {
            name: cname,
            params,
        });
    }
    Ok(EnumType {
        name,
        global_value,
        constructs,
    })
}

fn write_enum_type(w: &mut Writer, e: &EnumType) {
    w.write_index(e.name);
    w.write_index(e.global_value.map_or(0, |v| v + 1));
    w.write_index(e.constructs.len() as u32);
    for c in &e.constructs {
        w.write_index(c.name);
        w.write_index(c.params.len() as u32);
        for &p in &c.params {
            w.write_index(p);
        }
    }
}

pub fn read_type(r: &mut Reader<'_>) -> Result<Type, DecodeError> {
    let offset = r.offset();
    let tag = r.read_u8()?;
    let tag = TypeTag::try_from_primitive(tag)
        .map_err(|_| DecodeError::MalformedInput {
            offset,
            reason: "unknown type tag",
        })?;
    Ok(match tag {
        TypeTag::Void => Type::Void,
        TypeTag::U8 => Type::U8,
        TypeTag::U16 => Type::U16,
        TypeTag::I32 => Type::I32,
        TypeTag::I64 => Type::I64,
        TypeTag::F32 => Type::F32,
        TypeTag::F64 => Type::F64,
        TypeTag::Bool => Type::Bool,
        TypeTag::Bytes => Type::Bytes,
        TypeTag::Dyn => Type::Dyn,
        TypeTag::DynObj => Type::DynObj,
        TypeTag::Type => Type::TypeType,
        TypeTag::Array => Type::Array,
        TypeTag::Fun => Type::Fun(read_fun_type(r)?),
        TypeTag::Method => Type::Method(read_fun_type(r)?),
        TypeTag::Obj => Type::Obj(read_obj_type(r)?),
        TypeTag::Struct => Type::Struct(read_obj_type(r)?),
        TypeTag::Ref => Type::Ref(r.read_index()?),
        TypeTag::Virtual => {
            let n = r.read_index()? as usize;
            let mut fields = Vec::with_capacity(n);
            for _ in 0..n {
                fields.push(read_field(r)?);
            }
            Type::Virtual(fields)
        }
        TypeTag::Abstract => Type::Abstract(r.read_index()?),
        TypeTag::Enum => Type::Enum(read_enum_type(r)?),
        TypeTag::Null => Type::Null(r.read_index()?),
        TypeTag::Packed => Type::Packed(r.read_index()?),
    })
}

pub fn write_type(w: &mut Writer, ty: &Type) {
    w.write_u8(ty.tag() as u8);
    match ty {
        Type::Void
        | Type::U8
        | Type::U16
        | Type::I32
        | Type::I64
        | Type::F32
        | Type::F64
        | Type::Bool
        | Type::Bytes
        | Type::Dyn
        | Type::DynObj
        | Type::TypeType
        | Type::Array => {}
        Type::Fun(f) | Type::Method(f) => write_fun_type(w, f),
        Type::Obj(o) | Type::Struct(o) => write_obj_type(w, o),
        Type::Ref(idx) => w.write_index(*idx),
        Type::Virtual(fields) => {
            w.write_index(fields.len() as u32);
            for f in fields {
                write_field(w, f);
            }
        }
        Type::Abstract(idx) => w.write_index(*idx),
        Type::Enum(e) => write_enum_type(w, e),
        Type::Null(idx) | Type::Packed(idx) => w.write_index(*idx),
    }
}

/// Validate that every index a type refers to is in range for `ntypes`.
pub fn check_type_refs(ty: &Type, ntypes: usize) -> Result<(), DecodeError> {
    let check = |idx: u32| -> Result<(), DecodeError> {
        if idx as usize >= ntypes {
            return Err(DecodeError::InvalidReference {
                kind: RefKind::Type,
                index: idx as i64,
                limit: ntypes,
            });
        }
        Ok(())
    };
    match ty {
        Type::Fun(f) | Type::Method(f) => {
            for &a in &f.args {
                check(a)?;
            }
            check(f.ret)?;
        }
        Type::Obj(o) | Type::Struct(o) => {
            if let Some(s) = o.super_type {
                check(s)?;
            }
            for field in &o.fields {
                check(field.type_idx)?;
            }
        }
        Type::Ref(idx) | Type::Abstract(idx) | Type::Null(idx) | Type::Packed(idx) => {
            check(*idx)?;
        }
        Type::Virtual(fields) => {
            for field in fields {
                check(field.type_idx)?;
            }
        }
        Type::Enum(e) => {
            for c in &e.constructs {
                for &p in &c.params {
                    check(p)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_roundtrip() {
        for ty in [Type::Void, Type::I32, Type::F64, Type::Bool, Type::Bytes] {
            let mut w = Writer::new();
            write_type(&mut w, &ty);
            let bytes = w.into_bytes();
            let mut r = Reader::new(&bytes);
            assert_eq!(read_type(&mut r).unwrap(), ty);
        }
    }

    #[test]
    fn fun_type_roundtrip() {
        let ty = Type::Fun(FunType {
            args: vec![1, 2, 3],
            ret: 0,
        });
        let mut w = Writer::new();
        write_type(&mut w, &ty);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(read_type(&mut r).unwrap(), ty);
    }

    #[test]
    fn obj_type_roundtrip_with_cycle() {
        // a type that refers to its own index, as object graphs with
        // A -> B -> A cycles do at the index level.
        let ty = Type::Obj(ObjType {
            name: 4,
            super_type: Some(0),
            global_value: Some(2),
            fields: vec![ObjField {
                name: 5,
                type_idx: 0,
            }],
            protos: vec![Proto {
                name: 6,
                findex: 1,
                pindex: -1,
            }],
            bindings: vec![],
        });
        let mut w = Writer::new();
        write_type(&mut w, &ty);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(read_type(&mut r).unwrap(), ty);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let bytes = [200u8];
        let mut r = Reader::new(&bytes);
        assert!(read_type(&mut r).is_err());
    }
}
