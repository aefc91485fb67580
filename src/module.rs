//! The top-level module container: header, pools, types, globals, natives,
//! functions, constants, entrypoint (spec.md §3.1, §6.1). This is the
//! crate's bit-exact boundary: `serialize(parse(bytes))` must reproduce
//! `bytes` exactly for any module that was not mutated in between.

use bitflags::bitflags;

use crate::error::{DecodeError, RefKind};
use crate::function::{read_function, write_function, Function};
use crate::pool::{read_bytes_pool, read_string_pool, write_bytes_pool, write_string_pool, BytesPool};
use crate::types::{check_type_refs, read_type, write_type, Type};
use crate::varint::{Reader, VarIntWidth, Writer};

const MAGIC: [u8; 3] = *b"HLB";

bitflags! {
    /// Module-level flags from the header (spec.md §6.1). Only
    /// `HAS_DEBUG` is defined by the format; unknown bits are preserved
    /// verbatim on re-emit rather than rejected, since a future bytecode
    /// version may define more.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModuleFlags: u32 {
        const HAS_DEBUG = 1 << 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Native {
    pub lib_name_idx: u32,
    pub name_idx: u32,
    pub type_idx: u32,
    pub findex: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub global_idx: u32,
    pub fields: Vec<u32>,
}

/// A fully parsed HashLink module (spec.md §3.1).
///
/// Derives `Clone` but implements `PartialEq` by hand, not `Eq`:
/// `floats: Vec<f64>` makes total equality meaningless here anyway (NaN),
/// and the hand-written impl also excludes `width_hints`, which is wire
/// encoding metadata rather than module data (see that field's docs).
#[derive(Debug, Clone)]
pub struct Module {
    pub version: u8,
    pub flags: ModuleFlags,
    pub ints: Vec<i32>,
    pub floats: Vec<f64>,
    pub strings: Vec<String>,
    pub bytes: BytesPool,
    pub debug_files: Vec<String>,
    pub types: Vec<Type>,
    pub globals: Vec<u32>,
    pub natives: Vec<Native>,
    pub functions: Vec<Function>,
    pub constants: Vec<Constant>,
    pub entrypoint: u32,
    /// The on-wire width of every VarInt read during `parse`, in read
    /// order, so `serialize` can reproduce a non-minimal encoding instead
    /// of re-emitting everything at minimal width (spec.md §4.1, §8's
    /// round-trip property). `None` for a hand-built `Module` — those
    /// always serialize minimally, same as before this field existed.
    pub width_hints: Option<Vec<VarIntWidth>>,
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.flags == other.flags
            && self.ints == other.ints
            && self.floats == other.floats
            && self.strings == other.strings
            && self.bytes == other.bytes
            && self.debug_files == other.debug_files
            && self.types == other.types
            && self.globals == other.globals
            && self.natives == other.natives
            && self.functions == other.functions
            && self.constants == other.constants
            && self.entrypoint == other.entrypoint
    }
}

impl Module {
    #[must_use]
    pub fn function(&self, findex: u32) -> Option<&Function> {
        self.functions.iter().find(|f| f.findex == findex)
    }

    #[must_use]
    pub fn has_debug_info(&self) -> bool {
        self.flags.contains(ModuleFlags::HAS_DEBUG)
    }

    /// Validates every index recorded in the module against the pool or
    /// table it addresses (spec.md §3.1's invariant). Called after parse;
    /// exposed for callers who hand-build or mutate a `Module`.
    pub fn validate_references(&self) -> Result<(), DecodeError> {
        let ntypes = self.types.len();
        for ty in &self.types {
            check_type_refs(ty, ntypes)?;
        }
        for &g in &self.globals {
            check_index(g, ntypes, RefKind::Type)?;
        }
        for native in &self.natives {
            check_index(native.lib_name_idx, self.strings.len(), RefKind::String)?;
            check_index(native.name_idx, self.strings.len(), RefKind::String)?;
            check_index(native.type_idx, ntypes, RefKind::Type)?;
        }
        for f in &self.functions {
            check_index(f.type_idx, ntypes, RefKind::Type)?;
            for &r in &f.regs {
                check_index(r, ntypes, RefKind::Type)?;
            }
        }
        Ok(())
    }
}

fn check_index(idx: u32, limit: usize, kind: RefKind) -> Result<(), DecodeError> {
    if idx as usize >= limit {
        return Err(DecodeError::InvalidReference {
            kind,
            index: idx as i64,
            limit,
        });
    }
    Ok(())
}

fn read_natives(r: &mut Reader<'_>, count: usize) -> Result<Vec<Native>, DecodeError> {
    let mut natives = Vec::with_capacity(count);
    for _ in 0..count {
        natives.push(Native {
            lib_name_idx: r.read_index()?,
            name_idx: r.read_index()?,
            type_idx: r.read_index()?,
            findex: r.read_index()?,
        });
    }
    Ok(natives)
}

fn write_natives(w: &mut Writer, natives: &[Native]) {
    for n in natives {
        w.write_index(n.lib_name_idx);
        w.write_index(n.name_idx);
        w.write_index(n.type_idx);
        w.write_index(n.findex);
    }
}

fn read_constants(r: &mut Reader<'_>, count: usize) -> Result<Vec<Constant>, DecodeError> {
    let mut constants = Vec::with_capacity(count);
    for _ in 0..count {
        let global_idx = r.read_index()?;
        let nfields = r.read_index()? as usize;
        let mut fields = Vec::with_capacity(nfields);
        for _ in 0..nfields {
            fields.push(r.read_index()?);
        }
        constants.push(Constant { global_idx, fields });
    }
    Ok(constants)
}

fn write_constants(w: &mut Writer, constants: &[Constant]) {
    for c in constants {
        w.write_index(c.global_idx);
        w.write_index(c.fields.len() as u32);
        for &f in &c.fields {
            w.write_index(f);
        }
    }
}

/// Parses a complete module from `bytes` (spec.md §4.2, §6.1).
pub fn parse(bytes: &[u8]) -> Result<Module, DecodeError> {
    let mut r = Reader::new(bytes);

    let magic: [u8; 3] = r.read_bytes(3)?.try_into().unwrap();
    if magic != MAGIC {
        return Err(DecodeError::MalformedInput {
            offset: 0,
            reason: "bad magic, expected HLB",
        });
    }
    let version = r.read_u8()?;
    if version < 4 {
        return Err(DecodeError::MalformedInput {
            offset: r.offset(),
            reason: "unsupported module version (minimum 4)",
        });
    }
    let flags = ModuleFlags::from_bits_truncate(r.read_index()?);

    let nints = r.read_index()? as usize;
    let nfloats = r.read_index()? as usize;
    let nstrings = r.read_index()? as usize;
    let nbytes = if version >= 5 { r.read_index()? as usize } else { 0 };
    let ntypes = r.read_index()? as usize;
    let nglobals = r.read_index()? as usize;
    let nnatives = r.read_index()? as usize;
    let nfunctions = r.read_index()? as usize;
    let nconstants = if version >= 4 { r.read_index()? as usize } else { 0 };

    let entrypoint = r.read_index()?;

    let mut ints = Vec::with_capacity(nints);
    for _ in 0..nints {
        ints.push(r.read_i32_le()?);
    }
    let mut floats = Vec::with_capacity(nfloats);
    for _ in 0..nfloats {
        floats.push(r.read_f64_le()?);
    }
    let strings = read_string_pool(&mut r, nstrings)?;
    let bytes_pool = if version >= 5 {
        read_bytes_pool(&mut r, nbytes)?
    } else {
        BytesPool::default()
    };
    let debug_files = if flags.contains(ModuleFlags::HAS_DEBUG) {
        let ndebug = r.read_index()? as usize;
        read_string_pool(&mut r, ndebug)?
    } else {
        Vec::new()
    };

    let mut types = Vec::with_capacity(ntypes);
    for _ in 0..ntypes {
        types.push(read_type(&mut r)?);
    }

    let mut globals = Vec::with_capacity(nglobals);
    for _ in 0..nglobals {
        globals.push(r.read_index()?);
    }

    let natives = read_natives(&mut r, nnatives)?;

    let mut functions = Vec::with_capacity(nfunctions);
    for _ in 0..nfunctions {
        functions.push(read_function(&mut r, version, flags.contains(ModuleFlags::HAS_DEBUG))?);
    }

    let constants = read_constants(&mut r, nconstants)?;

    let width_hints = Some(r.take_widths());

    Ok(Module {
        version,
        flags,
        ints,
        floats,
        strings,
        bytes: bytes_pool,
        debug_files,
        types,
        globals,
        natives,
        functions,
        constants,
        entrypoint,
        width_hints,
    })
}

/// Serializes `module` back to bytes (spec.md §4.2). Every index recorded
/// during parsing is preserved; no reordering takes place.
#[must_use]
pub fn serialize(module: &Module) -> Vec<u8> {
    let mut w = match &module.width_hints {
        Some(widths) => Writer::with_widths(widths.clone()),
        None => Writer::new(),
    };
    w.write_bytes(&MAGIC);
    w.write_u8(module.version);
    w.write_index(module.flags.bits());

    w.write_index(module.ints.len() as u32);
    w.write_index(module.floats.len() as u32);
    w.write_index(module.strings.len() as u32);
    if module.version >= 5 {
        w.write_index(module.bytes.positions.len() as u32);
    }
    w.write_index(module.types.len() as u32);
    w.write_index(module.globals.len() as u32);
    w.write_index(module.natives.len() as u32);
    w.write_index(module.functions.len() as u32);
    if module.version >= 4 {
        w.write_index(module.constants.len() as u32);
    }

    w.write_index(module.entrypoint);

    for &i in &module.ints {
        w.write_i32_le(i);
    }
    for &f in &module.floats {
        w.write_f64_le(f);
    }
    write_string_pool(&mut w, &module.strings);
    if module.version >= 5 {
        write_bytes_pool(&mut w, &module.bytes);
    }
    if module.flags.contains(ModuleFlags::HAS_DEBUG) {
        w.write_index(module.debug_files.len() as u32);
        write_string_pool(&mut w, &module.debug_files);
    }

    for ty in &module.types {
        write_type(&mut w, ty);
    }

    for &g in &module.globals {
        w.write_index(g);
    }

    write_natives(&mut w, &module.natives);

    for f in &module.functions {
        write_function(&mut w, f);
    }

    write_constants(&mut w, &module.constants);

    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    fn empty_module(version: u8) -> Module {
        Module {
            version,
            flags: ModuleFlags::empty(),
            ints: vec![],
            floats: vec![],
            strings: vec![],
            bytes: BytesPool::default(),
            debug_files: vec![],
            types: vec![Type::Void],
            globals: vec![],
            natives: vec![],
            functions: vec![Function {
                findex: 0,
                type_idx: 0,
                regs: vec![0],
                ops: vec![Opcode::Ret { reg: 0 }],
                debug_info: None,
                assigns: None,
            }],
            constants: vec![],
            entrypoint: 0,
            width_hints: None,
        }
    }

    #[test]
    fn empty_module_roundtrips_v5() {
        let m = empty_module(5);
        let bytes = serialize(&m);
        let back = parse(&bytes).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn empty_module_roundtrips_v4() {
        let m = empty_module(4);
        let bytes = serialize(&m);
        let back = parse(&bytes).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn module_with_pools_and_debug_roundtrips() {
        let mut m = empty_module(5);
        m.ints = vec![10, -5, 0];
        m.floats = vec![1.5, -2.25];
        m.strings = vec!["a".into(), "bb".into()];
        m.bytes = BytesPool {
            blob: b"hello".to_vec(),
            positions: vec![0, 2],
        };
        m.flags = ModuleFlags::HAS_DEBUG;
        m.debug_files = vec!["main.hx".into()];
        m.functions[0].debug_info = Some(vec![crate::function::DebugPos { file_idx: 0, line: 1 }]);
        m.functions[0].assigns = Some(vec![]);

        let bytes = serialize(&m);
        let back = parse(&bytes).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let err = parse(b"XXX\x05").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput { .. }));
    }

    #[test]
    fn validate_references_catches_bad_global() {
        let mut m = empty_module(5);
        m.globals.push(99);
        assert!(m.validate_references().is_err());
    }
}
