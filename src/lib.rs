//! `hl-core`: a bit-exact codec, CFG builder, and decompiler pipeline for
//! HashLink bytecode (the binary program format emitted by the Haxe
//! compiler targeting the HashLink VM).
//!
//! The crate is organized the way the format itself is layered:
//!
//! - [`varint`] / [`pool`] — the primitive wire encodings every other
//!   module reads and writes through.
//! - [`types`] / [`function`] / [`module`] — the data model (spec.md §3.1-3.3)
//!   and its bit-exact parse/serialize pair.
//! - [`opcode`] — the closed instruction set (spec.md §3.4, §6.2).
//! - [`cfg`] — control-flow graph construction and dominance (spec.md §3.5).
//! - [`ir`] — the two-phase lifter, the optimizer pipeline, and pseudo-code
//!   emission (spec.md §3.6, §4.5-4.7).
//! - [`disasm`] — a flat, CFG-free textual listing of a function's opcodes.
//!
//! Six free functions make up the programmatic surface (spec.md §6.3):
//! [`parse`], [`serialize`], [`cfg_of`], [`ir_of`], [`pseudo_of`], and
//! [`disasm_of`]. Each is a thin wrapper composing the lower-level module
//! functions, in the style of the teacher's `Bitcode::new`/`Bitcode::parse`
//! entry points.

pub mod cfg;
pub mod disasm;
pub mod error;
pub mod function;
pub mod ir;
pub mod module;
pub mod opcode;
pub mod pool;
pub mod types;
pub mod varint;

pub use cfg::Cfg;
pub use error::{CoreError, CoreResult, DecodeError, DecodeResult};
pub use function::Function;
pub use ir::Block as IrBlock;
pub use module::Module;
pub use opcode::Opcode;

/// Parses a complete `.hl` module from its on-disk byte layout (spec.md §6.1).
pub fn parse(bytes: &[u8]) -> DecodeResult<Module> {
    module::parse(bytes)
}

/// Serializes a module back to its on-disk byte layout. Bit-exact for any
/// module that was parsed and not subsequently mutated (spec.md §8's
/// round-trip property).
#[must_use]
pub fn serialize(module: &Module) -> Vec<u8> {
    module::serialize(module)
}

fn find_function<'m>(module: &'m Module, findex: u32) -> CoreResult<&'m Function> {
    module.function(findex).ok_or(CoreError::InvalidFunctionIndex(findex))
}

/// Builds the control-flow graph for one function, including trap regions
/// and the dominator/post-dominator trees (spec.md §4.4).
pub fn cfg_of(module: &Module, findex: u32) -> CoreResult<Cfg> {
    let function = find_function(module, findex)?;
    Ok(cfg::build_cfg(&function.ops))
}

/// Lifts one function to the optimized IR: the Phase A/Phase B lifter
/// (`ir::lifter::lift_function`) followed by the full seven-pass optimizer
/// pipeline (`ir::optimize::optimize`), in that fixed order (spec.md §4.5,
/// §4.6).
pub fn ir_of(module: &Module, findex: u32) -> CoreResult<IrBlock> {
    let function = find_function(module, findex)?;
    let lifted = ir::lifter::lift_function(module, function);
    Ok(ir::optimize::optimize(module, function, lifted))
}

/// Renders one function as pseudo-code (spec.md §4.7). Always produces
/// output, even for functions where structure recovery fell back to
/// `PrimitiveJump` or left opcodes `Untranslated` — those render as comments
/// rather than failing the whole function.
pub fn pseudo_of(module: &Module, findex: u32) -> CoreResult<String> {
    let function = find_function(module, findex)?;
    let block = ir_of(module, findex)?;
    Ok(ir::emit::emit(module, function, &block))
}

/// Renders a flat, CFG-free textual disassembly of one function: its
/// signature, register table, and opcode listing (spec.md §6.3).
pub fn disasm_of(module: &Module, findex: u32) -> CoreResult<String> {
    let function = find_function(module, findex)?;
    Ok(disasm::disasm(module, function))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ModuleFlags, Native};
    use crate::pool::BytesPool;
    use crate::types::Type;

    fn empty_module() -> Module {
        Module {
            version: 4,
            flags: ModuleFlags::empty(),
            ints: vec![],
            floats: vec![],
            strings: vec![],
            bytes: BytesPool::default(),
            debug_files: vec![],
            types: vec![Type::Void],
            globals: vec![],
            natives: Vec::<Native>::new(),
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
    fn parse_serialize_round_trips_an_empty_module() {
        let module = empty_module();
        let bytes = serialize(&module);
        let reparsed = parse(&bytes).expect("parse of freshly serialized module");
        assert_eq!(reparsed, module);
    }

    #[test]
    fn missing_function_index_reports_invalid_function_index() {
        let module = empty_module();
        let err = cfg_of(&module, 999).unwrap_err();
        match err {
            CoreError::InvalidFunctionIndex(findex) => assert_eq!(findex, 999),
            other => panic!("unexpected error: {other}"),
        }
        assert!(ir_of(&module, 999).is_err());
        assert!(pseudo_of(&module, 999).is_err());
        assert!(disasm_of(&module, 999).is_err());
    }

    #[test]
    fn programmatic_surface_covers_a_trivial_function() {
        let module = empty_module();
        cfg_of(&module, 0).expect("cfg_of");
        ir_of(&module, 0).expect("ir_of");
        let pseudo = pseudo_of(&module, 0).expect("pseudo_of");
        assert!(pseudo.contains("return"));
        disasm_of(&module, 0).expect("disasm_of");
    }
}
