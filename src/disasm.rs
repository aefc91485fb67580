//! Raw disassembly listing (spec.md §6.3 `disasm_of`): one line per op in
//! program order, registers and pool references resolved inline. Unlike
//! `ir::emit`, this operates directly on `Function::ops` — no CFG, no
//! lifting, no structure recovery — so it stays readable even for a
//! function the lifter can't fully structure.

use std::fmt::Write as _;

use crate::function::Function;
use crate::ir::emit::{signature, type_name};
use crate::module::Module;
use crate::opcode::Opcode;
use crate::types::Type;

/// Renders `function`'s signature, register table, and raw op list
/// (spec.md §6.3, SPEC_FULL.md §3 "Display/introspection surface").
#[must_use]
pub fn disasm(module: &Module, function: &Function) -> String {
    let mut out = String::new();
    let (args, ret) = signature(module, function);
    let params = args
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("arg{i}: {}", type_name(module, *ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "function f@{}({params}): {}", function.findex, type_name(module, ret));

    let _ = writeln!(out, "registers:");
    for (reg, ty) in function.regs.iter().enumerate() {
        let _ = writeln!(out, "    r{reg}: {}", type_name(module, *ty));
    }

    let _ = writeln!(out, "ops:");
    for (pc, op) in function.ops.iter().enumerate() {
        let _ = writeln!(out, "    {pc:>4}: {}", format_op(module, function, pc, op));
    }
    out
}

fn reg_list(args: &[u32]) -> String {
    format!("[{}]", args.iter().map(|r| format!("r{r}")).collect::<Vec<_>>().join(", "))
}

fn field_name(module: &Module, function: &Function, obj: u32, field_idx: u32) -> String {
    let obj_ty = function.reg_type(obj).unwrap_or(u32::MAX);
    if let Some(Type::Obj(o) | Type::Struct(o)) = module.types.get(obj_ty as usize) {
        if let Some(field) = o.fields.get(field_idx as usize) {
            if let Some(name) = module.strings.get(field.name as usize) {
                return name.clone();
            }
        }
    }
    format!("field_{field_idx}")
}

/// Jump offsets are relative to the op *after* the jump (spec.md §3.4):
/// `pc + 1 + offset` is the target.
fn jump_target(pc: usize, offset: i32) -> i64 {
    (pc + 1) as i64 + offset as i64
}

/// Resolves a single opcode's operands into a readable `Mnemonic a=.. b=..`
/// line, pulling the referenced constant or field name out of its pool
/// where that makes the line self-explanatory (spec.md §3.2 pools, §3.4
/// opcode catalog).
fn format_op(module: &Module, function: &Function, pc: usize, op: &Opcode) -> String {
    let name = op.name();
    match op {
        Opcode::Int { dst, ptr } => {
            let value = module.ints.get(*ptr as usize).copied().unwrap_or(0);
            format!("{name} dst=r{dst} ptr={ptr}  ; {value}")
        }
        Opcode::Float { dst, ptr } => {
            let value = module.floats.get(*ptr as usize).copied().unwrap_or(0.0);
            format!("{name} dst=r{dst} ptr={ptr}  ; {value}")
        }
        Opcode::StringConst { dst, ptr } => {
            let value = module.strings.get(*ptr as usize).cloned().unwrap_or_default();
            format!("{name} dst=r{dst} ptr={ptr}  ; {value:?}")
        }
        Opcode::Bool { dst, value } => format!("{name} dst=r{dst} value={value}"),
        Opcode::Bytes { dst, ptr } => format!("{name} dst=r{dst} ptr={ptr}"),
        Opcode::Null { dst } | Opcode::New { dst } | Opcode::Incr { dst } | Opcode::Decr { dst } => {
            format!("{name} dst=r{dst}")
        }
        Opcode::Mov { dst, src }
        | Opcode::Neg { dst, src }
        | Opcode::Not { dst, src }
        | Opcode::Ref { dst, src }
        | Opcode::Unref { dst, src }
        | Opcode::GetType { dst, src }
        | Opcode::GetTID { dst, src }
        | Opcode::ToDyn { dst, src }
        | Opcode::ToSFloat { dst, src }
        | Opcode::ToUFloat { dst, src }
        | Opcode::ToInt { dst, src }
        | Opcode::SafeCast { dst, src }
        | Opcode::UnsafeCast { dst, src }
        | Opcode::ToVirtual { dst, src } => format!("{name} dst=r{dst} src=r{src}"),
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
        | Opcode::Xor { dst, a, b } => format!("{name} dst=r{dst} a=r{a} b=r{b}"),
        Opcode::Call0 { dst, fun } => format!("{name} dst=r{dst} fun=f@{fun}"),
        Opcode::Call1 { dst, fun, arg0 } => format!("{name} dst=r{dst} fun=f@{fun} arg0=r{arg0}"),
        Opcode::Call2 { dst, fun, arg0, arg1 } => {
            format!("{name} dst=r{dst} fun=f@{fun} arg0=r{arg0} arg1=r{arg1}")
        }
        Opcode::Call3 { dst, fun, arg0, arg1, arg2 } => {
            format!("{name} dst=r{dst} fun=f@{fun} arg0=r{arg0} arg1=r{arg1} arg2=r{arg2}")
        }
        Opcode::Call4 { dst, fun, arg0, arg1, arg2, arg3 } => {
            format!("{name} dst=r{dst} fun=f@{fun} arg0=r{arg0} arg1=r{arg1} arg2=r{arg2} arg3=r{arg3}")
        }
        Opcode::CallN { dst, fun, args } => format!("{name} dst=r{dst} fun=f@{fun} args={}", reg_list(args)),
        Opcode::CallMethod { dst, field_idx, args } => {
            format!("{name} dst=r{dst} field_idx={field_idx} args={}", reg_list(args))
        }
        Opcode::CallThis { dst, field_idx, args } => {
            format!("{name} dst=r{dst} field_idx={field_idx} args={}", reg_list(args))
        }
        Opcode::CallClosure { dst, closure, args } => {
            format!("{name} dst=r{dst} closure=r{closure} args={}", reg_list(args))
        }
        Opcode::StaticClosure { dst, fun } => format!("{name} dst=r{dst} fun=f@{fun}"),
        Opcode::InstanceClosure { dst, fun, obj } => format!("{name} dst=r{dst} fun=f@{fun} obj=r{obj}"),
        Opcode::VirtualClosure { dst, obj, field_idx } => {
            format!("{name} dst=r{dst} obj=r{obj} field_idx={field_idx}")
        }
        Opcode::GetGlobal { dst, global_idx } => format!("{name} dst=r{dst} global_idx={global_idx}"),
        Opcode::SetGlobal { global_idx, src } => format!("{name} global_idx={global_idx} src=r{src}"),
        Opcode::Field { dst, obj, field_idx } => {
            format!("{name} dst=r{dst} obj=r{obj} field={}", field_name(module, function, *obj, *field_idx))
        }
        Opcode::SetField { obj, field_idx, src } => format!(
            "{name} obj=r{obj} field={} src=r{src}",
            field_name(module, function, *obj, *field_idx)
        ),
        Opcode::GetThis { dst, field_idx } => {
            format!("{name} dst=r{dst} field={}", field_name(module, function, 0, *field_idx))
        }
        Opcode::SetThis { field_idx, src } => {
            format!("{name} field={} src=r{src}", field_name(module, function, 0, *field_idx))
        }
        Opcode::DynGet { dst, obj, name: name_idx } => {
            let field = module.strings.get(*name_idx as usize).cloned().unwrap_or_default();
            format!("{name} dst=r{dst} obj=r{obj} name={field:?}")
        }
        Opcode::DynSet { obj, name: name_idx, src } => {
            let field = module.strings.get(*name_idx as usize).cloned().unwrap_or_default();
            format!("{name} obj=r{obj} name={field:?} src=r{src}")
        }
        Opcode::JTrue { cond, offset } | Opcode::JFalse { cond, offset } => {
            format!("{name} cond=r{cond} -> pc{}", jump_target(pc, *offset))
        }
        Opcode::JNull { cond, offset } | Opcode::JNotNull { cond, offset } => {
            format!("{name} cond=r{cond} -> pc{}", jump_target(pc, *offset))
        }
        Opcode::JSLt { a, b, offset }
        | Opcode::JSGte { a, b, offset }
        | Opcode::JSGt { a, b, offset }
        | Opcode::JSLte { a, b, offset }
        | Opcode::JULt { a, b, offset }
        | Opcode::JUGte { a, b, offset }
        | Opcode::JEq { a, b, offset }
        | Opcode::JNotEq { a, b, offset } => format!("{name} a=r{a} b=r{b} -> pc{}", jump_target(pc, *offset)),
        Opcode::JAlways { offset } => format!("{name} -> pc{}", jump_target(pc, *offset)),
        Opcode::Label => name.to_string(),
        Opcode::Ret { reg } | Opcode::Throw { reg } | Opcode::Rethrow { reg } => format!("{name} reg=r{reg}"),
        Opcode::Switch { reg, offsets, end } => {
            let cases = offsets
                .iter()
                .enumerate()
                .map(|(i, o)| format!("{i}:pc{}", jump_target(pc, *o)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{name} reg=r{reg} cases=[{cases}] default=pc{}", jump_target(pc, *end))
        }
        Opcode::Trap { dst, offset } => format!("{name} dst=r{dst} handler=pc{}", jump_target(pc, *offset)),
        Opcode::EndTrap { dst } => format!("{name} dst=r{dst}"),
        Opcode::NullCheck { reg } => format!("{name} reg=r{reg}"),
        Opcode::GetI8 { dst, bytes, index }
        | Opcode::GetI16 { dst, bytes, index }
        | Opcode::GetMem { dst, bytes, index }
        | Opcode::GetArray { dst, array: bytes, index } => format!("{name} dst=r{dst} src=r{bytes} index=r{index}"),
        Opcode::SetI8 { bytes, index, src }
        | Opcode::SetI16 { bytes, index, src }
        | Opcode::SetMem { bytes, index, src }
        | Opcode::SetArray { array: bytes, index, src } => format!("{name} dst=r{bytes} index=r{index} src=r{src}"),
        Opcode::ArraySize { dst, array } => format!("{name} dst=r{dst} array=r{array}"),
        Opcode::Setref { dst, value } => format!("{name} dst=r{dst} value=r{value}"),
        Opcode::MakeEnum { dst, construct_idx, args } => {
            format!("{name} dst=r{dst} construct_idx={construct_idx} args={}", reg_list(args))
        }
        Opcode::EnumIndex { dst, value } => format!("{name} dst=r{dst} value=r{value}"),
        Opcode::EnumField { dst, value, construct_idx, field_idx } => {
            format!("{name} dst=r{dst} value=r{value} construct_idx={construct_idx} field_idx={field_idx}")
        }
        Opcode::SetEnumField { value, field_idx, src } => {
            format!("{name} value=r{value} field_idx={field_idx} src=r{src}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleFlags;
    use crate::pool::BytesPool;

    fn module_with(ints: Vec<i32>, types: Vec<Type>) -> Module {
        Module {
            version: 5,
            flags: ModuleFlags::empty(),
            ints,
            floats: vec![],
            strings: vec![],
            bytes: BytesPool::default(),
            debug_files: vec![],
            types,
            globals: vec![],
            natives: vec![],
            functions: vec![],
            constants: vec![],
            entrypoint: 0,
            width_hints: None,
        }
    }

    #[test]
    fn int_constant_shows_resolved_value() {
        let module = module_with(vec![42], vec![Type::Fun(crate::types::FunType { args: vec![], ret: 0 }), Type::I32]);
        let function = Function {
            findex: 3,
            type_idx: 0,
            regs: vec![1],
            ops: vec![Opcode::Int { dst: 0, ptr: 0 }, Opcode::Ret { reg: 0 }],
            debug_info: None,
            assigns: None,
        };
        let out = disasm(&module, &function);
        assert!(out.contains("function f@3("));
        assert!(out.contains("OInt dst=r0 ptr=0  ; 42") || out.contains("Int dst=r0 ptr=0  ; 42"));
    }

    #[test]
    fn backward_jump_resolves_to_an_earlier_pc() {
        let module = module_with(vec![], vec![Type::Void]);
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![],
            ops: vec![Opcode::Label, Opcode::JAlways { offset: -2 }],
            debug_info: None,
            assigns: None,
        };
        let out = disasm(&module, &function);
        assert!(out.contains("-> pc0"));
    }
}
