//! Pseudo-code emitter (spec.md §4.7): walks the final, optimized IR and
//! prints an indented pseudo-Haxe listing. Every node has *some* printable
//! form — `Stmt::Untranslated`/`PrimitiveJump` degrade to a comment rather
//! than fail, keeping the output always syntactically valid.

use std::fmt::Write as _;

use crate::function::Function;
use crate::module::Module;
use crate::types::Type;

use super::{ArithOp, Block, CallTarget, CmpOp, ConstValue, Expr, LoopShape, Stmt};

const INDENT: &str = "    ";

/// Renders `function` (already lifted and optimized into `block`) as a
/// pseudo-code listing (spec.md §4.7, §8 end-to-end scenario 1).
#[must_use]
pub fn emit(module: &Module, function: &Function, block: &Block) -> String {
    let mut out = String::new();
    let (args, ret) = signature(module, function);
    let params = args
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("arg{i}: {}", type_name(module, *ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "function f@{}({params}): {} {{", function.findex, type_name(module, ret));
    emit_block(module, block, 1, &mut out);
    out.push_str("}\n");
    out
}

/// Resolves the function's argument types and return type from its
/// `Fun`/`Method` type entry; falls back to `Void` for a malformed index
/// rather than panicking — display code never needs to be infallible.
pub(crate) fn signature(module: &Module, function: &Function) -> (Vec<u32>, u32) {
    match module.types.get(function.type_idx as usize).and_then(Type::as_fun) {
        Some(fun) => (fun.args.clone(), fun.ret),
        None => (Vec::new(), 0),
    }
}

pub(crate) fn type_name(module: &Module, ty: u32) -> String {
    match module.types.get(ty as usize) {
        Some(Type::Void) => "Void".to_string(),
        Some(Type::U8) => "U8".to_string(),
        Some(Type::U16) => "U16".to_string(),
        Some(Type::I32) => "Int".to_string(),
        Some(Type::I64) => "I64".to_string(),
        Some(Type::F32) => "Single".to_string(),
        Some(Type::F64) => "Float".to_string(),
        Some(Type::Bool) => "Bool".to_string(),
        Some(Type::Bytes) => "Bytes".to_string(),
        Some(Type::Dyn) => "Dynamic".to_string(),
        Some(Type::Array) => "Array".to_string(),
        Some(Type::Obj(o) | Type::Struct(o)) => module
            .strings
            .get(o.name as usize)
            .cloned()
            .unwrap_or_else(|| format!("obj_{ty}")),
        Some(Type::Enum(e)) => module
            .strings
            .get(e.name as usize)
            .cloned()
            .unwrap_or_else(|| format!("enum_{ty}")),
        Some(Type::Null(inner)) => format!("Null<{}>", type_name(module, *inner)),
        Some(Type::Ref(inner)) => format!("Ref<{}>", type_name(module, *inner)),
        Some(_) => format!("type_{ty}"),
        None => "Dynamic".to_string(),
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn emit_block(module: &Module, block: &Block, depth: usize, out: &mut String) {
    for stmt in block {
        emit_stmt(module, stmt, depth, out);
    }
}

fn emit_stmt(module: &Module, stmt: &Stmt, depth: usize, out: &mut String) {
    indent(depth, out);
    match stmt {
        Stmt::Assign { dst, src } => {
            let _ = writeln!(out, "{} = {};", format_expr(module, dst, 0), format_expr(module, src, 0));
        }
        Stmt::Expr(e) => {
            let _ = writeln!(out, "{};", format_expr(module, e, 0));
        }
        Stmt::Return(None) => out.push_str("return;\n"),
        Stmt::Return(Some(e)) => {
            let _ = writeln!(out, "return {};", format_expr(module, e, 0));
        }
        Stmt::Throw(e) => {
            let _ = writeln!(out, "throw {};", format_expr(module, e, 0));
        }
        Stmt::Conditional { cond, then_block, else_block } => {
            let _ = writeln!(out, "if ({}) {{", format_expr(module, cond, 0));
            emit_block(module, then_block, depth + 1, out);
            if else_block.is_empty() {
                indent(depth, out);
                out.push_str("}\n");
            } else {
                indent(depth, out);
                out.push_str("} else {\n");
                emit_block(module, else_block, depth + 1, out);
                indent(depth, out);
                out.push_str("}\n");
            }
        }
        Stmt::Loop { shape, cond, body, .. } => match shape {
            LoopShape::PreTested => {
                let c = cond.as_ref().map_or_else(|| "true".to_string(), |c| format_expr(module, c, 0));
                let _ = writeln!(out, "while ({c}) {{");
                emit_block(module, body, depth + 1, out);
                indent(depth, out);
                out.push_str("}\n");
            }
            LoopShape::PostTested => {
                out.push_str("do {\n");
                emit_block(module, body, depth + 1, out);
                indent(depth, out);
                let c = cond.as_ref().map_or_else(|| "true".to_string(), |c| format_expr(module, c, 0));
                let _ = writeln!(out, "}} while ({c});");
            }
            LoopShape::Infinite => {
                out.push_str("while (true) {\n");
                emit_block(module, body, depth + 1, out);
                indent(depth, out);
                out.push_str("}\n");
            }
        },
        Stmt::Break => out.push_str("break;\n"),
        Stmt::Continue => out.push_str("continue;\n"),
        Stmt::Switch { scrutinee, cases, default } => {
            let _ = writeln!(out, "switch ({}) {{", format_expr(module, scrutinee, 0));
            for (tag, body) in cases {
                indent(depth + 1, out);
                let _ = writeln!(out, "case {tag}:");
                emit_block(module, body, depth + 2, out);
            }
            if !default.is_empty() {
                indent(depth + 1, out);
                out.push_str("default:\n");
                emit_block(module, default, depth + 2, out);
            }
            indent(depth, out);
            out.push_str("}\n");
        }
        Stmt::Try { body, catches } => {
            out.push_str("try {\n");
            emit_block(module, body, depth + 1, out);
            for (reg, catch_body) in catches {
                indent(depth, out);
                let _ = writeln!(out, "}} catch (reg{reg}) {{");
                emit_block(module, catch_body, depth + 1, out);
            }
            indent(depth, out);
            out.push_str("}\n");
        }
        Stmt::PrimitiveJump { target_pc } => {
            let _ = writeln!(out, "/* goto pc_{target_pc} */;");
        }
        Stmt::Untranslated { opcode_name, pc } => {
            let _ = writeln!(out, "/* {opcode_name} @ pc_{pc} */;");
        }
    }
}

/// Binding power used to decide when a child expression needs parentheses
/// around it (spec.md §4.7: "parentheses emitted only where needed").
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Comparison { .. } => 10,
        Expr::Arithmetic { op, .. } => match op {
            ArithOp::Or => 20,
            ArithOp::Xor => 25,
            ArithOp::And => 30,
            ArithOp::Shl | ArithOp::SShr | ArithOp::UShr => 40,
            ArithOp::Add | ArithOp::Sub => 50,
            ArithOp::Mul | ArithOp::SDiv | ArithOp::UDiv | ArithOp::SMod | ArithOp::UMod => 60,
        },
        Expr::Cast { .. } => 70,
        _ => 100, // atoms: const, local, arg, field, call, new, closure, enum construct
    }
}

fn format_expr(module: &Module, expr: &Expr, parent_prec: u8) -> String {
    let prec = precedence(expr);
    let rendered = render_expr(module, expr);
    if prec < parent_prec {
        format!("({rendered})")
    } else {
        rendered
    }
}

fn render_expr(module: &Module, expr: &Expr) -> String {
    match expr {
        Expr::Const { value, .. } => render_const(value),
        Expr::Local { reg, name, .. } => name.clone().unwrap_or_else(|| format!("reg{reg}")),
        Expr::Arg { index, .. } => format!("arg{index}"),
        Expr::Field { obj, field_name, .. } => {
            format!("{}.{field_name}", format_expr(module, obj, precedence(expr)))
        }
        Expr::Arithmetic { lhs, op, rhs, .. } => {
            let prec = precedence(expr);
            format!("{} {} {}", format_expr(module, lhs, prec), op.symbol(), format_expr(module, rhs, prec + 1))
        }
        Expr::Comparison { lhs, op, rhs } => {
            let prec = precedence(expr);
            if matches!(op, CmpOp::IsNull | CmpOp::IsNotNull) {
                format!("{} {}", format_expr(module, lhs, prec + 1), op.symbol())
            } else {
                format!("{} {} {}", format_expr(module, lhs, prec + 1), op.symbol(), format_expr(module, rhs, prec + 1))
            }
        }
        Expr::Call { target, args, .. } => render_call(module, target, args),
        Expr::New { ty } => format!("new {}()", type_name(module, *ty)),
        Expr::Cast { expr: inner, target_ty, .. } => {
            format!("({}) {}", type_name(module, *target_ty), format_expr(module, inner, precedence(expr)))
        }
        Expr::Closure { findex, bound_this, .. } => match bound_this {
            Some(this) => format!("{}.fn@{findex}", format_expr(module, this, 100)),
            None => format!("fn@{findex}"),
        },
        Expr::EnumConstruct { construct_idx, args, .. } => {
            let args = args.iter().map(|a| format_expr(module, a, 0)).collect::<Vec<_>>().join(", ");
            format!("Enum#{construct_idx}({args})")
        }
    }
}

fn render_const(value: &ConstValue) -> String {
    match value {
        ConstValue::Int(v) => v.to_string(),
        ConstValue::Float(v) => v.to_string(),
        ConstValue::Bool(v) => v.to_string(),
        ConstValue::Str(v) => format!("{v:?}"),
        ConstValue::Null => "null".to_string(),
    }
}

/// `IRCall` dispatch (spec.md §4.7): `obj.method(args)` for a method
/// target, `fn@N(args)` as the static-call fallback (no class-name
/// resolution is attempted at this layer — see DESIGN.md).
fn render_call(module: &Module, target: &CallTarget, args: &[Expr]) -> String {
    let args = args.iter().map(|a| format_expr(module, a, 0)).collect::<Vec<_>>().join(", ");
    match target {
        CallTarget::Function(findex) => format!("fn@{findex}({args})"),
        CallTarget::Method { obj, field_idx } => {
            format!("{}.method_{field_idx}({args})", format_expr(module, obj, 100))
        }
        CallTarget::Closure(closure) => format!("{}({args})", format_expr(module, closure, 100)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;
    use crate::module::ModuleFlags;
    use crate::pool::BytesPool;

    fn module_with_types(types: Vec<Type>) -> Module {
        Module {
            version: 5,
            flags: ModuleFlags::empty(),
            ints: vec![],
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
    fn empty_program_emits_void_return() {
        let module = module_with_types(vec![Type::Fun(crate::types::FunType { args: vec![], ret: 1 }), Type::Void]);
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![1],
            ops: vec![],
            debug_info: None,
            assigns: None,
        };
        let out = emit(&module, &function, &vec![Stmt::Return(None)]);
        assert_eq!(out, "function f@0(): Void {\n    return;\n}\n");
    }

    #[test]
    fn conditional_without_else_omits_the_else_branch() {
        let module = module_with_types(vec![Type::Fun(crate::types::FunType { args: vec![], ret: 1 }), Type::Bool, Type::I32]);
        let function = Function { findex: 1, type_idx: 0, regs: vec![], ops: vec![], debug_info: None, assigns: None };
        let block = vec![Stmt::Conditional {
            cond: Expr::Local { reg: 0, ty: 1, name: None },
            then_block: vec![Stmt::Return(Some(Expr::Const { ty: 2, value: ConstValue::Int(1) }))],
            else_block: vec![],
        }];
        let out = emit(&module, &function, &block);
        assert!(out.contains("if (reg0) {"));
        assert!(!out.contains("else"));
    }

    #[test]
    fn arithmetic_respects_operator_precedence() {
        let module = module_with_types(vec![Type::I32]);
        let expr = Expr::Arithmetic {
            lhs: Box::new(Expr::Const { ty: 0, value: ConstValue::Int(1) }),
            op: ArithOp::Add,
            rhs: Box::new(Expr::Arithmetic {
                lhs: Box::new(Expr::Const { ty: 0, value: ConstValue::Int(2) }),
                op: ArithOp::Mul,
                rhs: Box::new(Expr::Const { ty: 0, value: ConstValue::Int(3) }),
                ty: 0,
            }),
            ty: 0,
        };
        assert_eq!(render_expr(&module, &expr), "1 + 2 * 3");
    }

    #[test]
    fn arithmetic_parenthesizes_lower_precedence_child() {
        let module = module_with_types(vec![Type::I32]);
        // (1 + 2) * 3
        let expr = Expr::Arithmetic {
            lhs: Box::new(Expr::Arithmetic {
                lhs: Box::new(Expr::Const { ty: 0, value: ConstValue::Int(1) }),
                op: ArithOp::Add,
                rhs: Box::new(Expr::Const { ty: 0, value: ConstValue::Int(2) }),
                ty: 0,
            }),
            op: ArithOp::Mul,
            rhs: Box::new(Expr::Const { ty: 0, value: ConstValue::Int(3) }),
            ty: 0,
        };
        assert_eq!(render_expr(&module, &expr), "(1 + 2) * 3");
    }

    #[test]
    fn untranslated_opcode_prints_as_a_comment() {
        let module = module_with_types(vec![Type::Void]);
        let function = Function { findex: 0, type_idx: 0, regs: vec![], ops: vec![], debug_info: None, assigns: None };
        let block = vec![Stmt::Untranslated { opcode_name: "ORef", pc: 4 }];
        let out = emit(&module, &function, &block);
        assert!(out.contains("/* ORef @ pc_4 */;"));
    }

    #[test]
    fn while_loop_prints_condition_and_body() {
        let module = module_with_types(vec![Type::Void]);
        let function = Function { findex: 0, type_idx: 0, regs: vec![], ops: vec![], debug_info: None, assigns: None };
        let block = vec![Stmt::Loop {
            shape: LoopShape::PreTested,
            label_confirmed: false,
            cond: Some(Expr::Const { ty: 0, value: ConstValue::Bool(true) }),
            body: vec![Stmt::Break],
        }];
        let out = emit(&module, &function, &block);
        assert!(out.contains("while (true) {"));
        assert!(out.contains("break;"));
    }
}
