//! The two-phase IR lifter (spec.md §4.5): Phase A translates each basic
//! block into a flat list of statements; Phase B replaces the primitive
//! jumps between them with structured conditionals, loops, switches, and
//! try/catch by reading the CFG's shape (dominance, post-dominance, trap
//! regions). Unrecognizable shapes fall back to the flat form — readability
//! degrades, behavior never does (spec.md §4.5, §7 `StructureRecoveryFailure`).

use std::collections::{HashMap, HashSet};

use crate::cfg::{self, BasicBlock, Cfg, EdgeKind};
use crate::function::Function;
use crate::module::Module;
use crate::opcode::Opcode;
use crate::types::Type;

use super::{ArithOp, Block, CallTarget, CmpOp, ConstValue, Expr, LoopShape, Stmt};

/// Registers 0..arg_count that no opcode in the function ever writes to
/// (spec.md §3.6's `IRArg` vs `IRLocal` distinction). HashLink gives
/// argument registers the function's first N slots, so a register in that
/// range the function never reassigns is safe to read as a named argument
/// throughout its body.
fn arg_regs(module: &Module, function: &Function) -> HashSet<u32> {
    let arg_count = module
        .types
        .get(function.type_idx as usize)
        .and_then(Type::as_fun)
        .map_or(0, |f| f.args.len() as u32);
    let mut regs: HashSet<u32> = (0..arg_count).collect();
    for op in &function.ops {
        if let Some(dst) = op.dst_reg() {
            regs.remove(&dst);
        }
    }
    regs
}

fn arith_op(op: &Opcode) -> Option<ArithOp> {
    Some(match op {
        Opcode::Add { .. } => ArithOp::Add,
        Opcode::Sub { .. } => ArithOp::Sub,
        Opcode::Mul { .. } => ArithOp::Mul,
        Opcode::SDiv { .. } => ArithOp::SDiv,
        Opcode::UDiv { .. } => ArithOp::UDiv,
        Opcode::SMod { .. } => ArithOp::SMod,
        Opcode::UMod { .. } => ArithOp::UMod,
        Opcode::Shl { .. } => ArithOp::Shl,
        Opcode::SShr { .. } => ArithOp::SShr,
        Opcode::UShr { .. } => ArithOp::UShr,
        Opcode::And { .. } => ArithOp::And,
        Opcode::Or { .. } => ArithOp::Or,
        Opcode::Xor { .. } => ArithOp::Xor,
        _ => return None,
    })
}

fn cmp_op(op: &Opcode) -> Option<CmpOp> {
    Some(match op {
        Opcode::JSLt { .. } => CmpOp::SLt,
        Opcode::JSGte { .. } => CmpOp::SGte,
        Opcode::JSGt { .. } => CmpOp::SGt,
        Opcode::JSLte { .. } => CmpOp::SLte,
        Opcode::JULt { .. } => CmpOp::ULt,
        Opcode::JUGte { .. } => CmpOp::UGte,
        Opcode::JEq { .. } => CmpOp::Eq,
        Opcode::JNotEq { .. } => CmpOp::NotEq,
        _ => return None,
    })
}

struct Ctx<'m> {
    module: &'m Module,
    function: &'m Function,
    /// Argument-range registers the function never assigns to; these read
    /// as `Expr::Arg` rather than `Expr::Local` (spec.md §3.6's `IRArg` vs
    /// `IRLocal` distinction). A register the caller reassigns is no
    /// different from any other local once the function is running, so it
    /// keeps reading as `Expr::Local` throughout, including before the
    /// first reassignment.
    arg_regs: HashSet<u32>,
}

impl<'m> Ctx<'m> {
    fn reg_ty(&self, reg: u32) -> u32 {
        self.function.reg_type(reg).unwrap_or(0)
    }

    fn value(&self, reg: u32) -> Expr {
        if self.arg_regs.contains(&reg) {
            Expr::Arg { index: reg, ty: self.reg_ty(reg) }
        } else {
            Expr::Local { reg, ty: self.reg_ty(reg), name: None }
        }
    }

    fn field_name(&self, obj_ty: u32, field_idx: u32) -> String {
        if let Some(Type::Obj(o) | Type::Struct(o)) = self.module.types.get(obj_ty as usize) {
            if let Some(field) = o.fields.get(field_idx as usize) {
                if let Some(name) = self.module.strings.get(field.name as usize) {
                    return name.clone();
                }
            }
        }
        format!("field_{field_idx}")
    }

    fn const_int(&self, ptr: u32) -> ConstValue {
        ConstValue::Int(self.module.ints.get(ptr as usize).copied().unwrap_or(0))
    }

    fn const_float(&self, ptr: u32) -> ConstValue {
        ConstValue::Float(self.module.floats.get(ptr as usize).copied().unwrap_or(0.0))
    }

    fn const_string(&self, ptr: u32) -> ConstValue {
        ConstValue::Str(
            self.module
                .strings
                .get(ptr as usize)
                .cloned()
                .unwrap_or_default(),
        )
    }
}

/// A basic block's flat translation: the statements, plus — for a block
/// ending in a conditional branch — the condition expression extracted so
/// Phase B can reuse it in an `IRConditional`/`IRLoop` without re-parsing
/// the terminator.
struct FlatBlock {
    stmts: Block,
    cond: Option<Expr>,
}

fn lift_block(ctx: &Ctx<'_>, bb: &BasicBlock, ops: &[Opcode]) -> FlatBlock {
    let mut stmts = Vec::new();
    let mut cond = None;
    for (offset, op) in bb.ops(ops).iter().enumerate() {
        let pc = bb.start_pc + offset;
        let is_last = pc == bb.end_pc - 1;
        match op {
            Opcode::Label | Opcode::Trap { .. } | Opcode::EndTrap { .. } | Opcode::NullCheck { .. } => {}

            Opcode::Mov { dst, src } => stmts.push(Stmt::Assign { dst: ctx.value(*dst), src: ctx.value(*src) }),
            Opcode::Int { dst, ptr } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Const { ty: ctx.reg_ty(*dst), value: ctx.const_int(*ptr) },
            }),
            Opcode::Float { dst, ptr } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Const { ty: ctx.reg_ty(*dst), value: ctx.const_float(*ptr) },
            }),
            Opcode::Bool { dst, value } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Const { ty: ctx.reg_ty(*dst), value: ConstValue::Bool(*value) },
            }),
            Opcode::StringConst { dst, ptr } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Const { ty: ctx.reg_ty(*dst), value: ctx.const_string(*ptr) },
            }),
            Opcode::Null { dst } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Const { ty: ctx.reg_ty(*dst), value: ConstValue::Null },
            }),

            _ if arith_op(op).is_some() => {
                let (dst, a, b) = match op {
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
                    | Opcode::Xor { dst, a, b } => (*dst, *a, *b),
                    _ => unreachable!(),
                };
                stmts.push(Stmt::Assign {
                    dst: ctx.value(dst),
                    src: Expr::Arithmetic {
                        lhs: Box::new(ctx.value(a)),
                        op: arith_op(op).unwrap(),
                        rhs: Box::new(ctx.value(b)),
                        ty: ctx.reg_ty(dst),
                    },
                });
            }

            Opcode::Field { dst, obj, field_idx } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Field {
                    obj: Box::new(ctx.value(*obj)),
                    field_name: ctx.field_name(ctx.reg_ty(*obj), *field_idx),
                    ty: ctx.reg_ty(*dst),
                },
            }),
            Opcode::SetField { obj, field_idx, src } => stmts.push(Stmt::Assign {
                dst: Expr::Field {
                    obj: Box::new(ctx.value(*obj)),
                    field_name: ctx.field_name(ctx.reg_ty(*obj), *field_idx),
                    ty: ctx.reg_ty(*src),
                },
                src: ctx.value(*src),
            }),
            Opcode::GetThis { dst, field_idx } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Field {
                    obj: Box::new(ctx.value(0)),
                    field_name: ctx.field_name(ctx.reg_ty(0), *field_idx),
                    ty: ctx.reg_ty(*dst),
                },
            }),
            Opcode::SetThis { field_idx, src } => stmts.push(Stmt::Assign {
                dst: Expr::Field {
                    obj: Box::new(ctx.value(0)),
                    field_name: ctx.field_name(ctx.reg_ty(0), *field_idx),
                    ty: ctx.reg_ty(*src),
                },
                src: ctx.value(*src),
            }),

            Opcode::New { dst } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::New { ty: ctx.reg_ty(*dst) },
            }),

            Opcode::Call0 { dst, fun } => push_call(ctx, &mut stmts, *dst, CallTarget::Function(*fun), vec![]),
            Opcode::Call1 { dst, fun, arg0 } => {
                push_call(ctx, &mut stmts, *dst, CallTarget::Function(*fun), vec![*arg0])
            }
            Opcode::Call2 { dst, fun, arg0, arg1 } => {
                push_call(ctx, &mut stmts, *dst, CallTarget::Function(*fun), vec![*arg0, *arg1])
            }
            Opcode::Call3 { dst, fun, arg0, arg1, arg2 } => {
                push_call(ctx, &mut stmts, *dst, CallTarget::Function(*fun), vec![*arg0, *arg1, *arg2])
            }
            Opcode::Call4 { dst, fun, arg0, arg1, arg2, arg3 } => push_call(
                ctx,
                &mut stmts,
                *dst,
                CallTarget::Function(*fun),
                vec![*arg0, *arg1, *arg2, *arg3],
            ),
            Opcode::CallN { dst, fun, args } => {
                push_call(ctx, &mut stmts, *dst, CallTarget::Function(*fun), args.clone())
            }
            Opcode::CallMethod { dst, field_idx, args } => {
                let (obj, rest) = args.split_first().copied().map_or((0, &[][..]), |(o, r)| (o, r));
                push_call(
                    ctx,
                    &mut stmts,
                    *dst,
                    CallTarget::Method { obj: Box::new(ctx.value(obj)), field_idx: *field_idx },
                    rest.to_vec(),
                );
            }
            Opcode::CallThis { dst, field_idx, args } => push_call(
                ctx,
                &mut stmts,
                *dst,
                CallTarget::Method { obj: Box::new(ctx.value(0)), field_idx: *field_idx },
                args.clone(),
            ),
            Opcode::CallClosure { dst, closure, args } => push_call(
                ctx,
                &mut stmts,
                *dst,
                CallTarget::Closure(Box::new(ctx.value(*closure))),
                args.clone(),
            ),

            Opcode::StaticClosure { dst, fun } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Closure { findex: *fun, bound_this: None, ty: ctx.reg_ty(*dst) },
            }),
            Opcode::InstanceClosure { dst, fun, obj } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Closure {
                    findex: *fun,
                    bound_this: Some(Box::new(ctx.value(*obj))),
                    ty: ctx.reg_ty(*dst),
                },
            }),
            // field_idx-resolved virtual dispatch; optimizer pass 7 folds
            // the (GetThis/VirtualClosure, CallClosure) pair into a direct
            // method call (spec.md §4.6 item 7).
            Opcode::VirtualClosure { dst, obj, field_idx } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Call {
                    target: CallTarget::Method { obj: Box::new(ctx.value(*obj)), field_idx: *field_idx },
                    args: vec![],
                    ty: ctx.reg_ty(*dst),
                    conservative: true,
                },
            }),

            Opcode::ToSFloat { dst, src } | Opcode::ToUFloat { dst, src } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Cast {
                    expr: Box::new(ctx.value(*src)),
                    target_ty: ctx.reg_ty(*dst),
                    conservative: true,
                },
            }),
            Opcode::ToDyn { dst, src }
            | Opcode::ToInt { dst, src }
            | Opcode::SafeCast { dst, src }
            | Opcode::UnsafeCast { dst, src }
            | Opcode::ToVirtual { dst, src } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::Cast { expr: Box::new(ctx.value(*src)), target_ty: ctx.reg_ty(*dst), conservative: false },
            }),

            Opcode::MakeEnum { dst, construct_idx, args } => stmts.push(Stmt::Assign {
                dst: ctx.value(*dst),
                src: Expr::EnumConstruct {
                    construct_idx: *construct_idx,
                    args: args.iter().map(|&r| ctx.value(r)).collect(),
                    ty: ctx.reg_ty(*dst),
                },
            }),

            Opcode::Ret { reg } => {
                let void = ctx.module.types.get(ctx.reg_ty(*reg) as usize) == Some(&Type::Void);
                stmts.push(Stmt::Return(if void { None } else { Some(ctx.value(*reg)) }));
            }
            Opcode::Throw { reg } | Opcode::Rethrow { reg } => stmts.push(Stmt::Throw(ctx.value(*reg))),

            Opcode::JTrue { cond: c, .. } => cond = Some(ctx.value(*c)),
            Opcode::JFalse { cond: c, .. } => {
                cond = Some(Expr::Comparison {
                    lhs: Box::new(ctx.value(*c)),
                    op: CmpOp::Eq,
                    rhs: Box::new(Expr::Const { ty: ctx.reg_ty(*c), value: ConstValue::Bool(false) }),
                });
            }
            Opcode::JNull { cond: c, .. } => {
                cond = Some(Expr::Comparison {
                    lhs: Box::new(ctx.value(*c)),
                    op: CmpOp::IsNull,
                    rhs: Box::new(Expr::Const { ty: ctx.reg_ty(*c), value: ConstValue::Null }),
                });
            }
            Opcode::JNotNull { cond: c, .. } => {
                cond = Some(Expr::Comparison {
                    lhs: Box::new(ctx.value(*c)),
                    op: CmpOp::IsNotNull,
                    rhs: Box::new(Expr::Const { ty: ctx.reg_ty(*c), value: ConstValue::Null }),
                });
            }
            _ if cmp_op(op).is_some() => {
                let (a, b) = match op {
                    Opcode::JSLt { a, b, .. }
                    | Opcode::JSGte { a, b, .. }
                    | Opcode::JSGt { a, b, .. }
                    | Opcode::JSLte { a, b, .. }
                    | Opcode::JULt { a, b, .. }
                    | Opcode::JUGte { a, b, .. }
                    | Opcode::JEq { a, b, .. }
                    | Opcode::JNotEq { a, b, .. } => (*a, *b),
                    _ => unreachable!(),
                };
                cond = Some(Expr::Comparison {
                    lhs: Box::new(ctx.value(a)),
                    op: cmp_op(op).unwrap(),
                    rhs: Box::new(ctx.value(b)),
                });
            }
            Opcode::JAlways { .. } => {}
            Opcode::Switch { reg, .. } => cond = Some(ctx.value(*reg)),

            other => {
                if is_last && other.jump_offset().is_none() && !other.is_terminator() {
                    // not actually a terminator; falls through, nothing to record
                } else if !matches!(other, Opcode::Ret { .. } | Opcode::Throw { .. } | Opcode::Rethrow { .. }) {
                    stmts.push(Stmt::Untranslated { opcode_name: other.name(), pc });
                }
            }
        }

        if is_last {
            if let Some(offset) = op.jump_offset() {
                let target = ((pc + 1) as i64 + offset as i64) as usize;
                stmts.push(Stmt::PrimitiveJump { target_pc: target });
            }
        }
    }
    FlatBlock { stmts, cond }
}

fn push_call(ctx: &Ctx<'_>, stmts: &mut Block, dst: u32, target: CallTarget, args: Vec<u32>) {
    let call = Expr::Call {
        target,
        args: args.iter().map(|&r| ctx.value(r)).collect(),
        ty: ctx.reg_ty(dst),
        conservative: false,
    };
    let void = ctx.module.types.get(ctx.reg_ty(dst) as usize) == Some(&Type::Void);
    if void {
        stmts.push(Stmt::Expr(call));
    } else {
        stmts.push(Stmt::Assign { dst: ctx.value(dst), src: call });
    }
}

/// back-edge iff `source`'s dominator chain passes through `target`.
fn is_back_edge(dom: &[Option<cfg::BlockId>], source: cfg::BlockId, target: cfg::BlockId) -> bool {
    cfg::dominates(dom, target, source)
}

/// A trap region resolved to block granularity, keyed by the block that
/// contains the region's `start_pc` (spec.md §4.5 "Try/catch").
struct TrapInfo {
    /// Block to resume normal traversal at once both body and handler have
    /// been structured; `None` when the protected range runs to the
    /// function's end.
    end_block: Option<cfg::BlockId>,
    handler_block: cfg::BlockId,
    dst_reg: u32,
}

fn resolve_trap_regions(cfg: &Cfg) -> HashMap<cfg::BlockId, TrapInfo> {
    let mut by_entry = HashMap::new();
    for region in &cfg.trap_regions {
        let Some(entry) = cfg.block_at(region.start_pc) else { continue };
        let Some(handler_block) = cfg.block_at(region.handler_pc) else { continue };
        // `region.end_pc` is the `EndTrap` op's own pc, which the CFG
        // builder keeps in the same block as the protected range (it emits
        // no statement of its own); the tail resumes at the next leader.
        let end_block = cfg.block_at(region.end_pc + 1);
        by_entry.insert(
            entry,
            TrapInfo { end_block, handler_block, dst_reg: region.dst_reg },
        );
    }
    by_entry
}

struct Builder<'a> {
    cfg: &'a Cfg,
    ops: &'a [Opcode],
    flat: &'a HashMap<cfg::BlockId, FlatBlock>,
    dom: &'a [Option<cfg::BlockId>],
    pdom: &'a [Option<cfg::BlockId>],
    traps: &'a HashMap<cfg::BlockId, TrapInfo>,
    /// Trap entries already turned into `Stmt::Try`, so the recursive call
    /// that structures the protected body doesn't re-match its own entry
    /// block (spec.md §4.5 "Try/catch").
    consumed_traps: std::cell::RefCell<HashSet<cfg::BlockId>>,
}

impl<'a> Builder<'a> {
    /// Outgoing edges excluding `TrapCatch`: exception-handler dispatch is
    /// recovered separately as `Stmt::Try` (see `resolve_trap_regions`), not
    /// folded into ordinary conditional/switch recognition.
    fn normal_successors(&self, block: cfg::BlockId) -> Vec<&cfg::Edge> {
        self.cfg
            .successors(block)
            .into_iter()
            .filter(|e| e.kind != EdgeKind::TrapCatch)
            .collect()
    }

    fn block_stmts_without_jump(&self, id: cfg::BlockId) -> Block {
        let mut stmts = self.flat[&id].stmts.clone();
        if matches!(stmts.last(), Some(Stmt::PrimitiveJump { .. })) {
            stmts.pop();
        }
        stmts
    }

    fn build_region(
        &self,
        start: cfg::BlockId,
        stop: Option<cfg::BlockId>,
        loop_headers: &[cfg::BlockId],
        guard: &mut HashSet<cfg::BlockId>,
    ) -> Block {
        let mut out = Vec::new();
        let mut current = start;
        loop {
            if Some(current) == stop {
                break;
            }
            if !guard.insert(current) {
                // already visited on this path without hitting `stop`: an
                // irreducible or unrecognized shape. Degrade to the flat
                // fallback (spec.md §4.5, §7 StructureRecoveryFailure).
                out.push(Stmt::PrimitiveJump { target_pc: self.cfg.blocks[current].start_pc });
                break;
            }

            let is_unconsumed_trap_entry = self.traps.contains_key(&current)
                && !self.consumed_traps.borrow().contains(&current);
            if is_unconsumed_trap_entry {
                let info = &self.traps[&current];
                self.consumed_traps.borrow_mut().insert(current);
                let mut body_guard = HashSet::new();
                let body = self.build_region(current, info.end_block, loop_headers, &mut body_guard);
                let mut catch_guard = HashSet::new();
                let catch_body =
                    self.build_region(info.handler_block, info.end_block, loop_headers, &mut catch_guard);
                out.push(Stmt::Try { body, catches: vec![(info.dst_reg, catch_body)] });
                match info.end_block {
                    Some(next) => {
                        current = next;
                        continue;
                    }
                    None => break,
                }
            }

            let successors = self.normal_successors(current);
            match successors.len() {
                0 => {
                    out.extend(self.block_stmts_without_jump(current));
                    break;
                }
                1 => {
                    out.extend(self.block_stmts_without_jump(current));
                    let target = successors[0].to;
                    if loop_headers.contains(&target) && is_back_edge(self.dom, current, target) {
                        out.push(Stmt::Continue);
                        break;
                    }
                    current = target;
                }
                2 => {
                    out.extend(self.block_stmts_without_jump(current));
                    let true_edge = successors.iter().find(|e| e.kind == EdgeKind::True);
                    let false_edge = successors.iter().find(|e| e.kind == EdgeKind::False);
                    let (Some(t), Some(f)) = (true_edge, false_edge) else {
                        break;
                    };
                    let back_edge_source = self
                        .cfg
                        .predecessors(current)
                        .iter()
                        .find(|e| is_back_edge(self.dom, e.from, current))
                        .map(|e| e.from);

                    let cond = self.flat[&current].cond.clone().unwrap_or(Expr::Const {
                        ty: 0,
                        value: ConstValue::Bool(true),
                    });

                    if let Some(back_edge_source) = back_edge_source {
                        // loop header: the successor that dominates the
                        // back edge's source stays in the loop body (it's
                        // the only one with a path back to `current`); the
                        // other exits (spec.md §4.5 "Loops"). Dominance of
                        // `current` over a successor isn't enough to tell
                        // body from exit — an exit target reached only
                        // from the header is trivially dominated by it too.
                        let in_loop = cfg::dominates(self.dom, t.to, back_edge_source);
                        let (body_entry, exit) = if in_loop { (t.to, f.to) } else { (f.to, t.to) };
                        let mut loop_headers = loop_headers.to_vec();
                        loop_headers.push(current);
                        let mut body_guard = HashSet::new();
                        let body =
                            self.build_region(body_entry, Some(current), &loop_headers, &mut body_guard);
                        let label_confirmed = matches!(
                            self.ops.get(self.cfg.blocks[current].start_pc),
                            Some(Opcode::Label)
                        );
                        out.push(Stmt::Loop {
                            shape: LoopShape::PreTested,
                            label_confirmed,
                            cond: Some(cond),
                            body,
                        });
                        current = exit;
                    } else {
                        let post_dom = self.pdom[current];
                        let mut then_guard = guard.clone();
                        let then_block = self.build_region(t.to, post_dom, loop_headers, &mut then_guard);
                        let else_block = if Some(f.to) == post_dom {
                            Vec::new()
                        } else {
                            let mut else_guard = guard.clone();
                            self.build_region(f.to, post_dom, loop_headers, &mut else_guard)
                        };
                        out.push(Stmt::Conditional { cond, then_block, else_block });
                        match post_dom {
                            Some(pd) => current = pd,
                            None => break,
                        }
                    }
                }
                _ => {
                    // Switch: one Switch(case) edge per case plus one
                    // Unconditional default edge (spec.md §3.5, §4.5).
                    out.extend(self.block_stmts_without_jump(current));
                    let scrutinee = self.flat[&current].cond.clone().unwrap_or(Expr::Const {
                        ty: 0,
                        value: ConstValue::Int(0),
                    });
                    let post_dom = self.pdom[current];
                    let mut cases = Vec::new();
                    let mut default = Vec::new();
                    for edge in &successors {
                        let mut case_guard = guard.clone();
                        match edge.kind {
                            EdgeKind::Switch(idx) => {
                                let block =
                                    self.build_region(edge.to, post_dom, loop_headers, &mut case_guard);
                                cases.push((idx as i32, block));
                            }
                            EdgeKind::Unconditional => {
                                default = self.build_region(edge.to, post_dom, loop_headers, &mut case_guard);
                            }
                            _ => {}
                        }
                    }
                    out.push(Stmt::Switch { scrutinee, cases, default });
                    match post_dom {
                        Some(pd) => current = pd,
                        None => break,
                    }
                }
            }
        }
        out
    }
}

/// Lifts a function's CFG into a structured IR block (spec.md §4.5).
#[must_use]
pub fn lift_function(module: &Module, function: &Function) -> Block {
    let cfg = cfg::build_cfg(&function.ops);
    if cfg.blocks.is_empty() {
        return Vec::new();
    }
    let ctx = Ctx { module, function, arg_regs: arg_regs(module, function) };
    let mut flat = HashMap::new();
    for bb in &cfg.blocks {
        flat.insert(bb.id, lift_block(&ctx, bb, &function.ops));
    }
    let dom = cfg::dominators(&cfg);
    let pdom = cfg::post_dominators(&cfg);
    let traps = resolve_trap_regions(&cfg);
    let builder = Builder {
        cfg: &cfg,
        ops: &function.ops,
        flat: &flat,
        dom: &dom,
        pdom: &pdom,
        traps: &traps,
        consumed_traps: std::cell::RefCell::new(HashSet::new()),
    };
    let mut guard = HashSet::new();
    builder.build_region(0, None, &[], &mut guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ModuleFlags, Native};
    use crate::pool::BytesPool;

    fn base_module() -> Module {
        Module {
            version: 5,
            flags: ModuleFlags::empty(),
            ints: vec![10, 5],
            floats: vec![],
            strings: vec![],
            bytes: BytesPool::default(),
            debug_files: vec![],
            types: vec![Type::I32, Type::Void],
            globals: vec![],
            natives: Vec::<Native>::new(),
            functions: vec![],
            constants: vec![],
            entrypoint: 0,
            width_hints: None,
        }
    }

    #[test]
    fn arithmetic_scenario_lifts_to_assigns_and_return() {
        let module = base_module();
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![0, 0],
            ops: vec![
                Opcode::Int { dst: 0, ptr: 0 },   // b = 10
                Opcode::Int { dst: 1, ptr: 1 },   // tmp = 5
                Opcode::Sub { dst: 0, a: 0, b: 1 }, // b = b - tmp
                Opcode::Ret { reg: 0 },
            ],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        let assigns = block.iter().filter(|s| matches!(s, Stmt::Assign { .. })).count();
        assert_eq!(assigns, 3);
        assert!(matches!(block.last(), Some(Stmt::Return(Some(_)))));
    }

    #[test]
    fn empty_function_lifts_to_bare_return() {
        let module = base_module();
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![1],
            ops: vec![Opcode::Ret { reg: 0 }],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        assert_eq!(block, vec![Stmt::Return(None)]);
    }

    #[test]
    fn diamond_lifts_to_single_conditional() {
        let mut module = base_module();
        module.types.push(Type::I32);
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![0, 0, 0],
            ops: vec![
                Opcode::JSGt { a: 0, b: 1, offset: 1 }, // pc0
                Opcode::JAlways { offset: 1 },          // pc1
                Opcode::Mul { dst: 2, a: 0, b: 0 },     // pc2 else... wait then-branch
                Opcode::Ret { reg: 2 },                 // pc3
            ],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        assert!(block.iter().any(|s| matches!(s, Stmt::Conditional { .. })));
    }

    #[test]
    fn while_loop_lifts_to_pretested_loop() {
        // z = 0; while (z < 5) { z = z + 3 } ; return z
        let mut module = base_module();
        module.ints = vec![0, 5, 3];
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![0, 0],
            ops: vec![
                Opcode::Int { dst: 0, ptr: 0 },                // pc0: z = 0
                Opcode::JSGte { a: 0, b: 0, offset: 3 },       // pc1: header, z>=5 -> exit(pc5)
                Opcode::Int { dst: 1, ptr: 2 },                // pc2: tmp = 3
                Opcode::Add { dst: 0, a: 0, b: 1 },            // pc3: z = z + tmp
                Opcode::JAlways { offset: -4 },                // pc4: -> header(pc1)
                Opcode::Ret { reg: 0 },                        // pc5
            ],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        assert!(block.iter().any(|s| matches!(s, Stmt::Loop { shape: LoopShape::PreTested, .. })));
        assert!(matches!(block.last(), Some(Stmt::Return(Some(_)))));
    }

    #[test]
    fn label_opcode_at_loop_header_sets_label_confirmed() {
        // same shape as while_loop_lifts_to_pretested_loop, but the header
        // carries an explicit Label op (spec.md §9's open question: Label
        // corroborates a dominance-recognized loop, it doesn't drive it).
        let mut module = base_module();
        module.ints = vec![0, 5, 3];
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![0, 0],
            ops: vec![
                Opcode::Int { dst: 0, ptr: 0 },          // pc0: z = 0
                Opcode::Label,                           // pc1: loop header, back-edge target
                Opcode::JSGte { a: 0, b: 0, offset: 3 }, // pc2: z>=5 -> exit(pc6)
                Opcode::Int { dst: 1, ptr: 2 },          // pc3: tmp = 3
                Opcode::Add { dst: 0, a: 0, b: 1 },      // pc4: z = z + tmp
                Opcode::JAlways { offset: -5 },          // pc5: -> header(pc1)
                Opcode::Ret { reg: 0 },                  // pc6
            ],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        let loop_stmt = block
            .iter()
            .find(|s| matches!(s, Stmt::Loop { .. }))
            .expect("expected a Stmt::Loop");
        assert!(matches!(loop_stmt, Stmt::Loop { label_confirmed: true, .. }));
    }

    #[test]
    fn trap_region_lifts_to_try_with_one_catch() {
        // trap -> handler(pc4); protected: SDiv; endtrap; tail returns the
        // division result; the handler returns the caught value instead
        // (spec.md §8 scenario 6).
        let mut module = base_module();
        let function = Function {
            findex: 0,
            type_idx: 0,
            regs: vec![0, 0, 0],
            ops: vec![
                Opcode::Trap { dst: 2, offset: 3 },  // pc0: handler at pc4
                Opcode::SDiv { dst: 0, a: 0, b: 0 }, // pc1: protected
                Opcode::EndTrap { dst: 2 },          // pc2
                Opcode::Ret { reg: 0 },              // pc3: normal tail
                Opcode::Ret { reg: 2 },              // pc4: handler returns caught value
            ],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        let try_stmt = block
            .iter()
            .find(|s| matches!(s, Stmt::Try { .. }))
            .expect("expected a Stmt::Try");
        let Stmt::Try { body, catches } = try_stmt else { unreachable!() };
        assert!(body.iter().any(|s| matches!(s, Stmt::Assign { .. })));
        assert_eq!(catches.len(), 1);
        assert_eq!(catches[0].0, 2);
        assert!(matches!(catches[0].1.last(), Some(Stmt::Return(Some(_)))));
        assert!(block.iter().any(|s| matches!(s, Stmt::Return(Some(_)))));
    }

    #[test]
    fn unreassigned_argument_reads_as_arg_but_reassigned_one_reads_as_local() {
        // fn(a: i32, b: i32): i32 { b = b + 1; return a + b }
        // `a` (reg 0) is never a dst anywhere and lifts to Expr::Arg on every
        // read; `b` (reg 1) is reassigned at pc0 and so lifts to Expr::Local
        // even where it's read before that reassignment would matter
        // (spec.md §3.6).
        let mut module = base_module();
        module.types.push(Type::Fun(crate::types::FunType { args: vec![0, 0], ret: 0 }));
        let function = Function {
            findex: 0,
            type_idx: 2,
            regs: vec![0, 0, 0],
            ops: vec![
                Opcode::Int { dst: 2, ptr: 0 },     // pc0: tmp = 10
                Opcode::Add { dst: 1, a: 1, b: 2 }, // pc1: b = b + tmp
                Opcode::Add { dst: 2, a: 0, b: 1 }, // pc2: tmp = a + b
                Opcode::Ret { reg: 2 },              // pc3
            ],
            debug_info: None,
            assigns: None,
        };
        let block = lift_function(&module, &function);
        let reads: Vec<&Expr> = block
            .iter()
            .filter_map(|s| match s {
                Stmt::Assign { src: Expr::Arithmetic { lhs, rhs, .. }, .. } => Some(vec![lhs.as_ref(), rhs.as_ref()]),
                _ => None,
            })
            .flatten()
            .collect();
        assert!(reads.iter().any(|e| matches!(e, Expr::Arg { index: 0, .. })));
        assert!(reads.iter().any(|e| matches!(e, Expr::Local { reg: 1, .. })));
        assert!(!reads.iter().any(|e| matches!(e, Expr::Arg { index: 1, .. })));
    }
}
