//! Control-flow graph construction: leader-set computation, basic blocks,
//! typed edges, trap region tracking, and the dominance / post-dominance
//! trees the IR lifter needs for structure recovery (spec.md §3.5, §4.4,
//! §4.5.1).

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::opcode::Opcode;

pub type BlockId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Unconditional,
    True,
    False,
    Switch(usize),
    TrapCatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: BlockId,
    pub to: BlockId,
    pub kind: EdgeKind,
}

/// A maximal straight-line run of ops, `[start_pc, end_pc)` (spec.md §3.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub id: BlockId,
    pub start_pc: usize,
    pub end_pc: usize,
    /// `false` when no edge (other than the synthetic entry) reaches this
    /// block; it is still built and kept, never dropped (spec.md §4.4.1).
    pub reachable: bool,
}

impl BasicBlock {
    #[must_use]
    pub fn ops<'a>(&self, all_ops: &'a [Opcode]) -> &'a [Opcode] {
        &all_ops[self.start_pc..self.end_pc]
    }
}

/// A protected range guarded by an exception handler (spec.md §3.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapRegion {
    pub start_pc: usize,
    pub end_pc: usize,
    pub handler_pc: usize,
    pub dst_reg: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cfg {
    pub blocks: Vec<BasicBlock>,
    pub edges: Vec<Edge>,
    pub trap_regions: Vec<TrapRegion>,
}

impl Cfg {
    #[must_use]
    pub fn block_at(&self, pc: usize) -> Option<BlockId> {
        self.blocks
            .iter()
            .position(|b| pc >= b.start_pc && pc < b.end_pc)
    }

    #[must_use]
    pub fn successors(&self, block: BlockId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.from == block).collect()
    }

    #[must_use]
    pub fn predecessors(&self, block: BlockId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.to == block).collect()
    }
}

fn jump_target(pc: usize, offset: i32) -> usize {
    ((pc + 1) as i64 + offset as i64) as usize
}

fn compute_leaders(ops: &[Opcode]) -> BTreeSet<usize> {
    let mut leaders = BTreeSet::new();
    leaders.insert(0);
    for (pc, op) in ops.iter().enumerate() {
        match op {
            Opcode::Label => {
                leaders.insert(pc);
            }
            Opcode::Switch { offsets, end, .. } => {
                for &off in offsets {
                    leaders.insert(jump_target(pc, off));
                }
                leaders.insert(jump_target(pc, *end));
                if pc + 1 < ops.len() {
                    leaders.insert(pc + 1);
                }
            }
            Opcode::Trap { offset, .. } => {
                leaders.insert(jump_target(pc, *offset));
                // Split the protected range onto its own block boundary so
                // `Stmt::Try`'s body/tail can be resolved at block
                // granularity (see `ir::lifter::resolve_trap_regions`).
                if pc + 1 < ops.len() {
                    leaders.insert(pc + 1);
                }
            }
            Opcode::EndTrap { .. } => {
                if pc + 1 < ops.len() {
                    leaders.insert(pc + 1);
                }
            }
            Opcode::Ret { .. } | Opcode::Throw { .. } | Opcode::Rethrow { .. } => {
                if pc + 1 < ops.len() {
                    leaders.insert(pc + 1);
                }
            }
            _ => {
                if let Some(offset) = op.jump_offset() {
                    leaders.insert(jump_target(pc, offset));
                    if pc + 1 < ops.len() {
                        leaders.insert(pc + 1);
                    }
                }
            }
        }
    }
    leaders
}

fn collect_trap_regions(ops: &[Opcode]) -> Vec<TrapRegion> {
    let mut stack: Vec<(usize, usize, u32)> = Vec::new();
    let mut regions = Vec::new();
    for (pc, op) in ops.iter().enumerate() {
        match op {
            Opcode::Trap { dst, offset } => {
                stack.push((pc + 1, jump_target(pc, *offset), *dst));
            }
            Opcode::EndTrap { .. } => {
                if let Some((start_pc, handler_pc, dst_reg)) = stack.pop() {
                    regions.push(TrapRegion {
                        start_pc,
                        end_pc: pc,
                        handler_pc,
                        dst_reg,
                    });
                }
            }
            _ => {}
        }
    }
    regions
}

/// Builds the control-flow graph for a function's op list (spec.md §4.4).
#[must_use]
pub fn build_cfg(ops: &[Opcode]) -> Cfg {
    if ops.is_empty() {
        return Cfg {
            blocks: Vec::new(),
            edges: Vec::new(),
            trap_regions: Vec::new(),
        };
    }

    let leaders: Vec<usize> = compute_leaders(ops).into_iter().collect();
    let mut blocks = Vec::with_capacity(leaders.len());
    for (i, &start) in leaders.iter().enumerate() {
        let end = leaders.get(i + 1).copied().unwrap_or(ops.len());
        blocks.push(BasicBlock {
            id: i,
            start_pc: start,
            end_pc: end,
            reachable: false,
        });
    }

    let pc_to_block = |pc: usize| -> BlockId {
        blocks
            .iter()
            .position(|b| pc >= b.start_pc && pc < b.end_pc)
            .unwrap_or(blocks.len() - 1)
    };

    let mut edges = Vec::new();
    for block in &blocks {
        let last_pc = block.end_pc - 1;
        let last_op = &ops[last_pc];
        let next_block = block.id + 1;
        match last_op {
            Opcode::JAlways { offset } => {
                edges.push(Edge {
                    from: block.id,
                    to: pc_to_block(jump_target(last_pc, *offset)),
                    kind: EdgeKind::Unconditional,
                });
            }
            Opcode::Ret { .. } | Opcode::Throw { .. } | Opcode::Rethrow { .. } => {}
            Opcode::Switch { offsets, end, .. } => {
                for (case_idx, &off) in offsets.iter().enumerate() {
                    edges.push(Edge {
                        from: block.id,
                        to: pc_to_block(jump_target(last_pc, off)),
                        kind: EdgeKind::Switch(case_idx),
                    });
                }
                edges.push(Edge {
                    from: block.id,
                    to: pc_to_block(jump_target(last_pc, *end)),
                    kind: EdgeKind::Unconditional,
                });
            }
            _ => {
                if let Some(offset) = last_op.jump_offset() {
                    let target = jump_target(last_pc, offset);
                    let fallthrough = last_pc + 1;
                    if target == fallthrough {
                        // tie-break: branch-to-fallthrough collapses to one edge (spec.md §4.4)
                        edges.push(Edge {
                            from: block.id,
                            to: pc_to_block(fallthrough),
                            kind: EdgeKind::Unconditional,
                        });
                    } else {
                        edges.push(Edge {
                            from: block.id,
                            to: pc_to_block(target),
                            kind: EdgeKind::True,
                        });
                        edges.push(Edge {
                            from: block.id,
                            to: pc_to_block(fallthrough),
                            kind: EdgeKind::False,
                        });
                    }
                } else if next_block < blocks.len() {
                    edges.push(Edge {
                        from: block.id,
                        to: next_block,
                        kind: EdgeKind::Unconditional,
                    });
                }
            }
        }
    }

    let trap_regions = collect_trap_regions(ops);
    for region in &trap_regions {
        let handler_block = pc_to_block(region.handler_pc);
        let mut covered = HashSet::new();
        for block in &blocks {
            if block.start_pc < region.end_pc && block.end_pc > region.start_pc {
                covered.insert(block.id);
            }
        }
        for block_id in covered {
            edges.push(Edge {
                from: block_id,
                to: handler_block,
                kind: EdgeKind::TrapCatch,
            });
        }
    }

    mark_reachable(&mut blocks, &edges);

    Cfg {
        blocks,
        edges,
        trap_regions,
    }
}

fn mark_reachable(blocks: &mut [BasicBlock], edges: &[Edge]) {
    if blocks.is_empty() {
        return;
    }
    let mut succ: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
    for e in edges {
        succ.entry(e.from).or_default().push(e.to);
    }
    let mut seen = HashSet::new();
    let mut stack = vec![0usize];
    seen.insert(0usize);
    while let Some(b) = stack.pop() {
        for &s in succ.get(&b).into_iter().flatten() {
            if seen.insert(s) {
                stack.push(s);
            }
        }
    }
    for block in blocks.iter_mut() {
        block.reachable = seen.contains(&block.id);
    }
}

/// Dominator tree: `dom[b]` is the immediate dominator of block `b`, or
/// `None` for the entry block (spec.md §4.5.1, §8 "Dominance").
#[must_use]
pub fn dominators(cfg: &Cfg) -> Vec<Option<BlockId>> {
    compute_dominance(cfg, false)
}

/// Post-dominator tree: dominance computed over the CFG with every edge
/// reversed (spec.md §4.5.1), used for conditional-region recognition.
#[must_use]
pub fn post_dominators(cfg: &Cfg) -> Vec<Option<BlockId>> {
    compute_dominance(cfg, true)
}

fn compute_dominance(cfg: &Cfg, reversed: bool) -> Vec<Option<BlockId>> {
    let n = cfg.blocks.len();
    if n == 0 {
        return Vec::new();
    }
    let preds_of = |b: BlockId| -> Vec<BlockId> {
        if reversed {
            cfg.successors(b).iter().map(|e| e.to).collect()
        } else {
            cfg.predecessors(b).iter().map(|e| e.from).collect()
        }
    };
    // the root for post-dominance is conceptually "all exit blocks"; we
    // approximate with the highest-indexed block, which is always the
    // function's terminal block under this builder's leader ordering.
    let root: BlockId = if reversed { n - 1 } else { 0 };

    // reverse postorder over the (possibly reversed) graph from root
    let succs_of = |b: BlockId| -> Vec<BlockId> {
        if reversed {
            cfg.predecessors(b).iter().map(|e| e.from).collect()
        } else {
            cfg.successors(b).iter().map(|e| e.to).collect()
        }
    };
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root, false)];
    while let Some((b, expanded)) = stack.pop() {
        if expanded {
            order.push(b);
            continue;
        }
        if !visited.insert(b) {
            continue;
        }
        stack.push((b, true));
        for s in succs_of(b) {
            if !visited.contains(&s) {
                stack.push((s, false));
            }
        }
    }
    order.reverse();
    let rpo_index: HashMap<BlockId, usize> =
        order.iter().enumerate().map(|(i, &b)| (b, i)).collect();

    let mut idom: Vec<Option<BlockId>> = vec![None; n];
    idom[root] = Some(root);
    let mut changed = true;
    while changed {
        changed = false;
        for &b in &order {
            if b == root {
                continue;
            }
            let mut preds: Vec<BlockId> = preds_of(b)
                .into_iter()
                .filter(|p| idom[*p].is_some())
                .collect();
            preds.sort_by_key(|p| rpo_index.get(p).copied().unwrap_or(usize::MAX));
            let Some(&first) = preds.first() else {
                continue;
            };
            let mut new_idom = first;
            for &p in &preds[1..] {
                new_idom = intersect(&idom, &rpo_index, new_idom, p);
            }
            if idom[b] != Some(new_idom) {
                idom[b] = Some(new_idom);
                changed = true;
            }
        }
    }
    idom[root] = None;
    idom
}

fn intersect(
    idom: &[Option<BlockId>],
    rpo_index: &HashMap<BlockId, usize>,
    mut a: BlockId,
    mut b: BlockId,
) -> BlockId {
    while a != b {
        while rpo_index.get(&a).unwrap_or(&usize::MAX) > rpo_index.get(&b).unwrap_or(&usize::MAX) {
            a = idom[a].unwrap_or(a);
        }
        while rpo_index.get(&b).unwrap_or(&usize::MAX) > rpo_index.get(&a).unwrap_or(&usize::MAX) {
            b = idom[b].unwrap_or(b);
        }
    }
    a
}

/// `true` if `a` dominates `b` in the given dominator tree.
#[must_use]
pub fn dominates(idom: &[Option<BlockId>], a: BlockId, b: BlockId) -> bool {
    if a == b {
        return true;
    }
    let mut cur = b;
    while let Some(p) = idom[cur] {
        if p == a {
            return true;
        }
        if p == cur {
            break;
        }
        cur = p;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_is_one_block() {
        let ops = vec![
            Opcode::Int { dst: 0, ptr: 0 },
            Opcode::Incr { dst: 0 },
            Opcode::Ret { reg: 0 },
        ];
        let cfg = build_cfg(&ops);
        assert_eq!(cfg.blocks.len(), 1);
        assert!(cfg.edges.is_empty());
        assert!(cfg.blocks[0].reachable);
    }

    #[test]
    fn if_else_diamond_has_four_blocks() {
        // 0: JSGt a,b -> else (pc 2)
        // 1: JAlways -> end (pc 3)
        // 2: (else body, falls through)
        // 3: Ret
        let ops = vec![
            Opcode::JSGt { a: 0, b: 1, offset: 1 }, // pc0 -> target pc2
            Opcode::JAlways { offset: 1 },          // pc1 -> target pc3
            Opcode::Mov { dst: 2, src: 1 },         // pc2
            Opcode::Ret { reg: 2 },                 // pc3
        ];
        let cfg = build_cfg(&ops);
        assert_eq!(cfg.blocks.len(), 4);
        let true_edges: Vec<_> = cfg.edges.iter().filter(|e| e.kind == EdgeKind::True).collect();
        assert_eq!(true_edges.len(), 1);
        assert_eq!(true_edges[0].to, cfg.block_at(2).unwrap());
    }

    #[test]
    fn unreachable_block_is_flagged_not_dropped() {
        let ops = vec![
            Opcode::Ret { reg: 0 }, // pc0, terminator -> pc1 becomes a leader
            Opcode::Mov { dst: 0, src: 1 }, // pc1: unreachable dead code
            Opcode::Ret { reg: 0 }, // pc2
        ];
        let cfg = build_cfg(&ops);
        assert_eq!(cfg.blocks.len(), 2);
        assert!(cfg.blocks[0].reachable);
        assert!(!cfg.blocks[1].reachable);
    }

    #[test]
    fn trap_region_adds_catch_edge() {
        let ops = vec![
            Opcode::Trap { dst: 0, offset: 2 }, // pc0, handler at pc3
            Opcode::Int { dst: 1, ptr: 0 },     // pc1, protected
            Opcode::EndTrap { dst: 0 },         // pc2
            Opcode::Ret { reg: 1 },             // pc3 handler + tail
        ];
        let cfg = build_cfg(&ops);
        assert_eq!(cfg.trap_regions.len(), 1);
        assert_eq!(cfg.trap_regions[0].start_pc, 1);
        assert_eq!(cfg.trap_regions[0].end_pc, 2);
        let catch_edges: Vec<_> = cfg
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::TrapCatch)
            .collect();
        assert!(!catch_edges.is_empty());
    }

    #[test]
    fn loop_header_dominates_body_and_back_edge() {
        // 0: header: JSGte z,5 -> exit(pc3)
        // 1: body
        // 2: JAlways -> header(pc0)
        // 3: exit Ret
        let ops = vec![
            Opcode::JSGte { a: 0, b: 1, offset: 2 }, // pc0 -> pc3
            Opcode::Incr { dst: 0 },                 // pc1
            Opcode::JAlways { offset: -3 },          // pc2 -> pc0
            Opcode::Ret { reg: 0 },                  // pc3
        ];
        let cfg = build_cfg(&ops);
        let idom = dominators(&cfg);
        let header = cfg.block_at(0).unwrap();
        let body = cfg.block_at(1).unwrap();
        assert!(dominates(&idom, header, body));
    }
}
