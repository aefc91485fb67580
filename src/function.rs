//! Function bodies: register list, opcode list, optional debug-info stream,
//! optional per-instruction assign annotations (spec.md §3.3, §6.1).

use crate::error::DecodeError;
use crate::opcode::{read_opcode, write_opcode, Opcode};
use crate::varint::{Reader, Writer};

/// One `(name_idx, op_idx)` entry from the assigns list. `op_idx < 0` names
/// argument register `-op_idx - 1`; otherwise it names the destination
/// register of op `op_idx - 1` (spec.md §3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assign {
    pub name_idx: u32,
    pub op_idx: i32,
}

impl Assign {
    #[must_use]
    pub fn is_argument(&self) -> bool {
        self.op_idx < 0
    }

    /// Resolves to an argument register index, if this assign names one.
    #[must_use]
    pub fn argument_reg(&self) -> Option<u32> {
        self.is_argument().then(|| (-self.op_idx - 1) as u32)
    }

    /// Resolves to the producing op's index, if this assign names one.
    #[must_use]
    pub fn producing_op(&self) -> Option<usize> {
        (!self.is_argument()).then(|| (self.op_idx - 1) as usize)
    }
}

/// A single `(file_idx, line)` debug position, expanded from the run-length
/// stream onto each op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugPos {
    pub file_idx: u32,
    pub line: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub findex: u32,
    pub type_idx: u32,
    pub regs: Vec<u32>,
    pub ops: Vec<Opcode>,
    pub debug_info: Option<Vec<DebugPos>>,
    pub assigns: Option<Vec<Assign>>,
}

impl Function {
    #[must_use]
    pub fn reg_type(&self, reg: u32) -> Option<u32> {
        self.regs.get(reg as usize).copied()
    }
}

/// HashLink's debug-info encoding is a run-length stream of ops sharing the
/// same `(file_idx, line)` pair: each run is `(count: varint, file_idx:
/// varint, line: varint)`, repeated until `nops` positions are produced.
/// This module follows that shape but keeps it internal to this crate's
/// codec; callers only ever see the expanded `Vec<DebugPos>`.
fn read_debug_info(r: &mut Reader<'_>, nops: usize) -> Result<Vec<DebugPos>, DecodeError> {
    let mut positions = Vec::with_capacity(nops);
    while positions.len() < nops {
        let count = r.read_index()? as usize;
        let file_idx = r.read_index()?;
        let line = r.read_index()?;
        if count == 0 {
            return Err(DecodeError::MalformedInput {
                offset: r.offset(),
                reason: "debug info run of length zero",
            });
        }
        for _ in 0..count {
            if positions.len() == nops {
                return Err(DecodeError::MalformedInput {
                    offset: r.offset(),
                    reason: "debug info run overruns op count",
                });
            }
            positions.push(DebugPos { file_idx, line });
        }
    }
    Ok(positions)
}

fn write_debug_info(w: &mut Writer, positions: &[DebugPos]) {
    let mut i = 0;
    while i < positions.len() {
        let run_start = positions[i];
        let mut j = i + 1;
        while j < positions.len() && positions[j] == run_start {
            j += 1;
        }
        w.write_index((j - i) as u32);
        w.write_index(run_start.file_idx);
        w.write_index(run_start.line);
        i = j;
    }
}

fn read_assigns(r: &mut Reader<'_>) -> Result<Vec<Assign>, DecodeError> {
    let n = r.read_index()? as usize;
    let mut assigns = Vec::with_capacity(n);
    for _ in 0..n {
        assigns.push(Assign {
            name_idx: r.read_index()?,
            op_idx: r.read_varint()?,
        });
    }
    Ok(assigns)
}

fn write_assigns(w: &mut Writer, assigns: &[Assign]) {
    w.write_index(assigns.len() as u32);
    for a in assigns {
        w.write_index(a.name_idx);
        w.write_varint(a.op_idx);
    }
}

pub fn read_function(
    r: &mut Reader<'_>,
    version: u8,
    has_debug: bool,
) -> Result<Function, DecodeError> {
    let type_idx = r.read_index()?;
    let findex = r.read_index()?;
    let nregs = r.read_index()? as usize;
    let nops = r.read_index()? as usize;
    let mut regs = Vec::with_capacity(nregs);
    for _ in 0..nregs {
        regs.push(r.read_index()?);
    }
    let mut ops = Vec::with_capacity(nops);
    for _ in 0..nops {
        ops.push(read_opcode(r, version)?);
    }
    let debug_info = if has_debug {
        Some(read_debug_info(r, nops)?)
    } else {
        None
    };
    let assigns = if has_debug {
        Some(read_assigns(r)?)
    } else {
        None
    };
    Ok(Function {
        findex,
        type_idx,
        regs,
        ops,
        debug_info,
        assigns,
    })
}

pub fn write_function(w: &mut Writer, f: &Function) {
    w.write_index(f.type_idx);
    w.write_index(f.findex);
    w.write_index(f.regs.len() as u32);
    w.write_index(f.ops.len() as u32);
    for &r in &f.regs {
        w.write_index(r);
    }
    for op in &f.ops {
        write_opcode(w, op);
    }
    if let Some(debug_info) = &f.debug_info {
        write_debug_info(w, debug_info);
    }
    if let Some(assigns) = &f.assigns {
        write_assigns(w, assigns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_function() -> Function {
        Function {
            findex: 0,
            type_idx: 1,
            regs: vec![0, 2, 2],
            ops: vec![
                Opcode::Int { dst: 1, ptr: 0 },
                Opcode::Sub { dst: 1, a: 1, b: 2 },
                Opcode::Ret { reg: 1 },
            ],
            debug_info: None,
            assigns: None,
        }
    }

    #[test]
    fn function_without_debug_roundtrips() {
        let f = sample_function();
        let mut w = Writer::new();
        write_function(&mut w, &f);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let back = read_function(&mut r, 5, false).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn function_with_debug_and_assigns_roundtrips() {
        let mut f = sample_function();
        f.debug_info = Some(vec![
            DebugPos { file_idx: 0, line: 10 },
            DebugPos { file_idx: 0, line: 10 },
            DebugPos { file_idx: 0, line: 11 },
        ]);
        f.assigns = Some(vec![
            Assign { name_idx: 3, op_idx: -1 },
            Assign { name_idx: 4, op_idx: 1 },
        ]);
        let mut w = Writer::new();
        write_function(&mut w, &f);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let back = read_function(&mut r, 5, true).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn assign_distinguishes_argument_from_op() {
        let arg = Assign { name_idx: 0, op_idx: -1 };
        assert_eq!(arg.argument_reg(), Some(0));
        assert_eq!(arg.producing_op(), None);

        let local = Assign { name_idx: 1, op_idx: 3 };
        assert_eq!(local.argument_reg(), None);
        assert_eq!(local.producing_op(), Some(2));
    }

    #[test]
    fn debug_info_run_length_collapses_repeats() {
        let positions = vec![
            DebugPos { file_idx: 0, line: 1 },
            DebugPos { file_idx: 0, line: 1 },
            DebugPos { file_idx: 0, line: 2 },
        ];
        let mut w = Writer::new();
        write_debug_info(&mut w, &positions);
        let bytes = w.into_bytes();
        // two runs: (count=2, file=0, line=1), (count=1, file=0, line=2)
        let mut r = Reader::new(&bytes);
        let back = read_debug_info(&mut r, 3).unwrap();
        assert_eq!(back, positions);
    }
}
