// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! In-memory log of executed instructions
//!
//! Tracing is pay-for-use: a machine records nothing until
//! [Machine::start_trace] is called, and recording stops again at
//! [Machine::end_trace].

use std::fmt::{self, Display};

use crate::{Machine, Mode, OpCode};

/// One executed instruction, as recorded by an active [Trace]
///
/// Parameters are recorded as (raw, resolved) pairs: the integer as written
/// in the program, and the value it resolved to (for write destinations,
/// the value stored).
#[derive(Debug, Clone, PartialEq)]
pub struct TracedInstr {
    op_int: i64,
    instr_ptr: i64,
    rel_base: i64,
    opcode: OpCode,
    modes: [Mode; 3],
    params: Vec<(i64, i64)>,
}

impl TracedInstr {
    /// The actual integer of the traced instruction
    pub fn op_int(&self) -> i64 {
        self.op_int
    }

    /// The instruction pointer's position when the traced instruction was
    /// executed
    pub fn instr_ptr(&self) -> i64 {
        self.instr_ptr
    }

    /// The relative base at the time the traced instruction was executed
    pub fn rel_base(&self) -> i64 {
        self.rel_base
    }

    /// The opcode of the traced instruction
    pub fn op_code(&self) -> OpCode {
        self.opcode
    }

    /// The parameter modes of the traced instruction
    pub fn param_modes(&self) -> [Mode; 3] {
        self.modes
    }

    /// The (raw, resolved) pair for each parameter the instruction used
    pub fn params(&self) -> &[(i64, i64)] {
        &self.params
    }

    /// If the instruction stored a value in memory, the value it stored
    pub fn stored_val(&self) -> Option<i64> {
        match self.opcode {
            OpCode::Add
            | OpCode::Multiply
            | OpCode::LessThan
            | OpCode::Equals
            | OpCode::Input => self.params.last().map(|&(_, resolved)| resolved),
            _ => None,
        }
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} | {:>6} | {}",
            self.instr_ptr, self.op_int, self.opcode
        )?;
        for (i, &(raw, resolved)) in self.params.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{separator}{}{raw} => {resolved}", self.modes[i])?;
        }
        Ok(())
    }
}

/// A log of instructions executed since [Machine::start_trace]
#[derive(Debug, Default, Clone)]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

impl Machine {
    /// Begin recording executed instructions. If a trace is already running,
    /// this replaces that trace and returns it in a [`Some`]; otherwise it
    /// returns [`None`].
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop recording instructions and return the [Trace]. If no trace was
    /// active, returns [`None`].
    ///
    /// see [Machine::start_trace]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Record one executed instruction into the active trace, if any.
    /// Called before the instruction's effects are applied, so `self` still
    /// holds the pre-instruction register values.
    pub(crate) fn trace_instr(&mut self, opcode: OpCode, modes: [Mode; 3], params: &[(i64, i64)]) {
        debug_assert_eq!(params.len(), opcode.param_count());
        if let Some(trace) = self.trace.as_mut() {
            trace.0.push(TracedInstr {
                op_int: self.mem[self.ip],
                instr_ptr: self.ip,
                rel_base: self.rel_base,
                opcode,
                modes,
                params: params.to_vec(),
            });
        }
    }
}
