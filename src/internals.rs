// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Instruction-level execution: parameter resolution and the shared bodies
//! of the arithmetic, comparison, and jump opcodes

use crate::decode::decode;
use crate::{Fault, Machine, Mode, OpCode, State, StepOutcome};

impl Machine {
    /// Resolve the parameter at `offset` cells past the instruction pointer
    /// to the value it reads, according to `mode`.
    pub(crate) fn resolve_param(&self, mode: Mode, offset: i64) -> Result<i64, Fault> {
        let raw = self.mem.read(self.ip + offset)?;
        match mode {
            Mode::Position => self.mem.read(raw),
            Mode::Immediate => Ok(raw),
            Mode::Relative => self.mem.read(raw + self.rel_base),
        }
    }

    /// Resolve the parameter at `offset` cells past the instruction pointer
    /// to the address it writes. Immediate destinations are a fault, as are
    /// destinations below address 0.
    pub(crate) fn resolve_dest(&self, mode: Mode, offset: i64) -> Result<i64, Fault> {
        let raw = self.mem.read(self.ip + offset)?;
        match mode {
            Mode::Position if raw < 0 => Err(Fault::InvalidAddress(raw)),
            Mode::Position => Ok(raw),
            Mode::Relative if raw + self.rel_base < 0 => {
                Err(Fault::InvalidAddress(raw + self.rel_base))
            }
            Mode::Relative => Ok(raw + self.rel_base),
            Mode::Immediate => Err(Fault::InvalidMode(raw)),
        }
    }

    /// Common body of the four instructions that read two parameters and
    /// store a result through the third
    fn binary_op(
        &mut self,
        opcode: OpCode,
        modes: [Mode; 3],
        operation: impl Fn(i64, i64) -> i64,
    ) -> Result<(), Fault> {
        let a = self.resolve_param(modes[0], 1)?;
        let b = self.resolve_param(modes[1], 2)?;
        let dest = self.resolve_dest(modes[2], 3)?;
        let val = operation(a, b);
        if self.trace.is_some() {
            self.trace_instr(
                opcode,
                modes,
                &[
                    (self.mem[self.ip + 1], a),
                    (self.mem[self.ip + 2], b),
                    (self.mem[self.ip + 3], val),
                ],
            );
        }
        self.mem.write(dest, val)?;
        self.ip += 4;
        Ok(())
    }

    /// Common body of the two conditional jumps
    fn jump(
        &mut self,
        opcode: OpCode,
        modes: [Mode; 3],
        taken: impl Fn(i64) -> bool,
    ) -> Result<(), Fault> {
        let condition = self.resolve_param(modes[0], 1)?;
        let target = self.resolve_param(modes[1], 2)?;
        if self.trace.is_some() {
            self.trace_instr(
                opcode,
                modes,
                &[
                    (self.mem[self.ip + 1], condition),
                    (self.mem[self.ip + 2], target),
                ],
            );
        }
        if taken(condition) {
            if target < 0 {
                return Err(Fault::InvalidAddress(target));
            }
            self.ip = target;
        } else {
            self.ip += 3;
        }
        Ok(())
    }

    /// Decode and execute the instruction at the instruction pointer
    pub(crate) fn exec_instruction(&mut self) -> Result<StepOutcome, Fault> {
        let instruction = self.mem.read(self.ip)?;
        // Higher digits than the third mode's have no meaning; catch them in
        // debug builds
        debug_assert!(
            instruction < 100_000,
            "instruction out of encodable range: {instruction}"
        );
        let (opcode, modes) = decode(instruction)?;

        match opcode {
            OpCode::Add => self.binary_op(opcode, modes, |a, b| a + b)?,
            OpCode::Multiply => self.binary_op(opcode, modes, |a, b| a * b)?,
            OpCode::LessThan => self.binary_op(opcode, modes, |a, b| i64::from(a < b))?,
            OpCode::Equals => self.binary_op(opcode, modes, |a, b| i64::from(a == b))?,
            OpCode::JumpIfTrue => self.jump(opcode, modes, |condition| condition != 0)?,
            OpCode::JumpIfFalse => self.jump(opcode, modes, |condition| condition == 0)?,
            OpCode::Input => {
                // the instruction pointer stays put, so a later run retries
                // this same instruction once input has been fed
                let Some(value) = self.input.peek() else {
                    return Ok(StepOutcome::Stopped(State::AwaitingInput));
                };
                // destination resolved before the value is consumed, so a
                // fault leaves the input channel intact
                let dest = self.resolve_dest(modes[0], 1)?;
                let _ = self.input.pop();
                if self.trace.is_some() {
                    self.trace_instr(opcode, modes, &[(self.mem[self.ip + 1], value)]);
                }
                self.mem.write(dest, value)?;
                self.ip += 2;
            }
            OpCode::Output => {
                let value = self.resolve_param(modes[0], 1)?;
                if self.trace.is_some() {
                    self.trace_instr(opcode, modes, &[(self.mem[self.ip + 1], value)]);
                }
                self.output.push(value);
                self.ip += 2;
            }
            OpCode::AdjustRelativeBase => {
                let delta = self.resolve_param(modes[0], 1)?;
                if self.trace.is_some() {
                    self.trace_instr(opcode, modes, &[(self.mem[self.ip + 1], delta)]);
                }
                self.rel_base += delta;
                self.ip += 2;
            }
            OpCode::Halt => {
                if self.trace.is_some() {
                    self.trace_instr(opcode, modes, &[]);
                }
                return Ok(StepOutcome::Stopped(State::Halted));
            }
        }
        Ok(StepOutcome::Running)
    }
}
