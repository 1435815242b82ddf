// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing a reusable Intcode virtual machine
//!
//! The machine interprets a linear sequence of integer-encoded instructions
//! against a mutable memory image, with all of the [Opcodes] and [Parameter
//! Modes] defined for the completed Intcode computer of [Day 9]. Programs
//! suspend cleanly around input: [Machine::run] returns
//! [State::AwaitingInput] when the input channel runs dry, and a later call
//! picks up at the same instruction once the caller has fed more values.
//!
//! # Example
//!
//! ```rust
//! use intcode::prelude::*;
//!
//! let mut machine = Machine::new(vec![104, 1024, 99]);
//! assert_eq!(machine.run(), Ok(State::Halted));
//! assert_eq!(machine.drain_output(), vec![1024]);
//! ```
//!
//! Resuming around input:
//!
//! ```rust
//! use intcode::prelude::*;
//!
//! // read one value, echo it back, halt
//! let mut machine = Machine::new(vec![3, 0, 4, 0, 99]);
//! assert_eq!(machine.run(), Ok(State::AwaitingInput));
//! machine.feed(42);
//! assert_eq!(machine.run(), Ok(State::Halted));
//! assert_eq!(machine.next_output(), Some(42));
//! ```
//!
//! [Opcodes]: https://esolangs.org/wiki/Intcode#Opcodes
//! [Parameter Modes]: https://esolangs.org/wiki/Intcode#Parameter_Modes
//! [Day 9]: https://adventofcode.com/2019/day/9

mod channel;
mod decode;
mod internals;
mod memory;
pub mod trace;

use std::ops::Index;

use thiserror::Error;

use channel::Channel;
use memory::Memory;
use trace::Trace;

pub use decode::{Mode, OpCode};

/// A small module that re-exports items needed when working with the machine
pub mod prelude {
    pub use crate::{Machine, State};
}

/// The state of the machine, returned whenever it has stopped executing.
///
/// [AwaitingInput](State::AwaitingInput) means that there are more
/// instructions to execute, but the input channel is empty and the next
/// instruction requires input.
///
/// [Halted](State::Halted) means that a `HALT` instruction has been executed.
/// Once it's been returned, no more instructions will be executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Execution is suspended until the caller feeds more input
    AwaitingInput,
    /// Execution has halted
    Halted,
}

/// The result of executing a single instruction with [Machine::step]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepOutcome {
    /// The instruction completed and more instructions remain
    Running,
    /// The machine stopped, either halting or blocking on input
    Stopped(State),
}

/// A fatal error encountered while executing an Intcode instruction
///
/// Faults are terminal: a machine that has returned one latches it, and every
/// later [run](Machine::run) or [step](Machine::step) fails with
/// [Poisoned](Fault::Poisoned). An instruction either completes in full or
/// faults before mutating memory, so no partial effects are observable.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum Fault {
    /// An instruction resolved a negative memory address
    #[error("encountered negative memory address {0}")]
    InvalidAddress(i64),
    /// The decoded opcode is not in the recognized set
    #[error("encountered unrecognized opcode {0}")]
    InvalidOpcode(i64),
    /// A parameter mode digit was not 0, 1, or 2
    #[error("encountered unknown parameter mode {0}")]
    UnknownMode(i64),
    /// A write destination was decoded in immediate mode
    #[error("instruction attempted to write to immediate {0}")]
    InvalidMode(i64),
    /// The machine faulted on an earlier run and cannot resume
    #[error("machine previously faulted and cannot resume")]
    Poisoned,
}

/// An Intcode virtual machine
///
/// Owns a mutable memory image, the instruction pointer and relative base
/// registers, and a pair of caller-facing I/O channels. One machine is
/// constructed per program execution attempt; independent attempts over the
/// same program should each [clone](Clone::clone) a pristine machine, since
/// execution mutates memory in place.
#[derive(Debug, Clone)]
pub struct Machine {
    ip: i64,
    rel_base: i64,
    mem: Memory,
    input: Channel,
    output: Channel,
    trace: Option<Trace>,
    poisoned: bool,
}

// ignore any active trace
impl PartialEq for Machine {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip
            && self.rel_base == other.rel_base
            && self.mem == other.mem
            && self.input == other.input
            && self.output == other.output
            && self.poisoned == other.poisoned
    }
}

impl Index<i64> for Machine {
    type Output = i64;

    /// Direct memory peek. Addresses past the current extent read as `0`.
    ///
    /// Panics on negative addresses; use [Machine::read_memory] to get a
    /// [Fault] instead.
    fn index(&self, address: i64) -> &i64 {
        self.mem.index(address)
    }
}

impl Machine {
    /// Create a machine with `program` loaded into memory starting at
    /// address 0. Both registers start at 0 and both channels start empty.
    pub fn new(program: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ip: 0,
            rel_base: 0,
            mem: program.into_iter().collect(),
            input: Channel::default(),
            output: Channel::default(),
            trace: None,
            poisoned: false,
        }
    }

    /// As [Machine::new], with the input channel pre-seeded with one value
    pub fn with_input(program: impl IntoIterator<Item = i64>, input: i64) -> Self {
        Self::with_inputs(program, [input])
    }

    /// As [Machine::new], with the input channel pre-seeded with several
    /// values in order
    pub fn with_inputs(
        program: impl IntoIterator<Item = i64>,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Self {
        let mut machine = Self::new(program);
        machine.feed_all(inputs);
        machine
    }

    /// Queue one input value.
    ///
    /// Valid at any time: before the first [run](Machine::run), or after a
    /// run has returned [State::AwaitingInput].
    pub fn feed(&mut self, value: i64) {
        self.input.push(value);
    }

    /// Queue several input values in order
    pub fn feed_all(&mut self, values: impl IntoIterator<Item = i64>) {
        self.input.extend(values);
    }

    /// Execute exactly one instruction.
    ///
    /// An input instruction that finds the input channel empty returns
    /// [StepOutcome::Stopped]\([State::AwaitingInput]) and leaves the
    /// instruction pointer untouched, so the next call retries it.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        if self.poisoned {
            return Err(Fault::Poisoned);
        }
        let outcome = self.exec_instruction();
        if outcome.is_err() {
            self.poisoned = true;
        }
        outcome
    }

    /// Execute instructions until the program halts, blocks on empty input,
    /// or faults.
    ///
    /// After [State::AwaitingInput], [feed](Machine::feed) more values and
    /// call `run` again to resume at the blocked instruction. A [Fault] is
    /// terminal for this machine.
    pub fn run(&mut self) -> Result<State, Fault> {
        loop {
            match self.step()? {
                StepOutcome::Running => (),
                StepOutcome::Stopped(state) => return Ok(state),
            }
        }
    }

    /// Feed `inputs`, run until the machine stops, and drain its output.
    ///
    /// Returns the output produced so far together with the [State] at the
    /// time the machine stopped.
    pub fn run_through_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Result<(Vec<i64>, State), Fault> {
        self.feed_all(inputs);
        let state = self.run()?;
        Ok((self.drain_output(), state))
    }

    /// Get the value in memory at `address`
    #[doc(alias = "peek")]
    pub fn read_memory(&self, address: i64) -> Result<i64, Fault> {
        self.mem.read(address)
    }

    /// Manually overwrite the memory cell at `address`
    #[doc(alias("poke", "write"))]
    pub fn write_memory(&mut self, address: i64, value: i64) -> Result<(), Fault> {
        self.mem.write(address, value)
    }

    /// The current extent of the backing store, in cells.
    ///
    /// Writes past the end grow the store; the growth itself never changes
    /// what any address reads as.
    pub fn memory_len(&self) -> usize {
        self.mem.len()
    }

    /// Pop the oldest output value that hasn't been drained yet
    pub fn next_output(&mut self) -> Option<i64> {
        self.output.pop()
    }

    /// Remove and return all queued output, oldest first
    pub fn drain_output(&mut self) -> Vec<i64> {
        self.output.drain()
    }

    /// Number of output values produced but not yet drained
    pub fn pending_output(&self) -> usize {
        self.output.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ensure that stopping due to missing input leaves the machine in a
    /// sane state that can be resumed from
    #[test]
    fn missing_input_recoverable() {
        let mut machine = Machine::new(vec![3, 10, 4, 10, 99]);
        let old_state = machine.clone();

        // the stopped run must leave both the machine and its output
        // untouched
        assert_eq!(machine.run(), Ok(State::AwaitingInput));
        assert_eq!(machine.drain_output(), vec![]);
        assert_eq!(machine, old_state);

        machine.feed(1);
        assert_eq!(machine.run(), Ok(State::Halted));
        assert_eq!(machine.drain_output(), vec![1]);
    }

    #[test]
    fn seeded_inputs_consumed_in_order() {
        // echo two values
        let program = [3, 0, 4, 0, 3, 0, 4, 0, 99];
        let mut machine = Machine::with_inputs(program, [5, 7]);
        assert_eq!(machine.run(), Ok(State::Halted));
        assert_eq!(machine.drain_output(), vec![5, 7]);

        let mut machine = Machine::with_input(program, 5);
        assert_eq!(machine.run(), Ok(State::AwaitingInput));
        assert_eq!(machine.next_output(), Some(5));
        machine.feed(7);
        assert_eq!(machine.run(), Ok(State::Halted));
        assert_eq!(machine.next_output(), Some(7));
        assert_eq!(machine.next_output(), None);
    }

    #[test]
    fn unrecognized_opcode_faults() {
        let mut machine = Machine::new([98, 0, 0, 99]);
        assert_eq!(machine.run(), Err(Fault::InvalidOpcode(98)));
    }

    #[test]
    fn negative_address_faults() {
        // output of the value at address -1
        let mut machine = Machine::new([4, -1, 99]);
        assert_eq!(machine.run(), Err(Fault::InvalidAddress(-1)));
    }

    #[test]
    fn jump_to_negative_faults() {
        let mut machine = Machine::new([1105, 1, -4, 99]);
        assert_eq!(machine.run(), Err(Fault::InvalidAddress(-4)));
    }

    #[test]
    fn immediate_destination_faults() {
        // opcode 1 with an immediate-mode third parameter
        let mut machine = Machine::new([10001, 0, 0, 7, 99]);
        assert_eq!(machine.run(), Err(Fault::InvalidMode(7)));
    }

    #[test]
    fn fault_poisons_machine() {
        let mut machine = Machine::new([98, 99]);
        assert_eq!(machine.run(), Err(Fault::InvalidOpcode(98)));
        assert_eq!(machine.run(), Err(Fault::Poisoned));
        assert_eq!(machine.step(), Err(Fault::Poisoned));
    }

    #[test]
    fn awaiting_input_does_not_poison() {
        let mut machine = Machine::new([3, 0, 99]);
        assert_eq!(machine.run(), Ok(State::AwaitingInput));
        assert_eq!(machine.run(), Ok(State::AwaitingInput));
        machine.feed(0);
        assert_eq!(machine.run(), Ok(State::Halted));
    }

    #[test]
    fn faulting_instruction_leaves_no_partial_effects() {
        // add with a valid first parameter and a negative-address second
        let mut machine = Machine::new([1001, 4, 1, -1, 99]);
        let before = machine.clone();
        assert!(machine.run().is_err());
        // memory must be untouched by the faulting add
        assert_eq!(machine.read_memory(3), before.read_memory(3));
        assert_eq!(machine.memory_len(), before.memory_len());
    }

    #[test]
    fn step_executes_one_instruction() {
        let mut machine = Machine::new([1101, 2, 3, 0, 99]);
        assert_eq!(machine.step(), Ok(StepOutcome::Running));
        assert_eq!(machine[0], 5);
        assert_eq!(machine.step(), Ok(StepOutcome::Stopped(State::Halted)));
    }
}
