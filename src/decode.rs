// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Splitting one memory cell into an opcode and per-parameter addressing
//! modes

use std::fmt::{self, Display};

use crate::Fault;

/// The operation selected by the low two digits of an instruction
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpCode {
    /// `mem[c] = a + b`
    Add = 1,
    /// `mem[c] = a * b`
    Multiply = 2,
    /// `mem[a] =` next input value, blocking if none is available
    Input = 3,
    /// append `a` to the output channel
    Output = 4,
    /// if `a != 0`, jump to `b`
    JumpIfTrue = 5,
    /// if `a == 0`, jump to `b`
    JumpIfFalse = 6,
    /// `mem[c] = 1` if `a < b`, else `0`
    LessThan = 7,
    /// `mem[c] = 1` if `a == b`, else `0`
    Equals = 8,
    /// add `a` to the relative base register
    AdjustRelativeBase = 9,
    /// stop execution
    Halt = 99,
}

impl OpCode {
    /// The number of parameters the opcode consumes. The instruction pointer
    /// advances past them (by `1 + param_count`) unless the instruction
    /// jumps or blocks.
    pub const fn param_count(self) -> usize {
        match self {
            Self::Add | Self::Multiply | Self::LessThan | Self::Equals => 3,
            Self::JumpIfTrue | Self::JumpIfFalse => 2,
            Self::Input | Self::Output | Self::AdjustRelativeBase => 1,
            Self::Halt => 0,
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            Self::Add => "ADD",
            Self::Multiply => "MUL",
            Self::Input => "IN",
            Self::Output => "OUT",
            Self::JumpIfTrue => "JNZ",
            Self::JumpIfFalse => "JZ",
            Self::LessThan => "LT",
            Self::Equals => "EQ",
            Self::AdjustRelativeBase => "RBO",
            Self::Halt => "HALT",
        })
    }
}

impl TryFrom<i64> for OpCode {
    type Error = Fault;
    fn try_from(i: i64) -> Result<Self, Fault> {
        match i {
            1 => Ok(Self::Add),
            2 => Ok(Self::Multiply),
            3 => Ok(Self::Input),
            4 => Ok(Self::Output),
            5 => Ok(Self::JumpIfTrue),
            6 => Ok(Self::JumpIfFalse),
            7 => Ok(Self::LessThan),
            8 => Ok(Self::Equals),
            9 => Ok(Self::AdjustRelativeBase),
            99 => Ok(Self::Halt),
            _ => Err(Fault::InvalidOpcode(i)),
        }
    }
}

/// Addressing mode for one instruction parameter
///
/// When executing an instruction, each parameter is interpreted according to
/// its associated mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    /// The parameter is an address; it evaluates to the value stored there.
    Position = 0,
    /// The parameter evaluates directly to the value specified.
    /// Instructions which write to memory may not use immediate mode for
    /// their destinations.
    #[doc(alias = "#")]
    Immediate = 1,
    /// The parameter, added to the relative base register, is an address; it
    /// evaluates to the value stored there.
    #[doc(alias = "@")]
    Relative = 2,
}

impl Display for Mode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Position => Ok(()),
            Mode::Immediate => write!(fmt, "#"),
            Mode::Relative => write!(fmt, "@"),
        }
    }
}

impl TryFrom<i64> for Mode {
    type Error = Fault;
    fn try_from(i: i64) -> Result<Self, Fault> {
        match i {
            0 => Ok(Mode::Position),
            1 => Ok(Mode::Immediate),
            2 => Ok(Mode::Relative),
            _ => Err(Fault::UnknownMode(i)),
        }
    }
}

// Given a 5 digit number, digits ABCDE are used as follows:
// DE is the two-digit opcode
// C is the 1st parameter's mode
// B is the 2nd parameter's mode
// A is the 3rd parameter's mode
//
// So *0*1202 would be parsed as follows:
//
// Opcode 02 is multiply
// C=2: 1st parameter is in relative mode
// B=1: 2nd parameter is in immediate mode
// A=0: 3rd parameter is in positional mode
pub(crate) fn decode(instruction: i64) -> Result<(OpCode, [Mode; 3]), Fault> {
    let opcode = OpCode::try_from(instruction % 100)
        .map_err(|_| Fault::InvalidOpcode(instruction))?;
    let modes = [
        Mode::try_from((instruction / 100) % 10)?,    // C (hundreds place)
        Mode::try_from((instruction / 1_000) % 10)?,  // B (thousands place)
        Mode::try_from((instruction / 10_000) % 10)?, // A (ten thousands place)
    ];
    Ok((opcode, modes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_digits_least_significant_param_first() {
        assert_eq!(
            decode(1202),
            Ok((
                OpCode::Multiply,
                [Mode::Relative, Mode::Immediate, Mode::Position]
            ))
        );
        assert_eq!(
            decode(204),
            Ok((OpCode::Output, [Mode::Relative, Mode::Position, Mode::Position]))
        );
        assert_eq!(
            decode(99),
            Ok((OpCode::Halt, [Mode::Position; 3]))
        );
    }

    #[test]
    fn bad_encodings_rejected() {
        assert_eq!(decode(98), Err(Fault::InvalidOpcode(98)));
        assert_eq!(decode(0), Err(Fault::InvalidOpcode(0)));
        assert_eq!(decode(-1), Err(Fault::InvalidOpcode(-1)));
        // opcode is valid but the first mode digit is 3
        assert_eq!(decode(301), Err(Fault::UnknownMode(3)));
    }

    #[test]
    fn param_counts_match_opcode_table() {
        for (opcode, count) in [
            (OpCode::Add, 3),
            (OpCode::Multiply, 3),
            (OpCode::Input, 1),
            (OpCode::Output, 1),
            (OpCode::JumpIfTrue, 2),
            (OpCode::JumpIfFalse, 2),
            (OpCode::LessThan, 3),
            (OpCode::Equals, 3),
            (OpCode::AdjustRelativeBase, 1),
            (OpCode::Halt, 0),
        ] {
            assert_eq!(opcode.param_count(), count, "{opcode}");
        }
    }
}
