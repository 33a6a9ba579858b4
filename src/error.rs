//! The ways loading or running a machine can fail.
//!
//! None of these are recoverable: a machine that reports an error is left in
//! whatever state it had before the failing instruction, and callers are
//! expected to throw it away.

use crate::Word;

#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum MachineError {
    /// Program text that doesn't have the shape of an instruction.
    #[fail(display = "line {}: {}: {:?}", line, reason, text)]
    Parse {
        line: usize,
        text: String,
        reason: String,
    },

    /// An operand named a register the machine doesn't have.
    #[fail(display = "unknown register: {:?}", name)]
    UnknownRegister { name: String },

    /// An IntCode address outside the memory buffer.
    #[fail(display = "address {} out of bounds for memory of length {}", address, len)]
    OutOfBounds { address: Word, len: usize },

    /// A mnemonic or opcode number the machine doesn't implement. `pc` is the
    /// index of the offending instruction.
    #[fail(display = "unsupported instruction at {}: {:?}", pc, text)]
    UnsupportedOpcode { pc: usize, text: String },

    /// The caller's step budget ran out before the machine halted.
    #[fail(display = "machine did not halt within {} steps", limit)]
    StepLimitExceeded { limit: u64 },

    /// Checked arithmetic overflowed `Word`.
    #[fail(display = "arithmetic overflow at {}", pc)]
    Overflow { pc: usize },

    /// Opcode discovery couldn't settle on a single assignment.
    #[fail(display = "can't resolve opcodes: {}", reason)]
    Unresolvable { reason: String },
}

impl MachineError {
    pub(crate) fn parse<S: Into<String>>(line: usize, text: &str, reason: S) -> MachineError {
        MachineError::Parse {
            line,
            text: text.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_register<S: ToString>(name: S) -> MachineError {
        MachineError::UnknownRegister {
            name: name.to_string(),
        }
    }
}
