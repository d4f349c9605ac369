use thiserror::Error;

/// Fatal conditions the core cannot step past. Warnings (pc or sp
/// wrap-around) are reported through `log::warn!` instead and execution
/// continues.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The byte at `pc` does not decode to a documented instruction.
    #[error("unknown opcode {opcode:#04x} at {pc:#06x}")]
    UnknownOpcode { opcode: u8, pc: u16 },

    /// The decode table handed a handler an operand form it cannot use,
    /// e.g. a store without an effective address.
    #[error("{mnemonic}: invalid operand form")]
    InvalidOperand { mnemonic: &'static str },

    /// A branch targeted its own opcode, so the program can never make
    /// progress. Only detected in debug builds.
    #[error("tight loop at {pc:#06x}")]
    TightLoop { pc: u16 },
}
