use std::fmt;

use bitflags::bitflags;

// System vectors. On a hardware event the core loads the program counter
// from one of these 16-bit little-endian locations.
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// The stack occupies page 1; the effective stack address is
/// `STACK_BASE | sp`.
pub(crate) const STACK_BASE: u16 = 0x0100;

bitflags! {
    /// The processor status register.
    ///
    /// The layout is externally observable because the register is pushed
    /// to the stack by PHP, BRK and the interrupt entries. Bit 5 has no
    /// storage on the 6502 and reads back as 1 in any pushed copy; bit 4
    /// is only ever set in pushed copies (by BRK and PHP).
    pub struct Status: u8 {
        /// Unsigned overflow out of bit 7, or the bit shifted out.
        const CARRY = 1 << 0;
        /// Last relevant result was zero.
        const ZERO = 1 << 1;
        /// Maskable-interrupt disable.
        const IRQD = 1 << 2;
        /// Decimal-mode arithmetic for ADC/SBC.
        const BCD = 1 << 3;
        /// Software-break indicator, set only in pushed copies.
        const BRK = 1 << 4;
        /// Hardwired to 1 in pushed copies.
        const ONE = 1 << 5;
        /// Signed overflow.
        const OVRF = 1 << 6;
        /// Bit 7 of the last relevant result.
        const SIGN = 1 << 7;
    }
}

/// The complete register file. The host owns this record and lends it to
/// the core for the duration of each entry-point call; the core keeps no
/// other state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Low byte of the stack address; the stack itself is fixed in page 1.
    pub sp: u8,
    pub flags: Status,
}

impl CpuState {
    /// A power-up register file. Real silicon leaves most of this
    /// undefined; a reset entry establishes the architectural state and
    /// loads `pc` from the reset vector.
    pub fn new() -> Self {
        Self {
            pc: 0x0000,
            a: 0x00,
            x: 0x00,
            y: 0x00,
            sp: 0xFF,
            flags: Status::ONE,
        }
    }
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pc:{:04X} a:{:02X} x:{:02X} y:{:02X} sp:{:02X} p:{:02X}",
            self.pc,
            self.a,
            self.x,
            self.y,
            self.sp,
            self.flags.bits()
        )
    }
}
