//! Pure arithmetic-logic operations.
//!
//! Every function maps `(operands, flags in)` to `(result, flags out)` with
//! no other state, so the executor can call them in any order. Flag bits not
//! named by an operation are left untouched.

use crate::cpu::Status;

/// Updates ZERO and SIGN from a result byte. Only the bits present in
/// `mask` are written; BIT needs ZERO alone, everything else needs both.
fn zero_sign(result: u8, flags: &mut Status, mask: Status) {
    if mask.contains(Status::ZERO) {
        flags.set(Status::ZERO, result == 0);
    }

    if mask.contains(Status::SIGN) {
        flags.set(Status::SIGN, result & 0x80 != 0);
    }
}

/// Add with carry, in binary or decimal mode depending on the BCD flag.
///
/// Decimal mode applies the standard two-stage correction: +0x06 when the
/// low-nibble sum exceeds 9, then +0x60 when the high nibble does.
pub(crate) fn add(a: u8, b: u8, flags: &mut Status) -> u8 {
    let carry_in = flags.contains(Status::CARRY) as u16;
    let ai = a as u16;
    let bi = b as u16;

    let mut result = ai + bi + carry_in;

    if flags.contains(Status::BCD) {
        if (ai & 0x0F) + (bi & 0x0F) + carry_in > 9 {
            result += 0x06;
        }

        if (result >> 4) > 9 {
            result += 0x60;
        }
    }

    flags.set(Status::CARRY, result & 0xFF00 != 0);
    zero_sign(result as u8, flags, Status::ZERO | Status::SIGN);
    flags.set(Status::OVRF, (ai ^ result) & (bi ^ result) & 0x80 != 0);

    result as u8
}

/// Subtract with borrow. Binary mode adds the ones complement of `b` plus
/// carry-in; decimal mode adds the nines complement `(0x99 - b) & 0xff`
/// and then applies the same correction and carry rules as `add`.
pub(crate) fn sub(a: u8, b: u8, flags: &mut Status) -> u8 {
    let carry_in = flags.contains(Status::CARRY) as u16;
    let ai = a as u16;

    let bi = if flags.contains(Status::BCD) {
        (0x99 - b as u16) & 0xFF
    } else {
        (!b as u16) & 0xFF
    };

    let mut result = ai + bi + carry_in;

    if flags.contains(Status::BCD) {
        if (ai & 0x0F) + (bi & 0x0F) + carry_in > 9 {
            result += 0x06;
        }

        if (result >> 4) > 9 {
            result += 0x60;
        }
    }

    flags.set(Status::CARRY, result & 0xFF00 != 0);
    zero_sign(result as u8, flags, Status::ZERO | Status::SIGN);
    flags.set(Status::OVRF, (ai ^ result) & (bi ^ result) & 0x80 != 0);

    result as u8
}

/// Comparison used by CMP, CPX and CPY: `a + ~b + 1` with CARRY from the
/// 9-bit sum and ZERO/SIGN from the low byte. OVRF is never touched.
pub(crate) fn cmp(a: u8, b: u8, flags: &mut Status) {
    let ai = a as u16;
    let bi = (!b as u16) & 0xFF;

    let result = ai + bi + 1;

    flags.set(Status::CARRY, result & 0xFF00 != 0);
    zero_sign(result as u8, flags, Status::ZERO | Status::SIGN);
}

pub(crate) fn inc(a: u8, flags: &mut Status) -> u8 {
    let result = a.wrapping_add(1);
    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    result
}

pub(crate) fn dec(a: u8, flags: &mut Status) -> u8 {
    let result = a.wrapping_sub(1);
    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    result
}

pub(crate) fn and(a: u8, b: u8, flags: &mut Status) -> u8 {
    let result = a & b;
    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    result
}

pub(crate) fn or(a: u8, b: u8, flags: &mut Status) -> u8 {
    let result = a | b;
    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    result
}

pub(crate) fn eor(a: u8, b: u8, flags: &mut Status) -> u8 {
    let result = a ^ b;
    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    result
}

/// Arithmetic shift left; CARRY takes the bit shifted out of bit 7.
pub(crate) fn asl(a: u8, flags: &mut Status) -> u8 {
    let result = a << 1;

    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    flags.set(Status::CARRY, a & 0x80 != 0);

    result
}

/// Logical shift right; CARRY takes the bit shifted out of bit 0.
pub(crate) fn lsr(a: u8, flags: &mut Status) -> u8 {
    let result = a >> 1;

    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    flags.set(Status::CARRY, a & 0x01 != 0);

    result
}

/// Rotate left through carry: the previous CARRY enters bit 0, bit 7
/// leaves through CARRY.
pub(crate) fn rol(a: u8, flags: &mut Status) -> u8 {
    let mut result = a << 1;

    if flags.contains(Status::CARRY) {
        result |= 0x01;
    }

    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    flags.set(Status::CARRY, a & 0x80 != 0);

    result
}

/// Rotate right through carry: the previous CARRY enters bit 7, bit 0
/// leaves through CARRY.
pub(crate) fn ror(a: u8, flags: &mut Status) -> u8 {
    let mut result = a >> 1;

    if flags.contains(Status::CARRY) {
        result |= 0x80;
    }

    zero_sign(result, flags, Status::ZERO | Status::SIGN);
    flags.set(Status::CARRY, a & 0x01 != 0);

    result
}

/// Bit test: ZERO from `a & b`, OVRF and SIGN copied from bits 6 and 7 of
/// the memory argument. The AND result itself is discarded.
pub(crate) fn bit(a: u8, b: u8, flags: &mut Status) {
    zero_sign(a & b, flags, Status::ZERO);
    flags.set(Status::OVRF, b & 0x40 != 0);
    flags.set(Status::SIGN, b & 0x80 != 0);
}

/// Identity with flag update; shared by the loads, the pulls and the
/// register transfers.
pub(crate) fn load(a: u8, flags: &mut Status) -> u8 {
    zero_sign(a, flags, Status::ZERO | Status::SIGN);
    a
}
