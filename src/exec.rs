//! Instruction executor: the register file mutator behind `step` and the
//! three hardware entry points.

use log::{debug, warn};

use crate::addrmode::{self, Operand};
use crate::alu;
use crate::bus::Bus;
use crate::cpu::{CpuState, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, STACK_BASE, Status};
use crate::decode::{self, Instruction, Mnemonic};
use crate::error::Error;

/// The simulator core. Owns the bus registered at construction time; the
/// CPU state stays with the caller and is lent to each entry point.
pub struct Core<B: Bus> {
    bus: B,
}

impl<B: Bus> Core<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// The host services its devices and inspects memory between steps
    /// through the bus it registered.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Executes the instruction at `pc` and charges the consumed cycles to
    /// the caller's accumulator.
    pub fn step(&mut self, cpu: &mut CpuState, cycles: &mut u64) -> Result<(), Error> {
        let opcode_pc = cpu.pc;
        let opcode = addrmode::next_pc(&mut self.bus, cpu);

        let instr = decode::lookup(opcode).ok_or(Error::UnknownOpcode {
            opcode,
            pc: opcode_pc,
        })?;

        // Baseline opcode-fetch cost; the addressing mode and the handler
        // add their own contributions on top.
        let mut spent: u64 = 2;
        let operand = addrmode::fetch(&mut self.bus, cpu, instr.mode, &mut spent);

        self.dispatch(cpu, instr, operand, &mut spent)?;

        debug!("{} {:?} -> {} (+{} cycles)", instr.name, operand, cpu, spent);

        *cycles += spent;
        Ok(())
    }

    /// Reset entry: establishes the architectural power-on state and loads
    /// `pc` from the reset vector. No stack traffic.
    pub fn rst(&mut self, cpu: &mut CpuState, cycles: &mut u64) {
        cpu.a = 0x00;
        cpu.x = 0x00;
        cpu.y = 0x00;
        cpu.flags = Status::ONE;
        cpu.sp = 0xFF;

        cpu.pc = self.read_vector(RESET_VECTOR);

        debug!("reset -> {}", cpu);

        *cycles += 4;
    }

    /// Maskable-interrupt entry. The core enters unconditionally; honouring
    /// the IRQD mask is the host's responsibility.
    pub fn irq(&mut self, cpu: &mut CpuState, cycles: &mut u64) {
        self.interrupt(cpu, IRQ_VECTOR, cycles);
    }

    /// Non-maskable-interrupt entry.
    pub fn nmi(&mut self, cpu: &mut CpuState, cycles: &mut u64) {
        self.interrupt(cpu, NMI_VECTOR, cycles);
    }

    fn interrupt(&mut self, cpu: &mut CpuState, vector: u16, cycles: &mut u64) {
        self.push(cpu, (cpu.pc >> 8) as u8);
        self.push(cpu, cpu.pc as u8);

        // The pushed copy carries bit 5 as 1 and, unlike BRK, a clear
        // break bit so a handler can tell the two apart.
        let pushed = (cpu.flags | Status::ONE) & !Status::BRK;
        self.push(cpu, pushed.bits());

        cpu.pc = self.read_vector(vector);
        cpu.flags.insert(Status::IRQD);

        *cycles += 7;
    }

    fn dispatch(
        &mut self,
        cpu: &mut CpuState,
        instr: &Instruction,
        operand: Operand,
        cycles: &mut u64,
    ) -> Result<(), Error> {
        match instr.mnemonic {
            // Arithmetic and logic on the accumulator.
            Mnemonic::Adc => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.a = alu::add(cpu.a, arg, &mut cpu.flags);
            }
            Mnemonic::Sbc => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.a = alu::sub(cpu.a, arg, &mut cpu.flags);
            }
            Mnemonic::And => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.a = alu::and(cpu.a, arg, &mut cpu.flags);
            }
            Mnemonic::Ora => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.a = alu::or(cpu.a, arg, &mut cpu.flags);
            }
            Mnemonic::Eor => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.a = alu::eor(cpu.a, arg, &mut cpu.flags);
            }
            Mnemonic::Bit => {
                let arg = self.value_of(instr, operand, cycles)?;
                alu::bit(cpu.a, arg, &mut cpu.flags);
            }

            // Comparisons.
            Mnemonic::Cmp => {
                let arg = self.value_of(instr, operand, cycles)?;
                alu::cmp(cpu.a, arg, &mut cpu.flags);
            }
            Mnemonic::Cpx => {
                let arg = self.value_of(instr, operand, cycles)?;
                alu::cmp(cpu.x, arg, &mut cpu.flags);
            }
            Mnemonic::Cpy => {
                let arg = self.value_of(instr, operand, cycles)?;
                alu::cmp(cpu.y, arg, &mut cpu.flags);
            }

            // Loads.
            Mnemonic::Lda => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.a = alu::load(arg, &mut cpu.flags);
            }
            Mnemonic::Ldx => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.x = alu::load(arg, &mut cpu.flags);
            }
            Mnemonic::Ldy => {
                let arg = self.value_of(instr, operand, cycles)?;
                cpu.y = alu::load(arg, &mut cpu.flags);
            }

            // Stores. These have no immediate or accumulator forms, so a
            // missing address means the dispatch tables are inconsistent.
            Mnemonic::Sta => self.store(instr, operand, cpu.a, cycles)?,
            Mnemonic::Stx => self.store(instr, operand, cpu.x, cycles)?,
            Mnemonic::Sty => self.store(instr, operand, cpu.y, cycles)?,

            // Read-modify-write family.
            Mnemonic::Asl => self.read_modify_write(cpu, instr, operand, alu::asl, cycles)?,
            Mnemonic::Lsr => self.read_modify_write(cpu, instr, operand, alu::lsr, cycles)?,
            Mnemonic::Rol => self.read_modify_write(cpu, instr, operand, alu::rol, cycles)?,
            Mnemonic::Ror => self.read_modify_write(cpu, instr, operand, alu::ror, cycles)?,
            Mnemonic::Inc => self.read_modify_write(cpu, instr, operand, alu::inc, cycles)?,
            Mnemonic::Dec => self.read_modify_write(cpu, instr, operand, alu::dec, cycles)?,

            // Register increments and decrements.
            Mnemonic::Inx => {
                cpu.x = alu::inc(cpu.x, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Iny => {
                cpu.y = alu::inc(cpu.y, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Dex => {
                cpu.x = alu::dec(cpu.x, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Dey => {
                cpu.y = alu::dec(cpu.y, &mut cpu.flags);
                *cycles += 1;
            }

            // Branches.
            Mnemonic::Bcc => {
                let taken = !cpu.flags.contains(Status::CARRY);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Bcs => {
                let taken = cpu.flags.contains(Status::CARRY);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Beq => {
                let taken = cpu.flags.contains(Status::ZERO);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Bne => {
                let taken = !cpu.flags.contains(Status::ZERO);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Bmi => {
                let taken = cpu.flags.contains(Status::SIGN);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Bpl => {
                let taken = !cpu.flags.contains(Status::SIGN);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Bvs => {
                let taken = cpu.flags.contains(Status::OVRF);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }
            Mnemonic::Bvc => {
                let taken = !cpu.flags.contains(Status::OVRF);
                Self::branch(cpu, instr, operand, taken, cycles)?;
            }

            // Jumps, calls and returns.
            Mnemonic::Jmp => {
                let Operand::Address(target) = operand else {
                    return Err(Error::InvalidOperand {
                        mnemonic: instr.name,
                    });
                };
                cpu.pc = target;
                *cycles += 1;
            }
            Mnemonic::Jsr => {
                let Operand::Address(target) = operand else {
                    return Err(Error::InvalidOperand {
                        mnemonic: instr.name,
                    });
                };

                // The pushed return address is the last byte of the JSR
                // itself; RTS compensates with its +1.
                let ret = cpu.pc.wrapping_sub(1);
                self.push(cpu, (ret >> 8) as u8);
                self.push(cpu, ret as u8);

                cpu.pc = target;
                *cycles += 2;
            }
            Mnemonic::Rts => {
                let lo = self.pop(cpu);
                let hi = self.pop(cpu);
                cpu.pc = u16::from_le_bytes([lo, hi]).wrapping_add(1);
                *cycles += 2;
            }
            Mnemonic::Rti => {
                let flags = self.pop(cpu);
                cpu.flags = Status::from_bits_truncate(flags) & !(Status::BRK | Status::ONE);

                let lo = self.pop(cpu);
                let hi = self.pop(cpu);
                cpu.pc = u16::from_le_bytes([lo, hi]);
                *cycles += 3;
            }

            // Software break.
            Mnemonic::Brk => {
                // One padding byte follows the opcode.
                cpu.pc = cpu.pc.wrapping_add(1);
                self.push(cpu, (cpu.pc >> 8) as u8);
                self.push(cpu, cpu.pc as u8);
                self.push(cpu, (cpu.flags | Status::ONE | Status::BRK).bits());

                cpu.flags.insert(Status::IRQD);
                cpu.pc = self.read_vector(IRQ_VECTOR);
                *cycles += 4;
            }

            // Stack operations.
            Mnemonic::Pha => {
                self.push(cpu, cpu.a);
                *cycles += 2;
            }
            Mnemonic::Php => {
                self.push(cpu, (cpu.flags | Status::ONE | Status::BRK).bits());
                *cycles += 2;
            }
            Mnemonic::Pla => {
                let data = self.pop(cpu);
                cpu.a = alu::load(data, &mut cpu.flags);
                *cycles += 2;
            }
            Mnemonic::Plp => {
                let flags = self.pop(cpu);
                cpu.flags = Status::from_bits_truncate(flags) & !(Status::BRK | Status::ONE);
                *cycles += 2;
            }

            // Register transfers. All but TXS go through the load path and
            // therefore update ZERO and SIGN.
            Mnemonic::Tax => {
                cpu.x = alu::load(cpu.a, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Tay => {
                cpu.y = alu::load(cpu.a, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Tsx => {
                cpu.x = alu::load(cpu.sp, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Txa => {
                cpu.a = alu::load(cpu.x, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Tya => {
                cpu.a = alu::load(cpu.y, &mut cpu.flags);
                *cycles += 1;
            }
            Mnemonic::Txs => {
                cpu.sp = cpu.x;
                *cycles += 1;
            }

            // Flag edits.
            Mnemonic::Clc => {
                cpu.flags.remove(Status::CARRY);
                *cycles += 1;
            }
            Mnemonic::Cld => {
                cpu.flags.remove(Status::BCD);
                *cycles += 1;
            }
            Mnemonic::Cli => {
                cpu.flags.remove(Status::IRQD);
                *cycles += 1;
            }
            Mnemonic::Clv => {
                cpu.flags.remove(Status::OVRF);
                *cycles += 1;
            }
            Mnemonic::Sec => {
                cpu.flags.insert(Status::CARRY);
                *cycles += 1;
            }
            Mnemonic::Sed => {
                cpu.flags.insert(Status::BCD);
                *cycles += 1;
            }
            Mnemonic::Sei => {
                cpu.flags.insert(Status::IRQD);
                *cycles += 1;
            }

            Mnemonic::Nop => {
                *cycles += 1;
            }
        }

        Ok(())
    }

    /// Resolves the source value of a read instruction: an address operand
    /// is dereferenced through the bus, a byte operand is used directly.
    fn value_of(
        &mut self,
        instr: &Instruction,
        operand: Operand,
        cycles: &mut u64,
    ) -> Result<u8, Error> {
        match operand {
            Operand::Address(addr) => {
                *cycles += 2;
                Ok(self.bus.read(addr))
            }
            Operand::Byte(value) => {
                *cycles += 1;
                Ok(value)
            }
            Operand::None => Err(Error::InvalidOperand {
                mnemonic: instr.name,
            }),
        }
    }

    /// Shifts, rotates, INC and DEC: memory operands write the result back
    /// to the same address, the accumulator form writes back to `a`.
    fn read_modify_write(
        &mut self,
        cpu: &mut CpuState,
        instr: &Instruction,
        operand: Operand,
        op: fn(u8, &mut Status) -> u8,
        cycles: &mut u64,
    ) -> Result<(), Error> {
        match operand {
            Operand::Address(addr) => {
                let arg = self.bus.read(addr);
                *cycles += 2;

                let result = op(arg, &mut cpu.flags);

                self.bus.write(addr, result);
                *cycles += 1;
            }
            Operand::Byte(arg) => {
                *cycles += 1;
                cpu.a = op(arg, &mut cpu.flags);
            }
            Operand::None => {
                return Err(Error::InvalidOperand {
                    mnemonic: instr.name,
                });
            }
        }

        Ok(())
    }

    fn store(
        &mut self,
        instr: &Instruction,
        operand: Operand,
        value: u8,
        cycles: &mut u64,
    ) -> Result<(), Error> {
        let Operand::Address(addr) = operand else {
            return Err(Error::InvalidOperand {
                mnemonic: instr.name,
            });
        };

        self.bus.write(addr, value);
        *cycles += 2;
        Ok(())
    }

    fn branch(
        cpu: &mut CpuState,
        instr: &Instruction,
        operand: Operand,
        taken: bool,
        cycles: &mut u64,
    ) -> Result<(), Error> {
        let Operand::Address(target) = operand else {
            return Err(Error::InvalidOperand {
                mnemonic: instr.name,
            });
        };

        if taken {
            // A branch landing on its own opcode can never make progress.
            #[cfg(debug_assertions)]
            if target == cpu.pc.wrapping_sub(2) {
                return Err(Error::TightLoop { pc: target });
            }

            cpu.pc = target;
            *cycles += 1;
        }

        Ok(())
    }

    /// Push: write at the current stack address, then decrement.
    fn push(&mut self, cpu: &mut CpuState, data: u8) {
        let addr = STACK_BASE | cpu.sp as u16;
        cpu.sp = cpu.sp.wrapping_sub(1);

        if cpu.sp == 0xFF {
            warn!("stack pointer wrap-around");
        }

        self.bus.write(addr, data);
    }

    /// Pop: increment first, then read from the new stack address.
    fn pop(&mut self, cpu: &mut CpuState) -> u8 {
        cpu.sp = cpu.sp.wrapping_add(1);

        if cpu.sp == 0x00 {
            warn!("stack pointer wrap-around");
        }

        self.bus.read(STACK_BASE | cpu.sp as u16)
    }

    fn read_vector(&mut self, vector: u16) -> u16 {
        let lo = self.bus.read(vector);
        let hi = self.bus.read(vector.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatMemory;

    fn core_with(origin: u16, program: &[u8]) -> (Core<FlatMemory>, CpuState) {
        let mut mem = FlatMemory::new();
        mem.load(origin, program);

        let mut cpu = CpuState::new();
        cpu.pc = origin;
        (Core::new(mem), cpu)
    }

    #[test]
    fn test_lda_immediate_sets_flags() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xA9, 0x00]);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flags.contains(Status::ZERO));
        assert!(!cpu.flags.contains(Status::SIGN));
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cycles, 4);
    }

    #[test]
    fn test_lda_absolute_reads_memory() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xAD, 0x00, 0x20]);
        core.bus_mut().write(0x2000, 0x80);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.flags.contains(Status::SIGN));
        assert_eq!(cycles, 7);
    }

    #[test]
    fn test_sta_absolute_writes_memory() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x8D, 0x00, 0x02]);
        cpu.a = 0x42;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(core.bus_mut().read(0x0200), 0x42);
        assert_eq!(cycles, 7);
    }

    #[test]
    fn test_store_without_address_is_fatal() {
        let (mut core, mut cpu) = core_with(0x8000, &[]);
        let instr = decode::lookup(0x85).unwrap(); // STA zero page
        let mut cycles = 0;

        let err = core
            .dispatch(&mut cpu, instr, Operand::Byte(0x01), &mut cycles)
            .unwrap_err();
        assert_eq!(err, Error::InvalidOperand { mnemonic: "STA" });
    }

    #[test]
    fn test_unknown_opcode_is_fatal() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x02]);
        let mut cycles = 0;

        let err = core.step(&mut cpu, &mut cycles).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownOpcode {
                opcode: 0x02,
                pc: 0x8000
            }
        );
    }

    #[test]
    fn test_reset_establishes_architectural_state() {
        let (mut core, mut cpu) = core_with(0x0000, &[]);
        core.bus_mut().write(RESET_VECTOR, 0x00);
        core.bus_mut().write(RESET_VECTOR + 1, 0x80);

        // Trash every register first; reset must not depend on any of it.
        cpu.a = 0xAA;
        cpu.x = 0xBB;
        cpu.y = 0xCC;
        cpu.sp = 0x13;
        cpu.flags = Status::from_bits_truncate(0xFF);
        cpu.pc = 0xDEAD;

        let mut cycles = 0;
        core.rst(&mut cpu, &mut cycles);

        assert_eq!(cpu.a, 0x00);
        assert_eq!(cpu.x, 0x00);
        assert_eq!(cpu.y, 0x00);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(cpu.flags, Status::ONE);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cycles, 4);
    }

    #[test]
    fn test_push_pop_identity() {
        let (mut core, mut cpu) = core_with(0x8000, &[]);
        let sp_before = cpu.sp;

        core.push(&mut cpu, 0xA5);
        assert_eq!(cpu.sp, sp_before.wrapping_sub(1));

        assert_eq!(core.pop(&mut cpu), 0xA5);
        assert_eq!(cpu.sp, sp_before);
    }

    #[test]
    fn test_stack_stays_in_page_one() {
        let (mut core, mut cpu) = core_with(0x8000, &[]);
        cpu.sp = 0x00;

        core.push(&mut cpu, 0x77);
        assert_eq!(core.bus_mut().read(0x0100), 0x77);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn test_irq_entry() {
        let (mut core, mut cpu) = core_with(0x0000, &[]);
        core.bus_mut().write(IRQ_VECTOR, 0x34);
        core.bus_mut().write(IRQ_VECTOR + 1, 0x12);

        cpu.pc = 0x1234;
        cpu.flags = Status::ONE;
        cpu.sp = 0xFF;

        let mut cycles = 0;
        core.irq(&mut cpu, &mut cycles);

        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cpu.sp, 0xFC);
        assert_eq!(core.bus_mut().read(0x01FF), 0x12);
        assert_eq!(core.bus_mut().read(0x01FE), 0x34);
        // Pushed flags carry ONE and a clear break bit.
        assert_eq!(core.bus_mut().read(0x01FD), 0x20);
        assert!(cpu.flags.contains(Status::IRQD));
        assert_eq!(cycles, 7);
    }

    #[test]
    fn test_nmi_uses_its_own_vector() {
        let (mut core, mut cpu) = core_with(0x0000, &[]);
        core.bus_mut().write(NMI_VECTOR, 0x00);
        core.bus_mut().write(NMI_VECTOR + 1, 0x90);

        cpu.pc = 0x8000;
        let mut cycles = 0;
        core.nmi(&mut cpu, &mut cycles);

        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.flags.contains(Status::IRQD));
        assert_eq!(cycles, 7);
    }

    #[test]
    fn test_jsr_rts_round_trip() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x20, 0x34, 0x12]);
        core.bus_mut().write(0x1234, 0x60); // RTS
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(core.bus_mut().read(0x01FF), 0x80);
        assert_eq!(core.bus_mut().read(0x01FE), 0x02);

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(cycles, 11);
    }

    #[test]
    fn test_jmp_absolute_and_indirect() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x4C, 0x00, 0x90]);
        let mut cycles = 0;
        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cycles, 6);

        let (mut core, mut cpu) = core_with(0x8000, &[0x6C, 0x00, 0x30]);
        core.bus_mut().write(0x3000, 0xCD);
        core.bus_mut().write(0x3001, 0xAB);
        let mut cycles = 0;
        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0xABCD);
        assert_eq!(cycles, 10);
    }

    #[test]
    fn test_brk_enters_irq_vector() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x00]);
        core.bus_mut().write(IRQ_VECTOR, 0x00);
        core.bus_mut().write(IRQ_VECTOR + 1, 0x90);
        cpu.flags = Status::ONE;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();

        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.flags.contains(Status::IRQD));
        // Return address skips the padding byte after BRK.
        assert_eq!(core.bus_mut().read(0x01FF), 0x80);
        assert_eq!(core.bus_mut().read(0x01FE), 0x02);
        // Pushed flags carry both ONE and BRK.
        assert_eq!(core.bus_mut().read(0x01FD), 0x30);
        assert_eq!(cpu.sp, 0xFC);
        assert_eq!(cycles, 6);
    }

    #[test]
    fn test_rti_restores_flags_and_pc() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x40]);
        cpu.sp = 0xFC;
        core.bus_mut().write(0x01FD, 0xFF); // flags with BRK and ONE set
        core.bus_mut().write(0x01FE, 0x34);
        core.bus_mut().write(0x01FF, 0x12);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();

        assert_eq!(cpu.pc, 0x1234);
        assert_eq!(cpu.sp, 0xFF);
        // Bits 4 and 5 are stripped on the way in.
        assert_eq!(cpu.flags.bits(), 0xCF);
        assert_eq!(cycles, 5);
    }

    #[test]
    fn test_php_plp_round_trip_strips_break_bits() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x08, 0x28]);
        cpu.flags = Status::CARRY | Status::SIGN;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        // The pushed copy has ONE and BRK set on top of the live flags.
        assert_eq!(core.bus_mut().read(0x01FF), 0xB1);

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.flags, Status::CARRY | Status::SIGN);
        assert_eq!(cycles, 8);
    }

    #[test]
    fn test_pha_pla_through_load_flags() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x48, 0xA9, 0x01, 0x68]);
        cpu.a = 0x80;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap(); // PHA
        core.step(&mut cpu, &mut cycles).unwrap(); // LDA #$01
        assert!(!cpu.flags.contains(Status::SIGN));

        core.step(&mut cpu, &mut cycles).unwrap(); // PLA
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.flags.contains(Status::SIGN));
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn test_branch_not_taken_falls_through() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xF0, 0x05]);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cycles, 3);
    }

    #[test]
    fn test_branch_taken_moves_pc() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xF0, 0x05]);
        cpu.flags.insert(Status::ZERO);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x8007);
        assert_eq!(cycles, 4);
    }

    #[test]
    fn test_every_branch_predicate() {
        // (opcode, flags that take the branch, flags that fall through)
        let cases = [
            (0x90u8, Status::empty(), Status::CARRY),
            (0xB0, Status::CARRY, Status::empty()),
            (0xF0, Status::ZERO, Status::empty()),
            (0xD0, Status::empty(), Status::ZERO),
            (0x30, Status::SIGN, Status::empty()),
            (0x10, Status::empty(), Status::SIGN),
            (0x70, Status::OVRF, Status::empty()),
            (0x50, Status::empty(), Status::OVRF),
        ];

        for (opcode, taken_flags, fallthrough_flags) in cases {
            let (mut core, mut cpu) = core_with(0x8000, &[opcode, 0x10]);
            cpu.flags = taken_flags;
            let mut cycles = 0;
            core.step(&mut cpu, &mut cycles).unwrap();
            assert_eq!(cpu.pc, 0x8012, "{opcode:#04x} should have branched");

            let (mut core, mut cpu) = core_with(0x8000, &[opcode, 0x10]);
            cpu.flags = fallthrough_flags;
            let mut cycles = 0;
            core.step(&mut cpu, &mut cycles).unwrap();
            assert_eq!(cpu.pc, 0x8002, "{opcode:#04x} should have fallen through");
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_branch_to_self_is_caught() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xD0, 0xFE]); // BNE -2
        let mut cycles = 0;

        let err = core.step(&mut cpu, &mut cycles).unwrap_err();
        assert_eq!(err, Error::TightLoop { pc: 0x8000 });
    }

    #[test]
    fn test_asl_on_accumulator() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x0A]);
        cpu.a = 0x81;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.flags.contains(Status::CARRY));
        assert_eq!(cycles, 3);
    }

    #[test]
    fn test_asl_on_memory_writes_back() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x06, 0x10]);
        core.bus_mut().write(0x0010, 0x40);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(core.bus_mut().read(0x0010), 0x80);
        assert_eq!(cpu.a, 0x00, "accumulator must stay untouched");
        assert_eq!(cycles, 7);
    }

    #[test]
    fn test_inc_dec_memory() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xE6, 0x20, 0xC6, 0x20, 0xC6, 0x20]);
        core.bus_mut().write(0x0020, 0xFF);
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap(); // INC -> 0x00
        assert_eq!(core.bus_mut().read(0x0020), 0x00);
        assert!(cpu.flags.contains(Status::ZERO));

        core.step(&mut cpu, &mut cycles).unwrap(); // DEC -> 0xFF
        assert_eq!(core.bus_mut().read(0x0020), 0xFF);
        assert!(cpu.flags.contains(Status::SIGN));

        core.step(&mut cpu, &mut cycles).unwrap(); // DEC -> 0xFE
        assert_eq!(core.bus_mut().read(0x0020), 0xFE);
    }

    #[test]
    fn test_adc_signed_overflow_through_step() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x69, 0x50]);
        cpu.a = 0x50;
        cpu.flags = Status::empty();
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.flags.contains(Status::OVRF));
        assert!(cpu.flags.contains(Status::SIGN));
        assert!(!cpu.flags.contains(Status::CARRY));
    }

    #[test]
    fn test_cmp_equal_leaves_accumulator() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xC9, 0x42]);
        cpu.a = 0x42;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x42);
        assert!(cpu.flags.contains(Status::ZERO));
        assert!(cpu.flags.contains(Status::CARRY));
        assert!(!cpu.flags.contains(Status::SIGN));
    }

    #[test]
    fn test_cpx_cpy_compare_index_registers() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xE0, 0x10, 0xC0, 0x30]);
        cpu.x = 0x20;
        cpu.y = 0x20;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap(); // CPX #$10
        assert!(cpu.flags.contains(Status::CARRY));
        assert!(!cpu.flags.contains(Status::ZERO));

        core.step(&mut cpu, &mut cycles).unwrap(); // CPY #$30
        assert!(!cpu.flags.contains(Status::CARRY));
        assert!(cpu.flags.contains(Status::SIGN));
    }

    #[test]
    fn test_bit_reads_memory_bits() {
        let (mut core, mut cpu) = core_with(0x8000, &[0x24, 0x10]);
        core.bus_mut().write(0x0010, 0xC0);
        cpu.a = 0x3F;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert!(cpu.flags.contains(Status::ZERO));
        assert!(cpu.flags.contains(Status::OVRF));
        assert!(cpu.flags.contains(Status::SIGN));
        assert_eq!(cpu.a, 0x3F);
    }

    #[test]
    fn test_transfers_update_flags_except_txs() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xAA, 0x9A]);
        cpu.a = 0x00;
        cpu.flags = Status::empty();
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap(); // TAX
        assert_eq!(cpu.x, 0x00);
        assert!(cpu.flags.contains(Status::ZERO));

        cpu.x = 0x00;
        cpu.flags = Status::empty();
        core.step(&mut cpu, &mut cycles).unwrap(); // TXS
        assert_eq!(cpu.sp, 0x00);
        assert!(!cpu.flags.contains(Status::ZERO), "TXS must not touch flags");
    }

    #[test]
    fn test_flag_instructions() {
        let program = [0x38, 0xF8, 0x78, 0x18, 0xD8, 0x58, 0xB8];
        let (mut core, mut cpu) = core_with(0x8000, &program);
        cpu.flags = Status::OVRF;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap(); // SEC
        assert!(cpu.flags.contains(Status::CARRY));
        core.step(&mut cpu, &mut cycles).unwrap(); // SED
        assert!(cpu.flags.contains(Status::BCD));
        core.step(&mut cpu, &mut cycles).unwrap(); // SEI
        assert!(cpu.flags.contains(Status::IRQD));

        core.step(&mut cpu, &mut cycles).unwrap(); // CLC
        assert!(!cpu.flags.contains(Status::CARRY));
        core.step(&mut cpu, &mut cycles).unwrap(); // CLD
        assert!(!cpu.flags.contains(Status::BCD));
        core.step(&mut cpu, &mut cycles).unwrap(); // CLI
        assert!(!cpu.flags.contains(Status::IRQD));
        core.step(&mut cpu, &mut cycles).unwrap(); // CLV
        assert!(!cpu.flags.contains(Status::OVRF));

        assert_eq!(cycles, 7 * 3);
    }

    #[test]
    fn test_nop_only_spends_cycles() {
        let (mut core, mut cpu) = core_with(0x8000, &[0xEA]);
        let before = cpu;
        let mut cycles = 0;

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.a, before.a);
        assert_eq!(cpu.flags, before.flags);
        assert_eq!(cpu.pc, 0x8001);
        assert_eq!(cycles, 3);
    }

    #[test]
    fn test_every_documented_opcode_executes() {
        for opcode in 0u16..=0xFF {
            let opcode = opcode as u8;
            if decode::lookup(opcode).is_none() {
                continue;
            }

            // Zeroed operand bytes keep every addressing mode inside
            // mapped memory; no documented opcode may fail to execute.
            let (mut core, mut cpu) = core_with(0x8000, &[opcode, 0x00, 0x00]);
            let mut cycles = 0;
            core.step(&mut cpu, &mut cycles)
                .unwrap_or_else(|e| panic!("{opcode:#04x} failed: {e}"));
            assert!(cycles >= 3, "{opcode:#04x} undercounted cycles");
        }
    }

    #[test]
    fn test_irq_then_rti_resumes() {
        let (mut core, mut cpu) = core_with(0x0000, &[]);
        core.bus_mut().write(IRQ_VECTOR, 0x00);
        core.bus_mut().write(IRQ_VECTOR + 1, 0x90);
        core.bus_mut().write(0x9000, 0x40); // RTI

        cpu.pc = 0x8000;
        cpu.flags = Status::CARRY;
        let mut cycles = 0;

        core.irq(&mut cpu, &mut cycles);
        assert_eq!(cpu.pc, 0x9000);

        core.step(&mut cpu, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.flags, Status::CARRY);
        assert_eq!(cpu.sp, 0xFF);
    }
}
