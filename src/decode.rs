//! Opcode decode table for the 56 documented mnemonics.
//!
//! The table is a dense compile-time map from opcode byte to
//! `(mnemonic, addressing mode)`. Bytes with no entry are undocumented
//! opcodes and are fatal to execute.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi,
    Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli,
    Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor,
    Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy,
    Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol,
    Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta,
    Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressingMode {
    Absolute,    // e.g. LDA $1234
    AbsoluteX,   // e.g. LDA $1234,X
    AbsoluteY,   // e.g. LDA $1234,Y
    Accumulator, // e.g. ASL A
    Immediate,   // e.g. LDA #$10
    Implicit,    // e.g. CLC, INX (no operand)
    Indirect,    // e.g. JMP ($1234)
    IndirectX,   // e.g. LDA ($10,X)
    IndirectY,   // e.g. LDA ($10),Y
    Relative,    // e.g. BEQ +5
    ZeroPage,    // e.g. LDA $10
    ZeroPageX,   // e.g. LDA $10,X
    ZeroPageY,   // e.g. LDX $10,Y
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub name: &'static str,
}

pub(crate) fn lookup(opcode: u8) -> Option<&'static Instruction> {
    OPCODES.get(&opcode)
}

static OPCODES: phf::Map<u8, Instruction> = phf_map! {
    // ADC Instructions
    0x69u8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::Immediate, name: "ADC" },
    0x65u8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::ZeroPage, name: "ADC" },
    0x75u8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::ZeroPageX, name: "ADC" },
    0x6Du8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::Absolute, name: "ADC" },
    0x7Du8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::AbsoluteX, name: "ADC" },
    0x79u8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::AbsoluteY, name: "ADC" },
    0x61u8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::IndirectX, name: "ADC" },
    0x71u8 => Instruction { mnemonic: Mnemonic::Adc, mode: AddressingMode::IndirectY, name: "ADC" },

    // AND Instructions
    0x29u8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::Immediate, name: "AND" },
    0x25u8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::ZeroPage, name: "AND" },
    0x35u8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::ZeroPageX, name: "AND" },
    0x2Du8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::Absolute, name: "AND" },
    0x3Du8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::AbsoluteX, name: "AND" },
    0x39u8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::AbsoluteY, name: "AND" },
    0x21u8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::IndirectX, name: "AND" },
    0x31u8 => Instruction { mnemonic: Mnemonic::And, mode: AddressingMode::IndirectY, name: "AND" },

    // ASL Instructions
    0x0Au8 => Instruction { mnemonic: Mnemonic::Asl, mode: AddressingMode::Accumulator, name: "ASL" },
    0x06u8 => Instruction { mnemonic: Mnemonic::Asl, mode: AddressingMode::ZeroPage, name: "ASL" },
    0x16u8 => Instruction { mnemonic: Mnemonic::Asl, mode: AddressingMode::ZeroPageX, name: "ASL" },
    0x0Eu8 => Instruction { mnemonic: Mnemonic::Asl, mode: AddressingMode::Absolute, name: "ASL" },
    0x1Eu8 => Instruction { mnemonic: Mnemonic::Asl, mode: AddressingMode::AbsoluteX, name: "ASL" },

    // Branch Instructions
    0x90u8 => Instruction { mnemonic: Mnemonic::Bcc, mode: AddressingMode::Relative, name: "BCC" },
    0xB0u8 => Instruction { mnemonic: Mnemonic::Bcs, mode: AddressingMode::Relative, name: "BCS" },
    0xF0u8 => Instruction { mnemonic: Mnemonic::Beq, mode: AddressingMode::Relative, name: "BEQ" },
    0x30u8 => Instruction { mnemonic: Mnemonic::Bmi, mode: AddressingMode::Relative, name: "BMI" },
    0xD0u8 => Instruction { mnemonic: Mnemonic::Bne, mode: AddressingMode::Relative, name: "BNE" },
    0x10u8 => Instruction { mnemonic: Mnemonic::Bpl, mode: AddressingMode::Relative, name: "BPL" },
    0x50u8 => Instruction { mnemonic: Mnemonic::Bvc, mode: AddressingMode::Relative, name: "BVC" },
    0x70u8 => Instruction { mnemonic: Mnemonic::Bvs, mode: AddressingMode::Relative, name: "BVS" },

    // BIT Instructions
    0x24u8 => Instruction { mnemonic: Mnemonic::Bit, mode: AddressingMode::ZeroPage, name: "BIT" },
    0x2Cu8 => Instruction { mnemonic: Mnemonic::Bit, mode: AddressingMode::Absolute, name: "BIT" },

    // BRK Instructions
    0x00u8 => Instruction { mnemonic: Mnemonic::Brk, mode: AddressingMode::Implicit, name: "BRK" },

    // Flag-clear Instructions
    0x18u8 => Instruction { mnemonic: Mnemonic::Clc, mode: AddressingMode::Implicit, name: "CLC" },
    0xD8u8 => Instruction { mnemonic: Mnemonic::Cld, mode: AddressingMode::Implicit, name: "CLD" },
    0x58u8 => Instruction { mnemonic: Mnemonic::Cli, mode: AddressingMode::Implicit, name: "CLI" },
    0xB8u8 => Instruction { mnemonic: Mnemonic::Clv, mode: AddressingMode::Implicit, name: "CLV" },

    // CMP Instructions
    0xC9u8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::Immediate, name: "CMP" },
    0xC5u8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::ZeroPage, name: "CMP" },
    0xD5u8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::ZeroPageX, name: "CMP" },
    0xCDu8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::Absolute, name: "CMP" },
    0xDDu8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::AbsoluteX, name: "CMP" },
    0xD9u8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::AbsoluteY, name: "CMP" },
    0xC1u8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::IndirectX, name: "CMP" },
    0xD1u8 => Instruction { mnemonic: Mnemonic::Cmp, mode: AddressingMode::IndirectY, name: "CMP" },

    // CPX Instructions
    0xE0u8 => Instruction { mnemonic: Mnemonic::Cpx, mode: AddressingMode::Immediate, name: "CPX" },
    0xE4u8 => Instruction { mnemonic: Mnemonic::Cpx, mode: AddressingMode::ZeroPage, name: "CPX" },
    0xECu8 => Instruction { mnemonic: Mnemonic::Cpx, mode: AddressingMode::Absolute, name: "CPX" },

    // CPY Instructions
    0xC0u8 => Instruction { mnemonic: Mnemonic::Cpy, mode: AddressingMode::Immediate, name: "CPY" },
    0xC4u8 => Instruction { mnemonic: Mnemonic::Cpy, mode: AddressingMode::ZeroPage, name: "CPY" },
    0xCCu8 => Instruction { mnemonic: Mnemonic::Cpy, mode: AddressingMode::Absolute, name: "CPY" },

    // DEC Instructions
    0xC6u8 => Instruction { mnemonic: Mnemonic::Dec, mode: AddressingMode::ZeroPage, name: "DEC" },
    0xD6u8 => Instruction { mnemonic: Mnemonic::Dec, mode: AddressingMode::ZeroPageX, name: "DEC" },
    0xCEu8 => Instruction { mnemonic: Mnemonic::Dec, mode: AddressingMode::Absolute, name: "DEC" },
    0xDEu8 => Instruction { mnemonic: Mnemonic::Dec, mode: AddressingMode::AbsoluteX, name: "DEC" },

    // DEX / DEY Instructions
    0xCAu8 => Instruction { mnemonic: Mnemonic::Dex, mode: AddressingMode::Implicit, name: "DEX" },
    0x88u8 => Instruction { mnemonic: Mnemonic::Dey, mode: AddressingMode::Implicit, name: "DEY" },

    // EOR Instructions
    0x49u8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::Immediate, name: "EOR" },
    0x45u8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::ZeroPage, name: "EOR" },
    0x55u8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::ZeroPageX, name: "EOR" },
    0x4Du8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::Absolute, name: "EOR" },
    0x5Du8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::AbsoluteX, name: "EOR" },
    0x59u8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::AbsoluteY, name: "EOR" },
    0x41u8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::IndirectX, name: "EOR" },
    0x51u8 => Instruction { mnemonic: Mnemonic::Eor, mode: AddressingMode::IndirectY, name: "EOR" },

    // INC Instructions
    0xE6u8 => Instruction { mnemonic: Mnemonic::Inc, mode: AddressingMode::ZeroPage, name: "INC" },
    0xF6u8 => Instruction { mnemonic: Mnemonic::Inc, mode: AddressingMode::ZeroPageX, name: "INC" },
    0xEEu8 => Instruction { mnemonic: Mnemonic::Inc, mode: AddressingMode::Absolute, name: "INC" },
    0xFEu8 => Instruction { mnemonic: Mnemonic::Inc, mode: AddressingMode::AbsoluteX, name: "INC" },

    // INX / INY Instructions
    0xE8u8 => Instruction { mnemonic: Mnemonic::Inx, mode: AddressingMode::Implicit, name: "INX" },
    0xC8u8 => Instruction { mnemonic: Mnemonic::Iny, mode: AddressingMode::Implicit, name: "INY" },

    // JMP Instructions
    0x4Cu8 => Instruction { mnemonic: Mnemonic::Jmp, mode: AddressingMode::Absolute, name: "JMP" },
    0x6Cu8 => Instruction { mnemonic: Mnemonic::Jmp, mode: AddressingMode::Indirect, name: "JMP" },

    // JSR Instructions
    0x20u8 => Instruction { mnemonic: Mnemonic::Jsr, mode: AddressingMode::Absolute, name: "JSR" },

    // LDA Instructions
    0xA9u8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::Immediate, name: "LDA" },
    0xA5u8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::ZeroPage, name: "LDA" },
    0xB5u8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::ZeroPageX, name: "LDA" },
    0xADu8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::Absolute, name: "LDA" },
    0xBDu8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::AbsoluteX, name: "LDA" },
    0xB9u8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::AbsoluteY, name: "LDA" },
    0xA1u8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::IndirectX, name: "LDA" },
    0xB1u8 => Instruction { mnemonic: Mnemonic::Lda, mode: AddressingMode::IndirectY, name: "LDA" },

    // LDX Instructions
    0xA2u8 => Instruction { mnemonic: Mnemonic::Ldx, mode: AddressingMode::Immediate, name: "LDX" },
    0xA6u8 => Instruction { mnemonic: Mnemonic::Ldx, mode: AddressingMode::ZeroPage, name: "LDX" },
    0xB6u8 => Instruction { mnemonic: Mnemonic::Ldx, mode: AddressingMode::ZeroPageY, name: "LDX" },
    0xAEu8 => Instruction { mnemonic: Mnemonic::Ldx, mode: AddressingMode::Absolute, name: "LDX" },
    0xBEu8 => Instruction { mnemonic: Mnemonic::Ldx, mode: AddressingMode::AbsoluteY, name: "LDX" },

    // LDY Instructions
    0xA0u8 => Instruction { mnemonic: Mnemonic::Ldy, mode: AddressingMode::Immediate, name: "LDY" },
    0xA4u8 => Instruction { mnemonic: Mnemonic::Ldy, mode: AddressingMode::ZeroPage, name: "LDY" },
    0xB4u8 => Instruction { mnemonic: Mnemonic::Ldy, mode: AddressingMode::ZeroPageX, name: "LDY" },
    0xACu8 => Instruction { mnemonic: Mnemonic::Ldy, mode: AddressingMode::Absolute, name: "LDY" },
    0xBCu8 => Instruction { mnemonic: Mnemonic::Ldy, mode: AddressingMode::AbsoluteX, name: "LDY" },

    // LSR Instructions
    0x4Au8 => Instruction { mnemonic: Mnemonic::Lsr, mode: AddressingMode::Accumulator, name: "LSR" },
    0x46u8 => Instruction { mnemonic: Mnemonic::Lsr, mode: AddressingMode::ZeroPage, name: "LSR" },
    0x56u8 => Instruction { mnemonic: Mnemonic::Lsr, mode: AddressingMode::ZeroPageX, name: "LSR" },
    0x4Eu8 => Instruction { mnemonic: Mnemonic::Lsr, mode: AddressingMode::Absolute, name: "LSR" },
    0x5Eu8 => Instruction { mnemonic: Mnemonic::Lsr, mode: AddressingMode::AbsoluteX, name: "LSR" },

    // NOP Instructions
    0xEAu8 => Instruction { mnemonic: Mnemonic::Nop, mode: AddressingMode::Implicit, name: "NOP" },

    // ORA Instructions
    0x09u8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::Immediate, name: "ORA" },
    0x05u8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::ZeroPage, name: "ORA" },
    0x15u8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::ZeroPageX, name: "ORA" },
    0x0Du8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::Absolute, name: "ORA" },
    0x1Du8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::AbsoluteX, name: "ORA" },
    0x19u8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::AbsoluteY, name: "ORA" },
    0x01u8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::IndirectX, name: "ORA" },
    0x11u8 => Instruction { mnemonic: Mnemonic::Ora, mode: AddressingMode::IndirectY, name: "ORA" },

    // Stack Instructions
    0x48u8 => Instruction { mnemonic: Mnemonic::Pha, mode: AddressingMode::Implicit, name: "PHA" },
    0x08u8 => Instruction { mnemonic: Mnemonic::Php, mode: AddressingMode::Implicit, name: "PHP" },
    0x68u8 => Instruction { mnemonic: Mnemonic::Pla, mode: AddressingMode::Implicit, name: "PLA" },
    0x28u8 => Instruction { mnemonic: Mnemonic::Plp, mode: AddressingMode::Implicit, name: "PLP" },

    // ROL Instructions
    0x2Au8 => Instruction { mnemonic: Mnemonic::Rol, mode: AddressingMode::Accumulator, name: "ROL" },
    0x26u8 => Instruction { mnemonic: Mnemonic::Rol, mode: AddressingMode::ZeroPage, name: "ROL" },
    0x36u8 => Instruction { mnemonic: Mnemonic::Rol, mode: AddressingMode::ZeroPageX, name: "ROL" },
    0x2Eu8 => Instruction { mnemonic: Mnemonic::Rol, mode: AddressingMode::Absolute, name: "ROL" },
    0x3Eu8 => Instruction { mnemonic: Mnemonic::Rol, mode: AddressingMode::AbsoluteX, name: "ROL" },

    // ROR Instructions
    0x6Au8 => Instruction { mnemonic: Mnemonic::Ror, mode: AddressingMode::Accumulator, name: "ROR" },
    0x66u8 => Instruction { mnemonic: Mnemonic::Ror, mode: AddressingMode::ZeroPage, name: "ROR" },
    0x76u8 => Instruction { mnemonic: Mnemonic::Ror, mode: AddressingMode::ZeroPageX, name: "ROR" },
    0x6Eu8 => Instruction { mnemonic: Mnemonic::Ror, mode: AddressingMode::Absolute, name: "ROR" },
    0x7Eu8 => Instruction { mnemonic: Mnemonic::Ror, mode: AddressingMode::AbsoluteX, name: "ROR" },

    // RTI / RTS Instructions
    0x40u8 => Instruction { mnemonic: Mnemonic::Rti, mode: AddressingMode::Implicit, name: "RTI" },
    0x60u8 => Instruction { mnemonic: Mnemonic::Rts, mode: AddressingMode::Implicit, name: "RTS" },

    // SBC Instructions
    0xE9u8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::Immediate, name: "SBC" },
    0xE5u8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::ZeroPage, name: "SBC" },
    0xF5u8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::ZeroPageX, name: "SBC" },
    0xEDu8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::Absolute, name: "SBC" },
    0xFDu8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::AbsoluteX, name: "SBC" },
    0xF9u8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::AbsoluteY, name: "SBC" },
    0xE1u8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::IndirectX, name: "SBC" },
    0xF1u8 => Instruction { mnemonic: Mnemonic::Sbc, mode: AddressingMode::IndirectY, name: "SBC" },

    // Flag-set Instructions
    0x38u8 => Instruction { mnemonic: Mnemonic::Sec, mode: AddressingMode::Implicit, name: "SEC" },
    0xF8u8 => Instruction { mnemonic: Mnemonic::Sed, mode: AddressingMode::Implicit, name: "SED" },
    0x78u8 => Instruction { mnemonic: Mnemonic::Sei, mode: AddressingMode::Implicit, name: "SEI" },

    // STA Instructions
    0x85u8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::ZeroPage, name: "STA" },
    0x95u8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::ZeroPageX, name: "STA" },
    0x8Du8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::Absolute, name: "STA" },
    0x9Du8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::AbsoluteX, name: "STA" },
    0x99u8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::AbsoluteY, name: "STA" },
    0x81u8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::IndirectX, name: "STA" },
    0x91u8 => Instruction { mnemonic: Mnemonic::Sta, mode: AddressingMode::IndirectY, name: "STA" },

    // STX Instructions
    0x86u8 => Instruction { mnemonic: Mnemonic::Stx, mode: AddressingMode::ZeroPage, name: "STX" },
    0x96u8 => Instruction { mnemonic: Mnemonic::Stx, mode: AddressingMode::ZeroPageY, name: "STX" },
    0x8Eu8 => Instruction { mnemonic: Mnemonic::Stx, mode: AddressingMode::Absolute, name: "STX" },

    // STY Instructions
    0x84u8 => Instruction { mnemonic: Mnemonic::Sty, mode: AddressingMode::ZeroPage, name: "STY" },
    0x94u8 => Instruction { mnemonic: Mnemonic::Sty, mode: AddressingMode::ZeroPageX, name: "STY" },
    0x8Cu8 => Instruction { mnemonic: Mnemonic::Sty, mode: AddressingMode::Absolute, name: "STY" },

    // Transfer Instructions
    0xAAu8 => Instruction { mnemonic: Mnemonic::Tax, mode: AddressingMode::Implicit, name: "TAX" },
    0xA8u8 => Instruction { mnemonic: Mnemonic::Tay, mode: AddressingMode::Implicit, name: "TAY" },
    0xBAu8 => Instruction { mnemonic: Mnemonic::Tsx, mode: AddressingMode::Implicit, name: "TSX" },
    0x8Au8 => Instruction { mnemonic: Mnemonic::Txa, mode: AddressingMode::Implicit, name: "TXA" },
    0x9Au8 => Instruction { mnemonic: Mnemonic::Txs, mode: AddressingMode::Implicit, name: "TXS" },
    0x98u8 => Instruction { mnemonic: Mnemonic::Tya, mode: AddressingMode::Implicit, name: "TYA" },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_opcode_count() {
        let count = (0u16..=0xFF).filter(|op| lookup(*op as u8).is_some()).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn test_lookup_spot_checks() {
        let lda = lookup(0xA9).unwrap();
        assert_eq!(lda.mnemonic, Mnemonic::Lda);
        assert_eq!(lda.mode, AddressingMode::Immediate);
        assert_eq!(lda.name, "LDA");

        let jmp = lookup(0x6C).unwrap();
        assert_eq!(jmp.mnemonic, Mnemonic::Jmp);
        assert_eq!(jmp.mode, AddressingMode::Indirect);

        let brk = lookup(0x00).unwrap();
        assert_eq!(brk.mnemonic, Mnemonic::Brk);
        assert_eq!(brk.mode, AddressingMode::Implicit);
    }

    #[test]
    fn test_undocumented_opcodes_missing() {
        for op in [0x02u8, 0x3F, 0x80, 0xFF] {
            assert!(lookup(op).is_none(), "{op:#04x} should not decode");
        }
    }

    #[test]
    fn test_stores_always_decode_to_address_modes() {
        // The executor requires an effective address for every store; the
        // table must never pair one with an immediate, accumulator or
        // implied mode.
        for op in 0u16..=0xFF {
            if let Some(instr) = lookup(op as u8) {
                if matches!(instr.mnemonic, Mnemonic::Sta | Mnemonic::Stx | Mnemonic::Sty) {
                    assert!(
                        !matches!(
                            instr.mode,
                            AddressingMode::Accumulator
                                | AddressingMode::Immediate
                                | AddressingMode::Implicit
                        ),
                        "{:#04x} pairs a store with a non-address mode",
                        op
                    );
                }
            }
        }
    }

    #[test]
    fn test_branches_are_relative() {
        for op in [0x90u8, 0xB0, 0xF0, 0x30, 0xD0, 0x10, 0x50, 0x70] {
            assert_eq!(lookup(op).unwrap().mode, AddressingMode::Relative);
        }
    }
}
