// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Mnemonics and structured operands.
//!
//! Opcode text is parsed into a closed [`Mnemonic`] enum and operand text
//! into an [`Operand`] with an addressing-mode tag, so that pattern matching
//! works on structure (`#$00` equals `#0`) instead of literal strings.
//! Unrecognized opcodes keep their raw text on the record and are inert to
//! every optimization pattern.

use std::fmt;

/// Every mnemonic the optimizer understands, across the 6502, 65C02, 65816
/// and 45GS02.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    // Loads and stores
    Lda,
    Ldx,
    Ldy,
    Ldz,
    Sta,
    Stx,
    Sty,
    Stz,
    // Transfers
    Tax,
    Txa,
    Tay,
    Tya,
    Taz,
    Tza,
    Tsx,
    Txs,
    // Increment / decrement
    Inx,
    Iny,
    Inz,
    Dex,
    Dey,
    Dez,
    Inc,
    Dec,
    // Arithmetic and logic
    Adc,
    Sbc,
    And,
    Ora,
    Eor,
    // Shifts and rotates
    Asl,
    Lsr,
    Rol,
    Ror,
    // Comparison
    Cmp,
    Cpx,
    Cpy,
    Cpz,
    // Flag manipulation
    Clc,
    Sec,
    Clv,
    Cli,
    Sei,
    Cld,
    Sed,
    // Stack
    Pha,
    Php,
    Pla,
    Plp,
    // Branches
    Bcc,
    Bcs,
    Beq,
    Bne,
    Bmi,
    Bpl,
    Bvc,
    Bvs,
    Bra,
    // Jumps and returns
    Jmp,
    Jsr,
    Rts,
    Rti,
    // 45GS02 extensions
    Neg,
    Asr,
    // Misc
    Bit,
    Nop,
}

impl Mnemonic {
    /// Parse opcode text case-insensitively. Returns `None` for directives
    /// and anything else the optimizer does not model.
    pub fn parse(text: &str) -> Option<Mnemonic> {
        let upper = text.to_ascii_uppercase();
        let m = match upper.as_str() {
            "LDA" => Mnemonic::Lda,
            "LDX" => Mnemonic::Ldx,
            "LDY" => Mnemonic::Ldy,
            "LDZ" => Mnemonic::Ldz,
            "STA" => Mnemonic::Sta,
            "STX" => Mnemonic::Stx,
            "STY" => Mnemonic::Sty,
            "STZ" => Mnemonic::Stz,
            "TAX" => Mnemonic::Tax,
            "TXA" => Mnemonic::Txa,
            "TAY" => Mnemonic::Tay,
            "TYA" => Mnemonic::Tya,
            "TAZ" => Mnemonic::Taz,
            "TZA" => Mnemonic::Tza,
            "TSX" => Mnemonic::Tsx,
            "TXS" => Mnemonic::Txs,
            "INX" => Mnemonic::Inx,
            "INY" => Mnemonic::Iny,
            "INZ" => Mnemonic::Inz,
            "DEX" => Mnemonic::Dex,
            "DEY" => Mnemonic::Dey,
            "DEZ" => Mnemonic::Dez,
            "INC" => Mnemonic::Inc,
            "DEC" => Mnemonic::Dec,
            "ADC" => Mnemonic::Adc,
            "SBC" => Mnemonic::Sbc,
            "AND" => Mnemonic::And,
            "ORA" => Mnemonic::Ora,
            "EOR" => Mnemonic::Eor,
            "ASL" => Mnemonic::Asl,
            "LSR" => Mnemonic::Lsr,
            "ROL" => Mnemonic::Rol,
            "ROR" => Mnemonic::Ror,
            "CMP" => Mnemonic::Cmp,
            "CPX" => Mnemonic::Cpx,
            "CPY" => Mnemonic::Cpy,
            "CPZ" => Mnemonic::Cpz,
            "CLC" => Mnemonic::Clc,
            "SEC" => Mnemonic::Sec,
            "CLV" => Mnemonic::Clv,
            "CLI" => Mnemonic::Cli,
            "SEI" => Mnemonic::Sei,
            "CLD" => Mnemonic::Cld,
            "SED" => Mnemonic::Sed,
            "PHA" => Mnemonic::Pha,
            "PHP" => Mnemonic::Php,
            "PLA" => Mnemonic::Pla,
            "PLP" => Mnemonic::Plp,
            "BCC" => Mnemonic::Bcc,
            "BCS" => Mnemonic::Bcs,
            "BEQ" => Mnemonic::Beq,
            "BNE" => Mnemonic::Bne,
            "BMI" => Mnemonic::Bmi,
            "BPL" => Mnemonic::Bpl,
            "BVC" => Mnemonic::Bvc,
            "BVS" => Mnemonic::Bvs,
            "BRA" => Mnemonic::Bra,
            "JMP" => Mnemonic::Jmp,
            "JSR" => Mnemonic::Jsr,
            "RTS" => Mnemonic::Rts,
            "RTI" => Mnemonic::Rti,
            "NEG" => Mnemonic::Neg,
            "ASR" => Mnemonic::Asr,
            "BIT" => Mnemonic::Bit,
            "NOP" => Mnemonic::Nop,
            _ => return None,
        };
        Some(m)
    }

    /// Canonical upper-case spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Ldz => "LDZ",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Stz => "STZ",
            Mnemonic::Tax => "TAX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tya => "TYA",
            Mnemonic::Taz => "TAZ",
            Mnemonic::Tza => "TZA",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txs => "TXS",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Inz => "INZ",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Dez => "DEZ",
            Mnemonic::Inc => "INC",
            Mnemonic::Dec => "DEC",
            Mnemonic::Adc => "ADC",
            Mnemonic::Sbc => "SBC",
            Mnemonic::And => "AND",
            Mnemonic::Ora => "ORA",
            Mnemonic::Eor => "EOR",
            Mnemonic::Asl => "ASL",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Cpz => "CPZ",
            Mnemonic::Clc => "CLC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cli => "CLI",
            Mnemonic::Sei => "SEI",
            Mnemonic::Cld => "CLD",
            Mnemonic::Sed => "SED",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Bra => "BRA",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Rts => "RTS",
            Mnemonic::Rti => "RTI",
            Mnemonic::Neg => "NEG",
            Mnemonic::Asr => "ASR",
            Mnemonic::Bit => "BIT",
            Mnemonic::Nop => "NOP",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addressing-mode classification of an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandKind {
    /// Immediate value (`#$00`, `#0`, `#%00001111`).
    Immediate(i64),
    /// Explicit accumulator operand (`A`).
    Accumulator,
    /// Anything else: addresses, labels, expressions. Kept uninterpreted.
    Address,
}

/// An instruction operand: the raw source text plus its parsed kind.
#[derive(Debug, Clone, Eq)]
pub struct Operand {
    raw: String,
    kind: OperandKind,
}

impl Operand {
    pub fn parse(text: &str) -> Option<Operand> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let kind = if let Some(value) = parse_immediate(trimmed) {
            OperandKind::Immediate(value)
        } else if trimmed.eq_ignore_ascii_case("A") {
            OperandKind::Accumulator
        } else {
            OperandKind::Address
        };
        Some(Operand {
            raw: trimmed.to_string(),
            kind,
        })
    }

    pub fn immediate(value: i64) -> Operand {
        Operand {
            raw: format!("#${value:02X}"),
            kind: OperandKind::Immediate(value),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &OperandKind {
        &self.kind
    }

    pub fn immediate_value(&self) -> Option<i64> {
        match self.kind {
            OperandKind::Immediate(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self.kind, OperandKind::Immediate(_))
    }

    pub fn is_accumulator(&self) -> bool {
        matches!(self.kind, OperandKind::Accumulator)
    }
}

/// Operands compare structurally for immediates (`#$00` == `#0`) and
/// textually otherwise.
impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (OperandKind::Immediate(a), OperandKind::Immediate(b)) => a == b,
            (OperandKind::Accumulator, OperandKind::Accumulator) => true,
            _ => self.raw == other.raw,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_immediate(text: &str) -> Option<i64> {
    let body = text.strip_prefix('#')?;
    let body = body.trim();
    if let Some(hex) = body.strip_prefix('$') {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = body.strip_prefix('%') {
        return i64::from_str_radix(bin, 2).ok();
    }
    body.parse::<i64>().ok()
}
