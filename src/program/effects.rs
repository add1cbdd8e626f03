// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Unified mnemonic effect table.
//!
//! One lookup from mnemonic to an effect descriptor, queried by both the
//! abstract register tracker and the optimization passes. Keeping a single
//! table avoids the tracker and the passes each growing their own divergent
//! idea of what an instruction touches.

use super::instr::Mnemonic;

/// CPU registers tracked by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    A,
    X,
    Y,
    /// 45GS02 Z register.
    Z,
}

/// Processor flags tracked by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    C,
    N,
    Z,
    V,
}

/// Shift/rotate family. LSR is singled out because it unconditionally
/// clears N; ROR's resulting N depends on the incoming carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Asl,
    Lsr,
    Rol,
    Ror,
}

/// Abstract effect of one mnemonic on registers and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No tracked effect (NOP, PHA, PHP, TXS, CLI/SEI/CLD/SED, stores).
    None,
    /// Register load; value known only for immediate addressing.
    Load(Reg),
    /// Register-to-register transfer propagating known state.
    Transfer { from: Reg, to: Reg },
    /// Transfer from the stack pointer; target becomes unknown (TSX).
    LoadUnknown(Reg),
    /// Implied increment/decrement of an index register.
    StepIndex(Reg),
    /// INC/DEC; touches A only in accumulator form.
    RmwIncDec,
    /// Shift or rotate; touches A only in accumulator form.
    RmwShift(ShiftKind),
    /// ADC/SBC: A and C/N/Z/V become unknown.
    Arithmetic,
    /// AND/ORA/EOR: A and N/Z become unknown.
    LogicA,
    /// CMP/CPX/CPY/CPZ: C/N/Z become unknown, registers untouched.
    Compare,
    /// CLC/SEC/CLV: one flag becomes statically known.
    SetFlag(Flag, bool),
    /// PLA: A unknown, N/Z unknown.
    PullA,
    /// PLP: all flags unknown.
    PullStatus,
    /// Conditional branch; no register or flag change.
    Branch,
    /// JMP; no register or flag change.
    Jump,
    /// JSR: conservatively invalidates every register and flag.
    Call,
    /// RTS; no register or flag change.
    Return,
    /// RTI: all flags restored from the stack, so all unknown.
    ReturnInterrupt,
    /// 45GS02 NEG: A, N, Z, C unknown.
    NegateA,
    /// 45GS02 ASR: A, N, Z, C unknown.
    AsrA,
    /// BIT: N, V, Z unknown; registers untouched.
    BitTest,
}

impl Mnemonic {
    /// Effect descriptor for this mnemonic.
    pub fn effect(self) -> Effect {
        use Mnemonic::*;
        match self {
            Lda => Effect::Load(Reg::A),
            Ldx => Effect::Load(Reg::X),
            Ldy => Effect::Load(Reg::Y),
            Ldz => Effect::Load(Reg::Z),
            Sta | Stx | Sty | Stz => Effect::None,
            Tax => Effect::Transfer {
                from: Reg::A,
                to: Reg::X,
            },
            Txa => Effect::Transfer {
                from: Reg::X,
                to: Reg::A,
            },
            Tay => Effect::Transfer {
                from: Reg::A,
                to: Reg::Y,
            },
            Tya => Effect::Transfer {
                from: Reg::Y,
                to: Reg::A,
            },
            Taz => Effect::Transfer {
                from: Reg::A,
                to: Reg::Z,
            },
            Tza => Effect::Transfer {
                from: Reg::Z,
                to: Reg::A,
            },
            Tsx => Effect::LoadUnknown(Reg::X),
            Txs => Effect::None,
            Inx => Effect::StepIndex(Reg::X),
            Iny => Effect::StepIndex(Reg::Y),
            Inz => Effect::StepIndex(Reg::Z),
            Dex => Effect::StepIndex(Reg::X),
            Dey => Effect::StepIndex(Reg::Y),
            Dez => Effect::StepIndex(Reg::Z),
            Inc | Dec => Effect::RmwIncDec,
            Adc | Sbc => Effect::Arithmetic,
            And | Ora | Eor => Effect::LogicA,
            Asl => Effect::RmwShift(ShiftKind::Asl),
            Lsr => Effect::RmwShift(ShiftKind::Lsr),
            Rol => Effect::RmwShift(ShiftKind::Rol),
            Ror => Effect::RmwShift(ShiftKind::Ror),
            Cmp | Cpx | Cpy | Cpz => Effect::Compare,
            Clc => Effect::SetFlag(Flag::C, false),
            Sec => Effect::SetFlag(Flag::C, true),
            Clv => Effect::SetFlag(Flag::V, false),
            Cli | Sei | Cld | Sed => Effect::None,
            Pha | Php => Effect::None,
            Pla => Effect::PullA,
            Plp => Effect::PullStatus,
            Bcc | Bcs | Beq | Bne | Bmi | Bpl | Bvc | Bvs | Bra => Effect::Branch,
            Jmp => Effect::Jump,
            Jsr => Effect::Call,
            Rts => Effect::Return,
            Rti => Effect::ReturnInterrupt,
            Neg => Effect::NegateA,
            Asr => Effect::AsrA,
            Bit => Effect::BitTest,
            Nop => Effect::None,
        }
    }

    /// Unconditional flow terminator: everything after it on the fall-through
    /// path is unreachable.
    pub fn is_terminator(self) -> bool {
        matches!(self, Mnemonic::Jmp | Mnemonic::Rts | Mnemonic::Rti)
    }

    /// Subroutine call.
    pub fn is_call(self) -> bool {
        matches!(self, Mnemonic::Jsr)
    }

    /// Instructions that consume the accumulator's current value without
    /// replacing it. Used by the 65C02 STZ pass to decide whether the
    /// original `LDA #0` must be kept.
    pub fn reads_a_value(self) -> bool {
        use Mnemonic::*;
        matches!(self, Adc | Sbc | And | Ora | Eor | Cmp | Bit | Pha | Tax | Tay)
    }

    /// Instructions that overwrite the accumulator without needing its
    /// previous value.
    pub fn overwrites_a(self) -> bool {
        matches!(
            self,
            Mnemonic::Lda | Mnemonic::Pla | Mnemonic::Txa | Mnemonic::Tya
        )
    }

    /// Instructions after which a remembered immediate accumulator value is
    /// no longer valid. Used by constant propagation. RMW mnemonics are in
    /// the set unconditionally: only their accumulator form touches A, but
    /// distinguishing the forms buys nothing worth the operand plumbing. A
    /// call invalidates because the callee may clobber A.
    pub fn invalidates_const_a(self) -> bool {
        use Mnemonic::*;
        matches!(
            self,
            Adc | Sbc
                | And
                | Ora
                | Eor
                | Lda
                | Pla
                | Txa
                | Tya
                | Tza
                | Asl
                | Lsr
                | Rol
                | Ror
                | Inc
                | Dec
                | Jsr
                | Neg
                | Asr
        )
    }

    /// Flags this mnemonic can change, in C/N/Z/V order. Drives the
    /// validator's flag-usage summary.
    pub fn flags_touched(self) -> [bool; 4] {
        match self.effect() {
            Effect::Load(_) | Effect::Transfer { .. } | Effect::LoadUnknown(_) => {
                [false, true, true, false]
            }
            Effect::StepIndex(_) | Effect::RmwIncDec | Effect::LogicA => {
                [false, true, true, false]
            }
            Effect::RmwShift(_) => [true, true, true, false],
            Effect::Arithmetic => [true, true, true, true],
            Effect::Compare => [true, true, true, false],
            Effect::SetFlag(flag, _) => match flag {
                Flag::C => [true, false, false, false],
                Flag::N => [false, true, false, false],
                Flag::Z => [false, false, true, false],
                Flag::V => [false, false, false, true],
            },
            Effect::PullA => [false, true, true, false],
            Effect::PullStatus | Effect::Call | Effect::ReturnInterrupt => {
                [true, true, true, true]
            }
            Effect::NegateA | Effect::AsrA => [true, true, true, false],
            Effect::BitTest => [false, true, true, true],
            Effect::None | Effect::Branch | Effect::Jump | Effect::Return => {
                [false, false, false, false]
            }
        }
    }
}
