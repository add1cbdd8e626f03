// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Abstract register and flag state tracking.
//!
//! A pure forward transfer function over the instruction stream: one step
//! per instruction, conservative everywhere a value cannot be derived
//! statically. There is no fixed-point dataflow across the CFG; instead,
//! every known bit is dropped when the traversal reaches a branch target,
//! which models join-over-all-paths in a single sweep.

use crate::program::effects::{Effect, Flag, Reg, ShiftKind};
use crate::program::AsmLine;

/// Knowledge about one register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegValue {
    pub known: bool,
    pub zero: bool,
    /// Known immediate value, when `known`.
    pub value: Option<i64>,
    /// Written by the most recent step.
    pub modified: bool,
}

impl RegValue {
    fn set_known(&mut self, value: i64) {
        self.known = true;
        self.zero = value == 0;
        self.value = Some(value);
        self.modified = true;
    }

    fn set_unknown(&mut self) {
        self.known = false;
        self.zero = false;
        self.value = None;
        self.modified = true;
    }
}

/// Knowledge about one processor flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagValue {
    pub known: bool,
    pub set: bool,
}

impl FlagValue {
    fn know(&mut self, set: bool) {
        self.known = true;
        self.set = set;
    }

    fn forget(&mut self) {
        self.known = false;
        self.set = false;
    }
}

/// Abstract CPU state threaded forward across the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterState {
    pub a: RegValue,
    pub x: RegValue,
    pub y: RegValue,
    /// 45GS02 Z register.
    pub z: RegValue,
    pub c: FlagValue,
    pub n: FlagValue,
    /// Zero flag (distinct from the Z register).
    pub zf: FlagValue,
    pub v: FlagValue,
}

impl RegisterState {
    pub fn reg(&self, reg: Reg) -> &RegValue {
        match reg {
            Reg::A => &self.a,
            Reg::X => &self.x,
            Reg::Y => &self.y,
            Reg::Z => &self.z,
        }
    }

    fn reg_mut(&mut self, reg: Reg) -> &mut RegValue {
        match reg {
            Reg::A => &mut self.a,
            Reg::X => &mut self.x,
            Reg::Y => &mut self.y,
            Reg::Z => &mut self.z,
        }
    }

    fn flag_mut(&mut self, flag: Flag) -> &mut FlagValue {
        match flag {
            Flag::C => &mut self.c,
            Flag::N => &mut self.n,
            Flag::Z => &mut self.zf,
            Flag::V => &mut self.v,
        }
    }

    fn forget_all_registers(&mut self) {
        self.a.set_unknown();
        self.x.set_unknown();
        self.y.set_unknown();
        self.z.set_unknown();
    }

    fn forget_all_flags(&mut self) {
        self.c.forget();
        self.n.forget();
        self.zf.forget();
        self.v.forget();
    }

    /// Drop every known bit without touching the modified markers. Applied
    /// at branch targets, where any path may join.
    pub fn merge_unknown(&mut self) {
        for reg in [Reg::A, Reg::X, Reg::Y, Reg::Z] {
            let r = self.reg_mut(reg);
            r.known = false;
            r.zero = false;
            r.value = None;
        }
        self.forget_all_flags();
    }
}

/// Advance the abstract state over one instruction.
///
/// Records without a recognized mnemonic leave the state untouched. The
/// branch-target merge is the caller's responsibility, applied after the
/// step for the record that carries the flag.
pub fn step(line: &AsmLine, mut state: RegisterState) -> RegisterState {
    state.a.modified = false;
    state.x.modified = false;
    state.y.modified = false;
    state.z.modified = false;

    let Some(mnemonic) = line.mnemonic else {
        return state;
    };

    match mnemonic.effect() {
        Effect::None | Effect::Branch | Effect::Jump | Effect::Return => {}
        Effect::Load(reg) => match line.immediate() {
            Some(value) => {
                state.reg_mut(reg).set_known(value);
                state.zf.know(value == 0);
                state.n.know(value & 0x80 != 0);
            }
            None => {
                state.reg_mut(reg).set_unknown();
                state.zf.forget();
                state.n.forget();
            }
        },
        Effect::Transfer { from, to } => {
            let source = *state.reg(from);
            let dest = state.reg_mut(to);
            dest.known = source.known;
            dest.zero = source.zero;
            dest.value = source.value;
            dest.modified = true;
            if source.known {
                state.zf.know(source.zero);
                state
                    .n
                    .know(source.value.map(|v| v & 0x80 != 0).unwrap_or(false));
            } else {
                state.zf.forget();
                state.n.forget();
            }
        }
        Effect::LoadUnknown(reg) => {
            state.reg_mut(reg).set_unknown();
            state.zf.forget();
            state.n.forget();
        }
        Effect::StepIndex(reg) => {
            state.reg_mut(reg).set_unknown();
            state.zf.forget();
            state.n.forget();
        }
        Effect::RmwIncDec => {
            if line.targets_accumulator() {
                state.a.set_unknown();
            }
            state.zf.forget();
            state.n.forget();
        }
        Effect::RmwShift(kind) => {
            if line.targets_accumulator() {
                state.a.set_unknown();
            }
            state.c.forget();
            state.zf.forget();
            match kind {
                // LSR shifts zero into bit 7: N is always clear afterwards.
                ShiftKind::Lsr => state.n.know(false),
                // ROR's resulting N is the incoming carry; stays unknown.
                _ => state.n.forget(),
            }
        }
        Effect::Arithmetic => {
            state.a.set_unknown();
            state.c.forget();
            state.n.forget();
            state.zf.forget();
            state.v.forget();
        }
        Effect::LogicA => {
            state.a.set_unknown();
            state.n.forget();
            state.zf.forget();
        }
        Effect::Compare => {
            state.c.forget();
            state.n.forget();
            state.zf.forget();
        }
        Effect::SetFlag(flag, value) => {
            state.flag_mut(flag).know(value);
        }
        Effect::PullA => {
            state.a.set_unknown();
            state.n.forget();
            state.zf.forget();
        }
        Effect::PullStatus => {
            state.forget_all_flags();
        }
        Effect::Call => {
            // No interprocedural summary: a subroutine may trash anything.
            state.forget_all_registers();
            state.forget_all_flags();
        }
        Effect::ReturnInterrupt => {
            state.forget_all_flags();
        }
        Effect::NegateA | Effect::AsrA => {
            state.a.set_unknown();
            state.n.forget();
            state.zf.forget();
            state.c.forget();
        }
        Effect::BitTest => {
            state.n.forget();
            state.v.forget();
            state.zf.forget();
        }
    }

    state
}
