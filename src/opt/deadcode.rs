// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Unreachable-code elimination.
//!
//! Instructions after an unconditional transfer (`JMP`, `RTS`, `RTI`) can
//! only run if something branches to them, so the sweep kills records
//! until it reaches a label, a branch target, a disabled record, or a
//! record with no instruction. Already-dead records are not re-counted;
//! a sweep that finds nothing new reports zero.

use crate::program::Program;

pub fn run(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        let terminates = line.matchable()
            && line.mnemonic.map(|m| m.is_terminator()).unwrap_or(false);
        if !terminates {
            continue;
        }

        for k in idx + 1..prog.len() {
            let line = &prog.lines[k];
            if line.is_branch_target
                || line.label.is_some()
                || line.no_optimize
                || line.opcode.is_none()
            {
                break;
            }
            if !line.is_dead {
                prog.lines[k].is_dead = true;
                count += 1;
            }
        }
    }

    count
}
