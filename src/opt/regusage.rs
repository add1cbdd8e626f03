// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Register usage pass: adjacent round-trip transfer elimination.
//!
//! `TAX;TXA` and `TAY;TYA` pairs cancel out. The match window is exactly
//! two adjacent live records, which is what makes this sound without a
//! liveness check: nothing can read the index register in between. Do not
//! widen this window without adding real liveness analysis.

use crate::program::{Mnemonic, Program};

use super::window_next;

const PAIRS: &[(Mnemonic, Mnemonic)] = &[
    (Mnemonic::Tax, Mnemonic::Txa),
    (Mnemonic::Tay, Mnemonic::Tya),
];

pub fn run(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        // Branch targets are protected from removal, so a labeled transfer
        // never starts a match.
        if !line.matchable() || line.is_branch_target {
            continue;
        }
        let Some(&(_, back)) = PAIRS.iter().find(|(fwd, _)| line.is(*fwd)) else {
            continue;
        };
        let Some(next) = window_next(prog, idx) else {
            continue;
        };
        if prog.lines[next].matchable() && prog.lines[next].is(back) {
            prog.lines[idx].is_dead = true;
            prog.lines[next].is_dead = true;
            count += 1;
        }
    }

    count
}
