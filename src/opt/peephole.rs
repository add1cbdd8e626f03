// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Peephole pass: redundant accumulator reload elimination.
//!
//! `LDA v / STA addr / LDA v` drops the second load: a store does not
//! change the accumulator, so it still holds `v`. The same rewrite also
//! lives in the load/store pass; the two stay separate on purpose, matching
//! the historical pass split.

use crate::program::{Mnemonic, Program};

use super::window_next;

pub fn run(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        if !prog.lines[idx].matchable() || !prog.lines[idx].is(Mnemonic::Lda) {
            continue;
        }
        let Some(first_operand) = prog.lines[idx].operand.clone() else {
            continue;
        };
        let Some(store) = window_next(prog, idx) else {
            continue;
        };
        if !prog.lines[store].matchable() || !prog.lines[store].is(Mnemonic::Sta) {
            continue;
        }
        let Some(reload) = window_next(prog, store) else {
            continue;
        };
        let reload_line = &prog.lines[reload];
        if !reload_line.matchable() || !reload_line.is(Mnemonic::Lda) {
            continue;
        }
        if reload_line.operand.as_ref() == Some(&first_operand) {
            prog.lines[reload].is_dead = true;
            count += 1;
        }
    }

    count
}
