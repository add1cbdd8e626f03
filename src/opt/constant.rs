// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Constant propagation for the accumulator.
//!
//! A single forward sweep tracks the last immediate loaded into A. A
//! reload of the same value is dead; anything that can change A, or any
//! control-flow join, resets the tracked value. Stores are transparent.

use crate::program::{Mnemonic, Program};

pub fn run(prog: &mut Program) -> usize {
    let mut count = 0;
    let mut known: Option<i64> = None;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];

        // Dead records never execute and are transparent to tracking.
        if line.is_dead {
            continue;
        }
        // Another path may reach a branch target with a different A, and a
        // disabled instruction still executes but cannot be reasoned about.
        if line.is_branch_target || line.no_optimize {
            known = None;
            continue;
        }
        let Some(mnemonic) = line.mnemonic else {
            continue;
        };

        if let Some(value) = line.immediate() {
            if mnemonic == Mnemonic::Lda {
                if known == Some(value) {
                    prog.lines[idx].is_dead = true;
                    count += 1;
                } else {
                    known = Some(value);
                }
                continue;
            }
        }

        if mnemonic.invalidates_const_a() {
            known = None;
        }
    }

    count
}
