// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Load/store pass.
//!
//! Matches the same `LDA v / STA addr / LDA v` window as the peephole pass.
//! The duplication is deliberate: the two passes were always separate in
//! this optimizer's lineage and are kept as independent sweeps.

use crate::program::{Mnemonic, Program};

use super::window_next;

pub fn run(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        if !line.matchable() || !line.is(Mnemonic::Lda) || line.operand.is_none() {
            continue;
        }

        let store = match window_next(prog, idx) {
            Some(i) if prog.lines[i].matchable() && prog.lines[i].is(Mnemonic::Sta) => i,
            _ => continue,
        };
        let reload = match window_next(prog, store) {
            Some(i) if prog.lines[i].matchable() && prog.lines[i].is(Mnemonic::Lda) => i,
            _ => continue,
        };

        if prog.lines[reload].operand == prog.lines[idx].operand {
            prog.lines[reload].is_dead = true;
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Dialect;

    fn program(src: &str) -> Program {
        Program::from_source(src, Dialect::generic())
    }

    #[test]
    fn reload_of_same_address_is_dropped() {
        let mut prog = program("    LDA counter\n    STA backup\n    LDA counter\n");
        assert_eq!(run(&mut prog), 1);
        assert!(prog.lines[2].is_dead);
    }

    #[test]
    fn reload_of_different_address_survives() {
        let mut prog = program("    LDA counter\n    STA backup\n    LDA other\n");
        assert_eq!(run(&mut prog), 0);
    }

    #[test]
    fn dead_records_are_transparent() {
        let mut prog = program("    LDA $10\n    NOP\n    STA $20\n    LDA $10\n");
        prog.lines[1].is_dead = true;
        assert_eq!(run(&mut prog), 1);
        assert!(prog.lines[3].is_dead);
    }

    #[test]
    fn window_does_not_cross_disabled_record() {
        let src = "    LDA $10\n    STA $20\n; #NOOPT\n    LDA $10\n";
        let mut prog = program(src);
        assert_eq!(run(&mut prog), 0);
    }
}
