// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Jump threading: a `JMP` to the label defined on the very next live
//! record is a fall-through and can be dropped.

use crate::program::{Mnemonic, Program};

pub fn run(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        if !line.matchable() || !line.is(Mnemonic::Jmp) || line.is_branch_target {
            continue;
        }
        let Some(target) = line.operand.as_ref().map(|op| op.raw().to_string()) else {
            continue;
        };
        let Some(next) = prog.next_live(idx) else {
            continue;
        };
        let next_line = &prog.lines[next];
        if next_line.is_branch_target
            && !next_line.no_optimize
            && next_line.label.as_deref() == Some(target.as_str())
        {
            prog.lines[idx].is_dead = true;
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opt::tests::program;

    fn analyzed(src: &str) -> Program {
        let mut prog = program(src);
        let _ = crate::analysis::labels::analyze(&mut prog);
        prog
    }

    #[test]
    fn jump_to_next_line_is_removed() {
        let mut prog = analyzed("    JMP next\nnext:\n    RTS\n");
        assert_eq!(run(&mut prog), 1);
        assert!(prog.lines[0].is_dead);
        assert!(!prog.lines[1].is_dead);
    }

    #[test]
    fn jump_over_code_is_kept() {
        let mut prog = analyzed("    JMP done\n    LDA #$01\ndone:\n    RTS\n");
        assert_eq!(run(&mut prog), 0);
    }

    #[test]
    fn jump_to_a_different_label_is_kept() {
        let mut prog = analyzed("    JMP other\nnext:\n    RTS\nother:\n    RTS\n");
        assert_eq!(run(&mut prog), 0);
    }

    #[test]
    fn labeled_jump_is_protected() {
        let mut prog = analyzed("hop:  JMP next\nnext:\n    RTS\n    JMP hop\n");
        assert_eq!(run(&mut prog), 0);
        assert!(!prog.lines[0].is_dead);
    }

    #[test]
    fn dead_records_between_jump_and_label_are_skipped() {
        let mut prog = analyzed("    JMP next\n    LDA #$01\nnext:\n    RTS\n");
        prog.lines[1].is_dead = true;
        assert_eq!(run(&mut prog), 1);
        assert!(prog.lines[0].is_dead);
    }
}
