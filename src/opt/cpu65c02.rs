// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! 65C02 store-zero rewriting.
//!
//! After `LDA #$00`, every following `STA addr` on the same straight-line
//! path can become `STZ addr`, and the load itself dies once nothing else
//! reads the zero. Gated off for the 45GS02: there STZ stores the Z
//! register, not the constant zero, so this rewrite would corrupt stores
//! whenever Z is nonzero.

use crate::config::RunConfig;
use crate::program::{Effect, Mnemonic, Program};

pub fn run(prog: &mut Program, config: &RunConfig) -> usize {
    if !config.cpu.allow_65c02() || config.cpu.is_45gs02() {
        return 0;
    }

    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        if !line.matchable() || !line.is(Mnemonic::Lda) || line.immediate() != Some(0) {
            continue;
        }

        let mut stores = Vec::new();
        let mut a_used = false;

        for j in idx + 1..prog.len() {
            let line = &prog.lines[j];
            if line.is_dead {
                continue;
            }
            // Joined or opaque records end the path with A's fate unknown.
            if line.is_branch_target || line.no_optimize {
                a_used = true;
                break;
            }
            let Some(m) = line.mnemonic else {
                if line.opcode.is_some() {
                    a_used = true;
                    break;
                }
                continue;
            };
            if m == Mnemonic::Sta {
                stores.push(j);
                continue;
            }
            if m.reads_a_value() {
                a_used = true;
                break;
            }
            if m.overwrites_a() {
                break;
            }
            match m.effect() {
                // Control leaves the window; the continuation may read A.
                Effect::Branch
                | Effect::Jump
                | Effect::Call
                | Effect::Return
                | Effect::ReturnInterrupt => {
                    a_used = true;
                    break;
                }
                Effect::RmwShift(_) | Effect::RmwIncDec if line.targets_accumulator() => {
                    a_used = true;
                    break;
                }
                Effect::NegateA | Effect::AsrA => {
                    a_used = true;
                    break;
                }
                _ => {}
            }
        }

        for &store in &stores {
            let operand = prog.lines[store].operand.clone();
            prog.lines[store].rewrite(Mnemonic::Stz, operand);
            count += 1;
        }
        if !stores.is_empty() && !a_used && !prog.lines[idx].is_branch_target {
            prog.lines[idx].is_dead = true;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CpuTarget;
    use crate::opt::tests::{config_for, program};

    #[test]
    fn stores_of_zero_become_stz() {
        let mut prog = program("    LDA #$00\n    STA $D020\n    STA $D021\n    LDA #$05\n");
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mos65C02)), 2);
        assert!(prog.lines[1].is(Mnemonic::Stz));
        assert!(prog.lines[2].is(Mnemonic::Stz));
        assert_eq!(prog.lines[1].operand.as_ref().map(|o| o.raw()), Some("$D020"));
        assert!(prog.lines[0].is_dead);
    }

    #[test]
    fn load_survives_when_accumulator_is_read_later() {
        let mut prog = program("    LDA #$00\n    STA $D020\n    TAX\n");
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mos65C02)), 1);
        assert!(prog.lines[1].is(Mnemonic::Stz));
        assert!(!prog.lines[0].is_dead);
    }

    #[test]
    fn load_survives_across_return() {
        // The caller may rely on A holding zero.
        let mut prog = program("    LDA #$00\n    STA $D020\n    RTS\n");
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mos65C02)), 1);
        assert!(!prog.lines[0].is_dead);
    }

    #[test]
    fn plain_6502_is_left_alone() {
        let mut prog = program("    LDA #$00\n    STA $D020\n");
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mos6502)), 0);
        assert!(prog.lines[1].is(Mnemonic::Sta));
    }

    #[test]
    fn gs02_is_left_alone() {
        // STZ means "store Z" on the 45GS02.
        let mut prog = program("    LDA #$00\n    STA $D020\n");
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mega45Gs02)), 0);
        assert!(prog.lines[1].is(Mnemonic::Sta));
    }

    #[test]
    fn scan_stops_at_branch_target() {
        let mut prog = program("    LDA #$00\n    STA $10\nhere:\n    STA $11\n");
        let _ = crate::analysis::labels::analyze(&mut prog);
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mos65816)), 1);
        assert!(prog.lines[1].is(Mnemonic::Stz));
        assert!(prog.lines[3].is(Mnemonic::Sta));
        assert!(!prog.lines[0].is_dead);
    }

    #[test]
    fn nonzero_immediate_is_ignored() {
        let mut prog = program("    LDA #$01\n    STA $D020\n");
        assert_eq!(run(&mut prog, &config_for(CpuTarget::Mos65C02)), 0);
    }
}
