// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! 45GS02 (MEGA65) rewriting.
//!
//! On this CPU `STZ` stores the Z register, so zero stores go through an
//! explicit `LDZ` instead of the 65C02 shortcut. The pass also folds the
//! classic two's-complement and sign-preserving shift sequences into the
//! native `NEG` and `ASR` instructions.

use crate::config::RunConfig;
use crate::program::{Mnemonic, Program};

use super::window_next;

pub fn run(prog: &mut Program, config: &RunConfig) -> usize {
    if !config.cpu.is_45gs02() {
        return 0;
    }

    let mut count = 0;
    count += fold_repeated_stores(prog);
    count += extend_z_stores(prog);
    count += fold_negate(prog);
    count += fold_signed_shift(prog);
    count
}

/// `LDA #v` feeding at least two stores of the same value becomes
/// `LDZ #v / STZ ...`. Only the load and the first store are rewritten
/// here; [`extend_z_stores`] picks the new `LDZ` up in the same sweep and
/// converts the rest of the chain, reloads included.
fn fold_repeated_stores(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        // A branch-target load must keep A semantics for its other
        // predecessors.
        if !line.matchable()
            || line.is_branch_target
            || !line.is(Mnemonic::Lda)
            || line.immediate().is_none()
        {
            continue;
        }
        let store = match window_next(prog, idx) {
            Some(i) if prog.lines[i].matchable() && prog.lines[i].is(Mnemonic::Sta) => i,
            _ => continue,
        };
        let Some(next) = window_next(prog, store) else {
            continue;
        };

        // A second store of the same value, either directly or via a
        // redundant reload, makes the Z register pay off.
        let next_line = &prog.lines[next];
        let chains = if next_line.matchable() && next_line.is(Mnemonic::Sta) {
            true
        } else if next_line.matchable()
            && next_line.is(Mnemonic::Lda)
            && next_line.operand == prog.lines[idx].operand
        {
            matches!(
                window_next(prog, next),
                Some(s) if prog.lines[s].matchable() && prog.lines[s].is(Mnemonic::Sta)
            )
        } else {
            false
        };
        if !chains {
            continue;
        }

        let value = prog.lines[idx].operand.clone();
        prog.lines[idx].rewrite(Mnemonic::Ldz, value);
        let addr = prog.lines[store].operand.clone();
        prog.lines[store].rewrite(Mnemonic::Stz, addr);
        count += 1;
    }

    count
}

/// With `LDZ #v` live, later stores of the same value keep using Z:
/// plain `STA` records become `STZ`, and `LDA #v / STA` pairs collapse to
/// a single `STZ`. The scan ends at any instruction that changes what is
/// being stored, and at branch targets, where Z is no longer certain.
fn extend_z_stores(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        if !line.matchable() || !line.is(Mnemonic::Ldz) || line.immediate().is_none() {
            continue;
        }
        let value = prog.lines[idx].operand.clone();

        let mut j = idx + 1;
        while j < prog.len() {
            let line = &prog.lines[j];
            if line.is_dead || line.no_optimize {
                j += 1;
                continue;
            }
            if line.is_branch_target {
                break;
            }

            if line.is(Mnemonic::Sta) {
                let addr = prog.lines[j].operand.clone();
                prog.lines[j].rewrite(Mnemonic::Stz, addr);
                count += 1;
                j += 1;
                continue;
            }

            if line.is(Mnemonic::Lda) && line.operand == value {
                if let Some(store) = prog.next_live(j) {
                    let store_line = &prog.lines[store];
                    if store_line.is(Mnemonic::Sta)
                        && !store_line.no_optimize
                        && !store_line.is_branch_target
                    {
                        prog.lines[j].is_dead = true;
                        let addr = prog.lines[store].operand.clone();
                        prog.lines[store].rewrite(Mnemonic::Stz, addr);
                        count += 1;
                        j = store + 1;
                        continue;
                    }
                }
                break;
            }

            if line.is(Mnemonic::Lda)
                || line.is(Mnemonic::Ldz)
                || line.is(Mnemonic::Tax)
                || line.is(Mnemonic::Tay)
            {
                break;
            }
            j += 1;
        }
    }

    count
}

/// `EOR #$FF / SEC / ADC #$00` is two's-complement negation; the 45GS02
/// spells that `NEG`.
fn fold_negate(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        if !line.matchable() || !line.is(Mnemonic::Eor) || line.immediate() != Some(0xFF) {
            continue;
        }
        let Some(sec) = window_next(prog, idx) else {
            continue;
        };
        let Some(adc) = window_next(prog, sec) else {
            continue;
        };
        if prog.lines[sec].matchable()
            && prog.lines[sec].is(Mnemonic::Sec)
            && prog.lines[adc].matchable()
            && prog.lines[adc].is(Mnemonic::Adc)
            && prog.lines[adc].immediate() == Some(0)
        {
            prog.lines[idx].rewrite(Mnemonic::Neg, None);
            prog.lines[sec].is_dead = true;
            prog.lines[adc].is_dead = true;
            count += 1;
        }
    }

    count
}

/// `CMP #$80 / ROR` (accumulator form) is the portable arithmetic shift
/// right; the 45GS02 has it as `ASR`.
fn fold_signed_shift(prog: &mut Program) -> usize {
    let mut count = 0;

    for idx in 0..prog.len() {
        let line = &prog.lines[idx];
        if !line.matchable() || !line.is(Mnemonic::Cmp) || line.immediate() != Some(0x80) {
            continue;
        }
        let Some(ror) = window_next(prog, idx) else {
            continue;
        };
        let ror_line = &prog.lines[ror];
        if ror_line.matchable() && ror_line.is(Mnemonic::Ror) && ror_line.targets_accumulator() {
            prog.lines[idx].rewrite(Mnemonic::Asr, None);
            prog.lines[ror].is_dead = true;
            count += 1;
        }
    }

    count
}
