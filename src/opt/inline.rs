// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Subroutine inlining.
//!
//! A subroutine called from exactly one place gains nothing from the
//! JSR/RTS round trip, so its body replaces the call and the original
//! definition dies, label included. Runs once before the fixed-point loop;
//! the spliced body is then optimized in place like any other code.
//!
//! Candidates are deliberately narrow: single caller, a cleanly bounded
//! body (one RTS, no intervening global label), no labels inside the body,
//! no nested calls, and no disabled records in either the body or the call
//! site. Retiring the
//! label is the one sanctioned way a branch target disappears; analysis
//! ignores dead records, so the flag does not come back.

use crate::analysis::labels::{analyze, LabelTable};
use crate::program::{AsmLine, Mnemonic, Program};
use crate::report::Diagnostic;

pub fn run(prog: &mut Program) -> (usize, Vec<Diagnostic>) {
    let mut count = 0;
    let mut diagnostics = Vec::new();
    let mut rejected: Vec<String> = Vec::new();

    // One inlining per analysis round: splicing shifts every index after
    // the call site, so the table is rebuilt before the next candidate.
    loop {
        let (table, _) = analyze(prog);
        let Some((def, end, call)) = pick_candidate(prog, &table, &mut rejected, &mut diagnostics)
        else {
            break;
        };

        let body: Vec<AsmLine> = prog.lines[def..end]
            .iter()
            .filter(|line| !line.is_dead)
            .map(|line| {
                let mut clone = line.clone();
                clone.label = None;
                clone.is_local_label = false;
                clone.is_branch_target = false;
                clone
            })
            .filter(|line| line.opcode.is_some())
            .collect();

        prog.lines[def].is_branch_target = false;
        for line in &mut prog.lines[def..=end] {
            line.is_dead = true;
        }
        prog.lines[call].is_dead = true;
        prog.lines.splice(call + 1..call + 1, body);
        count += 1;
    }

    (count, diagnostics)
}

/// First label worth inlining, as `(def, body_end, call_site)`. Labels with
/// a disabled body are reported once and skipped thereafter.
fn pick_candidate(
    prog: &Program,
    table: &LabelTable,
    rejected: &mut Vec<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(usize, usize, usize)> {
    for entry in &table.entries {
        if !entry.is_subroutine || entry.refs.len() != 1 {
            continue;
        }
        let Some(end) = entry.body_end else {
            continue;
        };
        let call = entry.refs[0];
        if !prog.lines[call].is(Mnemonic::Jsr) {
            continue;
        }
        // A call from inside the body is recursion.
        if (entry.def..=end).contains(&call) {
            continue;
        }
        // The splice drops label fields from the cloned records, so a label
        // inside the body (a local loop, say) would leave the copied branch
        // with nothing to land on.
        let inner_label = prog.lines[entry.def + 1..=end]
            .iter()
            .any(|line| !line.is_dead && line.label.is_some());
        if inner_label {
            continue;
        }
        let nested_call = prog.lines[entry.def..=end]
            .iter()
            .any(|line| !line.is_dead && line.is(Mnemonic::Jsr));
        if nested_call {
            continue;
        }
        let disabled = prog.lines[call].no_optimize
            || prog.lines[entry.def..=end]
                .iter()
                .any(|line| !line.is_dead && line.no_optimize);
        if disabled {
            if !rejected.contains(&entry.name) {
                diagnostics.push(Diagnostic::warning_at(
                    prog.lines[entry.def].line_num,
                    format!(
                        "subroutine '{}' is called once but contains disabled records; \
                         not inlined",
                        entry.name
                    ),
                ));
                rejected.push(entry.name.clone());
            }
            continue;
        }
        return Some((entry.def, end, call));
    }
    None
}
