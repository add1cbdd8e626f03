// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Optimization pass library and the fixed-point scheduler.
//!
//! Every pass is a pure function of the stream (plus configuration) that
//! performs one forward sweep, rewrites matching windows, and returns how
//! many rewrites it made. The scheduler threads those counts; there is no
//! shared mutable counter. All passes skip dead and `#NOOPT` records, and
//! no pattern window ever crosses a branch-target record.

pub mod constant;
pub mod cpu45gs02;
pub mod cpu65c02;
pub mod deadcode;
pub mod inline;
pub mod jumps;
pub mod loadstore;
pub mod peephole;
pub mod regusage;

use crate::analysis;
use crate::config::RunConfig;
use crate::program::Program;
use crate::report::Diagnostic;

/// Hard cap on scheduler iterations.
pub const MAX_ITERATIONS: usize = 10;

/// Outcome of one full optimization run.
#[derive(Debug, Clone, Default)]
pub struct OptimizeReport {
    /// Scheduler iterations executed (analysis + pass sequence).
    pub iterations: usize,
    /// Total rewrites across all passes, inlining included.
    pub optimizations: usize,
    /// Subroutines inlined before the fixed-point loop.
    pub inlined: usize,
    /// False when the iteration cap was hit while passes still made
    /// progress.
    pub converged: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Index of the first live record after `idx` that may extend a pattern
/// window: it must be optimization-enabled and must not be a branch target
/// (windows never cross control-flow joins).
pub(crate) fn window_next(prog: &Program, idx: usize) -> Option<usize> {
    let next = prog.next_live(idx)?;
    let line = &prog.lines[next];
    if line.no_optimize || line.is_branch_target {
        return None;
    }
    Some(next)
}

/// Drive the pass library to a fixed point.
///
/// Inlining runs exactly once up front. Each iteration then rebuilds the
/// label table (earlier passes may have created or invalidated branch
/// targets), runs the passes in their fixed order with dead-code
/// elimination last, and stops when an iteration contributes nothing or
/// the iteration cap is reached. Hitting the cap mid-progress is reported
/// as a warning instead of being swallowed.
pub fn optimize_program(prog: &mut Program, config: &RunConfig) -> OptimizeReport {
    let mut report = OptimizeReport::default();

    let (inlined, mut inline_diags) = inline::run(prog);
    report.inlined = inlined;
    report.optimizations += inlined;
    report.diagnostics.append(&mut inline_diags);

    loop {
        // Earlier iterations may expose new unboundable subroutines, so
        // warnings are collected every round and deduplicated by message.
        let (_labels, warnings) = analysis::labels::analyze(prog);
        for warning in warnings {
            if !report
                .diagnostics
                .iter()
                .any(|diag| diag.message() == warning.message())
            {
                report.diagnostics.push(warning);
            }
        }

        let mut found = 0;
        found += peephole::run(prog);
        found += loadstore::run(prog);
        found += regusage::run(prog);
        found += constant::run(prog);
        found += cpu65c02::run(prog, config);
        found += cpu45gs02::run(prog, config);
        found += jumps::run(prog);
        // Must stay last: earlier passes expose unreachable code.
        found += deadcode::run(prog);

        report.optimizations += found;
        report.iterations += 1;

        if found == 0 {
            report.converged = true;
            break;
        }
        if report.iterations >= MAX_ITERATIONS {
            report.converged = false;
            report.diagnostics.push(Diagnostic::warning(format!(
                "optimizer did not converge after {MAX_ITERATIONS} iterations; \
                 output is valid but further rewrites may remain"
            )));
            break;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CpuTarget, OptMode, RunConfig};
    use crate::syntax::Dialect;

    pub(crate) fn config_for(cpu: CpuTarget) -> RunConfig {
        RunConfig::new(cpu, OptMode::Speed, Dialect::generic(), 0)
    }

    pub(crate) fn program(src: &str) -> Program {
        Program::from_source(src, Dialect::generic())
    }

    fn live_instructions(prog: &Program) -> Vec<String> {
        prog.lines
            .iter()
            .filter(|line| !line.is_dead)
            .filter_map(|line| {
                line.opcode.as_ref().map(|op| match &line.operand {
                    Some(operand) => format!("{op} {operand}"),
                    None => op.clone(),
                })
            })
            .collect()
    }

    #[test]
    fn converges_on_trivial_input() {
        let mut prog = program("    LDA #$01\n    RTS\n");
        let report = optimize_program(&mut prog, &config_for(CpuTarget::Mos6502));
        assert!(report.converged);
        assert_eq!(report.optimizations, 0);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn repeated_runs_reach_the_same_stream() {
        let src = concat!(
            "    LDA #$00\n",
            "    STA $D020\n",
            "    LDA #$00\n",
            "    STA $D021\n",
            "    JMP done\n",
            "    LDX #$05\n",
            "done:\n",
            "    RTS\n",
        );
        let config = config_for(CpuTarget::Mos6502);
        let mut first = program(src);
        optimize_program(&mut first, &config);
        let after_first = live_instructions(&first);

        let mut second = first.clone();
        let report = optimize_program(&mut second, &config);
        assert!(report.converged);
        assert_eq!(report.optimizations, 0);
        assert_eq!(live_instructions(&second), after_first);
    }

    #[test]
    fn branch_targets_are_never_marked_dead() {
        let src = concat!(
            "start:\n",
            "    LDA #$00\n",
            "    STA $D020\n",
            "    JMP start\n",
            "loop:\n",
            "    TAX\n",
            "    TXA\n",
            "    JMP loop\n",
        );
        for cpu in [
            CpuTarget::Mos6502,
            CpuTarget::Mos65C02,
            CpuTarget::Mega45Gs02,
        ] {
            let mut prog = program(src);
            optimize_program(&mut prog, &config_for(cpu));
            for line in &prog.lines {
                if line.is_branch_target {
                    assert!(!line.is_dead, "branch target on line {} died", line.line_num);
                }
            }
        }
    }

    #[test]
    fn scheduler_iterates_until_no_pass_reports_progress() {
        // The first iteration drops the fall-through JMP; the second finds
        // nothing further and confirms the fixed point.
        let src = concat!(
            "    LDA #$07\n",
            "    STA $10\n",
            "    JMP next\n",
            "next:\n",
            "    LDA #$09\n",
            "    STA $11\n",
            "    RTS\n",
        );
        let mut prog = program(src);
        let report = optimize_program(&mut prog, &config_for(CpuTarget::Mos6502));
        assert!(report.converged);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.optimizations, 1);
        assert!(prog.lines[2].is_dead);
    }

    #[test]
    fn analyzer_warnings_are_reported_once_across_iterations() {
        // Two iterations run here; the unboundable subroutine must not be
        // reported twice.
        let src = concat!(
            "    JSR sub\n",
            "    JSR sub\n",
            "    JMP next\n",
            "next:\n",
            "    RTS\n",
            "sub:\n",
            "    LDA #$01\n",
            "more:\n",
            "    RTS\n",
        );
        let mut prog = program(src);
        let report = optimize_program(&mut prog, &config_for(CpuTarget::Mos6502));
        assert!(report.iterations >= 2);
        assert_eq!(
            report
                .diagnostics
                .iter()
                .filter(|diag| diag.message().contains("'sub'"))
                .count(),
            1
        );
    }
}
