// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! End-to-end optimizer runs over small programs, checking the observable
//! rewrites and the cross-CPU safety guarantees.

use opt6502::analysis::validator::validate;
use opt6502::config::{CpuTarget, OptMode, RunConfig};
use opt6502::opt::{optimize_program, OptimizeReport};
use opt6502::output;
use opt6502::program::{Mnemonic, Program};
use opt6502::syntax::Dialect;

fn config(cpu: CpuTarget) -> RunConfig {
    RunConfig::new(cpu, OptMode::Speed, Dialect::generic(), 0)
}

fn optimize(src: &str, cpu: CpuTarget) -> (Program, OptimizeReport) {
    let mut prog = Program::from_source(src, Dialect::generic());
    let report = optimize_program(&mut prog, &config(cpu));
    (prog, report)
}

fn live_ops(prog: &Program) -> Vec<String> {
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
fn redundant_reload_is_removed_on_plain_6502() {
    let src = "    LDA #$00\n    STA $D020\n    LDA #$00\n    STA $D021\n";
    let (prog, report) = optimize(src, CpuTarget::Mos6502);
    assert_eq!(
        live_ops(&prog),
        vec!["LDA #$00", "STA $D020", "STA $D021"]
    );
    // No STZ on the NMOS 6502.
    assert!(prog.lines.iter().all(|line| !line.is(Mnemonic::Stz)));
    assert!(report.converged);
}

#[test]
fn zero_stores_become_stz_on_65c02() {
    let src = "    LDA #$00\n    STA $D020\n    LDA #$00\n    STA $D021\n";
    let (prog, _) = optimize(src, CpuTarget::Mos65C02);
    assert_eq!(live_ops(&prog), vec!["STZ $D020", "STZ $D021"]);
}

#[test]
fn repeated_stores_go_through_z_on_45gs02() {
    let src = concat!(
        "    LDA #$20\n",
        "    STA $0400\n",
        "    LDA #$20\n",
        "    STA $0401\n",
        "    LDA #$20\n",
        "    STA $0402\n",
    );
    let (prog, _) = optimize(src, CpuTarget::Mega45Gs02);
    assert_eq!(
        live_ops(&prog),
        vec!["LDZ #$20", "STZ $0400", "STZ $0401", "STZ $0402"]
    );
    assert!(prog
        .lines
        .iter()
        .all(|line| line.is_dead || !line.is(Mnemonic::Lda)));
}

#[test]
fn single_caller_subroutine_is_inlined() {
    let src = concat!(
        "    JSR init\n",
        "    RTS\n",
        "init:\n",
        "    LDA #$01\n",
        "    STA $10\n",
        "    RTS\n",
    );
    let (prog, report) = optimize(src, CpuTarget::Mos6502);
    assert_eq!(report.inlined, 1);
    assert_eq!(live_ops(&prog), vec!["LDA #$01", "STA $10", "RTS"]);
    // The call, the label record and the subroutine's return are all gone.
    assert!(prog.lines[0].is_dead);
    let label_record = prog
        .lines
        .iter()
        .find(|line| line.label.as_deref() == Some("init"))
        .expect("label record kept in the stream");
    assert!(label_record.is_dead);
}

#[test]
fn jump_to_next_line_is_removed() {
    let src = "    JMP next\nnext:\n    RTS\n";
    let (prog, _) = optimize(src, CpuTarget::Mos6502);
    assert!(prog.lines[0].is_dead);
    assert_eq!(live_ops(&prog), vec!["RTS"]);
}

#[test]
fn optimizing_twice_changes_nothing() {
    let src = concat!(
        "    LDA #$00\n",
        "    STA $D020\n",
        "    LDA #$00\n",
        "    STA $D021\n",
        "    JMP done\n",
        "    LDX #$05\n",
        "done:\n",
        "    RTS\n",
        "; #NOOPT\n",
        "    LDA #$00\n",
        "    LDA #$00\n",
        "; #OPT\n",
    );
    for cpu in [
        CpuTarget::Mos6502,
        CpuTarget::Mos65C02,
        CpuTarget::Mos65816,
        CpuTarget::Mega45Gs02,
    ] {
        let (first, _) = optimize(src, cpu);
        let rendered = output::render(&first, &config(cpu), 0);

        let mut second = Program::from_source(&rendered, Dialect::generic());
        let report = optimize_program(&mut second, &config(cpu));
        assert_eq!(
            report.optimizations, 0,
            "second run found rewrites on {}",
            cpu.name()
        );
        assert_eq!(live_ops(&second), live_ops(&first), "on {}", cpu.name());
    }
}

#[test]
fn no_stz_is_manufactured_from_lda_zero_on_45gs02() {
    // A single zero store must keep its LDA/STA shape: STZ would write the
    // Z register's current value instead of zero.
    let src = "    LDZ #$07\n    LDA #$00\n    STA $D020\n    RTS\n";
    let (prog, _) = optimize(src, CpuTarget::Mega45Gs02);
    let ops = live_ops(&prog);
    assert!(ops.contains(&"STA $D020".to_string()), "got {ops:?}");
    assert!(ops.contains(&"LDA #$00".to_string()), "got {ops:?}");
}

#[test]
fn branch_targets_survive_on_every_cpu() {
    let src = concat!(
        "start:\n",
        "    LDA #$00\n",
        "    STA $D020\n",
        "    JMP start\n",
        "loop:\n",
        "    TAX\n",
        "    TXA\n",
        "    BNE loop\n",
        "    RTS\n",
    );
    for cpu in [
        CpuTarget::Mos6502,
        CpuTarget::Mos65C02,
        CpuTarget::Mos65816,
        CpuTarget::Mega45Gs02,
    ] {
        let (prog, _) = optimize(src, cpu);
        for line in &prog.lines {
            if line.is_branch_target {
                assert!(
                    !line.is_dead,
                    "branch target on line {} died on {}",
                    line.line_num,
                    cpu.name()
                );
            }
        }
    }
}

#[test]
fn disabled_region_is_left_untouched() {
    let src = concat!(
        "; #NOOPT\n",
        "    LDA #$00\n",
        "    STA $D020\n",
        "    LDA #$00\n",
        "; #OPT\n",
        "    LDA #$05\n",
        "    STA $10\n",
        "    LDA #$05\n",
    );
    let (prog, _) = optimize(src, CpuTarget::Mos65C02);
    let ops = live_ops(&prog);
    // The protected block keeps all three instructions in original form.
    assert!(ops.contains(&"LDA #$00".to_string()));
    assert_eq!(ops.iter().filter(|op| op.contains("STA $D020")).count(), 1);
    assert_eq!(
        prog.lines
            .iter()
            .filter(|line| line.no_optimize && line.is_dead)
            .count(),
        0
    );
    // The enabled block after it still folds.
    assert_eq!(ops.iter().filter(|op| *op == "LDA #$05").count(), 1);
}

#[test]
fn unreachable_code_after_jmp_dies() {
    let src = concat!(
        "    JMP done\n",
        "    LDA #$01\n",
        "    STA $10\n",
        "done:\n",
        "    RTS\n",
        "    NOP\n",
    );
    let (prog, _) = optimize(src, CpuTarget::Mos6502);
    // The unreachable block dies first; the JMP then reaches its own label
    // by fall-through and is removed in a later iteration.
    assert_eq!(live_ops(&prog), vec!["RTS"]);
    assert!(prog.lines[1].is_dead && prog.lines[2].is_dead && prog.lines[5].is_dead);
}

#[test]
fn validator_reflects_the_final_stream() {
    let src = "    LDA #$00\n    STA $D020\n    LDA #$00\n    STA $D021\n";
    let (prog, _) = optimize(src, CpuTarget::Mos65C02);
    let report = validate(&prog, &config(CpuTarget::Mos65C02));
    // Only the two STZs remain, and neither touches A.
    assert_eq!(report.instructions, 2);
    assert!(!report.registers_used.a);
}

#[test]
fn transfer_round_trip_is_removed() {
    let src = "    LDA $10\n    TAX\n    TXA\n    STA $11\n";
    let (prog, _) = optimize(src, CpuTarget::Mos6502);
    assert_eq!(live_ops(&prog), vec!["LDA $10", "STA $11"]);
}
