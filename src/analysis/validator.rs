// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Read-only validation sweep over the final stream.
//!
//! Runs the abstract register tracker across every live instruction and
//! accumulates usage statistics. Purely diagnostic: never alters the
//! program or the emitted output.

use serde_json::json;

use crate::config::RunConfig;
use crate::program::{Mnemonic, Program};

use super::registers::{step, RegisterState};

/// Which registers were ever written during the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterUsage {
    pub a: bool,
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

/// Which flags were ever affected during the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagUsage {
    pub c: bool,
    pub n: bool,
    pub z: bool,
    pub v: bool,
}

/// Per-instruction state snapshot, captured at trace level 2.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub line_num: usize,
    pub instruction: String,
    pub state: RegisterState,
}

/// Aggregated result of the validation sweep.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub instructions: usize,
    pub register_writes: usize,
    pub registers_used: RegisterUsage,
    pub flags_affected: FlagUsage,
    pub snapshots: Vec<StateSnapshot>,
}

/// Sweep the final stream with the register tracker.
///
/// Dead and unrecognized records are skipped; branch targets reset all
/// knowledge after their own step, mirroring the tracker's merge rule.
pub fn validate(prog: &Program, config: &RunConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut state = RegisterState::default();

    for line in &prog.lines {
        if line.is_dead {
            continue;
        }
        let Some(mnemonic) = line.mnemonic else {
            continue;
        };

        report.instructions += 1;
        state = step(line, state);

        if state.a.modified {
            report.register_writes += 1;
            report.registers_used.a = true;
        }
        if state.x.modified {
            report.register_writes += 1;
            report.registers_used.x = true;
        }
        if state.y.modified {
            report.register_writes += 1;
            report.registers_used.y = true;
        }
        if state.z.modified {
            report.register_writes += 1;
            report.registers_used.z = true;
        }

        let [c, n, z, v] = mnemonic.flags_touched();
        report.flags_affected.c |= c;
        report.flags_affected.n |= n;
        report.flags_affected.z |= z;
        report.flags_affected.v |= v;

        if config.trace >= 2 {
            let instruction = match &line.operand {
                Some(op) => format!("{} {}", mnemonic, op),
                None => mnemonic.to_string(),
            };
            report.snapshots.push(StateSnapshot {
                line_num: line.line_num,
                instruction,
                state,
            });
        }

        if line.is_branch_target {
            state.merge_unknown();
        }
    }

    report
}

impl ValidationReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "instructions analyzed: {}\nregister writes: {}\n",
            self.instructions, self.register_writes
        ));
        out.push_str(&format!(
            "registers used: A={} X={} Y={} Z={}\n",
            yes_no(self.registers_used.a),
            yes_no(self.registers_used.x),
            yes_no(self.registers_used.y),
            yes_no(self.registers_used.z),
        ));
        out.push_str(&format!(
            "flags affected: C={} N={} Z={} V={}\n",
            yes_no(self.flags_affected.c),
            yes_no(self.flags_affected.n),
            yes_no(self.flags_affected.z),
            yes_no(self.flags_affected.v),
        ));
        out
    }

    pub fn render_json(&self) -> serde_json::Value {
        json!({
            "instructions": self.instructions,
            "register_writes": self.register_writes,
            "registers_used": {
                "a": self.registers_used.a,
                "x": self.registers_used.x,
                "y": self.registers_used.y,
                "z": self.registers_used.z,
            },
            "flags_affected": {
                "c": self.flags_affected.c,
                "n": self.flags_affected.n,
                "z": self.flags_affected.z,
                "v": self.flags_affected.v,
            },
        })
    }

    pub fn render_snapshots(&self) -> String {
        let mut out = String::new();
        for snapshot in &self.snapshots {
            out.push_str(&format!(
                "line {}: {}\n  A: {}  X: {}  Y: {}  Z: {}\n  C: {}  N: {}  Z: {}  V: {}\n",
                snapshot.line_num,
                snapshot.instruction,
                reg_str(&snapshot.state.a),
                reg_str(&snapshot.state.x),
                reg_str(&snapshot.state.y),
                reg_str(&snapshot.state.z),
                flag_str(snapshot.state.c.known, snapshot.state.c.set),
                flag_str(snapshot.state.n.known, snapshot.state.n.set),
                flag_str(snapshot.state.zf.known, snapshot.state.zf.set),
                flag_str(snapshot.state.v.known, snapshot.state.v.set),
            ));
        }
        out
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn reg_str(reg: &super::registers::RegValue) -> String {
    match reg.value {
        Some(value) if reg.known => format!("${value:02X}"),
        _ => "?".to_string(),
    }
}

fn flag_str(known: bool, set: bool) -> &'static str {
    match (known, set) {
        (false, _) => "?",
        (true, true) => "1",
        (true, false) => "0",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Dialect;

    fn validate_src(src: &str, trace: u8) -> ValidationReport {
        let prog = Program::from_source(src, Dialect::generic());
        let config = RunConfig {
            trace,
            ..RunConfig::default()
        };
        validate(&prog, &config)
    }

    #[test]
    fn counts_instructions_and_usage() {
        let report = validate_src("    LDA #$01\n    TAX\n    STA $10\n; note\n", 0);
        assert_eq!(report.instructions, 3);
        assert!(report.registers_used.a);
        assert!(report.registers_used.x);
        assert!(!report.registers_used.y);
        assert!(!report.registers_used.z);
        assert!(report.flags_affected.n);
        assert!(report.flags_affected.z);
        assert!(!report.flags_affected.c);
    }

    #[test]
    fn carry_usage_from_arithmetic() {
        let report = validate_src("    CLC\n    ADC #$01\n", 0);
        assert!(report.flags_affected.c);
        assert!(report.flags_affected.v);
    }

    #[test]
    fn snapshots_only_at_trace_two() {
        let report = validate_src("    LDA #$01\n    RTS\n", 1);
        assert!(report.snapshots.is_empty());
        let report = validate_src("    LDA #$01\n    RTS\n", 2);
        assert_eq!(report.snapshots.len(), 2);
        assert_eq!(report.snapshots[0].instruction, "LDA #$01");
    }

    #[test]
    fn json_summary_has_expected_shape() {
        let report = validate_src("    LDA #$01\n", 0);
        let value = report.render_json();
        assert_eq!(value["instructions"], 1);
        assert_eq!(value["registers_used"]["a"], true);
        assert_eq!(value["flags_affected"]["v"], false);
    }

    #[test]
    fn dead_records_are_skipped() {
        let mut prog = Program::from_source("    LDA #$01\n    LDX #$02\n", Dialect::generic());
        prog.lines[1].is_dead = true;
        let report = validate(&prog, &RunConfig::default());
        assert_eq!(report.instructions, 1);
        assert!(!report.registers_used.x);
    }
}
