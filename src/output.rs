// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembly source regeneration.
//!
//! Reconstructs source text from the record stream using the output
//! dialect's comment marker and label style. Comment-only records are
//! preserved verbatim so that `#NOOPT`/`#OPT` regions survive a round
//! trip through the optimizer; dead records are dropped, or emitted as
//! trace comments when tracing is on.

use crate::config::RunConfig;
use crate::program::{AsmLine, Program};

/// Render the optimized stream back to assembly source.
pub fn render(prog: &Program, config: &RunConfig, optimizations: usize) -> String {
    let cmt = config.dialect.comment_marker;
    let mut out = String::new();

    out.push_str(&format!("{cmt} Optimized for {}\n", config.mode.name()));
    out.push_str(&format!("{cmt} Assembler: {}\n", config.dialect.name));
    out.push_str(&format!("{cmt} Target CPU: {}\n", config.cpu.name()));
    out.push_str(&format!("{cmt} Total optimizations: {optimizations}\n\n"));

    if config.trace > 0 {
        out.push_str(&format!(
            "{cmt} Optimization trace enabled (level {})\n",
            config.trace
        ));
        out.push_str(&format!(
            "{cmt} Lines marked with {cmt} OPT: show removed instructions\n\n"
        ));
    }

    for line in &prog.lines {
        if line.is_dead {
            if config.trace > 0 {
                out.push_str(&format!("{cmt} OPT: removed - {}\n", describe(line)));
            }
            continue;
        }
        render_line(&mut out, line, config);
    }

    out
}

fn render_line(out: &mut String, line: &AsmLine, config: &RunConfig) {
    let has_opcode = line.opcode.is_some();

    if let Some(label) = &line.label {
        out.push_str(label);
        if config.dialect.colon_labels && !line.is_local_label {
            out.push(':');
        }
        if has_opcode {
            out.push('\t');
        }
    } else if has_opcode {
        out.push_str("    ");
    }

    if let Some(opcode) = &line.opcode {
        out.push_str(opcode);
        if let Some(operand) = &line.operand {
            out.push(' ');
            out.push_str(operand.raw());
        }
        if let Some(comment) = &line.comment {
            out.push('\t');
            out.push_str(comment);
        }
    } else if let Some(comment) = &line.comment {
        // Comment-only records are emitted as ingested; a comment trailing
        // a bare label keeps its separator.
        if line.label.is_some() {
            out.push('\t');
        }
        out.push_str(comment);
    }

    out.push('\n');
}

fn describe(line: &AsmLine) -> String {
    match (&line.opcode, &line.operand) {
        (Some(opcode), Some(operand)) => format!("{opcode} {}", operand.raw()),
        (Some(opcode), None) => opcode.clone(),
        _ => line.label.clone().unwrap_or_else(|| "unknown".to_string()),
    }
}
