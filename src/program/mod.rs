// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction stream model.
//!
//! The program is an append-only vector of [`AsmLine`] records, one per
//! source line. Optimization passes traverse it forward and flag records
//! dead instead of removing them, so indices remain stable.

pub mod effects;
pub mod instr;
pub mod line;

pub use effects::Effect;
pub use instr::{Mnemonic, Operand};
pub use line::AsmLine;

use crate::syntax::Dialect;

/// The instruction stream plus the ingestion-time optimization latch.
#[derive(Debug, Clone)]
pub struct Program {
    pub lines: Vec<AsmLine>,
    /// `#NOOPT`/`#OPT` latch; captured per record at ingestion.
    opt_enabled: bool,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            opt_enabled: true,
        }
    }

    /// Ingest a whole source text, one record per line.
    pub fn from_source(source: &str, dialect: &Dialect) -> Self {
        let mut prog = Self::new();
        for (idx, text) in source.lines().enumerate() {
            prog.add_line(text, idx + 1, dialect);
        }
        prog
    }

    /// Append one source line.
    ///
    /// Comment directives toggle the latch before the record is captured, so
    /// the `#NOOPT` line itself is already disabled and the `#OPT` line
    /// re-enabled.
    pub fn add_line(&mut self, text: &str, line_num: usize, dialect: &Dialect) {
        let trimmed = text.trim_start();
        if let Some(body) = dialect.comment_body(trimmed) {
            let body = body.trim_start();
            if body.starts_with("#NOOPT") {
                self.opt_enabled = false;
            } else if body.starts_with("#OPT") {
                self.opt_enabled = true;
            }
        }

        let mut line = AsmLine::parse(text, line_num, dialect);
        line.no_optimize = !self.opt_enabled;
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn dead_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_dead).count()
    }

    pub fn live_count(&self) -> usize {
        self.len() - self.dead_count()
    }

    /// Index of the first live record after `idx`, if any.
    pub fn next_live(&self, idx: usize) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(idx + 1)
            .find(|(_, line)| !line.is_dead)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Dialect;

    #[test]
    fn one_record_per_line() {
        let prog = Program::from_source("start:\n    LDA #$00\n\n    RTS\n", Dialect::generic());
        assert_eq!(prog.len(), 4);
        assert_eq!(prog.lines[0].label.as_deref(), Some("start"));
        assert_eq!(prog.lines[1].line_num, 2);
        assert_eq!(prog.lines[3].mnemonic, Some(Mnemonic::Rts));
    }

    #[test]
    fn noopt_region_disables_records() {
        let src = "    LDA #$00\n; #NOOPT\n    LDA #$00\n; #OPT\n    LDA #$00\n";
        let prog = Program::from_source(src, Dialect::generic());
        assert!(!prog.lines[0].no_optimize);
        // The directive line itself is already inside the disabled region.
        assert!(prog.lines[1].no_optimize);
        assert!(prog.lines[2].no_optimize);
        assert!(!prog.lines[3].no_optimize);
        assert!(!prog.lines[4].no_optimize);
    }

    #[test]
    fn noopt_checked_before_opt_prefix() {
        // "#NOOPT" must not be mistaken for "#OPT" plus junk.
        let prog = Program::from_source("; #NOOPT\n    NOP\n", Dialect::generic());
        assert!(prog.lines[1].no_optimize);
    }

    #[test]
    fn next_live_skips_dead_records() {
        let mut prog = Program::from_source("    LDA #1\n    NOP\n    RTS\n", Dialect::generic());
        prog.lines[1].is_dead = true;
        assert_eq!(prog.next_live(0), Some(2));
        assert_eq!(prog.next_live(2), None);
    }
}
