// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction records and line parsing.

use crate::syntax::Dialect;

use super::instr::{Mnemonic, Operand};

/// One source line of assembly, plus optimizer bookkeeping.
///
/// Exactly one record exists per source line. Records are created at
/// ingestion and never physically deleted during optimization; passes flag
/// them with `is_dead` instead so positional identity stays stable for
/// label resolution. The subroutine inliner's splice is the only insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct AsmLine {
    /// 1-based source line number.
    pub line_num: usize,
    pub label: Option<String>,
    /// Raw opcode text as written, directives included.
    pub opcode: Option<String>,
    /// Parsed mnemonic; `None` for directives and unknown opcodes, which are
    /// inert to every optimization pattern.
    pub mnemonic: Option<Mnemonic>,
    pub operand: Option<Operand>,
    /// Trailing comment, marker included.
    pub comment: Option<String>,
    /// Logically removed; retained for trace output.
    pub is_dead: bool,
    /// Inside a `#NOOPT` region.
    pub no_optimize: bool,
    pub is_local_label: bool,
    /// Target of some label; protected from removal.
    pub is_branch_target: bool,
}

impl AsmLine {
    pub fn empty(line_num: usize) -> Self {
        Self {
            line_num,
            label: None,
            opcode: None,
            mnemonic: None,
            operand: None,
            comment: None,
            is_dead: false,
            no_optimize: false,
            is_local_label: false,
            is_branch_target: false,
        }
    }

    /// Parse a source line according to the dialect's syntax rules.
    ///
    /// A label starts in column zero and runs to whitespace, a colon or a
    /// comment; the opcode and operand follow; the rest of the line after
    /// the comment marker is kept verbatim. Malformed lines simply produce
    /// records with empty fields.
    pub fn parse(text: &str, line_num: usize, dialect: &Dialect) -> Self {
        let mut line = Self::empty(line_num);
        let mut rest = text;

        let starts_in_column_zero = !text.starts_with(' ')
            && !text.starts_with('\t')
            && !text.is_empty()
            && !dialect.is_comment_start(text);

        if starts_in_column_zero {
            let end = rest
                .char_indices()
                .find(|(i, c)| {
                    c.is_whitespace() || *c == ':' || dialect.is_comment_start(&rest[*i..])
                })
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let label = &rest[..end];
            if !label.is_empty() {
                line.is_local_label = dialect.is_local_label(label);
                line.label = Some(label.to_string());
            }
            rest = &rest[end..];
            if let Some(stripped) = rest.strip_prefix(':') {
                rest = stripped;
            }
        }

        rest = rest.trim_start();
        if dialect.is_comment_start(rest) {
            line.comment = Some(rest.to_string());
            return line;
        }
        if rest.is_empty() {
            return line;
        }

        let opcode_end = rest
            .char_indices()
            .find(|(i, c)| c.is_whitespace() || dialect.is_comment_start(&rest[*i..]))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let opcode = &rest[..opcode_end];
        if !opcode.is_empty() {
            line.mnemonic = Mnemonic::parse(opcode);
            line.opcode = Some(opcode.to_string());
        }
        rest = rest[opcode_end..].trim_start();

        let operand_end = rest
            .char_indices()
            .find(|(i, _)| dialect.is_comment_start(&rest[*i..]))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        line.operand = Operand::parse(&rest[..operand_end]);
        rest = &rest[operand_end..];

        if dialect.is_comment_start(rest) {
            line.comment = Some(rest.trim_end().to_string());
        }

        line
    }

    /// Live and inside an optimization-enabled region: eligible to take part
    /// in a rewrite window.
    pub fn matchable(&self) -> bool {
        !self.is_dead && !self.no_optimize
    }

    /// Shorthand for matching a specific mnemonic on a live, enabled record.
    pub fn is(&self, m: Mnemonic) -> bool {
        self.mnemonic == Some(m)
    }

    /// Immediate operand value, if this record has one.
    pub fn immediate(&self) -> Option<i64> {
        self.operand.as_ref().and_then(Operand::immediate_value)
    }

    /// Whether the operand denotes the accumulator (explicit `A` or implied
    /// by absence).
    pub fn targets_accumulator(&self) -> bool {
        match &self.operand {
            None => true,
            Some(op) => op.is_accumulator(),
        }
    }

    /// Replace the instruction in place, keeping the record's position and
    /// bookkeeping flags.
    pub fn rewrite(&mut self, m: Mnemonic, operand: Option<Operand>) {
        self.mnemonic = Some(m);
        self.opcode = Some(m.as_str().to_string());
        self.operand = operand;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AsmLine {
        AsmLine::parse(text, 1, Dialect::generic())
    }

    #[test]
    fn parses_plain_instruction() {
        let line = parse("    LDA #$00");
        assert_eq!(line.label, None);
        assert_eq!(line.opcode.as_deref(), Some("LDA"));
        assert_eq!(line.mnemonic, Some(Mnemonic::Lda));
        assert_eq!(line.immediate(), Some(0));
    }

    #[test]
    fn parses_label_with_colon() {
        let line = parse("start:  JMP start");
        assert_eq!(line.label.as_deref(), Some("start"));
        assert!(!line.is_local_label);
        assert_eq!(line.mnemonic, Some(Mnemonic::Jmp));
        assert_eq!(line.operand.as_ref().map(|o| o.raw()), Some("start"));
    }

    #[test]
    fn parses_bare_label() {
        let line = parse("loop");
        assert_eq!(line.label.as_deref(), Some("loop"));
        assert_eq!(line.opcode, None);
    }

    #[test]
    fn parses_local_label() {
        let line = parse("@skip:  RTS");
        assert_eq!(line.label.as_deref(), Some("@skip"));
        assert!(line.is_local_label);
        assert_eq!(line.mnemonic, Some(Mnemonic::Rts));
    }

    #[test]
    fn parses_trailing_comment() {
        let line = parse("    STA $D020  ; border color");
        assert_eq!(line.mnemonic, Some(Mnemonic::Sta));
        assert_eq!(line.operand.as_ref().map(|o| o.raw()), Some("$D020"));
        assert_eq!(line.comment.as_deref(), Some("; border color"));
    }

    #[test]
    fn comment_only_line_is_inert() {
        let line = parse("; just a note");
        assert_eq!(line.label, None);
        assert_eq!(line.opcode, None);
        assert_eq!(line.comment.as_deref(), Some("; just a note"));
    }

    #[test]
    fn directive_has_no_mnemonic() {
        let line = parse("    .byte $01,$02");
        assert_eq!(line.opcode.as_deref(), Some(".byte"));
        assert_eq!(line.mnemonic, None);
    }

    #[test]
    fn blank_line_is_empty_record() {
        let line = parse("");
        assert_eq!(line, AsmLine::empty(1));
    }

    #[test]
    fn slash_comment_in_generic_dialect() {
        let line = parse("    LDA #$01 // load one");
        assert_eq!(line.mnemonic, Some(Mnemonic::Lda));
        assert_eq!(line.comment.as_deref(), Some("// load one"));
    }
}
