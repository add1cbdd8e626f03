// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Label table and control-flow analysis.
//!
//! Rebuilt from scratch at the start of every scheduler iteration, since
//! earlier passes may have created, removed or relocated branch targets.
//! Local labels are not globally unique; they resolve by name plus the
//! nearest preceding global label (their scope).

use crate::program::{Mnemonic, Program};
use crate::report::Diagnostic;

/// One entry in the label table.
#[derive(Debug, Clone)]
pub struct LabelEntry {
    pub name: String,
    /// Index of the defining record.
    pub def: usize,
    /// Indices of records whose operand references this label.
    pub refs: Vec<usize>,
    /// Referenced by at least one subroutine-call instruction.
    pub is_subroutine: bool,
    pub is_local: bool,
    /// Enclosing global label, for local labels only.
    pub scope: Option<String>,
    /// Index of the terminating return record, when boundary detection
    /// succeeded. Heuristic: first RTS after the definition, abandoned if
    /// another global label is reached first.
    pub body_end: Option<usize>,
}

/// Result of one analysis sweep.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    pub entries: Vec<LabelEntry>,
}

impl LabelTable {
    pub fn get(&self, name: &str) -> Option<&LabelEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

/// Build the label table, resolve references, bound subroutines and mark
/// branch targets. Safe to re-run on every iteration: all derived flags are
/// cleared first, so the sweep is idempotent for an unchanged stream.
///
/// Subroutine labels whose body could not be bounded are reported as
/// warnings; those labels simply never qualify for inlining.
pub fn analyze(prog: &mut Program) -> (LabelTable, Vec<Diagnostic>) {
    for line in &mut prog.lines {
        line.is_branch_target = false;
    }

    // Pass 1: collect label definitions with their enclosing scope. Dead
    // records no longer define anything (the inliner retires labels).
    let mut table = LabelTable::default();
    let mut scope_of: Vec<Option<String>> = Vec::with_capacity(prog.len());
    let mut current_scope: Option<String> = None;
    for line in prog.lines.iter() {
        if !line.is_dead {
            if let Some(name) = &line.label {
                if !line.is_local_label {
                    current_scope = Some(name.clone());
                }
            }
        }
        scope_of.push(current_scope.clone());
    }

    current_scope = None;
    for (idx, line) in prog.lines.iter().enumerate() {
        if line.is_dead {
            continue;
        }
        if let Some(name) = &line.label {
            let entry_scope = if line.is_local_label {
                current_scope.clone()
            } else {
                current_scope = Some(name.clone());
                None
            };
            table.entries.push(LabelEntry {
                name: name.clone(),
                def: idx,
                refs: Vec::new(),
                is_subroutine: false,
                is_local: line.is_local_label,
                scope: entry_scope,
                body_end: None,
            });
        }
    }

    // Pass 2: resolve operand references. Globals match by substring
    // anywhere; locals additionally require a matching scope.
    for entry in &mut table.entries {
        for (idx, line) in prog.lines.iter().enumerate() {
            if line.is_dead || idx == entry.def {
                continue;
            }
            let Some(mnemonic) = line.mnemonic else {
                continue;
            };
            let Some(operand) = &line.operand else {
                continue;
            };
            if !operand.raw().contains(entry.name.as_str()) {
                continue;
            }
            if entry.is_local && scope_of[idx] != entry.scope {
                continue;
            }
            entry.refs.push(idx);
            if mnemonic.is_call() {
                entry.is_subroutine = true;
            }
        }
    }

    // Pass 3: bound subroutine bodies.
    let mut warnings = Vec::new();
    for entry in &mut table.entries {
        if !entry.is_subroutine {
            continue;
        }
        entry.body_end = find_body_end(prog, entry.def);
        if entry.body_end.is_none() {
            warnings.push(Diagnostic::warning_at(
                prog.lines[entry.def].line_num,
                format!(
                    "subroutine '{}' has no reachable RTS before the next global label; \
                     it will not be considered for inlining",
                    entry.name
                ),
            ));
        }
    }

    // Pass 4: every label definition is a branch target and must never be
    // deleted or relocated by a later pass.
    for entry in &table.entries {
        prog.lines[entry.def].is_branch_target = true;
    }

    (table, warnings)
}

/// Scan forward from a subroutine label for its terminating return. Stops
/// undiscovered at the next global label: multiple exits and embedded data
/// defeat this heuristic by design.
fn find_body_end(prog: &Program, def: usize) -> Option<usize> {
    for (idx, line) in prog.lines.iter().enumerate().skip(def + 1) {
        if line.is_dead {
            continue;
        }
        if line.label.is_some() && !line.is_local_label {
            return None;
        }
        if line.mnemonic == Some(Mnemonic::Rts) {
            return Some(idx);
        }
    }
    None
}
