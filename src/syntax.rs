// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembler dialect syntax rules.
//!
//! Each supported cross-assembler gets one entry describing its comment
//! marker, label conventions and local-label scheme. The optimization core
//! only consults the three predicates exposed here; everything else about a
//! dialect is presentational.

/// Syntax rules for one assembler dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Identifier accepted on the command line.
    pub id: &'static str,
    /// Human-readable assembler name.
    pub name: &'static str,
    /// Comment marker, either ";" or "//".
    pub comment_marker: &'static str,
    /// Whether labels may be terminated with ':'.
    pub colon_labels: bool,
    /// Whether mnemonics are case-sensitive in this dialect.
    pub case_sensitive: bool,
    /// Prefix character introducing a local label, if any.
    pub local_label_prefix: Option<char>,
    /// Whether bare numeric labels (1, 2, ...) are local.
    pub numeric_local_labels: bool,
}

pub const DIALECTS: &[Dialect] = &[
    Dialect {
        id: "generic",
        name: "Generic",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('@'),
        numeric_local_labels: false,
    },
    Dialect {
        id: "ca65",
        name: "ca65",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('@'),
        numeric_local_labels: false,
    },
    Dialect {
        id: "kick",
        name: "Kick Assembler",
        comment_marker: "//",
        colon_labels: true,
        case_sensitive: true,
        local_label_prefix: Some('!'),
        numeric_local_labels: true,
    },
    Dialect {
        id: "acme",
        name: "ACME",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('.'),
        numeric_local_labels: false,
    },
    Dialect {
        id: "dasm",
        name: "DASM",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('.'),
        numeric_local_labels: true,
    },
    Dialect {
        id: "tass",
        name: "Turbo Assembler",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('@'),
        numeric_local_labels: false,
    },
    Dialect {
        id: "64tass",
        name: "64tass",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: true,
        local_label_prefix: None,
        numeric_local_labels: false,
    },
    Dialect {
        id: "buddy",
        name: "Buddy Assembler",
        comment_marker: "//",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('@'),
        numeric_local_labels: false,
    },
    Dialect {
        id: "merlin",
        name: "Merlin",
        comment_marker: ";",
        colon_labels: false,
        case_sensitive: false,
        local_label_prefix: Some(':'),
        numeric_local_labels: false,
    },
    Dialect {
        id: "lisa",
        name: "LISA",
        comment_marker: ";",
        colon_labels: true,
        case_sensitive: false,
        local_label_prefix: Some('.'),
        numeric_local_labels: false,
    },
];

impl Dialect {
    /// Look up a dialect by its command-line identifier (case-insensitive).
    /// "kickass" is accepted as an alias for Kick Assembler.
    pub fn by_name(name: &str) -> Option<&'static Dialect> {
        let lowered = name.to_ascii_lowercase();
        let id = match lowered.as_str() {
            "kickass" => "kick",
            other => other,
        };
        DIALECTS.iter().find(|dialect| dialect.id == id)
    }

    pub fn generic() -> &'static Dialect {
        &DIALECTS[0]
    }

    /// Whether `text` begins a comment under this dialect's rules.
    ///
    /// The generic dialect accepts both `;` and `//`.
    pub fn is_comment_start(&self, text: &str) -> bool {
        if self.comment_marker == ";" {
            text.starts_with(';') || (self.id == "generic" && text.starts_with("//"))
        } else {
            text.starts_with("//")
        }
    }

    /// Whether `label` is a local (scoped) label in this dialect.
    pub fn is_local_label(&self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        if let Some(prefix) = self.local_label_prefix {
            if label.starts_with(prefix) {
                return true;
            }
        }
        self.numeric_local_labels && label.chars().all(|c| c.is_ascii_digit())
    }

    /// Strip the comment marker from `text`, returning the comment body.
    /// Returns `None` if `text` is not a comment.
    pub fn comment_body<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !self.is_comment_start(text) {
            return None;
        }
        if text.starts_with("//") {
            Some(&text[2..])
        } else {
            Some(&text[1..])
        }
    }
}
