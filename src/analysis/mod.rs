// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Control-flow and dataflow analysis: the label table, the abstract
//! register/flag tracker, and the read-only validator.

pub mod labels;
pub mod registers;
pub mod validator;

pub use labels::{analyze, LabelEntry, LabelTable};
pub use registers::{step, RegisterState};
pub use validator::{validate, ValidationReport};
