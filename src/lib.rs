// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Assembly-to-assembly optimizer for the 6502 processor family.
//!
//! The crate ingests assembly source one line at a time, runs a battery of
//! peephole and dataflow-based rewrite passes to a fixed point, and emits
//! assembly that is behaviorally identical on the selected target CPU
//! (6502, 65C02, 65816 or 45GS02/MEGA65).

pub mod analysis;
pub mod cli;
pub mod config;
pub mod opt;
pub mod output;
pub mod program;
pub mod report;
pub mod syntax;
