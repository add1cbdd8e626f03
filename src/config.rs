// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Run configuration for one optimization invocation.

use crate::syntax::Dialect;

/// Target CPU.
///
/// The 45GS02 is backwards compatible with the 65C02 instruction set, but
/// its STZ instruction stores the Z register rather than zero. Every place
/// that emits STZ must consult [`CpuTarget::is_45gs02`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuTarget {
    /// Original NMOS 6502.
    Mos6502,
    /// CMOS 65C02 (STZ, BRA, ...).
    Mos65C02,
    /// 65816 with 16-bit extensions.
    Mos65816,
    /// 45GS02 (MEGA65). STZ stores the Z register, not zero!
    Mega45Gs02,
}

impl CpuTarget {
    pub fn name(self) -> &'static str {
        match self {
            CpuTarget::Mos6502 => "6502",
            CpuTarget::Mos65C02 => "65C02",
            CpuTarget::Mos65816 => "65816",
            CpuTarget::Mega45Gs02 => "45GS02",
        }
    }

    /// Whether 65C02 instructions may be emitted for this target.
    pub fn allow_65c02(self) -> bool {
        !matches!(self, CpuTarget::Mos6502)
    }

    /// Whether this target is the 45GS02 with its Z-register STZ.
    pub fn is_45gs02(self) -> bool {
        matches!(self, CpuTarget::Mega45Gs02)
    }
}

/// Optimization goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptMode {
    Speed,
    Size,
}

impl OptMode {
    pub fn name(self) -> &'static str {
        match self {
            OptMode::Speed => "speed",
            OptMode::Size => "size",
        }
    }
}

/// Fully resolved configuration for one optimizer run.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub cpu: CpuTarget,
    pub mode: OptMode,
    pub dialect: &'static Dialect,
    /// Trace verbosity: 0 = off, 1 = removal comments, 2 = state snapshots.
    pub trace: u8,
}

impl RunConfig {
    pub fn new(cpu: CpuTarget, mode: OptMode, dialect: &'static Dialect, trace: u8) -> Self {
        Self {
            cpu,
            mode,
            dialect,
            trace,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cpu: CpuTarget::Mos6502,
            mode: OptMode::Speed,
            dialect: Dialect::generic(),
            trace: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_capability_flags() {
        assert!(!CpuTarget::Mos6502.allow_65c02());
        assert!(CpuTarget::Mos65C02.allow_65c02());
        assert!(CpuTarget::Mos65816.allow_65c02());
        // The 45GS02 runs 65C02 code but must never receive the STZ rewrite.
        assert!(CpuTarget::Mega45Gs02.allow_65c02());
        assert!(CpuTarget::Mega45Gs02.is_45gs02());
        assert!(!CpuTarget::Mos65C02.is_45gs02());
    }
}
