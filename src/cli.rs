// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{CpuTarget, OptMode, RunConfig};
use crate::syntax::Dialect;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Assembly-to-assembly optimizer for the 6502 family.

Reads an assembly source file, applies iterative peephole, dataflow and
CPU-specific optimization passes, and writes equivalent optimized assembly.
Supports the NMOS 6502, the 65C02, the 65816 and the MEGA65's 45GS02.
Note that on the 45GS02 the STZ instruction stores the Z register, not
zero; zero-store rewriting is handled accordingly.";

#[derive(Parser, Debug)]
#[command(
    name = "opt6502",
    version = VERSION,
    about = "6502-family assembly optimizer (6502/65C02/65816/45GS02)",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "cpu",
        value_enum,
        default_value_t = CpuArg::Cpu6502,
        long_help = "Target CPU. Determines which instruction rewrites are legal; \
                     65C02-only instructions are never emitted for the plain 6502."
    )]
    pub cpu: CpuArg,
    #[arg(
        long = "mode",
        value_enum,
        default_value_t = ModeArg::Speed,
        long_help = "Optimization goal. Both modes currently run the same pass set; \
                     the choice is recorded in the output banner."
    )]
    pub mode: ModeArg,
    #[arg(
        long = "asm",
        value_name = "DIALECT",
        default_value = "generic",
        long_help = "Assembler dialect for comment and label syntax: generic, ca65, \
                     kick, acme, dasm, tass, 64tass, buddy, merlin, or lisa."
    )]
    pub asm: String,
    #[arg(
        long = "trace",
        value_name = "N",
        default_value_t = 0,
        long_help = "Trace verbosity. 0 = off, 1 = comment removed instructions in \
                     the output, 2 = also print per-instruction register state."
    )]
    pub trace: u8,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select run summary format. text is default; json prints one \
                     machine-readable object on stdout."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress the run summary. Warnings are still printed to stderr."
    )]
    pub quiet: bool,
    #[arg(value_name = "INPUT", long_help = "Input assembly source file.")]
    pub input: PathBuf,
    #[arg(
        value_name = "OUTPUT",
        default_value = "output.asm",
        long_help = "Output file for the optimized assembly. Defaults to output.asm."
    )]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CpuArg {
    #[default]
    #[value(name = "6502")]
    Cpu6502,
    #[value(name = "65c02")]
    Cpu65C02,
    #[value(name = "65816")]
    Cpu65816,
    #[value(name = "45gs02")]
    Cpu45Gs02,
}

impl CpuArg {
    fn target(self) -> CpuTarget {
        match self {
            CpuArg::Cpu6502 => CpuTarget::Mos6502,
            CpuArg::Cpu65C02 => CpuTarget::Mos65C02,
            CpuArg::Cpu65816 => CpuTarget::Mos65816,
            CpuArg::Cpu45Gs02 => CpuTarget::Mega45Gs02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Speed,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// CLI validation failure.
#[derive(Debug)]
pub struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for CliError {}

/// Validated CLI configuration.
#[derive(Debug)]
pub struct CliConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub run: RunConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Validate CLI arguments and return the resolved configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, CliError> {
    let dialect = Dialect::by_name(&cli.asm).ok_or_else(|| {
        CliError::new(format!(
            "Unknown assembler dialect '{}'. Expected one of: generic, ca65, kick, \
             acme, dasm, tass, 64tass, buddy, merlin, lisa",
            cli.asm
        ))
    })?;

    if cli.trace > 2 {
        return Err(CliError::new("--trace accepts levels 0, 1 and 2"));
    }

    let mode = match cli.mode {
        ModeArg::Speed => OptMode::Speed,
        ModeArg::Size => OptMode::Size,
    };

    Ok(CliConfig {
        input: cli.input.clone(),
        output: cli.output.clone(),
        run: RunConfig::new(cli.cpu.target(), mode, dialect, cli.trace),
        format: cli.format,
        quiet: cli.quiet,
    })
}
