// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for opt6502.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use opt6502::cli::{validate_cli, Cli, CliConfig, OutputFormat};
use opt6502::analysis::validator::{validate, ValidationReport};
use opt6502::opt::{optimize_program, OptimizeReport};
use opt6502::output;
use opt6502::program::Program;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let source = match fs::read_to_string(&config.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read {}: {err}", config.input.display());
            return ExitCode::FAILURE;
        }
    };

    let mut prog = Program::from_source(&source, config.run.dialect);
    let report = optimize_program(&mut prog, &config.run);
    for diag in &report.diagnostics {
        eprintln!("{diag}");
    }

    let validation = validate(&prog, &config.run);
    let rendered = output::render(&prog, &config.run, report.optimizations);
    if let Err(err) = fs::write(&config.output, rendered) {
        eprintln!("Error: cannot write {}: {err}", config.output.display());
        return ExitCode::FAILURE;
    }

    if !config.quiet {
        match config.format {
            OutputFormat::Text => print_text_summary(&config, &prog, &report, &validation),
            OutputFormat::Json => print_json_summary(&config, &prog, &report, &validation),
        }
    }

    ExitCode::SUCCESS
}

fn print_text_summary(
    config: &CliConfig,
    prog: &Program,
    report: &OptimizeReport,
    validation: &ValidationReport,
) {
    let run = &config.run;
    println!("Assembler dialect: {}", run.dialect.name);
    if run.cpu.is_45gs02() {
        println!(
            "Target CPU: {} (STZ stores the Z register on this CPU)",
            run.cpu.name()
        );
    } else {
        println!("Target CPU: {}", run.cpu.name());
    }
    println!("Optimizing for: {}", run.mode.name());

    let live = prog.live_count();
    let removed = prog.dead_count();
    let total = live + removed;
    println!("Lines: {live} live, {removed} removed of {total}");
    if total > 0 {
        println!(
            "Removal: {:.1}%",
            removed as f64 * 100.0 / total as f64
        );
    }
    println!(
        "Passes: {} iteration(s), {} optimization(s), {} inlined",
        report.iterations, report.optimizations, report.inlined
    );
    print!("{}", validation.render_text());
    if run.trace >= 2 {
        print!("{}", validation.render_snapshots());
    }
    println!("Output written to {}", config.output.display());
}

fn print_json_summary(
    config: &CliConfig,
    prog: &Program,
    report: &OptimizeReport,
    validation: &ValidationReport,
) {
    let live = prog.live_count();
    let removed = prog.dead_count();
    let total = live + removed;
    let removal_pct = if total > 0 {
        removed as f64 * 100.0 / total as f64
    } else {
        0.0
    };
    let value = json!({
        "input": config.input.display().to_string(),
        "output": config.output.display().to_string(),
        "dialect": config.run.dialect.id,
        "cpu": config.run.cpu.name(),
        "mode": config.run.mode.name(),
        "iterations": report.iterations,
        "optimizations": report.optimizations,
        "inlined": report.inlined,
        "converged": report.converged,
        "lines": {
            "live": live,
            "removed": removed,
            "total": total,
            "removal_pct": removal_pct,
        },
        "validation": validation.render_json(),
    });
    println!("{value}");
}
