mod analyze;
mod assess;
mod cli;
mod config;
mod error;
mod report;
mod scan;
mod types;

use crate::assess::{AssessmentRequest, Assessor};
use crate::error::ReadinessError;
use crate::types::config::ReadinessConfig;
use crate::types::finding::Dimension;
use crate::types::report::AssessmentOutcome;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// The repository could not be obtained; the `{error}` document is still emitted.
    pub const SNAPSHOT_UNAVAILABLE: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, _) => "debug",
        };
        EnvFilter::new(level)
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Markdown => report::OutputFormat::Markdown,
        cli::ReportFormat::Html => report::OutputFormat::Html,
    }
}

fn apply_overrides(
    mut cfg: ReadinessConfig,
    cmd: &cli::AssessCommand,
) -> Result<ReadinessConfig, ReadinessError> {
    if let Some(workers) = cmd.workers {
        cfg.execution.workers = workers;
    }
    if let Some(secs) = cmd.analyzer_timeout {
        cfg.execution.analyzer_timeout_secs = secs;
    }
    if let Some(secs) = cmd.deadline {
        cfg.execution.run_deadline_secs = Some(secs);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn print_summary(outcome: &AssessmentOutcome, path: &Path) {
    println!("Report saved to: {}", path.display());
    if let Some(report) = outcome.report() {
        let summary = &report.executive_summary;
        println!("Overall Score: {:.1}/100", summary.overall_score);
        println!("Readiness Level: {}", summary.readiness_level);
        println!("Total Issues: {}", summary.total_findings);
        println!(
            "Estimated Remediation: {:.1} hours",
            summary.estimated_remediation_hours
        );
        if report.metadata.partial {
            println!("Partial report: some dimensions did not complete");
        }
    }
}

fn assess(cmd: cli::AssessCommand) -> Result<i32, ReadinessError> {
    let loaded = config::load_config(cmd.config.as_deref())?;
    let cfg = apply_overrides(loaded, &cmd)?;

    let request = AssessmentRequest {
        source: cmd.repository.clone(),
        focus: cmd.focus.clone(),
        compliance: cmd.compliance.clone(),
    };
    let mut assessor = Assessor::new(cfg);
    let outcome = assessor.run(&request);
    tracing::debug!(state = %assessor.state(), "run finished");

    let rendered = report::render(&outcome, output_format(cmd.format))?;
    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            print_summary(&outcome, path);
        }
        None => println!("{rendered}"),
    }

    match &outcome {
        AssessmentOutcome::Completed(_) => Ok(exit_code::SUCCESS),
        AssessmentOutcome::Failed(failure) => {
            eprintln!("error: {}", failure.error);
            Ok(exit_code::SNAPSHOT_UNAVAILABLE)
        }
    }
}

fn default_render_path(input: &Path, format: report::OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "readiness".to_string());
    PathBuf::from(format!("{stem}_report.{}", format.extension()))
}

fn render(cmd: cli::RenderCommand) -> Result<i32, ReadinessError> {
    if !cmd.input.exists() {
        return Err(ReadinessError::PathNotFound(cmd.input.display().to_string()));
    }
    let content = std::fs::read_to_string(&cmd.input)?;
    let outcome = report::parse_saved(&content)?;

    let format = output_format(cmd.format);
    let rendered = report::render(&outcome, format)?;
    let path = cmd
        .output
        .unwrap_or_else(|| default_render_path(&cmd.input, format));
    std::fs::write(&path, rendered)?;
    println!("Report generated: {}", path.display());
    Ok(exit_code::SUCCESS)
}

fn dimensions() -> i32 {
    for dimension in Dimension::ALL {
        println!(
            "{:<18} {:<18} weight {}",
            dimension.id(),
            dimension.display_name(),
            dimension.weight()
        );
    }
    exit_code::SUCCESS
}

fn run() -> Result<i32, ReadinessError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        cli::Commands::Assess(cmd) => assess(cmd),
        cli::Commands::Render(cmd) => render(cmd),
        cli::Commands::Dimensions => Ok(dimensions()),
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_render_path_uses_input_stem() {
        let path = default_render_path(Path::new("out/acme.json"), report::OutputFormat::Html);
        assert_eq!(path, PathBuf::from("acme_report.html"));
    }

    #[test]
    fn cli_overrides_replace_config_values() {
        let cli = cli::Cli::try_parse_from([
            "readiness",
            "assess",
            ".",
            "--workers",
            "2",
            "--analyzer-timeout",
            "5",
            "--deadline",
            "30",
        ])
        .expect("arguments should parse");
        let cli::Commands::Assess(cmd) = cli.command else {
            panic!("expected assess");
        };
        let cfg = apply_overrides(ReadinessConfig::default(), &cmd).expect("overrides valid");
        assert_eq!(cfg.execution.workers, 2);
        assert_eq!(cfg.execution.analyzer_timeout_secs, 5);
        assert_eq!(cfg.execution.run_deadline_secs, Some(30));
    }

    #[test]
    fn zero_timeout_override_is_rejected() {
        let cli = cli::Cli::try_parse_from(["readiness", "assess", ".", "--analyzer-timeout", "0"])
            .expect("arguments should parse");
        let cli::Commands::Assess(cmd) = cli.command else {
            panic!("expected assess");
        };
        assert!(apply_overrides(ReadinessConfig::default(), &cmd).is_err());
    }
}
