use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "readiness",
    version,
    about = "Production readiness assessment for source repositories"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assess a local path or git URL
    Assess(AssessCommand),
    /// Re-render a saved JSON report
    Render(RenderCommand),
    /// List dimension ids and weights
    Dimensions,
}

#[derive(Args)]
pub struct AssessCommand {
    /// Local directory or git URL
    pub repository: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma-separated dimension ids to run ("all" runs everything)
    #[arg(long, value_delimiter = ',')]
    pub focus: Vec<String>,

    /// Comma-separated compliance frameworks (soc2, gdpr, hipaa, pci)
    #[arg(long, value_delimiter = ',')]
    pub compliance: Vec<String>,

    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,

    /// Extra config file layered over the global one
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-analyzer timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub analyzer_timeout: Option<u64>,

    /// Whole-run deadline in seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,
}

#[derive(Args)]
pub struct RenderCommand {
    /// JSON report written by `assess`
    pub input: PathBuf,

    /// Defaults to `<input stem>_report.<ext>` in the working directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    #[value(alias = "structured")]
    Json,
    #[value(alias = "md")]
    Markdown,
    Html,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_splits_comma_lists() {
        let cli = Cli::try_parse_from([
            "readiness",
            "assess",
            "./repo",
            "--focus",
            "security,testing",
            "--compliance",
            "gdpr",
            "-f",
            "structured",
        ])
        .expect("arguments should parse");
        let Commands::Assess(cmd) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(cmd.focus, vec!["security", "testing"]);
        assert_eq!(cmd.compliance, vec!["gdpr"]);
        assert!(matches!(cmd.format, ReportFormat::Json));
    }

    #[test]
    fn render_defaults_to_markdown() {
        let cli = Cli::try_parse_from(["readiness", "render", "report.json"])
            .expect("arguments should parse");
        let Commands::Render(cmd) = cli.command else {
            panic!("expected render");
        };
        assert!(matches!(cmd.format, ReportFormat::Markdown));
        assert!(cmd.output.is_none());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["readiness", "-q", "-v", "dimensions"]).is_err());
    }
}
