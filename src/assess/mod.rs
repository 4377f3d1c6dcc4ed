pub mod assemble;
pub mod pool;
pub mod roadmap;
pub mod scoring;

use crate::analyze::{builtin_analyzers, AnalysisContext, Analyzer};
use crate::error::Result;
use crate::scan::source::{Checkout, GitProvider, SnapshotProvider};
use crate::scan::{discover, Snapshot};
use crate::types::config::ReadinessConfig;
use crate::types::finding::Dimension;
use crate::types::report::{AssessmentOutcome, ReportModel};
use assemble::{assemble, RunRecord};
use chrono::Utc;
use pool::{run_analyzers, PoolSettings};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Created,
    Cloning,
    Discovering,
    Analyzing,
    Scoring,
    Reporting,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Cloning => "cloning",
            Self::Discovering => "discovering",
            Self::Analyzing => "analyzing",
            Self::Scoring => "scoring",
            Self::Reporting => "reporting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Which dimensions a run analyzes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusFilter {
    All,
    Only(BTreeSet<Dimension>),
}

impl FocusFilter {
    /// Empty input or the `all` sentinel selects every dimension. Unknown ids
    /// are dropped with a warning; if nothing recognised remains, nothing runs.
    pub fn parse(ids: &[String]) -> Self {
        let ids: Vec<&str> = ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() || ids.iter().any(|id| id.eq_ignore_ascii_case(ALL_SENTINEL)) {
            return Self::All;
        }

        let mut selected = BTreeSet::new();
        for id in ids {
            match Dimension::parse(id) {
                Some(dimension) => {
                    selected.insert(dimension);
                }
                None => warn!(dimension = id, "ignoring unknown focus dimension"),
            }
        }
        Self::Only(selected)
    }

    pub fn includes(&self, dimension: Dimension) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected.contains(&dimension),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssessmentRequest {
    pub source: String,
    pub focus: Vec<String>,
    pub compliance: Vec<String>,
}

/// Drives one assessment from source location to report.
pub struct Assessor {
    config: ReadinessConfig,
    provider: Box<dyn SnapshotProvider>,
    analyzers: Vec<Arc<dyn Analyzer>>,
    state: RunState,
}

impl Assessor {
    pub fn new(config: ReadinessConfig) -> Self {
        let provider = GitProvider::new(config.clone.clone());
        Self {
            config,
            provider: Box::new(provider),
            analyzers: builtin_analyzers(),
            state: RunState::Created,
        }
    }

    pub fn with_provider(mut self, provider: impl SnapshotProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn with_analyzers(mut self, analyzers: Vec<Arc<dyn Analyzer>>) -> Self {
        self.analyzers = analyzers;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        info!(from = %self.state, to = %next, "assessment state");
        self.state = next;
    }

    /// Obtaining the repository is the only step that can fail the run; the
    /// failure comes back as an `{error}` outcome.
    pub fn run(&mut self, request: &AssessmentRequest) -> AssessmentOutcome {
        let started = Instant::now();
        self.transition(RunState::Cloning);

        // The checkout must outlive the analysis; dropping it removes clones.
        let (_checkout, snapshot) = match self.obtain(&request.source) {
            Ok(obtained) => obtained,
            Err(e) => {
                error!(
                    source = request.source.as_str(),
                    source_failure = e.is_source_failure(),
                    error = %e,
                    "could not obtain repository"
                );
                self.transition(RunState::Failed);
                return AssessmentOutcome::failed(e.to_string());
            }
        };

        let report = self.run_on_snapshot(&request.source, snapshot, request, started);
        AssessmentOutcome::Completed(Box::new(report))
    }

    fn obtain(&self, source: &str) -> Result<(Checkout, Snapshot)> {
        let checkout = self.provider.obtain(source)?;
        let snapshot = Snapshot::open(checkout.root(), &self.config)?;
        Ok((checkout, snapshot))
    }

    /// Runs discovery, analysis, scoring and reporting over a ready snapshot.
    pub fn run_on_snapshot(
        &mut self,
        repository: &str,
        snapshot: Snapshot,
        request: &AssessmentRequest,
        started: Instant,
    ) -> ReportModel {
        self.transition(RunState::Discovering);
        let discovery = discover(&snapshot);
        info!(
            files = discovery.statistics.total_files,
            lines = discovery.statistics.total_lines,
            "discovery complete"
        );

        self.transition(RunState::Analyzing);
        let focus = FocusFilter::parse(&request.focus);
        let enabled: Vec<Arc<dyn Analyzer>> = self
            .analyzers
            .iter()
            .filter(|analyzer| focus.includes(analyzer.dimension()))
            .cloned()
            .collect();
        info!(analyzers = enabled.len(), "running analyzers");

        let settings = PoolSettings {
            workers: self.config.worker_count(),
            analyzer_timeout: self.config.analyzer_timeout(),
            deadline: self.config.run_deadline().map(|budget| started + budget),
        };
        let outcome = run_analyzers(
            enabled,
            Arc::new(snapshot),
            Arc::new(AnalysisContext::new(&request.compliance)),
            settings,
        );
        if !outcome.incomplete.is_empty() {
            warn!(
                dimensions = ?outcome.incomplete.iter().map(|d| d.id()).collect::<Vec<_>>(),
                deadline_expired = outcome.deadline_expired,
                "report is partial"
            );
        }

        self.transition(RunState::Scoring);
        let record = RunRecord {
            repository: repository.to_string(),
            assessment_date: Utc::now().to_rfc3339(),
            duration: started.elapsed(),
            discovery,
            scores: outcome.completed,
            incomplete: outcome.incomplete,
        };

        self.transition(RunState::Reporting);
        let report = assemble(record);
        info!(
            score = report.executive_summary.overall_score,
            level = %report.executive_summary.readiness_level,
            findings = report.executive_summary.total_findings,
            "assessment complete"
        );

        self.transition(RunState::Done);
        report
    }
}
