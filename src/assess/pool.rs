//! Bounded worker pool that runs analyzers against one shared snapshot.
//!
//! Workers pull analyzers from a job channel and report `Started` and
//! `Finished` events back to the orchestrator, which owns every timeout
//! decision. A worker stuck in an overdue analyzer is replaced so queued
//! analyzers still get a thread. An analyzer that fails, panics or overruns its budget leaves its
//! dimension out of the result and is listed as incomplete. Results that arrive
//! after their dimension was given up on are discarded.

use crate::analyze::{AnalysisContext, Analyzer};
use crate::scan::Snapshot;
use crate::types::finding::Dimension;
use crate::types::scoring::DimensionScore;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub workers: usize,
    pub analyzer_timeout: Duration,
    pub deadline: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct PoolOutcome {
    pub completed: BTreeMap<Dimension, DimensionScore>,
    pub incomplete: BTreeSet<Dimension>,
    pub deadline_expired: bool,
}

enum Event {
    Started {
        dimension: Dimension,
        worker: usize,
        at: Instant,
    },
    Finished {
        dimension: Dimension,
        worker: usize,
        result: Result<DimensionScore, String>,
    },
}

pub fn run_analyzers(
    analyzers: Vec<Arc<dyn Analyzer>>,
    snapshot: Arc<Snapshot>,
    ctx: Arc<AnalysisContext>,
    settings: PoolSettings,
) -> PoolOutcome {
    if analyzers.is_empty() {
        return PoolOutcome::default();
    }

    let expected: BTreeSet<Dimension> = analyzers.iter().map(|a| a.dimension()).collect();
    let (job_tx, job_rx) = unbounded::<Arc<dyn Analyzer>>();
    for analyzer in &analyzers {
        // The receiver is still held here, so the send cannot fail.
        let _ = job_tx.send(Arc::clone(analyzer));
    }
    drop(job_tx);

    let (event_tx, event_rx) = unbounded::<Event>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let worker_count = settings.workers.max(1).min(analyzers.len());
    let spawn = |worker: usize| {
        spawn_worker(
            worker,
            job_rx.clone(),
            event_tx.clone(),
            Arc::clone(&snapshot),
            Arc::clone(&ctx),
            Arc::clone(&cancelled),
        )
    };

    let mut handles: Vec<(usize, JoinHandle<()>)> = Vec::with_capacity(worker_count);
    for worker in 0..worker_count {
        match spawn(worker) {
            Ok(handle) => handles.push((worker, handle)),
            Err(e) => warn!(worker, error = %e, "could not spawn analyzer worker"),
        }
    }

    if handles.is_empty() {
        warn!("no analyzer workers available, running analyzers inline");
        return run_inline(&job_rx, &snapshot, &ctx, settings.deadline, expected);
    }
    let mut next_worker = worker_count;

    let mut outcome = PoolOutcome::default();
    let mut running: HashMap<Dimension, (usize, Instant)> = HashMap::new();
    let mut resolved: BTreeSet<Dimension> = BTreeSet::new();
    let mut abandoned: BTreeSet<usize> = BTreeSet::new();

    while resolved.len() < expected.len() {
        let wake = next_wake(&running, settings);
        let received = match wake {
            Some(at) => event_rx.recv_deadline(at),
            None => event_rx
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Event::Started { dimension, worker, at }) => {
                running.insert(dimension, (worker, at));
            }
            Ok(Event::Finished { dimension, worker, result }) => {
                running.remove(&dimension);
                if !resolved.insert(dimension) {
                    debug!(dimension = dimension.id(), worker, "discarding late analyzer result");
                    continue;
                }
                match result {
                    Ok(score) => {
                        outcome.completed.insert(dimension, score);
                    }
                    Err(message) => {
                        warn!(dimension = dimension.id(), error = %message, "analyzer failed");
                        outcome.incomplete.insert(dimension);
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                if settings.deadline.is_some_and(|deadline| now >= deadline) {
                    warn!(
                        pending = expected.len() - resolved.len(),
                        "run deadline expired, finalizing with completed analyzers"
                    );
                    outcome.deadline_expired = true;
                    break;
                }
                let overdue: Vec<Dimension> = running
                    .iter()
                    .filter(|(_, (_, started))| now >= *started + settings.analyzer_timeout)
                    .map(|(dimension, _)| *dimension)
                    .collect();
                for dimension in overdue {
                    warn!(
                        dimension = dimension.id(),
                        timeout_secs = settings.analyzer_timeout.as_secs_f64(),
                        "analyzer timed out"
                    );
                    if let Some((worker, _)) = running.remove(&dimension) {
                        abandoned.insert(worker);
                        // Queued analyzers need a worker that is not stuck.
                        if !job_rx.is_empty() {
                            match spawn(next_worker) {
                                Ok(handle) => {
                                    debug!(
                                        worker = next_worker,
                                        replaces = worker,
                                        "spawned replacement analyzer worker"
                                    );
                                    handles.push((next_worker, handle));
                                }
                                Err(e) => warn!(
                                    worker = next_worker,
                                    error = %e,
                                    "could not spawn replacement worker"
                                ),
                            }
                            next_worker += 1;
                        }
                    }
                    resolved.insert(dimension);
                    outcome.incomplete.insert(dimension);
                }
                if abandoned.len() == handles.len() && running.is_empty() && !job_rx.is_empty() {
                    error!(
                        pending = expected.len() - resolved.len(),
                        "every analyzer worker is stuck, giving up on queued analyzers"
                    );
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                error!("analyzer workers exited before reporting every dimension");
                break;
            }
        }
    }

    cancelled.store(true, Ordering::SeqCst);
    outcome
        .incomplete
        .extend(expected.difference(&resolved).copied());

    // Workers still inside a timed-out analyzer, or any worker once the run
    // deadline passed, are left to finish on their own.
    let stuck: BTreeSet<usize> = running
        .values()
        .map(|(worker, _)| *worker)
        .chain(abandoned)
        .collect();
    for (worker, handle) in handles {
        if outcome.deadline_expired || stuck.contains(&worker) {
            debug!(worker, "detaching analyzer worker");
            continue;
        }
        if handle.join().is_err() {
            error!(worker, "analyzer worker panicked outside an analyzer");
        }
    }

    outcome
}

fn next_wake(running: &HashMap<Dimension, (usize, Instant)>, settings: PoolSettings) -> Option<Instant> {
    let timeouts = running
        .values()
        .map(|(_, started)| *started + settings.analyzer_timeout);
    timeouts.chain(settings.deadline).min()
}

fn spawn_worker(
    worker: usize,
    jobs: Receiver<Arc<dyn Analyzer>>,
    events: Sender<Event>,
    snapshot: Arc<Snapshot>,
    ctx: Arc<AnalysisContext>,
    cancelled: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("analyzer-{worker}"))
        .spawn(move || worker_loop(worker, jobs, events, &snapshot, &ctx, &cancelled))
}

fn worker_loop(
    worker: usize,
    jobs: Receiver<Arc<dyn Analyzer>>,
    events: Sender<Event>,
    snapshot: &Snapshot,
    ctx: &AnalysisContext,
    cancelled: &AtomicBool,
) {
    while let Ok(analyzer) = jobs.recv() {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        let dimension = analyzer.dimension();
        let started = Instant::now();
        if events
            .send(Event::Started {
                dimension,
                worker,
                at: started,
            })
            .is_err()
        {
            break;
        }

        let result = run_guarded(analyzer.as_ref(), snapshot, ctx);
        debug!(
            dimension = dimension.id(),
            worker,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "analyzer finished"
        );
        if events
            .send(Event::Finished {
                dimension,
                worker,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}

/// Runs one analyzer, turning both errors and panics into a message.
fn run_guarded(
    analyzer: &dyn Analyzer,
    snapshot: &Snapshot,
    ctx: &AnalysisContext,
) -> Result<DimensionScore, String> {
    match catch_unwind(AssertUnwindSafe(|| analyzer.analyze(snapshot, ctx))) {
        Ok(Ok(score)) => Ok(score),
        Ok(Err(e)) => Err(e.to_string()),
        Err(panic_info) => {
            let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            error!(dimension = analyzer.dimension().id(), panic = %message, "analyzer panicked");
            Err(format!("panic: {message}"))
        }
    }
}

fn run_inline(
    jobs: &Receiver<Arc<dyn Analyzer>>,
    snapshot: &Snapshot,
    ctx: &AnalysisContext,
    deadline: Option<Instant>,
    expected: BTreeSet<Dimension>,
) -> PoolOutcome {
    let mut outcome = PoolOutcome::default();
    while let Ok(analyzer) = jobs.try_recv() {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            outcome.deadline_expired = true;
            break;
        }
        let dimension = analyzer.dimension();
        match run_guarded(analyzer.as_ref(), snapshot, ctx) {
            Ok(score) => {
                outcome.completed.insert(dimension, score);
            }
            Err(message) => {
                warn!(dimension = dimension.id(), error = %message, "analyzer failed");
                outcome.incomplete.insert(dimension);
            }
        }
    }
    outcome.incomplete.extend(
        expected
            .into_iter()
            .filter(|dimension| !outcome.completed.contains_key(dimension)),
    );
    outcome
}
