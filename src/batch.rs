//! Parallel batch processing with per-document failure isolation.
//!
//! Each worker processes one whole document end-to-end; documents never
//! share state, so a corrupt file is recorded as a failure without touching
//! its siblings, and results are identical for any worker count.

use crate::error::{Error, Result};
use crate::model::{BatchStats, DocumentResult};
use crate::outline::{extract_outline, OutlineOptions};
use crate::source::PdfSpanSource;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Terminal state of one document in a batch.
#[derive(Debug)]
pub enum DocumentOutcome {
    /// The document was opened and produced a result (its outline may be
    /// empty).
    Succeeded(DocumentResult),
    /// The document could not be processed at all.
    Failed { source_file: String, error: Error },
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DocumentOutcome::Succeeded(_))
    }

    /// Path or identifier of the document this outcome belongs to.
    pub fn source_file(&self) -> &str {
        match self {
            DocumentOutcome::Succeeded(result) => &result.source_file,
            DocumentOutcome::Failed { source_file, .. } => source_file,
        }
    }
}

/// Batch execution options.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker count; 0 uses one worker per logical CPU, 1 runs serially.
    pub workers: usize,

    /// Outline extraction options applied to every document.
    pub outline: OutlineOptions,
}

impl BatchOptions {
    /// Create batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the outline options.
    pub fn with_outline(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }
}

/// Everything a completed batch run produced.
#[derive(Debug)]
pub struct BatchReport {
    /// Per-document outcomes, in input order.
    pub outcomes: Vec<DocumentOutcome>,
    /// Aggregated statistics.
    pub stats: BatchStats,
}

/// Runs the outline pipeline over many documents on a worker pool.
pub struct BatchRunner {
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if self.options.workers > 0 {
            builder = builder.num_threads(self.options.workers);
        }
        builder
            .build()
            .map_err(|e| Error::Batch(format!("failed to build worker pool: {}", e)))
    }

    /// Process every path and collect all outcomes, in input order.
    pub fn run(&self, paths: &[PathBuf]) -> Result<BatchReport> {
        self.options.outline.validate()?;
        let pool = self.build_pool()?;
        let outline = &self.options.outline;

        let outcomes: Vec<DocumentOutcome> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| process_document(path, outline))
                .collect()
        });

        let mut stats = BatchStats::new();
        for outcome in &outcomes {
            match outcome {
                DocumentOutcome::Succeeded(result) => stats.record_success(result),
                DocumentOutcome::Failed { .. } => stats.record_failure(),
            }
        }
        stats.finalize();

        Ok(BatchReport { outcomes, stats })
    }

    /// Process every path, handing each outcome to `sink` as it completes
    /// (completion order, on the caller's thread).
    ///
    /// A sink error is fatal to the whole batch: dispatch of further
    /// documents stops cooperatively, in-flight outcomes are drained, and
    /// the sink's error is returned. Per-document failures are not fatal;
    /// they reach the sink like any other outcome.
    pub fn run_with<F>(&self, paths: &[PathBuf], mut sink: F) -> Result<BatchStats>
    where
        F: FnMut(&DocumentOutcome) -> Result<()>,
    {
        self.options.outline.validate()?;
        let pool = self.build_pool()?;
        let outline = &self.options.outline;
        let cancelled = AtomicBool::new(false);
        let (tx, rx) = crossbeam_channel::bounded(pool.current_num_threads().max(1));

        std::thread::scope(|scope| {
            let cancelled = &cancelled;
            let pool = &pool;
            scope.spawn(move || {
                pool.install(|| {
                    paths.par_iter().for_each(|path| {
                        if cancelled.load(Ordering::Relaxed) {
                            return;
                        }
                        let outcome = process_document(path, outline);
                        // The receiver only disappears when the batch is
                        // aborting; stop dispatching.
                        if tx.send(outcome).is_err() {
                            cancelled.store(true, Ordering::Relaxed);
                        }
                    });
                });
            });

            let mut stats = BatchStats::new();
            let mut sink_error: Option<Error> = None;
            for outcome in rx.iter() {
                match &outcome {
                    DocumentOutcome::Succeeded(result) => stats.record_success(result),
                    DocumentOutcome::Failed { .. } => stats.record_failure(),
                }
                if sink_error.is_none() {
                    if let Err(e) = sink(&outcome) {
                        log::warn!("aborting batch, sink failed: {}", e);
                        cancelled.store(true, Ordering::Relaxed);
                        sink_error = Some(e);
                    }
                }
            }

            match sink_error {
                Some(e) => Err(e),
                None => {
                    stats.finalize();
                    Ok(stats)
                }
            }
        })
    }
}

/// Run the outline pipeline over a single file, catching every error at the
/// document boundary.
pub fn process_document(path: &Path, options: &OutlineOptions) -> DocumentOutcome {
    let source_file = path.display().to_string();
    let result = PdfSpanSource::open(path).and_then(|source| extract_outline(&source, options));
    match result {
        Ok(result) => DocumentOutcome::Succeeded(result),
        Err(error) => {
            log::warn!("failed to process {}: {}", source_file, error);
            DocumentOutcome::Failed { source_file, error }
        }
    }
}
