//! The thumbnail build pass.
//!
//! Drives the cache over every registered [`DerivedThumbnail`]: check
//! freshness, skip or generate, tally. Independent generations share no
//! mutable state (the inventory's path uniqueness guarantees distinct
//! destinations), so the pass runs on a bounded rayon pool.
//!
//! ## Failure isolation
//!
//! One corrupt image must not sink the build. Per-entry failures are
//! collected into the [`ProcessReport`] and the pass continues; only
//! pool construction and output-root creation are fatal. Callers decide
//! what to do with the failure list — typically print it and carry on.

use crate::cache::{self, CacheError};
use crate::imaging::ImageBackend;
use crate::scan::{DerivedThumbnail, ThumbnailSet};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// One failed generation, reported after the pass completes.
#[derive(Debug)]
pub struct ThumbFailure {
    /// Source path relative to the content root.
    pub source_rel: String,
    pub error: CacheError,
}

/// Tally of a thumbnail pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ThumbStats {
    pub generated: u32,
    pub fresh: u32,
    pub failed: u32,
}

impl ThumbStats {
    pub fn total(&self) -> u32 {
        self.generated + self.fresh + self.failed
    }
}

impl fmt::Display for ThumbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed > 0 {
            write!(
                f,
                "{} generated, {} fresh, {} failed ({} total)",
                self.generated,
                self.fresh,
                self.failed,
                self.total()
            )
        } else if self.fresh > 0 {
            write!(
                f,
                "{} generated, {} fresh ({} total)",
                self.generated,
                self.fresh,
                self.total()
            )
        } else {
            write!(f, "{} generated", self.generated)
        }
    }
}

/// Outcome of a thumbnail pass: tally plus every per-entry failure.
#[derive(Debug)]
pub struct ProcessReport {
    pub stats: ThumbStats,
    pub failures: Vec<ThumbFailure>,
}

enum Outcome {
    Generated,
    Fresh,
    Failed(ThumbFailure),
}

/// Run the thumbnail pass over every registered entry.
///
/// Destinations are `output_root` joined with each entry's relative
/// destination path. `workers` bounds the parallelism (see
/// [`config::effective_workers`](crate::config::effective_workers)).
pub fn process_thumbnails(
    backend: &impl ImageBackend,
    set: &ThumbnailSet,
    output_root: &Path,
    workers: usize,
) -> Result<ProcessReport, ProcessError> {
    std::fs::create_dir_all(output_root)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let outcomes: Vec<Outcome> = pool.install(|| {
        set.entries()
            .par_iter()
            .map(|entry| process_entry(backend, entry, output_root))
            .collect()
    });

    let mut stats = ThumbStats::default();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Generated => stats.generated += 1,
            Outcome::Fresh => stats.fresh += 1,
            Outcome::Failed(failure) => {
                stats.failed += 1;
                failures.push(failure);
            }
        }
    }

    Ok(ProcessReport { stats, failures })
}

fn process_entry(
    backend: &impl ImageBackend,
    entry: &DerivedThumbnail,
    output_root: &Path,
) -> Outcome {
    let dest = output_root.join(&entry.dest_rel);

    match cache::needs_generation(&entry.source_path, &dest) {
        Ok(false) => return Outcome::Fresh,
        Ok(true) => {}
        Err(e) => {
            return Outcome::Failed(ThumbFailure {
                source_rel: entry.source_rel.clone(),
                error: e.into(),
            });
        }
    }

    match cache::generate(backend, &entry.source_path, &dest, entry.width, entry.height) {
        Ok(()) => Outcome::Generated,
        Err(error) => Outcome::Failed(ThumbFailure {
            source_rel: entry.source_rel.clone(),
            error,
        }),
    }
}
