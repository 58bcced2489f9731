//! Batch driver: discovers resume files and converts them one run per file.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{error, info};

use super::{OutputArtifacts, Pipeline};
use crate::errors::ConvertError;
use crate::extract::DocumentFormat;

/// Top-level `.pdf` and `.txt` files in `dir`, sorted by path.
pub fn discover_inputs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && DocumentFormat::from_path(&path).is_ok() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub elapsed: Duration,
    pub result: Result<OutputArtifacts, ConvertError>,
}

#[derive(Debug)]
pub struct BatchReport {
    /// One entry per input, in input order.
    pub outcomes: Vec<FileOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

impl Pipeline {
    /// Converts every input with at most `concurrency` runs in flight.
    /// A failed file is logged and never stops the others.
    pub async fn run_batch(&self, inputs: Vec<PathBuf>, concurrency: usize) -> BatchReport {
        let started = Instant::now();
        let outcomes = stream::iter(inputs)
            .map(|input| async move {
                info!("Processing file: {}", input.display());
                let file_started = Instant::now();
                let result = self.run(&input).await;
                let elapsed = file_started.elapsed();
                match &result {
                    Ok(_) => info!(
                        "Time taken for {}: {:.2} seconds",
                        input.display(),
                        elapsed.as_secs_f64()
                    ),
                    Err(e) => error!(
                        "Error processing file {} at stage {}: {e}",
                        input.display(),
                        e.stage()
                    ),
                }
                FileOutcome {
                    input,
                    elapsed,
                    result,
                }
            })
            .buffered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let report = BatchReport {
            outcomes,
            elapsed: started.elapsed(),
        };
        info!(
            "Batch finished: {} succeeded, {} failed in {:.2} seconds",
            report.succeeded(),
            report.failed(),
            report.elapsed.as_secs_f64()
        );
        report
    }
}
