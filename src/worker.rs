//! Background analysis handoff.
//!
//! The frame loop never waits on the processor: [`AnalysisJob::spawn`] runs it on its own
//! thread and hands one message back over a single-slot channel that the loop polls once per
//! frame.

use crate::state::{AnalysisSummary, KernelParams};
use anyhow::{bail, Context, Result};
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Everything a processor needs to produce a table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub audio_path: Option<PathBuf>,
    pub kernel: KernelParams,
}

/// One row per sample: time, filtered value, envelope, event flag (0/1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisTable {
    pub rows: Vec<(f64, Vec<f64>)>,
}

impl AnalysisTable {
    /// Parse whitespace-separated rows. Blank lines and `#` comments are skipped.
    pub fn parse_tsv(content: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut width = None;
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let values = line
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("line {}: non-numeric column", line_no + 1))?;
            let Some((time, columns)) = values.split_first() else {
                continue;
            };
            if columns.is_empty() {
                bail!("line {}: expected time plus at least one column", line_no + 1);
            }
            match width {
                None => width = Some(columns.len()),
                Some(expected) if expected != columns.len() => bail!(
                    "line {}: expected {} columns, found {}",
                    line_no + 1,
                    expected,
                    columns.len()
                ),
                Some(_) => {}
            }
            rows.push((*time, columns.to_vec()));
        }
        Ok(Self { rows })
    }

    /// Data columns after the time column.
    pub fn channel_count(&self) -> usize {
        self.rows.first().map_or(0, |(_, columns)| columns.len())
    }

    /// Rows whose last column (the event flag) is set.
    pub fn event_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|(_, columns)| columns.last().is_some_and(|flag| *flag >= 0.5))
            .count()
    }

    pub fn duration(&self) -> f64 {
        self.rows.last().map_or(0.0, |(time, _)| *time)
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            rows: self.rows.len(),
            channels: self.channel_count(),
            events: self.event_count(),
        }
    }
}

/// Produces an analysis table for a request. Runs off the UI thread.
pub trait SignalProcessor: Send + 'static {
    fn process(&self, request: &AnalysisRequest) -> Result<AnalysisTable>;
}

/// Lets one processor be shared by every job the App starts.
impl<P: SignalProcessor + Sync + ?Sized> SignalProcessor for Arc<P> {
    fn process(&self, request: &AnalysisRequest) -> Result<AnalysisTable> {
        (**self).process(request)
    }
}

/// Reads an already-materialized table from disk.
#[derive(Debug, Clone)]
pub struct TsvFileProcessor {
    path: PathBuf,
}

impl TsvFileProcessor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalProcessor for TsvFileProcessor {
    fn process(&self, request: &AnalysisRequest) -> Result<AnalysisTable> {
        request
            .kernel
            .validate()
            .map_err(|reason| anyhow::anyhow!("invalid kernel: {reason}"))?;
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        AnalysisTable::parse_tsv(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }
}

#[derive(Debug)]
pub enum AnalysisMessage {
    Finished {
        table: AnalysisTable,
        elapsed: Duration,
    },
    Failed(String),
}

/// Handle to an in-flight analysis.
pub struct AnalysisJob {
    receiver: Receiver<AnalysisMessage>,
    handle: Option<thread::JoinHandle<()>>,
}

impl AnalysisJob {
    pub fn spawn<P: SignalProcessor>(processor: P, request: AnalysisRequest) -> Self {
        let (tx, rx) = bounded(1);
        let handle = thread::spawn(move || {
            let started = Instant::now();
            let message = match processor.process(&request) {
                Ok(table) => AnalysisMessage::Finished {
                    table,
                    elapsed: started.elapsed(),
                },
                Err(err) => AnalysisMessage::Failed(format!("{err:#}")),
            };
            // The receiver may already be gone if the job was abandoned.
            let _ = tx.send(message);
        });
        Self {
            receiver: rx,
            handle: Some(handle),
        }
    }

    /// Non-blocking: `None` while the processor is still running.
    pub fn poll(&mut self) -> Option<AnalysisMessage> {
        match self.receiver.try_recv() {
            Ok(message) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                Some(message)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.handle.take();
                Some(AnalysisMessage::Failed(
                    "analysis worker exited without a result".to_string(),
                ))
            }
        }
    }
}
