//! Script runner
//!
//! Executes a command script against a store and writes search results.

use std::io::{BufRead, Write};

use crate::config::SearchMissPolicy;
use crate::error::Result;
use crate::store::RecordStore;

use super::Command;

/// Counters for one script run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands handed to the store
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Lines that did not parse (audited as failures)
    pub skipped: usize,
}

/// Runs scripts line by line
///
/// Rejected commands are counted and the script continues; only a failure
/// to write results aborts the run.
pub struct ScriptRunner<'a, W: Write> {
    store: &'a RecordStore,
    output: W,
    miss_policy: SearchMissPolicy,
}

impl<'a, W: Write> ScriptRunner<'a, W> {
    pub fn new(store: &'a RecordStore, output: W, miss_policy: SearchMissPolicy) -> Self {
        Self {
            store,
            output,
            miss_policy,
        }
    }

    /// Execute every non-blank line of `input`
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "skipping script line");
                    self.store.record_rejected(&line, &e);
                    summary.skipped += 1;
                    continue;
                }
            };

            summary.executed += 1;
            if self.execute(command)? {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        self.output.flush()?;
        Ok(summary)
    }

    /// Execute one command; returns whether it succeeded
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        let is_search = matches!(command, Command::SearchRecord { .. });

        match self.store.execute(command) {
            Ok(Some(record)) => {
                writeln!(self.output, "{}", record.join(" "))?;
                Ok(true)
            }
            Ok(None) => Ok(true),
            Err(e) => {
                if e.is_storage_failure() {
                    tracing::error!(error = %e, "command aborted");
                } else {
                    tracing::debug!(error = %e, "command rejected");
                }
                if is_search {
                    if let SearchMissPolicy::Placeholder(text) = &self.miss_policy {
                        writeln!(self.output, "{}", text)?;
                    }
                }
                Ok(false)
            }
        }
    }

    /// Consume the runner, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}
