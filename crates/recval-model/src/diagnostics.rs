//! Run-scoped diagnostics.
//!
//! Pipeline stages report what happened through a [`DiagnosticsSink`] handed
//! to them by the caller instead of a process-wide logger. The binary forwards
//! events to `tracing`; tests collect them with [`MemorySink`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validation::{PartitionKind, ValidationError};

/// Lifecycle of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Loading,
    Validating,
    Partitioned,
    Exporting,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Loading => "LOADING",
            PipelineState::Validating => "VALIDATING",
            PipelineState::Partitioned => "PARTITIONED",
            PipelineState::Exporting => "EXPORTING",
            PipelineState::Done => "DONE",
            PipelineState::Failed => "FAILED",
        }
    }

    /// Forward successor in the normal sequence, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineState::Loading => Some(PipelineState::Validating),
            PipelineState::Validating => Some(PipelineState::Partitioned),
            PipelineState::Partitioned => Some(PipelineState::Exporting),
            PipelineState::Exporting => Some(PipelineState::Done),
            PipelineState::Done | PipelineState::Failed => None,
        }
    }

    /// `Failed` is reachable from every non-terminal state; otherwise only the
    /// forward successor is.
    pub fn can_transition_to(self, to: Self) -> bool {
        match (self, to) {
            (PipelineState::Done | PipelineState::Failed, _) => false,
            (_, PipelineState::Failed) => true,
            (from, to) => from.next() == Some(to),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an export did not produce a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The partition had no records.
    Empty,
    /// The run was a dry run.
    DryRun,
}

/// A single event reported during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    StateChanged {
        from: PipelineState,
        to: PipelineState,
    },
    SourceLoaded {
        path: PathBuf,
        records: usize,
        fields: Vec<String>,
    },
    /// Aggregate counts, emitted once partitioning has finished.
    Summary {
        total: usize,
        valid: usize,
        invalid: usize,
        errors: usize,
    },
    /// One failed field check.
    Rejected(ValidationError),
    ExportWritten {
        format: &'static str,
        kind: PartitionKind,
        path: PathBuf,
        records: usize,
    },
    ExportSkipped {
        format: &'static str,
        kind: PartitionKind,
        path: PathBuf,
        reason: SkipReason,
    },
    ExportFailed {
        format: &'static str,
        kind: PartitionKind,
        path: PathBuf,
        message: String,
    },
    ExportNotAttempted {
        format: &'static str,
        kind: PartitionKind,
        path: PathBuf,
    },
    /// An unrecoverable error ended the run in `state`.
    Fatal {
        state: PipelineState,
        message: String,
    },
}

/// Receiver of run diagnostics.
pub trait DiagnosticsSink {
    fn emit(&mut self, event: Diagnostic);
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut S {
    fn emit(&mut self, event: Diagnostic) {
        (**self).emit(event);
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// States visited, in order, starting from the first transition source.
    pub fn states(&self) -> Vec<PipelineState> {
        let mut states = Vec::new();
        for event in &self.events {
            if let Diagnostic::StateChanged { from, to } = event {
                if states.is_empty() {
                    states.push(*from);
                }
                states.push(*to);
            }
        }
        states
    }
}

impl DiagnosticsSink for MemorySink {
    fn emit(&mut self, event: Diagnostic) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_only() {
        assert!(PipelineState::Loading.can_transition_to(PipelineState::Validating));
        assert!(PipelineState::Exporting.can_transition_to(PipelineState::Done));
        assert!(!PipelineState::Loading.can_transition_to(PipelineState::Exporting));
        assert!(!PipelineState::Partitioned.can_transition_to(PipelineState::Validating));
    }

    #[test]
    fn failed_is_absorbing() {
        for state in [
            PipelineState::Loading,
            PipelineState::Validating,
            PipelineState::Partitioned,
            PipelineState::Exporting,
        ] {
            assert!(state.can_transition_to(PipelineState::Failed));
        }
        assert!(!PipelineState::Failed.can_transition_to(PipelineState::Loading));
        assert!(!PipelineState::Failed.can_transition_to(PipelineState::Failed));
        assert!(!PipelineState::Done.can_transition_to(PipelineState::Failed));
    }

    #[test]
    fn memory_sink_tracks_states() {
        let mut sink = MemorySink::new();
        sink.emit(Diagnostic::StateChanged {
            from: PipelineState::Loading,
            to: PipelineState::Validating,
        });
        sink.emit(Diagnostic::Summary {
            total: 0,
            valid: 0,
            invalid: 0,
            errors: 0,
        });
        sink.emit(Diagnostic::StateChanged {
            from: PipelineState::Validating,
            to: PipelineState::Failed,
        });
        assert_eq!(
            sink.states(),
            vec![
                PipelineState::Loading,
                PipelineState::Validating,
                PipelineState::Failed
            ]
        );
        assert_eq!(sink.events().len(), 3);
    }
}
