//! Pipeline run with explicit, checked stages.
//!
//! The run moves through these states in order:
//! 1. **Loading**: configuration checks and source loading
//! 2. **Validating**: every enabled rule against every record
//! 3. **Partitioned**: valid/invalid sets and the error list are final
//! 4. **Exporting**: CSV pair, then XML and JSON pairs when enabled
//! 5. **Done**
//!
//! Any state may move to **Failed** on a fatal error. Each transition is
//! reported to the caller's [`DiagnosticsSink`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, info_span, warn};

use recval_ingest::{IngestError, ReadOptions, read_records};
use recval_model::{
    Diagnostic, DiagnosticsSink, PartitionKind, PartitionResult, PipelineConfig, PipelineState,
    RecordSet, SkipReason, ValidationError,
};
use recval_output::{
    ExportError, ExportFormat, ExportOutcome, write_csv, write_json, write_xml,
};
use recval_validate::{ValidateError, ValidatorSet, partition};

use crate::config::{ConfigError, csv_delimiter, validate_config};

/// Errors that end a run before exporting starts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] IngestError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error("illegal state transition {from} -> {to}")]
    Transition {
        from: PipelineState,
        to: PipelineState,
    },
}

/// Per-run switches that are not part of the configuration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Validate and report without writing any file.
    pub dry_run: bool,
}

/// What happened to one planned export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ExportStatus {
    Written { records: usize },
    /// The partition was empty; nothing was written.
    Skipped,
    DryRun,
    Failed { message: String },
    /// An earlier export failed and the abort policy is on.
    NotAttempted,
}

impl ExportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExportStatus::Written { .. } => "written",
            ExportStatus::Skipped => "skipped",
            ExportStatus::DryRun => "dry run",
            ExportStatus::Failed { .. } => "failed",
            ExportStatus::NotAttempted => "not attempted",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExportStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub format: ExportFormat,
    pub kind: PartitionKind,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ExportStatus,
}

/// Outcome of a run that got past partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<ValidationError>,
    pub exports: Vec<ExportRecord>,
    pub state: PipelineState,
}

impl RunReport {
    pub fn failed_exports(&self) -> usize {
        self.exports
            .iter()
            .filter(|export| export.status.is_failed())
            .count()
    }

    /// The run reached `DONE` and every attempted export succeeded.
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Done && self.failed_exports() == 0
    }
}

/// Current state plus the sink every transition is reported to.
struct Lifecycle<'s> {
    state: PipelineState,
    sink: &'s mut dyn DiagnosticsSink,
}

impl<'s> Lifecycle<'s> {
    fn new(sink: &'s mut dyn DiagnosticsSink) -> Self {
        Self {
            state: PipelineState::Loading,
            sink,
        }
    }

    fn advance(&mut self, to: PipelineState) -> Result<(), PipelineError> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(PipelineError::Transition { from, to });
        }
        debug!(%from, %to, "state transition");
        self.sink.emit(Diagnostic::StateChanged { from, to });
        self.state = to;
        Ok(())
    }

    fn fail(&mut self, message: String) {
        let from = self.state;
        if from.is_terminal() {
            return;
        }
        self.sink.emit(Diagnostic::StateChanged {
            from,
            to: PipelineState::Failed,
        });
        self.sink.emit(Diagnostic::Fatal {
            state: from,
            message,
        });
        self.state = PipelineState::Failed;
    }

    fn emit(&mut self, event: Diagnostic) {
        self.sink.emit(event);
    }
}

/// Run the whole pipeline for `config`.
///
/// Fatal errors (configuration, source, missing validated field) end the run
/// in `FAILED` and are returned. Export failures are recorded in the report;
/// with `abortar_en_error` the first one also moves the run to `FAILED` and
/// the remaining exports are not attempted.
pub fn run_pipeline(
    config: &PipelineConfig,
    options: RunOptions,
    sink: &mut dyn DiagnosticsSink,
) -> Result<RunReport, PipelineError> {
    let span = info_span!(
        "pipeline_run",
        input = %config.files.input.display(),
        dry_run = options.dry_run
    );
    let _guard = span.enter();
    let start = Instant::now();

    let mut lifecycle = Lifecycle::new(sink);
    let result = execute(config, options, &mut lifecycle);
    if let Err(error) = &result {
        error!(state = %lifecycle.state, %error, "pipeline failed");
        lifecycle.fail(error.to_string());
    }
    debug!(
        state = %lifecycle.state,
        duration_ms = start.elapsed().as_millis(),
        "pipeline finished"
    );
    result
}

fn execute(
    config: &PipelineConfig,
    options: RunOptions,
    lifecycle: &mut Lifecycle<'_>,
) -> Result<RunReport, PipelineError> {
    validate_config(config)?;
    let validators = ValidatorSet::from_config(&config.validations)?;
    let read_options = ReadOptions {
        delimiter: csv_delimiter(config)?,
    };

    let records = read_records(&config.files.input, read_options)?;
    lifecycle.emit(Diagnostic::SourceLoaded {
        path: config.files.input.clone(),
        records: records.len(),
        fields: records.schema().fields().to_vec(),
    });

    lifecycle.advance(PipelineState::Validating)?;
    let result = partition(records, &validators)?;
    lifecycle.advance(PipelineState::Partitioned)?;

    lifecycle.emit(Diagnostic::Summary {
        total: result.total(),
        valid: result.valid.len(),
        invalid: result.invalid.len(),
        errors: result.errors.len(),
    });
    for rejected in &result.errors {
        lifecycle.emit(Diagnostic::Rejected(rejected.clone()));
    }

    lifecycle.advance(PipelineState::Exporting)?;
    let exports = export_all(config, &result, options, lifecycle);
    let failed = exports.iter().find(|export| export.status.is_failed());
    match failed {
        Some(export) if config.export.abort_on_error => {
            let message = format!(
                "{} export of {} records failed: {}",
                export.format,
                export.kind,
                export.path.display()
            );
            lifecycle.fail(message);
        }
        _ => lifecycle.advance(PipelineState::Done)?,
    }

    Ok(RunReport {
        total: result.total(),
        valid: result.valid.len(),
        invalid: result.invalid.len(),
        errors: result.errors,
        exports,
        state: lifecycle.state,
    })
}

struct ExportJob<'a> {
    format: ExportFormat,
    kind: PartitionKind,
    path: &'a Path,
}

/// Exports in execution order: CSV pair, then XML and JSON pairs when
/// enabled.
fn planned_exports(config: &PipelineConfig) -> Vec<ExportJob<'_>> {
    let files = &config.files;
    let mut jobs = vec![
        ExportJob {
            format: ExportFormat::Csv,
            kind: PartitionKind::Valid,
            path: files.valid_csv.as_path(),
        },
        ExportJob {
            format: ExportFormat::Csv,
            kind: PartitionKind::Invalid,
            path: files.invalid_csv.as_path(),
        },
    ];
    let optional = [
        (
            ExportFormat::Xml,
            config.export.xml.enabled,
            &files.valid_xml,
            &files.invalid_xml,
        ),
        (
            ExportFormat::Json,
            config.export.json.enabled,
            &files.valid_json,
            &files.invalid_json,
        ),
    ];
    for (format, enabled, valid, invalid) in optional {
        if !enabled {
            continue;
        }
        for (kind, path) in [(PartitionKind::Valid, valid), (PartitionKind::Invalid, invalid)] {
            if let Some(path) = path {
                jobs.push(ExportJob {
                    format,
                    kind,
                    path: path.as_path(),
                });
            }
        }
    }
    jobs
}

fn export_all(
    config: &PipelineConfig,
    result: &PartitionResult,
    options: RunOptions,
    lifecycle: &mut Lifecycle<'_>,
) -> Vec<ExportRecord> {
    let mut aborted = false;
    let mut exports = Vec::new();
    for job in planned_exports(config) {
        let format = job.format.as_str();
        let path = job.path.to_path_buf();
        let status = if aborted {
            lifecycle.emit(Diagnostic::ExportNotAttempted {
                format,
                kind: job.kind,
                path: path.clone(),
            });
            ExportStatus::NotAttempted
        } else if options.dry_run {
            lifecycle.emit(Diagnostic::ExportSkipped {
                format,
                kind: job.kind,
                path: path.clone(),
                reason: SkipReason::DryRun,
            });
            ExportStatus::DryRun
        } else {
            let span = info_span!("export", format, kind = %job.kind);
            let _guard = span.enter();
            match write_export(config, &job, result.records(job.kind)) {
                Ok(ExportOutcome::Written { records, .. }) => {
                    lifecycle.emit(Diagnostic::ExportWritten {
                        format,
                        kind: job.kind,
                        path: path.clone(),
                        records,
                    });
                    ExportStatus::Written { records }
                }
                Ok(ExportOutcome::Skipped { .. }) => {
                    lifecycle.emit(Diagnostic::ExportSkipped {
                        format,
                        kind: job.kind,
                        path: path.clone(),
                        reason: SkipReason::Empty,
                    });
                    ExportStatus::Skipped
                }
                Err(error) => {
                    let message = error.to_string();
                    lifecycle.emit(Diagnostic::ExportFailed {
                        format,
                        kind: job.kind,
                        path: path.clone(),
                        message: message.clone(),
                    });
                    if config.export.abort_on_error {
                        warn!("aborting remaining exports");
                        aborted = true;
                    }
                    ExportStatus::Failed { message }
                }
            }
        };
        exports.push(ExportRecord {
            format: job.format,
            kind: job.kind,
            path,
            status,
        });
    }
    exports
}

fn write_export(
    config: &PipelineConfig,
    job: &ExportJob<'_>,
    records: &RecordSet,
) -> Result<ExportOutcome, ExportError> {
    match job.format {
        ExportFormat::Csv => write_csv(job.path, records, &config.export.csv),
        ExportFormat::Xml => write_xml(job.path, records, &config.export.xml),
        ExportFormat::Json => write_json(job.path, records, job.kind, &config.export.json),
    }
}

/// Sink that turns run diagnostics into `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn emit(&mut self, event: Diagnostic) {
        match event {
            Diagnostic::StateChanged { from, to } => debug!(%from, %to, "state changed"),
            Diagnostic::SourceLoaded {
                path,
                records,
                fields,
            } => info!(
                path = %path.display(),
                records,
                fields = fields.len(),
                "loaded records"
            ),
            Diagnostic::Summary {
                total,
                valid,
                invalid,
                errors,
            } => info!(total, valid, invalid, errors, "validation summary"),
            Diagnostic::Rejected(rejected) => warn!(
                row = rejected.row,
                field = %rejected.field,
                value = %rejected.value,
                "{}",
                rejected.message
            ),
            Diagnostic::ExportWritten {
                format,
                kind,
                path,
                records,
            } => info!(format, %kind, path = %path.display(), records, "export written"),
            Diagnostic::ExportSkipped {
                format,
                kind,
                path,
                reason: SkipReason::Empty,
            } => warn!(format, %kind, path = %path.display(), "no records to export"),
            Diagnostic::ExportSkipped {
                format,
                kind,
                path,
                reason: SkipReason::DryRun,
            } => info!(format, %kind, path = %path.display(), "dry run, export not written"),
            Diagnostic::ExportFailed {
                format,
                kind,
                path,
                message,
            } => error!(format, %kind, path = %path.display(), %message, "export failed"),
            Diagnostic::ExportNotAttempted { format, kind, path } => {
                warn!(format, %kind, path = %path.display(), "export not attempted")
            }
            Diagnostic::Fatal { state, message } => error!(%state, %message, "run failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recval_model::{FileConfig, MemorySink};

    fn config() -> PipelineConfig {
        let mut config = PipelineConfig::new(FileConfig {
            input: PathBuf::from("in.csv"),
            valid_csv: PathBuf::from("v.csv"),
            invalid_csv: PathBuf::from("i.csv"),
            valid_xml: Some(PathBuf::from("v.xml")),
            invalid_xml: Some(PathBuf::from("i.xml")),
            valid_json: Some(PathBuf::from("v.json")),
            invalid_json: Some(PathBuf::from("i.json")),
        });
        config.export.json.enabled = true;
        config
    }

    #[test]
    fn export_order_skips_disabled_formats() {
        let config = config();
        let order: Vec<(ExportFormat, PartitionKind)> = planned_exports(&config)
            .iter()
            .map(|job| (job.format, job.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                (ExportFormat::Csv, PartitionKind::Valid),
                (ExportFormat::Csv, PartitionKind::Invalid),
                (ExportFormat::Json, PartitionKind::Valid),
                (ExportFormat::Json, PartitionKind::Invalid),
            ]
        );
    }

    #[test]
    fn illegal_transition_rejected() {
        let mut sink = MemorySink::new();
        let mut lifecycle = Lifecycle::new(&mut sink);
        assert!(matches!(
            lifecycle.advance(PipelineState::Exporting),
            Err(PipelineError::Transition { .. })
        ));
        lifecycle.advance(PipelineState::Validating).unwrap();
        lifecycle.fail("boom".to_string());
        lifecycle.fail("again".to_string());
        assert_eq!(lifecycle.state, PipelineState::Failed);
        assert_eq!(
            sink.states(),
            vec![
                PipelineState::Loading,
                PipelineState::Validating,
                PipelineState::Failed
            ]
        );
    }
}
