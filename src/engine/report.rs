//! Report sinks: where per-entity results go.

use crate::engine::result::{EntityKind, Operation, OperationResult, Outcome, RunSummary};
use crate::ui;
use colored::Colorize;

/// Receives per-entity and per-section results for display.
///
/// The engine pushes every result exactly once, in processing order.
pub trait ReportSink {
    /// A section is about to be processed.
    fn section_started(&mut self, kind: EntityKind) {
        let _ = kind;
    }

    /// One operation on one identifier produced a result.
    fn record(&mut self, result: &OperationResult);

    /// The full pass is complete.
    fn completed(&mut self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// Human-readable transcript on stdout.
#[derive(Debug, Default)]
pub struct ConsoleReport;

impl ConsoleReport {
    fn describe(result: &OperationResult) -> String {
        let target = match &result.identifier {
            Some(id) => format!("{} \"{}\"", result.kind, id),
            None => result.kind.to_string(),
        };
        format!("{} {}", result.operation, target)
    }
}

impl ReportSink for ConsoleReport {
    fn section_started(&mut self, kind: EntityKind) {
        ui::section(&format!("Processing section '{}'", kind.section_key()));
    }

    fn record(&mut self, result: &OperationResult) {
        let label = Self::describe(result);
        match &result.outcome {
            Outcome::Body(body) => {
                ui::success(&label);
                let rendered = serde_json::to_string_pretty(body)
                    .unwrap_or_else(|_| body.to_string());
                ui::dim(&rendered);
            }
            Outcome::Status(code) => {
                ui::success(&format!("{label} (HTTP {code})"));
            }
            Outcome::SkippedConflict => {
                println!(
                    "{} {label}: already exists and destructive mode is off",
                    "⊘".yellow()
                );
            }
            Outcome::Failed { message, .. } => {
                ui::error(&format!("{label}: {message}"));
            }
        }
    }

    fn completed(&mut self, summary: &RunSummary) {
        println!();
        if summary.is_success() {
            ui::success(&format!(
                "{} operations succeeded, {} skipped",
                summary.succeeded, summary.skipped_conflicts
            ));
        } else {
            ui::warn(&format!(
                "{} operations succeeded, {} skipped, {} failed",
                summary.succeeded,
                summary.skipped_conflicts,
                summary.failed.to_string().red()
            ));
        }
    }
}

/// Collects every result in order. Used by tests and by callers that render
/// results themselves.
#[derive(Debug, Default)]
pub struct RecordingReport {
    pub sections: Vec<EntityKind>,
    pub results: Vec<OperationResult>,
}

impl RecordingReport {
    /// Results for one (kind, operation) pair, in processing order.
    pub fn for_operation(&self, kind: EntityKind, operation: Operation) -> Vec<&OperationResult> {
        self.results
            .iter()
            .filter(|r| r.kind == kind && r.operation == operation)
            .collect()
    }
}

impl ReportSink for RecordingReport {
    fn section_started(&mut self, kind: EntityKind) {
        self.sections.push(kind);
    }

    fn record(&mut self, result: &OperationResult) {
        self.results.push(result.clone());
    }
}
