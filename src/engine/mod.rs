//! Reconciliation engine.
//!
//! Drains a desired-state document section by section, operation by
//! operation, identifier by identifier, dispatching each declared intent to
//! the remote client and recording exactly one result per identifier
//! processed. Strictly sequential: no operation starts before the previous
//! one's result has been recorded, and a failed call is recorded once and
//! never reattempted.
//!
//! Failure isolation is per operation on one identifier: an unreadable
//! payload file or a rejected call never abandons the rest of the run. Only
//! a resolution failure at startup stops a run early, and that happens
//! before the engine ever sees the document.

pub mod dispatch;
pub mod report;
pub mod result;

pub use report::{ConsoleReport, RecordingReport, ReportSink};
pub use result::{EntityKind, Operation, OperationResult, Outcome, RunSummary};

use crate::client::ArtifactoryApi;
use crate::config::{
    Document, EntitySection, InstanceSection, LicenseSection, ListSpec, Payload,
    identifier_from_path,
};
use crate::error::Error;
use dispatch::KindOps;
use serde_json::Value;
use std::fs;

/// Engine lifecycle. `Done` is reached only after every declared operation
/// across every section has produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
}

/// The reconciliation engine: one pass over one document.
pub struct Engine<'a> {
    api: &'a dyn ArtifactoryApi,
    destructive: bool,
    state: RunState,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub fn new(api: &'a dyn ArtifactoryApi, destructive: bool) -> Self {
        Self {
            api,
            destructive,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Process every section the document declares, in fixed order:
    /// artifactory, license, users, groups, repositories, permissions.
    /// Absent sections and absent operation keys are skipped silently.
    pub fn run(&mut self, doc: &Document, sink: &mut dyn ReportSink) -> RunSummary {
        self.state = RunState::Running;
        let mut summary = RunSummary::default();

        if let Some(section) = &doc.artifactory
            && section.has_reads()
        {
            sink.section_started(EntityKind::Instance);
            self.instance_section(section, sink, &mut summary);
        }

        if let Some(section) = &doc.license {
            sink.section_started(EntityKind::License);
            self.license_section(section, sink, &mut summary);
        }

        for kind in dispatch::ENTITY_KINDS {
            let section = match kind {
                EntityKind::User => &doc.users,
                EntityKind::Group => &doc.groups,
                EntityKind::Repository => &doc.repositories,
                EntityKind::PermissionTarget => &doc.permissions,
                EntityKind::Instance | EntityKind::License => continue,
            };
            if let Some(section) = section {
                sink.section_started(kind);
                let ops = dispatch::kind_ops(self.api, kind);
                self.entity_section(&ops, section, sink, &mut summary);
            }
        }

        self.state = RunState::Done;
        sink.completed(&summary);
        summary
    }

    fn instance_section(
        &self,
        section: &InstanceSection,
        sink: &mut dyn ReportSink,
        summary: &mut RunSummary,
    ) {
        let reads: [(Option<bool>, Operation, fn(&dyn ArtifactoryApi) -> crate::error::Result<String>); 3] = [
            (section.health, Operation::Health, |api| api.system_health()),
            (section.information, Operation::Information, |api| {
                api.system_information()
            }),
            (section.configuration, Operation::Configuration, |api| {
                api.system_configuration()
            }),
        ];

        for (requested, operation, call) in reads {
            if requested != Some(true) {
                continue;
            }
            let outcome = match call(self.api) {
                Ok(text) => Outcome::Body(Value::String(text)),
                Err(err) => err.into(),
            };
            record(
                sink,
                summary,
                OperationResult::new(EntityKind::Instance, operation, None, outcome),
            );
        }
    }

    fn license_section(
        &self,
        section: &LicenseSection,
        sink: &mut dyn ReportSink,
        summary: &mut RunSummary,
    ) {
        if section.information == Some(true) {
            let outcome = match self.api.license_information() {
                Ok(body) => Outcome::Body(body),
                Err(err) => err.into(),
            };
            record(
                sink,
                summary,
                OperationResult::new(EntityKind::License, Operation::Information, None, outcome),
            );
        }

        let Some(install) = &section.install else {
            return;
        };

        // The key file wins; the inline value is the fallback.
        let (identifier, payload) = if let Some(path) = &install.license_file {
            match fs::read_to_string(path) {
                Ok(text) => (Some(identifier_from_path(path)), Ok(Payload::Raw(text))),
                Err(err) => (
                    Some(identifier_from_path(path)),
                    Err(Error::payload_source(path.clone(), err)),
                ),
            }
        } else if let Some(value) = &install.license {
            (None, Ok(Payload::Structured(value.clone())))
        } else {
            (
                None,
                Err(Error::configuration(
                    "license install declared without 'licenseFile' or 'license'",
                )),
            )
        };

        let outcome = match payload {
            Ok(payload) => match self.api.license_install(&payload) {
                Ok(body) => Outcome::Body(body),
                Err(err) => err.into(),
            },
            Err(err) => err.into(),
        };
        record(
            sink,
            summary,
            OperationResult::new(EntityKind::License, Operation::Install, identifier, outcome),
        );
    }

    /// Operation order within a section follows the original program:
    /// list, detail, delete, create, createFromFile, update, updateFromFile.
    fn entity_section(
        &self,
        ops: &KindOps<'_>,
        section: &EntitySection,
        sink: &mut dyn ReportSink,
        summary: &mut RunSummary,
    ) {
        if let Some(spec) = &section.list {
            match spec {
                // Only the repository list accepts filter values (type
                // names). For every other kind a filter array is treated
                // like any other list value: one unfiltered call.
                ListSpec::Filters(filters) if ops.kind == EntityKind::Repository => {
                    for filter in filters {
                        let outcome = body_outcome((ops.list)(Some(filter)));
                        record(
                            sink,
                            summary,
                            OperationResult::new(
                                ops.kind,
                                Operation::List,
                                Some(filter.clone()),
                                outcome,
                            ),
                        );
                    }
                }
                _ => {
                    let outcome = body_outcome((ops.list)(None));
                    record(
                        sink,
                        summary,
                        OperationResult::new(ops.kind, Operation::List, None, outcome),
                    );
                }
            }
        }

        if let Some(identifiers) = &section.detail {
            for id in identifiers {
                let outcome = body_outcome((ops.detail)(id));
                record(
                    sink,
                    summary,
                    OperationResult::new(ops.kind, Operation::Detail, Some(id.clone()), outcome),
                );
            }
        }

        // Deletes are unconditional: no existence probe, the server's answer
        // is reported as-is.
        if let Some(identifiers) = &section.delete {
            for id in identifiers {
                let outcome = status_outcome((ops.delete)(id));
                record(
                    sink,
                    summary,
                    OperationResult::new(ops.kind, Operation::Delete, Some(id.clone()), outcome),
                );
            }
        }

        if let Some(entries) = &section.create {
            for (id, value) in entries {
                let outcome = self.gated_create(ops, id, &Payload::Structured(value.clone()));
                record(
                    sink,
                    summary,
                    OperationResult::new(ops.kind, Operation::Create, Some(id.clone()), outcome),
                );
            }
        }

        if let Some(paths) = &section.create_from_file {
            for path in paths {
                let id = identifier_from_path(path);
                let outcome = match fs::read_to_string(path) {
                    Ok(text) => self.gated_create(ops, &id, &Payload::Raw(text)),
                    Err(err) => Error::payload_source(path.clone(), err).into(),
                };
                record(
                    sink,
                    summary,
                    OperationResult::new(ops.kind, Operation::CreateFromFile, Some(id), outcome),
                );
            }
        }

        // Updates are unconditional; an update on a nonexistent identifier is
        // passed through and the server's not-found answer reported as-is.
        if let Some(entries) = &section.update {
            for (id, value) in entries {
                let outcome =
                    status_outcome((ops.update)(id, &Payload::Structured(value.clone())));
                record(
                    sink,
                    summary,
                    OperationResult::new(ops.kind, Operation::Update, Some(id.clone()), outcome),
                );
            }
        }

        if let Some(paths) = &section.update_from_file {
            for path in paths {
                let id = identifier_from_path(path);
                let outcome = match fs::read_to_string(path) {
                    Ok(text) => status_outcome((ops.update)(&id, &Payload::Raw(text))),
                    Err(err) => Error::payload_source(path.clone(), err).into(),
                };
                record(
                    sink,
                    summary,
                    OperationResult::new(ops.kind, Operation::UpdateFromFile, Some(id), outcome),
                );
            }
        }
    }

    /// The destructive/safe gate. In safe mode an existing same-identifier
    /// entity withholds the create; in destructive mode the create proceeds
    /// without a probe (semantically an overwrite). A failed probe counts as
    /// absent - the create call itself gives the authoritative answer.
    fn gated_create(&self, ops: &KindOps<'_>, id: &str, payload: &Payload) -> Outcome {
        if !self.destructive && (ops.detail)(id).is_ok() {
            log::info!("{} '{id}' exists, create withheld", ops.kind);
            return Outcome::SkippedConflict;
        }
        status_outcome((ops.create)(id, payload))
    }
}

fn record(sink: &mut dyn ReportSink, summary: &mut RunSummary, result: OperationResult) {
    summary.add(&result);
    sink.record(&result);
}

fn body_outcome(result: crate::error::Result<Value>) -> Outcome {
    match result {
        Ok(body) => Outcome::Body(body),
        Err(err) => err.into(),
    }
}

fn status_outcome(result: crate::error::Result<u16>) -> Outcome {
    match result {
        Ok(code) => Outcome::Status(code),
        Err(err) => err.into(),
    }
}
