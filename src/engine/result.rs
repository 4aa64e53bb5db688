//! Per-operation result types and the run summary.

use crate::error::Error;
use serde_json::Value;
use std::fmt;

/// A manageable resource category on the remote instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Instance-level reads (health, information, configuration).
    Instance,
    License,
    User,
    Group,
    Repository,
    PermissionTarget,
}

impl EntityKind {
    /// Display name used in transcripts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Instance => "Artifactory Instance",
            Self::License => "License",
            Self::User => "User",
            Self::Group => "Group",
            Self::Repository => "Repository",
            Self::PermissionTarget => "Permission",
        }
    }

    /// Top-level document key for this kind's section.
    #[must_use]
    pub fn section_key(self) -> &'static str {
        match self {
            Self::Instance => "artifactory",
            Self::License => "license",
            Self::User => "users",
            Self::Group => "groups",
            Self::Repository => "repositories",
            Self::PermissionTarget => "permissions",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One dispatched operation on one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    Information,
    Configuration,
    Install,
    List,
    Detail,
    Create,
    CreateFromFile,
    Update,
    UpdateFromFile,
    Delete,
}

impl Operation {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Information => "information",
            Self::Configuration => "configuration",
            Self::Install => "install",
            Self::List => "list",
            Self::Detail => "detail",
            Self::Create => "create",
            Self::CreateFromFile => "createFromFile",
            Self::Update => "update",
            Self::UpdateFromFile => "updateFromFile",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one dispatched operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Call succeeded with a decoded response body.
    Body(Value),
    /// Call succeeded with an HTTP status code and no interesting body.
    Status(u16),
    /// A create was withheld because the entity exists and destructive mode
    /// is off. Neither a success nor a failure.
    SkippedConflict,
    /// The call or its payload sourcing failed.
    Failed {
        message: String,
        status: Option<u16>,
    },
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Body(_) | Self::Status(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<Error> for Outcome {
    fn from(err: Error) -> Self {
        Self::Failed {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// The per-identifier outcome record of one dispatched operation.
///
/// Results keep the declaration order of the document and are never merged,
/// even when the same identifier appears in multiple operations.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub kind: EntityKind,
    pub operation: Operation,
    pub identifier: Option<String>,
    pub outcome: Outcome,
}

impl OperationResult {
    #[must_use]
    pub fn new(
        kind: EntityKind,
        operation: Operation,
        identifier: Option<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            kind,
            operation,
            identifier,
            outcome,
        }
    }
}

/// Aggregate counts over a full reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Creates withheld by the destructive/safe gate. Counted separately:
    /// they do not fail the run.
    pub skipped_conflicts: usize,
}

impl RunSummary {
    pub fn add(&mut self, result: &OperationResult) {
        match &result.outcome {
            Outcome::Body(_) | Outcome::Status(_) => self.succeeded += 1,
            Outcome::SkippedConflict => self.skipped_conflicts += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped_conflicts
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome_class() {
        let mut summary = RunSummary::default();
        summary.add(&OperationResult::new(
            EntityKind::User,
            Operation::Create,
            Some("alice".into()),
            Outcome::Status(201),
        ));
        summary.add(&OperationResult::new(
            EntityKind::User,
            Operation::Create,
            Some("bob".into()),
            Outcome::SkippedConflict,
        ));
        summary.add(&OperationResult::new(
            EntityKind::User,
            Operation::Delete,
            Some("carol".into()),
            Outcome::Failed {
                message: "HTTP 404".into(),
                status: Some(404),
            },
        ));

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped_conflicts, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
    }

    #[test]
    fn skipped_conflict_is_neither_success_nor_failure() {
        let outcome = Outcome::SkippedConflict;
        assert!(!outcome.is_success());
        assert!(!outcome.is_failure());

        let mut summary = RunSummary::default();
        summary.add(&OperationResult::new(
            EntityKind::Group,
            Operation::Create,
            Some("readers".into()),
            outcome,
        ));
        assert!(summary.is_success());
    }

    #[test]
    fn error_converts_to_failed_outcome_with_status() {
        let err = crate::error::Error::RemoteCall {
            message: "HTTP 409".into(),
            status: Some(409),
        };
        match Outcome::from(err) {
            Outcome::Failed { status, .. } => assert_eq!(status, Some(409)),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
