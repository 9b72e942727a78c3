//! Load error reporting
//!
//! Recoverable problems found while loading tables are collected here
//! instead of aborting the load pass. The caller inspects them afterwards
//! and decides whether they should block startup.

use std::fmt;

use crate::error::{CfgError, Result};

/// Category of a recoverable load problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// A record reused a primary key; the first record was kept
    DuplicateKey,

    /// A record refers to a key missing from another table
    DanglingReference,

    /// The blob holds a section no registered table claims
    UnknownTable,

    /// A registered table has no section in the blob
    MissingTable,

    /// The blob holds two sections for the same table
    DuplicateTable,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::DuplicateKey => "duplicate key",
            IssueKind::DanglingReference => "dangling reference",
            IssueKind::UnknownTable => "unknown table",
            IssueKind::MissingTable => "missing table",
            IssueKind::DuplicateTable => "duplicate table",
        };
        f.write_str(name)
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    pub kind: IssueKind,
    pub table: String,
    /// Primary key of the offending record, when there is one
    pub key: Option<String>,
    pub message: String,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "[{}] {}[{}]: {}", self.kind, self.table, key, self.message),
            None => write!(f, "[{}] {}: {}", self.kind, self.table, self.message),
        }
    }
}

/// Ordered collector of recoverable issues for one load pass
#[derive(Debug, Default)]
pub struct LoadErrors {
    issues: Vec<LoadIssue>,
}

impl LoadErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue. Never fails.
    pub fn report(
        &mut self,
        kind: IssueKind,
        table: &str,
        key: Option<String>,
        message: impl Into<String>,
    ) {
        let issue = LoadIssue {
            kind,
            table: table.to_string(),
            key,
            message: message.into(),
        };
        tracing::warn!(
            kind = %issue.kind,
            table = %issue.table,
            key = issue.key.as_deref().unwrap_or("-"),
            "{}",
            issue.message
        );
        self.issues.push(issue);
    }

    pub fn duplicate_key(&mut self, table: &str, key: impl fmt::Display) {
        self.report(
            IssueKind::DuplicateKey,
            table,
            Some(key.to_string()),
            "duplicate primary key, keeping the first record",
        );
    }

    /// A unique key value already claimed by record `first`
    pub fn duplicate_unique_key(
        &mut self,
        table: &str,
        key: impl fmt::Display,
        unique: &str,
        value: impl fmt::Display,
        first: impl fmt::Display,
    ) {
        self.report(
            IssueKind::DuplicateKey,
            table,
            Some(key.to_string()),
            format!("duplicate unique key {} = {}, already used by {}[{}]", unique, value, table, first),
        );
    }

    pub fn dangling_reference(
        &mut self,
        table: &str,
        key: impl fmt::Display,
        field: &str,
        target: &str,
        target_key: impl fmt::Display,
    ) {
        self.report(
            IssueKind::DanglingReference,
            table,
            Some(key.to_string()),
            format!("{} refers to {}[{}], which does not exist", field, target, target_key),
        );
    }

    pub fn unknown_table(&mut self, table: &str, len: usize) {
        self.report(
            IssueKind::UnknownTable,
            table,
            None,
            format!("no registered table, skipped {} bytes", len),
        );
    }

    pub fn missing_table(&mut self, table: &str) {
        self.report(
            IssueKind::MissingTable,
            table,
            None,
            "no data in blob, table left empty",
        );
    }

    pub fn duplicate_table(&mut self, table: &str, len: usize) {
        self.report(
            IssueKind::DuplicateTable,
            table,
            None,
            format!("repeated section, skipped {} bytes", len),
        );
    }

    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Issues in report order
    pub fn entries(&self) -> &[LoadIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues of `kind` reported for `table`
    pub fn count(&self, kind: IssueKind, table: &str) -> usize {
        self.issues
            .iter()
            .filter(|i| i.kind == kind && i.table == table)
            .count()
    }

    pub fn into_entries(self) -> Vec<LoadIssue> {
        self.issues
    }
}

/// Outcome of one `Registry::initialize_all` pass
#[derive(Debug)]
pub struct LoadReport {
    /// True when every table decoded and the snapshot was published
    pub success: bool,

    /// Recoverable issues, in report order
    pub errors: Vec<LoadIssue>,

    /// Fatal error that aborted the pass
    pub failure: Option<CfgError>,

    /// Table being decoded when the fatal error hit
    pub failed_table: Option<String>,

    /// Rows published per table, in registration order
    pub tables: Vec<(String, usize)>,
}

impl LoadReport {
    pub(crate) fn loaded(errors: LoadErrors, tables: Vec<(String, usize)>) -> Self {
        Self {
            success: true,
            errors: errors.into_entries(),
            failure: None,
            failed_table: None,
            tables,
        }
    }

    pub(crate) fn failed(errors: LoadErrors, failure: CfgError, failed_table: Option<String>) -> Self {
        Self {
            success: false,
            errors: errors.into_entries(),
            failure: Some(failure),
            failed_table,
            tables: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Apply the caller's startup policy.
    ///
    /// A failed pass is always an error. Recoverable issues are an error
    /// only when `data_errors_fatal` is set; otherwise they are returned.
    pub fn into_result(self, data_errors_fatal: bool) -> Result<Vec<LoadIssue>> {
        if let Some(failure) = self.failure {
            return Err(match self.failed_table {
                Some(table) => CfgError::LoadFailed(format!("table {}: {}", table, failure)),
                None => CfgError::LoadFailed(failure.to_string()),
            });
        }
        if data_errors_fatal && !self.errors.is_empty() {
            return Err(CfgError::DataErrors(self.errors.len()));
        }
        Ok(self.errors)
    }
}
