use crate::collectors::perccli::{Query, Runner};
use crate::error::CheckError;
use crate::models::raid::{ControllerRecord, PhysicalDiskRecord, VirtualDiskRecord};
use crate::schema::{self, Schema};
use crate::severity::{self, Severity};
use serde_json::Value;
use tracing::{debug, error};

/// Outcome of one category query: its severity plus the records behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category<T> {
    pub severity: Severity,
    pub records:  Vec<T>,
}

impl<T> Category<T> {
    /// A category whose query or parsing failed.
    pub fn failed() -> Self {
        Self { severity: Severity::Critical, records: Vec::new() }
    }

    fn judged(records: Vec<T>, healthy: impl Fn(&T) -> bool) -> Self {
        let severity = severity::aggregate(records.iter().map(|r| Severity::from_health(healthy(r))));
        Self { severity, records }
    }
}

/// One full snapshot of controller, array and disk health.
#[derive(Debug, Clone)]
pub struct Report {
    pub controllers:    Category<ControllerRecord>,
    pub virtual_disks:  Category<VirtualDiskRecord>,
    pub physical_disks: Category<PhysicalDiskRecord>,
}

impl Report {
    pub fn overall(&self) -> Severity {
        severity::aggregate([
            self.controllers.severity,
            self.virtual_disks.severity,
            self.physical_disks.severity,
        ])
    }
}

/// Query all three categories in turn. A failing category never stops the others.
pub fn run(runner: &dyn Runner) -> Report {
    Report {
        controllers: check(runner, Query::Controllers, |schema, doc| {
            Ok(Category::judged(schema.controllers(doc)?, ControllerRecord::is_healthy))
        }),
        virtual_disks: check(runner, Query::VirtualDrives, |schema, doc| {
            Ok(Category::judged(schema.virtual_disks(doc)?, VirtualDiskRecord::is_healthy))
        }),
        physical_disks: check(runner, Query::PhysicalDrives, |schema, doc| {
            let disks = schema.physical_disks(doc)?;
            Ok(Category::judged(disks, |d| schema.disk_is_healthy(&d.status)))
        }),
    }
}

fn check<T, F>(runner: &dyn Runner, query: Query, extract: F) -> Category<T>
where
    F: FnOnce(&dyn Schema, &Value) -> Result<Category<T>, CheckError>,
{
    let outcome = runner.query(query).and_then(|doc| {
        let schema = schema::detect(query, &doc)?;
        debug!("{} output matches {} layout", query.name(), schema.name());
        extract(schema, &doc)
    });

    match outcome {
        Ok(category) => {
            debug!("{}: {} record(s), {}", query.name(), category.records.len(), category.severity);
            category
        }
        Err(e) => {
            error!("{} check failed: {}", query.name(), e);
            Category::failed()
        }
    }
}
