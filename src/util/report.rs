use crate::check::Report;
use crate::models::raid::{ControllerRecord, PhysicalDiskRecord, VirtualDiskRecord};
use std::collections::BTreeMap;

/// A record that can be laid out as one table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for ControllerRecord {
    const HEADERS: &'static [&'static str] = &["id", "status", "model", "ram", "temp", "bbu", "firmware"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.status.clone(),
            self.model.clone(),
            self.ram.clone(),
            self.temperature.clone(),
            self.battery_states.join(","),
            self.firmware_version.clone(),
        ]
    }
}

impl TableRow for VirtualDiskRecord {
    const HEADERS: &'static [&'static str] = &["id", "status", "type", "size", "strip", "ospath"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.status.clone(),
            self.raid_type.clone(),
            self.size.clone(),
            self.strip_size.clone(),
            self.os_path.clone(),
        ]
    }
}

impl TableRow for PhysicalDiskRecord {
    const HEADERS: &'static [&'static str] = &["id", "status", "type", "model", "size", "speed", "temp"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.status.clone(),
            self.disk_type.clone(),
            self.model.clone(),
            self.size.clone(),
            self.speed.clone(),
            self.temperature.clone(),
        ]
    }
}

/// Render every category as a titled, column-aligned table.
pub fn tables(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("-- controller info\n");
    out.push_str(&table(&report.controllers.records));

    out.push_str("\n-- virtual disk info\n");
    out.push_str(&table(&report.virtual_disks.records));

    out.push_str("\n-- disk info\n");
    out.push_str(&table(&report.physical_disks.records));

    out
}

/// Header, dashed separator and one line per row, every cell left-aligned
/// to the widest value in its column.
pub fn table<R: TableRow>(rows: &[R]) -> String {
    let rows: Vec<Vec<String>> = rows.iter().map(R::cells).collect();

    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let headers: Vec<String> = R::HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    out.push_str(&line(&headers));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Single Nagios status line, e.g.
/// `RAID CRITICAL: Arrays {"Optl": 2} Disks {"Failed": 1, "Onln": 1}`.
pub fn summary_line(report: &Report) -> String {
    let arrays = status_counts(report.virtual_disks.records.iter().map(|r| r.status.as_str()));
    let disks  = status_counts(report.physical_disks.records.iter().map(|r| r.status.as_str()));
    format!("RAID {}: Arrays {} Disks {}", report.overall().label(), arrays, disks)
}

/// Count statuses and render them as `{"A": 1, "B": 2}`, sorted by status.
fn status_counts<'a>(statuses: impl Iterator<Item = &'a str>) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for s in statuses {
        *counts.entry(s).or_default() += 1;
    }
    let body = counts
        .iter()
        .map(|(status, n)| format!("{}: {}", serde_json::Value::from(*status), n))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}
