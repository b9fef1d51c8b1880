//! Normalisation of perccli JSON into the record types in `models::raid`.
//!
//! Two tool generations emit differently shaped documents for the same
//! queries. Each generation implements [`Schema`]; [`detect`] picks the one
//! whose distinguishing keys are present in a document.

pub mod perccli;
pub mod perccli2;

use crate::collectors::perccli::Query;
use crate::error::SchemaError;
use crate::models::raid::{ControllerRecord, PhysicalDiskRecord, VirtualDiskRecord};
use serde_json::Value;
use std::fmt;

/// Extraction capability of one perccli output generation.
pub trait Schema: Sync {
    fn name(&self) -> &'static str;

    /// True if `response` (one controller's `Response Data`) is laid out
    /// the way this generation answers `query`.
    fn recognises(&self, query: Query, response: &Value) -> bool;

    fn controllers(&self, doc: &Value) -> Result<Vec<ControllerRecord>, SchemaError>;
    fn virtual_disks(&self, doc: &Value) -> Result<Vec<VirtualDiskRecord>, SchemaError>;
    fn physical_disks(&self, doc: &Value) -> Result<Vec<PhysicalDiskRecord>, SchemaError>;

    /// Physical drive states this generation reports for a healthy drive.
    fn disk_is_healthy(&self, status: &str) -> bool;
}

/// Known generations, in probing order.
pub static SCHEMAS: [&dyn Schema; 2] = [&perccli::PercCliSchema, &perccli2::PercCli2Schema];

/// Pick the schema generation that produced `doc` for `query`.
pub fn detect(query: Query, doc: &Value) -> Result<&'static dyn Schema, SchemaError> {
    let responses = responses(doc)?;
    SCHEMAS
        .iter()
        .copied()
        .find(|schema| responses.iter().any(|r| schema.recognises(query, r.data)))
        .ok_or(SchemaError::UnknownVariant { category: query.name() })
}

// ── Command envelope ─────────────────────────────────────────────────

/// One element of the top-level `Controllers` array.
pub struct Response<'a> {
    /// Controller index from `Command Status`.
    pub controller: String,
    pub data:       &'a Value,
}

/// Unwrap the `Controllers` envelope shared by both generations, rejecting
/// elements whose `Command Status` is not a success.
pub fn responses(doc: &Value) -> Result<Vec<Response<'_>>, SchemaError> {
    array(doc, "Controllers", "document")?
        .iter()
        .map(|entry| {
            let status     = object(entry, "Command Status", "controller entry")?;
            let controller = text(status, "Controller", "Command Status")?;

            if let Some(outcome) = status.get("Status").and_then(Value::as_str) {
                if outcome != "Success" {
                    let description = status
                        .get("Description")
                        .map(|d| scalar(d, "Description").unwrap_or_default())
                        .unwrap_or_default();
                    return Err(SchemaError::CommandFailed { controller, description });
                }
            }

            let data = object(entry, "Response Data", "controller entry")?;
            Ok(Response { controller, data })
        })
        .collect()
}

// ── Field helpers ────────────────────────────────────────────────────

pub(crate) fn field<'a>(v: &'a Value, key: &str, context: &str) -> Result<&'a Value, SchemaError> {
    v.get(key).ok_or_else(|| SchemaError::MissingKey {
        key:     key.to_string(),
        context: context.to_string(),
    })
}

pub(crate) fn object<'a>(v: &'a Value, key: &str, context: &str) -> Result<&'a Value, SchemaError> {
    let found = field(v, key, context)?;
    if found.is_object() {
        Ok(found)
    } else {
        Err(SchemaError::WrongType { key: key.to_string(), expected: "an object" })
    }
}

pub(crate) fn array<'a>(v: &'a Value, key: &str, context: &str) -> Result<&'a Vec<Value>, SchemaError> {
    field(v, key, context)?
        .as_array()
        .ok_or_else(|| SchemaError::WrongType { key: key.to_string(), expected: "an array" })
}

/// First element of the array under `key`.
pub(crate) fn first<'a>(v: &'a Value, key: &str, context: &str) -> Result<&'a Value, SchemaError> {
    array(v, key, context)?
        .first()
        .ok_or_else(|| SchemaError::WrongType { key: key.to_string(), expected: "a non-empty array" })
}

/// String or number under `key`, rendered as trimmed text.
pub(crate) fn text(v: &Value, key: &str, context: &str) -> Result<String, SchemaError> {
    scalar(field(v, key, context)?, key)
}

pub(crate) fn scalar(v: &Value, key: &str) -> Result<String, SchemaError> {
    match v {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(SchemaError::WrongType { key: key.to_string(), expected: "a string or number" }),
    }
}

/// `key` of every element of the optional battery array `list_key`.
/// Controllers without a backup unit omit the array entirely.
pub(crate) fn battery_states(response: &Value, list_key: &str, key: &str) -> Result<Vec<String>, SchemaError> {
    if response.get(list_key).is_none() {
        return Ok(Vec::new());
    }
    array(response, list_key, "Response Data")?
        .iter()
        .map(|unit| text(unit, key, list_key))
        .collect()
}

// ── Addresses ────────────────────────────────────────────────────────

pub(crate) fn parse_index(digits: &str) -> Result<u32, SchemaError> {
    digits
        .trim()
        .parse()
        .map_err(|_| SchemaError::BadIdentifier { value: digits.to_string() })
}

/// perccli object path of a virtual drive, `/c0/v1`.
pub fn virtual_disk_id(controller: u32, vd: u32) -> String {
    format!("/c{}/v{}", controller, vd)
}

/// Controller, enclosure and slot of a physical drive. Directly attached
/// drives have no enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiskAddress {
    pub controller: u32,
    pub enclosure:  Option<u32>,
    pub slot:       u32,
}

impl DiskAddress {
    /// From an `EID:Slt` cell such as `"32:0"` or `" :4"`.
    pub fn from_eid_slot(controller: u32, eid_slot: &str) -> Result<Self, SchemaError> {
        let (eid, slot) = eid_slot
            .split_once(':')
            .ok_or_else(|| SchemaError::BadIdentifier { value: eid_slot.to_string() })?;
        let enclosure = match eid.trim() {
            "" => None,
            e  => Some(parse_index(e)?),
        };
        Ok(Self { controller, enclosure, slot: parse_index(slot)? })
    }
}

impl fmt::Display for DiskAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.enclosure {
            Some(e) => write!(f, "/c{}/e{}/s{}", self.controller, e, self.slot),
            None    => write!(f, "/c{}/s{}", self.controller, self.slot),
        }
    }
}
