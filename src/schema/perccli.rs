//! First-generation `perccli64` output.
//!
//! Virtual and physical drives are spread over several top-level keys of
//! `Response Data`: `/c0/v1` holds the summary row and `VD1 Properties` the
//! details; `Drive /c0/e32/s0` and `Drive /c0/e32/s0 - Detailed Information`
//! likewise. The keys are indexed once and joined by their embedded numbers.

use super::{
    battery_states, field, first, object, parse_index, responses, text, virtual_disk_id,
    DiskAddress, Schema,
};
use crate::collectors::perccli::Query;
use crate::error::SchemaError;
use crate::models::raid::{ControllerRecord, PhysicalDiskRecord, VirtualDiskRecord};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const HEALTHY_DISK_STATES: [&str; 2] = ["Onln", "UGood"];

static VD_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/c([0-9]+)/v([0-9]+)$").expect("valid VD key pattern"));
static VD_PROPERTIES_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^VD([0-9]+) Properties$").expect("valid VD properties pattern"));
static DRIVE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Drive /c([0-9]+)(?:/e([0-9]+))?/s([0-9]+)( - Detailed Information)?$")
        .expect("valid drive key pattern")
});

pub struct PercCliSchema;

impl Schema for PercCliSchema {
    fn name(&self) -> &'static str {
        "perccli"
    }

    fn recognises(&self, query: Query, response: &Value) -> bool {
        match query {
            Query::Controllers => {
                response.pointer("/Basics/Model").is_some() || response.get("BBU_Info").is_some()
            }
            Query::VirtualDrives  => keys(response).any(|k| VD_KEY.is_match(k)),
            Query::PhysicalDrives => keys(response).any(|k| DRIVE_KEY.is_match(k)),
        }
    }

    fn controllers(&self, doc: &Value) -> Result<Vec<ControllerRecord>, SchemaError> {
        responses(doc)?
            .into_iter()
            .map(|r| {
                let d = r.data;
                Ok(ControllerRecord {
                    id:               format!("C{}", r.controller),
                    status:           text(object(d, "Status", "Response Data")?, "Controller Status", "Status")?,
                    model:            text(object(d, "Basics", "Response Data")?, "Model", "Basics")?,
                    ram:              text(object(d, "HwCfg", "Response Data")?, "On Board Memory Size", "HwCfg")?,
                    temperature:      text(object(d, "HwCfg", "Response Data")?, "Ctrl temperature(Degree Celsius)", "HwCfg")?,
                    battery_states:   battery_states(d, "BBU_Info", "State")?,
                    firmware_version: text(object(d, "Version", "Response Data")?, "Firmware Version", "Version")?,
                })
            })
            .collect()
    }

    fn virtual_disks(&self, doc: &Value) -> Result<Vec<VirtualDiskRecord>, SchemaError> {
        let mut disks = Vec::new();
        for r in responses(doc)? {
            let index = VdIndex::build(r.data)?;
            for ((controller, vd), summary) in &index.drives {
                let props = index
                    .properties
                    .get(vd)
                    .ok_or_else(|| SchemaError::MissingSibling { key: format!("VD{} Properties", vd) })?;
                let context = format!("/c{}/v{}", controller, vd);

                disks.push(VirtualDiskRecord {
                    id:         virtual_disk_id(*controller, *vd),
                    status:     text(summary, "State", &context)?,
                    raid_type:  text(summary, "TYPE", &context)?,
                    size:       text(summary, "Size", &context)?,
                    strip_size: text(props, "Strip Size", "VD Properties")?,
                    os_path:    text(props, "OS Drive Name", "VD Properties")?,
                });
            }
        }
        Ok(disks)
    }

    fn physical_disks(&self, doc: &Value) -> Result<Vec<PhysicalDiskRecord>, SchemaError> {
        let mut disks = Vec::new();
        for r in responses(doc)? {
            let index = DriveIndex::build(r.data)?;
            for (addr, summary) in &index.drives {
                let path    = addr.to_string();
                let details = index
                    .details
                    .get(addr)
                    .ok_or_else(|| SchemaError::MissingSibling { key: format!("Drive {} - Detailed Information", path) })?;
                let state   = object(details, &format!("Drive {} State", path), "Detailed Information")?;
                let attrs   = object(details, &format!("Drive {} Device attributes", path), "Detailed Information")?;
                let context = format!("Drive {}", path);

                disks.push(PhysicalDiskRecord {
                    status:      text(summary, "State", &context)?,
                    disk_type:   format!("{} {}", text(summary, "Intf", &context)?, text(summary, "Med", &context)?),
                    model:       text(summary, "Model", &context)?,
                    size:        text(summary, "Size", &context)?,
                    speed:       text(attrs, "Device Speed", "Device attributes")?,
                    temperature: text(state, "Drive Temperature", "State")?,
                    id:          path,
                });
            }
        }
        Ok(disks)
    }

    fn disk_is_healthy(&self, status: &str) -> bool {
        HEALTHY_DISK_STATES.contains(&status)
    }
}

fn keys(response: &Value) -> impl Iterator<Item = &str> {
    response.as_object().into_iter().flat_map(|m| m.keys().map(String::as_str))
}

/// Virtual drive keys of one `Response Data`, keyed by their numeric parts.
struct VdIndex<'a> {
    drives:     BTreeMap<(u32, u32), &'a Value>,
    properties: BTreeMap<u32, &'a Value>,
}

impl<'a> VdIndex<'a> {
    fn build(response: &'a Value) -> Result<Self, SchemaError> {
        let mut index = VdIndex { drives: BTreeMap::new(), properties: BTreeMap::new() };
        let Some(map) = response.as_object() else {
            return Ok(index);
        };
        for (key, value) in map {
            if let Some(caps) = VD_KEY.captures(key) {
                let summary = first(response, key, "Response Data")?;
                index.drives.insert((parse_index(&caps[1])?, parse_index(&caps[2])?), summary);
            } else if let Some(caps) = VD_PROPERTIES_KEY.captures(key) {
                index.properties.insert(parse_index(&caps[1])?, value);
            }
        }
        Ok(index)
    }
}

/// Physical drive keys of one `Response Data`, keyed by drive address.
struct DriveIndex<'a> {
    drives:  BTreeMap<DiskAddress, &'a Value>,
    details: BTreeMap<DiskAddress, &'a Value>,
}

impl<'a> DriveIndex<'a> {
    fn build(response: &'a Value) -> Result<Self, SchemaError> {
        let mut index = DriveIndex { drives: BTreeMap::new(), details: BTreeMap::new() };
        let Some(map) = response.as_object() else {
            return Ok(index);
        };
        for key in map.keys() {
            let Some(caps) = DRIVE_KEY.captures(key) else { continue };
            let addr = DiskAddress {
                controller: parse_index(&caps[1])?,
                enclosure:  caps.get(2).map(|m| parse_index(m.as_str())).transpose()?,
                slot:       parse_index(&caps[3])?,
            };
            if caps.get(4).is_some() {
                index.details.insert(addr, field(response, key, "Response Data")?);
            } else {
                index.drives.insert(addr, first(response, key, "Response Data")?);
            }
        }
        Ok(index)
    }
}
