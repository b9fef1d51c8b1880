//! Second-generation `perccli2` output. Entities come as arrays whose
//! elements already pair the summary with its details.

use super::{
    array, battery_states, first, object, parse_index, responses, text, virtual_disk_id,
    DiskAddress, Schema,
};
use crate::collectors::perccli::Query;
use crate::error::SchemaError;
use crate::models::raid::{ControllerRecord, PhysicalDiskRecord, VirtualDiskRecord};
use serde_json::Value;

const HEALTHY_DISK_STATES: [&str; 2] = ["Online", "Good"];

pub struct PercCli2Schema;

impl Schema for PercCli2Schema {
    fn name(&self) -> &'static str {
        "perccli2"
    }

    fn recognises(&self, query: Query, response: &Value) -> bool {
        match query {
            Query::Controllers => {
                response.pointer("/Basics/Product Name").is_some()
                    || response.get("Energy Pack Info").is_some()
            }
            Query::VirtualDrives  => response.get("Virtual Drives").is_some(),
            Query::PhysicalDrives => response.get("Drives List").is_some(),
        }
    }

    fn controllers(&self, doc: &Value) -> Result<Vec<ControllerRecord>, SchemaError> {
        responses(doc)?
            .into_iter()
            .map(|r| {
                let d    = r.data;
                let hw   = object(d, "HwCfg", "Response Data")?;
                let ram  = text(hw, "DDR Memory Size(MiB)", "HwCfg")?;
                Ok(ControllerRecord {
                    id:               format!("C{}", r.controller),
                    status:           text(object(d, "Status", "Response Data")?, "Controller Status", "Status")?,
                    model:            text(object(d, "Basics", "Response Data")?, "Product Name", "Basics")?,
                    ram:              with_unit(ram, "MiB"),
                    temperature:      text(hw, "Ctrl temperature(Degree Celsius)", "HwCfg")?,
                    battery_states:   battery_states(d, "Energy Pack Info", "Status")?,
                    firmware_version: text(object(d, "Version", "Response Data")?, "Firmware Version", "Version")?,
                })
            })
            .collect()
    }

    fn virtual_disks(&self, doc: &Value) -> Result<Vec<VirtualDiskRecord>, SchemaError> {
        let mut disks = Vec::new();
        for r in responses(doc)? {
            let controller = parse_index(&r.controller)?;
            let Some(list) = optional_array(r.data, "Virtual Drives")? else { continue };
            for entry in list {
                let info  = object(entry, "VD Info", "Virtual Drives")?;
                let props = object(entry, "VD Properties", "Virtual Drives")?;
                let dg_vd = text(info, "DG/VD", "VD Info")?;
                let vd    = dg_vd
                    .split_once('/')
                    .map(|(_, vd)| parse_index(vd))
                    .ok_or_else(|| SchemaError::BadIdentifier { value: dg_vd.clone() })??;

                disks.push(VirtualDiskRecord {
                    id:         virtual_disk_id(controller, vd),
                    status:     text(info, "State", "VD Info")?,
                    raid_type:  text(info, "TYPE", "VD Info")?,
                    size:       text(info, "Size", "VD Info")?,
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
            let controller = parse_index(&r.controller)?;
            let Some(list) = optional_array(r.data, "Drives List")? else { continue };
            for entry in list {
                let info    = object(entry, "Drive Information", "Drives List")?;
                let details = object(entry, "Drive Detailed Information", "Drives List")?;
                let addr    = DiskAddress::from_eid_slot(controller, &text(info, "EID:Slt", "Drive Information")?)?;
                let path    = first(details, "Path Information", "Drive Detailed Information")?;

                disks.push(PhysicalDiskRecord {
                    id:          addr.to_string(),
                    status:      text(info, "Status", "Drive Information")?,
                    disk_type:   format!("{} {}", text(info, "Intf", "Drive Information")?, text(info, "Med", "Drive Information")?),
                    model:       text(info, "Model", "Drive Information")?,
                    size:        text(info, "Size", "Drive Information")?,
                    speed:       text(path, "Negotiated Speed", "Path Information")?,
                    temperature: text(details, "Temperature(C)", "Drive Detailed Information")?,
                });
            }
        }
        Ok(disks)
    }

    fn disk_is_healthy(&self, status: &str) -> bool {
        HEALTHY_DISK_STATES.contains(&status)
    }
}

/// Array under `key`, or None when a controller has no such entities.
fn optional_array<'a>(v: &'a Value, key: &str) -> Result<Option<&'a Vec<Value>>, SchemaError> {
    match v.get(key) {
        None    => Ok(None),
        Some(_) => array(v, key, "Response Data").map(Some),
    }
}

/// Append `unit` to bare numbers: "8192" -> "8192MiB".
fn with_unit(value: String, unit: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{}", value, unit)
    } else {
        value
    }
}
