/// One RAID controller as reported by `perccli /call show all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRecord {
    pub id:               String,   // "C0"
    pub status:           String,   // "Optimal", "Degraded", ...
    pub model:            String,
    pub ram:              String,
    pub temperature:      String,
    pub battery_states:   Vec<String>,
    pub firmware_version: String,
}

impl ControllerRecord {
    /// Optimal controller with every backup unit Optimal too.
    pub fn is_healthy(&self) -> bool {
        self.status == "Optimal" && self.battery_states.iter().all(|s| s == "Optimal")
    }
}

/// One virtual drive (array).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDiskRecord {
    pub id:         String,   // "/c0/v0"
    pub status:     String,   // "Optl", "Dgrd", "OfLn", ...
    pub raid_type:  String,   // "RAID1", ...
    pub size:       String,
    pub strip_size: String,
    pub os_path:    String,
}

impl VirtualDiskRecord {
    pub fn is_healthy(&self) -> bool {
        self.status == "Optl"
    }
}

/// One physical drive. Health depends on the tool generation that produced
/// the record, so it is judged by the schema rather than here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDiskRecord {
    pub id:          String,   // "/c0/e32/s0"
    pub status:      String,
    pub disk_type:   String,   // "SAS HDD"
    pub model:       String,
    pub size:        String,
    pub speed:       String,
    pub temperature: String,
}
