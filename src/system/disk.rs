use sysinfo::Disks;
use tracing::debug;

/// Usage of one mounted filesystem
#[derive(Debug, Clone)]
pub struct DiskInfo {
    pub mount_point: String,
    pub filesystem: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl DiskInfo {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }

    /// Used space as percentage
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.used_bytes() as f64 / self.total_bytes as f64) * 100.0
        }
    }
}

/// Enumerate mounted filesystems, skipping zero-size pseudo mounts and
/// duplicate mount points (bind mounts, APFS snapshot volumes)
pub fn collect() -> Vec<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();
    let mut out: Vec<DiskInfo> = Vec::new();

    for disk in disks.list() {
        let total = disk.total_space();
        if total == 0 {
            continue;
        }
        let mount_point = disk.mount_point().to_string_lossy().to_string();
        if out.iter().any(|d| d.mount_point == mount_point) {
            debug!("skipping duplicate mount {}", mount_point);
            continue;
        }
        out.push(DiskInfo {
            mount_point,
            filesystem: disk.file_system().to_string_lossy().to_string(),
            total_bytes: total,
            available_bytes: disk.available_space(),
        });
    }

    out.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
    out
}
