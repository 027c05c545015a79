use sysinfo::System;

/// Memory usage information
#[derive(Debug, Clone, Default)]
pub struct MemoryInfo {
    pub total_mem: u64,     // bytes
    pub used_mem: u64,      // bytes
    pub free_mem: u64,      // bytes
    pub available_mem: u64, // bytes (free + reclaimable cache/buffers)
    pub total_swap: u64,    // bytes
    pub used_swap: u64,     // bytes
    pub free_swap: u64,     // bytes
}

impl MemoryInfo {
    /// Memory usage as percentage
    pub fn mem_percent(&self) -> f64 {
        if self.total_mem == 0 {
            0.0
        } else {
            (self.used_mem as f64 / self.total_mem as f64) * 100.0
        }
    }

    /// Swap usage as percentage
    pub fn swap_percent(&self) -> f64 {
        if self.total_swap == 0 {
            0.0
        } else {
            (self.used_swap as f64 / self.total_swap as f64) * 100.0
        }
    }
}

/// Read memory totals from an already-refreshed System
pub fn collect(sys: &System) -> MemoryInfo {
    let total = sys.total_memory();
    let used = sys.used_memory();

    MemoryInfo {
        total_mem: total,
        used_mem: used,
        free_mem: total.saturating_sub(used),
        available_mem: sys.available_memory(),
        total_swap: sys.total_swap(),
        used_swap: sys.used_swap(),
        free_swap: sys.free_swap(),
    }
}

/// Format bytes to human-readable string (KiB, MiB, GiB)
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    if bytes >= TIB {
        format!("{:.1}T", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1}G", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.0}M", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.0}K", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_guard_against_zero_totals() {
        let info = MemoryInfo::default();
        assert_eq!(info.mem_percent(), 0.0);
        assert_eq!(info.swap_percent(), 0.0);
    }

    #[test]
    fn percentages_track_usage() {
        let info = MemoryInfo {
            total_mem: 16 * 1024 * 1024 * 1024,
            used_mem: 4 * 1024 * 1024 * 1024,
            total_swap: 8 * 1024 * 1024 * 1024,
            used_swap: 2 * 1024 * 1024 * 1024,
            ..Default::default()
        };
        assert_eq!(info.mem_percent(), 25.0);
        assert_eq!(info.swap_percent(), 25.0);
    }

    #[test]
    fn formats_byte_units() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2K");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5M");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 / 2), "1.5G");
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024 * 1024), "2.0T");
    }
}
