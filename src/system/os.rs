use sysinfo::System;

/// Host and OS identity
#[derive(Debug, Clone, Default)]
pub struct OsInfo {
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub arch: String,
    pub cpu_brand: String,
    pub cpu_count: usize,
    pub uptime_seconds: u64,
    pub load_avg: [f64; 3],
}

/// Read identity fields from an already-refreshed System.
/// sysinfo reports these as Options; anything missing reads "unknown".
pub fn collect(sys: &System) -> OsInfo {
    let load = System::load_average();

    OsInfo {
        hostname: System::host_name().unwrap_or_else(unknown),
        os_name: System::name().unwrap_or_else(unknown),
        os_version: System::os_version().unwrap_or_default(),
        kernel_version: System::kernel_version().unwrap_or_else(unknown),
        arch: std::env::consts::ARCH.to_string(),
        cpu_brand: sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .unwrap_or_else(unknown),
        cpu_count: sys.cpus().len(),
        uptime_seconds: System::uptime(),
        load_avg: [load.one, load.five, load.fifteen],
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Format uptime as DD days, HH:MM:SS (matching htop)
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{} days, {:02}:{:02}:{:02}", days, hours, minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_uptime_under_a_day() {
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(5 * 3600 + 12 * 60 + 1), "05:12:01");
    }

    #[test]
    fn formats_uptime_with_days() {
        assert_eq!(format_uptime(3 * 86400 + 3661), "3 days, 01:01:01");
    }
}
