use std::collections::HashMap;

use sysinfo::{ProcessStatus, System, Users};

/// One process row for the report tables
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub pid: u32,
    pub user: String,
    pub name: String,
    pub cpu_usage: f32,    // percentage
    pub mem_usage: f32,    // percentage of total memory
    pub resident_mem: u64, // bytes
}

/// All processes seen in the snapshot plus the summary counts
#[derive(Debug, Clone, Default)]
pub struct ProcessList {
    pub total: usize,
    pub running: usize,
    pub zombie: usize,
    pub processes: Vec<ProcessInfo>,
}

impl ProcessList {
    /// Heaviest CPU consumers, descending; idle rows are dropped
    pub fn top_by_cpu(&self, n: usize) -> Vec<&ProcessInfo> {
        let mut rows: Vec<&ProcessInfo> = self.processes.iter().filter(|p| p.cpu_usage > 0.0).collect();
        rows.sort_by(|a, b| b.cpu_usage.partial_cmp(&a.cpu_usage).unwrap_or(std::cmp::Ordering::Equal));
        rows.truncate(n);
        rows
    }

    /// Heaviest memory consumers, descending
    pub fn top_by_mem(&self, n: usize) -> Vec<&ProcessInfo> {
        let mut rows: Vec<&ProcessInfo> = self.processes.iter().filter(|p| p.resident_mem > 0).collect();
        rows.sort_by(|a, b| b.resident_mem.cmp(&a.resident_mem));
        rows.truncate(n);
        rows
    }
}

/// Build the process list from an already-refreshed System
pub fn collect(sys: &System, users: &Users) -> ProcessList {
    let total_mem = sys.total_memory();
    let mut user_cache: HashMap<String, String> = HashMap::new();

    let mut running = 0usize;
    let mut zombie = 0usize;

    let processes: Vec<ProcessInfo> = sys
        .processes()
        .iter()
        .map(|(&pid, proc_info)| {
            match proc_info.status() {
                ProcessStatus::Run => running += 1,
                ProcessStatus::Zombie => zombie += 1,
                _ => {}
            }

            let resident = proc_info.memory();
            let mem_pct = if total_mem > 0 {
                (resident as f64 / total_mem as f64 * 100.0) as f32
            } else {
                0.0
            };

            let uid_str = proc_info.user_id().map(|u| u.to_string());
            let user = resolve_user(users, &mut user_cache, uid_str.as_deref());

            ProcessInfo {
                pid: pid.as_u32(),
                user,
                name: proc_info.name().to_string_lossy().to_string(),
                cpu_usage: proc_info.cpu_usage(),
                mem_usage: mem_pct,
                resident_mem: resident,
            }
        })
        .collect();

    ProcessList {
        total: processes.len(),
        running,
        zombie,
        processes,
    }
}

/// Resolve a uid string to a user name, with a per-snapshot cache
fn resolve_user(users: &Users, cache: &mut HashMap<String, String>, uid_str: Option<&str>) -> String {
    match uid_str {
        Some(uid) => {
            if let Some(cached) = cache.get(uid) {
                return cached.clone();
            }
            let name = users
                .iter()
                .find(|u| u.id().to_string() == uid)
                .map(|u| u.name().to_string())
                .unwrap_or_else(|| format!("uid:{}", uid));
            cache.insert(uid.to_string(), name.clone());
            name
        }
        None => "?".to_string(),
    }
}
