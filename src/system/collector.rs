use chrono::{DateTime, Local};
use sysinfo::{ProcessesToUpdate, System, Users};

use crate::system::auth::{self, AuthInfo};
use crate::system::cpu::CpuSampleStrategy;
use crate::system::disk::{self, DiskInfo};
use crate::system::memory::{self, MemoryInfo};
use crate::system::os::{self, OsInfo};
use crate::system::process::{self, ProcessList};

/// Everything one report needs, gathered at a single point in time
pub struct Snapshot {
    pub taken_at: DateTime<Local>,
    pub os: OsInfo,
    pub cpu_utilization: f64,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
    pub processes: ProcessList,
    pub auth: Option<AuthInfo>,
}

/// One-shot system data collector built on the `sysinfo` crate, with the
/// CPU sampling strategy injected at startup
pub struct Collector {
    sys: System,
    users: Users,
    cpu_strategy: Box<dyn CpuSampleStrategy>,
}

impl Collector {
    pub fn new(cpu_strategy: Box<dyn CpuSampleStrategy>) -> Self {
        let mut sys = System::new();
        // Prime the CPU and process counters; the readings that matter
        // come from the second refresh in snapshot()
        sys.refresh_cpu_all();
        sys.refresh_memory();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let users = Users::new_with_refreshed_list();

        Self {
            sys,
            users,
            cpu_strategy,
        }
    }

    /// Take one full snapshot. Blocks for the CPU sampling window (about
    /// one second); that same gap is the delta window that makes the
    /// per-process CPU percentages meaningful.
    pub fn snapshot(&mut self, collect_auth: bool, auth_limit: usize) -> Snapshot {
        let cpu_utilization = self.cpu_strategy.sample();

        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();
        self.sys
            .refresh_processes(ProcessesToUpdate::All, true);

        Snapshot {
            taken_at: Local::now(),
            os: os::collect(&self.sys),
            cpu_utilization,
            memory: memory::collect(&self.sys),
            disks: disk::collect(),
            processes: process::collect(&self.sys, &self.users),
            auth: collect_auth.then(|| auth::collect(auth_limit)),
        }
    }
}
