use std::fs;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::debug;

/// Wall-clock gap between the two counter reads. Utilization is averaged
/// over this window; with no gap the delta is zero and the reading is
/// meaningless, so the sleep must stay.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

const PROC_STAT: &str = "/proc/stat";

/// Aggregate CPU time counters since boot, in platform clock ticks.
/// Field order matches the `cpu` summary line of /proc/stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Ticks spent idle or waiting on I/O.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    /// Ticks spent doing work of any kind.
    pub fn busy_total(&self) -> u64 {
        self.user + self.nice + self.system + self.irq + self.softirq + self.steal
    }

    pub fn total(&self) -> u64 {
        self.idle_total() + self.busy_total()
    }
}

/// How system-wide CPU utilization gets measured on this host.
///
/// `sample()` blocks for about one second (the measurement window) and
/// never fails: a missing or malformed counter source yields 0.00, since
/// CPU usage here is advisory output, not a control input.
pub trait CpuSampleStrategy {
    /// Utilization percentage in [0.00, 100.00], rounded to two decimals.
    fn sample(&self) -> f64;
}

/// Pick the sampling strategy for this host, once, at startup.
/// Hosts exposing /proc/stat read the kernel counters directly;
/// everything else shells out to `top` and scrapes its idle percentage.
pub fn detect_strategy() -> Box<dyn CpuSampleStrategy> {
    if Path::new(PROC_STAT).exists() {
        debug!("sampling CPU from {}", PROC_STAT);
        Box::new(CounterBasedStrategy)
    } else {
        debug!("no {}, sampling CPU via top", PROC_STAT);
        Box::new(ToolDerivedStrategy)
    }
}

/// Reads the kernel's cumulative CPU accounting counters twice, one
/// second apart, and derives utilization from the deltas.
pub struct CounterBasedStrategy;

impl CpuSampleStrategy for CounterBasedStrategy {
    fn sample(&self) -> f64 {
        let Some(first) = read_counters() else {
            return 0.0;
        };
        thread::sleep(SAMPLE_INTERVAL);
        let Some(second) = read_counters() else {
            return 0.0;
        };
        utilization_between(&first, &second)
    }
}

fn read_counters() -> Option<CpuTimes> {
    let stat = match fs::read_to_string(PROC_STAT) {
        Ok(s) => s,
        Err(err) => {
            debug!("failed to read {}: {}", PROC_STAT, err);
            return None;
        }
    };
    stat.lines().next().and_then(parse_cpu_line)
}

/// Parse the aggregate `cpu` line of /proc/stat:
/// `cpu  user nice system idle iowait irq softirq steal ...`
/// Kernels older than 2.6.11 stop before `steal`; missing trailing
/// fields count as zero. Trailing guest fields are ignored.
pub fn parse_cpu_line(line: &str) -> Option<CpuTimes> {
    let mut fields = line.split_whitespace();
    if fields.next() != Some("cpu") {
        return None;
    }

    let mut ticks = [0u64; 8];
    for (i, slot) in ticks.iter_mut().enumerate() {
        match fields.next() {
            Some(raw) => *slot = raw.parse().ok()?,
            // user/nice/system/idle are mandatory, the rest default to 0
            None if i >= 4 => break,
            None => return None,
        }
    }

    Some(CpuTimes {
        user: ticks[0],
        nice: ticks[1],
        system: ticks[2],
        idle: ticks[3],
        iowait: ticks[4],
        irq: ticks[5],
        softirq: ticks[6],
        steal: ticks[7],
    })
}

/// Utilization over the window bounded by two counter snapshots.
///
/// Saturating subtraction keeps a racing or reset counter source from
/// underflowing; a window with no counter progress reads as 0.00.
pub fn utilization_between(first: &CpuTimes, second: &CpuTimes) -> f64 {
    let delta_total = second.total().saturating_sub(first.total());
    if delta_total == 0 {
        return 0.0;
    }
    let delta_idle = second.idle_total().saturating_sub(first.idle_total());
    let busy = delta_total.saturating_sub(delta_idle);
    round2(busy as f64 * 100.0 / delta_total as f64)
}

/// Asks the platform's `top` for one batch-mode display and derives
/// utilization from the idle percentage in its CPU summary line.
/// The utility's own sampling window stands in for the 1-second sleep.
pub struct ToolDerivedStrategy;

impl CpuSampleStrategy for ToolDerivedStrategy {
    fn sample(&self) -> f64 {
        let (program, args) = top_invocation();
        let output = match Command::new(program).args(args).output() {
            Ok(out) => out,
            Err(err) => {
                debug!("failed to run {}: {}", program, err);
                return 0.0;
            }
        };

        let text = String::from_utf8_lossy(&output.stdout);
        match idle_percent_from_top(&text) {
            Some(idle) => round2((100.0 - idle).clamp(0.0, 100.0)),
            None => 0.0,
        }
    }
}

fn top_invocation() -> (&'static str, &'static [&'static str]) {
    match std::env::consts::OS {
        // one sample, zero process rows
        "macos" => ("top", &["-l", "1", "-n", "0", "-s", "0"]),
        // FreeBSD and friends: batch mode, one display
        _ => ("top", &["-b", "-d", "1"]),
    }
}

/// Extract the idle percentage from captured `top` output.
///
/// Understands both summary line shapes:
///   macOS:   `CPU usage: 12.5% user, 3.2% sys, 84.3% idle`
///   FreeBSD: `CPU:  0.0% user,  0.0% nice,  0.2% system, ..., 99.8% idle`
///
/// Returns None when no summary line is present (unrecognizable output).
/// A summary line without a parsable idle field reads as idle 0, which
/// surfaces as 100% utilization. That degenerate reading is accepted: the
/// line proves the tool ran, and a wrong advisory number beats aborting.
pub fn idle_percent_from_top(output: &str) -> Option<f64> {
    let line = output.lines().find(|l| {
        let l = l.trim_start();
        l.starts_with("CPU usage") || l.starts_with("CPU:")
    })?;

    let idle = match line.split_once("idle") {
        Some((before, _)) => before
            .split_whitespace()
            .last()
            .map(|tok| tok.trim_end_matches('%'))
            .and_then(|tok| tok.parse::<f64>().ok())
            .unwrap_or(0.0),
        None => 0.0,
    };
    Some(idle)
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
