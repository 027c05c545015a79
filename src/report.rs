//! Renders a collected `Snapshot` as the text report printed to stdout.
//!
//! Layout follows htop's header conventions where they translate to
//! static text: bracketed usage bars with a trailing percentage, aligned
//! label/value pairs, and green/yellow/red thresholds on usage figures.

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use crate::config::ReportConfig;
use crate::system::auth::AuthInfo;
use crate::system::collector::Snapshot;
use crate::system::memory::format_bytes;
use crate::system::os::format_uptime;
use crate::system::process::ProcessInfo;

pub fn render(snapshot: &Snapshot, cfg: &ReportConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "sysreport :: {} :: {}\n",
        snapshot.os.hostname,
        snapshot.taken_at.format("%Y-%m-%d %H:%M:%S"),
    ));

    render_system(&mut out, snapshot);
    render_cpu(&mut out, snapshot, cfg);
    render_memory(&mut out, snapshot, cfg);
    render_disks(&mut out, snapshot, cfg);
    if cfg.show_processes {
        render_processes(&mut out, snapshot, cfg);
    }
    if cfg.show_auth {
        if let Some(auth) = &snapshot.auth {
            render_auth(&mut out, auth);
        }
    }

    out
}

fn render_system(out: &mut String, snapshot: &Snapshot) {
    let os = &snapshot.os;
    out.push_str("\nSystem\n");
    out.push_str(&format!("  Hostname:  {}\n", os.hostname));
    out.push_str(&format!("  OS:        {} {}\n", os.os_name, os.os_version));
    out.push_str(&format!("  Kernel:    {} ({})\n", os.kernel_version, os.arch));
    out.push_str(&format!("  CPU:       {} ({} cores)\n", os.cpu_brand, os.cpu_count));
    out.push_str(&format!("  Uptime:    {}\n", format_uptime(os.uptime_seconds)));
}

fn render_cpu(out: &mut String, snapshot: &Snapshot, cfg: &ReportConfig) {
    let pct = snapshot.cpu_utilization;
    out.push_str("\nCPU\n");
    out.push_str(&format!(
        "  {}\n",
        usage_bar("Usage", pct, &format!("{:5.1}%", pct), cfg.bar_width, cfg.color)
    ));
    out.push_str(&format!(
        "  Load average: {:.2} {:.2} {:.2}\n",
        snapshot.os.load_avg[0], snapshot.os.load_avg[1], snapshot.os.load_avg[2]
    ));
}

fn render_memory(out: &mut String, snapshot: &Snapshot, cfg: &ReportConfig) {
    let mem = &snapshot.memory;
    out.push_str("\nMemory\n");
    out.push_str(&format!(
        "  {}\n",
        usage_bar(
            "Mem",
            mem.mem_percent(),
            &format!(
                "{}/{} {:.1}%",
                format_bytes(mem.used_mem),
                format_bytes(mem.total_mem),
                mem.mem_percent()
            ),
            cfg.bar_width,
            cfg.color,
        )
    ));
    out.push_str(&format!(
        "  {}\n",
        usage_bar(
            "Swp",
            mem.swap_percent(),
            &format!(
                "{}/{} {:.1}%",
                format_bytes(mem.used_swap),
                format_bytes(mem.total_swap),
                mem.swap_percent()
            ),
            cfg.bar_width,
            cfg.color,
        )
    ));
}

fn render_disks(out: &mut String, snapshot: &Snapshot, cfg: &ReportConfig) {
    out.push_str("\nDisks\n");
    if snapshot.disks.is_empty() {
        out.push_str("  (no mounted filesystems found)\n");
        return;
    }

    let mount_w = snapshot
        .disks
        .iter()
        .map(|d| d.mount_point.width())
        .max()
        .unwrap_or(5)
        .max("MOUNT".len());

    out.push_str(&format!(
        "  {}  {:<8} {:>8} {:>8} {:>7}\n",
        pad_display("MOUNT", mount_w),
        "FS",
        "USED",
        "TOTAL",
        "USE%"
    ));
    for disk in &snapshot.disks {
        let pct = disk.used_percent();
        let row = format!(
            "  {}  {:<8} {:>8} {:>8} {:>7}",
            pad_display(&disk.mount_point, mount_w),
            truncate_display(&disk.filesystem, 8),
            format_bytes(disk.used_bytes()),
            format_bytes(disk.total_bytes),
            format!("{:.1}%", pct),
        );
        out.push_str(&colorize_by_usage(row, pct, cfg.color));
        out.push('\n');
    }
}

fn render_processes(out: &mut String, snapshot: &Snapshot, cfg: &ReportConfig) {
    let list = &snapshot.processes;
    out.push_str(&format!(
        "\nTop processes ({} total, {} running, {} zombie)\n",
        list.total, list.running, list.zombie
    ));

    out.push_str("  By CPU:\n");
    render_process_rows(out, &list.top_by_cpu(cfg.top_processes));
    out.push_str("  By memory:\n");
    render_process_rows(out, &list.top_by_mem(cfg.top_processes));
}

fn render_process_rows(out: &mut String, rows: &[&ProcessInfo]) {
    if rows.is_empty() {
        out.push_str("    (none)\n");
        return;
    }

    out.push_str(&format!(
        "    {:>7} {}  {:>6} {:>6} {:>8}  {}\n",
        "PID",
        pad_display("USER", 10),
        "CPU%",
        "MEM%",
        "RES",
        "Command"
    ));
    for p in rows {
        out.push_str(&format!(
            "    {:>7} {}  {:>6.1} {:>6.1} {:>8}  {}\n",
            p.pid,
            pad_display(&truncate_display(&p.user, 10), 10),
            p.cpu_usage,
            p.mem_usage,
            format_bytes(p.resident_mem),
            truncate_display(&p.name, 40),
        ));
    }
}

fn render_auth(out: &mut String, auth: &AuthInfo) {
    out.push_str("\nFailed logins");
    match &auth.log_path {
        Some(path) => {
            out.push_str(&format!(
                " ({} in {}, showing last {})\n",
                auth.total_failed,
                path.display(),
                auth.recent.len()
            ));
            if auth.recent.is_empty() {
                out.push_str("  (none)\n");
            }
            for entry in &auth.recent {
                out.push_str(&format!(
                    "  {}  {}  from {}\n",
                    entry.timestamp,
                    pad_display(&truncate_display(&entry.user, 16), 16),
                    entry.source
                ));
            }
        }
        None => {
            out.push_str("\n  (no readable auth log; try running as root)\n");
        }
    }
}

/// Render a usage bar: `Usage[||||||||              42.1%]`
/// `width` is the full bar width including label, brackets and suffix.
fn usage_bar(label: &str, pct: f64, suffix: &str, width: usize, color: bool) -> String {
    let frac = (pct / 100.0).clamp(0.0, 1.0);
    let available = width.saturating_sub(label.len() + suffix.len() + 2).max(4);

    let filled = ((frac * available as f64) as usize).min(available);
    let empty = available - filled;

    let bar = colorize_by_usage("|".repeat(filled), pct, color);
    format!("{}[{}{}{}]", label, bar, " ".repeat(empty), suffix)
}

/// Usage coloring with htop's thresholds: green below 50%, yellow to 80%,
/// red above.
fn colorize_by_usage(text: String, pct: f64, color: bool) -> String {
    if !color {
        return text;
    }
    if pct > 80.0 {
        text.red().to_string()
    } else if pct > 50.0 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

/// Pad to `width` display columns (unicode-aware)
fn pad_display(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Cut to at most `max` display columns (unicode-aware)
fn truncate_display(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::FailedLogin;
    use crate::system::collector::Snapshot;
    use crate::system::disk::DiskInfo;
    use crate::system::memory::MemoryInfo;
    use crate::system::os::OsInfo;
    use crate::system::process::{ProcessInfo, ProcessList};

    fn plain_config() -> ReportConfig {
        ReportConfig {
            color: false,
            ..Default::default()
        }
    }

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            taken_at: chrono::Local::now(),
            os: OsInfo {
                hostname: "web1".into(),
                os_name: "Ubuntu".into(),
                os_version: "24.04".into(),
                kernel_version: "6.8.0-41-generic".into(),
                arch: "x86_64".into(),
                cpu_brand: "AMD Ryzen 7 5800X".into(),
                cpu_count: 16,
                uptime_seconds: 3 * 86400 + 3661,
                load_avg: [0.28, 0.45, 0.47],
            },
            cpu_utilization: 17.25,
            memory: MemoryInfo {
                total_mem: 16 * 1024 * 1024 * 1024,
                used_mem: 4 * 1024 * 1024 * 1024,
                free_mem: 12 * 1024 * 1024 * 1024,
                available_mem: 12 * 1024 * 1024 * 1024,
                total_swap: 8 * 1024 * 1024 * 1024,
                used_swap: 0,
                free_swap: 8 * 1024 * 1024 * 1024,
            },
            disks: vec![DiskInfo {
                mount_point: "/".into(),
                filesystem: "ext4".into(),
                total_bytes: 100 * 1024 * 1024 * 1024,
                available_bytes: 25 * 1024 * 1024 * 1024,
            }],
            processes: ProcessList {
                total: 312,
                running: 2,
                zombie: 0,
                processes: vec![ProcessInfo {
                    pid: 42,
                    user: "postgres".into(),
                    name: "postgres".into(),
                    cpu_usage: 12.5,
                    mem_usage: 3.1,
                    resident_mem: 512 * 1024 * 1024,
                }],
            },
            auth: Some(AuthInfo {
                log_path: Some("/var/log/auth.log".into()),
                total_failed: 3,
                recent: vec![FailedLogin {
                    timestamp: "Jul  3 10:16:02".into(),
                    user: "root".into(),
                    source: "203.0.113.7".into(),
                }],
            }),
        }
    }

    #[test]
    fn renders_every_enabled_section() {
        let report = render(&sample_snapshot(), &plain_config());
        for needle in [
            "sysreport :: web1",
            "\nSystem\n",
            "\nCPU\n",
            "Load average: 0.28 0.45 0.47",
            "\nMemory\n",
            "\nDisks\n",
            "Top processes (312 total, 2 running, 0 zombie)",
            "Failed logins (3 in /var/log/auth.log, showing last 1)",
            "203.0.113.7",
        ] {
            assert!(report.contains(needle), "missing {needle:?} in:\n{report}");
        }
    }

    #[test]
    fn skips_disabled_sections() {
        let mut cfg = plain_config();
        cfg.show_processes = false;
        cfg.show_auth = false;
        let report = render(&sample_snapshot(), &cfg);
        assert!(!report.contains("Top processes"));
        assert!(!report.contains("Failed logins"));
    }

    #[test]
    fn unreadable_auth_log_renders_hint() {
        let mut snapshot = sample_snapshot();
        snapshot.auth = Some(AuthInfo::default());
        let report = render(&snapshot, &plain_config());
        assert!(report.contains("no readable auth log"));
    }

    #[test]
    fn plain_output_has_no_ansi_escapes() {
        let report = render(&sample_snapshot(), &plain_config());
        assert!(!report.contains('\u{1b}'));
    }

    #[test]
    fn bar_geometry_tracks_percentage() {
        let empty = usage_bar("Usage", 0.0, "0.0%", 30, false);
        let half = usage_bar("Usage", 50.0, "50.0%", 30, false);
        let full = usage_bar("Usage", 100.0, "100.0%", 30, false);

        assert!(!empty.contains('|'));
        assert!(half.contains('|'));
        // a full bar leaves no padding between fill and suffix
        assert!(full.contains("|]") || full.ends_with("|100.0%]"));

        let fill = |s: &str| s.chars().filter(|&c| c == '|').count();
        assert!(fill(&half) > fill(&empty));
        assert!(fill(&full) > fill(&half));
    }

    #[test]
    fn bar_clamps_out_of_range_percentages() {
        let over = usage_bar("Usage", 250.0, "250.0%", 30, false);
        let under = usage_bar("Usage", -10.0, "-10.0%", 30, false);
        let fill = |s: &str| s.chars().filter(|&c| c == '|').count();
        assert_eq!(fill(&over), fill(&usage_bar("Usage", 100.0, "250.0%", 30, false)));
        assert_eq!(fill(&under), 0);
    }

    #[test]
    fn display_width_helpers_handle_wide_chars() {
        assert_eq!(pad_display("ab", 4), "ab  ");
        assert_eq!(pad_display("abcd", 2), "abcd");
        // CJK chars occupy two columns each
        assert_eq!(truncate_display("日本語", 4), "日本");
        assert_eq!(truncate_display("plain", 10), "plain");
    }
}
