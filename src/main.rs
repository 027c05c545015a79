//! sysreport: a one-shot host performance report.
//!
//! Prints a single snapshot of this host's state:
//!   - OS identity, kernel, uptime
//!   - CPU utilization sampled over a 1-second window
//!   - Memory & swap usage bars
//!   - Disk usage per mounted filesystem
//!   - Top processes by CPU and by memory
//!   - Recent failed login attempts
//!
//! Works on /proc-based hosts (Linux) and BSD-derived hosts (macOS,
//! FreeBSD); the CPU sampling strategy is picked once at startup.

mod config;
mod report;
mod system;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::ReportConfig;
use system::collector::Collector;
use system::cpu;

#[derive(Parser, Debug)]
#[command(name = "sysreport")]
#[command(version)]
#[command(about = "Print a one-shot performance snapshot of this host")]
struct Cli {
    /// Rows in each top-process table
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Failed-login entries to show
    #[arg(long, value_name = "N")]
    logins: Option<usize>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Skip the top-process section
    #[arg(long)]
    skip_processes: bool,

    /// Skip the failed-login section
    #[arg(long)]
    skip_auth: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut cfg = ReportConfig::load();

    // CLI flags win over the config file, same clamps as the file parser
    if let Some(n) = cli.top {
        cfg.top_processes = n.clamp(1, 50);
    }
    if let Some(n) = cli.logins {
        cfg.failed_logins = n.clamp(1, 100);
    }
    if cli.skip_processes {
        cfg.show_processes = false;
    }
    if cli.skip_auth {
        cfg.show_auth = false;
    }

    if cli.write_config {
        let path = cfg.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    // Piped output never gets escape codes
    cfg.color = cfg.color && !cli.no_color && std::io::stdout().is_terminal();

    let mut collector = Collector::new(cpu::detect_strategy());
    let snapshot = collector.snapshot(cfg.show_auth, cfg.failed_logins);

    print!("{}", report::render(&snapshot, &cfg));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
