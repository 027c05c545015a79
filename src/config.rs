//! sysreport configuration persistence (htoprc-style key=value format)
//!
//! Loads settings from `$XDG_CONFIG_HOME/sysreport/sysreportrc`, falling
//! back to `~/.config/sysreport/sysreportrc`.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Get the config file path
fn config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("sysreport").join("sysreportrc"));
        }
    }
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("sysreport")
            .join("sysreportrc")
    })
}

/// Persistable report settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Rows in each top-process table
    pub top_processes: usize,
    /// Failed-login entries to keep
    pub failed_logins: usize,
    /// ANSI color in the rendered report
    pub color: bool,
    /// Render the top-process section
    pub show_processes: bool,
    /// Render the failed-login section
    pub show_auth: bool,
    /// Usage bar width in characters
    pub bar_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_processes: 5,
            failed_logins: 10,
            color: true,
            show_processes: true,
            show_auth: true,
            bar_width: 30,
        }
    }
}

impl ReportConfig {
    /// Load config from file, returning defaults if file doesn't exist
    pub fn load() -> Self {
        let path = match config_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        Self::parse(&content)
    }

    /// Parse key=value content, ignoring comments and unknown keys
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                match key {
                    "top_processes" => {
                        if let Ok(v) = value.parse::<usize>() {
                            cfg.top_processes = v.clamp(1, 50);
                        }
                    }
                    "failed_logins" => {
                        if let Ok(v) = value.parse::<usize>() {
                            cfg.failed_logins = v.clamp(1, 100);
                        }
                    }
                    "color" => cfg.color = value == "1",
                    "show_processes" => cfg.show_processes = value == "1",
                    "show_auth" => cfg.show_auth = value == "1",
                    "bar_width" => {
                        if let Ok(v) = value.parse::<usize>() {
                            cfg.bar_width = v.clamp(10, 80);
                        }
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        cfg
    }

    /// Save config to file
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path()
            .ok_or_else(|| anyhow::anyhow!("could not determine config path (no HOME)"))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let b = |v: bool| if v { "1" } else { "0" };

        let content = format!(
            "# sysreport configuration file\n\
             \n\
             top_processes={}\n\
             failed_logins={}\n\
             color={}\n\
             show_processes={}\n\
             show_auth={}\n\
             bar_width={}\n",
            self.top_processes,
            self.failed_logins,
            b(self.color),
            b(self.show_processes),
            b(self.show_auth),
            self.bar_width,
        );

        let mut file = fs::File::create(&path)?;
        file.write_all(content.as_bytes())?;

        Ok(path)
    }
}
