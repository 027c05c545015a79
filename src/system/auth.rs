use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// One rejected authentication attempt scraped from the auth log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLogin {
    pub timestamp: String,
    pub user: String,
    pub source: String,
}

/// Failed-login summary for the report
#[derive(Debug, Clone, Default)]
pub struct AuthInfo {
    /// Which log file was scraped, if any was readable
    pub log_path: Option<PathBuf>,
    /// Total `Failed password` lines in that file
    pub total_failed: usize,
    /// The most recent entries, oldest first
    pub recent: Vec<FailedLogin>,
}

// Debian-family and the BSDs use auth.log, RHEL-family uses secure
const LOG_CANDIDATES: &[&str] = &["/var/log/auth.log", "/var/log/secure"];

/// Scrape the first readable auth log for failed password attempts,
/// keeping the last `limit` entries. The logs are root-readable on most
/// hosts; an unreadable log degrades to an empty summary, not an error.
pub fn collect(limit: usize) -> AuthInfo {
    for candidate in LOG_CANDIDATES {
        let path = Path::new(candidate);
        match fs::read_to_string(path) {
            Ok(content) => return scan_log(path.to_path_buf(), &content, limit),
            Err(err) => debug!("cannot read {}: {}", candidate, err),
        }
    }
    AuthInfo::default()
}

fn scan_log(log_path: PathBuf, content: &str, limit: usize) -> AuthInfo {
    let matches: Vec<FailedLogin> = content.lines().filter_map(parse_failed_login).collect();
    let total_failed = matches.len();
    let skip = total_failed.saturating_sub(limit);

    AuthInfo {
        log_path: Some(log_path),
        total_failed,
        recent: matches.into_iter().skip(skip).collect(),
    }
}

/// Parse one sshd rejection line, e.g.
/// `Jul  3 10:15:22 web1 sshd[912]: Failed password for invalid user admin from 203.0.113.7 port 22 ssh2`
/// Lines without the `Failed password for ... from ...` shape are skipped.
pub fn parse_failed_login(line: &str) -> Option<FailedLogin> {
    let (prefix, rest) = line.split_once("Failed password for ")?;
    let rest = rest.strip_prefix("invalid user ").unwrap_or(rest);
    let (user, rest) = rest.split_once(" from ")?;
    let source = rest.split_whitespace().next()?;
    if user.is_empty() {
        return None;
    }

    Some(FailedLogin {
        timestamp: log_timestamp(prefix),
        user: user.to_string(),
        source: source.to_string(),
    })
}

/// Pull the leading timestamp out of a syslog prefix. Classic syslog
/// spreads it over three tokens (`Jul  3 10:15:22`); rsyslog configured
/// for RFC 3339 emits a single ISO token.
fn log_timestamp(prefix: &str) -> String {
    let mut fields = prefix.split_whitespace();
    match fields.next() {
        Some(first) if first.contains('T') => first.to_string(),
        Some(month) => {
            let day = fields.next().unwrap_or("");
            let time = fields.next().unwrap_or("");
            format!("{} {:>2} {}", month, day, time)
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
Jul  3 10:15:20 web1 sshd[912]: Accepted publickey for deploy from 198.51.100.4 port 50412 ssh2\n\
Jul  3 10:15:22 web1 sshd[913]: Failed password for invalid user admin from 203.0.113.7 port 22 ssh2\n\
Jul  3 10:16:02 web1 sshd[914]: Failed password for root from 203.0.113.7 port 22 ssh2\n\
Jul  3 10:16:40 web1 CRON[1002]: pam_unix(cron:session): session opened for user root\n\
Jul  3 10:17:13 web1 sshd[915]: Failed password for deploy from 198.51.100.99 port 41211 ssh2\n";

    #[test]
    fn parses_invalid_user_line() {
        let line = "Jul  3 10:15:22 web1 sshd[913]: Failed password for invalid user admin from 203.0.113.7 port 22 ssh2";
        let entry = parse_failed_login(line).unwrap();
        assert_eq!(entry.timestamp, "Jul  3 10:15:22");
        assert_eq!(entry.user, "admin");
        assert_eq!(entry.source, "203.0.113.7");
    }

    #[test]
    fn parses_known_user_line() {
        let line = "Jul  3 10:16:02 web1 sshd[914]: Failed password for root from 203.0.113.7 port 22 ssh2";
        let entry = parse_failed_login(line).unwrap();
        assert_eq!(entry.user, "root");
    }

    #[test]
    fn parses_iso_timestamp_line() {
        let line = "2026-08-07T10:15:22.123456+00:00 web1 sshd[913]: Failed password for root from 10.0.0.5 port 22 ssh2";
        let entry = parse_failed_login(line).unwrap();
        assert_eq!(entry.timestamp, "2026-08-07T10:15:22.123456+00:00");
        assert_eq!(entry.source, "10.0.0.5");
    }

    #[test]
    fn skips_unrelated_lines() {
        assert_eq!(
            parse_failed_login("Jul  3 10:15:20 web1 sshd[912]: Accepted publickey for deploy from 1.2.3.4 port 22"),
            None
        );
        assert_eq!(parse_failed_login("Failed password for nobody"), None);
        assert_eq!(parse_failed_login(""), None);
    }

    #[test]
    fn keeps_only_the_most_recent_entries() {
        let info = scan_log(PathBuf::from("/tmp/auth.log"), SAMPLE_LOG, 2);
        assert_eq!(info.total_failed, 3);
        assert_eq!(info.recent.len(), 2);
        assert_eq!(info.recent[0].user, "root");
        assert_eq!(info.recent[1].user, "deploy");
    }

    #[test]
    fn limit_larger_than_matches_keeps_everything() {
        let info = scan_log(PathBuf::from("/tmp/auth.log"), SAMPLE_LOG, 50);
        assert_eq!(info.recent.len(), 3);
        assert_eq!(info.recent[0].user, "admin");
    }
}
