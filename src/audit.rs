//! Lighthouse audit invocation with failure isolation.
//!
//! Every way the audit can fail — missing CLI tool, no browser binary,
//! timeout, nonzero exit, missing report file — collapses into
//! [`AuditOutcome::Skipped`] with a reason. Skipping is an expected outcome,
//! not an exception: the overall run still succeeds, and no retries are
//! attempted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use serde::Deserialize;

use crate::browser::{find_in_path, resolve_chrome};

/// Upper bound for the audit subprocess.
const AUDIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw report written next to the screenshots.
pub const REPORT_FILE: &str = "lighthouse-report.json";

/// The fixed category allowlist, in display order.
pub const CATEGORY_KEYS: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];

/// Outcome of the audit step.
#[derive(Debug)]
pub enum AuditOutcome {
    /// The audit ran and produced a report.
    Scored(AuditReport),
    /// The audit could not run or complete; the run continues without it.
    Skipped(String),
}

/// A parsed Lighthouse report.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Where the raw JSON report lives.
    pub file_path: PathBuf,
    /// Category results keyed by category name.
    pub categories: BTreeMap<String, AuditCategory>,
}

/// One scored category from the report.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditCategory {
    /// Display title, when the report carries one.
    pub title: Option<String>,
    /// Score in `[0, 1]`, absent when the category could not be scored.
    pub score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawReport {
    #[serde(default)]
    categories: BTreeMap<String, AuditCategory>,
}

impl AuditReport {
    /// Read a report file, degrading to empty categories on malformed input.
    ///
    /// Missing fields render as "n/a" downstream; a broken report never
    /// aborts the run.
    pub fn load(path: &Path) -> Self {
        let categories = match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<RawReport>(&text) {
                Ok(raw) => raw.categories,
                Err(e) => {
                    tracing::warn!("Malformed Lighthouse report: {}", e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                tracing::warn!("Unreadable Lighthouse report: {}", e);
                BTreeMap::new()
            }
        };

        Self {
            file_path: path.to_path_buf(),
            categories,
        }
    }
}

/// An external audit invocation: command, arguments, environment overrides,
/// and timeout. Built separately from execution so the argument and
/// classification logic is testable without spawning a process.
#[derive(Debug)]
pub(crate) struct AuditCommand {
    pub(crate) program: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) envs: Vec<(String, String)>,
    pub(crate) timeout: Duration,
}

/// How the subprocess invocation ended.
#[derive(Debug)]
pub(crate) enum Invocation {
    Completed(ExitStatus),
    TimedOut,
    LaunchFailed(std::io::Error),
}

impl AuditCommand {
    pub(crate) fn new(
        program: PathBuf,
        url: &str,
        report_path: &Path,
        ignore_tls_errors: bool,
        chrome_path: Option<PathBuf>,
    ) -> Self {
        let mut chrome_flags = String::from("--headless=new --no-sandbox");
        if ignore_tls_errors {
            chrome_flags.push_str(" --ignore-certificate-errors");
        }

        let args = vec![
            url.to_string(),
            "--output=json".to_string(),
            format!("--output-path={}", report_path.display()),
            format!("--chrome-flags={}", chrome_flags),
            format!("--only-categories={}", CATEGORY_KEYS.join(",")),
            "--quiet".to_string(),
        ];

        let envs = chrome_path
            .map(|p| vec![("CHROME_PATH".to_string(), p.display().to_string())])
            .unwrap_or_default();

        Self {
            program,
            args,
            envs,
            timeout: AUDIT_TIMEOUT,
        }
    }

    async fn run(&self) -> Invocation {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return Invocation::LaunchFailed(e),
        };

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => Invocation::Completed(status),
            Ok(Err(e)) => Invocation::LaunchFailed(e),
            Err(_) => {
                let _ = child.kill().await;
                Invocation::TimedOut
            }
        }
    }
}

/// Map an invocation result onto the audit outcome.
pub(crate) fn classify(invocation: Invocation, report_path: &Path) -> AuditOutcome {
    match invocation {
        Invocation::LaunchFailed(e) => {
            AuditOutcome::Skipped(format!("failed to launch lighthouse: {}", e))
        }
        Invocation::TimedOut => AuditOutcome::Skipped(format!(
            "lighthouse timed out after {}s",
            AUDIT_TIMEOUT.as_secs()
        )),
        Invocation::Completed(status) if !status.success() => match status.code() {
            Some(code) => AuditOutcome::Skipped(format!("lighthouse exited with code {}", code)),
            None => AuditOutcome::Skipped("lighthouse terminated by signal".to_string()),
        },
        Invocation::Completed(_) => {
            if report_path.exists() {
                AuditOutcome::Scored(AuditReport::load(report_path))
            } else {
                AuditOutcome::Skipped("lighthouse produced no report file".to_string())
            }
        }
    }
}

/// Run a Lighthouse audit against `url`, writing the JSON report under
/// `output_dir`.
///
/// Resolution order: the `lighthouse` CLI must be on the search path; a
/// browser comes from the `CHROME_PATH` environment override when set,
/// otherwise from the binary resolver. Either being absent is a skip, not an
/// error.
pub async fn run_audit(url: &str, output_dir: &Path, ignore_tls_errors: bool) -> AuditOutcome {
    let lighthouse = match std::env::var_os("PATH")
        .and_then(|path_var| find_in_path(&["lighthouse"], &path_var))
    {
        Some(path) => path,
        None => return AuditOutcome::Skipped("lighthouse not found in PATH".to_string()),
    };

    let chrome_path = if std::env::var_os("CHROME_PATH").is_some() {
        None
    } else {
        match resolve_chrome() {
            Some(path) => Some(path),
            None => {
                return AuditOutcome::Skipped("no Chrome/Chromium binary found".to_string());
            }
        }
    };

    let report_path = output_dir.join(REPORT_FILE);
    let command = AuditCommand::new(lighthouse, url, &report_path, ignore_tls_errors, chrome_path);

    tracing::info!("Running lighthouse against {}", url);
    let invocation = command.run().await;
    classify(invocation, &report_path)
}
