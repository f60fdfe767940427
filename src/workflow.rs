//! Orchestration of login and capture runs.
//!
//! Single pass, no retries: capture errors are fatal (screenshots are the
//! primary deliverable), audit errors are recoverable warnings, and the
//! summary is always written for a completed capture.

use std::path::PathBuf;

use crate::audit::{self, AuditOutcome};
use crate::browser::BrowserEngine;
use crate::capture;
use crate::error::Result;
use crate::notify::PushoverNotifier;
use crate::report::RunSummary;
use crate::session;
use crate::settings::FileSettings;
use crate::viewport::{default_viewports, ViewportSpec};

/// Environment variable naming the settings file used for completion
/// notifications. Unset means notifications are off.
pub const NOTIFY_ENV_VAR: &str = "UI_REVIEW_NOTIFY_CONFIG";

/// Everything a run needs, resolved up front. No hidden global defaults.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// URL to capture.
    pub url: String,
    /// Output directory; `None` resolves to a timestamped default.
    pub output_dir: Option<PathBuf>,
    /// Ordered viewport list.
    pub viewports: Vec<ViewportSpec>,
    /// Browser engine tag.
    pub engine: BrowserEngine,
    /// Bypass TLS certificate validation.
    pub ignore_tls_errors: bool,
    /// Persistent profile directory; reused when it exists.
    pub profile_dir: PathBuf,
    /// Whether to attempt the Lighthouse audit.
    pub run_audit: bool,
}

impl CaptureConfig {
    /// Config for a URL with the built-in defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: None,
            viewports: default_viewports(),
            engine: BrowserEngine::Chromium,
            ignore_tls_errors: false,
            profile_dir: default_profile_dir(),
            run_audit: true,
        }
    }
}

/// Per-user profile directory for persisted login sessions.
pub fn default_profile_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ui-review-capture")
        .join("profile")
}

/// Timestamped output directory under the system temp dir.
pub fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ui-review-{}", chrono::Local::now().timestamp()))
}

/// Login mode: open a headed browser and persist the session. No
/// screenshots or summary are produced.
pub async fn login(config: &CaptureConfig) -> Result<()> {
    session::login(
        &config.url,
        config.engine,
        &config.profile_dir,
        config.ignore_tls_errors,
    )
    .await
}

/// Capture mode: screenshots, best-effort audit, summary, optional
/// completion notification.
pub async fn run(config: &CaptureConfig) -> Result<()> {
    let output_dir = config.output_dir.clone().unwrap_or_else(default_output_dir);
    std::fs::create_dir_all(&output_dir)?;
    println!("Output directory: {}", output_dir.display());

    println!(
        "Capturing screenshots at {} viewport(s)...",
        config.viewports.len()
    );
    let screenshots = capture::capture(
        &config.url,
        &config.viewports,
        &output_dir,
        config.engine,
        config.ignore_tls_errors,
        Some(&config.profile_dir),
    )
    .await?;
    for shot in &screenshots {
        println!("  Saved {}", shot.viewport.file_name());
    }

    let audit_outcome = if config.run_audit {
        println!("Running Lighthouse audit...");
        let outcome = audit::run_audit(&config.url, &output_dir, config.ignore_tls_errors).await;
        match &outcome {
            AuditOutcome::Scored(_) => println!("  Saved {}", audit::REPORT_FILE),
            AuditOutcome::Skipped(reason) => println!("Warning: {}, skipping audit.", reason),
        }
        outcome
    } else {
        AuditOutcome::Skipped("disabled with --no-lighthouse".to_string())
    };

    let summary = RunSummary::new(&config.url, screenshots, audit_outcome);
    let summary_path = summary.write(&output_dir)?;
    println!("Summary written to {}", summary_path.display());

    notify_completion(&config.url).await;

    println!("Done.");
    Ok(())
}

/// Best-effort completion push when a notify settings file is configured.
/// Failures here are warnings, never fatal.
async fn notify_completion(url: &str) {
    if std::env::var_os(NOTIFY_ENV_VAR).is_none() {
        return;
    }

    let settings = match FileSettings::from_env(NOTIFY_ENV_VAR) {
        Ok(settings) => settings,
        Err(e) => {
            println!("Warning: notification settings unreadable: {}", e);
            return;
        }
    };

    let (Some(token), Some(user)) = (
        settings.get("pushover_token"),
        settings.get("pushover_user"),
    ) else {
        println!("Warning: notification settings missing pushover_token/pushover_user.");
        return;
    };

    let notifier = PushoverNotifier::new(token, user);
    if let Err(e) = notifier
        .send(&format!("UI review capture finished for {}", url))
        .await
    {
        println!("Warning: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CaptureConfig::new("https://example.com");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.viewports.len(), 3);
        assert_eq!(config.engine, BrowserEngine::Chromium);
        assert!(config.run_audit);
        assert!(!config.ignore_tls_errors);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_default_profile_dir_location() {
        let dir = default_profile_dir();
        assert!(dir.ends_with("ui-review-capture/profile"));
    }

    #[test]
    fn test_default_output_dir_is_timestamped() {
        let dir = default_output_dir();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("ui-review-"));
    }
}
