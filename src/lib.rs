//! # ui-review-capture
//!
//! UI-review capture workflow: given a URL, produce full-page screenshots at
//! several viewport sizes plus an automated Lighthouse page-quality audit,
//! and write a combined human-readable summary.
//!
//! ## Workflow
//!
//! - **Login** (`--login`): a headed browser backed by a persistent profile
//!   directory lets a human authenticate once; the profile becomes a reusable
//!   capture identity.
//! - **Capture**: one full-page screenshot per requested viewport, reusing
//!   the persisted session when the profile exists, otherwise with a fresh
//!   isolated browser per viewport.
//! - **Audit**: the Lighthouse CLI scores performance, accessibility, best
//!   practices, and SEO. Any failure (tool missing, no browser, timeout,
//!   bad exit) is a non-fatal skip recorded in the summary.
//! - **Summary**: `summary.txt` lists the URL, a timestamp, every screenshot,
//!   and either the four category scores or the skip line.
//!
//! ## Degradation
//!
//! Screenshots are the primary deliverable: capture failures abort the run.
//! The audit is a best-effort enhancement: its failures are warnings. TLS
//! trust failures are intercepted at the top level with an `--ignore-ssl`
//! remediation hint.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ui_review_capture::{workflow, CaptureConfig};
//!
//! #[tokio::main]
//! async fn main() -> ui_review_capture::Result<()> {
//!     let mut config = CaptureConfig::new("https://example.com");
//!     config.run_audit = false;
//!     workflow::run(&config).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod browser;
pub mod capture;
pub mod error;
pub mod logging;
pub mod notify;
pub mod report;
pub mod session;
pub mod settings;
pub mod viewport;
pub mod workflow;

pub use audit::{AuditCategory, AuditOutcome, AuditReport};
pub use browser::{resolve_chrome, BrowserEngine};
pub use capture::ScreenshotArtifact;
pub use error::{Error, Result};
pub use notify::PushoverNotifier;
pub use report::RunSummary;
pub use settings::{load_yaml_mapping, FileSettings};
pub use viewport::{default_viewports, parse_viewports, ViewportSpec};
pub use workflow::CaptureConfig;
