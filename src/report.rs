//! Aggregation of a capture run into a human-readable summary.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::audit::{AuditOutcome, CATEGORY_KEYS};
use crate::capture::ScreenshotArtifact;
use crate::error::Result;

/// Summary file name inside the output directory.
pub const SUMMARY_FILE: &str = "summary.txt";

/// Everything a capture run produced, built once at the end and never
/// mutated afterward.
#[derive(Debug)]
pub struct RunSummary {
    /// The captured URL.
    pub url: String,
    /// Wall-clock time the summary was built.
    pub timestamp: String,
    /// Screenshot artifacts in requested-viewport order.
    pub screenshots: Vec<ScreenshotArtifact>,
    /// Audit result or skip reason.
    pub audit: AuditOutcome,
}

impl RunSummary {
    /// Build a summary stamped with the current local time.
    pub fn new(url: &str, screenshots: Vec<ScreenshotArtifact>, audit: AuditOutcome) -> Self {
        Self {
            url: url.to_string(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            screenshots,
            audit,
        }
    }

    /// Render the summary text.
    ///
    /// This never fails: a report with missing titles or scores renders
    /// "n/a" per missing field.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("UI Review Capture — {}", self.url),
            format!("Timestamp: {}", self.timestamp),
            String::new(),
            "Screenshots:".to_string(),
        ];

        for shot in &self.screenshots {
            lines.push(format!("  {}", shot.file_path.display()));
        }
        lines.push(String::new());

        match &self.audit {
            AuditOutcome::Scored(report) => {
                lines.push("Lighthouse scores:".to_string());
                for key in CATEGORY_KEYS {
                    let category = report.categories.get(key);
                    let title = category
                        .and_then(|c| c.title.as_deref())
                        .unwrap_or(key);
                    let score = category
                        .and_then(|c| c.score)
                        .map(format_score)
                        .unwrap_or_else(|| "n/a".to_string());
                    lines.push(format!("  {}: {}", title, score));
                }
            }
            AuditOutcome::Skipped(_) => {
                lines.push("Lighthouse: skipped (not installed or failed)".to_string());
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }

    /// Write the summary to `output_dir/summary.txt` and return its path.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(SUMMARY_FILE);
        std::fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// Convert a 0-1 category score to a 0-100 integer, truncating.
fn format_score(score: f64) -> String {
    ((score * 100.0) as i64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditCategory, AuditReport};
    use crate::viewport::ViewportSpec;
    use std::collections::BTreeMap;

    fn artifacts() -> Vec<ScreenshotArtifact> {
        vec![
            ScreenshotArtifact {
                viewport: ViewportSpec::new(1920, 1080),
                file_path: PathBuf::from("/out/screenshot-1920x1080.png"),
            },
            ScreenshotArtifact {
                viewport: ViewportSpec::new(375, 812),
                file_path: PathBuf::from("/out/screenshot-375x812.png"),
            },
        ]
    }

    fn category(title: &str, score: Option<f64>) -> AuditCategory {
        AuditCategory {
            title: Some(title.to_string()),
            score,
        }
    }

    #[test]
    fn test_render_skipped() {
        let summary = RunSummary::new(
            "https://example.com",
            artifacts(),
            AuditOutcome::Skipped("lighthouse not found in PATH".into()),
        );
        let text = summary.render();

        assert!(text.contains("UI Review Capture — https://example.com"));
        assert!(text.contains("Timestamp: "));
        assert!(text.contains("  /out/screenshot-1920x1080.png"));
        assert!(text.contains("  /out/screenshot-375x812.png"));
        assert!(text.contains("Lighthouse: skipped (not installed or failed)"));
        assert!(!text.contains("Lighthouse scores:"));
    }

    #[test]
    fn test_render_scores_truncated() {
        let mut categories = BTreeMap::new();
        categories.insert("performance".into(), category("Performance", Some(0.91)));
        categories.insert("accessibility".into(), category("Accessibility", Some(1.0)));
        categories.insert("best-practices".into(), category("Best Practices", Some(0.85)));
        categories.insert("seo".into(), category("SEO", Some(0.77)));

        let summary = RunSummary::new(
            "https://example.com",
            artifacts(),
            AuditOutcome::Scored(AuditReport {
                file_path: PathBuf::from("/out/lighthouse-report.json"),
                categories,
            }),
        );
        let text = summary.render();

        assert!(text.contains("  Performance: 91"));
        assert!(text.contains("  Accessibility: 100"));
        assert!(text.contains("  Best Practices: 85"));
        assert!(text.contains("  SEO: 77"));
    }

    #[test]
    fn test_render_missing_category_is_na() {
        let mut categories = BTreeMap::new();
        categories.insert("performance".into(), category("Performance", Some(0.5)));
        categories.insert("accessibility".into(), category("Accessibility", Some(0.5)));
        categories.insert("best-practices".into(), category("Best Practices", Some(0.5)));
        // "seo" absent entirely: rendered under its key with n/a

        let summary = RunSummary::new(
            "https://example.com",
            vec![],
            AuditOutcome::Scored(AuditReport {
                file_path: PathBuf::from("/out/lighthouse-report.json"),
                categories,
            }),
        );
        let text = summary.render();

        assert!(text.contains("  Performance: 50"));
        assert!(text.contains("  seo: n/a"));
    }

    #[test]
    fn test_render_scoreless_category_is_na() {
        let mut categories = BTreeMap::new();
        categories.insert("performance".into(), category("Performance", None));

        let summary = RunSummary::new(
            "https://example.com",
            vec![],
            AuditOutcome::Scored(AuditReport {
                file_path: PathBuf::from("/out/lighthouse-report.json"),
                categories,
            }),
        );
        let text = summary.render();

        assert!(text.contains("  Performance: n/a"));
        assert!(text.contains("  accessibility: n/a"));
    }

    #[test]
    fn test_write_summary_file() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::new(
            "https://example.com",
            vec![],
            AuditOutcome::Skipped("disabled".into()),
        );

        let path = summary.write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(SUMMARY_FILE));

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("https://example.com"));
    }

    #[test]
    fn test_format_score_truncates() {
        assert_eq!(format_score(0.91), "91");
        assert_eq!(format_score(1.0), "100");
        assert_eq!(format_score(0.999), "99");
        assert_eq!(format_score(0.0), "0");
    }
}
