//! Full-page screenshot capture across an ordered list of viewports.
//!
//! Two execution strategies, selected by whether a persisted login profile
//! exists:
//!
//! - **Persisted**: one headless persistent browser sized to the first
//!   viewport, one page reused for every size. Remaining viewports resize the
//!   page in place and re-navigate so the capture never reflects a stale
//!   layout. Reusing the page keeps the authenticated session alive without
//!   re-authenticating per viewport.
//! - **Ephemeral**: no session to preserve, so each viewport gets a fresh
//!   isolated browser that is closed before the next one starts. No state
//!   (cookies, scroll position) leaks between captures.
//!
//! Both strategies fail fast: any navigation error or timeout aborts the
//! whole call and no partial artifact set is returned.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};

use crate::browser::{self, BrowserEngine, LaunchOptions};
use crate::error::{Error, Result};
use crate::viewport::ViewportSpec;

/// Fixed delay after navigation before capturing, letting client-side
/// rendering complete.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// One full-page screenshot produced for one requested viewport.
#[derive(Debug, Clone)]
pub struct ScreenshotArtifact {
    /// The viewport the page was rendered at.
    pub viewport: ViewportSpec,
    /// Where the PNG was written.
    pub file_path: PathBuf,
}

/// Capture one full-page screenshot per viewport, in the given order.
///
/// When `profile` names an existing directory the persisted-session strategy
/// is used; otherwise each viewport runs in a fresh isolated browser. Returns
/// exactly one artifact per requested viewport or an error — never a partial
/// set.
pub async fn capture(
    url: &str,
    viewports: &[ViewportSpec],
    output_dir: &Path,
    engine: BrowserEngine,
    ignore_tls_errors: bool,
    profile: Option<&Path>,
) -> Result<Vec<ScreenshotArtifact>> {
    if viewports.is_empty() {
        return Err(Error::Config("at least one viewport is required".into()));
    }

    match profile.filter(|p| p.is_dir()) {
        Some(profile_dir) => {
            tracing::info!("Capturing with persisted session from {}", profile_dir.display());
            capture_persistent(url, viewports, output_dir, engine, ignore_tls_errors, profile_dir)
                .await
        }
        None => {
            tracing::info!("Capturing with ephemeral sessions");
            capture_ephemeral(url, viewports, output_dir, engine, ignore_tls_errors).await
        }
    }
}

async fn capture_persistent(
    url: &str,
    viewports: &[ViewportSpec],
    output_dir: &Path,
    engine: BrowserEngine,
    ignore_tls_errors: bool,
    profile_dir: &Path,
) -> Result<Vec<ScreenshotArtifact>> {
    let handle = browser::launch(
        engine,
        LaunchOptions {
            headless: true,
            viewport: Some(viewports[0]),
            user_data_dir: Some(profile_dir.to_path_buf()),
            ignore_tls_errors,
        },
    )
    .await?;

    let result = persistent_pass(&handle.browser, url, viewports, output_dir).await;
    handle.shutdown().await;
    result
}

async fn persistent_pass(
    browser: &Browser,
    url: &str,
    viewports: &[ViewportSpec],
    output_dir: &Path,
) -> Result<Vec<ScreenshotArtifact>> {
    let page = new_page(browser).await?;

    let mut artifacts = Vec::with_capacity(viewports.len());
    for (index, viewport) in viewports.iter().copied().enumerate() {
        if index > 0 {
            resize(&page, viewport).await?;
        }
        artifacts.push(navigate_and_shoot(&page, url, viewport, output_dir).await?);
    }
    Ok(artifacts)
}

async fn capture_ephemeral(
    url: &str,
    viewports: &[ViewportSpec],
    output_dir: &Path,
    engine: BrowserEngine,
    ignore_tls_errors: bool,
) -> Result<Vec<ScreenshotArtifact>> {
    let mut artifacts = Vec::with_capacity(viewports.len());

    for viewport in viewports.iter().copied() {
        let handle = browser::launch(
            engine,
            LaunchOptions {
                headless: true,
                viewport: Some(viewport),
                user_data_dir: None,
                ignore_tls_errors,
            },
        )
        .await?;

        let shot = async {
            let page = new_page(&handle.browser).await?;
            navigate_and_shoot(&page, url, viewport, output_dir).await
        }
        .await;

        handle.shutdown().await;
        artifacts.push(shot?);
    }

    Ok(artifacts)
}

async fn new_page(browser: &Browser) -> Result<Page> {
    browser
        .new_page("about:blank")
        .await
        .map_err(|e| Error::Browser(format!("failed to open page: {}", e)))
}

/// Resize a live page in place via device-metrics override.
async fn resize(page: &Page, viewport: ViewportSpec) -> Result<()> {
    let params = SetDeviceMetricsOverrideParams::builder()
        .width(viewport.width as i64)
        .height(viewport.height as i64)
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(Error::Browser)?;

    page.execute(params)
        .await
        .map_err(|e| Error::Browser(format!("viewport resize to {} failed: {}", viewport, e)))?;
    Ok(())
}

/// Navigate, settle, and write one full-page PNG.
async fn navigate_and_shoot(
    page: &Page,
    url: &str,
    viewport: ViewportSpec,
    output_dir: &Path,
) -> Result<ScreenshotArtifact> {
    browser::navigate(page, url).await?;
    tokio::time::sleep(SETTLE_DELAY).await;

    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();

    let bytes = page
        .screenshot(params)
        .await
        .map_err(|e| Error::Browser(format!("screenshot at {} failed: {}", viewport, e)))?;

    let file_path = output_dir.join(viewport.file_name());
    std::fs::write(&file_path, &bytes)?;
    tracing::debug!("Wrote {}", file_path.display());

    Ok(ScreenshotArtifact {
        viewport,
        file_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capture_rejects_empty_viewport_list() {
        let dir = tempfile::tempdir().unwrap();
        let result = capture(
            "https://example.com",
            &[],
            dir.path(),
            BrowserEngine::Chromium,
            false,
            None,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_capture_rejects_non_cdp_engine() {
        let dir = tempfile::tempdir().unwrap();
        let result = capture(
            "https://example.com",
            &[ViewportSpec::new(800, 600)],
            dir.path(),
            BrowserEngine::Firefox,
            false,
            None,
        )
        .await;
        assert!(matches!(result, Err(Error::UnsupportedEngine(_))));
    }
}
