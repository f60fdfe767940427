//! Browser engine selection, binary discovery, and CDP launch.
//!
//! The engine tag mirrors the CLI surface: `firefox`, `chromium`, `webkit`.
//! Only Chromium-family browsers speak the Chrome DevTools Protocol that the
//! automation stack drives; Gecko and WebKit engines are accepted tokens that
//! fail launch with a clear error.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::viewport::ViewportSpec;

/// Upper bound for a single page load.
pub const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser engines accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserEngine {
    /// Mozilla Firefox (Gecko). Not automatable over CDP.
    Firefox,
    /// Chromium-family browsers. Full CDP automation support.
    Chromium,
    /// WebKit. Not automatable over CDP.
    Webkit,
}

impl BrowserEngine {
    /// Get the lowercase name of the engine.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Chromium => "chromium",
            BrowserEngine::Webkit => "webkit",
        }
    }

    /// Check if this engine supports CDP (Chrome DevTools Protocol) automation.
    pub fn supports_cdp(&self) -> bool {
        matches!(self, BrowserEngine::Chromium)
    }
}

impl fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BrowserEngine {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserEngine::Firefox),
            "chromium" | "chrome" => Ok(BrowserEngine::Chromium),
            "webkit" => Ok(BrowserEngine::Webkit),
            _ => Err(Error::Config(format!("unknown browser engine: {}", s))),
        }
    }
}

/// Executable names probed on the search path, in preference order.
const CHROME_BINARIES: [&str; 4] = [
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Locate a Chrome/Chromium binary.
///
/// Checks the system search path first, then falls back to the newest
/// Playwright-managed Chromium installation. Returns `None` when neither
/// search succeeds; callers treat that as a capability signal, not an error.
pub fn resolve_chrome() -> Option<PathBuf> {
    if let Some(path_var) = std::env::var_os("PATH") {
        if let Some(found) = find_in_path(&CHROME_BINARIES, &path_var) {
            return Some(found);
        }
    }

    let cache_root = dirs::cache_dir()?.join("ms-playwright");
    find_managed_chromium(&cache_root)
}

/// Search an ordered list of executable names on a PATH-style variable.
pub(crate) fn find_in_path(names: &[&str], path_var: &OsStr) -> Option<PathBuf> {
    for name in names {
        for dir in std::env::split_paths(path_var) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Find the newest managed Chromium under a Playwright cache root.
///
/// Installations live at `chromium-<build>/chrome-linux64/chrome`; build
/// directories sort lexicographically, newest last.
fn find_managed_chromium(cache_root: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(cache_root).ok()?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("chromium-")
        })
        .map(|entry| entry.path().join("chrome-linux64").join("chrome"))
        .filter(|exe| exe.is_file())
        .collect();

    candidates.sort();
    candidates.pop()
}

/// Options for launching a browser through the engine seam.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// Initial window/viewport size. Device scale is fixed at 1.
    pub viewport: Option<ViewportSpec>,
    /// Persistent user-data directory; `None` for a throwaway profile.
    pub user_data_dir: Option<PathBuf>,
    /// Bypass TLS certificate validation.
    pub ignore_tls_errors: bool,
}

/// A launched browser plus its CDP event-handler task.
///
/// The handler task drains the protocol event stream and finishes when the
/// browser process goes away, which is how the login flow observes the human
/// closing the window.
pub struct BrowserHandle {
    /// The browser instance.
    pub browser: Browser,
    /// Join handle for the spawned event loop.
    pub handler_task: JoinHandle<()>,
}

/// Launch a browser for the given engine.
///
/// Dispatches on the engine tag; only Chromium has a concrete CDP
/// implementation behind it.
pub async fn launch(engine: BrowserEngine, options: LaunchOptions) -> Result<BrowserHandle> {
    match engine {
        BrowserEngine::Chromium => launch_chromium(options).await,
        BrowserEngine::Firefox | BrowserEngine::Webkit => {
            Err(Error::UnsupportedEngine(engine.to_string()))
        }
    }
}

async fn launch_chromium(options: LaunchOptions) -> Result<BrowserHandle> {
    let executable = resolve_chrome().ok_or_else(|| {
        Error::BrowserNotFound(
            "no Chromium-family browser on PATH or in the Playwright cache".into(),
        )
    })?;

    tracing::info!("Using browser at {}", executable.display());

    let mut builder = BrowserConfig::builder().chrome_executable(&executable);

    if let Some(vp) = options.viewport {
        builder = builder.viewport(Viewport {
            width: vp.width,
            height: vp.height,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        });
    }

    if !options.headless {
        builder = builder.with_head();
    }

    if let Some(ref dir) = options.user_data_dir {
        builder = builder.user_data_dir(dir);
    }

    if options.ignore_tls_errors {
        builder = builder.arg("--ignore-certificate-errors");
    }

    builder = builder.arg("--no-first-run").arg("--disable-dev-shm-usage");

    let config = builder.build().map_err(Error::Browser)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| Error::Browser(format!("failed to launch browser: {}", e)))?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!("Browser handler event error: {}", e);
            }
        }
    });

    Ok(BrowserHandle {
        browser,
        handler_task,
    })
}

/// Navigate a page and wait for the load to finish, bounded by [`NAV_TIMEOUT`].
///
/// A timeout is a navigation failure, never silently ignored.
pub(crate) async fn navigate(page: &Page, url: &str) -> Result<()> {
    let load = async {
        page.goto(url)
            .await
            .map_err(|e| Error::Navigation(format!("failed to load {}: {}", url, e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| Error::Navigation(format!("failed to load {}: {}", url, e)))?;
        Ok(())
    };

    tokio::time::timeout(NAV_TIMEOUT, load)
        .await
        .map_err(|_| {
            Error::Navigation(format!(
                "timed out after {}s loading {}",
                NAV_TIMEOUT.as_secs(),
                url
            ))
        })?
}

impl BrowserHandle {
    /// Close the browser and wait for the event loop to drain.
    ///
    /// Called on both the success and failure paths so no browser process
    /// outlives the capture call.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close: {}", e);
        }
        let _ = self.handler_task.await;
    }
}
