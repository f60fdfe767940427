//! Interactive login sessions persisted to an on-disk profile.

use std::path::Path;

use chromiumoxide::browser::Browser;

use crate::browser::{self, BrowserEngine, LaunchOptions};
use crate::error::{Error, Result};
use crate::viewport::ViewportSpec;

/// Window size for the headed login browser.
const LOGIN_WINDOW: ViewportSpec = ViewportSpec::new(1280, 900);

/// Open a headed browser for manual login.
///
/// The browser runs against a persistent user-data directory at
/// `profile_dir` (created if absent). After navigation the call blocks until
/// the human closes the window; cookies and local storage are flushed into
/// the profile, which later capture runs reuse read-only.
pub async fn login(
    url: &str,
    engine: BrowserEngine,
    profile_dir: &Path,
    ignore_tls_errors: bool,
) -> Result<()> {
    std::fs::create_dir_all(profile_dir)?;

    let mut handle = browser::launch(
        engine,
        LaunchOptions {
            headless: false,
            viewport: Some(LOGIN_WINDOW),
            user_data_dir: Some(profile_dir.to_path_buf()),
            ignore_tls_errors,
        },
    )
    .await?;

    if let Err(e) = open_login_page(&handle.browser, url).await {
        handle.shutdown().await;
        return Err(e);
    }

    println!("Log in manually, then close the browser window to save the session.");

    // The CDP event stream ends when the browser process exits, so this
    // returns once the window is closed and the profile is flushed.
    let _ = (&mut handle.handler_task).await;
    drop(handle);

    println!("Session saved to {}", profile_dir.display());
    Ok(())
}

async fn open_login_page(browser: &Browser, url: &str) -> Result<()> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| Error::Browser(format!("failed to open page: {}", e)))?;
    browser::navigate(&page, url).await
}
