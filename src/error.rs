//! Error types for capture and audit operations.

use thiserror::Error;

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a capture or login run.
#[derive(Error, Debug)]
pub enum Error {
    /// Viewport token did not parse as `WIDTHxHEIGHT`.
    #[error("invalid viewport '{0}' (expected WxH, e.g. 1920x1080)")]
    InvalidViewport(String),

    /// Browser failed to launch or crashed.
    #[error("browser error: {0}")]
    Browser(String),

    /// No Chromium-family executable could be located.
    #[error("browser not found: {0}")]
    BrowserNotFound(String),

    /// Engine is accepted on the CLI but cannot be automated over CDP.
    #[error("engine {0} is not supported for automation; use --browser chromium")]
    UnsupportedEngine(String),

    /// Navigation failed (timeout, TLS failure, unreachable host).
    #[error("navigation error: {0}")]
    Navigation(String),

    /// Settings or configuration file error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Push notification could not be delivered.
    #[error("notification error: {0}")]
    Notify(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Message fragments that identify a certificate-trust failure.
///
/// `SSL_ERROR` is the Gecko family, `ERR_CERT`/`ERR_SSL` the Chromium
/// net-error families.
const CERT_SIGNATURES: [&str; 3] = ["SSL_ERROR", "ERR_CERT", "ERR_SSL"];

impl Error {
    /// Returns true if this error was caused by a TLS certificate problem.
    ///
    /// Checked at the top level to append the `--ignore-ssl` remediation hint.
    pub fn is_certificate_error(&self) -> bool {
        let message = self.to_string();
        CERT_SIGNATURES.iter().any(|sig| message.contains(sig))
    }
}
