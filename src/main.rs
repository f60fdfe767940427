//! CLI entry point for ui-review-capture.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ui_review_capture::{logging, parse_viewports, workflow, BrowserEngine, CaptureConfig, Result};

#[derive(Parser, Debug)]
#[command(
    name = "ui-review-capture",
    about = "Capture screenshots and run Lighthouse for UI review.",
    version
)]
struct Cli {
    /// URL to capture
    url: String,

    /// Output directory (default: a timestamped directory under the temp dir)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Viewport sizes as WxH (e.g. 1920x1080 768x1024)
    #[arg(long, num_args = 1.., value_name = "WxH")]
    viewports: Vec<String>,

    /// Browser engine to use
    #[arg(long, default_value = "chromium", value_parser = ["firefox", "chromium", "webkit"])]
    browser: String,

    /// Ignore SSL certificate errors (useful for self-signed certs)
    #[arg(long)]
    ignore_ssl: bool,

    /// Open a headed browser to log in manually and save the session
    #[arg(long)]
    login: bool,

    /// Profile directory for persistent sessions
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Skip the Lighthouse audit
    #[arg(long)]
    no_lighthouse: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = logging::init("info", None);
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_certificate_error() => {
            let message = e.to_string();
            let first_line = message.lines().next().unwrap_or("");
            println!("Error: SSL certificate problem — {}", first_line);
            println!();
            println!("Try adding --ignore-ssl to bypass certificate checks:");
            let invocation: Vec<String> = std::env::args().collect();
            println!("  {} --ignore-ssl", invocation.join(" "));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let engine: BrowserEngine = cli.browser.parse()?;

    let mut config = CaptureConfig::new(&cli.url);
    config.engine = engine;
    config.ignore_tls_errors = cli.ignore_ssl;
    config.run_audit = !cli.no_lighthouse;
    config.output_dir = cli.output_dir;
    if let Some(profile) = cli.profile {
        config.profile_dir = profile;
    }
    if !cli.viewports.is_empty() {
        config.viewports = parse_viewports(&cli.viewports)?;
    }

    if cli.login {
        workflow::login(&config).await
    } else {
        workflow::run(&config).await
    }
}
