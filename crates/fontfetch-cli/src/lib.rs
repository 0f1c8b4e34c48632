//! CLI interface for fontfetch
//!
//! Parses the flag-style command line, validates it into a [`RunRequest`] and
//! dispatches to the search, download or remove operation.

use anyhow::Context;
use clap::Parser;
use console::Term;
use fontfetch_core::config::EffectiveUidCheck;
use fontfetch_core::settings::{self, Settings};
use fontfetch_core::{CatalogCredentials, FontfetchConfig, HttpBackend, ReqwestBackend};
use std::path::Path;
use std::sync::Arc;

pub mod args;
pub mod ops;
pub mod request;

pub use args::{exit_code_for_clap_error, normalize_legacy_args, Cli};
pub use ops::*;
pub use request::{ArgError, Mode, RunRequest};

/// Where to get a Google Fonts API key
pub const API_KEY_HELP_URL: &str = "https://developers.google.com/fonts/docs/developer_api#APIKey";

/// Ask for a Google Fonts API key on the terminal.
///
/// Returns an empty string when the terminal is not interactive.
pub fn prompt_api_key(term: &Term) -> std::io::Result<String> {
    term.write_line("Google Fonts API key not set.")?;
    term.write_line(&format!("You can get one from here: {}", API_KEY_HELP_URL))?;
    term.write_str("Enter API key: ")?;
    let key = term.read_line()?;
    Ok(key.trim().to_string())
}

/// Credentials for the primary catalog, calling `prompt` for a key (and
/// persisting it) when the primary catalog will be consulted but none is stored.
fn primary_credentials<P>(
    request: &RunRequest,
    settings: &mut Settings,
    settings_path: &Path,
    prompt: P,
) -> anyhow::Result<Option<CatalogCredentials>>
where
    P: FnOnce() -> std::io::Result<String>,
{
    if request.mode == Mode::Remove || !request.prefers_primary() {
        return Ok(None);
    }

    if let Some(credentials) = settings.credentials() {
        return Ok(Some(credentials));
    }

    let key = prompt().context("Failed to read API key")?;
    let key = key.trim();
    if key.is_empty() {
        ops::log_tone(
            &request.options,
            ops::Tone::Warning,
            "No API key entered, searching Font Squirrel only",
        );
        return Ok(None);
    }

    settings.set_api_key(key);
    settings::save(settings_path, settings)
        .with_context(|| format!("Failed to save settings to {}", settings_path.display()))?;
    ops::log_verbose(
        &request.options,
        &format!("Saved API key to {}", settings_path.display()),
    );

    Ok(settings.credentials())
}

/// Run one validated request against the real network and font directories
pub async fn run_cli(request: RunRequest, config: FontfetchConfig) -> anyhow::Result<()> {
    let http: Arc<dyn HttpBackend> =
        Arc::new(ReqwestBackend::new().context("Failed to create HTTP client")?);
    run_with_backend(request, config, http, || prompt_api_key(&Term::stderr())).await
}

/// Load settings, settle primary credentials, then dispatch over `http`.
///
/// `prompt` is only called when a missing API key has to be asked for.
pub async fn run_with_backend<P>(
    mut request: RunRequest,
    config: FontfetchConfig,
    http: Arc<dyn HttpBackend>,
    prompt: P,
) -> anyhow::Result<()>
where
    P: FnOnce() -> std::io::Result<String>,
{
    let settings_path = config.settings_path.clone();
    let mut settings = settings::load_or_create(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    if !settings.google_enabled() {
        log::info!("Google Fonts disabled in {}", settings_path.display());
        request.use_secondary_only = true;
    }

    for warning in &request.warnings {
        ops::log_tone(&request.options, ops::Tone::Warning, warning);
    }

    let credentials = primary_credentials(&request, &mut settings, &settings_path, prompt)?;
    let services = Services::new(http, config, credentials);

    dispatch(&request, &services).await?;
    Ok(())
}

/// Dispatch a request to its operation handler
pub async fn dispatch(request: &RunRequest, services: &Services) -> Result<(), fontfetch_core::FontError> {
    match request.mode {
        Mode::Search => {
            handle_search_command(services, request).await?;
        }
        Mode::Download => {
            handle_download_command(services, request).await?;
        }
        Mode::Remove => {
            handle_remove_command(request, &services.installer);
        }
    }
    Ok(())
}

/// CLI entry point
#[tokio::main]
pub async fn main() {
    env_logger::init();

    let args = normalize_legacy_args(std::env::args());
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = exit_code_for_clap_error(err.kind());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Some(shell) = cli.completions {
        if let Err(e) = write_completions(shell, std::io::stdout()) {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let request = match RunRequest::from_cli(&cli, &EffectiveUidCheck) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("{}", console::style(format!("Error: {}", err)).red());
            std::process::exit(err.exit_code());
        }
    };

    if let Err(e) = run_cli(request, FontfetchConfig::from_env()).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}
