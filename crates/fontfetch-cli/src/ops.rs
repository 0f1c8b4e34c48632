use clap::CommandFactory;
use clap_complete::{generate, Shell};
use console::style;
use fontfetch_core::filter::filter_variants;
use fontfetch_core::{
    CatalogCredentials, CatalogKind, CatalogMiss, FilterOptions, FontCatalog, FontError,
    FontInstaller, FontSquirrelCatalog, FontVariant, FontfetchConfig, GoogleFontsCatalog,
    HttpBackend, ProgressFn, QueryResolver, Resolution, StyleProperty,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::args::Cli;
use crate::request::RunRequest;

/// Output controls for CLI commands
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub quiet: bool,
    pub verbose: bool,
}

impl OutputOptions {
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    pub fn should_print_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }
}

/// Execution controls shared by all commands
#[derive(Debug, Clone, Copy)]
pub struct OperationOptions {
    pub dry_run: bool,
    pub output: OutputOptions,
}

impl OperationOptions {
    pub fn new(dry_run: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            dry_run,
            output: OutputOptions { quiet, verbose },
        }
    }
}

/// Color a printed line is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Success,
    Warning,
    Error,
}

fn paint(tone: Tone, text: &str) -> String {
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Success => style(text).green().to_string(),
        Tone::Warning => style(text).yellow().to_string(),
        Tone::Error => style(text).red().to_string(),
    }
}

pub(crate) fn log_status(opts: &OperationOptions, message: &str) {
    if opts.output.should_print() {
        println!("{}", message);
    }
}

pub(crate) fn log_verbose(opts: &OperationOptions, message: &str) {
    if opts.output.should_print_verbose() {
        eprintln!("{}", message);
    }
}

pub(crate) fn log_tone(opts: &OperationOptions, tone: Tone, message: &str) {
    match tone {
        // Errors are printed even in quiet mode
        Tone::Error => eprintln!("{}", paint(tone, message)),
        _ => {
            if opts.output.should_print() {
                println!("{}", paint(tone, message));
            }
        }
    }
}

/// Catalogs and installer one invocation works with
pub struct Services {
    pub primary: Option<Box<dyn FontCatalog>>,
    pub secondary: Box<dyn FontCatalog>,
    pub installer: FontInstaller,
}

impl Services {
    /// Wire both catalogs and the installer onto one HTTP backend.
    ///
    /// Without credentials the primary catalog is left out entirely.
    pub fn new(
        http: Arc<dyn HttpBackend>,
        config: FontfetchConfig,
        credentials: Option<CatalogCredentials>,
    ) -> Self {
        let primary = credentials.map(|creds| {
            Box::new(GoogleFontsCatalog::new(http.clone(), creds)) as Box<dyn FontCatalog>
        });

        Self {
            primary,
            secondary: Box::new(FontSquirrelCatalog::new(http.clone())),
            installer: FontInstaller::new(http, config),
        }
    }

    pub fn resolver(&self) -> QueryResolver<'_> {
        QueryResolver::new(self.primary.as_deref(), self.secondary.as_ref())
    }
}

fn search_spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["◜", "◠", "◝", "◞", "◡", "◟", "✔"])
            .template("{spinner:.yellow.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Searching...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn download_bar(visible: bool, variant: &FontVariant) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({elapsed}<{eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("==-"),
    );
    bar.set_prefix(variant.file_name());
    bar
}

/// Run the query resolver behind a spinner
pub async fn resolve_with_spinner(
    services: &Services,
    request: &RunRequest,
    show_spinner: bool,
) -> Resolution {
    let spinner = search_spinner(show_spinner);
    let resolution = services
        .resolver()
        .resolve(&request.items, request.prefers_primary())
        .await;
    spinner.finish_with_message("Search completed");
    resolution
}

/// Per-family summary of a search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilySummary {
    pub family: String,
    /// Distinct non-italic weights, in catalog order
    pub weights: Vec<String>,
    /// Canonical styles present
    pub styles: Vec<StyleProperty>,
    pub formats: Vec<String>,
}

/// Group variants into contiguous per-family runs
pub fn summarize_families(variants: &[FontVariant]) -> Vec<FamilySummary> {
    let mut summaries: Vec<FamilySummary> = Vec::new();

    for variant in variants {
        let starts_run = summaries
            .last()
            .map_or(true, |last| last.family != variant.family);
        if starts_run {
            summaries.push(FamilySummary {
                family: variant.family.clone(),
                weights: Vec::new(),
                styles: Vec::new(),
                formats: Vec::new(),
            });
        }

        let Some(summary) = summaries.last_mut() else {
            continue;
        };

        let weight = &variant.weight;
        if !weight.is_empty() && !weight.contains("italic") && !summary.weights.contains(weight) {
            summary.weights.push(weight.clone());
        }
        if !variant.style_property.is_empty() && !summary.styles.contains(&variant.style_property) {
            summary.styles.push(variant.style_property);
        }
        if !summary.formats.contains(&variant.file_format) {
            summary.formats.push(variant.file_format.clone());
        }
    }

    summaries
}

const WEIGHTS_PER_LINE: usize = 3;
const LABEL_WIDTH: usize = 10;

fn labelled(label: &str, value: &str) -> String {
    format!("{:<width$}{}", label, value, width = LABEL_WIDTH)
}

fn miss_line(miss: &CatalogMiss) -> String {
    format!(
        "Error ({}): could not find font with the name '{}'",
        miss.catalog, miss.name
    )
}

/// Render search output as toned lines
pub fn render_search_output(resolution: &Resolution) -> Vec<(Tone, String)> {
    let mut lines = Vec::new();

    for (index, family) in summarize_families(&resolution.variants).iter().enumerate() {
        if index > 0 {
            lines.push((Tone::Plain, String::new()));
        }
        lines.push((Tone::Success, labelled("Found:", &family.family)));

        match resolution.source {
            CatalogKind::Primary => {
                for (chunk_index, chunk) in family.weights.chunks(WEIGHTS_PER_LINE).enumerate() {
                    let label = if chunk_index == 0 { "Weights:" } else { "" };
                    lines.push((Tone::Plain, labelled(label, &chunk.join(" "))));
                }
                if !family.styles.is_empty() {
                    let styles: Vec<&str> = family.styles.iter().map(|s| s.as_str()).collect();
                    lines.push((Tone::Plain, labelled("Variants:", &styles.join(", "))));
                }
            }
            CatalogKind::Secondary => {
                let styles: Vec<&str> = family.styles.iter().map(|s| s.as_str()).collect();
                lines.push((Tone::Plain, labelled("Style:", &styles.join(", "))));
                lines.push((Tone::Plain, labelled("Format:", &family.formats.join(", "))));
            }
        }
    }

    if resolution.is_empty() {
        lines.push((Tone::Warning, "No fonts found".to_string()));
    }

    for miss in &resolution.misses {
        lines.push((Tone::Error, miss_line(miss)));
    }

    lines
}

/// Machine-readable search result
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub source: CatalogKind,
    pub families: Vec<FamilySummary>,
    pub variants: &'a [FontVariant],
    pub misses: &'a [CatalogMiss],
}

pub fn render_search_json(resolution: &Resolution) -> Result<String, FontError> {
    let report = SearchReport {
        source: resolution.source,
        families: summarize_families(&resolution.variants),
        variants: &resolution.variants,
        misses: &resolution.misses,
    };
    serde_json::to_string_pretty(&report).map_err(|e| {
        FontError::InvalidResponse(format!("Failed to serialize search results to JSON: {}", e))
    })
}

/// Generate shell completion script for the given shell
pub fn write_completions<W: Write>(shell: Shell, mut writer: W) -> Result<(), FontError> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    generate(shell, &mut command, bin_name.as_str(), &mut writer);

    Ok(())
}

/// Handle the search operation
pub async fn handle_search_command(
    services: &Services,
    request: &RunRequest,
) -> Result<Resolution, FontError> {
    let opts = &request.options;
    let show_spinner = opts.output.should_print() && !request.json;
    let resolution = resolve_with_spinner(services, request, show_spinner).await;
    log_verbose(
        opts,
        &format!(
            "Using {} results ({} variants)",
            resolution.source,
            resolution.variants.len()
        ),
    );

    if request.json {
        println!("{}", render_search_json(&resolution)?);
    } else {
        for (tone, line) in render_search_output(&resolution) {
            log_tone(opts, tone, &line);
        }
    }

    Ok(resolution)
}

/// What a download run did
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub downloaded: Vec<PathBuf>,
    /// Target paths a dry run would have written
    pub planned: Vec<PathBuf>,
    pub failed: Vec<(FontVariant, String)>,
    pub misses: Vec<CatalogMiss>,
}

/// Handle the download operation
pub async fn handle_download_command(
    services: &Services,
    request: &RunRequest,
) -> Result<DownloadSummary, FontError> {
    let opts = &request.options;
    let scope = request.scope();
    let resolution =
        resolve_with_spinner(services, request, opts.output.should_print()).await;

    let selected = filter_variants(&resolution.variants, resolution.source, &request.filter);
    log_verbose(
        opts,
        &format!(
            "{} of {} {} variants selected ({})",
            selected.len(),
            resolution.variants.len(),
            resolution.source,
            scope.description()
        ),
    );

    let mut summary = DownloadSummary {
        misses: resolution.misses.clone(),
        ..Default::default()
    };

    for variant in &selected {
        if opts.dry_run {
            match services.installer.variant_path(variant, scope) {
                Ok(target) => {
                    log_status(
                        opts,
                        &format!(
                            "DRY-RUN: would download {} -> {}",
                            variant.source_url,
                            target.display()
                        ),
                    );
                    summary.planned.push(target);
                }
                Err(e) => {
                    log_tone(
                        opts,
                        Tone::Error,
                        &format!("Error: could not plan font '{}': {}", variant.file_name(), e),
                    );
                    summary.failed.push((variant.clone(), e.to_string()));
                }
            }
            continue;
        }

        let bar = download_bar(opts.output.should_print(), variant);
        let progress_bar = bar.clone();
        let on_progress = move |done: u64, total: u64| {
            if total > 0 {
                progress_bar.set_length(total);
            }
            progress_bar.set_position(done);
        };

        match services
            .installer
            .download_variant(variant, scope, Some(&on_progress as &ProgressFn))
            .await
        {
            Ok(path) => {
                bar.finish();
                summary.downloaded.push(path);
            }
            Err(e) => {
                bar.abandon();
                log_tone(
                    opts,
                    Tone::Error,
                    &format!("Error: could not download font '{}': {}", variant.file_name(), e),
                );
                summary.failed.push((variant.clone(), e.to_string()));
            }
        }
    }

    if !opts.dry_run {
        if summary.downloaded.is_empty() {
            log_tone(opts, Tone::Warning, "No fonts downloaded");
        } else {
            log_tone(
                opts,
                Tone::Success,
                &format!("✅ Downloaded {} font file(s)", summary.downloaded.len()),
            );
        }
        if !summary.failed.is_empty() {
            log_tone(
                opts,
                Tone::Error,
                &format!("{} download(s) failed", summary.failed.len()),
            );
        }
    }

    for miss in &summary.misses {
        log_tone(opts, Tone::Error, &miss_line(miss));
    }

    Ok(summary)
}

/// Per-name result of a remove run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub name: String,
    pub removed: usize,
    /// Failures hit while removing; other files of the family were still tried
    pub errors: Vec<String>,
}

/// Summary line for one removal, if any is due.
///
/// A name that only produced errors has already been reported through them.
pub fn removal_message(outcome: &RemovalOutcome) -> Option<(Tone, String)> {
    if outcome.removed > 0 {
        Some((
            Tone::Success,
            format!("Removed {} font file(s) of '{}'", outcome.removed, outcome.name),
        ))
    } else if outcome.errors.is_empty() {
        Some((
            Tone::Error,
            format!(
                "Error: could not remove font '{}' (probably because it doesn't exist)",
                outcome.name
            ),
        ))
    } else {
        None
    }
}

/// Style tokens single-file removal looks for
const REMOVABLE_STYLES: [&str; 3] = ["regular", "italic", "bold"];

fn style_ignored(filter: &FilterOptions, token: &str) -> bool {
    match token {
        "regular" => filter.ignore_regular,
        "italic" => filter.ignore_italic,
        "bold" => filter.ignore_bold,
        _ => false,
    }
}

/// Handle the remove operation
pub fn handle_remove_command(request: &RunRequest, installer: &FontInstaller) -> Vec<RemovalOutcome> {
    let opts = &request.options;
    let scope = request.scope();
    let mut outcomes = Vec::new();

    for name in &request.items {
        if opts.dry_run {
            match installer.family_dir(name, scope) {
                Ok(dir) => log_status(
                    opts,
                    &format!(
                        "DRY-RUN: would remove '{}' from {} ({})",
                        name,
                        dir.display(),
                        scope.description()
                    ),
                ),
                Err(e) => log_tone(opts, Tone::Error, &format!("Error: {}", e)),
            }
            continue;
        }

        let (removed, errors) = if request.filter.any_ignored() {
            remove_single_styles(request, installer, name)
        } else {
            match installer.remove_family(name, scope) {
                Ok(count) => (count, Vec::new()),
                Err(e) => (0, vec![e]),
            }
        };

        for e in &errors {
            log_tone(opts, Tone::Error, &format!("Error: could not remove '{}': {}", name, e));
        }

        let outcome = RemovalOutcome {
            name: name.clone(),
            removed,
            errors: errors.iter().map(ToString::to_string).collect(),
        };
        if let Some((tone, message)) = removal_message(&outcome) {
            log_tone(opts, tone, &message);
        }
        outcomes.push(outcome);
    }

    outcomes
}

fn remove_single_styles(
    request: &RunRequest,
    installer: &FontInstaller,
    name: &str,
) -> (usize, Vec<FontError>) {
    let mut removed = 0;
    let mut errors = Vec::new();

    for token in REMOVABLE_STYLES {
        if style_ignored(&request.filter, token) {
            continue;
        }
        match installer.remove_variant(name, token, request.scope()) {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => errors.push(e),
        }
    }

    (removed, errors)
}
