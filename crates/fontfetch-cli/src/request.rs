//! Validated invocation built from parsed flags

use crate::args::Cli;
use crate::ops::OperationOptions;
use fontfetch_core::config::PrivilegeCheck;
use fontfetch_core::weights::parse_extra_weight;
use fontfetch_core::{normalize_family_name, FilterOptions, FontScope};
use thiserror::Error;

/// Operation selected by the mode flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Download,
    Remove,
}

/// Argument errors, each with its own exit code
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgError {
    #[error("fontfetch must run as root (e.g. sudo) to use --system")]
    SystemWithoutPrivilege,

    #[error("Only one operation can be used at a time")]
    MultipleModes,

    #[error("No operation specified (use -h for help)")]
    NoMode,

    #[error("No fonts specified (use -h for help)")]
    NoItems,

    #[error("--ignore supplied without a valid argument: '{0}'\nValid arguments are: regular, italic, bold")]
    InvalidIgnore(String),

    #[error("--{0} supplied without an argument")]
    MissingValue(&'static str),
}

impl ArgError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ArgError::SystemWithoutPrivilege => 99,
            ArgError::MultipleModes => 11,
            ArgError::NoMode => 12,
            ArgError::NoItems => 13,
            ArgError::InvalidIgnore(_) => 15,
            ArgError::MissingValue(_) => 16,
        }
    }
}

/// One invocation: built once from the command line, consumed once
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub mode: Mode,
    /// Normalized query strings, in command-line order
    pub items: Vec<String>,
    pub system_wide: bool,
    pub filter: FilterOptions,
    pub use_secondary_only: bool,
    pub json: bool,
    pub options: OperationOptions,
    /// Non-fatal notes about ignored input (e.g. unknown weights)
    pub warnings: Vec<String>,
}

impl RunRequest {
    pub fn from_cli(cli: &Cli, privilege: &dyn PrivilegeCheck) -> Result<Self, ArgError> {
        let mut warnings = Vec::new();
        let mut filter = FilterOptions::default();

        if let Some(value) = &cli.ignore {
            let value = value.as_deref().ok_or(ArgError::MissingValue("ignore"))?;
            apply_ignore_list(value, &mut filter)?;
        }

        if let Some(value) = &cli.attend {
            let value = value.as_deref().ok_or(ArgError::MissingValue("attend"))?;
            apply_attend_list(value, &mut filter, &mut warnings)?;
        }

        if cli.system && !privilege.is_privileged() {
            return Err(ArgError::SystemWithoutPrivilege);
        }

        // Repeating one flag counts as supplying several modes
        let supplied = u32::from(cli.download) + u32::from(cli.remove) + u32::from(cli.search);
        if supplied > 1 {
            return Err(ArgError::MultipleModes);
        }

        let selected = [
            (cli.download, Mode::Download),
            (cli.remove, Mode::Remove),
            (cli.search, Mode::Search),
        ]
        .into_iter()
        .find_map(|(count, mode)| (count > 0).then_some(mode));

        let items: Vec<String> = cli
            .fonts
            .iter()
            .map(|f| normalize_family_name(f.trim()))
            .filter(|f| !f.is_empty())
            .collect();

        if items.is_empty() {
            return Err(ArgError::NoItems);
        }

        let mode = selected.ok_or(ArgError::NoMode)?;

        Ok(Self {
            mode,
            items,
            system_wide: cli.system,
            filter,
            use_secondary_only: cli.no_google,
            json: cli.json,
            options: OperationOptions::new(cli.dry_run, cli.quiet, cli.verbose),
            warnings,
        })
    }

    pub fn scope(&self) -> FontScope {
        FontScope::from_system_flag(self.system_wide)
    }

    pub fn prefers_primary(&self) -> bool {
        !self.use_secondary_only
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn apply_ignore_list(value: &str, filter: &mut FilterOptions) -> Result<(), ArgError> {
    let entries = split_list(value);
    if entries.is_empty() {
        return Err(ArgError::MissingValue("ignore"));
    }

    for entry in entries {
        match entry.as_str() {
            "regular" => filter.ignore_regular = true,
            "italic" => filter.ignore_italic = true,
            "bold" => filter.ignore_bold = true,
            _ => return Err(ArgError::InvalidIgnore(entry)),
        }
    }
    Ok(())
}

fn apply_attend_list(
    value: &str,
    filter: &mut FilterOptions,
    warnings: &mut Vec<String>,
) -> Result<(), ArgError> {
    let entries = split_list(value);
    if entries.is_empty() {
        return Err(ArgError::MissingValue("attend"));
    }

    for entry in entries {
        match parse_extra_weight(&entry) {
            Some(weight) => {
                filter.attend_weights.insert(weight.to_string());
            }
            None => warnings.push(format!("Unknown weight '{entry}' ignored (see -h for valid weights)")),
        }
    }
    Ok(())
}
