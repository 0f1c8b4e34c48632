use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use clap_complete::Shell;

const EXTRA_HELP: &str = "\
extra weights (--attend):
    thin          (100)
    extralight    (200)
    light         (300)
    medium        (500)
    semibold      (600)
    extrabold     (800)
    black|heavy   (900)

variants (--ignore):
    regular
    italic
    bold";

/// Font download manager for Google Fonts and Font Squirrel
#[derive(Parser, Debug)]
#[command(name = "fontfetch")]
#[command(about = "Search, download and remove fonts from Google Fonts and Font Squirrel", long_about = None)]
#[command(version)]
#[command(after_help = EXTRA_HELP)]
pub struct Cli {
    #[arg(short = 'S', action = ArgAction::Count, help = "Download font(s)")]
    pub download: u8,

    #[arg(short = 'R', action = ArgAction::Count, help = "Remove installed font(s)")]
    pub remove: u8,

    #[arg(short = 'Q', action = ArgAction::Count, help = "Search for font(s)")]
    pub search: u8,

    #[arg(long, help = "Use system-wide font directories (requires root)")]
    pub system: bool,

    #[arg(long = "no-google", help = "Do not use Google Fonts (also -ng)")]
    pub no_google: bool,

    #[arg(
        long,
        value_name = "VARIANT[,VARIANT]",
        help = "Ignore font variant(s): regular, italic, bold (Google Fonts only)"
    )]
    pub ignore: Option<Option<String>>,

    #[arg(
        long,
        value_name = "WEIGHT[,WEIGHT]",
        help = "Download extra font weight(s) (Google Fonts only)"
    )]
    pub attend: Option<Option<String>>,

    #[arg(long, help = "Print intended actions without touching font directories")]
    pub dry_run: bool,

    #[arg(long, help = "Silence routine status output", conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(long, help = "Show verbose status messages", conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(long, help = "Output search results as JSON")]
    pub json: bool,

    #[arg(long, value_enum, value_name = "SHELL", help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,

    /// Font names to search for, download or remove
    #[arg(value_name = "FONT")]
    pub fonts: Vec<String>,
}

/// Rewrite legacy spellings clap cannot express (the two-letter `-ng`).
pub fn normalize_legacy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| if arg == "-ng" { "--no-google".to_string() } else { arg })
        .collect()
}

/// Map clap error kinds to exit codes (0 for help/version, 1 for other errors)
pub fn exit_code_for_clap_error(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
