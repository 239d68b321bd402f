use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ZincSight Explorer CLI - browse zinc-binding site predictions and inspect them in 3D.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `zincsight.toml` in the user configuration directory, if present.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S table.page-size=25
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List prediction records with column filters, sorting and pagination.
    Table(TableArgs),
    /// List the distinct ligand residue signatures present in the table.
    Residues(SourceArgs),
    /// Annotate a record's structure with its predicted zinc ion and focus on it.
    View(ViewArgs),
    /// Show or change the light/dark theme preference.
    Theme(ThemeArgs),
}

/// Where the prediction table is read from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Prediction table as a local path or an http(s) URL. Overrides `data.source`.
    #[arg(short, long, value_name = "PATH_OR_URL")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SecondaryArg {
    Catalytic,
    NotCatalytic,
}

impl SecondaryArg {
    pub fn is_catalytic(self) -> bool {
        matches!(self, Self::Catalytic)
    }
}

/// Arguments for the `table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    // --- Filters ---
    /// Show only rows of this structure identifier (exact, case-insensitive).
    #[arg(long, value_name = "ID")]
    pub structure_id: Option<String>,

    /// Show only rows with this ligand residue signature. Can be repeated.
    #[arg(short = 'r', long = "residues", value_name = "SIGNATURE")]
    pub residue_types: Vec<String>,

    /// Show only rows whose probability is at least this value (0-100).
    #[arg(short = 'p', long, value_name = "PERCENT")]
    pub min_probability: Option<f64>,

    /// Show only rows with this secondary prediction. Can be repeated.
    #[arg(long, value_enum, value_name = "CLASS")]
    pub secondary: Vec<SecondaryArg>,

    // --- Sorting and paging ---
    /// Column to sort by: structure-id, residues, probability or secondary.
    #[arg(short, long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort order: asc or desc.
    #[arg(long, value_name = "ORDER", default_value = "asc", requires = "sort")]
    pub order: String,

    /// 1-based page number.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Rows per page. Overrides `table.page-size`.
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Print every matching row on a single page.
    #[arg(long, conflicts_with_all = ["page", "page_size"])]
    pub all: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `view` subcommand.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Record key, `{structure-id}.{site-residue-sequence}` (e.g. P12345.301).
    #[arg(required = true, value_name = "KEY")]
    pub key: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Read structures from `{DIR}/{id}.pdb` instead of downloading them.
    #[arg(long, value_name = "DIR", conflicts_with = "url_template")]
    pub structure_dir: Option<PathBuf>,

    /// Structure URL template containing `{id}`. Overrides `structure.url-template`.
    #[arg(long, value_name = "TEMPLATE")]
    pub url_template: Option<String>,

    /// Structure download timeout in seconds. Overrides `structure.timeout-secs`.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Write the annotated structure to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `theme` subcommand.
#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show the active theme and where it comes from.
    Get,
    /// Store a theme preference.
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Switch between light and dark and store the result.
    Toggle,
    /// Forget the stored preference and follow the system setting again.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_arguments_parse() {
        let cli = Cli::parse_from([
            "zincsight",
            "-vv",
            "table",
            "--data",
            "https://example.org/data.csv",
            "-r",
            "CCHH",
            "-r",
            "CHHIISSSY",
            "--min-probability",
            "50",
            "--secondary",
            "not-catalytic",
            "--sort",
            "probability",
            "--order",
            "desc",
            "--format",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Table(args) = cli.command else {
            panic!("expected table command");
        };
        assert_eq!(args.source.data.as_deref(), Some("https://example.org/data.csv"));
        assert_eq!(args.residue_types, vec!["CCHH", "CHHIISSSY"]);
        assert_eq!(args.min_probability, Some(50.0));
        assert_eq!(args.secondary, vec![SecondaryArg::NotCatalytic]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.page, 1);
    }

    #[test]
    fn global_set_values_are_collected_after_subcommand() {
        let cli = Cli::parse_from([
            "zincsight",
            "view",
            "P12345.301",
            "-S",
            "structure.timeout-secs=5",
            "-S",
            "table.page-size=20",
        ]);
        assert_eq!(
            cli.set_values,
            vec!["structure.timeout-secs=5", "table.page-size=20"]
        );
    }

    #[test]
    fn structure_dir_conflicts_with_url_template() {
        let result = Cli::try_parse_from([
            "zincsight",
            "view",
            "P1.1",
            "--structure-dir",
            "/tmp",
            "--url-template",
            "https://x/{id}.pdb",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn theme_set_requires_known_value() {
        assert!(Cli::try_parse_from(["zincsight", "theme", "set", "sepia"]).is_err());
        let cli = Cli::parse_from(["zincsight", "theme", "set", "dark"]);
        assert!(matches!(
            cli.command,
            Commands::Theme(ThemeArgs {
                command: ThemeCommands::Set {
                    theme: ThemeArg::Dark
                }
            })
        ));
    }
}
