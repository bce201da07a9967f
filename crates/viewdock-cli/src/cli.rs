use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use viewdock::core::models::format::SourceFormat;
use viewdock::engine::config::SwissDockMode;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ViewDock CLI - Read, rank and export the results of molecular docking programs (AutoDock Vina, SwissDock, pyDock, XYZ).",
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

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S export.precision=8
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a docking result file and print its poses as a ranked table.
    Load(LoadArgs),
    /// Load a docking result file and write its scores as delimited text.
    Export(ExportArgs),
    /// Write the structure of one pose to a file.
    Extract(ExtractArgs),
}

/// Options shared by every command that reads a docking result file.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Docking result file (.pdbqt, .dock4, .chimerax, .ene, .eneRST, .xyz).
    #[arg(required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Name of the loaded object. Defaults to the file name up to its first '.'.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Skip detection and read the input as this format
    /// (vina, swissdock, chimerax-legacy, pydock, xyz).
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub input_format: Option<SourceFormat>,

    /// Maximum number of pyDock rows to keep.
    #[arg(long, value_name = "INT")]
    pub max_n: Option<usize>,

    /// How clustered SwissDock results are loaded (all, leaders, split).
    #[arg(short = 'm', long, value_name = "MODE")]
    pub swissdock_mode: Option<SwissDockMode>,
}

/// Ordering applied to the loaded poses before they are printed or written.
#[derive(Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Score field to sort by (e.g. 'Affinity', 'deltaG', 'Total').
    #[arg(short, long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort in descending order instead of ascending.
    #[arg(short, long, requires = "sort")]
    pub descending: bool,
}

/// Arguments for the `load` subcommand.
#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Print only the first N rows of every object.
    #[arg(short, long, value_name = "INT")]
    pub top: Option<usize>,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Path of the delimited text file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Output format (csv or txt). Guessed from the output suffix when omitted.
    #[arg(long, value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// Decimal places written for real-valued scores (6 to 17).
    #[arg(short, long, value_name = "INT")]
    pub precision: Option<usize>,

    /// Text written for scores a pose does not carry.
    #[arg(long, value_name = "TEXT")]
    pub sentinel: Option<String>,

    /// Comma-separated list of score fields to write, in order.
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Id of the pose to extract (1-based, in file order).
    #[arg(short, long, required = true, value_name = "ID")]
    pub id: u32,

    /// Object to extract from when the input was split into several objects.
    #[arg(long, value_name = "NAME")]
    pub object: Option<String>,

    /// Path of the structure file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_arguments_are_parsed() {
        let cli = Cli::parse_from([
            "viewdock", "-vv", "load", "run.pdbqt", "--sort", "Affinity", "-d", "--top", "5",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Load(args) = cli.command else {
            panic!("Expected 'load' subcommand");
        };
        assert_eq!(args.input.input, PathBuf::from("run.pdbqt"));
        assert_eq!(args.sort.sort.as_deref(), Some("Affinity"));
        assert!(args.sort.descending);
        assert_eq!(args.top, Some(5));
    }

    #[test]
    fn input_format_and_mode_use_library_parsers() {
        let cli = Cli::parse_from([
            "viewdock", "load", "clusters.pdb", "-f", "swissdock", "-m", "split",
        ]);
        let Commands::Load(args) = cli.command else {
            panic!("Expected 'load' subcommand");
        };
        assert_eq!(args.input.input_format, Some(SourceFormat::SwissDock));
        assert_eq!(args.input.swissdock_mode, Some(SwissDockMode::Split));
    }

    #[test]
    fn export_fields_are_comma_separated() {
        let cli = Cli::parse_from([
            "viewdock", "export", "dock.ene", "-o", "out.csv", "--fields", "Conf,Total", "-S",
            "export.precision=8",
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("Expected 'export' subcommand");
        };
        assert_eq!(
            args.fields,
            Some(vec!["Conf".to_string(), "Total".to_string()])
        );
        assert_eq!(cli.set_values, vec!["export.precision=8".to_string()]);
    }

    #[test]
    fn descending_requires_sort_field() {
        let result = Cli::try_parse_from(["viewdock", "load", "run.pdbqt", "-d"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["viewdock", "-q", "-v", "load", "run.pdbqt"]);
        assert!(result.is_err());
    }
}
