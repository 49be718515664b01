use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "adoc-relations",
    version,
    about = "Explore include relationships between AsciiDoc documents",
    long_about = "List the documents a file includes (children), the root documents that include a file (parents), and documents no root document includes (orphans). Root documents are master.adoc and assembly_*.adoc. Includes are resolved by Asciidoctor (via ruby); the repository root is found with git. Discovery respects .gitignore and .ignore; use --no-ignore to bypass them."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Print result paths only, without header and footer
    #[arg(short, long, default_value_t = false, global = true)]
    pub quiet: bool,
    /// Run as if started in DIR
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,
    /// Path to a TOML configuration file (default: adoc-relations.toml at the repository root)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
    /// Include resolver program, called with the document path as last argument
    #[arg(long, value_name = "PROGRAM", env = "ADOC_RELATIONS_RESOLVER", global = true)]
    pub resolver: Option<String>,
    /// Maximum number of resolver processes running at once
    #[arg(short, long, value_name = "N", global = true)]
    pub jobs: Option<NonZeroUsize>,
    /// Bypass ignore rules (.gitignore/.ignore) when discovering documents
    #[arg(long, default_value_t = false, global = true)]
    pub no_ignore: bool,
    /// Output format (default: text, or output.default_format from the config)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,
    /// Replace the "Displaying results for" header line
    #[arg(long, value_name = "TEXT", global = true)]
    pub header: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the documents included by FILE
    Children {
        /// The document to inspect
        file: PathBuf,
    },
    /// List the root documents that include FILE
    Parents {
        /// The document to look up
        file: PathBuf,
        /// How include paths are compared with FILE
        #[arg(long = "match", value_enum, default_value_t = MatchArg::Exact)]
        match_mode: MatchArg,
    },
    /// List documents that no root document includes
    Orphans,
    /// Print version information
    Version,
    /// Print environment, dependency and configuration diagnostics
    Debug,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchArg {
    /// Canonical path equality
    Exact,
    /// Literal FILE text anywhere in the include path (legacy behaviour)
    Substring,
}

/// Parse arguments without exiting the process on error.
///
/// # Errors
/// Returns the clap error, including help and version display requests.
pub fn try_parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parents_defaults_to_exact_matching() {
        let cli = try_parse_from(["adoc-relations", "parents", "a.adoc"]).unwrap();
        match cli.command {
            Commands::Parents { file, match_mode } => {
                assert_eq!(file, PathBuf::from("a.adoc"));
                assert_eq!(match_mode, MatchArg::Exact);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = try_parse_from(["adoc-relations", "orphans", "-vv", "-j", "3", "--format", "json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.jobs.map(NonZeroUsize::get), Some(3));
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn extra_arguments_and_zero_jobs_are_rejected() {
        assert!(try_parse_from(["adoc-relations", "children", "a.adoc", "b.adoc"]).is_err());
        assert!(try_parse_from(["adoc-relations", "children"]).is_err());
        assert!(try_parse_from(["adoc-relations", "-j", "0", "orphans"]).is_err());
    }
}
