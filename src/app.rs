use crate::cli::{Cli, Commands, MatchArg, OutputFormat};
use crate::errors::RelationsError;
use crate::graph::IncludeGraph;
use crate::parser::IncludeResolver;
use crate::query::{ChildrenQuery, MatchMode, OrphansQuery, ParentsQuery, Query};
use crate::report::Report;
use crate::settings::{Settings, PROGRAM_NAME};
use crate::utils::{dependency, path_check, repo_root};
use clap::error::ErrorKind;
use clap::CommandFactory;
use clap_complete::generate;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Parse `args` and run the command. Returns the process exit code.
///
/// Help and version requests exit 0; every other usage error exits 22.
#[must_use]
pub fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match crate::cli::try_parse_from(args) {
        Ok(cli) => run_cli(cli),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                0
            }
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = e.print();
                22
            }
            _ => {
                eprintln!("{PROGRAM_NAME}: {}", usage_error_line(&e.to_string()));
                22
            }
        },
    }
}

/// Fold clap's rendered error into one line, dropping the usage block and help hint.
fn usage_error_line(rendered: &str) -> String {
    rendered
        .trim_start_matches("error: ")
        .lines()
        .take_while(|l| !l.trim().is_empty() && !l.starts_with("Usage:"))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    init_logging(cli.verbose, cli.quiet);
    let settings = match Settings::from_cli(&cli) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };
    let resolver = settings.resolver.clone();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(&cli.command, &settings, &resolver, &mut out) {
        Ok(()) => 0,
        Err(e) => report_error(&e),
    }
}

fn report_error(e: &RelationsError) -> i32 {
    eprintln!("{PROGRAM_NAME}: {e}");
    e.exit_code()
}

/// Log records go to stderr as `adoc-relations: <level>: <message>`.
///
/// `ADOC_RELATIONS_LOG` overrides the level derived from the flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::new().filter_or("ADOC_RELATIONS_LOG", level),
    )
    .target(env_logger::Target::Stderr)
    .format(|buf, record| {
        writeln!(
            buf,
            "{PROGRAM_NAME}: {}: {}",
            record.level().as_str().to_ascii_lowercase(),
            record.args()
        )
    })
    .try_init();
}

/// Execute one command, writing results to `out`.
///
/// # Errors
/// Any fatal condition; the caller maps it to an exit code.
pub fn execute(
    command: &Commands,
    settings: &Settings,
    resolver: &dyn IncludeResolver,
    out: &mut dyn Write,
) -> Result<(), RelationsError> {
    match command {
        Commands::Children { file } => {
            let file = path_check::ensure_document(&settings.absolute(file))?;
            require_tools(resolver)?;
            let graph = IncludeGraph::build(vec![file.clone()], resolver, settings.build)?;
            let results = ChildrenQuery::new(&file).run(&graph);
            let scope = repo_root::locate(&file).unwrap_or_else(|| settings.cwd.clone());
            write_report(out, settings, Report::new(&file, &scope, &results))
        }
        Commands::Parents { file: arg, match_mode } => {
            let file = path_check::ensure_document(&settings.absolute(arg))?;
            require_tools(resolver)?;
            let repo =
                repo_root::locate(&file).ok_or_else(|| RelationsError::NotInRepository(file.clone()))?;
            log::info!("searching root documents under {}", repo.display());
            let graph = IncludeGraph::build_for_scope(&repo, &settings.roots, resolver, settings.build)?;
            let mode = match match_mode {
                MatchArg::Exact => MatchMode::Exact,
                MatchArg::Substring => MatchMode::Substring,
            };
            let results =
                ParentsQuery::new(&file).with_mode(mode, &arg.to_string_lossy()).run(&graph);
            write_report(out, settings, Report::new(&file, &repo, &results))
        }
        Commands::Orphans => {
            require_tools(resolver)?;
            let scope = orphan_scope(&settings.cwd);
            let graph = IncludeGraph::build_for_scope(&scope, &settings.roots, resolver, settings.build)?;
            let results = OrphansQuery::new().run(&graph);
            write_report(out, settings, Report::new(&scope, &scope, &results))
        }
        Commands::Version => {
            writeln!(out, "{} {}", settings.name, settings.version)?;
            Ok(())
        }
        Commands::Debug => write_debug(out, settings),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, PROGRAM_NAME, out);
            Ok(())
        }
    }
}

/// Repository containing `cwd`, or `cwd` itself with a warning.
fn orphan_scope(cwd: &Path) -> PathBuf {
    if let Some(repo) = repo_root::locate(cwd) {
        log::info!("searching documents under {}", repo.display());
        return repo;
    }
    log::warn!(
        "{} is not inside a git repository; searching the current directory instead",
        cwd.display()
    );
    cwd.to_path_buf()
}

fn require_tools(resolver: &dyn IncludeResolver) -> Result<(), RelationsError> {
    match resolver.program() {
        Some(program) => dependency::require(&["git", program]),
        None => dependency::require(&["git"]),
    }
}

fn write_report(out: &mut dyn Write, settings: &Settings, report: Report) -> Result<(), RelationsError> {
    let report = match &settings.header {
        Some(h) => report.with_header(h.clone()),
        None => report,
    };
    match settings.format {
        OutputFormat::Json => writeln!(out, "{}", report.render_json()?)?,
        OutputFormat::Text if settings.quiet => {
            if !report.results.is_empty() {
                writeln!(out, "{}", report.render_quiet())?;
            }
        }
        OutputFormat::Text => writeln!(out, "{}", report.render_text())?,
    }
    Ok(())
}

fn write_debug(out: &mut dyn Write, settings: &Settings) -> Result<(), RelationsError> {
    let found = |program: &str| match dependency::find_program(program) {
        Some(p) => format!("found at {}", p.display()),
        None => "NOT FOUND".to_string(),
    };
    let repo = repo_root::locate(&settings.cwd);
    writeln!(out, "{} {}", settings.name, settings.version)?;
    writeln!(out, "working directory: {}", settings.cwd.display())?;
    writeln!(
        out,
        "repository root: {}",
        repo.as_ref().map_or_else(|| "<none>".to_string(), |r| r.display().to_string())
    )?;
    writeln!(
        out,
        "config file: {}",
        settings
            .config_path
            .as_ref()
            .map_or_else(|| "<none>".to_string(), |p| p.display().to_string())
    )?;
    writeln!(out, "git: {}", found("git"))?;
    writeln!(
        out,
        "resolver: {} ({})",
        settings.resolver.command_line(),
        found(&settings.resolver.program)
    )?;
    writeln!(
        out,
        "jobs: {}",
        settings.build.jobs.map_or_else(|| "one per CPU".to_string(), |n| n.to_string())
    )?;
    writeln!(out, "root patterns: {}", settings.roots.patterns().join(", "))?;
    writeln!(
        out,
        "ignore rules: {}",
        if settings.build.no_ignore { "bypassed" } else { "respected" }
    )?;
    Ok(())
}
