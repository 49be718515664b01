//! Immutable run settings assembled from flags, environment and config file.
use crate::cli::{Cli, OutputFormat};
use crate::errors::RelationsError;
use crate::graph::{BuildOptions, RootMatcher};
use crate::parser::AsciidoctorResolver;
use crate::utils::config::{self, Config};
use crate::utils::repo_root;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub const PROGRAM_NAME: &str = "adoc-relations";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct Settings {
    pub name: &'static str,
    pub version: &'static str,
    /// Canonical working directory (`-C` or the process cwd).
    pub cwd: PathBuf,
    /// Config file actually loaded, if any.
    pub config_path: Option<PathBuf>,
    pub resolver: AsciidoctorResolver,
    pub build: BuildOptions,
    pub roots: RootMatcher,
    pub format: OutputFormat,
    pub quiet: bool,
    pub header: Option<String>,
}

impl Settings {
    /// Resolve settings with precedence flag/env > config file > default.
    ///
    /// # Errors
    /// `InvalidArguments` when the working directory is unusable,
    /// `RootPattern` when a configured root pattern does not compile.
    pub fn from_cli(cli: &Cli) -> Result<Self, RelationsError> {
        let cwd = working_directory(cli.directory.as_deref())?;

        let (cfg, config_path) = match cli.config.as_ref() {
            Some(p) => {
                let p = if p.is_absolute() { p.clone() } else { cwd.join(p) };
                (config::load_config_at(&p), Some(p))
            }
            None => {
                let near = repo_root::locate(&cwd).unwrap_or_else(|| cwd.clone());
                let p = config::default_config_path(&near);
                (config::load_config_near(&near), Some(p))
            }
        };
        let config_path = if cfg.is_some() { config_path } else { None };
        let cfg = cfg.unwrap_or_default();
        Self::from_parts(cli, cwd, cfg, config_path)
    }

    /// Combine already-loaded pieces; used by `from_cli` and by tests.
    ///
    /// # Errors
    /// `RootPattern` when a configured root pattern does not compile.
    pub fn from_parts(
        cli: &Cli,
        cwd: PathBuf,
        cfg: Config,
        config_path: Option<PathBuf>,
    ) -> Result<Self, RelationsError> {
        let resolver_cfg = cfg.resolver.unwrap_or_default();
        let resolver = match cli.resolver.clone().or(resolver_cfg.program) {
            Some(program) => AsciidoctorResolver::new(program, resolver_cfg.args.unwrap_or_default()),
            None => match resolver_cfg.args {
                Some(args) => AsciidoctorResolver { args, ..AsciidoctorResolver::default() },
                None => AsciidoctorResolver::default(),
            },
        };

        let scan = cfg.scan.unwrap_or_default();
        if scan.jobs == Some(0) {
            log::warn!("scan.jobs must be at least 1, using one worker per CPU");
        }
        let build = BuildOptions {
            jobs: cli.jobs.or_else(|| scan.jobs.and_then(NonZeroUsize::new)),
            no_ignore: cli.no_ignore || scan.no_ignore.unwrap_or(false),
        };
        let roots = match scan.root_patterns {
            Some(patterns) if !patterns.is_empty() => RootMatcher::new(patterns.as_slice())?,
            _ => RootMatcher::default(),
        };

        let format = cli.format.unwrap_or_else(|| {
            match cfg.output.and_then(|o| o.default_format).as_deref() {
                Some("json") => OutputFormat::Json,
                Some("text") | None => OutputFormat::Text,
                Some(other) => {
                    log::warn!("Unknown output.default_format '{other}', using text");
                    OutputFormat::Text
                }
            }
        });

        Ok(Self {
            name: PROGRAM_NAME,
            version: VERSION,
            cwd,
            config_path,
            resolver,
            build,
            roots,
            format,
            quiet: cli.quiet,
            header: cli.header.clone(),
        })
    }

    /// `path` made absolute against the working directory.
    #[must_use]
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

fn working_directory(dir: Option<&Path>) -> Result<PathBuf, RelationsError> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(RelationsError::InvalidArguments(format!(
            "{}: not a directory",
            dir.display()
        )));
    }
    Ok(dir.canonicalize()?)
}
