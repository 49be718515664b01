//! Include extraction.
//!
//! Resolving AsciiDoc include directives is delegated to an external
//! processor. The [`IncludeResolver`] trait is the seam: the default
//! [`AsciidoctorResolver`] shells out to Ruby + Asciidoctor, tests plug in
//! canned resolvers.
use crate::errors::ResolveError;
use crate::utils::file_walker::DOC_EXTENSION;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Ruby program printing every include target Asciidoctor resolved for `ARGV[0]`.
pub const ASCIIDOCTOR_SCRIPT: &str = r"require 'asciidoctor'
doc = Asciidoctor.load_file(ARGV[0], safe: :safe, standalone: true, catalog_assets: true)
doc.catalog[:includes].each_key { |target| puts target }";

/// Default program used to run [`ASCIIDOCTOR_SCRIPT`].
pub const DEFAULT_PROGRAM: &str = "ruby";

/// Resolves the include directives of one document.
pub trait IncludeResolver: Send + Sync {
    /// Absolute paths of the documents included by `file`, in resolution order.
    ///
    /// # Errors
    /// Any failure of the underlying resolver.
    fn resolve(&self, file: &Path) -> Result<Vec<PathBuf>, ResolveError>;

    /// External program this resolver needs, if any.
    fn program(&self) -> Option<&str> {
        None
    }
}

/// Resolver backed by an external command printing one include target per line.
///
/// The command is `program args... file`. Each printed target `T` maps to
/// `dir(file)/T.adoc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciidoctorResolver {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for AsciidoctorResolver {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec!["-e".to_string(), ASCIIDOCTOR_SCRIPT.to_string(), "--".to_string()],
        }
    }
}

impl AsciidoctorResolver {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Shell-like rendering of the command, for diagnostics.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|a| {
            if a.contains(char::is_whitespace) {
                format!("'{}'", a.replace('\n', "; "))
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }
}

impl IncludeResolver for AsciidoctorResolver {
    fn resolve(&self, file: &Path) -> Result<Vec<PathBuf>, ResolveError> {
        log::debug!("resolving includes of {}", file.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .output()
            .map_err(|source| ResolveError::Spawn { program: self.program.clone(), source })?;
        if !output.status.success() {
            return Err(ResolveError::Failed {
                program: self.program.clone(),
                file: file.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| ResolveError::InvalidUtf8 { file: file.to_path_buf() })?;
        let base = file.parent().unwrap_or_else(|| Path::new("."));
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|target| include_target_path(base, target))
            .collect())
    }

    fn program(&self) -> Option<&str> {
        Some(&self.program)
    }
}

/// Absolute path for include target `target` written in a document living in `base`.
///
/// Canonical when the file exists; otherwise the joined path as is.
#[must_use]
pub fn include_target_path(base: &Path, target: &str) -> PathBuf {
    let joined = base.join(format!("{target}.{DOC_EXTENSION}"));
    joined.canonicalize().unwrap_or(joined)
}

/// Run `resolver` on `file`, treating any resolver failure as "no includes".
#[must_use]
pub fn extract_includes(resolver: &dyn IncludeResolver, file: &Path) -> Vec<PathBuf> {
    match resolver.resolve(file) {
        Ok(paths) => paths,
        Err(e) => {
            log::debug!("no includes recorded for {}: {e}", file.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    struct Failing;

    impl IncludeResolver for Failing {
        fn resolve(&self, file: &Path) -> Result<Vec<PathBuf>, ResolveError> {
            Err(ResolveError::InvalidUtf8 { file: file.to_path_buf() })
        }
    }

    #[test]
    fn target_paths_get_extension_and_canonical_form() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("topics")).unwrap();
        fs::write(root.join("topics/intro.adoc"), "").unwrap();

        let p = include_target_path(&root.join("topics/../"), "topics/intro");
        assert_eq!(p, root.join("topics/intro.adoc"));

        // Missing targets keep their joined form
        let m = include_target_path(&root, "nope");
        assert_eq!(m, root.join("nope.adoc"));
    }

    #[test]
    fn resolver_failures_become_empty_lists() {
        assert!(extract_includes(&Failing, Path::new("/x/master.adoc")).is_empty());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let r = AsciidoctorResolver::new("/definitely/not/a/resolver", vec![]);
        let err = r.resolve(Path::new("/x/master.adoc")).unwrap_err();
        assert!(matches!(err, ResolveError::Spawn { .. }));
        assert!(extract_includes(&r, Path::new("/x/master.adoc")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn command_output_lines_map_to_sibling_documents() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let master = root.join("master.adoc");
        fs::write(&master, "").unwrap();
        fs::write(root.join("intro.adoc"), "").unwrap();

        // `sh -c 'script' sh <file>`: the file is $1 and ignored
        let r = AsciidoctorResolver::new(
            "sh",
            vec!["-c".into(), "printf 'intro\\n\\nmodules/a\\n'".into(), "sh".into()],
        );
        let got = r.resolve(&master).unwrap();
        assert_eq!(got, vec![root.join("intro.adoc"), root.join("modules/a.adoc")]);
    }

    #[test]
    fn default_command_runs_asciidoctor_in_safe_mode() {
        let r = AsciidoctorResolver::default();
        assert_eq!(r.program(), Some("ruby"));
        assert!(r.args.iter().any(|a| a.contains("safe: :safe")));
        assert!(r.command_line().starts_with("ruby -e "));
    }
}
