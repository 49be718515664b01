// Ambient helpers: configuration, discovery, repository root and filesystem checks
pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ResolverConfig {
        pub program: Option<String>,
        pub args: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ScanConfig {
        pub jobs: Option<usize>,
        pub no_ignore: Option<bool>,
        pub root_patterns: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct OutputConfig {
        pub default_format: Option<String>, // "text" | "json"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub resolver: Option<ResolverConfig>,
        pub scan: Option<ScanConfig>,
        pub output: Option<OutputConfig>,
    }

    pub const CONFIG_FILE_NAME: &str = "adoc-relations.toml";

    #[must_use]
    pub fn default_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Load a config file. Unreadable or malformed files are reported and ignored.
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Cannot read config {}: {e}", path.display());
                return None;
            }
        };
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {e}", path.display());
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.is_file() {
            load_config_at(&p)
        } else {
            None
        }
    }
}

pub mod file_walker {
    use std::path::{Path, PathBuf};

    /// Extension of every document the tool considers, without the dot.
    pub const DOC_EXTENSION: &str = "adoc";

    /// Discover AsciiDoc files under `root`, with an option to bypass ignore rules.
    ///
    /// Hidden files and directories are included. Paths are canonicalized, sorted and deduplicated.
    #[must_use]
    pub fn adoc_files_with_options(root: &Path, no_ignore: bool) -> Vec<PathBuf> {
        let mut out = Vec::new();
        let mut walker = ignore::WalkBuilder::new(root);
        walker
            .follow_links(false)
            .hidden(false)
            .git_ignore(!no_ignore)
            .git_global(false)
            .git_exclude(false)
            .ignore(!no_ignore)
            .parents(true)
            // A scan outside a git checkout still honours its .gitignore
            .require_git(false)
            .filter_entry(|e| e.file_name() != ".git");
        for entry in walker.build().flatten() {
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension() != Some(std::ffi::OsStr::new(DOC_EXTENSION)) {
                continue;
            }
            out.push(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        }
        out.sort();
        out.dedup();
        out
    }
}

pub mod repo_root {
    use std::path::{Path, PathBuf};
    use std::process::Command;

    /// Top-level directory of the git repository containing `path`.
    ///
    /// Returns `None` when `path` is outside any repository, when it does not
    /// exist, or when git cannot be run. Absence is an expected outcome.
    #[must_use]
    pub fn locate(path: &Path) -> Option<PathBuf> {
        let abs = path.canonicalize().ok()?;
        let dir = if abs.is_dir() { abs } else { abs.parent()?.to_path_buf() };
        let output = Command::new("git")
            .arg("-C")
            .arg(&dir)
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .map_err(|e| log::debug!("git rev-parse failed to start: {e}"))
            .ok()?;
        if !output.status.success() {
            log::debug!(
                "{} is not inside a git repository: {}",
                dir.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }
        let s = String::from_utf8_lossy(&output.stdout);
        let top = s.trim();
        if top.is_empty() {
            return None;
        }
        let top = PathBuf::from(top);
        Some(top.canonicalize().unwrap_or(top))
    }
}

pub mod path_check {
    use crate::errors::RelationsError;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    /// Validate a document argument: it must exist, be readable and be a regular file.
    ///
    /// Checks run in that order so each failure maps to its own exit code.
    /// Returns the canonical path on success.
    ///
    /// # Errors
    /// `NotFound`, `PermissionDenied` or `NotRegularFile`.
    pub fn ensure_document(path: &Path) -> Result<PathBuf, RelationsError> {
        let meta = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(RelationsError::PermissionDenied(path.to_path_buf()))
            }
            Err(_) => return Err(RelationsError::NotFound(path.to_path_buf())),
        };
        // Opening a fifo or device would block or have side effects; those are
        // rejected below as non-regular without a read probe.
        let readable = if meta.is_file() {
            fs::File::open(path).map(|_| ())
        } else if meta.is_dir() {
            fs::read_dir(path).map(|_| ())
        } else {
            Ok(())
        };
        if let Err(e) = readable {
            return Err(if e.kind() == ErrorKind::PermissionDenied {
                RelationsError::PermissionDenied(path.to_path_buf())
            } else {
                RelationsError::Io(e)
            });
        }
        if !meta.is_file() {
            return Err(RelationsError::NotRegularFile(path.to_path_buf()));
        }
        Ok(path.canonicalize()?)
    }
}

pub mod dependency {
    use crate::errors::RelationsError;
    use std::path::{Path, PathBuf};

    /// Locate an executable by explicit path or by searching `PATH`.
    #[must_use]
    pub fn find_program(program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }
        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths).map(|dir| dir.join(program)).find(|p| is_executable(p))
    }

    #[cfg(unix)]
    fn is_executable(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    }

    #[cfg(not(unix))]
    fn is_executable(path: &Path) -> bool {
        path.is_file()
    }

    /// # Errors
    /// `MissingDependency` naming the first program that cannot be found.
    pub fn require(programs: &[&str]) -> Result<(), RelationsError> {
        for p in programs {
            if find_program(p).is_none() {
                return Err(RelationsError::MissingDependency((*p).to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn ensure_document_reports_missing_then_non_regular() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.adoc");
        let err = path_check::ensure_document(&missing).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = path_check::ensure_document(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 21);

        let ok = dir.path().join("ok.adoc");
        fs::write(&ok, "= Title\n").unwrap();
        let canon = path_check::ensure_document(&ok).unwrap();
        assert!(canon.is_absolute());
        assert!(canon.ends_with("ok.adoc"));
    }

    #[test]
    fn adoc_walker_filters_extension_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/two.adoc"), "").unwrap();
        fs::write(root.join("one.adoc"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = file_walker::adoc_files_with_options(root, false);
        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|w| w[0] < w[1]));
        assert!(files.iter().all(|p| p.extension().is_some_and(|e| e == "adoc")));
    }

    #[test]
    fn adoc_walker_includes_hidden_files_and_directories() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join(".drafts")).unwrap();
        fs::write(root.join(".drafts/lost.adoc"), "").unwrap();
        fs::write(root.join(".hidden_topic.adoc"), "").unwrap();
        fs::write(root.join("visible.adoc"), "").unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/stray.adoc"), "").unwrap();

        let want = vec![
            root.join(".drafts/lost.adoc"),
            root.join(".hidden_topic.adoc"),
            root.join("visible.adoc"),
        ];
        assert_eq!(file_walker::adoc_files_with_options(&root, false), want);
        assert_eq!(file_walker::adoc_files_with_options(&root, true), want);
    }

    #[test]
    fn adoc_walker_respects_ignore_files_unless_bypassed() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("build/generated.adoc"), "").unwrap();
        fs::write(root.join("kept.adoc"), "").unwrap();
        fs::write(root.join(".ignore"), "build/\n").unwrap();

        assert_eq!(file_walker::adoc_files_with_options(&root, false), vec![root.join("kept.adoc")]);
        assert_eq!(file_walker::adoc_files_with_options(&root, true).len(), 2);
    }

    #[test]
    fn find_program_accepts_explicit_paths() {
        let dir = tempdir().unwrap();
        let prog = dir.path().join("resolver.sh");
        fs::write(&prog, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&prog, fs::Permissions::from_mode(0o755)).unwrap();
        }
        assert_eq!(dependency::find_program(prog.to_str().unwrap()), Some(prog.clone()));
        assert!(dependency::find_program("/definitely/not/here/resolver").is_none());
        assert!(dependency::require(&["/definitely/not/here/resolver"]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn find_program_rejects_non_executable_files() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let prog = dir.path().join("ruby");
        fs::write(&prog, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&prog, fs::Permissions::from_mode(0o644)).unwrap();
        let path = prog.to_str().unwrap();
        assert!(dependency::find_program(path).is_none());
        assert_eq!(dependency::require(&[path]).unwrap_err().exit_code(), 1);
    }
}
