//! Root document recognition.
use crate::errors::RelationsError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// File name of the top-level document of a book.
pub const MASTER_DOCUMENT: &str = "master.adoc";

/// File name patterns of root documents unless configured otherwise.
pub const DEFAULT_ROOT_PATTERNS: [&str; 2] = [MASTER_DOCUMENT, "assembly_*.adoc"];

/// Matches root documents by file name against a set of glob patterns.
#[derive(Debug, Clone)]
pub struct RootMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl RootMatcher {
    /// Compile `patterns`; each is matched against the file name only.
    ///
    /// # Errors
    /// `RelationsError::RootPattern` for the first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RelationsError> {
        let mut builder = GlobSetBuilder::new();
        for p in patterns {
            let p = p.as_ref();
            let glob = Glob::new(p)
                .map_err(|source| RelationsError::RootPattern { pattern: p.to_string(), source })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| RelationsError::RootPattern { pattern: patterns_joined(patterns), source })?;
        Ok(Self { patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(), set })
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn is_root(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.set.is_match(Path::new(name)))
    }

    /// Roots among `documents`, keeping input order.
    #[must_use]
    pub fn select(&self, documents: &[PathBuf]) -> Vec<PathBuf> {
        documents.iter().filter(|p| self.is_root(p)).cloned().collect()
    }
}

impl Default for RootMatcher {
    fn default() -> Self {
        let mut builder = GlobSetBuilder::new();
        for p in DEFAULT_ROOT_PATTERNS {
            if let Ok(glob) = Glob::new(p) {
                builder.add(glob);
            }
        }
        Self {
            patterns: DEFAULT_ROOT_PATTERNS.iter().map(|p| (*p).to_string()).collect(),
            set: builder.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }
}

/// True when `path` is named exactly [`MASTER_DOCUMENT`].
#[must_use]
pub fn is_master(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == MASTER_DOCUMENT)
}

fn patterns_joined<S: AsRef<str>>(patterns: &[S]) -> String {
    patterns.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patterns_match_master_and_assemblies_only() {
        let m = RootMatcher::default();
        assert!(m.is_root(Path::new("/d/master.adoc")));
        assert!(m.is_root(Path::new("/d/sub/assembly_install.adoc")));
        assert!(!m.is_root(Path::new("/d/assembly_install.txt")));
        assert!(!m.is_root(Path::new("/d/my_master.adoc")));
        assert!(!m.is_root(Path::new("/d/assembly_/x.adoc")));
        assert!(!m.is_root(Path::new("/d/con_assembly_x.adoc")));
    }

    #[test]
    fn custom_patterns_and_invalid_glob() {
        let m = RootMatcher::new(&["index.adoc"]).unwrap();
        assert!(m.is_root(Path::new("/d/index.adoc")));
        assert!(!m.is_root(Path::new("/d/master.adoc")));
        assert_eq!(m.patterns(), &["index.adoc".to_string()]);

        let err = RootMatcher::new(&["assembly_[.adoc"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn master_detection_is_exact() {
        assert!(is_master(Path::new("/a/master.adoc")));
        assert!(!is_master(Path::new("/a/master.adoc.bak")));
        assert!(!is_master(Path::new("/a/assembly_master.adoc")));
    }
}
