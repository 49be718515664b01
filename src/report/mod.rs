//! Result rendering: the plain text report and its JSON counterpart.
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A query result ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// File or directory the results are about.
    pub base: PathBuf,
    /// Directory result paths are shown relative to.
    pub scope: PathBuf,
    /// Result paths relative to `scope` when inside it, absolute otherwise.
    pub results: Vec<PathBuf>,
    pub count: usize,
    #[serde(skip)]
    pub header: Option<String>,
}

impl Report {
    #[must_use]
    pub fn new(base: &Path, scope: &Path, results: &[PathBuf]) -> Self {
        let results: Vec<PathBuf> = results.iter().map(|p| relativize(p, scope)).collect();
        Self {
            base: base.to_path_buf(),
            scope: scope.to_path_buf(),
            count: results.len(),
            results,
            header: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Full text report: header, indented results (or a no-results line) and count footer.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match &self.header {
            Some(h) => out.push_str(h),
            None => {
                let _ = write!(out, "Displaying results for: {}", self.base.display());
            }
        }
        out.push('\n');
        if self.results.is_empty() {
            out.push_str("No results found.\n");
        }
        for r in &self.results {
            let _ = writeln!(out, "  {}", r.display());
        }
        let _ = write!(out, "Found {} results.", self.count);
        out
    }

    /// Bare result lines, one per path.
    #[must_use]
    pub fn render_quiet(&self) -> String {
        self.results.iter().map(|r| r.display().to_string()).collect::<Vec<_>>().join("\n")
    }

    /// # Errors
    /// Propagates `serde_json` encoding failures.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `path` with the `scope` prefix removed, or `path` unchanged when outside it.
#[must_use]
pub fn relativize(path: &Path, scope: &Path) -> PathBuf {
    match path.strip_prefix(scope) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path.to_path_buf(),
    }
}
