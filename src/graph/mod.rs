//! Include graph model and builder.
//!
//! An [`IncludeGraph`] records, for each root document, the include set the
//! resolver reported for it, plus the inventory of every document in scope.
//! Build it with [`IncludeGraph::build`] or [`IncludeGraph::build_for_scope`]
//! and hand it to the queries in `crate::query`.
use crate::errors::RelationsError;
use crate::parser::{extract_includes, IncludeResolver};
use crate::utils::file_walker;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub mod roots;

pub use roots::RootMatcher;

#[derive(Debug, Clone, Default)]
pub struct IncludeGraph {
    /// Directory the graph was built for; empty for graphs over explicit roots.
    pub scope: PathBuf,
    /// Root documents, sorted.
    pub roots: Vec<PathBuf>,
    /// Root -> included documents, in resolver order.
    pub includes: BTreeMap<PathBuf, Vec<PathBuf>>,
    /// Every document found in scope, sorted and deduplicated.
    pub documents: Vec<PathBuf>,
}

/// Options controlling extraction fan-out and discovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Worker pool size; `None` uses one worker per CPU.
    pub jobs: Option<NonZeroUsize>,
    /// Bypass `.gitignore`/`.ignore` rules when discovering documents.
    pub no_ignore: bool,
}

impl IncludeGraph {
    /// Run the resolver over `roots` on a bounded worker pool.
    ///
    /// A failing resolution contributes an empty include list and never
    /// aborts the other workers.
    ///
    /// # Errors
    /// Returns `RelationsError::Pool` if the worker pool cannot be created.
    pub fn build(
        roots: Vec<PathBuf>,
        resolver: &dyn IncludeResolver,
        opts: BuildOptions,
    ) -> Result<Self, RelationsError> {
        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(n) = opts.jobs {
            pool = pool.num_threads(n.get());
        }
        let pool = pool.build()?;

        let mut roots = roots;
        roots.sort();
        roots.dedup();

        let extracted: Vec<(PathBuf, Vec<PathBuf>)> = pool.install(|| {
            roots
                .par_iter()
                .map(|root| (root.clone(), extract_includes(resolver, root)))
                .collect()
        });
        log::debug!("extracted includes for {} root document(s)", extracted.len());

        Ok(Self {
            scope: PathBuf::new(),
            includes: extracted.into_iter().collect(),
            roots,
            documents: Vec::new(),
        })
    }

    /// Discover documents and roots under `scope`, then extract includes for every root.
    ///
    /// # Errors
    /// Same as [`IncludeGraph::build`].
    pub fn build_for_scope(
        scope: &Path,
        matcher: &RootMatcher,
        resolver: &dyn IncludeResolver,
        opts: BuildOptions,
    ) -> Result<Self, RelationsError> {
        let documents = file_walker::adoc_files_with_options(scope, opts.no_ignore);
        let roots = matcher.select(&documents);
        log::info!(
            "scope {}: {} document(s), {} root(s)",
            scope.display(),
            documents.len(),
            roots.len()
        );
        let mut graph = Self::build(roots, resolver, opts)?;
        graph.scope = scope.to_path_buf();
        graph.documents = documents;
        Ok(graph)
    }

    /// Include list recorded for `root`; empty for unknown roots.
    #[must_use]
    pub fn includes_of(&self, root: &Path) -> &[PathBuf] {
        self.includes.get(root).map_or(&[], Vec::as_slice)
    }

    /// Union of every root's includes, sorted and deduplicated.
    #[must_use]
    pub fn reachable(&self) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = self.includes.values().flatten().cloned().collect();
        out.sort();
        out.dedup();
        out
    }
}
