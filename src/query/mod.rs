use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::graph::roots::is_master;
use crate::graph::IncludeGraph;

/// Query trait implemented by all query types.
///
/// Given an immutable reference to an `IncludeGraph`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, graph: &IncludeGraph) -> R;
}

/// Files included by one document.
///
/// The graph must have been built with the document among its roots.
pub struct ChildrenQuery {
    pub file: PathBuf,
}

impl ChildrenQuery {
    pub fn new<P: AsRef<Path>>(file: P) -> Self {
        Self { file: file.as_ref().to_path_buf() }
    }
}

impl Query<Vec<PathBuf>> for ChildrenQuery {
    fn run(&self, graph: &IncludeGraph) -> Vec<PathBuf> {
        // Resolver order, no dedup
        graph.includes_of(&self.file).to_vec()
    }
}

/// How `ParentsQuery` compares include paths against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Canonical path equality.
    #[default]
    Exact,
    /// The literal target string occurs anywhere in the include path.
    /// Matches `intro.adoc` against `/d/old_intro.adoc` too.
    Substring,
}

/// Root documents whose include set contains the target.
pub struct ParentsQuery {
    /// Canonical target path, compared in `Exact` mode.
    pub file: PathBuf,
    /// Target as given by the user, searched for in `Substring` mode.
    pub literal: String,
    pub mode: MatchMode,
}

impl ParentsQuery {
    /// Exact-match query for a canonical path.
    pub fn new<P: AsRef<Path>>(file: P) -> Self {
        let file = file.as_ref().to_path_buf();
        let literal = file.to_string_lossy().into_owned();
        Self { file, literal, mode: MatchMode::Exact }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode, literal: &str) -> Self {
        self.mode = mode;
        self.literal = literal.to_string();
        self
    }

    fn matches(&self, include: &Path) -> bool {
        match self.mode {
            MatchMode::Exact => include == self.file,
            MatchMode::Substring => include.to_string_lossy().contains(self.literal.as_str()),
        }
    }
}

impl Query<Vec<PathBuf>> for ParentsQuery {
    fn run(&self, graph: &IncludeGraph) -> Vec<PathBuf> {
        // graph.roots is sorted, so the output is too
        graph
            .roots
            .iter()
            .filter(|root| graph.includes_of(root).iter().any(|inc| self.matches(inc)))
            .cloned()
            .collect()
    }
}

/// Documents in scope that no root document includes.
///
/// Files named `master.adoc` are never reported; unreferenced assemblies are.
#[derive(Default)]
pub struct OrphansQuery;

impl OrphansQuery {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Query<Vec<PathBuf>> for OrphansQuery {
    fn run(&self, graph: &IncludeGraph) -> Vec<PathBuf> {
        let mut all: Vec<PathBuf> =
            graph.documents.iter().filter(|p| !is_master(p)).cloned().collect();
        all.sort();
        all.dedup();
        let reachable = graph.reachable();
        sorted_difference(&all, &reachable)
    }
}

/// Elements of `a` absent from `b`, by a single merge pass.
///
/// Both inputs must be sorted ascending and free of duplicates.
#[must_use]
pub fn sorted_difference<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    debug_assert!(a.windows(2).all(|w| w[0] < w[1]), "left input not sorted/deduplicated");
    debug_assert!(b.windows(2).all(|w| w[0] < w[1]), "right input not sorted/deduplicated");
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() {
        if j >= b.len() {
            out.extend_from_slice(&a[i..]);
            break;
        }
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i].clone());
                i += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Greater => j += 1,
        }
    }
    out
}
