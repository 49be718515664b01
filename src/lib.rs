//! adoc-relations — include relationships in AsciiDoc documentation trees
//!
//! Answer three questions about a tree of `.adoc` files:
//! - **children**: which documents does a file include?
//! - **parents**: which root documents (`master.adoc`, `assembly_*.adoc`) include a file?
//! - **orphans**: which documents does no root document include?
//!
//! Include directives are resolved by Asciidoctor through an external `ruby`
//! process (see [`parser::AsciidoctorResolver`]); the repository root comes
//! from `git rev-parse --show-toplevel`.
//!
//! # Quickstart (Library)
//! ```no_run
//! use adoc_relations::graph::{BuildOptions, IncludeGraph, RootMatcher};
//! use adoc_relations::parser::AsciidoctorResolver;
//! use adoc_relations::query::{OrphansQuery, Query};
//!
//! let scope = std::path::Path::new("docs");
//! let resolver = AsciidoctorResolver::default();
//! let graph = IncludeGraph::build_for_scope(scope, &RootMatcher::default(), &resolver, BuildOptions::default())
//!     .expect("build include graph");
//! for orphan in OrphansQuery::new().run(&graph) {
//!     println!("{}", orphan.display());
//! }
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! adoc-relations children guides/master.adoc
//! adoc-relations parents modules/con_intro.adoc
//! adoc-relations orphans
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod query;
pub mod report;
pub mod settings;
pub mod utils;
