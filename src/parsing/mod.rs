//! Parsers for caller-supplied tables.
//!
//! Feature tables and edge lists are plain delimited text with a header row:
//!
//! ```text
//! # comments and blank lines are skipped
//! identifier_upstream	identifier_downstream	score
//! 17925	32966	0.91
//! 57634	32966	0.45
//! ```
//!
//! - **TSV**: tab-delimited (`.tsv`, `.txt`)
//! - **CSV**: comma-delimited (`.csv`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use pathway_matcher::parsing::tsv::{parse_table_file, parse_table_text};
//! use std::path::Path;
//!
//! let table = parse_table_file(Path::new("edges.tsv")).unwrap();
//! let features = parse_table_text("chebis\n17925\n15361\n", '\t').unwrap();
//! ```

pub mod tsv;
