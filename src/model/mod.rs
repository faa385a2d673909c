//! Pathway model storage and indexing.
//!
//! The model holds the already-parsed relations of a curated pathway: species
//! with their identifier cross-references, compartmentalized species, and
//! reactions with their participants. It is read-only once built; matching and
//! graph construction only query it.
//!
//! ## Embedded Model
//!
//! A small human glycolysis model is compiled into the binary (glucose uptake
//! through pyruvate import into mitochondria), useful for demos and tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pathway_matcher::{EntityType, PathwayModel};
//! use std::path::Path;
//!
//! let model = PathwayModel::load_embedded().unwrap();
//! let identifiers = model.get_identifiers(EntityType::Species);
//! println!("{} identifier cross-references", identifiers.len());
//!
//! let custom = PathwayModel::load_from_file(Path::new("my_model.json")).unwrap();
//! ```

pub mod entities;
pub mod store;
