use thiserror::Error;

/// Errors raised by identifier resolution, graph construction and filtering.
///
/// Unmatched inputs are not errors: rows without a resolvable identity are
/// dropped from the output. Only strict matching turns "nothing matched at
/// all" into [`MatchError::NoMatches`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Ontology set is empty")]
    EmptyOntologySet,

    #[error("Ontology '{ontology}' is not present in the identifier table (available: {available})")]
    UnknownOntology { ontology: String, available: String },

    #[error("Column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("max_path_length must be at least 1, got {0}")]
    InvalidPathLength(usize),

    #[error("Pathway model cannot be turned into a graph: {0}")]
    InsufficientModel(String),

    #[error("At least one weight scheme must be requested")]
    NoWeightSchemes,

    #[error("No identifiers matched the {ontologies} ontologies across {rows} input rows")]
    NoMatches { ontologies: String, rows: usize },

    #[error("Distance cache does not match the graph: {0}")]
    CacheMismatch(String),
}

impl MatchError {
    /// Whether this error reflects invalid caller configuration (as opposed to
    /// a distance cache built for a different graph)
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::CacheMismatch(_))
    }
}
