use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

define_id!(
    /// Internal identifier of a molecular species (`s_id`)
    SpeciesId
);
define_id!(
    /// Internal identifier of a cellular compartment (`c_id`)
    CompartmentId
);
define_id!(
    /// Internal identifier of a species localized to a compartment (`sc_id`)
    CompartmentalizedSpeciesId
);
define_id!(
    /// Internal identifier of a reaction (`r_id`)
    ReactionId
);

/// Kind of model entity whose identifier cross-references are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    Species,
    Compartment,
}

impl EntityType {
    /// Parse from a name such as `species` or `compartments`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "species" => Some(Self::Species),
            "compartment" | "compartments" => Some(Self::Compartment),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Species => write!(f, "species"),
            Self::Compartment => write!(f, "compartments"),
        }
    }
}

/// Identifier value that marks "no identifier available". Never matches.
pub const MISSING_IDENTIFIER: &str = "-1";

/// BioModels relation qualifier attached to an identifier cross-reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qualifier {
    #[serde(rename = "BQB_IS")]
    Is,
    #[serde(rename = "BQB_HAS_PART")]
    HasPart,
    #[serde(rename = "BQB_IS_PART_OF")]
    IsPartOf,
    #[serde(rename = "BQB_IS_VERSION_OF")]
    IsVersionOf,
    #[serde(rename = "BQB_HAS_VERSION")]
    HasVersion,
    #[serde(rename = "BQB_IS_HOMOLOG_TO")]
    IsHomologTo,
    #[serde(rename = "BQB_IS_DESCRIBED_BY")]
    IsDescribedBy,
    #[serde(rename = "BQB_IS_ENCODED_BY")]
    IsEncodedBy,
    #[serde(rename = "BQB_ENCODES")]
    Encodes,
    #[serde(untagged)]
    Other(String),
}

impl Qualifier {
    /// Parse a qualifier from its `BQB_*` representation
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "BQB_IS" => Self::Is,
            "BQB_HAS_PART" => Self::HasPart,
            "BQB_IS_PART_OF" => Self::IsPartOf,
            "BQB_IS_VERSION_OF" => Self::IsVersionOf,
            "BQB_HAS_VERSION" => Self::HasVersion,
            "BQB_IS_HOMOLOG_TO" => Self::IsHomologTo,
            "BQB_IS_DESCRIBED_BY" => Self::IsDescribedBy,
            "BQB_IS_ENCODED_BY" => Self::IsEncodedBy,
            "BQB_ENCODES" => Self::Encodes,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Is => write!(f, "BQB_IS"),
            Self::HasPart => write!(f, "BQB_HAS_PART"),
            Self::IsPartOf => write!(f, "BQB_IS_PART_OF"),
            Self::IsVersionOf => write!(f, "BQB_IS_VERSION_OF"),
            Self::HasVersion => write!(f, "BQB_HAS_VERSION"),
            Self::IsHomologTo => write!(f, "BQB_IS_HOMOLOG_TO"),
            Self::IsDescribedBy => write!(f, "BQB_IS_DESCRIBED_BY"),
            Self::IsEncodedBy => write!(f, "BQB_IS_ENCODED_BY"),
            Self::Encodes => write!(f, "BQB_ENCODES"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A set of ontology names restricting identifier matching (e.g. `{"chebi"}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologySet(BTreeSet<String>);

impl OntologySet {
    pub fn new<I, S>(ontologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ontologies.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list such as `chebi,uniprot`
    #[must_use]
    pub fn parse_list(s: &str) -> Self {
        Self::new(
            s.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_lowercase),
        )
    }

    #[must_use]
    pub fn contains(&self, ontology: &str) -> bool {
        self.0.contains(ontology)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OntologySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl std::fmt::Display for OntologySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
