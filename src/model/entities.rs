use serde::{Deserialize, Serialize};

use crate::core::types::{
    CompartmentId, CompartmentalizedSpeciesId, Qualifier, ReactionId, SpeciesId,
};

/// An identifier cross-reference as stored on a model entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRef {
    pub ontology: String,
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub bqb: Qualifier,
}

impl IdentifierRef {
    pub fn new(ontology: impl Into<String>, identifier: impl Into<String>, bqb: Qualifier) -> Self {
        Self {
            ontology: ontology.into(),
            identifier: identifier.into(),
            url: None,
            bqb,
        }
    }
}

/// A cellular compartment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compartment {
    pub c_id: CompartmentId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<IdentifierRef>,
}

/// A molecular species, independent of location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub s_id: SpeciesId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<IdentifierRef>,
}

/// A species instance localized to one compartment. Graph nodes live at this
/// granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentalizedSpecies {
    pub sc_id: CompartmentalizedSpeciesId,
    pub s_id: SpeciesId,
    pub c_id: CompartmentId,
    pub name: String,
}

/// Role of a participant in a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Reactant,
    Product,
    Catalyst,
    Modifier,
    Stimulator,
    Inhibitor,
}

impl ParticipantRole {
    /// Systems Biology Ontology term for this role
    #[must_use]
    pub fn sbo_term(self) -> &'static str {
        match self {
            Self::Reactant => "SBO:0000010",
            Self::Product => "SBO:0000011",
            Self::Catalyst => "SBO:0000013",
            Self::Modifier => "SBO:0000019",
            Self::Inhibitor => "SBO:0000020",
            Self::Stimulator => "SBO:0000459",
        }
    }

    /// Parse a role from its name or SBO term
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reactant" | "substrate" | "sbo:0000010" => Some(Self::Reactant),
            "product" | "sbo:0000011" => Some(Self::Product),
            "catalyst" | "sbo:0000013" => Some(Self::Catalyst),
            "modifier" | "sbo:0000019" => Some(Self::Modifier),
            "inhibitor" | "sbo:0000020" => Some(Self::Inhibitor),
            "stimulator" | "sbo:0000459" => Some(Self::Stimulator),
            _ => None,
        }
    }

    /// Modifiers act on a reaction without being consumed or produced
    #[must_use]
    pub fn is_modifier(self) -> bool {
        !matches!(self, Self::Reactant | Self::Product)
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reactant => write!(f, "reactant"),
            Self::Product => write!(f, "product"),
            Self::Catalyst => write!(f, "catalyst"),
            Self::Modifier => write!(f, "modifier"),
            Self::Stimulator => write!(f, "stimulator"),
            Self::Inhibitor => write!(f, "inhibitor"),
        }
    }
}

/// Participation of a compartmentalized species in a reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSpecies {
    pub sc_id: CompartmentalizedSpeciesId,

    /// Negative for consumed species, positive for produced, zero for modifiers
    pub stoichiometry: f64,

    pub role: ParticipantRole,
}

impl ReactionSpecies {
    pub fn new(sc_id: impl Into<String>, stoichiometry: f64, role: ParticipantRole) -> Self {
        Self {
            sc_id: CompartmentalizedSpeciesId::new(sc_id),
            stoichiometry,
            role,
        }
    }
}

/// A reaction connecting compartmentalized species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub r_id: ReactionId,
    pub name: String,

    #[serde(default)]
    pub reversible: bool,

    pub participants: Vec<ReactionSpecies>,
}

impl Reaction {
    pub fn new(r_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            r_id: ReactionId::new(r_id),
            name: name.into(),
            reversible: false,
            participants: Vec::new(),
        }
    }

    #[must_use]
    pub fn reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    #[must_use]
    pub fn with_participant(mut self, participant: ReactionSpecies) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn with_role(&self, role: ParticipantRole) -> impl Iterator<Item = &ReactionSpecies> {
        self.participants.iter().filter(move |p| p.role == role)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &ReactionSpecies> {
        self.participants.iter().filter(|p| p.role.is_modifier())
    }

    /// Participation record of a compartmentalized species, if it takes part
    #[must_use]
    pub fn participant(&self, sc_id: &CompartmentalizedSpeciesId) -> Option<&ReactionSpecies> {
        self.participants.iter().find(|p| &p.sc_id == sc_id)
    }
}
