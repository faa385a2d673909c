use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::identifiers::{SpeciesIdentifier, SpeciesIdentifiers};
use crate::core::types::{CompartmentalizedSpeciesId, EntityType, ReactionId, SpeciesId};
use crate::model::entities::{
    Compartment, CompartmentalizedSpecies, IdentifierRef, Reaction, Species,
};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse model: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// Model format version for compatibility checking
pub const MODEL_VERSION: &str = "1.0.0";

/// Serializable pathway model format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelData {
    pub version: String,
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub compartments: Vec<Compartment>,
    pub species: Vec<Species>,
    pub compartmentalized_species: Vec<CompartmentalizedSpecies>,
    pub reactions: Vec<Reaction>,
}

/// A read-only pathway model with lookup indexes
#[derive(Debug, Default)]
pub struct PathwayModel {
    /// Model identifier (e.g. `glucose_metabolism`)
    pub id: Option<String>,

    /// Human-readable name
    pub name: Option<String>,

    compartments: Vec<Compartment>,
    species: Vec<Species>,
    compartmentalized_species: Vec<CompartmentalizedSpecies>,
    reactions: Vec<Reaction>,

    /// Index: species ID -> index in species vec
    s_id_to_index: HashMap<SpeciesId, usize>,

    /// Index: compartmentalized species ID -> index in compartmentalized_species vec
    sc_id_to_index: HashMap<CompartmentalizedSpeciesId, usize>,

    /// Index: species ID -> its compartmentalized instances, in model order
    s_id_to_sc_ids: HashMap<SpeciesId, Vec<CompartmentalizedSpeciesId>>,

    /// Index: reaction ID -> index in reactions vec
    r_id_to_index: HashMap<ReactionId, usize>,

    /// Index: compartmentalized species ID -> number of reactions it takes part in
    participation: HashMap<CompartmentalizedSpeciesId, usize>,
}

impl PathwayModel {
    /// Create an empty model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded glycolysis model
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON fails to parse or validate.
    pub fn load_embedded() -> Result<Self, ModelError> {
        // Validated at compile time by build.rs
        const EMBEDDED_MODEL: &str = include_str!("../../models/glucose_metabolism.json");
        Self::from_json(EMBEDDED_MODEL)
    }

    /// Load a model from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a model from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or references unknown entities.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let data: ModelData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != MODEL_VERSION {
            warn!(
                expected = MODEL_VERSION,
                found = %data.version,
                "Model version mismatch"
            );
        }

        Self::from_data(data)
    }

    /// Build a model from its serializable form, validating references
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` for duplicate IDs or dangling references.
    pub fn from_data(data: ModelData) -> Result<Self, ModelError> {
        let mut model = Self {
            id: data.id,
            name: data.name,
            compartments: data.compartments,
            ..Self::default()
        };

        for species in data.species {
            model.add_species(species)?;
        }
        for sc in data.compartmentalized_species {
            model.add_compartmentalized_species(sc)?;
        }
        for reaction in data.reactions {
            model.add_reaction(reaction)?;
        }

        Ok(model)
    }

    /// Add a species
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` if the species ID is already present.
    pub fn add_species(&mut self, species: Species) -> Result<(), ModelError> {
        if self.s_id_to_index.contains_key(&species.s_id) {
            return Err(ModelError::Invalid(format!(
                "duplicate species '{}'",
                species.s_id
            )));
        }
        self.s_id_to_index
            .insert(species.s_id.clone(), self.species.len());
        self.species.push(species);
        Ok(())
    }

    /// Add a compartmentalized species of an existing species
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` for a duplicate ID or unknown species.
    pub fn add_compartmentalized_species(
        &mut self,
        sc: CompartmentalizedSpecies,
    ) -> Result<(), ModelError> {
        if self.sc_id_to_index.contains_key(&sc.sc_id) {
            return Err(ModelError::Invalid(format!(
                "duplicate compartmentalized species '{}'",
                sc.sc_id
            )));
        }
        if !self.s_id_to_index.contains_key(&sc.s_id) {
            return Err(ModelError::Invalid(format!(
                "compartmentalized species '{}' references unknown species '{}'",
                sc.sc_id, sc.s_id
            )));
        }

        self.s_id_to_sc_ids
            .entry(sc.s_id.clone())
            .or_default()
            .push(sc.sc_id.clone());
        self.sc_id_to_index
            .insert(sc.sc_id.clone(), self.compartmentalized_species.len());
        self.compartmentalized_species.push(sc);
        Ok(())
    }

    /// Add a reaction whose participants are existing compartmentalized species
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` for a duplicate ID or unknown participant.
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<(), ModelError> {
        if self.r_id_to_index.contains_key(&reaction.r_id) {
            return Err(ModelError::Invalid(format!(
                "duplicate reaction '{}'",
                reaction.r_id
            )));
        }

        let mut seen = HashSet::new();
        for participant in &reaction.participants {
            if !self.sc_id_to_index.contains_key(&participant.sc_id) {
                return Err(ModelError::Invalid(format!(
                    "reaction '{}' references unknown compartmentalized species '{}'",
                    reaction.r_id, participant.sc_id
                )));
            }
            if seen.insert(participant.sc_id.clone()) {
                *self
                    .participation
                    .entry(participant.sc_id.clone())
                    .or_default() += 1;
            }
        }

        self.r_id_to_index
            .insert(reaction.r_id.clone(), self.reactions.len());
        self.reactions.push(reaction);
        Ok(())
    }

    /// The identifier relation of one entity type: one row per identifier
    /// cross-reference of every species (or compartment)
    #[must_use]
    pub fn get_identifiers(&self, entity_type: EntityType) -> SpeciesIdentifiers {
        let entities: Vec<(SpeciesId, &str, &[IdentifierRef])> = match entity_type {
            EntityType::Species => self
                .species
                .iter()
                .map(|s| (s.s_id.clone(), s.name.as_str(), s.identifiers.as_slice()))
                .collect(),
            EntityType::Compartment => self
                .compartments
                .iter()
                .map(|c| {
                    (
                        SpeciesId::new(c.c_id.as_str()),
                        c.name.as_str(),
                        c.identifiers.as_slice(),
                    )
                })
                .collect(),
        };

        entities
            .into_iter()
            .flat_map(|(id, name, refs)| {
                refs.iter().map(move |r| SpeciesIdentifier {
                    s_id: id.clone(),
                    s_name: name.to_string(),
                    ontology: r.ontology.to_lowercase(),
                    identifier: r.identifier.clone(),
                    url: r.url.clone(),
                    bqb: r.bqb.clone(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[must_use]
    pub fn compartmentalized_species(&self) -> &[CompartmentalizedSpecies] {
        &self.compartmentalized_species
    }

    #[must_use]
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    #[must_use]
    pub fn get_species(&self, s_id: &SpeciesId) -> Option<&Species> {
        self.s_id_to_index.get(s_id).map(|&idx| &self.species[idx])
    }

    #[must_use]
    pub fn get_compartmentalized_species(
        &self,
        sc_id: &CompartmentalizedSpeciesId,
    ) -> Option<&CompartmentalizedSpecies> {
        self.sc_id_to_index
            .get(sc_id)
            .map(|&idx| &self.compartmentalized_species[idx])
    }

    #[must_use]
    pub fn get_reaction(&self, r_id: &ReactionId) -> Option<&Reaction> {
        self.r_id_to_index.get(r_id).map(|&idx| &self.reactions[idx])
    }

    /// Compartmentalized instances of a species (empty if it has none)
    #[must_use]
    pub fn compartmentalized_ids(&self, s_id: &SpeciesId) -> &[CompartmentalizedSpeciesId] {
        self.s_id_to_sc_ids.get(s_id).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct reactions a compartmentalized species takes part in
    #[must_use]
    pub fn participation_count(&self, sc_id: &CompartmentalizedSpeciesId) -> usize {
        self.participation.get(sc_id).copied().unwrap_or(0)
    }

    /// Export model to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        let data = ModelData {
            version: MODEL_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            id: self.id.clone(),
            name: self.name.clone(),
            compartments: self.compartments.clone(),
            species: self.species.clone(),
            compartmentalized_species: self.compartmentalized_species.clone(),
            reactions: self.reactions.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Whether the model has no species
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CompartmentId, Qualifier};
    use crate::model::entities::{ParticipantRole, ReactionSpecies};

    #[test]
    fn test_load_embedded_model() {
        let model = PathwayModel::load_embedded().unwrap();
        assert!(!model.is_empty());
        assert_eq!(model.id.as_deref(), Some("glucose_metabolism"));
        assert_eq!(model.reactions().len(), 12);
    }

    #[test]
    fn test_embedded_compartment_fanout() {
        let model = PathwayModel::load_embedded().unwrap();

        let glucose = model.compartmentalized_ids(&SpeciesId::new("S_GLC"));
        assert_eq!(glucose.len(), 2);

        let fbp = model.compartmentalized_ids(&SpeciesId::new("S_FBP"));
        assert_eq!(fbp, [CompartmentalizedSpeciesId::new("SC_FBP_c")]);
    }

    #[test]
    fn test_participation_counts() {
        let model = PathwayModel::load_embedded().unwrap();
        // HK, PFK, PGK, PK
        assert_eq!(
            model.participation_count(&CompartmentalizedSpeciesId::new("SC_ATP_c")),
            4
        );
        assert_eq!(
            model.participation_count(&CompartmentalizedSpeciesId::new("SC_GLC_e")),
            1
        );
        assert_eq!(
            model.participation_count(&CompartmentalizedSpeciesId::new("SC_missing")),
            0
        );
    }

    #[test]
    fn test_get_identifiers() {
        let model = PathwayModel::load_embedded().unwrap();
        let identifiers = model.get_identifiers(EntityType::Species);

        let glucose: Vec<_> = identifiers
            .iter()
            .filter(|r| r.s_id.as_str() == "S_GLC")
            .collect();
        assert_eq!(glucose.len(), 2);
        assert!(glucose.iter().all(|r| r.ontology == "chebi"));
        assert!(identifiers.ontologies().contains("uniprot"));
    }

    #[test]
    fn test_get_compartment_identifiers() {
        let model = PathwayModel::load_embedded().unwrap();
        let identifiers = model.get_identifiers(EntityType::Compartment);

        assert_eq!(identifiers.len(), 3);
        assert!(identifiers.iter().all(|r| r.ontology == "go"));
        let cytosol = identifiers
            .iter()
            .find(|r| r.identifier == "GO:0005829")
            .unwrap();
        assert_eq!(cytosol.s_id.as_str(), "C_cytosol");
    }

    #[test]
    fn test_model_to_json_roundtrip() {
        let model = PathwayModel::load_embedded().unwrap();
        let json = model.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("R_PFK"));

        let reloaded = PathwayModel::from_json(&json).unwrap();
        assert_eq!(reloaded.species().len(), model.species().len());
        assert_eq!(reloaded.reactions().len(), model.reactions().len());
    }

    #[test]
    fn test_dangling_references_rejected() {
        let mut model = PathwayModel::new();
        model
            .add_species(Species {
                s_id: SpeciesId::new("S_A"),
                name: "A".to_string(),
                identifiers: vec![IdentifierRef::new("chebi", "1", Qualifier::Is)],
            })
            .unwrap();

        let orphan = CompartmentalizedSpecies {
            sc_id: CompartmentalizedSpeciesId::new("SC_B"),
            s_id: SpeciesId::new("S_B"),
            c_id: CompartmentId::new("C"),
            name: "B".to_string(),
        };
        assert!(matches!(
            model.add_compartmentalized_species(orphan),
            Err(ModelError::Invalid(_))
        ));

        let reaction = Reaction::new("R1", "r1")
            .with_participant(ReactionSpecies::new("SC_A", -1.0, ParticipantRole::Reactant));
        assert!(matches!(
            model.add_reaction(reaction),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let mut model = PathwayModel::new();
        let species = Species {
            s_id: SpeciesId::new("S_A"),
            name: "A".to_string(),
            identifiers: Vec::new(),
        };
        model.add_species(species.clone()).unwrap();
        assert!(model.add_species(species).is_err());
    }
}
