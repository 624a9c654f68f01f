// pokemon.rs
// Wire types for the PokeAPI resources this crate reads.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    // decimetres
    #[serde(default)]
    pub height: u32,
    // hectograms
    #[serde(default)]
    pub weight: u32,
    pub species: NamedAPIResource,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl Pokemon {
    /// Type slugs in slot order.
    pub fn type_names(&self) -> Vec<String> {
        let mut types = self.types.clone();
        types.sort_by_key(|t| t.slot);
        types.into_iter().map(|t| t.r#type.name).collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NamedAPIResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct APIResource {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonType {
    pub slot: u32,
    pub r#type: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Species {
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    pub evolution_chain: Option<APIResource>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

impl Species {
    /// The last flavor text in `language`, with the service's embedded line breaks flattened.
    pub fn description(&self, language: &str) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .rev()
            .find(|entry| entry.language.name == language)
            .map(|entry| {
                entry
                    .flavor_text
                    .split(|c: char| c.is_whitespace() || c.is_control())
                    .filter(|word| !word.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
    }

    pub fn genus(&self, language: &str) -> Option<String> {
        self.genera
            .iter()
            .find(|g| g.language.name == language)
            .map(|g| g.genus.clone())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedAPIResource,
    pub version: Option<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Genus {
    pub genus: String,
    pub language: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Variety {
    pub is_default: bool,
    pub pokemon: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EvolutionChain {
    pub id: u32,
    pub chain: ChainLink,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainLink {
    pub species: NamedAPIResource,
    #[serde(default)]
    pub is_baby: bool,
    /// Conditions on the edge from the parent; empty at the root.
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EvolutionDetail {
    pub trigger: NamedAPIResource,
    pub item: Option<NamedAPIResource>,
    pub held_item: Option<NamedAPIResource>,
    pub known_move: Option<NamedAPIResource>,
    pub known_move_type: Option<NamedAPIResource>,
    pub location: Option<NamedAPIResource>,
    /// 1 is female, any other value male.
    pub gender: Option<i32>,
    pub min_level: Option<u32>,
    pub min_happiness: Option<u32>,
    pub min_beauty: Option<u32>,
    pub min_affection: Option<u32>,
    pub needs_overworld_rain: bool,
    pub turn_upside_down: bool,
    pub time_of_day: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeInfo {
    pub name: String,
    pub damage_relations: DamageRelations,
}

/// How attacks of other types affect this type.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DamageRelations {
    pub double_damage_from: Vec<NamedAPIResource>,
    pub half_damage_from: Vec<NamedAPIResource>,
    pub no_damage_from: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocationAreaEncounter {
    pub location_area: NamedAPIResource,
    #[serde(default)]
    pub version_details: Vec<VersionEncounterDetail>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VersionEncounterDetail {
    pub version: NamedAPIResource,
    #[serde(default)]
    pub max_chance: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NamedAPIResourceList {
    pub count: u32,
    pub results: Vec<NamedAPIResource>,
}

/// Numeric id from the last path segment of a resource URL,
/// e.g. `https://pokeapi.co/api/v2/pokemon-species/25/` gives 25.
pub fn resource_id(url: &str) -> Result<u32, AppError> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| AppError::MalformedReference(url.to_string()))
}
