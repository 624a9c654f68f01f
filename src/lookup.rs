// lookup.rs
// Page-level lookup: one primary fetch, then the enrichment sections.

use serde::{Deserialize, Serialize};

use crate::api::PokeApi;
use crate::config::PokeApiConfig;
use crate::error::AppError;
use crate::evolution::{self, EvolutionStage};
use crate::forms::{self, AlternateForm, ClassifiedForms};
use crate::matchup::{self, Effectiveness};
use crate::pokemon::{LocationAreaEncounter, Pokemon, PokemonStat, Species, Sprites};

const MAX_STAT: f64 = 255.0;
const MAX_LOCATIONS: usize = 12;
const MAX_VERSIONS: usize = 3;
const HIGHEST_ID: u32 = 1025;
const LANGUAGE: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatView {
    pub name: String,
    pub display_name: String,
    pub value: u32,
    /// Share of the 255 ceiling, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainEntry {
    #[serde(flatten)]
    pub stage: EvolutionStage,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationView {
    pub area: String,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PokemonView {
    pub id: u32,
    pub number: String,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<StatView>,
    pub stat_total: u32,
    pub height_m: f64,
    pub weight_kg: f64,
    pub sprites: Sprites,
    pub genus: Option<String>,
    pub description: Option<String>,
    pub evolution: Vec<ChainEntry>,
    pub matchups: Effectiveness,
    pub mega_forms: Vec<AlternateForm>,
    pub regional_forms: Vec<AlternateForm>,
    pub locations: Vec<LocationView>,
}

pub fn stat_display_name(stat: &str) -> String {
    match stat {
        "hp" => "HP".to_string(),
        "attack" => "Attack".to_string(),
        "defense" => "Defense".to_string(),
        "special-attack" => "Sp. Attack".to_string(),
        "special-defense" => "Sp. Defense".to_string(),
        "speed" => "Speed".to_string(),
        other => other.to_string(),
    }
}

fn stat_views(stats: &[PokemonStat]) -> Vec<StatView> {
    stats
        .iter()
        .map(|s| StatView {
            name: s.stat.name.clone(),
            display_name: stat_display_name(&s.stat.name),
            value: s.base_stat,
            percentage: s.base_stat as f64 / MAX_STAT * 100.0,
        })
        .collect()
}

fn location_views(encounters: Vec<LocationAreaEncounter>) -> Vec<LocationView> {
    encounters
        .into_iter()
        .take(MAX_LOCATIONS)
        .map(|encounter| LocationView {
            area: encounter.location_area.name.replace('-', " "),
            versions: encounter
                .version_details
                .into_iter()
                .take(MAX_VERSIONS)
                .map(|v| v.version.name)
                .collect(),
        })
        .collect()
}

/// Names and dex numbers are lowercase slugs; anything else would change the
/// requested path.
fn is_valid_query(query: &str) -> bool {
    !query.is_empty()
        && query
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub struct Pokedex<A> {
    api: A,
    sprite_url: String,
}

impl<A: PokeApi> Pokedex<A> {
    pub fn new(api: A, config: &PokeApiConfig) -> Self {
        Self {
            api,
            sprite_url: config.sprite_url.clone(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Looks up `query` (a name or a dex number) and assembles every section.
    /// Only a failed primary lookup is an error; the other sections come back
    /// empty when their data can't be fetched.
    pub async fn lookup(&self, query: &str) -> Result<PokemonView, AppError> {
        let query = query.trim().to_lowercase();
        if !is_valid_query(&query) {
            tracing::debug!("Rejecting lookup query {:?}", query);
            return Err(AppError::InvalidQuery);
        }

        let pokemon = self.api.pokemon(&query).await.map_err(|e| {
            tracing::error!("Primary lookup for {} failed: {}", query, e);
            match e {
                AppError::NotFound(_) => AppError::NotFound(query.clone()),
                other => other,
            }
        })?;

        let species = match self.api.species(&pokemon.species.name).await {
            Ok(species) => Some(species),
            Err(e) => {
                tracing::warn!("Species section unavailable for {}: {}", pokemon.name, e);
                None
            }
        };

        let type_names = pokemon.type_names();
        let (matchups, evolution, forms, locations) = tokio::join!(
            matchup::aggregate(&self.api, &type_names),
            self.evolution(species.as_ref()),
            self.forms(species.as_ref()),
            self.locations(pokemon.id),
        );

        Ok(self.assemble(pokemon, species, matchups, evolution, forms, locations))
    }

    /// Looks up a uniformly random dex number.
    pub async fn random(&self) -> Result<PokemonView, AppError> {
        let id: u32 = rand::random_range(1..=HIGHEST_ID);
        tracing::debug!("Random lookup picked ID: {}", id);
        self.lookup(&id.to_string()).await
    }

    async fn evolution(&self, species: Option<&Species>) -> Vec<EvolutionStage> {
        let Some(reference) = species.and_then(|s| s.evolution_chain.as_ref()) else {
            return Vec::new();
        };
        match self.api.evolution_chain(&reference.url).await {
            Ok(chain) => evolution::flatten(&chain.chain, &self.sprite_url),
            Err(e) => {
                tracing::warn!("Evolution section unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn forms(&self, species: Option<&Species>) -> ClassifiedForms {
        let Some(species) = species else {
            return ClassifiedForms::default();
        };
        let mut forms = forms::classify(&species.varieties, &species.name, &self.sprite_url);
        forms::enrich_regional_types(&self.api, &mut forms.regional_forms).await;
        forms
    }

    async fn locations(&self, id: u32) -> Vec<LocationView> {
        match self.api.encounters(&id.to_string()).await {
            Ok(encounters) => location_views(encounters),
            Err(e) => {
                tracing::warn!("Location section unavailable for {}: {}", id, e);
                Vec::new()
            }
        }
    }

    fn assemble(
        &self,
        pokemon: Pokemon,
        species: Option<Species>,
        matchups: Effectiveness,
        evolution: Vec<EvolutionStage>,
        forms: ClassifiedForms,
        locations: Vec<LocationView>,
    ) -> PokemonView {
        let evolution = evolution
            .into_iter()
            .map(|stage| ChainEntry {
                current: stage.id == pokemon.id,
                stage,
            })
            .collect();

        PokemonView {
            id: pokemon.id,
            number: format!("#{:04}", pokemon.id),
            types: pokemon.type_names(),
            stats: stat_views(&pokemon.stats),
            stat_total: pokemon.stats.iter().map(|s| s.base_stat).sum(),
            height_m: pokemon.height as f64 / 10.0,
            weight_kg: pokemon.weight as f64 / 10.0,
            genus: species.as_ref().and_then(|s| s.genus(LANGUAGE)),
            description: species.as_ref().and_then(|s| s.description(LANGUAGE)),
            name: pokemon.name,
            sprites: pokemon.sprites,
            evolution,
            matchups,
            mega_forms: forms.mega_forms,
            regional_forms: forms.regional_forms,
            locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakePokeApi;
    use serde_json::json;

    fn config() -> PokeApiConfig {
        PokeApiConfig {
            api_url: "https://pokeapi.test/api/v2".to_string(),
            sprite_url: "https://sprites.test/pokemon".to_string(),
            timeout: 5,
        }
    }

    fn species_ref(name: &str, id: u32) -> serde_json::Value {
        json!({ "name": name, "url": format!("https://pokeapi.co/api/v2/pokemon-species/{}/", id) })
    }

    fn pikachu_api() -> FakePokeApi {
        let mut api = FakePokeApi::default()
            .with_pokemon(25, "pikachu", &["electric"])
            .with_pokemon(10100, "raichu-alola", &["electric", "psychic"])
            .with_type("electric", &["ground"], &["electric", "flying", "steel"], &[]);

        api.species.insert(
            "pikachu".to_string(),
            json!({
                "name": "pikachu",
                "flavor_text_entries": [
                    { "flavor_text": "It keeps its tail\nraised.", "language": { "name": "en" } }
                ],
                "genera": [{ "genus": "Mouse Pokémon", "language": { "name": "en" } }],
                "evolution_chain": { "url": "https://pokeapi.co/api/v2/evolution-chain/10/" },
                "varieties": [
                    { "is_default": true, "pokemon": { "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon/25/" } },
                    { "is_default": false, "pokemon": { "name": "pikachu-rock-star", "url": "https://pokeapi.co/api/v2/pokemon/10080/" } }
                ]
            }),
        );
        api.chains.insert(
            "https://pokeapi.co/api/v2/evolution-chain/10/".to_string(),
            json!({
                "id": 10,
                "chain": {
                    "species": species_ref("pichu", 172),
                    "evolution_details": [],
                    "evolves_to": [{
                        "species": species_ref("pikachu", 25),
                        "evolution_details": [{ "trigger": { "name": "level-up" }, "min_happiness": 220 }],
                        "evolves_to": [
                            {
                                "species": species_ref("raichu", 26),
                                "evolution_details": [{ "trigger": { "name": "use-item" }, "item": { "name": "thunder-stone" } }]
                            }
                        ]
                    }]
                }
            }),
        );
        api.encounters.insert(
            "25".to_string(),
            json!([
                {
                    "location_area": { "name": "viridian-forest-area", "url": "" },
                    "version_details": [
                        { "version": { "name": "red" }, "max_chance": 5 },
                        { "version": { "name": "blue" }, "max_chance": 5 },
                        { "version": { "name": "yellow" }, "max_chance": 5 },
                        { "version": { "name": "firered" }, "max_chance": 5 }
                    ]
                }
            ]),
        );
        api
    }

    #[tokio::test]
    async fn test_full_lookup() {
        let pokedex = Pokedex::new(pikachu_api(), &config());
        let view = pokedex.lookup("  Pikachu ").await.unwrap();

        assert_eq!(view.id, 25);
        assert_eq!(view.number, "#0025");
        assert_eq!(view.types, vec!["electric"]);
        assert_eq!(view.height_m, 0.4);
        assert_eq!(view.weight_kg, 6.0);
        assert_eq!(view.stat_total, 180);
        assert_eq!(view.stats[0].display_name, "HP");
        assert_eq!(view.genus.as_deref(), Some("Mouse Pokémon"));
        assert_eq!(view.description.as_deref(), Some("It keeps its tail raised."));

        let names: Vec<&str> = view.evolution.iter().map(|e| e.stage.name.as_str()).collect();
        assert_eq!(names, vec!["pichu", "pikachu", "raichu"]);
        let current: Vec<bool> = view.evolution.iter().map(|e| e.current).collect();
        assert_eq!(current, vec![false, true, false]);
        // friendship-based level-up has no min level, so no "Level" clause
        assert_eq!(view.evolution[1].stage.method.as_deref(), Some("High friendship"));

        assert_eq!(view.matchups.weaknesses.len(), 1);
        assert_eq!(view.matchups.weaknesses[0].type_name, "ground");
        assert!(view.mega_forms.is_empty());
        assert!(view.regional_forms.is_empty());

        assert_eq!(view.locations.len(), 1);
        assert_eq!(view.locations[0].area, "viridian forest area");
        assert_eq!(view.locations[0].versions, vec!["red", "blue", "yellow"]);
    }

    #[tokio::test]
    async fn test_lookup_by_number() {
        let pokedex = Pokedex::new(pikachu_api(), &config());
        let view = pokedex.lookup("25").await.unwrap();
        assert_eq!(view.name, "pikachu");
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let pokedex = Pokedex::new(pikachu_api(), &config());
        let err = pokedex.lookup("MissingNo").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref q) if q == "missingno"));
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let pokedex = Pokedex::new(pikachu_api(), &config());
        assert!(matches!(pokedex.lookup("   ").await, Err(AppError::InvalidQuery)));
    }

    #[tokio::test]
    async fn test_path_changing_queries_rejected() {
        let api = pikachu_api();
        let pokedex = Pokedex::new(api, &config());

        for query in ["pikachu?x", "..", "../type/fire", "pika chu", "pikachu/encounters", "pikachu#"] {
            assert!(
                matches!(pokedex.lookup(query).await, Err(AppError::InvalidQuery)),
                "{:?} should be rejected",
                query
            );
        }
        assert!(pokedex.lookup("Mr-Mime").await.is_err());
        assert!(pokedex.lookup("PIKACHU").await.is_ok());
    }

    #[tokio::test]
    async fn test_sections_degrade_independently() {
        let api = pikachu_api()
            .failing("https://pokeapi.co/api/v2/evolution-chain/10/")
            .failing("electric");
        let pokedex = Pokedex::new(api, &config());

        let view = pokedex.lookup("pikachu").await.unwrap();
        assert!(view.evolution.is_empty());
        assert!(view.matchups.is_empty());
        assert_eq!(view.locations.len(), 1);
        assert_eq!(view.description.as_deref(), Some("It keeps its tail raised."));
    }

    #[tokio::test]
    async fn test_missing_species_leaves_species_sections_empty() {
        let mut api = pikachu_api();
        api.species.clear();
        let pokedex = Pokedex::new(api, &config());

        let view = pokedex.lookup("pikachu").await.unwrap();
        assert!(view.evolution.is_empty());
        assert!(view.genus.is_none());
        assert_eq!(view.matchups.weaknesses.len(), 1);
    }

    #[tokio::test]
    async fn test_regional_forms_get_types() {
        let mut api = pikachu_api();
        api.species.insert(
            "raichu".to_string(),
            json!({
                "name": "raichu",
                "evolution_chain": null,
                "varieties": [
                    { "is_default": true, "pokemon": { "name": "raichu", "url": "https://pokeapi.co/api/v2/pokemon/26/" } },
                    { "is_default": false, "pokemon": { "name": "raichu-alola", "url": "https://pokeapi.co/api/v2/pokemon/10100/" } }
                ]
            }),
        );
        let api = api.with_pokemon(26, "raichu", &["electric"]);
        let pokedex = Pokedex::new(api, &config());

        let view = pokedex.lookup("raichu").await.unwrap();
        assert_eq!(view.regional_forms.len(), 1);
        assert_eq!(view.regional_forms[0].display_name, "Alolan Raichu");
        assert_eq!(view.regional_forms[0].types, vec!["electric", "psychic"]);
        assert!(view.locations.is_empty());
    }

    #[test]
    fn test_stat_display_names() {
        assert_eq!(stat_display_name("special-attack"), "Sp. Attack");
        assert_eq!(stat_display_name("special-defense"), "Sp. Defense");
        assert_eq!(stat_display_name("accuracy"), "accuracy");
    }
}
