use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::PokeApiConfig;
use crate::error::AppError;
use crate::name_index::NameEntry;
use crate::pokemon::{
    EvolutionChain, LocationAreaEncounter, NamedAPIResourceList, Pokemon, Species, TypeInfo,
    resource_id,
};

/// Read-only access to the Pokémon data service.
pub trait PokeApi: Send + Sync {
    fn pokemon(&self, name_or_id: &str) -> impl Future<Output = Result<Pokemon, AppError>> + Send;

    fn species(&self, slug: &str) -> impl Future<Output = Result<Species, AppError>> + Send;

    /// `reference` is either the chain's full URL or its bare id.
    fn evolution_chain(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<EvolutionChain, AppError>> + Send;

    fn type_relations(&self, slug: &str)
    -> impl Future<Output = Result<TypeInfo, AppError>> + Send;

    fn encounters(
        &self,
        name_or_id: &str,
    ) -> impl Future<Output = Result<Vec<LocationAreaEncounter>, AppError>> + Send;

    fn pokemon_names(&self) -> impl Future<Output = Result<Vec<NameEntry>, AppError>> + Send;
}

pub struct HttpPokeApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpPokeApi {
    pub fn new(config: &PokeApiConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout as u64))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn chain_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}/evolution-chain/{}", self.api_url, reference)
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, AppError> {
        tracing::debug!("Fetching {} from URL: {}", what, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("{} not found at {}", what, url);
            return Err(AppError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let error_msg = format!("API request to {} failed with status: {}", url, status);
            tracing::error!("{}", error_msg);
            return Err(AppError::Network(error_msg));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            AppError::Parse(format!("JSON parsing failed: {}", e))
        })
    }
}

impl PokeApi for HttpPokeApi {
    async fn pokemon(&self, name_or_id: &str) -> Result<Pokemon, AppError> {
        let url = format!("{}/pokemon/{}", self.api_url, name_or_id);
        let pokemon: Pokemon = self.fetch_json(&url, name_or_id).await?;
        tracing::debug!("Fetched Pokémon: {} (ID: {})", pokemon.name, pokemon.id);
        Ok(pokemon)
    }

    async fn species(&self, slug: &str) -> Result<Species, AppError> {
        let url = format!("{}/pokemon-species/{}", self.api_url, slug);
        self.fetch_json(&url, slug).await
    }

    async fn evolution_chain(&self, reference: &str) -> Result<EvolutionChain, AppError> {
        let url = self.chain_url(reference);
        self.fetch_json(&url, reference).await
    }

    async fn type_relations(&self, slug: &str) -> Result<TypeInfo, AppError> {
        let url = format!("{}/type/{}", self.api_url, slug);
        self.fetch_json(&url, slug).await
    }

    async fn encounters(&self, name_or_id: &str) -> Result<Vec<LocationAreaEncounter>, AppError> {
        let url = format!("{}/pokemon/{}/encounters", self.api_url, name_or_id);
        self.fetch_json(&url, name_or_id).await
    }

    async fn pokemon_names(&self) -> Result<Vec<NameEntry>, AppError> {
        let url = format!("{}/pokemon?limit=100000", self.api_url);
        let list: NamedAPIResourceList = self.fetch_json(&url, "pokemon list").await?;

        let entries: Vec<NameEntry> = list
            .results
            .into_iter()
            .filter_map(|resource| match resource_id(&resource.url) {
                Ok(id) => Some(NameEntry {
                    name: resource.name,
                    id,
                }),
                Err(e) => {
                    tracing::warn!("Skipping list entry {}: {}", resource.name, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} of {} Pokémon names", entries.len(), list.count);
        Ok(entries)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_url_accepts_url_or_id() {
        let api = HttpPokeApi::new(&PokeApiConfig {
            api_url: "https://pokeapi.co/api/v2/".to_string(),
            sprite_url: String::new(),
            timeout: 5,
        })
        .unwrap();

        assert_eq!(
            api.chain_url("https://pokeapi.co/api/v2/evolution-chain/10/"),
            "https://pokeapi.co/api/v2/evolution-chain/10/"
        );
        assert_eq!(api.chain_url("10"), "https://pokeapi.co/api/v2/evolution-chain/10");
    }
}
