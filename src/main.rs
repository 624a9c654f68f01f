use axum::{
    Json, Router, debug_handler,
    extract::{Path, Query, State},
    routing::get,
};
use pokedex_explorer::{AppError, Config, HttpPokeApi, NameEntry, NameIndex, Pokedex, PokemonView};
use serde::Deserialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SUGGESTIONS: usize = 10;

struct AppState {
    pokedex: Pokedex<HttpPokeApi>,
    names: NameIndex,
}

#[derive(Deserialize)]
struct NameQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let api = match HttpPokeApi::new(&config.pokeapi) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = Arc::new(AppState {
        pokedex: Pokedex::new(api, &config.pokeapi),
        names: NameIndex::new(),
    });

    let app = Router::new()
        .route("/pokemon/{query}", get(get_pokemon_handler))
        .route("/random", get(get_random_pokemon_handler))
        .route("/names", get(get_names_handler))
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind(&config.server.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", config.server.bind_addr, e);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {}", addr),
        Err(_) => tracing::info!("listening on {}", config.server.bind_addr),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[debug_handler]
async fn get_pokemon_handler(
    State(app_state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<PokemonView>, AppError> {
    tracing::debug!("Lookup requested for: {}", query);
    let view = app_state.pokedex.lookup(&query).await?;
    Ok(Json(view))
}

#[debug_handler]
async fn get_random_pokemon_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<PokemonView>, AppError> {
    let view = app_state.pokedex.random().await?;
    Ok(Json(view))
}

#[debug_handler]
async fn get_names_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> Result<Json<Vec<NameEntry>>, AppError> {
    app_state
        .names
        .get_or_populate(app_state.pokedex.api())
        .await?;
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTIONS);
    Ok(Json(app_state.names.suggest(&params.q, limit)))
}
