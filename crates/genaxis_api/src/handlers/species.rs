//! `/species` handlers.

use super::{merge_patch, parse_id, Pagination};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use genaxis_core::{Species, SpeciesId, SpeciesRepository, SqliteSpeciesRepository};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SPECIES: &str = "species";

/// Writable species fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesInput {
    pub name: String,
    #[serde(default)]
    pub scientific_name: String,
    #[serde(default)]
    pub common_name: String,
}

impl SpeciesInput {
    fn apply(self, species: &mut Species) {
        species.name = self.name;
        species.scientific_name = self.scientific_name;
        species.common_name = self.common_name;
    }
}

impl From<&Species> for SpeciesInput {
    fn from(species: &Species) -> Self {
        Self {
            name: species.name.clone(),
            scientific_name: species.scientific_name.clone(),
            common_name: species.common_name.clone(),
        }
    }
}

pub async fn list_species(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Species>>, ApiError> {
    let Query(page) = query?;
    let items = state.with_conn(|conn| {
        SqliteSpeciesRepository::new(conn)
            .list_species(&page.into())
            .map_err(|err| ApiError::from_repo(SPECIES, err))
    })?;
    Ok(Json(items))
}

pub async fn create_species(
    State(state): State<AppState>,
    payload: Result<Json<SpeciesInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Species>), ApiError> {
    let Json(input) = payload?;
    let mut species = Species::new(String::new());
    input.apply(&mut species);

    let created = state.with_conn(|conn| {
        let repo = SqliteSpeciesRepository::new(conn);
        repo.create_species(&species)
            .map_err(|err| ApiError::from_repo(SPECIES, err))?;
        load_species(&repo, species.id)
    })?;

    info!(
        "event=species_create module=api status=ok id={} name={}",
        created.id, created.name
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Species>, ApiError> {
    let id = parse_id(&id, SPECIES)?;
    let species = state.with_conn(|conn| load_species(&SqliteSpeciesRepository::new(conn), id))?;
    Ok(Json(species))
}

pub async fn replace_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SpeciesInput>, JsonRejection>,
) -> Result<Json<Species>, ApiError> {
    let id = parse_id(&id, SPECIES)?;
    let Json(input) = payload?;
    save_species(&state, id, |_| Ok(input))
}

pub async fn patch_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Species>, ApiError> {
    let id = parse_id(&id, SPECIES)?;
    let Json(patch) = payload?;
    save_species(&state, id, |current| {
        let merged = merge_patch(serde_json::to_value(SpeciesInput::from(current))?, patch)?;
        Ok(serde_json::from_value(merged)?)
    })
}

pub async fn delete_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, SPECIES)?;
    state.with_conn(|conn| {
        SqliteSpeciesRepository::new(conn)
            .delete_species(id)
            .map_err(|err| ApiError::from_repo(SPECIES, err))
    })?;
    info!("event=species_delete module=api status=ok id={id}");
    Ok(StatusCode::NO_CONTENT)
}

fn save_species(
    state: &AppState,
    id: SpeciesId,
    input_for: impl FnOnce(&Species) -> Result<SpeciesInput, ApiError>,
) -> Result<Json<Species>, ApiError> {
    let saved = state.with_conn(|conn| {
        let repo = SqliteSpeciesRepository::new(conn);
        let mut species = load_species(&repo, id)?;
        input_for(&species)?.apply(&mut species);
        repo.update_species(&species)
            .map_err(|err| ApiError::from_repo(SPECIES, err))?;
        load_species(&repo, id)
    })?;
    info!("event=species_update module=api status=ok id={id}");
    Ok(Json(saved))
}

fn load_species(repo: &impl SpeciesRepository, id: SpeciesId) -> Result<Species, ApiError> {
    repo.get_species(id)
        .map_err(|err| ApiError::from_repo(SPECIES, err))?
        .ok_or_else(|| ApiError::not_found(SPECIES))
}
