//! `/genes` handlers.

use super::{merge_patch, parse_id};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use genaxis_core::{
    Gene, GeneAttributes, GeneId, GeneListQuery, GeneRepository, ListQuery, SpeciesId,
    SqliteGeneRepository,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const GENE: &str = "gene";

/// Query parameters of `GET /genes`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GeneListParams {
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
    /// Restricts the list to one species id.
    pub species: Option<SpeciesId>,
}

/// Writable gene fields, using the same names as the gene JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneInput {
    pub species: SpeciesId,
    pub name: String,
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(flatten)]
    pub attributes: GeneAttributes,
}

impl GeneInput {
    fn into_gene(self, gene: &mut Gene) {
        gene.species_id = self.species;
        gene.name = self.name;
        gene.sequence = self.sequence;
        gene.attributes = self.attributes;
    }
}

impl From<&Gene> for GeneInput {
    fn from(gene: &Gene) -> Self {
        Self {
            species: gene.species_id,
            name: gene.name.clone(),
            sequence: gene.sequence.clone(),
            attributes: gene.attributes.clone(),
        }
    }
}

pub async fn list_genes(
    State(state): State<AppState>,
    query: Result<Query<GeneListParams>, QueryRejection>,
) -> Result<Json<Vec<Gene>>, ApiError> {
    let Query(params) = query?;
    let query = GeneListQuery {
        species_id: params.species,
        page: ListQuery {
            limit: params.limit,
            offset: params.offset,
        },
    };
    let genes = state.with_conn(|conn| {
        SqliteGeneRepository::new(conn)
            .list_genes(&query)
            .map_err(|err| ApiError::from_repo(GENE, err))
    })?;
    Ok(Json(genes))
}

pub async fn create_gene(
    State(state): State<AppState>,
    payload: Result<Json<GeneInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Gene>), ApiError> {
    let Json(input) = payload?;
    let mut gene = Gene::new(input.species, String::new());
    input.into_gene(&mut gene);

    let created = state.with_conn(|conn| {
        let repo = SqliteGeneRepository::new(conn);
        repo.create_gene(&gene)
            .map_err(|err| ApiError::from_repo(GENE, err))?;
        load_gene(&repo, gene.id)
    })?;

    info!(
        "event=gene_create module=api status=ok id={} species_id={}",
        created.id, created.species_id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_gene(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Gene>, ApiError> {
    let id = parse_id(&id, GENE)?;
    let gene = state.with_conn(|conn| load_gene(&SqliteGeneRepository::new(conn), id))?;
    Ok(Json(gene))
}

pub async fn replace_gene(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GeneInput>, JsonRejection>,
) -> Result<Json<Gene>, ApiError> {
    let id = parse_id(&id, GENE)?;
    let Json(input) = payload?;
    save_gene(&state, id, |_| Ok(input))
}

pub async fn patch_gene(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Gene>, ApiError> {
    let id = parse_id(&id, GENE)?;
    let Json(patch) = payload?;
    save_gene(&state, id, |current| {
        let merged = merge_patch(serde_json::to_value(GeneInput::from(current))?, patch)?;
        Ok(serde_json::from_value(merged)?)
    })
}

pub async fn delete_gene(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, GENE)?;
    state.with_conn(|conn| {
        SqliteGeneRepository::new(conn)
            .delete_gene(id)
            .map_err(|err| ApiError::from_repo(GENE, err))
    })?;
    info!("event=gene_delete module=api status=ok id={id}");
    Ok(StatusCode::NO_CONTENT)
}

fn save_gene(
    state: &AppState,
    id: GeneId,
    input_for: impl FnOnce(&Gene) -> Result<GeneInput, ApiError>,
) -> Result<Json<Gene>, ApiError> {
    let saved = state.with_conn(|conn| {
        let repo = SqliteGeneRepository::new(conn);
        let mut gene = load_gene(&repo, id)?;
        input_for(&gene)?.into_gene(&mut gene);
        repo.update_gene(&gene)
            .map_err(|err| ApiError::from_repo(GENE, err))?;
        load_gene(&repo, id)
    })?;
    info!("event=gene_update module=api status=ok id={id}");
    Ok(Json(saved))
}

pub(crate) fn load_gene(repo: &impl GeneRepository, id: GeneId) -> Result<Gene, ApiError> {
    repo.get_gene(id)
        .map_err(|err| ApiError::from_repo(GENE, err))?
        .ok_or_else(|| ApiError::not_found(GENE))
}
