//! `/edits` handlers.
//!
//! Responses nest the full gene; requests reference it by `gene_id`.

use super::genes::load_gene;
use super::{merge_patch, parse_id, Pagination};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use genaxis_core::{
    CrisprEdit, CrisprEditRepository, EditId, Gene, GeneId, SqliteCrisprEditRepository,
    SqliteGeneRepository,
};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const EDIT: &str = "edit";

/// Writable edit fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditInput {
    pub gene_id: GeneId,
    pub target_sequence: String,
    #[serde(default)]
    pub replacement_sequence: String,
}

impl EditInput {
    fn apply(self, edit: &mut CrisprEdit) {
        edit.gene_id = self.gene_id;
        edit.target_sequence = self.target_sequence;
        edit.replacement_sequence = self.replacement_sequence;
    }
}

impl From<&CrisprEdit> for EditInput {
    fn from(edit: &CrisprEdit) -> Self {
        Self {
            gene_id: edit.gene_id,
            target_sequence: edit.target_sequence.clone(),
            replacement_sequence: edit.replacement_sequence.clone(),
        }
    }
}

/// Edit representation with its gene inlined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub id: EditId,
    pub gene: Gene,
    pub target_sequence: String,
    pub replacement_sequence: String,
    pub edited_sequence: String,
    pub created_at: i64,
    pub updated_at: i64,
}

pub async fn list_edits(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<EditResponse>>, ApiError> {
    let Query(page) = query?;
    let items: Vec<EditResponse> = state.with_conn(|conn| {
        SqliteCrisprEditRepository::new(conn)
            .list_edits(&page.into())
            .map_err(|err| ApiError::from_repo(EDIT, err))?
            .into_iter()
            .map(|edit| respond(conn, edit))
            .collect()
    })?;
    Ok(Json(items))
}

pub async fn create_edit(
    State(state): State<AppState>,
    payload: Result<Json<EditInput>, JsonRejection>,
) -> Result<(StatusCode, Json<EditResponse>), ApiError> {
    let Json(input) = payload?;
    let mut edit = CrisprEdit::new(input.gene_id, String::new(), String::new());
    input.apply(&mut edit);

    let created = state.with_conn(|conn| {
        let repo = SqliteCrisprEditRepository::new(conn);
        repo.create_edit(&edit)
            .map_err(|err| ApiError::from_repo(EDIT, err))?;
        respond(conn, load_edit(&repo, edit.id)?)
    })?;

    info!(
        "event=edit_create module=api status=ok id={} gene_id={}",
        created.id, created.gene.id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditResponse>, ApiError> {
    let id = parse_id(&id, EDIT)?;
    let edit = state.with_conn(|conn| {
        let edit = load_edit(&SqliteCrisprEditRepository::new(conn), id)?;
        respond(conn, edit)
    })?;
    Ok(Json(edit))
}

pub async fn replace_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EditInput>, JsonRejection>,
) -> Result<Json<EditResponse>, ApiError> {
    let id = parse_id(&id, EDIT)?;
    let Json(input) = payload?;
    save_edit(&state, id, |_| Ok(input))
}

pub async fn patch_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EditResponse>, ApiError> {
    let id = parse_id(&id, EDIT)?;
    let Json(patch) = payload?;
    save_edit(&state, id, |current| {
        let merged = merge_patch(serde_json::to_value(EditInput::from(current))?, patch)?;
        Ok(serde_json::from_value(merged)?)
    })
}

pub async fn delete_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, EDIT)?;
    state.with_conn(|conn| {
        SqliteCrisprEditRepository::new(conn)
            .delete_edit(id)
            .map_err(|err| ApiError::from_repo(EDIT, err))
    })?;
    info!("event=edit_delete module=api status=ok id={id}");
    Ok(StatusCode::NO_CONTENT)
}

/// Re-saving an edit refreshes its `edited_sequence` snapshot.
fn save_edit(
    state: &AppState,
    id: EditId,
    input_for: impl FnOnce(&CrisprEdit) -> Result<EditInput, ApiError>,
) -> Result<Json<EditResponse>, ApiError> {
    let saved = state.with_conn(|conn| {
        let repo = SqliteCrisprEditRepository::new(conn);
        let mut edit = load_edit(&repo, id)?;
        input_for(&edit)?.apply(&mut edit);
        repo.update_edit(&edit)
            .map_err(|err| ApiError::from_repo(EDIT, err))?;
        respond(conn, load_edit(&repo, id)?)
    })?;
    info!("event=edit_update module=api status=ok id={id}");
    Ok(Json(saved))
}

fn load_edit(repo: &impl CrisprEditRepository, id: EditId) -> Result<CrisprEdit, ApiError> {
    repo.get_edit(id)
        .map_err(|err| ApiError::from_repo(EDIT, err))?
        .ok_or_else(|| ApiError::not_found(EDIT))
}

fn respond(conn: &Connection, edit: CrisprEdit) -> Result<EditResponse, ApiError> {
    let gene = load_gene(&SqliteGeneRepository::new(conn), edit.gene_id)?;
    Ok(EditResponse {
        id: edit.id,
        gene,
        target_sequence: edit.target_sequence,
        replacement_sequence: edit.replacement_sequence,
        edited_sequence: edit.edited_sequence,
        created_at: edit.created_at,
        updated_at: edit.updated_at,
    })
}
