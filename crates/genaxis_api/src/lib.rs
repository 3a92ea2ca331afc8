//! REST exposure of species, genes and CRISPR edits.
//!
//! # Responsibility
//! - Route JSON CRUD requests onto the `genaxis_core` repositories.
//! - Map repository errors onto HTTP status codes with `{"error": ..}` bodies.
//!
//! # Invariants
//! - Every handler holds the connection lock for one repository call chain.
//! - `edited_sequence`, `created_at` and `updated_at` are never taken from input.

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::get;
use axum::Router;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

/// Builds the application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::api_root))
        .route(
            "/species",
            get(handlers::species::list_species).post(handlers::species::create_species),
        )
        .route(
            "/species/:id",
            get(handlers::species::get_species)
                .put(handlers::species::replace_species)
                .patch(handlers::species::patch_species)
                .delete(handlers::species::delete_species),
        )
        .route(
            "/genes",
            get(handlers::genes::list_genes).post(handlers::genes::create_gene),
        )
        .route(
            "/genes/:id",
            get(handlers::genes::get_gene)
                .put(handlers::genes::replace_gene)
                .patch(handlers::genes::patch_gene)
                .delete(handlers::genes::delete_gene),
        )
        .route(
            "/edits",
            get(handlers::edits::list_edits).post(handlers::edits::create_edit),
        )
        .route(
            "/edits/:id",
            get(handlers::edits::get_edit)
                .put(handlers::edits::replace_edit)
                .patch(handlers::edits::patch_edit)
                .delete(handlers::edits::delete_edit),
        )
        .with_state(state)
}
