use axum::extract::{Path, Query, State};
use axum::Json;
use specboard_core::feature::Feature;
use specboard_core::project::{try_scan, Project};

use super::PathQuery;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/project?path=: full project snapshot.
pub async fn get_project(
    State(app): State<AppState>,
    Query(q): Query<PathQuery>,
) -> Result<Json<Project>, AppError> {
    let root = app.gate(&q.path)?;
    let project = try_scan(&root).await?;
    Ok(Json(project))
}

/// GET /api/project/features/{id}?path=: one feature of a project.
pub async fn get_feature(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<PathQuery>,
) -> Result<Json<Feature>, AppError> {
    let root = app.gate(&q.path)?;
    let project = try_scan(&root).await?;
    let feature = project.require_feature(&id)?.clone();
    Ok(Json(feature))
}
