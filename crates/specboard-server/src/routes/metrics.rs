use axum::extract::{Query, State};
use axum::Json;
use specboard_core::metrics::{compute_metrics, DashboardMetrics};
use specboard_core::project::try_scan;

use super::PathQuery;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/metrics?path=: dashboard roll-ups for a project.
pub async fn get_metrics(
    State(app): State<AppState>,
    Query(q): Query<PathQuery>,
) -> Result<Json<DashboardMetrics>, AppError> {
    let root = app.gate(&q.path)?;
    let project = try_scan(&root).await?;
    Ok(Json(compute_metrics(&project)))
}
