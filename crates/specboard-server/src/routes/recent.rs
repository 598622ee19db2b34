use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddRecentRequest {
    pub path: String,
}

fn snapshot(app: &AppState) -> Result<Vec<String>, AppError> {
    let recent = app
        .recent
        .lock()
        .map_err(|_| AppError::internal("recent projects lock poisoned"))?;
    Ok(recent.list().to_vec())
}

/// GET /api/recent: recently opened project paths, newest first.
pub async fn list_recent(State(app): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(snapshot(&app)?))
}

/// POST /api/recent: record a project as most recently opened.
pub async fn add_recent(
    State(app): State<AppState>,
    Json(body): Json<AddRecentRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    let root = app.gate(&body.path)?;
    let root = root.to_string_lossy().into_owned();
    {
        let mut recent = app
            .recent
            .lock()
            .map_err(|_| AppError::internal("recent projects lock poisoned"))?;
        recent.add(&root)?;
    }
    Ok(Json(snapshot(&app)?))
}
