use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use specboard_core::checkbox::{toggle_file, ToggleOutcome};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub file_path: String,
    pub line_index: i64,
}

/// POST /api/checklist/toggle: flip one checkbox line in a markdown file.
///
/// A rejected toggle (bad index, not a checkbox) answers 400 with the outcome
/// as body; the file is left untouched in that case.
pub async fn toggle_checklist(
    State(app): State<AppState>,
    Json(body): Json<ToggleRequest>,
) -> Result<(StatusCode, Json<ToggleOutcome>), AppError> {
    let path = app.gate(&body.file_path)?;
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if !is_markdown {
        return Err(AppError::bad_request(format!(
            "not a markdown file: {}",
            path.display()
        )));
    }

    let line_index = body.line_index;
    let outcome = tokio::task::spawn_blocking(move || toggle_file(&path, line_index))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(outcome)))
}
