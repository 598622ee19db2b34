use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use specboard_core::paths::is_spec_kit_project;
use specboard_core::watch::{subscribe, WatchOptions};
use specboard_core::SpecboardError;
use std::convert::Infallible;
use tokio_stream::StreamExt as _;

use super::PathQuery;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/watch?path=: SSE stream of `{"type":"update","data":<Project>}`.
///
/// The first message is the current snapshot. Closing the connection drops
/// the subscription, which stops its poller and debounce timer.
pub async fn sse_watch(
    State(app): State<AppState>,
    Query(q): Query<PathQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let root = app.gate(&q.path)?;
    if !is_spec_kit_project(&root) {
        return Err(SpecboardError::NotAProject(root).into());
    }

    let subscription = subscribe(&root, WatchOptions::from_config(&app.config));
    let stream = subscription.filter_map(|event| match serde_json::to_string(&event) {
        Ok(data) => Some(Ok::<Event, Infallible>(Event::default().data(data))),
        Err(e) => {
            tracing::warn!(error = %e, "could not serialize update");
            None
        }
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
