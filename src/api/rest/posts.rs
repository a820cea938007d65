//! Replay endpoint

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::types::ReplayPost;

/// GET /api/posts - Every stored record reshaped as a board post, in store order
pub async fn replay_posts(State(state): State<Arc<AppState>>) -> Json<Vec<ReplayPost>> {
    let records = state.store.records();
    let mut rng = rand::thread_rng();

    Json(
        records
            .iter()
            .map(|record| ReplayPost::from_record(record, &mut rng))
            .collect(),
    )
}
