use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{gifts::repo::Gift, state::AppState};

pub fn gift_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gifts).post(create_gift))
        .route("/:id", get(get_gift))
}

#[instrument(skip(state))]
pub async fn list_gifts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<Value>)> {
    let gifts = Gift::list(&state.db).await.map_err(internal)?;
    Ok(Json(gifts.into_iter().map(|g| g.data).collect()))
}

#[instrument(skip(state))]
pub async fn get_gift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let gift = Gift::find_by_id(&state.db, &id).await.map_err(internal)?;
    match gift {
        Some(g) => Ok(Json(g.data)),
        None => {
            warn!(%id, "gift not found");
            Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Gift not found" })),
            ))
        }
    }
}

#[instrument(skip(state, body))]
pub async fn create_gift(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let doc = match body {
        Value::Object(m) => m,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Gift must be a JSON object" })),
            ))
        }
    };

    let gift = Gift::insert(&state.db, doc).await.map_err(internal)?;
    info!(gift_id = %gift.id, "gift created");
    Ok((StatusCode::CREATED, Json(gift.data)))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, Json<Value>) {
    error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}
