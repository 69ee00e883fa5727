use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tracing::{error, instrument};

use crate::{gifts::repo::Gift, state::AppState};

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/", get(search_by_params).post(search_by_body))
}

/// Query-string criteria. Values that parse as JSON scalars are matched as
/// such so numeric document fields can be filtered from a URL.
fn criteria_from_params(params: HashMap<String, String>) -> Value {
    let mut criteria = Map::new();
    for (field, raw) in params {
        criteria.insert(field, coerce_scalar(&raw));
    }
    Value::Object(criteria)
}

fn coerce_scalar(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Value::from(b);
    }
    Value::String(raw.to_string())
}

#[instrument(skip(state))]
pub async fn search_by_params(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<Value>)> {
    let criteria = criteria_from_params(params);
    let gifts = Gift::search(&state.db, &criteria).await.map_err(internal)?;
    Ok(Json(gifts.into_iter().map(|g| g.data).collect()))
}

#[instrument(skip(state, body))]
pub async fn search_by_body(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<Value>)> {
    if !body.is_object() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Search criteria must be a JSON object" })),
        ));
    }
    let gifts = Gift::search(&state.db, &body).await.map_err(internal)?;
    Ok(Json(gifts.into_iter().map(|g| g.data).collect()))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, Json<Value>) {
    error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_coerce_to_their_json_types() {
        assert_eq!(coerce_scalar("3"), Value::from(3));
        assert_eq!(coerce_scalar("2.5"), Value::from(2.5));
        assert_eq!(coerce_scalar("true"), Value::from(true));
        assert_eq!(coerce_scalar("Lamp"), Value::from("Lamp"));
    }

    #[test]
    fn params_become_a_criteria_object() {
        let mut params = HashMap::new();
        params.insert("category".to_string(), "Furniture".to_string());
        params.insert("age_years".to_string(), "2".to_string());
        let criteria = criteria_from_params(params);
        assert_eq!(criteria["category"], "Furniture");
        assert_eq!(criteria["age_years"], 2);
    }

    #[test]
    fn no_params_match_everything() {
        let criteria = criteria_from_params(HashMap::new());
        assert_eq!(criteria, json!({}));
    }
}
