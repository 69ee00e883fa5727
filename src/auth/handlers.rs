use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            FieldError, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
            UpdateProfileRequest, UpdateProfileResponse,
        },
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/update", put(update))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_names(first_name: &str, last_name: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if first_name.is_empty() {
        errors.push(FieldError {
            field: "firstName",
            message: "First name is required",
        });
    }
    if last_name.is_empty() {
        errors.push(FieldError {
            field: "lastName",
            message: "Last name is required",
        });
    }
    errors
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, Json<Value>) {
    error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, (StatusCode, Json<Value>)> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid email" })),
        ));
    }

    // Uniqueness is a lookup-then-insert check, not a database constraint.
    match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email already exists" })),
            ));
        }
        Ok(None) => {}
        Err(e) => return Err(internal(e)),
    }

    let hash = hash_password(&payload.password).map_err(internal)?;

    let user = User::create(
        &state.db,
        &payload.email,
        &payload.first_name,
        &payload.last_name,
        &hash,
    )
    .await
    .map_err(internal)?;

    let keys = JwtKeys::from_ref(&state);
    let authtoken = keys.sign(user.id).map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse {
        authtoken,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<Value>)> {
    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            ));
        }
        Err(e) => return Err(internal(e)),
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(internal)?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login wrong password");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Wrong password" })),
        ));
    }

    let keys = JwtKeys::from_ref(&state);
    let authtoken = keys.sign(user.id).map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        authtoken,
        user_name: user.first_name,
        user_email: user.email,
    }))
}

/// Legacy contract: the target account comes from the `email` request
/// header, not from the presented token.
#[instrument(skip(state, headers, payload))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, (StatusCode, Json<Value>)> {
    let errors = validate_names(&payload.first_name, &payload.last_name);
    if !errors.is_empty() {
        warn!(?errors, "validation errors in update request");
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))));
    }

    let email = match headers.get("email").and_then(|v| v.to_str().ok()) {
        Some(e) => e.to_string(),
        None => {
            warn!("email header missing on update");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email not found in the request headers" })),
            ));
        }
    };

    let user = match User::update_names(&state.db, &email, &payload.first_name, &payload.last_name)
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "update unknown email");
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            ));
        }
        Err(e) => return Err(internal(e)),
    };

    let keys = JwtKeys::from_ref(&state);
    let authtoken = keys.sign(user.id).map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user profile updated");
    Ok(Json(UpdateProfileResponse { authtoken }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn empty_names_produce_one_error_each() {
        let errors = validate_names("", "");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "firstName");
        assert_eq!(errors[1].field, "lastName");
    }

    #[test]
    fn valid_names_produce_no_errors() {
        assert!(validate_names("A", "B").is_empty());
    }

    #[test]
    fn validation_listing_serializes_with_field_and_message() {
        let errors = validate_names("", "B");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "firstName");
        assert_eq!(json[0]["message"], "First name is required");
    }
}
