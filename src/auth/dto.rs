use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for profile update. Missing fields deserialize to empty
/// strings and fail validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub authtoken: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub authtoken: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub authtoken: String,
}

/// One entry of a 400 validation listing.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_frontend_field_names() {
        let resp = LoginResponse {
            authtoken: "t".into(),
            user_name: "A".into(),
            user_email: "a@b.com".into(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"authtoken\""));
        assert!(json.contains("\"userName\""));
        assert!(json.contains("\"userEmail\""));
    }

    #[test]
    fn register_request_accepts_camel_case_names() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.com","firstName":"A","lastName":"B","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name, "A");
        assert_eq!(req.last_name, "B");
    }
}
