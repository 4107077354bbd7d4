use serde::{Deserialize, Serialize};

use crate::users::dto::PublicUser;

/// Request body for login. Fields are optional so absence is reported as a 400
/// from the login flow rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

/// Request body for local signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleSignupRequest {
    pub credential: Option<String>,
}

/// Response returned after login or signup.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct GoogleSignupResponse {
    pub user: PublicUser,
}
