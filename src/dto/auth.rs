use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login is a role-selection form, not credential verification: the caller
/// supplies who they are and which dashboard they want.
#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    /// Student roll number or staff id.
    pub id: String,
    pub name: String,
    pub email: String,
    /// "student" or "staff".
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}
