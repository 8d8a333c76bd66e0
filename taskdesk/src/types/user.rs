use serde::{Deserialize, Serialize};

use super::flex::{opt_string_or_number, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub user_code: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role_id: u32,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub position_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub level_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUserData {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub position_code: String,
    pub level_code: String,
}

/// A role as listed by `GET /api/roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}
