use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login request payload
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Trimmed credentials; absent fields become empty strings.
    pub fn credentials(&self) -> (&str, &str) {
        (
            self.username.as_deref().unwrap_or_default().trim(),
            self.password.as_deref().unwrap_or_default().trim(),
        )
    }
}

/// Login outcome
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResponse {
    pub fn accepted(user: &str) -> Self {
        Self {
            success: true,
            user: Some(user.to_string()),
            error: None,
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            user: None,
            error: Some("Invalid credentials".to_string()),
        }
    }
}
