//! Unit tests for authentication module

#[cfg(test)]
mod tests {
    use crate::auth::model::{LoginRequest, LoginResponse};

    #[test]
    fn test_login_request_trims_credentials() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username":"  alice ","password":" pw1  "}"#).unwrap();
        assert_eq!(request.credentials(), ("alice", "pw1"));
    }

    #[test]
    fn test_login_request_missing_fields() {
        let request: LoginRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.credentials(), ("", ""));
    }

    #[test]
    fn test_login_response_shapes() {
        assert_eq!(
            serde_json::to_value(LoginResponse::accepted("alice")).unwrap(),
            serde_json::json!({"success": true, "user": "alice"})
        );
        assert_eq!(
            serde_json::to_value(LoginResponse::rejected()).unwrap(),
            serde_json::json!({"success": false, "error": "Invalid credentials"})
        );
    }
}
