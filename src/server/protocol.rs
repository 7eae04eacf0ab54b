use serde::{Deserialize, Serialize};

/// Credentials accepted by `POST /login`, JSON or form encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Health endpoint response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub requests_served: u64,
    pub upstream_errors: u64,
    pub uptime_secs: u64,
    pub upstream: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_login_ignores_extra_fields() {
        let login: LoginRequest =
            serde_json::from_str(r#"{"user":"ada","password":"secret","extra":1}"#).unwrap();
        assert_eq!(login.user.as_deref(), Some("ada"));
        assert_eq!(login.password.as_deref(), Some("secret"));
    }

    #[test]
    fn empty_object_is_empty_login() {
        let login: LoginRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(login, LoginRequest::default());
    }

    #[test]
    fn absent_fields_not_forwarded() {
        let login = LoginRequest {
            user: Some("ada".to_string()),
            password: None,
        };
        assert_eq!(serde_json::to_string(&login).unwrap(), r#"{"user":"ada"}"#);
    }
}
