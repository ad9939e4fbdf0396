use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

const MAX_CLIENT_ID_LEN: usize = 128;

// Validated client identity - opaque, non-empty, taken verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub fn parse(id: &str) -> Result<Self, AppError> {
        if id.is_empty() {
            return Err(AppError::InvalidClientId("client id is empty".to_string()));
        }
        // opaque key: " c1" and "c1" are different clients, so refuse both forms
        if id.trim() != id {
            return Err(AppError::InvalidClientId(
                "client id has leading or trailing whitespace".to_string(),
            ));
        }
        if id.chars().count() > MAX_CLIENT_ID_LEN {
            return Err(AppError::InvalidClientId(format!(
                "client id longer than {MAX_CLIENT_ID_LEN} characters"
            )));
        }
        if id.chars().any(char::is_control) {
            return Err(AppError::InvalidClientId(
                "client id contains control characters".to_string(),
            ));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Query for the dashboard thermometer lookup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermometerQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_is_kept_verbatim() {
        let id = ClientId::parse("c1 inner space").unwrap();
        assert_eq!(id.as_str(), "c1 inner space");
        assert_eq!(id.to_string(), "c1 inner space");
    }

    #[test]
    fn client_id_rejects_surrounding_whitespace() {
        assert!(ClientId::parse(" c1").is_err());
        assert!(ClientId::parse("c1 ").is_err());
        assert!(ClientId::parse("\tc1").is_err());
        assert!(ClientId::parse("c1").is_ok());
    }

    #[test]
    fn client_id_rejects_garbage() {
        assert!(ClientId::parse("").is_err());
        assert!(ClientId::parse("   ").is_err());
        assert!(ClientId::parse("a\nb").is_err());
        assert!(ClientId::parse(&"x".repeat(MAX_CLIENT_ID_LEN + 1)).is_err());
        assert!(ClientId::parse(&"x".repeat(MAX_CLIENT_ID_LEN)).is_ok());
    }
}
