//! Account domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential record for one marketplace account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// False until the email address is verified
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = present, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_verified(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let now = Utc::now();
        let account = Account {
            id: 7,
            email: "seller@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            active: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("deleted_at"));
        assert!(!account.is_verified());
    }
}
