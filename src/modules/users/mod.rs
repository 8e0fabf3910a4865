//! Library members.
//!
//! Passwords are accepted on create and update, stored salted and hashed, and
//! never returned: [`User`] has no password field, so neither responses nor
//! cache entries can carry one.

mod models;
mod password;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};

pub use models::{User, UserDraft, UserSummary};
pub use store::PgUserStore;

impl Resource for User {
    fn validate(draft: &UserDraft) -> Result<(), Vec<Value>> {
        Violations::new()
            .require(&draft.username, "username")
            .check(draft.email.contains('@'), "email", "must be an email address")
            .require(&draft.password, "password")
            .finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_users",
            up: r#"
                CREATE TABLE IF NOT EXISTS users (
                    id            BIGSERIAL PRIMARY KEY,
                    username      TEXT NOT NULL CONSTRAINT users_username_key UNIQUE,
                    email         TEXT NOT NULL CONSTRAINT users_email_key UNIQUE,
                    password_hash TEXT NOT NULL,
                    active        BOOLEAN NOT NULL DEFAULT TRUE
                );
            "#,
        }]
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "username": { "type": "string" },
                "email": { "type": "string" },
                "active": { "type": "boolean" }
            },
            "required": ["id", "username", "email", "active"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "username": { "type": "string", "minLength": 1 },
                "email": { "type": "string", "format": "email" },
                "password": { "type": "string", "minLength": 1, "writeOnly": true },
                "active": { "type": "boolean", "default": true }
            },
            "required": ["username", "email", "password"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<User>(Arc::new(PgUserStore::new(pool)), cache)
}

/// JSON schema of [`UserSummary`].
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "format": "int64" },
            "username": { "type": "string" },
            "email": { "type": "string" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(value: Value) -> UserDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_active_defaults_to_true() {
        let draft = draft(json!({"username": "ada", "email": "ada@example.org", "password": "s3cret"}));
        assert!(draft.active);
        assert!(User::validate(&draft).is_ok());
    }

    #[test]
    fn test_password_never_serialized() {
        let draft = draft(json!({"username": "ada", "email": "ada@example.org", "password": "s3cret"}));
        let user = User::from_draft(1, &draft);

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("password"));
        assert!(!format!("{draft:?}").contains("s3cret"));
    }

    #[test]
    fn test_field_violations() {
        let draft = draft(json!({"username": "", "email": "nope", "password": ""}));
        let fields: Vec<Value> = User::validate(&draft)
            .unwrap_err()
            .into_iter()
            .map(|detail| detail["field"].clone())
            .collect();

        assert_eq!(fields, vec![json!("username"), json!("email"), json!("password")]);
    }
}
