use std::fmt;

use libris_db::Entity;
use serde::{Deserialize, Serialize};

/// A library member. The password never leaves the store, so it has no
/// field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub active: bool,
}

impl User {
    pub fn from_draft(id: i64, draft: &UserDraft) -> Self {
        Self {
            id,
            username: draft.username.clone(),
            email: draft.email.clone(),
            active: draft.active,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDraft")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("active", &self.active)
            .finish()
    }
}

/// Embedded in reviews and borrow records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl Entity for User {
    type Draft = UserDraft;

    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "user";
    const LABEL: &'static str = "User";

    fn id(&self) -> i64 {
        self.id
    }
}
