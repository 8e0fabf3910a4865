use libris_db::Entity;
use serde::{Deserialize, Serialize};

use crate::modules::books::BookSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: String,
    pub email: String,
    pub books: Vec<BookSummary>,
}

impl Author {
    /// The record a freshly written draft reads back as, before any book
    /// references it.
    pub fn from_draft(id: i64, draft: &AuthorDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            bio: draft.bio.clone(),
            email: draft.email.clone(),
            books: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorDraft {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: String,
}

/// Author as embedded in a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
}

impl Entity for Author {
    type Draft = AuthorDraft;

    const COLLECTION: &'static str = "authors";
    const NAME: &'static str = "author";
    const LABEL: &'static str = "Author";

    fn id(&self) -> i64 {
        self.id
    }
}
