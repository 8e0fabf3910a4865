use libris_db::Entity;
use serde::{Deserialize, Serialize};

use crate::modules::books::BookSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub books: Vec<BookSummary>,
}

impl Publisher {
    pub fn from_draft(id: i64, draft: &PublisherDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            address: draft.address.clone(),
            phone: draft.phone.clone(),
            books: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublisherDraft {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// Embedded in books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherSummary {
    pub id: i64,
    pub name: String,
}

impl Entity for Publisher {
    type Draft = PublisherDraft;

    const COLLECTION: &'static str = "publishers";
    const NAME: &'static str = "publisher";
    const LABEL: &'static str = "Publisher";

    fn id(&self) -> i64 {
        self.id
    }
}
