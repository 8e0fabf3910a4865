use libris_db::Entity;
use serde::{Deserialize, Serialize};

use crate::modules::books::BookSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub books: Vec<BookSummary>,
}

impl Category {
    pub fn from_draft(id: i64, draft: &CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            books: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
}

impl Entity for Category {
    type Draft = CategoryDraft;

    const COLLECTION: &'static str = "categories";
    const NAME: &'static str = "category";
    const LABEL: &'static str = "Category";

    fn id(&self) -> i64 {
        self.id
    }
}
