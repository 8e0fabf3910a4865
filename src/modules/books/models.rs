use libris_db::Entity;
use serde::{Deserialize, Serialize};

use crate::modules::{
    authors::AuthorSummary, categories::CategorySummary, publishers::PublisherSummary,
    reviews::ReviewSummary,
};

/// A catalog title with everything a client shows next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub published_year: i32,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub availability: bool,
    pub author: Option<AuthorSummary>,
    pub publisher: Option<PublisherSummary>,
    pub categories: Vec<CategorySummary>,
    pub reviews: Vec<ReviewSummary>,
}

impl Book {
    /// The record for `draft` with no relations resolved.
    pub fn from_draft(id: i64, draft: &BookDraft) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            published_year: draft.published_year,
            author_id: draft.author_id,
            publisher_id: draft.publisher_id,
            availability: draft.availability,
            author: None,
            publisher: None,
            categories: Vec::new(),
            reviews: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_year: i32,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub publisher_id: Option<i64>,
    #[serde(default = "available_by_default")]
    pub availability: bool,
    /// Replaces the book's whole category set.
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

fn available_by_default() -> bool {
    true
}

/// Book as listed under an author, publisher or category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub published_year: i32,
    pub availability: bool,
}

impl Entity for Book {
    type Draft = BookDraft;

    const COLLECTION: &'static str = "books";
    const NAME: &'static str = "book";
    const LABEL: &'static str = "Book";

    fn id(&self) -> i64 {
        self.id
    }
}
