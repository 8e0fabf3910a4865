use libris_db::Entity;
use serde::{Deserialize, Serialize};

use crate::modules::{books::BookSummary, users::UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: String,
    pub book: Option<BookSummary>,
    pub user: Option<UserSummary>,
}

impl Review {
    pub fn from_draft(id: i64, draft: &ReviewDraft) -> Self {
        Self {
            id,
            book_id: draft.book_id,
            user_id: draft.user_id,
            rating: draft.rating,
            comment: draft.comment.clone(),
            book: None,
            user: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDraft {
    pub book_id: i64,
    pub user_id: i64,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Review as listed on its book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: String,
}

impl Entity for Review {
    type Draft = ReviewDraft;

    const COLLECTION: &'static str = "reviews";
    const NAME: &'static str = "review";
    const LABEL: &'static str = "Review";

    fn id(&self) -> i64 {
        self.id
    }
}
