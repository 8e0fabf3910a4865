use libris_db::Entity;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::modules::{books::BookSummary, users::UserSummary};

/// A book lent to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub borrowed_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    pub book: Option<BookSummary>,
    pub user: Option<UserSummary>,
}

impl Borrowing {
    pub fn from_draft(id: i64, draft: &BorrowingDraft) -> Self {
        Self {
            id,
            book_id: draft.book_id,
            user_id: draft.user_id,
            borrowed_at: draft.borrowed_at(),
            due_date: draft.due_date,
            book: None,
            user: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BorrowingDraft {
    pub book_id: i64,
    pub user_id: i64,
    /// Defaults to the time of the write.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub borrowed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
}

impl BorrowingDraft {
    pub fn borrowed_at(&self) -> OffsetDateTime {
        self.borrowed_at.unwrap_or_else(OffsetDateTime::now_utc)
    }
}

impl Entity for Borrowing {
    type Draft = BorrowingDraft;

    const COLLECTION: &'static str = "borrowings";
    const NAME: &'static str = "borrowing";
    const LABEL: &'static str = "Borrowing";

    fn id(&self) -> i64 {
        self.id
    }
}
