//! Postgres store tests. Each test gets a fresh database from `#[sqlx::test]`
//! and applies the module migrations through the same runner `migrate` uses.
//!
//! Run with `DATABASE_URL` pointing at a Postgres server:
//! `cargo test --test pg_stores -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use libris_app::{
    app::build_registry,
    catalog::store_error,
    modules::{
        authors::{AuthorDraft, PgAuthorStore},
        books::{Book, BookDraft, PgBookStore},
        borrowings::{BorrowingDraft, PgBorrowingStore},
        categories::{CategoryDraft, PgCategoryStore},
        publishers::{PgPublisherStore, PublisherDraft},
        reviews::{PgReviewStore, ReviewDraft},
        users::{PgUserStore, UserDraft},
    },
};
use libris_cache::{CacheAside, MemoryCache};
use libris_db::{Store, StoreError};
use sqlx::PgPool;
use time::{Duration as TimeDuration, OffsetDateTime};

async fn migrated(pool: &PgPool) {
    let cache = CacheAside::new(Arc::new(MemoryCache::new(100)), Duration::from_secs(60));
    let registry = build_registry(pool, &cache);
    let applied = libris_db::migrate::run(pool, &registry.collect_migrations())
        .await
        .unwrap();
    assert_eq!(applied, registry.collect_migrations().len());
}

fn author(name: &str) -> AuthorDraft {
    AuthorDraft {
        name: name.to_string(),
        bio: String::new(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

fn book(title: &str, author_id: Option<i64>) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        description: String::new(),
        published_year: 1965,
        author_id,
        publisher_id: None,
        availability: true,
        category_ids: Vec::new(),
    }
}

fn user(username: &str) -> UserDraft {
    UserDraft {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "hunter22".to_string(),
        active: true,
    }
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn book_embeds_author_publisher_categories_and_reviews(pool: PgPool) {
    migrated(&pool).await;

    let author = PgAuthorStore::new(pool.clone())
        .create(&author("Herbert"))
        .await
        .unwrap();
    let publisher = PgPublisherStore::new(pool.clone())
        .create(&PublisherDraft {
            name: "Chilton".to_string(),
            address: String::new(),
            phone: String::new(),
        })
        .await
        .unwrap();
    let categories = PgCategoryStore::new(pool.clone());
    let sf = categories
        .create(&CategoryDraft { name: "SF".to_string() })
        .await
        .unwrap();
    let classic = categories
        .create(&CategoryDraft { name: "Classic".to_string() })
        .await
        .unwrap();
    let reader = PgUserStore::new(pool.clone()).create(&user("reader")).await.unwrap();

    let books = PgBookStore::new(pool.clone());
    let created = books
        .create(&BookDraft {
            publisher_id: Some(publisher.id),
            category_ids: vec![classic.id, sf.id, sf.id],
            ..book("Dune", Some(author.id))
        })
        .await
        .unwrap();
    let review = PgReviewStore::new(pool.clone())
        .create(&ReviewDraft {
            book_id: created.id,
            user_id: reader.id,
            rating: 5,
            comment: "spice".to_string(),
        })
        .await
        .unwrap();

    let found = books.find_by_id(created.id).await.unwrap();
    assert_eq!(found.author.as_ref().map(|a| a.name.as_str()), Some("Herbert"));
    assert_eq!(found.publisher.as_ref().map(|p| p.id), Some(publisher.id));
    let category_ids: Vec<i64> = found.categories.iter().map(|c| c.id).collect();
    assert_eq!(category_ids, vec![sf.id, classic.id]);
    assert_eq!(found.reviews.len(), 1);
    assert_eq!(found.reviews[0].id, review.id);
    assert_eq!(found.reviews[0].user_id, reader.id);

    let listed = PgAuthorStore::new(pool.clone())
        .find_by_id(author.id)
        .await
        .unwrap();
    assert_eq!(listed.books.len(), 1);
    assert_eq!(listed.books[0].title, "Dune");

    let fetched_review = PgReviewStore::new(pool.clone())
        .find_by_id(review.id)
        .await
        .unwrap();
    assert_eq!(fetched_review.book.map(|b| b.id), Some(created.id));
    assert_eq!(fetched_review.user.map(|u| u.username), Some("reader".to_string()));
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn update_replaces_book_categories(pool: PgPool) {
    migrated(&pool).await;

    let categories = PgCategoryStore::new(pool.clone());
    let sf = categories
        .create(&CategoryDraft { name: "SF".to_string() })
        .await
        .unwrap();
    let classic = categories
        .create(&CategoryDraft { name: "Classic".to_string() })
        .await
        .unwrap();

    let books = PgBookStore::new(pool.clone());
    let created = books
        .create(&BookDraft {
            category_ids: vec![sf.id, classic.id],
            ..book("Dune", None)
        })
        .await
        .unwrap();
    let updated = books
        .update(
            created.id,
            &BookDraft {
                category_ids: vec![classic.id],
                ..book("Dune", None)
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = updated.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Classic"]);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn update_of_missing_id_inserts_and_advances_the_sequence(pool: PgPool) {
    migrated(&pool).await;

    let authors = PgAuthorStore::new(pool.clone());
    let upserted = authors.update(10, &author("Le Guin")).await.unwrap();
    assert_eq!(upserted.id, 10);

    let next = authors.create(&author("Herbert")).await.unwrap();
    assert_eq!(next.id, 11);

    let users = PgUserStore::new(pool.clone());
    assert_eq!(users.update(7, &user("ged")).await.unwrap().id, 7);
    assert_eq!(users.create(&user("tenar")).await.unwrap().id, 8);

    let books = PgBookStore::new(pool.clone());
    assert_eq!(books.update(3, &book("Earthsea", None)).await.unwrap().id, 3);
    assert_eq!(books.create(&book("Tehanu", None)).await.unwrap().id, 4);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn update_of_existing_id_keeps_the_row(pool: PgPool) {
    migrated(&pool).await;

    let authors = PgAuthorStore::new(pool.clone());
    let created = authors.create(&author("Herbert")).await.unwrap();
    let updated = authors
        .update(
            created.id,
            &AuthorDraft {
                bio: "Dune".to_string(),
                ..author("Frank Herbert")
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Frank Herbert");
    assert_eq!(authors.find_all().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn dangling_author_id_is_a_bad_request(pool: PgPool) {
    migrated(&pool).await;

    let err = PgBookStore::new(pool.clone())
        .create(&book("Dune", Some(999)))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidInput { .. }), "{err:?}");
    assert_eq!(store_error::<Book>(err).status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn duplicate_title_is_a_conflict(pool: PgPool) {
    migrated(&pool).await;

    let books = PgBookStore::new(pool.clone());
    books.create(&book("Dune", None)).await.unwrap();
    let err = books.create(&book("Dune", None)).await.unwrap_err();

    match &err {
        StoreError::Duplicate { constraint } => assert_eq!(constraint, "books_title_key"),
        other => panic!("expected duplicate, got {other:?}"),
    }
    assert_eq!(store_error::<Book>(err).status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn deleting_an_author_orphans_their_books(pool: PgPool) {
    migrated(&pool).await;

    let authors = PgAuthorStore::new(pool.clone());
    let author = authors.create(&author("Herbert")).await.unwrap();
    let books = PgBookStore::new(pool.clone());
    let created = books.create(&book("Dune", Some(author.id))).await.unwrap();

    authors.delete(author.id).await.unwrap();

    let found = books.find_by_id(created.id).await.unwrap();
    assert_eq!(found.author_id, None);
    assert!(found.author.is_none());
    assert!(matches!(
        authors.delete(author.id).await,
        Err(StoreError::NotFound)
    ));
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn deleting_a_book_removes_its_reviews(pool: PgPool) {
    migrated(&pool).await;

    let reader = PgUserStore::new(pool.clone()).create(&user("reader")).await.unwrap();
    let books = PgBookStore::new(pool.clone());
    let created = books.create(&book("Dune", None)).await.unwrap();
    let reviews = PgReviewStore::new(pool.clone());
    let review = reviews
        .create(&ReviewDraft {
            book_id: created.id,
            user_id: reader.id,
            rating: 4,
            comment: String::new(),
        })
        .await
        .unwrap();

    books.delete(created.id).await.unwrap();

    assert!(matches!(
        reviews.find_by_id(review.id).await,
        Err(StoreError::NotFound)
    ));
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn duplicate_username_is_a_conflict(pool: PgPool) {
    migrated(&pool).await;

    let users = PgUserStore::new(pool.clone());
    users.create(&user("ged")).await.unwrap();
    let err = users
        .create(&UserDraft {
            email: "other@example.com".to_string(),
            ..user("ged")
        })
        .await
        .unwrap_err();

    match err {
        StoreError::Duplicate { constraint } => assert_eq!(constraint, "users_username_key"),
        other => panic!("expected duplicate, got {other:?}"),
    }
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn borrowing_defaults_borrowed_at_and_embeds_book_and_user(pool: PgPool) {
    migrated(&pool).await;

    let reader = PgUserStore::new(pool.clone()).create(&user("reader")).await.unwrap();
    let created = PgBookStore::new(pool.clone())
        .create(&book("Dune", None))
        .await
        .unwrap();
    let before = OffsetDateTime::now_utc() - TimeDuration::minutes(1);

    let borrowings = PgBorrowingStore::new(pool.clone());
    let borrowing = borrowings
        .create(&BorrowingDraft {
            book_id: created.id,
            user_id: reader.id,
            borrowed_at: None,
            due_date: OffsetDateTime::now_utc() + TimeDuration::days(14),
        })
        .await
        .unwrap();

    assert!(borrowing.borrowed_at > before);
    assert_eq!(borrowing.book.map(|b| b.title), Some("Dune".to_string()));
    assert_eq!(borrowing.user.map(|u| u.id), Some(reader.id));

    let upserted = borrowings
        .update(
            40,
            &BorrowingDraft {
                book_id: created.id,
                user_id: reader.id,
                borrowed_at: None,
                due_date: OffsetDateTime::now_utc() + TimeDuration::days(7),
            },
        )
        .await
        .unwrap();
    assert_eq!(upserted.id, 40);

    PgUserStore::new(pool.clone()).delete(reader.id).await.unwrap();
    assert!(borrowings.find_all().await.unwrap().is_empty());
}
