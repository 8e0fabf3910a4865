use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};

use super::models::{User, UserDraft};
use super::password;

const SELECT_USERS: &str = "SELECT id, username, email, active FROM users";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    active: bool,
}

#[derive(sqlx::FromRow)]
struct UpsertedUserRow {
    #[sqlx(flatten)]
    user: UserRow,
    inserted: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            active: row.active,
        }
    }
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<User> for PgUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USERS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USERS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, active
            "#,
        )
        .bind(&draft.username)
        .bind(&draft.email)
        .bind(password::hash(&draft.password))
        .bind(draft.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: &UserDraft) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;
        let upserted = sqlx::query_as::<_, UpsertedUserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash, active)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
                SET username = EXCLUDED.username,
                    email = EXCLUDED.email,
                    password_hash = EXCLUDED.password_hash,
                    active = EXCLUDED.active
            RETURNING id, username, email, active, (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(&draft.username)
        .bind(&draft.email)
        .bind(password::hash(&draft.password))
        .bind(draft.active)
        .fetch_one(&mut *tx)
        .await?;

        if upserted.inserted {
            sync_id_sequence(&mut *tx, "users").await?;
        }
        tx.commit().await?;

        Ok(upserted.user.into())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "users", id).await
    }
}
