//! Applies module-contributed migrations, recording each in `schema_migrations`.

use std::collections::HashSet;

use anyhow::Context;
use libris_kernel::Migration;
use sqlx::PgPool;

const CREATE_LEDGER: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT        NOT NULL,
        id         TEXT        NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Migrations not yet recorded as applied, in their given order.
pub fn pending<'a>(
    migrations: &'a [(String, Migration)],
    applied: &HashSet<(String, String)>,
) -> Vec<&'a (String, Migration)> {
    migrations
        .iter()
        .filter(|(module, migration)| !applied.contains(&(module.clone(), migration.id.to_string())))
        .collect()
}

/// Apply every pending migration, each in its own transaction.
/// Returns how many were applied.
pub async fn run(pool: &PgPool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::raw_sql(CREATE_LEDGER)
        .execute(pool)
        .await
        .with_context(|| "failed to create schema_migrations")?;

    let applied: HashSet<(String, String)> =
        sqlx::query_as::<_, (String, String)>("SELECT module, id FROM schema_migrations")
            .fetch_all(pool)
            .await
            .with_context(|| "failed to read schema_migrations")?
            .into_iter()
            .collect();

    let todo = pending(migrations, &applied);
    for (module, migration) in &todo {
        let mut tx = pool.begin().await?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(target: "libris-db", module = %module, id = migration.id, "applied migration");
    }

    Ok(todo.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migration(id: &'static str) -> Migration {
        Migration { id, up: "SELECT 1;" }
    }

    #[test]
    fn test_pending_skips_applied_and_keeps_order() {
        let migrations = vec![
            ("authors".to_string(), migration("001_init")),
            ("books".to_string(), migration("001_init")),
            ("books".to_string(), migration("002_categories")),
        ];
        let applied = HashSet::from([("authors".to_string(), "001_init".to_string())]);

        let ids: Vec<(&str, &str)> = pending(&migrations, &applied)
            .into_iter()
            .map(|(module, m)| (module.as_str(), m.id))
            .collect();

        assert_eq!(ids, vec![("books", "001_init"), ("books", "002_categories")]);
    }
}
