//! In-process [`Store`] used by tests and by local runs without Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{Entity, Store, StoreError};

type Build<E> = fn(i64, &<E as Entity>::Draft) -> E;
type UniqueKey<E> = fn(&E) -> String;

struct Rows<E> {
    records: BTreeMap<i64, E>,
    next_id: i64,
}

/// Keeps records in id order behind a lock.
///
/// It has no knowledge of relations: `build` turns a draft into the record a
/// read returns, so preloaded relations stay whatever `build` makes them.
pub struct MemoryStore<E: Entity> {
    rows: RwLock<Rows<E>>,
    build: Build<E>,
    unique: Option<UniqueKey<E>>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new(build: Build<E>) -> Self {
        Self {
            rows: RwLock::new(Rows {
                records: BTreeMap::new(),
                next_id: 1,
            }),
            build,
            unique: None,
        }
    }

    /// Reject writes whose `key` collides with another record's.
    pub fn unique_by(mut self, key: UniqueKey<E>) -> Self {
        self.unique = Some(key);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_unique(&self, rows: &Rows<E>, id: i64, candidate: &E) -> Result<(), StoreError> {
        let Some(key) = self.unique else {
            return Ok(());
        };
        let wanted = key(candidate);
        let taken = rows
            .records
            .iter()
            .any(|(other_id, record)| *other_id != id && key(record) == wanted);
        if taken {
            return Err(StoreError::duplicate(format!("{}_unique", E::COLLECTION)));
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> Store<E> for MemoryStore<E> {
    async fn find_all(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.rows.read().records.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<E, StoreError> {
        self.rows
            .read()
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        let mut rows = self.rows.write();
        let id = rows.next_id;
        let record = (self.build)(id, draft);
        self.check_unique(&rows, id, &record)?;

        rows.next_id += 1;
        rows.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, StoreError> {
        let mut rows = self.rows.write();
        let record = (self.build)(id, draft);
        self.check_unique(&rows, id, &record)?;

        rows.next_id = rows.next_id.max(id + 1);
        rows.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.rows
            .write()
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
