//! PostgreSQL implementation of the document store.
//!
//! Each collection is a table of JSONB documents:
//!
//! ```sql
//! CREATE TABLE users (seq BIGSERIAL PRIMARY KEY, doc JSONB NOT NULL);
//! ```
//!
//! `seq` only records insertion order; record identity lives inside `doc`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::DocumentStore;
use crate::config::StoreSettings;
use crate::domain::{CollectionName, Document, Filter};
use crate::error::MirrorError;

/// PostgreSQL-backed document store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and creates missing collection tables.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Connection`] if the database is unreachable
    /// or the tables cannot be created.
    pub async fn connect(settings: &StoreSettings) -> Result<Self, MirrorError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect(&settings.database_url)
            .await
            .map_err(|e| MirrorError::Connection(e.to_string()))?;

        let store = Self::new(pool);
        store.ensure_tables().await?;
        Ok(store)
    }

    /// Creates the document table of every collection if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Connection`] on database failure.
    pub async fn ensure_tables(&self) -> Result<(), MirrorError> {
        for collection in CollectionName::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {collection} \
                 (seq BIGSERIAL PRIMARY KEY, doc JSONB NOT NULL)"
            );
            sqlx::query(&ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| MirrorError::Connection(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert_many(
        &self,
        collection: CollectionName,
        docs: Vec<Document>,
    ) -> Result<u64, MirrorError> {
        if docs.is_empty() {
            return Ok(0);
        }
        let values: Vec<Value> = docs.into_iter().map(Value::Object).collect();
        let sql = format!(
            "INSERT INTO {collection} (doc) \
             SELECT d FROM UNNEST($1::jsonb[]) WITH ORDINALITY AS t(d, ord) ORDER BY ord"
        );
        let result = sqlx::query(&sql)
            .bind(values)
            .execute(&self.pool)
            .await
            .map_err(persistence_error)?;
        Ok(result.rows_affected())
    }

    async fn find(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Vec<Document>, MirrorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT doc FROM {collection} WHERE "));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq");

        let rows = qb
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(persistence_error)?;

        rows.into_iter()
            .map(|row| into_document(collection, row))
            .collect()
    }

    async fn find_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Option<Document>, MirrorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT doc FROM {collection} WHERE "));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq LIMIT 1");

        let row = qb
            .build_query_scalar::<Value>()
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)?;

        row.map(|row| into_document(collection, row)).transpose()
    }

    async fn delete_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "DELETE FROM {collection} WHERE seq = (SELECT seq FROM {collection} WHERE "
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq LIMIT 1)");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(persistence_error)?;
        Ok(result.rows_affected())
    }

    async fn delete_many(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("DELETE FROM {collection} WHERE "));
        push_filter(&mut qb, filter);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(persistence_error)?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Appends the SQL predicate for `filter`, binding its values.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            qb.push("TRUE");
        }
        Filter::Eq(field, value) => {
            qb.push("doc -> ")
                .push_bind(*field)
                .push(" = to_jsonb(")
                .push_bind(*value)
                .push("::bigint)");
        }
        Filter::In(field, values) => {
            qb.push("doc -> ")
                .push_bind(*field)
                .push(" IN (SELECT to_jsonb(v) FROM UNNEST(")
                .push_bind(values.clone())
                .push("::bigint[]) AS u(v))");
        }
    }
}

fn into_document(collection: CollectionName, value: Value) -> Result<Document, MirrorError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(MirrorError::Persistence(format!(
            "non-object document in {collection}: {other}"
        ))),
    }
}

fn persistence_error(e: sqlx::Error) -> MirrorError {
    MirrorError::Persistence(e.to_string())
}
