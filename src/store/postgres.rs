use crate::settings::DatabaseSettings;
use crate::store::error::StoreError;
use crate::store::sql::{
    create_schema_sql, create_table_sql, date_chunk_sql, insert_sql, qualified_table, row_values,
    SqlValue,
};
use crate::store::RecordStore;
use crate::types::weather_record::DATE_FIELD;
use async_trait::async_trait;
use log::{debug, info};
use polars::prelude::DataFrame;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

/// PostgreSQL table addressed by (host, port, user, password, database, schema, table).
pub struct PostgresStore {
    options: PgConnectOptions,
    schema: String,
    table: String,
}

impl PostgresStore {
    pub fn new(settings: &DatabaseSettings) -> Self {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(settings.password.expose())
            .database(&settings.database);
        Self {
            options,
            schema: settings.schema.clone(),
            table: settings.table.clone(),
        }
    }

    fn target(&self) -> String {
        qualified_table(&self.schema, &self.table)
    }

    async fn connect(&self) -> Result<PgConnection, StoreError> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::Connect)
    }
}

/// Closes `conn`. The work on it is already done, so a failed close is only logged.
async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        debug!("Closing the database connection failed: {}", e);
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn table_exists(&self) -> Result<bool, StoreError> {
        let mut conn = self.connect().await?;
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = $1 AND table_name = $2)",
        )
        .bind(&self.schema)
        .bind(&self.table)
        .fetch_one(&mut conn)
        .await
        .map_err(|e| StoreError::Query(self.target(), e))?;
        close(conn).await;
        Ok(exists)
    }

    async fn date_chunk(&self, offset: usize, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connect().await?;
        let dates: Vec<Option<String>> =
            sqlx::query_scalar(&date_chunk_sql(&self.schema, &self.table, DATE_FIELD))
                .bind(i64::try_from(limit).unwrap_or(i64::MAX))
                .bind(i64::try_from(offset).unwrap_or(i64::MAX))
                .fetch_all(&mut conn)
                .await
                .map_err(|e| StoreError::Query(self.target(), e))?;
        close(conn).await;
        Ok(dates.into_iter().flatten().collect())
    }

    async fn append(&self, frame: &DataFrame) -> Result<(), StoreError> {
        let values = row_values(frame)?;
        let mut conn = self.connect().await?;

        sqlx::query(&create_schema_sql(&self.schema))
            .execute(&mut conn)
            .await
            .map_err(|e| StoreError::CreateSchema(self.schema.clone(), e))?;

        sqlx::query(&create_table_sql(&self.schema, &self.table, frame))
            .execute(&mut conn)
            .await
            .map_err(|e| StoreError::CreateTable(self.target(), e))?;

        let sql = insert_sql(&self.schema, &self.table, frame, &values);
        debug!("Appending {} columns to {}", values.len(), self.target());
        let mut query = sqlx::query(&sql);
        // Null cells are already `NULL` literals in the statement.
        for value in values {
            query = match value {
                SqlValue::Int(Some(v)) => query.bind(v),
                SqlValue::Float(Some(v)) => query.bind(v),
                SqlValue::Bool(Some(v)) => query.bind(v),
                SqlValue::Text(Some(v)) => query.bind(v),
                _ => query,
            };
        }
        let result = query
            .execute(&mut conn)
            .await
            .map_err(|e| StoreError::Insert(self.target(), e))?;
        close(conn).await;

        info!("Inserted {} row(s) into {}", result.rows_affected(), self.target());
        Ok(())
    }
}
