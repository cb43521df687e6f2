use anyhow::Context;
use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::debug;

use crate::domain::error::DiffError;
use crate::domain::object_type::ObjectFilter;
use crate::domain::ports::{Connector, Session};
use crate::domain::record::RawRecord;
use crate::infrastructure::config::DbConfig;
use crate::infrastructure::db::dialect::{from_driver, QueryDialect};
use crate::infrastructure::db::row_mapper::row_to_raw;
use crate::infrastructure::db::sql_utils::build_select_query;

/// Opens pooled sessions against a configuration database.
pub struct SqlConnector {
    cfg: DbConfig,
    name: String,
}

impl SqlConnector {
    pub fn new(cfg: DbConfig, name: impl Into<String>) -> Self {
        Self {
            cfg,
            name: name.into(),
        }
    }
}

/// One connection pool, closed on release.
pub struct SqlSession {
    pool: AnyPool,
    dialect: Box<dyn QueryDialect>,
    schema: Option<String>,
    source: String,
}

#[async_trait]
impl Connector for SqlConnector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> Result<Box<dyn Session>, DiffError> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(2)
            .connect(&self.cfg.url())
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to {} (driver: {})",
                    self.cfg.dbname, self.cfg.driver
                )
            })
            .map_err(|e| DiffError::retrieval(&self.name, e))?;

        debug!(
            "Connected to {}/{} via {} driver",
            self.cfg.host, self.cfg.dbname, self.cfg.driver
        );

        Ok(Box::new(SqlSession {
            pool,
            dialect: from_driver(&self.cfg.driver),
            schema: self.cfg.schema.clone(),
            source: self.name.clone(),
        }))
    }
}

#[async_trait]
impl Session for SqlSession {
    async fn fetch(&self, filter: &ObjectFilter) -> Result<Vec<RawRecord>, DiffError> {
        let query = build_select_query(self.schema.as_deref(), filter, self.dialect.as_ref());
        debug!("Executing: {}", query);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to query {}", filter.table))
            .map_err(|e| DiffError::retrieval(&self.source, e))?;

        rows.iter()
            .map(row_to_raw)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("Failed to decode rows of {}", filter.table))
            .map_err(|e| DiffError::retrieval(&self.source, e))
    }

    async fn release(self: Box<Self>) -> Result<(), DiffError> {
        self.pool.close().await;
        debug!(source = %self.source, "connection pool closed");
        Ok(())
    }
}
