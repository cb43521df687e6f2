use std::sync::Arc;

use crate::domain::ports::Connector;
use crate::infrastructure::config::SourceConfig;
use crate::infrastructure::db::client::SqlConnector;
use crate::infrastructure::file::FileConnector;

pub mod config;
pub mod db;
pub mod file;

/// Build the connector described by one `[left]`/`[right]` section.
pub fn build_connector(source: &SourceConfig) -> Arc<dyn Connector> {
    let name = source.name().to_string();
    match source {
        SourceConfig::Sql(db) => Arc::new(SqlConnector::new(db.clone(), name)),
        SourceConfig::File(f) => Arc::new(FileConnector::new(&f.path, name)),
    }
}
