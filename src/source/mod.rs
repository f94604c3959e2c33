//! Employee data sources
//!
//! The engine never fetches anything itself; a `DataSource` hands it
//! already deserialized records.

use async_trait::async_trait;

use crate::config::{SourceConfig, SourceKind};
use crate::entity::{Department, EmployeeRecord};
use crate::error::OrgResult;
use crate::report::hierarchy_report;
use crate::tree::{BuildOptions, Forest};

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Flat employee list
    async fn employees(&self) -> OrgResult<Vec<EmployeeRecord>>;

    /// Departments for the selector
    async fn departments(&self) -> OrgResult<Vec<Department>>;

    /// Nested org chart, optionally limited to one department.
    ///
    /// Sources without a server-side report assemble it from the flat
    /// employee list the same way the backend does.
    async fn org_chart(&self, department_id: Option<i64>) -> OrgResult<Forest> {
        let employees = self.employees().await?;
        Ok(hierarchy_report(&employees, department_id, &BuildOptions::default()).forest)
    }
}

/// Create the data source described by the configuration
pub fn from_config(config: &SourceConfig) -> OrgResult<Box<dyn DataSource>> {
    match config.kind {
        SourceKind::File => Ok(Box::new(FileSource::new(&config.path))),
        SourceKind::Http => Ok(Box::new(HttpSource::new(&config.base_url, &config.token)?)),
    }
}
