//! JSON file data source
//!
//! Reads a snapshot document of the form
//! `{ "employees": [...], "departments": [...] }`. The file is read and
//! parsed once per source; later calls reuse the snapshot.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

use super::DataSource;
use crate::entity::{Department, EmployeeRecord};
use crate::error::{OrgError, OrgResult};

#[derive(Debug, Clone, Default, Deserialize)]
struct Snapshot {
    #[serde(default)]
    employees: Vec<EmployeeRecord>,
    #[serde(default)]
    departments: Vec<Department>,
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    snapshot: OnceCell<Snapshot>,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            snapshot: OnceCell::new(),
        }
    }

    async fn load(&self) -> OrgResult<&Snapshot> {
        self.snapshot
            .get_or_try_init(|| async {
                let content = tokio::fs::read_to_string(&self.path).await?;
                let snapshot: Snapshot = serde_json::from_str(&content)?;
                tracing::debug!(
                    path = %self.path.display(),
                    employees = snapshot.employees.len(),
                    departments = snapshot.departments.len(),
                    "Loaded snapshot"
                );
                Ok::<_, OrgError>(snapshot)
            })
            .await
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn employees(&self) -> OrgResult<Vec<EmployeeRecord>> {
        Ok(self.load().await?.employees.clone())
    }

    async fn departments(&self) -> OrgResult<Vec<Department>> {
        Ok(self.load().await?.departments.clone())
    }
}
