//! REST backend data source
//!
//! `GET {base}/api/employees`, `GET {base}/api/departments` and
//! `GET {base}/api/reports/orgchart[?departmentId=]`, all with a bearer
//! token.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::DataSource;
use crate::entity::{Department, EmployeeRecord};
use crate::error::{OrgError, OrgResult};
use crate::tree::Forest;

const EMPLOYEES_PATH: &str = "/api/employees";
const DEPARTMENTS_PATH: &str = "/api/departments";
const ORG_CHART_PATH: &str = "/api/reports/orgchart";

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSource {
    pub fn new(base_url: &str, token: &str) -> OrgResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Self::with_client(base_url, token, client)
    }

    pub fn with_client(base_url: &str, token: &str, client: reqwest::Client) -> OrgResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(OrgError::Config("source.base_url is empty".to_string()));
        }
        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> OrgResult<T> {
        let url = self.url(path);
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("Request to {} failed: {}", url, status);
            return Err(OrgError::Source(format!("GET {} returned {}", url, status)));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn employees(&self) -> OrgResult<Vec<EmployeeRecord>> {
        self.get_json(EMPLOYEES_PATH).await
    }

    async fn departments(&self) -> OrgResult<Vec<Department>> {
        self.get_json(DEPARTMENTS_PATH).await
    }

    async fn org_chart(&self, department_id: Option<i64>) -> OrgResult<Forest> {
        let path = match department_id {
            Some(id) => format!("{}?departmentId={}", ORG_CHART_PATH, id),
            None => ORG_CHART_PATH.to_string(),
        };
        self.get_json(&path).await
    }
}
