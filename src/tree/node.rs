//! Tree and row types
//!
//! `OrgNode` serializes to the same JSON as the backend hierarchy report
//! node, so a nested org chart can be deserialized directly into a `Forest`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::{EmployeeRecord, Role};

/// Scalar fields shared by tree nodes and flattened rows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub id: i64,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "crate::entity::timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "crate::entity::timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl NodeInfo {
    pub fn new(id: i64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            department: None,
            department_id: None,
            manager_id: None,
            job_title: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_manager(mut self, manager_id: Option<i64>) -> Self {
        self.manager_id = manager_id;
        self
    }

    pub fn with_department(mut self, id: i64, name: impl Into<String>) -> Self {
        self.department_id = Some(id);
        self.department = Some(name.into());
        self
    }

    pub fn with_job_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = Some(title.into());
        self
    }
}

impl From<&EmployeeRecord> for NodeInfo {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            id: record.id,
            name: record.full_name(),
            role: record.role,
            department: record.department.as_ref().map(|d| d.name.clone()),
            department_id: record.department_id(),
            manager_id: record.manager_id,
            job_title: record.job_title.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Employee in tree form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrgNode {
    #[serde(flatten)]
    pub info: NodeInfo,
    #[serde(default)]
    pub subordinates: Vec<OrgNode>,
}

impl OrgNode {
    pub fn leaf(info: NodeInfo) -> Self {
        Self {
            info,
            subordinates: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.info.id
    }
}

/// Ordered sequence of independent rooted trees
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub roots: Vec<OrgNode>,
}

impl Forest {
    pub fn new(roots: Vec<OrgNode>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&OrgNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.subordinates.iter());
        }
        count
    }

    pub fn root_ids(&self) -> Vec<i64> {
        self.roots.iter().map(OrgNode::id).collect()
    }
}

/// One row of the flattened chart, in pre-order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatNode {
    #[serde(flatten)]
    pub info: NodeInfo,
    /// Depth from the root (root = 0)
    pub level: usize,
    /// Ancestor ids, root first, ending with this node's id
    pub path: Vec<i64>,
    pub has_subordinates: bool,
    pub is_expanded: bool,
}

impl FlatNode {
    pub fn id(&self) -> i64 {
        self.info.id
    }

    pub fn manager_id(&self) -> Option<i64> {
        self.info.manager_id
    }

    /// Ancestor ids, excluding the node itself
    pub fn ancestors(&self) -> &[i64] {
        match self.path.split_last() {
            Some((_, ancestors)) => ancestors,
            None => &[],
        }
    }
}
