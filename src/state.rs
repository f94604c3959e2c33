//! Org chart session state
//!
//! The single writer of the flattened rows: every data load, toggle and
//! filter change goes through here, one call at a time.

use std::sync::Arc;

use crate::entity::{Department, EmployeeRecord};
use crate::permission::{AccessPolicy, RoleScoped, Viewer};
use crate::tree::{
    AccessMatch, BuildIssue, DepartmentFilter, FlatNode, Forest, NodeInfo, OrgTreeEngine,
    RowFilter, SearchMatch,
};

pub struct OrgChartState {
    engine: OrgTreeEngine,
    policy: Arc<dyn AccessPolicy>,
    forest: Forest,
    rows: Vec<FlatNode>,
    issues: Vec<BuildIssue>,
    departments: Vec<Department>,
    search: SearchMatch,
    department: DepartmentFilter,
    viewer: Option<Viewer>,
}

impl OrgChartState {
    /// Create new state with the default role-scoped access policy
    pub fn new(engine: OrgTreeEngine) -> Self {
        Self::with_policy(engine, Arc::new(RoleScoped))
    }

    pub fn with_policy(engine: OrgTreeEngine, policy: Arc<dyn AccessPolicy>) -> Self {
        Self {
            engine,
            policy,
            forest: Forest::default(),
            rows: Vec::new(),
            issues: Vec::new(),
            departments: Vec::new(),
            search: SearchMatch::default(),
            department: DepartmentFilter::All,
            viewer: None,
        }
    }

    /// Fresh data load: rebuild everything, expansion back to defaults
    pub fn load(&mut self, records: &[EmployeeRecord]) {
        self.rebuild(records, false);
    }

    /// Same employee set fetched again: rebuild, keep expansion per id
    pub fn refresh(&mut self, records: &[EmployeeRecord]) {
        self.rebuild(records, true);
    }

    /// Fresh load of a forest the backend already nested
    pub fn load_forest(&mut self, forest: Forest) {
        self.install(forest, Vec::new(), false);
    }

    /// Same nested forest fetched again, expansion kept per id
    pub fn refresh_forest(&mut self, forest: Forest) {
        self.install(forest, Vec::new(), true);
    }

    fn rebuild(&mut self, records: &[EmployeeRecord], keep_expansion: bool) {
        let assembly = self.engine.build(records.iter().map(NodeInfo::from));
        self.install(assembly.forest, assembly.issues, keep_expansion);
    }

    fn install(&mut self, forest: Forest, issues: Vec<BuildIssue>, keep_expansion: bool) {
        let previous = keep_expansion.then_some(self.rows.as_slice());
        self.rows = self.engine.flatten(&forest, previous);
        self.forest = forest;
        self.issues = issues;
        tracing::info!(
            rows = self.rows.len(),
            roots = self.forest.roots.len(),
            issues = self.issues.len(),
            "Org chart loaded"
        );
    }

    pub fn set_departments(&mut self, departments: Vec<Department>) {
        self.departments = departments;
    }

    /// Flip one node; returns false if no row has that id
    pub fn toggle(&mut self, id: i64) -> bool {
        if !self.rows.iter().any(|row| row.id() == id) {
            tracing::debug!(id, "Toggle ignored, unknown node");
            return false;
        }
        self.rows = self.engine.toggle_expand(&self.rows, id);
        true
    }

    /// Replace the expansion state of every row at once
    pub fn apply_expansion(&mut self, f: impl FnOnce(&[FlatNode]) -> Vec<FlatNode>) {
        self.rows = f(&self.rows);
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = SearchMatch::new(text);
    }

    pub fn set_department(&mut self, department: DepartmentFilter) {
        self.department = department;
    }

    pub fn set_viewer(&mut self, viewer: Option<Viewer>) {
        self.viewer = viewer;
    }

    /// Rows to display under the current filters
    pub fn visible(&self) -> Vec<FlatNode> {
        let access = match &self.viewer {
            Some(viewer) => AccessMatch::new(viewer, self.policy.as_ref()),
            None => AccessMatch::anonymous(),
        };
        let filter = RowFilter::new(self.search.clone(), self.department, access);
        self.engine.visible_rows(&self.rows, &filter).to_vec()
    }

    /// Every flattened row, visible or not
    pub fn rows(&self) -> &[FlatNode] {
        &self.rows
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn issues(&self) -> &[BuildIssue] {
        &self.issues
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }
}
