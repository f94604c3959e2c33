//! Access policies for org chart rows
//!
//! Which rows a viewer may see is decided by an injected `AccessPolicy`,
//! never by the traversal itself.

use serde::{Deserialize, Serialize};

use crate::entity::Role;
use crate::tree::FlatNode;

/// Identity of the currently authenticated user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: i64,
    pub role: Role,
    #[serde(default)]
    pub department_id: Option<i64>,
}

impl Viewer {
    pub fn new(id: i64, role: Role) -> Self {
        Self {
            id,
            role,
            department_id: None,
        }
    }

    pub fn with_department(mut self, department_id: i64) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// The row is the viewer or one of the viewer's direct reports
    pub fn is_self_or_report(&self, row: &FlatNode) -> bool {
        row.id() == self.id || row.manager_id() == Some(self.id)
    }
}

/// Row-level visibility rule
pub trait AccessPolicy: Send + Sync {
    fn can_view(&self, viewer: &Viewer, row: &FlatNode) -> bool;
}

impl<F> AccessPolicy for F
where
    F: Fn(&Viewer, &FlatNode) -> bool + Send + Sync,
{
    fn can_view(&self, viewer: &Viewer, row: &FlatNode) -> bool {
        self(viewer, row)
    }
}

/// Default rule: employees see themselves and their direct reports,
/// every other role sees the whole chart.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleScoped;

impl AccessPolicy for RoleScoped {
    fn can_view(&self, viewer: &Viewer, row: &FlatNode) -> bool {
        match viewer.role {
            Role::Employee => viewer.is_self_or_report(row),
            Role::Admin | Role::Manager | Role::Guest => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Unrestricted;

impl AccessPolicy for Unrestricted {
    fn can_view(&self, _viewer: &Viewer, _row: &FlatNode) -> bool {
        true
    }
}

/// Narrows managers to their own department on top of another policy.
///
/// A manager without a department falls back to the inner policy alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepartmentScopedManagers<P = RoleScoped> {
    inner: P,
}

impl<P: AccessPolicy> DepartmentScopedManagers<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: AccessPolicy> AccessPolicy for DepartmentScopedManagers<P> {
    fn can_view(&self, viewer: &Viewer, row: &FlatNode) -> bool {
        if !self.inner.can_view(viewer, row) {
            return false;
        }
        match (viewer.role, viewer.department_id) {
            (Role::Manager, Some(dept)) => {
                row.info.department_id == Some(dept) || viewer.is_self_or_report(row)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeInfo;

    fn row(id: i64, manager_id: Option<i64>, department_id: Option<i64>) -> FlatNode {
        let mut info = NodeInfo::new(id, format!("Employee {}", id), Role::Employee).with_manager(manager_id);
        info.department_id = department_id;
        FlatNode {
            info,
            level: 0,
            path: vec![id],
            has_subordinates: false,
            is_expanded: true,
        }
    }

    #[test]
    fn test_employee_sees_self_and_reports() {
        let viewer = Viewer::new(5, Role::Employee);
        let policy = RoleScoped;

        assert!(policy.can_view(&viewer, &row(5, Some(1), None)));
        assert!(policy.can_view(&viewer, &row(8, Some(5), None)));
        assert!(!policy.can_view(&viewer, &row(1, None, None)));
        assert!(!policy.can_view(&viewer, &row(9, Some(8), None)));
    }

    #[test]
    fn test_other_roles_see_everything() {
        for role in [Role::Admin, Role::Manager, Role::Guest] {
            let viewer = Viewer::new(5, role);
            assert!(RoleScoped.can_view(&viewer, &row(1, None, None)));
            assert!(RoleScoped.can_view(&viewer, &row(9, Some(8), None)));
        }
    }

    #[test]
    fn test_department_scoped_managers() {
        let policy = DepartmentScopedManagers::new(RoleScoped);
        let manager = Viewer::new(3, Role::Manager).with_department(2);

        assert!(policy.can_view(&manager, &row(10, Some(7), Some(2))));
        assert!(!policy.can_view(&manager, &row(11, Some(7), Some(4))));
        // direct report seconded to another department
        assert!(policy.can_view(&manager, &row(12, Some(3), Some(4))));

        let admin = Viewer::new(1, Role::Admin).with_department(2);
        assert!(policy.can_view(&admin, &row(11, Some(7), Some(4))));

        let employee = Viewer::new(5, Role::Employee).with_department(2);
        assert!(!policy.can_view(&employee, &row(10, Some(7), Some(2))));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |viewer: &Viewer, row: &FlatNode| row.id() != viewer.id;
        let viewer = Viewer::new(1, Role::Admin);
        assert!(!policy.can_view(&viewer, &row(1, None, None)));
        assert!(policy.can_view(&viewer, &row(2, None, None)));
    }
}
