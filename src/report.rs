//! Hierarchy report
//!
//! Builds the org chart for the whole company or a single department and
//! renders visible rows as indented text.

use std::fmt::Write;

use crate::entity::EmployeeRecord;
use crate::tree::{Assembly, BuildOptions, FlatNode, NodeInfo, OrphanPolicy, OrgTreeEngine};

const NO_DEPARTMENT: &str = "No Department";

/// Build the org chart, optionally limited to one department.
///
/// Inside a department, an employee whose manager works elsewhere has no
/// place in the chart and is dropped together with their subtree; across
/// the whole company such employees become roots.
pub fn hierarchy_report(
    records: &[EmployeeRecord],
    department_id: Option<i64>,
    options: &BuildOptions,
) -> Assembly {
    let options = BuildOptions {
        orphans: if department_id.is_some() {
            OrphanPolicy::Drop
        } else {
            options.orphans
        },
        ..*options
    };

    let selected = records
        .iter()
        .filter(|record| department_id.is_none() || record.department_id() == department_id)
        .map(NodeInfo::from);

    let assembly = OrgTreeEngine::new(options).build(selected);
    tracing::debug!(
        department = ?department_id,
        nodes = assembly.forest.node_count(),
        issues = assembly.issues.len(),
        "Hierarchy report built"
    );
    assembly
}

/// One line per row: indentation, expand marker, name, department, role.
pub fn render_rows<'a>(rows: impl IntoIterator<Item = &'a FlatNode>) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = match (row.has_subordinates, row.is_expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        let department = row.info.department.as_deref().unwrap_or(NO_DEPARTMENT);
        let _ = writeln!(
            out,
            "{}{} {} ({}) [{}]",
            "  ".repeat(row.level),
            marker,
            row.info.name,
            department,
            row.info.role
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Department, Role};
    use crate::tree::flatten::{flatten, toggle_expand};

    fn employee(id: i64, manager_id: Option<i64>, dept: Option<(i64, &str)>) -> EmployeeRecord {
        EmployeeRecord {
            id,
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("user{}@example.com", id),
            role: if manager_id.is_none() { Role::Admin } else { Role::Employee },
            job_title: None,
            department: dept.map(|(id, name)| Department::new(id, name)),
            manager_id,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn company() -> Vec<EmployeeRecord> {
        vec![
            employee(1, None, Some((1, "Executive"))),
            employee(2, Some(1), Some((2, "Engineering"))),
            employee(4, Some(2), Some((2, "Engineering"))),
            employee(5, Some(4), Some((2, "Engineering"))),
            employee(3, Some(1), Some((3, "Marketing"))),
            employee(6, Some(3), None),
        ]
    }

    #[test]
    fn test_company_wide_report() {
        let assembly = hierarchy_report(&company(), None, &BuildOptions::default());
        assert!(assembly.issues.is_empty());
        assert_eq!(assembly.forest.root_ids(), vec![1]);
        assert_eq!(assembly.forest.node_count(), 6);
    }

    #[test]
    fn test_department_report_drops_foreign_managers() {
        let assembly = hierarchy_report(&company(), Some(2), &BuildOptions::default());

        // 2 reports to the CEO outside Engineering, so the whole branch goes
        assert!(assembly.forest.is_empty());
        assert_eq!(assembly.issues.len(), 1);
    }

    #[test]
    fn test_department_report_keeps_internal_roots() {
        let mut records = company();
        records.push(employee(7, None, Some((2, "Engineering"))));
        records.push(employee(8, Some(7), Some((2, "Engineering"))));

        let assembly = hierarchy_report(&records, Some(2), &BuildOptions::default());
        assert_eq!(assembly.forest.root_ids(), vec![7]);
        assert_eq!(assembly.forest.node_count(), 2);
    }

    #[test]
    fn test_render_rows() {
        let forest = hierarchy_report(&company(), None, &BuildOptions::default()).forest;
        let rows = toggle_expand(&flatten(&forest, None), 3);
        let text = render_rows(&rows[..4]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "- First1 Last1 (Executive) [ADMIN]");
        assert_eq!(lines[1], "  - First2 Last2 (Engineering) [EMPLOYEE]");
        assert_eq!(lines[3], "        First5 Last5 (Engineering) [EMPLOYEE]");

        let tail = render_rows(&rows[4..]);
        assert_eq!(
            tail,
            "  + First3 Last3 (Marketing) [EMPLOYEE]\n      First6 Last6 (No Department) [EMPLOYEE]\n"
        );
    }
}
