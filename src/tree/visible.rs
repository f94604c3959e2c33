//! Visible row derivation
//!
//! Visibility is computed, never stored: a row shows when it passes the
//! filter and every ancestor on its path is expanded.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::node::FlatNode;
use crate::error::OrgError;
use crate::permission::{AccessPolicy, RoleScoped, Viewer};

/// Row predicate used by `visible_rows`
pub trait RowPredicate {
    fn matches(&self, row: &FlatNode) -> bool;
}

impl<F> RowPredicate for F
where
    F: Fn(&FlatNode) -> bool,
{
    fn matches(&self, row: &FlatNode) -> bool {
        self(row)
    }
}

/// Case-insensitive substring search over name, job title and department.
/// Whitespace in the search text is significant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchMatch {
    needle: String,
}

impl SearchMatch {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }
}

impl RowPredicate for SearchMatch {
    fn matches(&self, row: &FlatNode) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let hit = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&self.needle))
        };
        hit(Some(row.info.name.as_str()))
            || hit(row.info.job_title.as_deref())
            || hit(row.info.department.as_deref())
    }
}

/// Department selector value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(i64),
}

impl FromStr for DepartmentFilter {
    type Err = OrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(DepartmentFilter::All);
        }
        value
            .parse::<i64>()
            .map(DepartmentFilter::Only)
            .map_err(|_| OrgError::InvalidDepartment(s.to_string()))
    }
}

impl fmt::Display for DepartmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentFilter::All => f.write_str("all"),
            DepartmentFilter::Only(id) => write!(f, "{}", id),
        }
    }
}

impl RowPredicate for DepartmentFilter {
    fn matches(&self, row: &FlatNode) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Only(id) => row.info.department_id == Some(*id),
        }
    }
}

/// Viewer-bound access check backed by an injected policy
pub struct AccessMatch<'a> {
    viewer: Option<&'a Viewer>,
    policy: &'a dyn AccessPolicy,
}

impl<'a> AccessMatch<'a> {
    pub fn new(viewer: &'a Viewer, policy: &'a dyn AccessPolicy) -> Self {
        Self {
            viewer: Some(viewer),
            policy,
        }
    }

    /// No signed-in viewer: nothing is restricted
    pub fn anonymous() -> Self {
        Self {
            viewer: None,
            policy: &RoleScoped,
        }
    }
}

impl RowPredicate for AccessMatch<'_> {
    fn matches(&self, row: &FlatNode) -> bool {
        match self.viewer {
            Some(viewer) => self.policy.can_view(viewer, row),
            None => true,
        }
    }
}

/// Search AND department AND access
pub struct RowFilter<'a> {
    pub search: SearchMatch,
    pub department: DepartmentFilter,
    pub access: AccessMatch<'a>,
}

impl<'a> RowFilter<'a> {
    pub fn new(search: SearchMatch, department: DepartmentFilter, access: AccessMatch<'a>) -> Self {
        Self {
            search,
            department,
            access,
        }
    }

    /// Filter that lets every row through
    pub fn everything() -> Self {
        Self::new(SearchMatch::default(), DepartmentFilter::All, AccessMatch::anonymous())
    }
}

impl RowPredicate for RowFilter<'_> {
    fn matches(&self, row: &FlatNode) -> bool {
        self.search.matches(row) && self.department.matches(row) && self.access.matches(row)
    }
}

/// Visible subset of a row sequence.
///
/// Holds only borrowed rows and an expansion lookup; `iter` may be called
/// any number of times.
pub struct VisibleRows<'a, P: ?Sized> {
    rows: &'a [FlatNode],
    predicate: &'a P,
    expanded: HashMap<i64, bool>,
}

impl<'a, P: RowPredicate + ?Sized> VisibleRows<'a, P> {
    pub fn iter(&self) -> impl Iterator<Item = &'a FlatNode> + '_ {
        self.rows
            .iter()
            .filter(move |row| self.ancestors_expanded(row) && self.predicate.matches(row))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.iter().map(FlatNode::id).collect()
    }

    pub fn to_vec(&self) -> Vec<FlatNode> {
        self.iter().cloned().collect()
    }

    /// Missing ancestors count as expanded
    fn ancestors_expanded(&self, row: &FlatNode) -> bool {
        row.ancestors()
            .iter()
            .all(|id| self.expanded.get(id).copied().unwrap_or(true))
    }
}

/// Derive the rows to display under `predicate`
pub fn visible_rows<'a, P: RowPredicate + ?Sized>(
    rows: &'a [FlatNode],
    predicate: &'a P,
) -> VisibleRows<'a, P> {
    let mut expanded = HashMap::with_capacity(rows.len());
    for row in rows {
        expanded.entry(row.id()).or_insert(row.is_expanded);
    }
    VisibleRows {
        rows,
        predicate,
        expanded,
    }
}
