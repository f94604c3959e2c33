//! Org tree engine
//!
//! Turns flat employee records into a forest, flattens it into pre-order
//! rows with level/path metadata, keeps per-row expansion state and derives
//! the visible subset under search, department and access filters.
//!
//! Every operation is a pure function over its inputs; the engine itself
//! only carries the build options.

pub mod build;
pub mod flatten;
pub mod node;
pub mod visible;

pub use build::{Assembly, BuildIssue, BuildOptions, OrphanPolicy, SortKey};
pub use node::{FlatNode, Forest, NodeInfo, OrgNode};
pub use visible::{
    AccessMatch, DepartmentFilter, RowFilter, RowPredicate, SearchMatch, VisibleRows,
};

/// Facade over build, flatten, toggle and visibility
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgTreeEngine {
    options: BuildOptions,
}

impl OrgTreeEngine {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, records: impl IntoIterator<Item = NodeInfo>) -> Assembly {
        build::build(records, &self.options)
    }

    pub fn flatten(&self, forest: &Forest, previous: Option<&[FlatNode]>) -> Vec<FlatNode> {
        flatten::flatten(forest, previous)
    }

    pub fn toggle_expand(&self, rows: &[FlatNode], id: i64) -> Vec<FlatNode> {
        flatten::toggle_expand(rows, id)
    }

    pub fn visible_rows<'a, P: RowPredicate + ?Sized>(
        &self,
        rows: &'a [FlatNode],
        predicate: &'a P,
    ) -> VisibleRows<'a, P> {
        visible::visible_rows(rows, predicate)
    }
}
