//! Pre-order flattening and expansion state

use std::collections::HashMap;

use super::node::{FlatNode, Forest, OrgNode};

/// Flatten a forest into pre-order rows.
///
/// Rows whose id appears in `previous` keep their `is_expanded` flag; new
/// ids start expanded.
pub fn flatten(forest: &Forest, previous: Option<&[FlatNode]>) -> Vec<FlatNode> {
    let expanded: HashMap<i64, bool> = previous
        .unwrap_or_default()
        .iter()
        .map(|row| (row.id(), row.is_expanded))
        .collect();

    let mut rows = Vec::with_capacity(forest.node_count());
    let mut stack: Vec<(&OrgNode, usize, Vec<i64>)> = forest
        .roots
        .iter()
        .rev()
        .map(|root| (root, 0, Vec::new()))
        .collect();

    while let Some((node, level, mut path)) = stack.pop() {
        path.push(node.id());
        for child in node.subordinates.iter().rev() {
            stack.push((child, level + 1, path.clone()));
        }

        rows.push(FlatNode {
            info: node.info.clone(),
            level,
            has_subordinates: !node.subordinates.is_empty(),
            is_expanded: expanded.get(&node.id()).copied().unwrap_or(true),
            path,
        });
    }

    rows
}

/// Flip `is_expanded` on the row with `id`; every other row is copied as is.
pub fn toggle_expand(rows: &[FlatNode], id: i64) -> Vec<FlatNode> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if row.id() == id {
                row.is_expanded = !row.is_expanded;
            }
            row
        })
        .collect()
}

/// Expand or collapse every row at once
pub fn set_expanded_all(rows: &[FlatNode], expanded: bool) -> Vec<FlatNode> {
    rows.iter()
        .map(|row| FlatNode {
            is_expanded: expanded,
            ..row.clone()
        })
        .collect()
}

/// Collapse every row at `depth` or deeper, expand the rest
pub fn collapse_below(rows: &[FlatNode], depth: usize) -> Vec<FlatNode> {
    rows.iter()
        .map(|row| FlatNode {
            is_expanded: row.level < depth,
            ..row.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Role;
    use crate::tree::build::{build, BuildOptions};
    use crate::tree::node::NodeInfo;

    fn example_forest() -> Forest {
        let records = vec![
            NodeInfo::new(1, "John", Role::Admin),
            NodeInfo::new(2, "Jane", Role::Manager).with_manager(Some(1)),
            NodeInfo::new(3, "Mike", Role::Employee).with_manager(Some(1)),
            NodeInfo::new(4, "Bob", Role::Employee).with_manager(Some(2)),
        ];
        build(records, &BuildOptions::default()).forest
    }

    fn ids(rows: &[FlatNode]) -> Vec<i64> {
        rows.iter().map(FlatNode::id).collect()
    }

    #[test]
    fn test_flatten_preorder() {
        let rows = flatten(&example_forest(), None);

        assert_eq!(ids(&rows), vec![1, 2, 4, 3]);
        assert_eq!(rows.iter().map(|r| r.level).collect::<Vec<_>>(), vec![0, 1, 2, 1]);
        assert_eq!(rows[2].path, vec![1, 2, 4]);
        assert_eq!(
            rows.iter().map(|r| r.has_subordinates).collect::<Vec<_>>(),
            vec![true, true, false, false]
        );
        assert!(rows.iter().all(|r| r.is_expanded));
    }

    #[test]
    fn test_level_and_path_invariants() {
        let rows = flatten(&example_forest(), None);
        for row in &rows {
            assert_eq!(row.level, row.path.len() - 1);
            assert_eq!(row.path.last(), Some(&row.id()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.has_subordinates {
                assert_eq!(rows[i + 1].path[..row.path.len()], row.path[..]);
                assert_eq!(rows[i + 1].level, row.level + 1);
            }
        }
    }

    #[test]
    fn test_flatten_multi_root() {
        let records = vec![
            NodeInfo::new(1, "A", Role::Admin),
            NodeInfo::new(2, "B", Role::Admin),
            NodeInfo::new(3, "C", Role::Employee).with_manager(Some(1)),
        ];
        let forest = build(records, &BuildOptions::default()).forest;
        let rows = flatten(&forest, None);

        assert_eq!(ids(&rows), vec![1, 3, 2]);
        assert_eq!(rows[2].level, 0);
        assert_eq!(rows[2].path, vec![2]);
    }

    #[test]
    fn test_flatten_preserves_expansion() {
        let forest = example_forest();
        let rows = toggle_expand(&flatten(&forest, None), 2);

        let again = flatten(&forest, Some(&rows));
        assert!(!again[1].is_expanded);
        assert!(again[0].is_expanded);

        let fresh = flatten(&forest, None);
        assert!(fresh.iter().all(|r| r.is_expanded));
    }

    #[test]
    fn test_flatten_does_not_touch_input() {
        let forest = example_forest();
        let before = forest.clone();
        let _ = flatten(&forest, None);
        assert_eq!(forest, before);
    }

    #[test]
    fn test_toggle_only_target() {
        let rows = flatten(&example_forest(), None);
        let toggled = toggle_expand(&rows, 2);

        assert_eq!(ids(&toggled), ids(&rows));
        for (before, after) in rows.iter().zip(&toggled) {
            if before.id() == 2 {
                assert_eq!(after.is_expanded, !before.is_expanded);
            } else {
                assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn test_toggle_twice_is_noop() {
        let rows = flatten(&example_forest(), None);
        let twice = toggle_expand(&toggle_expand(&rows, 4), 4);
        assert_eq!(twice, rows);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let rows = flatten(&example_forest(), None);
        assert_eq!(toggle_expand(&rows, 42), rows);
    }

    #[test]
    fn test_expand_all_and_collapse_below() {
        let rows = flatten(&example_forest(), None);

        let collapsed = set_expanded_all(&rows, false);
        assert!(collapsed.iter().all(|r| !r.is_expanded));

        let top = collapse_below(&rows, 1);
        assert_eq!(
            top.iter().map(|r| r.is_expanded).collect::<Vec<_>>(),
            vec![true, false, false, false]
        );
    }
}
