//! Forest construction from flat manager references
//!
//! Two explicit passes: an adjacency map (`manager -> children`) built in
//! one sweep over the records, then an iterative assembly of the nested
//! nodes. Manager chains are walked with on-path marking, so malformed
//! data can neither hang the build nor exhaust the stack.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::node::{Forest, NodeInfo, OrgNode};
use crate::error::{OrgError, OrgResult};

/// What to do with a record whose manager id resolves to nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Surface the record as an extra root
    #[default]
    Promote,
    /// Leave the record (and everything under it) out of the forest
    Drop,
}

/// Sibling ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Input order
    #[default]
    Insertion,
    /// Case-insensitive name, ties broken by id
    Name,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    #[serde(default)]
    pub orphans: OrphanPolicy,
    #[serde(default)]
    pub sort: SortKey,
}

/// Data problem found (and recovered from) while building
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildIssue {
    /// Manager chain loops back on itself; members were promoted to roots
    CycleDetected { ids: Vec<i64> },
    /// Manager id does not match any record in the set
    OrphanManager { id: i64, manager_id: i64 },
    /// A later record reused an id already seen; it was skipped
    DuplicateId { id: i64 },
}

/// Result of a build: the forest plus every recovered issue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub forest: Forest,
    pub issues: Vec<BuildIssue>,
}

impl Assembly {
    /// Id lists of every detected cycle
    pub fn cycles(&self) -> impl Iterator<Item = &[i64]> {
        self.issues.iter().filter_map(|issue| match issue {
            BuildIssue::CycleDetected { ids } => Some(ids.as_slice()),
            _ => None,
        })
    }

    pub fn has_cycles(&self) -> bool {
        self.cycles().next().is_some()
    }

    /// Strict view: the first cycle becomes an error
    pub fn into_result(self) -> OrgResult<Forest> {
        let cycle = self.issues.into_iter().find_map(|issue| match issue {
            BuildIssue::CycleDetected { ids } => Some(ids),
            _ => None,
        });
        match cycle {
            Some(ids) => Err(OrgError::CycleDetected { ids }),
            None => Ok(self.forest),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Parent slot of a record after resolution
#[derive(Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Node(usize),
    Dropped,
}

/// Build a forest from flat records
pub fn build(records: impl IntoIterator<Item = NodeInfo>, options: &BuildOptions) -> Assembly {
    let mut issues = Vec::new();

    let mut nodes: Vec<NodeInfo> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for record in records {
        if index.contains_key(&record.id) {
            tracing::warn!(id = record.id, "Duplicate employee id, skipping record");
            issues.push(BuildIssue::DuplicateId { id: record.id });
            continue;
        }
        index.insert(record.id, nodes.len());
        nodes.push(record);
    }

    let mut parents: Vec<Parent> = Vec::with_capacity(nodes.len());
    for node in &nodes {
        let parent = match node.manager_id {
            None => Parent::Root,
            Some(manager_id) => match index.get(&manager_id) {
                Some(&idx) => Parent::Node(idx),
                None => {
                    tracing::debug!(id = node.id, manager_id, "Manager not in set");
                    issues.push(BuildIssue::OrphanManager {
                        id: node.id,
                        manager_id,
                    });
                    match options.orphans {
                        OrphanPolicy::Promote => Parent::Root,
                        OrphanPolicy::Drop => Parent::Dropped,
                    }
                }
            },
        };
        parents.push(parent);
    }

    break_cycles(&nodes, &mut parents, &mut issues);

    let mut roots: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (idx, parent) in parents.iter().enumerate() {
        match *parent {
            Parent::Root => roots.push(idx),
            Parent::Node(p) => children[p].push(idx),
            Parent::Dropped => {}
        }
    }

    if options.sort != SortKey::Insertion {
        sort_siblings(&mut roots, &nodes, options.sort);
        for list in children.iter_mut() {
            sort_siblings(list, &nodes, options.sort);
        }
    }

    let forest = assemble(nodes, &roots, &children);
    Assembly { forest, issues }
}

/// Walk every manager chain once; members of a loop become roots.
fn break_cycles(nodes: &[NodeInfo], parents: &mut [Parent], issues: &mut Vec<BuildIssue>) {
    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        path.clear();
        let mut current = start;
        loop {
            marks[current] = Mark::OnPath;
            path.push(current);

            let next = match parents[current] {
                Parent::Node(p) => p,
                Parent::Root | Parent::Dropped => break,
            };

            match marks[next] {
                Mark::Unvisited => current = next,
                Mark::Done => break,
                Mark::OnPath => {
                    let begin = path.iter().position(|&idx| idx == next).unwrap_or(0);
                    let members = &path[begin..];
                    let ids: Vec<i64> = members.iter().map(|&idx| nodes[idx].id).collect();
                    tracing::warn!(?ids, "Cycle detected in manager chain, promoting members to roots");
                    for &idx in members {
                        parents[idx] = Parent::Root;
                    }
                    issues.push(BuildIssue::CycleDetected { ids });
                    break;
                }
            }
        }

        for &idx in &path {
            marks[idx] = Mark::Done;
        }
    }
}

fn sort_siblings(list: &mut [usize], nodes: &[NodeInfo], key: SortKey) {
    match key {
        SortKey::Insertion => {}
        SortKey::Id => list.sort_by_key(|&idx| nodes[idx].id),
        SortKey::Name => list.sort_by(|&a, &b| {
            let (a, b) = (&nodes[a], &nodes[b]);
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        }),
    }
}

/// Turn the index-based adjacency into nested nodes without recursion.
///
/// Children always come after their parent in pre-order, so walking the
/// pre-order sequence backwards finishes every child before its parent.
fn assemble(nodes: Vec<NodeInfo>, roots: &[usize], children: &[Vec<usize>]) -> Forest {
    let mut order: Vec<usize> = Vec::with_capacity(nodes.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        order.push(idx);
        stack.extend(children[idx].iter().rev().copied());
    }

    let mut infos: Vec<Option<NodeInfo>> = nodes.into_iter().map(Some).collect();
    let mut built: Vec<Option<OrgNode>> = vec![None; infos.len()];

    for &idx in order.iter().rev() {
        let subordinates = children[idx]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(info) = infos[idx].take() {
            built[idx] = Some(OrgNode { info, subordinates });
        }
    }

    let roots = roots.iter().filter_map(|&idx| built[idx].take()).collect();
    Forest::new(roots)
}
