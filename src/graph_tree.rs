use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::commit::Commit;

/// Column a parent's lane runs in below its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLane {
    pub hash: String,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode<'a> {
    pub commit: &'a Commit,
    pub column: usize,
    pub parents: Vec<String>,
    /// One entry per distinct parent, in parent order.
    pub child_columns: Vec<ParentLane>,
    /// Lanes still waiting for their commit after this row, ascending.
    pub pending_lanes: Vec<usize>,
}

impl GraphNode<'_> {
    pub fn column_for_parent(&self, parent_hash: &str) -> Option<usize> {
        self.child_columns
            .iter()
            .find(|lane| lane.hash == parent_hash)
            .map(|lane| lane.column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLayout<'a> {
    pub nodes: Vec<GraphNode<'a>>,
    /// Deepest column used by a dot or a parent lane, plus one.
    pub lane_count: usize,
    row_by_hash: BTreeMap<&'a str, usize>,
}

impl<'a> GraphLayout<'a> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn row_of(&self, hash: &str) -> Option<usize> {
        self.row_by_hash.get(hash).copied()
    }

    pub fn columns(&self) -> Vec<usize> {
        self.nodes.iter().map(|node| node.column).collect()
    }
}

/// Pass-local lane bookkeeping: parent hash to the column reserved for it.
#[derive(Debug, Default)]
struct ActiveColumns {
    by_hash: BTreeMap<String, usize>,
    occupied: BTreeSet<usize>,
}

impl ActiveColumns {
    fn take(&mut self, hash: &str) -> Option<usize> {
        let column = self.by_hash.remove(hash)?;
        self.occupied.remove(&column);
        Some(column)
    }

    fn get(&self, hash: &str) -> Option<usize> {
        self.by_hash.get(hash).copied()
    }

    fn insert(&mut self, hash: &str, column: usize) {
        self.by_hash.insert(hash.to_string(), column);
        self.occupied.insert(column);
    }

    fn lowest_free_from(&self, start: usize) -> usize {
        let mut column = start;
        while self.occupied.contains(&column) {
            column += 1;
        }
        column
    }

    fn snapshot(&self) -> Vec<usize> {
        self.occupied.iter().copied().collect()
    }
}

/// Assigns a column to every commit in a single pass over newest-first input.
///
/// A commit takes over the lane its child reserved for it; otherwise it gets
/// the lowest column not reserved by any pending lane. The first parent keeps
/// the commit's column; later parents get the lowest free column to its right.
/// Parents that never show up keep their reserved column, which the renderer
/// draws down to the bottom edge.
pub fn build_graph_layout(commits: &[Commit]) -> GraphLayout<'_> {
    let mut active = ActiveColumns::default();
    let mut nodes = Vec::with_capacity(commits.len());
    let mut row_by_hash = BTreeMap::new();
    let mut lane_count = 0;

    for (row, commit) in commits.iter().enumerate() {
        row_by_hash.entry(commit.hash.as_str()).or_insert(row);

        let column = active
            .take(commit.hash.as_str())
            .unwrap_or_else(|| active.lowest_free_from(0));

        let mut child_columns: Vec<ParentLane> = Vec::with_capacity(commit.parents.len());
        for (parent_ix, parent) in commit.parents.iter().enumerate() {
            if child_columns.iter().any(|lane| &lane.hash == parent) {
                continue;
            }
            let parent_column = match active.get(parent) {
                Some(existing) => existing,
                None => {
                    let reserved = if parent_ix == 0 {
                        column
                    } else {
                        active.lowest_free_from(column + 1)
                    };
                    active.insert(parent, reserved);
                    reserved
                }
            };
            child_columns.push(ParentLane {
                hash: parent.clone(),
                column: parent_column,
            });
        }

        lane_count = child_columns
            .iter()
            .map(|lane| lane.column)
            .chain(std::iter::once(column))
            .fold(lane_count, |count, column| count.max(column + 1));

        nodes.push(GraphNode {
            commit,
            column,
            parents: commit.parents.clone(),
            child_columns,
            pending_lanes: active.snapshot(),
        });
    }

    debug!(
        commits = nodes.len(),
        lanes = lane_count,
        dangling = active.by_hash.len(),
        "built graph layout"
    );

    GraphLayout {
        nodes,
        lane_count,
        row_by_hash,
    }
}
