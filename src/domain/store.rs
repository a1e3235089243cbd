use std::cmp::Ordering;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::CourseRecord;

/// Tree node stored in the arena. Owns its record; children are arena indices.
#[derive(Debug)]
struct CourseNode {
    record: CourseRecord,
    left: Option<Index>,
    right: Option<Index>,
}

impl CourseNode {
    fn new(record: CourseRecord) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }
}

/// Result of [`OrderedCourseStore::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new node was created for the identifier
    Added,
    /// The identifier was present; its record was overwritten in place
    Replaced,
}

/// Unbalanced binary search tree keyed by course identifier.
///
/// Nodes live in a generational arena and reference their children by index,
/// so there are no parent links and no cycles. For every node, identifiers in
/// the left subtree compare less (byte-wise) and identifiers in the right
/// subtree compare greater.
///
/// No rebalancing is done: shape depends on insertion order, and pre-sorted
/// input degenerates into a list with O(n) operations. Traversals use an
/// explicit stack, so a degenerate tree does not grow the call stack.
#[derive(Debug)]
pub struct OrderedCourseStore {
    arena: Arena<CourseNode>,
    root: Option<Index>,
}

impl Default for OrderedCourseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedCourseStore {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a record, or overwrite the record already stored under its identifier.
    ///
    /// Last write wins; the tree never holds two nodes for one identifier.
    #[instrument(level = "trace", skip(self, record), fields(id = %record.id))]
    pub fn insert(&mut self, record: CourseRecord) -> InsertOutcome {
        let Some(mut current) = self.root else {
            self.root = Some(self.arena.insert(CourseNode::new(record)));
            return InsertOutcome::Added;
        };

        loop {
            let node = &mut self.arena[current];
            let ordering = record.id.as_str().cmp(node.record.id.as_str());
            let next = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => {
                    node.record = record;
                    return InsertOutcome::Replaced;
                }
            };

            match next {
                Some(child) => current = child,
                None => {
                    let child = self.arena.insert(CourseNode::new(record));
                    let parent = &mut self.arena[current];
                    if ordering == Ordering::Less {
                        parent.left = Some(child);
                    } else {
                        parent.right = Some(child);
                    }
                    return InsertOutcome::Added;
                }
            }
        }
    }

    /// Exact-match lookup. Absence is a normal outcome, not an error.
    #[instrument(level = "trace", skip(self))]
    pub fn search(&self, id: &str) -> Option<&CourseRecord> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            current = match id.cmp(node.record.id.as_str()) {
                Ordering::Equal => return Some(&node.record),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn contains(&self, id: &str) -> bool {
        self.search(id).is_some()
    }

    /// Records in ascending identifier order.
    pub fn iter(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn in_order(&self) -> Vec<&CourseRecord> {
        self.iter().collect()
    }

    /// Records in post-order: both subtrees before their parent.
    pub fn iter_postorder(&self) -> impl Iterator<Item = &CourseRecord> + '_ {
        self.postorder_indices()
            .into_iter()
            .map(move |idx| &self.arena[idx].record)
    }

    /// Remove every node, children before parent, and reset to empty.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        for idx in self.postorder_indices() {
            self.arena.remove(idx);
        }
        self.root = None;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty store.
    #[instrument(level = "trace", skip(self))]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[idx];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    pub fn min(&self) -> Option<&CourseRecord> {
        self.edge(|node| node.left)
    }

    pub fn max(&self) -> Option<&CourseRecord> {
        self.edge(|node| node.right)
    }

    fn edge(&self, step: impl Fn(&CourseNode) -> Option<Index>) -> Option<&CourseRecord> {
        let mut idx = self.root?;
        while let Some(next) = step(&self.arena[idx]) {
            idx = next;
        }
        Some(&self.arena[idx].record)
    }

    /// Render the tree shape for diagnostics. Children are tagged `L:` / `R:`.
    ///
    /// Recurses once per level, so depth is bounded by [`height`](Self::height).
    pub fn shape(&self) -> Option<Tree<String>> {
        self.root.map(|root| self.subtree(root, ""))
    }

    fn subtree(&self, idx: Index, tag: &str) -> Tree<String> {
        let node = &self.arena[idx];
        let mut tree = Tree::new(format!("{}{}", tag, node.record.id));
        if let Some(left) = node.left {
            tree.push(self.subtree(left, "L: "));
        }
        if let Some(right) = node.right {
            tree.push(self.subtree(right, "R: "));
        }
        tree
    }

    fn postorder_indices(&self) -> Vec<Index> {
        let mut order = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(Index, bool)> = self.root.map(|r| (r, false)).into_iter().collect();
        while let Some((idx, expanded)) = stack.pop() {
            if expanded {
                order.push(idx);
                continue;
            }
            stack.push((idx, true));
            let node = &self.arena[idx];
            // right pushed first so the left subtree is emitted first
            if let Some(right) = node.right {
                stack.push((right, false));
            }
            if let Some(left) = node.left {
                stack.push((left, false));
            }
        }
        order
    }
}

impl<'a> IntoIterator for &'a OrderedCourseStore {
    type Item = &'a CourseRecord;
    type IntoIter = InOrderIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct InOrderIterator<'a> {
    arena: &'a Arena<CourseNode>,
    stack: Vec<Index>,
    pending: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(store: &'a OrderedCourseStore) -> Self {
        Self {
            arena: &store.arena,
            stack: Vec::new(),
            pending: store.root,
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = &'a CourseRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.pending {
            self.stack.push(idx);
            self.pending = self.arena[idx].left;
        }
        let idx = self.stack.pop()?;
        let node = &self.arena[idx];
        self.pending = node.right;
        Some(&node.record)
    }
}
