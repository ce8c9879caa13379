use std::cmp::Ordering;

use crate::core::types::{AccidentRecord, RecordFilter};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

/// A node in the tree. Links are arena indices; `parent` is a back-reference
/// used only for fixup navigation, never for ownership.
#[derive(Debug)]
struct Node {
    record: AccidentRecord,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    fn new(record: AccidentRecord) -> Self {
        Node { record, color: Color::Red, parent: None, left: None, right: None }
    }
}

/// Ordered index over accident records, keyed by id.
///
/// A standard red-black tree: the root is black, no red node has a red
/// child, and every root-to-nil path crosses the same number of black
/// nodes, so search and removal stay O(log n). In-order traversal yields
/// ascending id order.
///
/// Equal ids are routed to the right on insert, so duplicates coexist
/// rather than being rejected or merged.
#[derive(Debug, Default)]
pub struct RedBlackIndex {
    /// Node arena. Freed slots are recycled through `free_list`.
    nodes: Vec<Node>,
    free_list: Vec<u32>,
    root: Option<NodeId>,
    len: usize,
}

impl RedBlackIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // ===== Arena operations =====

    fn alloc(&mut self, record: AccidentRecord) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = Node::new(record);
            NodeId(idx)
        } else {
            let idx = self.nodes.len() as u32;
            self.nodes.push(Node::new(record));
            NodeId(idx)
        }
    }

    /// Frees a node back to the arena, returning its record.
    fn free(&mut self, id: NodeId) -> AccidentRecord {
        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.left = None;
        node.right = None;
        node.color = Color::Black;
        self.free_list.push(id.0);
        std::mem::take(&mut node.record)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    // ===== Field accessors (avoid borrow conflicts in the fixup loops) =====

    fn key(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].record.id
    }

    fn color(&self, id: NodeId) -> Color {
        self.nodes[id.index()].color
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].left
    }

    fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].right
    }

    /// Nil positions count as black.
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |n| self.color(n) == Color::Red)
    }

    fn is_black(&self, id: Option<NodeId>) -> bool {
        !self.is_red(id)
    }

    // ===== Rotations =====

    fn rotate_left(&mut self, node: NodeId) {
        let right = match self.right(node) {
            Some(r) => r,
            None => return, // structural invariant violated; skip rotation
        };

        // Turn right's left subtree into node's right subtree
        let right_left = self.left(right);
        self.node_mut(node).right = right_left;
        if let Some(rl) = right_left {
            self.node_mut(rl).parent = Some(node);
        }

        // right takes node's place under node's parent
        let node_parent = self.parent(node);
        self.node_mut(right).parent = node_parent;
        match node_parent {
            None => self.root = Some(right),
            Some(parent) => {
                if self.left(parent) == Some(node) {
                    self.node_mut(parent).left = Some(right);
                } else {
                    self.node_mut(parent).right = Some(right);
                }
            }
        }

        self.node_mut(right).left = Some(node);
        self.node_mut(node).parent = Some(right);
    }

    fn rotate_right(&mut self, node: NodeId) {
        let left = match self.left(node) {
            Some(l) => l,
            None => return, // structural invariant violated; skip rotation
        };

        let left_right = self.right(left);
        self.node_mut(node).left = left_right;
        if let Some(lr) = left_right {
            self.node_mut(lr).parent = Some(node);
        }

        let node_parent = self.parent(node);
        self.node_mut(left).parent = node_parent;
        match node_parent {
            None => self.root = Some(left),
            Some(parent) => {
                if self.right(parent) == Some(node) {
                    self.node_mut(parent).right = Some(left);
                } else {
                    self.node_mut(parent).left = Some(left);
                }
            }
        }

        self.node_mut(left).right = Some(node);
        self.node_mut(node).parent = Some(left);
    }

    // ===== Insert =====

    /// Inserts a record. Equal ids route right, so duplicates are kept.
    pub fn insert(&mut self, record: AccidentRecord) {
        let node = self.alloc(record);

        // BST descent to the leaf position
        let mut parent: Option<NodeId> = None;
        let mut current = self.root;
        while let Some(cur) = current {
            parent = Some(cur);
            current = if self.key(node) < self.key(cur) {
                self.left(cur)
            } else {
                self.right(cur)
            };
        }

        self.node_mut(node).parent = parent;
        match parent {
            None => {
                // Empty tree: the new node becomes a black root, no fixup.
                self.node_mut(node).color = Color::Black;
                self.root = Some(node);
            }
            Some(p) => {
                if self.key(node) < self.key(p) {
                    self.node_mut(p).left = Some(node);
                } else {
                    self.node_mut(p).right = Some(node);
                }
                self.insert_fixup(node);
            }
        }
        self.len += 1;
    }

    /// Restores the red-black invariants after an insertion, walking up
    /// from the new red node while its parent is red.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while self.is_red(self.parent(node)) {
            let parent = match self.parent(node) {
                Some(p) => p,
                None => break,
            };
            let grandparent = match self.parent(parent) {
                Some(gp) => gp,
                None => break,
            };

            if Some(parent) == self.left(grandparent) {
                let uncle = self.right(grandparent);

                if self.is_red(uncle) {
                    // Recoloring case: push blackness down from the grandparent.
                    self.node_mut(parent).color = Color::Black;
                    if let Some(u) = uncle {
                        self.node_mut(u).color = Color::Black;
                    }
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if Some(node) == self.right(parent) {
                        // Inner child: rotate it out first.
                        node = parent;
                        self.rotate_left(node);
                    }
                    // Outer child: rotate at the grandparent and swap colors.
                    if let Some(parent) = self.parent(node) {
                        if let Some(grandparent) = self.parent(parent) {
                            self.node_mut(parent).color = Color::Black;
                            self.node_mut(grandparent).color = Color::Red;
                            self.rotate_right(grandparent);
                        }
                    }
                }
            } else {
                // Mirror image: parent is a right child.
                let uncle = self.left(grandparent);

                if self.is_red(uncle) {
                    self.node_mut(parent).color = Color::Black;
                    if let Some(u) = uncle {
                        self.node_mut(u).color = Color::Black;
                    }
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    if Some(node) == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    if let Some(parent) = self.parent(node) {
                        if let Some(grandparent) = self.parent(parent) {
                            self.node_mut(parent).color = Color::Black;
                            self.node_mut(grandparent).color = Color::Red;
                            self.rotate_left(grandparent);
                        }
                    }
                }
            }
        }

        // Root is always forced black.
        if let Some(root) = self.root {
            self.node_mut(root).color = Color::Black;
        }
    }

    // ===== Search =====

    fn find_node(&self, id: &str) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(cur) = current {
            match id.cmp(self.key(cur)) {
                Ordering::Less => current = self.left(cur),
                Ordering::Greater => current = self.right(cur),
                Ordering::Equal => return Some(cur),
            }
        }
        None
    }

    /// Finds a record by exact id.
    pub fn get(&self, id: &str) -> Option<&AccidentRecord> {
        self.find_node(id).map(|n| &self.node(n).record)
    }

    /// Collects every record matching `filter`, in ascending id order.
    ///
    /// The filterable attributes are not the tree key, so this is a full
    /// traversal, not an index seek.
    pub fn filter(&self, filter: &RecordFilter) -> Vec<&AccidentRecord> {
        self.iter().filter(|r| filter.matches(r)).collect()
    }

    /// In-order iterator over all records, ascending by id. Lazy, finite,
    /// and restartable; iterating does not mutate the tree.
    pub fn iter(&self) -> InorderIter<'_> {
        InorderIter::new(self)
    }

    // ===== Remove =====

    fn subtree_min(&self, mut node: NodeId) -> NodeId {
        while let Some(left) = self.left(node) {
            node = left;
        }
        node
    }

    /// Replace `dest` with `source` as a child of `dest`'s parent.
    fn replace_child(&mut self, source: Option<NodeId>, dest: NodeId) {
        match self.parent(dest) {
            None => self.root = source,
            Some(parent) => {
                if self.left(parent) == Some(dest) {
                    self.node_mut(parent).left = source;
                } else {
                    self.node_mut(parent).right = source;
                }
            }
        }
        if let Some(s) = source {
            self.node_mut(s).parent = self.parent(dest);
        }
    }

    /// Move `source` into `dest`'s structural position: same parent, same
    /// children, same color. `source` must already be detached.
    fn transplant(&mut self, source: NodeId, dest: NodeId) {
        self.replace_child(Some(source), dest);

        let dest_left = self.left(dest);
        let dest_right = self.right(dest);
        let dest_color = self.color(dest);

        self.node_mut(source).left = dest_left;
        if let Some(l) = dest_left {
            self.node_mut(l).parent = Some(source);
        }
        self.node_mut(source).right = dest_right;
        if let Some(r) = dest_right {
            self.node_mut(r).parent = Some(source);
        }
        self.node_mut(source).color = dest_color;
    }

    /// Removes one record with the given id, returning it. `None` when the
    /// id is absent. With duplicates present, one of them is removed.
    pub fn remove(&mut self, id: &str) -> Option<AccidentRecord> {
        let node = self.find_node(id)?;

        // splice: the node physically unlinked. Either `node` itself (at
        // most one child) or its in-order successor (two children).
        let splice = match (self.left(node), self.right(node)) {
            (Some(_), Some(right)) => self.subtree_min(right),
            _ => node,
        };

        // subtree: splice's only child, which takes its place. May be nil,
        // in which case the fixup treats the vacated position as black.
        let subtree = self.left(splice).or_else(|| self.right(splice));

        // Where subtree ends up: under splice itself when splice is node's
        // direct child (it moves into node's position next), otherwise
        // under splice's old parent.
        let subtree_parent = if self.parent(splice) != Some(node) {
            self.parent(splice)
        } else {
            Some(splice)
        };

        self.replace_child(subtree, splice);
        let removed_black = self.color(splice) == Color::Black;

        if splice != node {
            self.transplant(splice, node);
        }

        self.len -= 1;

        if removed_black {
            self.remove_fixup(subtree, subtree_parent);
        }

        Some(self.free(node))
    }

    /// Restores the black-height invariant after removing a black node.
    /// `node` is the position carrying the extra blackness (possibly nil,
    /// hence the separate `parent`); the cases are driven by the sibling's
    /// color and the colors of the sibling's children.
    fn remove_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while parent.is_some() && self.is_black(node) {
            let p = match parent {
                Some(p) => p,
                None => break,
            };

            if node == self.left(p) {
                let mut sibling = match self.right(p) {
                    Some(s) => s,
                    None => break,
                };

                if self.color(sibling) == Color::Red {
                    // Red sibling: rotate to expose a black one.
                    self.node_mut(sibling).color = Color::Black;
                    self.node_mut(p).color = Color::Red;
                    self.rotate_left(p);
                    sibling = match self.right(p) {
                        Some(s) => s,
                        None => break,
                    };
                }

                if self.is_black(self.left(sibling)) && self.is_black(self.right(sibling)) {
                    // Both sibling children black: recolor and move up.
                    self.node_mut(sibling).color = Color::Red;
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    if self.is_black(self.right(sibling)) {
                        // Near child red: rotate the sibling first.
                        if let Some(sl) = self.left(sibling) {
                            self.node_mut(sl).color = Color::Black;
                        }
                        self.node_mut(sibling).color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = match self.right(p) {
                            Some(s) => s,
                            None => break,
                        };
                    }
                    // Far child red: terminal rotation at the parent.
                    let parent_color = self.color(p);
                    self.node_mut(sibling).color = parent_color;
                    self.node_mut(p).color = Color::Black;
                    if let Some(sr) = self.right(sibling) {
                        self.node_mut(sr).color = Color::Black;
                    }
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                // Mirror image: the vacated position is a right child.
                let mut sibling = match self.left(p) {
                    Some(s) => s,
                    None => break,
                };

                if self.color(sibling) == Color::Red {
                    self.node_mut(sibling).color = Color::Black;
                    self.node_mut(p).color = Color::Red;
                    self.rotate_right(p);
                    sibling = match self.left(p) {
                        Some(s) => s,
                        None => break,
                    };
                }

                if self.is_black(self.right(sibling)) && self.is_black(self.left(sibling)) {
                    self.node_mut(sibling).color = Color::Red;
                    node = Some(p);
                    parent = self.parent(p);
                } else {
                    if self.is_black(self.left(sibling)) {
                        if let Some(sr) = self.right(sibling) {
                            self.node_mut(sr).color = Color::Black;
                        }
                        self.node_mut(sibling).color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = match self.left(p) {
                            Some(s) => s,
                            None => break,
                        };
                    }
                    let parent_color = self.color(p);
                    self.node_mut(sibling).color = parent_color;
                    self.node_mut(p).color = Color::Black;
                    if let Some(sl) = self.left(sibling) {
                        self.node_mut(sl).color = Color::Black;
                    }
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }

        if let Some(n) = node {
            self.node_mut(n).color = Color::Black;
        }
    }

    // ===== Invariant checking (test support) =====

    /// Asserts the red-black and ordering invariants over the whole tree.
    #[cfg(test)]
    fn check_invariants(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.color(root), Color::Black, "root must be black");
            assert_eq!(self.parent(root), None, "root must have no parent");
            self.check_subtree(root);
        }

        // In-order traversal must be non-decreasing and cover every record.
        let ids: Vec<&str> = self.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), self.len, "traversal must visit every live node");
        assert!(ids.windows(2).all(|w| w[0] <= w[1]), "in-order ids out of order: {ids:?}");
    }

    /// Returns the black-height of the subtree rooted at `id`, asserting
    /// local invariants on the way down.
    #[cfg(test)]
    fn check_subtree(&self, id: NodeId) -> usize {
        let node = self.node(id);

        if node.color == Color::Red {
            assert!(
                self.is_black(node.left) && self.is_black(node.right),
                "red node {} has a red child",
                node.record.id
            );
        }

        let left_height = node.left.map_or(1, |l| {
            assert_eq!(self.parent(l), Some(id), "broken parent link");
            self.check_subtree(l)
        });
        let right_height = node.right.map_or(1, |r| {
            assert_eq!(self.parent(r), Some(id), "broken parent link");
            self.check_subtree(r)
        });
        assert_eq!(
            left_height, right_height,
            "black-height mismatch under {}",
            node.record.id
        );

        left_height + usize::from(node.color == Color::Black)
    }
}

/// Lazy in-order iterator over a [`RedBlackIndex`].
///
/// Uses an explicit stack instead of recursion, so arbitrarily large trees
/// iterate in constant stack space per step.
#[derive(Debug)]
pub struct InorderIter<'a> {
    tree: &'a RedBlackIndex,
    stack: Vec<NodeId>,
}

impl<'a> InorderIter<'a> {
    fn new(tree: &'a RedBlackIndex) -> Self {
        let mut iter = InorderIter { tree, stack: Vec::new() };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.tree.node(id).left;
        }
    }
}

impl<'a> Iterator for InorderIter<'a> {
    type Item = &'a AccidentRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.push_left_spine(node.right);
        Some(&node.record)
    }
}

impl crate::core::indexing::traits::RecordIndex for RedBlackIndex {
    fn insert(&mut self, record: AccidentRecord) -> Result<(), crate::core::common::CrashDbError> {
        Self::insert(self, record);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Option<AccidentRecord> {
        Self::remove(self, id)
    }

    fn get(&self, id: &str) -> Option<&AccidentRecord> {
        Self::get(self, id)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str) -> AccidentRecord {
        AccidentRecord::new(id, 1, 0.1, "Denver", "CO", "80201")
    }

    fn rec_sev(id: &str, severity: i32) -> AccidentRecord {
        AccidentRecord::new(id, severity, 0.1, "Denver", "CO", "80201")
    }

    /// Deterministic non-monotonic id sequence, no RNG needed.
    fn scrambled_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("K{:04}", (i * 37) % n)).collect()
    }

    #[test]
    fn empty_tree_queries() {
        let mut tree = RedBlackIndex::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.get("anything"), None);
        assert_eq!(tree.remove("anything"), None);
        assert_eq!(tree.iter().count(), 0);
        assert!(tree.filter(&RecordFilter::default()).is_empty());
        tree.check_invariants();
    }

    #[test]
    fn single_insert_makes_a_black_root() {
        let mut tree = RedBlackIndex::new();
        tree.insert(rec("only"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("only"), Some(&rec("only")));
        tree.check_invariants();
    }

    #[test]
    fn round_trip_for_various_sizes() {
        for n in [0usize, 1, 2, 7, 64, 500] {
            let mut tree = RedBlackIndex::new();
            for id in scrambled_ids(n) {
                tree.insert(rec(&id));
            }
            assert_eq!(tree.len(), n);
            tree.check_invariants();
            for id in scrambled_ids(n) {
                let found = tree.get(&id);
                assert_eq!(found.map(|r| r.id.as_str()), Some(id.as_str()));
            }
        }
    }

    #[test]
    fn inorder_traversal_is_ascending() {
        let mut tree = RedBlackIndex::new();
        for id in ["M", "C", "X", "A", "T", "B", "Z", "Q"] {
            tree.insert(rec(id));
        }
        let ids: Vec<&str> = tree.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "M", "Q", "T", "X", "Z"]);
    }

    #[test]
    fn iterator_is_restartable() {
        let mut tree = RedBlackIndex::new();
        for id in ["B", "A", "C"] {
            tree.insert(rec(id));
        }
        let first: Vec<&str> = tree.iter().map(|r| r.id.as_str()).collect();
        let second: Vec<&str> = tree.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn ascending_and_descending_insertions_stay_balanced() {
        let mut forward = RedBlackIndex::new();
        let mut backward = RedBlackIndex::new();
        for i in 0..200 {
            forward.insert(rec(&format!("K{i:04}")));
            backward.insert(rec(&format!("K{:04}", 199 - i)));
        }
        forward.check_invariants();
        backward.check_invariants();
        assert_eq!(forward.len(), 200);
        assert_eq!(backward.len(), 200);
    }

    #[test]
    fn remove_returns_the_record_and_keeps_the_rest() {
        let mut tree = RedBlackIndex::new();
        let ids = scrambled_ids(50);
        for id in &ids {
            tree.insert(rec(id));
        }

        let victim = &ids[17];
        let removed = tree.remove(victim).unwrap();
        assert_eq!(&removed.id, victim);
        assert_eq!(tree.get(victim), None);
        assert_eq!(tree.len(), 49);
        tree.check_invariants();

        for id in &ids {
            if id != victim {
                assert!(tree.get(id).is_some(), "{id} lost after removing {victim}");
            }
        }
    }

    #[test]
    fn remove_absent_id_is_a_silent_not_found() {
        let mut tree = RedBlackIndex::new();
        tree.insert(rec("present"));
        assert_eq!(tree.remove("absent"), None);
        assert_eq!(tree.len(), 1);
        tree.check_invariants();
    }

    #[test]
    fn remove_each_structural_case() {
        // Leaf, one-child, and two-children removals.
        let mut tree = RedBlackIndex::new();
        for id in ["D", "B", "F", "A", "C", "E", "G"] {
            tree.insert(rec(id));
        }

        assert!(tree.remove("A").is_some()); // leaf
        tree.check_invariants();
        assert!(tree.remove("B").is_some()); // one child remaining
        tree.check_invariants();
        assert!(tree.remove("D").is_some()); // two children, successor swap
        tree.check_invariants();

        let ids: Vec<&str> = tree.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "E", "F", "G"]);
    }

    #[test]
    fn invariants_hold_under_interleaved_inserts_and_removes() {
        let mut tree = RedBlackIndex::new();
        let ids = scrambled_ids(150);
        for id in &ids {
            tree.insert(rec(id));
        }
        tree.check_invariants();

        for (i, id) in ids.iter().enumerate() {
            if i % 3 == 0 {
                assert!(tree.remove(id).is_some());
                tree.check_invariants();
            }
        }
        for i in 200..240 {
            tree.insert(rec(&format!("K{i:04}")));
            tree.check_invariants();
        }

        for (i, id) in ids.iter().enumerate() {
            let expected = i % 3 != 0;
            assert_eq!(tree.get(id).is_some(), expected, "id {id}");
        }
    }

    #[test]
    fn drain_the_whole_tree() {
        let mut tree = RedBlackIndex::new();
        let ids = scrambled_ids(40);
        for id in &ids {
            tree.insert(rec(id));
        }
        for id in &ids {
            assert!(tree.remove(id).is_some());
            tree.check_invariants();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn duplicate_ids_coexist_in_the_tree() {
        // Equal keys route right on insert: multiset semantics, kept as-is.
        let mut tree = RedBlackIndex::new();
        tree.insert(rec_sev("dup", 1));
        tree.insert(rec_sev("dup", 2));
        assert_eq!(tree.len(), 2);
        tree.check_invariants();

        let ids: Vec<&str> = tree.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["dup", "dup"]);

        // Each remove takes exactly one of them.
        assert!(tree.remove("dup").is_some());
        assert_eq!(tree.len(), 1);
        assert!(tree.get("dup").is_some());
        assert!(tree.remove("dup").is_some());
        assert!(tree.is_empty());
    }

    #[test]
    fn arena_slots_are_recycled() {
        let mut tree = RedBlackIndex::new();
        for i in 0..10 {
            tree.insert(rec(&format!("K{i}")));
        }
        for i in 0..10 {
            tree.remove(&format!("K{i}"));
        }
        let slots_before = tree.nodes.len();
        for i in 10..20 {
            tree.insert(rec(&format!("K{i}")));
        }
        assert_eq!(tree.nodes.len(), slots_before, "freed slots should be reused");
        tree.check_invariants();
    }

    #[test]
    fn filter_by_severity_returns_exact_matches_in_id_order() {
        let mut tree = RedBlackIndex::new();
        let severities = [1, 2, 1, 3, 1];
        for (i, sev) in severities.iter().enumerate() {
            tree.insert(rec_sev(&format!("A{}", i + 1), *sev));
        }

        let hits: Vec<&str> = tree
            .filter(&RecordFilter::by_severity(1))
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(hits, vec!["A1", "A3", "A5"]);

        assert!(tree.filter(&RecordFilter::by_severity(9)).is_empty());
    }

    #[test]
    fn unconstrained_filter_returns_everything() {
        let mut tree = RedBlackIndex::new();
        for id in ["B", "A", "C"] {
            tree.insert(rec(id));
        }
        assert_eq!(tree.filter(&RecordFilter::default()).len(), 3);
    }
}
