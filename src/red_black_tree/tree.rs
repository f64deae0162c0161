use crate::arena::TypedArena;
use crate::red_black_tree::node::{Color, Node, NodeRef, Side};
use std::cmp::Ordering;
use std::ops::Index;

/// A red black tree over unique `u64` keys.
///
/// Every missing child is modelled as its own sentinel leaf. Sentinels are always black and
/// remember the data node whose slot they fill, so both the coloring invariants and upward walks
/// are defined over them, not just over data nodes. All nodes live in an arena owned by the tree;
/// child and parent links are arena handles, so the parent link never owns anything.
///
/// # Examples
///
/// ```
/// use sentinel_rbtree::red_black_tree::{Color, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// let (inserted, node) = tree.insert_node(5);
/// assert!(inserted);
/// assert_eq!(tree.insert_node(5), (false, node));
///
/// assert_eq!(tree.root(), Some(node));
/// assert_eq!(tree[node].color(), Color::Black);
///
/// assert!(tree.delete_node(5));
/// assert_eq!(tree.find_node(5), None);
/// assert!(!tree.delete_node(5));
/// ```
pub struct RedBlackTree {
    pub(super) arena: TypedArena<Node>,
    pub(super) root: NodeRef,
    pub(super) len: usize,
}

impl RedBlackTree {
    /// Constructs a new, empty `RedBlackTree`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `RedBlackTree` with room for `capacity` keys before its node
    /// storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let tree = RedBlackTree::with_capacity(64);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        // each key brings one extra sentinel with it, plus the sentinel of the empty tree
        let mut arena = TypedArena::with_capacity(2 * capacity + 1);
        let root = arena.allocate(Node::sentinel(None));
        RedBlackTree {
            arena,
            root,
            len: 0,
        }
    }

    /// Returns the node holding `key`, or `None` if the key is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let (_, node) = tree.insert_node(1);
    /// assert_eq!(tree.find_node(1), Some(node));
    /// assert_eq!(tree.find_node(2), None);
    /// ```
    pub fn find_node(&self, key: u64) -> Option<NodeRef> {
        let mut curr = self.root;
        while let Some(curr_key) = self.arena[curr].key() {
            curr = match key.cmp(&curr_key) {
                Ordering::Less => self.child(curr, Side::Left),
                Ordering::Greater => self.child(curr, Side::Right),
                Ordering::Equal => return Some(curr),
            };
        }
        None
    }

    /// Inserts a key into the tree. Returns `(true, node)` with the newly created node, or
    /// `(false, node)` with the existing node if the key was already present, in which case the
    /// tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// let (inserted, node) = tree.insert_node(3);
    /// assert!(inserted);
    /// assert_eq!(tree.insert_node(3), (false, node));
    /// ```
    pub fn insert_node(&mut self, key: u64) -> (bool, NodeRef) {
        let mut parent = None;
        let mut curr = self.root;
        while let Some(curr_key) = self.arena[curr].key() {
            let side = match key.cmp(&curr_key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    debug!("Key {} already present", key);
                    return (false, curr);
                },
            };
            parent = Some(curr);
            curr = self.child(curr, side);
        }

        // `curr` is the sentinel occupying the slot the new node goes into
        let left = self.arena.allocate(Node::sentinel(None));
        let right = self.arena.allocate(Node::sentinel(None));
        let new_node = self.arena.allocate(Node::new(key, left, right));
        self.set_parent(left, Some(new_node));
        self.set_parent(right, Some(new_node));
        self.replace_child(parent, curr, new_node);
        self.arena.free(&curr);
        self.len += 1;

        self.insert_fixup(new_node);
        debug!("Inserted key {}", key);
        (true, new_node)
    }

    /// Removes a key from the tree. Returns `false` if the key is not in the tree, in which case
    /// the tree is left untouched.
    ///
    /// When the node holding `key` has two data children, its in-order successor's key is moved
    /// into it and the successor's node is the one released, so handles to the successor become
    /// stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert_node(1);
    /// assert!(tree.delete_node(1));
    /// assert!(!tree.delete_node(1));
    /// ```
    pub fn delete_node(&mut self, key: u64) -> bool {
        let target = match self.find_node(key) {
            Some(target) => target,
            None => {
                debug!("Key {} not present", key);
                return false;
            },
        };

        let mut removed = target;
        if !self.is_sentinel(self.child(target, Side::Left))
            && !self.is_sentinel(self.child(target, Side::Right))
        {
            let mut successor = self.child(target, Side::Right);
            while !self.is_sentinel(self.child(successor, Side::Left)) {
                successor = self.child(successor, Side::Left);
            }
            let successor_key = self.key(successor);
            self.arena[target].set_key(successor_key);
            removed = successor;
        }

        // `removed` has at most one data child, which takes its place
        let (replacement, orphan) = if self.is_sentinel(self.child(removed, Side::Left)) {
            (self.child(removed, Side::Right), self.child(removed, Side::Left))
        } else {
            (self.child(removed, Side::Left), self.child(removed, Side::Right))
        };
        let parent = self.parent(removed);
        self.replace_child(parent, removed, replacement);
        let removed_color = self.color(removed);
        self.arena.free(&orphan);
        self.arena.free(&removed);
        self.len -= 1;

        if removed_color == Color::Black {
            self.delete_fixup(replacement);
        }
        debug!("Deleted key {}", key);
        true
    }

    /// Returns the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef> {
        if self.is_sentinel(self.root) {
            None
        } else {
            Some(self.root)
        }
    }

    /// Appends every data node whose children are both sentinels to `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for key in &[2, 1, 3] {
    ///     tree.insert_node(*key);
    /// }
    ///
    /// let mut leaves = Vec::new();
    /// tree.leaf_nodes(&mut leaves);
    /// assert_eq!(leaves.len(), 2);
    /// ```
    pub fn leaf_nodes(&self, out: &mut Vec<NodeRef>) {
        self.preorder(|tree, node| {
            if tree.is_leaf(node) {
                out.push(node);
            }
        });
    }

    /// Appends every data node with at least one data child to `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for key in &[2, 1, 3] {
    ///     tree.insert_node(*key);
    /// }
    ///
    /// let mut inner = Vec::new();
    /// tree.non_leaf_nodes(&mut inner);
    /// assert_eq!(inner, vec![tree.root().unwrap()]);
    /// ```
    pub fn non_leaf_nodes(&self, out: &mut Vec<NodeRef>) {
        self.preorder(|tree, node| {
            if !tree.is_leaf(node) {
                out.push(node);
            }
        });
    }

    /// Returns `true` if `node` is a data node whose children are both sentinels.
    pub fn is_leaf(&self, node: NodeRef) -> bool {
        match self.arena.get(&node) {
            Some(data) if !data.is_sentinel() => {
                self.is_sentinel(self.child(node, Side::Left))
                    && self.is_sentinel(self.child(node, Side::Right))
            },
            _ => false,
        }
    }

    /// Returns the node behind a handle, or `None` if the handle is stale.
    pub fn get(&self, node: NodeRef) -> Option<&Node> {
        self.arena.get(&node)
    }

    /// Checks if a key exists in the tree.
    pub fn contains(&self, key: u64) -> bool {
        self.find_node(key).is_some()
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every key from the tree. All previously returned handles become stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.allocate(Node::sentinel(None));
        self.len = 0;
    }

    /// Returns the minimum key of the tree, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert_node(3);
    /// tree.insert_node(1);
    /// assert_eq!(tree.min(), Some(1));
    /// assert_eq!(tree.max(), Some(3));
    /// ```
    pub fn min(&self) -> Option<u64> {
        self.extreme(Side::Left)
    }

    /// Returns the maximum key of the tree, or `None` if the tree is empty.
    pub fn max(&self) -> Option<u64> {
        self.extreme(Side::Right)
    }

    /// Returns the number of black nodes on a path from the root down to a sentinel, not counting
    /// the root itself. An empty tree has a black height of zero.
    pub fn black_height(&self) -> usize {
        let mut height = 0;
        let mut curr = self.root;
        while let Some(left) = self.arena[curr].left() {
            if self.color(left) == Color::Black {
                height += 1;
            }
            curr = left;
        }
        height
    }

    fn extreme(&self, side: Side) -> Option<u64> {
        let mut curr = self.root()?;
        while !self.is_sentinel(self.child(curr, side)) {
            curr = self.child(curr, side);
        }
        self.arena[curr].key()
    }

    // Visits every data node exactly once, parents before children.
    fn preorder<F>(&self, mut f: F)
    where
        F: FnMut(&Self, NodeRef),
    {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let (Some(left), Some(right)) = (self.arena[node].left(), self.arena[node].right()) {
                f(self, node);
                stack.push(right);
                stack.push(left);
            }
        }
    }

    fn insert_fixup(&mut self, mut node: NodeRef) {
        while let Some(mut parent) = self.parent(node) {
            if self.color(parent) == Color::Black {
                break;
            }
            // a red parent is never the root, so the grandparent exists
            let grandparent = self
                .parent(parent)
                .expect("Error: red node without a parent.");
            let side = self.side_of(parent, grandparent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                trace!("Insert fixup: red uncle, recoloring at {:?}", grandparent);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if node == self.child(parent, side.opposite()) {
                trace!("Insert fixup: inner grandchild, rotating at {:?}", parent);
                self.rotate(parent, side);
                node = parent;
                parent = self
                    .parent(node)
                    .expect("Error: rotated node without a parent.");
            }

            trace!("Insert fixup: outer grandchild, rotating at {:?}", grandparent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn delete_fixup(&mut self, mut node: NodeRef) {
        while node != self.root && self.color(node) == Color::Black {
            let parent = self
                .parent(node)
                .expect("Error: non-root node without a parent.");
            let side = self.side_of(node, parent);
            let far = side.opposite();
            let mut sibling = self.child(parent, far);

            if self.color(sibling) == Color::Red {
                trace!("Delete fixup: red sibling, rotating at {:?}", parent);
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, far);
            }

            let near_child = self.child(sibling, side);
            let far_child = self.child(sibling, far);
            if self.color(near_child) == Color::Black && self.color(far_child) == Color::Black {
                trace!("Delete fixup: black nephews, moving up to {:?}", parent);
                self.set_color(sibling, Color::Red);
                node = parent;
                continue;
            }

            if self.color(far_child) == Color::Black {
                trace!("Delete fixup: red near nephew, rotating at {:?}", sibling);
                self.set_color(near_child, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = self.child(parent, far);
            }

            trace!("Delete fixup: red far nephew, rotating at {:?}", parent);
            let parent_color = self.color(parent);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far_child = self.child(sibling, far);
            self.set_color(far_child, Color::Black);
            self.rotate(parent, side);
            node = self.root;
        }

        self.set_color(node, Color::Black);
    }

    // Moves `node` down towards `side`; its child on the other side takes its place. A left
    // rotation is `rotate(node, Side::Left)`.
    fn rotate(&mut self, node: NodeRef, side: Side) {
        let child = self.child(node, side.opposite());
        let grandchild = self.child(child, side);

        self.arena[node].set_child(side.opposite(), grandchild);
        self.set_parent(grandchild, Some(node));

        let parent = self.parent(node);
        self.replace_child(parent, node, child);

        self.arena[child].set_child(side, node);
        self.set_parent(node, Some(child));
    }

    // Puts `new` into the slot `old` occupies under `parent`, or makes it the root.
    fn replace_child(&mut self, parent: Option<NodeRef>, old: NodeRef, new: NodeRef) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.arena[parent].set_child(side, new);
            },
        }
        self.set_parent(new, parent);
    }

    fn side_of(&self, node: NodeRef, parent: NodeRef) -> Side {
        if self.child(parent, Side::Left) == node {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn child(&self, node: NodeRef, side: Side) -> NodeRef {
        self.arena[node]
            .child(side)
            .expect("Error: expected a data node, found a sentinel.")
    }

    fn key(&self, node: NodeRef) -> u64 {
        self.arena[node]
            .key()
            .expect("Error: expected a data node, found a sentinel.")
    }

    fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.arena[node].parent()
    }

    fn color(&self, node: NodeRef) -> Color {
        self.arena[node].color()
    }

    fn is_sentinel(&self, node: NodeRef) -> bool {
        self.arena[node].is_sentinel()
    }

    fn set_parent(&mut self, node: NodeRef, parent: Option<NodeRef>) {
        self.arena[node].set_parent(parent);
    }

    fn set_color(&mut self, node: NodeRef, color: Color) {
        self.arena[node].set_color(color);
    }
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeRef> for RedBlackTree {
    type Output = Node;

    fn index(&self, node: NodeRef) -> &Self::Output {
        self.arena.get(&node).expect("Error: stale node handle.")
    }
}
