use crate::red_black_tree::node::{Color, Node, NodeRef};
use crate::red_black_tree::tree::RedBlackTree;
use crate::red_black_tree::{Error, Result};

struct Walk {
    previous: Option<u64>,
    count: usize,
}

impl RedBlackTree {
    /// Verifies every red black tree invariant and the consistency of the node links, returning
    /// the first violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// use sentinel_rbtree::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// for key in 0..100 {
    ///     tree.insert_node(key);
    /// }
    /// assert!(tree.check().is_ok());
    /// ```
    pub fn check(&self) -> Result<()> {
        let root = self.node_at(self.root)?;
        if root.parent().is_some() {
            return Err(Error::BrokenParentLink { key: root.key() });
        }
        if root.color() == Color::Red {
            return Err(Error::RedRoot);
        }

        let mut walk = Walk {
            previous: None,
            count: 0,
        };
        self.check_subtree(self.root, &mut walk)?;

        if walk.count != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: walk.count,
            });
        }
        Ok(())
    }

    // Returns the number of black nodes on every path from `node` down to a sentinel, counting
    // both ends.
    fn check_subtree(&self, node: NodeRef, walk: &mut Walk) -> Result<usize> {
        let current = self.node_at(node)?;
        let (key, left, right) = match (current.key(), current.left(), current.right()) {
            (Some(key), Some(left), Some(right)) => (key, left, right),
            _ => {
                return match current.color() {
                    Color::Black => Ok(1),
                    Color::Red => Err(Error::RedSentinel),
                };
            },
        };

        for child in &[left, right] {
            let child_node = self.node_at(*child)?;
            if child_node.parent() != Some(node) {
                return Err(Error::BrokenParentLink {
                    key: child_node.key(),
                });
            }
            if current.color() == Color::Red && child_node.color() == Color::Red {
                return Err(Error::RedRedViolation { key });
            }
        }

        let left_height = self.check_subtree(left, walk)?;

        if let Some(previous) = walk.previous {
            if previous >= key {
                return Err(Error::OrderViolation { previous, key });
            }
        }
        walk.previous = Some(key);
        walk.count += 1;

        let right_height = self.check_subtree(right, walk)?;

        if left_height != right_height {
            return Err(Error::BlackHeightMismatch {
                key,
                left: left_height,
                right: right_height,
            });
        }
        match current.color() {
            Color::Black => Ok(left_height + 1),
            Color::Red => Ok(left_height),
        }
    }

    fn node_at(&self, node: NodeRef) -> Result<&Node> {
        self.arena.get(&node).ok_or(Error::StaleHandle)
    }
}
