use crate::red_black_tree::node::Color;
use crate::red_black_tree::tree::RedBlackTree;
use crate::red_black_tree::Result;
use bincode::serialize;

/// One node of a `TreeSnapshot`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SnapshotNode {
    Data { key: u64, color: Color },
    Sentinel,
}

/// The shape and coloring of a tree, including its sentinels, listed in pre-order.
///
/// Two trees have equal snapshots exactly when they have the same structure, keys and colors.
///
/// # Examples
///
/// ```
/// use sentinel_rbtree::red_black_tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.insert_node(1);
/// tree.insert_node(2);
///
/// let before = tree.snapshot().to_bytes().unwrap();
/// assert!(!tree.delete_node(3));
/// assert_eq!(tree.snapshot().to_bytes().unwrap(), before);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub nodes: Vec<SnapshotNode>,
}

impl TreeSnapshot {
    /// Encodes the snapshot into bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serialize(self)?)
    }
}

impl RedBlackTree {
    /// Captures the current structure of the tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        let mut nodes = Vec::with_capacity(2 * self.len + 1);
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            let current = &self[node];
            match (current.key(), current.left(), current.right()) {
                (Some(key), Some(left), Some(right)) => {
                    nodes.push(SnapshotNode::Data {
                        key,
                        color: current.color(),
                    });
                    stack.push(right);
                    stack.push(left);
                },
                _ => nodes.push(SnapshotNode::Sentinel),
            }
        }
        TreeSnapshot { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapshotNode, TreeSnapshot};
    use crate::red_black_tree::node::Color;
    use crate::red_black_tree::RedBlackTree;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_snapshot_empty() {
        let tree = RedBlackTree::new();
        assert_eq!(tree.snapshot().nodes, vec![SnapshotNode::Sentinel]);
    }

    #[test]
    fn test_snapshot_shape() {
        let mut tree = RedBlackTree::new();
        for key in &[2, 1, 3] {
            tree.insert_node(*key);
        }
        assert_eq!(
            tree.snapshot().nodes,
            vec![
                SnapshotNode::Data {
                    key: 2,
                    color: Color::Black,
                },
                SnapshotNode::Data {
                    key: 1,
                    color: Color::Red,
                },
                SnapshotNode::Sentinel,
                SnapshotNode::Sentinel,
                SnapshotNode::Data {
                    key: 3,
                    color: Color::Red,
                },
                SnapshotNode::Sentinel,
                SnapshotNode::Sentinel,
            ],
        );
    }

    #[test]
    fn test_snapshot_tracks_recoloring() {
        let mut tree = RedBlackTree::new();
        for key in &[2, 1, 3] {
            tree.insert_node(*key);
        }
        let before = tree.snapshot();
        tree.insert_node(4);
        tree.delete_node(4);

        // 1 and 3 were recolored black by the insert and stay black
        assert_ne!(tree.snapshot(), before);
        assert_eq!(tree.snapshot().nodes.len(), before.nodes.len());
    }

    #[test]
    fn test_to_bytes_is_deterministic() {
        let mut first = RedBlackTree::new();
        let mut second = RedBlackTree::new();
        for key in 0..32 {
            first.insert_node(key);
            second.insert_node(key);
        }
        assert_eq!(
            first.snapshot().to_bytes().unwrap(),
            second.snapshot().to_bytes().unwrap(),
        );

        second.delete_node(0);
        assert_ne!(
            first.snapshot().to_bytes().unwrap(),
            second.snapshot().to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_snapshot_tokens() {
        let snapshot = TreeSnapshot {
            nodes: vec![
                SnapshotNode::Data {
                    key: 1,
                    color: Color::Black,
                },
                SnapshotNode::Sentinel,
            ],
        };
        assert_tokens(
            &snapshot,
            &[
                Token::Struct {
                    name: "TreeSnapshot",
                    len: 1,
                },
                Token::Str("nodes"),
                Token::Seq { len: Some(2) },
                Token::StructVariant {
                    name: "SnapshotNode",
                    variant: "Data",
                    len: 2,
                },
                Token::Str("key"),
                Token::U64(1),
                Token::Str("color"),
                Token::UnitVariant {
                    name: "Color",
                    variant: "Black",
                },
                Token::StructVariantEnd,
                Token::UnitVariant {
                    name: "SnapshotNode",
                    variant: "Sentinel",
                },
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );
    }
}
