use crate::arena::Entry;

/// A handle naming a node stored in a `RedBlackTree`.
pub type NodeRef = Entry;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Which child slot of a node is meant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug)]
enum Kind {
    Sentinel,
    Data {
        key: u64,
        color: Color,
        left: NodeRef,
        right: NodeRef,
    },
}

/// A node of a red black tree: either a data node holding a key, or a sentinel leaf standing in
/// for a missing child.
///
/// Sentinels have no color storage and always report `Color::Black`. Every data node has two
/// children, each of which is a data node or a sentinel.
#[derive(Debug)]
pub struct Node {
    parent: Option<NodeRef>,
    kind: Kind,
}

impl Node {
    pub(crate) fn new(key: u64, left: NodeRef, right: NodeRef) -> Self {
        Node {
            parent: None,
            kind: Kind::Data {
                key,
                color: Color::Red,
                left,
                right,
            },
        }
    }

    pub(crate) fn sentinel(parent: Option<NodeRef>) -> Self {
        Node {
            parent,
            kind: Kind::Sentinel,
        }
    }

    /// Returns the key of a data node, or `None` for a sentinel.
    pub fn key(&self) -> Option<u64> {
        match self.kind {
            Kind::Data { key, .. } => Some(key),
            Kind::Sentinel => None,
        }
    }

    pub fn color(&self) -> Color {
        match self.kind {
            Kind::Data { color, .. } => color,
            Kind::Sentinel => Color::Black,
        }
    }

    /// Returns the parent of the node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    /// Returns the left child of a data node, or `None` for a sentinel.
    pub fn left(&self) -> Option<NodeRef> {
        self.child(Side::Left)
    }

    /// Returns the right child of a data node, or `None` for a sentinel.
    pub fn right(&self) -> Option<NodeRef> {
        self.child(Side::Right)
    }

    pub fn is_sentinel(&self) -> bool {
        match self.kind {
            Kind::Sentinel => true,
            Kind::Data { .. } => false,
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<NodeRef> {
        match self.kind {
            Kind::Data { left, .. } if side == Side::Left => Some(left),
            Kind::Data { right, .. } => Some(right),
            Kind::Sentinel => None,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: NodeRef) {
        match self.kind {
            Kind::Data { ref mut left, .. } if side == Side::Left => *left = child,
            Kind::Data { ref mut right, .. } => *right = child,
            Kind::Sentinel => panic!("Error: attempting to attach a child to a sentinel."),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeRef>) {
        self.parent = parent;
    }

    // Sentinels are black by construction, so only painting one red is an error.
    pub(crate) fn set_color(&mut self, new_color: Color) {
        match self.kind {
            Kind::Data { ref mut color, .. } => *color = new_color,
            Kind::Sentinel if new_color == Color::Black => {},
            Kind::Sentinel => panic!("Error: attempting to color a sentinel red."),
        }
    }

    pub(crate) fn set_key(&mut self, new_key: u64) {
        match self.kind {
            Kind::Data { ref mut key, .. } => *key = new_key,
            Kind::Sentinel => panic!("Error: attempting to assign a key to a sentinel."),
        }
    }
}
