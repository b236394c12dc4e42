use crate::index::{IndexType, NodeIndex};

/// Node of the red-black tree
///
/// The header shares this layout: it has no key, its `left`/`right` cache the
/// minimum/maximum node and its `parent` is the root.
#[derive(Debug, Clone)]
pub struct Node<K, V, Ix> {
    /// Left child
    pub left: Option<NodeIndex<Ix>>,
    /// Right child
    pub right: Option<NodeIndex<Ix>>,
    /// Parent, the header for the root
    pub parent: Option<NodeIndex<Ix>>,
    /// Color of the node
    pub color: Color,

    /// Key of the node, `None` for the header and vacant slots
    pub key: Option<K>,
    /// Value of the node
    pub value: Option<V>,
    /// Number of nodes in the subtree rooted here, kept only when indexing is enabled
    pub size: usize,
    /// Bumped each time the slot is vacated, so handles to an erased element
    /// never match whatever the slot holds next
    pub generation: u32,
}

impl<K, V, Ix> Node<K, V, Ix>
where
    Ix: IndexType,
{
    /// A keyless node anchoring the end position of an empty tree.
    pub fn new_header() -> Self {
        Node {
            left: Some(NodeIndex::header()),
            right: Some(NodeIndex::header()),
            parent: None,
            color: Color::Black,
            key: None,
            value: None,
            size: 0,
            generation: 0,
        }
    }

    /// A red leaf under `parent`.
    pub fn new_leaf(key: K, value: V, parent: NodeIndex<Ix>) -> Self {
        Node {
            left: None,
            right: None,
            parent: Some(parent),
            color: Color::Red,
            key: Some(key),
            value: Some(value),
            size: 1,
            generation: 0,
        }
    }
}

// Convenient getter/setter methods
impl<K, V, Ix> Node<K, V, Ix>
where
    Ix: IndexType,
{
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn key(&self) -> &K {
        self.key.as_ref().expect("keyless node has no key")
    }

    pub fn left(&self) -> Option<NodeIndex<Ix>> {
        self.left
    }

    pub fn right(&self) -> Option<NodeIndex<Ix>> {
        self.right
    }

    pub fn parent(&self) -> NodeIndex<Ix> {
        self.parent.expect("node is detached from the tree")
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Header and vacant slots carry no key.
    pub fn is_vacant(&self) -> bool {
        self.key.is_none()
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub fn value(&self) -> &V {
        self.value.as_ref().expect("keyless node has no value")
    }

    pub fn value_mut(&mut self) -> &mut V {
        self.value.as_mut().expect("keyless node has no value")
    }

    pub fn entry(&self) -> (&K, &V) {
        (self.key(), self.value())
    }

    pub fn links(&self) -> Links<Ix> {
        Links {
            parent: self.parent,
            left: self.left,
            right: self.right,
            color: self.color,
            size: self.size,
        }
    }

    pub fn set_links(&mut self, links: Links<Ix>) {
        self.parent = links.parent;
        self.left = links.left;
        self.right = links.right;
        self.color = links.color;
        self.size = links.size;
    }

    /// Empty the slot, returning its content.
    pub fn take(&mut self) -> (K, V) {
        self.left = None;
        self.right = None;
        self.parent = None;
        self.size = 0;
        self.generation = self.generation.wrapping_add(1);
        let key = self.key.take().expect("keyless node has no key");
        let value = self.value.take().expect("keyless node has no value");
        (key, value)
    }

    pub fn set_value(value: V) -> impl FnOnce(&mut Node<K, V, Ix>) -> V {
        move |node: &mut Node<K, V, Ix>| {
            node.value
                .replace(value)
                .expect("keyless node has no value")
        }
    }

    pub fn set_key(key: K) -> impl FnOnce(&mut Node<K, V, Ix>) -> K {
        move |node: &mut Node<K, V, Ix>| node.key.replace(key).expect("keyless node has no key")
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.color = color;
        }
    }

    pub fn set_size(size: usize) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.size = size;
        }
    }

    pub fn set_left(left: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.left = left;
        }
    }

    pub fn set_right(right: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.right = right;
        }
    }

    pub fn set_parent(parent: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            let _ignore = node.parent.replace(parent);
        }
    }
}

/// Everything about a node's place in the tree, without its payload.
#[derive(Debug, Clone, Copy)]
pub struct Links<Ix> {
    pub parent: Option<NodeIndex<Ix>>,
    pub left: Option<NodeIndex<Ix>>,
    pub right: Option<NodeIndex<Ix>>,
    pub color: Color,
    pub size: usize,
}

/// The color of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}
