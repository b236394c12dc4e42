use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::compare::Comparator;
use crate::config::TreeConfig;
use crate::cursor::{Cursor, Direction};
use crate::error::{Result, TreeError};
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::node::{Color, Links, Node};

/// Which child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Result of locating a key: the node holding it, or the free child slot
/// where it would be attached.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Slot<Ix> {
    Occupied(NodeIndex<Ix>),
    Vacant(NodeIndex<Ix>, Side),
}

/// The red-black tree engine shared by `OrderedMap` and `OrderedSet`.
///
/// Nodes live in an arena. Slot 0 is the header: a keyless node whose
/// `left`/`right` cache the minimum/maximum node and whose `parent` is the
/// root. Erased slots are recycled through a free list, so a node never moves
/// while it is alive.
#[derive(Clone)]
pub(crate) struct RbTree<K, V, C, Ix = DefaultIx> {
    /// Vector that stores nodes, the header first
    pub(crate) nodes: Vec<Node<K, V, Ix>>,
    /// Vacant slots ready for reuse
    free: Vec<NodeIndex<Ix>>,
    /// Number of elements in the tree
    pub(crate) len: usize,
    /// Total order over keys
    pub(crate) comparator: C,
    /// Whether subtree sizes are maintained
    enable_index: bool,
}

impl<K, V, C, Ix> RbTree<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(comparator: C, config: TreeConfig) -> Self {
        let mut nodes = Vec::with_capacity(config.capacity.saturating_add(1));
        nodes.push(Node::new_header());
        RbTree {
            nodes,
            free: Vec::new(),
            len: 0,
            comparator,
            enable_index: config.enable_index,
        }
    }

    pub(crate) fn is_indexed(&self) -> bool {
        self.enable_index
    }

    /// Drop every element; the header is reset and every other slot is
    /// vacated for reuse.
    pub(crate) fn clear(&mut self) {
        tracing::debug!(len = self.len, "clearing tree");
        self.nodes[0] = Node::new_header();
        self.free.clear();
        // lowest slots are handed out first
        for i in (1..self.nodes.len()).rev() {
            if !self.nodes[i].is_vacant() {
                let _ignore = self.nodes[i].take();
            }
            self.free.push(NodeIndex::new(i));
        }
        self.len = 0;
    }

    pub(crate) fn root(&self) -> Option<NodeIndex<Ix>> {
        self.nodes[0].parent
    }

    /// The minimum node, or the header when empty.
    pub(crate) fn first(&self) -> NodeIndex<Ix> {
        self.nodes[0].left.unwrap_or_else(NodeIndex::header)
    }

    /// The maximum node, or the header when empty.
    pub(crate) fn last(&self) -> NodeIndex<Ix> {
        self.nodes[0].right.unwrap_or_else(NodeIndex::header)
    }

    /// Whether `x` addresses a node currently holding an element.
    pub(crate) fn is_live(&self, x: NodeIndex<Ix>) -> bool {
        !x.is_header() && self.nodes.get(x.index()).is_some_and(|n| !n.is_vacant())
    }

    /// A cursor at `x`, stamped with the slot's current generation.
    pub(crate) fn cursor(&self, x: NodeIndex<Ix>, direction: Direction) -> Cursor<Ix> {
        Cursor::new(x, self.node_ref(x, Node::generation), direction)
    }

    /// Whether `cursor` names a live element that has not been erased since
    /// the cursor was made.
    fn is_current(&self, cursor: Cursor<Ix>) -> bool {
        self.is_live(cursor.node) && self.node_ref(cursor.node, Node::generation) == cursor.generation
    }

    /// In-order successor; the header for the maximum, the minimum for the header.
    pub(crate) fn successor(&self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        if x.is_header() {
            return self.first();
        }
        if let Some(r) = self.node_ref(x, Node::right) {
            return self.leftmost(r);
        }
        let mut x = x;
        loop {
            let p = self.node_ref(x, Node::parent);
            if p.is_header() || self.node_ref(p, Node::left) == Some(x) {
                return p;
            }
            x = p;
        }
    }

    /// In-order predecessor; the header for the minimum, the maximum for the header.
    pub(crate) fn predecessor(&self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        if x.is_header() {
            return self.last();
        }
        if let Some(l) = self.node_ref(x, Node::left) {
            return self.rightmost(l);
        }
        let mut x = x;
        loop {
            let p = self.node_ref(x, Node::parent);
            if p.is_header() || self.node_ref(p, Node::right) == Some(x) {
                return p;
            }
            x = p;
        }
    }

    fn leftmost(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while let Some(l) = self.node_ref(x, Node::left) {
            x = l;
        }
        x
    }

    fn rightmost(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while let Some(r) = self.node_ref(x, Node::right) {
            x = r;
        }
        x
    }

    /// Node at in-order position `pos`.
    ///
    /// Descends by subtree sizes when indexing is enabled, otherwise walks
    /// successors from the minimum.
    pub(crate) fn node_at(&self, pos: usize) -> Result<NodeIndex<Ix>> {
        if pos >= self.len {
            return Err(TreeError::InvalidPosition { pos, len: self.len });
        }
        if !self.enable_index {
            let mut x = self.first();
            for _ in 0..pos {
                x = self.successor(x);
            }
            return Ok(x);
        }
        let mut x = self.root().expect("non-empty tree has a root");
        let mut pos = pos;
        loop {
            let left_size = self.subtree_size(self.node_ref(x, Node::left));
            match pos.cmp(&left_size) {
                Ordering::Less => {
                    x = self
                        .node_ref(x, Node::left)
                        .expect("subtree sizes are consistent");
                }
                Ordering::Equal => return Ok(x),
                Ordering::Greater => {
                    pos -= left_size + 1;
                    x = self
                        .node_ref(x, Node::right)
                        .expect("subtree sizes are consistent");
                }
            }
        }
    }

    /// In-order position of `x`; the length for the header.
    pub(crate) fn rank(&self, x: NodeIndex<Ix>) -> usize {
        if x.is_header() {
            return self.len;
        }
        if !self.enable_index {
            let mut rank = 0;
            let mut y = self.predecessor(x);
            while !y.is_header() {
                rank += 1;
                y = self.predecessor(y);
            }
            return rank;
        }
        let mut rank = self.subtree_size(self.node_ref(x, Node::left));
        let mut x = x;
        loop {
            let p = self.node_ref(x, Node::parent);
            if p.is_header() {
                return rank;
            }
            if self.node_ref(p, Node::right) == Some(x) {
                rank += self.subtree_size(self.node_ref(p, Node::left)) + 1;
            }
            x = p;
        }
    }

    /// Number of levels, computed level by level.
    pub(crate) fn height(&self) -> usize {
        let Some(root) = self.root() else {
            return 0;
        };
        let mut height = 0;
        let mut queue = VecDeque::new();
        queue.push_back((root, 1));
        while let Some((x, depth)) = queue.pop_front() {
            height = height.max(depth);
            if let Some(l) = self.node_ref(x, Node::left) {
                queue.push_back((l, depth + 1));
            }
            if let Some(r) = self.node_ref(x, Node::right) {
                queue.push_back((r, depth + 1));
            }
        }
        height
    }

    /// Validate that a cursor names the end position or a live node.
    fn check_position(&self, cursor: Cursor<Ix>) -> Result<NodeIndex<Ix>> {
        if cursor.node.is_header() || self.is_current(cursor) {
            Ok(cursor.node)
        } else {
            Err(TreeError::IteratorAccess)
        }
    }

    /// Validate that a cursor can be dereferenced.
    pub(crate) fn check_accessible(&self, cursor: Cursor<Ix>) -> Result<NodeIndex<Ix>> {
        if self.is_current(cursor) {
            Ok(cursor.node)
        } else {
            Err(TreeError::IteratorAccess)
        }
    }

    pub(crate) fn next_cursor(&self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        let x = self.check_position(cursor)?;
        if x.is_header() {
            return Err(TreeError::IteratorAccess);
        }
        let next = match cursor.direction {
            Direction::Forward => self.successor(x),
            Direction::Reverse => self.predecessor(x),
        };
        Ok(self.cursor(next, cursor.direction))
    }

    pub(crate) fn prev_cursor(&self, cursor: Cursor<Ix>) -> Result<Cursor<Ix>> {
        let x = self.check_position(cursor)?;
        let prev = match cursor.direction {
            Direction::Forward => self.predecessor(x),
            Direction::Reverse => self.successor(x),
        };
        if prev.is_header() {
            return Err(TreeError::IteratorAccess);
        }
        Ok(self.cursor(prev, cursor.direction))
    }

    pub(crate) fn rank_of(&self, cursor: Cursor<Ix>) -> Result<usize> {
        self.check_position(cursor).map(|x| self.rank(x))
    }

    /// Erase the element under `cursor`, returning it together with a cursor
    /// at the element that followed it in the cursor's direction.
    pub(crate) fn remove_cursor(&mut self, cursor: Cursor<Ix>) -> Result<(Cursor<Ix>, (K, V))> {
        let x = self.check_accessible(cursor)?;
        let follow = match cursor.direction {
            Direction::Forward => self.successor(x),
            Direction::Reverse => self.predecessor(x),
        };
        let entry = self.erase(x);
        Ok((self.cursor(follow, cursor.direction), entry))
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> Result<(K, V)> {
        let x = self.node_at(pos)?;
        tracing::trace!(pos, len = self.len, "removing by position");
        Ok(self.erase(x))
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let x = self.first();
        (!x.is_header()).then(|| self.erase(x))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let x = self.last();
        (!x.is_header()).then(|| self.erase(x))
    }

    /// Keep only the elements for which `keep` returns `true`, in key order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut x = self.first();
        while !x.is_header() {
            let Node { key, value, .. } = &mut self.nodes[x.index()];
            let retained = keep(
                key.as_ref().expect("live node has a key"),
                value.as_mut().expect("live node has a value"),
            );
            let next = self.successor(x);
            if !retained {
                let _ignore = self.erase(x);
            }
            x = next;
        }
    }
}

impl<K, V, C, Ix> RbTree<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.comparator.compare(a, b)
    }

    /// Descend from the root to the node holding `key` or to the would-be
    /// insertion point.
    pub(crate) fn search(&self, key: &K) -> Slot<Ix> {
        let Some(mut x) = self.root() else {
            return Slot::Vacant(NodeIndex::header(), Side::Left);
        };
        loop {
            let side = match self.compare(key, self.node_ref(x, Node::key)) {
                Ordering::Equal => return Slot::Occupied(x),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match self.child(x, side) {
                Some(c) => x = c,
                None => return Slot::Vacant(x, side),
            }
        }
    }

    /// Locate `key` for insertion: checks the cached extremes first, then the
    /// hint, then falls back to a full descent.
    pub(crate) fn locate(&self, key: &K, hint: Option<NodeIndex<Ix>>) -> Slot<Ix> {
        if self.root().is_none() {
            return Slot::Vacant(NodeIndex::header(), Side::Left);
        }
        let first = self.first();
        match self.compare(key, self.node_ref(first, Node::key)) {
            Ordering::Equal => return Slot::Occupied(first),
            Ordering::Less => return Slot::Vacant(first, Side::Left),
            Ordering::Greater => {}
        }
        let last = self.last();
        match self.compare(key, self.node_ref(last, Node::key)) {
            Ordering::Equal => return Slot::Occupied(last),
            Ordering::Greater => return Slot::Vacant(last, Side::Right),
            Ordering::Less => {}
        }
        if let Some(hint) = hint {
            if let Some(slot) = self.locate_near(key, hint) {
                return slot;
            }
            tracing::trace!(?hint, "insertion hint does not bracket the key");
        }
        self.search(key)
    }

    /// Use `hint`, the element expected right after `key`, to find the slot
    /// without descending from the root.
    fn locate_near(&self, key: &K, hint: NodeIndex<Ix>) -> Option<Slot<Ix>> {
        if !self.is_live(hint) {
            return None;
        }
        match self.compare(key, self.node_ref(hint, Node::key)) {
            Ordering::Equal => return Some(Slot::Occupied(hint)),
            Ordering::Greater => return None,
            Ordering::Less => {}
        }
        let pre = self.predecessor(hint);
        if pre.is_header() {
            return None;
        }
        match self.compare(key, self.node_ref(pre, Node::key)) {
            Ordering::Equal => Some(Slot::Occupied(pre)),
            Ordering::Less => None,
            // `hint` is the leftmost node of `pre`'s right subtree when that subtree exists
            Ordering::Greater => match self.node_ref(pre, Node::right) {
                None => Some(Slot::Vacant(pre, Side::Right)),
                Some(_) => Some(Slot::Vacant(hint, Side::Left)),
            },
        }
    }

    pub(crate) fn find(&self, key: &K) -> Option<NodeIndex<Ix>> {
        match self.search(key) {
            Slot::Occupied(x) => Some(x),
            Slot::Vacant(..) => None,
        }
    }

    /// Insert or overwrite. Returns the previous value if the key existed.
    pub(crate) fn insert(&mut self, key: K, value: V, hint: Option<NodeIndex<Ix>>) -> Option<V> {
        match self.locate(&key, hint) {
            Slot::Occupied(x) => Some(self.node_mut(x, Node::set_value(value))),
            Slot::Vacant(parent, side) => {
                let _ignore = self.attach(parent, side, key, value);
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let x = self.find(key)?;
        Some(self.erase(x))
    }

    /// First node whose key is not less than `key`.
    pub(crate) fn lower_bound(&self, key: &K) -> NodeIndex<Ix> {
        let mut x = self.root();
        let mut res = NodeIndex::header();
        while let Some(n) = x {
            match self.compare(self.node_ref(n, Node::key), key) {
                Ordering::Less => x = self.node_ref(n, Node::right),
                Ordering::Greater => {
                    res = n;
                    x = self.node_ref(n, Node::left);
                }
                Ordering::Equal => return n,
            }
        }
        res
    }

    /// First node whose key is greater than `key`.
    pub(crate) fn upper_bound(&self, key: &K) -> NodeIndex<Ix> {
        let mut x = self.root();
        let mut res = NodeIndex::header();
        while let Some(n) = x {
            if self.compare(self.node_ref(n, Node::key), key) == Ordering::Greater {
                res = n;
                x = self.node_ref(n, Node::left);
            } else {
                x = self.node_ref(n, Node::right);
            }
        }
        res
    }

    /// Last node whose key is not greater than `key`.
    pub(crate) fn reverse_lower_bound(&self, key: &K) -> NodeIndex<Ix> {
        let mut x = self.root();
        let mut res = NodeIndex::header();
        while let Some(n) = x {
            match self.compare(self.node_ref(n, Node::key), key) {
                Ordering::Less => {
                    res = n;
                    x = self.node_ref(n, Node::right);
                }
                Ordering::Greater => x = self.node_ref(n, Node::left),
                Ordering::Equal => return n,
            }
        }
        res
    }

    /// Last node whose key is less than `key`.
    pub(crate) fn reverse_upper_bound(&self, key: &K) -> NodeIndex<Ix> {
        let mut x = self.root();
        let mut res = NodeIndex::header();
        while let Some(n) = x {
            if self.compare(self.node_ref(n, Node::key), key) == Ordering::Less {
                res = n;
                x = self.node_ref(n, Node::right);
            } else {
                x = self.node_ref(n, Node::left);
            }
        }
        res
    }

    /// Replace the key under `cursor` if it still sorts strictly between the
    /// neighbouring keys. Returns whether the key was replaced.
    pub(crate) fn update_key(&mut self, cursor: Cursor<Ix>, key: K) -> Result<bool> {
        let x = self.check_accessible(cursor)?;
        let prev = self.predecessor(x);
        let next = self.successor(x);
        let after_prev =
            prev.is_header() || self.compare(self.node_ref(prev, Node::key), &key) == Ordering::Less;
        let before_next = next.is_header()
            || self.compare(self.node_ref(next, Node::key), &key) == Ordering::Greater;
        if after_prev && before_next {
            let _ignore = self.node_mut(x, Node::set_key(key));
            Ok(true)
        } else {
            tracing::trace!(node = ?x, "key update rejected, it would break the ordering");
            Ok(false)
        }
    }
}

impl<K, V, C, Ix> RbTree<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Put `node` into a vacant slot, reusing erased ones first.
    fn alloc(&mut self, node: Node<K, V, Ix>) -> NodeIndex<Ix> {
        if let Some(idx) = self.free.pop() {
            let generation = self.nodes[idx.index()].generation;
            self.nodes[idx.index()] = Node { generation, ..node };
            return idx;
        }
        let idx = NodeIndex::new(self.nodes.len());
        // check for max capacity, except if we use usize
        assert!(
            <Ix as IndexType>::max().index() == !0 || NodeIndex::end() != idx,
            "Reached maximum number of nodes"
        );
        self.nodes.push(node);
        idx
    }

    /// Attach a new red leaf as the `side` child of `parent` and rebalance.
    ///
    /// A header `parent` means the tree is empty and the leaf becomes the root.
    pub(crate) fn attach(&mut self, parent: NodeIndex<Ix>, side: Side, key: K, value: V) -> NodeIndex<Ix> {
        let z = self.alloc(Node::new_leaf(key, value, parent));
        let header = NodeIndex::header();
        if parent.is_header() {
            self.node_mut(z, Node::set_color(Color::Black));
            self.node_mut(header, |h| {
                h.parent = Some(z);
                h.left = Some(z);
                h.right = Some(z);
            });
            self.len = 1;
            return z;
        }
        self.set_child(parent, side, Some(z));
        match side {
            Side::Left if self.first() == parent => self.node_mut(header, Node::set_left(Some(z))),
            Side::Right if self.last() == parent => self.node_mut(header, Node::set_right(Some(z))),
            _ => {}
        }
        if self.enable_index {
            let mut p = parent;
            while !p.is_header() {
                self.node_mut(p, |n| n.size += 1);
                p = self.node_ref(p, Node::parent);
            }
        }
        self.len += 1;
        self.insert_fixup(z);
        z
    }

    /// Erase the element stored at `z`.
    ///
    /// `z` first trades places with its in-order neighbour until it sits in a
    /// leaf, so the node physically unlinked is always a leaf. Only links and
    /// colors move, every other element keeps its slot.
    pub(crate) fn erase(&mut self, z: NodeIndex<Ix>) -> (K, V) {
        loop {
            let next = match (self.node_ref(z, Node::left), self.node_ref(z, Node::right)) {
                (_, Some(r)) => self.leftmost(r),
                (Some(l), None) => self.rightmost(l),
                (None, None) => break,
            };
            self.swap_positions(z, next);
        }

        // z is a leaf, so its in-order neighbour on the cached side is its parent
        let header = NodeIndex::header();
        let parent = self.node_ref(z, Node::parent);
        if self.first() == z {
            self.node_mut(header, Node::set_left(Some(parent)));
        }
        if self.last() == z {
            self.node_mut(header, Node::set_right(Some(parent)));
        }

        if self.node_ref(z, Node::is_black) {
            self.erase_fixup(z);
        }

        let parent = self.node_ref(z, Node::parent);
        if parent.is_header() {
            self.node_mut(header, |h| h.parent = None);
        } else {
            let side = self.side_of(z);
            self.set_child(parent, side, None);
        }
        if self.enable_index {
            let mut p = parent;
            while !p.is_header() {
                self.node_mut(p, |n| n.size -= 1);
                p = self.node_ref(p, Node::parent);
            }
        }
        self.len -= 1;
        if let Some(root) = self.root() {
            self.node_mut(root, Node::set_color(Color::Black));
        }

        let entry = self.node_mut(z, Node::take);
        self.free.push(z);
        entry
    }

    /// Exchange the places of `a` and its descendant `b` in the tree,
    /// colors and subtree sizes included. Keys and values stay in their slots.
    fn swap_positions(&mut self, a: NodeIndex<Ix>, b: NodeIndex<Ix>) {
        let swap = |x: Option<NodeIndex<Ix>>| {
            x.map(|x| match x {
                x if x == a => b,
                x if x == b => a,
                x => x,
            })
        };
        let pa = self.node_ref(a, Node::parent);
        let side_a = (!pa.is_header()).then(|| self.side_of(a));
        let side_b = self.side_of(b);
        let (ra, rb) = (self.nodes[a.index()].links(), self.nodes[b.index()].links());

        self.nodes[a.index()].set_links(Links {
            parent: swap(rb.parent),
            left: swap(rb.left),
            right: swap(rb.right),
            ..rb
        });
        self.nodes[b.index()].set_links(Links {
            parent: swap(ra.parent),
            left: swap(ra.left),
            right: swap(ra.right),
            ..ra
        });

        match side_a {
            Some(side) => self.set_child(pa, side, Some(b)),
            None => self.node_mut(pa, |h| h.parent = Some(b)),
        }
        let pb = self.node_ref(a, Node::parent);
        self.set_child(pb, side_b, Some(a));
        for x in [a, b] {
            for c in [self.node_ref(x, Node::left), self.node_ref(x, Node::right)]
                .into_iter()
                .flatten()
            {
                self.node_mut(c, Node::set_parent(x));
            }
        }

        let header = NodeIndex::header();
        let (first, last) = (swap(Some(self.first())), swap(Some(self.last())));
        self.node_mut(header, |h| {
            h.left = first;
            h.right = last;
        });
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        loop {
            let p = self.node_ref(z, Node::parent);
            if p.is_header() || self.node_ref(p, Node::is_black) {
                break;
            }
            // a red parent is never the root, so the grandparent is a real node
            let g = self.node_ref(p, Node::parent);
            let side = self.side_of(p);
            let uncle = self.child(g, side.opposite());
            if let Some(u) = uncle.filter(|&u| self.node_ref(u, Node::is_red)) {
                self.node_mut(p, Node::set_color(Color::Black));
                self.node_mut(u, Node::set_color(Color::Black));
                self.node_mut(g, Node::set_color(Color::Red));
                z = g;
                continue;
            }
            if self.side_of(z) != side {
                let _ignore = self.rotate(p, side);
                z = p;
            }
            let p = self.node_ref(z, Node::parent);
            self.node_mut(p, Node::set_color(Color::Black));
            self.node_mut(g, Node::set_color(Color::Red));
            let _ignore = self.rotate(g, side.opposite());
            break;
        }
        if let Some(root) = self.root() {
            self.node_mut(root, Node::set_color(Color::Black));
        }
    }

    /// Restore red-black tree properties before unlinking the black leaf `x`.
    fn erase_fixup(&mut self, mut x: NodeIndex<Ix>) {
        loop {
            let p = self.node_ref(x, Node::parent);
            if p.is_header() || self.node_ref(x, Node::is_red) {
                break;
            }
            let side = self.side_of(x);
            let mut w = self
                .child(p, side.opposite())
                .expect("black node must have a sibling");
            if self.node_ref(w, Node::is_red) {
                self.node_mut(w, Node::set_color(Color::Black));
                self.node_mut(p, Node::set_color(Color::Red));
                let _ignore = self.rotate(p, side);
                w = self
                    .child(p, side.opposite())
                    .expect("black node must have a sibling");
            }
            let near = self.child(w, side);
            let far = self.child(w, side.opposite());
            if let Some(far) = far.filter(|&n| self.node_ref(n, Node::is_red)) {
                self.node_mut(w, Node::set_color(self.node_ref(p, Node::color)));
                self.node_mut(p, Node::set_color(Color::Black));
                self.node_mut(far, Node::set_color(Color::Black));
                let _ignore = self.rotate(p, side);
                break;
            }
            if let Some(near) = near.filter(|&n| self.node_ref(n, Node::is_red)) {
                self.node_mut(near, Node::set_color(Color::Black));
                self.node_mut(w, Node::set_color(Color::Red));
                let _ignore = self.rotate(w, side.opposite());
                continue;
            }
            self.node_mut(w, Node::set_color(Color::Red));
            x = p;
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree rotation moving `x` down towards `side`.
    ///
    /// `Side::Left` is a left rotation: the right child of `x` takes its
    /// place. Returns the new subtree root.
    fn rotate(&mut self, x: NodeIndex<Ix>, side: Side) -> NodeIndex<Ix> {
        let y = self
            .child(x, side.opposite())
            .expect("rotation requires a child on the opposite side");
        let inner = self.child(y, side);
        self.set_child(x, side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner, Node::set_parent(x));
        }
        self.replace_parent(x, y);
        self.set_child(y, side, Some(x));
        if self.enable_index {
            self.recalculate_size(x);
            self.recalculate_size(y);
        }
        y
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        let p = self.node_ref(x, Node::parent);
        self.node_mut(y, Node::set_parent(p));
        if p.is_header() {
            self.node_mut(p, |h| h.parent = Some(y));
        } else {
            let side = self.side_of(x);
            self.set_child(p, side, Some(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Recalculate the subtree size from the left and right children.
    fn recalculate_size(&mut self, x: NodeIndex<Ix>) {
        let left = self.subtree_size(self.node_ref(x, Node::left));
        let right = self.subtree_size(self.node_ref(x, Node::right));
        self.node_mut(x, Node::set_size(1 + left + right));
    }

    fn subtree_size(&self, x: Option<NodeIndex<Ix>>) -> usize {
        x.map_or(0, |x| self.node_ref(x, Node::size))
    }

    /// Which child of its parent `x` is. `x` must not be the root.
    fn side_of(&self, x: NodeIndex<Ix>) -> Side {
        if self.node_ref(self.node_ref(x, Node::parent), Node::left) == Some(x) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn child(&self, x: NodeIndex<Ix>, side: Side) -> Option<NodeIndex<Ix>> {
        match side {
            Side::Left => self.node_ref(x, Node::left),
            Side::Right => self.node_ref(x, Node::right),
        }
    }

    fn set_child(&mut self, x: NodeIndex<Ix>, side: Side, child: Option<NodeIndex<Ix>>) {
        match side {
            Side::Left => self.node_mut(x, Node::set_left(child)),
            Side::Right => self.node_mut(x, Node::set_right(child)),
        }
    }
}

// Convenient methods for reference or mutate a node
impl<'a, K, V, C, Ix> RbTree<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }
}
