use super::dictionary::{Key, Value};
use std::cmp::{max, Ordering};

type Link = Option<Box<Node>>;

#[derive(Clone, Debug)]
struct Node {
    key: Key,
    value: Value,
    left: Link,
    right: Link,
    /// Height of the subtree rooted here. A leaf has height 1.
    height: i32,
}

impl Node {
    fn new(key: Key, value: Value) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// `height(left) - height(right)`. Stays within [-1, 1] outside of a rebalance.
    fn balance(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }

    fn update_height(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
    }
}

fn height(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.balance())
}

/// Self-balancing binary search tree keyed by integer, used as the bucket type of
/// [`AvlChainingTable`](crate::AvlChainingTable).
#[derive(Clone, Debug, Default)]
pub struct AvlTree {
    root: Link,
    size: usize,
}

impl AvlTree {
    pub fn new() -> Self {
        Self { root: None, size: 0 }
    }

    /// Inserts `value` under `key`, overwriting an existing value. Returns `true` if a new node was created.
    pub fn insert(&mut self, key: Key, value: Value) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), key, value, &mut inserted));
        if inserted {
            self.size += 1;
        }
        inserted
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn remove(&mut self, key: Key) -> bool {
        let mut removed = false;
        self.root = delete_node(self.root.take(), key, &mut removed);
        if removed {
            self.size -= 1;
        }
        removed
    }

    pub fn get(&self, key: Key) -> Option<Value> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node.value),
            };
        }
        None
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Height of the tree. An empty tree has height 0.
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    /// Frees every node, children before parents.
    pub fn clear(&mut self) {
        clear_tree(self.root.take());
        self.size = 0;
    }

    /// In-order iterator over `(key, value)` pairs, so keys come out ascending.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Every pair in ascending key order.
    pub fn pairs(&self) -> Vec<(Key, Value)> {
        let mut pairs = Vec::with_capacity(self.size);
        collect_pairs(self.root.as_deref(), &mut pairs);
        pairs
    }
}

/// Descends to `key`'s position and rebalances on the way back up. The rotation case is picked by comparing
/// `key` with the heavy child's key.
fn insert_node(link: Link, key: Key, value: Value, inserted: &mut bool) -> Box<Node> {
    let mut node = match link {
        Some(node) => node,
        None => {
            *inserted = true;
            return Node::new(key, value);
        }
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), key, value, inserted)),
        Ordering::Greater => node.right = Some(insert_node(node.right.take(), key, value, inserted)),
        Ordering::Equal => {
            node.value = value;
            return node;
        }
    }

    node.update_height();
    let factor = node.balance();

    if factor > 1 {
        let left_key = node.left.as_ref().map_or(key, |left| left.key);
        // Left-Right
        if key > left_key {
            node.left = node.left.take().map(rotate_left);
        }
        // Left-Left, or the second half of Left-Right
        if key != left_key {
            return rotate_right(node);
        }
    }

    if factor < -1 {
        let right_key = node.right.as_ref().map_or(key, |right| right.key);
        // Right-Left
        if key < right_key {
            node.right = node.right.take().map(rotate_right);
        }
        // Right-Right, or the second half of Right-Left
        if key != right_key {
            return rotate_left(node);
        }
    }

    node
}

/// Standard BST delete followed by rebalancing. Unlike insertion, the rotation case is picked from the heavy
/// child's own balance factor.
fn delete_node(link: Link, key: Key, removed: &mut bool) -> Link {
    let mut node = link?;

    match key.cmp(&node.key) {
        Ordering::Less => node.left = delete_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = delete_node(node.right.take(), key, removed),
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => {
                *removed = true;
                return None;
            }
            (Some(child), None) | (None, Some(child)) => {
                *removed = true;
                return Some(child);
            }
            (Some(left), Some(right)) => {
                // Two children: pull up the in-order successor, then delete it from the right subtree.
                let (successor_key, successor_value) = min_entry(&right);
                node.key = successor_key;
                node.value = successor_value;
                node.left = Some(left);
                node.right = delete_node(Some(right), successor_key, removed);
            }
        },
    }

    node.update_height();
    let factor = node.balance();

    if factor > 1 {
        // Left-Right when the left child leans right, Left-Left otherwise.
        if balance(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return Some(rotate_right(node));
    }

    if factor < -1 {
        // Right-Left when the right child leans left, Right-Right otherwise.
        if balance(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return Some(rotate_left(node));
    }

    Some(node)
}

fn min_entry(node: &Node) -> (Key, Value) {
    let mut cur = node;
    while let Some(left) = cur.left.as_deref() {
        cur = left;
    }
    (cur.key, cur.value)
}

/// ```text
///       y            x
///      / \          / \
///     x   c   =>   a   y
///    / \              / \
///   a   b            b   c
/// ```
fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let mut x = match y.left.take() {
        Some(x) => x,
        None => return y,
    };

    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Mirror image of [`rotate_right`].
fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let mut y = match x.right.take() {
        Some(y) => y,
        None => return x,
    };

    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

fn clear_tree(link: Link) {
    if let Some(mut node) = link {
        clear_tree(node.left.take());
        clear_tree(node.right.take());
    }
}

fn collect_pairs(link: Option<&Node>, pairs: &mut Vec<(Key, Value)>) {
    if let Some(node) = link {
        collect_pairs(node.left.as_deref(), pairs);
        pairs.push((node.key, node.value));
        collect_pairs(node.right.as_deref(), pairs);
    }
}

/// In-order iterator returned by [`AvlTree::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.key, node.value))
    }
}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = (Key, Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
