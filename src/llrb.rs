use log::{debug, error};

use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt, mem,
};

use crate::depth::Depth;
use crate::error::Error;

/// Llrb manage a single instance of in-memory ordered map using
/// [left-leaning-red-black][llrb] tree.
///
/// Keys must be totally ordered. Values are returned by clone, use
/// `Llrb<K, Option<T>>` to store an explicit absent marker for a key.
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
#[derive(Clone)]
pub struct Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    pub(crate) name: String,
    pub(crate) root: Option<Box<Node<K, V>>>,
    pub(crate) n_count: usize, // number of entries in the tree.
}

/// Different ways to construct a new Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Create an empty instance of Llrb, identified by `name`.
    pub fn new<S>(name: S) -> Llrb<K, V>
    where
        S: AsRef<str>,
    {
        Llrb {
            name: name.as_ref().to_string(),
            root: Default::default(),
            n_count: Default::default(),
        }
    }

    /// Create a new instance of Llrb tree and load it with entries
    /// from `iter`. If a key repeats, its last value is retained.
    pub fn load_from<S, I>(name: S, iter: I) -> Llrb<K, V>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut llrb = Llrb::new(name);
        for (key, value) in iter {
            llrb.put(key, value);
        }
        debug!("{}: loaded {} entries", llrb.name, llrb.n_count);
        llrb
    }
}

impl<K, V> Default for Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn default() -> Self {
        Llrb::new("")
    }
}

/// Maintenance API.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Identify this instance.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this instance is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return quickly with basic statisics, only [`Stats::entries`] and
    /// [`Stats::node_size`] are valid with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, mem::size_of::<Node<K, V>>())
    }

    /// Validate LLRB tree with following rules:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Red links always lean left.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>>
    where
        K: fmt::Debug,
    {
        let root = self.root.as_deref();
        let mut depths = Depth::new();
        let res = if is_red(root) {
            Err(Error::RedRoot)
        } else {
            validate_tree(root, false, 0, 0, (None, None), &mut depths)
        };

        match res {
            Ok(blacks) => {
                debug!(
                    "{}: validated {} entries, blacks:{} height:{}",
                    self.name,
                    self.n_count,
                    blacks,
                    depths.max()
                );
                Ok(Stats {
                    blacks: Some(blacks),
                    depths: Some(depths),
                    ..self.stats()
                })
            }
            Err(err) => {
                error!("{}: validate failed, {}", self.name, err);
                Err(err)
            }
        }
    }
}

/// Write operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value, tree structure is left
    /// untouched in that case.
    pub fn put(&mut self, key: K, value: V) {
        let (mut root, fresh) = Node::upsert(self.root.take(), key, value);
        root.color = Color::Black;
        self.root = Some(root);
        if fresh {
            self.n_count += 1;
        }
    }
}

/// Read operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref();
        while let Some(nref) = node {
            node = match key.cmp(nref.key.borrow()) {
                Ordering::Less => nref.left_deref(),
                Ordering::Greater => nref.right_deref(),
                Ordering::Equal => return Some(nref.value.clone()),
            };
        }
        None
    }
}

// exclusive (low, high) bounds for keys in a subtree.
type Bounds<'a, K> = (Option<&'a K>, Option<&'a K>);

// Walk the subtree under `node`, returning its black height. Every empty
// child position is sampled into `depths`.
fn validate_tree<K, V>(
    node: Option<&Node<K, V>>,
    fromred: bool,
    mut nb: usize,
    depth: usize,
    (low, high): Bounds<K>,
    depths: &mut Depth,
) -> Result<usize, Error<K>>
where
    K: Clone + Ord,
    V: Clone,
{
    let node = match node {
        Some(node) => node,
        None => {
            depths.sample(depth);
            return Ok(nb);
        }
    };

    let red = node.is_red();
    if red && fromred {
        return Err(Error::ConsecutiveReds);
    } else if is_red(node.right_deref()) {
        return Err(Error::LeaningRight);
    }
    let key = &node.key;
    if let Some(bound) = low.filter(|low| key <= *low) {
        return Err(Error::SortError(key.clone(), bound.clone()));
    }
    if let Some(bound) = high.filter(|high| key >= *high) {
        return Err(Error::SortError(key.clone(), bound.clone()));
    }
    nb += if red { 0 } else { 1 };

    let lbounds = (low, Some(key));
    let rbounds = (Some(key), high);
    let lb = validate_tree(node.left_deref(), red, nb, depth + 1, lbounds, depths)?;
    let rb = validate_tree(node.right_deref(), red, nb, depth + 1, rbounds, depths)?;
    if lb != rb {
        let err = format!("left: {} right: {}", lb, rb);
        return Err(Error::UnbalancedBlacks(err));
    }
    Ok(lb)
}

// absent child links are black.
fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool
where
    K: Clone + Ord,
    V: Clone,
{
    node.map_or(false, Node::is_red)
}

/// Color of the link from parent node into this node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// Node corresponds to a single entry in Llrb instance.
#[derive(Clone)]
pub(crate) struct Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Option<Box<Node<K, V>>>,
    pub(crate) right: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    pub(crate) fn new(key: K, value: V, color: Color) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            color,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub(crate) fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_deref()
    }

    #[inline]
    pub(crate) fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_deref()
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

// Returned by upsert, second item is true when a new node was created.
type Upsert<K, V> = (Box<Node<K, V>>, bool);

/// Insert and rebalance, consuming a subtree root and handing back the
/// new one. The caller stores the returned root into its own link.
impl<K, V> Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn upsert(node: Option<Box<Self>>, key: K, value: V) -> Upsert<K, V> {
        let mut node = match node {
            Some(node) => node,
            None => return (Node::new(key, value, Color::Red), true),
        };

        let fresh = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, fresh) = Node::upsert(node.left.take(), key, value);
                node.left = Some(left);
                fresh
            }
            Ordering::Greater => {
                let (right, fresh) = Node::upsert(node.right.take(), key, value);
                node.right = Some(right);
                fresh
            }
            Ordering::Equal => {
                node.value = value;
                false
            }
        };
        (node.fixup(), fresh)
    }

    // Restore the left-leaning shape on the way back up. Checks run in
    // this order, each one on the result of the previous.
    fn fixup(self: Box<Self>) -> Box<Self> {
        let mut node = self;
        if is_red(node.right_deref()) && !is_red(node.left_deref()) {
            node = node.rotate_left();
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = node.rotate_right();
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            node.flip_colors();
        }
        node
    }

    // h(a, x(b, c)) => x(h(a, b), c), x takes over h's color and h turns red.
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut x = match self.right.take() {
            Some(x) if x.is_red() => x,
            _ => panic!("rotate_left(): rotating a black link ? Call the programmer"),
        };
        self.right = x.left.take();
        x.color = self.color;
        self.color = Color::Red;
        x.left = Some(self);
        x
    }

    // h(x(a, b), c) => x(a, h(b, c)), x takes over h's color and h turns red.
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut x = match self.left.take() {
            Some(x) if x.is_red() => x,
            _ => panic!("rotate_right(): rotating a black link ? Call the programmer"),
        };
        self.left = x.right.take();
        x.color = self.color;
        self.color = Color::Red;
        x.right = Some(self);
        x
    }

    // split a temporary 4-node, pushing the red link one level up.
    fn flip_colors(&mut self) {
        self.color = self.color.flip();
        if let Some(left) = self.left.as_mut() {
            left.color = left.color.flip();
        }
        if let Some(right) = self.right.as_mut() {
            right.color = right.color.flip();
        }
    }
}

/// Statistics on [`Llrb`] tree, [`Llrb::stats`] fills only the entry
/// count and node size, [`Llrb::validate`] fills the rest by walking
/// the full tree.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize,
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    /// Return number entries in [`Llrb`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Llrb<k,V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types.
    ///
    /// ```
    /// use llrb_map::Llrb;
    /// let llrb: Llrb<u64, u64> = Llrb::new("myinstance");
    ///
    /// // key and value are 8 bytes each, rest is color and child links.
    /// assert!(llrb.stats().node_size() > 16);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black nodes from root to leaf, same on every
    /// path. Available only via [`Llrb::validate`].
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics, available only via [`Llrb::validate`].
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
