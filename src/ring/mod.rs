use std::alloc::{alloc, Layout};
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::ptr::{addr_of_mut, NonNull};

use crate::error::{Error, Result};
use crate::{Iter, IterMut};

pub mod iterator;

mod algorithms;

/// The `Ring` is a queue of owned strings, implemented as a circular
/// doubly-linked list anchored by a sentinel node. It allows inserting and
/// removing elements at both ends in constant time; the structural
/// algorithms ([`sort`], [`reverse`], [`swap_pairs`], [`delete_middle`],
/// [`delete_duplicates`]) rearrange the existing nodes in place and never
/// allocate.
///
/// The `Ring` owns one sentinel node that never carries a payload; an empty
/// ring is the sentinel linked to itself. For every node `n` in the ring,
/// `n.next.prev == n` and `n.prev.next == n`.
///
/// # Naming Conventions
///
/// - `front` is the element right after the sentinel, `back` the one right
///   before it;
/// - a *detached* node is unlinked from its ring; its link fields are
///   dangling and are never read again.
///
/// [`sort`]: Ring::sort
/// [`reverse`]: Ring::reverse
/// [`swap_pairs`]: Ring::swap_pairs
/// [`delete_middle`]: Ring::delete_middle
/// [`delete_duplicates`]: Ring::delete_duplicates
pub struct Ring {
    sentinel: Box<Node>,
}

pub(crate) struct Node {
    pub(crate) next: NonNull<Node>,
    pub(crate) prev: NonNull<Node>,
    pub(crate) value: String,
}

/// An element detached from a [`Ring`] by [`pop_front`] or [`pop_back`].
///
/// The `Element` owns its node and payload exclusively; dropping it
/// releases both. There is no other release path, so a detached element
/// can neither leak behind the caller's back nor be freed twice.
///
/// [`pop_front`]: Ring::pop_front
/// [`pop_back`]: Ring::pop_back
pub struct Element {
    node: Box<Node>,
}

/// Link `prev` and `next` as immediate neighbors.
///
/// It is unsafe because it does not check that both nodes are alive and
/// that splicing them together keeps their ring well-formed.
pub(crate) unsafe fn connect(mut prev: NonNull<Node>, mut next: NonNull<Node>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

// private methods
impl Ring {
    pub(crate) fn sentinel_node(&self) -> NonNull<Node> {
        NonNull::from(self.sentinel.as_ref())
    }
    pub(crate) fn front_node(&self) -> NonNull<Node> {
        // SAFETY: `sentinel.next` is always valid (either the sentinel itself,
        // or the first element of the ring).
        NonNull::from(unsafe { self.sentinel_node().as_ref().next.as_ref() })
    }
    pub(crate) fn back_node(&self) -> NonNull<Node> {
        // SAFETY: `sentinel.prev` is always valid (either the sentinel itself,
        // or the last element of the ring).
        NonNull::from(unsafe { self.sentinel_node().as_ref().prev.as_ref() })
    }

    /// Detach a single node `node` from the ring, and return it as a box.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the
    /// ring, or whether it is the sentinel. Detaching a foreign node or the
    /// sentinel makes the ring ill-formed.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Node>) -> Box<Node> {
        let node = Box::from_raw(node.as_ptr());
        self.connect(node.prev, node.next);
        node
    }

    /// Attach a detached node to the ring, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next`
    /// belong to the ring, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`). Violating either makes the ring
    /// ill-formed.
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Node>,
        next: NonNull<Node>,
        node: NonNull<Node>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        self.connect(prev, node);
        self.connect(node, next);
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, node);
            assert_adjacent(node, next);
        }
    }

    pub(crate) unsafe fn connect(&mut self, prev: NonNull<Node>, next: NonNull<Node>) {
        connect(prev, next);
    }
}

impl Ring {
    /// Create an empty `Ring`.
    ///
    /// # Examples
    /// ```
    /// use qring::Ring;
    /// let ring = Ring::new();
    /// assert!(ring.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        let mut sentinel = Box::new(Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            // never read; an empty `String` does not allocate
            value: String::new(),
        });
        let anchor = NonNull::from(sentinel.as_mut());
        sentinel.next = anchor;
        sentinel.prev = anchor;
        Self { sentinel }
    }

    /// Returns `true` if the `Ring` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// assert!(ring.is_empty());
    ///
    /// ring.push_front("foo").unwrap();
    /// assert!(!ring.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.sentinel_node()
    }

    /// Returns the number of elements in the `Ring`, by walking it.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// assert_eq!(ring.len(), 0);
    ///
    /// ring.push_back("a").unwrap();
    /// ring.push_back("b").unwrap();
    /// assert_eq!(ring.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if the `Ring` contains an element equal to the given
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let ring = Ring::try_from_iter(["a", "b"]).unwrap();
    /// assert_eq!(ring.contains("a"), true);
    /// assert_eq!(ring.contains("z"), false);
    /// ```
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|e| e == value)
    }

    /// Removes all elements from the `Ring`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    #[inline]
    pub fn clear(&mut self) {
        while self.pop_front().is_ok() {}
    }

    /// Provides a reference to the front payload, or `None` if the ring is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// assert_eq!(ring.front(), None);
    ///
    /// ring.push_front("a").unwrap();
    /// assert_eq!(ring.front(), Some("a"));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides a mutable reference to the front payload, or `None` if the
    /// ring is empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut String> {
        self.iter_mut().next()
    }

    /// Provides a reference to the back payload, or `None` if the ring is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// assert_eq!(ring.back(), None);
    ///
    /// ring.push_back("a").unwrap();
    /// assert_eq!(ring.back(), Some("a"));
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Provides a mutable reference to the back payload, or `None` if the
    /// ring is empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut String> {
        self.iter_mut().next_back()
    }

    /// Copies `value` into a freshly allocated element and splices it in
    /// right after the sentinel, making it the new front.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Alloc`] if storage for the node or its payload
    /// buffer cannot be obtained; the ring is left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// ring.push_front("b").unwrap();
    /// ring.push_front("a").unwrap();
    /// assert_eq!(ring.front(), Some("a"));
    /// ```
    pub fn push_front(&mut self, value: &str) -> Result<()> {
        let node = Node::try_new_detached(value)?;
        // SAFETY: the sentinel and the front node are adjacent by the ring
        // invariant, and `node` is freshly detached.
        unsafe { self.attach_node(self.sentinel_node(), self.front_node(), node) };
        Ok(())
    }

    /// Copies `value` into a freshly allocated element and splices it in
    /// right before the sentinel, making it the new back.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Alloc`] if storage for the node or its payload
    /// buffer cannot be obtained; the ring is left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// ring.push_back("a").unwrap();
    /// ring.push_back("b").unwrap();
    /// assert_eq!(ring.back(), Some("b"));
    /// ```
    pub fn push_back(&mut self, value: &str) -> Result<()> {
        let node = Node::try_new_detached(value)?;
        // SAFETY: the back node and the sentinel are adjacent by the ring
        // invariant, and `node` is freshly detached.
        unsafe { self.attach_node(self.back_node(), self.sentinel_node(), node) };
        Ok(())
    }

    /// Detaches the front element and transfers its ownership to the
    /// caller.
    ///
    /// Removing is not deleting: the returned [`Element`] stays alive until
    /// the caller drops it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Empty`] if the ring has no elements; the ring is
    /// not mutated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::{Error, Ring};
    ///
    /// let mut ring = Ring::new();
    /// assert_eq!(ring.pop_front().unwrap_err(), Error::Empty);
    ///
    /// ring.push_back("a").unwrap();
    /// ring.push_back("b").unwrap();
    /// assert_eq!(ring.pop_front().unwrap().value(), "a");
    /// assert_eq!(ring.pop_front().unwrap().value(), "b");
    /// ```
    pub fn pop_front(&mut self) -> Result<Element> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        // SAFETY: the ring is not empty, so the front node is a real
        // element, not the sentinel.
        let node = unsafe { self.detach_node(self.front_node()) };
        Ok(Element { node })
    }

    /// Detaches the back element and transfers its ownership to the caller.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Empty`] if the ring has no elements; the ring is
    /// not mutated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// ring.push_back("a").unwrap();
    /// ring.push_back("b").unwrap();
    /// assert_eq!(ring.pop_back().unwrap().value(), "b");
    /// ```
    pub fn pop_back(&mut self) -> Result<Element> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        // SAFETY: the ring is not empty, so the back node is a real
        // element, not the sentinel.
        let node = unsafe { self.detach_node(self.back_node()) };
        Ok(Element { node })
    }

    /// Builds a ring by pushing every item of `iter` at the back.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Alloc`] if any insertion cannot obtain storage;
    /// the partially built ring is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let ring = Ring::try_from_iter(["a", "b", "c"]).unwrap();
    /// assert_eq!(ring.len(), 3);
    /// ```
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut ring = Ring::new();
        ring.try_extend(iter)?;
        Ok(ring)
    }

    /// Pushes every item of `iter` at the back.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Alloc`] if any insertion cannot obtain storage;
    /// items inserted before the failure remain in the ring.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for item in iter {
            self.push_back(item.as_ref())?;
        }
        Ok(())
    }

    /// Provides a forward iterator over the payloads.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let ring = Ring::try_from_iter(["a", "b"]).unwrap();
    /// let mut iter = ring.iter();
    /// assert_eq!(iter.next(), Some("a"));
    /// assert_eq!(iter.next(), Some("b"));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references to the payloads.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::try_from_iter(["a", "b"]).unwrap();
    /// for value in ring.iter_mut() {
    ///     value.push('!');
    /// }
    /// assert_eq!(ring.front(), Some("a!"));
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut::new(self)
    }
}

impl Element {
    /// Borrows the owned payload.
    #[inline]
    pub fn value(&self) -> &str {
        &self.node.value
    }

    /// Mutably borrows the owned payload.
    #[inline]
    pub fn value_mut(&mut self) -> &mut String {
        &mut self.node.value
    }

    /// Consumes the element, keeping only its payload.
    #[inline]
    pub fn into_value(self) -> String {
        let Node { value, .. } = *self.node;
        value
    }

    /// Copies the payload into `buf`, truncated to `buf.len() - 1` bytes
    /// and followed by a NUL terminator. Returns the number of payload
    /// bytes copied.
    ///
    /// The copy never overflows `buf`, regardless of the payload length.
    /// An empty `buf` is left untouched and 0 is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// ring.push_back("hello").unwrap();
    ///
    /// let mut buf = [0xffu8; 4];
    /// let copied = ring.pop_front().unwrap().read_into(&mut buf);
    /// assert_eq!(copied, 3);
    /// assert_eq!(&buf, b"hel\0");
    /// ```
    pub fn read_into(&self, buf: &mut [u8]) -> usize {
        let Some(capacity) = buf.len().checked_sub(1) else {
            return 0;
        };
        let n = capacity.min(self.node.value.len());
        buf[..n].copy_from_slice(&self.node.value.as_bytes()[..n]);
        buf[n] = 0;
        n
    }
}

impl Deref for Element {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.value()
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.value()).finish()
    }
}

impl Debug for Ring {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Ring {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Allocate a detached node owning a copy of `value`.
    ///
    /// Either allocation can fail; nothing is linked until both have
    /// succeeded, so a failed insert leaves its ring untouched.
    pub(crate) fn try_new_detached(value: &str) -> Result<NonNull<Node>> {
        let mut payload = String::new();
        payload
            .try_reserve_exact(value.len())
            .map_err(|_| Error::Alloc)?;
        payload.push_str(value);

        let ptr = unsafe { alloc(Layout::new::<Node>()) } as *mut Node;
        // `payload` is dropped here on failure.
        let node = NonNull::new(ptr).ok_or(Error::Alloc)?;
        // SAFETY: `ptr` is a live allocation of a `Node`. The links are
        // placeholders; attaching the node overwrites both before any read.
        unsafe {
            addr_of_mut!((*ptr).next).write(NonNull::dangling());
            addr_of_mut!((*ptr).prev).write(NonNull::dangling());
            addr_of_mut!((*ptr).value).write(payload);
        }
        Ok(node)
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Node>, next: NonNull<Node>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Ring {
    fn drop(&mut self) {
        self.clear();
    }
}

unsafe impl Send for Ring {}

unsafe impl Sync for Ring {}

unsafe impl Send for Element {}

unsafe impl Sync for Element {}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ring::Ring;

    #[test]
    fn ring_create() {
        let mut ring = Ring::new();
        assert!(ring.is_empty());
        ring.push_back("1").unwrap();
        assert!(!ring.is_empty());
        assert_eq!(ring.pop_back().unwrap().value(), "1");
        assert!(ring.is_empty());
    }

    #[test]
    fn ring_push_and_pop() {
        let mut ring = Ring::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);

        assert_eq!(ring.front(), None);
        assert_eq!(ring.back(), None);
        assert_eq!(ring.pop_front().unwrap_err(), Error::Empty);
        assert_eq!(ring.pop_back().unwrap_err(), Error::Empty);

        ring.push_back("1").unwrap();
        assert_eq!(ring.back(), Some("1"));
        assert_eq!(ring.pop_front().unwrap().value(), "1");
        assert_eq!(ring.pop_back().unwrap_err(), Error::Empty);
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);

        ring.push_front("1").unwrap();
        ring.push_front("2").unwrap();
        ring.push_back("3").unwrap();
        assert_eq!(ring.back(), Some("3"));
        assert_eq!(ring.front(), Some("2"));
        assert_eq!(ring.pop_front().unwrap().value(), "2");
        assert_eq!(ring.pop_back().unwrap().value(), "3");

        assert_eq!(ring.front(), Some("1"));
        assert_eq!(ring.pop_front().unwrap().value(), "1");
        assert_eq!(ring.front(), None);
        assert_eq!(ring.back(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn ring_fifo_round_trip() {
        let values = ["v1", "v2", "v3", "v4", "v5"];
        let mut ring = Ring::try_from_iter(values).unwrap();
        for expected in values {
            assert_eq!(ring.pop_front().unwrap().value(), expected);
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn ring_head_insert_reverses() {
        let values = ["v1", "v2", "v3"];
        let mut ring = Ring::new();
        for value in values {
            ring.push_front(value).unwrap();
        }
        for expected in values.iter().rev() {
            assert_eq!(ring.pop_front().unwrap().value(), *expected);
        }
    }

    #[test]
    fn ring_len_tracks_live_elements() {
        let mut ring = Ring::new();
        for i in 0..10 {
            ring.push_back(&i.to_string()).unwrap();
            assert_eq!(ring.len(), i + 1);
        }
        for i in (0..10).rev() {
            drop(ring.pop_back().unwrap());
            assert_eq!(ring.len(), i);
        }
    }

    #[test]
    fn ring_pop_empty_never_mutates() {
        let mut ring = Ring::try_from_iter(["only"]).unwrap();
        ring.pop_front().unwrap();
        for _ in 0..3 {
            assert_eq!(ring.pop_front().unwrap_err(), Error::Empty);
            assert_eq!(ring.pop_back().unwrap_err(), Error::Empty);
            assert!(ring.is_empty());
        }
        ring.push_back("again").unwrap();
        assert_eq!(ring.front(), Some("again"));
    }

    #[test]
    fn ring_contains() {
        let ring = Ring::try_from_iter(["a", "b", "c"]).unwrap();
        assert!(ring.contains("b"));
        assert!(!ring.contains("d"));
        assert!(!Ring::new().contains(""));
    }

    #[test]
    fn ring_clear() {
        let mut ring = Ring::try_from_iter(["a", "b", "c"]).unwrap();
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
    }

    #[test]
    fn element_read_into_truncates() {
        let mut ring = Ring::new();
        ring.push_back("truncate me").unwrap();
        let element = ring.pop_front().unwrap();

        let mut buf = [0xaau8; 5];
        assert_eq!(element.read_into(&mut buf), 4);
        assert_eq!(&buf, b"trun\0");

        let mut buf = [0xaau8; 64];
        let copied = element.read_into(&mut buf);
        assert_eq!(copied, "truncate me".len());
        assert_eq!(&buf[..copied], b"truncate me");
        assert_eq!(buf[copied], 0);

        let mut empty: [u8; 0] = [];
        assert_eq!(element.read_into(&mut empty), 0);

        let mut tiny = [0xaau8; 1];
        assert_eq!(element.read_into(&mut tiny), 0);
        assert_eq!(tiny, [0]);
    }

    #[test]
    fn element_mutation() {
        let mut ring = Ring::new();
        ring.push_back("a").unwrap();
        let mut element = ring.pop_front().unwrap();
        element.value_mut().push('b');
        assert_eq!(&*element, "ab");
        assert_eq!(element.into_value(), "ab");
    }

    #[test]
    fn ring_front_back_mut() {
        let mut ring = Ring::try_from_iter(["a", "b"]).unwrap();
        ring.front_mut().unwrap().push('1');
        ring.back_mut().unwrap().push('2');
        assert_eq!(ring.front(), Some("a1"));
        assert_eq!(ring.back(), Some("b2"));
    }
}
