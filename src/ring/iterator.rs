use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::ring::{Node, Ring};

/// An iterator over the payloads of a `Ring`.
///
/// It uses a pair of nodes `start..end` to represent a half-open subrange
/// of the ring, where `start` is inclusive and `end` (the sentinel) is not.
///
/// Though the `Iter` does not hold a reference to the ring, it actually
/// *borrows* (immutably) from it, so a phantom marker of `&'a Ring` is
/// added to protect the ring from being written.
///
/// # Examples
///
/// ```compile_fail
/// use qring::Ring;
///
/// let mut ring = Ring::try_from_iter(["a", "b"]).unwrap();
/// let mut iter = ring.iter();
///
/// // Won't compile, because the ring is already borrowed immutably.
/// ring.push_back("c").unwrap();
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a> {
    start: NonNull<Node>,
    end: NonNull<Node>,
    _marker: PhantomData<&'a Ring>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(ring: &'a Ring) -> Self {
        let start = ring.front_node();
        let end = ring.sentinel_node();
        let _marker = PhantomData;
        Self {
            start,
            end,
            _marker,
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("Iter");
        // SAFETY: `start..end` is always a valid range of a ring.
        let mut ptr = self.start;
        while ptr != self.end {
            let current = unsafe { ptr.as_ref() };
            f.field(&current.value);
            ptr = current.next;
        }
        f.finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a ring,
        // and it is not empty here, so it is safe.
        let current = unsafe { self.start.as_ref() };
        self.start = current.next;
        Some(&current.value)
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a ring,
        // and it is not empty here, so it is safe.
        self.end = unsafe { self.end.as_ref().prev };
        let current = unsafe { self.end.as_ref() };
        Some(&current.value)
    }
}

impl FusedIterator for Iter<'_> {}

/// A mutable iterator over the payloads of a `Ring`.
///
/// `start..end` denotes a subrange of the ring. Payloads can be mutated,
/// the linked structure cannot.
///
/// Though the `IterMut` does not hold a reference to the ring, it actually
/// *borrows* (mutably) from it, so a phantom marker of `&'a mut Ring` is
/// added to protect the ring from being read.
///
/// # Examples
///
/// `Ring` is not readable after an `IterMut` is created.
/// ```compile_fail
/// use qring::Ring;
///
/// let mut ring = Ring::try_from_iter(["a", "b"]).unwrap();
/// let mut iter = ring.iter_mut();
/// println!("{:?}", ring.back());
/// println!("{:?}", iter.next());
/// ```
pub struct IterMut<'a> {
    start: NonNull<Node>,
    end: NonNull<Node>,
    _marker: PhantomData<&'a mut Ring>,
}

impl<'a> IterMut<'a> {
    pub(crate) fn new(ring: &'a mut Ring) -> Self {
        let start = ring.front_node();
        let end = ring.sentinel_node();
        let _marker = PhantomData;
        Self {
            start,
            end,
            _marker,
        }
    }
}

impl fmt::Debug for IterMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("IterMut");
        // SAFETY: `start..end` is always a valid range of a ring.
        let mut ptr = self.start;
        while ptr != self.end {
            let current = unsafe { ptr.as_ref() };
            f.field(&current.value);
            ptr = current.next;
        }
        f.finish()
    }
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut String;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a ring,
        // and it is not empty here, so it is safe.
        let current = unsafe { self.start.as_mut() };
        self.start = current.next;
        Some(&mut current.value)
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for IterMut<'a> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a ring,
        // and it is not empty here, so it is safe.
        self.end = unsafe { self.end.as_ref().prev };
        let current = unsafe { self.end.as_mut() };
        Some(&mut current.value)
    }
}

impl FusedIterator for IterMut<'_> {}

/// An owning iterator over the payloads of a `Ring`.
///
/// This `struct` is created by the [`into_iter`] method on [`Ring`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
///
/// [`into_iter`]: Ring::into_iter
pub struct IntoIter {
    ring: Ring,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("ring", &self.ring).finish()
    }
}

impl Iterator for IntoIter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.ring.pop_front().ok().map(|element| element.into_value())
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ring.pop_back().ok().map(|element| element.into_value())
    }
}

impl FusedIterator for IntoIter {}

impl IntoIterator for Ring {
    type Item = String;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { ring: self }
    }
}

impl<'a> IntoIterator for &'a Ring {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Ring {
    type Item = &'a mut String;
    type IntoIter = IterMut<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

unsafe impl Send for Iter<'_> {}

unsafe impl Sync for Iter<'_> {}

unsafe impl Send for IterMut<'_> {}

unsafe impl Sync for IterMut<'_> {}
