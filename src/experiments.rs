//! An experimental, fully safe rendition of the string queue, where every
//! relinking step is checked at compile time: each node is owned by two
//! half-references (`StaticRc<_, 1, 2>`), one per neighbor, and payload
//! access goes through a `GhostToken` brand instead of raw pointers.
//!
//! The raw ring's sentinel has no counterpart here: a self-linked node
//! would have to own both halves of itself, which cannot be constructed
//! from the outside, so the two ends are tracked in an array instead and
//! the chain is open rather than circular. Node splicing is confined to
//! `push_owned_at` and `pop_at`; the structural algorithms are folds
//! through those two primitives, so the half-ownership accounting of
//! every relink is what the compiler checks.

use ghost_cell::{GhostCell, GhostToken};
use static_rc::StaticRc;

pub struct SafeRing<'id> {
    ends: [Option<LinkPtr<'id>>; 2],
}

struct Link<'id> {
    neighbors: [Option<LinkPtr<'id>>; 2],
    value: String,
}

type LinkPtr<'id> = Half<GhostCell<'id, Link<'id>>>;

type Half<T> = StaticRc<T, 1, 2>;
type Full<T> = StaticRc<T, 2, 2>;

impl<'id> Default for SafeRing<'id> {
    fn default() -> Self {
        let ends = [None, None];
        Self { ends }
    }
}

impl<'id> SafeRing<'id> {
    const FRONT: usize = 0;
    const BACK: usize = 1;

    fn front(&self) -> Option<&LinkPtr<'id>> {
        self.ends[Self::FRONT].as_ref()
    }

    /// Splice a fresh link in at the `side` end. One half of the new link
    /// goes to the old end node (or to the opposite end slot of an empty
    /// ring), the other half becomes the new end.
    fn push_owned_at(&mut self, side: usize, value: String, token: &mut GhostToken<'id>) {
        let oppo = 1 - side;
        let neighbors = [None, None];
        let link = Link { neighbors, value };
        let (left, right) = Full::split(Full::new(GhostCell::new(link)));
        match self.ends[side].take() {
            Some(this_side) => {
                this_side.borrow_mut(token).neighbors[oppo] = Some(left);
                right.borrow_mut(token).neighbors[side] = Some(this_side);
            }
            None => self.ends[oppo] = Some(left),
        }
        self.ends[side] = Some(right);
    }

    fn push_at(&mut self, side: usize, value: &str, token: &mut GhostToken<'id>) {
        self.push_owned_at(side, value.to_owned(), token);
    }

    /// Unsplice the link at the `side` end: collect its two halves, one
    /// from the end slot and one from its neighbor, and join them back
    /// into full ownership of the payload.
    fn pop_at(&mut self, side: usize, token: &mut GhostToken<'id>) -> Option<String> {
        debug_assert!(side < 2);
        let oppo = 1 - side;
        let right = self.ends[side].take()?;
        let left = match right.borrow_mut(token).neighbors[side].take() {
            Some(this_side) => {
                let left = this_side.borrow_mut(token).neighbors[oppo]
                    .take()
                    .unwrap();
                self.ends[side] = Some(this_side);
                left
            }
            None => self.ends[oppo].take().unwrap(),
        };
        Some(Full::into_box(Full::join(left, right)).into_inner().value)
    }
}

impl<'id> SafeRing<'id> {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn is_empty(&self) -> bool {
        self.front().is_none()
    }
    pub fn push_back(&mut self, value: &str, token: &mut GhostToken<'id>) {
        self.push_at(Self::BACK, value, token);
    }
    pub fn pop_back(&mut self, token: &mut GhostToken<'id>) -> Option<String> {
        self.pop_at(Self::BACK, token)
    }
    pub fn push_front(&mut self, value: &str, token: &mut GhostToken<'id>) {
        self.push_at(Self::FRONT, value, token);
    }
    pub fn pop_front(&mut self, token: &mut GhostToken<'id>) -> Option<String> {
        self.pop_at(Self::FRONT, token)
    }

    /// Number of elements, by a front-to-back walk. In a node reached from
    /// end `s`, `neighbors[s]` is the next node inward.
    pub fn len(&self, token: &GhostToken<'id>) -> usize {
        let mut n = 0;
        let mut cursor = self.ends[Self::FRONT].as_deref();
        while let Some(cell) = cursor {
            n += 1;
            cursor = cell.borrow(token).neighbors[Self::FRONT].as_deref();
        }
        n
    }

    /// Snapshot of the payloads in front-to-back order.
    pub fn values(&self, token: &GhostToken<'id>) -> Vec<String> {
        let mut out = Vec::new();
        let mut cursor = self.ends[Self::FRONT].as_deref();
        while let Some(cell) = cursor {
            let link = cell.borrow(token);
            out.push(link.value.clone());
            cursor = link.neighbors[Self::FRONT].as_deref();
        }
        out
    }

    /// Reverses traversal order: unsplice every link from the front and
    /// resplice it at the front of the result, so the payloads move but
    /// are never copied.
    pub fn reverse(&mut self, token: &mut GhostToken<'id>) {
        let mut flipped = SafeRing::new();
        while let Some(value) = self.pop_front(token) {
            flipped.push_owned_at(Self::FRONT, value, token);
        }
        *self = flipped;
    }

    /// Exchanges every two adjacent elements; an odd element out at the
    /// back stays in place.
    pub fn swap_pairs(&mut self, token: &mut GhostToken<'id>) {
        let mut paired = SafeRing::new();
        while let Some(first) = self.pop_front(token) {
            match self.pop_front(token) {
                Some(second) => {
                    paired.push_owned_at(Self::BACK, second, token);
                    paired.push_owned_at(Self::BACK, first, token);
                }
                None => paired.push_owned_at(Self::BACK, first, token),
            }
        }
        *self = paired;
    }

    /// Removes and returns the element at index ⌊n/2⌋, or `None` if the
    /// ring is empty.
    pub fn delete_middle(&mut self, token: &mut GhostToken<'id>) -> Option<String> {
        let middle = self.len(token) / 2;
        let mut kept = SafeRing::new();
        let mut removed = None;
        let mut index = 0;
        while let Some(value) = self.pop_front(token) {
            if index == middle {
                removed = Some(value);
            } else {
                kept.push_owned_at(Self::BACK, value, token);
            }
            index += 1;
        }
        *self = kept;
        removed
    }
}
