//! This crate provides a queue of owned strings, implemented as a circular
//! doubly-linked list anchored by a sentinel node, together with a family
//! of in-place structural algorithms: middle-element deletion, removal of
//! adjacent duplicates in sorted data, pairwise swapping, whole-ring
//! reversal, and a stable bottom-up natural merge sort.
//!
//! The [`Ring`] allows inserting and removing elements at both ends in
//! constant time; the algorithms rearrange the existing nodes purely by
//! relinking, in *O*(1) auxiliary space.
//!
//! Here is a quick example showing how the ring works.
//!
//! ```
//! use qring::Ring;
//!
//! let mut ring = Ring::new();
//! ring.push_back("bravo")?;
//! ring.push_back("alpha")?;
//! ring.push_front("charlie")?;
//!
//! ring.sort();
//! assert_eq!(ring, Ring::try_from_iter(["alpha", "bravo", "charlie"])?);
//!
//! let removed = ring.pop_front()?; // ownership moves to the caller
//! assert_eq!(removed.value(), "alpha");
//! drop(removed); // payload and node are released here, exactly once
//! # Ok::<(), qring::Error>(())
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the ring is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────┐
//!          ↓                                                  Sentinel   │
//!    ╔═══════════╗           ╔═══════════╗                 ┌───────────┐ │
//!    ║   next    ║ ────────→ ║   next    ║ ──→ ┄┄ ───────→ │   next    │─┘
//!    ╟───────────╢           ╟───────────╢   Node 2, 3, …  ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←── ┄┄ ←─────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                 ├───────────┤
//! │  ║  String   ║           ║  String   ║                 ┊ no value  ┊
//! │  ╚═══════════╝           ╚═══════════╝                 └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                        ↑   ↑
//! └────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                    │
//! ║ sentinel  ║ ───────────────────────────────────────────────────┘
//! ╚═══════════╝
//!      Ring
//! ```
//!
//! The `Ring` owns its sentinel node, which never carries a payload. In an
//! empty ring the sentinel's `next` and `prev` point to itself; otherwise
//! `sentinel.next` is the front element and `sentinel.prev` the back one.
//! Each element node is allocated on the heap and owns exactly one
//! `String` payload, copied from the caller's slice at insertion.
//!
//! # Removal and Ownership
//!
//! [`pop_front`] and [`pop_back`] *detach* the element instead of deleting
//! it: the returned [`Element`] owns the node and its payload, and
//! dropping it is the one and only release path. Leaks and double-frees of
//! a detached element are therefore ruled out by the type system rather
//! than by a calling convention.
//!
//! # Errors
//!
//! Fallible operations report [`Error::Empty`] or [`Error::Alloc`] through
//! their return value and never partially mutate the ring on failure; see
//! the [`error`] module.
//!
//! # Iteration
//!
//! Iterating over a ring is by the [`Iter`] and [`IterMut`] iterators.
//! These are double-ended, fused, non-cyclic, and skip the sentinel.
//! [`IterMut`] provides mutability of the payloads (but not of the linked
//! structure of the ring).
//!
//! ```
//! use qring::Ring;
//!
//! let ring = Ring::try_from_iter(["a", "b", "c"])?;
//! let mut iter = ring.iter();
//! assert_eq!(iter.next(), Some("a"));
//! assert_eq!(iter.next_back(), Some("c"));
//! assert_eq!(iter.next(), Some("b"));
//! assert_eq!(iter.next(), None);
//! # Ok::<(), qring::Error>(())
//! ```
//!
//! # Algorithms
//!
//! All structural algorithms operate in place on an existing ring and
//! never allocate:
//! - [`delete_middle`]: removes the element at index ⌊n/2⌋;
//! - [`delete_duplicates`]: collapses maximal runs of equal payloads in a
//!   pre-sorted ring, keeping only the values that were unique;
//! - [`swap_pairs`]: exchanges every two adjacent elements;
//! - [`reverse`]: reverses traversal order;
//! - [`sort`]: stable bottom-up natural merge sort by byte-wise
//!   lexicographic payload order.
//!
//! ```
//! use qring::Ring;
//!
//! let mut ring = Ring::try_from_iter(["a", "c", "b"])?;
//! ring.sort();
//! assert_eq!(ring, Ring::try_from_iter(["a", "b", "c"])?);
//! ring.reverse();
//! assert_eq!(ring, Ring::try_from_iter(["c", "b", "a"])?);
//! ring.swap_pairs();
//! assert_eq!(ring, Ring::try_from_iter(["b", "c", "a"])?);
//! # Ok::<(), qring::Error>(())
//! ```
//!
//! The ring is single-owner and single-threaded: no operation blocks,
//! suspends, or synchronizes internally. Callers that share a ring across
//! threads must serialize access externally.
//!
//! [`Ring`]: crate::Ring
//! [`Element`]: crate::Element
//! [`Iter`]: crate::Iter
//! [`IterMut`]: crate::IterMut
//! [`pop_front`]: crate::Ring::pop_front
//! [`pop_back`]: crate::Ring::pop_back
//! [`delete_middle`]: crate::Ring::delete_middle
//! [`delete_duplicates`]: crate::Ring::delete_duplicates
//! [`swap_pairs`]: crate::Ring::swap_pairs
//! [`reverse`]: crate::Ring::reverse
//! [`sort`]: crate::Ring::sort

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use ring::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use ring::{Element, Ring};

pub mod error;
pub mod ring;

mod experiments;
