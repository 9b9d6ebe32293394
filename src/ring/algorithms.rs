use crate::error::{Error, Result};
use crate::ring::{connect, Ring};

mod sort;

impl PartialEq for Ring {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Ring {}

impl Ring {
    /// Deletes the middle element, the one at index ⌊n/2⌋ (0-based) of an
    /// n-element ring.
    ///
    /// The middle is located by a two-pointer walk: one cursor steps
    /// forward from the sentinel while the other steps backward, and the
    /// walk stops as soon as they meet or become adjacent.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Empty`] if the ring has no elements.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::try_from_iter(["a", "b", "c", "d", "e", "f"]).unwrap();
    /// ring.delete_middle().unwrap();
    /// assert_eq!(ring, Ring::try_from_iter(["a", "b", "c", "e", "f"]).unwrap());
    /// ```
    pub fn delete_middle(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Empty);
        }

        let sentinel = self.sentinel_node();
        let mut forward = sentinel;
        let mut backward = sentinel;

        // SAFETY: both cursors only follow live links of a well-formed
        // ring, and the loop terminates before either passes the other.
        unsafe {
            loop {
                forward = forward.as_ref().next;
                if forward == backward {
                    break;
                }
                backward = backward.as_ref().prev;
                if forward == backward {
                    break;
                }
            }
            // `forward` is a real element: the ring is not empty and the
            // cursors meet strictly inside it.
            drop(self.detach_node(forward));
        }
        Ok(())
    }

    /// Deletes every payload that occurs in a run of two or more
    /// consecutive byte-equal elements, keeping only the values that were
    /// unique in the input.
    ///
    /// The caller guarantees the ring is already sorted ascending; this is
    /// not verified. On unsorted input the result is the deterministic
    /// outcome of the same single forward pass, still memory-safe but
    /// otherwise unspecified.
    ///
    /// An empty ring is a trivial success.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::try_from_iter(["1", "1", "2", "3", "3", "3"]).unwrap();
    /// ring.delete_duplicates();
    /// assert_eq!(ring, Ring::try_from_iter(["2"]).unwrap());
    /// ```
    pub fn delete_duplicates(&mut self) {
        let sentinel = self.sentinel_node();
        // SAFETY: the walk only follows live links; every detached node is
        // released before its neighbors are read again, and neighbors are
        // reconnected by the detach itself.
        unsafe {
            let mut node = self.front_node();
            while node != sentinel {
                let next = node.as_ref().next;
                if next == sentinel || node.as_ref().value != next.as_ref().value {
                    node = next;
                    continue;
                }
                // `node` opens a run of equal payloads: drop the whole run
                let mut run = node;
                loop {
                    let after = run.as_ref().next;
                    let released = self.detach_node(run);
                    run = after;
                    if run == sentinel || run.as_ref().value != released.value {
                        break;
                    }
                }
                node = run;
            }
        }
    }

    /// Exchanges every two adjacent elements: (1st, 2nd), (3rd, 4th), …
    /// An odd element out at the back stays in place.
    ///
    /// Pure relinking; payloads are neither copied nor reallocated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::try_from_iter(["1", "2", "3", "4", "5"]).unwrap();
    /// ring.swap_pairs();
    /// assert_eq!(ring, Ring::try_from_iter(["2", "1", "4", "3", "5"]).unwrap());
    /// ```
    pub fn swap_pairs(&mut self) {
        let sentinel = self.sentinel_node();
        let mut node = self.front_node();
        // SAFETY: each iteration relinks one complete pair between its two
        // outer neighbors, keeping the ring well-formed before moving on.
        unsafe {
            while node != sentinel && node.as_ref().next != sentinel {
                let first = node;
                let second = first.as_ref().next;
                let before = first.as_ref().prev;
                let after = second.as_ref().next;
                connect(before, second);
                connect(second, first);
                connect(first, after);
                node = after;
            }
        }
    }

    /// Reverses the traversal order by swapping the `prev` and `next` roles
    /// of every node, the sentinel included.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::try_from_iter(["a", "b", "c"]).unwrap();
    /// ring.reverse();
    /// assert_eq!(ring, Ring::try_from_iter(["c", "b", "a"]).unwrap());
    /// ```
    pub fn reverse(&mut self) {
        if self.is_empty() {
            return;
        }
        let sentinel = self.sentinel_node();
        let mut node = sentinel;
        // SAFETY: the walk follows the original `next` links, which stay
        // readable in each node's `prev` slot after that node is flipped.
        unsafe {
            loop {
                let mut current = node;
                let next = current.as_ref().next;
                let prev = current.as_ref().prev;
                current.as_mut().next = prev;
                current.as_mut().prev = next;
                node = next;
                if node == sentinel {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::Ring;

    fn ring_of(values: &[&str]) -> Ring {
        Ring::try_from_iter(values).unwrap()
    }

    #[test]
    fn delete_middle_even() {
        // n = 6, 0-indexed: index 3 goes
        let mut ring = ring_of(&["a", "b", "c", "d", "e", "f"]);
        ring.delete_middle().unwrap();
        assert_eq!(ring, ring_of(&["a", "b", "c", "e", "f"]));
    }

    #[test]
    fn delete_middle_odd() {
        // n = 5: index 2 goes
        let mut ring = ring_of(&["a", "b", "c", "d", "e"]);
        ring.delete_middle().unwrap();
        assert_eq!(ring, ring_of(&["a", "b", "d", "e"]));
    }

    #[test]
    fn delete_middle_small() {
        let mut ring = ring_of(&["a"]);
        ring.delete_middle().unwrap();
        assert!(ring.is_empty());

        let mut ring = ring_of(&["a", "b"]);
        ring.delete_middle().unwrap();
        assert_eq!(ring, ring_of(&["a"]));
    }

    #[test]
    fn delete_middle_until_empty() {
        let mut ring = ring_of(&["a", "b", "c", "d", "e"]);
        for remaining in (0..5).rev() {
            ring.delete_middle().unwrap();
            assert_eq!(ring.len(), remaining);
        }
        assert_eq!(ring.delete_middle().unwrap_err(), Error::Empty);
    }

    #[test]
    fn delete_middle_empty() {
        let mut ring = Ring::new();
        assert_eq!(ring.delete_middle().unwrap_err(), Error::Empty);
        assert!(ring.is_empty());
    }

    #[test]
    fn delete_duplicates_drops_whole_runs() {
        let mut ring = ring_of(&["1", "1", "2", "3", "3", "3"]);
        ring.delete_duplicates();
        assert_eq!(ring, ring_of(&["2"]));
    }

    #[test]
    fn delete_duplicates_keeps_distinct() {
        let mut ring = ring_of(&["1", "2", "3"]);
        ring.delete_duplicates();
        assert_eq!(ring, ring_of(&["1", "2", "3"]));
    }

    #[test]
    fn delete_duplicates_all_equal() {
        let mut ring = ring_of(&["x", "x", "x", "x"]);
        ring.delete_duplicates();
        assert!(ring.is_empty());
    }

    #[test]
    fn delete_duplicates_run_at_back() {
        let mut ring = ring_of(&["a", "b", "b"]);
        ring.delete_duplicates();
        assert_eq!(ring, ring_of(&["a"]));
    }

    #[test]
    fn delete_duplicates_trivial() {
        let mut ring = Ring::new();
        ring.delete_duplicates();
        assert!(ring.is_empty());

        let mut ring = ring_of(&["a"]);
        ring.delete_duplicates();
        assert_eq!(ring, ring_of(&["a"]));
    }

    #[test]
    fn swap_pairs_odd_tail_stays() {
        let mut ring = ring_of(&["1", "2", "3", "4", "5"]);
        ring.swap_pairs();
        assert_eq!(ring, ring_of(&["2", "1", "4", "3", "5"]));
    }

    #[test]
    fn swap_pairs_even() {
        let mut ring = ring_of(&["1", "2", "3", "4"]);
        ring.swap_pairs();
        assert_eq!(ring, ring_of(&["2", "1", "4", "3"]));
    }

    #[test]
    fn swap_pairs_small() {
        let mut ring = Ring::new();
        ring.swap_pairs();
        assert!(ring.is_empty());

        let mut ring = ring_of(&["1"]);
        ring.swap_pairs();
        assert_eq!(ring, ring_of(&["1"]));

        let mut ring = ring_of(&["1", "2"]);
        ring.swap_pairs();
        assert_eq!(ring, ring_of(&["2", "1"]));
    }

    #[test]
    fn reverse_reverses() {
        let mut ring = ring_of(&["a", "b", "c", "d"]);
        ring.reverse();
        assert_eq!(ring, ring_of(&["d", "c", "b", "a"]));
        // the flipped ring must stay fully usable from both ends
        ring.push_front("e").unwrap();
        ring.push_back("f").unwrap();
        assert_eq!(ring, ring_of(&["e", "d", "c", "b", "a", "f"]));
    }

    #[test]
    fn reverse_is_involutive() {
        let original = ring_of(&["q", "w", "e", "r", "t", "y"]);
        let mut ring = ring_of(&["q", "w", "e", "r", "t", "y"]);
        ring.reverse();
        ring.reverse();
        assert_eq!(ring, original);
    }

    #[test]
    fn reverse_trivial() {
        let mut ring = Ring::new();
        ring.reverse();
        assert!(ring.is_empty());

        let mut ring = ring_of(&["a"]);
        ring.reverse();
        assert_eq!(ring, ring_of(&["a"]));
    }
}
