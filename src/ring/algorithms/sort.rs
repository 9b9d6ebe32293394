use std::ptr::NonNull;

use crate::ring::{Node, Ring};

/// Capacity of the pending-run array. Slot `i` normally holds a sorted run
/// of 2^i elements and the top slot keeps absorbing once full, so 32 slots
/// cover rings of up to 2^32 elements without recursion.
const PENDING_SLOTS: usize = 32;

impl Ring {
    /// Sorts the elements ascending by byte-wise lexicographic comparison
    /// of their payloads. Comparison is case-sensitive; no locale handling.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time. The only
    /// auxiliary storage is the fixed pending-run array; no node is
    /// allocated or released.
    ///
    /// # Current Implementation
    ///
    /// A bottom-up natural merge sort. The ring is consumed as a forward
    /// chain of singleton runs which are folded into a binary-counter
    /// array of pending runs; a final pass merges the surviving runs,
    /// rebuilds the `prev` links and closes the ring through the sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use qring::Ring;
    ///
    /// let mut ring = Ring::try_from_iter(["b", "c", "a"]).unwrap();
    /// ring.sort();
    /// assert_eq!(ring, Ring::try_from_iter(["a", "b", "c"]).unwrap());
    /// ```
    pub fn sort(&mut self) {
        let end = self.sentinel_node();
        let front = self.front_node();
        // nothing to do with fewer than two elements
        if front == end || unsafe { front.as_ref().next } == end {
            return;
        }

        // SAFETY: the `prev` links and the sentinel's own links go stale
        // while runs are being merged, but only `next` chains are followed
        // until `relink` restores the full invariant. Every node stays in
        // exactly one run at all times.
        unsafe {
            let mut pending: [Option<NonNull<Node>>; PENDING_SLOTS] = [None; PENDING_SLOTS];

            // The last element already points at the sentinel, so the input
            // chain is `end`-terminated for free once circularity is ignored.
            let mut node = front;
            while node != end {
                let mut singleton = node;
                node = singleton.as_ref().next;
                singleton.as_mut().next = end;

                // Binary-counter accumulation: carry the run through the
                // occupied low slots, merging as it goes, and park it in the
                // first empty one. A full array clamps into the top slot.
                let mut run = singleton;
                let mut i = 0;
                while i < PENDING_SLOTS {
                    match pending[i].take() {
                        Some(slot) => {
                            run = merge(end, slot, run);
                            i += 1;
                        }
                        None => break,
                    }
                }
                if i == PENDING_SLOTS {
                    i -= 1;
                }
                pending[i] = Some(run);
            }

            // Fold the surviving runs, low index to high. A slot always
            // holds earlier input than everything folded so far, so it is
            // passed as the tie-winning side.
            let mut sorted = end;
            for slot in pending.iter_mut() {
                if let Some(run) = slot.take() {
                    sorted = merge(end, run, sorted);
                }
            }

            relink(end, sorted);
        }
    }
}

/// Merges two sorted `end`-terminated runs into one.
///
/// On equal payloads the head of `a` wins, so the caller must pass the run
/// holding the earlier input as `a`; that is what keeps the sort stable.
unsafe fn merge(end: NonNull<Node>, mut a: NonNull<Node>, mut b: NonNull<Node>) -> NonNull<Node> {
    if a == end {
        return b;
    }
    if b == end {
        return a;
    }
    let head = take_smaller(&mut a, &mut b);
    let mut tail = head;
    while a != end && b != end {
        let node = take_smaller(&mut a, &mut b);
        tail.as_mut().next = node;
        tail = node;
    }
    tail.as_mut().next = if a != end { a } else { b };
    head
}

/// Unlinks and returns the smaller of the two run heads, preferring `a` on
/// ties.
unsafe fn take_smaller(a: &mut NonNull<Node>, b: &mut NonNull<Node>) -> NonNull<Node> {
    let run = if a.as_ref().value <= b.as_ref().value {
        a
    } else {
        b
    };
    let node = *run;
    *run = node.as_ref().next;
    node
}

/// Rebuilds every `prev` link from the sorted forward chain starting at
/// `head` and closes the ring through the sentinel.
unsafe fn relink(mut sentinel: NonNull<Node>, head: NonNull<Node>) {
    sentinel.as_mut().next = head;
    let mut prev = sentinel;
    let mut node = head;
    while node != sentinel {
        let mut current = node;
        current.as_mut().prev = prev;
        prev = current;
        node = current.as_ref().next;
    }
    sentinel.as_mut().prev = prev;
}

#[cfg(test)]
mod tests {
    use crate::ring::{Node, Ring};

    fn ring_of(values: &[&str]) -> Ring {
        Ring::try_from_iter(values).unwrap()
    }

    /// Element node addresses in traversal order, for identity tracking.
    fn node_addrs(ring: &Ring) -> Vec<*const Node> {
        let end = ring.sentinel_node();
        let mut addrs = Vec::new();
        let mut node = ring.front_node();
        while node != end {
            addrs.push(node.as_ptr() as *const Node);
            node = unsafe { node.as_ref().next };
        }
        addrs
    }

    /// Walks backward via `prev` to check the ring is well-formed again.
    fn backward_values(ring: &Ring) -> Vec<String> {
        let end = ring.sentinel_node();
        let mut values = Vec::new();
        let mut node = ring.back_node();
        while node != end {
            let current = unsafe { node.as_ref() };
            values.push(current.value.clone());
            node = current.prev;
        }
        values
    }

    #[test]
    fn sort_small() {
        let mut ring = Ring::new();
        ring.sort();
        assert!(ring.is_empty());

        let mut ring = ring_of(&["z"]);
        ring.sort();
        assert_eq!(ring, ring_of(&["z"]));

        let mut ring = ring_of(&["b", "a"]);
        ring.sort();
        assert_eq!(ring, ring_of(&["a", "b"]));
    }

    #[test]
    fn sort_basic() {
        let mut ring = ring_of(&["pear", "apple", "plum", "fig", "kiwi"]);
        ring.sort();
        assert_eq!(ring, ring_of(&["apple", "fig", "kiwi", "pear", "plum"]));
    }

    #[test]
    fn sort_already_sorted_and_reversed() {
        let sorted = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut ring = ring_of(&sorted);
        ring.sort();
        assert_eq!(ring, ring_of(&sorted));

        let mut reversed: Vec<&str> = sorted.to_vec();
        reversed.reverse();
        let mut ring = ring_of(&reversed);
        ring.sort();
        assert_eq!(ring, ring_of(&sorted));
    }

    #[test]
    fn sort_is_byte_wise_and_case_sensitive() {
        let mut ring = ring_of(&["banana", "Banana", "apple", "Apple"]);
        ring.sort();
        // uppercase bytes order before lowercase ones
        assert_eq!(ring, ring_of(&["Apple", "Banana", "apple", "banana"]));
    }

    #[test]
    fn sort_restores_circularity() {
        let mut ring = ring_of(&["d", "b", "e", "a", "c"]);
        ring.sort();
        assert_eq!(backward_values(&ring), ["e", "d", "c", "b", "a"]);
        // both ends must be splicable again
        ring.push_front("_").unwrap();
        ring.push_back("f").unwrap();
        assert_eq!(ring, ring_of(&["_", "a", "b", "c", "d", "e", "f"]));
    }

    #[test]
    fn sort_matches_stable_vec_sort() {
        // enough elements to occupy several pending slots at once
        let values: Vec<String> = (0..100)
            .map(|i| format!("k{:02}", (i * 37) % 50))
            .collect();
        let mut ring = Ring::try_from_iter(&values).unwrap();
        ring.sort();

        let mut expected = values.clone();
        expected.sort();
        let sorted: Vec<String> = ring.into_iter().collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn sort_keeps_equal_elements_in_input_order() {
        // payloads collide on purpose; node identity tells them apart
        let mut ring = ring_of(&["b", "a", "b", "a", "b", "a"]);
        let before = node_addrs(&ring);
        let (a_nodes, b_nodes): (Vec<_>, Vec<_>) = (
            vec![before[1], before[3], before[5]],
            vec![before[0], before[2], before[4]],
        );

        ring.sort();
        assert_eq!(ring, ring_of(&["a", "a", "a", "b", "b", "b"]));

        let after = node_addrs(&ring);
        assert_eq!(&after[..3], &a_nodes[..], "equal 'a's must keep order");
        assert_eq!(&after[3..], &b_nodes[..], "equal 'b's must keep order");
    }

    #[test]
    fn sort_preserves_multiset() {
        let values = ["m", "c", "m", "a", "z", "c", "m"];
        let mut ring = ring_of(&values);
        ring.sort();
        assert_eq!(ring.len(), values.len());

        let mut expected: Vec<&str> = values.to_vec();
        expected.sort_unstable();
        let sorted: Vec<String> = ring.into_iter().collect();
        assert_eq!(sorted, expected);
    }
}
