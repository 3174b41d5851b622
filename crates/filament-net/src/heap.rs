use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Error;
use crate::term::{Loc, Term};

/// The shared word arena backing all nodes.
///
/// Storage is a fixed slab of atomic words with a monotonically increasing
/// bump cursor. Construction writes with relaxed stores; everything the
/// reduction engine does cross-thread goes through [`Heap::swap`], whose
/// acquire/release ordering makes a rewrite's port writes visible as a unit
/// to workers racing on the same nodes.
///
/// There is no compaction and no free list: nodes are reclaimed only
/// logically, by the erasure rules overwriting their ports with `NUL`.
pub struct Heap {
    words: Box<[AtomicU64]>,
    next: AtomicU64,
}

impl Heap {
    /// Creates an arena with space for `capacity` words.
    pub fn with_capacity(capacity: u64) -> Heap {
        let words = (0..capacity).map(|_| AtomicU64::new(0)).collect();
        Heap {
            words,
            next: AtomicU64::new(0),
        }
    }

    /// Reserves `count` contiguous words and returns the base offset.
    ///
    /// Thread-safe: the cursor is a relaxed fetch-add, so concurrent callers
    /// always receive disjoint ranges. Fails with `ArenaExhausted` when the
    /// slab cannot satisfy the request; the cursor is not rolled back.
    #[inline]
    pub fn alloc(&self, count: u64) -> Result<Loc, Error> {
        let base = self.next.fetch_add(count, Ordering::Relaxed);
        let capacity = self.words.len() as u64;
        if base + count > capacity {
            return Err(Error::ArenaExhausted {
                requested: count,
                used: base.min(capacity),
                capacity,
            });
        }
        Ok(base)
    }

    /// Reads and unpacks the word at `loc`.
    #[inline(always)]
    pub fn get(&self, loc: Loc) -> Term {
        Term::from_u64(self.words[loc as usize].load(Ordering::Acquire))
    }

    /// Plain store, for single-threaded construction only.
    #[inline(always)]
    pub fn set(&self, loc: Loc, term: Term) {
        self.words[loc as usize].store(term.as_u64(), Ordering::Relaxed);
    }

    /// Atomically exchanges the word at `loc`, returning the previous
    /// occupant. This is the fundamental primitive of the wiring protocol:
    /// it reads and invalidates a port in one linearizable step.
    #[inline(always)]
    pub fn swap(&self, loc: Loc, term: Term) -> Term {
        Term::from_u64(self.words[loc as usize].swap(term.as_u64(), Ordering::AcqRel))
    }

    /// Number of words handed out so far.
    #[inline]
    pub fn used(&self) -> u64 {
        self.next.load(Ordering::Relaxed).min(self.words.len() as u64)
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.words.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Tag;
    use std::sync::Arc;

    #[test]
    fn alloc_returns_disjoint_contiguous_ranges() {
        let heap = Heap::with_capacity(64);
        let mut expected = 0;
        for count in [3, 1, 3, 2, 1] {
            let base = heap.alloc(count).unwrap();
            assert_eq!(base, expected);
            expected += count;
        }
        assert_eq!(heap.used(), expected);
    }

    #[test]
    fn alloc_fails_when_exhausted() {
        let heap = Heap::with_capacity(4);
        heap.alloc(3).unwrap();
        let err = heap.alloc(2).unwrap_err();
        assert!(matches!(err, Error::ArenaExhausted { requested: 2, .. }));
    }

    #[test]
    fn concurrent_alloc_stays_disjoint() {
        let heap = Arc::new(Heap::with_capacity(8 * 1024));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let heap = Arc::clone(&heap);
            handles.push(std::thread::spawn(move || {
                (0..128).map(|_| heap.alloc(3).unwrap()).collect::<Vec<_>>()
            }));
        }
        let mut all: Vec<Loc> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        for pair in all.windows(2) {
            assert!(pair[1] - pair[0] >= 3, "overlapping ranges at {pair:?}");
        }
    }

    #[test]
    fn swap_returns_previous_occupant() {
        let heap = Heap::with_capacity(8);
        heap.set(2, Term::sub(7));
        let prev = heap.swap(2, Term::var(5));
        assert_eq!(prev, Term::sub(7));
        assert!(heap.get(2).is(Tag::Var));
        assert_eq!(heap.get(2).target(), 5);
    }
}
