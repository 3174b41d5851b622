use crossbeam_queue::SegQueue;

use crate::error::{Error, Halt};
use crate::heap::Heap;
use crate::rules;
use crate::stats::Stats;
use crate::term::{Loc, Redex, Tag, Term};

/// Every wiring chain must resolve within this many forwarding hops; a
/// longer chain means the net is malformed (most likely a variable cycle).
const WIRING_LIMIT: usize = 1 << 16;

/// Default arena size in words.
pub const DEFAULT_CAPACITY: u64 = 1 << 22;

/// An interaction net: the word arena plus the queue of active pairs.
///
/// Construction happens single-threaded through the `create_*` constructors
/// and the wiring operations [`Net::link`] and [`Net::move_into`]. Reduction
/// drains the queue, either in place with [`Net::evaluate`] or across
/// threads with [`crate::Runtime`], which shares the net immutably and
/// relies on the word-level atomics for correctness.
///
/// # Node layout
///
/// Three-word nodes occupy `[base, base + 2]`:
///
/// | node | `base` | `base + 1` | `base + 2` |
/// |------|--------|------------|------------|
/// | LAM  | principal `(Lam, base)` | binder slot `(Sub, id)` | body (positive) |
/// | APP  | principal `(App, base)` | argument (positive) | return slot `(Sub, base+2)` |
/// | DUP  | principal `(Dup, base)` | output slot | output slot |
/// | SUP  | principal `(Sup, base)` | component (positive) | component (positive) |
///
/// Variables and binder slots are single words allocated from the same
/// arena. Value ports accept any packed positive term; a caller wanting the
/// forwarding form passes `Term::var(loc)`.
pub struct Net {
    heap: Heap,
    redexes: SegQueue<Redex>,
}

impl Net {
    pub fn new() -> Net {
        Net::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(words: u64) -> Net {
        Net {
            heap: Heap::with_capacity(words),
            redexes: SegQueue::new(),
        }
    }

    // --- Arena passthroughs ---

    #[inline]
    pub fn alloc(&self, count: u64) -> Result<Loc, Error> {
        self.heap.alloc(count)
    }

    #[inline]
    pub fn get(&self, loc: Loc) -> Term {
        self.heap.get(loc)
    }

    #[inline]
    pub fn set(&self, loc: Loc, term: Term) {
        self.heap.set(loc, term)
    }

    #[inline]
    pub fn swap(&self, loc: Loc, term: Term) -> Term {
        self.heap.swap(loc, term)
    }

    #[inline]
    pub fn words_used(&self) -> u64 {
        self.heap.used()
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.heap.capacity()
    }

    // --- Constructors ---

    /// Allocates a lambda node: binder slot carrying `var_id`, body port
    /// initialized to `body`.
    pub fn create_lam(&self, var_id: u64, body: Term) -> Result<Loc, Error> {
        let base = self.alloc(3)?;
        self.set(base, Term::lam(base));
        self.set(base + 1, Term::sub(var_id));
        self.set(base + 2, body);
        Ok(base)
    }

    /// Allocates an application node around `arg`. The return slot at
    /// `base + 2` starts as a vacant binder carrying its own address.
    pub fn create_app(&self, arg: Term) -> Result<Loc, Error> {
        let base = self.alloc(3)?;
        self.set(base, Term::app(base));
        self.set(base + 1, arg);
        self.set(base + 2, Term::sub(base + 2));
        Ok(base)
    }

    /// Allocates a duplicator whose two output slots start vacant.
    pub fn create_dup(&self) -> Result<Loc, Error> {
        let base = self.alloc(3)?;
        self.set(base, Term::dup(base));
        self.set(base + 1, Term::sub(base + 1));
        self.set(base + 2, Term::sub(base + 2));
        Ok(base)
    }

    /// Allocates a superposition of two positive components.
    pub fn create_sup(&self, left: Term, right: Term) -> Result<Loc, Error> {
        let base = self.alloc(3)?;
        self.set(base, Term::sup(base));
        self.set(base + 1, left);
        self.set(base + 2, right);
        Ok(base)
    }

    /// Allocates a single word holding a variable occurrence.
    pub fn create_var(&self, var_id: u64) -> Result<Loc, Error> {
        let loc = self.alloc(1)?;
        self.set(loc, Term::var(var_id));
        Ok(loc)
    }

    /// Allocates a single vacant binder slot.
    pub fn create_sub(&self, var_id: u64) -> Result<Loc, Error> {
        let loc = self.alloc(1)?;
        self.set(loc, Term::sub(var_id));
        Ok(loc)
    }

    // --- Wiring protocol ---

    /// Wires a negative port to a positive term, staging any active pair on
    /// the net's own queue. This is the construction-time entry point.
    pub fn link(&self, neg: Term, pos: Term) -> Result<(), Error> {
        let mut fresh = Vec::new();
        self.wire(neg, pos, &mut fresh)?;
        for redex in fresh {
            self.redexes.push(redex);
        }
        Ok(())
    }

    /// Installs a positive term into the negative slot at `neg_loc`.
    pub fn move_into(&self, neg_loc: Loc, pos: Term) -> Result<(), Error> {
        let mut fresh = Vec::new();
        self.place(neg_loc, pos, &mut fresh)?;
        for redex in fresh {
            self.redexes.push(redex);
        }
        Ok(())
    }

    /// Core of `link`: resolves variable forwardings on the fly and pushes
    /// the active pair into `out` once both ends are principal.
    ///
    /// A variable is not an endpoint but a forwarding pointer: swapping the
    /// negative end into the pointed-at slot either completes the chain (the
    /// slot was a vacant `Sub`) or yields the term previously parked there,
    /// which becomes the new positive end. The trampoline keeps the chain
    /// walk bounded; exceeding [`WIRING_LIMIT`] reports a malformed net.
    pub(crate) fn wire(
        &self,
        neg: Term,
        mut pos: Term,
        out: &mut Vec<Redex>,
    ) -> Result<(), Error> {
        for _ in 0..WIRING_LIMIT {
            if !pos.is(Tag::Var) {
                out.push(Redex(neg, pos));
                return Ok(());
            }
            let slot = pos.target();
            let prev = self.heap.swap(slot, neg);
            if prev.is(Tag::Sub) {
                return Ok(());
            }
            // The slot already carried a term another wiring step parked
            // there; that term is the real positive end of this wire.
            pos = prev;
        }
        Err(Error::WiringOverflow {
            at: pos,
            limit: WIRING_LIMIT,
        })
    }

    /// Core of `move_into`: swaps the value in and, if the slot was not
    /// vacant, links the displaced negative term against the value.
    #[inline]
    pub(crate) fn place(
        &self,
        neg_loc: Loc,
        pos: Term,
        out: &mut Vec<Redex>,
    ) -> Result<(), Error> {
        let prev = self.heap.swap(neg_loc, pos);
        if prev.is(Tag::Sub) {
            return Ok(());
        }
        self.wire(prev, pos, out)
    }

    // --- Redex queue ---

    #[inline]
    pub(crate) fn push_redex(&self, redex: Redex) {
        self.redexes.push(redex);
    }

    /// Puts unprocessed pairs back on the staging queue so an interrupted
    /// reduction leaves the net resumable.
    fn restage(&self, stack: Vec<Redex>) {
        for redex in stack {
            self.redexes.push(redex);
        }
    }

    #[inline]
    pub(crate) fn pop_redex(&self) -> Option<Redex> {
        self.redexes.pop()
    }

    /// Number of staged active pairs (approximate under concurrency).
    pub fn pending_redexes(&self) -> usize {
        self.redexes.len()
    }

    // --- Single-threaded reduction ---

    /// Drains the redex queue in place, LIFO, with no step budget.
    pub fn evaluate(&self) -> Result<Stats, Halt> {
        self.evaluate_bounded(None)
    }

    /// Drains the redex queue in place, LIFO, halting with
    /// `StepLimitReached` once the counters sum to `max_steps`.
    pub fn evaluate_bounded(&self, max_steps: Option<u64>) -> Result<Stats, Halt> {
        self.evaluate_ordered(max_steps, Vec::pop)
    }

    /// Drains the redex queue with a caller-chosen pop strategy. The rule
    /// set is confluent on observable results, so any order is sound; this
    /// exists so tests can exercise orders other than the default LIFO.
    pub fn evaluate_ordered(
        &self,
        max_steps: Option<u64>,
        mut pick: impl FnMut(&mut Vec<Redex>) -> Option<Redex>,
    ) -> Result<Stats, Halt> {
        let mut stack = Vec::new();
        while let Some(redex) = self.redexes.pop() {
            stack.push(redex);
        }
        let mut stats = Stats::default();
        let mut fresh = Vec::new();
        while let Some(redex) = pick(&mut stack) {
            if let Some(budget) = max_steps {
                if stats.total() >= budget {
                    stack.push(redex);
                    self.restage(stack);
                    return Err(Halt::new(Error::StepLimitReached { budget }, stats));
                }
            }
            if let Err(error) = rules::apply(self, redex, &mut fresh, &mut stats) {
                stack.append(&mut fresh);
                self.restage(stack);
                return Err(Halt::new(error, stats));
            }
            stack.append(&mut fresh);
        }
        Ok(stats)
    }
}

impl Default for Net {
    fn default() -> Net {
        Net::new()
    }
}
