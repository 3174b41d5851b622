use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_deque::{Injector, Stealer, Worker as Deque};
use crossbeam_utils::Backoff;
use parking_lot::Mutex;

use crate::error::Error;
use crate::net::Net;
use crate::rules;
use crate::stats::Stats;
use crate::term::Redex;

/// A single reduction thread.
///
/// Each worker owns a LIFO deque of active pairs and pushes the pairs its
/// own rewrites create back onto it, keeping working sets hot. When the
/// deque runs dry it steals: first a batch from the global injector, then
/// from its peers. Quiescence is tracked with a shared pending-pair
/// counter: children are accounted before the parent pair is retired, so
/// the count can only reach zero once no work exists anywhere.
///
/// On any halt the worker hands its unclaimed pairs back to the net's
/// staging queue, the same invariant the single-threaded driver keeps: an
/// interrupted reduction leaves the net resumable.
pub(crate) struct Worker<'a> {
    pub id: usize,
    pub net: &'a Net,
    pub local: Deque<Redex>,
    pub stealers: &'a [Stealer<Redex>],
    pub injector: &'a Injector<Redex>,
    pub pending: &'a AtomicU64,
    pub shutdown: &'a AtomicBool,
    pub fault: &'a Mutex<Option<Error>>,
    pub steps: &'a AtomicU64,
    pub max_steps: Option<u64>,
}

impl<'a> Worker<'a> {
    /// Busy-loops over the queues until the net is quiescent, a fault is
    /// recorded, or the step budget runs out. Returns this worker's share
    /// of the statistics.
    pub fn run(self) -> Stats {
        log::debug!("worker {} entering reduction loop", self.id);
        let mut stats = Stats::default();
        let mut fresh = Vec::new();
        let backoff = Backoff::new();

        loop {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }
            let Some(redex) = self.find_task() else {
                if self.pending.load(Ordering::Acquire) == 0 {
                    break;
                }
                backoff.snooze();
                continue;
            };
            backoff.reset();

            if let Some(budget) = self.max_steps {
                if self.steps.load(Ordering::Relaxed) >= budget {
                    // The popped pair was never touched; hand it back.
                    self.net.push_redex(redex);
                    self.record_fault(Error::StepLimitReached { budget });
                    break;
                }
            }

            let before = stats.total();
            if let Err(error) = rules::apply(self.net, redex, &mut fresh, &mut stats) {
                // Children created before the rule failed are still real
                // pairs; only the failed pair itself is lost.
                for redex in fresh.drain(..) {
                    self.net.push_redex(redex);
                }
                self.record_fault(error);
                break;
            }
            self.steps
                .fetch_add(stats.total() - before, Ordering::Relaxed);

            // Account the children before retiring the parent so the
            // pending count never dips to zero while work remains.
            if !fresh.is_empty() {
                self.pending
                    .fetch_add(fresh.len() as u64, Ordering::Release);
                for redex in fresh.drain(..) {
                    self.local.push(redex);
                }
            }
            self.pending.fetch_sub(1, Ordering::Release);
        }
        // Whatever is still queued locally (a shutdown can interrupt any
        // worker mid-backlog) goes back to the staging queue.
        while let Some(redex) = self.local.pop() {
            self.net.push_redex(redex);
        }
        log::debug!(
            "worker {} exiting after {} rewrites",
            self.id,
            stats.total()
        );
        stats
    }

    fn find_task(&self) -> Option<Redex> {
        self.local.pop().or_else(|| {
            std::iter::repeat_with(|| {
                self.injector
                    .steal_batch_and_pop(&self.local)
                    .or_else(|| self.stealers.iter().map(|s| s.steal()).collect())
            })
            .find(|steal| !steal.is_retry())
            .and_then(|steal| steal.success())
        })
    }

    fn record_fault(&self, error: Error) {
        log::debug!("worker {} halting: {}", self.id, error);
        let mut slot = self.fault.lock();
        if slot.is_none() {
            *slot = Some(error);
        }
        self.shutdown.store(true, Ordering::Release);
    }
}
