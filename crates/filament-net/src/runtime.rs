use std::sync::atomic::{AtomicBool, AtomicU64};
use std::time::Instant;

use crossbeam_deque::{Injector, Steal, Worker as Deque};
use parking_lot::Mutex;

use crate::error::Halt;
use crate::net::Net;
use crate::stats::Stats;
use crate::worker::Worker;

/// The parallel reduction driver.
///
/// Shares the net immutably across a pool of workers; the arena's word
/// atomics are the only synchronization the rewrites themselves need. The
/// driver seeds the global injector from the net's staged pairs, joins the
/// pool on quiescence and merges the per-worker statistics.
pub struct Runtime<'n> {
    net: &'n Net,
    workers: usize,
    max_steps: Option<u64>,
}

impl<'n> Runtime<'n> {
    pub fn new(net: &'n Net) -> Runtime<'n> {
        Runtime {
            net,
            workers: num_cpus::get(),
            max_steps: None,
        }
    }

    /// Overrides the worker count (defaults to hardware parallelism).
    pub fn workers(mut self, count: usize) -> Runtime<'n> {
        self.workers = count.max(1);
        self
    }

    /// Halts with `StepLimitReached` once the counters sum to `budget`.
    pub fn max_steps(mut self, budget: u64) -> Runtime<'n> {
        self.max_steps = Some(budget);
        self
    }

    /// Runs the pool to quiescence and returns the merged statistics, or
    /// the first fault together with the statistics gathered so far.
    pub fn run(self) -> Result<Stats, Halt> {
        let injector = Injector::new();
        let mut seeded: u64 = 0;
        while let Some(redex) = self.net.pop_redex() {
            injector.push(redex);
            seeded += 1;
        }
        if seeded == 0 {
            return Ok(Stats::default());
        }

        let pending = AtomicU64::new(seeded);
        let shutdown = AtomicBool::new(false);
        let fault = Mutex::new(None);
        let steps = AtomicU64::new(0);

        let deques: Vec<Deque<_>> = (0..self.workers).map(|_| Deque::new_lifo()).collect();
        let stealers: Vec<_> = deques.iter().map(Deque::stealer).collect();

        log::info!(
            "starting reduction: {} workers, {} initial pairs",
            self.workers,
            seeded
        );
        let started = Instant::now();

        let mut stats = Stats::default();
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for (id, local) in deques.into_iter().enumerate() {
                let worker = Worker {
                    id,
                    net: self.net,
                    local,
                    stealers: &stealers,
                    injector: &injector,
                    pending: &pending,
                    shutdown: &shutdown,
                    fault: &fault,
                    steps: &steps,
                    max_steps: self.max_steps,
                };
                handles.push(scope.spawn(move || worker.run()));
            }
            for handle in handles {
                // Workers never panic; a poisoned join would be a bug here.
                stats.merge(&handle.join().expect("reduction worker panicked"));
            }
        });

        // Workers hand their local leftovers back when they halt; pairs
        // still sitting in the global injector go back the same way, so an
        // interrupted reduction can be resumed from the net's own queue.
        loop {
            match injector.steal() {
                Steal::Success(redex) => self.net.push_redex(redex),
                Steal::Empty => break,
                Steal::Retry => {}
            }
        }

        let elapsed = started.elapsed();
        match fault.into_inner() {
            Some(error) => {
                log::info!("reduction halted: {}", error);
                Err(Halt::new(error, stats))
            }
            None => {
                log::info!("reduction complete:\n{}", stats.show(elapsed));
                Ok(stats)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::term::Term;

    /// Builds `(λx. x) (λy. y)` and staged the beta pair.
    fn identity_applied(net: &Net) -> u64 {
        let id_outer = net.create_lam(1, Term::NUL).unwrap();
        net.set(id_outer + 2, Term::var(id_outer + 1));
        let id_inner = net.create_lam(2, Term::NUL).unwrap();
        net.set(id_inner + 2, Term::var(id_inner + 1));
        let app = net.create_app(Term::lam(id_inner)).unwrap();
        net.link(Term::app(app), Term::lam(id_outer)).unwrap();
        app + 2
    }

    #[test]
    fn empty_net_is_already_quiescent() {
        let net = Net::with_capacity(16);
        let stats = Runtime::new(&net).workers(2).run().unwrap();
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn single_beta_across_worker_counts() {
        for workers in [1, 2, 4] {
            let net = Net::with_capacity(64);
            let ret = identity_applied(&net);
            let stats = Runtime::new(&net).workers(workers).run().unwrap();
            assert_eq!(stats.beta_reductions, 1, "workers = {workers}");
            assert!(net.get(ret).is(crate::term::Tag::Var));
        }
    }

    #[test]
    fn step_budget_halts_cleanly() {
        let net = Net::with_capacity(64);
        identity_applied(&net);
        let halt = Runtime::new(&net).workers(1).max_steps(0).run().unwrap_err();
        assert!(matches!(halt.error, Error::StepLimitReached { budget: 0 }));
        assert_eq!(halt.stats, Stats::default());
    }

    #[test]
    fn halted_run_leaves_net_resumable() {
        let net = Net::with_capacity(128);
        // Two independent beta pairs; a one-step budget interrupts after
        // the first.
        let ret_a = identity_applied(&net);
        let ret_b = identity_applied(&net);
        let halt = Runtime::new(&net).workers(1).max_steps(1).run().unwrap_err();
        assert!(matches!(halt.error, Error::StepLimitReached { budget: 1 }));
        assert_eq!(halt.stats.total(), 1);

        // The unprocessed pair went back to the staging queue; finishing
        // sequentially rewrites it.
        assert_eq!(net.pending_redexes(), 1);
        let stats = net.evaluate().unwrap();
        assert_eq!(stats.beta_reductions, 1);
        assert!(net.get(ret_a).is(crate::term::Tag::Var));
        assert!(net.get(ret_b).is(crate::term::Tag::Var));
    }

    #[test]
    fn budget_and_workers_compose() {
        // A budget must interrupt a multi-worker pool too, and leave the
        // net resumable to the same normal form.
        let net = Net::with_capacity(1 << 14);
        let mut rets = Vec::new();
        for _ in 0..8 {
            rets.push(identity_applied(&net));
        }
        let halt = Runtime::new(&net).workers(4).max_steps(1).run().unwrap_err();
        assert!(matches!(halt.error, Error::StepLimitReached { budget: 1 }));
        // The budget check is cooperative: each worker can apply at most
        // one rewrite before observing the exhausted budget.
        assert!(halt.stats.total() <= 4);

        let resumed = net.evaluate().unwrap();
        assert_eq!(halt.stats.beta_reductions + resumed.beta_reductions, 8);
        for ret in rets {
            assert!(net.get(ret).is(crate::term::Tag::Var));
        }
    }
}
