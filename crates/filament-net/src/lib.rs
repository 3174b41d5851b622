//! Filament-Net: a parallel interaction-combinator runtime.
//!
//! This crate is the execution core of the Filament language: a graph of
//! nodes connected by ports, rewritten by local rules until no active pairs
//! remain. A front end (see `filament-lang`) translates lambda terms into
//! the graph; this crate owns the memory layout, the wiring protocol, the
//! rewrite rules and the reduction drivers.
//!
//! # Architecture
//!
//! - [`Term`]: one machine word per port, an 8-bit tag plus a 56-bit target.
//! - [`Heap`]: the shared word arena, bump-allocated, mutated only through
//!   word-level atomics.
//! - [`Net`]: node constructors, the `link`/`move_into` wiring protocol,
//!   and a single-threaded reducer.
//! - [`Runtime`]: a work-stealing worker pool reducing a shared net.
//! - [`readback`](crate::readback()): shape-based recovery of Church
//!   numerals and booleans from a reduced net.
//!
//! # Thread safety
//!
//! Construction is single-threaded; reduction is not. The atomicity unit is
//! a single arena word: [`Heap::swap`] reads-and-invalidates a port in one
//! `AcqRel` exchange, which is all the wiring protocol and the rewrite
//! rules need. Workers coordinate through a global injector, per-worker
//! LIFO deques with stealers, and an atomic pending-pair counter for
//! quiescence; the first fault wins and stops the pool.
//!
//! # Usage
//!
//! ```
//! use filament_net::{Net, Runtime, Term};
//!
//! let net = Net::with_capacity(1 << 16);
//! // (λx. x) (λy. y)
//! let id = net.create_lam(0, Term::NUL).unwrap();
//! net.set(id + 2, Term::var(id + 1));
//! let arg = net.create_lam(1, Term::NUL).unwrap();
//! net.set(arg + 2, Term::var(arg + 1));
//! let app = net.create_app(Term::lam(arg)).unwrap();
//! net.link(Term::app(app), Term::lam(id)).unwrap();
//!
//! let stats = Runtime::new(&net).workers(2).run().unwrap();
//! assert_eq!(stats.beta_reductions, 1);
//! ```

mod error;
mod heap;
mod net;
mod readback;
mod rules;
mod runtime;
mod stats;
mod term;
mod viz;
mod worker;

pub use error::{Error, Halt};
pub use heap::Heap;
pub use net::{Net, DEFAULT_CAPACITY};
pub use readback::{read_bool, read_number, readback, Value};
pub use runtime::Runtime;
pub use stats::Stats;
pub use term::{Loc, Polarity, Redex, Tag, Term};
pub use viz::visualize;
