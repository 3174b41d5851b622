//! Filament-Lang: the surface front end for the Filament runtime.
//!
//! Takes a lambda-calculus-shaped expression (lambdas, applications,
//! `let`, `if`, numeric and boolean literals, binary `+`/`*`), Church-
//! encodes everything that is not pure lambda calculus, lowers the result
//! into an interaction net, and hands back a [`Program`] that can be
//! normalized and read back.
//!
//! ```
//! use filament_lang::{compile, Expr};
//!
//! // (λx. x) 42
//! let program = compile(&Expr::app(Expr::lam("x", Expr::var("x")), Expr::Num(42))).unwrap();
//! let stats = program.normalize().unwrap();
//! assert_eq!(stats.beta_reductions, 1);
//! assert_eq!(program.read_number().unwrap(), Some(42));
//! ```

mod ast;
mod compile;
mod desugar;
mod error;

pub use ast::{BinOp, Expr};
pub use error::CompileError;
pub use filament_net::{Halt, Stats, Value};

use filament_net::{readback, Loc, Net, Runtime, Term};

/// Default arena size for compiled programs, in words.
pub const DEFAULT_PROGRAM_WORDS: u64 = 1 << 22;

/// A compiled expression: the net plus the slot its result lands in.
pub struct Program {
    net: Net,
    root: Loc,
}

/// Compiles an expression into a net with the default arena size.
pub fn compile(expr: &Expr) -> Result<Program, CompileError> {
    compile_with_capacity(expr, DEFAULT_PROGRAM_WORDS)
}

/// Compiles an expression into a net with an explicit arena size.
pub fn compile_with_capacity(expr: &Expr, words: u64) -> Result<Program, CompileError> {
    let net = Net::with_capacity(words);
    let core = desugar::Desugar::new().lower(expr);
    let root_term = compile::Compiler::new(&net).compile(&core)?;
    let root = net.create_sub(0)?;
    net.move_into(root, root_term)?;
    log::debug!(
        "compiled program: {} words, {} staged pairs",
        net.words_used(),
        net.pending_redexes()
    );
    Ok(Program { net, root })
}

impl Program {
    /// Reduces the net to normal form on the current thread.
    pub fn normalize(&self) -> Result<Stats, Halt> {
        self.net.evaluate()
    }

    /// Reduces the net to normal form on a worker pool.
    pub fn normalize_parallel(&self, workers: usize) -> Result<Stats, Halt> {
        self.normalize_with(workers, None)
    }

    /// Reduces with a step budget; the sum of the rewrite counters never
    /// exceeds it.
    pub fn normalize_bounded(&self, max_steps: u64) -> Result<Stats, Halt> {
        self.net.evaluate_bounded(Some(max_steps))
    }

    /// Reduces on a worker pool with an optional step budget. A budgeted
    /// halt leaves the net resumable: the unprocessed pairs stay staged.
    pub fn normalize_with(&self, workers: usize, max_steps: Option<u64>) -> Result<Stats, Halt> {
        let mut runtime = Runtime::new(&self.net).workers(workers);
        if let Some(budget) = max_steps {
            runtime = runtime.max_steps(budget);
        }
        runtime.run()
    }

    /// Reads the result as a host value. Destructive: probes the root.
    pub fn readback(&self) -> Result<Value, Halt> {
        readback(&self.net, self.root_term())
    }

    /// Reads the result as a Church numeral, if it is one.
    pub fn read_number(&self) -> Result<Option<u64>, Halt> {
        filament_net::read_number(&self.net, self.root_term())
    }

    /// Reads the result as a Church boolean, if it is one.
    pub fn read_bool(&self) -> Result<Option<bool>, Halt> {
        filament_net::read_bool(&self.net, self.root_term())
    }

    /// DOT rendering of the net reachable from the root.
    pub fn visualize(&self) -> String {
        filament_net::visualize(&self.net, self.root_term())
    }

    /// The underlying net, for direct inspection.
    pub fn net(&self) -> &Net {
        &self.net
    }

    fn root_term(&self) -> Term {
        Term::var(self.root)
    }
}
