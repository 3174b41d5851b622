//! Lowering of the lambda core into an interaction net.
//!
//! The compiler walks the core bottom-up through the net's construction
//! contract. Linearity is its one real job: every binder gets a unique
//! identifier, a parked eraser when it is never used, and a duplicator
//! chain fanning its slot out when it is used more than once. Each variable
//! occurrence then consumes exactly one prepared forwarding term.

use std::collections::{HashMap, VecDeque};

use filament_net::{Net, Term};

use crate::desugar::Core;
use crate::error::CompileError;

pub(crate) struct Compiler<'n> {
    net: &'n Net,
    next_binder: u64,
    /// Per-name stack of supplies, innermost binder last, so shadowing
    /// resolves to the nearest enclosing lambda.
    scopes: HashMap<String, Vec<VecDeque<Term>>>,
}

impl<'n> Compiler<'n> {
    pub fn new(net: &'n Net) -> Compiler<'n> {
        Compiler {
            net,
            next_binder: 1,
            scopes: HashMap::new(),
        }
    }

    pub fn compile(&mut self, core: &Core) -> Result<Term, CompileError> {
        match core {
            Core::Var(name) => self.use_occurrence(name),
            Core::Lam(param, body) => {
                let id = self.next_binder;
                self.next_binder += 1;
                let lam = self.net.create_lam(id, Term::NUL)?;
                let supply = self.fan_out(lam + 1, occurrences(body, param))?;
                self.scopes.entry(param.clone()).or_default().push(supply);
                let body = self.compile(body);
                self.scopes
                    .get_mut(param)
                    .expect("scope pushed above")
                    .pop();
                self.net.set(lam + 2, body?);
                Ok(Term::lam(lam))
            }
            Core::App(fun, arg) => {
                let arg = self.compile(arg)?;
                let app = self.net.create_app(arg)?;
                let fun = self.compile(fun)?;
                self.net.link(Term::app(app), fun)?;
                Ok(Term::var(app + 2))
            }
        }
    }

    /// Prepares `uses` forwarding terms for the binder slot at `slot`:
    /// none (eraser parked), one (the slot itself), or a duplicator chain.
    fn fan_out(&mut self, slot: u64, uses: u64) -> Result<VecDeque<Term>, CompileError> {
        match uses {
            0 => {
                self.net.link(Term::ERA, Term::var(slot))?;
                Ok(VecDeque::new())
            }
            1 => Ok(VecDeque::from([Term::var(slot)])),
            _ => {
                let mut supply = VecDeque::with_capacity(uses as usize);
                let mut slot = slot;
                for _ in 0..uses - 1 {
                    let dup = self.net.create_dup()?;
                    self.net.link(Term::dup(dup), Term::var(slot))?;
                    supply.push_back(Term::var(dup + 1));
                    slot = dup + 2;
                }
                supply.push_back(Term::var(slot));
                Ok(supply)
            }
        }
    }

    fn use_occurrence(&mut self, name: &str) -> Result<Term, CompileError> {
        let supply = self
            .scopes
            .get_mut(name)
            .and_then(|stack| stack.last_mut())
            .ok_or_else(|| CompileError::Unbound(name.to_string()))?;
        supply
            .pop_front()
            .ok_or_else(|| CompileError::SupplyExhausted(name.to_string()))
    }
}

/// Free occurrences of `name` in `core`, respecting shadowing.
fn occurrences(core: &Core, name: &str) -> u64 {
    match core {
        Core::Var(v) => (v == name) as u64,
        Core::Lam(param, body) => {
            if param == name {
                0
            } else {
                occurrences(body, name)
            }
        }
        Core::App(fun, arg) => occurrences(fun, name) + occurrences(arg, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filament_net::Tag;

    fn core_of(expr: &crate::ast::Expr) -> Core {
        crate::desugar::Desugar::new().lower(expr)
    }

    #[test]
    fn unused_binder_gets_parked_eraser() {
        let net = Net::with_capacity(1 << 10);
        let core = core_of(&crate::ast::Expr::lam(
            "x",
            crate::ast::Expr::lam("y", crate::ast::Expr::var("x")),
        ));
        let term = Compiler::new(&net).compile(&core).unwrap();
        assert!(term.is(Tag::Lam));
        let outer = term.target();
        let inner = net.get(outer + 2).target();
        assert!(net.get(inner + 1).is(Tag::Era));
    }

    #[test]
    fn shared_binder_gets_duplicator_chain() {
        let net = Net::with_capacity(1 << 10);
        // λx. x x
        let core = core_of(&crate::ast::Expr::lam(
            "x",
            crate::ast::Expr::app(crate::ast::Expr::var("x"), crate::ast::Expr::var("x")),
        ));
        let term = Compiler::new(&net).compile(&core).unwrap();
        assert!(net.get(term.target() + 1).is(Tag::Dup));
    }

    #[test]
    fn unbound_variable_is_rejected() {
        let net = Net::with_capacity(1 << 10);
        let err = Compiler::new(&net)
            .compile(&Core::Var("ghost".to_string()))
            .unwrap_err();
        assert!(matches!(err, CompileError::Unbound(name) if name == "ghost"));
    }

    #[test]
    fn shadowing_resolves_to_nearest_binder() {
        let net = Net::with_capacity(1 << 10);
        // λx. λx. x: the occurrence belongs to the inner binder.
        let core = core_of(&crate::ast::Expr::lam(
            "x",
            crate::ast::Expr::lam("x", crate::ast::Expr::var("x")),
        ));
        let term = Compiler::new(&net).compile(&core).unwrap();
        let outer = term.target();
        // Outer binder unused: eraser parked.
        assert!(net.get(outer + 1).is(Tag::Era));
        let inner = net.get(outer + 2).target();
        let body = net.get(inner + 2);
        assert_eq!(body, Term::var(inner + 1));
    }
}
