//! Lowering of the surface language to the pure lambda core.
//!
//! Literals and operators disappear here, replaced by their Church
//! encodings; what remains is exactly what the net compiler knows how to
//! wire: variables, lambdas and applications.

use crate::ast::{BinOp, Expr};

/// The pure core. Binder names are kept as strings; `Desugar` mints fresh
/// ones (with a quote character no surface name contains) for the binders
/// the encodings introduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Core {
    Var(String),
    Lam(String, Box<Core>),
    App(Box<Core>, Box<Core>),
}

impl Core {
    fn var(name: &str) -> Core {
        Core::Var(name.to_string())
    }

    fn lam(param: String, body: Core) -> Core {
        Core::Lam(param, Box::new(body))
    }

    fn app(fun: Core, arg: Core) -> Core {
        Core::App(Box::new(fun), Box::new(arg))
    }
}

pub(crate) struct Desugar {
    fresh: u64,
}

impl Desugar {
    pub fn new() -> Desugar {
        Desugar { fresh: 0 }
    }

    fn fresh(&mut self, stem: &str) -> String {
        self.fresh += 1;
        format!("{stem}'{}", self.fresh)
    }

    pub fn lower(&mut self, expr: &Expr) -> Core {
        match expr {
            Expr::Var(name) => Core::var(name),
            Expr::Lam(param, body) => Core::lam(param.clone(), self.lower(body)),
            Expr::App(fun, arg) => Core::app(self.lower(fun), self.lower(arg)),
            // let x = v in b  ~>  (λx. b) v
            Expr::Let(name, value, body) => Core::app(
                Core::lam(name.clone(), self.lower(body)),
                self.lower(value),
            ),
            // Booleans are selectors, so `if` is bare application.
            Expr::If(cond, then, els) => Core::app(
                Core::app(self.lower(cond), self.lower(then)),
                self.lower(els),
            ),
            // n  ~>  λf. λx. f (f (... (f x)))
            Expr::Num(n) => {
                let f = self.fresh("f");
                let x = self.fresh("x");
                let mut body = Core::var(&x);
                for _ in 0..*n {
                    body = Core::app(Core::var(&f), body);
                }
                Core::lam(f, Core::lam(x, body))
            }
            // true  ~>  λa. λb. a      false  ~>  λa. λb. b
            Expr::Bool(selector) => {
                let a = self.fresh("a");
                let b = self.fresh("b");
                let picked = if *selector { &a } else { &b };
                let body = Core::var(picked);
                Core::lam(a, Core::lam(b, body))
            }
            // a + b  ~>  λf. λx. a f (b f x)
            Expr::BinOp(BinOp::Add, lhs, rhs) => {
                let f = self.fresh("f");
                let x = self.fresh("x");
                let lhs = self.lower(lhs);
                let rhs = self.lower(rhs);
                let body = Core::app(
                    Core::app(lhs, Core::var(&f)),
                    Core::app(Core::app(rhs, Core::var(&f)), Core::var(&x)),
                );
                Core::lam(f, Core::lam(x, body))
            }
            // a * b  ~>  λf. a (b f)
            Expr::BinOp(BinOp::Mul, lhs, rhs) => {
                let f = self.fresh("f");
                let lhs = self.lower(lhs);
                let rhs = self.lower(rhs);
                let body = Core::app(lhs, Core::app(rhs, Core::var(&f)));
                Core::lam(f, body)
            }
        }
    }
}
