use crate::error::Error;
use crate::net::Net;
use crate::stats::Stats;
use crate::term::{Redex, Term};

/// APP ~ LAM: beta reduction.
///
/// ```text
///        arg --+          +-- binder
///              APP ~~~ LAM
///        ret --+          +-- body
///
/// After: binder <- arg, ret <- body
/// ```
///
/// Both aux reads invalidate their ports in the same step, so a racing
/// worker can never observe the half-rewritten node.
pub(crate) fn applam(
    net: &Net,
    app: Term,
    lam: Term,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    log::trace!("rule app-lam: {:?} ~ {:?}", app, lam);
    let a = app.target();
    let l = lam.target();

    let arg = net.swap(a + 1, Term::NUL);
    let body = net.swap(l + 2, Term::NUL);

    net.place(l + 1, arg, out)?;
    net.place(a + 2, body, out)?;

    stats.beta_reductions += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Tag;

    #[test]
    fn beta_routes_argument_and_body() {
        let net = Net::with_capacity(64);
        // identity: λx. x, with the body an occurrence of the binder
        let lam = net.create_lam(1, Term::NUL).unwrap();
        net.set(lam + 2, Term::var(lam + 1));
        // argument: a second lambda, used as an inert value
        let value = net.create_lam(2, Term::NUL).unwrap();
        let app = net.create_app(Term::lam(value)).unwrap();

        let mut out = Vec::new();
        let mut stats = Stats::default();
        applam(&net, Term::app(app), Term::lam(lam), &mut out, &mut stats).unwrap();

        // The binder slot received the argument, the return slot the body.
        assert_eq!(net.get(lam + 1), Term::lam(value));
        assert_eq!(net.get(app + 2), Term::var(lam + 1));
        // The consumed ports were invalidated.
        assert!(net.get(app + 1).is(Tag::Nul));
        assert!(net.get(lam + 2).is(Tag::Nul));
        assert_eq!(stats.beta_reductions, 1);
        assert_eq!(stats.total(), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn beta_into_parked_eraser_spawns_erasure_pair() {
        let net = Net::with_capacity(64);
        // λx. <nul> with x unused: the front end parks an eraser in the binder.
        let lam = net.create_lam(1, Term::NUL).unwrap();
        net.link(Term::ERA, Term::var(lam + 1)).unwrap();
        let value = net.create_lam(2, Term::NUL).unwrap();
        let app = net.create_app(Term::lam(value)).unwrap();

        let mut out = Vec::new();
        let mut stats = Stats::default();
        applam(&net, Term::app(app), Term::lam(lam), &mut out, &mut stats).unwrap();

        assert_eq!(out, vec![Redex(Term::ERA, Term::lam(value))]);
        assert_eq!(stats.beta_reductions, 1);
    }
}
