use crate::error::Error;
use crate::net::Net;
use crate::stats::Stats;
use crate::term::{Redex, Tag, Term};

/// ERA ~ LAM: erase a lambda.
///
/// The binder receives a `NUL` so anything parked there (or arriving later)
/// cancels against it, and the body is erased recursively.
pub(crate) fn eralam(
    net: &Net,
    era: Term,
    lam: Term,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    log::trace!("rule era-lam: {:?} ~ {:?}", era, lam);
    let l = lam.target();
    net.place(l + 1, Term::NUL, out)?;
    let body = net.swap(l + 2, Term::NUL);
    stats.erasures += 1;
    erase(net, body, stats);
    Ok(())
}

/// ERA ~ SUP: erase both superposed components.
pub(crate) fn erasup(net: &Net, era: Term, sup: Term, stats: &mut Stats) -> Result<(), Error> {
    log::trace!("rule era-sup: {:?} ~ {:?}", era, sup);
    let s = sup.target();
    let left = net.swap(s + 1, Term::NUL);
    let right = net.swap(s + 2, Term::NUL);
    stats.erasures += 1;
    erase(net, left, stats);
    erase(net, right, stats);
    Ok(())
}

/// APP ~ NUL: an application whose function was erased. The argument is
/// erased and the trivial value propagates out of the return slot, keeping
/// the cascade going through whatever consumes the result.
pub(crate) fn nulapp(
    net: &Net,
    app: Term,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    log::trace!("rule app-nul: {:?}", app);
    let a = app.target();
    let arg = net.swap(a + 1, Term::NUL);
    stats.erasures += 1;
    erase(net, arg, stats);
    net.place(a + 2, Term::NUL, out)
}

/// DUP ~ NUL: both copies of a trivial value are trivial.
pub(crate) fn nuldup(
    net: &Net,
    dup: Term,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    log::trace!("rule dup-nul: {:?}", dup);
    let d = dup.target();
    net.place(d + 1, Term::NUL, out)?;
    net.place(d + 2, Term::NUL, out)?;
    stats.erasures += 1;
    Ok(())
}

/// Recursively reclaims the subgraph hanging off `term`.
///
/// Variables and binder slots are boundaries, not storage: their other end
/// is reclaimed by whichever rule consumes it. Each three-word node has its
/// aux ports read-and-invalidated in one step, then whatever they held is
/// erased in turn.
pub(crate) fn erase(net: &Net, term: Term, stats: &mut Stats) {
    let mut stack = vec![term];
    while let Some(term) = stack.pop() {
        match term.tag() {
            Some(Tag::Lam) | Some(Tag::App) | Some(Tag::Sup) | Some(Tag::Dup) => {
                let base = term.target();
                stack.push(net.swap(base + 1, Term::NUL));
                stack.push(net.swap(base + 2, Term::NUL));
                stats.erasures += 1;
            }
            // VAR, SUB, NUL, ERA: single words with nothing behind them.
            _ => {}
        }
    }
}
