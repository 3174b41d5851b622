use crate::error::Error;
use crate::net::Net;
use crate::stats::Stats;
use crate::term::{Redex, Tag, Term};

/// DUP ~ LAM: duplicate a lambda.
///
/// The lambda is cloned into two copies whose shared bound variable becomes
/// a superposition of the copies' binders, while the original body feeds a
/// fresh duplicator whose outputs are the copies' bodies:
///
/// ```text
///   dup(a, b) ~ λx. M
///     a <- λx1. M1,  b <- λx2. M2
///     x <- sup(x1, x2)
///     dup(M1, M2) ~ M
/// ```
pub(crate) fn duplam(
    net: &Net,
    dup: Term,
    lam: Term,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    log::trace!("rule dup-lam: {:?} ~ {:?}", dup, lam);
    let d = dup.target();
    let l = lam.target();

    let body = net.swap(l + 2, Term::NUL);
    // Keep the binder's identifier on the copies when it is still readable.
    let binder = net.get(l + 1);
    let var_id = if binder.is(Tag::Sub) { binder.target() } else { 0 };

    let copy1 = net.alloc(3)?;
    let copy2 = net.alloc(3)?;
    let body_dup = net.create_dup()?;
    net.set(copy1, Term::lam(copy1));
    net.set(copy1 + 1, Term::sub(var_id));
    net.set(copy1 + 2, Term::var(body_dup + 1));
    net.set(copy2, Term::lam(copy2));
    net.set(copy2 + 1, Term::sub(var_id));
    net.set(copy2 + 2, Term::var(body_dup + 2));

    let sup = net.create_sup(Term::var(copy1 + 1), Term::var(copy2 + 1))?;

    net.place(l + 1, Term::sup(sup), out)?;
    net.place(d + 1, Term::lam(copy1), out)?;
    net.place(d + 2, Term::lam(copy2), out)?;
    net.wire(Term::dup(body_dup), body, out)?;

    stats.duplications += 1;
    Ok(())
}

/// DUP ~ SUP: matched pair annihilation.
///
/// The superposition's components route pairwise into the duplicator's
/// output slots; nothing else is touched. Superposition labels are not
/// tracked; the rule set is confluent up to them.
pub(crate) fn dupsup(
    net: &Net,
    dup: Term,
    sup: Term,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    log::trace!("rule dup-sup: {:?} ~ {:?}", dup, sup);
    let d = dup.target();
    let s = sup.target();

    let left = net.swap(s + 1, Term::NUL);
    let right = net.swap(s + 2, Term::NUL);
    net.place(d + 1, left, out)?;
    net.place(d + 2, right, out)?;

    stats.annihilations += 1;
    Ok(())
}
