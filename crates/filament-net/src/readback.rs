//! Conversion of reduced nets back into host values.
//!
//! Readback is a destructive probe: the root value is applied to two fresh
//! free variables and the net reduced again. A Church numeral `n` leaves a
//! spine of `n` pending applications of the first variable ending at the
//! second; `λx.λy.x` returns the first variable itself. The walk over the
//! probe result is deliberately conservative: anything that does not match
//! one of those shapes exactly reads back as an opaque function.

use crate::error::Halt;
use crate::net::Net;
use crate::term::{Loc, Tag, Term};

/// A host-level view of a normalized term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Number(u64),
    Bool(bool),
    Function,
}

/// What the probe resolved to.
enum Probe {
    /// The first sentinel came back: a true-selector.
    First,
    /// The second sentinel came back: Church zero (identically, `false`).
    Second,
    /// A spine of `n` applications of the first sentinel.
    Spine(u64),
    Opaque,
}

/// Reads the value rooted at `root`. Consumes the term: the probe wires it
/// into fresh applications and reduces them in place.
///
/// Church zero and `λx.λy.y` are the same term; the generic probe reports
/// it as `Number(0)`. Use [`read_bool`] when a boolean is expected.
pub fn readback(net: &Net, root: Term) -> Result<Value, Halt> {
    Ok(match probe(net, root)? {
        Probe::First => Value::Bool(true),
        Probe::Second => Value::Number(0),
        Probe::Spine(n) => Value::Number(n),
        Probe::Opaque => Value::Function,
    })
}

/// Reads a Church numeral, or `None` if the term is not numeral-shaped.
pub fn read_number(net: &Net, root: Term) -> Result<Option<u64>, Halt> {
    Ok(match probe(net, root)? {
        Probe::Second => Some(0),
        Probe::Spine(n) => Some(n),
        _ => None,
    })
}

/// Reads a Church boolean, or `None` if the term is not selector-shaped.
pub fn read_bool(net: &Net, root: Term) -> Result<Option<bool>, Halt> {
    Ok(match probe(net, root)? {
        Probe::First => Some(true),
        Probe::Second => Some(false),
        _ => None,
    })
}

/// Applies `root` to two fresh free variables, reduces, and classifies the
/// result.
fn probe(net: &Net, root: Term) -> Result<Probe, Halt> {
    let stats = crate::stats::Stats::default();
    let wrap = |e| Halt::new(e, stats.clone());

    let first = net.create_sub(0).map_err(wrap)?;
    let second = net.create_sub(0).map_err(wrap)?;

    let app1 = net.create_app(Term::var(first)).map_err(wrap)?;
    net.link(Term::app(app1), root).map_err(wrap)?;
    let app2 = net.create_app(Term::var(second)).map_err(wrap)?;
    net.link(Term::app(app2), Term::var(app1 + 2)).map_err(wrap)?;

    let probe_stats = net.evaluate()?;
    log::debug!(
        "readback probe reduced in {} rewrites",
        probe_stats.total()
    );

    Ok(classify(net, app2 + 2, first, second))
}

fn classify(net: &Net, result_slot: Loc, first: Loc, second: Loc) -> Probe {
    let limit = net.words_used();
    let mut count: u64 = 0;
    let mut cursor = resolve(net, net.get(result_slot), limit);
    loop {
        if !cursor.is(Tag::Var) {
            return Probe::Opaque;
        }
        let slot = cursor.target();
        if slot == second {
            return if count == 0 { Probe::Second } else { Probe::Spine(count) };
        }
        if slot == first {
            return if count == 0 { Probe::First } else { Probe::Opaque };
        }
        // Otherwise the cursor must sit in the return slot of a pending
        // application of the first sentinel; step to its argument.
        if slot < 2 || count >= limit {
            return Probe::Opaque;
        }
        let base = slot - 2;
        if net.get(base) != Term::app(base) {
            return Probe::Opaque;
        }
        count += 1;
        cursor = resolve(net, net.get(base + 1), limit);
    }
}

/// Follows variable forwardings until a value, a vacant slot, or a parked
/// negative term ends the chain.
fn resolve(net: &Net, term: Term, limit: u64) -> Term {
    let mut cursor = term;
    for _ in 0..limit {
        if !cursor.is(Tag::Var) {
            return cursor;
        }
        let word = net.get(cursor.target());
        match word.tag() {
            Some(Tag::Var) => cursor = word,
            // A vacant slot is a free variable: the chain's real end.
            Some(Tag::Sub) => return cursor,
            Some(tag) if tag.polarity() == crate::term::Polarity::Positive => return word,
            // Parked negative: a computation stuck on a free variable.
            _ => return cursor,
        }
    }
    cursor
}
