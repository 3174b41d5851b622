//! The rewrite rules and their dispatch table.
//!
//! Every active pair is a `(negative, positive)` principal pair. Dispatch is
//! a single match on the tag pair; polarity-correct pairs with no rule are a
//! front-end bug and fail with `UnknownInteraction` rather than being
//! guessed at.

mod beta;
mod dup;
mod era;

pub(crate) use era::erase;

use crate::error::Error;
use crate::net::Net;
use crate::stats::Stats;
use crate::term::{Polarity, Redex, Tag};

/// Applies the rewrite rule for one active pair, pushing any newly created
/// pairs into `out` so the caller can keep them on its own queue.
pub(crate) fn apply(
    net: &Net,
    redex: Redex,
    out: &mut Vec<Redex>,
    stats: &mut Stats,
) -> Result<(), Error> {
    let Redex(neg, pos) = redex;
    let (neg_tag, pos_tag) = match (neg.tag(), pos.tag()) {
        (Some(n), Some(p)) => (n, p),
        _ => return Err(Error::UnknownInteraction { neg, pos }),
    };
    if neg_tag.polarity() != Polarity::Negative || pos_tag.polarity() != Polarity::Positive {
        return Err(Error::UnknownInteraction { neg, pos });
    }
    match (neg_tag, pos_tag) {
        (Tag::App, Tag::Lam) => beta::applam(net, neg, pos, out, stats),
        (Tag::Dup, Tag::Lam) => dup::duplam(net, neg, pos, out, stats),
        (Tag::Dup, Tag::Sup) => dup::dupsup(net, neg, pos, out, stats),
        (Tag::Era, Tag::Lam) => era::eralam(net, neg, pos, out, stats),
        (Tag::Era, Tag::Sup) => era::erasup(net, neg, pos, stats),
        (Tag::App, Tag::Nul) => era::nulapp(net, neg, out, stats),
        (Tag::Dup, Tag::Nul) => era::nuldup(net, neg, out, stats),
        (Tag::Era, Tag::Nul) => {
            log::trace!("rule era-nul: {:?} ~ {:?}", neg, pos);
            stats.annihilations += 1;
            Ok(())
        }
        _ => Err(Error::UnknownInteraction { neg, pos }),
    }
}
