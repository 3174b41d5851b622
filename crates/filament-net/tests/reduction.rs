//! End-to-end reduction tests over hand-built nets.

use filament_net::{read_number, readback, Net, Runtime, Term, Value};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Builds a Church numeral `λf. λx. f (f (... (f x)))` through the public
/// construction contract: one duplicator per extra use of `f`, an eraser
/// parked on `f` when it is unused.
fn church(net: &Net, n: u64) -> Term {
    let f = net.create_lam(1, Term::NUL).unwrap();
    let x = net.create_lam(2, Term::NUL).unwrap();
    if n == 0 {
        net.link(Term::ERA, Term::var(f + 1)).unwrap();
        net.set(x + 2, Term::var(x + 1));
    } else {
        let mut uses = Vec::with_capacity(n as usize);
        let mut slot = f + 1;
        for _ in 0..n - 1 {
            let dup = net.create_dup().unwrap();
            net.link(Term::dup(dup), Term::var(slot)).unwrap();
            uses.push(Term::var(dup + 1));
            slot = dup + 2;
        }
        uses.push(Term::var(slot));

        let mut value = Term::var(x + 1);
        for fun in uses.into_iter().rev() {
            let app = net.create_app(value).unwrap();
            net.link(Term::app(app), fun).unwrap();
            value = Term::var(app + 2);
        }
        net.set(x + 2, value);
    }
    net.set(f + 2, Term::lam(x));
    Term::lam(f)
}

/// `λx. λy. x` with the unused binder erased.
fn selector_true(net: &Net) -> Term {
    let outer = net.create_lam(1, Term::NUL).unwrap();
    let inner = net.create_lam(2, Term::NUL).unwrap();
    net.link(Term::ERA, Term::var(inner + 1)).unwrap();
    net.set(inner + 2, Term::var(outer + 1));
    net.set(outer + 2, Term::lam(inner));
    Term::lam(outer)
}

fn apply(net: &Net, fun: Term, arg: Term) -> Term {
    let app = net.create_app(arg).unwrap();
    net.link(Term::app(app), fun).unwrap();
    Term::var(app + 2)
}

#[test]
fn numerals_read_back_without_reduction() {
    for n in [0, 1, 2, 3, 7, 40] {
        let net = Net::with_capacity(1 << 16);
        let root = church(&net, n);
        net.evaluate().unwrap();
        assert_eq!(readback(&net, root).unwrap(), Value::Number(n), "n = {n}");
    }
}

#[test]
fn self_application_squares_a_numeral() {
    // (two two) is Church 4: applying numeral n to numeral m gives m^n.
    let net = Net::with_capacity(1 << 16);
    let two_a = church(&net, 2);
    let two_b = church(&net, 2);
    let root = apply(&net, two_a, two_b);
    let stats = net.evaluate().unwrap();
    assert!(stats.beta_reductions >= 1);
    assert!(stats.duplications >= 1);
    assert_eq!(read_number(&net, root).unwrap(), Some(4));
}

#[test]
fn confluence_across_drain_orders() {
    // The same term must read back identically under LIFO, FIFO and
    // seeded random drain orders.
    let run = |order: u64| {
        let net = Net::with_capacity(1 << 16);
        let two = church(&net, 2);
        let three = church(&net, 3);
        let root = apply(&net, two, three);
        match order {
            0 => net.evaluate().unwrap(),
            1 => net
                .evaluate_ordered(None, |stack| {
                    if stack.is_empty() {
                        None
                    } else {
                        Some(stack.remove(0))
                    }
                })
                .unwrap(),
            seed => {
                let mut rng = StdRng::seed_from_u64(seed);
                net.evaluate_ordered(None, move |stack| {
                    if stack.is_empty() {
                        None
                    } else {
                        let i = rng.gen_range(0..stack.len());
                        Some(stack.swap_remove(i))
                    }
                })
                .unwrap()
            }
        };
        read_number(&net, root).unwrap()
    };
    // three applied-to-twice: 3^2 = 9.
    for order in [0, 1, 7, 42, 1234] {
        assert_eq!(run(order), Some(9), "order = {order}");
    }
}

#[test]
fn k_combinator_discards_large_argument() {
    let net = Net::with_capacity(1 << 16);
    let k = selector_true(&net);
    let kept = church(&net, 7);
    let dropped = church(&net, 40);
    let partial = apply(&net, k, kept);
    let root = apply(&net, partial, dropped);

    let stats = net.evaluate().unwrap();
    // The dropped numeral's body is at least forty applications plus the
    // duplicator chain feeding them.
    assert!(
        stats.erasures >= 40,
        "erasures = {} too low for a discarded numeral of 40",
        stats.erasures
    );
    assert_eq!(read_number(&net, root).unwrap(), Some(7));
}

#[test]
fn parallel_reduction_matches_sequential() {
    for workers in [1, 2, 4] {
        let net = Net::with_capacity(1 << 16);
        let two = church(&net, 2);
        let three = church(&net, 3);
        let root = apply(&net, two, three);
        let stats = Runtime::new(&net).workers(workers).run().unwrap();
        assert!(stats.beta_reductions >= 2, "workers = {workers}");
        assert_eq!(
            read_number(&net, root).unwrap(),
            Some(9),
            "workers = {workers}"
        );
    }
}

#[test]
fn step_budget_reports_partial_statistics() {
    let net = Net::with_capacity(1 << 16);
    let two = church(&net, 2);
    let three = church(&net, 3);
    apply(&net, two, three);

    let halt = net.evaluate_bounded(Some(1)).unwrap_err();
    assert!(matches!(
        halt.error,
        filament_net::Error::StepLimitReached { budget: 1 }
    ));
    assert_eq!(halt.stats.total(), 1);
}
