//! DOT rendering of the reachable net, for debugging and documentation.

use std::collections::HashSet;
use std::fmt::Write;

use crate::net::Net;
use crate::term::{Tag, Term};

/// Renders every node reachable from `root` as a graphviz digraph, one
/// vertex per node labeled by its tag.
pub fn visualize(net: &Net, root: Term) -> String {
    let mut out = String::from("digraph net {\n  node [shape=box, fontname=\"monospace\"];\n");
    let mut seen = HashSet::new();
    let mut seen_slots = HashSet::new();
    let mut leaves = 0usize;
    let mut work = vec![root];

    while let Some(term) = work.pop() {
        let Some(tag) = term.tag() else { continue };
        match tag {
            Tag::Lam | Tag::App | Tag::Sup | Tag::Dup => {
                let base = term.target();
                if !seen.insert(base) {
                    continue;
                }
                let _ = writeln!(out, "  n{base} [label=\"{:?} @{base}\"];", tag);
                let ports: [(&str, u64); 2] = match tag {
                    Tag::Lam => [("binder", 1), ("body", 2)],
                    Tag::App => [("arg", 1), ("ret", 2)],
                    _ => [("left", 1), ("right", 2)],
                };
                for (label, offset) in ports {
                    let port = net.get(base + offset);
                    let vertex = vertex_for(net, port, &mut out, &mut work, &mut leaves);
                    let _ = writeln!(out, "  n{base} -> {vertex} [label=\"{label}\"];");
                }
            }
            // A variable in the worklist: render what it forwards to.
            Tag::Var => {
                if !seen_slots.insert(term.target()) {
                    continue;
                }
                let word = net.get(term.target());
                if word.tag().is_some() && !word.is(Tag::Sub) {
                    work.push(word);
                }
            }
            _ => {}
        }
    }
    out.push_str("}\n");
    out
}

/// Emits (at most once) the vertex a port points at and returns its name.
fn vertex_for(
    net: &Net,
    port: Term,
    out: &mut String,
    work: &mut Vec<Term>,
    leaves: &mut usize,
) -> String {
    match port.tag() {
        Some(Tag::Lam) | Some(Tag::App) | Some(Tag::Sup) | Some(Tag::Dup) => {
            work.push(port);
            format!("n{}", port.target())
        }
        Some(Tag::Var) => {
            let slot = port.target();
            let _ = writeln!(out, "  v{slot} [label=\"VAR @{slot}\", shape=oval];");
            // Follow whatever is parked behind the slot.
            let word = net.get(slot);
            if !word.is(Tag::Sub) {
                work.push(word);
            }
            format!("v{slot}")
        }
        Some(Tag::Sub) => {
            let slot = port.target();
            let _ = writeln!(out, "  v{slot} [label=\"SUB {slot}\", shape=oval];");
            format!("v{slot}")
        }
        _ => {
            *leaves += 1;
            let name = format!("leaf{leaves}");
            let label = match port.tag() {
                Some(tag) => format!("{tag:?}"),
                None => format!("#{:02x}", port.tag_byte()),
            };
            let _ = writeln!(out, "  {name} [label=\"{label}\", shape=plaintext];");
            name
        }
    }
}
