//! Enumeration of every concrete address a dispatch tree can resolve.
//!
//! The walk shares one address buffer across the whole recursion and
//! restores it after each branch, the same discipline dispatch applies
//! to its context buffer.

use crate::endpoint::Endpoint;
use crate::pattern;
use crate::table::EndpointTable;

/// Visits every terminal endpoint with its absolute address.
///
/// Array endpoints expand to one visit per concrete index, so `gain#4`
/// produces `/gain0` through `/gain3`. Sub-tables are entered before
/// their siblings' terminals are visited; the visitor only ever sees
/// terminals.
///
/// The buffer is seeded with the root separator when empty and holds
/// the same content afterwards as before the call.
///
/// ```
/// use oscroute::{walk_ports, Endpoint, EndpointTable};
///
/// let table: EndpointTable<()> = EndpointTable::new(vec![
///     Endpoint::new("gain#2:f", ""),
/// ]);
/// let mut addrs = Vec::new();
/// let mut buf = String::new();
/// walk_ports(&table, &mut buf, &mut |_ep, addr| addrs.push(addr.to_string()));
/// assert_eq!(addrs, ["/gain0", "/gain1"]);
/// ```
pub fn walk_ports<U>(
    table: &EndpointTable<U>,
    buffer: &mut String,
    visitor: &mut dyn FnMut(&Endpoint<U>, &str),
) {
    walk_inner(table, buffer, false, visitor);
}

/// Like [`walk_ports`], but summarizes each array endpoint as a single
/// `[0,N-1]` bracket segment instead of expanding it.
///
/// Documentation generators prefer this form: one entry per endpoint
/// pattern rather than one per array element.
pub fn walk_ports_summarized<U>(
    table: &EndpointTable<U>,
    buffer: &mut String,
    visitor: &mut dyn FnMut(&Endpoint<U>, &str),
) {
    walk_inner(table, buffer, true, visitor);
}

fn walk_inner<U>(
    table: &EndpointTable<U>,
    buffer: &mut String,
    summarize: bool,
    visitor: &mut dyn FnMut(&Endpoint<U>, &str),
) {
    if buffer.is_empty() {
        buffer.push('/');
    }
    let depth = buffer.len();

    for ep in table {
        match (ep.subtable(), pattern::array_parts(ep.name())) {
            (Some(sub), Some((literal, count))) => {
                if summarize {
                    buffer.push_str(literal);
                    buffer.push_str(&bracket(count));
                    buffer.push('/');
                    walk_inner(sub, buffer, summarize, visitor);
                } else {
                    for i in 0..count {
                        buffer.truncate(depth);
                        buffer.push_str(literal);
                        buffer.push_str(&i.to_string());
                        buffer.push('/');
                        walk_inner(sub, buffer, summarize, visitor);
                    }
                }
            }
            (Some(sub), None) => {
                buffer.push_str(pattern::fixed_prefix(ep.name()));
                walk_inner(sub, buffer, summarize, visitor);
            }
            (None, Some((literal, count))) => {
                if summarize {
                    buffer.push_str(literal);
                    buffer.push_str(&bracket(count));
                    visitor(ep, buffer);
                } else {
                    for i in 0..count {
                        buffer.truncate(depth);
                        buffer.push_str(literal);
                        buffer.push_str(&i.to_string());
                        visitor(ep, buffer);
                    }
                }
            }
            (None, None) => {
                buffer.push_str(pattern::fixed_prefix(ep.name()));
                visitor(ep, buffer);
            }
        }
        buffer.truncate(depth);
    }
}

fn bracket(count: usize) -> String {
    format!("[0,{}]", count as isize - 1)
}
