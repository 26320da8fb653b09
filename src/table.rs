use std::fmt;
use std::ops::Index;
use std::slice;

use crate::context::DispatchContext;
use crate::endpoint::Endpoint;
use crate::hash::HashMatcher;
use crate::message::Message;
use crate::pattern;

/// One level of the dispatch tree: an ordered, immutable sequence of
/// endpoints plus the hash matcher synthesized for it.
///
/// Construction is the expensive step. It validates the
/// name/sub-table pairing and runs the minimal-hash synthesis, so it
/// belongs at initialization, off the real-time path. A constructed
/// table is read-only; dispatching through it allocates nothing and can
/// be shared freely across threads.
///
/// ```
/// use oscroute::{DispatchContext, Endpoint, EndpointTable, Message};
///
/// fn on_freq(_m: &Message, d: &mut DispatchContext<u32>) {
///     d.user += 1;
/// }
///
/// let table = EndpointTable::new(vec![
///     Endpoint::new("freq:f", "unit=Hz").with_handler(on_freq),
///     Endpoint::new("wave:s", ""),
/// ]);
///
/// let mut ctx = DispatchContext::with_address_capacity(0, 64);
/// table.dispatch(&Message::new("/freq", "f"), &mut ctx);
/// assert_eq!(ctx.matches, 1);
/// assert_eq!(ctx.user, 1);
/// ```
pub struct EndpointTable<U> {
    endpoints: Vec<Endpoint<U>>,
    matcher: HashMatcher,
}

impl<U> EndpointTable<U> {
    /// Builds a table and synthesizes its hash matcher.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint whose name contains `/` has no sub-table,
    /// or an endpoint without `/` has one.
    pub fn new(endpoints: Vec<Endpoint<U>>) -> EndpointTable<U> {
        for ep in &endpoints {
            if pattern::nests(ep.name()) != ep.subtable().is_some() {
                panic!(
                    "endpoint '{}' must own a sub-table exactly when its name contains '/'",
                    ep.name()
                );
            }
        }
        let names: Vec<&str> = endpoints.iter().map(|ep| ep.name()).collect();
        let matcher = HashMatcher::build(&names);
        EndpointTable { endpoints, matcher }
    }

    /// Returns the number of endpoints at this level.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` if this level has no endpoints.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Iterates over the endpoints in table order.
    pub fn iter(&self) -> slice::Iter<'_, Endpoint<U>> {
        self.endpoints.iter()
    }

    /// Looks up an endpoint by its name, ignoring any argument
    /// restriction in the registered pattern.
    ///
    /// ```
    /// # use oscroute::{Endpoint, EndpointTable};
    /// let table: EndpointTable<()> = EndpointTable::new(vec![
    ///     Endpoint::new("freq:f", ""),
    /// ]);
    /// assert!(table.get("freq").is_some());
    /// assert!(table.get("freq:f").is_none());
    /// ```
    pub fn get(&self, name: &str) -> Option<&Endpoint<U>> {
        self.endpoints
            .iter()
            .find(|ep| pattern::fixed_prefix(ep.name()) == name)
    }

    /// Resolves a message to handlers, per the context's mode.
    ///
    /// Without an address buffer, every endpoint whose pattern matches
    /// is invoked in table order; this is how aggregating queries see
    /// multiple endpoints under one name. With a buffer, the hash
    /// matcher resolves the first segment to a single verified
    /// candidate (tables that opted out scan instead), the matched
    /// segment is appended to the buffer, and the buffer is truncated
    /// back when the endpoint's work completes, so the caller observes
    /// the same logical length after every call.
    ///
    /// A matched endpoint's handler is invoked with the message and
    /// context. An endpoint without a handler but with a sub-table
    /// recurses into it with the first address segment snipped off.
    /// Unmatched messages are a silent no-op.
    pub fn dispatch<'t>(&'t self, msg: &Message<'_>, ctx: &mut DispatchContext<'t, U>) {
        if !ctx.has_buffer() {
            for ep in &self.endpoints {
                if pattern::match_message(ep.name(), msg.path(), msg.types()) {
                    if ep.subtable.is_none() {
                        ctx.matches += 1;
                    }
                    Self::accept(ep, msg, ctx);
                }
            }
            return;
        }

        ctx.seed();
        let depth = ctx.depth();

        if self.matcher.is_linear() {
            for ep in &self.endpoints {
                if !pattern::match_message(ep.name(), msg.path(), msg.types()) {
                    continue;
                }
                if ep.subtable.is_none() {
                    ctx.matches += 1;
                }
                append_segment(ep, msg, ctx);
                Self::accept(ep, msg, ctx);
                ctx.truncate(depth);
            }
        } else {
            let candidate = match self.matcher.candidate(msg.path()) {
                Some(i) => i,
                None => return,
            };
            if !self.matcher.hard_match(candidate, msg.path(), msg.types()) {
                return;
            }
            let ep = &self.endpoints[candidate];
            if ep.subtable.is_none() {
                ctx.matches += 1;
            }
            append_segment(ep, msg, ctx);
            Self::accept(ep, msg, ctx);
            ctx.truncate(depth);
        }
    }

    // A match was accepted: record it, then run the handler or descend.
    fn accept<'t>(ep: &'t Endpoint<U>, msg: &Message<'_>, ctx: &mut DispatchContext<'t, U>) {
        ctx.matched = Some(ep);
        if let Some(handler) = &ep.handler {
            handler(msg, ctx);
        } else if let Some(sub) = &ep.subtable {
            let rest = msg.snip();
            sub.dispatch(&rest, ctx);
        }
    }

    /// Best-effort resolution of a partial path, for interactive
    /// introspection.
    ///
    /// A nested-table match is preferred while more path remains; at
    /// the final level the first endpoint whose name extends or matches
    /// the fragment wins. Returns `None` when nothing fits.
    pub fn apropos(&self, path: &str) -> Option<&Endpoint<U>> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if path.is_empty() {
            return None;
        }
        for ep in &self.endpoints {
            if let Some(sub) = ep.subtable() {
                if pattern::match_segment(ep.name(), path) {
                    return match path.split_once('/') {
                        Some((_, rest)) if !rest.is_empty() => sub.apropos(rest),
                        _ => Some(ep),
                    };
                }
            }
        }
        self.endpoints
            .iter()
            .find(|ep| ep.name().starts_with(path) || pattern::match_segment(ep.name(), path))
    }
}

// Appends the matched segment to the address under reconstruction. A
// literal endpoint contributes its prefix verbatim; an array endpoint
// contributes the concrete indexed segment from the message, plus the
// separator when it nests.
fn append_segment<U>(ep: &Endpoint<U>, msg: &Message<'_>, ctx: &mut DispatchContext<'_, U>) {
    if ep.is_array() {
        ctx.push_str(pattern::first_segment(msg.path()));
        if ep.nests() {
            ctx.push('/');
        }
    } else {
        ctx.push_str(pattern::fixed_prefix(ep.name()));
    }
}

impl<U> Index<usize> for EndpointTable<U> {
    type Output = Endpoint<U>;

    fn index(&self, i: usize) -> &Self::Output {
        &self.endpoints[i]
    }
}

impl<'t, U> IntoIterator for &'t EndpointTable<U> {
    type Item = &'t Endpoint<U>;
    type IntoIter = slice::Iter<'t, Endpoint<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}

impl<U> fmt::Debug for EndpointTable<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.endpoints.iter()).finish()
    }
}
