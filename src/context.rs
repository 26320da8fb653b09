use std::mem;

use crate::endpoint::Endpoint;

/// The caller-owned cursor threaded through one dispatch call.
///
/// A context carries the address buffer under reconstruction, the match
/// bookkeeping, and an opaque user object handlers can read and write.
/// It is created in one of two modes:
///
/// * [`new`](DispatchContext::new) has no address buffer. Dispatch scans
///   every endpoint and invokes all that match, which is what
///   aggregating queries want.
/// * [`with_address_capacity`](DispatchContext::with_address_capacity)
///   carries a buffer. Dispatch reconstructs the absolute address of the
///   matched endpoint in it while recursing, so handlers of nested
///   endpoints can read their own full address for replies.
///
/// The buffer capacity is the caller's declaration of the longest
/// address the table can produce. Appends during dispatch are not
/// checked against it; an undersized buffer silently grows, which is
/// memory-safe but breaks the allocation-free guarantee the real-time
/// path relies on.
///
/// ```
/// use oscroute::{DispatchContext, Endpoint, EndpointTable, Message};
///
/// fn report(_m: &oscroute::Message, d: &mut DispatchContext<Vec<String>>) {
///     let addr = d.address().unwrap_or("").to_string();
///     d.user.push(addr);
/// }
///
/// let table = EndpointTable::new(vec![
///     Endpoint::new("freq:f", "").with_handler(report),
/// ]);
/// let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 64);
/// table.dispatch(&Message::new("/freq", "f"), &mut ctx);
/// assert_eq!(ctx.user, vec!["/freq".to_string()]);
/// assert_eq!(ctx.matches, 1);
/// ```
pub struct DispatchContext<'a, U> {
    loc: Option<String>,
    /// Terminal matches seen so far across this context's lifetime.
    pub matches: u32,
    /// The most recently matched endpoint.
    pub matched: Option<&'a Endpoint<U>>,
    /// The opaque user object, available to every handler.
    pub user: U,
}

impl<'a, U> DispatchContext<'a, U> {
    /// A context without an address buffer (simple multi-match mode).
    pub fn new(user: U) -> DispatchContext<'a, U> {
        DispatchContext {
            loc: None,
            matches: 0,
            matched: None,
            user,
        }
    }

    /// A context with an address buffer of the given capacity.
    ///
    /// The capacity must cover the longest address the table can
    /// reconstruct; see the type-level notes.
    pub fn with_address_capacity(user: U, capacity: usize) -> DispatchContext<'a, U> {
        DispatchContext {
            loc: Some(String::with_capacity(capacity)),
            matches: 0,
            matched: None,
            user,
        }
    }

    /// The reconstructed absolute address, when a buffer is present.
    ///
    /// During a handler invocation this is the matched endpoint's full
    /// address; between dispatch calls it is whatever prefix the last
    /// call left seeded (the root separator).
    pub fn address(&self) -> Option<&str> {
        self.loc.as_deref()
    }

    /// Runs `f` with the user object temporarily replaced.
    ///
    /// Handlers that re-dispatch into a sub-table on behalf of a child
    /// object use this to redirect `user` for the nested call; the
    /// original object is restored on the way out.
    pub fn with_user<R>(&mut self, user: U, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = mem::replace(&mut self.user, user);
        let out = f(self);
        self.user = saved;
        out
    }

    pub(crate) fn has_buffer(&self) -> bool {
        self.loc.is_some()
    }

    // Dispatch seeds an untouched buffer with the root separator before
    // appending the first segment.
    pub(crate) fn seed(&mut self) {
        if let Some(loc) = &mut self.loc {
            if loc.is_empty() {
                loc.push('/');
            }
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.loc.as_ref().map_or(0, String::len)
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        if let Some(loc) = &mut self.loc {
            loc.push_str(s);
        }
    }

    pub(crate) fn push(&mut self, c: char) {
        if let Some(loc) = &mut self.loc {
            loc.push(c);
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        if let Some(loc) = &mut self.loc {
            loc.truncate(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_user_restores_on_exit() {
        let mut ctx: DispatchContext<'_, i32> = DispatchContext::new(1);
        let seen = ctx.with_user(2, |c| c.user);
        assert_eq!(seen, 2);
        assert_eq!(ctx.user, 1);
    }

    #[test]
    fn buffer_modes() {
        let simple: DispatchContext<'_, ()> = DispatchContext::new(());
        assert_eq!(simple.address(), None);

        let mut ctx: DispatchContext<'_, ()> = DispatchContext::with_address_capacity((), 32);
        assert_eq!(ctx.address(), Some(""));
        ctx.seed();
        assert_eq!(ctx.address(), Some("/"));
        ctx.push_str("osc/");
        ctx.push('0');
        assert_eq!(ctx.address(), Some("/osc/0"));
        ctx.truncate(1);
        assert_eq!(ctx.address(), Some("/"));
    }
}
