use std::fmt;

use crate::context::DispatchContext;
use crate::message::Message;
use crate::meta::{self, Meta, MetaRecord};
use crate::pattern;
use crate::table::EndpointTable;

/// A boxed endpoint callback, invoked with the message and the caller's
/// dispatch context.
pub type Handler<U> = Box<dyn Fn(&Message<'_>, &mut DispatchContext<'_, U>) + Send + Sync>;

/// One routable endpoint: a name pattern, its documentation, and
/// optionally a handler and a nested sub-table.
///
/// The name follows the grammar in [`match_message`](crate::match_message):
/// a literal segment, optionally an array (`gain#4`), an argument
/// restriction (`freq:f`), or a nested level (`osc/`). An endpoint whose
/// name contains `/` must own the sub-table for that level, and only
/// such endpoints may own one; [`EndpointTable::new`] checks this.
///
/// Endpoints use builder-style configuration:
///
/// ```
/// use oscroute::{Endpoint, EndpointTable};
///
/// let table: EndpointTable<()> = EndpointTable::new(vec![
///     Endpoint::new("freq:f", "unit=Hz\0documentation=Frequency")
///         .with_handler(|_m, d| println!("set {}", d.address().unwrap_or(""))),
///     Endpoint::new("osc/", "").with_subtable(EndpointTable::new(vec![
///         Endpoint::new("wave:s", "documentation=Waveform name"),
///     ])),
/// ]);
/// assert_eq!(table.len(), 2);
/// ```
///
/// The documentation string is parsed once, at construction, into a
/// positional index; [`meta`](Endpoint::meta) reads through that index
/// without re-scanning. There is no `Clone`: handlers are opaque
/// closures, and rebuilding an endpoint through `new` re-parses its
/// documentation.
pub struct Endpoint<U> {
    name: String,
    documentation: String,
    meta_index: Vec<MetaRecord>,
    pub(crate) handler: Option<Handler<U>>,
    pub(crate) subtable: Option<Box<EndpointTable<U>>>,
}

impl<U> Endpoint<U> {
    /// Creates an endpoint with no handler and no sub-table.
    pub fn new(name: impl Into<String>, documentation: impl Into<String>) -> Endpoint<U> {
        let documentation = documentation.into();
        let meta_index = meta::parse_index(&documentation);
        Endpoint {
            name: name.into(),
            documentation,
            meta_index,
            handler: None,
            subtable: None,
        }
    }

    /// Attaches the callback invoked when this endpoint matches.
    pub fn with_handler(
        mut self,
        handler: impl Fn(&Message<'_>, &mut DispatchContext<'_, U>) + Send + Sync + 'static,
    ) -> Endpoint<U> {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Attaches the nested table this endpoint routes into.
    pub fn with_subtable(mut self, table: EndpointTable<U>) -> Endpoint<U> {
        self.subtable = Some(Box::new(table));
        self
    }

    /// The full name pattern, including any argument restriction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw packed documentation string.
    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// An ordered view of the documentation records.
    pub fn meta(&self) -> Meta<'_> {
        Meta::new(&self.documentation, &self.meta_index)
    }

    /// The nested table, for endpoints that route one level deeper.
    pub fn subtable(&self) -> Option<&EndpointTable<U>> {
        self.subtable.as_deref()
    }

    /// `true` for `name#N` array endpoints.
    pub fn is_array(&self) -> bool {
        pattern::is_array(&self.name)
    }

    /// `true` for endpoints that nest a sub-table level.
    pub fn nests(&self) -> bool {
        pattern::nests(&self.name)
    }
}

impl<U> fmt::Debug for Endpoint<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("meta", &self.meta())
            .field("handler", &self.handler.is_some())
            .field("subtable", &self.subtable.as_ref().map(|t| t.len()))
            .finish()
    }
}
