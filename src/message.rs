/// A borrowed view of one decoded wire message.
///
/// The binary encoding and decoding of messages is the job of an external
/// codec; dispatch only ever needs the slash-separated address, the
/// argument type-tag characters, and (for handlers that forward the
/// message) the raw argument payload. Keys and payload are stored as
/// borrowed slices, so constructing a `Message` never allocates.
///
/// The address is stored without its leading separator. `Message::new`
/// strips one if present, so both `"/osc/freq"` and `"osc/freq"` are
/// accepted.
///
/// ```
/// use oscroute::Message;
///
/// let m = Message::new("/osc/freq", "f");
/// assert_eq!(m.path(), "osc/freq");
/// assert_eq!(m.snip().path(), "freq");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Message<'m> {
    path: &'m str,
    types: &'m str,
    args: &'m [u8],
}

impl<'m> Message<'m> {
    /// Creates a message view with an empty argument payload.
    pub fn new(path: &'m str, types: &'m str) -> Message<'m> {
        Message::with_args(path, types, b"")
    }

    /// Creates a message view carrying the encoded argument payload.
    ///
    /// The payload is opaque to this crate; it is only passed through to
    /// handlers, which may hand it back to the codec.
    pub fn with_args(path: &'m str, types: &'m str, args: &'m [u8]) -> Message<'m> {
        let path = path.strip_prefix('/').unwrap_or(path);
        Message { path, types, args }
    }

    /// The address, without a leading separator.
    pub fn path(&self) -> &'m str {
        self.path
    }

    /// The argument type-tag characters.
    pub fn types(&self) -> &'m str {
        self.types
    }

    /// The encoded argument payload.
    pub fn args(&self) -> &'m [u8] {
        self.args
    }

    /// Drops the first path segment.
    ///
    /// Nested dispatch uses this to hand the remainder of the address to a
    /// sub-table. If the path contains no separator, the resulting path is
    /// empty.
    pub fn snip(&self) -> Message<'m> {
        let path = match self.path.find('/') {
            Some(i) => &self.path[i + 1..],
            None => "",
        };
        Message {
            path,
            types: self.types,
            args: self.args,
        }
    }
}
