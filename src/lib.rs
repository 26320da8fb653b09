#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Real-time safe dispatch and addressing for OSC-style message trees.
//!
//! A message carries a slash-separated address and a type-tagged
//! argument list. This crate resolves the address against a tree of
//! registered endpoints and invokes the matching handlers, without
//! allocating or blocking on the way, so dispatch is safe to call from
//! an audio or control thread.
//!
//! Endpoint names are patterns:
//!
//! ```ignore
//!  Syntax      Meaning
//!  freq:f      literal name, restricted to one float argument
//!  mute:T:F    literal name, accepting either a true or a false tag
//!  gain#4:f    an array of 4 sibling endpoints, gain0 .. gain3
//!  osc/        a nested level routed through a sub-table
//! ```
//!
//! Building a table synthesizes a minimal hash over its literal
//! prefixes once, so the common dispatch case is one hash evaluation,
//! one table lookup and one verification compare. Tables the synthesis
//! cannot cover (array endpoints, colliding prefixes) fall back to a
//! linear scan with identical semantics.
//!
//! ```
//! use oscroute::{DispatchContext, Endpoint, EndpointTable, Message};
//!
//! fn set_freq(m: &Message, d: &mut DispatchContext<Vec<String>>) {
//!     let line = format!("{} {}", d.address().unwrap_or(""), m.types());
//!     d.user.push(line);
//! }
//!
//! let oscillator = EndpointTable::new(vec![
//!     Endpoint::new("freq:f", "unit=Hz\0documentation=Frequency").with_handler(set_freq),
//!     Endpoint::new("wave:s", "documentation=Waveform"),
//! ]);
//! let root = EndpointTable::new(vec![
//!     Endpoint::new("osc/", "").with_subtable(oscillator),
//! ]);
//!
//! let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 128);
//! root.dispatch(&Message::new("/osc/freq", "f"), &mut ctx);
//!
//! assert_eq!(ctx.matches, 1);
//! assert_eq!(ctx.user, vec!["/osc/freq f".to_string()]);
//! ```
//!
//! Handlers receive the message and the caller's [`DispatchContext`],
//! which carries the reconstructed absolute address, match bookkeeping
//! and an opaque user object. An endpoint with a sub-table but no
//! handler recurses automatically; one with a handler decides for
//! itself, typically via [`Endpoint::subtable`] on
//! [`DispatchContext::matched`].
//!
//! Beyond dispatch, a tree can be inspected: [`EndpointTable::get`]
//! and [`EndpointTable::apropos`] look endpoints up by name or partial
//! path, [`walk_ports`] enumerates every concrete address, and
//! [`DocExport`] renders the endpoint metadata as an XML unit
//! description.

mod context;
mod endpoint;
mod export;
mod hash;
mod message;
mod meta;
mod path;
mod pattern;
mod table;
mod walk;

pub use context::DispatchContext;
pub use endpoint::{Endpoint, Handler};
pub use export::DocExport;
pub use message::Message;
pub use meta::{Meta, MetaIter};
pub use path::{collapse_path, collapse_path_in_place};
pub use pattern::{match_args, match_message};
pub use table::EndpointTable;
pub use walk::{walk_ports, walk_ports_summarized};
