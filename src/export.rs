//! XML documentation export.
//!
//! The generator consumes exactly the two introspection surfaces the
//! tree exposes, summarized address enumeration and per-endpoint
//! metadata iteration, and emits an `<osc_unit>` document describing
//! every documented endpoint. It lives outside the dispatch core; a
//! tree needs none of this to route messages.
//!
//! Reserved metadata keys: `documentation`, `parameter`, `unit`, `min`,
//! `max`, `enumerated`, `map <n>` (repeatable) and `internal`.

use std::fmt::{self, Write};

use log::warn;

use crate::endpoint::Endpoint;
use crate::meta::Meta;
use crate::pattern;
use crate::table::EndpointTable;
use crate::walk::walk_ports_summarized;

const SYMBOLS: &[u8] = b"xyzabcdefghijklmnopqrstuvw";

/// Document identity for an exported tree.
///
/// ```
/// use oscroute::{DocExport, Endpoint, EndpointTable};
///
/// let table: EndpointTable<()> = EndpointTable::new(vec![
///     Endpoint::new("volume:f", "parameter\0documentation=Master volume"),
/// ]);
/// let export = DocExport {
///     name: "synth".into(),
///     uri: "http://example.com/synth".into(),
///     doc_origin: "http://example.com/synth.xml".into(),
///     author_first: "Ada".into(),
///     author_last: "Lovelace".into(),
/// };
/// let mut xml = String::new();
/// export.write_xml(&table, &mut xml).unwrap();
/// assert!(xml.contains("message_in pattern=\"/volume\""));
/// ```
pub struct DocExport {
    pub name: String,
    pub uri: String,
    pub doc_origin: String,
    pub author_first: String,
    pub author_last: String,
}

impl DocExport {
    /// Writes the full document for one tree.
    ///
    /// Endpoints that cannot be classified are skipped with a logged
    /// diagnostic naming the offending pattern; the export continues.
    pub fn write_xml<U>(&self, table: &EndpointTable<U>, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(out, "<osc_unit format_version=\"1.0\">")?;
        writeln!(out, " <meta>")?;
        writeln!(out, "  <name>{}</name>", self.name)?;
        writeln!(out, "  <uri>{}</uri>", self.uri)?;
        writeln!(out, "  <doc_origin>{}</doc_origin>", self.doc_origin)?;
        writeln!(
            out,
            "  <author><firstname>{}</firstname><lastname>{}</lastname></author>",
            self.author_first, self.author_last
        )?;
        writeln!(out, " </meta>")?;

        // Writing into a String cannot fail, so the visitor does not
        // need to thread a fmt::Result through the walk.
        let mut body = String::new();
        let mut buffer = String::new();
        walk_ports_summarized(table, &mut buffer, &mut |ep, addr| {
            describe(&mut body, ep, addr);
        });
        out.write_str(&body)?;

        writeln!(out, "</osc_unit>")
    }
}

fn describe<U>(o: &mut String, ep: &Endpoint<U>, addr: &str) {
    let meta = ep.meta();
    let args = pattern::arg_spec(ep.name());

    let mut doc = meta.get("documentation").unwrap_or("").to_string();
    if meta.contains("internal") {
        doc.push_str("[INTERNAL]");
    }

    if meta.contains("parameter") {
        let tag = args.and_then(parameter_tag);
        match tag {
            None => warn!("doc export cannot classify '{}'", ep.name()),
            Some('t') => toggle_port(o, addr, &doc),
            Some(tag) => value_port(o, addr, &doc, tag, &meta),
        }
    } else if meta.contains("documentation") {
        match args {
            None => any_port(o, addr, &doc),
            Some(args) => generic_port(o, addr, &doc, args),
        }
    } else {
        warn!("doc export skipping undocumented '{}'", ep.name());
    }
}

// The wire type a value parameter speaks, reduced to one tag.
fn parameter_tag(args: &str) -> Option<char> {
    for tag in ['f', 'i', 'c'] {
        if args.contains(tag) {
            return Some(tag);
        }
    }
    if args.contains('T') {
        return Some('t');
    }
    if args.contains('s') {
        return Some('s');
    }
    None
}

fn value_port(o: &mut String, addr: &str, doc: &str, tag: char, meta: &Meta<'_>) {
    let _ = writeln!(o, " <message_in pattern=\"{}\" typetag=\"{}\">", addr, tag);
    let _ = writeln!(o, "  <desc>Set Value of {}</desc>", doc);
    param_body(o, tag, meta);
    let _ = writeln!(o, " </message_in>");
    let _ = writeln!(o, " <message_in pattern=\"{}\" typetag=\"\">", addr);
    let _ = writeln!(o, "  <desc>Get Value of {}</desc>", doc);
    let _ = writeln!(o, " </message_in>");
    let _ = writeln!(o, " <message_out pattern=\"{}\" typetag=\"{}\">", addr, tag);
    let _ = writeln!(o, "  <desc>Value of {}</desc>", doc);
    param_body(o, tag, meta);
    let _ = writeln!(o, " </message_out>");
}

fn param_body(o: &mut String, tag: char, meta: &Meta<'_>) {
    let ranged = meta.contains("min") && meta.contains("max") && tag != 'c';
    if ranged {
        let _ = write!(o, "  <param_{} symbol=\"x\"", tag);
        unit_attr(o, meta);
        let _ = writeln!(o, ">");
        let _ = writeln!(
            o,
            "   <range_min_max {}min=\"{}\" max=\"{}\"/>",
            if tag == 'f' { "lmin=\"[\" lmax=\"]\" " } else { "" },
            meta.get("min").unwrap_or(""),
            meta.get("max").unwrap_or("")
        );
        let _ = writeln!(o, "  </param_{}>", tag);
    } else if meta.contains("enumerated") {
        let (lo, hi) = enum_bounds(meta);
        let _ = writeln!(o, "  <param_{} symbol=\"x\">", tag);
        let _ = writeln!(o, "    <range_min_max min=\"{}\" max=\"{}\">", lo, hi);
        enum_options(o, meta);
        let _ = writeln!(o, "    </range_min_max>");
        let _ = writeln!(o, "  </param_{}>", tag);
    } else {
        let _ = write!(o, "  <param_{} symbol=\"x\"", tag);
        unit_attr(o, meta);
        let _ = writeln!(o, "/>");
    }
}

fn toggle_port(o: &mut String, addr: &str, doc: &str) {
    for (tag, verb) in [('T', "Enable"), ('F', "Disable")] {
        let _ = writeln!(o, " <message_in pattern=\"{}\" typetag=\"{}\">", addr, tag);
        let _ = writeln!(o, "  <desc>{} {}</desc>", verb, doc);
        let _ = writeln!(o, "  <param_{} symbol=\"x\"/>", tag);
        let _ = writeln!(o, " </message_in>");
    }
    let _ = writeln!(o, " <message_in pattern=\"{}\" typetag=\"\">", addr);
    let _ = writeln!(o, "  <desc>Get state of {}</desc>", doc);
    let _ = writeln!(o, " </message_in>");
    for tag in ['T', 'F'] {
        let _ = writeln!(o, " <message_out pattern=\"{}\" typetag=\"{}\">", addr, tag);
        let _ = writeln!(o, "  <desc>Value of {}</desc>", doc);
        let _ = writeln!(o, "  <param_{} symbol=\"x\"/>", tag);
        let _ = writeln!(o, " </message_out>");
    }
}

fn any_port(o: &mut String, addr: &str, doc: &str) {
    let _ = writeln!(o, " <message_in pattern=\"{}\" typetag=\"*\">", addr);
    let _ = writeln!(o, "  <desc>{}</desc>", doc);
    let _ = writeln!(o, " </message_in>");
}

// One message_in block per argument alternative.
fn generic_port(o: &mut String, addr: &str, doc: &str, args: &str) {
    let rest = match args.strip_prefix(':') {
        Some(rest) => rest,
        None => return,
    };
    let (alt, next) = match rest.split_once(':') {
        Some((alt, next)) => (alt, Some(next)),
        None => (rest, None),
    };

    let _ = writeln!(o, " <message_in pattern=\"{}\" typetag=\"{}\">", addr, alt);
    let _ = writeln!(o, "  <desc>{}</desc>", doc);
    for (i, tag) in alt.chars().enumerate() {
        let symbol = SYMBOLS[i % SYMBOLS.len()] as char;
        let _ = writeln!(o, "  <param_{} symbol=\"{}\"/>", tag, symbol);
    }
    let _ = writeln!(o, " </message_in>");

    if let Some(next) = next {
        generic_port(o, addr, doc, &format!(":{}", next));
    }
}

fn unit_attr(o: &mut String, meta: &Meta<'_>) {
    if let Some(unit) = meta.get("unit") {
        let _ = write!(o, " units=\"{}\"", unit);
    }
}

// Bounds over the repeatable `map <n>` records; (0, 0) without any.
fn enum_bounds(meta: &Meta<'_>) -> (i32, i32) {
    let mut bounds: Option<(i32, i32)> = None;
    for (key, _) in meta.iter() {
        if let Some(n) = key.strip_prefix("map ") {
            let n: i32 = n.trim().parse().unwrap_or(0);
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(n), hi.max(n)),
                None => (n, n),
            });
        }
    }
    bounds.unwrap_or((0, 0))
}

fn enum_options(o: &mut String, meta: &Meta<'_>) {
    let mut symbol = 0;
    for (key, value) in meta.iter() {
        if let Some(n) = key.strip_prefix("map ") {
            let _ = writeln!(
                o,
                "      <point symbol=\"{}\" value=\"{}\">{}</point>",
                SYMBOLS[symbol % SYMBOLS.len()] as char,
                n.trim(),
                value.unwrap_or("")
            );
            symbol += 1;
        }
    }
}
