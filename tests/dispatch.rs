use oscroute::{DispatchContext, Endpoint, EndpointTable, Message};

// Handlers append "address types" lines to the user log, so every test
// can assert on what was invoked and with which reconstructed address.
fn record(m: &Message, d: &mut DispatchContext<Vec<String>>) {
    let line = format!("{} {}", d.address().unwrap_or("-"), m.types());
    d.user.push(line);
}

// A mixer-style tree whose root table hash-synthesizes cleanly.
fn mixer() -> EndpointTable<Vec<String>> {
    let oscillator = EndpointTable::new(vec![
        Endpoint::new("freq:f", "unit=Hz\0documentation=Frequency").with_handler(record),
        Endpoint::new("wave:s", "documentation=Waveform").with_handler(record),
        Endpoint::new("detune:f", "").with_handler(record),
    ]);
    let envelope = EndpointTable::new(vec![
        Endpoint::new("attack:f", "").with_handler(record),
        Endpoint::new("release:f", "").with_handler(record),
    ]);
    EndpointTable::new(vec![
        Endpoint::new("osc/", "").with_subtable(oscillator),
        Endpoint::new("env/", "").with_subtable(envelope),
        Endpoint::new("volume:f", "documentation=Master volume").with_handler(record),
        Endpoint::new("pan:f", "").with_handler(record),
        Endpoint::new("status", "").with_handler(record),
    ])
}

// The same terminal endpoints behind an array level, which keeps the
// root table on the linear path.
fn voices() -> EndpointTable<Vec<String>> {
    let voice = EndpointTable::new(vec![
        Endpoint::new("freq:f", "").with_handler(record),
        Endpoint::new("gate:T:F", "").with_handler(record),
    ]);
    EndpointTable::new(vec![
        Endpoint::new("voice#8/", "").with_subtable(voice),
        Endpoint::new("gain#4:f", "").with_handler(record),
        Endpoint::new("volume:f", "").with_handler(record),
    ])
}

struct DispatchTest {
    table: EndpointTable<Vec<String>>,
    cases: Vec<(&'static str, &'static str, Vec<&'static str>)>,
}

impl DispatchTest {
    fn run(self) {
        for (path, types, expected) in self.cases {
            let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 128);
            self.table.dispatch(&Message::new(path, types), &mut ctx);
            assert_eq!(ctx.user, expected, "message '{} {}'", path, types);
            assert_eq!(ctx.matches as usize, expected.len(), "message '{} {}'", path, types);
            // the buffer always unwinds to the seeded root
            assert_eq!(ctx.address(), Some("/"), "message '{} {}'", path, types);
        }
    }
}

#[test]
fn exact_literals_match_once() {
    DispatchTest {
        table: mixer(),
        cases: vec![
            ("volume", "f", vec!["/volume f"]),
            ("pan", "f", vec!["/pan f"]),
            ("status", "", vec!["/status "]),
        ],
    }
    .run()
}

#[test]
fn fallback_tables_match_identically() {
    // Duplicate prefixes make synthesis impossible; semantics must not
    // change.
    DispatchTest {
        table: EndpointTable::new(vec![
            Endpoint::new("volume:f", "").with_handler(record),
            Endpoint::new("volume:s", "").with_handler(record),
            Endpoint::new("pan:f", "").with_handler(record),
        ]),
        cases: vec![
            ("volume", "f", vec!["/volume f"]),
            ("volume", "s", vec!["/volume s"]),
            ("pan", "f", vec!["/pan f"]),
        ],
    }
    .run()
}

#[test]
fn argument_restrictions_gate_dispatch() {
    DispatchTest {
        table: mixer(),
        cases: vec![
            ("volume", "s", vec![]),
            ("volume", "ff", vec![]),
            ("osc/freq", "s", vec![]),
            ("osc/wave", "s", vec!["/osc/wave s"]),
        ],
    }
    .run()
}

#[test]
fn unknown_addresses_are_silent() {
    DispatchTest {
        table: mixer(),
        cases: vec![
            ("bogus", "f", vec![]),
            ("osc/bogus", "f", vec![]),
            ("volume/deeper", "f", vec![]),
            ("", "", vec![]),
        ],
    }
    .run()
}

#[test]
fn nested_addresses_are_reconstructed() {
    DispatchTest {
        table: mixer(),
        cases: vec![
            ("osc/freq", "f", vec!["/osc/freq f"]),
            ("osc/detune", "f", vec!["/osc/detune f"]),
            ("env/attack", "f", vec!["/env/attack f"]),
        ],
    }
    .run()
}

#[test]
fn array_endpoints_dispatch_by_index() {
    DispatchTest {
        table: voices(),
        cases: vec![
            ("gain2", "f", vec!["/gain2 f"]),
            ("gain3", "f", vec!["/gain3 f"]),
            // out of range, not a match
            ("gain4", "f", vec![]),
            ("gain", "f", vec![]),
            ("voice3/freq", "f", vec!["/voice3/freq f"]),
            ("voice7/gate", "T", vec!["/voice7/gate T"]),
            ("voice8/freq", "f", vec![]),
        ],
    }
    .run()
}

#[test]
fn deep_nesting_unwinds_the_buffer() {
    let leaf = EndpointTable::new(vec![Endpoint::new("leaf:i", "").with_handler(record)]);
    let mid = EndpointTable::new(vec![
        Endpoint::new("b/", "").with_subtable(leaf),
        Endpoint::new("x:f", "").with_handler(record),
    ]);
    let root = EndpointTable::new(vec![Endpoint::new("a/", "").with_subtable(mid)]);

    let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 64);
    root.dispatch(&Message::new("/a/b/leaf", "i"), &mut ctx);
    assert_eq!(ctx.user, vec!["/a/b/leaf i"]);
    assert_eq!(ctx.matches, 1);
    assert_eq!(ctx.address(), Some("/"));

    // a miss deep in the tree must unwind just the same
    root.dispatch(&Message::new("/a/b/nope", "i"), &mut ctx);
    assert_eq!(ctx.matches, 1);
    assert_eq!(ctx.address(), Some("/"));
}

#[test]
fn matched_endpoint_is_the_terminal() {
    let table = mixer();
    let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 128);
    table.dispatch(&Message::new("/osc/freq", "f"), &mut ctx);
    assert_eq!(ctx.matched.map(Endpoint::name), Some("freq:f"));
    assert_eq!(ctx.matched.map(|ep| ep.meta().get("unit")), Some(Some("Hz")));
}

#[test]
fn simple_mode_invokes_every_match() {
    let table = EndpointTable::new(vec![
        Endpoint::new("dump", "").with_handler(record),
        Endpoint::new("dump:s", "").with_handler(record),
    ]);
    let mut ctx = DispatchContext::new(Vec::new());
    table.dispatch(&Message::new("/dump", "s"), &mut ctx);
    assert_eq!(ctx.matches, 2);
    assert_eq!(ctx.user, vec!["- s", "- s"]);

    // the restricted endpoint drops out when the tags do not fit
    let mut ctx = DispatchContext::new(Vec::new());
    table.dispatch(&Message::new("/dump", "i"), &mut ctx);
    assert_eq!(ctx.matches, 1);
}

#[test]
fn handlers_may_descend_manually() {
    fn log_and_descend(m: &Message, d: &mut DispatchContext<Vec<String>>) {
        let line = format!("enter {}", d.address().unwrap_or("-"));
        d.user.push(line);
        if let Some(ep) = d.matched {
            if let Some(sub) = ep.subtable() {
                sub.dispatch(&m.snip(), d);
            }
        }
    }

    let oscillator =
        EndpointTable::new(vec![Endpoint::new("freq:f", "").with_handler(record)]);
    let root = EndpointTable::new(vec![Endpoint::new("osc/", "")
        .with_handler(log_and_descend)
        .with_subtable(oscillator)]);

    let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 64);
    root.dispatch(&Message::new("/osc/freq", "f"), &mut ctx);
    assert_eq!(ctx.user, vec!["enter /osc/", "/osc/freq f"]);
    assert_eq!(ctx.matches, 1);
    assert_eq!(ctx.address(), Some("/"));
}

#[test]
fn lookup_ignores_argument_restrictions() {
    let table = mixer();
    assert!(table.get("volume").is_some());
    assert!(table.get("volume:f").is_none());
    assert!(table.get("osc/").is_some());
    assert!(table.get("osc").is_none());
    assert!(table.get("bogus").is_none());

    let osc = table.get("osc/").and_then(Endpoint::subtable).unwrap();
    assert!(osc.get("freq").is_some());
}

#[test]
fn apropos_resolves_partial_paths() {
    let table = mixer();
    assert_eq!(table.apropos("/osc/freq").map(Endpoint::name), Some("freq:f"));
    assert_eq!(table.apropos("/osc/fre").map(Endpoint::name), Some("freq:f"));
    assert_eq!(table.apropos("/osc").map(Endpoint::name), Some("osc/"));
    assert_eq!(table.apropos("/osc/").map(Endpoint::name), Some("osc/"));
    assert_eq!(table.apropos("/vol").map(Endpoint::name), Some("volume:f"));
    assert_eq!(table.apropos("/env/rel").map(Endpoint::name), Some("release:f"));
    assert!(table.apropos("/bogus").is_none());
    assert!(table.apropos("/").is_none());
}

#[test]
fn user_object_is_scoped_with_with_user() {
    fn swap_log(m: &Message, d: &mut DispatchContext<Vec<String>>) {
        let nested = d.with_user(vec!["nested".to_string()], |d| {
            let line = format!("inner {}", m.types());
            d.user.push(line);
            d.user.clone()
        });
        assert_eq!(nested, vec!["nested".to_string(), "inner f".to_string()]);
        d.user.push("outer".to_string());
    }

    let table = EndpointTable::new(vec![Endpoint::new("freq:f", "").with_handler(swap_log)]);
    let mut ctx = DispatchContext::new(Vec::new());
    table.dispatch(&Message::new("/freq", "f"), &mut ctx);
    assert_eq!(ctx.user, vec!["outer".to_string()]);
}

#[test]
#[should_panic(expected = "must own a sub-table")]
fn nesting_names_require_subtables() {
    let _ = EndpointTable::<()>::new(vec![Endpoint::new("osc/", "")]);
}

#[test]
#[should_panic(expected = "must own a sub-table")]
fn subtables_require_nesting_names() {
    let sub = EndpointTable::<()>::new(vec![Endpoint::new("freq:f", "")]);
    let _ = EndpointTable::new(vec![Endpoint::new("osc", "").with_subtable(sub)]);
}

#[test]
fn tables_are_shareable_across_threads() {
    let table = std::sync::Arc::new(mixer());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let table = table.clone();
            std::thread::spawn(move || {
                let mut ctx = DispatchContext::with_address_capacity(Vec::new(), 128);
                table.dispatch(&Message::new("/osc/freq", "f"), &mut ctx);
                ctx.user
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["/osc/freq f"]);
    }
}
