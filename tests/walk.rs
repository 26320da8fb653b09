use oscroute::{walk_ports, walk_ports_summarized, Endpoint, EndpointTable};

fn addresses(table: &EndpointTable<()>, summarized: bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut push = |_ep: &Endpoint<()>, addr: &str| out.push(addr.to_string());
    if summarized {
        walk_ports_summarized(table, &mut buf, &mut push);
    } else {
        walk_ports(table, &mut buf, &mut push);
    }
    assert_eq!(buf, "/", "walk must restore the shared buffer");
    out
}

#[test]
fn arrays_expand_to_concrete_addresses() {
    let table = EndpointTable::new(vec![Endpoint::new("gain#4:f", "")]);
    assert_eq!(addresses(&table, false), ["/gain0", "/gain1", "/gain2", "/gain3"]);
}

#[test]
fn arrays_summarize_to_brackets() {
    let table = EndpointTable::new(vec![Endpoint::new("gain#4:f", "")]);
    assert_eq!(addresses(&table, true), ["/gain[0,3]"]);
}

#[test]
fn subtables_are_entered_in_table_order() {
    let oscillator = EndpointTable::new(vec![
        Endpoint::new("freq:f", ""),
        Endpoint::new("wave:s", ""),
    ]);
    let table = EndpointTable::new(vec![
        Endpoint::new("osc/", "").with_subtable(oscillator),
        Endpoint::new("volume:f", ""),
    ]);
    assert_eq!(addresses(&table, false), ["/osc/freq", "/osc/wave", "/volume"]);
}

#[test]
fn array_subtables_expand_per_index() {
    let voice = EndpointTable::new(vec![
        Endpoint::new("freq:f", ""),
        Endpoint::new("gate:T:F", ""),
    ]);
    let table = EndpointTable::new(vec![Endpoint::new("voice#2/", "").with_subtable(voice)]);
    assert_eq!(
        addresses(&table, false),
        ["/voice0/freq", "/voice0/gate", "/voice1/freq", "/voice1/gate"]
    );
    assert_eq!(addresses(&table, true), ["/voice[0,1]/freq", "/voice[0,1]/gate"]);
}

#[test]
fn empty_tables_enumerate_nothing() {
    let table = EndpointTable::<()>::new(vec![]);
    assert!(addresses(&table, false).is_empty());
}
