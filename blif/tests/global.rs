use std::sync::{Arc, Mutex};

use abc_mini_blif::{AbcResult, read_blif};
use abc_mini_netlist::{Network, NetworkFunc, NetworkType, global, install_fault_handler, reset_fault_handlers};

const AND2: &str = concat!(
    ".model and2\n",
    ".inputs a b\n",
    ".outputs y\n",
    ".names a b y\n",
    "11 1\n",
    ".end\n",
);

#[test]
fn test_read_blif() {
    let mut network = None;
    assert_eq!(read_blif(Some(AND2), &mut network), AbcResult::Ok);
    let network = network.unwrap();
    assert_eq!(network.name(), "and2");
    assert_eq!(network.spec(), None);
}

#[test]
#[should_panic]
fn test_read_blif_without_text() {
    let mut network = None;
    read_blif(None, &mut network);
}

#[test]
#[should_panic]
fn test_read_blif_into_populated() {
    let mut network = Some(Network::new("old", NetworkType::Netlist, NetworkFunc::Sop));
    read_blif(Some(AND2), &mut network);
}

// The only test in this binary that emits faults, since it changes the process-wide handlers.
#[test]
fn test_process_wide_handlers() {
    let log = Arc::new(Mutex::new(Vec::new()));
    reset_fault_handlers();
    assert!(global().has_only_default());

    let sink = log.clone();
    install_fault_handler(move |message| sink.lock().unwrap().push(format!("first: {message}")));
    assert_eq!(global().handler_count(), 1);
    let sink = log.clone();
    install_fault_handler(move |message| sink.lock().unwrap().push(format!("second: {message}")));
    assert_eq!(global().handler_count(), 2);

    let mut network = None;
    assert_eq!(read_blif(Some(".model top\n.inputs a\n"), &mut network), AbcResult::Error);
    assert!(network.is_none());
    {
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log[0].starts_with("first: "));
        assert!(log[0].ends_with("line 1: model \"top\" is not terminated with .end"));
        assert!(log[1].starts_with("second: "));
    }

    reset_fault_handlers();
    reset_fault_handlers();
    assert!(global().has_only_default());
    assert_eq!(global().handler_count(), 1);
}
