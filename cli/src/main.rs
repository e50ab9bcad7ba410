use std::process::ExitCode;

use abc_mini_blif::Importer;
use abc_mini_netlist::{Network, ObjectKind, install_fault_handler};

fn setup_tracing() {
    use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true).with_indent_lines(true));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("abc-mini: a tracing subscriber is already installed");
    }
}

fn print_summary(network: &Network) {
    println!("network \"{}\" ({:?}, {:?})", network.name(), network.network_type(), network.function());
    if let Some(spec) = network.spec() {
        println!("  read from: {spec}");
    }
    for kind in ObjectKind::ALL {
        println!("  {kind}: {}", network.object_count(kind));
    }
    if let Some(exdc) = network.exdc() {
        println!("  exdc: \"{}\" with {} objects", exdc.name(), exdc.live_object_count());
    }
    if let Some(design) = network.hierarchy() {
        println!("  submodules: {}", design.modules().len());
        for module in design.modules() {
            println!("    {}", module.name());
        }
    }
    for property in network.ltl_properties() {
        println!("  ltl: {property}");
    }
}

fn main() -> ExitCode {
    let mut input = String::new();
    let mut verbose = false;
    let mut default_handler = false;
    {
        let mut parser = argparse::ArgumentParser::new();
        parser.set_description("Import a hierarchical BLIF netlist and summarize its root network.");
        parser.refer(&mut verbose).add_option(&["-v", "--verbose"], argparse::StoreTrue, "Log import stages");
        parser.refer(&mut default_handler).add_option(
            &["--default-handler"],
            argparse::StoreTrue,
            "Report faults with the built-in handler",
        );
        parser.refer(&mut input).add_argument("INPUT", argparse::Store, "BLIF file to read").required();
        parser.parse_args_or_exit();
    }

    if verbose {
        setup_tracing();
    }
    if !default_handler {
        install_fault_handler(|message| println!("ABC MINI ERROR:\n{message}"));
    }

    let text = match std::fs::read_to_string(&input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("abc-mini: cannot read {input}: {err}");
            return ExitCode::FAILURE;
        }
    };
    match Importer::new().filename(input.as_str()).import(&text) {
        Ok(network) => {
            print_summary(&network);
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
