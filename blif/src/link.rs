use abc_mini_netlist::{
    Design, Diagnostics, GrowVec, Network, check_acyclic_hierarchy, emit_fault, extract_exdc, find_top_level_modules,
};

use crate::ImportError;

fn fail(diagnostics: &Diagnostics, message: String) -> ImportError {
    emit_fault!(diagnostics, "{message}");
    ImportError { message }
}

/// Validates a freshly parsed design and extracts its root network.
///
/// Every network must pass its structural check. The first `EXDC` model becomes the don't-care network of the model
/// before it. The first top-level module is chosen as the root and must have an acyclic hierarchy. A design with a
/// single module is dissolved; otherwise the root keeps the rest of the design.
pub(crate) fn link(
    mut design: Design,
    ltl_properties: GrowVec<String>,
    filename: Option<&str>,
    diagnostics: &Diagnostics,
) -> Result<Network, ImportError> {
    for network in design.modules() {
        if let Err(err) = network.check() {
            return Err(fail(diagnostics, err.to_string()));
        }
    }
    tracing::debug!(modules = design.modules().len(), "validated networks");

    if let Some(index) = extract_exdc(&mut design) {
        tracing::debug!(network = design.modules()[index].name(), "attached EXDC network");
    }

    let count = find_top_level_modules(&mut design);
    let root = design.top_level_modules().first().copied().unwrap_or(0);
    if count > 1 {
        emit_fault!(
            diagnostics,
            "warning: the design has {count} root-level modules; the first one (\"{}\") will be used and {} ignored",
            design.modules()[root].name(),
            count - 1,
        );
    }

    if let Err(err) = check_acyclic_hierarchy(&design, root) {
        return Err(fail(diagnostics, err.to_string()));
    }

    let singleton = design.modules().len() == 1;
    let Some(mut network) = design.detach_module(root) else {
        unreachable!("the design has no modules");
    };
    if singleton {
        network.set_spec(filename.map(str::to_owned));
    } else {
        network.adopt_design(design);
        if network.spec().is_none() {
            network.set_spec(filename.map(str::to_owned));
        }
    }

    for property in ltl_properties {
        network.add_ltl_property(property);
    }
    if cfg!(feature = "trace") {
        eprintln!(">link: root {:?}, {} properties", network.name(), network.ltl_properties().len());
    }
    tracing::debug!(root = network.name(), singleton, "linked root network");
    Ok(network)
}
