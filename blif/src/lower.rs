use abc_mini_netlist::{Instance, LatchInit, Network, NetworkFunc, NetworkType, ObjectData, ObjectId, ObjectKind};
use indexmap::IndexMap;

use crate::{ParseError, module::Module};

const RESET_LATCH_NAME: &str = "abc_reset_latch";
const RESET_LATCH_DATA: &str = "abc_reset_latch_data";

/// Builds the network for a fully parsed module. Every signal name becomes one net.
pub(crate) fn lower(module: &mut Module) -> Result<Network, ParseError> {
    let function = if module.blackbox { NetworkFunc::BlackBox } else { NetworkFunc::Sop };
    let mut network = Network::new(module.name.clone(), NetworkType::Netlist, function);

    for name in &module.inputs {
        let input = network.add_object(ObjectKind::PrimaryInput, Some(name.clone()), ObjectData::None);
        let net = network.find_or_add_net(name);
        network.connect(input, net);
    }
    for name in &module.outputs {
        let output = network.add_object(ObjectKind::PrimaryOutput, Some(name.clone()), ObjectData::None);
        let net = network.find_or_add_net(name);
        network.connect(net, output);
    }

    for names in &module.names {
        let cover = names.cover.iter().cloned().collect();
        let node = network.add_object(ObjectKind::Node, None, ObjectData::Cover(cover));
        for input in &names.inputs {
            let net = network.find_or_add_net(input);
            network.connect(net, node);
        }
        let net = network.find_or_add_net(&names.output);
        network.connect(node, net);
    }

    let mut latches = IndexMap::new();
    for latch in &module.latches {
        let object = add_latch(&mut network, &latch.input, &latch.output, latch.init);
        latches.insert(latch.output.as_str(), object);
    }
    for reset in &module.resets {
        let Some(&latch) = latches.get(reset.latch.as_str()) else {
            return Err(ParseError::at(reset.line, format!("\"{}\" is not the output of a latch", reset.latch)));
        };
        if let Some(value) = reset.value {
            network.set_latch_init(latch, value);
        }
    }

    for subckt in &module.subckts {
        let instance = Instance {
            model: subckt.model.clone(),
            inputs: subckt.inputs.iter().map(|(formal, _)| formal.clone()).collect(),
            outputs: subckt.outputs.iter().map(|(formal, _)| formal.clone()).collect(),
        };
        let object = network.add_object(ObjectKind::BlackBox, None, ObjectData::Instance(instance));
        for (_, actual) in &subckt.inputs {
            let net = network.find_or_add_net(actual);
            network.connect(net, object);
        }
        for (_, actual) in &subckt.outputs {
            let net = network.find_or_add_net(actual);
            network.connect(object, net);
        }
    }

    // Every module signal has its net by now; the generated names must not collide with them.
    if !module.resets.is_empty() {
        let data_name = unused_net_name(&network, RESET_LATCH_DATA);
        let zero = network.add_object(ObjectKind::Node, None, ObjectData::Cover(vec!["0".into()]));
        let data = network.find_or_add_net(&data_name);
        network.connect(zero, data);
        let name = unused_net_name(&network, RESET_LATCH_NAME);
        module.reset_latch = Some(add_latch(&mut network, &data_name, &name, LatchInit::One));
    }

    Ok(network)
}

/// Returns `base`, or `base` with the smallest numeric suffix that makes it the name of no net in `network`.
fn unused_net_name(network: &Network, base: &str) -> String {
    if network.net(base).is_none() {
        return base.to_owned();
    }
    (1..)
        .map(|suffix| format!("{base}_{suffix}"))
        .find(|name| network.net(name).is_none())
        .unwrap_or_else(|| unreachable!())
}

fn add_latch(network: &mut Network, input: &str, output: &str, init: LatchInit) -> ObjectId {
    let latch = network.add_object(ObjectKind::Latch, Some(output.to_owned()), ObjectData::Latch(init));
    let data = network.find_or_add_net(input);
    network.connect(data, latch);
    let net = network.find_or_add_net(output);
    network.connect(latch, net);
    latch
}
