use std::ops::Range;

use abc_mini_netlist::{GrowVec, LatchInit, Network, ObjectId};

/// A `.names` table: fan-in signals, the driven signal and the cover rows.
#[derive(Debug, Clone)]
pub(crate) struct NamesDecl {
    pub inputs: Vec<String>,
    pub output: String,
    pub cover: GrowVec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct LatchDecl {
    pub input: String,
    pub output: String,
    pub init: LatchInit,
}

#[derive(Debug, Clone)]
pub(crate) struct ResetDecl {
    pub line: usize,
    /// Output signal of the latch being reset.
    pub latch: String,
    pub value: Option<LatchInit>,
}

/// A `.subckt` line with its bindings sorted into the instantiated model's inputs and outputs, as
/// `(formal, actual)` pairs in the order written.
#[derive(Debug, Clone)]
pub(crate) struct SubcktDecl {
    pub model: String,
    pub inputs: Vec<(String, String)>,
    pub outputs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PortDirection {
    Input,
    Output,
}

/// A model as read from the text, before it is lowered into a [`Network`].
///
/// The interface scan fills in the name, ports and the range of body lines; the body parse fills in the rest.
#[derive(Debug)]
pub(crate) struct Module {
    pub name: String,
    pub header_line: usize,
    /// Indices into the manager's line list.
    pub body: Range<usize>,
    pub inputs: GrowVec<String>,
    pub outputs: GrowVec<String>,
    pub latches: GrowVec<LatchDecl>,
    pub resets: GrowVec<ResetDecl>,
    pub names: GrowVec<NamesDecl>,
    pub subckts: GrowVec<SubcktDecl>,
    pub blackbox: bool,
    pub reset_latch: Option<ObjectId>,
    pub network: Option<Network>,
}

impl Module {
    pub fn new(name: impl Into<String>, header_line: usize, body_start: usize) -> Self {
        Module {
            name: name.into(),
            header_line,
            body: body_start..body_start,
            inputs: GrowVec::new(),
            outputs: GrowVec::new(),
            latches: GrowVec::new(),
            resets: GrowVec::new(),
            names: GrowVec::new(),
            subckts: GrowVec::new(),
            blackbox: false,
            reset_latch: None,
            network: None,
        }
    }

    pub fn port_direction(&self, name: &str) -> Option<PortDirection> {
        if self.inputs.iter().any(|input| input == name) {
            Some(PortDirection::Input)
        } else if self.outputs.iter().any(|output| output == name) {
            Some(PortDirection::Output)
        } else {
            None
        }
    }
}
