//! This library provides the in-memory form of a hierarchical netlist design.
//!
//! A [`Design`] owns a list of [`Network`]s, one per model. Each network is a flat graph of [`Object`]s (inputs,
//! outputs, nets, nodes, latches and subcircuit boxes) connected by fan-in and fan-out edges; boxes refer to other
//! networks of the design by model name, forming the hierarchy that [`check_acyclic_hierarchy`] validates.
//!
//! All collections are [`GrowVec`]s. Faults are reported through a [`Diagnostics`] channel.

mod vec;
mod diagnostics;
mod object;
mod network;
mod design;
mod hierarchy;

pub use vec::{GrowVec, IntVec, VecError};
pub use diagnostics::{
    Diagnostics, FaultHandler, SourceLocation, default_fault_handler, global, install_fault_handler,
    reset_fault_handlers,
};
pub use object::{Instance, LatchInit, Object, ObjectData, ObjectId, ObjectKind};
pub use network::{CheckError, Network, NetworkFunc, NetworkType};
pub use design::{Design, DesignId};
pub use hierarchy::{EXDC_NAME, HierarchyError, check_acyclic_hierarchy, extract_exdc, find_top_level_modules};
