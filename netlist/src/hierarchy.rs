use std::collections::BTreeSet;

use crate::{Design, GrowVec, IntVec};

/// Name of the model holding the external don't-care network of the model preceding it.
pub const EXDC_NAME: &str = "EXDC";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("the hierarchy of network \"{root}\" is cyclic: model \"{module}\" is part of an instantiation cycle")]
    Cycle { root: String, module: String },
}

/// Moves the first module named [`EXDC_NAME`] (other than the first module) into the module preceding it as its
/// don't-care network. Returns the index of the module that received it.
///
/// Only one module is moved; a later module with the same name stays in the design as an ordinary module.
pub fn extract_exdc(design: &mut Design) -> Option<usize> {
    let mut root = 0;
    for index in 1..design.modules().len() {
        if design.modules()[index].name() == EXDC_NAME {
            let exdc = design.detach_module(index)?;
            design.module_mut(root)?.attach_exdc(exdc);
            return Some(root);
        }
        root = index;
    }
    None
}

/// Collects the modules that are not instantiated by any other module, in module order, and returns how many there
/// are. The result is also stored in the design's top-level module list.
pub fn find_top_level_modules(design: &mut Design) -> usize {
    let mut instantiated = BTreeSet::new();
    for module in design.modules() {
        for model in module.instantiated_models() {
            if model != module.name() {
                instantiated.insert(model);
            }
        }
    }
    let top_level_modules: IntVec = design
        .modules()
        .iter()
        .enumerate()
        .filter(|(_, module)| !instantiated.contains(module.name()))
        .map(|(index, _)| index)
        .collect();
    let count = top_level_modules.len();
    design.set_top_level_modules(top_level_modules);
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct HierarchyChecker<'a> {
    design: &'a Design,
    marks: GrowVec<Mark>,
}

impl HierarchyChecker<'_> {
    /// Returns the name of the module closing a cycle, if one is reachable from `index`.
    fn check(&mut self, index: usize) -> Result<(), String> {
        match self.marks[index] {
            Mark::Done => return Ok(()),
            Mark::InProgress => return Err(self.design.modules()[index].name().to_owned()),
            Mark::Unvisited => (),
        }
        self.marks[index] = Mark::InProgress;
        let design = self.design;
        for model in design.modules()[index].instantiated_models() {
            if let Some(child) = design.find_module(model) {
                self.check(child)?;
            }
        }
        self.marks[index] = Mark::Done;
        Ok(())
    }
}

/// Verifies that no chain of subcircuit instances starting at the module at `root` leads back to a module already on
/// the chain.
///
/// Panics if `root` is not an index into the design's module list.
pub fn check_acyclic_hierarchy(design: &Design, root: usize) -> Result<(), HierarchyError> {
    let mut checker = HierarchyChecker {
        design,
        marks: std::iter::repeat_n(Mark::Unvisited, design.modules().len()).collect(),
    };
    checker.check(root).map_err(|module| HierarchyError::Cycle {
        root: design.modules()[root].name().to_owned(),
        module,
    })
}
