use std::sync::atomic::{AtomicU32, Ordering};

use crate::{GrowVec, IntVec, Network};

/// Identity of a [`Design`], used by member networks to refer back to it without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DesignId(u32);

impl DesignId {
    fn fresh() -> DesignId {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        DesignId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A set of networks read together, one per model.
///
/// Member networks record the design's [`DesignId`] while they are in the module list. Detaching a network is the only
/// way to take one out, and clears that record.
#[derive(Debug, Clone)]
pub struct Design {
    id: DesignId,
    name: String,
    modules: GrowVec<Network>,
    /// Indices into `modules` of networks that no other network instantiates. Filled by
    /// [`find_top_level_modules`](crate::find_top_level_modules).
    top_level_modules: IntVec,
}

impl Design {
    pub fn new(name: impl Into<String>) -> Self {
        Design { id: DesignId::fresh(), name: name.into(), modules: GrowVec::new(), top_level_modules: IntVec::new() }
    }

    pub fn id(&self) -> DesignId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modules(&self) -> &GrowVec<Network> {
        &self.modules
    }

    pub fn module(&self, index: usize) -> Option<&Network> {
        self.modules.entry(index).ok()
    }

    pub fn module_mut(&mut self, index: usize) -> Option<&mut Network> {
        self.modules.entry_mut(index).ok()
    }

    /// Returns the index of the first module named `name`.
    pub fn find_module(&self, name: &str) -> Option<usize> {
        self.modules.iter().position(|module| module.name() == name)
    }

    pub fn add_module(&mut self, mut network: Network) -> usize {
        let index = self.modules.len();
        network.set_design(Some(self.id));
        network.set_model_id(index);
        self.modules.push(network);
        index
    }

    /// Takes the module at `index` out of the design, clearing its design link.
    ///
    /// Later modules shift down by one. The top-level module list loses `index` and is renumbered to match.
    pub fn detach_module(&mut self, index: usize) -> Option<Network> {
        let mut network = self.modules.remove_at(index).ok()?;
        network.set_design(None);
        self.top_level_modules = self
            .top_level_modules
            .iter()
            .filter(|&&top| top != index)
            .map(|&top| if top > index { top - 1 } else { top })
            .collect();
        Some(network)
    }

    pub fn top_level_modules(&self) -> &IntVec {
        &self.top_level_modules
    }

    pub(crate) fn set_top_level_modules(&mut self, top_level_modules: IntVec) {
        self.top_level_modules = top_level_modules;
    }
}

#[cfg(test)]
mod test {
    use crate::{Design, Network, NetworkFunc, NetworkType};

    #[test]
    fn test_add_detach() {
        let mut design = Design::new("test");
        let a = design.add_module(Network::new("a", NetworkType::Netlist, NetworkFunc::Sop));
        let b = design.add_module(Network::new("b", NetworkType::Netlist, NetworkFunc::Sop));
        assert_eq!((a, b), (0, 1));
        assert_eq!(design.module(b).unwrap().design(), Some(design.id()));
        assert_eq!(design.module(b).unwrap().model_id(), 1);
        assert_eq!(design.find_module("b"), Some(1));

        let a = design.detach_module(0).unwrap();
        assert_eq!(a.design(), None);
        assert_eq!(design.modules().len(), 1);
        assert_eq!(design.find_module("b"), Some(0));
        assert!(design.detach_module(1).is_none());
    }

    #[test]
    fn test_detach_renumbers_top_level_modules() {
        let mut design = Design::new("test");
        for name in ["a", "b", "c", "d"] {
            design.add_module(Network::new(name, NetworkType::Netlist, NetworkFunc::Sop));
        }
        design.set_top_level_modules([0, 1, 3].into_iter().collect());
        let b = design.detach_module(1).unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(design.top_level_modules().as_slice(), &[0, 2]);
        assert_eq!(design.module(2).unwrap().name(), "d");
        design.detach_module(0).unwrap();
        assert_eq!(design.top_level_modules().as_slice(), &[1]);
    }

    #[test]
    fn test_distinct_ids() {
        assert_ne!(Design::new("x").id(), Design::new("x").id());
    }
}
