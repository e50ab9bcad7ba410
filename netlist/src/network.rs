use indexmap::IndexMap;

use crate::{Design, DesignId, GrowVec, Instance, LatchInit, Object, ObjectData, ObjectId, ObjectKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkType {
    #[default]
    None,
    Netlist,
    Logic,
    Strashed,
    Other,
}

/// How the logic function of each node is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkFunc {
    #[default]
    None,
    Sop,
    Bdd,
    Aig,
    Map,
    MultiValued,
    BlackBox,
    Other,
}

/// A structural check failure, carrying every problem found in the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the network check has failed for model \"{network}\": {}", .problems.join("; "))]
pub struct CheckError {
    pub network: String,
    pub problems: Vec<String>,
}

/// A lowered module: a flat graph of objects, plus its links into the design hierarchy.
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    network_type: NetworkType,
    function: NetworkFunc,
    objects: GrowVec<Object>,
    object_counts: [usize; ObjectKind::COUNT],
    live_objects: usize,
    /// Every net, keyed by signal name.
    nets: IndexMap<String, ObjectId>,
    /// The design whose module list contains this network. Relation only; the design is owned elsewhere.
    design: Option<DesignId>,
    /// The rest of the design, retained by a root network extracted from a hierarchical design.
    hierarchy: Option<Box<Design>>,
    exdc: Option<Box<Network>>,
    model_id: usize,
    spec: Option<String>,
    ltl_properties: GrowVec<String>,
}

impl Network {
    pub fn new(name: impl Into<String>, network_type: NetworkType, function: NetworkFunc) -> Self {
        Network {
            name: name.into(),
            network_type,
            function,
            objects: GrowVec::new(),
            object_counts: [0; ObjectKind::COUNT],
            live_objects: 0,
            nets: IndexMap::new(),
            design: None,
            hierarchy: None,
            exdc: None,
            model_id: 0,
            spec: None,
            ltl_properties: GrowVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn function(&self) -> NetworkFunc {
        self.function
    }

    pub fn object_count(&self, kind: ObjectKind) -> usize {
        self.object_counts[kind.index()]
    }

    pub fn live_object_count(&self) -> usize {
        self.live_objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.entry(id.index()).ok()
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.objects.iter().enumerate().map(|(index, object)| (ObjectId::from_index(index), object))
    }

    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.objects().filter(move |(_, object)| object.kind == kind)
    }

    pub fn add_object(&mut self, kind: ObjectKind, name: Option<String>, data: ObjectData) -> ObjectId {
        let id = ObjectId::from_index(self.objects.len());
        self.objects.push(Object { kind, name, fanins: Default::default(), fanouts: Default::default(), data });
        self.object_counts[kind.index()] += 1;
        self.live_objects += 1;
        id
    }

    /// Adds an edge from `driver` to `sink`.
    ///
    /// Panics if either id does not name an object of this network.
    pub fn connect(&mut self, driver: ObjectId, sink: ObjectId) {
        self.objects[driver.index()].fanouts.push(sink);
        self.objects[sink.index()].fanins.push(driver);
    }

    pub fn net(&self, name: &str) -> Option<ObjectId> {
        self.nets.get(name).copied()
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    pub fn find_or_add_net(&mut self, name: &str) -> ObjectId {
        if let Some(id) = self.net(name) {
            return id;
        }
        let id = self.add_object(ObjectKind::Net, Some(name.to_owned()), ObjectData::None);
        self.nets.insert(name.to_owned(), id);
        id
    }

    /// Returns the object driving the net named `name`, if any.
    pub fn driver(&self, name: &str) -> Option<ObjectId> {
        let net = self.object(self.net(name)?)?;
        net.fanins.first().copied()
    }

    pub fn set_latch_init(&mut self, latch: ObjectId, init: LatchInit) -> bool {
        match self.objects.entry_mut(latch.index()) {
            Ok(Object { data: ObjectData::Latch(value), .. }) => {
                *value = init;
                true
            }
            _ => false,
        }
    }

    /// Names of the models instantiated by boxes of this network, in object order, with repetitions.
    pub fn instantiated_models(&self) -> impl Iterator<Item = &str> + '_ {
        self.objects.iter().filter_map(Object::instance).map(|instance| instance.model.as_str())
    }

    pub fn instances(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.objects.iter().filter_map(Object::instance)
    }

    pub fn design(&self) -> Option<DesignId> {
        self.design
    }

    pub(crate) fn set_design(&mut self, design: Option<DesignId>) {
        self.design = design;
    }

    /// Takes ownership of the remainder of the design this network was extracted from.
    ///
    /// The network does not become a member of that design; its design link stays as it is.
    pub fn adopt_design(&mut self, design: Design) {
        self.hierarchy = Some(Box::new(design));
    }

    pub fn hierarchy(&self) -> Option<&Design> {
        self.hierarchy.as_deref()
    }

    pub fn find_submodule(&self, name: &str) -> Option<&Network> {
        let design = self.hierarchy()?;
        design.module(design.find_module(name)?)
    }

    pub fn exdc(&self) -> Option<&Network> {
        self.exdc.as_deref()
    }

    /// Attaches a don't-care companion network. Panics if one is already attached.
    pub fn attach_exdc(&mut self, mut exdc: Network) {
        assert!(self.exdc.is_none(), "network {:?} already has an EXDC network", self.name);
        exdc.design = None;
        self.exdc = Some(Box::new(exdc));
    }

    pub fn model_id(&self) -> usize {
        self.model_id
    }

    pub(crate) fn set_model_id(&mut self, model_id: usize) {
        self.model_id = model_id;
    }

    pub fn spec(&self) -> Option<&str> {
        self.spec.as_deref()
    }

    pub fn set_spec(&mut self, spec: Option<String>) {
        self.spec = spec;
    }

    pub fn ltl_properties(&self) -> &GrowVec<String> {
        &self.ltl_properties
    }

    pub fn add_ltl_property(&mut self, property: String) {
        self.ltl_properties.push(property);
    }

    /// Checks the internal consistency of the network.
    ///
    /// The network is consistent when:
    ///
    /// 1. Every fan-in and fan-out refers to an existing object, and fan-in lists mirror fan-out lists.
    /// 2. The per-kind object counters and the live object counter match a recount.
    /// 3. Inputs have no fan-ins and drive at most one net; outputs have one fan-in and no fan-outs.
    /// 4. Nodes and latches drive exactly one net; latches are driven by exactly one net.
    /// 5. Nets have at most one driver and are registered under their own name.
    /// 6. Node covers agree with the node's fan-in count, and boxes agree with their instance's port lists.
    pub fn check(&self) -> Result<(), CheckError> {
        let mut checker = NetworkChecker { network: self, problems: Vec::new() };
        checker.check_counts();
        for (id, object) in self.objects() {
            checker.check_edges(id, object);
            checker.check_object(id, object);
        }
        checker.check_net_names();
        if checker.problems.is_empty() {
            Ok(())
        } else {
            Err(CheckError { network: self.name.clone(), problems: checker.problems })
        }
    }
}

struct NetworkChecker<'a> {
    network: &'a Network,
    problems: Vec<String>,
}

impl NetworkChecker<'_> {
    fn err(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }

    fn describe(&self, id: ObjectId) -> String {
        match self.network.object(id) {
            Some(Object { kind, name: Some(name), .. }) => format!("{kind} \"{name}\""),
            Some(Object { kind, .. }) => format!("{kind} {id}"),
            None => format!("object {id}"),
        }
    }

    fn check_counts(&mut self) {
        let mut counts = [0; ObjectKind::COUNT];
        for object in &self.network.objects {
            counts[object.kind.index()] += 1;
        }
        for kind in ObjectKind::ALL {
            let (recorded, actual) = (self.network.object_counts[kind.index()], counts[kind.index()]);
            if recorded != actual {
                self.err(format!("{kind} count is {recorded}, but there are {actual} {kind} objects"));
            }
        }
        let live = counts.iter().sum::<usize>();
        if self.network.live_objects != live {
            self.err(format!("live object count is {}, but there are {live} objects", self.network.live_objects));
        }
    }

    fn check_edges(&mut self, id: ObjectId, object: &Object) {
        for &fanin in &object.fanins {
            let Some(driver) = self.network.object(fanin) else {
                self.err(format!("{} has a dangling fan-in {fanin}", self.describe(id)));
                continue;
            };
            let forward = object.fanins.iter().filter(|&&other| other == fanin).count();
            let backward = driver.fanouts.iter().filter(|&&other| other == id).count();
            if forward != backward {
                self.err(format!("{} is not a fan-out of its fan-in {}", self.describe(id), self.describe(fanin)));
            }
        }
        for &fanout in &object.fanouts {
            let Some(sink) = self.network.object(fanout) else {
                self.err(format!("{} has a dangling fan-out {fanout}", self.describe(id)));
                continue;
            };
            let forward = object.fanouts.iter().filter(|&&other| other == fanout).count();
            let backward = sink.fanins.iter().filter(|&&other| other == id).count();
            if forward != backward {
                self.err(format!("{} is not a fan-in of its fan-out {}", self.describe(id), self.describe(fanout)));
            }
        }
    }

    fn check_drives_one_net(&mut self, id: ObjectId, object: &Object) {
        if object.fanouts.len() != 1 {
            self.err(format!("{} drives {} nets instead of one", self.describe(id), object.fanouts.len()));
            return;
        }
        self.check_all_nets(id, &object.fanouts);
    }

    fn check_all_nets(&mut self, id: ObjectId, others: &[ObjectId]) {
        for &other in others {
            if let Some(target) = self.network.object(other) {
                if target.kind != ObjectKind::Net {
                    let (object, other) = (self.describe(id), self.describe(other));
                    self.err(format!("{object} is connected to {other} instead of a net"));
                }
            }
        }
    }

    fn check_object(&mut self, id: ObjectId, object: &Object) {
        match object.kind {
            ObjectKind::PrimaryInput => {
                if !object.fanins.is_empty() {
                    self.err(format!("{} has fan-ins", self.describe(id)));
                }
                if object.fanouts.len() > 1 {
                    self.err(format!("{} drives more than one net", self.describe(id)));
                }
                self.check_all_nets(id, &object.fanouts);
            }
            ObjectKind::PrimaryOutput => {
                if object.fanins.len() != 1 {
                    self.err(format!("{} has {} fan-ins instead of one", self.describe(id), object.fanins.len()));
                }
                if !object.fanouts.is_empty() {
                    self.err(format!("{} has fan-outs", self.describe(id)));
                }
                self.check_all_nets(id, &object.fanins);
            }
            ObjectKind::Net => {
                if object.fanins.len() > 1 {
                    let drivers: Vec<String> = object.fanins.iter().map(|&driver| self.describe(driver)).collect();
                    self.err(format!("{} has multiple drivers: {}", self.describe(id), drivers.join(", ")));
                }
                if object.fanins.is_empty() {
                    tracing::warn!(network = self.network.name.as_str(), "{} is not driven", self.describe(id));
                }
            }
            ObjectKind::Node => {
                self.check_drives_one_net(id, object);
                self.check_all_nets(id, &object.fanins);
                match &object.data {
                    ObjectData::Cover(rows) => {
                        for row in rows {
                            let parts: Vec<&str> = row.split_whitespace().collect();
                            let well_formed = match (object.fanins.len(), parts.as_slice()) {
                                (0, [_output]) => true,
                                (width, [inputs, _output]) => inputs.len() == width,
                                _ => false,
                            };
                            if !well_formed {
                                let node = self.describe(id);
                                self.err(format!("{node} has a cover row {row:?} that does not match its fan-ins"));
                            }
                        }
                    }
                    _ => self.err(format!("{} has no cover", self.describe(id))),
                }
            }
            ObjectKind::Latch => {
                if object.fanins.len() != 1 {
                    self.err(format!("{} has {} fan-ins instead of one", self.describe(id), object.fanins.len()));
                }
                self.check_all_nets(id, &object.fanins);
                self.check_drives_one_net(id, object);
                if object.latch_init().is_none() {
                    self.err(format!("{} has no initial value", self.describe(id)));
                }
            }
            ObjectKind::BlackBox => {
                self.check_all_nets(id, &object.fanins);
                self.check_all_nets(id, &object.fanouts);
                match object.instance() {
                    Some(instance) => {
                        let (inputs, outputs) = (instance.inputs.len(), instance.outputs.len());
                        if inputs != object.fanins.len() || outputs != object.fanouts.len() {
                            self.err(format!(
                                "{} instantiating \"{}\" binds {inputs} inputs and {outputs} outputs, \
                                 but has {} fan-ins and {} fan-outs",
                                self.describe(id),
                                instance.model,
                                object.fanins.len(),
                                object.fanouts.len(),
                            ));
                        }
                    }
                    None => self.err(format!("{} does not name an instantiated model", self.describe(id))),
                }
            }
        }
    }

    fn check_net_names(&mut self) {
        for (name, &id) in &self.network.nets {
            match self.network.object(id) {
                Some(object) if object.kind == ObjectKind::Net && object.name.as_deref() == Some(name) => (),
                _ => self.err(format!("net \"{name}\" is registered as {}", self.describe(id))),
            }
        }
        for (id, object) in self.network.objects_of_kind(ObjectKind::Net) {
            let registered = object.name.as_deref().and_then(|name| self.network.net(name));
            if registered != Some(id) {
                self.err(format!("{} is not registered under its name", self.describe(id)));
            }
        }
    }
}
