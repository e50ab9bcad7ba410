use std::fmt::{Debug, Display};

use smallvec::SmallVec;

/// Index of an [`Object`] within its [`Network`].
///
/// [`Network`]: crate::Network
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    pub(crate) index: u32,
}

impl ObjectId {
    pub(crate) fn from_index(index: usize) -> ObjectId {
        assert!(index < u32::MAX as usize);
        ObjectId { index: index as u32 }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.index)
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    PrimaryInput,
    PrimaryOutput,
    Net,
    Node,
    Latch,
    BlackBox,
}

impl ObjectKind {
    pub const COUNT: usize = 6;

    pub const ALL: [ObjectKind; ObjectKind::COUNT] = [
        ObjectKind::PrimaryInput,
        ObjectKind::PrimaryOutput,
        ObjectKind::Net,
        ObjectKind::Node,
        ObjectKind::Latch,
        ObjectKind::BlackBox,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::PrimaryInput => "input",
            ObjectKind::PrimaryOutput => "output",
            ObjectKind::Net => "net",
            ObjectKind::Node => "node",
            ObjectKind::Latch => "latch",
            ObjectKind::BlackBox => "box",
        };
        f.write_str(name)
    }
}

/// Initial value of a latch, as written in the `.latch` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LatchInit {
    Zero,
    One,
    DontCare,
    #[default]
    Unknown,
}

impl LatchInit {
    pub fn from_digit(digit: &str) -> Option<LatchInit> {
        match digit {
            "0" => Some(LatchInit::Zero),
            "1" => Some(LatchInit::One),
            "2" => Some(LatchInit::DontCare),
            "3" => Some(LatchInit::Unknown),
            _ => None,
        }
    }
}

/// A subcircuit instance: the instantiated model and the formal port names bound to the box's fan-ins (inputs)
/// and fan-outs (outputs), in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub model: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectData {
    None,
    /// Sum-of-products cover rows of a node, kept verbatim.
    Cover(Vec<String>),
    Latch(LatchInit),
    Instance(Instance),
}

#[derive(Debug, Clone)]
pub struct Object {
    pub(crate) kind: ObjectKind,
    pub(crate) name: Option<String>,
    pub(crate) fanins: SmallVec<[ObjectId; 4]>,
    pub(crate) fanouts: SmallVec<[ObjectId; 4]>,
    pub(crate) data: ObjectData,
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fanins(&self) -> &[ObjectId] {
        &self.fanins
    }

    pub fn fanouts(&self) -> &[ObjectId] {
        &self.fanouts
    }

    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    pub fn cover(&self) -> Option<&[String]> {
        match &self.data {
            ObjectData::Cover(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn latch_init(&self) -> Option<LatchInit> {
        match self.data {
            ObjectData::Latch(init) => Some(init),
            _ => None,
        }
    }

    pub fn instance(&self) -> Option<&Instance> {
        match &self.data {
            ObjectData::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}
