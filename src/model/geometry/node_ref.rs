use super::Location;
use crate::model::osm::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// a node reference: a node id together with its resolved location. two
/// NodeRefs may share a location while carrying different ids; that is legal
/// but reported as a duplicate-node advisory when the assembler relies on it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    pub location: Location,
}

impl NodeRef {
    pub fn new(id: NodeId, location: Location) -> NodeRef {
        NodeRef { id, location }
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.location)
    }
}
