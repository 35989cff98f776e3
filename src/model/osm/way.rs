use super::{ObjectMeta, TagList, WayId};
use crate::model::geometry::NodeRef;
use serde::{Deserialize, Serialize};

/// an OSM way: an ordered sequence of located node references
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Way {
    pub id: WayId,
    #[serde(default)]
    pub meta: ObjectMeta,
    #[serde(default)]
    pub tags: TagList,
    pub nodes: Vec<NodeRef>,
}

impl Way {
    /// a way is closed iff its first and last nodes are the same node
    pub fn is_closed(&self) -> bool {
        self.ends_have_same_id()
    }

    pub fn ends_have_same_id(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => first.id == last.id,
            _ => false,
        }
    }
}
