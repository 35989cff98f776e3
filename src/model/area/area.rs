use super::AreaId;
use crate::model::geometry::NodeRef;
use crate::model::osm::{ObjectMeta, TagList};
use serde::{Deserialize, Serialize};

/// a hole in an outer ring, as a closed node sequence
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InnerRing {
    pub nodes: Vec<NodeRef>,
}

impl InnerRing {
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => first.location == last.location,
            _ => false,
        }
    }
}

/// a closed node sequence bounding filled area, followed on the wire by the
/// inner rings it carries
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OuterRing {
    pub nodes: Vec<NodeRef>,
    #[serde(default)]
    pub inner_rings: Vec<InnerRing>,
}

impl OuterRing {
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => first.location == last.location,
            _ => false,
        }
    }
}

/// an assembled area: attributes inherited from the source object, the tag
/// set that describes the area, and its rings. an area without any outer
/// rings is invalid by definition; the assembler leaves such a shell behind
/// when it rejects the geometry.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    #[serde(default)]
    pub meta: ObjectMeta,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub outer_rings: Vec<OuterRing>,
}

impl Area {
    pub fn is_valid(&self) -> bool {
        !self.outer_rings.is_empty()
    }
}
