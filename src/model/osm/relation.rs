use super::{Member, ObjectMeta, RelationId, TagList};
use serde::{Deserialize, Serialize};

/// an OSM relation: a tagged collection of way members with roles
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    #[serde(default)]
    pub meta: ObjectMeta,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub members: Vec<Member>,
}
