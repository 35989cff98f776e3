use crate::model::osm::{ObjectId, RelationId, WayId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// id of an assembled area. areas inherit the id of their source object,
/// doubled, with the low bit recording whether the source was a relation:
/// ways map to `id * 2`, relations to `id * 2 + 1`.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct AreaId(pub i64);

impl AreaId {
    pub fn from_way(id: WayId) -> AreaId {
        AreaId(id.0 * 2)
    }

    pub fn from_relation(id: RelationId) -> AreaId {
        AreaId(id.0 * 2 + 1)
    }

    /// the id of the way or relation this area was assembled from
    pub fn object_id(&self) -> ObjectId {
        ObjectId(self.0 / 2)
    }

    pub fn from_relation_source(&self) -> bool {
        self.0 % 2 == 1
    }
}

impl Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::AreaId;
    use crate::model::osm::{ObjectId, RelationId, WayId};

    #[test]
    fn id_encoding_round_trips() {
        let from_way = AreaId::from_way(WayId(21));
        assert_eq!(from_way, AreaId(42));
        assert!(!from_way.from_relation_source());
        assert_eq!(from_way.object_id(), ObjectId(21));

        let from_relation = AreaId::from_relation(RelationId(21));
        assert_eq!(from_relation, AreaId(43));
        assert!(from_relation.from_relation_source());
        assert_eq!(from_relation.object_id(), ObjectId(21));
    }
}
