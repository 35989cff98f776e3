use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// declares an i64 newtype for one OSM id space. ids are opaque: they order,
/// hash and print, nothing else.
macro_rules! osm_id {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            Eq,
            PartialEq,
            PartialOrd,
            Ord,
            Deserialize,
            Serialize,
            Hash,
        )]
        pub struct $name(pub i64);

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

osm_id!(NodeId);
osm_id!(WayId);
osm_id!(RelationId);
osm_id!(
    /// id of the way or relation an assembly is currently working on. ways
    /// and relations have separate id spaces, so an ObjectId is only
    /// meaningful together with the context that produced it, such as a
    /// problem report.
    ObjectId
);

impl From<WayId> for ObjectId {
    fn from(id: WayId) -> Self {
        ObjectId(id.0)
    }
}

impl From<RelationId> for ObjectId {
    fn from(id: RelationId) -> Self {
        ObjectId(id.0)
    }
}
