use serde::{Deserialize, Serialize};

/// the versioning attributes every OSM object carries. an assembled area
/// inherits these verbatim from its source way or relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub version: u32,
    pub changeset: u64,
    /// seconds since the epoch
    pub timestamp: u64,
    pub visible: bool,
    pub uid: u64,
    pub user: String,
}

impl Default for ObjectMeta {
    fn default() -> Self {
        ObjectMeta {
            version: 0,
            changeset: 0,
            timestamp: 0,
            visible: true,
            uid: 0,
            user: String::new(),
        }
    }
}
