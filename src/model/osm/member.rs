use super::WayId;
use serde::{Deserialize, Serialize};

/// a relation member: a way reference together with the raw role string it
/// carries in the relation ("outer", "inner", or anything else)
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "ref")]
    pub way: WayId,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn new(way: WayId, role: &str) -> Member {
        Member {
            way,
            role: String::from(role),
        }
    }

    pub fn is_inner(&self) -> bool {
        self.role == "inner"
    }
}
